/// Create the 3x3 sharpening kernel.
///
/// The center weight is 9 and every neighbor weighs -1, so flat regions keep
/// their value while edges are amplified.
///
/// # Returns
///
/// The row-major kernel.
pub fn sharpen_kernel_3x3() -> [f32; 9] {
    #[rustfmt::skip]
    let kernel = [
        -1.0, -1.0, -1.0,
        -1.0,  9.0, -1.0,
        -1.0, -1.0, -1.0,
    ];
    kernel
}
