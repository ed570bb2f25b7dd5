use talkface_image::ImageError;
use talkface_tensor::Tensor2;

/// Create a meshgrid of sampling coordinates from a function.
///
/// # Arguments
///
/// * `cols` - The number of columns indicating the width of the grid.
/// * `rows` - The number of rows indicating the height of the grid.
/// * `f` - Maps a destination pixel `(x, y)` to its source coordinate.
///
/// # Returns
///
/// A tuple of 2D tensors of shape (rows, cols) holding the x and y coordinates.
pub fn meshgrid_from_fn(
    cols: usize,
    rows: usize,
    f: impl Fn(usize, usize) -> Result<(f32, f32), ImageError>,
) -> Result<(Tensor2<f32>, Tensor2<f32>), ImageError> {
    let mut map_x = Vec::with_capacity(rows * cols);
    let mut map_y = Vec::with_capacity(rows * cols);

    for y in 0..rows {
        for x in 0..cols {
            let (u, v) = f(x, y)?;
            map_x.push(u);
            map_y.push(v);
        }
    }

    let map_x = Tensor2::from_shape_vec([rows, cols], map_x)?;
    let map_y = Tensor2::from_shape_vec([rows, cols], map_y)?;

    Ok((map_x, map_y))
}

#[cfg(test)]
mod tests {
    use talkface_image::ImageError;

    #[test]
    fn test_meshgrid_from_fn() -> Result<(), ImageError> {
        let (map_x, map_y) =
            super::meshgrid_from_fn(3, 2, |x, y| Ok((x as f32 * 2.0, y as f32)))?;
        assert_eq!(map_x.shape, [2, 3]);
        assert_eq!(map_x.as_slice(), &[0.0, 2.0, 4.0, 0.0, 2.0, 4.0]);
        assert_eq!(map_y.as_slice(), &[0.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
        Ok(())
    }
}
