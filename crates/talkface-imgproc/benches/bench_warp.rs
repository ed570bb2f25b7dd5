use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use talkface_image::Image;
use talkface_imgproc::{
    filter::{filter2d, kernels, median_blur},
    interpolation::InterpolationMode,
    padding::PaddingMode,
    warp::{get_perspective_transform, warp_perspective, BorderMode},
};

fn bench_warp_perspective(c: &mut Criterion) {
    let mut group = c.benchmark_group("WarpPerspective");

    for (width, height) in [(224, 224), (256, 256), (512, 512)].iter() {
        group.throughput(criterion::Throughput::Elements((*width * *height) as u64));

        let parameter_string = format!("{}x{}", width, height);

        // input image
        let image_size = [*width, *height].into();
        let image = Image::<u8, 3>::new(image_size, vec![0u8; width * height * 3]).unwrap();
        let image_f32 = image.cast::<f32>().unwrap();

        // output image
        let output = Image::<f32, 3>::from_size_val(image_size, 0.0).unwrap();

        let (h, w, e, p) = (*height as f32, *width as f32, 30.0, 25.0);
        let src = [[-e, -e], [-e, w + e], [h + e, -e], [h + e, w + e]];
        let dst = [[-e, -e], [-e + p, w + e], [h + e, -e], [h + e - p, w + e]];
        let m = get_perspective_transform(&src, &dst);

        group.bench_with_input(
            BenchmarkId::new("replicate_par_rows", &parameter_string),
            &(&image_f32, &output, m),
            |b, i| {
                let (src, mut dst, m) = (i.0.clone(), i.1.clone(), i.2);
                b.iter(|| {
                    warp_perspective(
                        black_box(&src),
                        black_box(&mut dst),
                        black_box(&m),
                        black_box(InterpolationMode::Bilinear),
                        black_box(BorderMode::Replicate),
                    )
                })
            },
        );
    }
    group.finish();
}

fn bench_blur_sharpen(c: &mut Criterion) {
    let mut group = c.benchmark_group("BlurSharpen");

    for (width, height) in [(224, 224), (512, 512)].iter() {
        let image_size = [*width, *height].into();
        let image = Image::<u8, 3>::from_size_val(image_size, 128).unwrap();
        let output = Image::<u8, 3>::from_size_val(image_size, 0).unwrap();

        for kernel_size in [3, 9].iter() {
            let parameter_string = format!("{}x{}x{}", width, height, kernel_size);
            group.bench_with_input(
                BenchmarkId::new("median_blur", &parameter_string),
                &(&image, &output),
                |b, i| {
                    let (src, mut dst) = (i.0, i.1.clone());
                    b.iter(|| black_box(median_blur(src, &mut dst, *kernel_size)))
                },
            );
        }

        let parameter_string = format!("{}x{}", width, height);
        let kernel = kernels::sharpen_kernel_3x3();
        group.bench_with_input(
            BenchmarkId::new("sharpen", &parameter_string),
            &(&image, &output),
            |b, i| {
                let (src, mut dst) = (i.0, i.1.clone());
                b.iter(|| {
                    black_box(filter2d(
                        src,
                        &mut dst,
                        &kernel,
                        3,
                        PaddingMode::Reflect101,
                    ))
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_warp_perspective, bench_blur_sharpen);
criterion_main!(benches);
