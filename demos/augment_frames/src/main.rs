use argh::FromArgs;
use rand::{rngs::StdRng, SeedableRng};

use talkface::data::{
    augment::face_augmentation, create_dataloader, tensor_wrap::image_to_tensor, DatasetOptions,
    DatasetRegistry, Frame, FrameSequence, InMemoryDataset, Sample, WrappedTensor,
};

#[derive(FromArgs)]
/// Augment a synthetic face sequence and batch it with a data loader
struct Args {
    /// side of the square input frames
    #[argh(option, default = "256")]
    size: usize,

    /// number of frames in the sequence
    #[argh(option, default = "5")]
    num_frames: usize,

    /// side of the square output crop
    #[argh(option, default = "224")]
    crop_size: usize,

    /// samples per batch
    #[argh(option, default = "2")]
    batch_size: usize,

    /// random seed
    #[argh(option, default = "0")]
    seed: u64,
}

/// A diagonal gradient, shifted a little on every frame.
fn synthetic_frame(size: usize, shift: usize) -> Result<Frame<3>, Box<dyn std::error::Error>> {
    let mut data = Vec::with_capacity(size * size * 3);
    for y in 0..size {
        for x in 0..size {
            let v = ((x + y + shift) * 255 / (2 * size)).min(255) as u8;
            data.extend_from_slice(&[v, 255 - v, 128]);
        }
    }
    Ok(Frame::<3>::new([size, size].into(), data)?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let frames = (0..args.num_frames)
        .map(|i| synthetic_frame(args.size, i * 4))
        .collect::<Result<Vec<_>, _>>()?;
    let seq = FrameSequence::new(frames)?;

    let mut rng = StdRng::seed_from_u64(args.seed);
    let augmented = face_augmentation(&seq, args.crop_size, &mut rng)?;

    println!(
        "augmented {} frames: {} -> {}",
        augmented.len(),
        seq.frame_size(),
        augmented.frame_size()
    );

    let samples = augmented
        .iter()
        .map(|frame| Sample::new().with_field("img", WrappedTensor::Single(image_to_tensor(frame))))
        .collect::<Vec<_>>();

    let mut registry = DatasetRegistry::new();
    registry.register("AugmentedFacesDataset", move || {
        Box::new(InMemoryDataset::new("AugmentedFacesDataset", samples.clone()))
    });

    let opts = DatasetOptions {
        dataset_mode: "augmented_faces".to_string(),
        batch_size: args.batch_size,
        is_train: false,
        crop_size: args.crop_size,
        seed: Some(args.seed),
        ..Default::default()
    };

    let loaders = create_dataloader(&registry, &opts)?;
    let Some(loader) = loaders.single() else {
        return Err("expected a single data loader".into());
    };

    for batch in loader.iter(0) {
        let batch = batch?;
        let imgs = batch.stack("img")?;
        log::info!("batch {:?} -> tensor {:?}", batch.indices, imgs.shape);
        println!("batch {:?}: tensor shape {:?}", batch.indices, imgs.shape);
    }

    Ok(())
}
