#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use talkface_tensor as tensor;

#[doc(inline)]
pub use talkface_image as image;

#[doc(inline)]
pub use talkface_imgproc as imgproc;

#[doc(inline)]
pub use talkface_data as data;
