//! Raster images for the line follower.
//!
//! Frames travel through the pipeline as packed `Image`s. Camera formats are
//! converted to `Rgb8` once at capture; everything downstream (edge
//! extraction, overlays, JPEG streaming) works on `Rgb8` or `Gray8`.

pub mod convert;
pub mod draw;
pub mod error;
pub mod image;
pub mod jpeg;
pub mod pixelformat;

mod font;

pub use convert::*;
pub use draw::*;
pub use error::ImageError;
pub use image::Image;
pub use jpeg::*;
pub use pixelformat::*;
