use {crate::PixelFormat, base::Vec2, thiserror::Error};

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("decode error: {0}")]
    Decode(String),
    #[error("encode error: {0}")]
    Encode(String),
    #[error("{format:?} image of size {size} needs {expected} bytes, got {actual}")]
    Size {
        format: PixelFormat,
        size: Vec2<usize>,
        expected: usize,
        actual: usize,
    },
    #[error("expected {expected:?} format, got {actual:?}")]
    Format {
        expected: PixelFormat,
        actual: PixelFormat,
    },
    #[error("empty image")]
    Empty,
}

impl From<crates_image::ImageError> for ImageError {
    fn from(err: crates_image::ImageError) -> Self {
        ImageError::Decode(err.to_string())
    }
}
