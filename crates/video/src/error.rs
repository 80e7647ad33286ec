use {image::ImageError, thiserror::Error};

#[derive(Debug, Error)]
pub enum VideoError {
    #[error("device error: {0}")]
    Device(String),
    #[error("stream error: {0}")]
    Stream(String),
    #[error("frame error: {0}")]
    Frame(#[from] ImageError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl VideoError {
    pub(crate) fn device(err: impl std::fmt::Display) -> Self {
        VideoError::Device(err.to_string())
    }
}
