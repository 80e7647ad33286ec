use {base::Vec2, image::ImageError, thiserror::Error};

#[derive(Debug, Error)]
pub enum LaneError {
    #[error("invalid frame: {0}")]
    InvalidFrame(#[from] ImageError),
    #[error("edge mask of size {size} needs {expected} bytes, got {actual}")]
    MaskSize {
        size: Vec2<usize>,
        expected: usize,
        actual: usize,
    },
    #[error("scan row {offset} px above the bottom is outside a {height} px tall mask")]
    ScanRow { offset: usize, height: usize },
}
