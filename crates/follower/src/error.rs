use {
    image::ImageError, lane::LaneError, robot::RobotError, thiserror::Error, video::VideoError,
};

#[derive(Debug, Error)]
pub enum FollowerError {
    #[error("camera: {0}")]
    Video(#[from] VideoError),
    #[error("motors: {0}")]
    Robot(#[from] RobotError),
    #[error("lane pipeline: {0}")]
    Lane(#[from] LaneError),
    #[error("image: {0}")]
    Image(#[from] ImageError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("control loop: {0}")]
    Worker(String),
}
