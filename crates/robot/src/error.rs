use thiserror::Error;

#[derive(Debug, Error)]
pub enum RobotError {
    #[error("I2C error on {path}: {source}")]
    I2c {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PWM channel {0} out of range (0..16)")]
    Channel(u8),
    #[error("servo angle {0} out of range (0..=180)")]
    Angle(f32),
}
