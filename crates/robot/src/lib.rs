//! Actuators: the two drive wheels and the camera pan/tilt servos.
//!
//! Everything that moves goes through the `Motors` trait. `Pca9685Motors`
//! talks to the PWM board over Linux i2c-dev, `SimulatedMotors` records the
//! commands for bench runs and tests.

mod error;
mod i2c;
mod motors;
mod pca9685;
mod simulated;

pub use error::RobotError;
pub use i2c::{I2cBus, LinuxI2c};
pub use motors::{MAX_WHEEL_SPEED, MotorCommand, Motors, wheel_speeds};
pub use pca9685::{Pca9685Config, Pca9685Motors, WheelChannels};
pub use simulated::{MotorHistory, SimulatedMotors};
