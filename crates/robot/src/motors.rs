use {crate::*, std::time::Duration};

/// Wheel commands are percentages of full power.
pub const MAX_WHEEL_SPEED: i32 = 100;

/// The actuator collaborator of the control loop.
///
/// Every call holds its output for `duration` before returning, the same way
/// the robot's timed moves behave.
pub trait Motors: Send {
    /// Run both wheels forward at `speed` with per-side offsets added.
    fn drive(
        &mut self,
        speed: i32,
        left_offset: i32,
        right_offset: i32,
        duration: Duration,
    ) -> Result<(), RobotError>;

    /// Cut power to both wheels.
    fn stop(&mut self, duration: Duration) -> Result<(), RobotError>;

    /// Move a hobby servo on `channel` to `angle` degrees.
    fn set_servo(&mut self, channel: u8, angle: f32, duration: Duration)
    -> Result<(), RobotError>;
}

/// One issued actuator command.
#[derive(Debug, Clone, PartialEq)]
pub enum MotorCommand {
    Drive {
        speed: i32,
        left_offset: i32,
        right_offset: i32,
        duration: Duration,
    },
    Stop {
        duration: Duration,
    },
    Servo {
        channel: u8,
        angle: f32,
        duration: Duration,
    },
}

impl MotorCommand {
    pub fn is_drive(&self) -> bool {
        matches!(self, MotorCommand::Drive { .. })
    }

    pub fn is_stop(&self) -> bool {
        matches!(self, MotorCommand::Stop { .. })
    }
}

/// Per-wheel power for a drive command, each clamped to ±`MAX_WHEEL_SPEED`.
pub fn wheel_speeds(speed: i32, left_offset: i32, right_offset: i32) -> (i32, i32) {
    (
        (speed + left_offset).clamp(-MAX_WHEEL_SPEED, MAX_WHEEL_SPEED),
        (speed + right_offset).clamp(-MAX_WHEEL_SPEED, MAX_WHEEL_SPEED),
    )
}
