use {
    crate::*,
    lane::SteeringOffsets,
    robot::{Motors, RobotError},
    std::{
        sync::{Mutex, MutexGuard},
        time::Duration,
    },
};

/// The one way to the motors. Commands from the control loop, the stop
/// endpoint and shutdown are serialized here.
pub struct Drive {
    motors: Mutex<Box<dyn Motors>>,
}

impl Drive {
    pub fn new(motors: impl Motors + 'static) -> Self {
        Self::from_boxed(Box::new(motors))
    }

    pub fn from_boxed(motors: Box<dyn Motors>) -> Self {
        Self {
            motors: Mutex::new(motors),
        }
    }

    fn motors(&self) -> MutexGuard<'_, Box<dyn Motors>> {
        self.motors.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Drive only if `state` says running, reading it under the motor lock.
    ///
    /// `offsets` gets the status the command is issued with, so the steering
    /// can be bounded by the speed actually driven. Returns that status, or
    /// `None` when stopped.
    pub fn drive_if_running(
        &self,
        state: &RunState,
        duration: Duration,
        offsets: impl FnOnce(RunStatus) -> SteeringOffsets,
    ) -> Result<Option<RunStatus>, RobotError> {
        let mut motors = self.motors();
        let status = state.snapshot();
        if !status.is_running {
            return Ok(None);
        }
        let offsets = offsets(status);
        motors.drive(
            status.speed,
            offsets.left_offset(),
            offsets.right_offset(),
            duration,
        )?;
        Ok(Some(status))
    }

    pub fn stop(&self, duration: Duration) -> Result<(), RobotError> {
        self.motors().stop(duration)
    }

    /// Clear the running flag and stop the wheels under one motor lock. No
    /// `drive_if_running` can slip in between.
    pub fn stop_running(&self, state: &RunState, duration: Duration) -> Result<RunStatus, RobotError> {
        let mut motors = self.motors();
        let status = state.stop();
        motors.stop(duration)?;
        Ok(status)
    }

    pub fn set_servo(&self, channel: u8, angle: f32, duration: Duration) -> Result<(), RobotError> {
        self.motors().set_servo(channel, angle, duration)
    }

    /// Point the camera servos and wait for the mount to settle.
    pub fn aim_camera(&self, config: &FollowerConfig) -> Result<(), RobotError> {
        for aim in config.servo_aims() {
            log::info!("aiming servo {} at {}°", aim.channel, aim.angle);
            self.set_servo(aim.channel, aim.angle, config.aim_duration())?;
        }
        std::thread::sleep(config.settle());
        Ok(())
    }
}
