use {
    crate::*,
    std::{
        sync::{Arc, Mutex},
        time::Duration,
    },
};

/// Shared view of the commands a `SimulatedMotors` received.
#[derive(Debug, Clone, Default)]
pub struct MotorHistory {
    commands: Arc<Mutex<Vec<MotorCommand>>>,
}

impl MotorHistory {
    fn push(&self, command: MotorCommand) {
        self.commands
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(command);
    }

    pub fn commands(&self) -> Vec<MotorCommand> {
        self.commands
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn drive_count(&self) -> usize {
        self.count(MotorCommand::is_drive)
    }

    pub fn stop_count(&self) -> usize {
        self.count(MotorCommand::is_stop)
    }

    pub fn last(&self) -> Option<MotorCommand> {
        self.commands
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .last()
            .cloned()
    }

    pub fn clear(&self) {
        self.commands
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }

    fn count(&self, pred: fn(&MotorCommand) -> bool) -> usize {
        self.commands
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|c| pred(c))
            .count()
    }
}

/// Motors that only log and record what they are told.
#[derive(Debug, Default)]
pub struct SimulatedMotors {
    history: MotorHistory,
    realtime: bool,
}

impl SimulatedMotors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold each command for its duration like real hardware does.
    pub fn with_realtime(mut self, realtime: bool) -> Self {
        self.realtime = realtime;
        self
    }

    pub fn history(&self) -> MotorHistory {
        self.history.clone()
    }

    fn hold(&self, duration: Duration) {
        if self.realtime {
            std::thread::sleep(duration);
        }
    }
}

impl Motors for SimulatedMotors {
    fn drive(
        &mut self,
        speed: i32,
        left_offset: i32,
        right_offset: i32,
        duration: Duration,
    ) -> Result<(), RobotError> {
        let (left, right) = wheel_speeds(speed, left_offset, right_offset);
        log::debug!("sim motors: drive left {} right {} for {:?}", left, right, duration);
        self.history.push(MotorCommand::Drive {
            speed,
            left_offset,
            right_offset,
            duration,
        });
        self.hold(duration);
        Ok(())
    }

    fn stop(&mut self, duration: Duration) -> Result<(), RobotError> {
        log::debug!("sim motors: stop");
        self.history.push(MotorCommand::Stop { duration });
        self.hold(duration);
        Ok(())
    }

    fn set_servo(&mut self, channel: u8, angle: f32, duration: Duration) -> Result<(), RobotError> {
        if !(0.0..=180.0).contains(&angle) {
            return Err(RobotError::Angle(angle));
        }
        log::debug!("sim motors: servo {} -> {}°", channel, angle);
        self.history.push(MotorCommand::Servo {
            channel,
            angle,
            duration,
        });
        self.hold(duration);
        Ok(())
    }
}
