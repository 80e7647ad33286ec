use {crate::*, std::sync::RwLock};

/// Whether the robot should drive, and how fast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStatus {
    pub is_running: bool,
    pub speed: i32,
}

impl RunStatus {
    pub fn label(&self) -> &'static str {
        if self.is_running { "RUNNING" } else { "STOPPED" }
    }
}

/// Written by the command interface, read by the control loop every cycle.
#[derive(Debug)]
pub struct RunState {
    status: RwLock<RunStatus>,
    step: i32,
    min_speed: i32,
    max_speed: i32,
}

impl Default for RunState {
    fn default() -> Self {
        Self::new(&FollowerConfig::default())
    }
}

impl RunState {
    pub fn new(config: &FollowerConfig) -> Self {
        Self {
            status: RwLock::new(RunStatus {
                is_running: false,
                speed: config.initial_speed(),
            }),
            step: config.speed_step(),
            min_speed: config.min_speed(),
            max_speed: config.max_speed(),
        }
    }

    fn update(&self, f: impl FnOnce(&mut RunStatus)) -> RunStatus {
        let mut status = self.status.write().unwrap_or_else(|e| e.into_inner());
        f(&mut status);
        *status
    }

    pub fn snapshot(&self) -> RunStatus {
        *self.status.read().unwrap_or_else(|e| e.into_inner())
    }

    pub fn is_running(&self) -> bool {
        self.snapshot().is_running
    }

    pub fn speed(&self) -> i32 {
        self.snapshot().speed
    }

    pub fn start(&self) -> RunStatus {
        self.update(|status| status.is_running = true)
    }

    pub fn stop(&self) -> RunStatus {
        self.update(|status| status.is_running = false)
    }

    pub fn speed_up(&self) -> RunStatus {
        let (step, max) = (self.step, self.max_speed);
        self.update(|status| status.speed = (status.speed + step).min(max))
    }

    pub fn speed_down(&self) -> RunStatus {
        let (step, min) = (self.step, self.min_speed);
        self.update(|status| status.speed = (status.speed - step).max(min))
    }
}
