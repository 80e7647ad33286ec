#![allow(dead_code)]

use {
    base::Vec2,
    follower::*,
    image::{Image, PixelFormat},
    lane::LanePipeline,
    robot::{MotorHistory, SimulatedMotors},
    std::{collections::VecDeque, sync::Arc, time::Duration},
};

/// Frames handed out in order; `repeat` keeps returning the last one.
pub struct ScriptedSource {
    frames: VecDeque<Image>,
    repeat: bool,
}

impl ScriptedSource {
    pub fn once(frames: Vec<Image>) -> Self {
        Self {
            frames: frames.into(),
            repeat: false,
        }
    }

    pub fn forever(frame: Image) -> Self {
        Self {
            frames: VecDeque::from([frame]),
            repeat: true,
        }
    }
}

impl FrameSource for ScriptedSource {
    fn capture_latest(&mut self) -> Result<Image, FollowerError> {
        if self.repeat {
            std::thread::sleep(Duration::from_millis(2));
            return self
                .frames
                .front()
                .cloned()
                .ok_or_else(|| FollowerError::Worker("no frames".to_string()));
        }
        self.frames
            .pop_front()
            .ok_or_else(|| FollowerError::Worker("no frames".to_string()))
    }
}

/// Black floor with full-height white stripes.
pub fn track_frame(width: usize, height: usize, stripes: &[(usize, usize)]) -> Image {
    let mut data = vec![0u8; width * height * 3];
    for y in 0..height {
        for &(from, to) in stripes {
            for x in from..to {
                let idx = (y * width + x) * 3;
                data[idx..idx + 3].copy_from_slice(&[255, 255, 255]);
            }
        }
    }
    Image::new(Vec2::new(width, height), data, PixelFormat::Rgb8)
}

pub fn two_lines() -> Image {
    track_frame(320, 240, &[(96, 104), (216, 224)])
}

pub fn blank_floor() -> Image {
    track_frame(320, 240, &[])
}

pub fn test_config() -> FollowerConfig {
    FollowerConfig::default()
        .with_drive_duration(Duration::ZERO)
        .with_loop_period(Duration::from_millis(5))
        .with_stop_duration(Duration::ZERO)
        .with_stream_interval(Duration::from_millis(5))
        .with_stream_poll(Duration::from_millis(2))
        .with_aim_duration(Duration::ZERO)
        .with_settle(Duration::ZERO)
}

pub struct Rig {
    pub state: Arc<RunState>,
    pub store: Arc<SharedStore>,
    pub drive: Arc<Drive>,
    pub history: MotorHistory,
    pub config: FollowerConfig,
}

impl Rig {
    pub fn new() -> Self {
        let config = test_config();
        let motors = SimulatedMotors::new();
        let history = motors.history();
        Self {
            state: Arc::new(RunState::new(&config)),
            store: Arc::new(SharedStore::new()),
            drive: Arc::new(Drive::new(motors)),
            history,
            config,
        }
    }

    pub fn control<S: FrameSource>(&self, source: S) -> ControlLoop<S> {
        ControlLoop::new(
            source,
            LanePipeline::default(),
            Arc::clone(&self.state),
            Arc::clone(&self.store),
            Arc::clone(&self.drive),
            self.config.clone(),
        )
    }

    pub fn app(&self) -> server::AppState {
        server::AppState {
            state: Arc::clone(&self.state),
            store: Arc::clone(&self.store),
            drive: Arc::clone(&self.drive),
            config: self.config.clone(),
        }
    }
}
