use std::{
    net::{Ipv4Addr, SocketAddr},
    time::Duration,
};

/// Where one camera servo is pointed at startup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ServoAim {
    pub channel: u8,
    pub angle: f32,
}

/// Timing, speed and streaming settings. Fixed once the robot starts.
#[derive(Debug, Clone)]
pub struct FollowerConfig {
    bind: SocketAddr,
    initial_speed: i32,
    speed_step: i32,
    min_speed: i32,
    max_speed: i32,
    drive_duration: Duration,
    loop_period: Duration,
    stop_duration: Duration,
    shutdown_timeout: Duration,
    jpeg_quality: u8,
    stream_interval: Duration,
    stream_poll: Duration,
    servo_aims: Vec<ServoAim>,
    aim_duration: Duration,
    settle: Duration,
}

impl Default for FollowerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from((Ipv4Addr::UNSPECIFIED, 5000)),
            initial_speed: 15,
            speed_step: 5,
            min_speed: 10,
            max_speed: 80,
            drive_duration: Duration::from_millis(50),
            loop_period: Duration::from_millis(30),
            stop_duration: Duration::from_millis(100),
            shutdown_timeout: Duration::from_secs(2),
            jpeg_quality: 70,
            stream_interval: Duration::from_millis(50),
            stream_poll: Duration::from_millis(10),
            // pan straight ahead, tilt down at the floor
            servo_aims: vec![
                ServoAim {
                    channel: 10,
                    angle: 90.0,
                },
                ServoAim {
                    channel: 9,
                    angle: 20.0,
                },
            ],
            aim_duration: Duration::from_millis(500),
            settle: Duration::from_secs(1),
        }
    }
}

impl FollowerConfig {
    pub fn with_bind(mut self, bind: SocketAddr) -> Self {
        self.bind = bind;
        self
    }

    pub fn with_initial_speed(mut self, speed: i32) -> Self {
        self.initial_speed = speed;
        self
    }

    pub fn with_speed_step(mut self, step: i32) -> Self {
        self.speed_step = step;
        self
    }

    /// Allowed speed range, stored ordered.
    pub fn with_speed_range(mut self, min: i32, max: i32) -> Self {
        self.min_speed = min.min(max);
        self.max_speed = min.max(max);
        self
    }

    pub fn with_drive_duration(mut self, duration: Duration) -> Self {
        self.drive_duration = duration;
        self
    }

    pub fn with_loop_period(mut self, period: Duration) -> Self {
        self.loop_period = period;
        self
    }

    pub fn with_stop_duration(mut self, duration: Duration) -> Self {
        self.stop_duration = duration;
        self
    }

    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }

    pub fn with_stream_interval(mut self, interval: Duration) -> Self {
        self.stream_interval = interval;
        self
    }

    pub fn with_stream_poll(mut self, poll: Duration) -> Self {
        self.stream_poll = poll;
        self
    }

    pub fn with_servo_aims(mut self, aims: Vec<ServoAim>) -> Self {
        self.servo_aims = aims;
        self
    }

    pub fn with_aim_duration(mut self, duration: Duration) -> Self {
        self.aim_duration = duration;
        self
    }

    pub fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    pub fn bind(&self) -> SocketAddr {
        self.bind
    }

    /// Starting speed, clamped into the allowed range.
    pub fn initial_speed(&self) -> i32 {
        self.initial_speed.clamp(self.min_speed, self.max_speed)
    }

    pub fn speed_step(&self) -> i32 {
        self.speed_step
    }

    pub fn min_speed(&self) -> i32 {
        self.min_speed
    }

    pub fn max_speed(&self) -> i32 {
        self.max_speed
    }

    pub fn drive_duration(&self) -> Duration {
        self.drive_duration
    }

    pub fn loop_period(&self) -> Duration {
        self.loop_period
    }

    pub fn stop_duration(&self) -> Duration {
        self.stop_duration
    }

    pub fn shutdown_timeout(&self) -> Duration {
        self.shutdown_timeout
    }

    pub fn jpeg_quality(&self) -> u8 {
        self.jpeg_quality
    }

    pub fn stream_interval(&self) -> Duration {
        self.stream_interval
    }

    pub fn stream_poll(&self) -> Duration {
        self.stream_poll
    }

    pub fn servo_aims(&self) -> &[ServoAim] {
        &self.servo_aims
    }

    pub fn aim_duration(&self) -> Duration {
        self.aim_duration
    }

    pub fn settle(&self) -> Duration {
        self.settle
    }
}
