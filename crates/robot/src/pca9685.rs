use {
    crate::*,
    std::{path::PathBuf, time::Duration},
};

const MODE1: u8 = 0x00;
const PRESCALE: u8 = 0xFE;
const LED0_ON_L: u8 = 0x06;

const MODE1_SLEEP: u8 = 0x10;
const MODE1_RESTART: u8 = 0x80;

const OSCILLATOR_HZ: f32 = 25_000_000.0;
const CHANNELS: u8 = 16;
const FULL_SCALE: u16 = 4095;

/// PWM channel plus the two direction inputs of one H-bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WheelChannels {
    pub pwm: u8,
    pub forward: u8,
    pub backward: u8,
}

#[derive(Debug, Clone)]
pub struct Pca9685Config {
    bus: PathBuf,
    address: u16,
    frequency: f32,
    left: WheelChannels,
    right: WheelChannels,
    servo_pulse_us: (f32, f32),
}

impl Default for Pca9685Config {
    fn default() -> Self {
        Self {
            bus: PathBuf::from("/dev/i2c-1"),
            address: 0x40,
            // servos and wheels share the chip, servos need 50 Hz
            frequency: 50.0,
            left: WheelChannels {
                pwm: 0,
                forward: 1,
                backward: 2,
            },
            right: WheelChannels {
                pwm: 5,
                forward: 3,
                backward: 4,
            },
            servo_pulse_us: (500.0, 2500.0),
        }
    }
}

impl Pca9685Config {
    pub fn with_bus(mut self, bus: impl Into<PathBuf>) -> Self {
        self.bus = bus.into();
        self
    }

    pub fn with_address(mut self, address: u16) -> Self {
        self.address = address;
        self
    }

    pub fn with_frequency(mut self, frequency: f32) -> Self {
        self.frequency = frequency;
        self
    }

    pub fn with_wheels(mut self, left: WheelChannels, right: WheelChannels) -> Self {
        self.left = left;
        self.right = right;
        self
    }

    /// Pulse widths at 0° and 180°, in microseconds.
    pub fn with_servo_pulse_us(mut self, min: f32, max: f32) -> Self {
        self.servo_pulse_us = (min, max);
        self
    }

    pub fn bus(&self) -> &PathBuf {
        &self.bus
    }

    pub fn address(&self) -> u16 {
        self.address
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn left(&self) -> WheelChannels {
        self.left
    }

    pub fn right(&self) -> WheelChannels {
        self.right
    }

    pub fn servo_pulse_us(&self) -> (f32, f32) {
        self.servo_pulse_us
    }
}

/// Two DC motors through H-bridges and the camera servos, all driven by one
/// PCA9685 16-channel PWM controller.
pub struct Pca9685Motors<B: I2cBus = LinuxI2c> {
    bus: B,
    config: Pca9685Config,
}

impl Pca9685Motors<LinuxI2c> {
    pub fn open(config: Pca9685Config) -> Result<Self, RobotError> {
        let bus = LinuxI2c::open(config.bus(), config.address())?;
        Self::with_bus(bus, config)
    }
}

impl<B: I2cBus> Pca9685Motors<B> {
    /// Reset the controller on `bus` and program its PWM frequency.
    pub fn with_bus(bus: B, config: Pca9685Config) -> Result<Self, RobotError> {
        let mut motors = Self { bus, config };
        motors.bus.write(&[MODE1, 0x00])?;
        motors.set_frequency(motors.config.frequency())?;
        log::info!(
            "pca9685: 0x{:02x} on {} at {} Hz",
            motors.config.address(),
            motors.config.bus().display(),
            motors.config.frequency()
        );
        Ok(motors)
    }

    pub fn into_bus(self) -> B {
        self.bus
    }

    fn set_frequency(&mut self, frequency: f32) -> Result<(), RobotError> {
        let prescale = ((OSCILLATOR_HZ / 4096.0 / frequency).round() - 1.0).clamp(3.0, 255.0) as u8;
        // the prescaler can only be written while the oscillator sleeps
        let old_mode = self.bus.read_register(MODE1)?;
        self.bus
            .write(&[MODE1, (old_mode & !MODE1_RESTART) | MODE1_SLEEP])?;
        self.bus.write(&[PRESCALE, prescale])?;
        self.bus.write(&[MODE1, old_mode])?;
        std::thread::sleep(Duration::from_millis(5));
        self.bus.write(&[MODE1, old_mode | MODE1_RESTART])?;
        Ok(())
    }

    fn set_pwm(&mut self, channel: u8, on: u16, off: u16) -> Result<(), RobotError> {
        if channel >= CHANNELS {
            return Err(RobotError::Channel(channel));
        }
        let base = LED0_ON_L + 4 * channel;
        self.bus.write(&[base, (on & 0xFF) as u8])?;
        self.bus.write(&[base + 1, (on >> 8) as u8])?;
        self.bus.write(&[base + 2, (off & 0xFF) as u8])?;
        self.bus.write(&[base + 3, (off >> 8) as u8])?;
        Ok(())
    }

    fn set_level(&mut self, channel: u8, high: bool) -> Result<(), RobotError> {
        self.set_pwm(channel, 0, if high { FULL_SCALE } else { 0 })
    }

    fn set_wheel(&mut self, wheel: WheelChannels, power: i32) -> Result<(), RobotError> {
        let power = power.clamp(-MAX_WHEEL_SPEED, MAX_WHEEL_SPEED);
        let duty = (power.unsigned_abs() * FULL_SCALE as u32 / MAX_WHEEL_SPEED as u32) as u16;
        self.set_pwm(wheel.pwm, 0, duty)?;
        self.set_level(wheel.forward, power > 0)?;
        self.set_level(wheel.backward, power < 0)?;
        Ok(())
    }

    fn servo_counts(&self, angle: f32) -> u16 {
        let (min_us, max_us) = self.config.servo_pulse_us();
        let pulse_us = min_us + (max_us - min_us) * angle / 180.0;
        let period_us = 1_000_000.0 / self.config.frequency();
        (pulse_us * 4096.0 / period_us).round() as u16
    }
}

impl<B: I2cBus> Motors for Pca9685Motors<B> {
    fn drive(
        &mut self,
        speed: i32,
        left_offset: i32,
        right_offset: i32,
        duration: Duration,
    ) -> Result<(), RobotError> {
        let (left, right) = wheel_speeds(speed, left_offset, right_offset);
        self.set_wheel(self.config.left(), left)?;
        self.set_wheel(self.config.right(), right)?;
        std::thread::sleep(duration);
        Ok(())
    }

    fn stop(&mut self, duration: Duration) -> Result<(), RobotError> {
        self.set_wheel(self.config.left(), 0)?;
        self.set_wheel(self.config.right(), 0)?;
        std::thread::sleep(duration);
        Ok(())
    }

    fn set_servo(&mut self, channel: u8, angle: f32, duration: Duration) -> Result<(), RobotError> {
        if !(0.0..=180.0).contains(&angle) {
            return Err(RobotError::Angle(angle));
        }
        let counts = self.servo_counts(angle);
        self.set_pwm(channel, 0, counts)?;
        std::thread::sleep(duration);
        Ok(())
    }
}
