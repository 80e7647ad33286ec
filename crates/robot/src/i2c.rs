use {
    crate::*,
    std::{
        fs::{File, OpenOptions},
        io::{Read, Write},
        os::fd::AsRawFd,
        path::{Path, PathBuf},
    },
};

// from linux/i2c-dev.h
const I2C_SLAVE: u64 = 0x0703;

/// Register access to one device on an I2C bus.
pub trait I2cBus: Send {
    /// Write `bytes`, the first one being the register address.
    fn write(&mut self, bytes: &[u8]) -> Result<(), RobotError>;

    fn read_register(&mut self, register: u8) -> Result<u8, RobotError>;
}

/// An i2c-dev character device bound to one slave address.
pub struct LinuxI2c {
    path: PathBuf,
    file: File,
}

impl LinuxI2c {
    pub fn open(path: impl AsRef<Path>, address: u16) -> Result<Self, RobotError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&path)
            .map_err(|source| RobotError::I2c {
                path: path.display().to_string(),
                source,
            })?;

        let result = unsafe { libc::ioctl(file.as_raw_fd(), I2C_SLAVE as _, address as libc::c_ulong) };
        if result < 0 {
            return Err(RobotError::I2c {
                path: path.display().to_string(),
                source: std::io::Error::last_os_error(),
            });
        }
        Ok(Self { path, file })
    }

    fn error(&self, source: std::io::Error) -> RobotError {
        RobotError::I2c {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl I2cBus for LinuxI2c {
    fn write(&mut self, bytes: &[u8]) -> Result<(), RobotError> {
        self.file.write_all(bytes).map_err(|e| self.error(e))
    }

    fn read_register(&mut self, register: u8) -> Result<u8, RobotError> {
        self.file.write_all(&[register]).map_err(|e| self.error(e))?;
        let mut value = [0u8; 1];
        self.file.read_exact(&mut value).map_err(|e| self.error(e))?;
        Ok(value[0])
    }
}
