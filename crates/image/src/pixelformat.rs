use {crate::*, base::Vec2};

// fourcc codes
pub const FOURCC_RGB8: u32 = u32::from_le_bytes(*b"RGB8");
pub const FOURCC_GREY: u32 = u32::from_le_bytes(*b"GREY");
pub const FOURCC_YUYV: u32 = u32::from_le_bytes(*b"YUYV");
pub const FOURCC_YU12: u32 = u32::from_le_bytes(*b"YU12");

/// Convert a fourcc code to a readable 4-character string.
pub fn fourcc_to_string(fourcc: u32) -> String {
    String::from_utf8_lossy(&fourcc.to_le_bytes()).into_owned()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Rgb8,
    Gray8,
    Yuyv,
    Yu12,
}

impl PixelFormat {
    pub fn from_fourcc(fourcc: u32) -> Option<Self> {
        match fourcc {
            FOURCC_RGB8 => Some(PixelFormat::Rgb8),
            FOURCC_GREY => Some(PixelFormat::Gray8),
            FOURCC_YUYV => Some(PixelFormat::Yuyv),
            FOURCC_YU12 => Some(PixelFormat::Yu12),
            _ => None,
        }
    }

    pub fn as_fourcc(&self) -> u32 {
        match self {
            PixelFormat::Rgb8 => FOURCC_RGB8,
            PixelFormat::Gray8 => FOURCC_GREY,
            PixelFormat::Yuyv => FOURCC_YUYV,
            PixelFormat::Yu12 => FOURCC_YU12,
        }
    }

    /// Bytes per pixel for packed formats, `None` for planar ones.
    pub fn bytes_per_pixel(&self) -> Option<usize> {
        match self {
            PixelFormat::Rgb8 => Some(3),
            PixelFormat::Gray8 => Some(1),
            PixelFormat::Yuyv => Some(2),
            PixelFormat::Yu12 => None,
        }
    }

    /// Number of bytes a frame of `size` occupies in this format.
    pub fn frame_len(&self, size: Vec2<usize>) -> usize {
        match self {
            PixelFormat::Yu12 => size.area() * 3 / 2,
            packed => size.area() * packed.bytes_per_pixel().unwrap_or(1),
        }
    }

    pub fn ensure_format(&self, expected: PixelFormat) -> Result<(), ImageError> {
        if *self != expected {
            return Err(ImageError::Format {
                expected,
                actual: *self,
            });
        }
        Ok(())
    }
}

// BT.601 YUV-to-RGB conversion for a single pixel (fixed-point, shift 8)
pub(crate) fn yuv_to_rgb(y: u8, u: u8, v: u8) -> (u8, u8, u8) {
    let y = y as i32;
    let u = u as i32 - 128;
    let v = v as i32 - 128;
    let r = (y + ((359 * v) >> 8)).clamp(0, 255) as u8;
    let g = (y - ((88 * u + 183 * v) >> 8)).clamp(0, 255) as u8;
    let b = (y + ((454 * u) >> 8)).clamp(0, 255) as u8;
    (r, g, b)
}
