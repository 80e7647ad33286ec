use {crate::*, base::Vec2};

/// A packed or planar raster. `data` layout is defined by `format`.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub size: Vec2<usize>,
    pub data: Vec<u8>,
    pub format: PixelFormat,
}

impl Image {
    pub fn new(size: Vec2<usize>, data: Vec<u8>, format: PixelFormat) -> Self {
        Self { size, data, format }
    }

    /// Build an image, rejecting empty sizes and data of the wrong length.
    pub fn try_new(
        size: Vec2<usize>,
        data: Vec<u8>,
        format: PixelFormat,
    ) -> Result<Self, ImageError> {
        let image = Self::new(size, data, format);
        image.validate()?;
        Ok(image)
    }

    /// An all-zero (black) image.
    pub fn blank(size: Vec2<usize>, format: PixelFormat) -> Self {
        Self::new(size, vec![0u8; format.frame_len(size)], format)
    }

    pub fn width(&self) -> usize {
        self.size.x
    }

    pub fn height(&self) -> usize {
        self.size.y
    }

    pub fn validate(&self) -> Result<(), ImageError> {
        if self.size.is_empty() {
            return Err(ImageError::Empty);
        }
        let expected = self.format.frame_len(self.size);
        if self.data.len() != expected {
            return Err(ImageError::Size {
                format: self.format,
                size: self.size,
                expected,
                actual: self.data.len(),
            });
        }
        Ok(())
    }

    /// Row `y` of a packed image.
    pub fn row(&self, y: usize) -> &[u8] {
        let stride = self.size.x * self.format.bytes_per_pixel().unwrap_or(1);
        &self.data[y * stride..(y + 1) * stride]
    }

    /// Mirror a packed image horizontally and/or vertically.
    ///
    /// Planar formats are returned unchanged; convert to `Rgb8` first.
    pub fn flipped(mut self, horizontal: bool, vertical: bool) -> Self {
        let Some(bpp) = self.format.bytes_per_pixel() else {
            return self;
        };
        let (width, height) = (self.size.x, self.size.y);
        let stride = width * bpp;
        if horizontal {
            for row in self.data.chunks_exact_mut(stride) {
                for x in 0..width / 2 {
                    let mirror = width - 1 - x;
                    for c in 0..bpp {
                        row.swap(x * bpp + c, mirror * bpp + c);
                    }
                }
            }
        }
        if vertical {
            for y in 0..height / 2 {
                let (top, bottom) = self.data.split_at_mut((height - 1 - y) * stride);
                top[y * stride..(y + 1) * stride].swap_with_slice(&mut bottom[..stride]);
            }
        }
        self
    }
}
