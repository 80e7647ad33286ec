//! Binary edge mask extraction.
//!
//! luminance -> 5x5 Gaussian -> Sobel -> non-maximum suppression ->
//! two-threshold hysteresis -> one 5x5 dilation. Mask values are 0 or 255.

use {
    crate::*,
    base::Vec2,
    image::{Image, PixelFormat},
};

const EDGE: u8 = 255;

// 5x5 Gaussian (sigma derived from the kernel size) is the binomial 1-4-6-4-1
const GAUSS5: [u32; 5] = [1, 4, 6, 4, 1];

const DILATE_RADIUS: usize = 2;

// tan(22.5°) and tan(67.5°) in 15-bit fixed point
const TAN22_5_Q15: i64 = 13573;
const TAN67_5_Q15: i64 = 79109;

/// Single-channel binary edge raster, same size as the frame it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeMask {
    size: Vec2<usize>,
    data: Vec<u8>,
}

impl EdgeMask {
    pub fn new(size: Vec2<usize>, data: Vec<u8>) -> Result<Self, LaneError> {
        if data.len() != size.area() {
            return Err(LaneError::MaskSize {
                size,
                expected: size.area(),
                actual: data.len(),
            });
        }
        Ok(Self { size, data })
    }

    /// A mask with no edges.
    pub fn empty(size: Vec2<usize>) -> Self {
        Self {
            size,
            data: vec![0; size.area()],
        }
    }

    pub fn size(&self) -> Vec2<usize> {
        self.size
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> usize {
        self.size.x
    }

    pub fn height(&self) -> usize {
        self.size.y
    }

    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.size.x + x]
    }

    pub fn set(&mut self, x: usize, y: usize, value: u8) {
        self.data[y * self.size.x + x] = value;
    }

    pub fn edge_count(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }

    /// Expand to an `Rgb8` image for drawing overlays on.
    pub fn to_rgb(&self) -> Image {
        Image::new(self.size, image::gray_to_rgb(&self.data), PixelFormat::Rgb8)
    }
}

/// Extract the edge mask of an `Rgb8` frame.
pub fn extract_edges(frame: &Image, config: &EdgeConfig) -> Result<EdgeMask, LaneError> {
    frame.validate()?;
    frame.format.ensure_format(PixelFormat::Rgb8)?;
    let gray = image::to_gray(frame)?;
    let size = gray.size;

    let blurred = gaussian5(&gray.data, size);
    let (gx, gy) = sobel(&blurred, size);
    let mag: Vec<i32> = gx.iter().zip(&gy).map(|(x, y)| x.abs() + y.abs()).collect();
    let thin = non_max_suppression(&mag, &gx, &gy, size);
    let linked = hysteresis(&thin, size, config.low_threshold(), config.high_threshold());
    Ok(EdgeMask {
        size,
        data: dilate(&linked, size, DILATE_RADIUS),
    })
}

// reflect-101 border: ... 2 1 | 0 1 2 ... n-1 | n-2 n-3 ...
fn reflect101(i: isize, n: usize) -> usize {
    if n == 1 {
        return 0;
    }
    let n = n as isize;
    let mut i = i;
    while i < 0 || i >= n {
        i = if i < 0 { -i } else { 2 * (n - 1) - i };
    }
    i as usize
}

fn gaussian5(src: &[u8], size: Vec2<usize>) -> Vec<u8> {
    let (w, h) = (size.x, size.y);

    let mut horizontal = vec![0u32; w * h];
    for y in 0..h {
        let row = &src[y * w..(y + 1) * w];
        for x in 0..w {
            horizontal[y * w + x] = GAUSS5
                .iter()
                .enumerate()
                .map(|(k, &weight)| weight * row[reflect101(x as isize + k as isize - 2, w)] as u32)
                .sum();
        }
    }

    let mut out = vec![0u8; w * h];
    for y in 0..h {
        for x in 0..w {
            let sum: u32 = GAUSS5
                .iter()
                .enumerate()
                .map(|(k, &weight)| {
                    weight * horizontal[reflect101(y as isize + k as isize - 2, h) * w + x]
                })
                .sum();
            out[y * w + x] = ((sum + 128) >> 8) as u8;
        }
    }
    out
}

fn sobel(src: &[u8], size: Vec2<usize>) -> (Vec<i32>, Vec<i32>) {
    let (w, h) = (size.x, size.y);
    let mut gx = vec![0i32; w * h];
    let mut gy = vec![0i32; w * h];
    let at = |x: usize, y: usize| src[y * w + x] as i32;

    for y in 0..h {
        let ym1 = y.saturating_sub(1);
        let yp1 = (y + 1).min(h - 1);
        for x in 0..w {
            let xm1 = x.saturating_sub(1);
            let xp1 = (x + 1).min(w - 1);

            let p00 = at(xm1, ym1);
            let p01 = at(x, ym1);
            let p02 = at(xp1, ym1);
            let p10 = at(xm1, y);
            let p12 = at(xp1, y);
            let p20 = at(xm1, yp1);
            let p21 = at(x, yp1);
            let p22 = at(xp1, yp1);

            gx[y * w + x] = (p02 + 2 * p12 + p22) - (p00 + 2 * p10 + p20);
            gy[y * w + x] = (p20 + 2 * p21 + p22) - (p00 + 2 * p01 + p02);
        }
    }
    (gx, gy)
}

// Keep a pixel only if it is a ridge across the gradient direction. The
// comparison is strict on one side so flat plateaus keep exactly one pixel.
fn non_max_suppression(mag: &[i32], gx: &[i32], gy: &[i32], size: Vec2<usize>) -> Vec<i32> {
    let (w, h) = (size.x, size.y);
    let mut out = vec![0i32; w * h];
    if w < 3 || h < 3 {
        return out;
    }

    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let idx = y * w + x;
            let m = mag[idx];
            if m == 0 {
                continue;
            }

            let ax = gx[idx].abs() as i64;
            let ay = (gy[idx].abs() as i64) << 15;
            let (before, after) = if ay <= ax * TAN22_5_Q15 {
                (idx - 1, idx + 1)
            } else if ay >= ax * TAN67_5_Q15 {
                (idx - w, idx + w)
            } else if (gx[idx] < 0) == (gy[idx] < 0) {
                (idx - w - 1, idx + w + 1)
            } else {
                (idx - w + 1, idx + w - 1)
            };

            if m > mag[before] && m >= mag[after] {
                out[idx] = m;
            }
        }
    }
    out
}

fn hysteresis(thin: &[i32], size: Vec2<usize>, low: i32, high: i32) -> Vec<u8> {
    let (w, h) = (size.x, size.y);
    let mut out = vec![0u8; w * h];
    let mut stack = Vec::new();

    for (idx, &m) in thin.iter().enumerate() {
        if m > high {
            out[idx] = EDGE;
            stack.push(idx);
        }
    }

    // grow strong edges through 8-connected weak candidates
    while let Some(idx) = stack.pop() {
        let (x, y) = (idx % w, idx / w);
        for ny in y.saturating_sub(1)..=(y + 1).min(h - 1) {
            for nx in x.saturating_sub(1)..=(x + 1).min(w - 1) {
                let nidx = ny * w + nx;
                if out[nidx] == 0 && thin[nidx] > low {
                    out[nidx] = EDGE;
                    stack.push(nidx);
                }
            }
        }
    }
    out
}

// Square dilation as a separable max filter; pixels outside the image are
// ignored.
fn dilate(src: &[u8], size: Vec2<usize>, radius: usize) -> Vec<u8> {
    let (w, h) = (size.x, size.y);

    let mut rows = vec![0u8; w * h];
    for y in 0..h {
        for x in 0..w {
            let lo = x.saturating_sub(radius);
            let hi = (x + radius).min(w - 1);
            rows[y * w + x] = src[y * w + lo..=y * w + hi]
                .iter()
                .copied()
                .max()
                .unwrap_or(0);
        }
    }

    let mut out = vec![0u8; w * h];
    for y in 0..h {
        let lo = y.saturating_sub(radius);
        let hi = (y + radius).min(h - 1);
        for x in 0..w {
            out[y * w + x] = (lo..=hi).map(|ny| rows[ny * w + x]).max().unwrap_or(0);
        }
    }
    out
}
