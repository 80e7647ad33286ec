use {crate::*, base::Vec2};

pub fn yuyv_to_rgb(size: Vec2<usize>, data: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(size.area() * 3);

    for chunk in data.chunks_exact(4) {
        let (r0, g0, b0) = yuv_to_rgb(chunk[0], chunk[1], chunk[3]);
        let (r1, g1, b1) = yuv_to_rgb(chunk[2], chunk[1], chunk[3]);
        rgb.extend_from_slice(&[r0, g0, b0, r1, g1, b1]);
    }

    rgb
}

pub fn yu12_to_rgb(size: Vec2<usize>, data: &[u8]) -> Vec<u8> {
    let width = size.x;
    let height = size.y;
    let y_len = width * height;
    let uv_w = width / 2;

    let y_plane = &data[..y_len];
    let u_plane = &data[y_len..];
    let v_plane = &data[y_len + uv_w * (height / 2)..];

    let mut rgb = Vec::with_capacity(y_len * 3);

    for row in 0..height {
        for col in 0..width {
            let y = y_plane[row * width + col];
            let u = u_plane[(row / 2) * uv_w + col / 2];
            let v = v_plane[(row / 2) * uv_w + col / 2];
            let (r, g, b) = yuv_to_rgb(y, u, v);
            rgb.extend_from_slice(&[r, g, b]);
        }
    }

    rgb
}

/// BT.601 luma of an RGB buffer, rounded like OpenCV's `RGB2GRAY`.
pub fn rgb_to_gray(data: &[u8]) -> Vec<u8> {
    data.chunks_exact(3)
        .map(|c| ((299 * c[0] as u32 + 587 * c[1] as u32 + 114 * c[2] as u32 + 500) / 1000) as u8)
        .collect()
}

pub fn gray_to_rgb(data: &[u8]) -> Vec<u8> {
    data.iter().flat_map(|&v| [v, v, v]).collect()
}

/// Convert any supported capture format to `Rgb8`.
pub fn to_rgb(image: Image) -> Result<Image, ImageError> {
    image.validate()?;
    let size = image.size;
    let data = match image.format {
        PixelFormat::Rgb8 => return Ok(image),
        PixelFormat::Gray8 => gray_to_rgb(&image.data),
        PixelFormat::Yuyv => yuyv_to_rgb(size, &image.data),
        PixelFormat::Yu12 => yu12_to_rgb(size, &image.data),
    };
    Ok(Image::new(size, data, PixelFormat::Rgb8))
}

/// Convert an `Rgb8` image to single-channel luminance.
pub fn to_gray(image: &Image) -> Result<Image, ImageError> {
    image.format.ensure_format(PixelFormat::Rgb8)?;
    image.validate()?;
    Ok(Image::new(
        image.size,
        rgb_to_gray(&image.data),
        PixelFormat::Gray8,
    ))
}
