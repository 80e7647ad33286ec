use {
    crate::*,
    base::Vec2,
    crates_image::{ExtendedColorType, ImageEncoder, codecs::jpeg::JpegEncoder},
    std::sync::Arc,
};

/// Encode an `Rgb8` or `Gray8` image as JPEG.
pub fn encode_jpeg_blocking(image: &Image, quality: u8) -> Result<Vec<u8>, ImageError> {
    image.validate()?;
    let color_type = match image.format {
        PixelFormat::Rgb8 => ExtendedColorType::Rgb8,
        PixelFormat::Gray8 => ExtendedColorType::L8,
        other => {
            return Err(ImageError::Encode(format!(
                "cannot encode {other:?} as JPEG"
            )));
        }
    };

    let mut buffer = Vec::new();
    JpegEncoder::new_with_quality(&mut buffer, quality)
        .write_image(
            &image.data,
            image.size.x as u32,
            image.size.y as u32,
            color_type,
        )
        .map_err(|e| ImageError::Encode(e.to_string()))?;
    Ok(buffer)
}

/// Encode on tokio's blocking pool so request handlers stay responsive.
pub async fn encode_jpeg(image: Arc<Image>, quality: u8) -> Result<Vec<u8>, ImageError> {
    tokio::task::spawn_blocking(move || encode_jpeg_blocking(&image, quality))
        .await
        .map_err(|e| ImageError::Encode(e.to_string()))?
}

/// Decode a JPEG/PNG/BMP file image into `Rgb8`.
pub fn decode_rgb(data: &[u8]) -> Result<Image, ImageError> {
    let rgb = crates_image::load_from_memory(data)?.to_rgb8();
    let (width, height) = rgb.dimensions();
    Image::try_new(
        Vec2::new(width as usize, height as usize),
        rgb.into_raw(),
        PixelFormat::Rgb8,
    )
}
