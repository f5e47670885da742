use std::io::Cursor;

use anyhow::Context;
use bytes::Bytes;
use image::ImageFormat;

/// Decodes any supported image and re-encodes it as PNG.
pub fn normalize_to_png(bytes: &[u8]) -> anyhow::Result<Vec<u8>> {
    let img = image::load_from_memory(bytes).context("decode image")?;
    let mut out = Cursor::new(Vec::with_capacity(bytes.len()));
    img.write_to(&mut out, ImageFormat::Png)
        .context("encode png")?;
    Ok(out.into_inner())
}

pub async fn normalize_to_png_blocking(bytes: Bytes) -> anyhow::Result<Vec<u8>> {
    tokio::task::spawn_blocking(move || normalize_to_png(&bytes)).await?
}

#[cfg(test)]
pub(crate) fn sample_image(format: ImageFormat) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(4, 3, image::Rgba([200, 10, 10, 255]));
    let img = match format {
        ImageFormat::Jpeg => image::DynamicImage::ImageRgb8(
            image::DynamicImage::ImageRgba8(img).to_rgb8(),
        ),
        _ => image::DynamicImage::ImageRgba8(img),
    };
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, format).expect("encode sample image");
    out.into_inner()
}
