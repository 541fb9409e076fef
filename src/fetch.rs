//! One-shot download of the image shown above the message.

use std::time::Duration;

use anyhow::Context as _;
use image::RgbaImage;
use image::imageops::FilterType;
use tracing::{info, warn};

use crate::config::Config;

/// Downloads `url` and decodes the body into an RGBA8 buffer.
pub fn fetch_and_decode(url: &str, timeout: Duration) -> anyhow::Result<RgbaImage> {
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .context("failed to build http client")?;

    let response = client
        .get(url)
        .send()
        .with_context(|| format!("request to {url} failed"))?
        .error_for_status()?;
    let bytes = response.bytes().context("failed to read response body")?;

    decode_image(&bytes)
}

pub fn decode_image(bytes: &[u8]) -> anyhow::Result<RgbaImage> {
    let decoded = image::load_from_memory(bytes).context("failed to decode image")?;
    Ok(decoded.to_rgba8())
}

/// Height that keeps the aspect ratio of a `width` x `height` image scaled to
/// `target_width`, rounded down and never zero.
pub fn scaled_height(width: u32, height: u32, target_width: u32) -> u32 {
    if width == 0 {
        return height.max(1);
    }
    let h = (target_width as u64 * height as u64) / width as u64;
    h.clamp(1, u32::MAX as u64) as u32
}

pub fn resize_to_width(image: &RgbaImage, target_width: u32) -> RgbaImage {
    let target_width = target_width.max(1);
    let (w, h) = image.dimensions();
    let target_height = scaled_height(w, h, target_width);
    image::imageops::resize(image, target_width, target_height, FilterType::Lanczos3)
}

/// Fetches and resizes the configured image.
///
/// Any failure is logged and yields `None`; the message screen is shown
/// without an image in that case.
pub fn load_image(config: &Config) -> Option<RgbaImage> {
    let url = config.image_url.as_deref()?;
    match fetch_and_decode(url, config.fetch_timeout) {
        Ok(image) => {
            let resized = resize_to_width(&image, config.image_width);
            info!(
                url,
                original = ?image.dimensions(),
                resized = ?resized.dimensions(),
                "image loaded"
            );
            Some(resized)
        }
        Err(e) => {
            warn!(url, "could not load image: {e:#}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_decode_png() {
        let img = decode_image(&png_bytes(4, 2)).unwrap();
        assert_eq!(img.dimensions(), (4, 2));
        assert_eq!(img.get_pixel(3, 1), &Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(decode_image(b"definitely not an image").is_err());
    }

    #[test]
    fn test_scaled_height_keeps_aspect_ratio() {
        assert_eq!(scaled_height(600, 400, 300), 200);
        assert_eq!(scaled_height(400, 600, 300), 450);
        // Rounds down like an integer cast.
        assert_eq!(scaled_height(7, 3, 5), 2);
        assert_eq!(scaled_height(1000, 1, 300), 1);
    }

    #[test]
    fn test_resize_to_width() {
        let img = decode_image(&png_bytes(40, 20)).unwrap();
        let resized = resize_to_width(&img, 10);
        assert_eq!(resized.dimensions(), (10, 5));
    }

    #[test]
    fn test_invalid_url_fails_without_network() {
        assert!(fetch_and_decode("not a url", Duration::from_secs(1)).is_err());
    }

    #[test]
    fn test_no_url_means_no_image() {
        let config = Config {
            image_url: None,
            ..Config::default()
        };
        assert!(load_image(&config).is_none());
    }

    #[test]
    fn test_failed_fetch_degrades_to_none() {
        let config = Config {
            image_url: Some("::invalid::".to_string()),
            ..Config::default()
        };
        assert!(load_image(&config).is_none());
    }
}
