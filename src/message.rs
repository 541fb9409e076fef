//! The static message screen shown after the intro.

use tracing::{debug, info, warn};

use crate::color::Color;
use crate::config::Config;
use crate::fetch;
use crate::flash::{Clock as _, SystemClock, frame_interval, pace};
use image::RgbaImage;

use crate::graphics::{Graphics, QuadDraw};
use crate::layout::{self, Layout};
use crate::text::FontFace;
use crate::texture::Texture;
use crate::window::Display;
use crate::wrap::wrap_text;

/// Wrapped message lines, rasterized for one surface width.
struct TextBlock {
    width: u32,
    lines: Vec<Texture>,
    line_height: f32,
}

impl TextBlock {
    fn build(graphics: &Graphics, font: &FontFace, config: &Config, width: u32) -> anyhow::Result<Self> {
        let max_width = layout::max_text_width(width, config.text_margin);
        let lines = wrap_text(&config.message, |s| font.measure(s), max_width)?;
        debug!(width, max_width, lines = lines.len(), "message wrapped");

        let max = graphics.max_texture_dimension();
        let lines = lines
            .iter()
            .map(|line| Texture::from_image(graphics, &fit_texture_limit(font.rasterize(line), max)))
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(Self {
            width,
            lines,
            line_height: font.line_height(),
        })
    }

    fn line_sizes(&self) -> Vec<(f32, f32)> {
        self.lines
            .iter()
            .map(|t| (t.width as f32, t.height as f32))
            .collect()
    }
}

/// Crops a rasterized line that is larger than the device can hold.
fn fit_texture_limit(image: RgbaImage, max: u32) -> RgbaImage {
    if image.width() <= max && image.height() <= max {
        return image;
    }
    warn!(
        width = image.width(),
        height = image.height(),
        max,
        "line too large for a texture, cropping"
    );
    image::imageops::crop_imm(&image, 0, 0, image.width().min(max), image.height().min(max)).to_image()
}

fn load_font(config: &Config) -> Option<FontFace> {
    match FontFace::load(&config.font_family, config.font_size) {
        Ok(font) => {
            debug!(family = font.family(), size = config.font_size, "message font ready");
            Some(font)
        }
        Err(e) => {
            warn!("message will be shown without text: {e:#}");
            None
        }
    }
}

fn upload_image(graphics: &Graphics, config: &Config) -> Option<Texture> {
    let image = fetch::load_image(config)?;
    match Texture::from_image(graphics, &image) {
        Ok(texture) => Some(texture),
        Err(e) => {
            warn!("could not upload image: {e:#}");
            None
        }
    }
}

/// Shows the message until any key press, mouse click or close request.
pub fn show(display: &mut Display, config: &Config) -> anyhow::Result<()> {
    display.set_title(&config.window.message_title);

    let font = load_font(config);
    let image = upload_image(display.graphics()?, config);
    let mut text: Option<TextBlock> = None;

    let interval = frame_interval(config.frame_rate);
    let mut clock = SystemClock::new();

    loop {
        let frame_start = clock.now();

        let events = display.poll_events();
        if let Some(event) = events.first() {
            info!(?event, "message dismissed");
            return Ok(());
        }

        let (width, height) = display.size();
        if let Some(font) = font.as_ref() {
            if text.as_ref().is_none_or(|t| t.width != width) {
                text = Some(TextBlock::build(display.graphics()?, font, config, width)?);
            }
        }

        let line_sizes = text.as_ref().map(TextBlock::line_sizes).unwrap_or_default();
        let line_height = text.as_ref().map_or(0.0, |t| t.line_height);
        let Layout { image: image_rect, lines } = layout::compose(
            (width, height),
            image.as_ref().map(Texture::size),
            &line_sizes,
            line_height,
            config.image_gap,
        );

        let mut draws = Vec::with_capacity(lines.len() + 1);
        if let (Some(texture), Some(rect)) = (image.as_ref(), image_rect) {
            draws.push(QuadDraw {
                texture,
                rect,
                tint: Color::WHITE,
            });
        }
        if let Some(block) = text.as_ref() {
            draws.extend(block.lines.iter().zip(lines).map(|(texture, rect)| QuadDraw {
                texture,
                rect,
                tint: config.text_color,
            }));
        }

        display.draw(config.background, &draws)?;
        pace(&mut clock, frame_start, interval);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_fit_texture_limit_keeps_small_lines() {
        let image = RgbaImage::from_pixel(30, 10, Rgba([255, 255, 255, 7]));
        let fitted = fit_texture_limit(image.clone(), 30);
        assert_eq!(fitted, image);
    }

    #[test]
    fn test_fit_texture_limit_crops_oversized_line() {
        let mut image = RgbaImage::from_pixel(50, 12, Rgba([255, 255, 255, 0]));
        image.put_pixel(3, 4, Rgba([255, 255, 255, 200]));

        let fitted = fit_texture_limit(image, 16);
        assert_eq!(fitted.dimensions(), (16, 12));
        assert_eq!(fitted.get_pixel(3, 4)[3], 200);
    }

    #[test]
    fn test_fit_texture_limit_crops_both_axes() {
        let image = RgbaImage::new(40, 40);
        assert_eq!(fit_texture_limit(image, 8).dimensions(), (8, 8));
    }
}
