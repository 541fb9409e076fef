use std::time::Duration;

use crate::color::Color;
use crate::flash::Phase;

/// Everything the intro and the message screen need to know.
///
/// Built once in `main` and passed by reference; nothing reads
/// configuration from globals.
#[derive(Debug, Clone)]
pub struct Config {
    pub message: String,
    pub text_color: Color,
    pub background: Color,
    /// Font family looked up among the system fonts, e.g. `"segoeui"`.
    pub font_family: String,
    pub font_size: f32,
    /// Image shown above the message. The one-shot fetch is opt-in: the
    /// default is `None`, which skips the download.
    pub image_url: Option<String>,
    pub image_width: u32,
    pub fetch_timeout: Duration,
    pub flash: FlashConfig,
    /// Frame cap for the message screen.
    pub frame_rate: u32,
    /// Total horizontal space kept free around the wrapped text.
    pub text_margin: f32,
    /// Vertical gap between the image bottom and the first text line.
    pub image_gap: f32,
    pub window: WindowSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            message: "Hello there! This message stays on screen until you press any key or click anywhere."
                .to_string(),
            text_color: Color::BLACK,
            background: Color::WHITE,
            font_family: "segoeui".to_string(),
            font_size: 64.0,
            image_url: None,
            image_width: 300,
            fetch_timeout: Duration::from_secs(10),
            flash: FlashConfig::default(),
            frame_rate: 60,
            text_margin: 100.0,
            image_gap: 40.0,
            window: WindowSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FlashConfig {
    pub duration: Duration,
    pub half_period: Duration,
    pub color_a: Color,
    pub color_b: Color,
    pub poll_rate: u32,
}

impl FlashConfig {
    pub fn color(&self, phase: Phase) -> Color {
        match phase {
            Phase::A => self.color_a,
            Phase::B => self.color_b,
        }
    }
}

impl Default for FlashConfig {
    fn default() -> Self {
        Self {
            duration: Duration::from_secs(5),
            half_period: Duration::from_millis(500),
            color_a: Color::RED,
            color_b: Color::BLUE,
            poll_rate: 60,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WindowSettings {
    pub flash_title: String,
    pub message_title: String,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            flash_title: "Loading...".to_string(),
            message_title: "Message".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flash_colors_follow_phase() {
        let flash = FlashConfig::default();
        assert_eq!(flash.color(Phase::A), Color::RED);
        assert_eq!(flash.color(Phase::B), Color::BLUE);
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.flash.duration, Duration::from_secs(5));
        assert_eq!(config.flash.half_period, Duration::from_millis(500));
        assert_eq!(config.fetch_timeout, Duration::from_secs(10));
        assert_eq!(config.image_width, 300);
        assert!(config.image_url.is_none());
        assert!(!config.message.trim().is_empty());
    }
}
