//! Flashnote - a fullscreen flashing intro followed by a static message.
//!
//! The program opens one fullscreen window, flashes it between two colors
//! for a few seconds, then shows a wrapped message (and optionally an image
//! downloaded once at startup) until any key or mouse button is pressed.
//!
//! # Example
//! ```no_run
//! let config = flashnote::Config {
//!     message: "Back in five minutes".to_string(),
//!     ..flashnote::Config::default()
//! };
//! flashnote::run(config).unwrap();
//! ```
//!
//! The pieces with logic of their own are usable without a window:
//! ```
//! use flashnote::{wrap_text, phase_at, Phase};
//! use std::time::Duration;
//!
//! let lines = wrap_text("a b c d", |s| s.len() as f32, 3.0).unwrap();
//! assert_eq!(lines, vec!["a b", "c d"]);
//!
//! let half = Duration::from_millis(500);
//! assert_eq!(phase_at(Duration::from_millis(600), half), Phase::B);
//! ```

mod color;
mod config;
mod fetch;
mod flash;
mod graphics;
mod input;
mod intro;
mod layout;
mod message;
pub mod platform;
mod text;
mod texture;
mod window;
mod wrap;

use tracing::info;

pub use color::Color;
pub use config::{Config, FlashConfig, WindowSettings};
pub use fetch::{decode_image, fetch_and_decode, resize_to_width};
pub use flash::{Clock, FlashOutcome, FlashTimer, Phase, SystemClock, phase_at};
pub use graphics::{FrameStatus, Graphics, QuadDraw};
pub use input::{DisplayEvent, Key, MouseButton};
pub use layout::{Layout, Rect, compose};
pub use text::FontFace;
pub use texture::Texture;
pub use window::Display;
pub use wrap::wrap_text;

/// Runs the intro and then the message screen.
///
/// Returns once the user dismisses the message, or right after the intro if
/// it was interrupted. The window is closed on every return path.
pub fn run(config: Config) -> anyhow::Result<()> {
    let mut display = Display::open(&config.window.flash_title)?;

    match intro::show(&mut display, &config)? {
        FlashOutcome::Completed => message::show(&mut display, &config),
        FlashOutcome::Cancelled => {
            info!("intro interrupted, exiting");
            Ok(())
        }
    }
}
