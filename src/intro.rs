//! The flashing intro screen.

use tracing::info;

use crate::config::Config;
use crate::flash::{FlashOutcome, FlashTimer, SystemClock};
use crate::window::Display;

/// Flashes the display until the configured duration elapses, or until the
/// window is closed or Escape is pressed.
pub fn show(display: &mut Display, config: &Config) -> anyhow::Result<FlashOutcome> {
    display.set_title(&config.window.flash_title);

    let timer = FlashTimer::from_config(&config.flash)?;
    info!(duration = ?timer.duration(), "intro started");
    let mut clock = SystemClock::new();
    let outcome = timer.run(&mut clock, |phase| {
        if display.poll_events().iter().any(|e| e.is_interrupt()) {
            return Ok(false);
        }
        display.fill(config.flash.color(phase))?;
        Ok(true)
    })?;

    info!(?outcome, "intro finished");
    Ok(outcome)
}
