//! GPU side of the display: device setup, surface configuration and the
//! quad pipeline used for the message screen.

mod core;
mod quad;
mod render;

pub use core::Graphics;
pub use quad::QuadDraw;
pub use render::FrameStatus;
