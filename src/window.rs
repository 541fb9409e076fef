use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, anyhow, bail};
use tracing::{debug, info};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Fullscreen, Window, WindowId};

use crate::color::Color;
use crate::graphics::{FrameStatus, Graphics, QuadDraw};
use crate::input::{self, DisplayEvent};
use crate::platform::block_on;

/// How long `Display::open` waits per pump while the window comes up.
const OPEN_PUMP_TIMEOUT: Duration = Duration::from_millis(10);

struct App {
    title: String,
    instance: wgpu::Instance,
    window: Option<Arc<Window>>,
    surface: Option<wgpu::Surface<'static>>,
    graphics: Option<Graphics>,
    init_error: Option<anyhow::Error>,
    events: Vec<DisplayEvent>,
}

impl App {
    fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            instance: wgpu::Instance::default(),
            window: None,
            surface: None,
            graphics: None,
            init_error: None,
            events: Vec::new(),
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let attributes = Window::default_attributes()
            .with_title(self.title.clone())
            .with_fullscreen(Some(Fullscreen::Borderless(None)));
        let window = Arc::new(
            event_loop
                .create_window(attributes)
                .context("failed to create window")?,
        );
        let size = window.inner_size();

        let surface = self
            .instance
            .create_surface(window.clone())
            .context("failed to create surface")?;
        let graphics = block_on(Graphics::new(&self.instance, &surface, size.width, size.height))?;

        self.window = Some(window);
        self.surface = Some(surface);
        self.graphics = Some(graphics);
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.graphics.is_some() && self.surface.is_some()
    }

    /// Drops GPU state before the window it renders into.
    fn release(&mut self) {
        self.graphics.take();
        self.surface.take();
        if self.window.take().is_some() {
            debug!("display released");
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            self.init_error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let WindowEvent::Resized(new_size) = event {
            if let (Some(surface), Some(graphics)) = (self.surface.as_ref(), self.graphics.as_mut()) {
                graphics.resize(surface, new_size.width, new_size.height);
            }
        }
        if let Some(e) = input::translate(&event) {
            self.events.push(e);
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.release();
    }
}

/// The fullscreen window and its GPU surface.
///
/// Events are pumped on demand rather than by a run loop, so callers keep
/// control of their own frame loop. Dropping the display releases the
/// surface and closes the window on every exit path.
pub struct Display {
    event_loop: EventLoop<()>,
    app: App,
}

impl Display {
    pub fn open(title: &str) -> anyhow::Result<Self> {
        let event_loop = EventLoop::new().context("failed to create event loop")?;
        let mut display = Self {
            event_loop,
            app: App::new(title),
        };

        while !display.app.is_ready() {
            let status = display
                .event_loop
                .pump_app_events(Some(OPEN_PUMP_TIMEOUT), &mut display.app);
            if let Some(e) = display.app.init_error.take() {
                return Err(e);
            }
            if let PumpStatus::Exit(code) = status {
                bail!("event loop exited with code {code} before the display opened");
            }
        }

        let (width, height) = display.size();
        info!(width, height, "display opened");
        Ok(display)
    }

    /// Drains pending window events without blocking.
    pub fn poll_events(&mut self) -> Vec<DisplayEvent> {
        let status = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.app);
        if let PumpStatus::Exit(_) = status {
            self.app.events.push(DisplayEvent::Quit);
        }
        std::mem::take(&mut self.app.events)
    }

    pub fn size(&self) -> (u32, u32) {
        self.app.graphics.as_ref().map(Graphics::size).unwrap_or((0, 0))
    }

    pub fn set_title(&self, title: &str) {
        if let Some(window) = self.app.window.as_ref() {
            window.set_title(title);
        }
    }

    pub fn graphics(&self) -> anyhow::Result<&Graphics> {
        self.app
            .graphics
            .as_ref()
            .ok_or_else(|| anyhow!("display already released"))
    }

    /// Fills the whole surface with `color` and presents it.
    pub fn fill(&mut self, color: Color) -> anyhow::Result<FrameStatus> {
        let (Some(surface), Some(graphics)) = (self.app.surface.as_ref(), self.app.graphics.as_mut()) else {
            bail!("display already released");
        };
        graphics.fill(surface, color)
    }

    /// Clears to `background`, draws the quads and presents.
    pub fn draw(&mut self, background: Color, draws: &[QuadDraw<'_>]) -> anyhow::Result<FrameStatus> {
        let (Some(surface), Some(graphics)) = (self.app.surface.as_ref(), self.app.graphics.as_mut()) else {
            bail!("display already released");
        };
        graphics.draw_frame(surface, background, draws)
    }
}

impl Drop for Display {
    fn drop(&mut self) {
        self.app.release();
    }
}
