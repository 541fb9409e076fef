use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    Other,
}

impl Key {
    pub(crate) fn from_physical(key: PhysicalKey) -> Self {
        match key {
            PhysicalKey::Code(KeyCode::Escape) => Key::Escape,
            _ => Key::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
    Other(u16),
}

impl MouseButton {
    pub(crate) fn from_winit(button: winit::event::MouseButton) -> Self {
        use winit::event::MouseButton as W;
        match button {
            W::Left => MouseButton::Left,
            W::Right => MouseButton::Right,
            W::Middle => MouseButton::Middle,
            W::Back => MouseButton::Back,
            W::Forward => MouseButton::Forward,
            W::Other(v) => MouseButton::Other(v),
        }
    }
}

/// Input the display loops react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayEvent {
    /// The window was asked to close.
    Quit,
    KeyDown(Key),
    MouseDown(MouseButton),
}

impl DisplayEvent {
    /// Whether this event stops the flash intro.
    pub fn is_interrupt(&self) -> bool {
        matches!(self, DisplayEvent::Quit | DisplayEvent::KeyDown(Key::Escape))
    }
}

pub(crate) fn translate(event: &WindowEvent) -> Option<DisplayEvent> {
    match event {
        WindowEvent::CloseRequested => Some(DisplayEvent::Quit),
        WindowEvent::KeyboardInput { event, .. } => {
            key_event(event.physical_key, event.state, event.repeat)
        }
        WindowEvent::MouseInput { state, button, .. } => mouse_event(*state, *button),
        _ => None,
    }
}

fn key_event(key: PhysicalKey, state: ElementState, repeat: bool) -> Option<DisplayEvent> {
    (state == ElementState::Pressed && !repeat).then(|| DisplayEvent::KeyDown(Key::from_physical(key)))
}

fn mouse_event(state: ElementState, button: winit::event::MouseButton) -> Option<DisplayEvent> {
    (state == ElementState::Pressed).then(|| DisplayEvent::MouseDown(MouseButton::from_winit(button)))
}
