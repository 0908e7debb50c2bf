//! Translation of winit window events into pointer events

use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton, WindowEvent};

use crate::picking::PointerEvent;

/// Pointer event kinds relevant to picking
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerAction {
    Down(PointerEvent),
    Move(PointerEvent),
    Up(PointerEvent),
}

/// Bitmask bit for a mouse button
pub fn button_mask(button: MouseButton) -> u16 {
    match button {
        MouseButton::Left => 1,
        MouseButton::Right => 2,
        MouseButton::Middle => 4,
        MouseButton::Back => 8,
        MouseButton::Forward => 16,
        MouseButton::Other(_) => 0,
    }
}

/// Tracks cursor position and held buttons across window events
#[derive(Debug, Clone, Default)]
pub struct PointerInput {
    position: PhysicalPosition<f64>,
    buttons: u16,
}

impl PointerInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buttons currently held
    pub fn buttons(&self) -> u16 {
        self.buttons
    }

    pub fn position(&self) -> PhysicalPosition<f64> {
        self.position
    }

    fn event(&self) -> PointerEvent {
        PointerEvent::new(self.position.x as f32, self.position.y as f32, self.buttons)
    }

    pub fn cursor_moved(&mut self, position: PhysicalPosition<f64>) -> PointerAction {
        self.position = position;
        PointerAction::Move(self.event())
    }

    /// A press reports the buttons including the new one; a release reports
    /// the buttons still held afterwards.
    pub fn mouse_input(&mut self, state: ElementState, button: MouseButton) -> PointerAction {
        let mask = button_mask(button);
        match state {
            ElementState::Pressed => {
                self.buttons |= mask;
                PointerAction::Down(self.event())
            }
            ElementState::Released => {
                self.buttons &= !mask;
                PointerAction::Up(self.event())
            }
        }
    }

    /// Feed a window event; returns the pointer action it produced, if any
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> Option<PointerAction> {
        match event {
            WindowEvent::CursorMoved { position, .. } => Some(self.cursor_moved(*position)),
            WindowEvent::MouseInput { state, button, .. } => {
                Some(self.mouse_input(*state, *button))
            }
            _ => None,
        }
    }
}
