//! Input events and their sources.
//!
//! The frame loop drains an [`EventSource`] at the start of every frame and
//! routes each [`InputEvent`] to the click, hover, or keyboard system. Key and
//! button identifiers are winit's, so a winit window can feed the loop
//! through [`WinitInput`] without a mapping table.

use std::collections::VecDeque;

use winit::event::{ElementState, WindowEvent};
use winit::keyboard::PhysicalKey;

pub use winit::event::MouseButton;
pub use winit::keyboard::KeyCode;

use crate::math::Vec2;

/// A mouse button press or release at a screen position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseButtonEvent {
    pub position: Vec2,
    pub button: MouseButton,
}

/// One pending input event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// The window asked to close; the loop stops after this frame.
    Quit,
    MouseMoved(Vec2),
    MouseButton {
        event: MouseButtonEvent,
        pressed: bool,
    },
    Key {
        key: KeyCode,
        pressed: bool,
    },
}

/// Anything the frame loop can poll for pending input.
pub trait EventSource {
    /// Next pending event, or `None` when the queue is drained for this frame.
    fn poll_event(&mut self) -> Option<InputEvent>;
}

/// A FIFO event queue. Bridges push into it; the loop drains it.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<InputEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push_back(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSource for EventQueue {
    fn poll_event(&mut self) -> Option<InputEvent> {
        self.events.pop_front()
    }
}

impl Extend<InputEvent> for EventQueue {
    fn extend<I: IntoIterator<Item = InputEvent>>(&mut self, iter: I) {
        self.events.extend(iter);
    }
}

/// Translates winit window events into [`InputEvent`]s.
///
/// winit's button events carry no position, so the last cursor position seen
/// in `CursorMoved` is tracked here and stamped onto button events.
#[derive(Debug, Default)]
pub struct WinitInput {
    cursor: Vec2,
}

impl WinitInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last known cursor position in window coordinates.
    pub fn cursor(&self) -> Vec2 {
        self.cursor
    }

    /// Returns `None` for events the runtime does not consume.
    pub fn translate(&mut self, event: &WindowEvent) -> Option<InputEvent> {
        match event {
            WindowEvent::CloseRequested => Some(InputEvent::Quit),

            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Vec2::new(position.x as f32, position.y as f32);
                Some(InputEvent::MouseMoved(self.cursor))
            }

            WindowEvent::MouseInput { state, button, .. } => Some(InputEvent::MouseButton {
                event: MouseButtonEvent {
                    position: self.cursor,
                    button: *button,
                },
                pressed: *state == ElementState::Pressed,
            }),

            WindowEvent::KeyboardInput { event, .. } => match event.physical_key {
                PhysicalKey::Code(key) => Some(InputEvent::Key {
                    key,
                    pressed: event.state == ElementState::Pressed,
                }),
                PhysicalKey::Unidentified(_) => None,
            },

            _ => None,
        }
    }

    /// Translate and enqueue in one step.
    pub fn forward(&mut self, event: &WindowEvent, queue: &mut EventQueue) {
        if let Some(input) = self.translate(event) {
            queue.push(input);
        }
    }
}
