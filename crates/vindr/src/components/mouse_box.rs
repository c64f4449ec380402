use crate::ecs::component::Component;
use crate::math::{Rect, Vec2};

/// Hover state of a [`MouseBox`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HoverState {
    #[default]
    Idle,
    Hovering,
}

/// An axis-aligned hit region centered on the owner's resolved screen
/// position. Mouse systems hit-test against it when the owner also has a
/// [`Transform`](crate::ecs::Transform); without one, listeners on the entity
/// receive every event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseBox {
    pub width: f32,
    pub height: f32,
    pub state: HoverState,
}

impl MouseBox {
    pub const KIND: &'static str = "MouseBox";

    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            state: HoverState::Idle,
        }
    }

    pub fn rect(&self, center: Vec2) -> Rect {
        Rect::from_center(center, self.width, self.height)
    }

    pub fn is_hovering(&self) -> bool {
        self.state == HoverState::Hovering
    }
}

impl Component for MouseBox {
    fn kind(&self) -> &'static str {
        Self::KIND
    }
}
