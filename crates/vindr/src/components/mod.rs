//! Built-in component kinds.
//!
//! | Kind | Capabilities | Notes |
//! |---|---|---|
//! | [`MouseBox`] | none | hit region read by the mouse systems |
//! | [`Sprite`] | draw | textured quad, layer −5 by default |
//! | [`Label`] | draw | rendered text, layer 1 |
//! | [`Button`] | click, hover | toggles three child sprite faces |
//! | [`FpsCounter`] | update | rewrites a child label |
//! | [`Script`] | chosen at construction | closure message hook |
//!
//! [`Transform`](crate::ecs::Transform) and
//! [`PhysicsBody`](crate::physics::PhysicsBody) live next to the code that
//! resolves them.

pub mod button;
pub mod fps;
pub mod label;
pub mod mouse_box;
pub mod script;
pub mod sprite;

pub use button::{Button, ButtonSpec};
pub use fps::FpsCounter;
pub use label::Label;
pub use mouse_box::{HoverState, MouseBox};
pub use script::{Script, ScriptEvent};
pub use sprite::Sprite;
