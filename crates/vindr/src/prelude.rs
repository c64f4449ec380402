//! Convenience re-exports: `use vindr::prelude::*` for the common items.

pub use crate::assets::{AssetKind, Assets};
pub use crate::audio::{AudioBackend, SoundHandle};
#[cfg(feature = "audio")]
pub use crate::audio::KiraAudio;
pub use crate::components::{
    Button, ButtonSpec, FpsCounter, HoverState, Label, MouseBox, Script, ScriptEvent, Sprite,
};
pub use crate::config::EngineConfig;
pub use crate::ecs::{
    Behavior, Capabilities, Component, ComponentId, Context, DrawContext, Drawable, Entity,
    KeyboardListener, MouseClickListener, MouseHoverListener, Transform, Updatable, World,
};
pub use crate::engine::{Engine, StopHandle};
pub use crate::error::{AssetError, ConfigError, EngineError};
pub use crate::input::{
    EventQueue, EventSource, InputEvent, KeyCode, MouseButton, MouseButtonEvent, WinitInput,
};
pub use crate::logging::{LoggingConfig, init_logging};
pub use crate::math::{Color, Rect, Vec2};
pub use crate::physics::{
    BodyDesc, BodyHandle, CollisionEvent, CollisionListener, CollisionPhase, PhysicsBody,
    PhysicsWorld,
};
#[cfg(feature = "physics2d")]
pub use crate::physics2d::RapierPhysics;
pub use crate::render::{Renderer, Texture, TextureHandle};
pub use crate::text::{FontBackend, FontHandle, RenderedText};
pub use crate::time::Time;
