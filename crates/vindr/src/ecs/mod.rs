//! # Entity Graph
//!
//! A tree of entities, each owning an ordered, kind-indexed set of boxed
//! components. Unlike an archetype ECS, components here are trait objects
//! with behaviour of their own; systems find them through capability
//! accessors probed once per component.
//!
//! ## Module Overview
//!
//! - [`entity`] — Generational handles and the arena behind them
//! - [`component`] — The `Component` trait, capability traits, contexts
//! - [`world`] — The graph, its lifecycle, and dispatch plumbing
//! - [`hierarchy`] — `Transform` and position/angle resolution

pub mod component;
pub mod entity;
pub mod hierarchy;
pub mod world;

pub use component::{
    Behavior, Capabilities, Component, Context, DrawContext, Drawable, KeyboardListener,
    MouseClickListener, MouseHoverListener, Updatable,
};
pub use entity::{ComponentId, Entity};
pub use hierarchy::Transform;
pub use world::World;
