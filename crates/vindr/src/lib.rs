//! # Vindr — 2D Entity Runtime
//!
//! A small 2D game runtime: a tree of entities carrying boxed components,
//! five capability-driven dispatch systems (draw, update, mouse click, mouse
//! hover, keyboard), hierarchical transforms that physics bodies can take
//! over, and a fixed-order frame loop.
//!
//! Rendering, audio, fonts and physics are collaborators behind traits; the
//! runtime never talks to a window or device directly.
//!
//! Start with `use vindr::prelude::*` and build an [`Engine`](engine::Engine).

pub mod assets;
pub mod audio;
pub mod components;
pub mod config;
pub mod ecs;
pub mod engine;
pub mod error;
pub mod input;
pub mod logging;
pub mod math;
pub mod physics;
pub mod prelude;
pub mod render;
pub mod systems;
pub mod text;
pub mod time;

#[cfg(feature = "physics2d")]
pub mod physics2d;

#[cfg(test)]
pub(crate) mod testing;
