//! The rendering collaborator.
//!
//! Window/surface creation and the actual draw calls live outside this crate.
//! The runtime only needs the handful of operations below; a wgpu, SDL or
//! software backend implements [`Renderer`] and hands it to the
//! [`Engine`](crate::engine::Engine).

use std::path::Path;

use crate::math::{Color, Rect, Vec2};

/// Opaque texture identifier issued by a [`Renderer`] or font backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

/// A texture handle plus its pixel dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Texture {
    pub handle: TextureHandle,
    pub width: u32,
    pub height: u32,
}

pub trait Renderer {
    /// Load an image file as a texture. `None` if it cannot be loaded.
    fn create_texture(&mut self, path: &Path) -> Option<Texture>;

    /// Draw `texture` stretched over `dest`, rotated by `angle` degrees
    /// around `pivot` (relative to the top-left corner of `dest`).
    fn draw_textured_rect(&mut self, texture: TextureHandle, dest: Rect, angle: f32, pivot: Vec2);

    fn clear(&mut self, color: Color);

    fn present(&mut self);
}
