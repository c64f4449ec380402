//! The font collaborator.
//!
//! Rendering text produces a texture the [`Renderer`](crate::render::Renderer)
//! can draw; glyph rasterization itself lives outside this crate.

use std::path::Path;

use crate::math::Color;
use crate::render::{Texture, TextureHandle};

/// Opaque font identifier issued by a [`FontBackend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontHandle(pub u32);

/// A rendered string: the texture holding it and its size in pixels.
pub type RenderedText = Texture;

pub trait FontBackend {
    /// Open a font file at a pixel size, optionally outlined.
    fn load_font(&mut self, path: &Path, size: u32, outline: u32) -> Option<FontHandle>;

    fn render_text(&mut self, font: FontHandle, text: &str, color: Color) -> Option<RenderedText>;

    /// Render `text` in `color` over an outline drawn with `outline` (a font
    /// loaded with a non-zero outline width). Backends without outline support
    /// render plain text.
    fn render_outlined_text(
        &mut self,
        font: FontHandle,
        _outline: FontHandle,
        text: &str,
        color: Color,
        _outline_color: Color,
    ) -> Option<RenderedText> {
        self.render_text(font, text, color)
    }

    /// Release a texture previously returned by [`render_text`](Self::render_text).
    fn release_text(&mut self, _texture: TextureHandle) {}
}
