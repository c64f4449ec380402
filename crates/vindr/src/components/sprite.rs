use crate::ecs::component::{Component, DrawContext, Drawable};
use crate::ecs::world::World;
use crate::math::{Rect, Vec2};
use crate::render::Texture;

/// A textured quad drawn centered on the owner's resolved screen position,
/// rotated by the resolved angle around its center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub texture: Texture,
    pub width: f32,
    pub height: f32,
    layer: i32,
}

impl Sprite {
    pub const KIND: &'static str = "Sprite";
    pub const DEFAULT_LAYER: i32 = -5;

    /// A sprite the size of its texture.
    pub fn new(texture: Texture) -> Self {
        Self {
            texture,
            width: texture.width as f32,
            height: texture.height as f32,
            layer: Self::DEFAULT_LAYER,
        }
    }

    /// Look up a named texture. Non-positive sizes fall back to the
    /// texture's own dimensions. `None` (with a warning) if the name is
    /// unknown.
    pub fn from_texture(world: &World, name: &str, width: f32, height: f32) -> Option<Self> {
        let texture = world.texture(name)?;
        Some(Self::new(texture).size(width, height))
    }

    pub fn size(mut self, width: f32, height: f32) -> Self {
        if width > 0.0 {
            self.width = width;
        }
        if height > 0.0 {
            self.height = height;
        }
        self
    }

    /// Set the draw layer. Must be set before the sprite is registered.
    pub fn with_layer(mut self, layer: i32) -> Self {
        self.layer = layer;
        self
    }
}

impl Component for Sprite {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn as_drawable(&mut self) -> Option<&mut dyn Drawable> {
        Some(self)
    }
}

impl Drawable for Sprite {
    fn layer(&self) -> i32 {
        self.layer
    }

    fn draw(&mut self, ctx: &mut DrawContext<'_>) {
        let Some(center) = ctx.screen_position() else {
            return;
        };
        let angle = ctx.angle().unwrap_or(0.0);
        let dest = Rect::from_center(center, self.width, self.height);
        let pivot = Vec2::new(self.width / 2.0, self.height / 2.0);
        ctx.renderer
            .draw_textured_rect(self.texture.handle, dest, angle, pivot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::TextureHandle;
    use crate::systems::DrawSystem;
    use crate::testing::RecordingRenderer;

    fn texture() -> Texture {
        Texture {
            handle: TextureHandle(9),
            width: 40,
            height: 20,
        }
    }

    #[test]
    fn size_defaults_to_texture() {
        let sprite = Sprite::new(texture()).size(0.0, 50.0);
        assert_eq!((sprite.width, sprite.height), (40.0, 50.0));
        assert_eq!(Drawable::layer(&sprite), -5);
    }

    #[test]
    fn missing_texture_yields_none() {
        let world = World::new();
        assert!(Sprite::from_texture(&world, "nope", 0.0, 0.0).is_none());
    }

    #[test]
    fn draws_centered_and_rotated() {
        let mut world = World::new();
        let e = world.spawn();
        world.add_component(e, crate::ecs::Transform::from_xy(100.0, 100.0).with_angle(45.0));
        world.add_component(e, Sprite::new(texture()));
        world.add_entity(e);
        world.set_camera(Vec2::new(10.0, 0.0));

        let mut renderer = RecordingRenderer::new();
        DrawSystem::run(&mut world, &mut renderer);

        let draws = renderer.draws();
        assert_eq!(draws.len(), 1);
        let (handle, dest, angle, pivot) = draws[0];
        assert_eq!(handle, TextureHandle(9));
        assert_eq!(dest, Rect::new(70.0, 90.0, 40.0, 20.0));
        assert_eq!(angle, 45.0);
        assert_eq!(pivot, Vec2::new(20.0, 10.0));
    }
}
