use crate::ecs::component::{Component, Context, DrawContext, Drawable};
use crate::ecs::entity::Entity;
use crate::ecs::world::World;
use crate::math::{Color, Rect, Vec2};
use crate::text::RenderedText;

/// A line of text rendered through the font collaborator.
///
/// The text is rendered to a texture on `init` and again on every
/// [`set_text`](Label::set_text); the previous texture is released back to
/// the font backend. The owner's resolved screen position is the label's
/// anchor: its top-left corner, or its center along each axis that is
/// centered. Rotation pivots around the anchor.
#[derive(Debug, Clone)]
pub struct Label {
    pub font: String,
    /// Outline font name and color; plain text when `None`.
    pub outline: Option<(String, Color)>,
    pub color: Color,
    pub center_horizontal: bool,
    pub center_vertical: bool,
    text: String,
    rendered: Option<RenderedText>,
}

impl Label {
    pub const KIND: &'static str = "Label";
    pub const LAYER: i32 = 1;

    pub fn new(text: impl Into<String>, font: impl Into<String>) -> Self {
        Self {
            font: font.into(),
            outline: None,
            color: Color::GREY,
            center_horizontal: false,
            center_vertical: false,
            text: text.into(),
            rendered: None,
        }
    }

    /// Center on both axes.
    pub fn centered(mut self, center: bool) -> Self {
        self.center_horizontal = center;
        self.center_vertical = center;
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn outlined(mut self, font: impl Into<String>, color: Color) -> Self {
        self.outline = Some((font.into(), color));
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// The current texture, if rendering has succeeded at least once.
    pub fn rendered(&self) -> Option<RenderedText> {
        self.rendered
    }

    /// Rendered size in pixels, `(0, 0)` before the first render.
    pub fn size(&self) -> (u32, u32) {
        self.rendered.map_or((0, 0), |r| (r.width, r.height))
    }

    /// Re-render with new text. On failure the old texture and text are kept
    /// and `false` is returned.
    pub fn set_text(&mut self, world: &mut World, text: &str) -> bool {
        let rendered = match &self.outline {
            Some((outline, outline_color)) => {
                world.render_outlined_text(&self.font, outline, text, self.color, *outline_color)
            }
            None => world.render_text(&self.font, text, self.color),
        };
        let Some(rendered) = rendered else {
            log::warn!("Label could not render '{text}' with font '{}'", self.font);
            return false;
        };
        if let Some(old) = self.rendered.replace(rendered) {
            world.release_text(old.handle);
        }
        self.text = text.to_owned();
        true
    }

    /// Spawn a detached entity at `(x, y)` carrying only this label.
    pub fn spawn(self, world: &mut World, x: f32, y: f32, camera_independent: bool) -> Entity {
        let entity = world.spawn_at(x, y);
        world.set_camera_independent(entity, camera_independent);
        world.add_component(entity, self);
        entity
    }
}

impl Component for Label {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn init(&mut self, ctx: &mut Context<'_>) {
        if !self.text.is_empty() {
            let text = self.text.clone();
            self.set_text(ctx.world, &text);
        }
    }

    fn destroy(&mut self, ctx: &mut Context<'_>) {
        if let Some(old) = self.rendered.take() {
            ctx.world.release_text(old.handle);
        }
    }

    fn as_drawable(&mut self) -> Option<&mut dyn Drawable> {
        Some(self)
    }
}

impl Drawable for Label {
    fn layer(&self) -> i32 {
        Self::LAYER
    }

    fn draw(&mut self, ctx: &mut DrawContext<'_>) {
        let Some(rendered) = self.rendered else {
            return;
        };
        let Some(anchor) = ctx.screen_position() else {
            return;
        };
        let (w, h) = (rendered.width as f32, rendered.height as f32);
        let mut dest = Rect::new(anchor.x, anchor.y, w, h);
        let mut pivot = Vec2::ZERO;
        if self.center_horizontal {
            dest.x -= w / 2.0;
            pivot.x = w / 2.0;
        }
        if self.center_vertical {
            dest.y -= h / 2.0;
            pivot.y = h / 2.0;
        }
        let angle = ctx.angle().unwrap_or(0.0);
        ctx.renderer
            .draw_textured_rect(rendered.handle, dest, angle, pivot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::DrawSystem;
    use crate::testing::{FakeFonts, RecordingRenderer};
    use crate::text::FontHandle;

    fn world_with_fonts() -> (World, FakeFonts) {
        let fonts = FakeFonts::new();
        let mut world = World::new();
        world.set_fonts(Box::new(fonts.clone()));
        world.assets_mut().insert_font("ui", FontHandle(0));
        world.assets_mut().insert_font("ui_outline", FontHandle(1));
        (world, fonts)
    }

    #[test]
    fn renders_on_init() {
        let (mut world, _fonts) = world_with_fonts();
        let e = Label::new("hello", "ui").spawn(&mut world, 0.0, 0.0, false);
        assert!(world.get::<Label>(e).unwrap().rendered().is_none());

        world.add_entity(e);
        assert_eq!(world.get::<Label>(e).unwrap().size(), (40, 16));
    }

    #[test]
    fn set_text_releases_previous_texture() {
        let (mut world, fonts) = world_with_fonts();
        let e = Label::new("a", "ui").spawn(&mut world, 0.0, 0.0, false);
        world.add_entity(e);
        let id = world.get_component(e, Label::KIND).unwrap();
        let first = world.component::<Label>(id).unwrap().rendered().unwrap();

        let ok = world
            .with_component::<Label, _>(id, |label, ctx| label.set_text(ctx.world, "abcd"))
            .unwrap();
        assert!(ok);
        assert_eq!(fonts.released(), vec![first.handle]);
        let label = world.component::<Label>(id).unwrap();
        assert_eq!(label.text(), "abcd");
        assert_eq!(label.size(), (32, 16));
    }

    #[test]
    fn failed_render_keeps_old_text() {
        let mut world = World::new();
        let e = Label::new("a", "missing").spawn(&mut world, 0.0, 0.0, false);
        world.add_entity(e);
        let label = world.get::<Label>(e).unwrap();
        assert!(label.rendered().is_none());
        assert_eq!(label.text(), "a");
    }

    #[test]
    fn outlined_text_uses_outline_font() {
        let (mut world, fonts) = world_with_fonts();
        let e = Label::new("hey", "ui")
            .outlined("ui_outline", Color::BLACK)
            .spawn(&mut world, 0.0, 0.0, false);
        world.add_entity(e);
        assert_eq!(fonts.outlined_renders(), 1);
    }

    #[test]
    fn centered_label_is_anchored_at_its_middle() {
        let (mut world, _fonts) = world_with_fonts();
        let e = Label::new("abcd", "ui")
            .centered(true)
            .spawn(&mut world, 100.0, 100.0, true);
        world.add_entity(e);
        world.set_camera(Vec2::new(500.0, 500.0));

        let mut renderer = RecordingRenderer::new();
        DrawSystem::run(&mut world, &mut renderer);
        let (_, dest, _, pivot) = renderer.draws()[0];
        assert_eq!(dest, Rect::new(84.0, 92.0, 32.0, 16.0));
        assert_eq!(pivot, Vec2::new(16.0, 8.0));
    }

    #[test]
    fn destroy_releases_texture() {
        let (mut world, fonts) = world_with_fonts();
        let e = Label::new("x", "ui").spawn(&mut world, 0.0, 0.0, false);
        world.add_entity(e);
        world.destroy_entity(e);
        assert_eq!(fonts.released().len(), 1);
    }
}
