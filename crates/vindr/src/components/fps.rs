use crate::components::label::Label;
use crate::ecs::component::{Component, Context, Updatable};
use crate::ecs::entity::{ComponentId, Entity};
use crate::ecs::world::World;

/// Rewrites a child label with the frame rate every update.
#[derive(Debug, Clone, Copy)]
pub struct FpsCounter {
    label: ComponentId,
}

impl FpsCounter {
    pub const KIND: &'static str = "FpsCounter";

    /// A counter driving an existing [`Label`] component.
    pub fn new(label: ComponentId) -> Self {
        Self { label }
    }

    /// Spawn a detached, camera-independent counter at `(x, y)` with its
    /// label as a child entity.
    pub fn spawn(world: &mut World, x: f32, y: f32, font: &str) -> Option<Entity> {
        let entity = world.spawn_at(x, y);
        world.set_camera_independent(entity, true);
        let child = world.spawn_at(0.0, 0.0);
        world.set_camera_independent(child, true);
        world.add_child(entity, child, false);
        let label = world.add_component(child, Label::new("", font))?;
        world.add_component(entity, Self::new(label))?;
        Some(entity)
    }

    pub fn text(dt: f32) -> String {
        format!("FPS: {:.2}", 1.0 / dt)
    }
}

impl Component for FpsCounter {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn as_updatable(&mut self) -> Option<&mut dyn Updatable> {
        Some(self)
    }
}

impl Updatable for FpsCounter {
    fn update(&mut self, ctx: &mut Context<'_>, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        let text = Self::text(dt);
        ctx.world
            .with_component::<Label, _>(self.label, |label, ctx| label.set_text(ctx.world, &text));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::UpdateSystem;
    use crate::testing::FakeFonts;
    use crate::text::FontHandle;

    #[test]
    fn formats_two_decimals() {
        assert_eq!(FpsCounter::text(0.02), "FPS: 50.00");
        assert_eq!(FpsCounter::text(1.0 / 3.0), "FPS: 3.00");
    }

    #[test]
    fn update_rewrites_label() {
        let mut world = World::new();
        world.set_fonts(Box::new(FakeFonts::new()));
        world.assets_mut().insert_font("ui", FontHandle(0));
        let e = FpsCounter::spawn(&mut world, 5.0, 5.0, "ui").unwrap();
        world.add_entity(e);

        UpdateSystem::run(&mut world, 0.025);
        let child = world.children(e)[0];
        let label = world.get::<Label>(child).unwrap();
        assert_eq!(label.text(), "FPS: 40.00");
        assert_eq!(label.size(), (80, 16));
    }
}
