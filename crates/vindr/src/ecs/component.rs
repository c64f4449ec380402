//! # Components and Capabilities
//!
//! A component is a boxed trait object attached to one entity. What it *can
//! do* is expressed through capability traits:
//!
//! | Capability | Trait | Dispatched by |
//! |---|---|---|
//! | update | [`Updatable`] | `UpdateSystem` |
//! | draw | [`Drawable`] | `DrawSystem` |
//! | mouse click | [`MouseClickListener`] | `MouseClickSystem` |
//! | mouse hover | [`MouseHoverListener`] | `MouseHoverSystem` |
//! | keyboard | [`KeyboardListener`] | `KeyboardSystem` |
//!
//! A component opts into a capability by overriding the matching `as_*`
//! accessor on [`Component`] to return `Some(self)`. The accessors are probed
//! once, when the component is registered with the runtime, and the result is
//! cached as a [`Capabilities`] set. Systems never re-test membership per
//! frame; a component without a given capability is simply not in that
//! system's list.
//!
//! ## Contexts
//!
//! Callbacks receive an explicit context instead of reaching for a global
//! engine. [`Context`] hands out the [`World`] mutably (structural mutation
//! from inside a callback is allowed and absorbed by lazy removal), plus the
//! identity of the component being run and its owner. [`DrawContext`] is the
//! read-only variant used during the draw phase, bundled with the renderer.
//!
//! While a component runs, it is *checked out* of the world: its slot is
//! empty, so lookups of that component through the world return `None`.

use std::any::Any;
use std::ops::BitOr;

use crate::ecs::entity::{ComponentId, Entity};
use crate::ecs::world::World;
use crate::input::{KeyCode, MouseButtonEvent};
use crate::math::Vec2;
use crate::render::Renderer;

/// Upcast helper so `dyn Component` can be downcast to its concrete type.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A unit of data or behaviour attached to exactly one entity.
pub trait Component: AsAny {
    /// The kind name this component is filed under in its entity's map.
    fn kind(&self) -> &'static str;

    /// Called once, the first time the owning entity is registered with the
    /// runtime (or on attach, if the entity is already registered).
    fn init(&mut self, _ctx: &mut Context<'_>) {}

    /// Teardown hook; release anything acquired on this component's behalf.
    fn destroy(&mut self, _ctx: &mut Context<'_>) {}

    fn as_updatable(&mut self) -> Option<&mut dyn Updatable> {
        None
    }

    fn as_drawable(&mut self) -> Option<&mut dyn Drawable> {
        None
    }

    fn as_mouse_click(&mut self) -> Option<&mut dyn MouseClickListener> {
        None
    }

    fn as_mouse_hover(&mut self) -> Option<&mut dyn MouseHoverListener> {
        None
    }

    fn as_keyboard(&mut self) -> Option<&mut dyn KeyboardListener> {
        None
    }
}

impl dyn Component {
    pub fn downcast_ref<T: Component>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

pub trait Updatable {
    fn update(&mut self, ctx: &mut Context<'_>, dt: f32);
}

pub trait Drawable {
    /// Draw-order bucket; lower layers paint first. Read at registration.
    fn layer(&self) -> i32 {
        0
    }

    fn draw(&mut self, ctx: &mut DrawContext<'_>);
}

pub trait MouseClickListener {
    fn mouse_down(&mut self, ctx: &mut Context<'_>, event: &MouseButtonEvent);
    fn mouse_up(&mut self, ctx: &mut Context<'_>, event: &MouseButtonEvent);
}

pub trait MouseHoverListener {
    fn mouse_move(&mut self, ctx: &mut Context<'_>, position: Vec2);

    fn mouse_enter(&mut self, _ctx: &mut Context<'_>) {}

    fn mouse_leave(&mut self, _ctx: &mut Context<'_>) {}
}

pub trait KeyboardListener {
    fn key_down(&mut self, ctx: &mut Context<'_>, key: KeyCode);
    fn key_up(&mut self, ctx: &mut Context<'_>, key: KeyCode);
}

/// The set of capabilities a component implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities(u8);

impl Capabilities {
    pub const NONE: Self = Self(0);
    pub const UPDATE: Self = Self(1 << 0);
    pub const DRAW: Self = Self(1 << 1);
    pub const MOUSE_CLICK: Self = Self(1 << 2);
    pub const MOUSE_HOVER: Self = Self(1 << 3);
    pub const KEYBOARD: Self = Self(1 << 4);

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0 && other.0 != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Probe the `as_*` accessors of a component once.
    pub(crate) fn probe(component: &mut dyn Component) -> Self {
        let mut caps = Self::NONE;
        if component.as_updatable().is_some() {
            caps = caps | Self::UPDATE;
        }
        if component.as_drawable().is_some() {
            caps = caps | Self::DRAW;
        }
        if component.as_mouse_click().is_some() {
            caps = caps | Self::MOUSE_CLICK;
        }
        if component.as_mouse_hover().is_some() {
            caps = caps | Self::MOUSE_HOVER;
        }
        if component.as_keyboard().is_some() {
            caps = caps | Self::KEYBOARD;
        }
        caps
    }
}

impl BitOr for Capabilities {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Entity-level lifecycle hooks.
///
/// Attach with [`World::set_behavior`]. `init` runs exactly once, before the
/// entity's components are registered, and is the place to add components
/// and children. `start` runs after every registration, once the entity and
/// its component set are known to all systems.
pub trait Behavior: 'static {
    fn init(&mut self, _world: &mut World, _entity: Entity) {}

    fn start(&mut self, _world: &mut World, _entity: Entity) {}
}

/// Mutable callback context: the world plus the identity of the running
/// component and its owning entity.
pub struct Context<'w> {
    pub world: &'w mut World,
    pub entity: Entity,
    pub component: ComponentId,
}

impl<'w> Context<'w> {
    /// Resolved scene position of the owning entity.
    pub fn position(&self) -> Option<Vec2> {
        self.world.resolve_position(self.entity)
    }

    /// Resolved screen position of the owning entity.
    pub fn screen_position(&self) -> Option<Vec2> {
        self.world.resolve_screen_position(self.entity)
    }

    /// Resolved angle of the owning entity, in degrees.
    pub fn angle(&self) -> Option<f32> {
        self.world.resolve_angle(self.entity)
    }

    /// First component of type `T` on the owning entity.
    pub fn get<T: Component>(&self) -> Option<&T> {
        self.world.get::<T>(self.entity)
    }

    pub fn get_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.world.get_mut::<T>(self.entity)
    }
}

/// Read-only draw-phase context bundled with the renderer.
pub struct DrawContext<'a> {
    pub world: &'a World,
    pub renderer: &'a mut dyn Renderer,
    pub entity: Entity,
    pub component: ComponentId,
}

impl<'a> DrawContext<'a> {
    pub fn screen_position(&self) -> Option<Vec2> {
        self.world.resolve_screen_position(self.entity)
    }

    pub fn angle(&self) -> Option<f32> {
        self.world.resolve_angle(self.entity)
    }

    pub fn get<T: Component>(&self) -> Option<&T> {
        self.world.get::<T>(self.entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Plain;

    impl Component for Plain {
        fn kind(&self) -> &'static str {
            "Plain"
        }
    }

    struct Ticker;

    impl Component for Ticker {
        fn kind(&self) -> &'static str {
            "Ticker"
        }

        fn as_updatable(&mut self) -> Option<&mut dyn Updatable> {
            Some(self)
        }

        fn as_keyboard(&mut self) -> Option<&mut dyn KeyboardListener> {
            Some(self)
        }
    }

    impl Updatable for Ticker {
        fn update(&mut self, _ctx: &mut Context<'_>, _dt: f32) {}
    }

    impl KeyboardListener for Ticker {
        fn key_down(&mut self, _ctx: &mut Context<'_>, _key: KeyCode) {}
        fn key_up(&mut self, _ctx: &mut Context<'_>, _key: KeyCode) {}
    }

    #[test]
    fn probe_finds_declared_capabilities() {
        let caps = Capabilities::probe(&mut Ticker);
        assert!(caps.contains(Capabilities::UPDATE));
        assert!(caps.contains(Capabilities::KEYBOARD));
        assert!(!caps.contains(Capabilities::DRAW));
        assert!(!caps.contains(Capabilities::MOUSE_CLICK));
    }

    #[test]
    fn plain_component_has_no_capabilities() {
        assert!(Capabilities::probe(&mut Plain).is_empty());
        assert!(!Capabilities::NONE.contains(Capabilities::NONE));
    }

    #[test]
    fn downcast_through_trait_object() {
        let boxed: Box<dyn Component> = Box::new(Ticker);
        assert!(boxed.downcast_ref::<Ticker>().is_some());
        assert!(boxed.downcast_ref::<Plain>().is_none());
    }
}
