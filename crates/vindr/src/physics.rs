//! The physics collaborator and the [`PhysicsBody`] component.
//!
//! The simulation itself (integration, collision resolution) is external.
//! The runtime consumes only what [`PhysicsWorld`] exposes: add and remove
//! bodies, step, query a body's position and rotation, and optionally receive
//! collision callbacks.
//!
//! ## Units
//!
//! Physics runs in its own units. One physics unit is `physics_scale` scene
//! units (see [`EngineConfig`](crate::config::EngineConfig)); rotations are
//! radians. [`PhysicsBody::boxed`] converts scene units on the way in,
//! transform resolution scales positions and converts angles on the way out.
//!
//! ## Sync
//!
//! After every step the world copies each live body's position and rotation
//! into its `PhysicsBody` component, so transform resolution during update and
//! draw reads a stable snapshot and never touches the physics world.

use crate::ecs::component::{Component, Context};
use crate::ecs::hierarchy::Transform;
use crate::math::Vec2;

/// Opaque body identifier issued by a [`PhysicsWorld`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle(pub u64);

/// A box-shaped rigid body, in physics units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyDesc {
    /// Center of the body.
    pub position: Vec2,
    /// Full width and height.
    pub size: Vec2,
    /// Rotation in radians.
    pub rotation: f32,
    pub mass: f32,
    /// Fixed bodies never move.
    pub fixed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionPhase {
    /// Two bodies started touching.
    Enter,
    /// Before the solver resolves a contact.
    PreSolve,
    /// After the solver resolved a contact.
    PostSolve,
    /// Two bodies stopped touching.
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionEvent {
    pub phase: CollisionPhase,
    pub a: BodyHandle,
    pub b: BodyHandle,
}

pub trait CollisionListener {
    fn on_collision(&mut self, event: CollisionEvent);
}

impl<F: FnMut(CollisionEvent)> CollisionListener for F {
    fn on_collision(&mut self, event: CollisionEvent) {
        (self)(event);
    }
}

pub trait PhysicsWorld {
    fn add_body(&mut self, desc: &BodyDesc) -> BodyHandle;

    fn remove_body(&mut self, body: BodyHandle);

    /// Advance the simulation by `dt` seconds.
    fn step(&mut self, dt: f32);

    /// Simulated position of a body, in physics units.
    fn position(&self, body: BodyHandle) -> Option<Vec2>;

    /// Simulated rotation of a body, in radians.
    fn rotation(&self, body: BodyHandle) -> Option<f32>;

    fn set_gravity(&mut self, _gravity: Vec2) {}

    /// Register a listener for collision callbacks. Backends without
    /// collision reporting ignore it.
    fn set_collision_listener(&mut self, _listener: Box<dyn CollisionListener>) {
        log::warn!("This physics backend does not report collisions; listener ignored.");
    }
}

/// Attaches a simulated body to an entity.
///
/// While the body is live, the entity's [`Transform`](crate::ecs::Transform)
/// resolves to the body's simulated position instead of its local offset.
#[derive(Debug, Clone)]
pub struct PhysicsBody {
    pub desc: BodyDesc,
    handle: Option<BodyHandle>,
    position: Vec2,
    rotation: f32,
}

impl PhysicsBody {
    pub const KIND: &'static str = "PhysicsBody";

    pub fn new(desc: BodyDesc) -> Self {
        Self {
            desc,
            handle: None,
            position: desc.position,
            rotation: desc.rotation,
        }
    }

    /// A box body from scene-space center and size. `scale` is scene units per
    /// physics unit.
    pub fn boxed(x: f32, y: f32, w: f32, h: f32, mass: f32, scale: f32) -> Self {
        Self::new(BodyDesc {
            position: Vec2::new(x / scale, y / scale),
            size: Vec2::new(w / scale, h / scale),
            rotation: 0.0,
            mass,
            fixed: false,
        })
    }

    pub fn fixed(mut self) -> Self {
        self.desc.fixed = true;
        self
    }

    pub fn handle(&self) -> Option<BodyHandle> {
        self.handle
    }

    /// `true` while the body exists in the physics world.
    pub fn is_live(&self) -> bool {
        self.handle.is_some()
    }

    /// Last synced position, in physics units.
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Last synced rotation, in radians.
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub(crate) fn sync(&mut self, position: Vec2, rotation: f32) {
        self.position = position;
        self.rotation = rotation;
    }
}

impl Component for PhysicsBody {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn init(&mut self, ctx: &mut Context<'_>) {
        if self.handle.is_some() {
            return;
        }
        let Some(physics) = ctx.world.physics_mut() else {
            log::warn!(
                "PhysicsBody on {:?} initialized without a physics world; it stays static.",
                ctx.entity
            );
            return;
        };
        let handle = physics.add_body(&self.desc);
        self.position = physics.position(handle).unwrap_or(self.desc.position);
        self.rotation = physics.rotation(handle).unwrap_or(self.desc.rotation);
        self.handle = Some(handle);
        let id = ctx.component;
        ctx.world.track_body(id);
        match ctx.get_mut::<Transform>() {
            Some(transform) => transform.body = Some(id),
            None => log::warn!(
                "PhysicsBody on {:?} has no Transform to drive.",
                ctx.entity
            ),
        }
    }

    fn destroy(&mut self, ctx: &mut Context<'_>) {
        if let Some(handle) = self.handle.take() {
            if let Some(physics) = ctx.world.physics_mut() {
                physics.remove_body(handle);
            }
        }
        ctx.world.untrack_body(ctx.component);
    }
}
