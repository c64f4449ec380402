//! # Transforms — Hierarchical Position and Angle
//!
//! A [`Transform`] holds an entity's *local* position and angle. The resolved
//! value composes it with the parent chain, unless a live physics body takes
//! over:
//!
//! ```text
//! resolve(E) = body(E) * physics_scale         if E has a live body
//!            = resolve(P) + local(E)           if E's parent P has a Transform
//!            = local(E)                        otherwise
//! ```
//!
//! So an entity can be physics-driven, parented, or static, and callers do
//! not care which. Resolution walks the chain iteratively and never reads a
//! component that is checked out; a body being destroyed is invisible, and
//! the entity falls back to its local offset.
//!
//! Screen position is `resolve(E) - camera`, except for camera-independent
//! entities (fixed UI), which ignore the camera.

use crate::ecs::component::Component;
use crate::ecs::entity::{ComponentId, Entity};
use crate::ecs::world::World;
use crate::math::{Vec2, radians_to_degrees};
use crate::physics::PhysicsBody;

/// Local position and angle (degrees), plus an optional link to a
/// [`PhysicsBody`] on the same entity.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Transform {
    pub position: Vec2,
    pub angle: f32,
    /// Set by `PhysicsBody` when it initialises; the latest body wins.
    pub body: Option<ComponentId>,
}

impl Transform {
    pub const KIND: &'static str = "Transform";

    pub fn from_xy(x: f32, y: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            ..Default::default()
        }
    }

    pub fn with_angle(mut self, degrees: f32) -> Self {
        self.angle = degrees;
        self
    }
}

impl Component for Transform {
    fn kind(&self) -> &'static str {
        Self::KIND
    }
}

impl World {
    /// The live body linked from `entity`'s transform, if `entity` still
    /// owns it.
    fn live_body(&self, entity: Entity, transform: &Transform) -> Option<&PhysicsBody> {
        let id = transform.body?;
        if self.owner(id) != Some(entity) {
            return None;
        }
        let body = self.component::<PhysicsBody>(id)?;
        body.is_live().then_some(body)
    }

    /// Resolved scene position. `None` if `entity` has no [`Transform`].
    pub fn resolve_position(&self, entity: Entity) -> Option<Vec2> {
        let mut offset = Vec2::ZERO;
        let mut current = entity;
        loop {
            let transform = self.get::<Transform>(current)?;
            if let Some(body) = self.live_body(current, transform) {
                return Some(offset + body.position() * self.physics_scale());
            }
            offset += transform.position;
            match self.parent(current) {
                Some(parent) if self.get::<Transform>(parent).is_some() => current = parent,
                _ => return Some(offset),
            }
        }
    }

    /// Resolved angle in degrees. `None` if `entity` has no [`Transform`].
    pub fn resolve_angle(&self, entity: Entity) -> Option<f32> {
        let mut offset = 0.0;
        let mut current = entity;
        loop {
            let transform = self.get::<Transform>(current)?;
            if let Some(body) = self.live_body(current, transform) {
                return Some(offset + radians_to_degrees(body.rotation()));
            }
            offset += transform.angle;
            match self.parent(current) {
                Some(parent) if self.get::<Transform>(parent).is_some() => current = parent,
                _ => return Some(offset),
            }
        }
    }

    /// Resolved position minus the camera offset, unless `entity` is
    /// camera-independent.
    pub fn resolve_screen_position(&self, entity: Entity) -> Option<Vec2> {
        let position = self.resolve_position(entity)?;
        if self.is_camera_independent(entity) {
            Some(position)
        } else {
            Some(position - self.camera())
        }
    }
}
