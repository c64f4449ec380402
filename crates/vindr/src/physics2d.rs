//! 2D physics via Rapier.
//!
//! [`RapierPhysics`] implements [`PhysicsWorld`] for box bodies. The
//! simulation runs at a fixed timestep (Rapier's default 1/60 s) driven by an
//! accumulator, so frame-rate hiccups do not change the simulation.
//!
//! Collision callbacks are produced by diffing the set of body pairs with an
//! active contact before and after each step: new pairs report `Enter`, pairs
//! still touching report `PostSolve`, vanished pairs report `Exit`.

use std::collections::{HashMap, HashSet};

use rapier2d::prelude::*;

use crate::physics::{
    BodyDesc, BodyHandle, CollisionEvent as SceneCollision, CollisionListener, CollisionPhase,
    PhysicsWorld,
};

/// Largest frame delta fed into the accumulator.
const MAX_FRAME_DT: f32 = 0.25;

fn to_rapier(v: crate::math::Vec2) -> Vec2 {
    Vec2::new(v.x, v.y)
}

fn from_rapier(v: Vec2) -> crate::math::Vec2 {
    crate::math::Vec2::new(v.x, v.y)
}

pub struct RapierPhysics {
    gravity: Vec2,
    pipeline: PhysicsPipeline,
    params: IntegrationParameters,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    handles: HashMap<BodyHandle, RigidBodyHandle>,
    reverse: HashMap<RigidBodyHandle, BodyHandle>,
    next_handle: u64,
    touching: HashSet<(BodyHandle, BodyHandle)>,
    listener: Option<Box<dyn CollisionListener>>,
    accumulator: f32,
}

impl std::fmt::Debug for RapierPhysics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RapierPhysics")
            .field("gravity", &self.gravity)
            .field("bodies", &self.bodies.len())
            .field("colliders", &self.colliders.len())
            .finish()
    }
}

impl RapierPhysics {
    pub fn new(gravity: crate::math::Vec2) -> Self {
        Self {
            gravity: to_rapier(gravity),
            pipeline: PhysicsPipeline::new(),
            params: IntegrationParameters::default(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            handles: HashMap::new(),
            reverse: HashMap::new(),
            next_handle: 0,
            touching: HashSet::new(),
            listener: None,
            accumulator: 0.0,
        }
    }

    fn body_of(&self, collider: ColliderHandle) -> Option<BodyHandle> {
        let parent = self.colliders.get(collider)?.parent()?;
        self.reverse.get(&parent).copied()
    }

    /// Pairs of bodies with at least one active contact, in canonical order.
    fn active_pairs(&self) -> HashSet<(BodyHandle, BodyHandle)> {
        let mut pairs = HashSet::new();
        for pair in self.narrow_phase.contact_pairs() {
            if !pair.has_any_active_contact() {
                continue;
            }
            let (Some(a), Some(b)) = (self.body_of(pair.collider1), self.body_of(pair.collider2))
            else {
                continue;
            };
            pairs.insert(if a.0 <= b.0 { (a, b) } else { (b, a) });
        }
        pairs
    }

    fn report_collisions(&mut self) {
        if self.listener.is_none() {
            return;
        }
        let now = self.active_pairs();
        let Some(listener) = self.listener.as_mut() else {
            return;
        };

        for &(a, b) in &now {
            let phase = if self.touching.contains(&(a, b)) {
                CollisionPhase::PostSolve
            } else {
                CollisionPhase::Enter
            };
            listener.on_collision(SceneCollision { phase, a, b });
        }
        for &(a, b) in self.touching.difference(&now) {
            listener.on_collision(SceneCollision {
                phase: CollisionPhase::Exit,
                a,
                b,
            });
        }
        self.touching = now;
    }
}

impl PhysicsWorld for RapierPhysics {
    fn add_body(&mut self, desc: &BodyDesc) -> BodyHandle {
        let body_type = if desc.fixed {
            RigidBodyType::Fixed
        } else {
            RigidBodyType::Dynamic
        };
        let rb = RigidBodyBuilder::new(body_type)
            .translation(to_rapier(desc.position))
            .rotation(desc.rotation)
            .build();
        let rb_handle = self.bodies.insert(rb);

        let area = (desc.size.x * desc.size.y).max(f32::EPSILON);
        let collider = ColliderBuilder::cuboid(desc.size.x / 2.0, desc.size.y / 2.0)
            .density(desc.mass.max(0.0) / area)
            .build();
        self.colliders
            .insert_with_parent(collider, rb_handle, &mut self.bodies);

        let handle = BodyHandle(self.next_handle);
        self.next_handle += 1;
        self.handles.insert(handle, rb_handle);
        self.reverse.insert(rb_handle, handle);
        handle
    }

    fn remove_body(&mut self, body: BodyHandle) {
        let Some(rb_handle) = self.handles.remove(&body) else {
            return;
        };
        self.reverse.remove(&rb_handle);
        if let Some(listener) = self.listener.as_mut() {
            for &(a, b) in self.touching.iter().filter(|&&(a, b)| a == body || b == body) {
                listener.on_collision(SceneCollision {
                    phase: CollisionPhase::Exit,
                    a,
                    b,
                });
            }
        }
        self.touching.retain(|&(a, b)| a != body && b != body);
        self.bodies.remove(
            rb_handle,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    fn step(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        self.accumulator += dt.min(MAX_FRAME_DT);

        let fixed_dt = self.params.dt;
        while self.accumulator >= fixed_dt {
            self.pipeline.step(
                self.gravity,
                &self.params,
                &mut self.islands,
                &mut self.broad_phase,
                &mut self.narrow_phase,
                &mut self.bodies,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                &mut self.ccd_solver,
                &(),
                &(),
            );
            self.accumulator -= fixed_dt;
            self.report_collisions();
        }
    }

    fn position(&self, body: BodyHandle) -> Option<crate::math::Vec2> {
        let rb = self.bodies.get(*self.handles.get(&body)?)?;
        Some(from_rapier(rb.translation()))
    }

    fn rotation(&self, body: BodyHandle) -> Option<f32> {
        let rb = self.bodies.get(*self.handles.get(&body)?)?;
        Some(rb.rotation().angle())
    }

    fn set_gravity(&mut self, gravity: crate::math::Vec2) {
        self.gravity = to_rapier(gravity);
    }

    fn set_collision_listener(&mut self, listener: Box<dyn CollisionListener>) {
        self.touching = self.active_pairs();
        self.listener = Some(listener);
    }
}
