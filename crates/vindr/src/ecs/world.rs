//! # World — The Entity Graph and Its Runtime
//!
//! The [`World`] owns every entity and component, the five dispatch systems,
//! and the collaborators components may reach during their callbacks
//! (physics, audio, fonts, named assets).
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │ World                                                    │
//! │                                                          │
//! │  entities:   Arena<Entity, EntityNode>                   │
//! │    node = { components: kind → [ComponentId], order,     │
//! │             children, parent, enabled, registered, … }   │
//! │                                                          │
//! │  components: Arena<ComponentId, ComponentSlot>           │
//! │    slot = { Option<Box<dyn Component>>, owner, enabled,  │
//! │             capabilities, layer, … }                     │
//! │                                                          │
//! │  roots ── entities added to the runtime directly         │
//! │  systems ── draw / update / click / hover / keyboard     │
//! │  physics, audio, fonts, assets, camera                   │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Parent, child and owner links are handles, never references, so any of
//! them may go stale without unsafety: a stale handle simply fails lookups.
//!
//! ## Detached vs. Registered
//!
//! Spawning builds a detached tree. [`World::add_entity`] makes an entity a
//! root and *registers* it and its descendants: behaviours are initialised,
//! components are initialised and offered to every system, then behaviours
//! are started. Only registered components are dispatched.
//!
//! ## Checkout
//!
//! A component runs its callback *checked out*: the box is moved out of its
//! slot for the duration of the call, so the callback can hold `&mut self`
//! and `&mut World` at the same time. While checked out, lookups of that
//! component return `None`. If the component is destroyed in the meantime
//! (its entity was destroyed from inside its own callback), the destroy hook
//! runs when the box is checked back in.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::assets::Assets;
use crate::audio::{AudioBackend, SoundHandle};
use crate::ecs::component::{Behavior, Capabilities, Component, Context, DrawContext};
use crate::ecs::entity::{Arena, ComponentId, Entity};
use crate::ecs::hierarchy::Transform;
use crate::input::KeyCode;
use crate::math::{Color, Vec2};
use crate::physics::{PhysicsBody, PhysicsWorld};
use crate::render::{Renderer, Texture, TextureHandle};
use crate::systems::Systems;
use crate::text::{FontBackend, FontHandle, RenderedText};

/// Scene units per physics unit when nothing else is configured.
pub const DEFAULT_PHYSICS_SCALE: f32 = 30.0;

pub(crate) struct EntityNode {
    pub(crate) enabled: bool,
    /// Kind name → components of that kind, in insertion order.
    pub(crate) components: HashMap<&'static str, Vec<ComponentId>>,
    /// All components, in insertion order.
    pub(crate) order: Vec<ComponentId>,
    pub(crate) children: Vec<Entity>,
    pub(crate) parent: Option<Entity>,
    pub(crate) registered: bool,
    init_called: bool,
    pub(crate) camera_independent: bool,
    behavior: Option<Box<dyn Behavior>>,
}

impl EntityNode {
    fn new() -> Self {
        Self {
            enabled: true,
            components: HashMap::new(),
            order: Vec::new(),
            children: Vec::new(),
            parent: None,
            registered: false,
            init_called: false,
            camera_independent: false,
            behavior: None,
        }
    }
}

pub(crate) struct ComponentSlot {
    /// `None` while checked out.
    pub(crate) component: Option<Box<dyn Component>>,
    kind: &'static str,
    pub(crate) owner: Option<Entity>,
    enabled: bool,
    init_called: bool,
    registered: bool,
    /// Registration requested while checked out; finished on checkin.
    register_on_checkin: bool,
    capabilities: Capabilities,
    layer: i32,
    /// Set when destroyed while checked out; holds the former owner.
    pending_destroy: Option<Entity>,
}

pub struct World {
    pub(crate) entities: Arena<Entity, EntityNode>,
    pub(crate) components: Arena<ComponentId, ComponentSlot>,
    roots: Vec<Entity>,
    systems: Systems,
    camera: Vec2,
    physics_scale: f32,
    physics: Option<Box<dyn PhysicsWorld>>,
    audio: Option<Box<dyn AudioBackend>>,
    fonts: Option<Box<dyn FontBackend>>,
    assets: Assets,
    /// Components holding a live physics body, synced after each step.
    bodies: Vec<ComponentId>,
    stop: Arc<AtomicBool>,
}

impl World {
    pub fn new() -> Self {
        Self {
            entities: Arena::new(),
            components: Arena::new(),
            roots: Vec::new(),
            systems: Systems::new(),
            camera: Vec2::ZERO,
            physics_scale: DEFAULT_PHYSICS_SCALE,
            physics: None,
            audio: None,
            fonts: None,
            assets: Assets::new(),
            bodies: Vec::new(),
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    // ── Entities ─────────────────────────────────────────────────────

    /// Create a detached, empty entity.
    pub fn spawn(&mut self) -> Entity {
        self.entities.insert(EntityNode::new())
    }

    /// Create a detached entity with a [`Transform`] at `(x, y)`.
    pub fn spawn_at(&mut self, x: f32, y: f32) -> Entity {
        let entity = self.spawn();
        self.add_component(entity, Transform::from_xy(x, y));
        entity
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.contains(entity)
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Components in the world, attached or not.
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    pub fn roots(&self) -> &[Entity] {
        &self.roots
    }

    pub fn parent(&self, entity: Entity) -> Option<Entity> {
        self.entities.get(entity)?.parent
    }

    /// Direct children, in insertion order.
    pub fn children(&self, entity: Entity) -> &[Entity] {
        self.entities
            .get(entity)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    /// Every descendant, depth-first pre-order.
    pub fn descendants(&self, entity: Entity) -> Vec<Entity> {
        let mut out = Vec::new();
        let mut stack: Vec<Entity> = self.children(entity).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// `true` once the entity has been registered with the systems.
    pub fn is_registered(&self, entity: Entity) -> bool {
        self.entities.get(entity).is_some_and(|node| node.registered)
    }

    pub fn is_enabled(&self, entity: Entity) -> bool {
        self.entities.get(entity).is_some_and(|node| node.enabled)
    }

    /// Gate dispatch for this entity's components. Children are unaffected.
    pub fn set_enabled(&mut self, entity: Entity, enabled: bool) {
        if let Some(node) = self.entities.get_mut(entity) {
            node.enabled = enabled;
        }
    }

    /// [`set_enabled`](Self::set_enabled) on the entity and all descendants.
    pub fn set_enabled_recursive(&mut self, entity: Entity, enabled: bool) {
        self.set_enabled(entity, enabled);
        for descendant in self.descendants(entity) {
            self.set_enabled(descendant, enabled);
        }
    }

    /// Camera-independent entities ignore the camera offset (fixed UI).
    pub fn set_camera_independent(&mut self, entity: Entity, independent: bool) {
        if let Some(node) = self.entities.get_mut(entity) {
            node.camera_independent = independent;
        }
    }

    pub fn is_camera_independent(&self, entity: Entity) -> bool {
        self.entities
            .get(entity)
            .is_some_and(|node| node.camera_independent)
    }

    /// Attach entity-level lifecycle hooks. Replaces any previous behaviour.
    pub fn set_behavior(&mut self, entity: Entity, behavior: impl Behavior) -> bool {
        match self.entities.get_mut(entity) {
            Some(node) => {
                node.behavior = Some(Box::new(behavior));
                true
            }
            None => false,
        }
    }

    // ── Components ───────────────────────────────────────────────────

    /// Attach a new component. Duplicates of one kind are kept in insertion
    /// order. If the entity is registered, the component is initialised and
    /// registered immediately.
    pub fn add_component<C: Component>(&mut self, entity: Entity, component: C) -> Option<ComponentId> {
        self.add_boxed(entity, Box::new(component))
    }

    pub fn add_boxed(&mut self, entity: Entity, mut component: Box<dyn Component>) -> Option<ComponentId> {
        if !self.is_alive(entity) {
            log::warn!("Cannot add {} to dead entity {entity:?}", component.kind());
            return None;
        }
        let kind = component.kind();
        let capabilities = Capabilities::probe(&mut *component);
        let layer = component.as_drawable().map_or(0, |d| d.layer());
        let id = self.components.insert(ComponentSlot {
            component: Some(component),
            kind,
            owner: None,
            enabled: true,
            init_called: false,
            registered: false,
            register_on_checkin: false,
            capabilities,
            layer,
            pending_destroy: None,
        });
        self.link(entity, id);
        Some(id)
    }

    fn link(&mut self, entity: Entity, id: ComponentId) {
        let Some(slot) = self.components.get_mut(id) else {
            return;
        };
        let kind = slot.kind;
        let Some(node) = self.entities.get_mut(entity) else {
            return;
        };
        node.components.entry(kind).or_default().push(id);
        node.order.push(id);
        let registered = node.registered;
        slot.owner = Some(entity);
        if registered {
            self.register_component(id);
        }
    }

    /// Detach `id` from `entity`. No-op (returns `false`) if `entity` does not
    /// own it. The component is not destroyed.
    pub fn remove_component(&mut self, entity: Entity, id: ComponentId) -> bool {
        if self.owner(id) != Some(entity) {
            return false;
        }
        self.detach_component(id)
    }

    /// Detach a component from its owner, withdrawing it from every system.
    /// It stays in the world, ownerless, until re-attached or taken.
    pub fn detach_component(&mut self, id: ComponentId) -> bool {
        let Some(slot) = self.components.get_mut(id) else {
            return false;
        };
        let Some(owner) = slot.owner.take() else {
            return false;
        };
        slot.registered = false;
        let kind = slot.kind;
        self.systems.unregister(id);
        if let Some(node) = self.entities.get_mut(owner) {
            if let Some(list) = node.components.get_mut(kind) {
                if let Some(pos) = list.iter().position(|&c| c == id) {
                    list.remove(pos);
                }
                if list.is_empty() {
                    node.components.remove(kind);
                }
            }
            node.order.retain(|&c| c != id);
        }
        true
    }

    /// Attach an existing component to `entity`, detaching it from any
    /// previous owner first.
    pub fn attach_component(&mut self, entity: Entity, id: ComponentId) -> bool {
        if !self.is_alive(entity) || !self.components.contains(id) {
            log::warn!("Cannot attach {id:?} to {entity:?}: stale handle");
            return false;
        }
        if self.is_destroying(id) {
            return false;
        }
        self.detach_component(id);
        self.link(entity, id);
        true
    }

    /// Move an ownerless component out of the world.
    pub fn take_component(&mut self, id: ComponentId) -> Option<Box<dyn Component>> {
        let slot = self.components.get(id)?;
        if slot.owner.is_some() || slot.component.is_none() {
            return None;
        }
        self.untrack_body(id);
        self.components.remove(id)?.component
    }

    /// First component of `kind` on `entity`.
    pub fn get_component(&self, entity: Entity, kind: &str) -> Option<ComponentId> {
        self.components_by_kind(entity, kind).first().copied()
    }

    /// All components of `kind` on `entity`, in insertion order.
    pub fn components_by_kind(&self, entity: Entity, kind: &str) -> &[ComponentId] {
        self.entities
            .get(entity)
            .and_then(|node| node.components.get(kind))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All components on `entity`, in insertion order.
    pub fn components_of(&self, entity: Entity) -> &[ComponentId] {
        self.entities
            .get(entity)
            .map(|node| node.order.as_slice())
            .unwrap_or(&[])
    }

    pub fn owner(&self, id: ComponentId) -> Option<Entity> {
        self.components.get(id)?.owner
    }

    pub fn component_kind(&self, id: ComponentId) -> Option<&'static str> {
        self.components.get(id).map(|slot| slot.kind)
    }

    pub fn capabilities(&self, id: ComponentId) -> Capabilities {
        self.components
            .get(id)
            .map_or(Capabilities::NONE, |slot| slot.capabilities)
    }

    pub fn is_component_enabled(&self, id: ComponentId) -> bool {
        self.components.get(id).is_some_and(|slot| slot.enabled)
    }

    pub fn set_component_enabled(&mut self, id: ComponentId, enabled: bool) {
        if let Some(slot) = self.components.get_mut(id) {
            slot.enabled = enabled;
        }
    }

    /// First component of type `T` on `entity`.
    pub fn get<T: Component>(&self, entity: Entity) -> Option<&T> {
        let node = self.entities.get(entity)?;
        node.order.iter().find_map(|&id| self.component::<T>(id))
    }

    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        let id = self
            .entities
            .get(entity)?
            .order
            .iter()
            .copied()
            .find(|&id| self.component::<T>(id).is_some())?;
        self.component_mut::<T>(id)
    }

    pub fn component<T: Component>(&self, id: ComponentId) -> Option<&T> {
        self.components
            .get(id)?
            .component
            .as_deref()?
            .downcast_ref::<T>()
    }

    pub fn component_mut<T: Component>(&mut self, id: ComponentId) -> Option<&mut T> {
        self.components
            .get_mut(id)?
            .component
            .as_deref_mut()?
            .downcast_mut::<T>()
    }

    /// Check out component `id` as a `T` and run `f` with it and a context,
    /// so one component can drive another.
    pub fn with_component<T: Component, R>(
        &mut self,
        id: ComponentId,
        f: impl FnOnce(&mut T, &mut Context<'_>) -> R,
    ) -> Option<R> {
        let owner = self.owner(id)?;
        if self.component::<T>(id).is_none() {
            return None;
        }
        let mut component = self.checkout(id)?;
        let result = component.downcast_mut::<T>().map(|typed| {
            f(
                typed,
                &mut Context {
                    world: self,
                    entity: owner,
                    component: id,
                },
            )
        });
        self.checkin(id, component);
        result
    }

    // ── Tree Structure ───────────────────────────────────────────────

    /// Make `child` the last child of `parent`, taking it from any previous
    /// parent. With `attach_to_runtime`, `child` and its unregistered
    /// descendants are registered.
    pub fn add_child(&mut self, parent: Entity, child: Entity, attach_to_runtime: bool) -> bool {
        if !self.is_alive(parent) || !self.is_alive(child) {
            log::warn!("add_child({parent:?}, {child:?}): stale handle");
            return false;
        }
        if parent == child || self.is_ancestor(child, parent) {
            log::warn!("add_child({parent:?}, {child:?}) would create a cycle; ignored");
            return false;
        }
        self.unlink_from_parent(child);
        if let Some(node) = self.entities.get_mut(parent) {
            node.children.push(child);
        }
        if let Some(node) = self.entities.get_mut(child) {
            node.parent = Some(parent);
        }
        if attach_to_runtime {
            self.register_entity(child);
        }
        true
    }

    /// Remove `child` from `parent`'s children. The child is not destroyed;
    /// with `detach_from_runtime` it and its descendants are deregistered.
    pub fn remove_child(&mut self, parent: Entity, child: Entity, detach_from_runtime: bool) -> bool {
        let Some(node) = self.entities.get_mut(parent) else {
            return false;
        };
        let Some(pos) = node.children.iter().position(|&c| c == child) else {
            return false;
        };
        node.children.remove(pos);
        if let Some(node) = self.entities.get_mut(child) {
            node.parent = None;
        }
        if detach_from_runtime {
            self.deregister_entity(child);
        }
        true
    }

    /// `true` if `ancestor` is `entity`'s parent, grandparent, ...
    pub fn is_ancestor(&self, ancestor: Entity, entity: Entity) -> bool {
        let mut current = self.parent(entity);
        while let Some(e) = current {
            if e == ancestor {
                return true;
            }
            current = self.parent(e);
        }
        false
    }

    fn unlink_from_parent(&mut self, entity: Entity) {
        match self.parent(entity) {
            Some(parent) => {
                if let Some(node) = self.entities.get_mut(parent) {
                    node.children.retain(|&c| c != entity);
                }
                if let Some(node) = self.entities.get_mut(entity) {
                    node.parent = None;
                }
            }
            None => self.roots.retain(|&r| r != entity),
        }
    }

    // ── Runtime Registration ─────────────────────────────────────────

    /// Add `entity` to the runtime as a root and register its tree.
    pub fn add_entity(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            log::warn!("add_entity({entity:?}): stale handle");
            return false;
        }
        if let Some(parent) = self.parent(entity) {
            log::warn!("add_entity({entity:?}): entity is a child of {parent:?}; detach it first");
            return false;
        }
        if !self.roots.contains(&entity) {
            self.roots.push(entity);
        }
        self.register_entity(entity);
        true
    }

    /// Remove a root from the runtime without destroying it.
    pub fn remove_entity(&mut self, entity: Entity) -> bool {
        let Some(pos) = self.roots.iter().position(|&r| r == entity) else {
            return false;
        };
        self.roots.remove(pos);
        self.deregister_entity(entity);
        true
    }

    fn register_entity(&mut self, entity: Entity) {
        let Some(node) = self.entities.get_mut(entity) else {
            return;
        };
        let fresh = !node.registered;
        if fresh {
            node.registered = true;
            let first = !node.init_called;
            node.init_called = true;
            log::debug!("Registering {entity:?}");
            if first {
                self.run_behavior(entity, true);
            }
            for id in self.components_of(entity).to_vec() {
                self.register_component(id);
            }
        }
        for child in self.children(entity).to_vec() {
            self.register_entity(child);
        }
        if fresh {
            self.run_behavior(entity, false);
        }
    }

    fn deregister_entity(&mut self, entity: Entity) {
        let Some(node) = self.entities.get_mut(entity) else {
            return;
        };
        if node.registered {
            node.registered = false;
            log::debug!("Deregistering {entity:?}");
            for id in self.components_of(entity).to_vec() {
                self.unregister_component(id);
            }
        }
        for child in self.children(entity).to_vec() {
            self.deregister_entity(child);
        }
    }

    fn register_component(&mut self, id: ComponentId) {
        let Some(slot) = self.components.get_mut(id) else {
            return;
        };
        if slot.registered || slot.pending_destroy.is_some() {
            return;
        }
        let Some(owner) = slot.owner else {
            return;
        };
        if slot.component.is_none() {
            slot.register_on_checkin = true;
            return;
        }
        if !slot.init_called {
            slot.init_called = true;
            if let Some(mut component) = self.checkout(id) {
                component.init(&mut Context {
                    world: self,
                    entity: owner,
                    component: id,
                });
                self.checkin(id, component);
            }
        }

        // `init` may have detached, moved or destroyed things.
        if !self.is_registered(owner) {
            return;
        }
        let Some(slot) = self.components.get_mut(id) else {
            return;
        };
        if slot.registered || slot.owner != Some(owner) {
            return;
        }
        if let Some(drawable) = slot.component.as_deref_mut().and_then(|c| c.as_drawable()) {
            slot.layer = drawable.layer();
        }
        slot.registered = true;
        let (capabilities, layer) = (slot.capabilities, slot.layer);
        self.systems.register(id, capabilities, layer);
    }

    fn unregister_component(&mut self, id: ComponentId) {
        if let Some(slot) = self.components.get_mut(id) {
            slot.registered = false;
            slot.register_on_checkin = false;
        }
        self.systems.unregister(id);
    }

    fn run_behavior(&mut self, entity: Entity, init: bool) {
        let Some(mut behavior) = self
            .entities
            .get_mut(entity)
            .and_then(|node| node.behavior.take())
        else {
            return;
        };
        if init {
            behavior.init(self, entity);
        } else {
            behavior.start(self, entity);
        }
        if let Some(node) = self.entities.get_mut(entity) {
            if node.behavior.is_none() {
                node.behavior = Some(behavior);
            }
        }
    }

    // ── Destruction ──────────────────────────────────────────────────

    /// Destroy `entity`: children first (depth-first), then every owned
    /// component's `destroy` hook, then the entity itself. Returns `false`
    /// for an already-destroyed entity.
    pub fn destroy_entity(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }
        self.unlink_from_parent(entity);
        self.destroy_tree(entity);
        true
    }

    /// Destroy every root.
    pub fn destroy_all(&mut self) {
        for root in std::mem::take(&mut self.roots) {
            self.destroy_tree(root);
        }
    }

    fn destroy_tree(&mut self, entity: Entity) {
        let Some(node) = self.entities.get_mut(entity) else {
            return;
        };
        let children = std::mem::take(&mut node.children);
        for child in children {
            self.destroy_tree(child);
        }

        let Some(node) = self.entities.get_mut(entity) else {
            return;
        };
        node.registered = false;
        node.components.clear();
        let order = std::mem::take(&mut node.order);
        for id in order {
            self.destroy_component(id, entity);
        }

        // Hooks may have attached more; clear those too.
        if let Some(node) = self.entities.remove(entity) {
            for child in node.children {
                self.destroy_tree(child);
            }
            for id in node.order {
                self.destroy_component(id, entity);
            }
        }
        log::debug!("Destroyed {entity:?}");
    }

    fn destroy_component(&mut self, id: ComponentId, owner: Entity) {
        self.systems.unregister(id);
        let Some(slot) = self.components.get_mut(id) else {
            return;
        };
        slot.owner = None;
        slot.registered = false;
        match slot.component.take() {
            Some(mut component) => {
                component.destroy(&mut Context {
                    world: self,
                    entity: owner,
                    component: id,
                });
                self.components.remove(id);
                self.untrack_body(id);
            }
            None => slot.pending_destroy = Some(owner),
        }
    }

    fn is_destroying(&self, id: ComponentId) -> bool {
        self.components
            .get(id)
            .is_some_and(|slot| slot.pending_destroy.is_some())
    }

    // ── Dispatch ─────────────────────────────────────────────────────

    pub(crate) fn systems(&self) -> &Systems {
        &self.systems
    }

    pub(crate) fn systems_mut(&mut self) -> &mut Systems {
        &mut self.systems
    }

    /// Enabled, present, and owned by an enabled entity.
    pub(crate) fn is_dispatchable(&self, id: ComponentId) -> bool {
        let Some(slot) = self.components.get(id) else {
            return false;
        };
        slot.enabled
            && slot.component.is_some()
            && slot.pending_destroy.is_none()
            && slot.owner.is_some_and(|owner| self.is_enabled(owner))
    }

    fn checkout(&mut self, id: ComponentId) -> Option<Box<dyn Component>> {
        self.components.get_mut(id)?.component.take()
    }

    fn checkin(&mut self, id: ComponentId, mut component: Box<dyn Component>) {
        let Some(slot) = self.components.get_mut(id) else {
            return;
        };
        match slot.pending_destroy.take() {
            Some(owner) => {
                component.destroy(&mut Context {
                    world: self,
                    entity: owner,
                    component: id,
                });
                self.components.remove(id);
                self.untrack_body(id);
            }
            None => {
                slot.component = Some(component);
                if std::mem::take(&mut slot.register_on_checkin) {
                    self.register_component(id);
                }
            }
        }
    }

    /// Run `f` on a checked-out, dispatchable component.
    pub(crate) fn dispatch<R>(
        &mut self,
        id: ComponentId,
        f: impl FnOnce(&mut dyn Component, &mut Context<'_>) -> R,
    ) -> Option<R> {
        if !self.is_dispatchable(id) {
            return None;
        }
        let owner = self.owner(id)?;
        let mut component = self.checkout(id)?;
        let result = f(
            &mut *component,
            &mut Context {
                world: self,
                entity: owner,
                component: id,
            },
        );
        self.checkin(id, component);
        Some(result)
    }

    pub(crate) fn draw_component(&mut self, id: ComponentId, renderer: &mut dyn Renderer) {
        if !self.is_dispatchable(id) {
            return;
        }
        let Some(owner) = self.owner(id) else {
            return;
        };
        let Some(mut component) = self.checkout(id) else {
            return;
        };
        if let Some(drawable) = component.as_drawable() {
            drawable.draw(&mut DrawContext {
                world: self,
                renderer,
                entity: owner,
                component: id,
            });
        }
        self.checkin(id, component);
    }

    // ── Camera & Input State ─────────────────────────────────────────

    /// Screen position is scene position minus the camera offset.
    pub fn camera(&self) -> Vec2 {
        self.camera
    }

    pub fn set_camera(&mut self, camera: Vec2) {
        self.camera = camera;
    }

    /// `true` between a key's down and up events.
    pub fn key_pressed(&self, key: KeyCode) -> bool {
        self.systems.keyboard.is_pressed(key)
    }

    /// Ask the frame loop to stop after the current frame.
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    pub fn stop_requested(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    pub(crate) fn stop_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    // ── Physics ──────────────────────────────────────────────────────

    pub fn set_physics(&mut self, physics: Box<dyn PhysicsWorld>) {
        if !self.bodies.is_empty() {
            log::warn!(
                "Replacing the physics world with {} live bodies attached",
                self.bodies.len()
            );
        }
        self.physics = Some(physics);
    }

    pub fn has_physics(&self) -> bool {
        self.physics.is_some()
    }

    pub fn physics(&self) -> Option<&dyn PhysicsWorld> {
        match &self.physics {
            Some(physics) => Some(&**physics),
            None => None,
        }
    }

    pub fn physics_mut(&mut self) -> Option<&mut dyn PhysicsWorld> {
        match &mut self.physics {
            Some(physics) => Some(&mut **physics),
            None => None,
        }
    }

    /// Scene units per physics unit.
    pub fn physics_scale(&self) -> f32 {
        self.physics_scale
    }

    pub fn set_physics_scale(&mut self, scale: f32) {
        self.physics_scale = scale;
    }

    pub(crate) fn track_body(&mut self, id: ComponentId) {
        if !self.bodies.contains(&id) {
            self.bodies.push(id);
        }
    }

    pub(crate) fn untrack_body(&mut self, id: ComponentId) {
        self.bodies.retain(|&b| b != id);
    }

    /// Advance the physics world and sync every live body.
    pub fn step_physics(&mut self, dt: f32) {
        let Some(physics) = self.physics.as_mut() else {
            return;
        };
        physics.step(dt);
        self.sync_bodies();
    }

    /// Copy each live body's simulated position and rotation into its
    /// [`PhysicsBody`] component.
    pub fn sync_bodies(&mut self) {
        let Some(physics) = self.physics.as_deref() else {
            return;
        };
        for &id in &self.bodies {
            let Some(body) = self
                .components
                .get_mut(id)
                .and_then(|slot| slot.component.as_deref_mut())
                .and_then(|c| c.downcast_mut::<PhysicsBody>())
            else {
                continue;
            };
            let Some(handle) = body.handle() else {
                continue;
            };
            if let (Some(position), Some(rotation)) =
                (physics.position(handle), physics.rotation(handle))
            {
                body.sync(position, rotation);
            }
        }
    }

    // ── Audio, Fonts & Assets ────────────────────────────────────────

    pub fn set_audio(&mut self, audio: Box<dyn AudioBackend>) {
        self.audio = Some(audio);
    }

    pub fn set_fonts(&mut self, fonts: Box<dyn FontBackend>) {
        self.fonts = Some(fonts);
    }

    pub(crate) fn audio_mut(&mut self) -> Option<&mut dyn AudioBackend> {
        match &mut self.audio {
            Some(audio) => Some(&mut **audio),
            None => None,
        }
    }

    pub(crate) fn fonts_mut(&mut self) -> Option<&mut dyn FontBackend> {
        match &mut self.fonts {
            Some(fonts) => Some(&mut **fonts),
            None => None,
        }
    }

    pub fn assets(&self) -> &Assets {
        &self.assets
    }

    pub fn assets_mut(&mut self) -> &mut Assets {
        &mut self.assets
    }

    pub fn texture(&self, name: &str) -> Option<Texture> {
        self.assets
            .try_texture(name)
            .inspect_err(|e| log::warn!("{e}"))
            .ok()
    }

    pub fn sound(&self, name: &str) -> Option<SoundHandle> {
        self.assets
            .try_sound(name)
            .inspect_err(|e| log::warn!("{e}"))
            .ok()
    }

    pub fn font(&self, name: &str) -> Option<FontHandle> {
        self.assets
            .try_font(name)
            .inspect_err(|e| log::warn!("{e}"))
            .ok()
    }

    /// Play a named sound. `false` if the name or the audio device is missing.
    pub fn play_sound(&mut self, name: &str) -> bool {
        let Some(sound) = self.sound(name) else {
            return false;
        };
        match self.audio_mut() {
            Some(audio) => audio.play(sound),
            None => {
                log::warn!("No audio device; sound '{name}' not played");
                false
            }
        }
    }

    /// Render `text` with a named font.
    pub fn render_text(&mut self, font: &str, text: &str, color: Color) -> Option<RenderedText> {
        let handle = self.font(font)?;
        let Some(fonts) = self.fonts_mut() else {
            log::warn!("No font backend; cannot render '{text}'");
            return None;
        };
        fonts.render_text(handle, text, color)
    }

    /// Render `text` with a named font over a named outline font.
    pub fn render_outlined_text(
        &mut self,
        font: &str,
        outline: &str,
        text: &str,
        color: Color,
        outline_color: Color,
    ) -> Option<RenderedText> {
        let handle = self.font(font)?;
        let outline = self.font(outline)?;
        let Some(fonts) = self.fonts_mut() else {
            log::warn!("No font backend; cannot render '{text}'");
            return None;
        };
        fonts.render_outlined_text(handle, outline, text, color, outline_color)
    }

    /// Release a texture returned by [`render_text`](Self::render_text).
    pub fn release_text(&mut self, texture: TextureHandle) {
        if let Some(fonts) = self.fonts_mut() {
            fonts.release_text(texture);
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("entities", &self.entities.len())
            .field("components", &self.components.len())
            .field("roots", &self.roots)
            .field("camera", &self.camera)
            .finish_non_exhaustive()
    }
}
