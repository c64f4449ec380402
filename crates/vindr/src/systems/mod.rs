//! # Systems — Per-Capability Dispatch
//!
//! A system is a filter plus an iterator over one capability slice of the
//! registered components. When an entity is registered, every one of its
//! components is offered to every system; each system keeps the ones whose
//! [`Capabilities`] include its own and ignores the rest.
//!
//! | System | Capability | Order |
//! |---|---|---|
//! | [`DrawSystem`] | draw | layer ascending, then insertion |
//! | [`UpdateSystem`] | update | insertion |
//! | [`MouseClickSystem`] | mouse click | insertion |
//! | [`MouseHoverSystem`] | mouse hover | insertion |
//! | [`KeyboardSystem`] | keyboard | insertion |
//!
//! ## Lazy Removal
//!
//! Lists live inside the [`World`](crate::ecs::World), and callbacks get the
//! world mutably, so a component can be withdrawn while its system is
//! iterating. [`DispatchList`] handles that by nulling the slot in place:
//!
//! ```text
//! entries: [Some(a), None, Some(c), None, Some(e)]
//!                    ^ removed        ^ removed
//! index:   { a: 0, c: 2, e: 4 }
//! ```
//!
//! Dispatch walks slots by position and skips the holes. Holes are squeezed
//! out by [`DispatchList::compact`], which the engine calls at the start of a
//! frame once a system's last compaction is older than the configured
//! interval. A pass never observes a compaction.
//!
//! Each pass snapshots the slot count before it starts, so components added
//! during a pass are first visited on the next one.

use std::collections::HashMap;

use crate::ecs::component::Capabilities;
use crate::ecs::entity::ComponentId;

pub mod draw;
pub mod keyboard;
pub mod mouse;
pub mod update;

pub use draw::{DrawSystem, MAX_LAYER, MIN_LAYER};
pub use keyboard::KeyboardSystem;
pub use mouse::{MouseClickSystem, MouseHoverSystem};
pub use update::UpdateSystem;

/// An insertion-ordered list of component ids with O(1) removal.
#[derive(Debug, Default)]
pub struct DispatchList {
    entries: Vec<Option<ComponentId>>,
    index: HashMap<ComponentId, usize>,
    last_compaction: f64,
}

impl DispatchList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `id`. Returns `false` if it is already listed.
    pub fn push(&mut self, id: ComponentId) -> bool {
        if self.index.contains_key(&id) {
            return false;
        }
        self.index.insert(id, self.entries.len());
        self.entries.push(Some(id));
        true
    }

    /// Null the slot holding `id`. Returns `false` if it was not listed.
    pub fn remove(&mut self, id: ComponentId) -> bool {
        match self.index.remove(&id) {
            Some(slot) => {
                self.entries[slot] = None;
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, id: ComponentId) -> bool {
        self.index.contains_key(&id)
    }

    /// The id at slot `slot`, or `None` for a hole or out-of-range slot.
    pub fn get(&self, slot: usize) -> Option<ComponentId> {
        self.entries.get(slot).copied().flatten()
    }

    /// Number of slots, holes included. Dispatch iterates `0..slot_count()`.
    pub fn slot_count(&self) -> usize {
        self.entries.len()
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Number of holes awaiting compaction.
    pub fn stale(&self) -> usize {
        self.entries.len() - self.index.len()
    }

    /// Live entries in dispatch order.
    pub fn iter(&self) -> impl Iterator<Item = ComponentId> + '_ {
        self.entries.iter().filter_map(|e| *e)
    }

    /// Drop holes, preserving order. Returns the number reclaimed.
    pub fn compact(&mut self, now: f64) -> usize {
        self.last_compaction = now;
        let reclaimed = self.stale();
        if reclaimed == 0 {
            return 0;
        }
        self.entries.retain(Option::is_some);
        for (slot, entry) in self.entries.iter().enumerate() {
            if let Some(id) = entry {
                self.index.insert(*id, slot);
            }
        }
        reclaimed
    }

    pub fn last_compaction(&self) -> f64 {
        self.last_compaction
    }
}

/// Common surface of the five dispatchers.
pub trait System {
    fn name(&self) -> &'static str;

    /// The capability a component needs to be accepted.
    fn capability(&self) -> Capabilities;

    fn accepts(&self, capabilities: Capabilities) -> bool {
        capabilities.contains(self.capability())
    }

    /// Add `id`; `layer` is only meaningful to the draw system.
    fn insert(&mut self, id: ComponentId, layer: i32);

    fn remove(&mut self, id: ComponentId) -> bool;

    fn contains(&self, id: ComponentId) -> bool;

    /// Live entries.
    fn len(&self) -> usize;

    fn compact(&mut self, now: f64) -> usize;

    fn last_compaction(&self) -> f64;
}

/// The five systems, owned by the world.
#[derive(Debug, Default)]
pub struct Systems {
    pub draw: DrawSystem,
    pub update: UpdateSystem,
    pub click: MouseClickSystem,
    pub hover: MouseHoverSystem,
    pub keyboard: KeyboardSystem,
}

impl Systems {
    pub fn new() -> Self {
        Self::default()
    }

    fn all_mut(&mut self) -> [&mut dyn System; 5] {
        [
            &mut self.draw,
            &mut self.update,
            &mut self.click,
            &mut self.hover,
            &mut self.keyboard,
        ]
    }

    /// Offer a component to every system.
    pub(crate) fn register(&mut self, id: ComponentId, capabilities: Capabilities, layer: i32) {
        for system in self.all_mut() {
            if system.accepts(capabilities) {
                system.insert(id, layer);
            }
        }
    }

    /// Withdraw a component from every system that holds it.
    pub(crate) fn unregister(&mut self, id: ComponentId) {
        for system in self.all_mut() {
            system.remove(id);
        }
    }

    /// Compact every system whose last compaction is at least `interval`
    /// seconds before `now`.
    pub(crate) fn compact_due(&mut self, now: f64, interval: f64) -> usize {
        let mut reclaimed = 0;
        for system in self.all_mut() {
            if now - system.last_compaction() >= interval {
                let n = system.compact(now);
                if n > 0 {
                    log::debug!("{}: compaction reclaimed {n} stale entries", system.name());
                }
                reclaimed += n;
            }
        }
        reclaimed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::entity::{ArenaKey, RawHandle};

    fn id(index: u32) -> ComponentId {
        ComponentId::from_raw(RawHandle {
            index,
            generation: 0,
        })
    }

    #[test]
    fn push_is_deduplicated() {
        let mut list = DispatchList::new();
        assert!(list.push(id(1)));
        assert!(!list.push(id(1)));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn remove_leaves_hole_until_compaction() {
        let mut list = DispatchList::new();
        for i in 0..4 {
            list.push(id(i));
        }
        assert!(list.remove(id(1)));
        assert!(!list.remove(id(1)));

        assert_eq!(list.slot_count(), 4);
        assert_eq!(list.get(1), None);
        assert_eq!(list.stale(), 1);
        assert_eq!(list.iter().collect::<Vec<_>>(), vec![id(0), id(2), id(3)]);

        assert_eq!(list.compact(1.0), 1);
        assert_eq!(list.slot_count(), 3);
        assert_eq!(list.stale(), 0);
        assert_eq!(list.last_compaction(), 1.0);
        assert_eq!(list.iter().collect::<Vec<_>>(), vec![id(0), id(2), id(3)]);

        // Index is rebuilt: removal after compaction still hits the right slot.
        assert!(list.remove(id(3)));
        assert_eq!(list.iter().collect::<Vec<_>>(), vec![id(0), id(2)]);
    }

    #[test]
    fn systems_filter_by_capability() {
        let mut systems = Systems::new();
        systems.register(id(0), Capabilities::UPDATE | Capabilities::KEYBOARD, 0);
        systems.register(id(1), Capabilities::DRAW, 3);
        systems.register(id(2), Capabilities::NONE, 0);

        assert!(systems.update.contains(id(0)));
        assert!(systems.keyboard.contains(id(0)));
        assert!(!systems.draw.contains(id(0)));
        assert!(systems.draw.contains(id(1)));
        assert_eq!(systems.update.len() + systems.draw.len() + systems.click.len(), 2);

        systems.unregister(id(0));
        assert!(!systems.update.contains(id(0)));
        assert!(!systems.keyboard.contains(id(0)));
    }

    #[test]
    fn compaction_respects_interval() {
        let mut systems = Systems::new();
        systems.register(id(0), Capabilities::UPDATE, 0);
        systems.register(id(1), Capabilities::UPDATE, 0);
        systems.unregister(id(0));

        assert_eq!(systems.compact_due(0.5, 1.0), 0);
        assert_eq!(systems.compact_due(1.0, 1.0), 1);
        assert_eq!(systems.update.len(), 1);
    }
}
