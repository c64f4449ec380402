//! # Handles — Stable Identities for Entities and Components
//!
//! Entities and components reference each other in both directions: a parent
//! lists its children, a child points back at its parent, an entity lists its
//! components and every component knows its owner. Rather than storing those
//! links as pointers, both live in an [`Arena`] and refer to each other by
//! **generational handle**.
//!
//! ## Generational Indices
//!
//! A handle is a slot index plus a generation counter. When a slot is freed
//! its generation is bumped, so a handle saved before the free no longer
//! matches:
//!
//! ```text
//! Entity { index: 5, generation: 0 }  ← original
//! Entity { index: 5, generation: 1 }  ← after recycle
//! ```
//!
//! Lookups with the stale handle fail safely. This is what makes destroying an
//! already-destroyed entity a no-op instead of a use-after-free.

use std::fmt;
use std::marker::PhantomData;

/// Slot index + generation, shared by every handle type.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RawHandle {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

/// A handle type an [`Arena`] can be keyed by.
pub trait ArenaKey: Copy {
    fn from_raw(raw: RawHandle) -> Self;
    fn raw(self) -> RawHandle;
}

macro_rules! handle_type {
    ($(#[$meta:meta])* $name:ident, $tag:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(RawHandle);

        impl $name {
            /// Returns the raw slot index. Useful for diagnostics.
            pub fn index(self) -> u32 {
                self.0.index
            }

            /// Returns the generation. Useful for diagnostics.
            pub fn generation(self) -> u32 {
                self.0.generation
            }
        }

        impl ArenaKey for $name {
            fn from_raw(raw: RawHandle) -> Self {
                Self(raw)
            }

            fn raw(self) -> RawHandle {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({}v{})", $tag, self.0.index, self.0.generation)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}v{}", self.0.index, self.0.generation)
            }
        }
    };
}

handle_type!(
    /// A handle to an entity node in the [`World`](super::world::World).
    Entity,
    "Entity"
);

handle_type!(
    /// A handle to a component stored in the [`World`](super::world::World).
    ComponentId,
    "Component"
);

/// Manages slot allocation and recycling.
///
/// ```text
/// generations: [0, 1, 0, 2, 0]   ← one generation per slot ever allocated
/// free_list:   [1, 3]             ← slots available for reuse
/// len:         5                   ← next fresh index (if free_list is empty)
/// ```
pub(crate) struct Allocator {
    generations: Vec<u32>,
    free_list: Vec<u32>,
    len: u32,
}

impl Allocator {
    pub fn new() -> Self {
        Self {
            generations: Vec::new(),
            free_list: Vec::new(),
            len: 0,
        }
    }

    pub fn allocate(&mut self) -> RawHandle {
        if let Some(index) = self.free_list.pop() {
            // Generation was already bumped on dealloc.
            let generation = self.generations[index as usize];
            RawHandle { index, generation }
        } else {
            let index = self.len;
            self.len += 1;
            self.generations.push(0);
            RawHandle {
                index,
                generation: 0,
            }
        }
    }

    /// Returns `false` if the handle was already stale.
    pub fn deallocate(&mut self, handle: RawHandle) -> bool {
        let idx = handle.index as usize;
        if idx < self.generations.len() && self.generations[idx] == handle.generation {
            self.generations[idx] += 1;
            self.free_list.push(handle.index);
            true
        } else {
            false
        }
    }

    pub fn is_alive(&self, handle: RawHandle) -> bool {
        let idx = handle.index as usize;
        idx < self.generations.len() && self.generations[idx] == handle.generation
    }

    pub fn alive_count(&self) -> usize {
        (self.len as usize) - self.free_list.len()
    }
}

/// Generational storage: a `Vec` of optional values addressed by handle.
pub(crate) struct Arena<K: ArenaKey, T> {
    allocator: Allocator,
    items: Vec<Option<T>>,
    _key: PhantomData<K>,
}

impl<K: ArenaKey, T> Arena<K, T> {
    pub fn new() -> Self {
        Self {
            allocator: Allocator::new(),
            items: Vec::new(),
            _key: PhantomData,
        }
    }

    pub fn insert(&mut self, value: T) -> K {
        let raw = self.allocator.allocate();
        let idx = raw.index as usize;
        if idx == self.items.len() {
            self.items.push(Some(value));
        } else {
            self.items[idx] = Some(value);
        }
        K::from_raw(raw)
    }

    pub fn remove(&mut self, key: K) -> Option<T> {
        let raw = key.raw();
        if !self.allocator.deallocate(raw) {
            return None;
        }
        self.items[raw.index as usize].take()
    }

    pub fn contains(&self, key: K) -> bool {
        self.allocator.is_alive(key.raw())
    }

    pub fn get(&self, key: K) -> Option<&T> {
        let raw = key.raw();
        if !self.allocator.is_alive(raw) {
            return None;
        }
        self.items[raw.index as usize].as_ref()
    }

    pub fn get_mut(&mut self, key: K) -> Option<&mut T> {
        let raw = key.raw();
        if !self.allocator.is_alive(raw) {
            return None;
        }
        self.items[raw.index as usize].as_mut()
    }

    pub fn len(&self) -> usize {
        self.allocator.alive_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_sequential() {
        let mut alloc = Allocator::new();
        let a = alloc.allocate();
        let b = alloc.allocate();
        assert_eq!((a.index, a.generation), (0, 0));
        assert_eq!((b.index, b.generation), (1, 0));
    }

    #[test]
    fn recycle_bumps_generation() {
        let mut alloc = Allocator::new();
        let a = alloc.allocate();
        assert!(alloc.deallocate(a));
        let reused = alloc.allocate();
        assert_eq!(reused.index, 0);
        assert_eq!(reused.generation, 1);
        assert!(!alloc.is_alive(a));
    }

    #[test]
    fn double_free_returns_false() {
        let mut alloc = Allocator::new();
        let a = alloc.allocate();
        assert!(alloc.deallocate(a));
        assert!(!alloc.deallocate(a));
    }

    #[test]
    fn arena_stale_handle_misses() {
        let mut arena: Arena<Entity, &str> = Arena::new();
        let first = arena.insert("first");
        assert_eq!(arena.remove(first), Some("first"));
        let second = arena.insert("second");
        assert_eq!(first.index(), second.index());
        assert!(arena.get(first).is_none());
        assert_eq!(arena.get(second), Some(&"second"));
        assert_eq!(arena.remove(first), None);
        assert_eq!(arena.len(), 1);
    }
}
