//! Keyboard dispatch and the process-wide key-state table.
//!
//! The table is updated before listeners run, so a listener (or any other
//! consumer between events) querying [`World::key_pressed`] sees the state
//! including the event being dispatched.

use std::collections::HashMap;

use crate::ecs::component::Capabilities;
use crate::ecs::entity::ComponentId;
use crate::ecs::world::World;
use crate::input::KeyCode;
use crate::systems::{DispatchList, System};

#[derive(Debug, Default)]
pub struct KeyboardSystem {
    list: DispatchList,
    keys: HashMap<KeyCode, bool>,
}

impl KeyboardSystem {
    /// `false` for keys never pressed.
    pub fn is_pressed(&self, key: KeyCode) -> bool {
        self.keys.get(&key).copied().unwrap_or(false)
    }

    /// Record a key transition and forward it to every keyboard listener.
    pub fn run(world: &mut World, key: KeyCode, pressed: bool) {
        world.systems_mut().keyboard.keys.insert(key, pressed);

        let slots = world.systems().keyboard.list.slot_count();
        for slot in 0..slots {
            let Some(id) = world.systems().keyboard.list.get(slot) else {
                continue;
            };
            world.dispatch(id, |component, ctx| {
                if let Some(listener) = component.as_keyboard() {
                    if pressed {
                        listener.key_down(ctx, key);
                    } else {
                        listener.key_up(ctx, key);
                    }
                }
            });
        }
    }
}

impl System for KeyboardSystem {
    fn name(&self) -> &'static str {
        "KeyboardSystem"
    }

    fn capability(&self) -> Capabilities {
        Capabilities::KEYBOARD
    }

    fn insert(&mut self, id: ComponentId, _layer: i32) {
        self.list.push(id);
    }

    fn remove(&mut self, id: ComponentId) -> bool {
        self.list.remove(id)
    }

    fn contains(&self, id: ComponentId) -> bool {
        self.list.contains(id)
    }

    fn len(&self) -> usize {
        self.list.len()
    }

    fn compact(&mut self, now: f64) -> usize {
        self.list.compact(now)
    }

    fn last_compaction(&self) -> f64 {
        self.list.last_compaction()
    }
}
