//! Per-frame update dispatch, in insertion order.

use crate::ecs::component::Capabilities;
use crate::ecs::entity::ComponentId;
use crate::ecs::world::World;
use crate::systems::{DispatchList, System};

#[derive(Debug, Default)]
pub struct UpdateSystem {
    list: DispatchList,
}

impl UpdateSystem {
    /// Live entries in dispatch order.
    pub fn order(&self) -> Vec<ComponentId> {
        self.list.iter().collect()
    }

    /// Run `update(dt)` on every enabled update-capable component.
    pub fn run(world: &mut World, dt: f32) {
        let slots = world.systems().update.list.slot_count();
        for slot in 0..slots {
            let Some(id) = world.systems().update.list.get(slot) else {
                continue;
            };
            world.dispatch(id, |component, ctx| {
                if let Some(updatable) = component.as_updatable() {
                    updatable.update(ctx, dt);
                }
            });
        }
    }
}

impl System for UpdateSystem {
    fn name(&self) -> &'static str {
        "UpdateSystem"
    }

    fn capability(&self) -> Capabilities {
        Capabilities::UPDATE
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
