//! # Draw Dispatch — Layered Back-to-Front Painting
//!
//! Draw-capable components are bucketed by their [`Drawable::layer`] into a
//! fixed range of layers. A pass paints layers in ascending order and, within
//! a layer, in insertion order:
//!
//! ```text
//! layer -10 ... -1   0   1   2 ... 10
//!              [b]      [a, c]          → b, a, c
//! ```
//!
//! The layer is read once, when the component is registered. Layers outside
//! `MIN_LAYER..=MAX_LAYER` are clamped with a warning.
//!
//! [`Drawable::layer`]: crate::ecs::component::Drawable::layer

use std::collections::HashMap;

use crate::ecs::component::Capabilities;
use crate::ecs::entity::ComponentId;
use crate::ecs::world::World;
use crate::render::Renderer;
use crate::systems::{DispatchList, System};

pub const MIN_LAYER: i32 = -10;
pub const MAX_LAYER: i32 = 10;

const LAYER_COUNT: usize = (MAX_LAYER - MIN_LAYER + 1) as usize;

#[derive(Debug)]
pub struct DrawSystem {
    layers: Vec<DispatchList>,
    layer_of: HashMap<ComponentId, usize>,
    last_compaction: f64,
}

impl Default for DrawSystem {
    fn default() -> Self {
        Self {
            layers: (0..LAYER_COUNT).map(|_| DispatchList::new()).collect(),
            layer_of: HashMap::new(),
            last_compaction: 0.0,
        }
    }
}

fn clamp_layer(layer: i32) -> i32 {
    if !(MIN_LAYER..=MAX_LAYER).contains(&layer) {
        log::warn!("Draw layer {layer} out of range {MIN_LAYER}..={MAX_LAYER}; clamped.");
    }
    layer.clamp(MIN_LAYER, MAX_LAYER)
}

impl DrawSystem {
    /// The layer a registered component was filed under.
    pub fn layer_of(&self, id: ComponentId) -> Option<i32> {
        self.layer_of
            .get(&id)
            .map(|&bucket| bucket as i32 + MIN_LAYER)
    }

    /// Live entries in paint order.
    pub fn order(&self) -> Vec<ComponentId> {
        self.layers.iter().flat_map(DispatchList::iter).collect()
    }

    /// Paint every enabled draw-capable component.
    pub fn run(world: &mut World, renderer: &mut dyn Renderer) {
        let snapshot: Vec<usize> = world
            .systems()
            .draw
            .layers
            .iter()
            .map(DispatchList::slot_count)
            .collect();

        for (bucket, slots) in snapshot.into_iter().enumerate() {
            for slot in 0..slots {
                let Some(id) = world.systems().draw.layers[bucket].get(slot) else {
                    continue;
                };
                world.draw_component(id, renderer);
            }
        }
    }
}

impl System for DrawSystem {
    fn name(&self) -> &'static str {
        "DrawSystem"
    }

    fn capability(&self) -> Capabilities {
        Capabilities::DRAW
    }

    fn insert(&mut self, id: ComponentId, layer: i32) {
        if self.layer_of.contains_key(&id) {
            return;
        }
        let bucket = (clamp_layer(layer) - MIN_LAYER) as usize;
        self.layers[bucket].push(id);
        self.layer_of.insert(id, bucket);
    }

    fn remove(&mut self, id: ComponentId) -> bool {
        match self.layer_of.remove(&id) {
            Some(bucket) => self.layers[bucket].remove(id),
            None => false,
        }
    }

    fn contains(&self, id: ComponentId) -> bool {
        self.layer_of.contains_key(&id)
    }

    fn len(&self) -> usize {
        self.layer_of.len()
    }

    fn compact(&mut self, now: f64) -> usize {
        self.last_compaction = now;
        self.layers.iter_mut().map(|list| list.compact(now)).sum()
    }

    fn last_compaction(&self) -> f64 {
        self.last_compaction
    }
}
