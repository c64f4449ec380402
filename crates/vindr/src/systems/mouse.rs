//! # Mouse Routing — Click Hit-Testing and Hover Transitions
//!
//! Both systems hit-test against the owner's [`MouseBox`], centered on the
//! owner's resolved screen position. When the owner has no `MouseBox` (or no
//! `Transform` to center it on), listeners receive every event.
//!
//! ## Hover State Machine
//!
//! ```text
//!            inside / enter, move
//!   ┌──────┐ ───────────────────▶ ┌──────────┐
//!   │ Idle │                      │ Hovering │ ◀─┐ inside / move
//!   └──────┘ ◀─────────────────── └──────────┘ ──┘
//!            outside / leave
//! ```
//!
//! The state lives on the `MouseBox`, so every hover listener on the same
//! entity shares it. The transition is computed once per entity per event
//! and replayed to each listener, so two listeners on one box both see the
//! same `mouse_enter`.

use std::collections::HashMap;

use crate::components::mouse_box::{HoverState, MouseBox};
use crate::ecs::component::Capabilities;
use crate::ecs::entity::{ComponentId, Entity};
use crate::ecs::world::World;
use crate::input::MouseButtonEvent;
use crate::math::Vec2;
use crate::systems::{DispatchList, System};

/// `true` if `point` falls strictly inside the owner's box, or the owner
/// opts out of hit-testing.
fn hit(world: &World, owner: Entity, point: Vec2) -> bool {
    let Some(mouse_box) = world.get::<MouseBox>(owner) else {
        return true;
    };
    let Some(center) = world.resolve_screen_position(owner) else {
        return true;
    };
    mouse_box.rect(center).contains(point)
}

macro_rules! list_system {
    ($ty:ident, $name:literal, $cap:expr) => {
        impl System for $ty {
            fn name(&self) -> &'static str {
                $name
            }

            fn capability(&self) -> Capabilities {
                $cap
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
    };
}

#[derive(Debug, Default)]
pub struct MouseClickSystem {
    list: DispatchList,
}

list_system!(MouseClickSystem, "MouseClickSystem", Capabilities::MOUSE_CLICK);

impl MouseClickSystem {
    /// Route a button press (`pressed`) or release to every click listener
    /// whose box contains the event position.
    pub fn run(world: &mut World, event: &MouseButtonEvent, pressed: bool) {
        let slots = world.systems().click.list.slot_count();
        for slot in 0..slots {
            let Some(id) = world.systems().click.list.get(slot) else {
                continue;
            };
            let Some(owner) = world.owner(id) else {
                continue;
            };
            if !world.is_dispatchable(id) || !hit(world, owner, event.position) {
                continue;
            }
            log::trace!("click {pressed} -> {id:?}");
            world.dispatch(id, |component, ctx| {
                if let Some(listener) = component.as_mouse_click() {
                    if pressed {
                        listener.mouse_down(ctx, event);
                    } else {
                        listener.mouse_up(ctx, event);
                    }
                }
            });
        }
    }
}

/// What one cursor movement means for one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Hover {
    /// No box: plain move.
    Unboxed,
    Enter,
    Stay,
    Leave,
    /// Outside and already idle.
    Outside,
}

fn hover_transition(world: &mut World, owner: Entity, point: Vec2) -> Hover {
    let Some(center) = world.resolve_screen_position(owner) else {
        return Hover::Unboxed;
    };
    let Some(mouse_box) = world.get_mut::<MouseBox>(owner) else {
        return Hover::Unboxed;
    };
    let inside = mouse_box.rect(center).contains(point);
    match (mouse_box.state, inside) {
        (HoverState::Idle, true) => {
            mouse_box.state = HoverState::Hovering;
            Hover::Enter
        }
        (HoverState::Hovering, true) => Hover::Stay,
        (HoverState::Hovering, false) => {
            mouse_box.state = HoverState::Idle;
            Hover::Leave
        }
        (HoverState::Idle, false) => Hover::Outside,
    }
}

#[derive(Debug, Default)]
pub struct MouseHoverSystem {
    list: DispatchList,
}

list_system!(MouseHoverSystem, "MouseHoverSystem", Capabilities::MOUSE_HOVER);

impl MouseHoverSystem {
    /// Route a cursor movement to every hover listener.
    pub fn run(world: &mut World, position: Vec2) {
        let mut transitions: HashMap<Entity, Hover> = HashMap::new();
        let slots = world.systems().hover.list.slot_count();
        for slot in 0..slots {
            let Some(id) = world.systems().hover.list.get(slot) else {
                continue;
            };
            let Some(owner) = world.owner(id) else {
                continue;
            };
            if !world.is_dispatchable(id) {
                continue;
            }
            let hover = match transitions.get(&owner) {
                Some(&hover) => hover,
                None => {
                    let hover = hover_transition(world, owner, position);
                    transitions.insert(owner, hover);
                    hover
                }
            };
            if hover == Hover::Outside {
                continue;
            }
            log::trace!("hover {hover:?} -> {id:?}");
            world.dispatch(id, |component, ctx| {
                let Some(listener) = component.as_mouse_hover() else {
                    return;
                };
                match hover {
                    Hover::Unboxed | Hover::Stay => listener.mouse_move(ctx, position),
                    Hover::Enter => {
                        listener.mouse_enter(ctx);
                        listener.mouse_move(ctx, position);
                    }
                    Hover::Leave => listener.mouse_leave(ctx),
                    Hover::Outside => {}
                }
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::MouseButton;
    use crate::testing::{Probe, new_log};

    fn boxed_listener(world: &mut World, log: &crate::testing::Log, caps: Capabilities) -> Entity {
        let e = world.spawn_at(100.0, 100.0);
        world.add_component(e, MouseBox::new(20.0, 10.0));
        world.add_component(e, Probe::new("p", log, caps));
        world.add_entity(e);
        log.borrow_mut().clear();
        e
    }

    fn press(x: f32, y: f32) -> MouseButtonEvent {
        MouseButtonEvent {
            position: Vec2::new(x, y),
            button: MouseButton::Left,
        }
    }

    #[test]
    fn click_only_inside_box() {
        let log = new_log();
        let mut world = World::new();
        boxed_listener(&mut world, &log, Capabilities::MOUSE_CLICK);

        MouseClickSystem::run(&mut world, &press(105.0, 102.0), true);
        MouseClickSystem::run(&mut world, &press(150.0, 100.0), true);
        // Border is outside.
        MouseClickSystem::run(&mut world, &press(110.0, 100.0), false);
        MouseClickSystem::run(&mut world, &press(95.0, 98.0), false);
        assert_eq!(*log.borrow(), vec!["p:mouse_down", "p:mouse_up"]);
    }

    #[test]
    fn click_without_box_is_unconditional() {
        let log = new_log();
        let mut world = World::new();
        let e = world.spawn_at(0.0, 0.0);
        world.add_component(e, Probe::new("p", &log, Capabilities::MOUSE_CLICK));
        world.add_entity(e);
        log.borrow_mut().clear();

        MouseClickSystem::run(&mut world, &press(500.0, 500.0), true);
        assert_eq!(*log.borrow(), vec!["p:mouse_down"]);
    }

    #[test]
    fn hit_test_follows_camera() {
        let log = new_log();
        let mut world = World::new();
        boxed_listener(&mut world, &log, Capabilities::MOUSE_CLICK);
        world.set_camera(Vec2::new(50.0, 0.0));

        // Scene (100, 100) is now on screen at (50, 100).
        MouseClickSystem::run(&mut world, &press(100.0, 100.0), true);
        MouseClickSystem::run(&mut world, &press(50.0, 100.0), true);
        assert_eq!(*log.borrow(), vec!["p:mouse_down"]);
    }

    #[test]
    fn hover_sequence_enter_move_move_leave() {
        let log = new_log();
        let mut world = World::new();
        let e = boxed_listener(&mut world, &log, Capabilities::MOUSE_HOVER);
        assert_eq!(world.get::<MouseBox>(e).unwrap().state, HoverState::Idle);

        for (x, y) in [(0.0, 0.0), (100.0, 100.0), (101.0, 101.0), (300.0, 0.0)] {
            MouseHoverSystem::run(&mut world, Vec2::new(x, y));
        }
        assert_eq!(
            *log.borrow(),
            vec!["p:mouse_enter", "p:mouse_move", "p:mouse_move", "p:mouse_leave"]
        );
        assert!(!world.get::<MouseBox>(e).unwrap().is_hovering());
    }

    #[test]
    fn listeners_sharing_a_box_share_the_transition() {
        let log = new_log();
        let mut world = World::new();
        let e = world.spawn_at(0.0, 0.0);
        world.add_component(e, MouseBox::new(10.0, 10.0));
        world.add_component(e, Probe::new("a", &log, Capabilities::MOUSE_HOVER));
        world.add_component(e, Probe::new("b", &log, Capabilities::MOUSE_HOVER));
        world.add_entity(e);
        log.borrow_mut().clear();

        MouseHoverSystem::run(&mut world, Vec2::ZERO);
        assert_eq!(
            *log.borrow(),
            vec!["a:mouse_enter", "a:mouse_move", "b:mouse_enter", "b:mouse_move"]
        );
    }

    #[test]
    fn hover_without_box_always_moves() {
        let log = new_log();
        let mut world = World::new();
        let e = world.spawn();
        world.add_component(e, Probe::new("p", &log, Capabilities::MOUSE_HOVER));
        world.add_entity(e);
        log.borrow_mut().clear();

        MouseHoverSystem::run(&mut world, Vec2::new(1.0, 1.0));
        MouseHoverSystem::run(&mut world, Vec2::new(900.0, 900.0));
        assert_eq!(*log.borrow(), vec!["p:mouse_move", "p:mouse_move"]);
    }
}
