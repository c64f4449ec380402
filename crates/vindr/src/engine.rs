//! # Engine — The Frame Loop
//!
//! The [`Engine`] owns the [`World`], the renderer and the event source, and
//! drives them once per frame:
//!
//! ```text
//! ┌─────────────────────────── frame ───────────────────────────┐
//! │ 1. compact systems whose last compaction is older than      │
//! │    `compaction_interval_secs`                               │
//! │ 2. drain events ──► click / hover / keyboard systems        │
//! │                     (Quit requests a stop)                  │
//! │ 3. physics step, then copy body transforms                  │
//! │ 4. UpdateSystem, then custom systems in registration order  │
//! │ 5. clear ──► DrawSystem ──► present                         │
//! └─────────────────────────────────────────────────────────────┘
//!   then sleep out the remainder of the frame budget
//! ```
//!
//! [`Engine::run`] loops until a stop is requested through a [`StopHandle`],
//! [`World::request_stop`], or a `Quit` event. [`Engine::frame`] runs one
//! iteration without timing, which is how the tests drive it.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::assets::AssetKind;
use crate::audio::AudioBackend;
use crate::config::EngineConfig;
use crate::ecs::world::World;
use crate::error::{AssetError, EngineError};
use crate::input::{EventQueue, EventSource, InputEvent};
use crate::physics::PhysicsWorld;
use crate::render::Renderer;
use crate::systems::{DrawSystem, KeyboardSystem, MouseClickSystem, MouseHoverSystem, UpdateSystem};
use crate::text::FontBackend;
use crate::time::{FramePacer, Time};

/// Cooperative stop signal for a running [`Engine`]. Cheap to clone.
#[derive(Debug, Clone)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

struct CustomSystem {
    name: String,
    run: Box<dyn FnMut(&mut World, f32)>,
}

pub struct Engine {
    world: World,
    renderer: Box<dyn Renderer>,
    events: Box<dyn EventSource>,
    config: EngineConfig,
    time: Time,
    pacer: FramePacer,
    custom_systems: Vec<CustomSystem>,
    running: bool,
}

impl Engine {
    /// Build an engine around its two required collaborators. Physics, fonts
    /// and the event source are attached with the `with_*` builders.
    pub fn new(
        config: EngineConfig,
        renderer: Box<dyn Renderer>,
        audio: Box<dyn AudioBackend>,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let mut world = World::new();
        world.set_physics_scale(config.physics_scale);
        world.set_audio(audio);
        Ok(Self {
            world,
            renderer,
            events: Box::new(EventQueue::new()),
            pacer: FramePacer::new(config.target_fps),
            config,
            time: Time::new(),
            custom_systems: Vec::new(),
            running: false,
        })
    }

    /// Attach a physics world, applying the configured gravity.
    pub fn with_physics(mut self, mut physics: Box<dyn PhysicsWorld>) -> Self {
        physics.set_gravity(self.config.gravity());
        self.world.set_physics(physics);
        self
    }

    pub fn with_fonts(mut self, fonts: Box<dyn FontBackend>) -> Self {
        self.world.set_fonts(fonts);
        self
    }

    pub fn with_events(mut self, events: Box<dyn EventSource>) -> Self {
        self.events = events;
        self
    }

    /// Run `system` every frame after the built-in update pass.
    pub fn add_system(&mut self, name: impl Into<String>, system: impl FnMut(&mut World, f32) + 'static) {
        let name = name.into();
        log::debug!("Added system '{name}'");
        self.custom_systems.push(CustomSystem {
            name,
            run: Box::new(system),
        });
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn time(&self) -> &Time {
        &self.time
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle(self.world.stop_flag())
    }

    pub fn set_target_fps(&mut self, target_fps: u32) {
        self.pacer.set_target_fps(target_fps);
    }

    // ── Assets ───────────────────────────────────────────────────────

    pub fn load_texture(&mut self, path: impl AsRef<Path>, name: &str) -> Result<(), AssetError> {
        let path = path.as_ref();
        let texture = self
            .renderer
            .create_texture(path)
            .ok_or_else(|| load_failed(AssetKind::Texture, path))?;
        self.world.assets_mut().insert_texture(name, texture);
        log::info!("Loaded texture '{name}' from {}", path.display());
        Ok(())
    }

    pub fn load_sound(&mut self, path: impl AsRef<Path>, name: &str) -> Result<(), AssetError> {
        let path = path.as_ref();
        let sound = self
            .world
            .audio_mut()
            .and_then(|audio| audio.load_sound(path))
            .ok_or_else(|| load_failed(AssetKind::Sound, path))?;
        self.world.assets_mut().insert_sound(name, sound);
        log::info!("Loaded sound '{name}' from {}", path.display());
        Ok(())
    }

    /// Load a font at a pixel size. A non-zero `outline` loads the outline
    /// variant used by outlined labels.
    pub fn load_font(
        &mut self,
        path: impl AsRef<Path>,
        name: &str,
        size: u32,
        outline: u32,
    ) -> Result<(), AssetError> {
        let path = path.as_ref();
        let Some(fonts) = self.world.fonts_mut() else {
            log::warn!("No font backend attached; cannot load '{}'", path.display());
            return Err(load_failed(AssetKind::Font, path));
        };
        let font = fonts
            .load_font(path, size, outline)
            .ok_or_else(|| load_failed(AssetKind::Font, path))?;
        self.world.assets_mut().insert_font(name, font);
        log::info!("Loaded font '{name}' from {}", path.display());
        Ok(())
    }

    // ── Loop ─────────────────────────────────────────────────────────

    /// Run frames until a stop is requested.
    pub fn run(&mut self) {
        if self.running {
            log::warn!("Engine is already running");
            return;
        }
        self.running = true;
        log::info!(
            "Starting '{}' at {} fps",
            self.config.title,
            self.config.target_fps
        );

        let max_delta = Duration::try_from_secs_f32(self.config.max_frame_dt_secs)
            .unwrap_or(Duration::from_millis(250));
        self.time = Time::new();
        while !self.world.stop_requested() {
            self.time.tick(Instant::now(), max_delta);
            let (dt, now) = (self.time.delta_secs(), self.time.elapsed_secs_f64());
            self.frame(dt, now);
            self.pacer.wait(self.time.frame_start());
        }

        self.running = false;
        log::info!("Stopped after {} frames", self.time.frame_count());
    }

    /// One frame: compaction, events, physics, update, draw. `now` is the
    /// time in seconds since startup.
    pub fn frame(&mut self, dt: f32, now: f64) {
        let interval = f64::from(self.config.compaction_interval_secs);
        self.world.systems_mut().compact_due(now, interval);

        self.process_events();

        self.world.step_physics(dt);

        UpdateSystem::run(&mut self.world, dt);
        for system in &mut self.custom_systems {
            log::trace!("Running system '{}'", system.name);
            (system.run)(&mut self.world, dt);
        }

        self.renderer.clear(self.config.clear_color);
        DrawSystem::run(&mut self.world, self.renderer.as_mut());
        self.renderer.present();
    }

    /// Drain the event source and route every event.
    pub fn process_events(&mut self) {
        while let Some(event) = self.events.poll_event() {
            log::trace!("Event {event:?}");
            match event {
                InputEvent::Quit => {
                    log::info!("Quit requested");
                    self.world.request_stop();
                }
                InputEvent::MouseMoved(position) => MouseHoverSystem::run(&mut self.world, position),
                InputEvent::MouseButton { event, pressed } => {
                    MouseClickSystem::run(&mut self.world, &event, pressed)
                }
                InputEvent::Key { key, pressed } => KeyboardSystem::run(&mut self.world, key, pressed),
            }
        }
    }
}

fn load_failed(kind: AssetKind, path: &Path) -> AssetError {
    log::warn!("Failed to load {kind} '{}'", path.display());
    AssetError::Load {
        kind,
        path: path.to_path_buf(),
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.world.destroy_all();
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("world", &self.world)
            .field("config", &self.config)
            .field("custom_systems", &self.custom_systems.len())
            .field("running", &self.running)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{MouseBox, Sprite};
    use crate::ecs::Capabilities;
    use crate::input::{KeyCode, MouseButton, MouseButtonEvent};
    use crate::math::{Color, Vec2};
    use crate::physics::PhysicsBody;
    use crate::testing::{FakeAudio, FakeFonts, FakePhysics, Probe, RecordingRenderer, new_log};

    fn engine(renderer: &RecordingRenderer) -> Engine {
        Engine::new(
            EngineConfig::default(),
            Box::new(renderer.clone()),
            Box::new(FakeAudio::new()),
        )
        .unwrap()
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = EngineConfig {
            target_fps: 0,
            ..Default::default()
        };
        let result = Engine::new(
            config,
            Box::new(RecordingRenderer::new()),
            Box::new(FakeAudio::new()),
        );
        assert!(matches!(result, Err(EngineError::Config(_))));
    }

    #[test]
    fn frame_clears_draws_presents() {
        let renderer = RecordingRenderer::new();
        let mut engine = engine(&renderer);
        engine.load_texture("hero.png", "hero").unwrap();
        let world = engine.world_mut();
        let e = world.spawn_at(50.0, 50.0);
        let sprite = Sprite::from_texture(world, "hero", 0.0, 0.0).unwrap();
        world.add_component(e, sprite);
        world.add_entity(e);

        engine.frame(0.016, 0.016);
        assert_eq!(renderer.clears(), vec![Color::BLACK]);
        assert_eq!(renderer.draws().len(), 1);
        assert_eq!(renderer.presents(), 1);
    }

    #[test]
    fn asset_loading_reports_failures() {
        let renderer = RecordingRenderer::new();
        let mut engine = engine(&renderer);

        assert!(engine.load_texture("a.png", "a").is_ok());
        assert!(engine.world().texture("a").is_some());
        assert_eq!(
            engine.load_texture("missing.png", "b"),
            Err(AssetError::Load {
                kind: AssetKind::Texture,
                path: "missing.png".into()
            })
        );
        assert!(engine.load_sound("click.wav", "click").is_ok());
        assert!(engine.load_sound("missing.wav", "x").is_err());

        // No font backend yet.
        assert!(engine.load_font("ui.ttf", "ui", 16, 0).is_err());
        let mut engine = engine.with_fonts(Box::new(FakeFonts::new()));
        assert!(engine.load_font("ui.ttf", "ui", 16, 0).is_ok());
        assert!(engine.world().font("ui").is_some());
    }

    #[test]
    fn asset_failures_propagate_as_engine_errors() {
        fn load_all(engine: &mut Engine) -> Result<(), EngineError> {
            engine.load_texture("hero.png", "hero")?;
            engine.load_sound("missing.wav", "boom")?;
            engine.load_texture("never.png", "never")?;
            Ok(())
        }

        let renderer = RecordingRenderer::new();
        let mut engine = engine(&renderer);
        let err = load_all(&mut engine).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Asset(AssetError::Load {
                kind: AssetKind::Sound,
                ..
            })
        ));
        assert!(engine.world().texture("hero").is_some());
        assert!(engine.world().texture("never").is_none());
    }

    #[test]
    fn events_are_routed_then_update_runs() {
        let log = new_log();
        let renderer = RecordingRenderer::new();
        let mut queue = EventQueue::new();
        queue.push(InputEvent::Key {
            key: KeyCode::KeyW,
            pressed: true,
        });
        queue.push(InputEvent::MouseButton {
            event: MouseButtonEvent {
                position: Vec2::new(100.0, 100.0),
                button: MouseButton::Left,
            },
            pressed: true,
        });
        let mut engine = engine(&renderer).with_events(Box::new(queue));
        let world = engine.world_mut();
        let e = world.spawn_at(100.0, 100.0);
        world.add_component(e, MouseBox::new(10.0, 10.0));
        world.add_component(
            e,
            Probe::new(
                "p",
                &log,
                Capabilities::UPDATE | Capabilities::KEYBOARD | Capabilities::MOUSE_CLICK,
            ),
        );
        world.add_entity(e);
        log.borrow_mut().clear();

        engine.frame(0.016, 0.016);
        assert_eq!(*log.borrow(), vec!["p:key_down", "p:mouse_down", "p:update"]);
        assert!(engine.world().key_pressed(KeyCode::KeyW));
    }

    #[test]
    fn quit_event_stops_the_loop() {
        let renderer = RecordingRenderer::new();
        let mut queue = EventQueue::new();
        queue.push(InputEvent::Quit);
        let mut engine = engine(&renderer).with_events(Box::new(queue));

        engine.run();
        assert!(engine.world().stop_requested());
        assert!(!engine.is_running());
        assert_eq!(renderer.presents(), 1);
    }

    #[test]
    fn stop_handle_before_run_runs_no_frames() {
        let renderer = RecordingRenderer::new();
        let mut engine = engine(&renderer);
        let handle = engine.stop_handle();
        handle.stop();
        assert!(handle.is_stopped());

        engine.run();
        assert_eq!(renderer.presents(), 0);
    }

    #[test]
    fn custom_systems_run_after_update_in_order() {
        let log = new_log();
        let renderer = RecordingRenderer::new();
        let mut engine = engine(&renderer);
        let world = engine.world_mut();
        let e = world.spawn();
        world.add_component(e, Probe::new("p", &log, Capabilities::UPDATE));
        world.add_entity(e);
        log.borrow_mut().clear();

        for name in ["first", "second"] {
            let log = log.clone();
            engine.add_system(name, move |_, _| log.borrow_mut().push(name.to_owned()));
        }
        engine.frame(0.016, 0.016);
        assert_eq!(*log.borrow(), vec!["p:update", "first", "second"]);
    }

    #[test]
    fn physics_steps_and_drop_releases_bodies() {
        let physics = FakePhysics::new();
        let renderer = RecordingRenderer::new();
        let mut engine = engine(&renderer).with_physics(Box::new(physics.clone()));
        assert_eq!(physics.gravity(), Some(Vec2::new(0.0, 20.0)));

        let world = engine.world_mut();
        let e = world.spawn_at(0.0, 0.0);
        world.add_component(e, PhysicsBody::boxed(30.0, 30.0, 30.0, 30.0, 1.0, 30.0));
        world.add_entity(e);
        assert_eq!(physics.body_count(), 1);

        engine.frame(0.5, 0.5);
        assert_eq!(physics.steps(), vec![0.5]);

        drop(engine);
        assert_eq!(physics.body_count(), 0);
    }
}
