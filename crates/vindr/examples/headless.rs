//! Headless demo: runs the frame loop against logging collaborators.
//!
//! A button, an FPS counter and a spinning sprite, with a scripted stream of
//! input events. The demo stops itself after a hundred frames.
//!
//! Run with `RUST_LOG=debug cargo run --example headless` to see routing.

use std::path::Path;

use vindr::prelude::*;

/// Hands out textures without touching a GPU and logs every tenth present.
#[derive(Default)]
struct LogRenderer {
    next: u32,
    draws: usize,
    frames: u64,
}

impl Renderer for LogRenderer {
    fn create_texture(&mut self, path: &Path) -> Option<Texture> {
        self.next += 1;
        log::info!("texture #{} <- {}", self.next, path.display());
        Some(Texture {
            handle: TextureHandle(self.next),
            width: 64,
            height: 32,
        })
    }

    fn draw_textured_rect(&mut self, _texture: TextureHandle, _dest: Rect, _angle: f32, _pivot: Vec2) {
        self.draws += 1;
    }

    fn clear(&mut self, _color: Color) {
        self.draws = 0;
    }

    fn present(&mut self) {
        self.frames += 1;
        if self.frames % 10 == 0 {
            log::info!("frame {}: {} draws", self.frames, self.draws);
        }
    }
}

/// Fixed-width glyphs, textures numbered from 10 000.
#[derive(Default)]
struct MonoFonts {
    next: u32,
}

impl FontBackend for MonoFonts {
    fn load_font(&mut self, _path: &Path, _size: u32, _outline: u32) -> Option<FontHandle> {
        Some(FontHandle(0))
    }

    fn render_text(&mut self, _font: FontHandle, text: &str, _color: Color) -> Option<RenderedText> {
        self.next += 1;
        Some(Texture {
            handle: TextureHandle(10_000 + self.next),
            width: 8 * text.chars().count() as u32,
            height: 16,
        })
    }
}

struct SilentAudio;

impl AudioBackend for SilentAudio {
    fn load_sound(&mut self, _path: &Path) -> Option<SoundHandle> {
        Some(SoundHandle(0))
    }

    fn play(&mut self, sound: SoundHandle) -> bool {
        log::info!("play {sound:?}");
        true
    }
}

fn main() -> Result<(), EngineError> {
    init_logging(LoggingConfig::default());

    let config = EngineConfig::from_json_str(r#"{ "title": "headless", "target_fps": 120 }"#)?;

    let mut events = EventQueue::new();
    events.extend([
        InputEvent::MouseMoved(Vec2::new(320.0, 200.0)),
        InputEvent::MouseButton {
            event: MouseButtonEvent {
                position: Vec2::new(320.0, 200.0),
                button: MouseButton::Left,
            },
            pressed: true,
        },
        InputEvent::MouseButton {
            event: MouseButtonEvent {
                position: Vec2::new(320.0, 200.0),
                button: MouseButton::Left,
            },
            pressed: false,
        },
        InputEvent::Key {
            key: KeyCode::Space,
            pressed: true,
        },
    ]);

    let mut engine = Engine::new(config, Box::new(LogRenderer::default()), Box::new(SilentAudio))?
        .with_fonts(Box::new(MonoFonts::default()))
        .with_events(Box::new(events));

    engine.load_texture("ui/button.png", "button")?;
    engine.load_texture("ui/button_hover.png", "button_hover")?;
    engine.load_texture("ui/button_down.png", "button_down")?;
    engine.load_texture("sprites/gear.png", "gear")?;
    engine.load_sound("sfx/click.wav", "click")?;
    engine.load_font("fonts/mono.ttf", "mono", 16, 0)?;

    let world = engine.world_mut();

    let spec = ButtonSpec {
        x: 320.0,
        y: 200.0,
        width: 120.0,
        height: 40.0,
        idle: "button".into(),
        hover: "button_hover".into(),
        pressed: "button_down".into(),
        click_sound: Some("click".into()),
        label: Some(("Start".into(), "mono".into())),
        fixed: true,
        ..Default::default()
    };
    if let Some(button) = Button::spawn(world, &spec) {
        if let Some(b) = world.get_mut::<Button>(button) {
            b.set_on_click(|_| log::info!("clicked"));
        }
        world.add_entity(button);
    }

    if let Some(fps) = FpsCounter::spawn(world, 8.0, 8.0, "mono") {
        world.add_entity(fps);
    }

    let gear = world.spawn_at(100.0, 300.0);
    if let Some(sprite) = Sprite::from_texture(world, "gear", 48.0, 48.0) {
        world.add_component(gear, sprite);
    }
    let mut frames = 0;
    world.add_component(
        gear,
        Script::new(Capabilities::UPDATE | Capabilities::KEYBOARD, move |ctx, event| {
            match event {
                ScriptEvent::Update(dt) => {
                    if let Some(t) = ctx.get_mut::<Transform>() {
                        t.angle += 90.0 * dt;
                    }
                    frames += 1;
                    if frames >= 100 {
                        ctx.world.request_stop();
                    }
                }
                ScriptEvent::KeyDown(key) => log::info!("key {key:?}"),
                _ => {}
            }
        }),
    );
    world.add_entity(gear);

    engine.run();
    Ok(())
}
