//! Test doubles shared by the unit tests.
//!
//! Every fake keeps its state behind an `Rc<RefCell<_>>`, so a test can
//! hand a clone to the world or engine and still inspect what happened.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;

use crate::audio::{AudioBackend, SoundHandle};
use crate::ecs::component::{
    Capabilities, Component, Context, DrawContext, Drawable, KeyboardListener, MouseClickListener,
    MouseHoverListener, Updatable,
};
use crate::input::{KeyCode, MouseButtonEvent};
use crate::math::{Color, Rect, Vec2};
use crate::physics::{BodyDesc, BodyHandle, PhysicsWorld};
use crate::render::{Renderer, Texture, TextureHandle};
use crate::text::{FontBackend, FontHandle, RenderedText};

pub type Log = Rc<RefCell<Vec<String>>>;

pub fn new_log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

type UpdateHook = Box<dyn FnMut(&mut Context<'_>)>;
type DrawHook = Box<dyn FnMut(&mut DrawContext<'_>)>;

/// A component that logs every callback as `"<name>:<callback>"`.
pub struct Probe {
    name: String,
    log: Log,
    capabilities: Capabilities,
    layer: i32,
    update: Option<UpdateHook>,
    draw: Option<DrawHook>,
}

impl Probe {
    pub const KIND: &'static str = "Probe";

    pub fn new(name: &str, log: &Log, capabilities: Capabilities) -> Self {
        Self {
            name: name.to_owned(),
            log: log.clone(),
            capabilities,
            layer: 0,
            update: None,
            draw: None,
        }
    }

    /// Run `hook` after logging each update.
    pub fn on_update(mut self, hook: impl FnMut(&mut Context<'_>) + 'static) -> Self {
        self.update = Some(Box::new(hook));
        self
    }

    /// Run `hook` after logging each draw.
    pub fn on_draw(mut self, hook: impl FnMut(&mut DrawContext<'_>) + 'static) -> Self {
        self.draw = Some(Box::new(hook));
        self
    }

    pub fn layer(mut self, layer: i32) -> Self {
        self.layer = layer;
        self
    }

    fn record(&self, callback: &str) {
        self.log.borrow_mut().push(format!("{}:{callback}", self.name));
    }

    fn has(&self, capability: Capabilities) -> bool {
        self.capabilities.contains(capability)
    }
}

impl Component for Probe {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn init(&mut self, _ctx: &mut Context<'_>) {
        self.record("init");
    }

    fn destroy(&mut self, _ctx: &mut Context<'_>) {
        self.record("destroy");
    }

    fn as_updatable(&mut self) -> Option<&mut dyn Updatable> {
        if self.has(Capabilities::UPDATE) { Some(self) } else { None }
    }

    fn as_drawable(&mut self) -> Option<&mut dyn Drawable> {
        if self.has(Capabilities::DRAW) { Some(self) } else { None }
    }

    fn as_mouse_click(&mut self) -> Option<&mut dyn MouseClickListener> {
        if self.has(Capabilities::MOUSE_CLICK) { Some(self) } else { None }
    }

    fn as_mouse_hover(&mut self) -> Option<&mut dyn MouseHoverListener> {
        if self.has(Capabilities::MOUSE_HOVER) { Some(self) } else { None }
    }

    fn as_keyboard(&mut self) -> Option<&mut dyn KeyboardListener> {
        if self.has(Capabilities::KEYBOARD) { Some(self) } else { None }
    }
}

impl Updatable for Probe {
    fn update(&mut self, ctx: &mut Context<'_>, _dt: f32) {
        self.record("update");
        if let Some(hook) = self.update.as_mut() {
            hook(ctx);
        }
    }
}

impl Drawable for Probe {
    fn layer(&self) -> i32 {
        self.layer
    }

    fn draw(&mut self, ctx: &mut DrawContext<'_>) {
        self.record("draw");
        if let Some(hook) = self.draw.as_mut() {
            hook(ctx);
        }
    }
}

impl MouseClickListener for Probe {
    fn mouse_down(&mut self, _ctx: &mut Context<'_>, _event: &MouseButtonEvent) {
        self.record("mouse_down");
    }

    fn mouse_up(&mut self, _ctx: &mut Context<'_>, _event: &MouseButtonEvent) {
        self.record("mouse_up");
    }
}

impl MouseHoverListener for Probe {
    fn mouse_move(&mut self, _ctx: &mut Context<'_>, _position: Vec2) {
        self.record("mouse_move");
    }

    fn mouse_enter(&mut self, _ctx: &mut Context<'_>) {
        self.record("mouse_enter");
    }

    fn mouse_leave(&mut self, _ctx: &mut Context<'_>) {
        self.record("mouse_leave");
    }
}

impl KeyboardListener for Probe {
    fn key_down(&mut self, _ctx: &mut Context<'_>, _key: KeyCode) {
        self.record("key_down");
    }

    fn key_up(&mut self, _ctx: &mut Context<'_>, _key: KeyCode) {
        self.record("key_up");
    }
}

// ── Renderer ─────────────────────────────────────────────────────────

pub type Draw = (TextureHandle, Rect, f32, Vec2);

#[derive(Debug, Default)]
struct RenderState {
    next_texture: u32,
    draws: Vec<Draw>,
    clears: Vec<Color>,
    presents: usize,
}

/// Records draw calls. Paths containing `"missing"` fail to load; everything
/// else loads as a 32×16 texture.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    state: Rc<RefCell<RenderState>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draws(&self) -> Vec<Draw> {
        self.state.borrow().draws.clone()
    }

    pub fn clears(&self) -> Vec<Color> {
        self.state.borrow().clears.clone()
    }

    pub fn presents(&self) -> usize {
        self.state.borrow().presents
    }
}

impl Renderer for RecordingRenderer {
    fn create_texture(&mut self, path: &Path) -> Option<Texture> {
        if path.to_string_lossy().contains("missing") {
            return None;
        }
        let mut state = self.state.borrow_mut();
        state.next_texture += 1;
        Some(Texture {
            handle: TextureHandle(state.next_texture),
            width: 32,
            height: 16,
        })
    }

    fn draw_textured_rect(&mut self, texture: TextureHandle, dest: Rect, angle: f32, pivot: Vec2) {
        self.state
            .borrow_mut()
            .draws
            .push((texture, dest, angle, pivot));
    }

    fn clear(&mut self, color: Color) {
        self.state.borrow_mut().clears.push(color);
    }

    fn present(&mut self) {
        self.state.borrow_mut().presents += 1;
    }
}

// ── Physics ──────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct PhysicsState {
    next_body: u64,
    bodies: HashMap<BodyHandle, (Vec2, f32)>,
    steps: Vec<f32>,
    gravity: Option<Vec2>,
}

/// Bodies stay wherever they were added or [`place`](Self::place)d.
#[derive(Debug, Clone, Default)]
pub struct FakePhysics {
    state: Rc<RefCell<PhysicsState>>,
}

impl FakePhysics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Teleport a body, as if the simulation moved it.
    pub fn place(&self, body: BodyHandle, position: Vec2, rotation: f32) {
        self.state
            .borrow_mut()
            .bodies
            .insert(body, (position, rotation));
    }

    pub fn body_count(&self) -> usize {
        self.state.borrow().bodies.len()
    }

    pub fn steps(&self) -> Vec<f32> {
        self.state.borrow().steps.clone()
    }

    pub fn gravity(&self) -> Option<Vec2> {
        self.state.borrow().gravity
    }
}

impl PhysicsWorld for FakePhysics {
    fn add_body(&mut self, desc: &BodyDesc) -> BodyHandle {
        let mut state = self.state.borrow_mut();
        state.next_body += 1;
        let handle = BodyHandle(state.next_body);
        state.bodies.insert(handle, (desc.position, desc.rotation));
        handle
    }

    fn remove_body(&mut self, body: BodyHandle) {
        self.state.borrow_mut().bodies.remove(&body);
    }

    fn step(&mut self, dt: f32) {
        self.state.borrow_mut().steps.push(dt);
    }

    fn position(&self, body: BodyHandle) -> Option<Vec2> {
        self.state.borrow().bodies.get(&body).map(|(p, _)| *p)
    }

    fn rotation(&self, body: BodyHandle) -> Option<f32> {
        self.state.borrow().bodies.get(&body).map(|(_, r)| *r)
    }

    fn set_gravity(&mut self, gravity: Vec2) {
        self.state.borrow_mut().gravity = Some(gravity);
    }
}

// ── Audio ────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct AudioState {
    loaded: u32,
    played: Vec<SoundHandle>,
}

/// Paths containing `"missing"` fail to load.
#[derive(Debug, Clone, Default)]
pub struct FakeAudio {
    state: Rc<RefCell<AudioState>>,
}

impl FakeAudio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn played(&self) -> Vec<SoundHandle> {
        self.state.borrow().played.clone()
    }
}

impl AudioBackend for FakeAudio {
    fn load_sound(&mut self, path: &Path) -> Option<SoundHandle> {
        if path.to_string_lossy().contains("missing") {
            return None;
        }
        let mut state = self.state.borrow_mut();
        state.loaded += 1;
        Some(SoundHandle(state.loaded))
    }

    fn play(&mut self, sound: SoundHandle) -> bool {
        self.state.borrow_mut().played.push(sound);
        true
    }
}

// ── Fonts ────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct FontState {
    loaded: u32,
    next_texture: u32,
    outlined: usize,
    released: Vec<TextureHandle>,
}

/// Renders every glyph 8×16. Paths containing `"missing"` fail to load.
#[derive(Debug, Clone, Default)]
pub struct FakeFonts {
    state: Rc<RefCell<FontState>>,
}

impl FakeFonts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn released(&self) -> Vec<TextureHandle> {
        self.state.borrow().released.clone()
    }

    pub fn outlined_renders(&self) -> usize {
        self.state.borrow().outlined
    }
}

impl FontBackend for FakeFonts {
    fn load_font(&mut self, path: &Path, _size: u32, _outline: u32) -> Option<FontHandle> {
        if path.to_string_lossy().contains("missing") {
            return None;
        }
        let mut state = self.state.borrow_mut();
        state.loaded += 1;
        Some(FontHandle(state.loaded))
    }

    fn render_text(&mut self, _font: FontHandle, text: &str, _color: Color) -> Option<RenderedText> {
        let mut state = self.state.borrow_mut();
        state.next_texture += 1;
        Some(Texture {
            handle: TextureHandle(1000 + state.next_texture),
            width: 8 * text.chars().count() as u32,
            height: 16,
        })
    }

    fn render_outlined_text(
        &mut self,
        font: FontHandle,
        _outline: FontHandle,
        text: &str,
        color: Color,
        _outline_color: Color,
    ) -> Option<RenderedText> {
        self.state.borrow_mut().outlined += 1;
        self.render_text(font, text, color)
    }

    fn release_text(&mut self, texture: TextureHandle) {
        self.state.borrow_mut().released.push(texture);
    }
}
