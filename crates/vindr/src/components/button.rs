use crate::components::label::Label;
use crate::components::mouse_box::MouseBox;
use crate::components::sprite::Sprite;
use crate::ecs::component::{Component, Context, MouseClickListener, MouseHoverListener};
use crate::ecs::entity::Entity;
use crate::ecs::world::World;
use crate::input::MouseButtonEvent;
use crate::math::Vec2;

type ClickHook = Box<dyn FnMut(&mut Context<'_>)>;

/// Everything [`Button::spawn`] needs. Texture and sound fields are asset
/// names.
#[derive(Debug, Clone, Default)]
pub struct ButtonSpec {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub idle: String,
    pub hover: String,
    pub pressed: String,
    pub click_sound: Option<String>,
    pub hover_sound: Option<String>,
    /// Centered label text and font name.
    pub label: Option<(String, String)>,
    /// Camera-independent (fixed UI).
    pub fixed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Face {
    Idle,
    Hover,
    Pressed,
}

/// A clickable widget.
///
/// Three child sprite entities hold the idle, hover and pressed faces; only
/// one is enabled at a time. The click hook fires on release, and only if
/// the press also started on the button.
pub struct Button {
    pub click_sound: Option<String>,
    pub hover_sound: Option<String>,
    idle: Entity,
    hover: Entity,
    pressed: Entity,
    is_hovering: bool,
    is_pressed: bool,
    on_click: Option<ClickHook>,
}

impl Button {
    pub const KIND: &'static str = "Button";

    /// A button over three existing face entities.
    pub fn new(idle: Entity, hover: Entity, pressed: Entity) -> Self {
        Self {
            click_sound: None,
            hover_sound: None,
            idle,
            hover,
            pressed,
            is_hovering: false,
            is_pressed: false,
            on_click: None,
        }
    }

    pub fn on_click(mut self, hook: impl FnMut(&mut Context<'_>) + 'static) -> Self {
        self.on_click = Some(Box::new(hook));
        self
    }

    pub fn set_on_click(&mut self, hook: impl FnMut(&mut Context<'_>) + 'static) {
        self.on_click = Some(Box::new(hook));
    }

    /// Build a detached button entity: transform, mouse box, button and its
    /// face sprites (plus a centered label if requested). `None` if any face
    /// texture is missing; nothing is spawned in that case.
    pub fn spawn(world: &mut World, spec: &ButtonSpec) -> Option<Entity> {
        let faces = [&spec.idle, &spec.hover, &spec.pressed]
            .map(|name| Sprite::from_texture(world, name, spec.width, spec.height));
        let [Some(idle), Some(hover), Some(pressed)] = faces else {
            log::warn!("Button at ({}, {}) not created: missing textures", spec.x, spec.y);
            return None;
        };

        let entity = world.spawn_at(spec.x, spec.y);
        world.set_camera_independent(entity, spec.fixed);
        world.add_component(entity, MouseBox::new(spec.width, spec.height));

        let child = |world: &mut World| {
            let child = world.spawn_at(0.0, 0.0);
            world.set_camera_independent(child, spec.fixed);
            world.add_child(entity, child, false);
            child
        };
        let faces = [idle, hover, pressed].map(|sprite| {
            let face = child(world);
            world.add_component(face, sprite);
            face
        });
        if let Some((text, font)) = &spec.label {
            let label = child(world);
            world.add_component(label, Label::new(text.as_str(), font.as_str()).centered(true));
        }

        let mut button = Self::new(faces[0], faces[1], faces[2]);
        button.click_sound = spec.click_sound.clone();
        button.hover_sound = spec.hover_sound.clone();
        world.add_component(entity, button);
        Some(entity)
    }

    pub fn is_hovering(&self) -> bool {
        self.is_hovering
    }

    pub fn is_pressed(&self) -> bool {
        self.is_pressed
    }

    pub fn faces(&self) -> [Entity; 3] {
        [self.idle, self.hover, self.pressed]
    }

    fn show(&self, world: &mut World, face: Face) {
        world.set_enabled(self.idle, face == Face::Idle);
        world.set_enabled(self.hover, face == Face::Hover);
        world.set_enabled(self.pressed, face == Face::Pressed);
    }

    fn play(world: &mut World, sound: Option<&str>) {
        if let Some(sound) = sound {
            world.play_sound(sound);
        }
    }
}

impl std::fmt::Debug for Button {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Button")
            .field("faces", &self.faces())
            .field("is_hovering", &self.is_hovering)
            .field("is_pressed", &self.is_pressed)
            .field("on_click", &self.on_click.is_some())
            .finish_non_exhaustive()
    }
}

impl Component for Button {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn init(&mut self, ctx: &mut Context<'_>) {
        self.show(ctx.world, Face::Idle);
    }

    fn as_mouse_click(&mut self) -> Option<&mut dyn MouseClickListener> {
        Some(self)
    }

    fn as_mouse_hover(&mut self) -> Option<&mut dyn MouseHoverListener> {
        Some(self)
    }
}

impl MouseHoverListener for Button {
    fn mouse_move(&mut self, _ctx: &mut Context<'_>, _position: Vec2) {}

    fn mouse_enter(&mut self, ctx: &mut Context<'_>) {
        self.is_hovering = true;
        self.show(ctx.world, Face::Hover);
        Self::play(ctx.world, self.hover_sound.as_deref());
    }

    fn mouse_leave(&mut self, ctx: &mut Context<'_>) {
        self.is_hovering = false;
        self.is_pressed = false;
        self.show(ctx.world, Face::Idle);
    }
}

impl MouseClickListener for Button {
    fn mouse_down(&mut self, ctx: &mut Context<'_>, _event: &MouseButtonEvent) {
        self.is_pressed = true;
        self.show(ctx.world, Face::Pressed);
    }

    fn mouse_up(&mut self, ctx: &mut Context<'_>, _event: &MouseButtonEvent) {
        if self.is_pressed {
            if let Some(hook) = self.on_click.as_mut() {
                Self::play(ctx.world, self.click_sound.as_deref());
                hook(ctx);
            }
        }
        self.is_pressed = false;
        let face = if self.is_hovering { Face::Hover } else { Face::Idle };
        self.show(ctx.world, face);
    }
}
