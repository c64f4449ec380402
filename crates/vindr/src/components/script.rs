//! Closure-driven components.
//!
//! A [`Script`] picks its capabilities when it is built and funnels every
//! callback it receives into one message hook, so small one-off behaviours
//! do not need a type of their own.

use crate::ecs::component::{
    Capabilities, Component, Context, DrawContext, Drawable, KeyboardListener, MouseClickListener,
    MouseHoverListener, Updatable,
};
use crate::input::{KeyCode, MouseButtonEvent};
use crate::math::Vec2;

/// One callback delivered to a [`Script`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScriptEvent {
    Update(f32),
    MouseDown(MouseButtonEvent),
    MouseUp(MouseButtonEvent),
    MouseMove(Vec2),
    MouseEnter,
    MouseLeave,
    KeyDown(KeyCode),
    KeyUp(KeyCode),
}

type Hook = Box<dyn FnMut(&mut Context<'_>, &ScriptEvent)>;
type DrawHook = Box<dyn FnMut(&mut DrawContext<'_>)>;

pub struct Script {
    capabilities: Capabilities,
    hook: Hook,
    draw: Option<(i32, DrawHook)>,
}

impl Script {
    pub const KIND: &'static str = "Script";

    /// A script receiving the events of `capabilities`. `DRAW` is ignored
    /// here; use [`with_draw`](Self::with_draw).
    pub fn new(
        capabilities: Capabilities,
        hook: impl FnMut(&mut Context<'_>, &ScriptEvent) + 'static,
    ) -> Self {
        Self {
            capabilities,
            hook: Box::new(hook),
            draw: None,
        }
    }

    /// Also draw on `layer`.
    pub fn with_draw(mut self, layer: i32, draw: impl FnMut(&mut DrawContext<'_>) + 'static) -> Self {
        self.draw = Some((layer, Box::new(draw)));
        self
    }

    fn wants(&self, capability: Capabilities) -> bool {
        self.capabilities.contains(capability)
    }

    fn send(&mut self, ctx: &mut Context<'_>, event: ScriptEvent) {
        log::trace!("Script on {:?} <- {event:?}", ctx.entity);
        (self.hook)(ctx, &event);
    }
}

impl std::fmt::Debug for Script {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Script")
            .field("capabilities", &self.capabilities)
            .field("draws", &self.draw.is_some())
            .finish_non_exhaustive()
    }
}

impl Component for Script {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn as_updatable(&mut self) -> Option<&mut dyn Updatable> {
        if self.wants(Capabilities::UPDATE) {
            Some(self)
        } else {
            None
        }
    }

    fn as_drawable(&mut self) -> Option<&mut dyn Drawable> {
        if self.draw.is_some() {
            Some(self)
        } else {
            None
        }
    }

    fn as_mouse_click(&mut self) -> Option<&mut dyn MouseClickListener> {
        if self.wants(Capabilities::MOUSE_CLICK) {
            Some(self)
        } else {
            None
        }
    }

    fn as_mouse_hover(&mut self) -> Option<&mut dyn MouseHoverListener> {
        if self.wants(Capabilities::MOUSE_HOVER) {
            Some(self)
        } else {
            None
        }
    }

    fn as_keyboard(&mut self) -> Option<&mut dyn KeyboardListener> {
        if self.wants(Capabilities::KEYBOARD) {
            Some(self)
        } else {
            None
        }
    }
}

impl Updatable for Script {
    fn update(&mut self, ctx: &mut Context<'_>, dt: f32) {
        self.send(ctx, ScriptEvent::Update(dt));
    }
}

impl Drawable for Script {
    fn layer(&self) -> i32 {
        self.draw.as_ref().map_or(0, |(layer, _)| *layer)
    }

    fn draw(&mut self, ctx: &mut DrawContext<'_>) {
        if let Some((_, draw)) = self.draw.as_mut() {
            draw(ctx);
        }
    }
}

impl MouseClickListener for Script {
    fn mouse_down(&mut self, ctx: &mut Context<'_>, event: &MouseButtonEvent) {
        self.send(ctx, ScriptEvent::MouseDown(*event));
    }

    fn mouse_up(&mut self, ctx: &mut Context<'_>, event: &MouseButtonEvent) {
        self.send(ctx, ScriptEvent::MouseUp(*event));
    }
}

impl MouseHoverListener for Script {
    fn mouse_move(&mut self, ctx: &mut Context<'_>, position: Vec2) {
        self.send(ctx, ScriptEvent::MouseMove(position));
    }

    fn mouse_enter(&mut self, ctx: &mut Context<'_>) {
        self.send(ctx, ScriptEvent::MouseEnter);
    }

    fn mouse_leave(&mut self, ctx: &mut Context<'_>) {
        self.send(ctx, ScriptEvent::MouseLeave);
    }
}

impl KeyboardListener for Script {
    fn key_down(&mut self, ctx: &mut Context<'_>, key: KeyCode) {
        self.send(ctx, ScriptEvent::KeyDown(key));
    }

    fn key_up(&mut self, ctx: &mut Context<'_>, key: KeyCode) {
        self.send(ctx, ScriptEvent::KeyUp(key));
    }
}
