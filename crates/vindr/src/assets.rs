//! # Named Assets
//!
//! Collaborators hand out opaque handles; [`Assets`] files them under names so
//! components can refer to `"button_idle"` instead of carrying handles around.
//!
//! ```text
//! Engine::load_texture(path, name) ──► Renderer::create_texture(path)
//!                                        │
//!                                        ▼
//!                        Assets.textures[name] = Texture
//!
//! World::texture(name) ──► Some(Texture) | None + warning
//! Assets::try_texture(name) ──► Ok(Texture) | Err(AssetError::NotFound)
//! ```
//!
//! Registering a name twice replaces the earlier entry; the old handle stays
//! valid in its collaborator but is no longer reachable by name.

use std::collections::HashMap;

use crate::audio::SoundHandle;
use crate::error::AssetError;
use crate::render::Texture;
use crate::text::FontHandle;

/// The three asset kinds, for diagnostics and errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Texture,
    Sound,
    Font,
}

impl std::fmt::Display for AssetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetKind::Texture => write!(f, "texture"),
            AssetKind::Sound => write!(f, "sound"),
            AssetKind::Font => write!(f, "font"),
        }
    }
}

#[derive(Debug, Default)]
pub struct Assets {
    textures: HashMap<String, Texture>,
    sounds: HashMap<String, SoundHandle>,
    fonts: HashMap<String, FontHandle>,
}

impl Assets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_texture(&mut self, name: impl Into<String>, texture: Texture) {
        let name = name.into();
        if self.textures.insert(name.clone(), texture).is_some() {
            log::debug!("Texture '{name}' replaced");
        }
    }

    pub fn insert_sound(&mut self, name: impl Into<String>, sound: SoundHandle) {
        let name = name.into();
        if self.sounds.insert(name.clone(), sound).is_some() {
            log::debug!("Sound '{name}' replaced");
        }
    }

    pub fn insert_font(&mut self, name: impl Into<String>, font: FontHandle) {
        let name = name.into();
        if self.fonts.insert(name.clone(), font).is_some() {
            log::debug!("Font '{name}' replaced");
        }
    }

    pub fn texture(&self, name: &str) -> Option<Texture> {
        self.textures.get(name).copied()
    }

    pub fn sound(&self, name: &str) -> Option<SoundHandle> {
        self.sounds.get(name).copied()
    }

    pub fn font(&self, name: &str) -> Option<FontHandle> {
        self.fonts.get(name).copied()
    }

    pub fn try_texture(&self, name: &str) -> Result<Texture, AssetError> {
        self.texture(name).ok_or_else(|| not_found(AssetKind::Texture, name))
    }

    pub fn try_sound(&self, name: &str) -> Result<SoundHandle, AssetError> {
        self.sound(name).ok_or_else(|| not_found(AssetKind::Sound, name))
    }

    pub fn try_font(&self, name: &str) -> Result<FontHandle, AssetError> {
        self.font(name).ok_or_else(|| not_found(AssetKind::Font, name))
    }

    pub fn contains(&self, kind: AssetKind, name: &str) -> bool {
        match kind {
            AssetKind::Texture => self.textures.contains_key(name),
            AssetKind::Sound => self.sounds.contains_key(name),
            AssetKind::Font => self.fonts.contains_key(name),
        }
    }

    pub fn len(&self) -> usize {
        self.textures.len() + self.sounds.len() + self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn not_found(kind: AssetKind, name: &str) -> AssetError {
    AssetError::NotFound {
        kind,
        name: name.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::TextureHandle;

    #[test]
    fn lookup_by_name() {
        let mut assets = Assets::new();
        let tex = Texture {
            handle: TextureHandle(3),
            width: 64,
            height: 32,
        };
        assets.insert_texture("player", tex);
        assets.insert_sound("click", SoundHandle(1));

        assert_eq!(assets.texture("player"), Some(tex));
        assert_eq!(assets.texture("enemy"), None);
        assert_eq!(assets.sound("click"), Some(SoundHandle(1)));
        assert!(assets.contains(AssetKind::Sound, "click"));
        assert!(!assets.contains(AssetKind::Font, "click"));
        assert_eq!(assets.len(), 2);
    }

    #[test]
    fn strict_lookup_reports_missing_name() {
        let mut assets = Assets::new();
        assets.insert_font("mono", FontHandle(7));

        assert_eq!(assets.try_font("mono"), Ok(FontHandle(7)));
        assert_eq!(
            assets.try_texture("hero"),
            Err(AssetError::NotFound {
                kind: AssetKind::Texture,
                name: "hero".into(),
            })
        );
        let err = assets.try_sound("boom").unwrap_err();
        assert_eq!(err.to_string(), "sound 'boom' not found");
    }

    #[test]
    fn reinserting_replaces() {
        let mut assets = Assets::new();
        assets.insert_font("ui", FontHandle(0));
        assets.insert_font("ui", FontHandle(7));
        assert_eq!(assets.font("ui"), Some(FontHandle(7)));
        assert_eq!(assets.len(), 1);
    }
}
