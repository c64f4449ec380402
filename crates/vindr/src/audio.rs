//! The audio collaborator.
//!
//! [`AudioBackend`] is the only surface the runtime consumes: load a sound,
//! play it. With the `audio` feature, [`KiraAudio`] implements it on top of
//! [kira](https://docs.rs/kira).

use std::path::Path;

/// Opaque sound identifier issued by an [`AudioBackend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SoundHandle(pub u32);

pub trait AudioBackend {
    /// Load and decode a sound file. `None` if it cannot be loaded.
    fn load_sound(&mut self, path: &Path) -> Option<SoundHandle>;

    /// Start playing a loaded sound. Returns `false` if playback failed.
    fn play(&mut self, sound: SoundHandle) -> bool;
}

#[cfg(feature = "audio")]
pub use kira_backend::KiraAudio;

#[cfg(feature = "audio")]
mod kira_backend {
    use std::fmt;
    use std::path::Path;

    use kira::sound::static_sound::StaticSoundData;
    use kira::{AudioManager, AudioManagerSettings, DefaultBackend};

    use super::{AudioBackend, SoundHandle};
    use crate::error::EngineError;

    /// Kira-backed audio. Decoded sounds are kept in a `Vec`; the handle is
    /// the index.
    pub struct KiraAudio {
        manager: AudioManager<DefaultBackend>,
        sounds: Vec<StaticSoundData>,
    }

    impl KiraAudio {
        /// Open the default audio device. Failure here is fatal at startup.
        pub fn try_new() -> Result<Self, EngineError> {
            let manager = AudioManager::<DefaultBackend>::new(AudioManagerSettings::default())
                .map_err(|e| EngineError::Init(format!("audio device: {e}")))?;
            Ok(Self {
                manager,
                sounds: Vec::new(),
            })
        }
    }

    impl AudioBackend for KiraAudio {
        fn load_sound(&mut self, path: &Path) -> Option<SoundHandle> {
            match StaticSoundData::from_file(path) {
                Ok(data) => {
                    self.sounds.push(data);
                    Some(SoundHandle(self.sounds.len() as u32 - 1))
                }
                Err(e) => {
                    log::warn!("Failed to load sound '{}': {e}", path.display());
                    None
                }
            }
        }

        fn play(&mut self, sound: SoundHandle) -> bool {
            let Some(data) = self.sounds.get(sound.0 as usize) else {
                return false;
            };
            match self.manager.play(data.clone()) {
                Ok(_) => true,
                Err(e) => {
                    log::warn!("Error playing sound: {e}");
                    false
                }
            }
        }
    }

    impl fmt::Debug for KiraAudio {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("KiraAudio")
                .field("sounds", &self.sounds.len())
                .finish_non_exhaustive()
        }
    }
}
