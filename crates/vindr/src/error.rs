//! Error types.
//!
//! Structural misuse of the entity graph is never an error: it is logged and
//! ignored. The types here cover what genuinely fails at the edges, such as
//! a missing file, a bad config or a device that will not open.

use std::fmt;
use std::path::PathBuf;

use crate::assets::AssetKind;

/// Errors raised while building or running an [`Engine`](crate::engine::Engine).
#[derive(Debug)]
pub enum EngineError {
    /// A collaborator failed to initialize. Fatal at startup.
    Init(String),
    Config(ConfigError),
    Asset(AssetError),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Init(e) => write!(f, "initialization failed: {e}"),
            EngineError::Config(e) => write!(f, "{e}"),
            EngineError::Asset(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Init(_) => None,
            EngineError::Config(e) => Some(e),
            EngineError::Asset(e) => Some(e),
        }
    }
}

impl From<ConfigError> for EngineError {
    fn from(e: ConfigError) -> Self {
        EngineError::Config(e)
    }
}

impl From<AssetError> for EngineError {
    fn from(e: AssetError) -> Self {
        EngineError::Asset(e)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    /// A collaborator could not load the file.
    Load { kind: AssetKind, path: PathBuf },
    /// No asset of this kind is registered under the name.
    NotFound { kind: AssetKind, name: String },
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::Load { kind, path } => {
                write!(f, "failed to load {kind} '{}'", path.display())
            }
            AssetError::NotFound { kind, name } => write!(f, "{kind} '{name}' not found"),
        }
    }
}

impl std::error::Error for AssetError {}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    /// Parsed, but a value is out of range.
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config read failed: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse failed: {e}"),
            ConfigError::Invalid(e) => write!(f, "invalid config: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_asset() {
        let err = AssetError::Load {
            kind: AssetKind::Texture,
            path: PathBuf::from("img/hero.png"),
        };
        assert_eq!(err.to_string(), "failed to load texture 'img/hero.png'");

        let err: EngineError = AssetError::NotFound {
            kind: AssetKind::Sound,
            name: "boom".into(),
        }
        .into();
        assert_eq!(err.to_string(), "sound 'boom' not found");
        assert!(std::error::Error::source(&err).is_some());
    }
}
