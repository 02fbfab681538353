//! Error types for persistence, configuration and input parsing.
//!
//! Gameplay rejections (not enough metal, a bad building index) are not
//! errors: they are reported through the [`Narrator`](crate::narrator::Narrator)
//! and a `false` return. The types here cover faults at the edges of the core.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure while reading or writing a save file.
#[derive(Debug, Error)]
pub enum SaveError {
    /// The save file does not exist.
    #[error("save file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// Filesystem error.
    #[error("save file I/O error: {0}")]
    Io(#[from] io::Error),
    /// The snapshot could not be encoded or decoded.
    #[error("save file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure while reading or writing the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Filesystem error.
    #[error("config I/O error: {0}")]
    Io(#[from] io::Error),
    /// The configuration file is malformed.
    #[error("config is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// An input token that is not part of the action surface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown action: {token}")]
pub struct ParseActionError {
    /// The rejected token.
    pub token: String,
}

/// An enum name (building kind, level, tech id) that is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} name: {name}")]
pub struct ParseNameError {
    /// What was being parsed, e.g. `"building"`.
    pub kind: &'static str,
    /// The rejected name.
    pub name: String,
}

impl ParseNameError {
    pub(crate) fn new(kind: &'static str, name: &str) -> Self {
        Self {
            kind,
            name: name.to_string(),
        }
    }
}

/// Result type for save operations.
pub type SaveResult<T> = Result<T, SaveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = SaveError::NotFound(PathBuf::from("/tmp/missing.json"));
        assert!(err.to_string().contains("missing.json"));
    }

    #[test]
    fn test_parse_name_error_display() {
        let err = ParseNameError::new("building", "LASER_TOWER");
        assert_eq!(err.to_string(), "unknown building name: LASER_TOWER");
    }

    #[test]
    fn test_parse_action_error_display() {
        let err = ParseActionError {
            token: "jump".to_string(),
        };
        assert_eq!(err.to_string(), "unknown action: jump");
    }
}
