//! Crate-level error types.

use std::fmt;

use crate::gpu::render_context::RenderContextError;

/// Errors produced by the tidepool crate.
#[derive(Debug)]
pub enum TidepoolError {
    /// GPU context initialization failure.
    Gpu(RenderContextError),
    /// A model, texture or background image could not be read or decoded.
    AssetLoad {
        /// Asset path as written in the manifest.
        path: String,
        /// Human-readable failure description.
        reason: String,
    },
    /// WGSL composition or validation failure.
    Shader(String),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options or manifest parsing/serialization failure.
    OptionsParse(String),
    /// Viewer event-loop failure.
    Viewer(String),
}

impl TidepoolError {
    /// Shorthand for an [`TidepoolError::AssetLoad`] error.
    pub fn asset(path: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::AssetLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for TidepoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
            Self::AssetLoad { path, reason } => {
                write!(f, "failed to load asset {path}: {reason}")
            }
            Self::Shader(msg) => write!(f, "shader error: {msg}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Viewer(msg) => write!(f, "viewer error: {msg}"),
        }
    }
}

impl std::error::Error for TidepoolError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gpu(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RenderContextError> for TidepoolError {
    fn from(e: RenderContextError) -> Self {
        Self::Gpu(e)
    }
}

impl From<std::io::Error> for TidepoolError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
