//! Crate-level error types.

use std::fmt;

use crate::gpu::render_context::RenderContextError;

/// Errors produced by the speckle crate.
///
/// Malformed structure text is deliberately *not* represented here: the
/// parser yields an empty result and callers treat that as "no structure".
#[derive(Debug)]
pub enum SpeckleError {
    /// GPU context initialization failure.
    Gpu(RenderContextError),
    /// A WGSL shader failed to compose or validate.
    Shader(String),
    /// Failed to load a molecular structure file.
    StructureLoad(String),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options/preset parsing or serialization failure.
    OptionsParse(String),
    /// Share-link encoding or decoding failure.
    Share(String),
    /// Viewer event-loop failure.
    Viewer(String),
}

impl fmt::Display for SpeckleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
            Self::Shader(msg) => write!(f, "shader error: {msg}"),
            Self::StructureLoad(msg) => {
                write!(f, "structure load error: {msg}")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Share(msg) => write!(f, "share link error: {msg}"),
            Self::Viewer(msg) => write!(f, "viewer error: {msg}"),
        }
    }
}

impl std::error::Error for SpeckleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gpu(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RenderContextError> for SpeckleError {
    fn from(e: RenderContextError) -> Self {
        Self::Gpu(e)
    }
}

impl From<std::io::Error> for SpeckleError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
