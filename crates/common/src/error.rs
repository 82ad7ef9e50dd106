use shuen_texture::TextureError;

use crate::EntityId;

/// Caller programming errors reported by the engine's public entry points.
///
/// None of these are transient: they are raised where the misuse happens and
/// never retried.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    /// Wrong value passed to a public entry point, e.g. a non-finite camera
    /// coordinate.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Texture dimensions that cannot name a pixel buffer.
    #[error("invalid texture dimensions: {0}")]
    InvalidDimension(String),
    /// Malformed spawn request.
    #[error("invalid entity parameters: {0}")]
    InvalidEntityParams(String),
    /// An entity whose position or size stopped being usable before a render.
    #[error("entity {} is in an invalid state: {reason}", .entity.short())]
    InvalidEntityState { entity: EntityId, reason: String },
}

impl From<TextureError> for EngineError {
    fn from(err: TextureError) -> Self {
        Self::InvalidDimension(err.to_string())
    }
}
