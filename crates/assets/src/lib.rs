//! Sprite assets: loading collaborators and the identifier-keyed cache.
//!
//! The renderer consumes sprites by identifier, never by raw file handles.
//! Every identifier is loaded at most once per [`SpriteCache`]; the cache
//! never evicts, which is fine for the small, bounded sprite sets games use.

mod cache;
mod source;

pub use cache::{SharedSpriteCache, SpriteCache};
pub use source::{FileSpriteSource, MemorySpriteSource, SpriteSource};

use shuen_texture::TextureError;

/// Errors from sprite loading.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("sprite not found: {0}")]
    NotFound(String),
    #[error("failed to decode sprite {id}: {source}")]
    Decode {
        id: String,
        #[source]
        source: image::ImageError,
    },
    #[error("sprite {id} cannot be used as a texture: {source}")]
    Texture {
        id: String,
        #[source]
        source: TextureError,
    },
}

pub fn crate_info() -> &'static str {
    "shuen-assets v0.1.0"
}
