use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use shuen_texture::Texture;

use crate::AssetError;

/// Something that can turn a sprite identifier into pixels.
pub trait SpriteSource {
    fn load(&mut self, id: &str) -> Result<Texture, AssetError>;
}

/// Loads sprites from image files below a root directory.
#[derive(Debug, Clone)]
pub struct FileSpriteSource {
    root: PathBuf,
}

impl FileSpriteSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Default for FileSpriteSource {
    fn default() -> Self {
        Self::new(".")
    }
}

impl SpriteSource for FileSpriteSource {
    fn load(&mut self, id: &str) -> Result<Texture, AssetError> {
        let path = self.root.join(id);
        let bytes = std::fs::read(&path).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => AssetError::NotFound(path.display().to_string()),
            _ => AssetError::Io(err),
        })?;
        let img = image::load_from_memory(&bytes).map_err(|source| AssetError::Decode {
            id: id.to_string(),
            source,
        })?;
        Texture::from_image(img.to_rgba8()).map_err(|source| AssetError::Texture {
            id: id.to_string(),
            source,
        })
    }
}

/// In-memory sprite table, for synthetic scenes and tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySpriteSource {
    sprites: HashMap<String, Texture>,
}

impl MemorySpriteSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, texture: Texture) {
        self.sprites.insert(id.into(), texture);
    }

    pub fn with(mut self, id: impl Into<String>, texture: Texture) -> Self {
        self.insert(id, texture);
        self
    }
}

impl SpriteSource for MemorySpriteSource {
    fn load(&mut self, id: &str) -> Result<Texture, AssetError> {
        self.sprites
            .get(id)
            .cloned()
            .ok_or_else(|| AssetError::NotFound(id.to_string()))
    }
}
