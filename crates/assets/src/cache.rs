use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use shuen_texture::Texture;

use crate::SpriteSource;

/// Sprite cache shared between scenes.
pub type SharedSpriteCache = Rc<RefCell<SpriteCache>>;

/// Identifier-keyed sprite cache in front of a [`SpriteSource`].
///
/// Failed loads are cached too, so a missing sprite is reported once and
/// then quietly draws nothing.
pub struct SpriteCache {
    source: Box<dyn SpriteSource>,
    entries: HashMap<String, Option<Rc<Texture>>>,
}

impl SpriteCache {
    pub fn new(source: impl SpriteSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            entries: HashMap::new(),
        }
    }

    pub fn shared(self) -> SharedSpriteCache {
        Rc::new(RefCell::new(self))
    }

    /// Resolve a sprite, loading it on first use.
    pub fn get(&mut self, id: &str) -> Option<Rc<Texture>> {
        if let Some(entry) = self.entries.get(id) {
            return entry.clone();
        }
        let entry = match self.source.load(id) {
            Ok(texture) => {
                tracing::debug!(id, size = ?texture.dimensions(), "sprite loaded");
                Some(Rc::new(texture))
            }
            Err(e) => {
                tracing::warn!(id, "sprite failed to load: {e}");
                None
            }
        };
        self.entries.insert(id.to_string(), entry.clone());
        entry
    }

    /// True if `id` has been looked up before, successfully or not.
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Number of identifiers looked up so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of identifiers that resolved to an image.
    pub fn loaded_count(&self) -> usize {
        self.entries.values().filter(|e| e.is_some()).count()
    }
}

impl std::fmt::Debug for SpriteCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpriteCache")
            .field("entries", &self.entries.len())
            .field("loaded", &self.loaded_count())
            .finish()
    }
}
