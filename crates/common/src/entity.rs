use std::fmt;

use glam::Vec2;
use shuen_texture::TextureHandle;

/// Image an entity displays.
#[derive(Debug, Clone)]
pub enum Sprite {
    /// Identifier resolved through the sprite cache (usually a file path).
    Image(String),
    /// Another texture, typically the output of a different scene.
    Texture(TextureHandle),
}

impl From<&str> for Sprite {
    fn from(id: &str) -> Self {
        Self::Image(id.to_string())
    }
}

impl From<String> for Sprite {
    fn from(id: String) -> Self {
        Self::Image(id)
    }
}

impl From<TextureHandle> for Sprite {
    fn from(handle: TextureHandle) -> Self {
        Self::Texture(handle)
    }
}

impl From<&TextureHandle> for Sprite {
    fn from(handle: &TextureHandle) -> Self {
        Self::Texture(handle.clone())
    }
}

impl fmt::Display for Sprite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Image(id) => f.write_str(id),
            Self::Texture(handle) => write!(f, "{handle:?}"),
        }
    }
}

/// One drawable world object.
///
/// `position` marks the sprite's feet: the sprite is drawn horizontally
/// centred on it and standing on it. Game code may move entities freely
/// between renders.
#[derive(Debug, Clone)]
pub struct Entity {
    pub position: Vec2,
    /// World-space height of the displayed sprite.
    pub size: f32,
    /// Draw-order bucket, higher is on top.
    pub layer: i32,
    pub sprite: Sprite,
}

impl Entity {
    pub fn new(sprite: impl Into<Sprite>, size: f32, layer: i32) -> Self {
        Self {
            position: Vec2::ZERO,
            size,
            layer,
            sprite: sprite.into(),
        }
    }

    pub fn x(&self) -> f32 {
        self.position.x
    }

    pub fn y(&self) -> f32 {
        self.position.y
    }

    /// Describe why this entity cannot be drawn, if it cannot.
    pub fn state_violation(&self) -> Option<String> {
        if !self.position.x.is_finite() {
            return Some(format!("x must be a finite number, got {}", self.position.x));
        }
        if !self.position.y.is_finite() {
            return Some(format!("y must be a finite number, got {}", self.position.y));
        }
        if !self.size.is_finite() || self.size <= 0.0 {
            return Some(format!("size must be a positive number, got {}", self.size));
        }
        None
    }
}
