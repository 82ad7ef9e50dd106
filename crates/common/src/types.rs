use glam::Vec2;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

/// Vertical world extent a freshly created camera shows.
pub const DEFAULT_CAMERA_DIST: f32 = 20.0;

/// Unique identifier for an entity spawned into a scene.
///
/// Identifiers are random, so an id from one scene never names an entity in
/// another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First eight hex digits, for log lines and debug listings.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

/// World-space focus point plus the vertical extent mapped onto the output.
///
/// Smaller `dist` values zoom in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub focus: Vec2,
    pub dist: f32,
}

impl Camera {
    /// Build a camera, rejecting non-finite coordinates and non-positive
    /// distances.
    pub fn new(x: f32, y: f32, dist: f32) -> Result<Self, EngineError> {
        if !x.is_finite() {
            return Err(EngineError::InvalidArgument(format!(
                "camera x must be a finite number, got {x}"
            )));
        }
        if !y.is_finite() {
            return Err(EngineError::InvalidArgument(format!(
                "camera y must be a finite number, got {y}"
            )));
        }
        if !dist.is_finite() || dist <= 0.0 {
            return Err(EngineError::InvalidArgument(format!(
                "camera distance must be a positive number, got {dist}"
            )));
        }
        Ok(Self {
            focus: Vec2::new(x, y),
            dist,
        })
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            focus: Vec2::ZERO,
            dist: DEFAULT_CAMERA_DIST,
        }
    }
}
