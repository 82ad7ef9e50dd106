//! Shared vocabulary for the shuen crates: entity identifiers, entities and
//! their sprites, the camera, and the error taxonomy every public entry point
//! reports through.

mod entity;
mod error;
mod types;

pub use entity::{Entity, Sprite};
pub use error::EngineError;
pub use types::{Camera, DEFAULT_CAMERA_DIST, EntityId};

pub fn crate_info() -> &'static str {
    "shuen-common v0.1.0"
}
