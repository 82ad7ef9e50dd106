//! Scene: the unit of isolation for entities, a camera and an output texture.
//!
//! # Invariants
//! - Entities exist only between [`Scene::spawn`] and [`Scene::destroy`].
//! - No entity is reordered on insert; draw order is established by render.
//! - Repeated renders return the same output texture handle.
//!
//! There is no global "current scene": game code owns its scenes and passes
//! them where they are needed.

pub mod registry;
pub mod scene;

pub use registry::EntityRegistry;
pub use scene::Scene;

pub use shuen_common::{Camera, EngineError, Entity, EntityId, Sprite};
pub use shuen_texture::{Texture, TextureHandle};

pub fn crate_info() -> &'static str {
    "shuen-scene v0.1.0"
}
