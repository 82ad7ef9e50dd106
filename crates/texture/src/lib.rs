//! Texture: an owned, resizable 2D RGBA pixel buffer.
//!
//! # Invariants
//! - Buffer dimensions always match the last successful resize.
//! - Resizing to the current dimensions never touches the pixels.
//! - Cloning a [`Texture`] never shares storage with the original.
//!
//! [`TextureHandle`] is the shared, identity-preserving form used for scene
//! outputs and texture sprites. Single-threaded by construction (`Rc`).

mod handle;
mod texture;

pub use handle::TextureHandle;
pub use texture::{
    MAX_DIMENSION, TRANSPARENT, Texture, TextureError, alpha_over, check_dimensions, dimension,
};

pub use image::{Rgba, RgbaImage};

pub fn crate_info() -> &'static str {
    "shuen-texture v0.1.0"
}
