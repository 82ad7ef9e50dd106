//! Renderer: projection, draw order and compositing.
//!
//! # Invariants
//! - A renderer never adds, removes or moves entities; the only registry
//!   change it makes is reordering it into draw order.
//! - Every frame is drawn from scratch onto a cleared target.
//! - Draw order: ascending layer, then descending world Y, ties keep their
//!   previous relative order.

mod config;
mod order;
mod projection;
mod renderer;
mod sprite;

pub use config::{InvalidEntityPolicy, RenderConfig};
pub use order::{draw_cmp, draw_order, sort_for_drawing};
pub use projection::{SpriteRect, project, sprite_rect, unit_scale};
pub use renderer::{DebugTextRenderer, Renderer, SceneView};
pub use sprite::{FrameStats, SpriteRenderer};

pub fn crate_info() -> &'static str {
    "shuen-render v0.1.0"
}
