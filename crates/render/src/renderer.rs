use shuen_common::{Camera, Entity, EntityId};

use crate::order::draw_order;
use crate::projection::unit_scale;

/// Read-only view of everything a frame depends on.
#[derive(Debug, Clone, Copy)]
pub struct SceneView<'a> {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    pub camera: Camera,
    /// Entities in registry order.
    pub entities: &'a [(EntityId, Entity)],
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads a scene view and produces output. It never touches the
/// scene itself.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given view.
    fn render(&self, view: &SceneView<'_>) -> Self::Output;
}

/// Debug text renderer.
///
/// Produces a human-readable listing of the draw order, back to front.
/// Useful for CLI output, logging, and testing the draw-order rules.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, view: &SceneView<'_>) -> String {
        let mut out = String::new();
        out.push_str(&format!("=== Scene {}x{} ===\n", view.width, view.height));
        out.push_str(&format!(
            "Camera: focus=({:.1}, {:.1}) dist={:.1} scale={:.2}px/unit\n",
            view.camera.focus.x,
            view.camera.focus.y,
            view.camera.dist,
            unit_scale(view.height, &view.camera),
        ));
        out.push_str(&format!("Entities: {}\n", view.entities.len()));

        for (rank, index) in draw_order(view.entities).into_iter().enumerate() {
            let (id, e) = &view.entities[index];
            out.push_str(&format!(
                "  {rank}: [{}] layer={} pos=({:.2}, {:.2}) size={:.2} sprite={}\n",
                id.short(),
                e.layer,
                e.position.x,
                e.position.y,
                e.size,
                e.sprite,
            ));
        }

        out
    }
}
