use glam::Vec2;
use shuen_common::Camera;

/// Pixels per world unit. Driven by the vertical extent only, so the
/// horizontal extent follows the output's aspect ratio.
pub fn unit_scale(height: u32, camera: &Camera) -> f32 {
    height as f32 / camera.dist
}

/// Map a world-space point into pixel space. World up is screen up.
pub fn project(width: u32, height: u32, camera: &Camera, point: Vec2) -> Vec2 {
    let u = unit_scale(height, camera);
    let rel = point - camera.focus;
    Vec2::new(
        width as f32 / 2.0 + rel.x * u,
        height as f32 / 2.0 - rel.y * u,
    )
}

/// Destination rectangle of a sprite, in (fractional) pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

/// Where a sprite of `source` pixels lands for an entity standing at `feet`
/// with world height `size`.
///
/// The sprite keeps its aspect ratio. `None` when there is nothing to draw.
pub fn sprite_rect(
    width: u32,
    height: u32,
    camera: &Camera,
    feet: Vec2,
    size: f32,
    source: (u32, u32),
) -> Option<SpriteRect> {
    let (src_w, src_h) = source;
    if src_w == 0 || src_h == 0 {
        return None;
    }
    let dest_h = size * unit_scale(height, camera);
    let dest_w = src_w as f32 * (dest_h / src_h as f32);
    if !(dest_h > 0.0 && dest_w > 0.0) {
        return None;
    }
    let anchor = project(width, height, camera, feet);
    Some(SpriteRect {
        left: anchor.x - dest_w / 2.0,
        top: anchor.y - dest_h,
        width: dest_w,
        height: dest_h,
    })
}
