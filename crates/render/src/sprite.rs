use std::cell::RefMut;
use std::collections::HashSet;

use shuen_assets::{SharedSpriteCache, SpriteCache};
use shuen_common::{Camera, EngineError, Entity, EntityId, Sprite};
use shuen_texture::Texture;

use crate::config::{InvalidEntityPolicy, RenderConfig};
use crate::order::{draw_order, sort_for_drawing};
use crate::projection::{SpriteRect, sprite_rect};
use crate::renderer::{Renderer, SceneView};

/// Per-frame counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Entities whose sprite touched at least one pixel.
    pub drawn: usize,
    /// Entities left out because they were malformed.
    pub skipped: usize,
    /// Entities whose image identifier did not resolve.
    pub unresolved: usize,
}

/// Software sprite compositor.
///
/// Holds no per-frame state: everything a frame depends on is passed in.
#[derive(Debug, Clone)]
pub struct SpriteRenderer {
    config: RenderConfig,
    sprites: SharedSpriteCache,
}

impl SpriteRenderer {
    pub fn new(sprites: SharedSpriteCache) -> Self {
        Self {
            config: RenderConfig::default(),
            sprites,
        }
    }

    pub fn with_config(mut self, config: RenderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: RenderConfig) {
        self.config = config;
    }

    pub fn sprites(&self) -> &SharedSpriteCache {
        &self.sprites
    }

    /// Draw `entities` onto `target` at `width`x`height`.
    ///
    /// `entities` is left sorted in draw order. On error the target and the
    /// entity order are untouched.
    pub fn render_frame(
        &self,
        target: &mut Texture,
        width: u32,
        height: u32,
        camera: &Camera,
        entities: &mut [(EntityId, Entity)],
    ) -> Result<FrameStats, EngineError> {
        let _span = tracing::info_span!("render_frame", width, height).entered();
        let rejected = self.check_entities(entities)?;
        let mut sprites = self.lock_sprites()?;

        target.clear();
        target.resize_fast(width, height)?;
        sort_for_drawing(entities);

        let stats = draw(target, camera, &mut sprites, entities.iter(), &rejected);
        tracing::trace!(
            drawn = stats.drawn,
            skipped = stats.skipped,
            unresolved = stats.unresolved,
            "frame rendered"
        );
        Ok(stats)
    }

    /// Collect the entities the configured policy leaves out, or fail on the
    /// first malformed one.
    fn check_entities(
        &self,
        entities: &[(EntityId, Entity)],
    ) -> Result<HashSet<EntityId>, EngineError> {
        let mut rejected = HashSet::new();
        for (id, entity) in entities {
            let Some(reason) = violation(entity) else {
                continue;
            };
            match self.config.invalid_entity_policy {
                InvalidEntityPolicy::Abort => {
                    return Err(EngineError::InvalidEntityState {
                        entity: *id,
                        reason,
                    });
                }
                InvalidEntityPolicy::Skip => {
                    tracing::warn!(entity = %id.short(), "skipping entity: {reason}");
                    rejected.insert(*id);
                }
            }
        }
        Ok(rejected)
    }

    fn lock_sprites(&self) -> Result<RefMut<'_, SpriteCache>, EngineError> {
        self.sprites.try_borrow_mut().map_err(|_| {
            EngineError::InvalidArgument("sprite cache is borrowed elsewhere".into())
        })
    }
}

fn draw<'e>(
    target: &mut Texture,
    camera: &Camera,
    sprites: &mut SpriteCache,
    entities: impl Iterator<Item = &'e (EntityId, Entity)>,
    rejected: &HashSet<EntityId>,
) -> FrameStats {
    let (width, height) = target.dimensions();
    let mut stats = FrameStats {
        skipped: rejected.len(),
        ..FrameStats::default()
    };

    for (id, entity) in entities {
        if rejected.contains(id) {
            continue;
        }
        let drawn = match &entity.sprite {
            Sprite::Image(name) => {
                let Some(source) = sprites.get(name) else {
                    tracing::debug!(entity = %id.short(), sprite = %name, "sprite unresolved");
                    stats.unresolved += 1;
                    continue;
                };
                draw_entity(target, width, height, camera, entity, &source)
            }
            Sprite::Texture(handle) => {
                let Ok(source) = handle.try_borrow() else {
                    stats.skipped += 1;
                    continue;
                };
                draw_entity(target, width, height, camera, entity, &source)
            }
        };
        if drawn {
            stats.drawn += 1;
        }
    }
    stats
}

impl Renderer for SpriteRenderer {
    type Output = Result<Texture, EngineError>;

    /// Render into a fresh texture, leaving the view's entity order alone.
    fn render(&self, view: &SceneView<'_>) -> Self::Output {
        let mut target = Texture::new(view.width, view.height)?;
        let rejected = self.check_entities(view.entities)?;
        let mut sprites = self.lock_sprites()?;
        let order = draw_order(view.entities);
        let stats = draw(
            &mut target,
            &view.camera,
            &mut sprites,
            order.into_iter().map(|i| &view.entities[i]),
            &rejected,
        );
        tracing::trace!(
            drawn = stats.drawn,
            skipped = stats.skipped,
            unresolved = stats.unresolved,
            "frame rendered to fresh texture"
        );
        Ok(target)
    }
}

fn violation(entity: &Entity) -> Option<String> {
    if let Some(reason) = entity.state_violation() {
        return Some(reason);
    }
    match &entity.sprite {
        Sprite::Texture(handle) if handle.try_borrow().is_err() => {
            Some("sprite texture is mutably borrowed".to_string())
        }
        _ => None,
    }
}

fn draw_entity(
    target: &mut Texture,
    width: u32,
    height: u32,
    camera: &Camera,
    entity: &Entity,
    source: &Texture,
) -> bool {
    match sprite_rect(
        width,
        height,
        camera,
        entity.position,
        entity.size,
        source.dimensions(),
    ) {
        Some(rect) => blit(target, source, &rect),
        None => false,
    }
}

/// Pixel range whose centres fall inside `[start, start + len)`, clipped to
/// `[0, limit)`.
fn covered(start: f32, len: f32, limit: u32) -> (u32, u32) {
    let lo = (start - 0.5).ceil().max(0.0);
    let hi = (start + len - 0.5).ceil().min(limit as f32);
    if hi <= lo {
        return (0, 0);
    }
    (lo as u32, hi as u32)
}

/// Nearest-neighbour scaled blit with alpha-over compositing. Returns true if
/// any pixel was touched.
fn blit(target: &mut Texture, source: &Texture, rect: &SpriteRect) -> bool {
    let (tw, th) = target.dimensions();
    let (sw, sh) = source.dimensions();
    let (x0, x1) = covered(rect.left, rect.width, tw);
    let (y0, y1) = covered(rect.top, rect.height, th);
    if x0 == x1 || y0 == y1 {
        return false;
    }
    let src = source.as_image();
    for py in y0..y1 {
        let v = (py as f32 + 0.5 - rect.top) / rect.height;
        let sy = ((v * sh as f32) as u32).min(sh - 1);
        for px in x0..x1 {
            let u = (px as f32 + 0.5 - rect.left) / rect.width;
            let sx = ((u * sw as f32) as u32).min(sw - 1);
            target.blend_pixel(px, py, *src.get_pixel(sx, sy));
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use shuen_assets::{MemorySpriteSource, SpriteCache};
    use shuen_texture::{Rgba, TRANSPARENT, TextureHandle};

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const GREEN: Rgba<u8> = Rgba([0, 255, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

    fn solid(width: u32, height: u32, color: Rgba<u8>) -> Texture {
        let mut t = Texture::new(width, height).unwrap();
        t.fill(color);
        t
    }

    fn renderer() -> SpriteRenderer {
        let source = MemorySpriteSource::new()
            .with("red", solid(1, 1, RED))
            .with("green", solid(1, 1, GREEN))
            .with("blue", solid(1, 1, BLUE))
            .with("wide", solid(2, 1, BLUE));
        SpriteRenderer::new(SpriteCache::new(source).shared())
    }

    fn entity(sprite: impl Into<Sprite>, size: f32, layer: i32, x: f32, y: f32) -> (EntityId, Entity) {
        let mut e = Entity::new(sprite, size, layer);
        e.position = Vec2::new(x, y);
        (EntityId::new(), e)
    }

    fn painted_rows(t: &Texture, x: u32) -> Vec<u32> {
        (0..t.height()).filter(|&y| t.pixel(x, y) != Some(TRANSPARENT)).collect()
    }

    #[test]
    fn feet_sit_on_the_centre_pixel() {
        let r = renderer();
        let mut target = Texture::new(200, 200).unwrap();
        let mut list = vec![entity("red", 1.0, 0, 0.0, 0.0)];
        r.render_frame(&mut target, 200, 200, &Camera::default(), &mut list).unwrap();
        assert_eq!(target.pixel(100, 99), Some(RED));
        assert_eq!(target.pixel(100, 100), Some(TRANSPARENT));
        assert_eq!(target.pixel(99, 99), Some(RED));
        assert_eq!(target.pixel(105, 99), Some(TRANSPARENT));
    }

    #[test]
    fn displayed_height_scales_with_distance() {
        let r = renderer();
        let mut target = Texture::new(200, 200).unwrap();
        let mut list = vec![entity("red", 2.0, 0, 0.0, 0.0)];

        r.render_frame(&mut target, 200, 200, &Camera::default(), &mut list).unwrap();
        assert_eq!(painted_rows(&target, 100), (80..100).collect::<Vec<_>>());

        let close = Camera::new(0.0, 0.0, 10.0).unwrap();
        r.render_frame(&mut target, 200, 200, &close, &mut list).unwrap();
        assert_eq!(painted_rows(&target, 100), (60..100).collect::<Vec<_>>());
    }

    #[test]
    fn wide_sprites_keep_their_aspect() {
        let r = renderer();
        let mut target = Texture::new(200, 200).unwrap();
        let mut list = vec![entity("wide", 2.0, 0, 0.0, 0.0)];
        r.render_frame(&mut target, 200, 200, &Camera::default(), &mut list).unwrap();
        let cols: Vec<u32> = (0..200).filter(|&x| target.pixel(x, 90) == Some(BLUE)).collect();
        assert_eq!(cols, (80..120).collect::<Vec<_>>());
    }

    #[test]
    fn composite_order_bottom_to_top() {
        let r = renderer();
        let mut target = Texture::new(200, 200).unwrap();
        // Same layer: A (y=5) is further away than B (y=3), C tops everything.
        let a = entity("red", 40.0, 0, 0.0, 5.0);
        let b = entity("green", 4.0, 0, 0.0, 3.0);
        let c = entity("blue", 1.0, 1, 0.0, 100.0);
        let ids = [a.0, b.0, c.0];
        let mut list = vec![c, b, a];
        let stats = r
            .render_frame(&mut target, 200, 200, &Camera::default(), &mut list)
            .unwrap();
        let order: Vec<EntityId> = list.iter().map(|(id, _)| *id).collect();
        assert_eq!(order, ids);
        // C lands far off-screen.
        assert_eq!(stats.drawn, 2);
        // B covers A where they overlap.
        assert_eq!(target.pixel(100, 40), Some(GREEN));
        assert_eq!(target.pixel(100, 10), Some(RED));
        assert_eq!(target.pixel(100, 60), Some(GREEN));
        assert_eq!(target.pixel(10, 40), Some(RED));
    }

    #[test]
    fn higher_layer_covers_lower_regardless_of_y() {
        let r = renderer();
        let mut target = Texture::new(100, 100).unwrap();
        let mut list = vec![
            entity("blue", 4.0, 1, 0.0, 0.0),
            entity("red", 4.0, 0, 0.0, -1.0),
        ];
        r.render_frame(&mut target, 100, 100, &Camera::default(), &mut list).unwrap();
        assert_eq!(target.pixel(50, 45), Some(BLUE));
    }

    #[test]
    fn target_is_resized_and_cleared() {
        let r = renderer();
        let mut target = solid(10, 10, GREEN);
        let mut list = Vec::new();
        r.render_frame(&mut target, 30, 20, &Camera::default(), &mut list).unwrap();
        assert_eq!(target.dimensions(), (30, 20));
        assert!(target.as_image().pixels().all(|p| *p == TRANSPARENT));

        let mut same = solid(30, 20, GREEN);
        r.render_frame(&mut same, 30, 20, &Camera::default(), &mut list).unwrap();
        assert!(same.as_image().pixels().all(|p| *p == TRANSPARENT));
    }

    #[test]
    fn malformed_entity_aborts_before_drawing() {
        let r = renderer();
        let mut target = solid(50, 50, GREEN);
        let bad = entity("red", 1.0, 0, f32::NAN, 0.0);
        let bad_id = bad.0;
        let mut list = vec![entity("red", 1.0, 0, 0.0, 0.0), bad];
        let err = r
            .render_frame(&mut target, 50, 50, &Camera::default(), &mut list)
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidEntityState { entity, .. } if entity == bad_id));
        assert_eq!(target.pixel(0, 0), Some(GREEN));
    }

    #[test]
    fn lenient_policy_skips_malformed_entity() {
        let r = renderer().with_config(RenderConfig::lenient());
        let mut target = Texture::new(200, 200).unwrap();
        let mut list = vec![
            entity("red", 1.0, 0, 0.0, 0.0),
            entity("blue", -1.0, 0, 0.0, 0.0),
        ];
        let stats = r
            .render_frame(&mut target, 200, 200, &Camera::default(), &mut list)
            .unwrap();
        assert_eq!(stats.drawn, 1);
        assert_eq!(stats.skipped, 1);
        assert_eq!(target.pixel(100, 99), Some(RED));
    }

    #[test]
    fn unknown_image_draws_nothing() {
        let r = renderer();
        let mut target = Texture::new(20, 20).unwrap();
        let mut list = vec![entity("ghost.png", 1.0, 0, 0.0, 0.0)];
        let stats = r
            .render_frame(&mut target, 20, 20, &Camera::default(), &mut list)
            .unwrap();
        assert_eq!(stats.unresolved, 1);
        assert!(target.as_image().pixels().all(|p| *p == TRANSPARENT));
    }

    #[test]
    fn texture_sprites_are_drawn() {
        let r = renderer();
        let inner = TextureHandle::new(solid(4, 4, GREEN));
        let mut target = Texture::new(200, 200).unwrap();
        let mut list = vec![entity(&inner, 2.0, 0, 0.0, 0.0)];
        r.render_frame(&mut target, 200, 200, &Camera::default(), &mut list).unwrap();
        assert_eq!(target.pixel(100, 90), Some(GREEN));
    }

    #[test]
    fn target_as_its_own_sprite_is_rejected() {
        let r = renderer();
        let output = TextureHandle::new(Texture::new(20, 20).unwrap());
        let mut list = vec![entity(&output, 1.0, 0, 0.0, 0.0)];
        let mut target = output.borrow_mut();
        let err = r
            .render_frame(&mut target, 20, 20, &Camera::default(), &mut list)
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidEntityState { .. }));
    }

    #[test]
    fn sprite_held_mutably_elsewhere_names_the_borrow() {
        let r = renderer();
        let busy = TextureHandle::new(solid(1, 1, RED));
        let mut list = vec![entity(&busy, 1.0, 0, 0.0, 0.0)];
        let _writer = busy.borrow_mut();
        let mut target = Texture::new(20, 20).unwrap();
        let err = r
            .render_frame(&mut target, 20, 20, &Camera::default(), &mut list)
            .unwrap_err();
        let EngineError::InvalidEntityState { reason, .. } = err else {
            panic!("expected InvalidEntityState, got {err:?}");
        };
        assert!(reason.contains("mutably borrowed"), "{reason}");
        assert!(!reason.contains("render target"), "{reason}");
    }

    #[test]
    fn borrowed_sprite_cache_fails_without_touching_target() {
        let r = renderer();
        let cache = r.sprites().clone();
        let _reader = cache.borrow();
        let mut target = solid(4, 4, GREEN);
        let mut list = vec![entity("red", 1.0, 0, 0.0, 0.0)];
        let err = r
            .render_frame(&mut target, 20, 20, &Camera::default(), &mut list)
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidArgument(_)));
        assert_eq!(target.dimensions(), (4, 4));
        assert_eq!(target.pixel(0, 0), Some(GREEN));
    }

    #[test]
    fn trait_render_with_borrowed_cache_is_an_error() {
        let r = renderer();
        let cache = r.sprites().clone();
        let _reader = cache.borrow();
        let list = vec![entity("red", 1.0, 0, 0.0, 0.0)];
        let view = SceneView {
            width: 20,
            height: 20,
            camera: Camera::default(),
            entities: &list,
        };
        assert!(matches!(r.render(&view), Err(EngineError::InvalidArgument(_))));
    }

    #[test]
    fn trait_render_leaves_order_alone() {
        let r = renderer();
        let list = vec![entity("red", 1.0, 1, 0.0, 0.0), entity("blue", 1.0, 0, 0.0, 0.0)];
        let ids: Vec<EntityId> = list.iter().map(|(id, _)| *id).collect();
        let view = SceneView {
            width: 200,
            height: 200,
            camera: Camera::default(),
            entities: &list,
        };
        let frame = r.render(&view).unwrap();
        assert_eq!(frame.pixel(100, 95), Some(RED));
        assert_eq!(list.iter().map(|(id, _)| *id).collect::<Vec<_>>(), ids);
    }

    #[test]
    fn sprites_partly_off_screen_are_clipped() {
        let r = renderer();
        let mut target = Texture::new(20, 20).unwrap();
        let mut list = vec![entity("red", 4.0, 0, -10.0, 0.0)];
        let stats = r
            .render_frame(&mut target, 20, 20, &Camera::default(), &mut list)
            .unwrap();
        assert_eq!(stats.drawn, 1);
        assert_eq!(target.pixel(0, 9), Some(RED));
        assert_eq!(target.pixel(2, 9), Some(TRANSPARENT));
    }
}
