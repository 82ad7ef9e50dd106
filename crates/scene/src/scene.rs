use shuen_assets::{FileSpriteSource, SharedSpriteCache, SpriteCache};
use shuen_common::{Camera, DEFAULT_CAMERA_DIST, EngineError, Entity, EntityId, Sprite};
use shuen_render::{FrameStats, RenderConfig, SceneView, SpriteRenderer};
use shuen_texture::{Texture, TextureHandle, check_dimensions};

use crate::registry::EntityRegistry;

/// A set of entities, the camera looking at them and the texture they are
/// rendered onto.
///
/// The pixel target (`width`, `height`) may change between renders, e.g. to
/// follow a resizable window; the output texture follows it on the next
/// render.
#[derive(Debug)]
pub struct Scene {
    width: u32,
    height: u32,
    registry: EntityRegistry,
    camera: Camera,
    output: TextureHandle,
    renderer: SpriteRenderer,
    last_frame: FrameStats,
}

impl Scene {
    /// Create an empty scene whose image sprites load from the working
    /// directory.
    pub fn new(width: u32, height: u32) -> Result<Self, EngineError> {
        let sprites = SpriteCache::new(FileSpriteSource::default()).shared();
        Self::with_sprites(width, height, sprites)
    }

    /// Create an empty scene resolving image sprites through `sprites`.
    /// Scenes handed the same cache load each image once between them.
    pub fn with_sprites(
        width: u32,
        height: u32,
        sprites: SharedSpriteCache,
    ) -> Result<Self, EngineError> {
        let output = TextureHandle::new(Texture::new(width, height)?);
        Ok(Self {
            width,
            height,
            registry: EntityRegistry::new(),
            camera: Camera::default(),
            output,
            renderer: SpriteRenderer::new(sprites),
            last_frame: FrameStats::default(),
        })
    }

    pub fn with_config(mut self, config: RenderConfig) -> Self {
        self.renderer.set_config(config);
        self
    }

    pub fn set_config(&mut self, config: RenderConfig) {
        self.renderer.set_config(config);
    }

    pub fn config(&self) -> &RenderConfig {
        self.renderer.config()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Change the pixel target used by the next render.
    pub fn set_size(&mut self, width: u32, height: u32) -> Result<(), EngineError> {
        check_dimensions(width, height)?;
        self.width = width;
        self.height = height;
        Ok(())
    }

    pub fn camera(&self) -> Camera {
        self.camera
    }

    pub fn sprites(&self) -> &SharedSpriteCache {
        self.renderer.sprites()
    }

    /// Create an entity at the origin. `size` is the sprite's world-space
    /// height; entities on higher layers draw on top.
    pub fn spawn(
        &mut self,
        sprite: impl Into<Sprite>,
        size: f32,
        layer: i32,
    ) -> Result<EntityId, EngineError> {
        let sprite = sprite.into();
        if matches!(&sprite, Sprite::Image(name) if name.is_empty()) {
            return Err(EngineError::InvalidEntityParams(
                "sprite identifier must not be empty".into(),
            ));
        }
        if !size.is_finite() || size <= 0.0 {
            return Err(EngineError::InvalidEntityParams(format!(
                "entity size must be a positive number, got {size}"
            )));
        }
        let id = self.registry.insert(Entity::new(sprite, size, layer));
        tracing::debug!(entity = %id.short(), size, layer, "entity spawned");
        Ok(id)
    }

    /// [`Scene::spawn`] with size 1 on layer 0.
    pub fn spawn_default(&mut self, sprite: impl Into<Sprite>) -> Result<EntityId, EngineError> {
        self.spawn(sprite, 1.0, 0)
    }

    /// Remove an entity. Unknown or already destroyed ids are ignored;
    /// returns whether anything was removed.
    pub fn destroy(&mut self, id: EntityId) -> bool {
        let removed = self.registry.remove(id).is_some();
        if removed {
            tracing::debug!(entity = %id.short(), "entity destroyed");
        }
        removed
    }

    /// Centre the camera on `(x, y)` showing `dist` world units vertically.
    /// On error the camera is left as it was.
    pub fn look_at(&mut self, x: f32, y: f32, dist: f32) -> Result<(), EngineError> {
        self.camera = Camera::new(x, y, dist)?;
        Ok(())
    }

    /// [`Scene::look_at`] with the default distance.
    pub fn look_at_default(&mut self, x: f32, y: f32) -> Result<(), EngineError> {
        self.look_at(x, y, DEFAULT_CAMERA_DIST)
    }

    /// Copy of the registered entities at the time of calling. The order may
    /// change between calls, since rendering sorts the registry.
    pub fn entities(&self) -> Vec<(EntityId, Entity)> {
        self.registry.as_slice().to_vec()
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.registry.get(id)
    }

    /// Game code moves entities through this.
    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.registry.get_mut(id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.registry.contains(id)
    }

    pub fn entity_count(&self) -> usize {
        self.registry.len()
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    /// Everything the next frame depends on, for alternative renderers.
    pub fn view(&self) -> SceneView<'_> {
        SceneView {
            width: self.width,
            height: self.height,
            camera: self.camera,
            entities: self.registry.as_slice(),
        }
    }

    /// The output texture, as last rendered.
    pub fn output(&self) -> TextureHandle {
        self.output.clone()
    }

    /// Counters from the last successful render.
    pub fn last_frame(&self) -> FrameStats {
        self.last_frame
    }

    /// Draw the scene onto its output texture and return it.
    ///
    /// Always the same handle; the texture is reallocated only when the
    /// scene's size changed.
    pub fn render(&mut self) -> Result<TextureHandle, EngineError> {
        let mut target = self.output.try_borrow_mut().map_err(|_| {
            EngineError::InvalidArgument("scene output texture is borrowed elsewhere".into())
        })?;
        self.last_frame = self.renderer.render_frame(
            &mut target,
            self.width,
            self.height,
            &self.camera,
            self.registry.as_mut_slice(),
        )?;
        drop(target);
        Ok(self.output.clone())
    }
}
