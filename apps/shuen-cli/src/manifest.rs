//! Scene manifests: a YAML or JSON description of one frame.
//!
//! ```yaml
//! width: 320
//! height: 240
//! sprites: assets
//! camera: { x: 0.0, y: 2.0, dist: 12.0 }
//! entities:
//!   - { sprite: floor.png, size: 24, layer: -2, y: -8 }
//!   - { sprite: cat.png, size: 2, x: 1.5 }
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use shuen_assets::{FileSpriteSource, SpriteCache};
use shuen_common::DEFAULT_CAMERA_DIST;
use shuen_render::RenderConfig;
use shuen_scene::Scene;
use shuen_texture::dimension;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneManifest {
    pub width: f64,
    pub height: f64,
    /// Sprite directory, relative to the manifest.
    #[serde(default)]
    pub sprites: Option<PathBuf>,
    #[serde(default)]
    pub camera: CameraEntry,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub entities: Vec<EntityEntry>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CameraEntry {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default = "default_dist")]
    pub dist: f32,
}

impl Default for CameraEntry {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            dist: DEFAULT_CAMERA_DIST,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityEntry {
    pub sprite: String,
    #[serde(default = "default_size")]
    pub size: f32,
    #[serde(default)]
    pub layer: i32,
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
}

fn default_dist() -> f32 {
    DEFAULT_CAMERA_DIST
}

fn default_size() -> f32 {
    1.0
}

impl SceneManifest {
    /// Read a manifest; `.json` files are parsed as JSON, anything else as
    /// YAML.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading manifest {}", path.display()))?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let parsed = if is_json {
            Self::from_json(&text)
        } else {
            Self::from_yaml(&text)
        };
        parsed.with_context(|| format!("parsing manifest {}", path.display()))
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Build the described scene. Sprites resolve relative to `base_dir`.
    pub fn build(&self, base_dir: &Path) -> Result<Scene> {
        let width = dimension(self.width).context("manifest width")?;
        let height = dimension(self.height).context("manifest height")?;
        let root = match &self.sprites {
            Some(dir) => base_dir.join(dir),
            None => base_dir.to_path_buf(),
        };
        tracing::debug!(root = %root.display(), "sprite directory");

        let sprites = SpriteCache::new(FileSpriteSource::new(root)).shared();
        let mut scene = Scene::with_sprites(width, height, sprites)?.with_config(self.render);
        scene
            .look_at(self.camera.x, self.camera.y, self.camera.dist)
            .context("manifest camera")?;

        for (i, entry) in self.entities.iter().enumerate() {
            let id = scene
                .spawn(entry.sprite.as_str(), entry.size, entry.layer)
                .with_context(|| format!("manifest entity #{i} ({})", entry.sprite))?;
            if let Some(entity) = scene.entity_mut(id) {
                entity.position = Vec2::new(entry.x, entry.y);
            }
        }
        Ok(scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shuen_render::InvalidEntityPolicy;
    use shuen_texture::{Rgba, RgbaImage};

    #[test]
    fn yaml_defaults() {
        let m = SceneManifest::from_yaml(
            "width: 64\nheight: 48\nentities:\n  - sprite: cat.png\n",
        )
        .unwrap();
        assert_eq!(m.camera.dist, 20.0);
        assert_eq!(m.render.invalid_entity_policy, InvalidEntityPolicy::Abort);
        let e = &m.entities[0];
        assert_eq!((e.size, e.layer, e.x, e.y), (1.0, 0, 0.0, 0.0));
    }

    #[test]
    fn json_manifest() {
        let m = SceneManifest::from_json(
            r#"{"width": 10, "height": 10, "camera": {"dist": 5},
                "render": {"invalid_entity_policy": "skip"},
                "entities": [{"sprite": "a.png", "layer": 2, "y": 1.5}]}"#,
        )
        .unwrap();
        assert_eq!(m.camera.dist, 5.0);
        assert_eq!(m.render, RenderConfig::lenient());
        assert_eq!(m.entities[0].layer, 2);
    }

    #[test]
    fn fractional_width_is_rejected() {
        let m = SceneManifest::from_yaml("width: 10.5\nheight: 10\n").unwrap();
        assert!(m.build(Path::new(".")).is_err());
    }

    #[test]
    fn bad_entity_is_reported() {
        let m = SceneManifest::from_yaml(
            "width: 10\nheight: 10\nentities:\n  - { sprite: a.png, size: -2 }\n",
        )
        .unwrap();
        let err = m.build(Path::new(".")).unwrap_err();
        assert!(format!("{err:#}").contains("entity #0"));
    }

    #[test]
    fn builds_and_renders_from_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("art")).unwrap();
        let red = RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 255]));
        red.save(dir.path().join("art/box.png")).unwrap();

        let path = dir.path().join("scene.yaml");
        std::fs::write(
            &path,
            "width: 100\nheight: 100\nsprites: art\ncamera: { x: 0, y: 0, dist: 10 }\n\
             entities:\n  - { sprite: box.png, size: 2, x: 1, y: -1 }\n",
        )
        .unwrap();

        let manifest = SceneManifest::load(&path).unwrap();
        let mut scene = manifest.build(dir.path()).unwrap();
        let frame = scene.render().unwrap();
        let frame = frame.borrow();
        // Feet at (60, 60), 20px square.
        assert_eq!(frame.pixel(60, 59), Some(Rgba([255, 0, 0, 255])));
        assert_eq!(frame.pixel(60, 60), Some(Rgba([0, 0, 0, 0])));
        assert_eq!(frame.pixel(50, 40), Some(Rgba([255, 0, 0, 255])));
        assert_eq!(frame.pixel(49, 40), Some(Rgba([0, 0, 0, 0])));
    }
}
