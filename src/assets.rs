//! Asset manifest and texture loading
//!
//! The manifest is a JSON tree. Any string leaf is a texture path, and an object
//! with a `texture` key is a path plus metadata (wheel anchors, pool scoring, ...).
//! Loading walks the tree once, fetches each distinct path a single time and
//! reports integer percent progress as it goes.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use glam::Vec2;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::sim::{ObjectKind, PoolEntry, SpawnPools};
use crate::tuning::Tuning;

/// Side length used for placeholder textures
pub const PLACEHOLDER_SIZE: u32 = 64;

/// Manifest bundled with the headless runner. Its paths do not exist on disk and
/// are meant to be loaded with [`MissingAssetPolicy::Placeholder`].
pub const DEFAULT_MANIFEST: &str = r#"{
    "vehicle": {
        "body": "truck/body.png",
        "wheels": [
            { "texture": "truck/wheel.png", "x": -70, "y": -14 },
            { "texture": "truck/wheel.png", "x": 72, "y": -14 }
        ]
    },
    "background": "scene/background.png",
    "good": [
        { "texture": "cargo/crate.png", "label": "Crate", "score": 10, "weight": 4, "color": 16761095 },
        { "texture": "cargo/barrel.png", "label": "Barrel", "score": 20, "weight": 2, "color": 9127187 },
        { "texture": "cargo/star.png", "label": "Gold Star", "score": 50, "weight": 1, "color": 16766720, "scale": 0.35 }
    ],
    "hazards": [
        { "texture": "hazard/anvil.png", "label": "Anvil", "score": -30, "weight": 2, "color": 8421504 },
        { "texture": "hazard/bomb.png", "label": "Bomb", "score": -50, "weight": 1, "color": 16729344 }
    ]
}"#;

/// A loaded texture handle. Only dimensions matter to the simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    pub id: u32,
    pub path: Arc<str>,
    pub width: u32,
    pub height: u32,
    pub placeholder: bool,
}

impl Texture {
    pub fn placeholder(id: u32, path: &str) -> Self {
        Self {
            id,
            path: path.into(),
            width: PLACEHOLDER_SIZE,
            height: PLACEHOLDER_SIZE,
            placeholder: true,
        }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }
}

/// What to do when a single texture cannot be fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingAssetPolicy {
    /// Abort loading with the first error
    #[default]
    Fail,
    /// Log a warning and substitute a placeholder texture
    Placeholder,
}

/// Where texture bytes come from
pub trait TextureSource {
    /// Fetch a texture and return its pixel dimensions
    fn fetch(&mut self, path: &str) -> Result<(u32, u32)>;
}

/// Reads image headers from a directory on disk
#[derive(Debug, Clone)]
pub struct FsTextureSource {
    root: PathBuf,
}

impl FsTextureSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl TextureSource for FsTextureSource {
    fn fetch(&mut self, path: &str) -> Result<(u32, u32)> {
        image::image_dimensions(self.root.join(path)).map_err(|err| Error::AssetLoad {
            path: path.to_string(),
            reason: err.to_string(),
        })
    }
}

/// A source that has nothing; pairs with [`MissingAssetPolicy::Placeholder`]
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTextureSource;

impl TextureSource for NullTextureSource {
    fn fetch(&mut self, path: &str) -> Result<(u32, u32)> {
        Err(Error::AssetLoad {
            path: path.to_string(),
            reason: "no texture source configured".to_string(),
        })
    }
}

/// Loaded textures keyed by manifest path
#[derive(Debug, Clone, Default)]
pub struct TextureCache {
    textures: HashMap<String, Texture>,
}

impl TextureCache {
    pub fn get(&self, path: &str) -> Option<&Texture> {
        self.textures.get(path)
    }

    pub fn require(&self, path: &str) -> Result<&Texture> {
        self.get(path)
            .ok_or_else(|| Error::Manifest(format!("texture `{path}` was never loaded")))
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    pub fn placeholder_count(&self) -> usize {
        self.textures.values().filter(|t| t.placeholder).count()
    }
}

/// Collect every texture path referenced by a manifest, deduplicated, in
/// first-seen order.
pub fn collect_texture_paths(manifest: &Value) -> Vec<String> {
    fn walk(value: &Value, out: &mut Vec<String>) {
        match value {
            Value::String(path) => push_unique(out, path),
            Value::Array(items) => items.iter().for_each(|item| walk(item, out)),
            Value::Object(map) => match map.get("texture") {
                // Sibling keys are metadata, not paths
                Some(Value::String(path)) => push_unique(out, path),
                _ => map.values().for_each(|item| walk(item, out)),
            },
            _ => {}
        }
    }

    fn push_unique(out: &mut Vec<String>, path: &str) {
        if !out.iter().any(|p| p == path) {
            out.push(path.to_string());
        }
    }

    let mut paths = Vec::new();
    walk(manifest, &mut paths);
    paths
}

/// Load every texture the manifest references.
///
/// `on_progress` receives a non-decreasing integer percentage after each texture
/// and always ends with exactly 100.
pub fn load_textures(
    manifest: &Value,
    source: &mut dyn TextureSource,
    policy: MissingAssetPolicy,
    mut on_progress: impl FnMut(u8),
) -> Result<TextureCache> {
    let paths = collect_texture_paths(manifest);
    let total = paths.len();
    let mut cache = TextureCache::default();

    if total == 0 {
        on_progress(100);
        return Ok(cache);
    }

    for (i, path) in paths.into_iter().enumerate() {
        let id = i as u32;
        let texture = match source.fetch(&path) {
            Ok((width, height)) => Texture {
                id,
                path: path.as_str().into(),
                width,
                height,
                placeholder: false,
            },
            Err(err) => match policy {
                MissingAssetPolicy::Fail => return Err(err),
                MissingAssetPolicy::Placeholder => {
                    log::warn!("{err}; using placeholder");
                    Texture::placeholder(id, &path)
                }
            },
        };
        cache.textures.insert(path, texture);
        on_progress(((i + 1) * 100 / total) as u8);
    }

    log::info!(
        "Loaded {} textures ({} placeholders)",
        cache.len(),
        cache.placeholder_count()
    );
    Ok(cache)
}

/// Typed view of the manifest
#[derive(Debug, Clone, Deserialize)]
pub struct AssetManifest {
    pub vehicle: VehicleManifest,
    pub background: String,
    pub good: Vec<PoolManifestEntry>,
    pub hazards: Vec<PoolManifestEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VehicleManifest {
    pub body: String,
    #[serde(default)]
    pub wheels: Vec<WheelManifest>,
}

/// Wheel texture plus its alignment point relative to the body's bottom-center
#[derive(Debug, Clone, Deserialize)]
pub struct WheelManifest {
    pub texture: String,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PoolManifestEntry {
    pub texture: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub score: Option<i32>,
    #[serde(default)]
    pub weight: Option<f32>,
    /// Particle tint as 0xRRGGBB
    #[serde(default)]
    pub color: Option<u32>,
    #[serde(default)]
    pub scale: Option<f32>,
}

impl AssetManifest {
    pub fn from_value(value: &Value) -> Result<Self> {
        Self::deserialize(value).map_err(|err| Error::Manifest(err.to_string()))
    }
}

/// Default per-pool values for entries that omit them
const GOOD_DEFAULT_SCORE: i32 = 10;
const HAZARD_DEFAULT_SCORE: i32 = -25;
const DEFAULT_TINT: u32 = 0xFFFFFF;

/// Everything a session needs from the loaded assets
#[derive(Debug, Clone)]
pub struct SessionAssets {
    pub body: Texture,
    /// Wheel texture and offset from the body's bottom-center anchor
    pub wheels: Vec<(Texture, Vec2)>,
    pub background: Texture,
    pub pools: SpawnPools,
}

impl SessionAssets {
    pub fn from_manifest(
        manifest: &AssetManifest,
        textures: &TextureCache,
        tuning: &Tuning,
    ) -> Result<Self> {
        let wheels = manifest
            .vehicle
            .wheels
            .iter()
            .map(|w| -> Result<(Texture, Vec2)> {
                Ok((textures.require(&w.texture)?.clone(), Vec2::new(w.x, w.y)))
            })
            .collect::<Result<Vec<_>>>()?;

        let pool = |kind: ObjectKind, entries: &[PoolManifestEntry]| -> Result<Vec<PoolEntry>> {
            let (default_score, default_scale) = match kind {
                ObjectKind::Good => (GOOD_DEFAULT_SCORE, tuning.good_scale),
                ObjectKind::Hazard => (HAZARD_DEFAULT_SCORE, tuning.hazard_scale),
            };
            entries
                .iter()
                .map(|entry| -> Result<PoolEntry> {
                    let texture = textures.require(&entry.texture)?.clone();
                    let label = entry.label.clone().unwrap_or_else(|| entry.texture.clone());
                    Ok(PoolEntry {
                        label: label.into(),
                        texture,
                        weight: entry.weight.unwrap_or(1.0),
                        value: entry.score.unwrap_or(default_score),
                        tint: entry.color.unwrap_or(DEFAULT_TINT),
                        scale: entry.scale.unwrap_or(default_scale),
                    })
                })
                .collect()
        };

        Ok(Self {
            body: textures.require(&manifest.vehicle.body)?.clone(),
            wheels,
            background: textures.require(&manifest.background)?.clone(),
            pools: SpawnPools::new(
                pool(ObjectKind::Good, &manifest.good)?,
                pool(ObjectKind::Hazard, &manifest.hazards)?,
            )?,
        })
    }

    /// Parse, load and assemble in one go
    pub fn load(
        manifest_json: &str,
        source: &mut dyn TextureSource,
        policy: MissingAssetPolicy,
        tuning: &Tuning,
        on_progress: impl FnMut(u8),
    ) -> Result<Self> {
        let value: Value = serde_json::from_str(manifest_json)?;
        let manifest = AssetManifest::from_value(&value)?;
        let textures = load_textures(&value, source, policy, on_progress)?;
        Self::from_manifest(&manifest, &textures, tuning)
    }

    /// The bundled manifest with placeholder textures throughout
    pub fn placeholder(tuning: &Tuning) -> Result<Self> {
        Self::load(
            DEFAULT_MANIFEST,
            &mut NullTextureSource,
            MissingAssetPolicy::Placeholder,
            tuning,
            |_| {},
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Serves fixed dimensions and counts fetches per path
    #[derive(Default)]
    struct CountingSource {
        fetched: Vec<String>,
        missing: Vec<&'static str>,
    }

    impl TextureSource for CountingSource {
        fn fetch(&mut self, path: &str) -> Result<(u32, u32)> {
            self.fetched.push(path.to_string());
            if self.missing.contains(&path) {
                return Err(Error::AssetLoad {
                    path: path.to_string(),
                    reason: "404".to_string(),
                });
            }
            Ok((100, 50))
        }
    }

    #[test]
    fn collects_nested_paths_once() {
        let manifest = json!({
            "vehicle": {
                "body": "body.png",
                "wheels": [
                    { "texture": "wheel.png", "x": -10, "y": 0 },
                    { "texture": "wheel.png", "x": 10, "y": 0 }
                ]
            },
            "background": "bg.png",
            "good": [{ "texture": "apple.png", "label": "Apple", "score": 10 }],
            "hazards": [["deep/rock.png", "body.png"]]
        });

        let paths = collect_texture_paths(&manifest);
        assert_eq!(paths.len(), 5);
        for expected in ["body.png", "wheel.png", "bg.png", "apple.png", "deep/rock.png"] {
            assert!(paths.iter().any(|p| p == expected), "missing {expected}");
        }
        // Labels are metadata, never paths
        assert!(!paths.iter().any(|p| p == "Apple"));
    }

    #[test]
    fn progress_is_monotonic_and_ends_at_100() {
        let manifest = json!(["a.png", "b.png", "c.png", "a.png"]);
        let mut source = CountingSource::default();
        let mut progress = Vec::new();

        let cache = load_textures(&manifest, &mut source, MissingAssetPolicy::Fail, |p| {
            progress.push(p)
        })
        .expect("all textures load");

        assert_eq!(cache.len(), 3);
        assert_eq!(source.fetched.len(), 3);
        assert_eq!(progress, vec![33, 66, 100]);
        assert!(progress.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn empty_manifest_reports_complete() {
        let mut progress = Vec::new();
        let cache = load_textures(
            &json!({}),
            &mut CountingSource::default(),
            MissingAssetPolicy::Fail,
            |p| progress.push(p),
        )
        .expect("nothing to load");
        assert!(cache.is_empty());
        assert_eq!(progress, vec![100]);
    }

    #[test]
    fn missing_texture_fails_by_default() {
        let mut source = CountingSource {
            missing: vec!["b.png"],
            ..Default::default()
        };
        let err = load_textures(
            &json!(["a.png", "b.png"]),
            &mut source,
            MissingAssetPolicy::Fail,
            |_| {},
        )
        .unwrap_err();
        assert!(matches!(err, Error::AssetLoad { ref path, .. } if path == "b.png"));
    }

    #[test]
    fn missing_texture_becomes_placeholder_when_allowed() {
        let mut source = CountingSource {
            missing: vec!["b.png"],
            ..Default::default()
        };
        let cache = load_textures(
            &json!(["a.png", "b.png"]),
            &mut source,
            MissingAssetPolicy::Placeholder,
            |_| {},
        )
        .expect("placeholder substituted");
        let b = cache.get("b.png").expect("present");
        assert!(b.placeholder);
        assert_eq!(b.width, PLACEHOLDER_SIZE);
        assert!(!cache.get("a.png").expect("present").placeholder);
    }

    #[test]
    fn bundled_manifest_assembles_pools() {
        let assets = SessionAssets::placeholder(&Tuning::default()).expect("bundled manifest");
        assert_eq!(assets.wheels.len(), 2);
        assert_eq!(assets.pools.good.len(), 3);
        assert_eq!(assets.pools.hazard.len(), 2);
        assert!(assets.pools.hazard.iter().all(|e| e.value < 0));
        // Per-entry scale overrides the pool default
        assert_eq!(assets.pools.good[2].scale, 0.35);
        assert_eq!(assets.pools.good[0].scale, Tuning::default().good_scale);
    }

    #[test]
    fn manifest_hazard_with_positive_score_is_rejected() {
        let json = r#"{
            "vehicle": { "body": "b.png" },
            "background": "bg.png",
            "good": [{ "texture": "g.png" }],
            "hazards": [{ "texture": "h.png", "score": 40 }]
        }"#;
        let err = SessionAssets::load(
            json,
            &mut NullTextureSource,
            MissingAssetPolicy::Placeholder,
            &Tuning::default(),
            |_| {},
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::WrongValueSign {
                kind: ObjectKind::Hazard,
                value: 40,
                ..
            }
        ));
    }

    #[test]
    fn manifest_with_empty_pool_is_rejected() {
        let json = r#"{
            "vehicle": { "body": "b.png" },
            "background": "bg.png",
            "good": [],
            "hazards": [{ "texture": "h.png" }]
        }"#;
        let err = SessionAssets::load(
            json,
            &mut NullTextureSource,
            MissingAssetPolicy::Placeholder,
            &Tuning::default(),
            |_| {},
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::EmptyPool {
                kind: ObjectKind::Good
            }
        ));
    }
}
