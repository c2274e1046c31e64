use glam::Vec3;
use nave_common::Aabb;
use std::path::{Path, PathBuf};

use crate::scene::{AssetKind, AssetSpec};
use crate::{AssetError, Geometry};

/// Source of geometry for named assets.
///
/// Loads run on worker threads, so implementations must be shareable. A
/// loader either returns the geometry or an error; it never retries.
pub trait GeometryLoader: Send + Sync {
    fn load(&self, spec: &AssetSpec) -> Result<Geometry, AssetError>;
}

/// Faces a sky cube directory must provide.
const SKY_FACES: [&str; 6] = [
    "posx.jpg", "negx.jpg", "posy.jpg", "negy.jpg", "posz.jpg", "negz.jpg",
];

/// Reads three.js JSON models from a model root and checks sky textures
/// under a texture root.
#[derive(Debug, Clone)]
pub struct JsonModelLoader {
    model_root: PathBuf,
    texture_root: PathBuf,
}

impl JsonModelLoader {
    /// Textures are looked up in a `Textures` directory next to the model root.
    pub fn new(model_root: impl Into<PathBuf>) -> Self {
        let model_root = model_root.into();
        let texture_root = model_root
            .parent()
            .map(|p| p.join("Textures"))
            .unwrap_or_else(|| PathBuf::from("Textures"));
        Self {
            model_root,
            texture_root,
        }
    }

    pub fn with_texture_root(mut self, texture_root: impl Into<PathBuf>) -> Self {
        self.texture_root = texture_root.into();
        self
    }

    pub fn model_root(&self) -> &Path {
        &self.model_root
    }

    fn read(path: &Path) -> Result<String, AssetError> {
        std::fs::read_to_string(path).map_err(|source| AssetError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl GeometryLoader for JsonModelLoader {
    fn load(&self, spec: &AssetSpec) -> Result<Geometry, AssetError> {
        match spec.kind {
            AssetKind::Mesh => {
                let path = self.model_root.join(spec.file);
                let text = Self::read(&path)?;
                let geometry = Geometry::from_json(spec.name, &text)?;
                tracing::debug!(
                    asset = spec.name,
                    vertices = geometry.vertex_count(),
                    "parsed model"
                );
                Ok(geometry)
            }
            AssetKind::CubeTexture => {
                let dir = self.texture_root.join(spec.file);
                for face in SKY_FACES {
                    let path = dir.join(face);
                    if !path.is_file() {
                        return Err(AssetError::Io {
                            path,
                            source: std::io::Error::from(std::io::ErrorKind::NotFound),
                        });
                    }
                }
                Ok(Geometry::new(spec.name, Vec::new()))
            }
        }
    }
}

/// Procedural stand-in geometry: one box per asset, sized to the chapel.
///
/// Lets the walkthrough and the headless tools run without the model files.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinLoader;

impl BuiltinLoader {
    pub fn new() -> Self {
        Self
    }

    fn extents(name: &str) -> Option<Option<Aabb>> {
        let b = |min: [f32; 3], max: [f32; 3]| Some(Some(Aabb::new(Vec3::from(min), Vec3::from(max))));
        match name {
            "Floor" => b([-5.0, -0.05, -8.0], [5.0, 0.0, 8.0]),
            "Ceiling" => b([-5.0, 7.0, -8.0], [5.0, 7.2, 8.0]),
            "WallLeft" => b([5.0, 0.0, -8.0], [5.2, 7.0, 8.0]),
            "WallRight" => b([-5.2, 0.0, -8.0], [-5.0, 7.0, 8.0]),
            "WallBack" => b([-5.0, 0.0, 7.9], [5.0, 7.0, 8.1]),
            "WallFront" => b([-5.0, 0.0, -8.1], [5.0, 7.0, -7.9]),
            "Stage" => b([-1.5, 0.0, 4.5], [1.5, 0.5, 7.5]),
            "Door" => b([-1.0, 0.0, -8.2], [1.0, 2.5, -7.8]),
            "Podium" => b([-0.4, 0.5, 5.2], [0.4, 1.7, 5.8]),
            "BigWindow" => b([-2.0, 2.0, 7.85], [2.0, 6.0, 7.95]),
            "candle" => b([-1.0, 0.0, -1.0], [1.0, 2.0, 1.0]),
            "SmallWindow1" => b([-0.4, -0.8, -0.05], [0.4, 0.8, 0.05]),
            "BrokenWindow" => b([-5.05, 2.5, -6.0], [-4.95, 4.0, -4.5]),
            "Rubble" => b([3.0, 0.0, -7.0], [4.5, 0.6, -5.5]),
            "beam" => b([-5.0, -0.15, -0.15], [5.0, 0.15, 0.15]),
            "pew" => b([-0.75, -0.23, -0.2], [0.75, 0.5, 0.2]),
            "Sky" => Some(None),
            _ => None,
        }
    }
}

impl GeometryLoader for BuiltinLoader {
    fn load(&self, spec: &AssetSpec) -> Result<Geometry, AssetError> {
        match Self::extents(spec.name) {
            Some(Some(bounds)) => Ok(Geometry::from_bounds(spec.name, bounds)),
            Some(None) => Ok(Geometry::new(spec.name, Vec::new())),
            None => Err(AssetError::Unknown(spec.name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CHAPEL_ASSETS;

    #[test]
    fn builtin_covers_every_startup_asset() {
        let loader = BuiltinLoader::new();
        for spec in &CHAPEL_ASSETS {
            assert!(loader.load(spec).is_ok(), "{} missing", spec.name);
        }
    }

    #[test]
    fn builtin_rejects_unknown_asset() {
        let spec = AssetSpec {
            name: "Organ",
            file: "Organ.json",
            kind: AssetKind::Mesh,
        };
        assert!(matches!(BuiltinLoader.load(&spec), Err(AssetError::Unknown(_))));
    }

    #[test]
    fn json_loader_reads_model_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Door.json"), r#"{ "vertices": [0,0,0, 1,2,0.5] }"#).unwrap();
        let loader = JsonModelLoader::new(dir.path());
        let spec = CHAPEL_ASSETS.iter().find(|s| s.name == "Door").unwrap();
        let g = loader.load(spec).unwrap();
        assert_eq!(g.local_bounds().unwrap().max, Vec3::new(1.0, 2.0, 0.5));
    }

    #[test]
    fn json_loader_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let loader = JsonModelLoader::new(dir.path());
        let spec = CHAPEL_ASSETS.iter().find(|s| s.name == "Floor").unwrap();
        let err = loader.load(spec).unwrap_err();
        assert!(matches!(err, AssetError::Io { .. }));
        assert!(err.to_string().contains("Floor.json"));
    }

    #[test]
    fn sky_requires_all_six_faces() {
        let dir = tempfile::tempdir().unwrap();
        let sky = dir.path().join("Sky");
        std::fs::create_dir_all(&sky).unwrap();
        let spec = CHAPEL_ASSETS.iter().find(|s| s.name == "Sky").unwrap();
        let loader = JsonModelLoader::new(dir.path().join("Models")).with_texture_root(dir.path());

        assert!(loader.load(spec).is_err());
        for face in SKY_FACES {
            std::fs::write(sky.join(face), b"").unwrap();
        }
        let g = loader.load(spec).unwrap();
        assert_eq!(g.vertex_count(), 0);
    }
}
