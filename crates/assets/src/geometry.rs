use glam::Vec3;
use nave_common::{Aabb, Transform};
use serde::Deserialize;

use crate::AssetError;

/// Vertex positions of a loaded asset in its local space.
///
/// Only positions are retained; the walkthrough needs bounds, not shading
/// data.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    pub name: String,
    pub positions: Vec<Vec3>,
    pub material_count: usize,
}

/// Subset of the three.js JSON model format (version 3) that carries
/// geometry extents.
#[derive(Debug, Deserialize)]
struct JsonModel {
    #[serde(default)]
    scale: Option<f32>,
    #[serde(default)]
    vertices: Vec<f32>,
    #[serde(default)]
    materials: Vec<serde_json::Value>,
}

impl Geometry {
    pub fn new(name: impl Into<String>, positions: Vec<Vec3>) -> Self {
        Self {
            name: name.into(),
            positions,
            material_count: 0,
        }
    }

    /// Geometry made of the eight corners of `bounds`.
    pub fn from_bounds(name: impl Into<String>, bounds: Aabb) -> Self {
        let (lo, hi) = (bounds.min, bounds.max);
        let corners = vec![
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(lo.x, hi.y, hi.z),
            Vec3::new(hi.x, hi.y, hi.z),
        ];
        Self::new(name, corners)
    }

    /// Parse a three.js JSON model document.
    ///
    /// `vertices` is a flat `[x, y, z, ...]` array; a top-level `scale`
    /// divides every coordinate, matching the exporter's convention.
    pub fn from_json(name: &str, text: &str) -> Result<Self, AssetError> {
        let model: JsonModel = serde_json::from_str(text).map_err(|source| AssetError::Json {
            asset: name.to_string(),
            source,
        })?;

        if model.vertices.len() % 3 != 0 {
            return Err(AssetError::Malformed {
                asset: name.to_string(),
                reason: format!("vertex array length {} is not a multiple of 3", model.vertices.len()),
            });
        }
        let scale = match model.scale {
            Some(s) if s != 0.0 => 1.0 / s,
            Some(_) => {
                return Err(AssetError::Malformed {
                    asset: name.to_string(),
                    reason: "scale is zero".into(),
                });
            }
            None => 1.0,
        };

        let positions = model
            .vertices
            .chunks_exact(3)
            .map(|v| Vec3::new(v[0], v[1], v[2]) * scale)
            .collect();

        Ok(Self {
            name: name.to_string(),
            positions,
            material_count: model.materials.len(),
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Local-space bounds. `None` for geometry without vertices.
    pub fn local_bounds(&self) -> Option<Aabb> {
        Aabb::from_points(self.positions.iter().copied())
    }

    /// World-space bounds of this geometry placed at `transform`.
    ///
    /// Every vertex is transformed before taking the extents, so a rotated
    /// mesh gets the tight box of its actual vertices.
    pub fn world_bounds(&self, transform: &Transform) -> Option<Aabb> {
        let m = transform.matrix();
        Aabb::from_points(self.positions.iter().map(|p| m.transform_point3(*p)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flat_vertex_array() {
        let g = Geometry::from_json(
            "Wall",
            r#"{ "vertices": [0, 0, 0, 1, 2, 3, -1, 0.5, 0], "materials": [{}, {}] }"#,
        )
        .unwrap();
        assert_eq!(g.vertex_count(), 3);
        assert_eq!(g.material_count, 2);
        let b = g.local_bounds().unwrap();
        assert_eq!(b.min, Vec3::new(-1.0, 0.0, 0.0));
        assert_eq!(b.max, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn applies_inverse_scale() {
        let g = Geometry::from_json("Wall", r#"{ "scale": 2.0, "vertices": [2, 4, 6] }"#).unwrap();
        assert_eq!(g.positions[0], Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn rejects_ragged_vertices() {
        let err = Geometry::from_json("Wall", r#"{ "vertices": [0, 1] }"#).unwrap_err();
        assert!(matches!(err, AssetError::Malformed { .. }));
    }

    #[test]
    fn rejects_invalid_json() {
        let err = Geometry::from_json("Wall", "not json").unwrap_err();
        assert!(matches!(err, AssetError::Json { .. }));
    }

    #[test]
    fn world_bounds_follow_placement() {
        let g = Geometry::from_bounds("pew", Aabb::new(Vec3::splat(-0.5), Vec3::splat(0.5)));
        let b = g
            .world_bounds(&Transform::at(Vec3::new(1.8, 0.23, -6.0)))
            .unwrap();
        assert!((b.center() - Vec3::new(1.8, 0.23, -6.0)).length() < 1e-6);
    }

    #[test]
    fn empty_geometry_has_no_bounds() {
        let g = Geometry::new("sky", Vec::new());
        assert!(g.local_bounds().is_none());
        assert!(g.world_bounds(&Transform::default()).is_none());
    }
}
