//! Chapel scene layout.
//!
//! Maps each of the startup assets to the colliders, props and decorative
//! elements it contributes once its geometry arrives. Placement numbers are
//! the authored layout of the chapel and are kept verbatim.

use glam::Vec3;
use nave_common::{Aabb, Transform};
use std::f32::consts::{FRAC_PI_2, PI};

use crate::Geometry;

/// What kind of resource a startup asset is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    /// A JSON mesh under the model root.
    Mesh,
    /// The six-face sky cube texture.
    CubeTexture,
}

/// One named startup asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetSpec {
    pub name: &'static str,
    /// File (mesh) or directory (cube texture) relative to its root.
    pub file: &'static str,
    pub kind: AssetKind,
}

impl AssetSpec {
    const fn mesh(name: &'static str, file: &'static str) -> Self {
        Self {
            name,
            file,
            kind: AssetKind::Mesh,
        }
    }
}

/// Every asset requested at session start.
pub const CHAPEL_ASSETS: [AssetSpec; 17] = [
    AssetSpec::mesh("Floor", "Floor.json"),
    AssetSpec::mesh("Ceiling", "Ceiling.json"),
    AssetSpec::mesh("WallLeft", "WallLeft.json"),
    AssetSpec::mesh("WallBack", "WallBack.json"),
    AssetSpec::mesh("WallFront", "WallFront.json"),
    AssetSpec::mesh("WallRight", "WallRight.json"),
    AssetSpec::mesh("Stage", "Stage.json"),
    AssetSpec::mesh("Door", "Door.json"),
    AssetSpec::mesh("Podium", "Podium.json"),
    AssetSpec::mesh("BigWindow", "BigWindow.json"),
    AssetSpec::mesh("candle", "candle.json"),
    AssetSpec::mesh("SmallWindow1", "SmallWindow1.json"),
    AssetSpec::mesh("BrokenWindow", "BrokenWindow.json"),
    AssetSpec::mesh("Rubble", "Rubble.json"),
    AssetSpec::mesh("beam", "beam.json"),
    AssetSpec::mesh("pew", "pew.json"),
    AssetSpec {
        name: "Sky",
        file: "Sky",
        kind: AssetKind::CubeTexture,
    },
];

/// A placed, render-only instance of a loaded asset.
#[derive(Debug, Clone, PartialEq)]
pub struct Prop {
    pub asset: &'static str,
    pub transform: Transform,
    /// Local-space bounds, for renderers that draw props as boxes.
    pub local_bounds: Aabb,
}

/// A decorative element to be animated by the session (a candle).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecorativeSpawn {
    pub transform: Transform,
    pub local_bounds: Aabb,
}

/// Everything one completed load adds to the scene.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneContribution {
    pub asset: &'static str,
    pub colliders: Vec<Aabb>,
    pub props: Vec<Prop>,
    pub decoratives: Vec<DecorativeSpawn>,
}

impl SceneContribution {
    fn new(asset: &'static str) -> Self {
        Self {
            asset,
            ..Self::default()
        }
    }

    fn prop(&mut self, geometry: &Geometry, transform: Transform) {
        if let Some(local_bounds) = geometry.local_bounds() {
            self.props.push(Prop {
                asset: self.asset,
                transform,
                local_bounds,
            });
        }
    }

    /// Prop whose world bounds also become a collider.
    fn solid(&mut self, geometry: &Geometry, transform: Transform) {
        if let Some(bounds) = geometry.world_bounds(&transform) {
            self.colliders.push(bounds);
        }
        self.prop(geometry, transform);
    }
}

const CANDLE_SCALE: Vec3 = Vec3::splat(0.04);
const SCONCE_SCALE: Vec3 = Vec3::new(0.08, 0.2, 0.08);

/// Lay out the contribution of `spec` given its loaded geometry.
pub fn contribution(spec: &AssetSpec, geometry: &Geometry) -> SceneContribution {
    let mut out = SceneContribution::new(spec.name);
    match spec.name {
        "WallLeft" | "WallBack" | "WallFront" | "WallRight" | "Door" | "Rubble" => {
            out.solid(geometry, Transform::default());
        }
        "Stage" => {
            out.prop(geometry, Transform::default());
            out.colliders.extend([
                Aabb::from_center_and_size(Vec3::new(0.0, 0.25, 6.0), Vec3::new(3.0, 0.5, 3.0)),
                Aabb::from_center_and_size(Vec3::new(2.0, 0.25, 6.0), Vec3::new(0.5, 0.5, 2.0)),
                Aabb::from_center_and_size(Vec3::new(-2.0, 0.25, 6.0), Vec3::new(0.5, 0.5, 2.0)),
                Aabb::from_center_and_size(Vec3::new(0.0, 0.25, 6.0), Vec3::new(10.0, 0.5, 1.0)),
            ]);
        }
        "candle" => {
            for t in candle_placements() {
                if let Some(local_bounds) = geometry.local_bounds() {
                    out.decoratives.push(DecorativeSpawn {
                        transform: t,
                        local_bounds,
                    });
                }
            }
        }
        "SmallWindow1" => {
            for t in small_window_placements() {
                out.prop(geometry, t);
            }
        }
        "beam" => {
            for i in -2..3 {
                out.prop(geometry, Transform::at(Vec3::new(0.0, 6.82095, 3.95 * i as f32)));
            }
        }
        "pew" => {
            for t in pew_placements() {
                out.solid(geometry, t);
            }
        }
        "Sky" => {}
        _ => out.prop(geometry, Transform::default()),
    }
    tracing::debug!(
        asset = spec.name,
        colliders = out.colliders.len(),
        props = out.props.len(),
        decoratives = out.decoratives.len(),
        "laid out asset"
    );
    out
}

/// Candle rows along the aisle, wall sconces, ceiling rows, altar pair.
/// Creation order here is the decorative phase order.
fn candle_placements() -> Vec<Transform> {
    let mut out = Vec::new();
    for i in -4..3 {
        let z = 1.5 * i as f32;
        out.push(Transform::at(Vec3::new(0.8, 1.0, z)).with_scale(CANDLE_SCALE));
        out.push(Transform::at(Vec3::new(-0.8, 1.0, z)).with_scale(CANDLE_SCALE));
        if i % 2 == 0 && i != -4 {
            let z = 1.975 * i as f32;
            out.push(Transform::at(Vec3::new(4.5, 2.5, z)).with_scale(SCONCE_SCALE));
            out.push(Transform::at(Vec3::new(-4.5, 2.5, z)).with_scale(SCONCE_SCALE));
        }
    }
    for i in -2..3 {
        let z = 3.5 * i as f32;
        out.push(Transform::at(Vec3::new(1.25, 5.0, z)).with_scale(SCONCE_SCALE));
        out.push(Transform::at(Vec3::new(-1.25, 5.0, z)).with_scale(SCONCE_SCALE));
    }
    out.push(Transform::at(Vec3::new(1.5, 1.5, 3.5 * 1.6)).with_scale(SCONCE_SCALE));
    out.push(Transform::at(Vec3::new(-1.5, 1.5, 3.5 * 1.6)).with_scale(SCONCE_SCALE));
    out
}

fn small_window_placements() -> Vec<Transform> {
    let mut out = Vec::new();
    for i in -3..4 {
        if i % 2 != 0 {
            let z = 1.975 * i as f32;
            out.push(Transform::at(Vec3::new(5.01, 3.31164, z)).with_euler(0.0, -FRAC_PI_2, 0.0));
            if i != -3 {
                out.push(Transform::at(Vec3::new(-5.01, 3.31164, z)).with_euler(0.0, FRAC_PI_2, 0.0));
            }
        }
    }
    out.push(Transform::at(Vec3::new(2.25, 4.7, 7.83332)).with_euler(0.0, PI, 0.0));
    out.push(Transform::at(Vec3::new(-2.25, 4.7, 7.83332)).with_euler(0.0, PI, 0.0));
    out
}

/// Four columns of pews, ten rows each, with a few knocked askew.
fn pew_placements() -> Vec<Transform> {
    let mut out = Vec::new();
    for i in -6..4 {
        let z = i as f32;
        out.push(Transform::at(Vec3::new(-1.8, 0.23, z)));

        let inner_right = match i {
            0 => Transform::at(Vec3::new(1.8, 0.23 - 0.3, z)).with_euler(-0.2, 0.0, 0.3),
            1 => Transform::at(Vec3::new(1.8 - 0.4, 0.23 - 0.3, z)).with_euler(-0.05, 1.5, 0.2),
            2 => Transform::at(Vec3::new(1.8, 0.23, z)).with_euler(-0.1, 0.2, 0.0),
            _ => Transform::at(Vec3::new(1.8, 0.23, z)),
        };
        out.push(inner_right);

        out.push(Transform::at(Vec3::new(3.5, 0.23, z)));

        let outer_left = match i {
            -6 => Transform::at(Vec3::new(-3.5, 0.23 + 0.2, z)).with_euler(0.2, 0.3, -0.3),
            -5 => Transform::at(Vec3::new(-3.5 - 0.2, 0.23, z + 0.2)).with_euler(2.3, 0.0, 0.0),
            _ => Transform::at(Vec3::new(-3.5, 0.23, z)),
        };
        out.push(outer_left);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_geometry(name: &str) -> Geometry {
        Geometry::from_bounds(name, Aabb::new(Vec3::splat(-0.5), Vec3::splat(0.5)))
    }

    fn spec(name: &str) -> AssetSpec {
        *CHAPEL_ASSETS.iter().find(|s| s.name == name).unwrap()
    }

    #[test]
    fn manifest_has_seventeen_unique_assets() {
        let mut names: Vec<_> = CHAPEL_ASSETS.iter().map(|s| s.name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 17);
    }

    #[test]
    fn walls_contribute_their_bounds() {
        let c = contribution(&spec("WallLeft"), &unit_geometry("WallLeft"));
        assert_eq!(c.colliders.len(), 1);
        assert_eq!(c.colliders[0], Aabb::new(Vec3::splat(-0.5), Vec3::splat(0.5)));
        assert_eq!(c.props.len(), 1);
    }

    #[test]
    fn stage_declares_four_manual_boxes() {
        let c = contribution(&spec("Stage"), &unit_geometry("Stage"));
        assert_eq!(c.colliders.len(), 4);
        assert_eq!(c.colliders[3].size(), Vec3::new(10.0, 0.5, 1.0));
    }

    #[test]
    fn pews_fill_four_columns_of_ten() {
        let c = contribution(&spec("pew"), &unit_geometry("pew"));
        assert_eq!(c.colliders.len(), 40);
        assert_eq!(c.props.len(), 40);
    }

    #[test]
    fn candles_are_decorative_only() {
        let c = contribution(&spec("candle"), &unit_geometry("candle"));
        assert_eq!(c.decoratives.len(), 32);
        assert!(c.colliders.is_empty());
        // The first candle sits on the aisle row at height 1.
        assert_eq!(c.decoratives[0].transform.position, Vec3::new(0.8, 1.0, -6.0));
    }

    #[test]
    fn render_only_assets_add_no_colliders() {
        for name in ["Floor", "Ceiling", "Podium", "BigWindow", "BrokenWindow", "beam", "SmallWindow1"] {
            let c = contribution(&spec(name), &unit_geometry(name));
            assert!(c.colliders.is_empty(), "{name} should not collide");
            assert!(!c.props.is_empty(), "{name} should render");
        }
    }

    #[test]
    fn sky_contributes_nothing() {
        let c = contribution(&spec("Sky"), &Geometry::new("Sky", Vec::new()));
        assert_eq!(c, SceneContribution::new("Sky"));
    }
}
