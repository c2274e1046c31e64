use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box described by its min and max corners.
///
/// Every static collision volume in the scene is one of these.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box centered on `center` with full extents `size`.
    pub fn from_center_and_size(center: Vec3, size: Vec3) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Smallest box enclosing every point. `None` for an empty iterator.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = Self::new(first, first);
        for p in iter {
            bounds.min = bounds.min.min(p);
            bounds.max = bounds.max.max(p);
        }
        Some(bounds)
    }

    /// True if `p` lies within the closed interval of every axis.
    pub fn contains_point(&self, p: Vec3) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    /// Copy grown symmetrically by `margin` on all three axes.
    pub fn expanded_by(&self, margin: f32) -> Self {
        let m = Vec3::splat(margin);
        Self {
            min: self.min - m,
            max: self.max + m,
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// World-space bounds of this box after applying `transform`.
    ///
    /// All eight corners are transformed, so rotated boxes grow to stay
    /// axis-aligned.
    pub fn transformed(&self, transform: &Transform) -> Self {
        let m = transform.matrix();
        let (lo, hi) = (self.min, self.max);
        let corners = [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(lo.x, hi.y, hi.z),
            Vec3::new(hi.x, hi.y, hi.z),
        ];
        // Eight corners are never empty.
        Self::from_points(corners.into_iter().map(|c| m.transform_point3(c))).unwrap_or(*self)
    }
}

/// Spatial transform: position, rotation, scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Unrotated, unscaled placement at `position`.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Rotation from intrinsic X, then Y, then Z angles (radians).
    pub fn with_euler(mut self, x: f32, y: f32, z: f32) -> Self {
        self.rotation = Quat::from_euler(EulerRot::XYZ, x, y, z);
        self
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Quat::IDENTITY);
        assert_eq!(t.scale, Vec3::ONE);
    }

    #[test]
    fn center_and_size_round_trip() {
        let b = Aabb::from_center_and_size(Vec3::new(0.0, 0.25, 6.0), Vec3::new(3.0, 0.5, 3.0));
        assert_eq!(b.min, Vec3::new(-1.5, 0.0, 4.5));
        assert_eq!(b.max, Vec3::new(1.5, 0.5, 7.5));
        assert_eq!(b.center(), Vec3::new(0.0, 0.25, 6.0));
    }

    #[test]
    fn containment_is_inclusive_on_faces() {
        let b = Aabb::new(Vec3::ZERO, Vec3::ONE);
        assert!(b.contains_point(Vec3::ZERO));
        assert!(b.contains_point(Vec3::ONE));
        assert!(b.contains_point(Vec3::new(1.0, 0.5, 0.0)));
        assert!(!b.contains_point(Vec3::new(1.0001, 0.5, 0.5)));
        assert!(!b.contains_point(Vec3::new(0.5, -0.0001, 0.5)));
    }

    #[test]
    fn from_points_encloses_all() {
        let b = Aabb::from_points([
            Vec3::new(1.0, -2.0, 0.0),
            Vec3::new(-1.0, 3.0, 0.5),
            Vec3::new(0.0, 0.0, -4.0),
        ])
        .unwrap();
        assert_eq!(b.min, Vec3::new(-1.0, -2.0, -4.0));
        assert_eq!(b.max, Vec3::new(1.0, 3.0, 0.5));
        assert!(Aabb::from_points(std::iter::empty()).is_none());
    }

    #[test]
    fn expansion_is_symmetric() {
        let b = Aabb::new(Vec3::ZERO, Vec3::ONE).expanded_by(0.5);
        assert_eq!(b.min, Vec3::splat(-0.5));
        assert_eq!(b.max, Vec3::splat(1.5));
    }

    #[test]
    fn translated_bounds_follow_position() {
        let b = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        let moved = b.transformed(&Transform::at(Vec3::new(10.0, 0.0, 0.0)));
        assert_eq!(moved.min, Vec3::new(9.0, -1.0, -1.0));
        assert_eq!(moved.max, Vec3::new(11.0, 1.0, 1.0));
    }

    #[test]
    fn rotated_bounds_stay_axis_aligned() {
        let b = Aabb::new(Vec3::new(-2.0, 0.0, -0.5), Vec3::new(2.0, 1.0, 0.5));
        let turned = b.transformed(&Transform::default().with_euler(0.0, std::f32::consts::FRAC_PI_2, 0.0));
        // A quarter turn about Y swaps the X and Z extents.
        assert!((turned.size().x - 1.0).abs() < 1e-5);
        assert!((turned.size().z - 4.0).abs() < 1e-5);
        assert!((turned.size().y - 1.0).abs() < 1e-5);
    }
}
