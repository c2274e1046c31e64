use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use nave_common::{Aabb, Transform};
use nave_render::FrameView;

/// Per-instance model matrix and color for the box pipeline.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct InstanceData {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}

impl InstanceData {
    fn new(model: Mat4, color: [f32; 4]) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            color,
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

const CANDLE_COLOR: [f32; 4] = [1.0, 0.85, 0.55, 1.0];
const COLLIDER_COLOR: [f32; 4] = [1.0, 0.2, 0.2, 1.0];

fn prop_color(asset: &str) -> [f32; 4] {
    match asset {
        "Floor" => [0.35, 0.3, 0.25, 1.0],
        "Ceiling" | "beam" => [0.3, 0.22, 0.15, 1.0],
        "WallLeft" | "WallBack" | "WallFront" | "WallRight" => [0.55, 0.52, 0.48, 1.0],
        "BigWindow" | "SmallWindow1" | "BrokenWindow" => [0.35, 0.45, 0.7, 1.0],
        "pew" | "Door" | "Podium" | "Stage" => [0.45, 0.28, 0.15, 1.0],
        "Rubble" => [0.4, 0.4, 0.38, 1.0],
        _ => [0.6, 0.6, 0.6, 1.0],
    }
}

/// Model matrix placing the unit cube over `local_bounds` under `transform`.
fn box_model(transform: &Transform, local_bounds: &Aabb) -> Mat4 {
    let fit = Mat4::from_scale_rotation_translation(
        local_bounds.size().max(Vec3::splat(1e-3)),
        glam::Quat::IDENTITY,
        local_bounds.center(),
    );
    transform.matrix() * fit
}

/// Instances for every prop and candle in the frame, in that order.
///
/// Candles use their per-tick height rather than their placed height.
pub fn build_instances(frame: &FrameView<'_>, limit: usize) -> Vec<InstanceData> {
    let props = frame
        .props
        .iter()
        .map(|p| InstanceData::new(box_model(&p.transform, &p.local_bounds), prop_color(p.asset)));
    let candles = frame.decoratives.iter().map(|d| {
        let mut t = d.transform;
        t.position.y = d.height;
        InstanceData::new(box_model(&t, &d.local_bounds), CANDLE_COLOR)
    });
    props.chain(candles).take(limit).collect()
}

/// The 12 edges of `b` as 24 line-list vertices.
fn wire_box(b: &Aabb, color: [f32; 4], out: &mut Vec<LineVertex>) {
    let c = |x: f32, y: f32, z: f32| [x, y, z];
    let (lo, hi) = (b.min, b.max);
    let corners = [
        c(lo.x, lo.y, lo.z),
        c(hi.x, lo.y, lo.z),
        c(hi.x, lo.y, hi.z),
        c(lo.x, lo.y, hi.z),
        c(lo.x, hi.y, lo.z),
        c(hi.x, hi.y, lo.z),
        c(hi.x, hi.y, hi.z),
        c(lo.x, hi.y, hi.z),
    ];
    #[rustfmt::skip]
    const EDGES: [(usize, usize); 12] = [
        (0, 1), (1, 2), (2, 3), (3, 0),
        (4, 5), (5, 6), (6, 7), (7, 4),
        (0, 4), (1, 5), (2, 6), (3, 7),
    ];
    for (a, z) in EDGES {
        out.push(LineVertex { position: corners[a], color });
        out.push(LineVertex { position: corners[z], color });
    }
}

/// Wireframe vertices for the colliders, or nothing when they are hidden.
pub fn collider_lines(frame: &FrameView<'_>, max_boxes: usize) -> Vec<LineVertex> {
    if !frame.colliders_visible {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(frame.colliders.len().min(max_boxes) * 24);
    for b in frame.colliders.iter().take(max_boxes) {
        wire_box(b, COLLIDER_COLOR, &mut out);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;
    use nave_assets::Prop;
    use nave_common::WalkConfig;
    use nave_kernel::{Decorative, DecorativeElement};
    use nave_render::{CameraView, Projection, Viewport};

    fn frame<'a>(props: &'a [Prop], decoratives: &'a [Decorative], colliders: &'a [Aabb], visible: bool) -> FrameView<'a> {
        FrameView {
            tick: 1,
            camera: CameraView {
                eye: Vec3::ZERO,
                rotation: Quat::IDENTITY,
            },
            projection: Projection::from_config(&WalkConfig::default()),
            viewport: Viewport::new(100, 100),
            props,
            decoratives,
            colliders,
            colliders_visible: visible,
            ready: true,
            elapsed: 0.0,
        }
    }

    fn unit() -> Aabb {
        Aabb::new(Vec3::splat(-0.5), Vec3::splat(0.5))
    }

    #[test]
    fn prop_box_covers_its_world_bounds() {
        let prop = Prop {
            asset: "pew",
            transform: Transform::at(Vec3::new(2.0, 0.0, 0.0)),
            local_bounds: Aabb::new(Vec3::ZERO, Vec3::new(2.0, 1.0, 1.0)),
        };
        let inst = build_instances(&frame(std::slice::from_ref(&prop), &[], &[], false), 16);
        assert_eq!(inst.len(), 1);
        let m = Mat4::from_cols_array_2d(&inst[0].model);
        let corner = m.transform_point3(Vec3::splat(0.5));
        assert!((corner - Vec3::new(4.0, 1.0, 1.0)).length() < 1e-5);
    }

    #[test]
    fn candles_drawn_at_animated_height() {
        let d = Decorative {
            element: DecorativeElement {
                base_height: 1.0,
                phase_index: 0,
            },
            transform: Transform::at(Vec3::new(0.0, 1.0, 0.0)),
            local_bounds: unit(),
            height: 1.08,
        };
        let inst = build_instances(&frame(&[], &[d], &[], false), 16);
        let m = Mat4::from_cols_array_2d(&inst[0].model);
        assert!((m.transform_point3(Vec3::ZERO).y - 1.08).abs() < 1e-6);
        assert_eq!(inst[0].color, CANDLE_COLOR);
    }

    #[test]
    fn instance_limit_is_respected() {
        let props: Vec<Prop> = (0..10)
            .map(|i| Prop {
                asset: "beam",
                transform: Transform::at(Vec3::new(i as f32, 0.0, 0.0)),
                local_bounds: unit(),
            })
            .collect();
        assert_eq!(build_instances(&frame(&props, &[], &[], false), 4).len(), 4);
    }

    #[test]
    fn wireframes_only_when_visible() {
        let boxes = [unit(), unit()];
        assert!(collider_lines(&frame(&[], &[], &boxes, false), 100).is_empty());
        let lines = collider_lines(&frame(&[], &[], &boxes, true), 100);
        assert_eq!(lines.len(), 48);
        assert!(lines.iter().all(|v| v.position.iter().all(|c| c.abs() == 0.5)));
    }
}
