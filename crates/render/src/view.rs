use glam::{Mat4, Quat, Vec3};
use nave_assets::Prop;
use nave_common::{Aabb, WalkConfig};
use nave_kernel::{Decorative, Session};

/// Drawable area in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width over height. A zero height (minimized window) yields 1.
    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            return 1.0;
        }
        self.width as f32 / self.height as f32
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Perspective projection. The aspect follows the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Projection {
    pub fn from_config(config: &WalkConfig) -> Self {
        Self {
            fov_degrees: config.fov_degrees,
            aspect: 1.0,
            near: config.near,
            far: config.far,
        }
    }

    /// Follow the viewport. An empty (minimized) viewport keeps the last
    /// aspect.
    pub fn resize(&mut self, viewport: Viewport) {
        if !viewport.is_empty() {
            self.aspect = viewport.aspect();
        }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }
}

/// Where the camera is and which way it faces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraView {
    pub eye: Vec3,
    pub rotation: Quat,
}

impl CameraView {
    pub fn of(session: &Session) -> Self {
        let c = session.controller();
        Self {
            eye: c.position(),
            rotation: c.orientation().rotation(),
        }
    }

    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.eye).inverse()
    }
}

/// Everything a renderer may read for one frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub tick: u64,
    pub camera: CameraView,
    pub projection: Projection,
    pub viewport: Viewport,
    pub props: &'a [Prop],
    pub decoratives: &'a [Decorative],
    pub colliders: &'a [Aabb],
    pub colliders_visible: bool,
    pub ready: bool,
    pub elapsed: f64,
}

impl<'a> FrameView<'a> {
    pub fn capture(
        session: &'a Session,
        tick: u64,
        projection: Projection,
        viewport: Viewport,
    ) -> Self {
        Self {
            tick,
            camera: CameraView::of(session),
            projection,
            viewport,
            props: session.props(),
            decoratives: session.decoratives(),
            colliders: session.world().boxes(),
            colliders_visible: session.colliders_visible(),
            ready: session.is_ready(),
            elapsed: session.elapsed(),
        }
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection.matrix() * self.camera.view_matrix()
    }
}
