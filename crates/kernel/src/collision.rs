use glam::Vec3;
use nave_common::Aabb;

/// Factor applied to the vertical axis of every collision probe.
///
/// Both the position and the delta are scaled before the containment test
/// and unscaled afterwards, which keeps the probe near floor height instead
/// of at eye height. The collider margins of the loaded scene are tuned
/// against this probe height.
pub const PROBE_VERTICAL_SCALE: f32 = 0.5;

/// Margin every collider grows by once all startup loads complete.
pub const COLLISION_MARGIN: f32 = 0.1;

/// Insertion-ordered set of static colliders.
#[derive(Debug, Clone, Default)]
pub struct CollisionWorld {
    boxes: Vec<Aabb>,
    expanded: bool,
}

impl CollisionWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, bounds: Aabb) {
        self.boxes.push(bounds);
    }

    pub fn extend(&mut self, bounds: impl IntoIterator<Item = Aabb>) {
        self.boxes.extend(bounds);
    }

    /// True if any collider contains `p` (faces inclusive). Stops at the
    /// first hit in insertion order.
    pub fn contains_point(&self, p: Vec3) -> bool {
        self.first_containing(p).is_some()
    }

    /// Index of the first collider containing `p`, for diagnostics.
    pub fn first_containing(&self, p: Vec3) -> Option<usize> {
        self.boxes.iter().position(|b| b.contains_point(p))
    }

    /// Grow every present collider by `margin` on all axes.
    ///
    /// Only the first call has an effect. Returns `true` if this call
    /// performed the expansion.
    pub fn expand_all_once(&mut self, margin: f32) -> bool {
        if self.expanded {
            return false;
        }
        for b in &mut self.boxes {
            *b = b.expanded_by(margin);
        }
        self.expanded = true;
        tracing::info!(colliders = self.boxes.len(), margin, "expanded colliders");
        true
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn boxes(&self) -> &[Aabb] {
        &self.boxes
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

/// Outcome of one single-axis move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution {
    /// The full delta was committed; carries the new position.
    Moved(Vec3),
    /// The candidate point was inside a collider; nothing changes.
    Blocked,
}

impl Resolution {
    /// Position after applying this resolution to `current`.
    pub fn apply(self, current: Vec3) -> Vec3 {
        match self {
            Self::Moved(p) => p,
            Self::Blocked => current,
        }
    }

    pub fn is_blocked(self) -> bool {
        matches!(self, Self::Blocked)
    }
}

/// Tests candidate moves against a [`CollisionWorld`].
///
/// All or nothing: a move is either committed in full or rejected. No
/// partial distance is computed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResolver {
    vertical_scale: f32,
}

impl Default for CollisionResolver {
    fn default() -> Self {
        Self::new(PROBE_VERTICAL_SCALE)
    }
}

impl CollisionResolver {
    pub fn new(vertical_scale: f32) -> Self {
        Self { vertical_scale }
    }

    pub fn vertical_scale(&self) -> f32 {
        self.vertical_scale
    }

    pub fn resolve(&self, position: Vec3, delta: Vec3, world: &CollisionWorld) -> Resolution {
        let s = self.vertical_scale;
        let probe = Vec3::new(position.x, position.y * s, position.z);
        let candidate = probe + Vec3::new(delta.x, delta.y * s, delta.z);

        if let Some(hit) = world.first_containing(candidate) {
            tracing::trace!(?candidate, collider = hit, "move blocked");
            return Resolution::Blocked;
        }
        Resolution::Moved(Vec3::new(candidate.x, candidate.y / s, candidate.z))
    }
}
