//! Asset pipeline: the geometry loading seam, a JSON model importer, a
//! procedural fallback, and the chapel scene layout.
//!
//! Loaders turn a named asset into [`Geometry`]. The scene layout turns
//! geometry into what the walkthrough consumes: colliders, render props and
//! decorative elements. Nothing here knows about load ordering or readiness.

mod geometry;
mod loader;
pub mod scene;

pub use geometry::Geometry;
pub use loader::{BuiltinLoader, GeometryLoader, JsonModelLoader};
pub use scene::{AssetKind, AssetSpec, CHAPEL_ASSETS, DecorativeSpawn, Prop, SceneContribution};

use std::path::PathBuf;

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON error in {asset}: {source}")]
    Json {
        asset: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("malformed model {asset}: {reason}")]
    Malformed { asset: String, reason: String },
    #[error("unknown asset: {0}")]
    Unknown(String),
}

pub fn crate_info() -> &'static str {
    "nave-assets v0.1.0"
}
