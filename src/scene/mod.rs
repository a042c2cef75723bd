//! File-backed host: a JSON scene of tagged images standing in for a document's elements.

pub(crate) mod host;
pub(crate) mod model;

pub use host::{PlacedOverlay, SceneEvent, SceneHost};
pub use model::{Scene, SceneElement};
