//! Umbrella crate for the `pixel-outline` workspace.
//!
//! Re-exports the pipeline stages in data-flow order: bitmap primitives,
//! glyph composition, contour extraction and pen emission.

pub use px_compose::*;
pub use px_contour::*;
pub use px_core::*;
pub use px_emit::*;
