//! Foundational primitives for pixel-to-outline conversion.
//!
//! ## Coordinates
//! Pixels are addressed by integer `(x, y)` in a y-up plane. Pixel `(x, y)`
//! covers the unit square between corners `(x, y)` and `(x + 1, y + 1)`, so
//! outline vertices are grid corners ([`Point2i`]).
//!
//! ## Images
//! [`PixelImage`] is an immutable boolean bitmap with an explicit box that
//! may sit anywhere on the plane, including negative coordinates. Images
//! are combined with [`PixelImage::union`] (or `|`), which always allocates.

mod error;
mod geom;
mod pixel;

pub use error::Error;
pub use geom::{Point2f, Point2i, Vec2f, Vec2i};
pub use pixel::{COORD_MAX, COORD_MIN, PixelImage};
