//! Polygon outlines from binary pixel images.
//!
//! Every on pixel is a closed unit square. The extractor returns the
//! boundary of their union as rectilinear loops over grid corners:
//! - One loop per boundary component; regions joined only at a corner get
//!   separate loops that touch at that corner.
//! - Outer loops and holes carry opposite windings, so filling under the
//!   nonzero or even-odd rule reproduces the pixels exactly.
//! - Loops keep only the corners where the direction changes.
//!
//! [`rasterize`] turns loops back into a [`px_core::PixelImage`] for
//! verification.

mod contour;
mod extract;
mod raster;

pub use contour::{Contour, ContourId, ContourKind, ContourSet, signed_area2};
pub use extract::{ContourConfig, Orientation, extract_contours};
pub use raster::{FillRule, rasterize};
