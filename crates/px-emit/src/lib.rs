//! Drawing extracted outlines into a font pen.
//!
//! [`GlyphPen`] stands in for the glyph pen of whatever font container
//! serializes the result. Corners are scaled by the pixel size after adding
//! the glyph's sub-pixel offset; nothing is reordered or rewound on the way.

mod emit;
mod pen;

pub use emit::{DEFAULT_PIXEL_SIZE, EmitConfig, draw_contours, draw_glyph};
pub use pen::{GlyphPen, PenCommand, RecordingPen};
