//! Glyph image composition over a character table.
//!
//! A glyph image is the union of up to three parts: the character's own
//! pixels, the composed image of a referenced character, and a diacritic
//! mark stacked on top. The table is an explicit value; composition is a
//! pure recursive function over it and reports reference cycles instead of
//! recursing forever.

mod compose;
mod error;
mod table;

/// Unicode scalar value identifying a character table entry.
pub type Codepoint = u32;

pub use compose::{ComposedGlyph, compose, compose_all};
pub use error::ComposeError;
pub use table::{Character, CharacterTable, Rows};
