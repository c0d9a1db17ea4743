use px_core::{COORD_MAX, COORD_MIN, PixelImage, Vec2f};
use tracing::{debug, trace};

use crate::{Codepoint, ComposeError, table::CharacterTable};

/// Composed bitmap of one character and the sub-pixel offset its outline
/// should be drawn at.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedGlyph {
    pub codepoint: Codepoint,
    pub image: PixelImage,
    pub offset: Vec2f,
}

/// Builds the image of `codepoint` from its own pixels, its referenced
/// character and its diacritic, in that order.
///
/// - Pixels sit at `x = 0` and `y = floor(-descent)`; the fraction left over
///   becomes the vertical offset.
/// - A referenced character is composed recursively and merged unshifted.
///   If anything along its chain has pixels, that offset replaces the
///   current one; otherwise the current one stays.
/// - A diacritic is placed at the image's left edge, one row above the
///   highest on row plus `diacritic_space`.
pub fn compose(table: &CharacterTable, codepoint: Codepoint) -> Result<ComposedGlyph, ComposeError> {
    if table.get(codepoint).is_none() {
        return Err(ComposeError::UnknownCharacter(codepoint));
    }
    let mut visiting = Vec::new();
    let (image, offset) = compose_inner(table, codepoint, &mut visiting)?;
    Ok(ComposedGlyph {
        codepoint,
        image,
        offset: offset.unwrap_or_default(),
    })
}

/// Composes every character of `table` in codepoint order.
pub fn compose_all(table: &CharacterTable) -> Vec<(Codepoint, Result<ComposedGlyph, ComposeError>)> {
    table
        .iter()
        .map(|ch| (ch.codepoint, compose(table, ch.codepoint)))
        .collect()
}

/// Returns the image and the offset, `None` when no pixels were placed
/// along the reference chain.
fn compose_inner(
    table: &CharacterTable,
    codepoint: Codepoint,
    visiting: &mut Vec<Codepoint>,
) -> Result<(PixelImage, Option<Vec2f>), ComposeError> {
    let ch = table
        .get(codepoint)
        .ok_or(ComposeError::UnknownCharacter(codepoint))?;
    visiting.push(codepoint);

    let mut image = PixelImage::empty();
    let mut offset = None;

    if let Some(rows) = &ch.pixels {
        let lowered = -ch.descent.unwrap_or(0.0);
        let y = f64::from(lowered.floor());
        if !(f64::from(COORD_MIN)..=f64::from(COORD_MAX)).contains(&y) {
            return Err(ComposeError::InvalidDescent { codepoint });
        }
        offset = Some(Vec2f::new(0.0, lowered - lowered.floor()));

        let own = PixelImage::from_rows(rows, 0, y as i32)
            .map_err(|source| ComposeError::MalformedBitmap { codepoint, source })?;
        image = image.union(&own);
    }

    if let Some(target) = ch.reference {
        if let Some(pos) = visiting.iter().position(|&cp| cp == target) {
            let mut chain = visiting[pos..].to_vec();
            chain.push(target);
            return Err(ComposeError::ReferenceCycle(chain));
        }
        if table.get(target).is_none() {
            return Err(ComposeError::UnresolvedReference {
                from: codepoint,
                to: target,
            });
        }

        debug!(codepoint, reference = target, "merging referenced glyph");
        let (referenced, referenced_offset) = compose_inner(table, target, visiting)?;
        if referenced_offset.is_some() {
            offset = referenced_offset;
        }
        image = image.union(&referenced);
    }

    if let Some(name) = &ch.diacritic {
        let rows = table
            .diacritic(name)
            .ok_or_else(|| ComposeError::UnknownDiacritic {
                codepoint,
                name: name.clone(),
            })?;

        let base = image.highest_on_row().unwrap_or(image.origin_y());
        let y = base.saturating_add(1).saturating_add(ch.diacritic_space);
        trace!(codepoint, diacritic = %name, x = image.origin_x(), y, "placing diacritic");

        let mark = PixelImage::from_rows(rows, image.origin_x(), y).map_err(|source| {
            ComposeError::MalformedDiacritic {
                name: name.clone(),
                source,
            }
        })?;
        image = image.union(&mark);
    }

    visiting.pop();
    Ok((image, offset))
}
