use px_compose::ComposedGlyph;
use px_contour::{Contour, ContourConfig, ContourSet, extract_contours};
use px_core::Vec2f;

use crate::pen::GlyphPen;

/// Font units per pixel edge unless configured otherwise.
pub const DEFAULT_PIXEL_SIZE: f32 = 150.0;

#[derive(Debug, Clone, PartialEq)]
pub struct EmitConfig {
    pub pixel_size: f32,
    pub contour: ContourConfig,
}

impl Default for EmitConfig {
    fn default() -> Self {
        Self {
            pixel_size: DEFAULT_PIXEL_SIZE,
            contour: ContourConfig::default(),
        }
    }
}

/// Sends each contour to `pen` as `move_to`, `line_to`s and `close_path`,
/// mapping corner `v` to `(v + offset) * pixel_size`.
///
/// Contour order and corner order are kept as given; the pen's fill rule
/// relies on the winding they carry.
pub fn draw_contours<P: GlyphPen + ?Sized>(
    contours: &[Contour],
    offset: Vec2f,
    pixel_size: f32,
    pen: &mut P,
) {
    for contour in contours {
        let mut corners = contour
            .points
            .iter()
            .map(|v| (v.to_f32() + offset) * pixel_size);

        let Some(first) = corners.next() else {
            continue;
        };
        pen.move_to(first.x, first.y);
        for p in corners {
            pen.line_to(p.x, p.y);
        }
        pen.close_path();
    }
}

/// Extracts the outline of a composed glyph and draws it at the glyph's own
/// offset. Returns the contours that were drawn.
pub fn draw_glyph<P: GlyphPen + ?Sized>(
    glyph: &ComposedGlyph,
    cfg: &EmitConfig,
    pen: &mut P,
) -> ContourSet {
    let set = extract_contours(&glyph.image, &cfg.contour);
    draw_contours(&set.contours, glyph.offset, cfg.pixel_size, pen);
    set
}

#[cfg(test)]
mod tests {
    use px_compose::{Character, CharacterTable, compose};
    use px_contour::{ContourConfig, extract_contours};
    use px_core::{PixelImage, Point2f, Vec2f};

    use crate::{EmitConfig, PenCommand, RecordingPen, draw_contours, draw_glyph};

    fn pt(x: f32, y: f32) -> PenCommand {
        PenCommand::LineTo(Point2f { x, y })
    }

    #[test]
    fn single_pixel_emits_scaled_square() {
        let img = PixelImage::from_rows(&[[1u8]], 0, 0).expect("valid");
        let set = extract_contours(&img, &ContourConfig::default());

        let mut pen = RecordingPen::new();
        draw_contours(&set.contours, Vec2f::default(), 150.0, &mut pen);

        assert_eq!(
            pen.commands,
            vec![
                PenCommand::MoveTo(Point2f { x: 0.0, y: 0.0 }),
                pt(150.0, 0.0),
                pt(150.0, 150.0),
                pt(0.0, 150.0),
                PenCommand::ClosePath,
            ]
        );
    }

    #[test]
    fn offset_is_applied_before_scaling() {
        let img = PixelImage::from_rows(&[[1u8]], 2, -1).expect("valid");
        let set = extract_contours(&img, &ContourConfig::default());

        let mut pen = RecordingPen::new();
        draw_contours(&set.contours, Vec2f::new(0.0, 0.5), 100.0, &mut pen);

        assert_eq!(
            pen.commands[0],
            PenCommand::MoveTo(Point2f { x: 200.0, y: -50.0 })
        );
        assert_eq!(pen.commands[2], pt(300.0, 50.0));
    }

    #[test]
    fn contour_and_corner_order_is_kept() {
        let img = PixelImage::from_rows(&[[1u8, 1, 1], [1, 0, 1], [1, 1, 1]], 0, 0)
            .expect("valid");
        let set = extract_contours(&img, &ContourConfig::default());

        let mut pen = RecordingPen::new();
        draw_contours(&set.contours, Vec2f::default(), 1.0, &mut pen);
        assert_eq!(pen.num_closed(), 2);

        let expected: Vec<PenCommand> = set
            .iter()
            .flat_map(|c| {
                let mut cmds = Vec::new();
                for (i, v) in c.points.iter().enumerate() {
                    let p = v.to_f32();
                    cmds.push(if i == 0 {
                        PenCommand::MoveTo(p)
                    } else {
                        PenCommand::LineTo(p)
                    });
                }
                cmds.push(PenCommand::ClosePath);
                cmds
            })
            .collect();
        assert_eq!(pen.commands, expected);
        assert_eq!(pen.commands[5], PenCommand::MoveTo(Point2f { x: 1.0, y: 1.0 }));
        assert_eq!(pen.commands[6], pt(1.0, 2.0));
    }

    #[test]
    fn composed_glyph_draws_at_its_offset() {
        let table: CharacterTable = [Character::new(0x2c, "comma")
            .with_pixels(vec![vec![1], vec![1]])
            .with_descent(1.5)]
        .into_iter()
        .collect();
        let glyph = compose(&table, 0x2c).expect("composes");

        let mut pen = RecordingPen::new();
        let set = draw_glyph(&glyph, &EmitConfig::default(), &mut pen);

        assert_eq!(set.len(), 1);
        assert_eq!(
            pen.commands,
            vec![
                PenCommand::MoveTo(Point2f { x: 0.0, y: -225.0 }),
                pt(150.0, -225.0),
                pt(150.0, 75.0),
                pt(0.0, 75.0),
                PenCommand::ClosePath,
            ]
        );
    }

    #[test]
    fn blank_glyph_draws_nothing() {
        let table: CharacterTable = [Character::new(0x20, "space")].into_iter().collect();
        let glyph = compose(&table, 0x20).expect("composes");

        let mut pen = RecordingPen::new();
        let set = draw_glyph(&glyph, &EmitConfig::default(), &mut pen);
        assert!(set.is_empty());
        assert!(pen.commands.is_empty());
    }
}
