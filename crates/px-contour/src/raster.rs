use px_core::{COORD_MAX, COORD_MIN, Error, PixelImage};

use crate::contour::Contour;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillRule {
    #[default]
    NonZero,
    EvenOdd,
}

/// Fills rectilinear loops back into pixels.
///
/// A pixel is sampled at its center; the winding number counts vertical
/// edges to its right, upward edges `+1`, downward edges `-1`. The result's
/// box is the bounding box of all loop corners.
pub fn rasterize(contours: &[Contour], rule: FillRule) -> Result<PixelImage, Error> {
    let mut corners = contours.iter().flat_map(|c| c.points.iter());
    let Some(first) = corners.next() else {
        return Ok(PixelImage::empty());
    };

    let (mut x0, mut y0, mut x1, mut y1) = (first.x, first.y, first.x, first.y);
    for q in corners {
        x0 = x0.min(q.x);
        y0 = y0.min(q.y);
        x1 = x1.max(q.x);
        y1 = y1.max(q.y);
    }
    if x0 < COORD_MIN || y0 < COORD_MIN || x1 > COORD_MAX || y1 > COORD_MAX {
        return Err(Error::OutOfPlane {
            x: i64::from(x0),
            y: i64::from(y0),
            width: (i64::from(x1) - i64::from(x0)) as usize,
            height: (i64::from(y1) - i64::from(y0)) as usize,
        });
    }

    let width = (x1 - x0) as usize;
    let height = (y1 - y0) as usize;
    let mut winding = vec![0_i32; width * height];

    for c in contours {
        for (a, b) in c.edges() {
            if a.x != b.x {
                continue;
            }
            let sign = if b.y > a.y { 1 } else { -1 };
            let col_end = (a.x - x0) as usize;
            for y in a.y.min(b.y)..a.y.max(b.y) {
                let row = (y - y0) as usize * width;
                for w in &mut winding[row..row + col_end] {
                    *w += sign;
                }
            }
        }
    }

    PixelImage::from_fn(x0, y0, width, height, |x, y| {
        let w = winding[(y - y0) as usize * width + (x - x0) as usize];
        match rule {
            FillRule::NonZero => w != 0,
            FillRule::EvenOdd => w % 2 != 0,
        }
    })
}

#[cfg(test)]
mod tests {
    use px_core::{Error, Point2i};

    use super::{FillRule, rasterize};
    use crate::{Contour, ContourKind};

    fn square(x: i32, y: i32, size: i32, ccw: bool) -> Contour {
        let mut points = vec![
            Point2i::new(x, y),
            Point2i::new(x + size, y),
            Point2i::new(x + size, y + size),
            Point2i::new(x, y + size),
        ];
        if !ccw {
            points.reverse();
        }
        let area = i64::from(size * size) * if ccw { 1 } else { -1 };
        Contour {
            id: 0,
            kind: ContourKind::Outer,
            points,
            area,
        }
    }

    #[test]
    fn no_loops_fill_nothing() {
        assert!(rasterize(&[], FillRule::NonZero).expect("ok").is_empty());
    }

    #[test]
    fn single_square_fills_its_cells() {
        let img = rasterize(&[square(-1, 2, 2, true)], FillRule::NonZero).expect("ok");
        assert_eq!(img.origin_x(), -1);
        assert_eq!(img.origin_y(), 2);
        assert_eq!(img.count_on(), 4);
        assert!(img.get(0, 3));
    }

    #[test]
    fn fill_rules_differ_on_doubled_winding() {
        let loops = [square(0, 0, 3, true), square(1, 1, 1, true)];

        let nonzero = rasterize(&loops, FillRule::NonZero).expect("ok");
        assert_eq!(nonzero.count_on(), 9);

        let even_odd = rasterize(&loops, FillRule::EvenOdd).expect("ok");
        assert_eq!(even_odd.count_on(), 8);
        assert!(!even_odd.get(1, 1));
    }

    #[test]
    fn opposite_loop_cuts_hole_under_both_rules() {
        let loops = [square(0, 0, 3, true), square(1, 1, 1, false)];
        for rule in [FillRule::NonZero, FillRule::EvenOdd] {
            let img = rasterize(&loops, rule).expect("ok");
            assert_eq!(img.count_on(), 8);
            assert!(!img.get(1, 1));
        }
    }

    #[test]
    fn loops_outside_plane_are_rejected() {
        let loops = [square(i32::MIN, 0, 1, true), square(i32::MAX - 1, 0, 1, true)];
        let err = rasterize(&loops, FillRule::NonZero).expect_err("off plane");
        assert!(matches!(err, Error::OutOfPlane { .. }));
    }
}
