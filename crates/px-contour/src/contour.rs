use px_core::Point2i;

pub type ContourId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContourKind {
    Outer,
    Hole,
}

/// Closed rectilinear loop over grid corners. The closing edge from the last
/// point back to the first is implicit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contour {
    pub id: ContourId,
    pub kind: ContourKind,
    pub points: Vec<Point2i>,
    /// Signed area in pixels, positive for counter-clockwise loops.
    pub area: i64,
}

impl Contour {
    pub fn is_counter_clockwise(&self) -> bool {
        self.area > 0
    }

    /// Edges as `(from, to)` pairs, closing edge included.
    pub fn edges(&self) -> impl Iterator<Item = (Point2i, Point2i)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContourSet {
    pub origin: Point2i,
    pub width: usize,
    pub height: usize,
    pub contours: Vec<Contour>,
}

impl ContourSet {
    pub fn len(&self) -> usize {
        self.contours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }

    pub fn num_outers(&self) -> usize {
        self.iter_outers().count()
    }

    pub fn num_holes(&self) -> usize {
        self.iter_holes().count()
    }

    pub fn iter_outers(&self) -> impl Iterator<Item = &Contour> {
        self.contours.iter().filter(|c| c.kind == ContourKind::Outer)
    }

    pub fn iter_holes(&self) -> impl Iterator<Item = &Contour> {
        self.contours.iter().filter(|c| c.kind == ContourKind::Hole)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Contour> {
        self.contours.iter()
    }

    pub fn polygon(&self, id: ContourId) -> &[Point2i] {
        &self.contours[id].points
    }

    /// Sum of signed areas; equals the on-pixel count for counter-clockwise
    /// output.
    pub fn total_area(&self) -> i64 {
        self.contours.iter().map(|c| c.area).sum()
    }
}

/// Shoelace sum over a closed loop, i.e. twice its signed area.
pub fn signed_area2(points: &[Point2i]) -> i64 {
    let n = points.len();
    let mut sum = 0_i64;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        sum += i64::from(a.x) * i64::from(b.y) - i64::from(b.x) * i64::from(a.y);
    }
    sum
}

#[cfg(test)]
mod tests {
    use px_core::Point2i;

    use super::{Contour, ContourKind, ContourSet, signed_area2};

    fn p(x: i32, y: i32) -> Point2i {
        Point2i::new(x, y)
    }

    #[test]
    fn shoelace_sign_follows_winding() {
        let ccw = [p(0, 0), p(2, 0), p(2, 3), p(0, 3)];
        assert_eq!(signed_area2(&ccw), 12);

        let cw: Vec<_> = ccw.iter().rev().copied().collect();
        assert_eq!(signed_area2(&cw), -12);
        assert_eq!(signed_area2(&[]), 0);
    }

    #[test]
    fn set_counts_by_kind() {
        let outer = Contour {
            id: 0,
            kind: ContourKind::Outer,
            points: vec![p(0, 0), p(3, 0), p(3, 3), p(0, 3)],
            area: 9,
        };
        let hole = Contour {
            id: 1,
            kind: ContourKind::Hole,
            points: vec![p(1, 1), p(1, 2), p(2, 2), p(2, 1)],
            area: -1,
        };
        let set = ContourSet {
            origin: p(0, 0),
            width: 3,
            height: 3,
            contours: vec![outer, hole],
        };

        assert_eq!(set.len(), 2);
        assert_eq!(set.num_outers(), 1);
        assert_eq!(set.num_holes(), 1);
        assert_eq!(set.total_area(), 8);
        assert_eq!(set.polygon(1)[0], p(1, 1));
        assert!(set.contours[0].is_counter_clockwise());

        let edges: Vec<_> = set.contours[1].edges().collect();
        assert_eq!(edges.len(), 4);
        assert_eq!(edges[3], (p(2, 1), p(1, 1)));
    }
}
