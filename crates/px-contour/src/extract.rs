use px_core::{PixelImage, Point2i};
use tracing::{debug, trace};

use crate::contour::{Contour, ContourKind, ContourSet, signed_area2};

// Corner-to-corner unit steps in counter-clockwise order: `dir + 1` turns
// left, `dir + 3` turns right.
const DX: [i32; 4] = [1, 0, -1, 0];
const DY: [i32; 4] = [0, 1, 0, -1];
const DIR_E: u8 = 0;
const DIR_N: u8 = 1;
const DIR_W: u8 = 2;
const DIR_S: u8 = 3;

const NOT_ON_STACK: usize = usize::MAX;

/// Winding of outer loops. Holes always run the other way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    CounterClockwise,
    Clockwise,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContourConfig {
    pub orientation: Orientation,
}

/// Traces every boundary loop of `img`.
///
/// Boundary edges are directed with the on cell on their left, which makes
/// outer loops counter-clockwise and holes clockwise before `cfg` is applied.
/// Where two on cells meet only at a corner, the walk turns left so it keeps
/// following the cell it came along; a walk that still reaches some corner
/// twice is cut there. Diagonal contacts therefore never join loops: the
/// polygons on either side touch at the shared corner and nowhere else.
///
/// Loops are reduced to their direction changes, start at their lowest then
/// leftmost corner and are ordered by that start corner, so an outer loop
/// always precedes the holes it encloses.
pub fn extract_contours(img: &PixelImage, cfg: &ContourConfig) -> ContourSet {
    let origin = Point2i::new(img.origin_x(), img.origin_y());
    let width = img.width();
    let height = img.height();

    if img.is_empty() {
        return ContourSet {
            origin,
            width,
            height,
            contours: Vec::new(),
        };
    }

    let cols = width + 1;
    let mut out_dirs = boundary_edges(img);
    let mut stack_at = vec![NOT_ON_STACK; out_dirs.len()];
    let mut loops = Vec::new();

    for start in 0..out_dirs.len() {
        while out_dirs[start] != 0 {
            let walk = trace_walk(start, &mut out_dirs, cols);
            let before = loops.len();
            split_at_repeats(&walk, &mut stack_at, &mut loops);
            if loops.len() - before > 1 {
                trace!(
                    corner = ?corner_point(start, cols, origin),
                    pieces = loops.len() - before,
                    "split walk at pinch corners"
                );
            }
        }
    }

    let mut contours: Vec<Contour> = loops
        .iter()
        .map(|corners| build_contour(corners, cols, origin, cfg.orientation))
        .collect();

    contours.sort_by_key(|c| (c.points[0].y, c.points[0].x));
    for (id, c) in contours.iter_mut().enumerate() {
        c.id = id;
    }

    let set = ContourSet {
        origin,
        width,
        height,
        contours,
    };

    debug!(
        width,
        height,
        outers = set.num_outers(),
        holes = set.num_holes(),
        "extracted contours"
    );

    set
}

/// Outgoing boundary directions per corner, as bitmasks over the
/// `(width + 1) x (height + 1)` corner grid.
fn boundary_edges(img: &PixelImage) -> Vec<u8> {
    let width = img.width();
    let height = img.height();
    let cols = width + 1;
    let (ox, oy) = (img.origin_x(), img.origin_y());

    let on = |i: isize, j: isize| -> bool {
        i >= 0
            && j >= 0
            && (i as usize) < width
            && (j as usize) < height
            && img.get(ox + i as i32, oy + j as i32)
    };

    let mut out_dirs = vec![0_u8; cols * (height + 1)];
    for j in 0..height {
        for i in 0..width {
            let (ii, jj) = (i as isize, j as isize);
            if !on(ii, jj) {
                continue;
            }

            let corner = j * cols + i;
            if !on(ii, jj - 1) {
                out_dirs[corner] |= 1 << DIR_E;
            }
            if !on(ii + 1, jj) {
                out_dirs[corner + 1] |= 1 << DIR_N;
            }
            if !on(ii, jj + 1) {
                out_dirs[corner + cols + 1] |= 1 << DIR_W;
            }
            if !on(ii - 1, jj) {
                out_dirs[corner + cols] |= 1 << DIR_S;
            }
        }
    }

    out_dirs
}

/// Consumes edges from `start` until the walk is stuck, which can only happen
/// back at `start` since every corner has as many incoming as outgoing edges.
///
/// Returns the corners in visiting order; the closing edge back to `start`
/// is implicit.
fn trace_walk(start: usize, out_dirs: &mut [u8], cols: usize) -> Vec<usize> {
    let mut walk = Vec::new();
    let mut cur = start;
    let mut dir = out_dirs[start].trailing_zeros() as u8;

    let max_steps = out_dirs.len() * 4;
    for _ in 0..max_steps {
        walk.push(cur);
        out_dirs[cur] &= !(1 << dir);
        cur = step(cur, dir, cols);

        let Some(next) = next_dir(out_dirs[cur], dir) else {
            break;
        };
        dir = next;
    }

    debug_assert_eq!(cur, start, "boundary walk must close on its start");
    walk
}

/// Left turn first, then straight, then right.
#[inline]
fn next_dir(mask: u8, incoming: u8) -> Option<u8> {
    [
        (incoming + 1) & 3,
        incoming,
        (incoming + 3) & 3,
        (incoming + 2) & 3,
    ]
    .into_iter()
    .find(|&d| mask & (1 << d) != 0)
}

#[inline]
fn step(corner: usize, dir: u8, cols: usize) -> usize {
    match dir {
        DIR_E => corner + 1,
        DIR_N => corner + cols,
        DIR_W => corner - 1,
        _ => corner - cols,
    }
}

/// Cuts a closed walk into loops that visit each corner once.
///
/// Corners are pushed on a stack; meeting a corner already on it closes the
/// loop formed by everything above it.
fn split_at_repeats(walk: &[usize], stack_at: &mut [usize], loops: &mut Vec<Vec<usize>>) {
    let mut stack: Vec<usize> = Vec::with_capacity(walk.len());

    for &corner in walk.iter().chain(walk.first()) {
        let at = stack_at[corner];
        if at == NOT_ON_STACK {
            stack_at[corner] = stack.len();
            stack.push(corner);
            continue;
        }

        let closed = stack.split_off(at + 1);
        for &c in &closed {
            stack_at[c] = NOT_ON_STACK;
        }

        let mut piece = Vec::with_capacity(closed.len() + 1);
        piece.push(corner);
        piece.extend(closed);
        loops.push(piece);
    }

    for &c in &stack {
        stack_at[c] = NOT_ON_STACK;
    }
}

fn build_contour(
    corners: &[usize],
    cols: usize,
    origin: Point2i,
    orientation: Orientation,
) -> Contour {
    let raw: Vec<Point2i> = corners
        .iter()
        .map(|&c| corner_point(c, cols, origin))
        .collect();

    let mut points = drop_collinear(&raw);
    let area2 = signed_area2(&points);
    let kind = if area2 > 0 {
        ContourKind::Outer
    } else {
        ContourKind::Hole
    };

    if orientation == Orientation::Clockwise {
        points.reverse();
    }
    rotate_to_lowest(&mut points);

    let area = signed_area2(&points) / 2;
    Contour {
        id: 0,
        kind,
        points,
        area,
    }
}

/// Keeps only corners where the direction changes.
fn drop_collinear(points: &[Point2i]) -> Vec<Point2i> {
    let n = points.len();
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let prev = points[(i + n - 1) % n];
        let cur = points[i];
        let next = points[(i + 1) % n];
        if (cur - prev).cross(next - cur) != 0 {
            out.push(cur);
        }
    }
    out
}

fn rotate_to_lowest(points: &mut [Point2i]) {
    let lowest = points
        .iter()
        .enumerate()
        .min_by_key(|(_, p)| (p.y, p.x))
        .map_or(0, |(i, _)| i);
    points.rotate_left(lowest);
}

#[inline]
fn corner_point(corner: usize, cols: usize, origin: Point2i) -> Point2i {
    Point2i::new(
        origin.x + (corner % cols) as i32,
        origin.y + (corner / cols) as i32,
    )
}
