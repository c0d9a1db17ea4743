use core::ops::BitOr;

use crate::Error;

/// Lowest box edge coordinate an image may have.
pub const COORD_MIN: i32 = -(1 << 30);
/// Highest box edge coordinate an image may have.
///
/// With every edge in `COORD_MIN..=COORD_MAX`, the box spanned by any two
/// images still has an extent that fits in `i32`.
pub const COORD_MAX: i32 = (1 << 30) - 1;

/// Sparse binary bitmap placed on the integer plane.
///
/// The box `[origin_x, end_x) x [origin_y, end_y)` is explicit; every cell
/// outside it reads as off. Row 0 of the buffer is the lowest `y`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PixelImage {
    x: i32,
    y: i32,
    x_end: i32,
    y_end: i32,
    data: Vec<bool>,
}

impl PixelImage {
    /// Zero-area image, the identity of [`PixelImage::union`].
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds an image from bitmap rows listed top row first.
    ///
    /// Pixel `(x + i, y + j)` is on iff `rows[height - 1 - j][i] != 0`, so the
    /// last row lands on `y` and the first row on `y + height - 1`.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R], x: i32, y: i32) -> Result<Self, Error> {
        let height = rows.len();
        let Some(first) = rows.first() else {
            return Ok(Self::empty());
        };

        let width = first.as_ref().len();
        for (row, cells) in rows.iter().enumerate() {
            let actual = cells.as_ref().len();
            if actual != width {
                return Err(Error::RaggedRows {
                    row,
                    expected: width,
                    actual,
                });
            }
        }

        let mut img = Self::with_box(x, y, width, height)?;
        for (j, cells) in rows.iter().rev().enumerate() {
            let start = j * width;
            for (dst, &src) in img.data[start..start + width]
                .iter_mut()
                .zip(cells.as_ref())
            {
                *dst = src != 0;
            }
        }

        Ok(img)
    }

    /// Builds a `width x height` image at `(x, y)` from a per-pixel predicate
    /// taking absolute coordinates.
    pub fn from_fn(
        x: i32,
        y: i32,
        width: usize,
        height: usize,
        mut f: impl FnMut(i32, i32) -> bool,
    ) -> Result<Self, Error> {
        let mut img = Self::with_box(x, y, width, height)?;
        let mut idx = 0;
        for py in img.y..img.y_end {
            for px in img.x..img.x_end {
                img.data[idx] = f(px, py);
                idx += 1;
            }
        }
        Ok(img)
    }

    fn with_box(x: i32, y: i32, width: usize, height: usize) -> Result<Self, Error> {
        if width == 0 || height == 0 {
            return Ok(Self::empty());
        }

        let len = width
            .checked_mul(height)
            .ok_or(Error::SizeOverflow { width, height })?;
        let [x, y, x_end, y_end] = plane_box(i64::from(x), i64::from(y), width, height)?;

        Ok(Self {
            x,
            y,
            x_end,
            y_end,
            data: vec![false; len],
        })
    }

    pub fn origin_x(&self) -> i32 {
        self.x
    }

    pub fn origin_y(&self) -> i32 {
        self.y
    }

    pub fn end_x(&self) -> i32 {
        self.x_end
    }

    pub fn end_y(&self) -> i32 {
        self.y_end
    }

    pub fn width(&self) -> usize {
        (self.x_end - self.x) as usize
    }

    pub fn height(&self) -> usize {
        (self.y_end - self.y) as usize
    }

    /// True for zero-area images. An image with a box but no on pixels is
    /// not empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Pixel state at absolute `(x, y)`; off outside the box.
    pub fn get(&self, x: i32, y: i32) -> bool {
        if x < self.x || x >= self.x_end || y < self.y || y >= self.y_end {
            return false;
        }
        let idx = (y - self.y) as usize * self.width() + (x - self.x) as usize;
        self.data[idx]
    }

    pub fn count_on(&self) -> usize {
        self.data.iter().filter(|&&on| on).count()
    }

    /// On-pixel coordinates, bottom row first, left to right.
    pub fn iter_on(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        let width = self.width();
        self.data
            .iter()
            .enumerate()
            .filter(|(_, on)| **on)
            .map(move |(i, _)| {
                (
                    self.x + (i % width) as i32,
                    self.y + (i / width) as i32,
                )
            })
    }

    /// Topmost row holding at least one on pixel.
    pub fn highest_on_row(&self) -> Option<i32> {
        let width = self.width();
        if width == 0 {
            return None;
        }
        self.data
            .chunks_exact(width)
            .rposition(|row| row.iter().any(|&on| on))
            .map(|j| self.y + j as i32)
    }

    /// Compares on-pixel sets, ignoring how far each box extends.
    pub fn same_pixels(&self, other: &Self) -> bool {
        self.iter_on().eq(other.iter_on())
    }

    /// Same pixels shifted by `(dx, dy)`; fails if the box leaves the plane.
    pub fn translated(&self, dx: i32, dy: i32) -> Result<Self, Error> {
        if self.is_empty() {
            return Ok(Self::empty());
        }
        let [x, y, x_end, y_end] = plane_box(
            i64::from(self.x) + i64::from(dx),
            i64::from(self.y) + i64::from(dy),
            self.width(),
            self.height(),
        )?;
        Ok(Self {
            x,
            y,
            x_end,
            y_end,
            data: self.data.clone(),
        })
    }

    /// Merges two images into a fresh one covering both boxes.
    ///
    /// Zero-area operands do not contribute to the box.
    pub fn union(&self, other: &Self) -> Self {
        if self.is_empty() {
            return other.clone();
        }
        if other.is_empty() {
            return self.clone();
        }

        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let x_end = self.x_end.max(other.x_end);
        let y_end = self.y_end.max(other.y_end);
        // Both boxes lie in the plane, so these extents cannot overflow.
        let width = (x_end - x) as usize;
        let height = (y_end - y) as usize;

        let mut out = Self {
            x,
            y,
            x_end,
            y_end,
            data: vec![false; width * height],
        };
        out.or_from(self);
        out.or_from(other);
        out
    }

    /// ORs `src` into `self`; `src`'s box must lie inside `self`'s.
    fn or_from(&mut self, src: &Self) {
        let dst_width = self.width();
        let src_width = src.width();
        let col = (src.x - self.x) as usize;

        for (j, row) in src.data.chunks_exact(src_width).enumerate() {
            let start = (src.y - self.y) as usize * dst_width + j * dst_width + col;
            for (dst, &on) in self.data[start..start + src_width].iter_mut().zip(row) {
                *dst |= on;
            }
        }
    }
}

/// Validates a box against the plane and returns `[x, y, x_end, y_end]`.
fn plane_box(x: i64, y: i64, width: usize, height: usize) -> Result<[i32; 4], Error> {
    let out = Error::OutOfPlane {
        x,
        y,
        width,
        height,
    };
    let (Ok(w), Ok(h)) = (i64::try_from(width), i64::try_from(height)) else {
        return Err(out);
    };
    let (Some(x_end), Some(y_end)) = (x.checked_add(w), y.checked_add(h)) else {
        return Err(out);
    };

    let range = i64::from(COORD_MIN)..=i64::from(COORD_MAX);
    if ![x, y, x_end, y_end].iter().all(|v| range.contains(v)) {
        return Err(out);
    }
    Ok([x as i32, y as i32, x_end as i32, y_end as i32])
}

impl BitOr for &PixelImage {
    type Output = PixelImage;

    fn bitor(self, rhs: &PixelImage) -> Self::Output {
        self.union(rhs)
    }
}

impl BitOr for PixelImage {
    type Output = PixelImage;

    fn bitor(self, rhs: PixelImage) -> Self::Output {
        self.union(&rhs)
    }
}
