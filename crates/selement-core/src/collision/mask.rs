//! Bit-packed silhouette used for pixel-exact overlap tests
//!
//! Each row is stored as `u64` words so the overlap test compares 64 pixels
//! per AND instead of one. Bits past the row width are always zero.

use glam::IVec2;

const WORD_BITS: usize = 64;

/// A binary silhouette, `true` where the sprite is solid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    words_per_row: usize,
    bits: Vec<u64>,
}

impl Mask {
    /// Create an empty mask
    pub fn new(width: u32, height: u32) -> Self {
        let words_per_row = (width as usize).div_ceil(WORD_BITS);
        Self {
            width,
            height,
            words_per_row,
            bits: vec![0; words_per_row * height as usize],
        }
    }

    /// Build a mask by evaluating `solid(x, y)` for every pixel
    pub fn from_fn(width: u32, height: u32, mut solid: impl FnMut(u32, u32) -> bool) -> Self {
        let mut mask = Self::new(width, height);
        for y in 0..height {
            for x in 0..width {
                if solid(x, y) {
                    mask.set(x, y, true);
                }
            }
        }
        mask
    }

    /// Fully solid rectangle
    pub fn filled(width: u32, height: u32) -> Self {
        Self::from_fn(width, height, |_, _| true)
    }

    /// Filled circle inscribed in a `2r x 2r` square
    ///
    /// Filled one row span at a time; shockwaves rebuild this every frame.
    pub fn circle(radius: f32) -> Self {
        let radius = radius.max(0.5);
        let size = (radius * 2.0).round().max(1.0) as u32;
        let center = size as f32 / 2.0;
        let r_sq = radius * radius;
        let mut mask = Self::new(size, size);
        for y in 0..size {
            let dy = y as f32 + 0.5 - center;
            let rest = r_sq - dy * dy;
            if rest < 0.0 {
                continue;
            }
            let half = rest.sqrt();
            // Pixel x is inside when |x + 0.5 - center| <= half
            let start = (center - half - 0.5).ceil().max(0.0) as u32;
            let end = ((center + half - 0.5).floor() + 1.0).min(size as f32) as u32;
            mask.fill_span(y, start, end);
        }
        mask
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> IVec2 {
        IVec2::new(self.width as i32, self.height as i32)
    }

    pub fn get(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let idx = self.row_start(y as usize) + x as usize / WORD_BITS;
        (self.bits[idx] >> (x as usize % WORD_BITS)) & 1 == 1
    }

    pub fn set(&mut self, x: u32, y: u32, solid: bool) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = self.row_start(y as usize) + x as usize / WORD_BITS;
        let bit = 1u64 << (x as usize % WORD_BITS);
        if solid {
            self.bits[idx] |= bit;
        } else {
            self.bits[idx] &= !bit;
        }
    }

    /// Number of solid pixels
    pub fn count(&self) -> u32 {
        self.bits.iter().map(|w| w.count_ones()).sum()
    }

    /// Copy of this silhouette rotated counter-clockwise by `angle_deg`
    ///
    /// The result is grown to the rotated bounding box, like a rotated sprite.
    pub fn rotated(&self, angle_deg: f32) -> Self {
        let normalized = angle_deg.rem_euclid(360.0);
        if normalized == 0.0 {
            return self.clone();
        }

        let (sin, cos) = normalized.to_radians().sin_cos();
        let (w, h) = (self.width as f32, self.height as f32);
        let new_w = (w * cos.abs() + h * sin.abs()).round().max(1.0) as u32;
        let new_h = (w * sin.abs() + h * cos.abs()).round().max(1.0) as u32;
        let (cx, cy) = (w / 2.0, h / 2.0);
        let (ncx, ncy) = (new_w as f32 / 2.0, new_h as f32 / 2.0);

        // Inverse-map every destination pixel back into the source (y grows downward)
        Self::from_fn(new_w, new_h, |x, y| {
            let dx = x as f32 + 0.5 - ncx;
            let dy = y as f32 + 0.5 - ncy;
            let sx = dx * cos - dy * sin + cx;
            let sy = dx * sin + dy * cos + cy;
            sx >= 0.0 && sy >= 0.0 && self.get(sx as u32, sy as u32)
        })
    }

    /// First solid pixel shared with `other`, in this mask's coordinates
    ///
    /// `offset` is the position of `other`'s top-left corner relative to ours.
    /// Rows are scanned top to bottom and each row left to right.
    pub fn overlap(&self, other: &Mask, offset: IVec2) -> Option<IVec2> {
        let x0 = offset.x.max(0);
        let x1 = (offset.x + other.width as i32).min(self.width as i32);
        let y0 = offset.y.max(0);
        let y1 = (offset.y + other.height as i32).min(self.height as i32);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }

        for y in y0..y1 {
            let oy = (y - offset.y) as usize;
            let mut x = x0;
            while x < x1 {
                let ours = self.window(y as usize, x as usize);
                let theirs = other.window(oy, (x - offset.x) as usize);
                let hit = ours & theirs;
                if hit != 0 {
                    return Some(IVec2::new(x + hit.trailing_zeros() as i32, y));
                }
                x += WORD_BITS as i32;
            }
        }

        None
    }

    /// Set pixels `[start, end)` of row `y`
    fn fill_span(&mut self, y: u32, start: u32, end: u32) {
        let end = end.min(self.width);
        if start >= end || y >= self.height {
            return;
        }
        let row = self.row_start(y as usize);
        let (start, end) = (start as usize, end as usize);
        for word in start / WORD_BITS..=(end - 1) / WORD_BITS {
            let lo = start.max(word * WORD_BITS) - word * WORD_BITS;
            let hi = end.min((word + 1) * WORD_BITS) - word * WORD_BITS;
            let bits = if hi - lo == WORD_BITS {
                u64::MAX
            } else {
                ((1u64 << (hi - lo)) - 1) << lo
            };
            self.bits[row + word] |= bits;
        }
    }

    fn row_start(&self, y: usize) -> usize {
        y * self.words_per_row
    }

    /// 64 pixels of row `y` starting at column `start`
    fn window(&self, y: usize, start: usize) -> u64 {
        let row = &self.bits[self.row_start(y)..self.row_start(y) + self.words_per_row];
        let word = start / WORD_BITS;
        let shift = start % WORD_BITS;
        if word >= row.len() {
            return 0;
        }
        let mut out = row[word] >> shift;
        if shift > 0 && word + 1 < row.len() {
            out |= row[word + 1] << (WORD_BITS - shift);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut mask = Mask::new(70, 3);
        mask.set(0, 0, true);
        mask.set(65, 2, true);

        assert!(mask.get(0, 0));
        assert!(mask.get(65, 2));
        assert!(!mask.get(64, 2));
        assert!(!mask.get(100, 0));
        assert_eq!(mask.count(), 2);

        mask.set(0, 0, false);
        assert!(!mask.get(0, 0));
    }

    #[test]
    fn test_circle_is_symmetric_and_bounded() {
        let mask = Mask::circle(32.0);
        assert_eq!(mask.width(), 64);
        assert_eq!(mask.height(), 64);
        assert!(mask.get(32, 32));
        assert!(!mask.get(0, 0));
        assert!(!mask.get(63, 63));
        assert_eq!(mask.get(10, 32), mask.get(53, 32));
    }

    #[test]
    fn test_overlap_identical_squares() {
        let a = Mask::filled(10, 10);
        let b = Mask::filled(10, 10);
        assert_eq!(a.overlap(&b, IVec2::ZERO), Some(IVec2::new(0, 0)));
        assert_eq!(a.overlap(&b, IVec2::new(5, 7)), Some(IVec2::new(5, 7)));
        assert_eq!(a.overlap(&b, IVec2::new(-9, -9)), Some(IVec2::new(0, 0)));
    }

    #[test]
    fn test_no_overlap_when_disjoint() {
        let a = Mask::filled(10, 10);
        let b = Mask::filled(10, 10);
        assert_eq!(a.overlap(&b, IVec2::new(10, 0)), None);
        assert_eq!(a.overlap(&b, IVec2::new(0, -10)), None);
    }

    #[test]
    fn test_overlap_across_word_boundary() {
        let mut a = Mask::new(200, 1);
        a.set(130, 0, true);
        let mut b = Mask::new(100, 1);
        b.set(97, 0, true);

        // b's pixel 97 lands on a's column 33 + 97 = 130
        assert_eq!(a.overlap(&b, IVec2::new(33, 0)), Some(IVec2::new(130, 0)));
        assert_eq!(a.overlap(&b, IVec2::new(34, 0)), None);
    }

    #[test]
    fn test_hollow_shapes_do_not_overlap_in_gap() {
        let ring = Mask::from_fn(20, 20, |x, y| x == 0 || y == 0 || x == 19 || y == 19);
        let dot = Mask::filled(2, 2);
        assert_eq!(ring.overlap(&dot, IVec2::new(9, 9)), None);
        assert!(ring.overlap(&dot, IVec2::new(18, 9)).is_some());
    }

    #[test]
    fn test_rotated_quarter_turn_swaps_dimensions() {
        let bar = Mask::filled(40, 4);
        let turned = bar.rotated(90.0);
        assert_eq!(turned.width(), 4);
        assert_eq!(turned.height(), 40);
        assert_eq!(turned.count(), bar.count());
        assert_eq!(bar.rotated(360.0), bar);
    }
}
