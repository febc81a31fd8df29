use std::ops::{Index, IndexMut};
use super::PixelPos;


#[derive(Debug, Clone, PartialEq)]
pub struct Matrix2D {
    width: usize,
    height: usize,
    pixels: Vec<f64>,
}

impl Matrix2D {
    pub fn empty_with_size(width: usize, height: usize) -> Self {
        Self::filled(width, height, 0_f64)
    }

    pub fn filled(width: usize, height: usize, value: f64) -> Self {
        Matrix2D { width, height, pixels: vec![value; width * height] }
    }

    pub fn empty_size_of(other: &Matrix2D) -> Self {
        Self::empty_with_size(other.w(), other.h())
    }

    /// `pixels` are row-major and must hold exactly `width * height` values.
    pub fn from_pixels(width: usize, height: usize, pixels: Vec<f64>) -> Self {
        assert_eq!(pixels.len(), width * height);
        Matrix2D { width, height, pixels }
    }

    pub fn w(&self) -> usize { self.width }
    pub fn h(&self) -> usize { self.height }

    pub fn size_vec(&self) -> PixelPos { PixelPos::new(self.h(), self.w()) }

    pub fn fits(&self, pos: PixelPos) -> bool {
        pos.col < self.width && pos.row < self.height
    }

    pub fn pixels(&self) -> &[f64] { &self.pixels }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.pixels[row * self.width..(row + 1) * self.width]
    }

    pub fn row_mut(&mut self, row: usize) -> &mut [f64] {
        let w = self.width;
        &mut self.pixels[row * w..(row + 1) * w]
    }

    pub fn map<F: Fn(f64) -> f64>(&self, tr: F) -> Self {
        Matrix2D {
            width: self.width,
            height: self.height,
            pixels: self.pixels.iter().map(|v| tr(*v)).collect(),
        }
    }

    pub fn all_finite(&self) -> bool {
        self.pixels.iter().all(|v| v.is_finite())
    }

    /// `(min, max)` over all pixels, `(0, 0)` for an empty matrix.
    pub fn min_max(&self) -> (f64, f64) {
        if self.pixels.is_empty() {
            return (0_f64, 0_f64);
        }
        self.pixels.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(*v), hi.max(*v))
        })
    }

    /// Mean over the rectangle `[tl, br_excluded)`, clipped to the matrix.
    pub fn mean_of_area(&self, tl: PixelPos, br_excluded: PixelPos) -> f64 {
        let row_end = br_excluded.row.min(self.height);
        let col_end = br_excluded.col.min(self.width);
        if tl.row >= row_end || tl.col >= col_end {
            return 0_f64;
        }

        let mut sum = 0_f64;
        for row in tl.row..row_end {
            sum += self.row(row)[tl.col..col_end].iter().sum::<f64>();
        }
        sum / ((row_end - tl.row) * (col_end - tl.col)) as f64
    }

    pub fn transposed(&self) -> Self {
        let mut res = Matrix2D::empty_with_size(self.height, self.width);
        for row in 0..self.height {
            for col in 0..self.width {
                let pos = PixelPos::new(row, col);
                res[pos.transposed()] = self[pos];
            }
        }
        res
    }

    /// Cyclic shift, positive values move content down/right.
    pub fn rolled(&self, rows: isize, cols: isize) -> Self {
        if self.pixels.is_empty() {
            return self.clone();
        }
        let h = self.height as isize;
        let w = self.width as isize;
        let mut res = Matrix2D::empty_size_of(self);
        for row in 0..self.height {
            let dst_row = (row as isize + rows).rem_euclid(h) as usize;
            for col in 0..self.width {
                let dst_col = (col as isize + cols).rem_euclid(w) as usize;
                res[PixelPos::new(dst_row, dst_col)] = self[PixelPos::new(row, col)];
            }
        }
        res
    }

    /// Zero-pads or centre-crops to `height x width`.
    ///
    /// Padding is appended after the content and then rolled: by `shift` when
    /// given, otherwise by half of the added size so the content lands in the
    /// middle. Cropping keeps the central part, dropping the extra odd row or
    /// column from the end.
    pub fn resized_to(&self, height: usize, width: usize, shift: Option<PixelPos>) -> Self {
        let rows_fixed = self.resized_rows(height, shift.map(|s| s.row));
        rows_fixed.transposed()
            .resized_rows(width, shift.map(|s| s.col))
            .transposed()
    }

    fn resized_rows(&self, height: usize, shift: Option<usize>) -> Self {
        if height == self.height {
            return self.clone();
        }

        if height > self.height {
            let added = height - self.height;
            let mut pixels = self.pixels.clone();
            pixels.resize(height * self.width, 0_f64);
            let padded = Matrix2D { width: self.width, height, pixels };
            let roll = shift.unwrap_or(added / 2);
            padded.rolled(roll as isize, 0)
        } else {
            let removed = self.height - height;
            let top = removed / 2;
            let pixels = self.pixels[top * self.width..(top + height) * self.width].to_vec();
            Matrix2D { width: self.width, height, pixels }
        }
    }
}

impl Index<PixelPos> for Matrix2D {
    type Output = f64;

    fn index(&self, index: PixelPos) -> &Self::Output {
        if !self.fits(index) {
            panic!("pos is {:?} which doesn't fit into {}x{}", index, self.height, self.width);
        }
        &self.pixels[index.row * self.width + index.col]
    }
}

impl IndexMut<PixelPos> for Matrix2D {
    fn index_mut(&mut self, index: PixelPos) -> &mut Self::Output {
        if !self.fits(index) {
            panic!("pos is {:?} which doesn't fit into {}x{}", index, self.height, self.width);
        }
        &mut self.pixels[index.row * self.width + index.col]
    }
}
