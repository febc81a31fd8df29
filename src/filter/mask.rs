//! Frequency-style masks the linear filters multiply the image with.
//!
//! The masks are applied to the displayed intensities directly, not to
//! k-space: there is no Fourier transform anywhere in the pipeline. `Low Pass`
//! keeps the centre of the image and fades out towards the edges, it does not
//! blur.

use crate::img::{Matrix2D, PixelPos};
use super::window::Window;


/// Square mask whose value at each cell is the profile sampled at the cell's
/// distance from the centre; zero beyond the profile's half length.
pub fn rotational(profile: &[f64]) -> Matrix2D {
    let d = profile.len();
    let half = (d as f64 - 1.0) / 2.0;
    let mut res = Matrix2D::empty_with_size(d, d);

    for row in 0..d {
        let dy = row as f64 - half;
        for col in 0..d {
            let dx = col as f64 - half;
            let dist = (dx * dx + dy * dy).sqrt();
            if dist <= half {
                res[PixelPos::new(row, col)] = interpolate(profile, dist + half);
            }
        }
    }

    res
}

/// Square mask `profile ⊗ profile`.
pub fn outer(profile: &[f64]) -> Matrix2D {
    let d = profile.len();
    let mut res = Matrix2D::empty_with_size(d, d);
    for row in 0..d {
        for col in 0..d {
            res[PixelPos::new(row, col)] = profile[row] * profile[col];
        }
    }
    res
}

/// Linear interpolation of `values` at fractional index `pos`, clamped to the ends.
fn interpolate(values: &[f64], pos: f64) -> f64 {
    if values.is_empty() {
        return 0_f64;
    }
    let last = values.len() - 1;
    if pos <= 0.0 {
        return values[0];
    }
    let ind = pos.floor() as usize;
    if ind >= last {
        return values[last];
    }
    let frac = pos - ind as f64;
    values[ind] * (1.0 - frac) + values[ind + 1] * frac
}

/// Stretches or squeezes the rows of `mat` to `new_h` by linear interpolation.
pub fn resample_rows(mat: &Matrix2D, new_h: usize) -> Matrix2D {
    let new_h = new_h.max(1);
    if new_h == mat.h() || mat.h() == 0 {
        return mat.clone();
    }

    let scale = if new_h > 1 { (mat.h() - 1) as f64 / (new_h - 1) as f64 } else { 0.0 };
    let mut res = Matrix2D::empty_with_size(mat.w(), new_h);
    let mut column = vec![0_f64; mat.h()];

    for col in 0..mat.w() {
        for row in 0..mat.h() {
            column[row] = mat[PixelPos::new(row, col)];
        }
        for row in 0..new_h {
            res[PixelPos::new(row, col)] = interpolate(&column, row as f64 * scale);
        }
    }

    res
}

/// Brings a square mask to the image size. With `contour` the rows are first
/// rescaled by the image aspect, so the mask follows the image outline.
pub fn fit_to(mask: &Matrix2D, rows: usize, cols: usize, contour: bool, shift: Option<PixelPos>) -> Matrix2D {
    let mask = if contour && cols > 0 {
        let new_h = (mask.h() as f64 * rows as f64 / cols as f64).round() as usize;
        resample_rows(mask, new_h)
    } else {
        mask.clone()
    };
    mask.resized_to(rows, cols, shift)
}

pub fn inverted(mask: &Matrix2D) -> Matrix2D {
    mask.map(|v| 1.0 - v)
}

/// Largest diameter, in multiples of the longer image side, a mask may be built with.
pub const MAX_DIAMETER_FACTOR: usize = 2;

fn diameter_or_max(diameter: usize, rows: usize, cols: usize) -> Result<usize, String> {
    let longest = rows.max(cols);
    if diameter == 0 {
        return Ok(longest);
    }
    if diameter > longest * MAX_DIAMETER_FACTOR {
        return Err(format!("diameter {} is more than {} times the image side {}",
            diameter, MAX_DIAMETER_FACTOR, longest));
    }
    Ok(diameter)
}

pub fn low_pass(window: Window, rows: usize, cols: usize, diameter: usize, outer_product: bool, contour: bool) -> Result<Matrix2D, String> {
    let d = diameter_or_max(diameter, rows, cols)?;
    let profile = window.build(d);
    let base = if outer_product { outer(&profile) } else { rotational(&profile) };
    Ok(fit_to(&base, rows, cols, contour, None))
}

/// Ring: a `width` long window at the outer end of an otherwise zero radial profile.
pub fn band_pass(window: Window, rows: usize, cols: usize, diameter: usize, width: usize, contour: bool) -> Result<Matrix2D, String> {
    let d = diameter_or_max(diameter, rows, cols)?;
    if width > d {
        return Err(format!("band width {} exceeds the diameter {}", width, d));
    }

    let mut profile = vec![0_f64; d - width];
    profile.extend(window.build(width));

    Ok(fit_to(&rotational(&profile), rows, cols, contour, None))
}

/// Band of `width` columns centred on column `center`.
pub fn vertical_band(window: Window, rows: usize, cols: usize, center: usize, width: usize) -> Result<Matrix2D, String> {
    if center >= cols {
        return Err(format!("band centre {} is outside of {} columns", center, cols));
    }
    if width > cols {
        return Err(format!("band width {} exceeds {} columns", width, cols));
    }

    let profile = window.build(width);
    let start = center as isize - (width / 2) as isize;
    let mut line = vec![0_f64; cols];
    for (i, v) in profile.iter().enumerate() {
        let col = start + i as isize;
        if col >= 0 && (col as usize) < cols {
            line[col as usize] = *v;
        }
    }

    let mut res = Matrix2D::empty_with_size(cols, rows);
    for row in 0..rows {
        res.row_mut(row).copy_from_slice(&line);
    }
    Ok(res)
}

/// Band of `width` rows centred on row `center`.
pub fn horizontal_band(window: Window, rows: usize, cols: usize, center: usize, width: usize) -> Result<Matrix2D, String> {
    if center >= rows {
        return Err(format!("band centre {} is outside of {} rows", center, rows));
    }
    Ok(vertical_band(window, cols, rows, center, width)?.transposed())
}

/// One minus a small rotational window centred on `center`, wrapping around the edges.
pub fn notch(window: Window, rows: usize, cols: usize, center: PixelPos, width: usize) -> Result<Matrix2D, String> {
    if center.row >= rows || center.col >= cols {
        return Err(format!("notch centre {:?} is outside of {}x{}", center, rows, cols));
    }
    if width > rows || width > cols {
        return Err(format!("notch width {} exceeds the image {}x{}", width, rows, cols));
    }

    let spot = rotational(&window.build(width))
        .resized_to(rows, cols, Some(PixelPos::new(0, 0)))
        .rolled(
            center.row as isize - (width / 2) as isize,
            center.col as isize - (width / 2) as isize);

    Ok(inverted(&spot))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotational_boxcar_is_a_disc() {
        let mask = rotational(&Window::Boxcar.build(5));
        assert_eq!(mask[PixelPos::new(2, 2)], 1.0);
        assert_eq!(mask[PixelPos::new(0, 2)], 1.0);
        assert_eq!(mask[PixelPos::new(0, 0)], 0.0);
        assert_eq!(mask[PixelPos::new(4, 4)], 0.0);
    }

    #[test]
    fn outer_is_product_of_profiles() {
        let mask = outer(&[0.5, 1.0]);
        assert_eq!(mask.pixels(), &[0.25, 0.5, 0.5, 1.0]);
    }

    #[test]
    fn low_pass_matches_image_size() {
        let mask = low_pass(Window::Boxcar, 6, 10, 0, false, false).unwrap();
        assert_eq!((mask.h(), mask.w()), (6, 10));
        assert_eq!(mask[PixelPos::new(3, 5)], 1.0);

        let contoured = low_pass(Window::Boxcar, 6, 10, 0, false, true).unwrap();
        assert_eq!((contoured.h(), contoured.w()), (6, 10));
    }

    #[test]
    fn oversized_diameter_is_refused() {
        assert!(low_pass(Window::Hanning, 4, 4, 4 * MAX_DIAMETER_FACTOR, false, false).is_ok());
        assert!(low_pass(Window::Hanning, 4, 4, 4 * MAX_DIAMETER_FACTOR + 1, false, false).is_err());
        assert!(low_pass(Window::Hanning, 4, 4, 1 << 61, false, false).is_err());
        assert!(band_pass(Window::Hanning, 4, 4, 100_000, 2, false).is_err());
    }

    #[test]
    fn band_pass_blocks_the_centre() {
        let mask = band_pass(Window::Boxcar, 9, 9, 9, 2, false).unwrap();
        assert_eq!(mask[PixelPos::new(4, 4)], 0.0);
        assert_eq!(mask[PixelPos::new(0, 4)], 1.0);
        assert!(band_pass(Window::Boxcar, 9, 9, 4, 5, false).is_err());
    }

    #[test]
    fn vertical_band_is_centred() {
        let mask = vertical_band(Window::Boxcar, 3, 8, 4, 3).unwrap();
        for row in 0..3 {
            assert_eq!(mask.row(row), &[0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 0.0, 0.0]);
        }
        assert!(vertical_band(Window::Boxcar, 3, 8, 8, 3).is_err());
        assert!(vertical_band(Window::Boxcar, 3, 8, 4, 9).is_err());
        assert!(horizontal_band(Window::Boxcar, 3, 8, 1, 1 << 61).is_err());
    }

    #[test]
    fn horizontal_band_is_transposed_vertical() {
        let mask = horizontal_band(Window::Boxcar, 5, 2, 1, 1).unwrap();
        assert_eq!((mask.h(), mask.w()), (5, 2));
        assert_eq!(mask.row(1), &[1.0, 1.0]);
        assert_eq!(mask.row(0), &[0.0, 0.0]);
    }

    #[test]
    fn notch_only_touches_its_neighbourhood() {
        let mask = notch(Window::Boxcar, 8, 8, PixelPos::new(4, 4), 3).unwrap();
        assert_eq!(mask[PixelPos::new(4, 4)], 0.0);
        assert_eq!(mask[PixelPos::new(0, 0)], 1.0);
        assert_eq!(mask[PixelPos::new(7, 7)], 1.0);
        assert!(notch(Window::Boxcar, 8, 8, PixelPos::new(8, 0), 3).is_err());
    }

    #[test]
    fn resample_keeps_ends() {
        let mat = Matrix2D::from_pixels(1, 3, vec![0.0, 1.0, 2.0]);
        let res = resample_rows(&mat, 5);
        assert_eq!(res.pixels(), &[0.0, 0.5, 1.0, 1.5, 2.0]);
    }
}
