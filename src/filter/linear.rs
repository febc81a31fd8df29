//! Mask filters. They multiply the image itself with a window-shaped mask;
//! the names follow the k-space filters they stand in for, see `mask`.

use crate::{img::{Matrix2D, PixelPos}, my_err::MyError, processing::ProgressProvider};
use super::{FilterBase, FilterKind, apply_mask, filter_option::{FilterParams, param_err}, filter_trait::{Filter, StepStop}, mask, window::Window};


fn positive_width(kind: FilterKind, params: &FilterParams) -> Result<usize, MyError> {
    let width = params.get_or(kind, "width", 3_usize)?;
    if width == 0 {
        return Err(param_err(kind, "width", "must be at least 1".to_string()));
    }
    Ok(width)
}


/// `Low Pass` keeps the mask, `High Pass` keeps one minus it.
#[derive(Clone, Debug, PartialEq)]
pub struct RadialMask {
    kind: FilterKind,
    window: Window,
    diameter: usize,
    outer: bool,
    contour: bool,
}

impl RadialMask {
    const KEYS: [&'static str; 5] = ["window", "shape", "diameter", "outer", "contour"];

    pub fn new(kind: FilterKind, window: Window, diameter: usize, outer: bool, contour: bool) -> Self {
        assert!(kind == FilterKind::LowPass || kind == FilterKind::HighPass);
        RadialMask { kind, window, diameter, outer, contour }
    }

    pub fn try_from_params(kind: FilterKind, params: &FilterParams) -> Result<Self, MyError> {
        params.check_known_keys(kind, &Self::KEYS)?;
        Ok(RadialMask::new(
            kind,
            Window::try_from_params(kind, params)?,
            params.get_or(kind, "diameter", 0_usize)?,
            params.get_or(kind, "outer", false)?,
            params.get_or(kind, "contour", false)?))
    }

    pub fn build_mask(&self, rows: usize, cols: usize) -> Result<Matrix2D, String> {
        let low = mask::low_pass(self.window, rows, cols, self.diameter, self.outer, self.contour)?;
        Ok(match self.kind {
            FilterKind::HighPass => mask::inverted(&low),
            _ => low,
        })
    }
}

impl Filter for RadialMask {
    fn process(&self, mat: &Matrix2D, prog_prov: &mut ProgressProvider) -> Result<Matrix2D, StepStop> {
        let mask = self.build_mask(mat.h(), mat.w()).map_err(StepStop::Failed)?;
        apply_mask(mat, &mask, prog_prov)
    }

    fn get_steps_num(&self, mat: &Matrix2D) -> usize { mat.h() }

    fn get_description(&self) -> String {
        let diameter = if self.diameter == 0 { "full".to_string() } else { self.diameter.to_string() };
        format!("{} ({}, diameter {}{}{})", self.kind, self.window, diameter,
            if self.outer { ", outer" } else { "" },
            if self.contour { ", contour" } else { "" })
    }

    fn kind(&self) -> FilterKind { self.kind }

    fn params(&self) -> FilterParams {
        let mut params = FilterParams::new()
            .with("diameter", self.diameter)
            .with("outer", self.outer)
            .with("contour", self.contour);
        self.window.write_params(&mut params);
        params
    }

    fn get_copy(&self) -> FilterBase { Box::new(self.clone()) }
}


/// `Band Pass` keeps a ring, `Band Stop` removes it.
#[derive(Clone, Debug, PartialEq)]
pub struct RingMask {
    kind: FilterKind,
    window: Window,
    diameter: usize,
    width: usize,
    contour: bool,
}

impl RingMask {
    const KEYS: [&'static str; 5] = ["window", "shape", "diameter", "width", "contour"];

    pub fn new(kind: FilterKind, window: Window, diameter: usize, width: usize, contour: bool) -> Self {
        assert!(kind == FilterKind::BandPass || kind == FilterKind::BandStop);
        assert!(width > 0);
        RingMask { kind, window, diameter, width, contour }
    }

    pub fn try_from_params(kind: FilterKind, params: &FilterParams) -> Result<Self, MyError> {
        params.check_known_keys(kind, &Self::KEYS)?;
        Ok(RingMask::new(
            kind,
            Window::try_from_params(kind, params)?,
            params.get_or(kind, "diameter", 0_usize)?,
            positive_width(kind, params)?,
            params.get_or(kind, "contour", false)?))
    }
}

impl Filter for RingMask {
    fn process(&self, mat: &Matrix2D, prog_prov: &mut ProgressProvider) -> Result<Matrix2D, StepStop> {
        let ring = mask::band_pass(self.window, mat.h(), mat.w(), self.diameter, self.width, self.contour)
            .map_err(StepStop::Failed)?;
        let mask = match self.kind {
            FilterKind::BandStop => mask::inverted(&ring),
            _ => ring,
        };
        apply_mask(mat, &mask, prog_prov)
    }

    fn get_steps_num(&self, mat: &Matrix2D) -> usize { mat.h() }

    fn get_description(&self) -> String {
        format!("{} ({}, width {})", self.kind, self.window, self.width)
    }

    fn kind(&self) -> FilterKind { self.kind }

    fn params(&self) -> FilterParams {
        let mut params = FilterParams::new()
            .with("diameter", self.diameter)
            .with("width", self.width)
            .with("contour", self.contour);
        self.window.write_params(&mut params);
        params
    }

    fn get_copy(&self) -> FilterBase { Box::new(self.clone()) }
}


/// Vertical and horizontal band pass/stop.
#[derive(Clone, Debug, PartialEq)]
pub struct LineBandMask {
    kind: FilterKind,
    window: Window,
    center: usize,
    width: usize,
}

impl LineBandMask {
    const KEYS: [&'static str; 4] = ["window", "shape", "center", "width"];

    pub fn new(kind: FilterKind, window: Window, center: usize, width: usize) -> Self {
        assert!(width > 0);
        assert!(matches!(kind,
            FilterKind::VerticalBandPass | FilterKind::VerticalBandStop
            | FilterKind::HorizontalBandPass | FilterKind::HorizontalBandStop));
        LineBandMask { kind, window, center, width }
    }

    pub fn try_from_params(kind: FilterKind, params: &FilterParams) -> Result<Self, MyError> {
        params.check_known_keys(kind, &Self::KEYS)?;
        Ok(LineBandMask::new(
            kind,
            Window::try_from_params(kind, params)?,
            params.get_or(kind, "center", 0_usize)?,
            positive_width(kind, params)?))
    }
}

impl Filter for LineBandMask {
    fn process(&self, mat: &Matrix2D, prog_prov: &mut ProgressProvider) -> Result<Matrix2D, StepStop> {
        let (rows, cols) = (mat.h(), mat.w());
        let mask = match self.kind {
            FilterKind::VerticalBandPass => mask::vertical_band(self.window, rows, cols, self.center, self.width),
            FilterKind::VerticalBandStop => mask::vertical_band(self.window, rows, cols, self.center, self.width)
                .map(|m| mask::inverted(&m)),
            FilterKind::HorizontalBandPass => mask::horizontal_band(self.window, rows, cols, self.center, self.width),
            _ => mask::horizontal_band(self.window, rows, cols, self.center, self.width)
                .map(|m| mask::inverted(&m)),
        }.map_err(StepStop::Failed)?;

        apply_mask(mat, &mask, prog_prov)
    }

    fn get_steps_num(&self, mat: &Matrix2D) -> usize { mat.h() }

    fn get_description(&self) -> String {
        format!("{} ({}, center {}, width {})", self.kind, self.window, self.center, self.width)
    }

    fn kind(&self) -> FilterKind { self.kind }

    fn params(&self) -> FilterParams {
        let mut params = FilterParams::new()
            .with("center", self.center)
            .with("width", self.width);
        self.window.write_params(&mut params);
        params
    }

    fn get_copy(&self) -> FilterBase { Box::new(self.clone()) }
}


#[derive(Clone, Debug, PartialEq)]
pub struct Notch {
    window: Window,
    center: PixelPos,
    width: usize,
}

impl Notch {
    const KEYS: [&'static str; 5] = ["window", "shape", "center_row", "center_col", "width"];

    pub fn new(window: Window, center: PixelPos, width: usize) -> Self {
        assert!(width > 0);
        Notch { window, center, width }
    }

    pub fn try_from_params(params: &FilterParams) -> Result<Self, MyError> {
        let kind = FilterKind::Notch;
        params.check_known_keys(kind, &Self::KEYS)?;
        Ok(Notch::new(
            Window::try_from_params(kind, params)?,
            PixelPos::new(
                params.get_or(kind, "center_row", 0_usize)?,
                params.get_or(kind, "center_col", 0_usize)?),
            positive_width(kind, params)?))
    }
}

impl Filter for Notch {
    fn process(&self, mat: &Matrix2D, prog_prov: &mut ProgressProvider) -> Result<Matrix2D, StepStop> {
        let mask = mask::notch(self.window, mat.h(), mat.w(), self.center, self.width)
            .map_err(StepStop::Failed)?;
        apply_mask(mat, &mask, prog_prov)
    }

    fn get_steps_num(&self, mat: &Matrix2D) -> usize { mat.h() }

    fn get_description(&self) -> String {
        format!("Notch ({}, at {}:{}, width {})", self.window, self.center.row, self.center.col, self.width)
    }

    fn kind(&self) -> FilterKind { FilterKind::Notch }

    fn params(&self) -> FilterParams {
        let mut params = FilterParams::new()
            .with("center_row", self.center.row)
            .with("center_col", self.center.col)
            .with("width", self.width);
        self.window.write_params(&mut params);
        params
    }

    fn get_copy(&self) -> FilterBase { Box::new(self.clone()) }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn ones(w: usize, h: usize) -> Matrix2D { Matrix2D::filled(w, h, 1.0) }

    #[test]
    fn low_and_high_pass_add_up_to_the_input() {
        let params = FilterParams::new().with("window", "hamming").with("diameter", 6);
        let low = RadialMask::try_from_params(FilterKind::LowPass, &params).unwrap();
        let high = RadialMask::try_from_params(FilterKind::HighPass, &params).unwrap();

        let mat = ones(8, 6);
        let mut prog = ProgressProvider::silent();
        let lo = low.process(&mat, &mut prog).unwrap();
        let hi = high.process(&mat, &mut prog).unwrap();

        for (a, b) in lo.pixels().iter().zip(hi.pixels().iter()) {
            assert!((a + b - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn unknown_key_is_rejected() {
        let params = FilterParams::new().with("radius", 3);
        assert!(matches!(
            RadialMask::try_from_params(FilterKind::LowPass, &params),
            Err(MyError::InvalidFilterParam { .. })));
    }

    #[test]
    fn zero_width_is_rejected() {
        let params = FilterParams::new().with("width", 0);
        assert!(RingMask::try_from_params(FilterKind::BandPass, &params).is_err());
        assert!(LineBandMask::try_from_params(FilterKind::VerticalBandPass, &params).is_err());
        assert!(Notch::try_from_params(&params).is_err());
    }

    #[test]
    fn ring_wider_than_diameter_fails_at_run_time() {
        let params = FilterParams::new().with("diameter", 2).with("width", 5);
        let ring = RingMask::try_from_params(FilterKind::BandStop, &params).unwrap();
        let res = ring.process(&ones(4, 4), &mut ProgressProvider::silent());
        assert!(matches!(res, Err(StepStop::Failed(_))));
    }

    #[test]
    fn huge_sizes_fail_instead_of_allocating() {
        let mat = ones(4, 4);
        let mut prog = ProgressProvider::silent();

        let low = RadialMask::try_from_params(FilterKind::LowPass, &FilterParams::new().with("diameter", 1_usize << 61)).unwrap();
        assert!(matches!(low.process(&mat, &mut prog), Err(StepStop::Failed(_))));

        let low = RadialMask::try_from_params(FilterKind::LowPass, &FilterParams::new().with("diameter", 100_000)).unwrap();
        assert!(matches!(low.process(&mat, &mut prog), Err(StepStop::Failed(_))));

        let band = LineBandMask::try_from_params(FilterKind::VerticalBandPass, &FilterParams::new().with("width", 1_usize << 61)).unwrap();
        assert!(matches!(band.process(&mat, &mut prog), Err(StepStop::Failed(_))));

        let band = LineBandMask::try_from_params(FilterKind::HorizontalBandStop, &FilterParams::new().with("width", 1_usize << 61)).unwrap();
        assert!(matches!(band.process(&mat, &mut prog), Err(StepStop::Failed(_))));
    }

    #[test]
    fn vertical_band_stop_removes_columns() {
        let params = FilterParams::new().with("window", "boxcar").with("center", 1).with("width", 1);
        let stop = LineBandMask::try_from_params(FilterKind::VerticalBandStop, &params).unwrap();
        let res = stop.process(&ones(3, 2), &mut ProgressProvider::silent()).unwrap();
        assert_eq!(res.row(0), &[1.0, 0.0, 1.0]);
        assert_eq!(res.row(1), &[1.0, 0.0, 1.0]);
    }

    #[test]
    fn params_are_normalized() {
        let filter = RadialMask::try_from_params(FilterKind::LowPass, &FilterParams::new()).unwrap();
        let params = filter.params();
        assert_eq!(params.get("window"), Some("hanning"));
        assert_eq!(params.get("diameter"), Some("0"));
        assert_eq!(RadialMask::try_from_params(FilterKind::LowPass, &params).unwrap(), filter);
    }
}
