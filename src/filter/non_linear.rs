use crate::{img::{Matrix2D, PixelPos}, my_err::MyError, processing::ProgressProvider};
use super::{FilterBase, FilterKind, filter_option::{FilterParams, param_err}, filter_trait::{Filter, StepStop}, map_rows};


#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DcLevel {
    Fixed(f64),
    /// Mean of the four `size x size` corner means.
    Corners { size: usize },
}

#[derive(Clone, Debug, PartialEq)]
pub struct DcOffset {
    level: DcLevel,
}

impl DcOffset {
    const KEYS: [&'static str; 2] = ["offset", "size"];

    pub fn new(level: DcLevel) -> Self {
        DcOffset { level }
    }

    pub fn try_from_params(params: &FilterParams) -> Result<Self, MyError> {
        let kind = FilterKind::DcOffset;
        params.check_known_keys(kind, &Self::KEYS)?;

        let level = match params.get_opt::<f64>(kind, "offset")? {
            Some(offset) => DcLevel::Fixed(offset),
            None => {
                let size = params.get_or(kind, "size", 10_usize)?;
                if size == 0 {
                    return Err(param_err(kind, "size", "must be at least 1".to_string()));
                }
                DcLevel::Corners { size }
            }
        };

        Ok(DcOffset::new(level))
    }

    pub fn estimate(&self, mat: &Matrix2D) -> f64 {
        match self.level {
            DcLevel::Fixed(offset) => offset,
            DcLevel::Corners { size } => corners_mean(mat, size),
        }
    }
}

pub fn corners_mean(mat: &Matrix2D, size: usize) -> f64 {
    let (h, w) = (mat.h(), mat.w());
    let s_r = size.min(h);
    let s_c = size.min(w);

    let corners = [
        (PixelPos::new(0, 0), PixelPos::new(s_r, s_c)),
        (PixelPos::new(0, w - s_c), PixelPos::new(s_r, w)),
        (PixelPos::new(h - s_r, 0), PixelPos::new(h, s_c)),
        (PixelPos::new(h - s_r, w - s_c), PixelPos::new(h, w)),
    ];

    corners.iter()
        .map(|(tl, br)| mat.mean_of_area(*tl, *br))
        .sum::<f64>() / 4.0
}

impl Filter for DcOffset {
    fn process(&self, mat: &Matrix2D, prog_prov: &mut ProgressProvider) -> Result<Matrix2D, StepStop> {
        let level = self.estimate(mat);
        map_rows(mat, prog_prov, |v| v - level)
    }

    fn get_steps_num(&self, mat: &Matrix2D) -> usize { mat.h() }

    fn get_description(&self) -> String {
        match self.level {
            DcLevel::Fixed(offset) => format!("DC Offset ({})", offset),
            DcLevel::Corners { size } => format!("DC Offset (corners {}x{})", size, size),
        }
    }

    fn kind(&self) -> FilterKind { FilterKind::DcOffset }

    fn params(&self) -> FilterParams {
        match self.level {
            DcLevel::Fixed(offset) => FilterParams::new().with("offset", offset),
            DcLevel::Corners { size } => FilterParams::new().with("size", size),
        }
    }

    fn get_copy(&self) -> FilterBase { Box::new(self.clone()) }
}


#[derive(Clone, Debug, Default, PartialEq)]
pub struct LogTransform;

impl LogTransform {
    pub fn try_from_params(params: &FilterParams) -> Result<Self, MyError> {
        params.check_known_keys(FilterKind::LogTransform, &[])?;
        Ok(LogTransform)
    }
}

impl Filter for LogTransform {
    fn process(&self, mat: &Matrix2D, prog_prov: &mut ProgressProvider) -> Result<Matrix2D, StepStop> {
        if let Some(v) = mat.pixels().iter().find(|v| **v <= -1.0) {
            return Err(StepStop::Failed(format!("log10(1 + x) is undefined for x = {}", v)));
        }
        map_rows(mat, prog_prov, |v| (1.0 + v).log10())
    }

    fn get_steps_num(&self, mat: &Matrix2D) -> usize { mat.h() }
    fn get_description(&self) -> String { "Log Transform".to_string() }
    fn kind(&self) -> FilterKind { FilterKind::LogTransform }
    fn params(&self) -> FilterParams { FilterParams::new() }
    fn get_copy(&self) -> FilterBase { Box::new(self.clone()) }
}


#[derive(Clone, Debug, PartialEq)]
pub struct GammaTransform {
    gamma: f64,
}

impl GammaTransform {
    pub fn new(gamma: f64) -> Self {
        assert!(gamma.is_finite());
        GammaTransform { gamma }
    }

    pub fn try_from_params(params: &FilterParams) -> Result<Self, MyError> {
        let kind = FilterKind::GammaTransform;
        params.check_known_keys(kind, &["gamma"])?;
        Ok(GammaTransform::new(params.get_or(kind, "gamma", 1.0)?))
    }
}

impl Filter for GammaTransform {
    fn process(&self, mat: &Matrix2D, prog_prov: &mut ProgressProvider) -> Result<Matrix2D, StepStop> {
        let gamma = self.gamma;
        map_rows(mat, prog_prov, |v| v.powf(gamma))
    }

    fn get_steps_num(&self, mat: &Matrix2D) -> usize { mat.h() }
    fn get_description(&self) -> String { format!("Gamma Transform ({})", self.gamma) }
    fn kind(&self) -> FilterKind { FilterKind::GammaTransform }
    fn params(&self) -> FilterParams { FilterParams::new().with("gamma", self.gamma) }
    fn get_copy(&self) -> FilterBase { Box::new(self.clone()) }
}


#[derive(Clone, Debug, PartialEq)]
pub struct ThresholdMask {
    threshold: f64,
}

impl ThresholdMask {
    pub fn new(threshold: f64) -> Self {
        assert!(threshold >= 0.0);
        ThresholdMask { threshold }
    }

    pub fn try_from_params(params: &FilterParams) -> Result<Self, MyError> {
        let kind = FilterKind::ThresholdMask;
        params.check_known_keys(kind, &["threshold"])?;
        let threshold = params.get_or(kind, "threshold", 0.1)?;
        if threshold < 0.0 {
            return Err(param_err(kind, "threshold", "must not be negative".to_string()));
        }
        Ok(ThresholdMask::new(threshold))
    }
}

impl Filter for ThresholdMask {
    fn process(&self, mat: &Matrix2D, prog_prov: &mut ProgressProvider) -> Result<Matrix2D, StepStop> {
        let threshold = self.threshold;
        map_rows(mat, prog_prov, |v| if v.abs() < threshold { 0.0 } else { v })
    }

    fn get_steps_num(&self, mat: &Matrix2D) -> usize { mat.h() }
    fn get_description(&self) -> String { format!("Threshold Mask (|x| < {})", self.threshold) }
    fn kind(&self) -> FilterKind { FilterKind::ThresholdMask }
    fn params(&self) -> FilterParams { FilterParams::new().with("threshold", self.threshold) }
    fn get_copy(&self) -> FilterBase { Box::new(self.clone()) }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_offset_is_subtracted() {
        let filter = DcOffset::try_from_params(&FilterParams::new().with("offset", 1)).unwrap();
        let res = filter.process(&Matrix2D::empty_with_size(4, 4), &mut ProgressProvider::silent()).unwrap();
        assert!(res.pixels().iter().all(|v| *v == -1.0));
    }

    #[test]
    fn corner_estimate_uses_all_four_corners() {
        let mut mat = Matrix2D::filled(4, 4, 5.0);
        mat[PixelPos::new(0, 0)] = 1.0;
        mat[PixelPos::new(0, 3)] = 2.0;
        mat[PixelPos::new(3, 0)] = 3.0;
        mat[PixelPos::new(3, 3)] = 4.0;

        assert!((corners_mean(&mat, 1) - 2.5).abs() < 1e-12);

        let filter = DcOffset::try_from_params(&FilterParams::new().with("size", 1)).unwrap();
        assert!((filter.estimate(&mat) - 2.5).abs() < 1e-12);
    }

    #[test]
    fn corner_size_is_clipped_to_the_image() {
        let mat = Matrix2D::filled(2, 3, 7.0);
        assert!((corners_mean(&mat, 10) - 7.0).abs() < 1e-12);
    }

    #[test]
    fn log_transform() {
        let mat = Matrix2D::from_pixels(2, 1, vec![0.0, 9.0]);
        let res = LogTransform.process(&mat, &mut ProgressProvider::silent()).unwrap();
        assert_eq!(res.pixels(), &[0.0, 1.0]);

        let bad = Matrix2D::from_pixels(1, 1, vec![-1.0]);
        assert!(matches!(LogTransform.process(&bad, &mut ProgressProvider::silent()), Err(StepStop::Failed(_))));
    }

    #[test]
    fn gamma_and_threshold() {
        let mat = Matrix2D::from_pixels(3, 1, vec![0.05, 4.0, -0.2]);
        let mut prog = ProgressProvider::silent();

        let res = GammaTransform::new(0.5).process(&Matrix2D::from_pixels(1, 1, vec![4.0]), &mut prog).unwrap();
        assert_eq!(res.pixels(), &[2.0]);

        let res = ThresholdMask::new(0.1).process(&mat, &mut prog).unwrap();
        assert_eq!(res.pixels(), &[0.0, 4.0, -0.2]);
    }

    #[test]
    fn negative_threshold_is_rejected() {
        let params = FilterParams::new().with("threshold", -1);
        assert!(ThresholdMask::try_from_params(&params).is_err());
    }
}
