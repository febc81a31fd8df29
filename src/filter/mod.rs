pub mod filter_trait;
pub mod filter_option;
pub mod window;
pub mod mask;
pub mod linear;
pub mod non_linear;
mod chain;

use std::fmt;
use crate::{img::Matrix2D, my_err::MyError, processing::ProgressProvider};
use self::{filter_option::FilterParams, filter_trait::StepStop, linear::*, non_linear::*};

pub use chain::FilterChain;

pub type FilterBase = Box<dyn self::filter_trait::Filter>;


/// Closed set of filters a chain step may name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FilterKind {
    DcOffset,
    LowPass,
    HighPass,
    BandPass,
    BandStop,
    VerticalBandPass,
    VerticalBandStop,
    HorizontalBandPass,
    HorizontalBandStop,
    Notch,
    LogTransform,
    GammaTransform,
    ThresholdMask,
}

impl FilterKind {
    pub const ALL: [FilterKind; 13] = [
        FilterKind::DcOffset,
        FilterKind::LowPass,
        FilterKind::HighPass,
        FilterKind::BandPass,
        FilterKind::BandStop,
        FilterKind::VerticalBandPass,
        FilterKind::VerticalBandStop,
        FilterKind::HorizontalBandPass,
        FilterKind::HorizontalBandStop,
        FilterKind::Notch,
        FilterKind::LogTransform,
        FilterKind::GammaTransform,
        FilterKind::ThresholdMask,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FilterKind::DcOffset => "DC Offset",
            FilterKind::LowPass => "Low Pass",
            FilterKind::HighPass => "High Pass",
            FilterKind::BandPass => "Band Pass",
            FilterKind::BandStop => "Band Stop",
            FilterKind::VerticalBandPass => "Vertical Band Pass",
            FilterKind::VerticalBandStop => "Vertical Band Stop",
            FilterKind::HorizontalBandPass => "Horizontal Band Pass",
            FilterKind::HorizontalBandStop => "Horizontal Band Stop",
            FilterKind::Notch => "Notch",
            FilterKind::LogTransform => "Log Transform",
            FilterKind::GammaTransform => "Gamma Transform",
            FilterKind::ThresholdMask => "Threshold Mask",
        }
    }

    pub fn try_from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        FilterKind::ALL.iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
            .copied()
    }

    pub fn create(&self, params: &FilterParams) -> Result<FilterBase, MyError> {
        let kind = *self;
        let filter = match kind {
            FilterKind::DcOffset => Box::new(DcOffset::try_from_params(params)?) as FilterBase,
            FilterKind::LowPass | FilterKind::HighPass =>
                Box::new(RadialMask::try_from_params(kind, params)?) as FilterBase,
            FilterKind::BandPass | FilterKind::BandStop =>
                Box::new(RingMask::try_from_params(kind, params)?) as FilterBase,
            FilterKind::VerticalBandPass | FilterKind::VerticalBandStop
            | FilterKind::HorizontalBandPass | FilterKind::HorizontalBandStop =>
                Box::new(LineBandMask::try_from_params(kind, params)?) as FilterBase,
            FilterKind::Notch => Box::new(Notch::try_from_params(params)?) as FilterBase,
            FilterKind::LogTransform => Box::new(LogTransform::try_from_params(params)?) as FilterBase,
            FilterKind::GammaTransform => Box::new(GammaTransform::try_from_params(params)?) as FilterBase,
            FilterKind::ThresholdMask => Box::new(ThresholdMask::try_from_params(params)?) as FilterBase,
        };
        Ok(filter)
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

pub fn try_create_filter(name: &str, params: &FilterParams) -> Result<FilterBase, MyError> {
    let kind = FilterKind::try_from_name(name)
        .ok_or_else(|| MyError::UnknownFilter { name: name.to_string() })?;
    kind.create(params)
}


/// Multiplies `mat` by `mask`, one progress action per row.
fn apply_mask(mat: &Matrix2D, mask: &Matrix2D, prog_prov: &mut ProgressProvider) -> Result<Matrix2D, StepStop> {
    assert_eq!(mat.size_vec(), mask.size_vec());

    let mut res = mat.clone();
    for row in 0..mat.h() {
        for (v, m) in res.row_mut(row).iter_mut().zip(mask.row(row).iter()) {
            *v *= m;
        }
        prog_prov.complete_action()?;
    }

    Ok(res)
}

/// Point-wise transform, one progress action per row.
fn map_rows<Tr: Fn(f64) -> f64>(mat: &Matrix2D, prog_prov: &mut ProgressProvider, tr: Tr) -> Result<Matrix2D, StepStop> {
    let mut res = mat.clone();
    for row in 0..mat.h() {
        for v in res.row_mut(row).iter_mut() {
            *v = tr(*v);
        }
        prog_prov.complete_action()?;
    }

    Ok(res)
}


#[cfg(test)]
mod tests {
    use super::*;
    use super::filter_trait::Filter;

    #[test]
    fn names_round_trip() {
        for kind in FilterKind::ALL.iter() {
            assert_eq!(FilterKind::try_from_name(kind.name()), Some(*kind));
        }
        assert_eq!(FilterKind::try_from_name(" low pass "), Some(FilterKind::LowPass));
        assert_eq!(FilterKind::try_from_name("Sharpen"), None);
    }

    #[test]
    fn every_filter_builds_from_defaults() {
        for kind in FilterKind::ALL.iter() {
            let filter = kind.create(&FilterParams::new()).unwrap();
            assert_eq!(filter.kind(), *kind);
            let again = kind.create(&filter.params()).unwrap();
            assert_eq!(again.params(), filter.params());
        }
    }

    #[test]
    fn unknown_name_fails() {
        match try_create_filter("Sharpen", &FilterParams::new()) {
            Err(MyError::UnknownFilter { name }) => assert_eq!(name, "Sharpen"),
            Err(other) => panic!("unexpected {:?}", other),
            Ok(_) => panic!("created an unknown filter"),
        }
    }
}
