use std::fmt;
use crate::{img::{ImageBuffer, Matrix2D}, my_err::MyError};
use super::Colormap;


#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Contrast {
    /// Bounds follow the data range after filtering.
    Auto,
    Manual { lower: f64, upper: f64 },
}

impl Default for Contrast {
    fn default() -> Self { Contrast::Auto }
}

impl Contrast {
    pub fn bounds_for(&self, mat: &Matrix2D) -> (f64, f64) {
        match *self {
            Contrast::Auto => mat.min_max(),
            Contrast::Manual { lower, upper } => (lower, upper),
        }
    }
}

impl fmt::Display for Contrast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Contrast::Auto => write!(f, "auto"),
            Contrast::Manual { lower, upper } => write!(f, "{} .. {}", lower, upper),
        }
    }
}


/// Per-subwindow appearance. Every setter validates first and leaves
/// the settings untouched on error.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplaySettings {
    colormap: Colormap,
    contrast: Contrast,
    dc_offset: f64,
    aspect: Option<f64>,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        DisplaySettings {
            colormap: Colormap::default(),
            contrast: Contrast::default(),
            dc_offset: 0_f64,
            aspect: None,
        }
    }
}

impl DisplaySettings {
    pub fn new() -> Self { Self::default() }

    /// Defaults, with the aspect ratio taken from the acquisition metadata when known.
    pub fn for_image(img: &ImageBuffer) -> Self {
        DisplaySettings { aspect: img.aspect_ratio(), ..Self::default() }
    }

    pub fn colormap(&self) -> Colormap { self.colormap }
    pub fn contrast(&self) -> Contrast { self.contrast }
    pub fn dc_offset(&self) -> f64 { self.dc_offset }
    pub fn aspect(&self) -> Option<f64> { self.aspect }

    pub fn set_colormap(&mut self, colormap: Colormap) {
        self.colormap = colormap;
    }

    pub fn set_colormap_by_name(&mut self, name: &str) -> Result<(), MyError> {
        let colormap = Colormap::try_from_name(name)
            .ok_or_else(|| MyError::invalid_setting("colormap", format!("'{}' is not a known colormap", name)))?;
        self.colormap = colormap;
        Ok(())
    }

    pub fn set_contrast(&mut self, lower: f64, upper: f64) -> Result<(), MyError> {
        if !lower.is_finite() || !upper.is_finite() {
            return Err(MyError::invalid_setting("contrast", format!("bounds {} .. {} must be finite", lower, upper)));
        }
        if lower > upper {
            return Err(MyError::invalid_setting("contrast", format!("lower bound {} is above upper bound {}", lower, upper)));
        }
        self.contrast = Contrast::Manual { lower, upper };
        Ok(())
    }

    pub fn set_auto_contrast(&mut self) {
        self.contrast = Contrast::Auto;
    }

    pub fn set_dc_offset(&mut self, dc_offset: f64) -> Result<(), MyError> {
        if !dc_offset.is_finite() {
            return Err(MyError::invalid_setting("DC offset", format!("{} is not finite", dc_offset)));
        }
        self.dc_offset = dc_offset;
        Ok(())
    }

    pub fn set_aspect(&mut self, aspect: Option<f64>) -> Result<(), MyError> {
        if let Some(a) = aspect {
            if !a.is_finite() || a <= 0.0 {
                return Err(MyError::invalid_setting("aspect ratio", format!("{} must be a positive number", a)));
            }
        }
        self.aspect = aspect;
        Ok(())
    }

    pub fn get_description(&self) -> String {
        format!("{}, contrast {}, DC offset {}", self.colormap, self.contrast, self.dc_offset)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inverted_contrast_is_rejected() {
        let mut settings = DisplaySettings::new();
        settings.set_contrast(0.0, 2.0).unwrap();

        let before = settings.clone();
        assert!(matches!(settings.set_contrast(3.0, 1.0), Err(MyError::InvalidSetting { .. })));
        assert_eq!(settings, before);

        settings.set_contrast(1.0, 1.0).unwrap();
        assert_eq!(settings.contrast(), Contrast::Manual { lower: 1.0, upper: 1.0 });
    }

    #[test]
    fn unknown_colormap_is_rejected() {
        let mut settings = DisplaySettings::new();
        settings.set_colormap_by_name("hot").unwrap();
        assert!(settings.set_colormap_by_name("sepia").is_err());
        assert_eq!(settings.colormap(), Colormap::Hot);
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let mut settings = DisplaySettings::new();
        assert!(settings.set_dc_offset(f64::NAN).is_err());
        assert!(settings.set_contrast(f64::NEG_INFINITY, 0.0).is_err());
        assert!(settings.set_aspect(Some(0.0)).is_err());
        assert_eq!(settings, DisplaySettings::default());
    }

    #[test]
    fn auto_contrast_follows_data() {
        let mat = Matrix2D::from_pixels(3, 1, vec![-2.0, 0.5, 7.0]);
        assert_eq!(Contrast::Auto.bounds_for(&mat), (-2.0, 7.0));
        assert_eq!(Contrast::Manual { lower: 0.0, upper: 1.0 }.bounds_for(&mat), (0.0, 1.0));
    }
}
