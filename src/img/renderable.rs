use crate::{display::Colormap, my_err::MyError};
use super::Matrix2D;


/// Final display buffer: clipped intensities plus their colour-mapped RGB bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct Renderable {
    intensities: Matrix2D,
    rgb: Vec<u8>,
    lower: f64,
    upper: f64,
    colormap: Colormap,
}

impl Renderable {
    pub fn new(intensities: Matrix2D, rgb: Vec<u8>, lower: f64, upper: f64, colormap: Colormap) -> Self {
        assert_eq!(rgb.len(), intensities.w() * intensities.h() * 3);
        assert!(lower <= upper);
        Renderable { intensities, rgb, lower, upper, colormap }
    }

    pub fn w(&self) -> usize { self.intensities.w() }
    pub fn h(&self) -> usize { self.intensities.h() }

    /// Intensities after contrast clipping, before colour mapping.
    pub fn intensities(&self) -> &Matrix2D { &self.intensities }

    /// Row-major RGB triplets, `w * h * 3` bytes.
    pub fn rgb(&self) -> &[u8] { &self.rgb }

    pub fn contrast_bounds(&self) -> (f64, f64) { (self.lower, self.upper) }
    pub fn colormap(&self) -> Colormap { self.colormap }

    pub fn get_description(&self) -> String {
        format!("{} x {} [{:.4} .. {:.4}] {}", self.h(), self.w(), self.lower, self.upper, self.colormap)
    }

    pub fn try_save(&self, path: &str) -> Result<(), MyError> {
        use jpeg_encoder::{Encoder, ColorType};

        if self.w() > u16::MAX as usize || self.h() > u16::MAX as usize {
            return Err(MyError::Io { msg: format!("{}x{} is too large for JPEG", self.h(), self.w()) });
        }

        let encoder = Encoder::new_file(path, 100)
            .map_err(|err| MyError::Io { msg: err.to_string() })?;
        encoder.encode(&self.rgb, self.w() as u16, self.h() as u16, ColorType::Rgb)
            .map_err(|err| MyError::Io { msg: err.to_string() })?;

        log::info!("saved {} to '{}'", self.get_description(), path);

        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saves_jpeg() {
        let intensities = Matrix2D::from_pixels(2, 1, vec![0.0, 1.0]);
        let renderable = Renderable::new(intensities, vec![0, 0, 0, 255, 255, 255], 0.0, 1.0, Colormap::Gray);

        let path = std::env::temp_dir().join(format!("mri_display_render_{}.jpg", std::process::id()));
        let path = path.to_str().unwrap();
        renderable.try_save(path).unwrap();

        let bytes = std::fs::read(path).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn unwritable_path_is_an_io_error() {
        let intensities = Matrix2D::from_pixels(1, 1, vec![0.0]);
        let renderable = Renderable::new(intensities, vec![0, 0, 0], 0.0, 0.0, Colormap::Gray);
        let res = renderable.try_save("/nonexistent_dir_for_mri_display/out.jpg");
        assert!(matches!(res, Err(MyError::Io { .. })));
    }
}
