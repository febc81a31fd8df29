use crate::{filter::FilterChain, img::{ImageBuffer, Matrix2D, PIXEL_VALUES_COUNT, Renderable}, my_err::MyError, processing::ProgressProvider};
use super::{ColorLut, DisplaySettings};


/// Progress actions `render` completes: a row each for the offset and the
/// colour mapping, plus whatever the chain needs.
pub fn get_steps_num(image: &ImageBuffer, chain: &FilterChain) -> usize {
    image.h() * 2 + chain.get_steps_num(image.matrix())
}

/// Offset subtraction, then the chain, then contrast clipping, then the colour lookup.
pub fn render(
    image: &ImageBuffer,
    settings: &DisplaySettings,
    chain: &FilterChain,
    lut: &ColorLut,
    prog_prov: &mut ProgressProvider) -> Result<Renderable, MyError>
{
    let offset = settings.dc_offset();
    let mut mat = image.matrix().clone();
    for row in 0..mat.h() {
        for v in mat.row_mut(row).iter_mut() {
            *v -= offset;
        }
        prog_prov.complete_action().map_err(|_| MyError::Halted)?;
    }
    if !mat.all_finite() {
        return Err(MyError::invalid_setting("DC offset",
            format!("subtracting {} takes the image out of the finite range", offset)));
    }

    let filtered = chain.apply_with_progress(&mat, prog_prov)?;

    let (lower, upper) = settings.contrast().bounds_for(&filtered);
    let clipped = filtered.map(|v| v.max(lower).min(upper));

    let rgb = map_colors(&clipped, lower, upper, lut, prog_prov)?;

    Ok(Renderable::new(clipped, rgb, lower, upper, settings.colormap()))
}

/// Lookup level of `v` within `[lower, upper]`, 0 for a degenerate range.
pub fn level_of(v: f64, lower: f64, upper: f64) -> u8 {
    if upper <= lower {
        return 0;
    }
    let t = ((v - lower) / (upper - lower)).max(0.0).min(1.0);
    (t * (PIXEL_VALUES_COUNT - 1) as f64).round() as u8
}

fn map_colors(mat: &Matrix2D, lower: f64, upper: f64, lut: &ColorLut, prog_prov: &mut ProgressProvider) -> Result<Vec<u8>, MyError> {
    let mut rgb = Vec::<u8>::with_capacity(mat.w() * mat.h() * 3);
    for row in 0..mat.h() {
        for v in mat.row(row) {
            rgb.extend_from_slice(&lut.color(level_of(*v, lower, upper)));
        }
        prog_prov.complete_action().map_err(|_| MyError::Halted)?;
    }
    Ok(rgb)
}


#[cfg(test)]
mod tests {
    use crate::{display::{Colormap, ColormapRegistry}, filter::filter_option::FilterParams, img::Metadata};
    use super::*;

    fn img(w: usize, h: usize, pixels: Vec<f64>) -> ImageBuffer {
        ImageBuffer::new("t", w, h, pixels, Metadata::new()).unwrap()
    }

    #[test]
    fn levels() {
        assert_eq!(level_of(0.0, 0.0, 1.0), 0);
        assert_eq!(level_of(1.0, 0.0, 1.0), 255);
        assert_eq!(level_of(0.5, 0.0, 1.0), 128);
        assert_eq!(level_of(5.0, 2.0, 2.0), 0);
    }

    #[test]
    fn manual_contrast_clips() {
        let reg = ColormapRegistry::load_embedded().unwrap();
        let mut settings = DisplaySettings::new();
        settings.set_contrast(0.0, 10.0).unwrap();

        let image = img(3, 1, vec![-5.0, 5.0, 50.0]);
        let mut prog = ProgressProvider::silent();
        let res = render(&image, &settings, &FilterChain::new(), reg.lut(Colormap::Gray), &mut prog).unwrap();

        assert_eq!(res.intensities().pixels(), &[0.0, 5.0, 10.0]);
        assert_eq!(res.rgb(), &[0, 0, 0, 128, 128, 128, 255, 255, 255]);
        assert_eq!(prog.completed_actions(), get_steps_num(&image, &FilterChain::new()));
    }

    #[test]
    fn overflowing_offset_fails() {
        let reg = ColormapRegistry::load_embedded().unwrap();
        let mut settings = DisplaySettings::new();
        settings.set_dc_offset(-f64::MAX).unwrap();

        let image = img(2, 1, vec![f64::MAX, 0.0]);
        let res = render(&image, &settings, &FilterChain::new(), reg.lut(Colormap::Gray), &mut ProgressProvider::silent());
        assert!(matches!(res, Err(MyError::InvalidSetting { .. })));
    }

    #[test]
    fn settings_offset_runs_before_the_chain() {
        let reg = ColormapRegistry::load_embedded().unwrap();
        let mut settings = DisplaySettings::new();
        settings.set_dc_offset(2.0).unwrap();

        let mut chain = FilterChain::new();
        chain.append("Gamma Transform", &FilterParams::new().with("gamma", 2)).unwrap();

        let image = img(2, 1, vec![3.0, 5.0]);
        let res = render(&image, &settings, &chain, reg.lut(Colormap::Gray), &mut ProgressProvider::silent()).unwrap();
        assert_eq!(res.intensities().pixels(), &[1.0, 9.0]);
    }
}
