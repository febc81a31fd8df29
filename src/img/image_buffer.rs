use std::collections::BTreeMap;
use crate::my_err::MyError;
use super::Matrix2D;

/// Acquisition metadata, e.g. procpar values of the scan.
pub type Metadata = BTreeMap<String, String>;

/// One decoded 2D dataset. Immutable after construction, share it with `Arc`.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    id: String,
    mat: Matrix2D,
    metadata: Metadata,
}

impl ImageBuffer {
    pub fn new(id: &str, width: usize, height: usize, pixels: Vec<f64>, metadata: Metadata) -> Result<Self, MyError> {
        if width == 0 || height == 0 {
            return Err(MyError::decode(format!("dimensions must be positive, got {}x{}", height, width)));
        }
        if pixels.len() != width * height {
            return Err(MyError::decode(format!(
                "{}x{} image needs {} samples, got {}", height, width, width * height, pixels.len())));
        }
        if let Some(ind) = pixels.iter().position(|v| !v.is_finite()) {
            return Err(MyError::decode(format!("sample {} is not a finite number", ind)));
        }

        Ok(ImageBuffer { id: id.to_string(), mat: Matrix2D::from_pixels(width, height, pixels), metadata })
    }

    pub fn from_matrix(id: &str, mat: Matrix2D, metadata: Metadata) -> Result<Self, MyError> {
        let (w, h) = (mat.w(), mat.h());
        Self::new(id, w, h, mat.pixels().to_vec(), metadata)
    }

    pub fn id(&self) -> &str { &self.id }
    pub fn w(&self) -> usize { self.mat.w() }
    pub fn h(&self) -> usize { self.mat.h() }
    pub fn matrix(&self) -> &Matrix2D { &self.mat }
    pub fn metadata(&self) -> &Metadata { &self.metadata }

    pub fn get_description(&self) -> String {
        format!("Image '{}' {} (rows) x {} (cols)", self.id, self.h(), self.w())
    }

    fn metadata_f64(&self, key: &str) -> Option<f64> {
        self.metadata.get(key)?.trim().parse::<f64>().ok()
    }

    /// Display aspect ratio from the field of view and matrix size
    /// (`lpe`, `lro`, `nv`, `np`). `None` when a key is missing or degenerate.
    pub fn aspect_ratio(&self) -> Option<f64> {
        let lpe = self.metadata_f64("lpe")?;
        let lro = self.metadata_f64("lro")?;
        let nv = self.metadata_f64("nv")?;
        let np = self.metadata_f64("np")?;

        let ratio = (lpe / lro) * (2_f64 * nv / np);
        if ratio.is_finite() && ratio > 0_f64 {
            Some(ratio)
        } else {
            None
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_size() {
        let res = ImageBuffer::new("a", 0, 3, vec![], Metadata::new());
        assert!(matches!(res, Err(MyError::Decode { .. })));
    }

    #[test]
    fn rejects_size_mismatch() {
        let res = ImageBuffer::new("a", 2, 2, vec![0.0; 3], Metadata::new());
        assert!(matches!(res, Err(MyError::Decode { .. })));
    }

    #[test]
    fn rejects_nan() {
        let res = ImageBuffer::new("a", 2, 1, vec![0.0, f64::NAN], Metadata::new());
        assert!(matches!(res, Err(MyError::Decode { .. })));
    }

    #[test]
    fn keeps_grid_and_metadata() {
        let mut metadata = Metadata::new();
        metadata.insert("seqfil".to_string(), "gems".to_string());
        let img = ImageBuffer::new("scan", 3, 2, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], metadata).unwrap();
        assert_eq!(img.w(), 3);
        assert_eq!(img.h(), 2);
        assert_eq!(img.matrix().row(1), &[4.0, 5.0, 6.0]);
        assert_eq!(img.metadata().get("seqfil").map(String::as_str), Some("gems"));
    }

    #[test]
    fn aspect_ratio_from_procpar() {
        let mut metadata = Metadata::new();
        metadata.insert("lpe".to_string(), "4.0".to_string());
        metadata.insert("lro".to_string(), "8.0".to_string());
        metadata.insert("nv".to_string(), "128".to_string());
        metadata.insert("np".to_string(), "256".to_string());
        let img = ImageBuffer::new("scan", 1, 1, vec![0.0], metadata).unwrap();
        assert_eq!(img.aspect_ratio(), Some(0.5));

        let bare = ImageBuffer::new("scan", 1, 1, vec![0.0], Metadata::new()).unwrap();
        assert_eq!(bare.aspect_ratio(), None);
    }
}
