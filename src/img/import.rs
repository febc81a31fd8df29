use std::path::Path;
use crate::{my_err::MyError, utils::{self, WordsIter}};
use super::{ImageBuffer, Metadata};


/// Seam for the vendor-format readers living outside this crate.
pub trait Importer {
    fn import(&self, path: &Path) -> Result<ImageBuffer, MyError>;
}

/// Plain text grid: one row per line, whitespace separated samples.
/// Header lines `# key: value` become metadata.
pub struct TextGridImporter;

impl Importer for TextGridImporter {
    fn import(&self, path: &Path) -> Result<ImageBuffer, MyError> {
        import_text_grid(path)
    }
}

pub fn import_text_grid(path: &Path) -> Result<ImageBuffer, MyError> {
    let text = std::fs::read_to_string(path)?;
    let id = path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());

    let img = parse_text_grid(&id, &text)?;
    log::info!("imported {} from '{}'", img.get_description(), path.display());
    Ok(img)
}

pub fn parse_text_grid(id: &str, text: &str) -> Result<ImageBuffer, MyError> {
    let mut metadata = Metadata::new();
    let mut pixels = Vec::<f64>::new();
    let mut width: Option<usize> = None;
    let mut height = 0_usize;

    for (line_num, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(header) = line.strip_prefix('#') {
            if let Some((key, value)) = utils::split_key_value(header) {
                metadata.insert(key.to_string(), value.to_string());
            }
            continue;
        }

        let words = WordsIter::new(line, "");
        let row_len = words.len();
        for word in words {
            let value = word.parse::<f64>().map_err(|_| MyError::decode(
                format!("line {}: '{}' is not a number", line_num + 1, word)))?;
            pixels.push(value);
        }

        match width {
            None => width = Some(row_len),
            Some(w) if w != row_len => {
                return Err(MyError::decode(format!(
                    "line {} has {} samples, expected {}", line_num + 1, row_len, w)));
            }
            Some(_) => {}
        }
        height += 1;
    }

    ImageBuffer::new(id, width.unwrap_or(0), height, pixels, metadata)
}

/// Ellipses on a constant background, for running without a scan at hand.
pub fn phantom(size: usize) -> Result<ImageBuffer, MyError> {
    // (centre row, centre col, half height, half width, intensity), in fractions of the size
    const ELLIPSES: [(f64, f64, f64, f64, f64); 4] = [
        (0.5, 0.5, 0.42, 0.34, 0.8),
        (0.5, 0.5, 0.38, 0.30, -0.3),
        (0.38, 0.40, 0.10, 0.06, 0.4),
        (0.62, 0.58, 0.06, 0.12, 0.6),
    ];
    const BACKGROUND: f64 = 0.05;

    let mut pixels = Vec::<f64>::with_capacity(size * size);
    for row in 0..size {
        let y = (row as f64 + 0.5) / size as f64;
        for col in 0..size {
            let x = (col as f64 + 0.5) / size as f64;
            let value = ELLIPSES.iter()
                .filter(|(cy, cx, ry, rx, _)| ((y - cy) / ry).powi(2) + ((x - cx) / rx).powi(2) <= 1.0)
                .map(|(.., intensity)| intensity)
                .sum::<f64>();
            pixels.push(BACKGROUND + value);
        }
    }

    let mut metadata = Metadata::new();
    metadata.insert("lpe".to_string(), "20.0".to_string());
    metadata.insert("lro".to_string(), "20.0".to_string());
    metadata.insert("nv".to_string(), size.to_string());
    metadata.insert("np".to_string(), (size * 2).to_string());

    ImageBuffer::new("phantom", size, size, pixels, metadata)
}
