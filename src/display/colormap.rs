use std::fmt;
use crate::{img::PIXEL_VALUES_COUNT, my_err::MyError, utils::{LinesIter, WordsIter}};


#[derive(RustEmbed)]
#[folder = "colormaps/"]
struct Asset;


#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Colormap {
    Gray,
    Bone,
    Hot,
    Jet,
    GistRainbow,
    Viridis,
}

impl Default for Colormap {
    fn default() -> Self { Colormap::Gray }
}

impl Colormap {
    pub const ALL: [Colormap; 6] = [
        Colormap::Gray,
        Colormap::Bone,
        Colormap::Hot,
        Colormap::Jet,
        Colormap::GistRainbow,
        Colormap::Viridis,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Colormap::Gray => "gray",
            Colormap::Bone => "bone",
            Colormap::Hot => "hot",
            Colormap::Jet => "jet",
            Colormap::GistRainbow => "gist_rainbow",
            Colormap::Viridis => "viridis",
        }
    }

    pub fn try_from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase();
        if name == "grey" {
            return Some(Colormap::Gray);
        }
        Colormap::ALL.iter().find(|c| c.name() == name).copied()
    }

    fn asset_path(&self) -> String {
        format!("{}.cmap", self.name())
    }
}

impl fmt::Display for Colormap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}


/// Colour of each of the 256 normalized intensity levels.
#[derive(Clone, PartialEq)]
pub struct ColorLut {
    colors: Vec<[u8; 3]>,
}

impl ColorLut {
    /// `points` are `(position, [r, g, b])` with components in `0..=1`, sorted by position from 0 to 1.
    pub fn from_control_points(points: &[(f64, [f64; 3])]) -> Result<Self, String> {
        if points.len() < 2 {
            return Err("need at least 2 control points".to_string());
        }
        if points[0].0 != 0.0 || points[points.len() - 1].0 != 1.0 {
            return Err("control points must start at 0 and end at 1".to_string());
        }
        for pair in points.windows(2) {
            if pair[1].0 < pair[0].0 {
                return Err(format!("control point {} goes after {}", pair[1].0, pair[0].0));
            }
        }
        for (pos, rgb) in points.iter() {
            if rgb.iter().any(|c| !(0.0..=1.0).contains(c)) {
                return Err(format!("colour at {} is out of 0..1", pos));
            }
        }

        let mut colors = Vec::<[u8; 3]>::with_capacity(PIXEL_VALUES_COUNT);
        let mut seg = 0_usize;
        for level in 0..PIXEL_VALUES_COUNT {
            let t = level as f64 / (PIXEL_VALUES_COUNT - 1) as f64;
            while seg + 2 < points.len() && t > points[seg + 1].0 {
                seg += 1;
            }

            let (p0, c0) = points[seg];
            let (p1, c1) = points[seg + 1];
            let frac = if p1 > p0 { ((t - p0) / (p1 - p0)).max(0.0).min(1.0) } else { 1.0 };

            let mut color = [0_u8; 3];
            for ch in 0..3 {
                let v = c0[ch] + (c1[ch] - c0[ch]) * frac;
                color[ch] = (v * 255.0).round() as u8;
            }
            colors.push(color);
        }

        Ok(ColorLut { colors })
    }

    pub fn color(&self, level: u8) -> [u8; 3] {
        self.colors[level as usize]
    }
}

impl fmt::Debug for ColorLut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ColorLut({:?} .. {:?})", self.colors[0], self.colors[PIXEL_VALUES_COUNT - 1])
    }
}


/// Lookup tables of every [`Colormap`], read once from the embedded assets.
#[derive(Debug, Clone)]
pub struct ColormapRegistry {
    luts: Vec<(Colormap, ColorLut)>,
}

impl ColormapRegistry {
    pub fn load_embedded() -> Result<Self, MyError> {
        let mut luts = Vec::with_capacity(Colormap::ALL.len());

        for colormap in Colormap::ALL.iter() {
            let path = colormap.asset_path();
            let bytes = Asset::get(&path)
                .ok_or_else(|| MyError::Asset { msg: format!("'{}' is not embedded", path) })?;
            let text = String::from_utf8(bytes.to_vec())
                .map_err(|err| MyError::Asset { msg: format!("'{}': {}", path, err) })?;

            let lut = parse_control_points(&text)
                .and_then(|points| ColorLut::from_control_points(&points))
                .map_err(|msg| MyError::Asset { msg: format!("'{}': {}", path, msg) })?;

            luts.push((*colormap, lut));
        }

        log::debug!("loaded {} colormaps", luts.len());

        Ok(ColormapRegistry { luts })
    }

    pub fn lut(&self, colormap: Colormap) -> &ColorLut {
        self.luts.iter()
            .find(|(c, _)| *c == colormap)
            .map(|(_, lut)| lut)
            .unwrap_or_else(|| unreachable!("every colormap is loaded"))
    }
}

/// Lines of `position r g b`.
fn parse_control_points(text: &str) -> Result<Vec<(f64, [f64; 3])>, String> {
    let mut points = Vec::new();

    for line in LinesIter::new(text) {
        let mut words = WordsIter::new(line, "");
        if words.len() != 4 {
            return Err(format!("expected 'position r g b', got '{}'", line));
        }

        let mut values = [0_f64; 4];
        for v in values.iter_mut() {
            let word = words.next_or_empty();
            *v = word.parse::<f64>().map_err(|_| format!("'{}' is not a number", word))?;
        }

        points.push((values[0], [values[1], values[2], values[3]]));
    }

    Ok(points)
}
