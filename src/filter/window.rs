use std::f64::consts::PI;
use std::fmt;
use crate::my_err::MyError;
use super::{FilterKind, filter_option::{FilterParams, param_err}};


/// 1D tapering profile a mask is built from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Window {
    Barthann,
    Bartlett,
    Blackman,
    BlackmanHarris,
    Bohman,
    Boxcar,
    /// Sidelobe attenuation, dB.
    Chebwin(f64),
    Flattop,
    /// Standard deviation, samples.
    Gaussian(f64),
    Hamming,
    Hanning,
    /// Beta.
    Kaiser(f64),
    Nuttall,
    Parzen,
    Triang,
}

impl Default for Window {
    fn default() -> Self { Window::Hanning }
}

impl Window {
    pub const NAMES: [&'static str; 15] = [
        "barthann", "bartlett", "blackman", "blackmanharris", "bohman", "boxcar", "chebwin",
        "flattop", "gaussian", "hamming", "hanning", "kaiser", "nuttall", "parzen", "triang",
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Window::Barthann => "barthann",
            Window::Bartlett => "bartlett",
            Window::Blackman => "blackman",
            Window::BlackmanHarris => "blackmanharris",
            Window::Bohman => "bohman",
            Window::Boxcar => "boxcar",
            Window::Chebwin(_) => "chebwin",
            Window::Flattop => "flattop",
            Window::Gaussian(_) => "gaussian",
            Window::Hamming => "hamming",
            Window::Hanning => "hanning",
            Window::Kaiser(_) => "kaiser",
            Window::Nuttall => "nuttall",
            Window::Parzen => "parzen",
            Window::Triang => "triang",
        }
    }

    pub fn shape(&self) -> Option<f64> {
        match self {
            Window::Chebwin(v) | Window::Gaussian(v) | Window::Kaiser(v) => Some(*v),
            _ => None,
        }
    }

    /// Reads `window` and, for the parametrized profiles, `shape`.
    pub fn try_from_params(kind: FilterKind, params: &FilterParams) -> Result<Self, MyError> {
        let name = params.get("window").unwrap_or("hanning").trim().to_lowercase();
        let shape: Option<f64> = params.get_opt(kind, "shape")?;

        let need_shape = |what: &str| -> Result<f64, MyError> {
            shape.ok_or_else(|| param_err(kind, "shape", format!("window '{}' needs its {}", name, what)))
        };

        let window = match name.as_str() {
            "barthann" => Window::Barthann,
            "bartlett" => Window::Bartlett,
            "blackman" => Window::Blackman,
            "blackmanharris" => Window::BlackmanHarris,
            "bohman" => Window::Bohman,
            "boxcar" => Window::Boxcar,
            "chebwin" => Window::Chebwin(need_shape("attenuation")?),
            "flattop" => Window::Flattop,
            "gaussian" => {
                let std = need_shape("standard deviation")?;
                if std <= 0.0 {
                    return Err(param_err(kind, "shape", "standard deviation must be positive".to_string()));
                }
                Window::Gaussian(std)
            },
            "hamming" => Window::Hamming,
            "hanning" | "hann" => Window::Hanning,
            "kaiser" => Window::Kaiser(need_shape("beta")?),
            "nuttall" => Window::Nuttall,
            "parzen" => Window::Parzen,
            "triang" => Window::Triang,
            _ => {
                return Err(param_err(kind, "window", format!("unknown window '{}', expected one of {:?}", name, Self::NAMES)));
            }
        };

        Ok(window)
    }

    pub fn write_params(&self, params: &mut FilterParams) {
        params.insert("window", self.name());
        if let Some(shape) = self.shape() {
            params.insert("shape", shape);
        }
    }

    /// Periodic (DFT-even) samples: the symmetric window one sample longer, last one dropped.
    pub fn build(&self, len: usize) -> Vec<f64> {
        match len {
            0 => Vec::new(),
            1 => vec![1.0],
            _ => {
                let mut w = self.symmetric(len + 1);
                w.truncate(len);
                w
            }
        }
    }

    pub fn symmetric(&self, m: usize) -> Vec<f64> {
        if m == 0 {
            return Vec::new();
        }
        if m == 1 {
            return vec![1.0];
        }

        let last = (m - 1) as f64;

        match *self {
            Window::Boxcar => vec![1.0; m],
            Window::Triang => triang(m),
            Window::Bartlett => (0..m)
                .map(|n| 2.0 / last * (last / 2.0 - (n as f64 - last / 2.0).abs()))
                .collect(),
            Window::Hanning => general_cosine(m, &[0.5, 0.5]),
            Window::Hamming => general_cosine(m, &[0.54, 0.46]),
            Window::Blackman => general_cosine(m, &[0.42, 0.50, 0.08]),
            Window::BlackmanHarris => general_cosine(m, &[0.35875, 0.48829, 0.14128, 0.01168]),
            Window::Nuttall => general_cosine(m, &[0.3635819, 0.4891775, 0.1365995, 0.0106411]),
            Window::Flattop => general_cosine(m,
                &[0.21557895, 0.41663158, 0.277263158, 0.083578947, 0.006947368]),
            Window::Barthann => (0..m)
                .map(|n| {
                    let fac = (n as f64 / last - 0.5).abs();
                    0.62 - 0.48 * fac + 0.38 * (2.0 * PI * fac).cos()
                })
                .collect(),
            Window::Bohman => (0..m)
                .map(|n| {
                    if n == 0 || n == m - 1 {
                        return 0.0;
                    }
                    let fac = (-1.0 + 2.0 * n as f64 / last).abs();
                    (1.0 - fac) * (PI * fac).cos() + (PI * fac).sin() / PI
                })
                .collect(),
            Window::Parzen => (0..m)
                .map(|n| {
                    let x = (n as f64 - last / 2.0).abs();
                    let half = m as f64 / 2.0;
                    if x <= last / 4.0 {
                        1.0 - 6.0 * (x / half).powi(2) + 6.0 * (x / half).powi(3)
                    } else {
                        2.0 * (1.0 - x / half).powi(3)
                    }
                })
                .collect(),
            Window::Gaussian(std) => (0..m)
                .map(|n| {
                    let x = n as f64 - last / 2.0;
                    (-0.5 * (x / std).powi(2)).exp()
                })
                .collect(),
            Window::Kaiser(beta) => {
                let denom = bessel_i0(beta);
                (0..m)
                    .map(|n| {
                        let r = 2.0 * n as f64 / last - 1.0;
                        bessel_i0(beta * (1.0 - r * r).max(0.0).sqrt()) / denom
                    })
                    .collect()
            },
            Window::Chebwin(at) => chebwin(m, at),
        }
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.shape() {
            Some(shape) => write!(f, "{}({})", self.name(), shape),
            None => write!(f, "{}", self.name()),
        }
    }
}


fn general_cosine(m: usize, coeffs: &[f64]) -> Vec<f64> {
    let last = (m - 1) as f64;
    (0..m)
        .map(|n| {
            let fac = 2.0 * PI * n as f64 / last;
            coeffs.iter()
                .enumerate()
                .map(|(k, a)| {
                    let sign = if k % 2 == 0 { 1.0 } else { -1.0 };
                    sign * a * (k as f64 * fac).cos()
                })
                .sum::<f64>()
        })
        .collect()
}

fn triang(m: usize) -> Vec<f64> {
    let half = (m + 1) / 2;
    let mut w: Vec<f64> = (1..=half)
        .map(|n| {
            if m % 2 == 0 {
                (2 * n - 1) as f64 / m as f64
            } else {
                2.0 * n as f64 / (m + 1) as f64
            }
        })
        .collect();

    let mirrored: Vec<f64> = if m % 2 == 0 {
        w.iter().rev().copied().collect()
    } else {
        w.iter().rev().skip(1).copied().collect()
    };
    w.extend(mirrored);
    w
}

/// Modified Bessel function of the first kind, order 0, by its power series.
fn bessel_i0(x: f64) -> f64 {
    let quarter_sq = x * x / 4.0;
    let mut term = 1.0;
    let mut sum = 1.0;
    let mut k = 1.0;
    while term > sum * 1e-17 {
        term *= quarter_sq / (k * k);
        sum += term;
        k += 1.0;
    }
    sum
}

/// Dolph-Chebyshev window through the inverse transform of its frequency response.
fn chebwin(m: usize, at: f64) -> Vec<f64> {
    let order = (m - 1) as f64;
    let beta = ((10_f64.powf(at.abs() / 20.0)).acosh() / order).cosh();

    let p: Vec<f64> = (0..m)
        .map(|k| {
            let x = beta * (PI * k as f64 / m as f64).cos();
            if x > 1.0 {
                (order * x.acosh()).cosh()
            } else if x < -1.0 {
                let sign = if m % 2 == 1 { 1.0 } else { -1.0 };
                sign * (order * (-x).acosh()).cosh()
            } else {
                (order * x.acos()).cos()
            }
        })
        .collect();

    // real part of the DFT of p; for even lengths p is pre-shifted by half a sample
    let dft_re = |j: usize| -> f64 {
        p.iter()
            .enumerate()
            .map(|(k, pk)| {
                let phase = if m % 2 == 1 {
                    2.0 * PI * (j * k) as f64 / m as f64
                } else {
                    PI * k as f64 * (2.0 * j as f64 - 1.0) / m as f64
                };
                pk * phase.cos()
            })
            .sum()
    };

    let mut w = Vec::<f64>::with_capacity(m);
    if m % 2 == 1 {
        let n = (m + 1) / 2;
        let half: Vec<f64> = (0..n).map(dft_re).collect();
        w.extend(half[1..].iter().rev());
        w.extend(half.iter());
    } else {
        let n = m / 2 + 1;
        let half: Vec<f64> = (0..n).map(dft_re).collect();
        w.extend(half[1..].iter().rev());
        w.extend(half[1..].iter());
    }

    let max = w.iter().cloned().fold(f64::MIN, f64::max);
    w.iter().map(|v| v / max).collect()
}


#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: &[f64], b: &[f64]) {
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < 1e-6, "{:?} != {:?}", a, b);
        }
    }

    #[test]
    fn hanning_symmetric_and_periodic() {
        assert_close(&Window::Hanning.symmetric(5), &[0.0, 0.5, 1.0, 0.5, 0.0]);
        assert_close(&Window::Hanning.build(4), &[0.0, 0.5, 1.0, 0.5]);
    }

    #[test]
    fn triang_odd_and_even() {
        assert_close(&Window::Triang.symmetric(3), &[0.5, 1.0, 0.5]);
        assert_close(&Window::Triang.symmetric(4), &[0.25, 0.75, 0.75, 0.25]);
    }

    #[test]
    fn every_window_is_symmetric_and_peaks_at_one() {
        let windows = [
            Window::Barthann, Window::Bartlett, Window::Blackman, Window::BlackmanHarris,
            Window::Bohman, Window::Boxcar, Window::Chebwin(60.0), Window::Flattop,
            Window::Gaussian(2.0), Window::Hamming, Window::Hanning, Window::Kaiser(8.6),
            Window::Nuttall, Window::Parzen, Window::Triang,
        ];
        for window in windows.iter() {
            for m in [7_usize, 8].iter() {
                let w = window.symmetric(*m);
                assert_eq!(w.len(), *m);
                for i in 0..*m {
                    assert!((w[i] - w[m - 1 - i]).abs() < 1e-9, "{} not symmetric", window);
                }
            }
            let max = window.symmetric(7).iter().cloned().fold(f64::MIN, f64::max);
            assert!((max - 1.0).abs() < 1e-6, "{} peaks at {}", window, max);
        }
    }

    #[test]
    fn bessel_i0_known_values() {
        assert!((bessel_i0(0.0) - 1.0).abs() < 1e-12);
        assert!((bessel_i0(1.0) - 1.2660658777520082).abs() < 1e-12);
    }

    #[test]
    fn shape_is_required_for_parametrized_windows() {
        let params = FilterParams::new().with("window", "kaiser");
        assert!(Window::try_from_params(FilterKind::LowPass, &params).is_err());

        let params = params.with("shape", 8.6);
        assert_eq!(Window::try_from_params(FilterKind::LowPass, &params).unwrap(), Window::Kaiser(8.6));
    }

    #[test]
    fn unknown_window_is_rejected() {
        let params = FilterParams::new().with("window", "slepian");
        match Window::try_from_params(FilterKind::LowPass, &params) {
            Err(MyError::InvalidFilterParam { param, .. }) => assert_eq!(param, "window"),
            other => panic!("unexpected {:?}", other),
        }
    }
}
