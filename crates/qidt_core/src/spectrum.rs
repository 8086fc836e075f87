//! IR spectrum smoothing.
//!
//! # Responsibility
//! - Read discrete `(wavenumber, intensity)` peaks from a headerless
//!   two-column CSV.
//! - Broaden the peaks into a continuous curve by Gaussian summation.
//! - Export the sampled curve as CSV.
//!
//! # Invariants
//! - The sample grid is fixed: `SAMPLE_COUNT` points from `WAVENUMBER_MIN`
//!   to `WAVENUMBER_MAX`, both ends included.
//! - Identical peaks and width always give identical output.
//! - Malformed input aborts the whole computation; no partial curve exists.

use csv::{ReaderBuilder, Trim, WriterBuilder};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const WAVENUMBER_MIN: f64 = 400.0;
pub const WAVENUMBER_MAX: f64 = 4000.0;
pub const SAMPLE_COUNT: usize = 5000;

/// Default Gaussian width σ in cm⁻¹, and the range offered to users.
pub const DEFAULT_SIGMA: f64 = 10.0;
pub const SIGMA_RANGE: (f64, f64) = (1.0, 50.0);

pub const EXPORT_HEADER: [&str; 2] = ["Wavenumber (cm⁻¹)", "Intensity (a.u.)"];

#[derive(Debug, Clone, PartialEq)]
pub enum SpectrumError {
    /// Input is not a two-column numeric table. `line` is 1-based when known.
    DataFormat { line: Option<u64>, message: String },
    /// σ is zero, negative or not finite.
    InvalidWidth(f64),
    Export(String),
}

impl Display for SpectrumError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DataFormat {
                line: Some(line),
                message,
            } => write!(f, "invalid spectrum data at line {line}: {message}"),
            Self::DataFormat { line: None, message } => {
                write!(f, "invalid spectrum data: {message}")
            }
            Self::InvalidWidth(sigma) => {
                write!(f, "smoothing width must be a positive number, got {sigma}")
            }
            Self::Export(message) => write!(f, "spectrum export failed: {message}"),
        }
    }
}

impl Error for SpectrumError {}

/// One discrete absorption line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    pub wavenumber: f64,
    pub intensity: f64,
}

/// Sampled, smoothed spectrum. `x` and `y` have equal length.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumCurve {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl SpectrumCurve {
    /// Two-column CSV with [`EXPORT_HEADER`].
    pub fn to_csv(&self) -> Result<Vec<u8>, SpectrumError> {
        let mut writer = WriterBuilder::new().from_writer(Vec::new());
        writer
            .write_record(EXPORT_HEADER)
            .map_err(|err| SpectrumError::Export(err.to_string()))?;
        for (x, y) in self.x.iter().zip(&self.y) {
            writer
                .write_record([x.to_string(), y.to_string()])
                .map_err(|err| SpectrumError::Export(err.to_string()))?;
        }
        writer
            .into_inner()
            .map_err(|err| SpectrumError::Export(err.to_string()))
    }

    /// Index of the sample closest to `wavenumber`.
    pub fn nearest_index(&self, wavenumber: f64) -> Option<usize> {
        self.x
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                (*a - wavenumber)
                    .abs()
                    .total_cmp(&(*b - wavenumber).abs())
            })
            .map(|(index, _)| index)
    }
}

/// Parses headerless `wavenumber,intensity` rows. Blank lines are ignored.
pub fn parse_peaks_csv(data: &[u8]) -> Result<Vec<Peak>, SpectrumError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(data);

    let mut peaks = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|err| SpectrumError::DataFormat {
            line: err.position().map(|pos| pos.line()),
            message: err.to_string(),
        })?;
        let line = record.position().map(|pos| pos.line());
        if record.len() != 2 {
            return Err(SpectrumError::DataFormat {
                line,
                message: format!("expected 2 columns, found {}", record.len()),
            });
        }
        peaks.push(Peak {
            wavenumber: parse_number(&record[0], line)?,
            intensity: parse_number(&record[1], line)?,
        });
    }

    if peaks.is_empty() {
        return Err(SpectrumError::DataFormat {
            line: None,
            message: "no peaks found".to_string(),
        });
    }
    Ok(peaks)
}

fn parse_number(field: &str, line: Option<u64>) -> Result<f64, SpectrumError> {
    match field.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(SpectrumError::DataFormat {
            line,
            message: format!("`{field}` is not a finite number"),
        }),
    }
}

/// `SAMPLE_COUNT` evenly spaced wavenumbers over the fixed domain.
pub fn sample_grid() -> Vec<f64> {
    let step = (WAVENUMBER_MAX - WAVENUMBER_MIN) / (SAMPLE_COUNT - 1) as f64;
    let mut grid: Vec<f64> = (0..SAMPLE_COUNT)
        .map(|index| WAVENUMBER_MIN + step * index as f64)
        .collect();
    if let Some(last) = grid.last_mut() {
        *last = WAVENUMBER_MAX;
    }
    grid
}

/// Sums one Gaussian per peak, `intensity * exp(-(x - wavenumber)² / 2σ²)`,
/// over the sample grid.
pub fn smooth(peaks: &[Peak], sigma: f64) -> Result<SpectrumCurve, SpectrumError> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(SpectrumError::InvalidWidth(sigma));
    }

    let x = sample_grid();
    let two_sigma_sq = 2.0 * sigma * sigma;
    let y: Vec<f64> = x
        .iter()
        .map(|&wavenumber| {
            peaks
                .iter()
                .map(|peak| {
                    let delta = wavenumber - peak.wavenumber;
                    peak.intensity * (-(delta * delta) / two_sigma_sq).exp()
                })
                .sum::<f64>()
        })
        .collect();
    Ok(SpectrumCurve { x, y })
}

/// Parses `data` and smooths it in one step.
pub fn smooth_csv(data: &[u8], sigma: f64) -> Result<SpectrumCurve, SpectrumError> {
    let peaks = parse_peaks_csv(data)?;
    smooth(&peaks, sigma)
}
