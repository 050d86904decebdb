use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Immutable parameter set for a single logistic growth regime.
///
/// `new` enforces the model invariants (`initial_size > 0`, `capacity > 0`,
/// all fields finite); nothing forces `initial_size < capacity`, so decay
/// toward the capacity from above is a valid regime.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ModelParameters {
    /// Initial tumor size P0 (mm^3).
    pub initial_size: f64,
    /// Intrinsic growth rate r (1/day).
    pub growth_rate: f64,
    /// Carrying capacity K (mm^3).
    pub capacity: f64,
}

impl ModelParameters {
    pub fn new(initial_size: f64, growth_rate: f64, capacity: f64) -> ModelResult<Self> {
        if !initial_size.is_finite() || initial_size <= 0.0 {
            return Err(ModelError::Domain(format!(
                "initial size must be finite and positive, got {initial_size}"
            )));
        }
        if !capacity.is_finite() || capacity <= 0.0 {
            return Err(ModelError::Domain(format!(
                "carrying capacity must be finite and positive, got {capacity}"
            )));
        }
        if !growth_rate.is_finite() {
            return Err(ModelError::Domain(format!(
                "growth rate must be finite, got {growth_rate}"
            )));
        }
        Ok(Self {
            initial_size,
            growth_rate,
            capacity,
        })
    }
}

/// Sampled trajectory: paired time and size arrays of equal length with
/// non-decreasing times.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSeries {
    pub times: Array1<f64>,
    pub values: Array1<f64>,
}

impl TimeSeries {
    pub fn new(times: Array1<f64>, values: Array1<f64>) -> ModelResult<Self> {
        if times.len() != values.len() {
            return Err(ModelError::Domain(format!(
                "series length mismatch: {} times vs {} values",
                times.len(),
                values.len()
            )));
        }
        if times.iter().any(|t| !t.is_finite()) {
            return Err(ModelError::Domain(
                "series times must be finite".to_string(),
            ));
        }
        if times.iter().zip(times.iter().skip(1)).any(|(a, b)| b < a) {
            return Err(ModelError::Domain(
                "series times must be non-decreasing".to_string(),
            ));
        }
        Ok(Self { times, values })
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Iterate over `(time, value)` pairs.
    pub fn pairs(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.times
            .iter()
            .zip(self.values.iter())
            .map(|(&t, &v)| (t, v))
    }
}

/// Common error type for model evaluation.
#[derive(thiserror::Error, Debug)]
pub enum ModelError {
    #[error("invalid parameter: {0}")]
    Domain(String),
    #[error("integration failed: {0}")]
    Integration(String),
}

pub type ModelResult<T> = Result<T, ModelError>;
