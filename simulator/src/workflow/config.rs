use anyhow::Context;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tumorcore::scenario::TreatmentScenario;
use tumorcore::{ModelParameters, ModelResult};

/// Treatment block: the growth rate drops at a fixed day.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TreatmentConfig {
    pub switch_day: f64,
    pub rate_before: f64,
    pub rate_after: f64,
}

impl Default for TreatmentConfig {
    fn default() -> Self {
        Self {
            switch_day: 10.0,
            rate_before: 0.7,
            rate_after: 0.1,
        }
    }
}

/// Immutable configuration for one analysis run. Every computation receives
/// this (or values derived from it) explicitly; there is no process-wide
/// parameter state.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Initial tumor size P0 (mm^3).
    pub initial_size: f64,
    /// Growth rate r (1/day).
    pub growth_rate: f64,
    /// Carrying capacity K (mm^3).
    pub capacity: f64,
    /// Length of the simulated span (days, starting at zero).
    pub days: f64,
    /// Number of grid points across the span.
    pub samples: usize,
    /// Relative tolerance handed to the integrator.
    pub tolerance: f64,
    pub treatment: TreatmentConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            initial_size: 1.0,
            growth_rate: 0.5,
            capacity: 100.0,
            days: 20.0,
            samples: 200,
            tolerance: 1e-6,
            treatment: TreatmentConfig::default(),
        }
    }
}

impl SimulationConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading simulation config {}", path_ref.display()))?;
        let config: SimulationConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing simulation config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(initial_size: f64, growth_rate: f64, capacity: f64, days: f64) -> Self {
        Self {
            initial_size,
            growth_rate,
            capacity,
            days,
            ..Default::default()
        }
    }

    pub fn to_parameters(&self) -> ModelResult<ModelParameters> {
        ModelParameters::new(self.initial_size, self.growth_rate, self.capacity)
    }

    pub fn to_treatment(&self) -> ModelResult<TreatmentScenario> {
        TreatmentScenario::new(
            self.initial_size,
            self.treatment.rate_before,
            self.treatment.rate_after,
            self.capacity,
            self.treatment.switch_day,
        )
    }

    /// Evaluation grid across `[0, days]`.
    pub fn time_grid(&self) -> Array1<f64> {
        Array1::linspace(0.0, self.days, self.samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn config_from_args_produces_valid_parameters() {
        let cfg = SimulationConfig::from_args(1.0, 0.5, 100.0, 20.0);
        let params = cfg.to_parameters().unwrap();
        assert_eq!(params.capacity, 100.0);
        assert_eq!(cfg.time_grid().len(), 200);
    }

    #[test]
    fn config_load_reads_yaml_with_defaults() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"initial_size: 2.0\ncapacity: 80.0\ntreatment:\n  switch_day: 5.0\n")
            .unwrap();
        let path = temp.into_temp_path();
        let cfg = SimulationConfig::load(&path).unwrap();
        assert_eq!(cfg.initial_size, 2.0);
        assert_eq!(cfg.capacity, 80.0);
        assert_eq!(cfg.treatment.switch_day, 5.0);
        // Unspecified fields fall back to the defaults.
        assert_eq!(cfg.growth_rate, 0.5);
        assert_eq!(cfg.treatment.rate_after, 0.1);
    }

    #[test]
    fn treatment_scenario_mirrors_the_config_block() {
        let cfg = SimulationConfig::default();
        let scenario = cfg.to_treatment().unwrap();
        assert_eq!(scenario.switch_day, 10.0);
        assert_eq!(scenario.rate_before, 0.7);
    }
}
