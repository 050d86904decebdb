use crate::workflow::config::SimulationConfig;
use crate::workflow::runner::AnalysisResult;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tumorcore::model::milestones::{CapacityTarget, InflectionPoint};
use tumorcore::ode::IntegrationReport;

/// Serialisable mirror of one run, written as JSON next to the figure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryModel {
    pub initial_size: f64,
    pub growth_rate: f64,
    pub capacity: f64,
    pub days: f64,
    pub max_divergence: f64,
    pub inflection: InflectionPoint,
    pub peak_rate: f64,
    pub capacity_target: CapacityTarget,
    pub untreated_final: f64,
    pub treated_final: f64,
    pub reduction_percent: f64,
    pub validation_error: f64,
    pub integration: IntegrationReport,
}

impl SummaryModel {
    pub fn from_result(config: &SimulationConfig, result: &AnalysisResult) -> Self {
        Self {
            initial_size: config.initial_size,
            growth_rate: config.growth_rate,
            capacity: config.capacity,
            days: config.days,
            max_divergence: result.max_divergence,
            inflection: result.inflection,
            peak_rate: result.peak_rate,
            capacity_target: result.capacity_target,
            untreated_final: result.treatment.untreated_final,
            treated_final: result.treatment.treated_final,
            reduction_percent: result.treatment.reduction_percent,
            validation_error: result.validation.error,
            integration: result.integration,
        }
    }

    pub fn write<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path_ref = path.as_ref();
        if let Some(parent) = path_ref.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating summary directory {}", parent.display()))?;
            }
        }
        let json = serde_json::to_string_pretty(self).context("serialising run summary")?;
        fs::write(path_ref, json)
            .with_context(|| format!("writing run summary {}", path_ref.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::runner::Runner;

    #[test]
    fn summary_round_trips_through_json() {
        let config = SimulationConfig::default();
        let result = Runner::new(config.clone()).execute().unwrap();
        let summary = SummaryModel::from_result(&config, &result);

        let json = serde_json::to_string(&summary).unwrap();
        let back: SummaryModel = serde_json::from_str(&json).unwrap();
        assert_eq!(back.capacity, 100.0);
        assert_eq!(back.inflection, summary.inflection);
    }

    #[test]
    fn summary_writes_to_a_nested_path() {
        let config = SimulationConfig::default();
        let result = Runner::new(config.clone()).execute().unwrap();
        let summary = SummaryModel::from_result(&config, &result);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports/run.json");
        summary.write(&path).unwrap();
        assert!(path.exists());
    }
}
