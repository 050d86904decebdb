use crate::model::analytic;
use crate::prelude::{ModelError, ModelParameters, ModelResult, TimeSeries};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Two logistic regimes joined at a treatment day.
///
/// Growth proceeds at `rate_before` until `switch_day`; from there the curve
/// restarts from the size reached at the switch, with `rate_after` and a
/// shifted time origin. The composition is continuous at the switch by
/// construction but generally has a kinked derivative.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TreatmentScenario {
    pub initial_size: f64,
    pub rate_before: f64,
    pub rate_after: f64,
    pub capacity: f64,
    pub switch_day: f64,
}

impl TreatmentScenario {
    pub fn new(
        initial_size: f64,
        rate_before: f64,
        rate_after: f64,
        capacity: f64,
        switch_day: f64,
    ) -> ModelResult<Self> {
        ModelParameters::new(initial_size, rate_before, capacity)?;
        ModelParameters::new(initial_size, rate_after, capacity)?;
        if !switch_day.is_finite() {
            return Err(ModelError::Domain(format!(
                "switch day must be finite, got {switch_day}"
            )));
        }
        Ok(Self {
            initial_size,
            rate_before,
            rate_after,
            capacity,
            switch_day,
        })
    }

    fn before_regime(&self) -> ModelParameters {
        ModelParameters {
            initial_size: self.initial_size,
            growth_rate: self.rate_before,
            capacity: self.capacity,
        }
    }

    fn after_regime(&self) -> ModelParameters {
        ModelParameters {
            initial_size: self.size_at_switch(),
            growth_rate: self.rate_after,
            capacity: self.capacity,
        }
    }

    /// Size reached when treatment starts; seeds the after regime.
    pub fn size_at_switch(&self) -> f64 {
        analytic::solve(self.switch_day, &self.before_regime())
    }

    /// Piecewise value: before regime up to the switch, reseeded after it.
    pub fn value_at(&self, t: f64) -> f64 {
        if t <= self.switch_day {
            analytic::solve(t, &self.before_regime())
        } else {
            analytic::solve(t - self.switch_day, &self.after_regime())
        }
    }

    /// Evaluate the scenario over a whole grid.
    pub fn series(&self, times: &Array1<f64>) -> ModelResult<TimeSeries> {
        let values = times.mapv(|t| self.value_at(t));
        TimeSeries::new(times.clone(), values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> TreatmentScenario {
        TreatmentScenario::new(1.0, 0.7, 0.1, 100.0, 10.0).unwrap()
    }

    #[test]
    fn curve_is_continuous_at_the_switch() {
        let scenario = reference();
        // The before branch at the switch is exactly the after-regime seed.
        assert_eq!(scenario.value_at(scenario.switch_day), scenario.size_at_switch());
    }

    #[test]
    fn before_branch_matches_the_untreated_curve() {
        let scenario = reference();
        let untreated = ModelParameters::new(1.0, 0.7, 100.0).unwrap();
        for t in [0.0, 2.5, 7.0, 10.0] {
            assert_eq!(scenario.value_at(t), analytic::solve(t, &untreated));
        }
    }

    #[test]
    fn treatment_slows_growth_after_the_switch() {
        let scenario = reference();
        let untreated = ModelParameters::new(1.0, 0.7, 100.0).unwrap();
        assert!(scenario.value_at(20.0) < analytic::solve(20.0, &untreated));
    }

    #[test]
    fn series_carries_the_kinked_trajectory() {
        let scenario = reference();
        let grid = Array1::linspace(0.0, 20.0, 41);
        let series = scenario.series(&grid).unwrap();
        assert_eq!(series.len(), 41);
        for (t, value) in series.pairs() {
            assert_eq!(value, scenario.value_at(t));
        }
    }

    #[test]
    fn non_finite_switch_day_is_rejected() {
        assert!(matches!(
            TreatmentScenario::new(1.0, 0.7, 0.1, 100.0, f64::NAN),
            Err(ModelError::Domain(_))
        ));
    }
}
