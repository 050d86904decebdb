use crate::workflow::config::SimulationConfig;
use anyhow::Context;
use log::debug;
use ndarray::Array1;
use tumorcore::model::milestones::{self, CapacityTarget, InflectionPoint};
use tumorcore::model::{analytic, rate};
use tumorcore::ode::{self, IntegrationReport, IntegratorOptions};
use tumorcore::{ModelParameters, TimeSeries};

/// Growth-rate sweep rendered in the exploratory figure.
pub const RATE_SWEEP: [f64; 4] = [0.2, 0.5, 0.8, 1.2];
/// Initial-size sweep rendered in the exploratory figure.
pub const INITIAL_SIZE_SWEEP: [f64; 4] = [0.5, 1.0, 5.0, 20.0];
/// Capacity fraction reported as the "nearly grown" milestone.
pub const TARGET_FRACTION: f64 = 0.95;
/// Interval between growth-table rows (days).
const TABLE_STRIDE: f64 = 5.0;

/// One row of the growth-rate table.
pub struct GrowthSample {
    pub day: f64,
    pub size: f64,
    pub rate: f64,
    pub capacity_fraction: f64,
}

/// Analytic curve for one swept parameter value.
pub struct SweepCurve {
    pub swept_value: f64,
    pub values: Array1<f64>,
}

/// Treatment scenario outcome, including the counterfactual comparison.
pub struct TreatmentOutcome {
    pub series: TimeSeries,
    pub switch_day: f64,
    pub size_at_switch: f64,
    pub untreated_final: f64,
    pub treated_final: f64,
    pub reduction_percent: f64,
}

/// Cross-check of the growth-rate field against a central-difference
/// derivative of the analytic solution.
pub struct ValidationCheck {
    pub day: f64,
    pub size: f64,
    pub analytic_rate: f64,
    pub numeric_rate: f64,
    pub error: f64,
}

/// Everything one run computes. Numbers only; formatting belongs to the
/// report and plot modules.
pub struct AnalysisResult {
    pub times: Array1<f64>,
    pub analytic: Array1<f64>,
    pub numeric: TimeSeries,
    pub integration: IntegrationReport,
    pub max_divergence: f64,
    pub growth_table: Vec<GrowthSample>,
    pub inflection: InflectionPoint,
    pub peak_rate: f64,
    pub capacity_target: CapacityTarget,
    pub rate_sweep: Vec<SweepCurve>,
    pub size_sweep: Vec<SweepCurve>,
    pub treatment: TreatmentOutcome,
    pub validation: ValidationCheck,
}

#[derive(Clone)]
pub struct Runner {
    config: SimulationConfig,
}

impl Runner {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> anyhow::Result<AnalysisResult> {
        let params = self
            .config
            .to_parameters()
            .context("validating model parameters")?;
        let times = self.config.time_grid();

        let analytic_values = analytic::solve_many(&times, &params);
        let options = IntegratorOptions {
            rel_tol: self.config.tolerance,
            ..Default::default()
        };
        let output = ode::integrate(&params, (0.0, self.config.days), &times, &options)
            .context("integrating the growth equation")?;
        let max_divergence = analytic_values
            .iter()
            .zip(output.series.values.iter())
            .map(|(a, n)| (a - n).abs())
            .fold(0.0_f64, f64::max);
        debug!(
            "numeric vs analytic max divergence {max_divergence:.3e} over {} points",
            times.len()
        );

        let growth_table = self.growth_table(&params);
        let inflection =
            milestones::half_capacity_time(&params).context("locating the inflection point")?;
        let peak_rate = rate::peak_growth_rate(&params);
        let capacity_target = milestones::time_to_fraction(&params, TARGET_FRACTION)
            .context("inverting for the capacity target")?;

        let mut rate_sweep = Vec::with_capacity(RATE_SWEEP.len());
        for &swept in &RATE_SWEEP {
            let swept_params =
                ModelParameters::new(self.config.initial_size, swept, self.config.capacity)
                    .context("building rate-sweep parameters")?;
            rate_sweep.push(SweepCurve {
                swept_value: swept,
                values: analytic::solve_many(&times, &swept_params),
            });
        }
        let mut size_sweep = Vec::with_capacity(INITIAL_SIZE_SWEEP.len());
        for &swept in &INITIAL_SIZE_SWEEP {
            let swept_params =
                ModelParameters::new(swept, self.config.growth_rate, self.config.capacity)
                    .context("building size-sweep parameters")?;
            size_sweep.push(SweepCurve {
                swept_value: swept,
                values: analytic::solve_many(&times, &swept_params),
            });
        }

        let treatment = self.treatment_outcome(&times)?;
        let validation = self.validation_check(&params);

        Ok(AnalysisResult {
            times,
            analytic: analytic_values,
            numeric: output.series,
            integration: output.report,
            max_divergence,
            growth_table,
            inflection,
            peak_rate,
            capacity_target,
            rate_sweep,
            size_sweep,
            treatment,
            validation,
        })
    }

    fn growth_table(&self, params: &ModelParameters) -> Vec<GrowthSample> {
        let mut rows = Vec::new();
        let mut day = 0.0;
        while day <= self.config.days + 1e-9 {
            let size = analytic::solve(day, params);
            rows.push(GrowthSample {
                day,
                size,
                rate: rate::growth_rate(size, params),
                capacity_fraction: size / params.capacity,
            });
            day += TABLE_STRIDE;
        }
        rows
    }

    fn treatment_outcome(&self, times: &Array1<f64>) -> anyhow::Result<TreatmentOutcome> {
        let scenario = self
            .config
            .to_treatment()
            .context("building the treatment scenario")?;
        let series = scenario
            .series(times)
            .context("evaluating the treatment scenario")?;
        let untreated = ModelParameters::new(
            self.config.initial_size,
            self.config.treatment.rate_before,
            self.config.capacity,
        )
        .context("building the counterfactual parameters")?;
        let untreated_final = analytic::solve(self.config.days, &untreated);
        let treated_final = scenario.value_at(self.config.days);
        Ok(TreatmentOutcome {
            series,
            switch_day: scenario.switch_day,
            size_at_switch: scenario.size_at_switch(),
            untreated_final,
            treated_final,
            reduction_percent: (untreated_final - treated_final) / untreated_final * 100.0,
        })
    }

    fn validation_check(&self, params: &ModelParameters) -> ValidationCheck {
        let day = self.config.days / 2.0;
        let h = 1e-5;
        let size = analytic::solve(day, params);
        let analytic_rate = rate::growth_rate(size, params);
        let numeric_rate =
            (analytic::solve(day + h, params) - analytic::solve(day - h, params)) / (2.0 * h);
        ValidationCheck {
            day,
            size,
            analytic_rate,
            numeric_rate,
            error: (analytic_rate - numeric_rate).abs(),
        }
    }
}
