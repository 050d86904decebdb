//! Adaptive Dormand-Prince 5(4) integration of the logistic ODE.
//!
//! The stepper clamps each step so it lands exactly on every requested
//! evaluation time; the returned series therefore carries genuine solver
//! values at those points, which is what the analytic cross-check measures.

use crate::model::rate;
use crate::prelude::{ModelError, ModelParameters, ModelResult, TimeSeries};
use crate::telemetry::LogManager;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Tuning knobs for the adaptive integrator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IntegratorOptions {
    pub rel_tol: f64,
    pub abs_tol: f64,
    pub max_steps: usize,
}

impl Default for IntegratorOptions {
    fn default() -> Self {
        Self {
            rel_tol: 1e-6,
            abs_tol: 1e-9,
            max_steps: 100_000,
        }
    }
}

/// Step diagnostics from one integration run.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct IntegrationReport {
    pub accepted_steps: usize,
    pub rejected_steps: usize,
}

/// Output of an integration run: the sampled series plus its diagnostics.
#[derive(Debug, Clone)]
pub struct IntegrationOutput {
    pub series: TimeSeries,
    pub report: IntegrationReport,
}

// Dormand-Prince 5(4) tableau.
const A2: [f64; 1] = [1.0 / 5.0];
const A3: [f64; 2] = [3.0 / 40.0, 9.0 / 40.0];
const A4: [f64; 3] = [44.0 / 45.0, -56.0 / 15.0, 32.0 / 9.0];
const A5: [f64; 4] = [
    19372.0 / 6561.0,
    -25360.0 / 2187.0,
    64448.0 / 6561.0,
    -212.0 / 729.0,
];
const A6: [f64; 5] = [
    9017.0 / 3168.0,
    -355.0 / 33.0,
    46732.0 / 5247.0,
    49.0 / 176.0,
    -5103.0 / 18656.0,
];
// Fifth-order weights (also the seventh stage position).
const B5: [f64; 6] = [
    35.0 / 384.0,
    0.0,
    500.0 / 1113.0,
    125.0 / 192.0,
    -2187.0 / 6784.0,
    11.0 / 84.0,
];
// Embedded fourth-order weights used for the error estimate.
const B4: [f64; 7] = [
    5179.0 / 57600.0,
    0.0,
    7571.0 / 16695.0,
    393.0 / 640.0,
    -92097.0 / 339200.0,
    187.0 / 2100.0,
    1.0 / 40.0,
];

/// One Dormand-Prince step; returns the fifth- and fourth-order estimates.
fn dopri_step<F>(f: &F, t: f64, y: f64, h: f64) -> (f64, f64)
where
    F: Fn(f64, f64) -> f64,
{
    let k1 = f(t, y);
    let k2 = f(t + h / 5.0, y + h * A2[0] * k1);
    let k3 = f(t + 3.0 * h / 10.0, y + h * (A3[0] * k1 + A3[1] * k2));
    let k4 = f(
        t + 4.0 * h / 5.0,
        y + h * (A4[0] * k1 + A4[1] * k2 + A4[2] * k3),
    );
    let k5 = f(
        t + 8.0 * h / 9.0,
        y + h * (A5[0] * k1 + A5[1] * k2 + A5[2] * k3 + A5[3] * k4),
    );
    let k6 = f(
        t + h,
        y + h * (A6[0] * k1 + A6[1] * k2 + A6[2] * k3 + A6[3] * k4 + A6[4] * k5),
    );
    let y5 = y + h * (B5[0] * k1 + B5[2] * k3 + B5[3] * k4 + B5[4] * k5 + B5[5] * k6);
    let k7 = f(t + h, y5);
    let y4 = y
        + h * (B4[0] * k1 + B4[2] * k3 + B4[3] * k4 + B4[4] * k5 + B4[5] * k6 + B4[6] * k7);
    (y5, y4)
}

/// Integrate the logistic ODE over `t_span`, sampling at `eval_times`.
///
/// Evaluation times must be non-decreasing and lie within the span. Fails
/// with `ModelError::Integration` on step-limit exhaustion, step underflow,
/// or a non-finite state; no partial series is ever returned.
pub fn integrate(
    params: &ModelParameters,
    t_span: (f64, f64),
    eval_times: &Array1<f64>,
    options: &IntegratorOptions,
) -> ModelResult<IntegrationOutput> {
    let (t0, t1) = t_span;
    if !t0.is_finite() || !t1.is_finite() || t1 <= t0 {
        return Err(ModelError::Domain(format!(
            "time span must satisfy t0 < t1, got ({t0}, {t1})"
        )));
    }
    let mut previous = t0;
    for &t in eval_times.iter() {
        if !t.is_finite() || t < previous || t > t1 {
            return Err(ModelError::Domain(format!(
                "evaluation times must be finite, non-decreasing and within [{t0}, {t1}]"
            )));
        }
        previous = t;
    }

    let rhs = |_t: f64, p: f64| rate::growth_rate(p, params);
    let logger = LogManager::new();
    let mut report = IntegrationReport::default();

    let mut t = t0;
    let mut y = params.initial_size;
    let mut h = (t1 - t0) / 100.0;
    let mut values = Vec::with_capacity(eval_times.len());

    for &target in eval_times.iter() {
        while t < target {
            if report.accepted_steps + report.rejected_steps >= options.max_steps {
                return Err(ModelError::Integration(format!(
                    "step limit {} exhausted at t = {t:.6}",
                    options.max_steps
                )));
            }
            if h <= f64::EPSILON * t.abs().max(1.0) {
                return Err(ModelError::Integration(format!(
                    "step size underflow at t = {t:.6}"
                )));
            }
            let remaining = target - t;
            let clipped = remaining <= h;
            let step = if clipped { remaining } else { h };

            let (y5, y4) = dopri_step(&rhs, t, y, step);
            if !y5.is_finite() {
                return Err(ModelError::Integration(format!(
                    "state became non-finite at t = {t:.6}"
                )));
            }

            let scale = options.abs_tol + options.rel_tol * y.abs().max(y5.abs());
            let error = ((y5 - y4) / scale).abs();
            if error <= 1.0 {
                // Snap clipped steps onto the target so floating-point
                // undershoot cannot strand the loop a few ulps short.
                t = if clipped { target } else { t + step };
                y = y5;
                report.accepted_steps += 1;
                if !clipped {
                    let factor = if error > 0.0 { 0.9 * error.powf(-0.2) } else { 5.0 };
                    h = step * factor.clamp(0.2, 5.0);
                }
            } else {
                report.rejected_steps += 1;
                h = step * (0.9 * error.powf(-0.2)).clamp(0.2, 5.0);
            }
        }
        values.push(y);
    }

    logger.record(&format!(
        "RK45 run finished: {} accepted, {} rejected steps",
        report.accepted_steps, report.rejected_steps
    ));

    let series = TimeSeries::new(eval_times.clone(), Array1::from(values))?;
    Ok(IntegrationOutput { series, report })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::analytic;

    fn reference() -> ModelParameters {
        ModelParameters::new(1.0, 0.5, 100.0).unwrap()
    }

    #[test]
    fn numerical_solution_tracks_the_analytic_one() {
        let params = reference();
        let grid = Array1::linspace(0.0, 20.0, 201);
        let output =
            integrate(&params, (0.0, 20.0), &grid, &IntegratorOptions::default()).unwrap();

        let max_diff = grid
            .iter()
            .zip(output.series.values.iter())
            .map(|(&t, &p)| (analytic::solve(t, &params) - p).abs())
            .fold(0.0_f64, f64::max);
        assert!(max_diff < 1e-3, "max divergence {max_diff} exceeds 1e-3");
        assert!(output.report.accepted_steps > 0);
    }

    #[test]
    fn decay_from_above_capacity_converges() {
        let params = ModelParameters::new(150.0, 0.5, 100.0).unwrap();
        let grid = Array1::linspace(0.0, 30.0, 61);
        let output =
            integrate(&params, (0.0, 30.0), &grid, &IntegratorOptions::default()).unwrap();
        let last = output.series.values[output.series.len() - 1];
        assert!((last - 100.0).abs() < 1e-3);
    }

    #[test]
    fn first_sample_is_the_initial_size() {
        let params = reference();
        let grid = Array1::linspace(0.0, 20.0, 21);
        let output =
            integrate(&params, (0.0, 20.0), &grid, &IntegratorOptions::default()).unwrap();
        assert_eq!(output.series.values[0], 1.0);
    }

    #[test]
    fn exhausted_step_limit_is_an_integration_error() {
        let params = reference();
        let grid = Array1::linspace(0.0, 20.0, 21);
        let options = IntegratorOptions {
            max_steps: 2,
            ..Default::default()
        };
        assert!(matches!(
            integrate(&params, (0.0, 20.0), &grid, &options),
            Err(ModelError::Integration(_))
        ));
    }

    #[test]
    fn eval_times_outside_the_span_are_rejected() {
        let params = reference();
        let grid = Array1::linspace(0.0, 25.0, 11);
        assert!(matches!(
            integrate(&params, (0.0, 20.0), &grid, &IntegratorOptions::default()),
            Err(ModelError::Domain(_))
        ));
    }

    #[test]
    fn inverted_span_is_rejected() {
        let params = reference();
        let grid = Array1::linspace(0.0, 20.0, 11);
        assert!(matches!(
            integrate(&params, (20.0, 0.0), &grid, &IntegratorOptions::default()),
            Err(ModelError::Domain(_))
        ));
    }
}
