//! Closed-form milestone inversions of the analytic solution.
//!
//! Both quantities invert `P(t)` algebraically; no iterative search is
//! involved, so they stay exact against the analytic solution.

use crate::prelude::{ModelError, ModelParameters, ModelResult};
use serde::{Deserialize, Serialize};

/// Where the inflection point (`P = K/2`, fastest growth) sits relative to
/// day zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InflectionPoint {
    /// Fastest growth is still ahead, on the given day:
    /// `t = ln((K - P0) / P0) / r`.
    Ahead { day: f64 },
    /// The initial size is exactly half capacity; growth is fastest at day
    /// zero.
    AtStart,
    /// Started above half capacity; the growth rate only decreases from day
    /// zero. A distinct outcome, not an error.
    BehindStart,
}

/// Whether a target fraction of capacity lies in the future or is already
/// met.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CapacityTarget {
    /// The target fraction is reached on the given day.
    ReachedOn { day: f64 },
    /// Already at or past the target; carries the current capacity fraction.
    AlreadyAt { fraction: f64 },
}

fn require_positive_rate(params: &ModelParameters) -> ModelResult<()> {
    if params.growth_rate <= 0.0 {
        return Err(ModelError::Domain(format!(
            "milestone inversion requires a positive growth rate, got {}",
            params.growth_rate
        )));
    }
    Ok(())
}

/// Day on which the trajectory crosses `K/2`, i.e. the inflection point of
/// the growth curve.
pub fn half_capacity_time(params: &ModelParameters) -> ModelResult<InflectionPoint> {
    require_positive_rate(params)?;
    let half = params.capacity / 2.0;
    if params.initial_size < half {
        let day = ((params.capacity - params.initial_size) / params.initial_size).ln()
            / params.growth_rate;
        Ok(InflectionPoint::Ahead { day })
    } else if params.initial_size == half {
        Ok(InflectionPoint::AtStart)
    } else {
        Ok(InflectionPoint::BehindStart)
    }
}

/// Day on which the trajectory reaches `fraction * K`, solved by inverting
/// the analytic solution: `t = ln((K - P0) / (P0 (1/f - 1))) / r`.
pub fn time_to_fraction(params: &ModelParameters, fraction: f64) -> ModelResult<CapacityTarget> {
    require_positive_rate(params)?;
    if !(fraction > 0.0 && fraction < 1.0) {
        return Err(ModelError::Domain(format!(
            "target fraction must lie in (0, 1), got {fraction}"
        )));
    }
    if params.initial_size >= fraction * params.capacity {
        return Ok(CapacityTarget::AlreadyAt {
            fraction: params.initial_size / params.capacity,
        });
    }
    let numerator = params.capacity - params.initial_size;
    let denominator = params.initial_size * (1.0 / fraction - 1.0);
    let day = (numerator / denominator).ln() / params.growth_rate;
    Ok(CapacityTarget::ReachedOn { day })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::analytic;

    fn reference() -> ModelParameters {
        ModelParameters::new(1.0, 0.5, 100.0).unwrap()
    }

    #[test]
    fn half_capacity_day_matches_hand_calculation() {
        // ln(99) / 0.5
        let params = reference();
        match half_capacity_time(&params).unwrap() {
            InflectionPoint::Ahead { day } => {
                assert!((day - 9.190_138).abs() < 1e-3);
                assert!((analytic::solve(day, &params) - 50.0).abs() < 1e-6);
            }
            other => panic!("expected a future inflection, got {other:?}"),
        }
    }

    #[test]
    fn start_at_half_capacity_inflects_at_day_zero() {
        let params = ModelParameters::new(50.0, 0.5, 100.0).unwrap();
        assert_eq!(half_capacity_time(&params).unwrap(), InflectionPoint::AtStart);
    }

    #[test]
    fn start_above_half_capacity_reports_no_future_inflection() {
        let params = ModelParameters::new(80.0, 0.5, 100.0).unwrap();
        assert_eq!(
            half_capacity_time(&params).unwrap(),
            InflectionPoint::BehindStart
        );
    }

    #[test]
    fn fraction_day_lands_exactly_on_the_target_size() {
        let params = reference();
        match time_to_fraction(&params, 0.95).unwrap() {
            CapacityTarget::ReachedOn { day } => {
                // ln(99 * 0.95 / 0.05) / 0.5
                assert!((day - 15.079_118).abs() < 1e-5);
                assert!((analytic::solve(day, &params) - 95.0).abs() < 1e-6);
            }
            other => panic!("expected a future target, got {other:?}"),
        }
    }

    #[test]
    fn starting_past_the_target_reports_current_fraction() {
        let params = ModelParameters::new(98.0, 0.5, 100.0).unwrap();
        assert_eq!(
            time_to_fraction(&params, 0.95).unwrap(),
            CapacityTarget::AlreadyAt { fraction: 0.98 }
        );
    }

    #[test]
    fn fraction_outside_unit_interval_is_a_domain_error() {
        let params = reference();
        assert!(matches!(
            time_to_fraction(&params, 1.0),
            Err(ModelError::Domain(_))
        ));
        assert!(matches!(
            time_to_fraction(&params, -0.1),
            Err(ModelError::Domain(_))
        ));
    }

    #[test]
    fn non_positive_rate_is_a_domain_error() {
        let params = ModelParameters::new(1.0, 0.0, 100.0).unwrap();
        assert!(matches!(
            half_capacity_time(&params),
            Err(ModelError::Domain(_))
        ));
        assert!(matches!(
            time_to_fraction(&params, 0.95),
            Err(ModelError::Domain(_))
        ));
    }
}
