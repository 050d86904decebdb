use crate::prelude::ModelParameters;
use ndarray::Array1;

/// Closed-form solution of the logistic equation:
/// `P(t) = K / (1 + ((K - P0) / P0) * exp(-r t))`.
///
/// Defined for any real `t` (negative values back-extrapolate). For large
/// `t` the exponential underflows and the result saturates at the capacity.
pub fn solve(t: f64, params: &ModelParameters) -> f64 {
    let ratio = (params.capacity - params.initial_size) / params.initial_size;
    params.capacity / (1.0 + ratio * (-params.growth_rate * t).exp())
}

/// Evaluate the analytic solution over a whole time grid.
pub fn solve_many(times: &Array1<f64>, params: &ModelParameters) -> Array1<f64> {
    times.mapv(|t| solve(t, params))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array1;

    fn reference() -> ModelParameters {
        ModelParameters::new(1.0, 0.5, 100.0).unwrap()
    }

    #[test]
    fn solution_starts_at_initial_size() {
        let params = reference();
        assert!((solve(0.0, &params) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn solution_stays_strictly_between_zero_and_capacity() {
        let params = reference();
        for t in [-5.0, 0.0, 1.0, 10.0, 20.0, 50.0] {
            let p = solve(t, &params);
            assert!(p > 0.0, "P({t}) = {p} not positive");
            assert!(p < params.capacity, "P({t}) = {p} exceeds capacity");
        }
    }

    #[test]
    fn solution_is_monotonically_increasing() {
        let params = reference();
        let grid = Array1::linspace(0.0, 20.0, 201);
        let values = solve_many(&grid, &params);
        for pair in values.as_slice().unwrap().windows(2) {
            assert!(pair[1] > pair[0]);
        }
    }

    #[test]
    fn solution_approaches_capacity() {
        let params = reference();
        assert!((solve(1000.0, &params) - params.capacity).abs() < 1e-9);
    }

    #[test]
    fn start_above_capacity_decays_toward_it() {
        let params = ModelParameters::new(150.0, 0.5, 100.0).unwrap();
        let early = solve(1.0, &params);
        let late = solve(30.0, &params);
        assert!(early > late);
        assert!(early > params.capacity);
        assert!((late - params.capacity).abs() < 1e-4);
    }

    #[test]
    fn start_near_capacity_stays_put() {
        let params = ModelParameters::new(99.999_999, 0.5, 100.0).unwrap();
        for t in [0.0, 5.0, 20.0] {
            assert!((solve(t, &params) - 100.0).abs() < 1e-5);
        }
    }

    #[test]
    fn vectorised_evaluation_matches_scalar() {
        let params = reference();
        let grid = Array1::linspace(0.0, 20.0, 41);
        let values = solve_many(&grid, &params);
        for (&t, &v) in grid.iter().zip(values.iter()) {
            assert_eq!(v, solve(t, &params));
        }
    }
}
