use crate::prelude::ModelParameters;

/// Right-hand side of the logistic ODE: `dP/dt = r P (1 - P/K)`.
pub fn growth_rate(size: f64, params: &ModelParameters) -> f64 {
    params.growth_rate * size * (1.0 - size / params.capacity)
}

/// Peak of the growth-rate field, attained at `P = K/2`.
pub fn peak_growth_rate(params: &ModelParameters) -> f64 {
    params.growth_rate * params.capacity / 4.0
}
