//! Logistic tumor-growth model core.
//!
//! The modules provide a pure computation layer over validated parameter
//! types: the closed-form logistic solution, its growth-rate field, an
//! adaptive Runge-Kutta integrator for cross-checking, closed-form milestone
//! inversions, and the piecewise treatment scenario. Presentation lives in
//! the driver crate; this core never prints.

pub mod model;
pub mod ode;
pub mod prelude;
pub mod scenario;
pub mod telemetry;

pub use prelude::{ModelError, ModelParameters, ModelResult, TimeSeries};
