pub mod analytic;
pub mod milestones;
pub mod rate;

pub use milestones::{CapacityTarget, InflectionPoint};
