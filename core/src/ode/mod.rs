pub mod rk45;

pub use rk45::{integrate, IntegrationOutput, IntegrationReport, IntegratorOptions};
