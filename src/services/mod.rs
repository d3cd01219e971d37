//! Oracle services driven against the app contract

pub mod registrar;
pub mod response_simulator;
pub mod status_source;

pub use registrar::{OracleRegistrar, RegistrationSummary};
pub use response_simulator::{ResponseSimulator, SimulationSummary};
pub use status_source::{RandomStatusSource, StatusCodeSource};
