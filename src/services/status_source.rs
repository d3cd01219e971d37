//! Where simulated oracles get their status codes

use rand::seq::SliceRandom;

use crate::models::oracle::FlightStatus;

/// Source of the status codes simulated oracles report.
pub trait StatusCodeSource: Send + Sync {
    fn next_status(&self) -> FlightStatus;
}

/// Uniform draw over every [`FlightStatus`].
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomStatusSource;

impl StatusCodeSource for RandomStatusSource {
    fn next_status(&self) -> FlightStatus {
        *FlightStatus::ALL
            .choose(&mut rand::thread_rng())
            .unwrap_or(&FlightStatus::Unknown)
    }
}
