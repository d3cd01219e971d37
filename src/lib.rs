//! FlightSurety Oracle Server Library
//!
//! Registers node accounts as oracles of the FlightSurety app contract,
//! follows its oracle events, simulates oracle responses and serves a small
//! HTTP API.

pub mod chain;
pub mod config;
pub mod error;
pub mod event_listener;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod supervisor;

#[cfg(test)]
mod testing;
