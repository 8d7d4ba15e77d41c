//! The simulation client.
//!
//! [`SimulationClient::simulate`] dry-runs one contract invocation from a
//! throwaway account and always answers with a [`SimulationResult`]: the
//! caller never sees a transport error or a panic from this boundary.
//!
//! [`classify`] turns a raw node response into a result. It is shared with
//! the vote orchestrator, which simulates against the real voter account
//! instead of a disposable one.

mod classify;
mod client;

pub use classify::classify;
pub use client::{disposable_account, SimulationClient, SIMULATION_FEE, SIMULATION_TIMEOUT_SECS};
