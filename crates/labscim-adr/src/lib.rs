//! # labscim-adr
//!
//! Adaptive Data Rate decision function for a LoRaWAN network server.
//!
//! Given a device's current data rate, TX power index and NbTrans plus a
//! short history of uplink SNR measurements, it computes new parameters that
//! trade link reliability against airtime and power. The computation is
//! pure and synchronous: no I/O, no shared state.
//!
//! ## Crate structure
//!
//! - [`types`] — Request / response values and uplink records
//! - [`loss`] — Packet loss estimate from frame counter gaps
//! - [`nbtrans`] — NbTrans policy table lookup
//! - [`margin`] — SNR margin at the current TX power index
//! - [`step`] — Step-wise DR / TX power walk
//! - [`handler`] — Decision assembly and the [`AdrHandler`] seam
//! - [`config`] — Tunable thresholds, TOML loading
//! - [`error`] — Conditions detected while deciding

pub mod config;
pub mod error;
pub mod handler;
pub mod loss;
pub mod margin;
pub mod nbtrans;
pub mod step;
pub mod types;

pub use config::AdrConfig;
pub use error::AdrError;
pub use handler::{AdrHandler, Evaluation, LabScimHandler};
pub use types::{AdrRequest, AdrResponse, UplinkRecord};

/// Decide with the stock LabSCim configuration.
pub fn evaluate(req: &AdrRequest) -> AdrResponse {
    LabScimHandler::default().handle(req)
}
