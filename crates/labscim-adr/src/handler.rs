//! # LabSCim ADR handler
//!
//! Assembles the ADR decision for one device from its current state and
//! uplink history.
//!
//! ## Policy
//!
//! 1. Start from the device's current `(dr, tx_power_index, nb_trans)`.
//! 2. If the device has ADR switched off, stop there.
//! 3. Pull the data rate down to `max_dr` if it exceeds it.
//! 4. Pick NbTrans from the packet loss estimate.
//! 5. With enough history, convert the SNR margin at the current power
//!    index into DR / power steps.
//!
//! The handler holds no per-device state: identical requests always yield
//! identical responses, and a single handler can serve any number of
//! callers concurrently.

use tracing::{debug, warn};

use crate::config::{AdrConfig, HistoryGate};
use crate::error::AdrError;
use crate::loss::packet_loss;
use crate::margin::{matching_history_len, snr_margin};
use crate::nbtrans::select_nb_trans;
use crate::step::{ideal_tx_power_index_and_dr, step_count};
use crate::types::{AdrRequest, AdrResponse};

/// Registry key of [`LabScimHandler`].
pub const LABSCIM_ADR_ID: &str = "labscimadr";
/// Display name of [`LabScimHandler`].
pub const LABSCIM_ADR_NAME: &str = "LabSCim ADR algorithm";

/// An ADR algorithm as seen by the network server's handler registry.
pub trait AdrHandler: Send + Sync {
    /// Stable machine-readable key.
    fn id(&self) -> &str;
    /// Human-readable label.
    fn name(&self) -> &str;
    /// Decide the next radio parameters for a device.
    fn handle(&self, req: &AdrRequest) -> AdrResponse;
}

// ─── Evaluation ─────────────────────────────────────────────────────────────

/// A response together with the intermediate values that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub response: AdrResponse,
    /// Packet loss estimate (%) that drove NbTrans. 0 when ADR is off.
    pub loss_pct: f32,
    /// SNR margin (dB) at the current power index, when the step phase ran.
    pub margin_db: Option<f32>,
    /// Steps derived from the margin. 0 when the step phase was skipped.
    pub n_step: i32,
    /// History problems that were worked around for this decision.
    pub recovered: Vec<AdrError>,
}

impl Evaluation {
    fn passthrough(req: &AdrRequest) -> Self {
        Evaluation {
            response: AdrResponse::unchanged(req),
            loss_pct: 0.0,
            margin_db: None,
            n_step: 0,
            recovered: Vec::new(),
        }
    }
}

// ─── Handler ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct LabScimHandler {
    config: AdrConfig,
}

impl LabScimHandler {
    pub fn new(config: AdrConfig) -> Self {
        LabScimHandler { config }
    }

    pub fn config(&self) -> &AdrConfig {
        &self.config
    }

    /// Decide, keeping the intermediate values.
    pub fn evaluate(&self, req: &AdrRequest) -> Evaluation {
        let mut eval = Evaluation::passthrough(req);
        if !req.adr {
            return eval;
        }

        let cfg = &self.config;
        let history = &req.uplink_history;

        // Lower the DR only if it exceeds the max allowed DR
        if req.dr > req.max_dr {
            eval.response.dr = req.max_dr;
        }

        let loss = packet_loss(history, cfg.loss_min_history);
        for err in &loss.regressions {
            warn!(error = %err, "ignoring frame counter regression in loss estimate");
        }
        eval.loss_pct = loss.loss_pct;
        eval.recovered.extend(loss.regressions);
        eval.response.nb_trans = select_nb_trans(cfg, req.nb_trans, loss.loss_pct);

        if self.gated_history_len(req) > cfg.step_min_history {
            match snr_margin(
                history,
                req.tx_power_index,
                req.required_snr_for_dr,
                req.installation_margin,
            ) {
                Ok(margin) => {
                    let n_step = step_count(margin, cfg.margin_db_per_step);
                    (eval.response.tx_power_index, eval.response.dr) = ideal_tx_power_index_and_dr(
                        n_step,
                        req.tx_power_index,
                        eval.response.dr,
                        req.max_tx_power_index,
                        req.max_dr,
                    );
                    eval.margin_db = Some(margin);
                    eval.n_step = n_step;
                }
                Err(err) => {
                    warn!(error = %err, "skipping dr/power steps");
                    eval.recovered.push(err);
                }
            }
        }

        debug!(
            history_len = history.len(),
            loss_pct = eval.loss_pct,
            margin_db = ?eval.margin_db,
            n_step = eval.n_step,
            dr = req.dr,
            new_dr = eval.response.dr,
            tx_power_index = req.tx_power_index,
            new_tx_power_index = eval.response.tx_power_index,
            nb_trans = req.nb_trans,
            new_nb_trans = eval.response.nb_trans,
            "adr decision"
        );

        eval
    }

    fn gated_history_len(&self, req: &AdrRequest) -> usize {
        match self.config.step_history_gate {
            HistoryGate::Total => req.uplink_history.len(),
            HistoryGate::MatchingPowerIndex => {
                matching_history_len(&req.uplink_history, req.tx_power_index)
            }
        }
    }
}

impl AdrHandler for LabScimHandler {
    fn id(&self) -> &str {
        LABSCIM_ADR_ID
    }

    fn name(&self) -> &str {
        LABSCIM_ADR_NAME
    }

    fn handle(&self, req: &AdrRequest) -> AdrResponse {
        self.evaluate(req).response
    }
}
