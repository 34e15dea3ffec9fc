//! # Simulated end device
//!
//! Stands in for the network server around an [`AdrHandler`]: it transmits
//! uplinks over a [`ChannelFrame`] sequence, keeps the uplink history the
//! server would keep, and applies every ADR decision to its own state.
//!
//! ## Radio model
//!
//! - Received SNR = channel SNR − 2 dB per TX power index.
//! - A copy is demodulated when its SNR is at or above the floor of the
//!   current data rate (−20 dB at DR0, +2.5 dB per DR) and it survives the
//!   channel's random loss.
//! - NbTrans copies share one frame counter; the best copy is recorded.

use serde::Serialize;

use labscim_adr::{AdrHandler, AdrRequest, AdrResponse, UplinkRecord};

use crate::history::{UplinkHistory, DEFAULT_HISTORY_WINDOW};
use crate::scenario::{ChannelFrame, MAX_COPIES};

/// Output power lost per TX power index step (dB).
pub const TX_POWER_STEP_DB: f32 = 2.0;

/// Lowest SNR (dB) a copy can be demodulated at for `dr`.
pub fn demod_floor_db(dr: u8) -> f32 {
    -20.0 + 2.5 * dr as f32
}

/// Static limits and starting state of a simulated device.
#[derive(Debug, Clone)]
pub struct DeviceProfile {
    pub adr: bool,
    pub dr: u8,
    pub tx_power_index: u8,
    pub nb_trans: u8,
    pub max_dr: u8,
    pub max_tx_power_index: u8,
    /// Installation margin (dB) the server applies to this device.
    pub installation_margin: f32,
    pub history_window: usize,
}

impl Default for DeviceProfile {
    fn default() -> Self {
        DeviceProfile {
            adr: true,
            dr: 0,
            tx_power_index: 0,
            nb_trans: 1,
            max_dr: 5,
            max_tx_power_index: 7,
            installation_margin: 10.0,
            history_window: DEFAULT_HISTORY_WINDOW,
        }
    }
}

/// What happened to one uplink.
#[derive(Debug, Clone, Serialize)]
pub struct UplinkOutcome {
    pub f_cnt: u32,
    pub channel_snr_db: f32,
    /// Parameters the uplink was sent with.
    pub sent_with: AdrResponse,
    pub received: bool,
    /// Best received SNR over all copies.
    pub max_snr: Option<f32>,
    /// Device parameters after the server's decision.
    pub next: AdrResponse,
}

/// Aggregate view of a run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SimSummary {
    pub uplinks: usize,
    pub delivered: usize,
    pub delivery_ratio: f64,
    /// Copies transmitted, a proxy for airtime and energy.
    pub transmissions: u64,
    pub mean_dr: f64,
    pub final_state: Option<AdrResponse>,
}

pub struct SimDevice<H: AdrHandler> {
    handler: H,
    profile: DeviceProfile,
    state: AdrResponse,
    f_cnt: u32,
    history: UplinkHistory,
}

impl<H: AdrHandler> SimDevice<H> {
    pub fn new(handler: H, profile: DeviceProfile) -> Self {
        let state = Self::initial_state(&profile);
        let history = UplinkHistory::new(profile.history_window);
        SimDevice {
            handler,
            profile,
            state,
            f_cnt: 0,
            history,
        }
    }

    fn initial_state(profile: &DeviceProfile) -> AdrResponse {
        AdrResponse {
            dr: profile.dr.min(profile.max_dr),
            tx_power_index: profile.tx_power_index.min(profile.max_tx_power_index),
            nb_trans: profile.nb_trans.clamp(1, MAX_COPIES as u8),
        }
    }

    /// Re-join the network: a new session restarts the frame counter at 0,
    /// the server drops the old history and the radio returns to the
    /// profile's starting parameters.
    pub fn rejoin(&mut self) {
        tracing::debug!(f_cnt = self.f_cnt, "device rejoined");
        self.state = Self::initial_state(&self.profile);
        self.f_cnt = 0;
        self.history.clear();
    }

    pub fn state(&self) -> AdrResponse {
        self.state
    }

    pub fn history(&self) -> &UplinkHistory {
        &self.history
    }

    /// Request the server would build from the current state and history.
    pub fn request(&self) -> AdrRequest {
        AdrRequest {
            adr: self.profile.adr,
            dr: self.state.dr,
            tx_power_index: self.state.tx_power_index,
            nb_trans: self.state.nb_trans,
            max_dr: self.profile.max_dr,
            max_tx_power_index: self.profile.max_tx_power_index,
            required_snr_for_dr: demod_floor_db(self.state.dr),
            installation_margin: self.profile.installation_margin,
            uplink_history: self.history.to_vec(),
        }
    }

    /// Transmit one uplink over `frame` and apply the resulting decision.
    pub fn uplink(&mut self, frame: &ChannelFrame) -> UplinkOutcome {
        let sent_with = self.state;
        let f_cnt = self.f_cnt;
        self.f_cnt = self.f_cnt.wrapping_add(1);

        let snr = frame.snr_db - TX_POWER_STEP_DB * sent_with.tx_power_index as f32;
        let floor = demod_floor_db(sent_with.dr);
        let copies = usize::from(sent_with.nb_trans).min(MAX_COPIES);
        let received = (0..copies).any(|copy| snr >= floor && !frame.copy_lost(copy));

        let max_snr = if received {
            self.history.push(UplinkRecord {
                f_cnt,
                max_snr: snr,
                tx_power_index: sent_with.tx_power_index,
            });
            let resp = self.handler.handle(&self.request());
            if resp != self.state {
                tracing::debug!(
                    f_cnt,
                    handler = self.handler.id(),
                    dr = resp.dr,
                    tx_power_index = resp.tx_power_index,
                    nb_trans = resp.nb_trans,
                    "device reconfigured"
                );
            }
            self.state = resp;
            Some(snr)
        } else {
            tracing::trace!(f_cnt, snr, floor, "uplink lost");
            None
        };

        UplinkOutcome {
            f_cnt,
            channel_snr_db: frame.snr_db,
            sent_with,
            received,
            max_snr,
            next: self.state,
        }
    }

    pub fn run(&mut self, frames: &[ChannelFrame]) -> Vec<UplinkOutcome> {
        frames.iter().map(|frame| self.uplink(frame)).collect()
    }
}

pub fn summarize(outcomes: &[UplinkOutcome]) -> SimSummary {
    if outcomes.is_empty() {
        return SimSummary::default();
    }
    let delivered = outcomes.iter().filter(|o| o.received).count();
    let transmissions = outcomes
        .iter()
        .map(|o| u64::from(o.sent_with.nb_trans))
        .sum();
    let mean_dr =
        outcomes.iter().map(|o| o.sent_with.dr as f64).sum::<f64>() / outcomes.len() as f64;

    SimSummary {
        uplinks: outcomes.len(),
        delivered,
        delivery_ratio: delivered as f64 / outcomes.len() as f64,
        transmissions,
        mean_dr,
        final_state: outcomes.last().map(|o| o.next),
    }
}
