//! Request / response values exchanged with the host network server.
//!
//! The host owns the uplink history and the device session; the handler only
//! reads an [`AdrRequest`] and hands back a fresh [`AdrResponse`].

use serde::{Deserialize, Serialize};

/// One received uplink as kept by the host's history store.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UplinkRecord {
    /// Uplink frame counter (FCnt).
    pub f_cnt: u32,
    /// Best SNR (dB) over all gateways that received this uplink.
    pub max_snr: f32,
    /// TX power index the device used for this uplink.
    pub tx_power_index: u8,
}

/// Current device state plus the measurements to decide on.
///
/// Expected of the caller: `dr <= max_dr`, `tx_power_index <= max_tx_power_index`,
/// `1 <= nb_trans <= 3`, and `uplink_history` ordered oldest to newest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdrRequest {
    /// ADR bit set by the device in its last uplink.
    pub adr: bool,
    /// Current data rate.
    pub dr: u8,
    /// Current TX power index.
    pub tx_power_index: u8,
    /// Current number of transmissions per uplink.
    pub nb_trans: u8,
    /// Highest data rate the device / region allows.
    pub max_dr: u8,
    /// Highest TX power index the region allows (lowest output power).
    pub max_tx_power_index: u8,
    /// SNR (dB) required to demodulate at the current data rate.
    pub required_snr_for_dr: f32,
    /// Safety margin (dB) held back from the measured headroom.
    pub installation_margin: f32,
    /// Recent uplinks, oldest first.
    #[serde(default)]
    pub uplink_history: Vec<UplinkRecord>,
}

/// New radio parameters for the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AdrResponse {
    pub dr: u8,
    pub tx_power_index: u8,
    pub nb_trans: u8,
}

impl AdrResponse {
    /// Response that leaves the device exactly as it is.
    pub fn unchanged(req: &AdrRequest) -> Self {
        AdrResponse {
            dr: req.dr,
            tx_power_index: req.tx_power_index,
            nb_trans: req.nb_trans,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_deserializes_without_history() {
        let json = r#"{
            "adr": true,
            "dr": 3,
            "tx_power_index": 1,
            "nb_trans": 1,
            "max_dr": 5,
            "max_tx_power_index": 7,
            "required_snr_for_dr": -12.5,
            "installation_margin": 10.0
        }"#;
        let req: AdrRequest = serde_json::from_str(json).unwrap();
        assert!(req.uplink_history.is_empty());
        assert_eq!(
            AdrResponse::unchanged(&req),
            AdrResponse {
                dr: 3,
                tx_power_index: 1,
                nb_trans: 1,
            }
        );
    }
}
