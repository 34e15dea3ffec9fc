//! # SNR margin
//!
//! Headroom between what the gateways measured and what the current data
//! rate needs. Only uplinks sent at the request's current TX power index are
//! averaged: measurements taken at another power level are not comparable.

use crate::error::AdrError;
use crate::types::UplinkRecord;

/// Mean of `max_snr` over the uplinks sent at `tx_power_index`.
pub fn mean_snr(history: &[UplinkRecord], tx_power_index: u8) -> Result<f32, AdrError> {
    let (sum, count) = history
        .iter()
        .filter(|r| r.tx_power_index == tx_power_index)
        .fold((0.0f32, 0usize), |(sum, count), r| (sum + r.max_snr, count + 1));

    if count == 0 {
        return Err(AdrError::InsufficientMatchingHistory {
            tx_power_index,
            history_len: history.len(),
        });
    }
    Ok(sum / count as f32)
}

/// `mean SNR - required SNR - installation margin`, in dB.
pub fn snr_margin(
    history: &[UplinkRecord],
    tx_power_index: u8,
    required_snr: f32,
    installation_margin: f32,
) -> Result<f32, AdrError> {
    let mean = mean_snr(history, tx_power_index)?;
    Ok(mean - required_snr - installation_margin)
}

/// Best SNR over the whole history regardless of power index.
pub fn max_snr(history: &[UplinkRecord]) -> Option<f32> {
    history.iter().map(|r| r.max_snr).reduce(f32::max)
}

/// Number of uplinks sent at `tx_power_index`.
pub fn matching_history_len(history: &[UplinkRecord], tx_power_index: u8) -> usize {
    history
        .iter()
        .filter(|r| r.tx_power_index == tx_power_index)
        .count()
}
