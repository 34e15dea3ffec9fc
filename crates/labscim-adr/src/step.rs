//! # Step-wise DR / TX power optimisation
//!
//! The SNR margin is spent in whole steps of `margin_db_per_step` dB.
//! A positive step first raises the data rate, and once the data rate is at
//! its ceiling raises the TX power index (lower output power). A negative
//! step lowers the TX power index (more output power); the data rate is never
//! lowered here.
//!
//! Every step is consumed even when both bounds absorb it, so a very large
//! margin simply saturates at `(max_dr, max_tx_power_index)`.

/// Number of steps in `margin_db`, truncated toward zero.
///
/// A margin of -2 dB with 3 dB steps is 0 steps, not -1. Non-finite margins
/// yield 0.
pub fn step_count(margin_db: f32, margin_db_per_step: f32) -> i32 {
    let steps = margin_db / margin_db_per_step;
    if !steps.is_finite() {
        return 0;
    }
    steps.trunc() as i32
}

/// Walk `(tx_power_index, dr)` by `n_step` steps within the given bounds.
///
/// Returns the new `(tx_power_index, dr)`.
pub fn ideal_tx_power_index_and_dr(
    n_step: i32,
    mut tx_power_index: u8,
    mut dr: u8,
    max_tx_power_index: u8,
    max_dr: u8,
) -> (u8, u8) {
    for _ in 0..n_step.unsigned_abs() {
        // Remaining steps would all be absorbed by the bounds
        let saturated = if n_step > 0 {
            dr >= max_dr && tx_power_index >= max_tx_power_index
        } else {
            tx_power_index == 0
        };
        if saturated {
            break;
        }

        if n_step > 0 {
            if dr < max_dr {
                dr += 1;
            } else if tx_power_index < max_tx_power_index {
                tx_power_index += 1;
            }
        } else if tx_power_index > 0 {
            tx_power_index -= 1;
        }
        tracing::trace!(n_step, tx_power_index, dr, "adr step");
    }
    (tx_power_index, dr)
}
