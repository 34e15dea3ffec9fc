//! # Packet loss estimation
//!
//! Loss is inferred from gaps in the frame counter sequence of the uplink
//! history: consecutive uplinks are expected to differ by exactly one, and
//! any larger step counts `delta - 1` uplinks as lost.
//!
//! A counter that goes backwards (reset, 32-bit wraparound, or out-of-order
//! history) contributes no loss for that pair and is reported back as a
//! [`AdrError::FrameCounterRegression`] instead of underflowing.

use crate::error::AdrError;
use crate::types::UplinkRecord;

/// Outcome of a loss estimate over one history.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LossEstimate {
    /// Lost uplinks as a percentage of the history length.
    pub loss_pct: f32,
    /// Uplinks inferred lost from counter gaps.
    pub lost_packets: u32,
    /// Counter regressions that were skipped.
    pub regressions: Vec<AdrError>,
}

/// Estimate packet loss over `history`.
///
/// Returns a zero estimate when the history is shorter than `min_history`:
/// too few samples to extrapolate from.
pub fn packet_loss(history: &[UplinkRecord], min_history: usize) -> LossEstimate {
    if history.is_empty() || history.len() < min_history {
        return LossEstimate::default();
    }

    let mut lost_packets: u32 = 0;
    let mut regressions = Vec::new();

    for (i, pair) in history.windows(2).enumerate() {
        let (previous, current) = (pair[0].f_cnt, pair[1].f_cnt);
        if current < previous {
            regressions.push(AdrError::FrameCounterRegression {
                index: i + 1,
                previous,
                current,
            });
            continue;
        }
        // Equal counters (duplicate uplink) lose nothing
        lost_packets = lost_packets.saturating_add((current - previous).saturating_sub(1));
    }

    LossEstimate {
        loss_pct: lost_packets as f32 / history.len() as f32 * 100.0,
        lost_packets,
        regressions,
    }
}
