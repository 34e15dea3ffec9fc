//! Property-based tests for the ADR handler.
//!
//! These check the bounds every decision must respect across arbitrary
//! device states and uplink histories, including histories with counter
//! regressions and power indices the device is not currently using.

use labscim_adr::{AdrHandler, AdrRequest, AdrResponse, LabScimHandler, UplinkRecord};
use proptest::prelude::*;

fn uplink_history(max_len: usize) -> impl Strategy<Value = Vec<UplinkRecord>> {
    prop::collection::vec((0u32..4, -25.0f32..30.0, 0u8..8), 0..=max_len).prop_map(|steps| {
        // Mostly increasing counters with random gaps; step 0 repeats a counter
        let mut f_cnt = 0u32;
        steps
            .into_iter()
            .map(|(gap, max_snr, tx_power_index)| {
                f_cnt += gap;
                UplinkRecord {
                    f_cnt,
                    max_snr,
                    tx_power_index,
                }
            })
            .collect()
    })
}

fn adr_request() -> impl Strategy<Value = AdrRequest> {
    (
        any::<bool>(),
        0u8..=15,
        0u8..=15,
        0u8..=5,
        0u8..=15,
        0u8..=15,
        -20.0f32..0.0,
        0.0f32..15.0,
        uplink_history(24),
    )
        .prop_map(
            |(
                adr,
                dr,
                tx_power_index,
                nb_trans,
                max_dr,
                max_tx_power_index,
                required_snr_for_dr,
                installation_margin,
                uplink_history,
            )| AdrRequest {
                adr,
                dr,
                tx_power_index,
                nb_trans,
                max_dr,
                max_tx_power_index,
                required_snr_for_dr,
                installation_margin,
                uplink_history,
            },
        )
}

// ─── Passthrough ────────────────────────────────────────────────────────────

proptest! {
    /// With ADR off the device state comes back untouched.
    #[test]
    fn adr_off_is_identity(req in adr_request()) {
        let req = AdrRequest { adr: false, ..req };
        let resp = LabScimHandler::default().handle(&req);
        prop_assert_eq!(resp, AdrResponse::unchanged(&req));
    }
}

// ─── Bounds ─────────────────────────────────────────────────────────────────

proptest! {
    /// DR never exceeds the ceiling and NbTrans stays in 1..=3.
    #[test]
    fn response_within_bounds(req in adr_request()) {
        let req = AdrRequest { adr: true, ..req };
        let resp = LabScimHandler::default().handle(&req);
        prop_assert!(resp.dr <= req.max_dr, "dr {} > max {}", resp.dr, req.max_dr);
        prop_assert!((1..=3).contains(&resp.nb_trans), "nb_trans {}", resp.nb_trans);
    }

    /// Power index only leaves its starting value inside [0, max].
    #[test]
    fn power_index_within_bounds(req in adr_request()) {
        let req = AdrRequest {
            adr: true,
            tx_power_index: req.tx_power_index.min(req.max_tx_power_index),
            ..req
        };
        let resp = LabScimHandler::default().handle(&req);
        prop_assert!(resp.tx_power_index <= req.max_tx_power_index);
    }

    /// With ten or fewer uplinks only the DR clamp can move DR / power.
    #[test]
    fn short_history_only_clamps(req in adr_request(), keep in 0usize..=10) {
        let mut req = AdrRequest { adr: true, ..req };
        req.uplink_history.truncate(keep);
        let resp = LabScimHandler::default().handle(&req);
        prop_assert_eq!(resp.dr, req.dr.min(req.max_dr));
        prop_assert_eq!(resp.tx_power_index, req.tx_power_index);
    }

    /// Data rate is never lowered below the clamped request value.
    #[test]
    fn dr_never_drops_below_clamped(req in adr_request()) {
        let req = AdrRequest { adr: true, ..req };
        let resp = LabScimHandler::default().handle(&req);
        prop_assert!(resp.dr >= req.dr.min(req.max_dr));
    }
}

// ─── Determinism ────────────────────────────────────────────────────────────

proptest! {
    /// Repeated calls, including through separate handlers, agree.
    #[test]
    fn decision_is_deterministic(req in adr_request()) {
        let a = LabScimHandler::default().evaluate(&req);
        let b = LabScimHandler::default().evaluate(&req);
        prop_assert_eq!(a.response, b.response);
        prop_assert_eq!(a.n_step, b.n_step);
        prop_assert_eq!(labscim_adr::evaluate(&req), a.response);
    }
}
