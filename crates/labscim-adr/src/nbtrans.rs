//! NbTrans selection from the loss policy table.

use crate::config::AdrConfig;

/// Pick the next NbTrans for a device currently at `current` that sees
/// `loss_pct` percent loss.
///
/// `current` is clamped into `1..=3` first, so a device reporting 0 or 15
/// transmissions is treated as 1 or 3.
pub fn select_nb_trans(cfg: &AdrConfig, current: u8, loss_pct: f32) -> u8 {
    let column = usize::from(current.clamp(1, 3)) - 1;
    let row = cfg
        .loss_thresholds_pct
        .iter()
        .position(|&limit| loss_pct < limit)
        .unwrap_or(cfg.loss_thresholds_pct.len());
    cfg.nb_trans_table[row][column]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_rows_by_loss_bucket() {
        let cfg = AdrConfig::default();
        let cases: &[(f32, [u8; 3])] = &[
            (0.0, [1, 1, 2]),
            (4.99, [1, 1, 2]),
            (5.0, [1, 2, 3]),
            (9.99, [1, 2, 3]),
            (10.0, [2, 3, 3]),
            (29.9, [2, 3, 3]),
            (30.0, [3, 3, 3]),
            (250.0, [3, 3, 3]),
        ];
        for &(loss, row) in cases {
            for nb_trans in 1..=3u8 {
                assert_eq!(
                    select_nb_trans(&cfg, nb_trans, loss),
                    row[usize::from(nb_trans) - 1],
                    "loss {loss} nb_trans {nb_trans}"
                );
            }
        }
    }

    #[test]
    fn out_of_range_current_is_clamped() {
        let cfg = AdrConfig::default();
        assert_eq!(select_nb_trans(&cfg, 0, 0.0), 1);
        assert_eq!(select_nb_trans(&cfg, 15, 0.0), 2);
        assert_eq!(select_nb_trans(&cfg, 15, 7.0), 3);
    }

    #[test]
    fn never_decreases_as_loss_worsens() {
        let cfg = AdrConfig::default();
        for nb_trans in 1..=3u8 {
            let mut prev = 0;
            for loss in (0..100).map(|l| l as f32) {
                let next = select_nb_trans(&cfg, nb_trans, loss);
                assert!(next >= prev);
                prev = next;
            }
        }
    }
}
