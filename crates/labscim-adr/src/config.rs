//! Handler tuning.
//!
//! Every constant the decision uses is named here. [`AdrConfig::default`]
//! is the stock LabSCim behaviour; a TOML document can override any field:
//!
//! ```toml
//! version = 1
//! loss_min_history = 10
//! step_min_history = 10
//! step_history_gate = "total"
//! margin_db_per_step = 3.0
//! loss_thresholds_pct = [5.0, 10.0, 30.0]
//! nb_trans_table = [[1, 1, 2], [1, 2, 3], [2, 3, 3], [3, 3, 3]]
//! ```

use serde::Deserialize;

use crate::error::AdrError;

pub const CONFIG_VERSION: u32 = 1;

/// NbTrans policy, rows by loss bucket, columns by current NbTrans (1..=3).
pub const DEFAULT_NB_TRANS_TABLE: [[u8; 3]; 4] = [
    [1, 1, 2], // < 5 %
    [1, 2, 3], // < 10 %
    [2, 3, 3], // < 30 %
    [3, 3, 3], // >= 30 %
];

/// Which uplinks count towards the step-adjustment history requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryGate {
    /// Every uplink in the history.
    #[default]
    Total,
    /// Only uplinks sent at the request's current TX power index.
    MatchingPowerIndex,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AdrConfigInput {
    pub version: u32,
    pub loss_min_history: Option<usize>,
    pub step_min_history: Option<usize>,
    pub step_history_gate: Option<HistoryGate>,
    pub margin_db_per_step: Option<f32>,
    pub loss_thresholds_pct: Option<[f32; 3]>,
    pub nb_trans_table: Option<[[u8; 3]; 4]>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdrConfig {
    pub version: u32,
    /// Packet loss is only estimated once the history holds at least this
    /// many uplinks.
    pub loss_min_history: usize,
    /// Data rate / power steps are only taken once the gated history count
    /// is strictly greater than this.
    pub step_min_history: usize,
    pub step_history_gate: HistoryGate,
    /// SNR margin (dB) worth one DR or power step.
    pub margin_db_per_step: f32,
    /// Exclusive upper bounds of the first three loss buckets, ascending.
    pub loss_thresholds_pct: [f32; 3],
    pub nb_trans_table: [[u8; 3]; 4],
}

impl Default for AdrConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            loss_min_history: 10,
            step_min_history: 10,
            step_history_gate: HistoryGate::Total,
            margin_db_per_step: 3.0,
            loss_thresholds_pct: [5.0, 10.0, 30.0],
            nb_trans_table: DEFAULT_NB_TRANS_TABLE,
        }
    }
}

impl AdrConfigInput {
    pub fn resolve(self) -> Result<AdrConfig, AdrError> {
        let version = if self.version == 0 {
            CONFIG_VERSION
        } else {
            self.version
        };
        if version != CONFIG_VERSION {
            return Err(AdrError::InvalidConfig(format!(
                "unsupported config version {}",
                version
            )));
        }

        let defaults = AdrConfig::default();
        let cfg = AdrConfig {
            version,
            loss_min_history: self.loss_min_history.unwrap_or(defaults.loss_min_history),
            step_min_history: self.step_min_history.unwrap_or(defaults.step_min_history),
            step_history_gate: self.step_history_gate.unwrap_or(defaults.step_history_gate),
            margin_db_per_step: self
                .margin_db_per_step
                .unwrap_or(defaults.margin_db_per_step),
            loss_thresholds_pct: self
                .loss_thresholds_pct
                .unwrap_or(defaults.loss_thresholds_pct),
            nb_trans_table: self.nb_trans_table.unwrap_or(defaults.nb_trans_table),
        };
        cfg.validate()?;
        Ok(cfg)
    }
}

impl AdrConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, AdrError> {
        if input.trim().is_empty() {
            return Ok(AdrConfig::default());
        }
        let parsed: AdrConfigInput =
            toml::from_str(input).map_err(|e| AdrError::ConfigParse(e.to_string()))?;
        parsed.resolve()
    }

    pub fn validate(&self) -> Result<(), AdrError> {
        if !self.margin_db_per_step.is_finite() || self.margin_db_per_step <= 0.0 {
            return Err(AdrError::InvalidConfig(format!(
                "margin_db_per_step must be a positive number, got {}",
                self.margin_db_per_step
            )));
        }

        let [a, b, c] = self.loss_thresholds_pct;
        if !(a.is_finite() && b.is_finite() && c.is_finite() && a < b && b < c) {
            return Err(AdrError::InvalidConfig(format!(
                "loss_thresholds_pct must be strictly increasing, got {:?}",
                self.loss_thresholds_pct
            )));
        }

        for (row, values) in self.nb_trans_table.iter().enumerate() {
            if let Some(v) = values.iter().find(|v| !(1..=3).contains(*v)) {
                return Err(AdrError::InvalidConfig(format!(
                    "nb_trans_table row {} holds {}, expected 1..=3",
                    row, v
                )));
            }
        }

        Ok(())
    }
}
