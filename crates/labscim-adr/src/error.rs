use thiserror::Error;

// ── Errors ──────────────────────────────────────────────────────────

/// Conditions the ADR handler detects while deciding.
///
/// The two history variants are recovered inside the handler and only
/// surface through [`crate::handler::Evaluation::recovered`]; the config
/// variants come out of [`crate::config::AdrConfig::from_toml_str`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AdrError {
    #[error(
        "no uplink in a history of {history_len} was sent at tx power index {tx_power_index}"
    )]
    InsufficientMatchingHistory {
        tx_power_index: u8,
        history_len: usize,
    },
    #[error("frame counter went backwards at history index {index}: {previous} -> {current}")]
    FrameCounterRegression {
        index: usize,
        previous: u32,
        current: u32,
    },
    #[error("invalid ADR config: {0}")]
    InvalidConfig(String),
    #[error("invalid ADR config TOML: {0}")]
    ConfigParse(String),
}
