use std::collections::VecDeque;

use labscim_adr::UplinkRecord;

/// Uplinks a network server typically keeps per device.
pub const DEFAULT_HISTORY_WINDOW: usize = 20;

/// Bounded uplink history, oldest first.
#[derive(Debug, Clone)]
pub struct UplinkHistory {
    window: usize,
    records: VecDeque<UplinkRecord>,
}

impl Default for UplinkHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_WINDOW)
    }
}

impl UplinkHistory {
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        UplinkHistory {
            window,
            records: VecDeque::with_capacity(window),
        }
    }

    /// Append an uplink, dropping the oldest once the window is full.
    pub fn push(&mut self, record: UplinkRecord) {
        if self.records.len() == self.window {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Snapshot in the order the handler expects.
    pub fn to_vec(&self) -> Vec<UplinkRecord> {
        self.records.iter().copied().collect()
    }
}
