//! Closed-loop simulation toolkit for ADR handlers.
//!
//! Provides a deterministic uplink channel generator, the bounded uplink
//! history a network server keeps per device, and a simulated device that
//! applies each ADR decision before its next uplink.

pub mod device;
pub mod history;
pub mod scenario;
