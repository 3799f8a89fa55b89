//! Alerting System
//!
//! Keeps a deduplicated set of "live" alerts. An alert stays live for a
//! fixed display window after it was last raised, then expires.

mod manager;

pub use manager::{ActiveAlertSet, ActiveEntry, RaiseOutcome};
