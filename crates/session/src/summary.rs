//! Session alert tallies and summaries

use chrono::{DateTime, Utc};
use dms::{AlertCategory, DetectionOutput};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fresh alerts raised during a session, by category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertTally {
    pub total: u64,
    pub drowsiness: u64,
    pub distraction: u64,
}

impl AlertTally {
    /// Count the fresh alerts of one frame
    ///
    /// Carried-over alerts were counted on the frame that raised them.
    pub fn record(&mut self, output: &DetectionOutput) {
        for alert in output.fresh_alerts() {
            self.total += 1;
            match alert.kind.category() {
                AlertCategory::Drowsiness => self.drowsiness += 1,
                AlertCategory::Distraction => self.distraction += 1,
            }
        }
    }
}

/// Summary returned when a session stops
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub user_id: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub duration_secs: i64,
    pub frames_processed: u64,
    pub total_alerts: u64,
    pub drowsiness_alerts: u64,
    pub distraction_alerts: u64,
}

impl SessionSummary {
    pub fn new(
        session_id: Uuid,
        user_id: String,
        started_at: DateTime<Utc>,
        ended_at: DateTime<Utc>,
        frames_processed: u64,
        tally: AlertTally,
    ) -> Self {
        Self {
            session_id,
            user_id,
            started_at,
            ended_at,
            duration_secs: (ended_at - started_at).num_seconds(),
            frames_processed,
            total_alerts: tally.total,
            drowsiness_alerts: tally.drowsiness,
            distraction_alerts: tally.distraction,
        }
    }
}
