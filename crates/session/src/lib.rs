//! Monitoring Session Registry
//!
//! Owns one DMS engine per active monitoring session:
//! - Session start/stop with alert tallies
//! - Per-user threshold snapshots shared by that user's sessions
//! - Calibration and threshold swaps between frames

mod summary;

pub use summary::{AlertTally, SessionSummary};

use chrono::{DateTime, Utc};
use dms::{
    CalibrationProfile, DetectionOutput, DmsModule, LandmarkFrame, ThresholdConfig,
    ThresholdUpdate,
};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

/// Session identifier
pub type SessionId = Uuid;

/// Session error types
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    #[error("Unknown session: {0}")]
    UnknownSession(SessionId),
}

/// Mutable per-session state, guarded by the session lock
struct SessionInner {
    engine: DmsModule,
    frames_processed: u64,
    tally: AlertTally,
}

struct Session {
    user_id: String,
    started_at: DateTime<Utc>,
    inner: Mutex<SessionInner>,
}

/// Registry of live monitoring sessions
///
/// Frames for one session are serialized by that session's lock; distinct
/// sessions never contend beyond the brief map lookups.
pub struct SessionRegistry {
    sessions: RwLock<HashMap<SessionId, Arc<Session>>>,
    user_thresholds: RwLock<HashMap<String, Arc<ThresholdConfig>>>,
    /// Thresholds for users without a snapshot yet
    defaults: ThresholdConfig,
}

impl SessionRegistry {
    /// Create a registry using built-in threshold defaults
    pub fn new() -> Self {
        Self::with_defaults(ThresholdConfig::default())
    }

    /// Create a registry whose new users start from `defaults`
    pub fn with_defaults(defaults: ThresholdConfig) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            user_thresholds: RwLock::new(HashMap::new()),
            defaults,
        }
    }

    /// Start a session for `user_id` with a fresh engine
    ///
    /// The snapshot is read under the session map's write lock, so a
    /// concurrent `update_thresholds` either lands before the read or finds
    /// the new session when it swaps thresholds into live sessions.
    pub async fn start_session(&self, user_id: &str) -> SessionId {
        let mut sessions = self.sessions.write().await;
        let thresholds = self.snapshot(user_id).await;

        let mut engine = DmsModule::with_shared_thresholds(thresholds);
        engine.reset_state();

        let id = Uuid::new_v4();
        let session = Session {
            user_id: user_id.to_string(),
            started_at: Utc::now(),
            inner: Mutex::new(SessionInner {
                engine,
                frames_processed: 0,
                tally: AlertTally::default(),
            }),
        };

        sessions.insert(id, Arc::new(session));
        drop(sessions);

        info!("Session {} started for user {}", id, user_id);
        id
    }

    /// Run one frame through the session's engine
    pub async fn process_frame(
        &self,
        session_id: SessionId,
        frame: &LandmarkFrame,
    ) -> Result<DetectionOutput, SessionError> {
        let session = self.session(session_id).await?;
        let mut inner = session.inner.lock().await;

        let output = inner.engine.process_frame(frame);
        inner.frames_processed += 1;
        inner.tally.record(&output);

        Ok(output)
    }

    /// Apply a calibration baseline to a session
    pub async fn calibrate(
        &self,
        session_id: SessionId,
        profile: CalibrationProfile,
    ) -> Result<(), SessionError> {
        let session = self.session(session_id).await?;
        session.inner.lock().await.engine.calibrate(profile);
        Ok(())
    }

    /// Current threshold snapshot for a user
    pub async fn thresholds(&self, user_id: &str) -> ThresholdConfig {
        self.snapshot(user_id).await.as_ref().clone()
    }

    /// Partially update a user's thresholds and swap them into the user's live sessions
    pub async fn update_thresholds(
        &self,
        user_id: &str,
        update: &ThresholdUpdate,
    ) -> ThresholdConfig {
        let updated = {
            let mut users = self.user_thresholds.write().await;
            let current = users
                .get(user_id)
                .map(|t| t.as_ref().clone())
                .unwrap_or_else(|| self.defaults.clone());
            let updated = Arc::new(current.apply(update));
            users.insert(user_id.to_string(), Arc::clone(&updated));
            updated
        };

        let live: Vec<Arc<Session>> = self
            .sessions
            .read()
            .await
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();

        for session in &live {
            session
                .inner
                .lock()
                .await
                .engine
                .update_thresholds(Arc::clone(&updated));
        }

        debug!("Thresholds updated for user {} ({} live session(s))", user_id, live.len());
        updated.as_ref().clone()
    }

    /// End a session and return its summary
    pub async fn stop_session(
        &self,
        session_id: SessionId,
    ) -> Result<SessionSummary, SessionError> {
        let session = self
            .sessions
            .write()
            .await
            .remove(&session_id)
            .ok_or(SessionError::UnknownSession(session_id))?;

        let inner = session.inner.lock().await;
        let summary = SessionSummary::new(
            session_id,
            session.user_id.clone(),
            session.started_at,
            Utc::now(),
            inner.frames_processed,
            inner.tally,
        );

        info!(
            "Session {} stopped: {} frames, {} alerts in {}s",
            session_id, summary.frames_processed, summary.total_alerts, summary.duration_secs
        );
        Ok(summary)
    }

    /// Number of live sessions
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Whether a session is live
    pub async fn contains(&self, session_id: SessionId) -> bool {
        self.sessions.read().await.contains_key(&session_id)
    }

    async fn session(&self, session_id: SessionId) -> Result<Arc<Session>, SessionError> {
        self.sessions
            .read()
            .await
            .get(&session_id)
            .cloned()
            .ok_or(SessionError::UnknownSession(session_id))
    }

    /// The user's snapshot, created from defaults on first use
    async fn snapshot(&self, user_id: &str) -> Arc<ThresholdConfig> {
        if let Some(thresholds) = self.user_thresholds.read().await.get(user_id) {
            return Arc::clone(thresholds);
        }

        let mut users = self.user_thresholds.write().await;
        Arc::clone(
            users
                .entry(user_id.to_string())
                .or_insert_with(|| Arc::new(self.defaults.clone())),
        )
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
