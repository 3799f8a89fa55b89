//! Driver state tracking across frames

use ring_buffer::RingBuffer;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Closed-eye run length beyond which closure is severe
pub const SEVERE_CLOSURE_FRAMES: u32 = 30;
/// Shortest closed run that counts as a blink
pub const MIN_BLINK_FRAMES: u32 = 2;
/// Blink-rate window (fixed, non-sliding)
pub const BLINK_WINDOW_MS: u64 = 60_000;
/// Retained MAR samples
pub const MAR_HISTORY_LEN: usize = 30;

/// Eye closure level for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EyeClosure {
    #[default]
    Open,
    /// Closed past the configured frame count
    Warning,
    /// Closed past `SEVERE_CLOSURE_FRAMES`
    Severe,
}

/// Result of feeding one frame's eye state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EyeObservation {
    pub closure: EyeClosure,
    /// A closed run just ended and counted as a blink
    pub blink: bool,
}

/// Driver state (tracked over time, one per monitoring session)
#[derive(Debug, Clone)]
pub struct DriverState {
    /// Consecutive closed-eye frames
    pub eye_closure_frames: u32,

    /// Blinks in the current window
    pub blink_count: u32,

    /// Start of the current blink window (set by the first face frame)
    pub blink_window_start_ms: Option<u64>,

    /// Open-mouth frames since the last yawn alert
    pub yawn_frames: u32,

    /// Recent mouth aspect ratios
    pub mar_history: RingBuffer<f64>,
}

impl Default for DriverState {
    fn default() -> Self {
        Self {
            eye_closure_frames: 0,
            blink_count: 0,
            blink_window_start_ms: None,
            yawn_frames: 0,
            mar_history: RingBuffer::new(MAR_HISTORY_LEN),
        }
    }
}

impl DriverState {
    /// Feed whether the eyes are closed this frame
    ///
    /// While closed the run grows; closure is reported once the run is
    /// strictly longer than `closed_frames_threshold` (warning) or
    /// `SEVERE_CLOSURE_FRAMES` (severe). When the eyes open, a run of
    /// `[MIN_BLINK_FRAMES, closed_frames_threshold)` counts as a blink.
    pub fn observe_eyes(&mut self, closed: bool, closed_frames_threshold: u32) -> EyeObservation {
        if closed {
            self.eye_closure_frames = self.eye_closure_frames.saturating_add(1);

            let closure = if self.eye_closure_frames > SEVERE_CLOSURE_FRAMES {
                EyeClosure::Severe
            } else if self.eye_closure_frames > closed_frames_threshold {
                EyeClosure::Warning
            } else {
                EyeClosure::Open
            };
            return EyeObservation { closure, blink: false };
        }

        let run = self.eye_closure_frames;
        self.eye_closure_frames = 0;

        let blink = (MIN_BLINK_FRAMES..closed_frames_threshold).contains(&run);
        if blink {
            self.blink_count = self.blink_count.saturating_add(1);
        }
        EyeObservation {
            closure: EyeClosure::Open,
            blink,
        }
    }

    /// Advance the blink window to `now_ms`
    ///
    /// Returns the finished window's blink count once more than
    /// `BLINK_WINDOW_MS` has passed, then starts a new window.
    pub fn roll_blink_window(&mut self, now_ms: u64) -> Option<u32> {
        let start = *self.blink_window_start_ms.get_or_insert(now_ms);
        if now_ms.saturating_sub(start) <= BLINK_WINDOW_MS {
            return None;
        }

        let blinks = self.blink_count;
        debug!("Blink window closed with {} blink(s)", blinks);
        self.blink_count = 0;
        self.blink_window_start_ms = Some(now_ms);
        Some(blinks)
    }

    /// Feed this frame's MAR; returns true when a yawn is confirmed
    ///
    /// The open-mouth counter only resets when a yawn fires, so a long yawn
    /// re-triggers every `yawn_frames_threshold + 1` frames.
    pub fn observe_mouth(
        &mut self,
        mar: f64,
        mar_threshold: f64,
        yawn_frames_threshold: u32,
    ) -> bool {
        self.mar_history.push(mar);

        if mar > mar_threshold {
            self.yawn_frames = self.yawn_frames.saturating_add(1);
        }
        if self.yawn_frames > yawn_frames_threshold {
            self.yawn_frames = 0;
            return true;
        }
        false
    }

    /// Mean of the recent MAR history
    pub fn mar_mean(&self) -> Option<f64> {
        self.mar_history.mean()
    }

    /// Reset state (on session start)
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
