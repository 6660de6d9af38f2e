//! Recording state machine.
//!
//! `Idle -> Recording -> Idle`. Samples are buffered only while recording and
//! the buffer is aggregated exactly once, on the transition back to idle.

use crate::capture::types::EmotionSample;
use crate::core::session::NewSession;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    Idle,
    Recording {
        /// ms epoch
        started_at: i64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecorderError {
    #[error("a recording is already in progress")]
    AlreadyRecording,
    #[error("start the capture source before recording")]
    CaptureUnavailable,
}

/// Collects samples for one recording at a time.
#[derive(Debug)]
pub struct SessionRecorder {
    state: RecorderState,
    buffer: Vec<EmotionSample>,
}

impl SessionRecorder {
    pub fn new() -> Self {
        Self {
            state: RecorderState::Idle,
            buffer: Vec::new(),
        }
    }

    pub fn state(&self) -> RecorderState {
        self.state
    }

    pub fn is_recording(&self) -> bool {
        matches!(self.state, RecorderState::Recording { .. })
    }

    /// Begin a new recording at `now` (ms epoch).
    ///
    /// Any samples left from a previous recording are discarded.
    pub fn start(&mut self, now: i64, capture_active: bool) -> Result<(), RecorderError> {
        if self.is_recording() {
            return Err(RecorderError::AlreadyRecording);
        }
        if !capture_active {
            return Err(RecorderError::CaptureUnavailable);
        }

        self.buffer.clear();
        self.state = RecorderState::Recording { started_at: now };
        tracing::info!(started_at = now, "recording started");
        Ok(())
    }

    /// Append a sample. Returns `false` and drops the sample when idle.
    pub fn push(&mut self, sample: EmotionSample) -> bool {
        if !self.is_recording() {
            tracing::debug!(timestamp = sample.timestamp, "dropping sample while idle");
            return false;
        }
        self.buffer.push(sample);
        true
    }

    /// End the recording at `now` (ms epoch).
    ///
    /// Returns the aggregated session, or `None` when idle or when nothing
    /// was captured. The buffer moves into the returned session.
    pub fn stop(&mut self, now: i64) -> Option<NewSession> {
        let RecorderState::Recording { started_at } = self.state else {
            return None;
        };
        self.state = RecorderState::Idle;

        if self.buffer.is_empty() {
            tracing::info!("recording stopped with no samples, nothing to save");
            return None;
        }

        let samples = std::mem::take(&mut self.buffer);
        let count = samples.len();
        match NewSession::from_recording(started_at, now, samples) {
            Ok(session) => {
                tracing::info!(
                    samples = count,
                    duration_secs = session.duration,
                    dominant = %session.dominant_emotion,
                    "recording stopped"
                );
                Some(session)
            }
            Err(e) => {
                tracing::error!("failed to aggregate recording: {e}");
                None
            }
        }
    }

    /// Samples captured so far in the current recording.
    pub fn buffer(&self) -> &[EmotionSample] {
        &self.buffer
    }

    /// Start of the current recording, if any.
    pub fn started_at(&self) -> Option<i64> {
        match self.state {
            RecorderState::Recording { started_at } => Some(started_at),
            RecorderState::Idle => None,
        }
    }
}

impl Default for SessionRecorder {
    fn default() -> Self {
        Self::new()
    }
}
