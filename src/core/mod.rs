//! Core functionality for Sentivision.
//!
//! This module contains:
//! - The recording state machine and its sample buffer
//! - Session aggregation into averages, dominant emotion and peaks
//! - Session records
//! - Timeline series for charting

pub mod aggregate;
pub mod recorder;
pub mod session;
pub mod timeline;

// Re-export commonly used types
pub use aggregate::{
    aggregate, AggregateError, EmotionPeak, Insights, SessionSummary, PEAK_THRESHOLD,
};
pub use recorder::{RecorderError, RecorderState, SessionRecorder};
pub use session::{EmotionSession, NewSession};
pub use timeline::{build_timeline, format_clock, Timeline, TimelinePoint};
