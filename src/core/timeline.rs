//! Chart-ready timeline series.
//!
//! A pure transform over a sample sequence: it works the same on the live
//! buffer and on a stored session's samples.

use crate::capture::types::{EmotionChannel, EmotionSample, EmotionVector};
use crate::core::aggregate::{aggregate, SessionSummary};
use serde::Serialize;

/// Spacing assumed between samples when no start time is known.
const FALLBACK_SPACING_SECS: f64 = 0.5;

/// One charted point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelinePoint {
    /// Seconds since the start of the recording
    pub time_secs: f64,
    pub emotions: EmotionVector,
    /// Confidence scaled to percent
    pub confidence_pct: f64,
}

#[derive(Debug, Clone)]
pub struct Timeline {
    pub points: Vec<TimelinePoint>,
    /// Aggregate insights, absent for an empty sequence
    pub summary: Option<SessionSummary>,
}

impl Timeline {
    /// `(time, intensity)` pairs for one channel.
    pub fn series(&self, channel: EmotionChannel) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .map(|p| (p.time_secs, p.emotions.get(channel)))
            .collect()
    }

    /// `(time, confidence %)` pairs.
    pub fn confidence_series(&self) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .map(|p| (p.time_secs, p.confidence_pct))
            .collect()
    }

    /// Time of the last point, 0 when empty.
    pub fn span_secs(&self) -> f64 {
        self.points.last().map(|p| p.time_secs).unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Build a timeline. With `start` (ms epoch) times are measured from it;
/// without, samples are spaced half a second apart by index.
pub fn build_timeline(samples: &[EmotionSample], start: Option<i64>) -> Timeline {
    let points = samples
        .iter()
        .enumerate()
        .map(|(index, sample)| TimelinePoint {
            time_secs: match start {
                Some(start) => (sample.timestamp - start) as f64 / 1000.0,
                None => index as f64 * FALLBACK_SPACING_SECS,
            },
            emotions: sample.emotions,
            confidence_pct: sample.confidence * 100.0,
        })
        .collect();

    Timeline {
        points,
        summary: aggregate(samples).ok(),
    }
}

/// Format seconds as `m:ss`.
pub fn format_clock(secs: f64) -> String {
    let total = secs.max(0.0).round() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}
