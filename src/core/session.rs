//! Session records produced when a recording stops.
//!
//! The JSON layout matches the persisted session collection: camelCase keys,
//! millisecond timestamps and the nested `insights` block.

use crate::capture::types::{EmotionChannel, EmotionSample};
use crate::core::aggregate::{aggregate, AggregateError, Insights};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A completed recording that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSession {
    /// Recording start, ms epoch
    pub timestamp: i64,
    /// Recording length in seconds
    pub duration: f64,
    pub dominant_emotion: EmotionChannel,
    pub average_confidence: f64,
    /// Samples in chronological order, never empty
    pub emotion_data: Vec<EmotionSample>,
    pub insights: Insights,
}

impl NewSession {
    /// Aggregate a finished recording.
    ///
    /// `started_at` and `stopped_at` are ms epoch. The caller owns the
    /// buffer check: an empty buffer is an error, not a zero session.
    pub fn from_recording(
        started_at: i64,
        stopped_at: i64,
        samples: Vec<EmotionSample>,
    ) -> Result<Self, AggregateError> {
        let summary = aggregate(&samples)?;
        Ok(Self {
            timestamp: started_at,
            duration: (stopped_at - started_at).max(0) as f64 / 1000.0,
            dominant_emotion: summary.dominant_emotion,
            average_confidence: summary.average_confidence,
            emotion_data: samples,
            insights: summary.insights,
        })
    }

    /// Attach a store-assigned id.
    pub fn with_id(self, id: String) -> EmotionSession {
        EmotionSession {
            id,
            timestamp: self.timestamp,
            duration: self.duration,
            dominant_emotion: self.dominant_emotion,
            average_confidence: self.average_confidence,
            emotion_data: self.emotion_data,
            insights: self.insights,
        }
    }
}

/// A persisted session. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionSession {
    pub id: String,
    pub timestamp: i64,
    pub duration: f64,
    pub dominant_emotion: EmotionChannel,
    pub average_confidence: f64,
    pub emotion_data: Vec<EmotionSample>,
    pub insights: Insights,
}

impl EmotionSession {
    /// Session start as a UTC datetime.
    pub fn started_at(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.timestamp)
            .single()
            .unwrap_or_default()
    }

    pub fn sample_count(&self) -> usize {
        self.emotion_data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::types::EmotionVector;

    #[test]
    fn test_from_recording_computes_duration() {
        let samples = vec![EmotionSample::new(
            1_500,
            EmotionVector::from_values([0.5, 0.0, 0.0, 0.0, 0.2, 0.0, 0.0]),
            0.9,
        )];
        let session = NewSession::from_recording(1_000, 4_250, samples).unwrap();

        assert_eq!(session.timestamp, 1_000);
        assert!((session.duration - 3.25).abs() < 1e-12);
        assert_eq!(session.dominant_emotion, EmotionChannel::Happy);
    }

    #[test]
    fn test_from_recording_rejects_empty_buffer() {
        let result = NewSession::from_recording(1_000, 2_000, Vec::new());
        assert_eq!(result, Err(AggregateError::EmptySamples));
    }

    #[test]
    fn test_session_json_keys() {
        let samples = vec![EmotionSample::new(
            10,
            EmotionVector::from_values([0.1, 0.0, 0.0, 0.0, 0.6, 0.0, 0.0]),
            0.95,
        )];
        let session = NewSession::from_recording(0, 500, samples)
            .unwrap()
            .with_id("session-1".to_string());
        let json = serde_json::to_value(&session).unwrap();

        assert_eq!(json["id"], "session-1");
        assert_eq!(json["dominantEmotion"], "neutral");
        assert_eq!(json["averageConfidence"], 0.95);
        assert_eq!(json["emotionData"][0]["timestamp"], 10);
        assert!(json["insights"]["avgEmotions"].is_object());
    }
}
