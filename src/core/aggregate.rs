//! Session aggregation.
//!
//! Reduces a recorded sample buffer into per-channel averages, a dominant
//! emotion, the mean confidence and the significant peak of each channel.

use crate::capture::types::{EmotionChannel, EmotionSample, EmotionVector};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use thiserror::Error;

/// A channel peak is reported only when it strictly exceeds this intensity.
pub const PEAK_THRESHOLD: f64 = 0.3;

/// The highest reading of one channel within a sample sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionPeak {
    pub emotion: EmotionChannel,
    pub value: f64,
    /// Timestamp (ms epoch) of the sample holding the peak
    pub timestamp: i64,
}

/// Insights block persisted with each session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insights {
    pub peaks: Vec<EmotionPeak>,
    pub avg_emotions: EmotionVector,
}

/// Everything the aggregator derives from a sample sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub dominant_emotion: EmotionChannel,
    pub average_confidence: f64,
    pub insights: Insights,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregateError {
    #[error("cannot aggregate an empty sample sequence")]
    EmptySamples,
}

/// Aggregate a non-empty sample sequence.
pub fn aggregate(samples: &[EmotionSample]) -> Result<SessionSummary, AggregateError> {
    if samples.is_empty() {
        return Err(AggregateError::EmptySamples);
    }

    let avg_emotions = average_emotions(samples);
    let average_confidence = samples.iter().map(|s| s.confidence).mean();

    Ok(SessionSummary {
        dominant_emotion: avg_emotions.dominant(),
        average_confidence,
        insights: Insights {
            peaks: find_peaks(samples),
            avg_emotions,
        },
    })
}

/// Mean of each channel over the samples. Channels are averaged
/// independently; the result is not normalized.
fn average_emotions(samples: &[EmotionSample]) -> EmotionVector {
    let mut avg = EmotionVector::default();
    for channel in EmotionChannel::ALL {
        avg.set(channel, samples.iter().map(|s| s.emotions.get(channel)).mean());
    }
    avg
}

/// Peak of every channel whose maximum exceeds [`PEAK_THRESHOLD`], in
/// channel order. The earliest sample wins when a maximum repeats.
fn find_peaks(samples: &[EmotionSample]) -> Vec<EmotionPeak> {
    EmotionChannel::ALL
        .into_iter()
        .filter_map(|channel| {
            let mut best: Option<&EmotionSample> = None;
            for sample in samples {
                let value = sample.emotions.get(channel);
                if best.map_or(true, |b| value > b.emotions.get(channel)) {
                    best = Some(sample);
                }
            }
            best.map(|s| EmotionPeak {
                emotion: channel,
                value: s.emotions.get(channel),
                timestamp: s.timestamp,
            })
        })
        .filter(|peak| peak.value > PEAK_THRESHOLD)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(timestamp: i64, values: [f64; 7], confidence: f64) -> EmotionSample {
        EmotionSample::new(timestamp, EmotionVector::from_values(values), confidence)
    }

    #[test]
    fn test_aggregate_empty_is_error() {
        assert_eq!(aggregate(&[]), Err(AggregateError::EmptySamples));
    }

    #[test]
    fn test_averages_are_not_normalized() {
        let samples = vec![
            sample(0, [0.8, 0.8, 0.8, 0.8, 0.8, 0.8, 0.8], 1.0),
            sample(500, [0.6, 0.6, 0.6, 0.6, 0.6, 0.6, 0.6], 0.8),
        ];
        let summary = aggregate(&samples).unwrap();
        let total: f64 = summary.insights.avg_emotions.iter().map(|(_, v)| v).sum();

        assert!((total - 4.9).abs() < 1e-9);
        assert!((summary.average_confidence - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_dominant_is_strict_maximum() {
        let samples = vec![
            sample(0, [0.1, 0.2, 0.0, 0.7, 0.3, 0.0, 0.0], 0.9),
            sample(500, [0.2, 0.1, 0.0, 0.5, 0.4, 0.0, 0.0], 0.9),
        ];
        let summary = aggregate(&samples).unwrap();
        assert_eq!(summary.dominant_emotion, EmotionChannel::Surprised);
    }

    #[test]
    fn test_single_peak_above_threshold() {
        let samples = vec![
            sample(100, [0.1, 0.0, 0.0, 0.0, 0.3, 0.0, 0.0], 0.9),
            sample(600, [0.2, 0.0, 0.31, 0.0, 0.2, 0.0, 0.0], 0.9),
            sample(1100, [0.0, 0.0, 0.1, 0.0, 0.1, 0.0, 0.0], 0.9),
        ];
        let summary = aggregate(&samples).unwrap();

        assert_eq!(
            summary.insights.peaks,
            vec![EmotionPeak {
                emotion: EmotionChannel::Angry,
                value: 0.31,
                timestamp: 600,
            }]
        );
    }

    #[test]
    fn test_peak_ties_keep_earliest_sample() {
        let samples = vec![
            sample(100, [0.5, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0], 0.9),
            sample(600, [0.5, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0], 0.9),
        ];
        let summary = aggregate(&samples).unwrap();
        assert_eq!(summary.insights.peaks.len(), 1);
        assert_eq!(summary.insights.peaks[0].timestamp, 100);
    }

    #[test]
    fn test_insights_json_shape() {
        let samples = vec![sample(100, [0.9, 0.0, 0.0, 0.0, 0.1, 0.0, 0.0], 0.9)];
        let summary = aggregate(&samples).unwrap();
        let json = serde_json::to_value(&summary.insights).unwrap();

        assert_eq!(json["peaks"][0]["emotion"], "happy");
        assert_eq!(json["peaks"][0]["timestamp"], 100);
        assert_eq!(json["avgEmotions"]["happy"], 0.9);
    }
}
