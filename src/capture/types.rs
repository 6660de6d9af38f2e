//! Emotion sample types for the Sentivision recorder.
//!
//! A sample holds only classifier scores - never frames, landmarks or any
//! image content from the capture source.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One of the seven fixed emotion channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmotionChannel {
    Happy,
    Sad,
    Angry,
    Surprised,
    Neutral,
    Fear,
    Disgust,
}

impl EmotionChannel {
    /// All channels in their fixed order. Ties anywhere in the crate are
    /// broken by this order.
    pub const ALL: [EmotionChannel; 7] = [
        EmotionChannel::Happy,
        EmotionChannel::Sad,
        EmotionChannel::Angry,
        EmotionChannel::Surprised,
        EmotionChannel::Neutral,
        EmotionChannel::Fear,
        EmotionChannel::Disgust,
    ];

    /// Lower-case name as used in persisted JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            EmotionChannel::Happy => "happy",
            EmotionChannel::Sad => "sad",
            EmotionChannel::Angry => "angry",
            EmotionChannel::Surprised => "surprised",
            EmotionChannel::Neutral => "neutral",
            EmotionChannel::Fear => "fear",
            EmotionChannel::Disgust => "disgust",
        }
    }

    /// Capitalized name as used in CSV headers.
    pub fn title(&self) -> &'static str {
        match self {
            EmotionChannel::Happy => "Happy",
            EmotionChannel::Sad => "Sad",
            EmotionChannel::Angry => "Angry",
            EmotionChannel::Surprised => "Surprised",
            EmotionChannel::Neutral => "Neutral",
            EmotionChannel::Fear => "Fear",
            EmotionChannel::Disgust => "Disgust",
        }
    }
}

impl fmt::Display for EmotionChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name one of the seven channels.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown emotion channel: {0:?}")]
pub struct UnknownChannel(pub String);

impl FromStr for EmotionChannel {
    type Err = UnknownChannel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        EmotionChannel::ALL
            .into_iter()
            .find(|c| c.as_str() == name)
            .ok_or_else(|| UnknownChannel(s.to_string()))
    }
}

/// Intensity per channel, each in [0, 1].
///
/// Channels are independent intensities, not a probability distribution:
/// nothing here normalizes them to sum to one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EmotionVector {
    pub happy: f64,
    pub sad: f64,
    pub angry: f64,
    pub surprised: f64,
    pub neutral: f64,
    pub fear: f64,
    pub disgust: f64,
}

impl EmotionVector {
    /// Build a vector from values in channel order, clamping each into [0, 1].
    pub fn from_values(values: [f64; 7]) -> Self {
        let mut vector = Self::default();
        for (channel, value) in EmotionChannel::ALL.into_iter().zip(values) {
            vector.set(channel, value);
        }
        vector
    }

    pub fn get(&self, channel: EmotionChannel) -> f64 {
        match channel {
            EmotionChannel::Happy => self.happy,
            EmotionChannel::Sad => self.sad,
            EmotionChannel::Angry => self.angry,
            EmotionChannel::Surprised => self.surprised,
            EmotionChannel::Neutral => self.neutral,
            EmotionChannel::Fear => self.fear,
            EmotionChannel::Disgust => self.disgust,
        }
    }

    /// Set one channel, clamping into [0, 1].
    pub fn set(&mut self, channel: EmotionChannel, value: f64) {
        let value = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
        let slot = match channel {
            EmotionChannel::Happy => &mut self.happy,
            EmotionChannel::Sad => &mut self.sad,
            EmotionChannel::Angry => &mut self.angry,
            EmotionChannel::Surprised => &mut self.surprised,
            EmotionChannel::Neutral => &mut self.neutral,
            EmotionChannel::Fear => &mut self.fear,
            EmotionChannel::Disgust => &mut self.disgust,
        };
        *slot = value;
    }

    /// Iterate `(channel, value)` pairs in fixed channel order.
    pub fn iter(&self) -> impl Iterator<Item = (EmotionChannel, f64)> + '_ {
        EmotionChannel::ALL.into_iter().map(move |c| (c, self.get(c)))
    }

    /// The channel with the highest value; first channel wins ties.
    pub fn dominant(&self) -> EmotionChannel {
        let mut best = EmotionChannel::Happy;
        let mut best_value = f64::NEG_INFINITY;
        for (channel, value) in self.iter() {
            if value > best_value {
                best = channel;
                best_value = value;
            }
        }
        best
    }
}

/// A single classifier reading taken on one sampler tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionSample {
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    /// Per-channel intensities
    pub emotions: EmotionVector,
    /// Classifier confidence in [0, 1]
    pub confidence: f64,
}

impl EmotionSample {
    pub fn new(timestamp: i64, emotions: EmotionVector, confidence: f64) -> Self {
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        Self {
            timestamp,
            emotions,
            confidence,
        }
    }

    /// Sample timestamp as a UTC datetime, `None` when out of chrono's range.
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.timestamp).single()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_parsing() {
        assert_eq!("happy".parse::<EmotionChannel>(), Ok(EmotionChannel::Happy));
        assert_eq!(" Disgust ".parse::<EmotionChannel>(), Ok(EmotionChannel::Disgust));
        assert!("joy".parse::<EmotionChannel>().is_err());
    }

    #[test]
    fn test_vector_clamps_values() {
        let v = EmotionVector::from_values([1.5, -0.2, 0.3, 0.0, 0.0, f64::NAN, 0.1]);
        assert_eq!(v.happy, 1.0);
        assert_eq!(v.sad, 0.0);
        assert_eq!(v.fear, 0.0);
        assert_eq!(v.disgust, 0.1);
    }

    #[test]
    fn test_dominant_breaks_ties_by_channel_order() {
        let v = EmotionVector::from_values([0.4, 0.1, 0.0, 0.0, 0.4, 0.0, 0.0]);
        assert_eq!(v.dominant(), EmotionChannel::Happy);
    }

    #[test]
    fn test_sample_json_shape() {
        let sample = EmotionSample::new(
            1_700_000_000_000,
            EmotionVector::from_values([0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7]),
            0.9,
        );
        let json = serde_json::to_value(&sample).unwrap();
        assert_eq!(json["timestamp"], 1_700_000_000_000i64);
        assert_eq!(json["emotions"]["surprised"], 0.4);
        assert_eq!(json["confidence"], 0.9);
    }

    #[test]
    fn test_datetime_out_of_range_is_none() {
        let sample = EmotionSample::new(i64::MAX, EmotionVector::default(), 0.5);
        assert_eq!(sample.datetime(), None);

        let sample = EmotionSample::new(1_700_000_000_123, EmotionVector::default(), 0.5);
        let dt = sample.datetime().unwrap();
        assert_eq!(dt.timestamp_millis(), 1_700_000_000_123);
    }
}
