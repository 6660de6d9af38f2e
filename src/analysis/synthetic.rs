//! Random stand-ins for the emotion, pattern and sentiment models.

use super::market::{
    AssetSymbol, Bullishness, ChartPattern, HeadlineSentiment, PatternDetection, SentimentLabel,
    SentimentReading,
};
use super::{EmotionDetector, PatternDetector, SentimentScorer};
use crate::capture::types::{EmotionChannel, EmotionVector};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Upper bound of each channel's synthetic intensity.
const CHANNEL_CEILINGS: [(EmotionChannel, f64); 7] = [
    (EmotionChannel::Happy, 0.8),
    (EmotionChannel::Sad, 0.3),
    (EmotionChannel::Angry, 0.2),
    (EmotionChannel::Surprised, 0.4),
    (EmotionChannel::Neutral, 0.6),
    (EmotionChannel::Fear, 0.1),
    (EmotionChannel::Disgust, 0.1),
];

/// Emits uniformly random channel intensities with high confidence.
pub struct SyntheticEmotionDetector {
    rng: StdRng,
}

impl SyntheticEmotionDetector {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic generator for tests and demos.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for SyntheticEmotionDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl EmotionDetector for SyntheticEmotionDetector {
    fn detect_emotion(&mut self) -> (EmotionVector, f64) {
        let mut emotions = EmotionVector::default();
        for (channel, ceiling) in CHANNEL_CEILINGS {
            emotions.set(channel, self.rng.gen::<f64>() * ceiling);
        }
        let confidence = 0.85 + self.rng.gen::<f64>() * 0.15;
        (emotions, confidence)
    }
}

/// Picks a random pattern with 60-100% confidence.
pub struct SyntheticPatternDetector {
    rng: StdRng,
}

impl SyntheticPatternDetector {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for SyntheticPatternDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternDetector for SyntheticPatternDetector {
    fn detect_pattern(&mut self, asset: AssetSymbol) -> PatternDetection {
        let pattern = *ChartPattern::DETECTABLE
            .choose(&mut self.rng)
            .unwrap_or(&ChartPattern::Triangle);
        let confidence = self.rng.gen_range(0.6..1.0);
        let sentiment = self.rng.gen_range(-1.0..1.0);

        PatternDetection {
            asset,
            pattern,
            confidence,
            sentiment,
            label: Bullishness::from_sentiment(sentiment),
        }
    }
}

/// Scores each headline with a random sentiment in [-1, 1).
pub struct SyntheticSentimentScorer {
    rng: StdRng,
}

impl SyntheticSentimentScorer {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for SyntheticSentimentScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentScorer for SyntheticSentimentScorer {
    fn score_sentiment(&mut self, headlines: &[String]) -> SentimentReading {
        let scored: Vec<HeadlineSentiment> = headlines
            .iter()
            .map(|text| {
                let sentiment = self.rng.gen_range(-1.0..1.0);
                HeadlineSentiment {
                    text: text.clone(),
                    sentiment,
                    confidence: self.rng.gen_range(0.7..1.0),
                    label: SentimentLabel::from_score(sentiment),
                }
            })
            .collect();

        let overall = if scored.is_empty() {
            0.0
        } else {
            scored.iter().map(|h| h.sentiment).sum::<f64>() / scored.len() as f64
        };

        SentimentReading {
            overall,
            headlines: scored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emotion_detector_respects_ceilings() {
        let mut detector = SyntheticEmotionDetector::seeded(42);
        for _ in 0..200 {
            let (emotions, confidence) = detector.detect_emotion();
            for (channel, ceiling) in CHANNEL_CEILINGS {
                assert!(emotions.get(channel) <= ceiling);
            }
            assert!((0.85..=1.0).contains(&confidence));
        }
    }

    #[test]
    fn test_seeded_detectors_are_deterministic() {
        let a = SyntheticEmotionDetector::seeded(9).detect_emotion();
        let b = SyntheticEmotionDetector::seeded(9).detect_emotion();
        assert_eq!(a, b);
    }

    #[test]
    fn test_pattern_detection_ranges() {
        let mut detector = SyntheticPatternDetector::seeded(3);
        for _ in 0..50 {
            let detection = detector.detect_pattern(AssetSymbol::Btc);
            assert_eq!(detection.asset, AssetSymbol::Btc);
            assert!(ChartPattern::DETECTABLE.contains(&detection.pattern));
            assert!((0.6..1.0).contains(&detection.confidence));
            assert_eq!(detection.label, Bullishness::from_sentiment(detection.sentiment));
        }
    }

    #[test]
    fn test_sentiment_overall_is_mean() {
        let mut scorer = SyntheticSentimentScorer::seeded(5);
        let headlines = vec!["Fed holds rates".to_string(), "Chip demand surges".to_string()];
        let reading = scorer.score_sentiment(&headlines);

        assert_eq!(reading.headlines.len(), 2);
        let mean = (reading.headlines[0].sentiment + reading.headlines[1].sentiment) / 2.0;
        assert!((reading.overall - mean).abs() < 1e-12);
    }

    #[test]
    fn test_sentiment_empty_batch() {
        let reading = SyntheticSentimentScorer::seeded(5).score_sentiment(&[]);
        assert_eq!(reading.overall, 0.0);
        assert!(reading.headlines.is_empty());
    }
}
