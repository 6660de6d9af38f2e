//! Analysis interfaces.
//!
//! Every score the product shows comes from one of these traits. The recorder,
//! store and timeline only depend on the traits, so the synthetic generators
//! can be swapped for real models without touching them.

pub mod insight;
pub mod market;
pub mod synthetic;
pub mod truth;

use crate::capture::types::EmotionVector;

pub use insight::{recommend, Action, Recommendation, RiskLevel};
pub use market::{
    AssetSymbol, Bullishness, ChartPattern, HeadlineSentiment, PatternDetection, SentimentLabel,
    SentimentReading, UnknownAsset, UnknownPattern,
};
pub use synthetic::{SyntheticEmotionDetector, SyntheticPatternDetector, SyntheticSentimentScorer};
pub use truth::{consistency_score, truth_report, TruthRating, TruthReport};

/// Facial emotion classifier.
pub trait EmotionDetector {
    /// Classify the current frame into per-channel intensities and a confidence.
    fn detect_emotion(&mut self) -> (EmotionVector, f64);
}

/// Chart pattern classifier.
pub trait PatternDetector {
    fn detect_pattern(&mut self, asset: AssetSymbol) -> PatternDetection;
}

/// Headline sentiment model.
pub trait SentimentScorer {
    fn score_sentiment(&mut self, headlines: &[String]) -> SentimentReading;
}

impl<T: EmotionDetector + ?Sized> EmotionDetector for Box<T> {
    fn detect_emotion(&mut self) -> (EmotionVector, f64) {
        (**self).detect_emotion()
    }
}
