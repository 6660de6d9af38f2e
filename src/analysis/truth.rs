//! Truth meter: agreement between headline and facial sentiment.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TruthRating {
    High,
    Moderate,
    Low,
}

impl TruthRating {
    pub fn from_score(score: f64) -> Self {
        if score > 0.8 {
            TruthRating::High
        } else if score > 0.6 {
            TruthRating::Moderate
        } else {
            TruthRating::Low
        }
    }

    /// Guidance shown next to the rating.
    pub fn advice(&self) -> &'static str {
        match self {
            TruthRating::High => {
                "High alignment between written sentiment and visual expressions suggests authentic reporting."
            }
            TruthRating::Moderate => {
                "Moderate discrepancy detected. Consider multiple sources for validation."
            }
            TruthRating::Low => {
                "Significant inconsistency between text and facial expressions. Exercise caution with this analysis."
            }
        }
    }
}

impl fmt::Display for TruthRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TruthRating::High => "High Truth",
            TruthRating::Moderate => "Moderate Truth",
            TruthRating::Low => "Low Truth",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TruthReport {
    pub headline_sentiment: f64,
    pub facial_sentiment: f64,
    pub consistency_score: f64,
    pub discrepancy_notes: String,
    pub truth_rating: TruthRating,
}

/// `max(0, 1 - |a - b|)`.
pub fn consistency_score(headline: f64, facial: f64) -> f64 {
    (1.0 - (headline - facial).abs()).max(0.0)
}

pub fn truth_report(headline: f64, facial: f64) -> TruthReport {
    let difference = (headline - facial).abs();
    let score = consistency_score(headline, facial);

    let notes = if difference > 0.5 {
        if headline > facial {
            "Headlines appear more positive than facial expressions suggest"
        } else {
            "Facial expressions appear more positive than headline sentiment"
        }
    } else if difference > 0.3 {
        "Moderate inconsistency detected between text and visual sentiment"
    } else {
        "Good alignment between headline and facial sentiment"
    };

    TruthReport {
        headline_sentiment: headline,
        facial_sentiment: facial,
        consistency_score: score,
        discrepancy_notes: notes.to_string(),
        truth_rating: TruthRating::from_score(score),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consistency_score_floor() {
        assert_eq!(consistency_score(0.5, 0.5), 1.0);
        assert!((consistency_score(0.2, 0.6) - 0.6).abs() < 1e-12);
        assert_eq!(consistency_score(-1.0, 1.0), 0.0);
    }

    #[test]
    fn test_truth_report_directional_notes() {
        let report = truth_report(0.9, 0.1);
        assert!(report.discrepancy_notes.starts_with("Headlines appear more positive"));
        assert_eq!(report.truth_rating, TruthRating::Low);

        let report = truth_report(-0.4, 0.3);
        assert!(report.discrepancy_notes.starts_with("Facial expressions"));
    }

    #[test]
    fn test_truth_report_alignment() {
        let report = truth_report(0.3, 0.25);
        assert_eq!(report.truth_rating, TruthRating::High);
        assert!(report.discrepancy_notes.starts_with("Good alignment"));

        let report = truth_report(0.0, 0.35);
        assert_eq!(report.truth_rating, TruthRating::Moderate);
        assert!(report.discrepancy_notes.starts_with("Moderate inconsistency"));
    }
}
