//! Trade recommendation from a detected pattern and a sentiment score.

use super::market::ChartPattern;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Buy,
    Sell,
    Wait,
    Hold,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::Buy => "BUY",
            Action::Sell => "SELL",
            Action::Wait => "WAIT",
            Action::Hold => "HOLD",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    fn from_confidence(confidence: u8) -> Self {
        if confidence > 85 {
            RiskLevel::Low
        } else if confidence > 70 {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub action: Action,
    pub timeframe: &'static str,
    pub reasoning: &'static str,
    /// Confidence in the recommendation, percent
    pub confidence: u8,
    pub risk: RiskLevel,
}

/// Map a pattern, its confidence (percent) and a sentiment in [-1, 1] to an action.
pub fn recommend(
    pattern: ChartPattern,
    pattern_confidence_pct: f64,
    sentiment: f64,
) -> Recommendation {
    let strong_sentiment = sentiment.abs() > 0.6;
    let high_confidence = pattern_confidence_pct > 80.0;

    let (action, timeframe, reasoning, confidence) =
        if pattern.is_bullish() && sentiment > 0.3 && high_confidence {
            (
                Action::Buy,
                "next 2-3 days",
                "Strong bullish pattern with positive sentiment alignment",
                92,
            )
        } else if !pattern.is_bullish() && sentiment < -0.3 && high_confidence {
            (
                Action::Sell,
                "within 24-48 hours",
                "Bearish pattern confirmed by negative sentiment",
                87,
            )
        } else if strong_sentiment && !high_confidence {
            (
                Action::Wait,
                "monitor for 3-5 days",
                "Strong sentiment but uncertain pattern - need confirmation",
                65,
            )
        } else {
            (
                Action::Hold,
                "review in 1 week",
                "Mixed signals - maintain current position",
                72,
            )
        };

    Recommendation {
        action,
        timeframe,
        reasoning,
        confidence,
        risk: RiskLevel::from_confidence(confidence),
    }
}
