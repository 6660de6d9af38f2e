//! Market-facing analysis types.
//!
//! Pattern names and asset symbols are closed sets. Unknown strings are
//! rejected at parse time instead of falling back to a default entry.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Chart patterns the detector can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartPattern {
    HeadAndShoulders,
    DoubleTop,
    DoubleBottom,
    Triangle,
    CupAndHandle,
    Flag,
    Pennant,
    BullFlag,
    AscendingTriangle,
}

impl ChartPattern {
    pub const ALL: [ChartPattern; 9] = [
        ChartPattern::HeadAndShoulders,
        ChartPattern::DoubleTop,
        ChartPattern::DoubleBottom,
        ChartPattern::Triangle,
        ChartPattern::CupAndHandle,
        ChartPattern::Flag,
        ChartPattern::Pennant,
        ChartPattern::BullFlag,
        ChartPattern::AscendingTriangle,
    ];

    /// The patterns the synthetic detector draws from.
    pub const DETECTABLE: [ChartPattern; 7] = [
        ChartPattern::HeadAndShoulders,
        ChartPattern::DoubleTop,
        ChartPattern::DoubleBottom,
        ChartPattern::Triangle,
        ChartPattern::CupAndHandle,
        ChartPattern::Flag,
        ChartPattern::Pennant,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            ChartPattern::HeadAndShoulders => "Head & Shoulders",
            ChartPattern::DoubleTop => "Double Top",
            ChartPattern::DoubleBottom => "Double Bottom",
            ChartPattern::Triangle => "Triangle",
            ChartPattern::CupAndHandle => "Cup & Handle",
            ChartPattern::Flag => "Flag",
            ChartPattern::Pennant => "Pennant",
            ChartPattern::BullFlag => "Bull Flag",
            ChartPattern::AscendingTriangle => "Ascending Triangle",
        }
    }

    /// Patterns the recommendation engine treats as bullish continuation or reversal.
    pub fn is_bullish(&self) -> bool {
        matches!(
            self,
            ChartPattern::BullFlag
                | ChartPattern::CupAndHandle
                | ChartPattern::AscendingTriangle
                | ChartPattern::DoubleBottom
        )
    }
}

impl fmt::Display for ChartPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown chart pattern: {0:?}")]
pub struct UnknownPattern(pub String);

impl FromStr for ChartPattern {
    type Err = UnknownPattern;

    /// Accepts display names ("Cup & Handle"), "and" spellings and snake_case keys.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize_pattern_key(s);
        ChartPattern::ALL
            .into_iter()
            .find(|p| normalize_pattern_key(p.display_name()) == key)
            .ok_or_else(|| UnknownPattern(s.to_string()))
    }
}

fn normalize_pattern_key(s: &str) -> String {
    s.to_lowercase()
        .replace('&', "and")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

/// Assets with market data available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AssetSymbol {
    Aapl,
    Tsla,
    Nvda,
    Msft,
    Btc,
    Eth,
}

impl AssetSymbol {
    pub const ALL: [AssetSymbol; 6] = [
        AssetSymbol::Aapl,
        AssetSymbol::Tsla,
        AssetSymbol::Nvda,
        AssetSymbol::Msft,
        AssetSymbol::Btc,
        AssetSymbol::Eth,
    ];

    pub fn ticker(&self) -> &'static str {
        match self {
            AssetSymbol::Aapl => "AAPL",
            AssetSymbol::Tsla => "TSLA",
            AssetSymbol::Nvda => "NVDA",
            AssetSymbol::Msft => "MSFT",
            AssetSymbol::Btc => "BTC",
            AssetSymbol::Eth => "ETH",
        }
    }
}

impl fmt::Display for AssetSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.ticker())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown asset symbol: {0:?}")]
pub struct UnknownAsset(pub String);

impl FromStr for AssetSymbol {
    type Err = UnknownAsset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ticker = s.trim().to_uppercase();
        AssetSymbol::ALL
            .into_iter()
            .find(|a| a.ticker() == ticker)
            .ok_or_else(|| UnknownAsset(s.to_string()))
    }
}

/// Market direction implied by a sentiment score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bullishness {
    Bullish,
    Bearish,
    Neutral,
}

impl Bullishness {
    /// Label a sentiment in [-1, 1] with a dead band of +/-0.1.
    pub fn from_sentiment(sentiment: f64) -> Self {
        if sentiment > 0.1 {
            Bullishness::Bullish
        } else if sentiment < -0.1 {
            Bullishness::Bearish
        } else {
            Bullishness::Neutral
        }
    }
}

impl fmt::Display for Bullishness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Bullishness::Bullish => "bullish",
            Bullishness::Bearish => "bearish",
            Bullishness::Neutral => "neutral",
        })
    }
}

/// Result of a pattern detection run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternDetection {
    pub asset: AssetSymbol,
    pub pattern: ChartPattern,
    /// Confidence in [0, 1]
    pub confidence: f64,
    /// Sentiment in [-1, 1]
    pub sentiment: f64,
    pub label: Bullishness,
}

impl PatternDetection {
    /// One-line summary of the detection.
    pub fn insight(&self) -> String {
        format!(
            "{} pattern detected with {:.1}% confidence. Market sentiment appears {}.",
            self.pattern,
            self.confidence * 100.0,
            self.label
        )
    }
}

/// Label for a single headline's sentiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    /// Label a sentiment in [-1, 1] with a dead band of +/-0.2.
    pub fn from_score(score: f64) -> Self {
        if score > 0.2 {
            SentimentLabel::Positive
        } else if score < -0.2 {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadlineSentiment {
    pub text: String,
    pub sentiment: f64,
    pub confidence: f64,
    pub label: SentimentLabel,
}

/// Aggregate sentiment over a batch of headlines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentReading {
    /// Mean headline sentiment, 0 when there are no headlines
    pub overall: f64,
    pub headlines: Vec<HeadlineSentiment>,
}
