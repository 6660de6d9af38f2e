//! Subscription tiers and capability checks.
//!
//! The active tier travels in an explicit [`TierContext`]; nothing reads a
//! global to decide what a user may do.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionTier {
    Free,
    Pro,
    Enterprise,
}

impl fmt::Display for SubscriptionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SubscriptionTier::Free => "free",
            SubscriptionTier::Pro => "pro",
            SubscriptionTier::Enterprise => "enterprise",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown subscription tier: {0:?}")]
pub struct UnknownTier(pub String);

impl FromStr for SubscriptionTier {
    type Err = UnknownTier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "free" => Ok(SubscriptionTier::Free),
            "pro" => Ok(SubscriptionTier::Pro),
            "enterprise" => Ok(SubscriptionTier::Enterprise),
            _ => Err(UnknownTier(s.to_string())),
        }
    }
}

/// Features that may be gated by tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    RecordSession,
    SessionHistory,
    PatternDetection,
    SentimentScoring,
    CsvExport,
    TimelineInsights,
    TruthMeter,
    Recommendations,
}

impl Capability {
    /// Lowest tier that includes this capability when gating is enforced.
    pub fn minimum_tier(&self) -> SubscriptionTier {
        match self {
            Capability::RecordSession
            | Capability::SessionHistory
            | Capability::PatternDetection
            | Capability::SentimentScoring => SubscriptionTier::Free,
            Capability::CsvExport
            | Capability::TimelineInsights
            | Capability::TruthMeter => SubscriptionTier::Pro,
            Capability::Recommendations => SubscriptionTier::Enterprise,
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Capability::RecordSession => "session recording",
            Capability::SessionHistory => "session history",
            Capability::PatternDetection => "pattern detection",
            Capability::SentimentScoring => "sentiment scoring",
            Capability::CsvExport => "CSV export",
            Capability::TimelineInsights => "timeline insights",
            Capability::TruthMeter => "truth meter",
            Capability::Recommendations => "trade recommendations",
        })
    }
}

/// Whether tier limits apply at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GatingPolicy {
    Enforced,
    #[default]
    Disabled,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown gating policy: {0:?} (expected enforced or disabled)")]
pub struct UnknownPolicy(pub String);

impl FromStr for GatingPolicy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "enforced" => Ok(GatingPolicy::Enforced),
            "disabled" => Ok(GatingPolicy::Disabled),
            _ => Err(UnknownPolicy(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{capability} requires the {required} tier (current: {current})")]
pub struct TierError {
    pub capability: Capability,
    pub required: SubscriptionTier,
    pub current: SubscriptionTier,
}

/// Immutable view of who the user is for capability checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierContext {
    tier: SubscriptionTier,
    policy: GatingPolicy,
}

impl TierContext {
    pub fn new(tier: SubscriptionTier, policy: GatingPolicy) -> Self {
        Self { tier, policy }
    }

    pub fn tier(&self) -> SubscriptionTier {
        self.tier
    }

    pub fn policy(&self) -> GatingPolicy {
        self.policy
    }

    pub fn allows(&self, capability: Capability) -> bool {
        match self.policy {
            GatingPolicy::Disabled => true,
            GatingPolicy::Enforced => self.tier >= capability.minimum_tier(),
        }
    }

    pub fn require(&self, capability: Capability) -> Result<(), TierError> {
        if self.allows(capability) {
            Ok(())
        } else {
            Err(TierError {
                capability,
                required: capability.minimum_tier(),
                current: self.tier,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_policy_allows_everything() {
        let ctx = TierContext::new(SubscriptionTier::Free, GatingPolicy::Disabled);
        assert!(ctx.allows(Capability::Recommendations));
        assert!(ctx.require(Capability::CsvExport).is_ok());
    }

    #[test]
    fn test_enforced_policy_orders_tiers() {
        let free = TierContext::new(SubscriptionTier::Free, GatingPolicy::Enforced);
        assert!(free.allows(Capability::RecordSession));
        assert!(!free.allows(Capability::CsvExport));

        let pro = TierContext::new(SubscriptionTier::Pro, GatingPolicy::Enforced);
        assert!(pro.allows(Capability::TruthMeter));
        assert!(!pro.allows(Capability::Recommendations));

        let enterprise = TierContext::new(SubscriptionTier::Enterprise, GatingPolicy::Enforced);
        assert!(enterprise.allows(Capability::Recommendations));
    }

    #[test]
    fn test_require_reports_missing_tier() {
        let ctx = TierContext::new(SubscriptionTier::Free, GatingPolicy::Enforced);
        let err = ctx.require(Capability::CsvExport).unwrap_err();
        assert_eq!(err.required, SubscriptionTier::Pro);
        assert_eq!(
            err.to_string(),
            "CSV export requires the pro tier (current: free)"
        );
    }

    #[test]
    fn test_sentiment_scoring_is_its_own_free_capability() {
        assert_eq!(
            Capability::SentimentScoring.minimum_tier(),
            SubscriptionTier::Free
        );
        assert_ne!(Capability::SentimentScoring, Capability::PatternDetection);

        let free = TierContext::new(SubscriptionTier::Free, GatingPolicy::Enforced);
        assert!(free.require(Capability::SentimentScoring).is_ok());
        assert_eq!(Capability::SentimentScoring.to_string(), "sentiment scoring");
    }

    #[test]
    fn test_tier_parsing() {
        assert_eq!("PRO".parse::<SubscriptionTier>(), Ok(SubscriptionTier::Pro));
        assert!("platinum".parse::<SubscriptionTier>().is_err());
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!(" Enforced".parse::<GatingPolicy>(), Ok(GatingPolicy::Enforced));
        assert_eq!("disabled".parse::<GatingPolicy>(), Ok(GatingPolicy::Disabled));
        assert!("sometimes".parse::<GatingPolicy>().is_err());
    }
}
