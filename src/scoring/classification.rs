use serde::Serialize;

/// Lowest score classified as a whale.
pub const WHALE_THRESHOLD: f64 = 80.0;
/// Lowest score classified as a standard prospect.
pub const STANDARD_THRESHOLD: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Whale,
    Standard,
    Low,
}

/// Static sales metadata attached to a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub tier: Tier,
    pub label: &'static str,
    pub emoji: &'static str,
    pub priority: &'static str,
    pub score_range: &'static str,
    pub description: &'static str,
    pub expected_roi: &'static str,
    pub action: &'static str,
}

const WHALE: Classification = Classification {
    tier: Tier::Whale,
    label: "WHALE",
    emoji: "🐋",
    priority: "HIGH PRIORITY",
    score_range: "80-100",
    description: "Enterprise-grade facility with massive Heavy Water friction",
    expected_roi: "$500K+ annually",
    action: "Immediate outreach - send pre-built Digital Twin demo",
};

const STANDARD: Classification = Classification {
    tier: Tier::Standard,
    label: "STANDARD",
    emoji: "🎯",
    priority: "STANDARD PROSPECT",
    score_range: "50-79",
    description: "Good automation candidate with solid ROI potential",
    expected_roi: "$50K-$500K annually",
    action: "Add to nurture campaign, send value proposition",
};

const LOW: Classification = Classification {
    tier: Tier::Low,
    label: "LOW",
    emoji: "📉",
    priority: "LOW PRIORITY",
    score_range: "0-49",
    description: "Small operation or limited infrastructure",
    expected_roi: "Limited ROI potential",
    action: "Monitor for growth, deprioritize sales effort",
};

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Whale, Tier::Standard, Tier::Low];

    /// Tier for a score. Lower bounds are inclusive; anything not at least
    /// `STANDARD_THRESHOLD` (NaN included) is `Low`.
    pub fn from_score(score: f64) -> Self {
        if score >= WHALE_THRESHOLD {
            Tier::Whale
        } else if score >= STANDARD_THRESHOLD {
            Tier::Standard
        } else {
            Tier::Low
        }
    }

    pub fn classification(&self) -> Classification {
        match self {
            Tier::Whale => WHALE,
            Tier::Standard => STANDARD,
            Tier::Low => LOW,
        }
    }
}

/// Classify a facility by its score.
pub fn classify(score: f64) -> Classification {
    Tier::from_score(score).classification()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whale_lower_bound_inclusive() {
        assert_eq!(classify(80.0).tier, Tier::Whale);
        assert_eq!(classify(100.0).tier, Tier::Whale);
        assert_eq!(classify(79.999).tier, Tier::Standard);
    }

    #[test]
    fn test_standard_lower_bound_inclusive() {
        assert_eq!(classify(50.0).tier, Tier::Standard);
        assert_eq!(classify(49.999).tier, Tier::Low);
    }

    #[test]
    fn test_low_covers_everything_below() {
        assert_eq!(classify(0.0).tier, Tier::Low);
        assert_eq!(classify(-5.0).tier, Tier::Low);
        assert_eq!(classify(f64::NAN).tier, Tier::Low);
    }

    #[test]
    fn test_out_of_range_high_is_whale() {
        assert_eq!(classify(150.0).tier, Tier::Whale);
    }

    #[test]
    fn test_metadata_is_static() {
        let whale = classify(92.0);
        assert_eq!(whale.label, "WHALE");
        assert_eq!(whale.emoji, "🐋");
        assert_eq!(whale.priority, "HIGH PRIORITY");
        assert_eq!(whale.expected_roi, "$500K+ annually");

        let standard = classify(72.5);
        assert_eq!(standard.label, "STANDARD");
        assert_eq!(standard.priority, "STANDARD PROSPECT");

        let low = classify(10.0);
        assert_eq!(low.label, "LOW");
        assert_eq!(low.action, "Monitor for growth, deprioritize sales effort");
    }

    #[test]
    fn test_tier_roundtrip() {
        for tier in Tier::ALL {
            assert_eq!(tier.classification().tier, tier);
        }
    }
}
