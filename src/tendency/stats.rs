//! Deriving a tendency profile from observed hand counts.

use serde::{Deserialize, Serialize};

use super::profile::TendencyProfile;

/// Hands observed before the stats fully replace the default profile.
const FULL_SAMPLE: f64 = 50.0;

/// Hands needed before VPIP is trusted at all.
const MIN_VPIP_SAMPLE: u32 = 10;

/// Fold-to-raise assumed before any postflop folds are seen.
const PRIOR_FOLD_TO_RAISE: f64 = 0.35;

/// Counts kept about one opponent over a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpponentStats {
    pub hands: u32,
    /// Hands where the opponent voluntarily put money in preflop.
    pub vpip: u32,
    /// Hands where the opponent raised preflop.
    pub pfr: u32,
    pub postflop_bets: u32,
    pub postflop_calls: u32,
    pub postflop_folds: u32,
}

impl OpponentStats {
    pub fn vpip_rate(&self) -> f64 {
        ratio(self.vpip, self.hands)
    }

    pub fn pfr_rate(&self) -> f64 {
        ratio(self.pfr, self.hands)
    }

    /// Bets per call postflop.
    pub fn aggression_factor(&self) -> f64 {
        self.postflop_bets as f64 / self.postflop_calls.max(1) as f64
    }

    pub fn fold_rate_postflop(&self) -> f64 {
        let actions = self.postflop_bets + self.postflop_calls + self.postflop_folds;
        ratio(self.postflop_folds, actions)
    }

    /// Map the counts onto sliders, leaning on `prior` while the sample is small.
    ///
    /// - looseness: VPIP 0.3..0.9 maps to 0..1, VPIP assumed 0.6 below ten hands
    /// - aggression: aggression factor 0.5..4 maps to 0..1
    /// - bluff frequency: aggression share scaled by how rarely the player folds
    /// - fold to raise: the postflop fold rate, starting from the prior's
    ///   estimate or 0.35; left as the prior's when no hands were seen
    pub fn profile(&self, prior: &TendencyProfile) -> TendencyProfile {
        let w = (self.hands as f64 / FULL_SAMPLE).min(1.0);
        let blend = |prior: f64, observed: f64| ((1.0 - w) * prior + w * observed).clamp(0.0, 1.0);

        let vpip = if self.hands >= MIN_VPIP_SAMPLE { self.vpip_rate() } else { 0.6 };
        let looseness = (vpip.clamp(0.3, 0.9) - 0.3) / 0.6;

        let aggression = (self.aggression_factor().clamp(0.5, 4.0) - 0.5) / 3.5;
        let bluffs = aggression * (1.0 - self.fold_rate_postflop());

        TendencyProfile {
            looseness: blend(prior.looseness, looseness),
            aggression: blend(prior.aggression, aggression),
            bluff_frequency: blend(prior.bluff_frequency, bluffs),
            fold_to_raise: if self.hands == 0 {
                prior.fold_to_raise
            } else {
                let anchor = prior.fold_to_raise.unwrap_or(PRIOR_FOLD_TO_RAISE);
                Some(blend(anchor, self.fold_rate_postflop()))
            },
        }
    }
}

fn ratio(num: u32, den: u32) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rates() {
        let stats = OpponentStats {
            hands: 20,
            vpip: 12,
            pfr: 5,
            postflop_bets: 6,
            postflop_calls: 3,
            postflop_folds: 3,
        };
        assert!((stats.vpip_rate() - 0.6).abs() < 1e-12);
        assert!((stats.pfr_rate() - 0.25).abs() < 1e-12);
        assert!((stats.aggression_factor() - 2.0).abs() < 1e-12);
        assert!((stats.fold_rate_postflop() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_no_hands_keeps_prior() {
        let prior = TendencyProfile::default();
        assert_eq!(OpponentStats::default().profile(&prior), prior);
    }

    #[test]
    fn test_large_sample_overrides_prior() {
        let stats = OpponentStats {
            hands: 200,
            vpip: 180,
            pfr: 100,
            postflop_bets: 80,
            postflop_calls: 10,
            postflop_folds: 10,
        };
        let profile = stats.profile(&TendencyProfile::rock());
        assert!((profile.looseness - 1.0).abs() < 1e-12);
        assert!((profile.aggression - 1.0).abs() < 1e-12);
        assert!((profile.bluff_frequency - 0.9).abs() < 1e-12);
        assert_eq!(profile.fold_to_raise, Some(0.1));
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn test_fold_rate_blends_with_prior() {
        let stats = OpponentStats {
            hands: 25,
            postflop_bets: 2,
            postflop_calls: 3,
            postflop_folds: 15,
            ..Default::default()
        };
        // half weight: 0.5 * 0.35 + 0.5 * 0.75
        let fold = stats.profile(&TendencyProfile::default()).fold_to_raise.unwrap();
        assert!((fold - 0.55).abs() < 1e-12);

        let anchored = TendencyProfile::default().with_fold_to_raise(0.15);
        let fold = stats.profile(&anchored).fold_to_raise.unwrap();
        assert!((fold - 0.45).abs() < 1e-12);
    }
}
