//! Tendency transforms: profile and history to range, bet size to response.
//!
//! Every transform here is a pure function of its arguments. Range effects
//! are multiplicative weight curves over the preflop strength percentile
//! (0 = strongest), so they compose in any order and can be tested alone.

use serde::{Deserialize, Serialize};

use crate::cards::{CardSet, HandClass};
use crate::range::{Category, OpponentRange};

use super::profile::{ObservedAction, TendencyProfile};

/// Share of the combo mass a maximally tight opponent still plays.
const MIN_WIDTH: f64 = 0.15;

/// Weight lost from the top to the bottom of a fully tight range.
const MAX_DECAY: f64 = 0.8;

/// Bottom-of-range trim applied by a call.
const CALL_TRIM: f64 = 0.3;

/// Top-of-range discount applied by a check from a fully aggressive player.
const CHECK_DISCOUNT: f64 = 0.5;

/// Pressure of a pot-sized bet, where a profile's `fold_to_raise` is read.
const POT_SIZED_PRESSURE: f64 = 0.5;

/// Coefficients of the fold-to-bet curve.
///
/// fold = scale * (1 - looseness_weight * L - aggression_weight * A) * s / (1 + s)
///
/// where `s` is the bet relative to the pot. The result is clamped to [0, 1];
/// the EV engine applies its own floor and ceiling on top.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseCurve {
    pub scale: f64,
    pub looseness_weight: f64,
    pub aggression_weight: f64,
}

impl Default for ResponseCurve {
    fn default() -> Self {
        Self {
            scale: 1.75,
            looseness_weight: 0.5,
            aggression_weight: 0.3,
        }
    }
}

/// The bet the opponent must answer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActionFaced {
    /// Chips the opponent must add to continue.
    pub to_call: f64,
    /// Pot before the hero's bet or raise.
    pub pot: f64,
}

impl ActionFaced {
    pub fn new(to_call: f64, pot: f64) -> Self {
        Self { to_call, pot }
    }

    /// Bet-to-pot ratio mapped into [0, 1): s / (1 + s). An empty pot with a
    /// bet behind it counts as an infinitely large bet.
    fn pressure(&self) -> f64 {
        let to_call = self.to_call.max(0.0);
        if to_call == 0.0 {
            return 0.0;
        }
        if self.pot <= 0.0 {
            return 1.0;
        }
        let s = to_call / self.pot;
        s / (1.0 + s)
    }
}

/// Opponent tendency model.
///
/// # Example
/// ```
/// use holdem_advisor::tendency::{ActionFaced, TendencyModel, TendencyProfile};
///
/// let model = TendencyModel::default();
/// let profile = TendencyProfile::default();
/// let range = model.build_range(&profile, &[]);
/// assert!(!range.is_empty());
///
/// let half_pot = model.continuation_probability(&ActionFaced::new(50.0, 100.0), &profile);
/// let pot = model.continuation_probability(&ActionFaced::new(100.0, 100.0), &profile);
/// assert!(pot < half_pot);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TendencyModel {
    pub curve: ResponseCurve,
}

impl TendencyModel {
    pub fn new(curve: ResponseCurve) -> Self {
        Self { curve }
    }

    /// Opponent range implied by the profile and the actions seen this hand.
    ///
    /// The base range covers the strongest `0.15 + 0.85 L` of all combos, with
    /// weights decaying linearly toward its bottom edge at slope `0.8 (1 - L)`.
    /// A looseness of 1 is every hand at equal per-combo weight. Aggression
    /// and bluff frequency only matter through `history`.
    pub fn build_range(&self, profile: &TendencyProfile, history: &[ObservedAction]) -> OpponentRange {
        let looseness = profile.looseness.clamp(0.0, 1.0);
        let width = MIN_WIDTH + (1.0 - MIN_WIDTH) * looseness;
        let decay = MAX_DECAY * (1.0 - looseness);

        let mut range: OpponentRange = HandClass::by_strength()
            .iter()
            .filter(|class| class.percentile() < width)
            .map(|&class| {
                let weight = class.num_combos() as f64 * (1.0 - decay * class.percentile() / width);
                (Category::Class(class), weight)
            })
            .collect();

        for action in history {
            range.reweight(|category| self.action_weight(action, profile, category.percentile()));
        }

        range
    }

    /// Weight multiplier one observed action applies at strength percentile `p`.
    fn action_weight(&self, action: &ObservedAction, profile: &TendencyProfile, p: f64) -> f64 {
        let strength = 1.0 - p;
        match action {
            ObservedAction::Check => 1.0 - CHECK_DISCOUNT * profile.aggression * strength,
            ObservedAction::Call => 1.0 - CALL_TRIM * p,
            ObservedAction::Bet { .. } | ObservedAction::Raise { .. } => {
                // bigger bets lean harder toward value; bluffs keep a flat floor
                let bluff = self.bluff_probability(action, profile);
                bluff + (1.0 - bluff) * strength.powf(1.0 + action.pot_fraction())
            }
        }
    }

    /// Probability the opponent calls or raises rather than folds.
    pub fn continuation_probability(&self, action_faced: &ActionFaced, profile: &TendencyProfile) -> f64 {
        1.0 - self.fold_probability(action_faced, profile)
    }

    /// Probability the opponent folds to `action_faced`, in [0, 1].
    ///
    /// A profile with `fold_to_raise` set folds exactly that often to a
    /// pot-sized bet and scales with the same `s / (1 + s)` shape; otherwise
    /// the curve is driven by looseness and aggression.
    pub fn fold_probability(&self, action_faced: &ActionFaced, profile: &TendencyProfile) -> f64 {
        let pot_sized_fold = match profile.fold_to_raise {
            Some(fold) => fold / POT_SIZED_PRESSURE,
            None => {
                self.curve.scale
                    * (1.0
                        - self.curve.looseness_weight * profile.looseness
                        - self.curve.aggression_weight * profile.aggression)
            }
        };
        let fold = pot_sized_fold * action_faced.pressure();
        if fold.is_finite() {
            fold.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Probability that an opponent's aggressive `action` is a bluff.
    ///
    /// Scales with bluff frequency and aggression and shrinks as the bet
    /// grows. Checks and calls are never bluffs.
    pub fn bluff_probability(&self, action: &ObservedAction, profile: &TendencyProfile) -> f64 {
        if !action.is_aggressive() {
            return 0.0;
        }
        let p = profile.bluff_frequency * (0.5 + 0.5 * profile.aggression) / (1.0 + 0.5 * action.pot_fraction());
        p.clamp(0.0, 1.0)
    }

    /// The strongest part of `range` holding `fraction` of its live weight.
    ///
    /// Weight is measured after card removal by `blockers`. Categories are
    /// taken strongest first; the one straddling the cut keeps the remaining
    /// share of its weight. Kept weights stay on the unblocked scale of
    /// `range`, and fully blocked categories are left out.
    pub fn continuing_range(&self, range: &OpponentRange, fraction: f64, blockers: CardSet) -> OpponentRange {
        let fraction = if fraction.is_finite() { fraction.clamp(0.0, 1.0) } else { 0.0 };

        let mut entries = range.entries();
        entries.sort_by(|a, b| a.0.percentile().total_cmp(&b.0.percentile()).then(a.0.cmp(&b.0)));

        let mut budget = range.live_weight(blockers) * fraction;
        let mut out = OpponentRange::empty();
        for (category, weight) in entries {
            if budget <= 0.0 {
                break;
            }
            let share = category.live_share(blockers);
            if share == 0.0 {
                continue;
            }
            let kept = (weight * share).min(budget);
            out.set(category, kept / share);
            budget -= kept;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::NUM_COMBOS;

    fn profile(looseness: f64, aggression: f64, bluff_frequency: f64) -> TendencyProfile {
        TendencyProfile::new(looseness, aggression, bluff_frequency).unwrap()
    }

    fn class_weight(range: &OpponentRange, class: &str) -> f64 {
        range.weight(&class.parse().unwrap())
    }

    #[test]
    fn test_fully_loose_is_random_hand() {
        let model = TendencyModel::default();
        let range = model.build_range(&profile(1.0, 0.5, 0.5), &[]);
        assert_eq!(range.len(), 169);
        assert!((range.total_weight() - NUM_COMBOS as f64).abs() < 1e-9);
        assert_eq!(class_weight(&range, "72o"), 12.0);
        assert_eq!(class_weight(&range, "AA"), 6.0);
    }

    #[test]
    fn test_looser_is_wider_and_flatter() {
        let model = TendencyModel::default();
        let tight = model.build_range(&profile(0.1, 0.5, 0.3), &[]);
        let loose = model.build_range(&profile(0.8, 0.5, 0.3), &[]);

        assert!(loose.len() > tight.len());
        assert!(class_weight(&tight, "AA") > 0.0);
        assert_eq!(class_weight(&tight, "72o"), 0.0);

        // flatter: the weakest included class keeps more of the top weight
        let flatness = |range: &OpponentRange| {
            let entries = range.entries();
            let per_combo = |(c, w): &(Category, f64)| w / c.combos().len() as f64;
            let min = entries.iter().map(per_combo).fold(f64::INFINITY, f64::min);
            let max = entries.iter().map(per_combo).fold(0.0, f64::max);
            min / max
        };
        assert!(flatness(&loose) > flatness(&tight));
    }

    #[test]
    fn test_empty_history_ignores_aggression() {
        let model = TendencyModel::default();
        let a = model.build_range(&profile(0.4, 0.0, 0.0), &[]);
        let b = model.build_range(&profile(0.4, 1.0, 1.0), &[]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_aggression_seen_strengthens_range() {
        let model = TendencyModel::default();
        let p = profile(0.6, 0.5, 0.35);
        let base = model.build_range(&p, &[]);
        let bet = model.build_range(&p, &[ObservedAction::Bet { pot_fraction: 1.0 }]);
        let called = model.build_range(&p, &[ObservedAction::Call]);

        let base_pct = base.mean_percentile().unwrap();
        assert!(bet.mean_percentile().unwrap() < base_pct);
        assert!(called.mean_percentile().unwrap() < base_pct);

        // bluffs keep weak hands alive
        for (category, _) in base.entries() {
            assert!(bet.weight(&category) > 0.0, "{} dropped", category);
        }
    }

    #[test]
    fn test_more_bluffs_keep_more_weak_hands() {
        let model = TendencyModel::default();
        let history = [ObservedAction::Raise { pot_fraction: 0.75 }];
        let honest = model.build_range(&profile(0.8, 0.5, 0.0), &history);
        let bluffer = model.build_range(&profile(0.8, 0.5, 0.9), &history);
        assert!(bluffer.mean_percentile().unwrap() > honest.mean_percentile().unwrap());
    }

    #[test]
    fn test_check_discounts_top_for_aggressive_players() {
        let model = TendencyModel::default();
        let history = [ObservedAction::Check];
        let passive = model.build_range(&profile(0.6, 0.0, 0.3), &history);
        let aggressive = model.build_range(&profile(0.6, 1.0, 0.3), &history);
        assert_eq!(passive, model.build_range(&profile(0.6, 0.0, 0.3), &[]));
        assert!(aggressive.mean_percentile().unwrap() > passive.mean_percentile().unwrap());
    }

    #[test]
    fn test_bigger_bets_get_more_folds() {
        let model = TendencyModel::default();
        let p = TendencyProfile::default();
        let mut last = 1.0;
        for to_call in [10.0, 33.0, 50.0, 100.0, 200.0, 500.0] {
            let cont = model.continuation_probability(&ActionFaced::new(to_call, 100.0), &p);
            assert!((0.0..=1.0).contains(&cont));
            assert!(cont < last, "continuation did not drop at {}", to_call);
            last = cont;
        }
        assert_eq!(model.continuation_probability(&ActionFaced::new(0.0, 100.0), &p), 1.0);
    }

    #[test]
    fn test_loose_aggressive_players_fold_less() {
        let model = TendencyModel::default();
        let bet = ActionFaced::new(75.0, 100.0);
        let rock = model.fold_probability(&bet, &TendencyProfile::rock());
        let station = model.fold_probability(&bet, &TendencyProfile::calling_station());
        let maniac = model.fold_probability(&bet, &TendencyProfile::maniac());
        assert!(rock > station);
        assert!(station > maniac);
    }

    #[test]
    fn test_pot_bet_default_fold_rate() {
        // 1.75 * (1 - 0.3 - 0.15) * 0.5
        let model = TendencyModel::default();
        let fold = model.fold_probability(&ActionFaced::new(100.0, 100.0), &TendencyProfile::default());
        assert!((fold - 0.48125).abs() < 1e-12);
    }

    #[test]
    fn test_bluff_probability() {
        let model = TendencyModel::default();
        let p = profile(0.5, 1.0, 0.4);
        assert_eq!(model.bluff_probability(&ObservedAction::Call, &p), 0.0);
        let small = model.bluff_probability(&ObservedAction::Bet { pot_fraction: 0.33 }, &p);
        let big = model.bluff_probability(&ObservedAction::Bet { pot_fraction: 2.0 }, &p);
        assert!(small > big);
        assert!((big - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_continuing_range_keeps_strongest_share() {
        let model = TendencyModel::default();
        let range = OpponentRange::from_notation("AA, KK, 72o").unwrap();

        let top = model.continuing_range(&range, 0.5, CardSet::EMPTY);
        assert!((top.total_weight() - 12.0).abs() < 1e-9);
        assert_eq!(class_weight(&top, "AA"), 6.0);
        assert_eq!(class_weight(&top, "KK"), 6.0);
        assert_eq!(class_weight(&top, "72o"), 0.0);

        let border = model.continuing_range(&range, 0.375, CardSet::EMPTY);
        assert_eq!(class_weight(&border, "KK"), 3.0);

        assert_eq!(model.continuing_range(&range, 1.0, CardSet::EMPTY), range);
        assert!(model.continuing_range(&range, 0.0, CardSet::EMPTY).is_empty());
    }

    #[test]
    fn test_continuing_range_counts_live_combos() {
        let model = TendencyModel::default();
        let range = OpponentRange::from_notation("AA, KK").unwrap();
        let blockers = CardSet::from_cards(&["As".parse().unwrap(), "Ah".parse().unwrap()]);

        // one live AA combo and six KK combos: half of seven is AA plus 2.5 KK
        let top = model.continuing_range(&range, 0.5, blockers);
        assert!((class_weight(&top, "AA") - 6.0).abs() < 1e-9);
        assert!((class_weight(&top, "KK") - 2.5).abs() < 1e-9);
        assert!((top.live_weight(blockers) - 3.5).abs() < 1e-9);

        let all_aces = CardSet::from_cards(&["As".parse().unwrap(), "Ah".parse().unwrap(), "Ad".parse().unwrap()]);
        let top = model.continuing_range(&range, 0.5, all_aces);
        assert_eq!(class_weight(&top, "AA"), 0.0);
        assert_eq!(class_weight(&top, "KK"), 3.0);
    }

    #[test]
    fn test_fold_to_raise_anchors_curve() {
        let model = TendencyModel::default();
        let p = TendencyProfile::maniac().with_fold_to_raise(0.6);

        let pot = model.fold_probability(&ActionFaced::new(100.0, 100.0), &p);
        assert!((pot - 0.6).abs() < 1e-12);

        // half pot: s / (1 + s) = 1/3
        let half = model.fold_probability(&ActionFaced::new(50.0, 100.0), &p);
        assert!((half - 0.4).abs() < 1e-12);

        let huge = model.fold_probability(&ActionFaced::new(1_000.0, 100.0), &p);
        assert!(huge <= 1.0 && huge > pot);
        assert_eq!(model.fold_probability(&ActionFaced::new(0.0, 100.0), &p), 0.0);
    }
}
