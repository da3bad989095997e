//! Weighted opponent ranges.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::cards::{CardSet, HandClass, HoleCards};

/// A starting-hand category an opponent range can weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Category {
    /// Every combo of a starting-hand class, e.g. "AKs".
    Class(HandClass),
    /// One explicit combo, e.g. "2c7d".
    Combo(HoleCards),
}

impl Category {
    /// Concrete combos named by this category.
    pub fn combos(&self) -> Vec<HoleCards> {
        match self {
            Category::Class(class) => class.combos(),
            Category::Combo(hole) => vec![*hole],
        }
    }

    /// Number of combos the category names.
    pub fn num_combos(&self) -> usize {
        match self {
            Category::Class(class) => class.num_combos() as usize,
            Category::Combo(_) => 1,
        }
    }

    /// Combos that do not collide with `blockers`.
    pub fn unblocked_combos(&self, blockers: CardSet) -> Vec<HoleCards> {
        match self {
            Category::Class(class) => class.unblocked_combos(blockers).collect(),
            Category::Combo(hole) if hole.mask().intersects(blockers) => Vec::new(),
            Category::Combo(hole) => vec![*hole],
        }
    }

    /// Share of the category's combos still dealable given `blockers`.
    pub fn live_share(&self, blockers: CardSet) -> f64 {
        self.unblocked_combos(blockers).len() as f64 / self.num_combos() as f64
    }

    /// Starting-hand class the category belongs to.
    pub fn class(&self) -> HandClass {
        match self {
            Category::Class(class) => *class,
            Category::Combo(hole) => hole.class(),
        }
    }

    /// Preflop strength percentile (0 strongest).
    pub fn percentile(&self) -> f64 {
        self.class().percentile()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Class(class) => write!(f, "{}", class),
            Category::Combo(hole) => write!(f, "{}", hole),
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.chars().count() == 4 {
            s.parse::<HoleCards>()
                .map(Category::Combo)
                .map_err(|e| e.to_string())
        } else {
            s.parse::<HandClass>().map(Category::Class)
        }
    }
}

impl TryFrom<String> for Category {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.to_string()
    }
}

impl From<HandClass> for Category {
    fn from(class: HandClass) -> Self {
        Category::Class(class)
    }
}

impl From<HoleCards> for Category {
    fn from(hole: HoleCards) -> Self {
        Category::Combo(hole)
    }
}

/// An opponent range: starting-hand categories with relative weights.
///
/// Weights need not sum to one and are stated for an unblocked deck. When
/// cards are in play each category counts only the share of its combos that
/// can still be dealt, so a class weighted by its combo count draws each
/// live combo as often as a uniform deal would; see
/// [`OpponentRange::random_hand`]. The range is rebuilt when inputs change
/// and is only read during a simulation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OpponentRange {
    weights: FxHashMap<Category, f64>,
}

impl OpponentRange {
    /// Create an empty range.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Every starting hand with equal probability per combo.
    pub fn random_hand() -> Self {
        let mut range = Self::empty();
        for class in HandClass::all() {
            range.set(class, class.num_combos() as f64);
        }
        range
    }

    /// A range holding a single explicit combo.
    pub fn single(hole: HoleCards) -> Self {
        let mut range = Self::empty();
        range.set(hole, 1.0);
        range
    }

    /// Set the weight of a category. Negative or non-finite weights are stored as zero.
    pub fn set(&mut self, category: impl Into<Category>, weight: f64) {
        let weight = if weight.is_finite() { weight.max(0.0) } else { 0.0 };
        self.weights.insert(category.into(), weight);
    }

    /// Add to the weight of a category.
    pub fn add(&mut self, category: impl Into<Category>, weight: f64) {
        let category = category.into();
        let current = self.weight(&category);
        self.set(category, current + weight);
    }

    /// Weight of a category (zero when absent).
    pub fn weight(&self, category: &Category) -> f64 {
        self.weights.get(category).copied().unwrap_or(0.0)
    }

    /// Remove a category.
    pub fn remove(&mut self, category: &Category) -> Option<f64> {
        self.weights.remove(category)
    }

    /// Number of categories with positive weight.
    pub fn len(&self) -> usize {
        self.weights.values().filter(|&&w| w > 0.0).count()
    }

    /// Check whether no category carries weight.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sum of all weights.
    pub fn total_weight(&self) -> f64 {
        self.weights.values().sum()
    }

    /// Categories with positive weight, in a stable order.
    pub fn entries(&self) -> Vec<(Category, f64)> {
        let mut entries: Vec<(Category, f64)> = self
            .weights
            .iter()
            .filter(|(_, &w)| w > 0.0)
            .map(|(&c, &w)| (c, w))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    /// Multiply every weight by `f(category)`.
    pub fn reweight<F>(&mut self, mut f: F)
    where
        F: FnMut(&Category) -> f64,
    {
        for (category, weight) in self.weights.iter_mut() {
            let factor = f(category);
            *weight = if factor.is_finite() { (*weight * factor).max(0.0) } else { 0.0 };
        }
    }

    /// Weight-averaged strength percentile (0 strongest). None for an empty range.
    pub fn mean_percentile(&self) -> Option<f64> {
        let total = self.total_weight();
        if total <= 0.0 {
            return None;
        }
        let sum: f64 = self.weights.iter().map(|(c, w)| c.percentile() * w).sum();
        Some(sum / total)
    }

    /// Weight left once `blockers` are out: each category scaled by its live share.
    pub fn live_weight(&self, blockers: CardSet) -> f64 {
        self.entries()
            .iter()
            .map(|(c, w)| w * c.live_share(blockers))
            .sum()
    }
}

impl FromIterator<(Category, f64)> for OpponentRange {
    fn from_iter<I: IntoIterator<Item = (Category, f64)>>(iter: I) -> Self {
        let mut range = Self::empty();
        for (category, weight) in iter {
            range.add(category, weight);
        }
        range
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::NUM_COMBOS;

    #[test]
    fn test_random_hand_range() {
        let range = OpponentRange::random_hand();
        assert_eq!(range.len(), 169);
        assert_eq!(range.total_weight() as usize, NUM_COMBOS);
        let mean = range.mean_percentile().unwrap();
        assert!((mean - 0.5).abs() < 1e-9, "mean percentile {}", mean);
    }

    #[test]
    fn test_set_and_reweight() {
        let aa: Category = "AA".parse().unwrap();
        let combo: Category = "2c7d".parse().unwrap();
        let mut range = OpponentRange::empty();
        range.set(aa, 6.0);
        range.add(combo, 1.0);
        range.add(combo, 1.0);
        range.set("KK".parse::<Category>().unwrap(), -3.0);

        assert_eq!(range.len(), 2);
        assert_eq!(range.weight(&combo), 2.0);

        range.reweight(|c| if *c == aa { 0.5 } else { 1.0 });
        assert_eq!(range.weight(&aa), 3.0);
        assert_eq!(range.total_weight(), 5.0);
    }

    #[test]
    fn test_category_parsing() {
        let combo: Category = "7d2c".parse().unwrap();
        assert_eq!(combo.to_string(), "7d2c");
        assert_eq!(combo.class().to_string(), "72o");
        assert!(matches!("QJs".parse::<Category>(), Ok(Category::Class(_))));
        assert!("QQQ".parse::<Category>().is_err());
    }

    #[test]
    fn test_live_weight() {
        let mut range = OpponentRange::empty();
        range.set("AsKd".parse::<HoleCards>().unwrap(), 1.0);
        range.set("QQ".parse::<HandClass>().unwrap(), 6.0);

        let blockers = CardSet::from_cards(&[
            "As".parse().unwrap(),
            "Qh".parse().unwrap(),
        ]);
        // the explicit combo is dead, QQ keeps three of six combos
        assert_eq!(range.live_weight(blockers), 3.0);
        assert_eq!(range.live_weight(CardSet::EMPTY), 7.0);
    }

    #[test]
    fn test_serde_roundtrip() {
        let mut range = OpponentRange::empty();
        range.set("AKs".parse::<HandClass>().unwrap(), 4.0);
        range.set("2c7d".parse::<HoleCards>().unwrap(), 1.0);
        let json = serde_json::to_string(&range).unwrap();
        let back: OpponentRange = serde_json::from_str(&json).unwrap();
        assert_eq!(back, range);
    }
}
