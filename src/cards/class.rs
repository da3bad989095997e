//! Canonical starting-hand classes.
//!
//! There are 169 strategically distinct preflop hands:
//! - 13 pairs (22, ..., AA), indices 0-12
//! - 78 suited hands (32s, ..., AKs), indices 13-90
//! - 78 offsuit hands (32o, ..., AKo), indices 91-168
//!
//! Each class also carries a preflop strength score and its percentile in
//! the combo-weighted ordering of all 1326 starting hands; the tendency
//! model shapes opponent ranges over that percentile.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use super::card::{parse_rank, Card, CardSet, HoleCards, RANK_CHARS};

/// Number of distinct starting-hand classes.
pub const NUM_CLASSES: usize = 169;

/// Number of distinct two-card combos.
pub const NUM_COMBOS: usize = 1326;

/// A starting-hand class such as "AKs", "QQ" or "72o".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HandClass {
    /// Rank of first card (higher)
    pub rank1: u8,
    /// Rank of second card (lower or equal)
    pub rank2: u8,
    /// Whether suited
    pub suited: bool,
}

impl HandClass {
    /// Build a class from two ranks in any order.
    pub fn new(r1: u8, r2: u8, suited: bool) -> Self {
        let (rank1, rank2) = if r1 >= r2 { (r1, r2) } else { (r2, r1) };
        Self {
            rank1,
            rank2,
            suited: suited && rank1 != rank2,
        }
    }

    /// Get hand class from index (0-168).
    pub fn from_index(index: u8) -> Self {
        debug_assert!((index as usize) < NUM_CLASSES);
        if index < 13 {
            Self::new(index, index, false)
        } else if index < 91 {
            let (r1, r2) = decode_triangular(index - 13);
            Self::new(r1, r2, true)
        } else {
            let (r1, r2) = decode_triangular(index - 91);
            Self::new(r1, r2, false)
        }
    }

    /// Get the hand class index (0-168).
    pub fn index(&self) -> u8 {
        if self.is_pair() {
            self.rank1
        } else if self.suited {
            13 + encode_triangular(self.rank1, self.rank2)
        } else {
            91 + encode_triangular(self.rank1, self.rank2)
        }
    }

    /// Check if the class is a pocket pair.
    pub fn is_pair(&self) -> bool {
        self.rank1 == self.rank2
    }

    /// Number of combinations for this hand class.
    pub fn num_combos(&self) -> u8 {
        if self.is_pair() {
            6
        } else if self.suited {
            4
        } else {
            12
        }
    }

    /// Enumerate all specific combos for this hand class.
    pub fn combos(&self) -> Vec<HoleCards> {
        let mut combos = Vec::with_capacity(self.num_combos() as usize);

        for s1 in 0..4u8 {
            for s2 in 0..4u8 {
                let keep = if self.is_pair() {
                    s1 < s2
                } else if self.suited {
                    s1 == s2
                } else {
                    s1 != s2
                };
                if keep {
                    combos.push(HoleCards::new(
                        Card::new(self.rank1, s1),
                        Card::new(self.rank2, s2),
                    ));
                }
            }
        }

        combos
    }

    /// Combos that share no card with `blockers`.
    pub fn unblocked_combos(&self, blockers: CardSet) -> impl Iterator<Item = HoleCards> {
        self.combos()
            .into_iter()
            .filter(move |hc| !hc.mask().intersects(blockers))
    }

    /// Heuristic preflop strength in [0, 1]; higher is better.
    pub fn strength(&self) -> f64 {
        let high = self.rank1 as f64;
        let low = self.rank2 as f64;

        if self.is_pair() {
            return 0.45 + 0.45 * high / 12.0;
        }

        let high_card = (high + 0.55 * low) / (12.0 + 0.55 * 11.0) * 0.75;
        let suited_bonus = if self.suited { 0.06 } else { 0.0 };
        let gap = self.rank1 - self.rank2;
        let connected_bonus = if gap <= 3 { 0.015 * (4 - gap) as f64 } else { 0.0 };

        (high_card + suited_bonus + connected_bonus).clamp(0.0, 1.0)
    }

    /// Share of all starting combos that are stronger than this class, plus
    /// half of this class's own share. 0 is the top of the deck, 1 the bottom.
    pub fn percentile(&self) -> f64 {
        strength_table().percentile[self.index() as usize]
    }

    /// All 169 classes, strongest first.
    pub fn by_strength() -> &'static [HandClass] {
        &strength_table().ordered
    }

    /// Iterate all 169 classes in index order.
    pub fn all() -> impl Iterator<Item = HandClass> {
        (0..NUM_CLASSES as u8).map(HandClass::from_index)
    }
}

impl HoleCards {
    /// The starting-hand class of these cards.
    pub fn class(&self) -> HandClass {
        HandClass::new(self.card1.rank(), self.card2.rank(), self.is_suited())
    }
}

impl fmt::Display for HandClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r1 = RANK_CHARS[self.rank1 as usize];
        let r2 = RANK_CHARS[self.rank2 as usize];
        if self.is_pair() {
            write!(f, "{}{}", r1, r2)
        } else {
            write!(f, "{}{}{}", r1, r2, if self.suited { 's' } else { 'o' })
        }
    }
}

impl FromStr for HandClass {
    type Err = String;

    /// Parse "AA", "AKs" or "AKo". Unpaired classes need the suffix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars: Vec<char> = s.trim().chars().collect();
        let rank = |c: char| parse_rank(c).ok_or_else(|| format!("invalid rank {:?} in {:?}", c, s));

        match chars.as_slice() {
            [a, b] => {
                let (r1, r2) = (rank(*a)?, rank(*b)?);
                if r1 == r2 {
                    Ok(Self::new(r1, r2, false))
                } else {
                    Err(format!("{:?} needs an 's' or 'o' suffix", s))
                }
            }
            [a, b, suffix] => {
                let (r1, r2) = (rank(*a)?, rank(*b)?);
                if r1 == r2 {
                    return Err(format!("pair {:?} takes no suffix", s));
                }
                match suffix.to_ascii_lowercase() {
                    's' => Ok(Self::new(r1, r2, true)),
                    'o' => Ok(Self::new(r1, r2, false)),
                    _ => Err(format!("invalid suffix {:?} in {:?}", suffix, s)),
                }
            }
            _ => Err(format!("invalid hand class {:?}", s)),
        }
    }
}

impl TryFrom<String> for HandClass {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HandClass> for String {
    fn from(class: HandClass) -> Self {
        class.to_string()
    }
}

struct StrengthTable {
    ordered: Vec<HandClass>,
    percentile: [f64; NUM_CLASSES],
}

fn strength_table() -> &'static StrengthTable {
    static TABLE: OnceLock<StrengthTable> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut ordered: Vec<HandClass> = HandClass::all().collect();
        // ties fall back to index order so the table is fully deterministic
        ordered.sort_by(|a, b| {
            b.strength()
                .total_cmp(&a.strength())
                .then(b.index().cmp(&a.index()))
        });

        let mut percentile = [0.0; NUM_CLASSES];
        let mut above = 0.0;
        for class in &ordered {
            let share = class.num_combos() as f64 / NUM_COMBOS as f64;
            percentile[class.index() as usize] = above + share / 2.0;
            above += share;
        }

        StrengthTable { ordered, percentile }
    })
}

/// Encode two ranks (r1 > r2) to triangular index.
fn encode_triangular(r1: u8, r2: u8) -> u8 {
    debug_assert!(r1 > r2);
    r1 * (r1 - 1) / 2 + r2
}

/// Decode triangular index to two ranks (r1 > r2).
fn decode_triangular(idx: u8) -> (u8, u8) {
    let mut r1 = 1u8;
    let mut remaining = idx;

    while remaining >= r1 {
        remaining -= r1;
        r1 += 1;
    }

    (r1, remaining)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_roundtrip() {
        for idx in 0..NUM_CLASSES as u8 {
            let hc = HandClass::from_index(idx);
            assert_eq!(hc.index(), idx, "roundtrip failed for {}", hc);
            assert_eq!(hc.to_string().parse::<HandClass>().unwrap(), hc);
        }
        assert_eq!(HandClass::from_index(12).to_string(), "AA");
        assert_eq!(HandClass::from_index(0).to_string(), "22");
        assert_eq!(HandClass::from_index(13).to_string(), "32s");
        assert_eq!(HandClass::from_index(91).to_string(), "32o");
    }

    #[test]
    fn test_combo_counts() {
        let total: usize = HandClass::all().map(|hc| hc.combos().len()).sum();
        assert_eq!(total, NUM_COMBOS);

        let aks: HandClass = "AKs".parse().unwrap();
        assert!(aks.combos().iter().all(|c| c.is_suited() && c.class() == aks));
        let ako: HandClass = "AKo".parse().unwrap();
        assert_eq!(ako.combos().len(), 12);
        assert!(ako.combos().iter().all(|c| !c.is_suited()));
    }

    #[test]
    fn test_unblocked_combos() {
        let aa: HandClass = "AA".parse().unwrap();
        let blockers = CardSet::from_cards(&["Ah".parse().unwrap()]);
        assert_eq!(aa.unblocked_combos(blockers).count(), 3);
    }

    #[test]
    fn test_strength_ordering() {
        let s = |name: &str| name.parse::<HandClass>().unwrap();
        assert!(s("AA").strength() > s("KK").strength());
        assert!(s("KK").strength() > s("22").strength());
        assert!(s("AKs").strength() > s("AKo").strength());
        assert!(s("T9s").strength() > s("72o").strength());

        assert_eq!(HandClass::by_strength()[0], s("AA"));
        assert!(s("AA").percentile() < 0.01);
        assert!(s("72o").percentile() > 0.8);
        assert!(s("32o").percentile() > 0.95);
    }

    #[test]
    fn test_percentiles_cover_unit_interval() {
        let ordered = HandClass::by_strength();
        assert_eq!(ordered.len(), NUM_CLASSES);
        for pair in ordered.windows(2) {
            assert!(pair[0].percentile() < pair[1].percentile());
        }
        let last = ordered[NUM_CLASSES - 1];
        let half_share = last.num_combos() as f64 / NUM_COMBOS as f64 / 2.0;
        assert!((last.percentile() + half_share - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_parse_errors() {
        assert!("AK".parse::<HandClass>().is_err());
        assert!("AAs".parse::<HandClass>().is_err());
        assert!("AKx".parse::<HandClass>().is_err());
        assert!("1K".parse::<HandClass>().is_err());
    }
}
