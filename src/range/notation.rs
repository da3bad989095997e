//! Range notation parsing.
//!
//! Supports comma-separated parts:
//! "AA", "AKs", "AKo", "AK" (both suited and offsuit), "TT+", "AQs+",
//! "A5s-A2s", "99-66", explicit combos such as "2c7d", and an optional
//! "@percent" weight suffix ("QQ@50"). Classes are weighted by their combo
//! count so that every listed combo is equally likely unless a percentage
//! says otherwise.

use thiserror::Error;

use crate::cards::card::parse_rank;
use crate::cards::{HandClass, HoleCards};

use super::weighted::{Category, OpponentRange};

/// Error type for range parsing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RangeParseError {
    #[error("Invalid hand format: {0}")]
    InvalidFormat(String),
    #[error("Invalid rank character: {0}")]
    InvalidRank(char),
    #[error("Invalid suffix: {0} (expected 's' or 'o')")]
    InvalidSuffix(char),
    #[error("Invalid range notation: {0}")]
    InvalidRange(String),
    #[error("Invalid weight: {0}")]
    InvalidWeight(String),
}

#[derive(Clone, Copy, PartialEq)]
enum Suitedness {
    Suited,
    Offsuit,
    Both,
}

impl OpponentRange {
    /// Parse a range from notation string.
    pub fn from_notation(notation: &str) -> Result<Self, RangeParseError> {
        let mut range = Self::empty();

        for part in notation.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (hands, weight) = split_weight(part)?;
            for category in parse_part(hands)? {
                let combos = match category {
                    Category::Class(class) => class.num_combos() as f64,
                    Category::Combo(_) => 1.0,
                };
                range.set(category, combos * weight);
            }
        }

        Ok(range)
    }
}

/// Split "QQ@50" into ("QQ", 0.5).
fn split_weight(part: &str) -> Result<(&str, f64), RangeParseError> {
    match part.split_once('@') {
        None => Ok((part, 1.0)),
        Some((hands, pct)) => {
            let pct: f64 = pct
                .trim()
                .parse()
                .map_err(|_| RangeParseError::InvalidWeight(part.to_string()))?;
            if !(0.0..=100.0).contains(&pct) {
                return Err(RangeParseError::InvalidWeight(part.to_string()));
            }
            Ok((hands.trim(), pct / 100.0))
        }
    }
}

/// Parse a single part of range notation.
fn parse_part(part: &str) -> Result<Vec<Category>, RangeParseError> {
    if let Some((start, end)) = part.split_once('-') {
        return parse_dash(start.trim(), end.trim());
    }

    if let Some(hand) = part.strip_suffix('+') {
        return parse_plus(hand);
    }

    if part.chars().count() == 4 {
        return part
            .parse::<HoleCards>()
            .map(|hole| vec![Category::Combo(hole)])
            .map_err(|_| RangeParseError::InvalidFormat(part.to_string()));
    }

    let (high, low, suitedness) = parse_hand(part)?;
    Ok(expand(high, low, suitedness))
}

/// Parse "AK", "AKs", "AKo", "QQ" into (high, low, suitedness).
fn parse_hand(hand: &str) -> Result<(u8, u8, Suitedness), RangeParseError> {
    let chars: Vec<char> = hand.chars().collect();

    if chars.len() < 2 || chars.len() > 3 {
        return Err(RangeParseError::InvalidFormat(hand.to_string()));
    }

    let r1 = parse_rank(chars[0]).ok_or(RangeParseError::InvalidRank(chars[0]))?;
    let r2 = parse_rank(chars[1]).ok_or(RangeParseError::InvalidRank(chars[1]))?;
    let (high, low) = if r1 >= r2 { (r1, r2) } else { (r2, r1) };

    let suitedness = match chars.get(2) {
        None => Suitedness::Both,
        Some('s') | Some('S') => Suitedness::Suited,
        Some('o') | Some('O') => Suitedness::Offsuit,
        Some(&c) => return Err(RangeParseError::InvalidSuffix(c)),
    };

    if high == low && suitedness != Suitedness::Both {
        return Err(RangeParseError::InvalidFormat(hand.to_string()));
    }

    Ok((high, low, suitedness))
}

fn expand(high: u8, low: u8, suitedness: Suitedness) -> Vec<Category> {
    if high == low {
        return vec![Category::Class(HandClass::new(high, low, false))];
    }
    let mut out = Vec::with_capacity(2);
    if suitedness != Suitedness::Offsuit {
        out.push(Category::Class(HandClass::new(high, low, true)));
    }
    if suitedness != Suitedness::Suited {
        out.push(Category::Class(HandClass::new(high, low, false)));
    }
    out
}

/// "TT+" means TT through AA; "AQs+" means AQs, AKs.
fn parse_plus(hand: &str) -> Result<Vec<Category>, RangeParseError> {
    let (high, low, suitedness) = parse_hand(hand)?;

    if high == low {
        return Ok((high..13).flat_map(|r| expand(r, r, suitedness)).collect());
    }

    Ok((low..high).flat_map(|kicker| expand(high, kicker, suitedness)).collect())
}

/// "A5s-A2s" keeps the high card and walks the kicker; "99-66" walks pairs.
fn parse_dash(start: &str, end: &str) -> Result<Vec<Category>, RangeParseError> {
    let invalid = || RangeParseError::InvalidRange(format!("{}-{}", start, end));

    let (s_high, s_low, s_suit) = parse_hand(start)?;
    let (e_high, e_low, e_suit) = parse_hand(end)?;

    if s_suit != e_suit {
        return Err(invalid());
    }

    if s_high == s_low && e_high == e_low {
        let (lo, hi) = (s_high.min(e_high), s_high.max(e_high));
        return Ok((lo..=hi).flat_map(|r| expand(r, r, s_suit)).collect());
    }

    if s_high != e_high || s_high == s_low || e_high == e_low {
        return Err(invalid());
    }

    let (lo, hi) = (s_low.min(e_low), s_low.max(e_low));
    Ok((lo..=hi).flat_map(|kicker| expand(s_high, kicker, s_suit)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn combos(notation: &str) -> f64 {
        OpponentRange::from_notation(notation).unwrap().total_weight()
    }

    #[test]
    fn test_parse_pairs() {
        let range = OpponentRange::from_notation("AA").unwrap();
        assert_eq!(range.len(), 1);
        assert_eq!(combos("AA"), 6.0);
        assert_eq!(combos("AA, KK, QQ"), 18.0);
    }

    #[test]
    fn test_parse_suited_offsuit() {
        assert_eq!(combos("AKs"), 4.0);
        assert_eq!(combos("AKo"), 12.0);
        assert_eq!(combos("AK"), 16.0);
        assert_eq!(OpponentRange::from_notation("AK").unwrap().len(), 2);
    }

    #[test]
    fn test_parse_plus_notation() {
        let range = OpponentRange::from_notation("TT+").unwrap();
        assert_eq!(range.len(), 5);
        assert_eq!(range.total_weight(), 30.0);

        assert_eq!(combos("AQs+"), 8.0);
    }

    #[test]
    fn test_parse_dash_notation() {
        let range = OpponentRange::from_notation("A5s-A2s").unwrap();
        assert_eq!(range.len(), 4);
        assert_eq!(range.total_weight(), 16.0);

        assert_eq!(combos("99-66"), 24.0);
        assert!(OpponentRange::from_notation("A5s-K2s").is_err());
        assert!(OpponentRange::from_notation("A5s-A2o").is_err());
    }

    #[test]
    fn test_parse_combos_and_weights() {
        let range = OpponentRange::from_notation("2c7d, QQ@50").unwrap();
        let combo: Category = "7d2c".parse().unwrap();
        let queens: Category = "QQ".parse().unwrap();
        assert_eq!(range.weight(&combo), 1.0);
        assert_eq!(range.weight(&queens), 3.0);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            OpponentRange::from_notation("AX"),
            Err(RangeParseError::InvalidRank('X'))
        ));
        assert!(matches!(
            OpponentRange::from_notation("AKx"),
            Err(RangeParseError::InvalidSuffix('x'))
        ));
        assert!(OpponentRange::from_notation("QQ@150").is_err());
        assert!(OpponentRange::from_notation("AAs").is_err());
    }
}
