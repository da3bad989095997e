//! Hero actions and the EV table.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A hero action at the current decision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Fold,
    /// Offered instead of Fold when there is nothing to call.
    Check,
    Call,
    /// Put `amount` chips in, more than the bet faced.
    Raise { amount: f64 },
}

impl Action {
    /// The tie-break class of this action.
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Fold => ActionKind::Fold,
            Action::Check | Action::Call => ActionKind::Passive,
            Action::Raise { .. } => ActionKind::Raise,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Fold => write!(f, "Fold"),
            Action::Check => write!(f, "Check"),
            Action::Call => write!(f, "Call"),
            Action::Raise { amount } => write!(f, "Raise {:.2}", amount),
        }
    }
}

/// Action classes ranked by the tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Fold,
    /// Check or Call.
    Passive,
    Raise,
}

/// EV of every offered action, in the order offered: Fold or Check, Call,
/// then raises from smallest to largest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvTable {
    rows: Vec<(Action, f64)>,
}

impl EvTable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, action: Action, ev: f64) {
        self.rows.push((action, ev));
    }

    /// Rows in table order.
    pub fn rows(&self) -> &[(Action, f64)] {
        &self.rows
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Action, f64)> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// EV of the first row matching `action`.
    pub fn ev(&self, action: &Action) -> Option<f64> {
        self.rows.iter().find(|(a, _)| a == action).map(|&(_, ev)| ev)
    }

    /// Raise rows only.
    pub fn raises(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.rows.iter().filter_map(|&(action, ev)| match action {
            Action::Raise { amount } => Some((amount, ev)),
            _ => None,
        })
    }
}

impl fmt::Display for EvTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<14} {:>10}", "Action", "EV")?;
        writeln!(f, "{}", "-".repeat(25))?;
        for (action, ev) in &self.rows {
            writeln!(f, "{:<14} {:>+10.2}", action.to_string(), ev)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let mut table = EvTable::new();
        table.push(Action::Fold, 0.0);
        table.push(Action::Call, 12.5);
        table.push(Action::Raise { amount: 60.0 }, 9.0);
        table.push(Action::Raise { amount: 120.0 }, 14.0);

        assert_eq!(table.len(), 4);
        assert_eq!(table.ev(&Action::Call), Some(12.5));
        assert_eq!(table.ev(&Action::Check), None);
        assert_eq!(table.raises().collect::<Vec<_>>(), vec![(60.0, 9.0), (120.0, 14.0)]);
        assert!(table.to_string().contains("Raise 120.00"));
    }

    #[test]
    fn test_kinds() {
        assert_eq!(Action::Check.kind(), ActionKind::Passive);
        assert_eq!(Action::Call.kind(), ActionKind::Passive);
        assert_eq!(Action::Raise { amount: 1.0 }.kind(), ActionKind::Raise);
    }

    #[test]
    fn test_action_json() {
        let json = serde_json::to_string(&Action::Raise { amount: 75.0 }).unwrap();
        assert_eq!(json, r#"{"action":"raise","amount":75.0}"#);
    }
}
