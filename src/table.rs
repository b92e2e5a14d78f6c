//! The machine's program as a pure lookup structure: a mapping from
//! (state, symbol under the head) to the action to apply.

use crate::types::{Action, MachineError, RuleEntry, State, Symbol};
use std::collections::HashMap;

/// An immutable transition table.
///
/// Built once from a list of rule entries; queried, never mutated, during
/// execution. The mapping is partial: a (state, symbol) pair without a rule
/// answers `None` from [`lookup`](TransitionTable::lookup), and it is the
/// step executor's job to treat that as fatal.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionTable {
    rules: HashMap<State, HashMap<Symbol, Action>>,
}

impl TransitionTable {
    /// Builds a table from rule entries.
    ///
    /// # Errors
    ///
    /// Returns [`MachineError::AmbiguousRule`] if two entries target the same
    /// (state, symbol) pair. The first conflicting pair in declaration order
    /// is reported.
    pub fn from_entries(entries: &[RuleEntry]) -> Result<Self, MachineError> {
        let mut rules: HashMap<State, HashMap<Symbol, Action>> = HashMap::new();

        for entry in entries {
            let actions = rules.entry(entry.state.clone()).or_default();
            if actions.contains_key(&entry.read) {
                return Err(MachineError::AmbiguousRule(entry.state.clone(), entry.read));
            }
            actions.insert(entry.read, entry.action.clone());
        }

        Ok(Self { rules })
    }

    /// Returns the action registered for the exact (state, symbol) pair, if
    /// any.
    pub fn lookup(&self, state: &State, symbol: Symbol) -> Option<&Action> {
        self.rules.get(state)?.get(&symbol)
    }

    /// Returns the total number of rules in the table.
    pub fn len(&self) -> usize {
        self.rules.values().map(HashMap::len).sum()
    }

    /// Returns `true` if the table holds no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Movement;

    fn entry(state: &str, read: char, write: char, movement: Movement, next: &str) -> RuleEntry {
        RuleEntry {
            state: State::named(state),
            read: Symbol::Glyph(read),
            action: Action {
                write: Symbol::Glyph(write),
                movement,
                next_state: State::named(next),
            },
        }
    }

    #[test]
    fn test_lookup_finds_registered_rule() {
        let table = TransitionTable::from_entries(&[
            entry("scan", '0', '0', Movement::Right, "scan"),
            entry("scan", '1', '1', Movement::Right, "probe"),
        ])
        .unwrap();

        let action = table.lookup(&State::named("scan"), Symbol::Glyph('1')).unwrap();
        assert_eq!(action.write, Symbol::Glyph('1'));
        assert_eq!(action.movement, Movement::Right);
        assert_eq!(action.next_state, State::named("probe"));
    }

    #[test]
    fn test_lookup_answers_none_for_missing_rule() {
        let table =
            TransitionTable::from_entries(&[entry("scan", '0', '0', Movement::Right, "scan")])
                .unwrap();

        assert!(table.lookup(&State::named("scan"), Symbol::Glyph('1')).is_none());
        assert!(table.lookup(&State::named("probe"), Symbol::Glyph('0')).is_none());
        assert!(table.lookup(&State::named("scan"), Symbol::Blank).is_none());
    }

    #[test]
    fn test_duplicate_key_is_a_construction_error() {
        let result = TransitionTable::from_entries(&[
            entry("scan", '0', '0', Movement::Right, "scan"),
            entry("scan", '0', '1', Movement::Left, "probe"),
        ]);

        assert_eq!(
            result.unwrap_err(),
            MachineError::AmbiguousRule(State::named("scan"), Symbol::Glyph('0'))
        );
    }

    #[test]
    fn test_same_read_symbol_in_different_states_is_fine() {
        let table = TransitionTable::from_entries(&[
            entry("scan", '0', '0', Movement::Right, "scan"),
            entry("probe", '0', '0', Movement::Left, "scan"),
        ])
        .unwrap();

        assert_eq!(table.len(), 2);
        assert!(!table.is_empty());
    }

    #[test]
    fn test_empty_table() {
        let table = TransitionTable::from_entries(&[]).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.len(), 0);
    }
}
