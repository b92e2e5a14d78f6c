//! Core value domain of the evaluator: tape symbols, machine states, head
//! movements, transition actions, the in-memory program form, and the error
//! taxonomy shared by every layer.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::Rule;

/// The input character that denotes the blank symbol in program text.
pub const INPUT_BLANK_SYMBOL: char = '_';
/// The state name reserved for the halting state in program text.
pub const HALT_STATE_NAME: &str = "halt";
/// The maximum allowed size for a program file in bytes.
pub const MAX_PROGRAM_SIZE: usize = 65536; // 64KB

/// One value from a tape's alphabet.
///
/// Every cell the machine has never visited is implicitly [`Symbol::Blank`];
/// all other symbols are single-character glyphs. Symbols are compared by
/// equality only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symbol {
    /// The distinguished blank symbol.
    Blank,
    /// A domain symbol, e.g. `'0'` or `'1'`.
    Glyph(char),
}

impl Symbol {
    /// Returns `true` for the blank symbol.
    pub fn is_blank(&self) -> bool {
        matches!(self, Symbol::Blank)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Blank => write!(f, "{INPUT_BLANK_SYMBOL}"),
            Symbol::Glyph(c) => write!(f, "{c}"),
        }
    }
}

/// One value from a machine's control states.
///
/// [`State::Halt`] is the distinguished terminal: stepping a halted
/// configuration is a no-op, and the run driver stops there.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum State {
    /// A named control state, e.g. `scan`.
    Named(String),
    /// The absorbing terminal state.
    Halt,
}

impl State {
    /// Creates a named control state.
    pub fn named(name: impl Into<String>) -> Self {
        State::Named(name.into())
    }

    /// Returns `true` for the halting state.
    pub fn is_halt(&self) -> bool {
        matches!(self, State::Halt)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            State::Named(name) => write!(f, "{name}"),
            State::Halt => write!(f, "{HALT_STATE_NAME}"),
        }
    }
}

/// The direction a head moves after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Movement {
    /// Move the head one cell toward the left boundary.
    Left,
    /// Move the head one cell toward the right boundary.
    Right,
}

impl fmt::Display for Movement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Movement::Left => write!(f, "L"),
            Movement::Right => write!(f, "R"),
        }
    }
}

/// The consequence of a matched transition: the symbol to write, the head
/// movement to apply, and the state to adopt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// Symbol written over the cell under the head.
    pub write: Symbol,
    /// Head movement applied after the write.
    pub movement: Movement,
    /// State the machine transitions to.
    pub next_state: State,
}

/// One transition rule as declared by a program: the (state, symbol) key it
/// fires on and the action it applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleEntry {
    /// Source state the rule fires in.
    pub state: State,
    /// Symbol under the head the rule fires on.
    pub read: Symbol,
    /// What the rule does.
    pub action: Action,
}

/// A machine program: the initial setup plus its transition rules, in
/// declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    /// The name of the program.
    pub name: String,
    /// The state execution starts in.
    pub initial_state: State,
    /// The initial content of the tape.
    pub tape: Vec<Symbol>,
    /// The initial head index into the tape.
    pub head: usize,
    /// The transition rules.
    pub rules: Vec<RuleEntry>,
}

impl Program {
    /// Returns the distinct source states of the program's rules, in
    /// declaration order.
    pub fn rule_states(&self) -> Vec<State> {
        let mut states = Vec::new();
        for entry in &self.rules {
            if !states.contains(&entry.state) {
                states.push(entry.state.clone());
            }
        }
        states
    }
}

/// Errors raised by machine construction, validation, and execution.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MachineError {
    /// No rule matches the current (state, symbol) pair. The machine is
    /// stuck; the run cannot legally proceed.
    #[error("No rule defined for state {0} and symbol {1}")]
    UndefinedTransition(State, Symbol),
    /// Two rules target the same (state, symbol) pair.
    #[error("Conflicting rules for state {0} and symbol {1}")]
    AmbiguousRule(State, Symbol),
    /// A bounded run passed its step budget without halting.
    #[error("Machine did not halt within {0} steps")]
    StepLimitExceeded(usize),
    /// The program text failed to parse.
    #[error("Program parsing error: {0}")]
    ParseError(#[from] Box<pest::error::Error<Rule>>),
    /// The program failed structural or logical validation.
    #[error("Program validation error: {0}")]
    ValidationError(String),
    /// A program file could not be read.
    #[error("File error: {0}")]
    FileError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_serialization() {
        let left = Movement::Left;
        let right = Movement::Right;

        let left_json = serde_json::to_string(&left).unwrap();
        let right_json = serde_json::to_string(&right).unwrap();

        assert_eq!(left_json, "\"Left\"");
        assert_eq!(right_json, "\"Right\"");

        let left_deserialized: Movement = serde_json::from_str(&left_json).unwrap();
        let right_deserialized: Movement = serde_json::from_str(&right_json).unwrap();

        assert_eq!(left, left_deserialized);
        assert_eq!(right, right_deserialized);
    }

    #[test]
    fn test_symbol_display() {
        assert_eq!(Symbol::Blank.to_string(), "_");
        assert_eq!(Symbol::Glyph('1').to_string(), "1");
        assert!(Symbol::Blank.is_blank());
        assert!(!Symbol::Glyph('0').is_blank());
    }

    #[test]
    fn test_state_display() {
        assert_eq!(State::named("scan").to_string(), "scan");
        assert_eq!(State::Halt.to_string(), "halt");
        assert!(State::Halt.is_halt());
        assert!(!State::named("scan").is_halt());
    }

    #[test]
    fn test_error_display() {
        let error = MachineError::UndefinedTransition(State::named("scan"), Symbol::Glyph('x'));

        let error_msg = format!("{}", error);
        assert!(error_msg.contains("No rule defined"));
        assert!(error_msg.contains("scan"));
        assert!(error_msg.contains('x'));
    }

    #[test]
    fn test_rule_states_deduplicates_in_order() {
        let entry = |state: &str, read: char| RuleEntry {
            state: State::named(state),
            read: Symbol::Glyph(read),
            action: Action {
                write: Symbol::Glyph(read),
                movement: Movement::Right,
                next_state: State::Halt,
            },
        };

        let program = Program {
            name: "States".to_string(),
            initial_state: State::named("a"),
            tape: vec![Symbol::Glyph('0')],
            head: 0,
            rules: vec![entry("a", '0'), entry("b", '0'), entry("a", '1')],
        };

        assert_eq!(
            program.rule_states(),
            vec![State::named("a"), State::named("b")]
        );
    }
}
