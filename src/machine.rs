//! The execution core: configurations, the step executor, and the run
//! driver that drives a configuration to the halting fixed point.

use crate::table::TransitionTable;
use crate::tape::Tape;
use crate::types::{MachineError, Movement, Program, State};
use serde::{Deserialize, Serialize};

/// One instant of execution: the current state and the current tape.
///
/// Configurations are immutable once produced. Each step yields a fresh
/// configuration, so callers may retain the full history for tracing; the
/// run driver itself discards intermediates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    /// The machine's control state.
    pub state: State,
    /// The tape, including the head position.
    pub tape: Tape,
}

impl Configuration {
    /// Creates a configuration from a state and a tape.
    pub fn new(state: State, tape: Tape) -> Self {
        Self { state, tape }
    }

    /// Creates the initial configuration of a program.
    ///
    /// # Errors
    ///
    /// Returns [`MachineError::ValidationError`] if the program's tape is
    /// empty or its head index is out of bounds.
    pub fn initial(program: &Program) -> Result<Self, MachineError> {
        let tape = Tape::new(program.tape.clone(), program.head)?;

        Ok(Self {
            state: program.initial_state.clone(),
            tape,
        })
    }

    /// Returns `true` once the machine has reached the halting state.
    pub fn is_halted(&self) -> bool {
        self.state.is_halt()
    }
}

/// A deterministic single-tape machine: a transition table plus the logic to
/// apply it.
///
/// The machine itself holds no mutable execution state; it maps one
/// [`Configuration`] to the next. A single machine is therefore freely
/// shareable across independent runs.
pub struct Machine {
    table: TransitionTable,
}

impl Machine {
    /// Creates a machine from a transition table.
    pub fn new(table: TransitionTable) -> Self {
        Self { table }
    }

    /// Creates a machine from a program's rule list.
    ///
    /// # Errors
    ///
    /// Returns [`MachineError::AmbiguousRule`] if two rules target the same
    /// (state, symbol) pair.
    pub fn from_program(program: &Program) -> Result<Self, MachineError> {
        Ok(Self::new(TransitionTable::from_entries(&program.rules)?))
    }

    /// Advances a configuration by exactly one transition.
    ///
    /// A halted configuration is a fixed point: stepping it returns it
    /// unchanged. Otherwise the symbol under the head is read, the matching
    /// rule is applied (write, move, adopt next state), and the resulting
    /// configuration is returned.
    ///
    /// # Errors
    ///
    /// Returns [`MachineError::UndefinedTransition`] when no rule matches
    /// the current (state, symbol) pair. The machine is stuck; this is fatal
    /// for the run.
    pub fn step(&self, config: &Configuration) -> Result<Configuration, MachineError> {
        if config.is_halted() {
            return Ok(config.clone());
        }

        let symbol = config.tape.read();
        let action = self
            .table
            .lookup(&config.state, symbol)
            .ok_or_else(|| MachineError::UndefinedTransition(config.state.clone(), symbol))?;

        let tape = config.tape.write(action.write);
        let tape = match action.movement {
            Movement::Left => tape.move_left(),
            Movement::Right => tape.move_right(),
        };

        Ok(Configuration::new(action.next_state.clone(), tape))
    }

    /// Runs a configuration to the halting fixed point.
    ///
    /// Termination is not guaranteed: a rule set that never reaches the
    /// halting state keeps this loop spinning. Callers that need a bound use
    /// [`run_bounded`](Machine::run_bounded).
    ///
    /// # Errors
    ///
    /// Propagates [`MachineError::UndefinedTransition`] from the step
    /// executor unchanged.
    pub fn run(&self, mut config: Configuration) -> Result<Configuration, MachineError> {
        while !config.is_halted() {
            config = self.step(&config)?;
        }

        Ok(config)
    }

    /// Runs a configuration to the halting fixed point, applying at most
    /// `limit` steps.
    ///
    /// Reaching the halting state on the last permitted step still succeeds;
    /// only a configuration that is not halted after `limit` steps fails.
    ///
    /// # Errors
    ///
    /// Returns [`MachineError::StepLimitExceeded`] when the budget runs out,
    /// and propagates [`MachineError::UndefinedTransition`] from the step
    /// executor unchanged.
    pub fn run_bounded(
        &self,
        mut config: Configuration,
        limit: usize,
    ) -> Result<Configuration, MachineError> {
        for _ in 0..limit {
            if config.is_halted() {
                return Ok(config);
            }
            config = self.step(&config)?;
        }

        if config.is_halted() {
            Ok(config)
        } else {
            Err(MachineError::StepLimitExceeded(limit))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Action, RuleEntry, Symbol};

    fn entry(state: &str, read: Symbol, write: Symbol, movement: Movement, next: State) -> RuleEntry {
        RuleEntry {
            state: State::named(state),
            read,
            action: Action {
                write,
                movement,
                next_state: next,
            },
        }
    }

    fn glyphs(s: &str) -> Vec<Symbol> {
        s.chars()
            .map(|c| if c == '_' { Symbol::Blank } else { Symbol::Glyph(c) })
            .collect()
    }

    /// Rules that scan right for the first `1`, overshoot by one cell, and
    /// step back onto it.
    fn first_one_machine() -> Machine {
        let zero = Symbol::Glyph('0');
        let one = Symbol::Glyph('1');

        Machine::from_program(&Program {
            name: "Find the first one".to_string(),
            initial_state: State::named("scan"),
            tape: glyphs("000101"),
            head: 0,
            rules: vec![
                entry("scan", zero, zero, Movement::Right, State::named("scan")),
                entry("scan", one, one, Movement::Right, State::named("probe")),
                entry("probe", Symbol::Blank, Symbol::Blank, Movement::Left, State::Halt),
                entry("probe", one, one, Movement::Left, State::Halt),
                entry("probe", zero, zero, Movement::Left, State::Halt),
            ],
        })
        .unwrap()
    }

    fn config(state: State, cells: &str, head: usize) -> Configuration {
        Configuration::new(state, Tape::new(glyphs(cells), head).unwrap())
    }

    #[test]
    fn test_step_applies_one_transition() {
        let machine = first_one_machine();
        let start = config(State::named("scan"), "000101", 0);

        let next = machine.step(&start).unwrap();

        assert_eq!(next.state, State::named("scan"));
        assert_eq!(next.tape.head(), 1);
        assert_eq!(next.tape.len(), 6);
        // The original configuration is untouched.
        assert_eq!(start.tape.head(), 0);
    }

    #[test]
    fn test_halt_is_an_absorbing_fixed_point() {
        let machine = first_one_machine();
        let halted = config(State::Halt, "01", 1);

        assert_eq!(machine.step(&halted).unwrap(), halted);
        assert_eq!(machine.run(halted.clone()).unwrap(), halted);
    }

    #[test]
    fn test_undefined_transition_is_fatal() {
        let machine = first_one_machine();
        // `scan` has no rule for a blank cell.
        let stuck = config(State::named("scan"), "_", 0);

        let error = machine.step(&stuck).unwrap_err();
        assert_eq!(
            error,
            MachineError::UndefinedTransition(State::named("scan"), Symbol::Blank)
        );
    }

    #[test]
    fn test_run_propagates_undefined_transition() {
        let machine = first_one_machine();
        // The scan runs off the right end into blanks, where `scan` is stuck.
        let stuck = config(State::named("scan"), "000", 0);

        let error = machine.run(stuck).unwrap_err();
        assert!(matches!(error, MachineError::UndefinedTransition(_, _)));
    }

    #[test]
    fn test_finds_the_first_one() {
        let machine = first_one_machine();
        let start = config(State::named("scan"), "000101", 0);

        let end = machine.run(start).unwrap();

        assert!(end.is_halted());
        assert_eq!(end.tape.len(), 6);
        assert_eq!(end.tape.head(), 3);
        assert_eq!(end.tape.read(), Symbol::Glyph('1'));
    }

    #[test]
    fn test_overshoot_past_the_boundary_extends_the_tape() {
        let machine = first_one_machine();
        // The first `1` is the last cell, so the probe step lands on a
        // freshly materialized blank.
        let start = config(State::named("scan"), "0001", 0);

        let end = machine.run(start).unwrap();

        assert!(end.is_halted());
        assert_eq!(end.tape.len(), 5);
        assert_eq!(end.tape.head(), 3);
        assert_eq!(end.tape.read(), Symbol::Glyph('1'));
    }

    #[test]
    fn test_run_is_deterministic() {
        let machine = first_one_machine();
        let start = config(State::named("scan"), "000101", 0);

        let first = machine.run(start.clone()).unwrap();
        let second = machine.run(start).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_run_bounded_fails_when_the_budget_runs_out() {
        let machine = first_one_machine();
        // Halting this tape takes five steps.
        let start = config(State::named("scan"), "000101", 0);

        let error = machine.run_bounded(start, 3).unwrap_err();
        assert_eq!(error, MachineError::StepLimitExceeded(3));
    }

    #[test]
    fn test_run_bounded_allows_halting_on_the_last_step() {
        let machine = first_one_machine();
        let start = config(State::named("scan"), "000101", 0);

        let end = machine.run_bounded(start, 5).unwrap();
        assert!(end.is_halted());
        assert_eq!(end.tape.head(), 3);
    }

    #[test]
    fn test_initial_configuration_validates_the_head() {
        let program = Program {
            name: "Bad head".to_string(),
            initial_state: State::named("scan"),
            tape: glyphs("01"),
            head: 2,
            rules: Vec::new(),
        };

        assert!(matches!(
            Configuration::initial(&program),
            Err(MachineError::ValidationError(_))
        ));
    }
}
