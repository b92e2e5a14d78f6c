//! Pre-execution analysis of machine programs: structural consistency, head
//! bounds, state reachability, and alphabet coverage. Non-termination is
//! deliberately not checked; a rule set that never reaches the halting state
//! is a valid (if unhelpful) program.

use crate::types::{MachineError, Program, State, Symbol};
use std::collections::HashSet;

/// Findings produced while analyzing a program.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum AnalysisError {
    /// The initial head index does not point at a cell of the initial tape.
    InvalidHead(usize),
    /// The initial state has no rules and is not the halting state.
    InvalidStartState(State),
    /// Rules are keyed on the halting state; they can never fire.
    HaltRules(usize),
    /// States that have rules but cannot be reached from the initial state.
    UnreachableStates(Vec<String>),
    /// The initial tape contains symbols that no rule reads.
    InvalidTapeSymbols(Vec<char>),
    /// Basic structural problems (e.g. an empty tape).
    StructuralError(String),
}

impl From<AnalysisError> for MachineError {
    fn from(error: AnalysisError) -> Self {
        match error {
            AnalysisError::InvalidHead(pos) => {
                MachineError::ValidationError(format!("Invalid head position: {}", pos))
            }
            AnalysisError::InvalidStartState(state) => {
                MachineError::ValidationError(format!("Invalid start state: {}", state))
            }
            AnalysisError::HaltRules(count) => MachineError::ValidationError(format!(
                "{} rule(s) defined for the halting state can never fire",
                count
            )),
            AnalysisError::UnreachableStates(states) => MachineError::ValidationError(format!(
                "Unreachable states detected: {:?}",
                states
            )),
            AnalysisError::InvalidTapeSymbols(symbols) => MachineError::ValidationError(format!(
                "Initial tape contains symbols not read by any rule: {:?}",
                symbols
            )),
            AnalysisError::StructuralError(msg) => MachineError::ValidationError(msg),
        }
    }
}

/// Analyzes a program for structural and logical errors.
///
/// Runs every check and reports the first finding.
///
/// # Errors
///
/// Returns [`MachineError::ValidationError`] describing the finding.
pub fn analyze(program: &Program) -> Result<(), MachineError> {
    let errors = [
        check_structure,
        check_head,
        check_start_state,
        check_halt_rules,
        check_unreachable_states,
        check_tape_symbols,
    ]
    .iter()
    .filter_map(|f| f(program).err())
    .collect::<Vec<_>>();

    if let Some(first_error) = errors.into_iter().next() {
        return Err(first_error.into());
    }

    Ok(())
}

/// Checks basic structural requirements: the initial tape must have at least
/// one cell.
fn check_structure(program: &Program) -> Result<(), AnalysisError> {
    if program.tape.is_empty() {
        return Err(AnalysisError::StructuralError(
            "Empty initial tape".to_string(),
        ));
    }

    Ok(())
}

/// Checks that the initial head index points at a cell of the initial tape.
fn check_head(program: &Program) -> Result<(), AnalysisError> {
    if program.head >= program.tape.len() {
        return Err(AnalysisError::InvalidHead(program.head));
    }

    Ok(())
}

/// Checks that the initial state either has rules or is the halting state
/// (starting halted is legal; the run returns immediately).
fn check_start_state(program: &Program) -> Result<(), AnalysisError> {
    if program.initial_state.is_halt() {
        return Ok(());
    }

    let defined = program
        .rules
        .iter()
        .any(|entry| entry.state == program.initial_state);

    if !defined {
        return Err(AnalysisError::InvalidStartState(
            program.initial_state.clone(),
        ));
    }

    Ok(())
}

/// Checks that no rule is keyed on the halting state. The step executor
/// never consults the table once halted, so such rules are dead.
fn check_halt_rules(program: &Program) -> Result<(), AnalysisError> {
    let count = program
        .rules
        .iter()
        .filter(|entry| entry.state.is_halt())
        .count();

    if count > 0 {
        return Err(AnalysisError::HaltRules(count));
    }

    Ok(())
}

/// Checks for unreachable states by traversing next-state references from
/// the initial state. Any state with rules that the traversal never visits
/// is reported.
fn check_unreachable_states(program: &Program) -> Result<(), AnalysisError> {
    let mut visited = HashSet::new();
    let mut queue = vec![program.initial_state.clone()];

    while let Some(state) = queue.pop() {
        if !visited.insert(state.clone()) {
            continue;
        }

        for entry in program.rules.iter().filter(|entry| entry.state == state) {
            if !visited.contains(&entry.action.next_state) {
                queue.push(entry.action.next_state.clone());
            }
        }
    }

    let mut unreachable: Vec<String> = program
        .rule_states()
        .into_iter()
        .filter(|state| !visited.contains(state))
        .map(|state| state.to_string())
        .collect();

    if !unreachable.is_empty() {
        unreachable.sort(); // Sort for deterministic output
        return Err(AnalysisError::UnreachableStates(unreachable));
    }

    Ok(())
}

/// Checks that every symbol on the initial tape is read by at least one
/// rule. The blank symbol is always considered handled.
fn check_tape_symbols(program: &Program) -> Result<(), AnalysisError> {
    let handled: HashSet<_> = program.rules.iter().map(|entry| entry.read).collect();

    let mut unhandled: Vec<char> = program
        .tape
        .iter()
        .filter_map(|symbol| match symbol {
            Symbol::Glyph(c) if !handled.contains(symbol) => Some(*c),
            _ => None,
        })
        .collect();

    if !unhandled.is_empty() {
        unhandled.sort();
        unhandled.dedup();
        return Err(AnalysisError::InvalidTapeSymbols(unhandled));
    }

    Ok(())
}
