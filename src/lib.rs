//! This crate evaluates deterministic single-tape Turing machines: an
//! unbounded, functionally updated tape, an immutable transition table, a
//! one-step executor, and a run driver that loops to the halting fixed
//! point. Around that core it provides a small text format for machine
//! programs, a static analyzer, a file loader, and a registry of bundled
//! demonstration programs.

pub mod analyzer;
pub mod loader;
pub mod machine;
pub mod parser;
pub mod programs;
pub mod table;
pub mod tape;
pub mod types;

/// Re-exports the `Rule` enum from the parser module, used by the `pest` grammar.
pub use crate::parser::Rule;
/// Re-exports the `analyze` function and `AnalysisError` enum from the analyzer module.
pub use analyzer::{analyze, AnalysisError};
/// Re-exports the `ProgramLoader` struct from the loader module.
pub use loader::ProgramLoader;
/// Re-exports the `Configuration` and `Machine` structs from the machine module.
pub use machine::{Configuration, Machine};
/// Re-exports the `parse` function from the parser module.
pub use parser::parse;
/// Re-exports the program registry from the programs module.
pub use programs::{ProgramManager, DEMO_PROGRAM, PROGRAMS};
/// Re-exports the `TransitionTable` struct from the table module.
pub use table::TransitionTable;
/// Re-exports the `Tape` struct from the tape module.
pub use tape::Tape;
/// Re-exports the core value types and errors from the types module.
pub use types::{
    Action, MachineError, Movement, Program, RuleEntry, State, Symbol, MAX_PROGRAM_SIZE,
};
