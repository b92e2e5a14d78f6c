//! Bundled demonstration programs, embedded at compile time and exposed
//! through a lazily initialized registry.

use crate::types::{MachineError, Program};

use std::sync::RwLock;

/// Name of the reference demonstration program.
pub const DEMO_PROGRAM: &str = "Find the first one";

// Default embedded programs
const PROGRAM_TEXTS: [&str; 3] = [
    include_str!("../demos/find-first-one.mt"),
    include_str!("../demos/invert-bits.mt"),
    include_str!("../demos/busy-beaver-2.mt"),
];

lazy_static::lazy_static! {
    pub static ref PROGRAMS: RwLock<Vec<Program>> = RwLock::new(Vec::new());
}

/// Access to the bundled program registry.
pub struct ProgramManager;

impl ProgramManager {
    /// Parses the embedded programs into the registry.
    ///
    /// # Errors
    ///
    /// Returns [`MachineError::FileError`] if the registry lock is poisoned.
    pub fn load() -> Result<(), MachineError> {
        let mut programs = Vec::new();

        for program_text in PROGRAM_TEXTS {
            if let Ok(program) = crate::parser::parse(program_text) {
                programs.push(program);
            } else {
                eprintln!("Failed to parse bundled program");
            }
        }

        if let Ok(mut write_guard) = PROGRAMS.write() {
            *write_guard = programs;
        } else {
            return Err(MachineError::FileError(
                "Failed to acquire write lock".to_string(),
            ));
        }

        Ok(())
    }

    /// Returns the number of bundled programs.
    pub fn count() -> usize {
        // Initialize with default programs if not already initialized
        let _ = Self::load();

        PROGRAMS.read().map(|programs| programs.len()).unwrap_or(0)
    }

    /// Returns a bundled program by its index.
    ///
    /// # Errors
    ///
    /// Returns [`MachineError::ValidationError`] if the index is out of
    /// range.
    pub fn by_index(index: usize) -> Result<Program, MachineError> {
        // Initialize with default programs if not already initialized
        let _ = Self::load();

        PROGRAMS
            .read()
            .map_err(|_| MachineError::FileError("Failed to acquire read lock".to_string()))?
            .get(index)
            .cloned()
            .ok_or_else(|| {
                MachineError::ValidationError(format!("Program index {} out of range", index))
            })
    }

    /// Returns a bundled program by its name.
    ///
    /// # Errors
    ///
    /// Returns [`MachineError::ValidationError`] if no program carries the
    /// name.
    pub fn by_name(name: &str) -> Result<Program, MachineError> {
        // Initialize with default programs if not already initialized
        let _ = Self::load();

        PROGRAMS
            .read()
            .map_err(|_| MachineError::FileError("Failed to acquire read lock".to_string()))?
            .iter()
            .find(|program| program.name == name)
            .cloned()
            .ok_or_else(|| {
                MachineError::ValidationError(format!("Program '{}' not found", name))
            })
    }

    /// Lists the names of all bundled programs.
    pub fn names() -> Vec<String> {
        // Initialize with default programs if not already initialized
        let _ = Self::load();

        PROGRAMS
            .read()
            .map(|programs| {
                programs
                    .iter()
                    .map(|program| program.name.clone())
                    .collect()
            })
            .unwrap_or_else(|_| Vec::new())
    }
}
