//! Loading machine programs from `.mt` files and directories.

use crate::parser::parse;
use crate::types::{MachineError, Program, MAX_PROGRAM_SIZE};
use std::fs;
use std::path::{Path, PathBuf};

/// File extension of machine program files.
const PROGRAM_EXTENSION: &str = "mt";

/// Utility for loading machine programs from files, strings, and
/// directories.
pub struct ProgramLoader;

impl ProgramLoader {
    /// Loads a single program from the specified file path.
    ///
    /// # Errors
    ///
    /// Returns [`MachineError::FileError`] if the file cannot be read or
    /// exceeds [`MAX_PROGRAM_SIZE`], and parse/validation errors for invalid
    /// content.
    pub fn load_program(path: &Path) -> Result<Program, MachineError> {
        let content = fs::read_to_string(path).map_err(|e| {
            MachineError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        if content.len() > MAX_PROGRAM_SIZE {
            return Err(MachineError::FileError(format!(
                "Program file {} exceeds the maximum size of {} bytes",
                path.display(),
                MAX_PROGRAM_SIZE
            )));
        }

        parse(&content)
    }

    /// Loads a single program from string content, e.g. user input.
    ///
    /// # Errors
    ///
    /// Returns parse/validation errors for invalid content.
    pub fn load_program_from_string(content: &str) -> Result<Program, MachineError> {
        parse(content)
    }

    /// Loads all `.mt` program files from a directory.
    ///
    /// Directories and files with other extensions are skipped. Each element
    /// of the returned vector is the result of loading one file: the file's
    /// path and program on success, or the error it produced.
    pub fn load_programs(directory: &Path) -> Vec<Result<(PathBuf, Program), MachineError>> {
        if !directory.exists() {
            return vec![Err(MachineError::FileError(format!(
                "Directory {} does not exist",
                directory.display()
            )))];
        }

        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![Err(MachineError::FileError(format!(
                    "Failed to read directory {}: {}",
                    directory.display(),
                    e
                )))]
            }
        };

        entries
            .filter_map(|entry| {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        return Some(Err(MachineError::FileError(format!(
                            "Failed to read directory entry: {}",
                            e
                        ))))
                    }
                };

                let path = entry.path();

                // Skip directories and non-.mt files
                if path.is_dir() || path.extension().is_none_or(|ext| ext != PROGRAM_EXTENSION) {
                    return None;
                }

                match Self::load_program(&path) {
                    Ok(program) => Some(Ok((path, program))),
                    Err(e) => Some(Err(MachineError::FileError(format!(
                        "Failed to load program from {}: {}",
                        path.display(),
                        e
                    )))),
                }
            })
            .collect()
    }
}
