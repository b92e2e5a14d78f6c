//! The machine's memory: an ordered sequence of symbols with a head index.
//!
//! The tape conceptually extends infinitely in both directions, but only the
//! window of cells ever visited is materialized; cells outside it are
//! implicitly blank. All updates are functional: `write`, `move_left`, and
//! `move_right` return a new tape and leave the receiver untouched.

use crate::types::{MachineError, Symbol};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single tape with a read/write head.
///
/// Invariants, held after every operation: the tape has at least one cell and
/// the head index points at a materialized cell. Moving past either boundary
/// fabricates exactly one fresh blank cell rather than failing or wrapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tape {
    cells: Vec<Symbol>,
    head: usize,
}

impl Tape {
    /// Creates a tape from its initial cells and head index.
    ///
    /// # Errors
    ///
    /// Returns [`MachineError::ValidationError`] if `cells` is empty or
    /// `head` does not point at a cell.
    pub fn new(cells: Vec<Symbol>, head: usize) -> Result<Self, MachineError> {
        if cells.is_empty() {
            return Err(MachineError::ValidationError(
                "Tape must contain at least one cell".to_string(),
            ));
        }
        if head >= cells.len() {
            return Err(MachineError::ValidationError(format!(
                "Head index {} is out of bounds (tape has {} cells)",
                head,
                cells.len()
            )));
        }

        Ok(Self { cells, head })
    }

    /// Returns the symbol under the head.
    pub fn read(&self) -> Symbol {
        self.cells[self.head]
    }

    /// Returns a tape identical to this one except that the cell under the
    /// head now holds `symbol`. The head does not move.
    pub fn write(&self, symbol: Symbol) -> Tape {
        let mut cells = self.cells.clone();
        cells[self.head] = symbol;

        Tape {
            cells,
            head: self.head,
        }
    }

    /// Returns a tape with the head moved one cell to the left.
    ///
    /// At the left boundary a fresh blank cell is prepended and the head
    /// lands on it; the materialized window grows by exactly one cell.
    pub fn move_left(&self) -> Tape {
        let mut cells = self.cells.clone();

        if self.head == 0 {
            cells.insert(0, Symbol::Blank);
            Tape { cells, head: 0 }
        } else {
            Tape {
                cells,
                head: self.head - 1,
            }
        }
    }

    /// Returns a tape with the head moved one cell to the right, appending a
    /// fresh blank cell when the head is already at the right boundary.
    pub fn move_right(&self) -> Tape {
        let mut cells = self.cells.clone();
        let head = self.head + 1;

        if head == cells.len() {
            cells.push(Symbol::Blank);
        }

        Tape { cells, head }
    }

    /// Returns the head index.
    pub fn head(&self) -> usize {
        self.head
    }

    /// Returns the number of materialized cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` if the tape has no cells. Construction forbids this,
    /// so a valid tape always answers `false`.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns the materialized cells.
    pub fn cells(&self) -> &[Symbol] {
        &self.cells
    }
}

impl fmt::Display for Tape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for symbol in &self.cells {
            write!(f, "{symbol}")?;
        }
        Ok(())
    }
}
