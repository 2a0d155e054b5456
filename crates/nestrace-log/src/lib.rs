//! Trace line records for nestest-format 6502 CPU logs.
//!
//! A trace line describes the CPU state immediately before one instruction
//! executes:
//!
//! ```text
//! C000  4C F5 C5  JMP $C5F5                       A:00 X:00 Y:00 P:24 SP:FD PPU:  0, 21 CYC:7
//! ```
//!
//! [`ParsedLine::parse`] turns one line into a [`TraceRecord`] and
//! [`compare`] reports the field-level differences between a reference line
//! and a candidate line. The `PPU:` column is never read.

mod compare;
mod field;
mod record;

pub use compare::{CompareOptions, Difference, RecordComparison, TraceField, compare, compare_with};
pub use field::{Cycles, Field, Hex8, Sentinel};
pub use record::{ParsedLine, TraceRecord, normalize_whitespace};

use thiserror::Error;

/// Reasons a trace line cannot become a record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("empty line")]
    Empty,
    #[error("invalid UTF-8 at byte {valid_up_to}")]
    InvalidUtf8 { valid_up_to: usize },
}

pub type Result<T> = std::result::Result<T, RecordError>;

#[cfg(test)]
mod tests;
