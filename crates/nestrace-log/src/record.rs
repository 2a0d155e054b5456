use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::field::{Cycles, Field, Hex8};
use crate::{RecordError, Result};

/// CPU state parsed from one trace line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceRecord {
    /// First four characters of the line.
    pub program_counter: String,
    /// Opcode and operand bytes, e.g. `4C F5 C5`. Empty if the column is malformed.
    pub instruction_bytes: String,
    /// Disassembly text with internal whitespace collapsed.
    pub disassembly: String,
    pub accumulator: Field<Hex8>,
    pub x_register: Field<Hex8>,
    pub y_register: Field<Hex8>,
    pub status_flags: Field<Hex8>,
    pub stack_pointer: Field<Hex8>,
    pub cycle_count: Field<Cycles>,
    /// The trimmed source line.
    pub raw_text: String,
}

impl TraceRecord {
    /// Parse a nestest-format trace line.
    ///
    /// Each register field is extracted independently: a missing or malformed
    /// marker leaves that field [`Field::Unknown`] and does not fail the line.
    /// Only a blank line is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Empty`] if the line is blank after trimming.
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        if line.is_empty() {
            return Err(RecordError::Empty);
        }

        let program_counter = line.chars().take(4).collect();

        let instruction_bytes = capture(bytes_pattern(), line)
            .map(normalize_whitespace)
            .unwrap_or_default();

        let disassembly = capture(disasm_pattern(), line)
            .map(normalize_whitespace)
            .unwrap_or_default();

        let [a, x, y, p, sp] = register_patterns();

        Ok(Self {
            program_counter,
            instruction_bytes,
            disassembly,
            accumulator: hex8(a, line),
            x_register: hex8(x, line),
            y_register: hex8(y, line),
            status_flags: hex8(p, line),
            stack_pointer: hex8(sp, line),
            cycle_count: cycles(line),
            raw_text: line.to_string(),
        })
    }
}

impl fmt::Display for TraceRecord {
    /// Re-serialise the parsed fields in canonical nestest column layout.
    ///
    /// The `PPU:` column is not part of the record and is not written.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<4}  {:<8}  {:<31} A:{} X:{} Y:{} P:{} SP:{} CYC:{}",
            self.program_counter,
            self.instruction_bytes,
            self.disassembly,
            self.accumulator,
            self.x_register,
            self.y_register,
            self.status_flags,
            self.stack_pointer,
            self.cycle_count,
        )
    }
}

/// A trace line that either parsed into a record or was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine {
    Valid(TraceRecord),
    Invalid { raw: String, error: RecordError },
}

impl ParsedLine {
    #[must_use]
    pub fn parse(line: &str) -> Self {
        match TraceRecord::parse(line) {
            Ok(record) => Self::Valid(record),
            Err(error) => Self::Invalid {
                raw: line.trim().to_string(),
                error,
            },
        }
    }

    /// Parse a raw line as read from a log file.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        match std::str::from_utf8(bytes) {
            Ok(line) => Self::parse(line),
            Err(e) => Self::Invalid {
                raw: String::from_utf8_lossy(bytes).trim().to_string(),
                error: RecordError::InvalidUtf8 {
                    valid_up_to: e.valid_up_to(),
                },
            },
        }
    }

    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    #[must_use]
    pub const fn record(&self) -> Option<&TraceRecord> {
        match self {
            Self::Valid(record) => Some(record),
            Self::Invalid { .. } => None,
        }
    }

    #[must_use]
    pub const fn error(&self) -> Option<&RecordError> {
        match self {
            Self::Valid(_) => None,
            Self::Invalid { error, .. } => Some(error),
        }
    }

    /// The trimmed source text, for display.
    #[must_use]
    pub fn raw_text(&self) -> &str {
        match self {
            Self::Valid(record) => &record.raw_text,
            Self::Invalid { raw, .. } => raw,
        }
    }
}

impl fmt::Display for ParsedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.raw_text())
    }
}

/// Trim and collapse every whitespace run to a single space.
#[must_use]
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn capture<'a>(pattern: &Regex, line: &'a str) -> Option<&'a str> {
    pattern.captures(line)?.get(1).map(|m| m.as_str())
}

fn hex8(pattern: &Regex, line: &str) -> Field<Hex8> {
    capture(pattern, line)
        .and_then(|digits| u8::from_str_radix(digits, 16).ok())
        .map(Hex8)
        .into()
}

fn cycles(line: &str) -> Field<Cycles> {
    let pattern = CYC_PATTERN.get_or_init(|| Regex::new(r"\bCYC:([0-9]+)").unwrap());
    capture(pattern, line)
        .and_then(|digits| digits.parse::<u64>().ok())
        .map(Cycles)
        .into()
}

fn bytes_pattern() -> &'static Regex {
    BYTES_PATTERN.get_or_init(|| Regex::new(r"^[0-9A-F]{4}\s+([0-9A-F ]{8})").unwrap())
}

/// Lazy group stops at the first accumulator marker.
fn disasm_pattern() -> &'static Regex {
    DISASM_PATTERN.get_or_init(|| {
        Regex::new(r"^[0-9A-F]{4}\s+[0-9A-F ]{8}\s+(.*?)\s*\bA:[0-9A-F]{2}").unwrap()
    })
}

/// Patterns for `A:`, `X:`, `Y:`, `P:` and `SP:`, in that order.
///
/// The word boundary keeps `P:` from matching inside `SP:`.
fn register_patterns() -> &'static [Regex; 5] {
    REGISTER_PATTERNS.get_or_init(|| {
        ["A", "X", "Y", "P", "SP"].map(|marker| {
            Regex::new(&format!(r"\b{marker}:([0-9A-F]{{2}})")).unwrap()
        })
    })
}

static BYTES_PATTERN: OnceLock<Regex> = OnceLock::new();
static DISASM_PATTERN: OnceLock<Regex> = OnceLock::new();
static CYC_PATTERN: OnceLock<Regex> = OnceLock::new();
static REGISTER_PATTERNS: OnceLock<[Regex; 5]> = OnceLock::new();
