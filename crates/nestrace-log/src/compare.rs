use std::fmt;

use crate::record::{ParsedLine, normalize_whitespace};

/// A column of the trace line that takes part in comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraceField {
    ProgramCounter,
    InstructionBytes,
    Disassembly,
    Accumulator,
    XRegister,
    YRegister,
    StatusFlags,
    StackPointer,
    CycleCount,
}

impl TraceField {
    /// Label used in difference reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ProgramCounter => "PC",
            Self::InstructionBytes => "Bytes",
            Self::Disassembly => "Disasm",
            Self::Accumulator => "A",
            Self::XRegister => "X",
            Self::YRegister => "Y",
            Self::StatusFlags => "P",
            Self::StackPointer => "SP",
            Self::CycleCount => "CYC",
        }
    }
}

impl fmt::Display for TraceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One reason a candidate line does not match the reference line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Difference {
    /// At least one side did not parse; fields were not compared.
    InvalidState,
    Field {
        field: TraceField,
        expected: String,
        actual: String,
    },
}

impl Difference {
    #[must_use]
    pub const fn field(&self) -> Option<TraceField> {
        match self {
            Self::InvalidState => None,
            Self::Field { field, .. } => Some(*field),
        }
    }
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidState => f.write_str("Invalid state"),
            Self::Field {
                field: TraceField::Disassembly,
                expected,
                actual,
            } => write!(f, "Disasm: '{expected}' != '{actual}'"),
            Self::Field {
                field,
                expected,
                actual,
            } => write!(f, "{field}: {expected} != {actual}"),
        }
    }
}

/// Which optional columns to compare.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompareOptions {
    /// Compare `CYC:` as well. Off by default: cycle counts drift with PPU
    /// timing and are not a CPU correctness signal.
    pub compare_cycles: bool,
}

/// Outcome of comparing a candidate line against a reference line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordComparison {
    /// Differences in comparison order.
    pub differences: Vec<Difference>,
}

impl RecordComparison {
    #[must_use]
    pub const fn matches(&self) -> bool {
        self.differences.is_empty()
    }
}

/// Compare two lines field by field, ignoring the cycle count.
#[must_use]
pub fn compare(reference: &ParsedLine, candidate: &ParsedLine) -> RecordComparison {
    compare_with(reference, candidate, CompareOptions::default())
}

/// Compare two lines field by field.
///
/// Fields are checked in fixed order: PC, bytes, disassembly, A, X, Y, P, SP
/// and, when enabled, CYC. If either line is invalid the result is a single
/// [`Difference::InvalidState`].
#[must_use]
pub fn compare_with(
    reference: &ParsedLine,
    candidate: &ParsedLine,
    options: CompareOptions,
) -> RecordComparison {
    let (Some(expected), Some(actual)) = (reference.record(), candidate.record()) else {
        return RecordComparison {
            differences: vec![Difference::InvalidState],
        };
    };

    let mut differences = Vec::new();
    let mut check = |field: TraceField, expected: String, actual: String| {
        if expected != actual {
            differences.push(Difference::Field {
                field,
                expected,
                actual,
            });
        }
    };

    check(
        TraceField::ProgramCounter,
        expected.program_counter.clone(),
        actual.program_counter.clone(),
    );
    check(
        TraceField::InstructionBytes,
        expected.instruction_bytes.clone(),
        actual.instruction_bytes.clone(),
    );
    // Collapse again in case a record was built by hand.
    check(
        TraceField::Disassembly,
        normalize_whitespace(&expected.disassembly),
        normalize_whitespace(&actual.disassembly),
    );
    let registers = [
        (TraceField::Accumulator, &expected.accumulator, &actual.accumulator),
        (TraceField::XRegister, &expected.x_register, &actual.x_register),
        (TraceField::YRegister, &expected.y_register, &actual.y_register),
        (TraceField::StatusFlags, &expected.status_flags, &actual.status_flags),
        (TraceField::StackPointer, &expected.stack_pointer, &actual.stack_pointer),
    ];
    for (field, expected, actual) in registers {
        check(field, expected.to_string(), actual.to_string());
    }
    if options.compare_cycles {
        check(
            TraceField::CycleCount,
            expected.cycle_count.to_string(),
            actual.cycle_count.to_string(),
        );
    }

    RecordComparison { differences }
}
