//! Lock-step comparison of two trace logs and the text report.

use std::io::Write;
use std::path::Path;

use nestrace_log::{CompareOptions, ParsedLine, RecordError, compare_with};
use tracing::{debug, warn};

use crate::terminal::{failure_mark, success_mark};
use crate::{LogFile, LogRole, Result, metrics};

/// Exit code for success.
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code for failure.
pub const EXIT_FAILURE: i32 = 1;

const RULE_WIDTH: usize = 80;
/// Characters of an unparseable line quoted in its diagnostic.
const DIAGNOSTIC_EXCERPT: usize = 50;

/// Settings for one comparison run.
#[derive(Debug, Clone)]
pub struct CompareConfig {
    /// Reference lines shown before each difference.
    pub context_lines: usize,
    /// Stop scanning once this many differing lines have been reported.
    pub max_errors: usize,
    /// Also compare the `CYC:` column.
    pub compare_cycles: bool,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            context_lines: 3,
            max_errors: 10,
            compare_cycles: false,
        }
    }
}

/// Counters from a finished comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompareSummary {
    pub reference_lines: usize,
    pub candidate_lines: usize,
    /// Pairs where both lines parsed.
    pub lines_compared: usize,
    /// Compared pairs that differed.
    pub errors_found: usize,
    /// Pairs dropped because one side did not parse.
    pub skipped_pairs: usize,
    /// The scan stopped at `max_errors`.
    pub truncated: bool,
}

impl CompareSummary {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.errors_found == 0
    }

    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        if self.is_success() {
            EXIT_SUCCESS
        } else {
            EXIT_FAILURE
        }
    }

    #[must_use]
    pub const fn length_mismatch(&self) -> bool {
        self.reference_lines != self.candidate_lines
    }
}

/// Load both logs and compare them, writing the report to `out`.
///
/// The reference log is opened first; a missing file aborts the run with
/// [`crate::Error::NotFound`] before anything is written.
///
/// # Errors
///
/// Returns an error if either log cannot be read or the report cannot be
/// written to `out`.
pub fn compare_logs(
    reference: &Path,
    candidate: &Path,
    config: &CompareConfig,
    out: &mut impl Write,
) -> Result<CompareSummary> {
    let reference = LogFile::load(reference, LogRole::Reference)?;
    let candidate = LogFile::load(candidate, LogRole::Candidate)?;
    compare_loaded(&reference, &candidate, config, out)
}

/// Compare two loaded logs line by line, writing the report to `out`.
///
/// Line `i` of the reference is paired with line `i` of the candidate; lines
/// past the end of the shorter log are never compared. A pair where either
/// line fails to parse is skipped without counting as compared or as an
/// error.
///
/// # Errors
///
/// Returns [`crate::Error::Report`] if writing to `out` fails.
pub fn compare_loaded(
    reference: &LogFile,
    candidate: &LogFile,
    config: &CompareConfig,
    out: &mut impl Write,
) -> Result<CompareSummary> {
    let options = CompareOptions {
        compare_cycles: config.compare_cycles,
    };
    let mut summary = CompareSummary {
        reference_lines: reference.len(),
        candidate_lines: candidate.len(),
        ..CompareSummary::default()
    };

    write_header(out, reference, candidate)?;

    for (index, (reference_bytes, candidate_bytes)) in
        reference.lines().zip(candidate.lines()).enumerate()
    {
        let expected = parse_line(reference_bytes, index, LogRole::Reference);
        let actual = parse_line(candidate_bytes, index, LogRole::Candidate);

        if !expected.is_valid() || !actual.is_valid() {
            debug!(line = index + 1, "skipping unparseable line pair");
            summary.skipped_pairs += 1;
            metrics::record_skipped();
            continue;
        }

        summary.lines_compared += 1;
        metrics::record_compared();

        let comparison = compare_with(&expected, &actual, options);
        if comparison.matches() {
            continue;
        }

        summary.errors_found += 1;
        metrics::record_mismatch(&comparison);

        writeln!(
            out,
            "Difference at line {} (instruction #{}):",
            index + 1,
            summary.lines_compared
        )?;
        writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;

        let start = index.saturating_sub(config.context_lines);
        if start < index {
            writeln!(out, "Context (lines {}-{}):", start + 1, index)?;
            for context in start..index {
                if let Some(text) = reference.display_line(context) {
                    writeln!(out, "  {text}")?;
                }
            }
            writeln!(out)?;
        }

        writeln!(out, "Expected ({} line {}):", reference.name(), index + 1)?;
        writeln!(out, "  {expected}")?;
        writeln!(out)?;
        writeln!(out, "Got ({} line {}):", candidate.name(), index + 1)?;
        writeln!(out, "  {actual}")?;
        writeln!(out)?;
        writeln!(out, "Differences:")?;
        for difference in &comparison.differences {
            writeln!(out, "  - {difference}")?;
        }
        writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
        writeln!(out)?;

        if summary.errors_found >= config.max_errors {
            summary.truncated = true;
            writeln!(out, "Stopping after {} errors.", config.max_errors)?;
            writeln!(out, "Set max_errors higher to see more differences.")?;
            writeln!(out)?;
            break;
        }
    }

    if summary.length_mismatch() {
        writeln!(out, "Warning: Log length mismatch!")?;
        writeln!(out, "  Reference: {} lines", summary.reference_lines)?;
        writeln!(out, "  Test:      {} lines", summary.candidate_lines)?;
        writeln!(out)?;
    }

    write_summary(out, &summary)?;
    debug!(
        compared = summary.lines_compared,
        errors = summary.errors_found,
        skipped = summary.skipped_pairs,
        "comparison finished"
    );
    Ok(summary)
}

fn parse_line(bytes: &[u8], index: usize, role: LogRole) -> ParsedLine {
    let parsed = ParsedLine::from_bytes(bytes);
    // Blank lines are skipped silently; anything else rejected is worth a diagnostic.
    if let Some(error) = parsed.error().filter(|e| **e != RecordError::Empty) {
        let excerpt: String = parsed.raw_text().chars().take(DIAGNOSTIC_EXCERPT).collect();
        warn!(
            role = %role,
            line = index + 1,
            "Parse error: {error} on line: {excerpt}"
        );
    }
    parsed
}

fn write_header(out: &mut impl Write, reference: &LogFile, candidate: &LogFile) -> Result<()> {
    writeln!(out, "Comparing logs:")?;
    writeln!(
        out,
        "  Reference: {} ({} lines)",
        reference.path().display(),
        reference.len()
    )?;
    writeln!(
        out,
        "  Test:      {} ({} lines)",
        candidate.path().display(),
        candidate.len()
    )?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(out)?;
    Ok(())
}

fn write_summary(out: &mut impl Write, summary: &CompareSummary) -> Result<()> {
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(out, "Summary:")?;
    writeln!(out, "  Lines compared: {}", summary.lines_compared)?;
    writeln!(out, "  Errors found:   {}", summary.errors_found)?;
    if summary.skipped_pairs > 0 {
        writeln!(out, "  Lines skipped:  {}", summary.skipped_pairs)?;
    }
    writeln!(out)?;

    if summary.is_success() {
        writeln!(
            out,
            "{} All lines match! Your emulator is running correctly!",
            success_mark()
        )?;
    } else {
        writeln!(
            out,
            "{} Found {} difference(s)",
            failure_mark(),
            summary.errors_found
        )?;
    }
    Ok(())
}
