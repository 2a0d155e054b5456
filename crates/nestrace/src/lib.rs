//! nestrace - diff 6502 CPU trace logs against the nestest reference.
//!
//! Loads a reference log and a candidate log, pairs their lines by index,
//! compares the CPU state on each pair and writes a report of the first
//! divergences.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use nestrace::{CompareConfig, compare_logs};
//!
//! let summary = compare_logs(
//!     Path::new("nestest.log"),
//!     Path::new("my_nestest.log"),
//!     &CompareConfig::default(),
//!     &mut std::io::stdout(),
//! )?;
//! std::process::exit(summary.exit_code());
//! # Ok::<(), nestrace::Error>(())
//! ```

mod error;
mod log_file;
pub mod metrics;
mod report;
pub mod terminal;

pub use error::{Error, Result};
pub use log_file::{LogFile, LogRole};
pub use report::{
    CompareConfig, CompareSummary, EXIT_FAILURE, EXIT_SUCCESS, compare_loaded, compare_logs,
};

pub use nestrace_log::{
    CompareOptions, Difference, ParsedLine, RecordComparison, RecordError, TraceField,
    TraceRecord,
};
