//! CLI definitions and argument types.

use std::path::PathBuf;

use clap::Parser;
use nestrace::CompareConfig;

#[derive(Parser)]
#[command(name = "compare_logs")]
#[command(about = "Compare a 6502 CPU trace log against the nestest reference log")]
#[command(version)]
pub struct Cli {
    /// Trace log written by the emulator under test
    #[arg(value_name = "MY_NESTEST_LOG")]
    pub candidate: PathBuf,

    /// Known-good reference trace
    #[arg(value_name = "REFERENCE_LOG", default_value = "nestest.log")]
    pub reference: PathBuf,

    /// Stop after this many differing lines
    #[arg(value_name = "MAX_ERRORS", default_value_t = 10)]
    pub max_errors: usize,

    /// Reference lines shown before each difference
    #[arg(long, value_name = "LINES", default_value_t = 3)]
    pub context: usize,

    /// Also compare the CYC column (ignored by default; PPU timing shifts it)
    #[arg(long)]
    pub compare_cycles: bool,

    /// Enable verbose output (debug logging on stderr)
    #[arg(short, long)]
    pub verbose: bool,

    /// Show metrics summary after the report
    #[arg(long)]
    pub metrics: bool,
}

impl Cli {
    pub const fn compare_config(&self) -> CompareConfig {
        CompareConfig {
            context_lines: self.context,
            max_errors: self.max_errors,
            compare_cycles: self.compare_cycles,
        }
    }
}
