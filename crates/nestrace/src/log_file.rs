use std::borrow::Cow;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, instrument};

use crate::{Error, Result, metrics};

/// Which side of the comparison a log belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogRole {
    /// The known-good trace.
    Reference,
    /// The trace produced by the emulator under test.
    Candidate,
}

impl LogRole {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Reference => "reference",
            Self::Candidate => "test",
        }
    }
}

impl fmt::Display for LogRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A trace log held fully in memory as raw lines.
///
/// Lines are kept as bytes so a single undecodable line can be rejected on
/// its own instead of failing the whole file.
#[derive(Debug, Clone)]
pub struct LogFile {
    path: PathBuf,
    lines: Vec<Vec<u8>>,
}

impl LogFile {
    /// Read a log file. Paths ending in `.zst` are zstd-decompressed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the file does not exist and
    /// [`Error::Read`] if it cannot be opened, decompressed or read.
    #[instrument(level = "debug", skip_all, fields(role = %role, path = %path.display()))]
    pub fn load(path: &Path, role: LogRole) -> Result<Self> {
        let start = Instant::now();
        let reader = open_reader(path).map_err(|source| classify(role, path, source))?;
        let log = Self::from_reader(path, reader).map_err(|source| Error::Read {
            role,
            path: path.to_path_buf(),
            source,
        })?;

        debug!(lines = log.len(), "log loaded");
        metrics::record_log_loaded(role, log.len(), start.elapsed().as_secs_f64());
        Ok(log)
    }

    /// Split a stream into lines on `\n`, dropping a trailing `\r`.
    ///
    /// A final line without a newline still counts as a line.
    ///
    /// # Errors
    ///
    /// Returns any I/O error raised by `reader`.
    pub fn from_reader(path: impl Into<PathBuf>, reader: impl BufRead) -> io::Result<Self> {
        let mut lines = Vec::new();
        for line in reader.split(b'\n') {
            let mut line = line?;
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            lines.push(line);
        }

        Ok(Self {
            path: path.into(),
            lines,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name for report labels, falling back to the full path.
    #[must_use]
    pub fn name(&self) -> Cow<'_, str> {
        self.path.file_name().map_or_else(
            || self.path.to_string_lossy(),
            |name| name.to_string_lossy(),
        )
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> impl Iterator<Item = &[u8]> {
        self.lines.iter().map(Vec::as_slice)
    }

    #[must_use]
    pub fn line(&self, index: usize) -> Option<&[u8]> {
        self.lines.get(index).map(Vec::as_slice)
    }

    /// A line decoded for display with trailing whitespace removed.
    #[must_use]
    pub fn display_line(&self, index: usize) -> Option<Cow<'_, str>> {
        let text = String::from_utf8_lossy(self.line(index)?);
        Some(match text {
            Cow::Borrowed(s) => Cow::Borrowed(s.trim_end()),
            Cow::Owned(s) => Cow::Owned(s.trim_end().to_string()),
        })
    }
}

fn open_reader(path: &Path) -> io::Result<Box<dyn BufRead>> {
    let file = File::open(path)?;
    if path.extension().is_some_and(|ext| ext == "zst") {
        let decoder = zstd::stream::Decoder::new(file)?;
        Ok(Box::new(BufReader::new(decoder)))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

fn classify(role: LogRole, path: &Path, source: io::Error) -> Error {
    let path = path.to_path_buf();
    if source.kind() == io::ErrorKind::NotFound {
        Error::NotFound { role, path }
    } else {
        Error::Read { role, path, source }
    }
}
