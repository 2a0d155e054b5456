use std::fmt;

/// A register-block value that was either extracted or missing from the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field<T> {
    Parsed(T),
    /// The field marker was absent or not followed by the expected digits.
    Unknown,
}

impl<T> Field<T> {
    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}

impl<T> From<Option<T>> for Field<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Unknown, Self::Parsed)
    }
}

/// Text printed in place of a value that could not be extracted.
pub trait Sentinel {
    const UNKNOWN: &'static str;
}

impl<T: fmt::Display + Sentinel> fmt::Display for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parsed(value) => value.fmt(f),
            Self::Unknown => f.pad(T::UNKNOWN),
        }
    }
}

/// One byte printed as two uppercase hex digits (`A:`, `X:`, `Y:`, `P:`, `SP:`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Hex8(pub u8);

impl Sentinel for Hex8 {
    const UNKNOWN: &'static str = "??";
}

impl fmt::Display for Hex8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}", self.0)
    }
}

/// Running CPU cycle count (`CYC:`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cycles(pub u64);

impl Sentinel for Cycles {
    const UNKNOWN: &'static str = "?";
}

impl fmt::Display for Cycles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
