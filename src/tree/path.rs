//! Key path validation and formatting

use crate::error::CyraError;
use std::fmt;
use std::str::FromStr;

/// Separator used when a path is displayed or parsed as a single string.
pub const SEPARATOR: char = '.';

/// Check a single key segment
///
/// Segments must be non-empty and must not contain [`SEPARATOR`], so a
/// dot-joined path can always be split back unambiguously.
pub fn check_segment(segment: &str) -> Result<(), CyraError> {
    if segment.is_empty() {
        return Err(CyraError::invalid("keys must not be empty"));
    }
    if segment.contains(SEPARATOR) {
        return Err(CyraError::invalid(format!(
            "key `{}` must not contain `{}`",
            segment, SEPARATOR
        )));
    }
    Ok(())
}

/// Location of an entry in the schema tree
///
/// Always holds at least one valid segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyPath(Vec<String>);

impl KeyPath {
    /// Build a path from segments, validating each of them
    pub fn new<I, S>(segments: I) -> Result<Self, CyraError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(CyraError::invalid("key paths must not be empty"));
        }
        for segment in &segments {
            check_segment(segment)?;
        }
        Ok(Self(segments))
    }

    /// Extend `parent` (possibly the root, i.e. empty) with one more segment
    pub fn child_of(parent: &[String], segment: &str) -> Result<Self, CyraError> {
        check_segment(segment)?;
        let mut segments = parent.to_vec();
        segments.push(segment.to_string());
        Ok(Self(segments))
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Last segment (the local key inside its table)
    pub fn key(&self) -> &str {
        self.0.last().map(String::as_str).unwrap_or_default()
    }

    /// Segments leading to the containing table
    pub fn parent(&self) -> &[String] {
        &self.0[..self.0.len().saturating_sub(1)]
    }

    /// Dot-joined form, e.g. `DATABASE.port`
    pub fn joined(&self) -> String {
        self.0.join(&SEPARATOR.to_string())
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.joined())
    }
}

impl FromStr for KeyPath {
    type Err = CyraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(CyraError::invalid("key paths must not be empty"));
        }
        Self::new(s.split(SEPARATOR))
    }
}

impl AsRef<[String]> for KeyPath {
    fn as_ref(&self) -> &[String] {
        &self.0
    }
}
