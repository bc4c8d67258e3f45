use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::error::Result;

/// Version used when no marker file exists yet.
pub const INITIAL_VERSION: &str = "0.0.0";

/// A dot-separated version string such as `1.2.9` or `2.0.rc`.
///
/// Segments are kept as opaque strings. Only the last one is ever
/// interpreted, and only by [`SemanticVersion::increment`]. The persisted
/// form is the exact string this was created from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticVersion(String);

impl SemanticVersion {
    pub fn new(raw: impl Into<String>) -> Self {
        SemanticVersion(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the next version.
    ///
    /// - A numeric last segment is incremented: `1.2.9` -> `1.2.10`
    /// - A non-numeric last segment gets a `1` appended: `2.0.rc` -> `2.0.rc.1`
    /// - An empty version becomes `0.0.1`
    ///
    /// No other segment is touched.
    pub fn increment(&self) -> SemanticVersion {
        if self.0.is_empty() {
            return SemanticVersion::new("0.0.1");
        }

        let (head, last) = match self.0.rsplit_once('.') {
            Some((head, last)) => (Some(head), last),
            None => (None, self.0.as_str()),
        };

        let next_last = if is_counter(last) {
            increment_decimal(last)
        } else {
            format!("{}.1", last)
        };

        match head {
            Some(head) => SemanticVersion(format!("{}.{}", head, next_last)),
            None => SemanticVersion(next_last),
        }
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Default for SemanticVersion {
    fn default() -> Self {
        SemanticVersion::new(INITIAL_VERSION)
    }
}

fn is_counter(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}

/// Adds one to a string of ASCII digits without an integer width limit.
fn increment_decimal(digits: &str) -> String {
    let trimmed = digits.trim_start_matches('0');
    let mut bytes: Vec<u8> = trimmed.bytes().collect();

    let mut carry = true;
    for byte in bytes.iter_mut().rev() {
        if *byte == b'9' {
            *byte = b'0';
        } else {
            *byte += 1;
            carry = false;
            break;
        }
    }
    if carry {
        bytes.insert(0, b'1');
    }

    // Only ASCII digits were written above.
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Reads and writes the version marker file.
#[derive(Debug, Clone)]
pub struct VersionStore {
    path: PathBuf,
}

impl VersionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        VersionStore { path: path.into() }
    }

    /// Loads the current version, trimmed of surrounding whitespace.
    ///
    /// A missing marker file is not an error; it yields [`INITIAL_VERSION`].
    pub fn load(&self) -> Result<SemanticVersion> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(SemanticVersion::new(content.trim())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(SemanticVersion::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Overwrites the marker with exactly the version string.
    pub fn save(&self, version: &SemanticVersion) -> Result<()> {
        fs::write(&self.path, version.as_str())?;
        Ok(())
    }
}
