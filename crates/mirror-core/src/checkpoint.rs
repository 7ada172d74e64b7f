//! Checkpoint records as written by monitors
//!
//! A monitor persists each checkpoint it observes as a single line. The
//! line's logical fields are joined with the two-character sequence `\n`
//! (a backslash followed by `n`), not a real newline:
//!
//! ```text
//! rekor.sigstore.dev - 2605736670972794746\n21428036\nrs1YPY0ydxUb...=\nTimestamp: 1689177396617352539\n...
//! ```
//!
//! Field 1 is the decimal tree size and field 3 carries a `key:value`
//! metadata pair whose value is the timestamp. Anything else on the line is
//! carried through untouched.

use std::fmt;

use crate::error::{Error, Result};

/// In-line field separator used by monitors
pub const FIELD_SEPARATOR: &str = "\\n";

/// Position of the origin field
pub const ORIGIN_FIELD: usize = 0;

/// Position of the tree size field
pub const TREE_SIZE_FIELD: usize = 1;

/// Position of the root hash field
pub const ROOT_HASH_FIELD: usize = 2;

/// Position of the metadata field holding the timestamp
pub const TIMESTAMP_FIELD: usize = 3;

/// A single checkpoint line, kept verbatim
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Checkpoint(String);

impl Checkpoint {
    /// Wrap a raw checkpoint line
    pub fn new(line: impl Into<String>) -> Self {
        Self(line.into())
    }

    /// The raw line exactly as it was read
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn field(&self, index: usize) -> Option<&str> {
        self.0.split(FIELD_SEPARATOR).nth(index)
    }

    /// Log identity, if present
    pub fn origin(&self) -> Option<&str> {
        self.field(ORIGIN_FIELD)
    }

    /// Root hash, if present. Never interpreted.
    pub fn root_hash(&self) -> Option<&str> {
        self.field(ROOT_HASH_FIELD)
    }

    /// Parse the tree size field
    ///
    /// Any decimal integer is accepted, including negative values; those
    /// are counted but can never be selected.
    pub fn tree_size(&self) -> Result<i64> {
        let raw = self.field(TREE_SIZE_FIELD).ok_or_else(|| Error::MissingField {
            index: TREE_SIZE_FIELD,
            checkpoint: self.0.clone(),
        })?;

        raw.parse::<i64>().map_err(|e| Error::InvalidTreeSize {
            value: raw.to_string(),
            reason: e.to_string(),
        })
    }

    /// Parse the timestamp out of the metadata field
    ///
    /// Only the piece between the first and second `:` is used, trimmed of
    /// surrounding whitespace. The key itself is not checked.
    pub fn timestamp(&self) -> Result<i64> {
        let metadata = self.field(TIMESTAMP_FIELD).ok_or_else(|| {
            Error::InvalidTimestamp(format!("field {} is missing", TIMESTAMP_FIELD))
        })?;

        let value = metadata.split(':').nth(1).ok_or_else(|| {
            Error::InvalidTimestamp(format!("no ':' in metadata field {:?}", metadata))
        })?;

        value
            .trim()
            .parse::<i64>()
            .map_err(|e| Error::InvalidTimestamp(format!("{:?}: {}", value.trim(), e)))
    }
}

impl fmt::Display for Checkpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r"rekor.sigstore.dev - 2605736670972794746\n21428036\nrs1YPY0ydxUbAXKqGTTGiRsXNkUkUp6gv4lDGwbUhkw=\nTimestamp: 1689177396617352539\n\n- rekor.sigstore.dev wNI9ajBFAiEA";

    #[test]
    fn test_fields() {
        let chpt = Checkpoint::new(SAMPLE);
        assert_eq!(chpt.origin(), Some("rekor.sigstore.dev - 2605736670972794746"));
        assert_eq!(chpt.tree_size().unwrap(), 21428036);
        assert_eq!(
            chpt.root_hash(),
            Some("rs1YPY0ydxUbAXKqGTTGiRsXNkUkUp6gv4lDGwbUhkw=")
        );
        assert_eq!(chpt.timestamp().unwrap(), 1689177396617352539);
    }

    #[test]
    fn test_display_is_verbatim() {
        let chpt = Checkpoint::new(SAMPLE);
        assert_eq!(chpt.to_string(), SAMPLE);
        assert_eq!(chpt.as_str(), SAMPLE);
    }

    #[test]
    fn test_real_newline_is_not_a_separator() {
        let chpt = Checkpoint::new("O\n100\nHASH\ntimestamp: 5000");
        assert!(matches!(
            chpt.tree_size(),
            Err(Error::MissingField { index: 1, .. })
        ));
    }

    #[test]
    fn test_tree_size_errors() {
        let chpt = Checkpoint::new(r"O\nabc\nHASH\ntimestamp: 1");
        let err = chpt.tree_size().unwrap_err();
        assert!(matches!(err, Error::InvalidTreeSize { .. }));
        assert!(!err.is_recoverable());

        let chpt = Checkpoint::new(r"O\n1.5\nHASH\ntimestamp: 1");
        assert!(chpt.tree_size().is_err());

        let chpt = Checkpoint::new("");
        assert!(matches!(
            chpt.tree_size(),
            Err(Error::MissingField { .. })
        ));
    }

    #[test]
    fn test_negative_tree_size_parses() {
        let chpt = Checkpoint::new(r"O\n-1\nHASH\ntimestamp: 9");
        assert_eq!(chpt.tree_size().unwrap(), -1);

        let chpt = Checkpoint::new(r"O\n+100\nHASH\ntimestamp: 9");
        assert_eq!(chpt.tree_size().unwrap(), 100);
    }

    #[test]
    fn test_timestamp_uses_second_colon_piece() {
        let chpt = Checkpoint::new(r"O\n1\nH\ntimestamp:  42 :extra");
        assert_eq!(chpt.timestamp().unwrap(), 42);

        let chpt = Checkpoint::new(r"O\n1\nH\nanything:7");
        assert_eq!(chpt.timestamp().unwrap(), 7);
    }

    #[test]
    fn test_timestamp_errors_are_recoverable() {
        for line in [
            r"O\n1\nH\ntimestamp: soon",
            r"O\n1\nH\ntimestamp 5",
            r"O\n1\nH",
        ] {
            let err = Checkpoint::new(line).timestamp().unwrap_err();
            assert!(err.is_recoverable(), "{}", line);
        }
    }
}
