//! Table Names
//!
//! Logical table names end up in a filename or in an SQL identifier, so they
//! are validated against a strict character set before any I/O. Invalid
//! names are rejected outright; nothing is stripped or substituted.

use std::fmt;

use thiserror::Error;

use crate::constants::TABLE_NAME_BYTES_MAX;

/// Why a table name was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableNameError {
    /// Name is empty (or only whitespace)
    #[error("table name is empty")]
    Empty,

    /// Name contains a character outside the allowed set
    #[error("table name {name:?} contains invalid character {ch:?} (allowed: {allowed})")]
    InvalidCharacter {
        /// The rejected name
        name: String,
        /// First offending character
        ch: char,
        /// Human-readable allowed set
        allowed: &'static str,
    },

    /// Name is longer than [`TABLE_NAME_BYTES_MAX`]
    #[error("table name {name:?} is {len} bytes (max {TABLE_NAME_BYTES_MAX})")]
    TooLong {
        /// The rejected name
        name: String,
        /// Its length in bytes
        len: usize,
    },
}

/// Character rules for a backend's table names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameRules {
    /// `[a-z0-9_-]`: names become `table-<name>.json`
    File,
    /// `[A-Za-z0-9_]`: names become part of an SQL identifier
    Sql,
}

impl NameRules {
    fn allows(self, ch: char) -> bool {
        match self {
            Self::File => matches!(ch, 'a'..='z' | '0'..='9' | '_' | '-'),
            Self::Sql => ch.is_ascii_alphanumeric() || ch == '_',
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Self::File => "a-z 0-9 _ -",
            Self::Sql => "A-Z a-z 0-9 _",
        }
    }
}

/// A validated logical table name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableName(String);

impl TableName {
    /// Validate `raw` under the given rules.
    ///
    /// Surrounding whitespace is trimmed; everything else must match the
    /// allowed character set exactly.
    ///
    /// # Errors
    /// Returns [`TableNameError`] if the name is empty, too long, or has an
    /// invalid character.
    pub fn parse(raw: &str, rules: NameRules) -> Result<Self, TableNameError> {
        let name = raw.trim();
        if name.is_empty() {
            return Err(TableNameError::Empty);
        }
        if name.len() > TABLE_NAME_BYTES_MAX {
            return Err(TableNameError::TooLong {
                name: name.to_string(),
                len: name.len(),
            });
        }
        if let Some(ch) = name.chars().find(|&ch| !rules.allows(ch)) {
            return Err(TableNameError::InvalidCharacter {
                name: name.to_string(),
                ch,
                allowed: rules.describe(),
            });
        }

        Ok(Self(name.to_string()))
    }

    /// Validate a name for the file backend.
    ///
    /// # Errors
    /// See [`TableName::parse`].
    pub fn for_file(raw: &str) -> Result<Self, TableNameError> {
        Self::parse(raw, NameRules::File)
    }

    /// Validate a name for the SQL backend.
    ///
    /// # Errors
    /// See [`TableName::parse`].
    pub fn for_sql(raw: &str) -> Result<Self, TableNameError> {
        Self::parse(raw, NameRules::Sql)
    }

    /// The validated name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TableName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_names() {
        assert_eq!(TableName::for_file("posts").unwrap().as_str(), "posts");
        assert_eq!(TableName::for_file("site-settings_2").unwrap().as_str(), "site-settings_2");
        assert_eq!(TableName::for_file("  pages ").unwrap().as_str(), "pages");
    }

    #[test]
    fn test_file_rejects_bad_name() {
        let err = TableName::for_file("Bad Name!").unwrap_err();
        assert!(matches!(err, TableNameError::InvalidCharacter { ch: 'B', .. }));
    }

    #[test]
    fn test_file_rejects_path_tricks() {
        assert!(TableName::for_file("../etc").is_err());
        assert!(TableName::for_file("a/b").is_err());
        assert!(TableName::for_file("posts.json").is_err());
    }

    #[test]
    fn test_sql_names() {
        assert_eq!(TableName::for_sql("BlogPosts_1").unwrap().as_str(), "BlogPosts_1");
        assert!(TableName::for_sql("site-settings").is_err());
        assert!(TableName::for_sql("posts; DROP TABLE x").is_err());
    }

    #[test]
    fn test_empty_rejected() {
        assert_eq!(TableName::for_file(""), Err(TableNameError::Empty));
        assert_eq!(TableName::for_sql("   "), Err(TableNameError::Empty));
    }

    #[test]
    fn test_too_long_rejected() {
        let name = "a".repeat(TABLE_NAME_BYTES_MAX + 1);
        assert!(matches!(
            TableName::for_file(&name),
            Err(TableNameError::TooLong { len, .. }) if len == TABLE_NAME_BYTES_MAX + 1
        ));
        assert!(TableName::for_file(&"a".repeat(TABLE_NAME_BYTES_MAX)).is_ok());
    }
}
