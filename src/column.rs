//! # Column Identifiers
//!
//! Sample-condition columns follow the naming convention
//! `<samplePrefix>-<sampleType>_<suffix...>`, for example `P01-MW_rep2`.
//!
//! - The **prefix** (text before the first `-`) identifies the sample group.
//! - The **sample type** (text after the first `-`, up to the first `_`, or the
//!   whole remainder when there is no `_`) identifies the enrichment condition.
//! - The **suffix** (everything after that `_`) is carried along but unused.

use std::fmt;

/// Errors raised when a column name does not follow the naming convention
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColumnParseError {
    /// Column name has no `-` separating the sample prefix
    #[error("Column '{0}' has no '-' separating the sample prefix from the sample type")]
    MissingDelimiter(String),

    /// Text before the first `-` is empty
    #[error("Column '{0}' has an empty sample prefix")]
    EmptyPrefix(String),

    /// Text between the first `-` and the first `_` is empty
    #[error("Column '{0}' has an empty sample type")]
    EmptySampleType(String),
}

/// A parsed sample-condition column name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnId {
    name: String,
    prefix_end: usize,
    sample_type_end: usize,
}

impl ColumnId {
    /// Parse a column name into its prefix, sample type and suffix
    pub fn parse(name: &str) -> Result<Self, ColumnParseError> {
        let prefix_end = name
            .find('-')
            .ok_or_else(|| ColumnParseError::MissingDelimiter(name.to_string()))?;
        if prefix_end == 0 {
            return Err(ColumnParseError::EmptyPrefix(name.to_string()));
        }

        let rest = &name[prefix_end + 1..];
        let sample_type_len = rest.find('_').unwrap_or(rest.len());
        if sample_type_len == 0 {
            return Err(ColumnParseError::EmptySampleType(name.to_string()));
        }

        Ok(Self {
            name: name.to_string(),
            prefix_end,
            sample_type_end: prefix_end + 1 + sample_type_len,
        })
    }

    /// Full column name as it appears in the table header
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sample group identifier
    pub fn prefix(&self) -> &str {
        &self.name[..self.prefix_end]
    }

    /// Sample-type token used for filtering and for naming derived columns
    pub fn sample_type(&self) -> &str {
        &self.name[self.prefix_end + 1..self.sample_type_end]
    }

    /// Remainder after the sample-type token, if any
    pub fn suffix(&self) -> Option<&str> {
        self.name.get(self.sample_type_end + 1..)
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl std::str::FromStr for ColumnId {
    type Err = ColumnParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
