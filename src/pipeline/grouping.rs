//! Partition sample columns into groups by prefix.

use std::collections::HashMap;

use crate::column::{ColumnId, ColumnParseError};

/// Columns sharing one sample prefix, in table order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleGroup {
    prefix: String,
    columns: Vec<ColumnId>,
    positions: Vec<usize>,
}

impl SampleGroup {
    /// Create an empty group for `prefix`
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            columns: Vec::new(),
            positions: Vec::new(),
        }
    }

    /// Add the column found at `position` in the source table
    pub fn push(&mut self, position: usize, column: ColumnId) {
        self.positions.push(position);
        self.columns.push(column);
    }

    /// Sample prefix shared by every column of the group
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Retained columns in table order
    pub fn columns(&self) -> &[ColumnId] {
        &self.columns
    }

    /// Source-table positions of the retained columns
    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    /// Retained column names in table order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(ColumnId::name).collect()
    }

    /// Number of retained columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// True when no column survived sample-type filtering
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Keep only columns whose sample type is in `allowed`, preserving order
    pub fn retain_sample_types<S: AsRef<str>>(&mut self, allowed: &[S]) {
        let (positions, columns): (Vec<usize>, Vec<ColumnId>) = self
            .positions
            .drain(..)
            .zip(self.columns.drain(..))
            .filter(|(_, c)| allowed.iter().any(|a| a.as_ref() == c.sample_type()))
            .unzip();
        self.positions = positions;
        self.columns = columns;
    }
}

/// Group column names by prefix
///
/// Groups appear in order of first appearance; columns keep their table
/// order within a group and remember their position. Every name must parse
/// as a [`ColumnId`].
pub fn group_columns<'a, I>(names: I) -> Result<Vec<SampleGroup>, ColumnParseError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut groups: Vec<SampleGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for (position, name) in names.into_iter().enumerate() {
        let id = ColumnId::parse(name)?;
        let group = match index.get(id.prefix()) {
            Some(&group) => group,
            None => {
                index.insert(id.prefix().to_string(), groups.len());
                groups.push(SampleGroup::new(id.prefix()));
                groups.len() - 1
            }
        };
        groups[group].push(position, id);
    }

    Ok(groups)
}

/// Group columns by prefix, then filter each group to the allowed sample types
///
/// Groups left with no columns are kept (as empty groups) so callers can
/// decide how to treat them.
pub fn group_by_sample<'a, I, S>(
    names: I,
    sample_types: &[S],
) -> Result<Vec<SampleGroup>, ColumnParseError>
where
    I: IntoIterator<Item = &'a str>,
    S: AsRef<str>,
{
    let mut groups = group_columns(names)?;
    for group in &mut groups {
        group.retain_sample_types(sample_types);
    }
    Ok(groups)
}
