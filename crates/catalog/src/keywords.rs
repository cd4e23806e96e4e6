use std::collections::BTreeMap;

use crate::{CatalogError, Result};

/// Lower-case keyword -> filenames it surfaces.
///
/// Iteration is in keyword order (BTreeMap), which is what gives search
/// results a stable rendering order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordTable {
    entries: BTreeMap<String, Vec<String>>,
}

impl KeywordTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `filenames` under the lower-cased, trimmed `keyword`. Repeated
    /// keywords merge; duplicate filenames are dropped.
    pub fn insert<I, S>(&mut self, keyword: &str, filenames: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let key = keyword.trim().to_lowercase();
        if key.is_empty() {
            return Err(CatalogError::EmptyKeyword);
        }
        let entry = self.entries.entry(key).or_default();
        for filename in filenames {
            let filename = filename.into();
            if !entry.contains(&filename) {
                entry.push(filename);
            }
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(keyword, files)| (keyword.as_str(), files.as_slice()))
    }

    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
