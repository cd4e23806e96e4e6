use kb_catalog::KeywordTable;

/// Outcome of one resolution: which keywords fired and the files they surface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Lower-cased input the keywords were tested against
    pub query: String,
    /// Keywords contained in `query`, in table order
    pub matched_keywords: Vec<String>,
    /// Union of the matched keywords' files, first occurrence wins the slot
    pub filenames: Vec<String>,
}

impl Resolution {
    pub fn is_empty(&self) -> bool {
        self.filenames.is_empty()
    }

    pub fn len(&self) -> usize {
        self.filenames.len()
    }
}

/// Substring-containment resolver over a [`KeywordTable`].
///
/// A keyword matches when it occurs anywhere inside the lower-cased input
/// (`keyword in input`, not the reverse and not equality), so short keywords
/// also fire inside longer words.
#[derive(Debug, Clone, Copy)]
pub struct KeywordResolver<'a> {
    table: &'a KeywordTable,
}

impl<'a> KeywordResolver<'a> {
    pub fn new(table: &'a KeywordTable) -> Self {
        Self { table }
    }

    pub fn resolve(&self, text: &str) -> Resolution {
        let query = text.to_lowercase();
        let mut resolution = Resolution {
            query,
            ..Resolution::default()
        };

        for (keyword, files) in self.table.iter() {
            if !resolution.query.contains(keyword) {
                continue;
            }
            log::debug!("keyword '{keyword}' matched: {files:?}");
            resolution.matched_keywords.push(keyword.to_string());
            for file in files {
                if !resolution.filenames.contains(file) {
                    resolution.filenames.push(file.clone());
                }
            }
        }

        log::debug!(
            "resolved '{}' to {} file(s)",
            resolution.query,
            resolution.filenames.len()
        );
        resolution
    }
}
