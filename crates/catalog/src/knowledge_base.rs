use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::{
    Catalog, CatalogError, CatalogFile, Category, KeywordTable, Result, SpecialDocument,
};

const BUILTIN_HOMELINE: &str = include_str!("../../../catalogs/homeline.toml");

/// Catalog plus keyword table plus the few strings that brand the bot.
/// Loaded once at startup and shared read-only afterwards.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    title: String,
    contacts: Option<String>,
    catalog: Catalog,
    keywords: KeywordTable,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawKnowledgeBase {
    schema_version: Option<u32>,
    title: String,
    contacts: Option<String>,
    #[serde(default)]
    categories: Vec<RawCategory>,
    #[serde(default)]
    special: Vec<RawSpecial>,
    #[serde(default)]
    keywords: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCategory {
    key: String,
    name: String,
    summary: Option<String>,
    #[serde(default)]
    folder: String,
    #[serde(default)]
    files: Vec<RawFile>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawFile {
    filename: String,
    description: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSpecial {
    key: String,
    filename: String,
    title: Option<String>,
}

impl KnowledgeBase {
    /// Validates that every keyword points at a document in `catalog`.
    pub fn new(title: impl Into<String>, catalog: Catalog, keywords: KeywordTable) -> Result<Self> {
        for (keyword, filenames) in keywords.iter() {
            for filename in filenames {
                if !catalog.contains_filename(filename) {
                    return Err(CatalogError::UnknownKeywordTarget {
                        keyword: keyword.to_string(),
                        filename: filename.clone(),
                    });
                }
            }
        }
        Ok(Self {
            title: title.into(),
            contacts: None,
            catalog,
            keywords,
        })
    }

    #[must_use]
    pub fn with_contacts(mut self, contacts: impl Into<String>) -> Self {
        self.contacts = Some(contacts.into());
        self
    }

    /// The bundled Homeline catalog.
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_toml_str(BUILTIN_HOMELINE).expect("bundled catalog must parse")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let kb = Self::from_toml_str(&raw)?;
        log::debug!(
            "Loaded catalog {} ({} documents, {} keywords)",
            path.display(),
            kb.catalog.document_count(),
            kb.keywords.len()
        );
        Ok(kb)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let raw: RawKnowledgeBase = toml::from_str(raw)?;
        if let Some(version) = raw.schema_version {
            if version != 1 {
                return Err(CatalogError::UnsupportedSchema(version));
            }
        }

        let categories = raw
            .categories
            .into_iter()
            .map(|category| {
                let files = category
                    .files
                    .into_iter()
                    .map(|file| CatalogFile {
                        filename: file.filename,
                        description: file.description,
                    })
                    .collect();
                let built = Category::new(category.key, category.name, category.folder, files);
                match category.summary {
                    Some(summary) => built.with_summary(summary),
                    None => built,
                }
            })
            .collect();
        let specials = raw
            .special
            .into_iter()
            .map(|special| {
                let built = SpecialDocument::new(special.key, special.filename);
                match special.title {
                    Some(title) => built.with_title(title),
                    None => built,
                }
            })
            .collect();
        let catalog = Catalog::new(categories, specials)?;

        let mut keywords = KeywordTable::new();
        for (keyword, filenames) in raw.keywords {
            keywords.insert(&keyword, filenames)?;
        }

        let kb = Self::new(raw.title, catalog, keywords)?;
        Ok(match raw.contacts {
            Some(contacts) => kb.with_contacts(contacts.trim().to_string()),
            None => kb,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn contacts(&self) -> Option<&str> {
        self.contacts.as_deref()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn keywords(&self) -> &KeywordTable {
        &self.keywords
    }
}
