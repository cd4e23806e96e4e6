use std::collections::{HashMap, HashSet};
use std::path::{Component, Path, PathBuf};

use crate::{CatalogError, Result};

/// Origin key used for documents that belong to no category.
pub const SPECIAL_ORIGIN: &str = "special";

/// Longest category / special key accepted. Keeps every token header well under
/// the 64-char protocol ceiling.
pub const MAX_KEY_CHARS: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogFile {
    pub filename: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    key: String,
    name: String,
    summary: Option<String>,
    folder: String,
    files: Vec<CatalogFile>,
}

impl Category {
    pub fn new(
        key: impl Into<String>,
        name: impl Into<String>,
        folder: impl Into<String>,
        files: Vec<CatalogFile>,
    ) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            summary: None,
            folder: folder.into(),
            files,
        }
    }

    #[must_use]
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn folder(&self) -> &str {
        &self.folder
    }

    pub fn files(&self) -> &[CatalogFile] {
        &self.files
    }

    pub fn position(&self, filename: &str) -> Option<usize> {
        self.files.iter().position(|file| file.filename == filename)
    }
}

/// Uncategorized document, addressed by its own key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecialDocument {
    key: String,
    filename: String,
    title: Option<String>,
}

impl SpecialDocument {
    pub fn new(key: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            filename: filename.into(),
            title: None,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Origin {
    Category(String),
    Special,
}

impl Origin {
    /// Maps a token/category field back to an origin. `special` is reserved.
    pub fn from_key(key: &str) -> Self {
        if key == SPECIAL_ORIGIN {
            Self::Special
        } else {
            Self::Category(key.to_string())
        }
    }

    pub fn key(&self) -> &str {
        match self {
            Self::Category(key) => key,
            Self::Special => SPECIAL_ORIGIN,
        }
    }
}

/// (origin, position within that origin's enumeration, filename).
///
/// Only the catalog hands these out, so the index always points at `filename`
/// in the catalog that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentRef {
    origin: Origin,
    index: usize,
    filename: String,
}

impl DocumentRef {
    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn is_special(&self) -> bool {
        self.origin == Origin::Special
    }
}

/// Immutable registry of categories and special documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    categories: Vec<Category>,
    specials: Vec<SpecialDocument>,
}

impl Catalog {
    pub fn new(categories: Vec<Category>, specials: Vec<SpecialDocument>) -> Result<Self> {
        let catalog = Self {
            categories,
            specials,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    fn validate(&self) -> Result<()> {
        let mut category_keys = HashSet::new();
        for category in &self.categories {
            validate_key("category", category.key())?;
            if category.key() == SPECIAL_ORIGIN {
                return Err(CatalogError::invalid_key(
                    "category",
                    category.key(),
                    "reserved for special documents",
                ));
            }
            if !category_keys.insert(category.key()) {
                return Err(CatalogError::DuplicateKey {
                    kind: "category",
                    key: category.key().to_string(),
                });
            }
            validate_folder(category.key(), category.folder())?;
        }

        let mut special_keys = HashSet::new();
        for special in &self.specials {
            validate_key("special", special.key())?;
            if !special_keys.insert(special.key()) {
                return Err(CatalogError::DuplicateKey {
                    kind: "special",
                    key: special.key().to_string(),
                });
            }
        }

        // filename -> owner label, across both namespaces
        let mut owners: HashMap<&str, String> = HashMap::new();
        let entries = self
            .categories
            .iter()
            .flat_map(|category| {
                category
                    .files()
                    .iter()
                    .map(move |file| (file.filename.as_str(), category.key().to_string()))
            })
            .chain(
                self.specials
                    .iter()
                    .map(|special| (special.filename(), format!("special:{}", special.key()))),
            );
        for (filename, owner) in entries {
            validate_filename(filename)?;
            if let Some(first) = owners.get(filename) {
                return Err(CatalogError::DuplicateFilename {
                    filename: filename.to_string(),
                    first: first.clone(),
                    second: owner,
                });
            }
            owners.insert(filename, owner);
        }
        Ok(())
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn specials(&self) -> &[SpecialDocument] {
        &self.specials
    }

    pub fn category(&self, key: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.key() == key)
    }

    pub fn list_category(&self, key: &str) -> Result<&[CatalogFile]> {
        self.category(key)
            .map(Category::files)
            .ok_or_else(|| CatalogError::UnknownCategory(key.to_string()))
    }

    pub fn lookup_description(&self, category: &str, filename: &str) -> Result<&str> {
        let files = self.list_category(category)?;
        files
            .iter()
            .find(|file| file.filename == filename)
            .map(|file| file.description.as_str())
            .ok_or_else(|| CatalogError::UnknownDocument {
                category: category.to_string(),
                filename: filename.to_string(),
            })
    }

    pub fn resolve_special(&self, key: &str) -> Result<&SpecialDocument> {
        self.specials
            .iter()
            .find(|special| special.key() == key)
            .ok_or_else(|| CatalogError::UnknownSpecial(key.to_string()))
    }

    /// Finds a document by exact filename: categories first, then specials.
    pub fn locate(&self, filename: &str) -> Option<DocumentRef> {
        for category in &self.categories {
            if let Some(index) = category.position(filename) {
                return Some(DocumentRef {
                    origin: Origin::Category(category.key().to_string()),
                    index,
                    filename: filename.to_string(),
                });
            }
        }
        self.specials
            .iter()
            .position(|special| special.filename() == filename)
            .map(|index| DocumentRef {
                origin: Origin::Special,
                index,
                filename: filename.to_string(),
            })
    }

    pub fn document_at(&self, origin: &Origin, index: usize) -> Option<DocumentRef> {
        let filename = match origin {
            Origin::Category(key) => self
                .category(key)?
                .files()
                .get(index)
                .map(|file| file.filename.clone())?,
            Origin::Special => self.specials.get(index)?.filename().to_string(),
        };
        Some(DocumentRef {
            origin: origin.clone(),
            index,
            filename,
        })
    }

    pub fn special_ref(&self, key: &str) -> Result<DocumentRef> {
        let index = self
            .specials
            .iter()
            .position(|special| special.key() == key)
            .ok_or_else(|| CatalogError::UnknownSpecial(key.to_string()))?;
        Ok(DocumentRef {
            origin: Origin::Special,
            index,
            filename: self.specials[index].filename().to_string(),
        })
    }

    /// Documents of one origin in enumeration order.
    pub fn documents_in(&self, origin: &Origin) -> Vec<DocumentRef> {
        let len = match origin {
            Origin::Category(key) => self.category(key).map_or(0, |c| c.files().len()),
            Origin::Special => self.specials.len(),
        };
        (0..len)
            .filter_map(|index| self.document_at(origin, index))
            .collect()
    }

    /// Every document in catalog insertion order: categories, then specials.
    pub fn documents(&self) -> impl Iterator<Item = DocumentRef> + '_ {
        let categorized = self.categories.iter().flat_map(|category| {
            category
                .files()
                .iter()
                .enumerate()
                .map(move |(index, file)| DocumentRef {
                    origin: Origin::Category(category.key().to_string()),
                    index,
                    filename: file.filename.clone(),
                })
        });
        let specials = self
            .specials
            .iter()
            .enumerate()
            .map(|(index, special)| DocumentRef {
                origin: Origin::Special,
                index,
                filename: special.filename().to_string(),
            });
        categorized.chain(specials)
    }

    pub fn document_count(&self) -> usize {
        self.categories
            .iter()
            .map(|category| category.files().len())
            .sum::<usize>()
            + self.specials.len()
    }

    pub fn contains_filename(&self, filename: &str) -> bool {
        self.locate(filename).is_some()
    }

    /// Human description: category description, special title, or `None`.
    pub fn describe(&self, doc: &DocumentRef) -> Option<&str> {
        match doc.origin() {
            Origin::Category(key) => self.lookup_description(key, doc.filename()).ok(),
            Origin::Special => self.specials.get(doc.index()).and_then(SpecialDocument::title),
        }
    }

    /// Path of a document relative to the documents root.
    pub fn relative_path(&self, doc: &DocumentRef) -> PathBuf {
        match doc.origin() {
            Origin::Category(key) => match self.category(key) {
                Some(category) if !category.folder().is_empty() => {
                    Path::new(category.folder()).join(doc.filename())
                }
                _ => PathBuf::from(doc.filename()),
            },
            Origin::Special => PathBuf::from(doc.filename()),
        }
    }
}

fn validate_key(kind: &'static str, key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(CatalogError::invalid_key(kind, key, "must not be empty"));
    }
    if key.len() > MAX_KEY_CHARS {
        return Err(CatalogError::invalid_key(
            kind,
            key,
            format!("longer than {MAX_KEY_CHARS} chars"),
        ));
    }
    if !key.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(CatalogError::invalid_key(
            kind,
            key,
            "only ASCII letters and digits are allowed",
        ));
    }
    Ok(())
}

fn validate_filename(filename: &str) -> Result<()> {
    if filename.trim().is_empty() {
        return Err(CatalogError::Invalid("empty filename in catalog".to_string()));
    }
    if filename.contains('/') || filename.contains('\\') || filename == ".." {
        return Err(CatalogError::Invalid(format!(
            "filename '{filename}' must not contain path separators"
        )));
    }
    Ok(())
}

fn validate_folder(key: &str, folder: &str) -> Result<()> {
    for component in Path::new(folder).components() {
        match component {
            Component::Prefix(_) | Component::RootDir => {
                return Err(CatalogError::Invalid(format!(
                    "category '{key}' folder must be relative"
                )));
            }
            Component::ParentDir => {
                return Err(CatalogError::Invalid(format!(
                    "category '{key}' folder must not contain '..'"
                )));
            }
            Component::CurDir | Component::Normal(_) => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn file(name: &str, description: &str) -> CatalogFile {
        CatalogFile {
            filename: name.to_string(),
            description: description.to_string(),
        }
    }

    fn sample() -> Catalog {
        Catalog::new(
            vec![
                Category::new(
                    "net",
                    "Network",
                    "net",
                    vec![file("a.pdf", "A doc"), file("b.pdf", "B doc")],
                ),
                Category::new("tools", "Tools", "", vec![file("c.pdf", "C doc")]),
            ],
            vec![SpecialDocument::new("quick", "q.pdf").with_title("Quick")],
        )
        .expect("valid catalog")
    }

    #[test]
    fn locate_prefers_categories_then_specials() {
        let catalog = sample();
        let doc = catalog.locate("b.pdf").expect("b");
        assert_eq!(doc.origin(), &Origin::Category("net".to_string()));
        assert_eq!(doc.index(), 1);

        let special = catalog.locate("q.pdf").expect("q");
        assert!(special.is_special());
        assert_eq!(special.index(), 0);

        assert!(catalog.locate("B.pdf").is_none(), "matching is case-sensitive");
    }

    #[test]
    fn lookups_report_not_found() {
        let catalog = sample();
        assert_eq!(catalog.lookup_description("net", "a.pdf").unwrap(), "A doc");
        assert!(matches!(
            catalog.lookup_description("net", "c.pdf"),
            Err(CatalogError::UnknownDocument { .. })
        ));
        assert!(matches!(
            catalog.list_category("nope"),
            Err(CatalogError::UnknownCategory(_))
        ));
        assert!(matches!(
            catalog.resolve_special("slow"),
            Err(CatalogError::UnknownSpecial(_))
        ));
        assert_eq!(catalog.resolve_special("quick").unwrap().filename(), "q.pdf");
    }

    #[test]
    fn documents_follow_insertion_order() {
        let catalog = sample();
        let names: Vec<String> = catalog
            .documents()
            .map(|doc| doc.filename().to_string())
            .collect();
        assert_eq!(names, vec!["a.pdf", "b.pdf", "c.pdf", "q.pdf"]);
        assert_eq!(catalog.document_count(), 4);
    }

    #[test]
    fn relative_paths_use_category_folder() {
        let catalog = sample();
        let a = catalog.locate("a.pdf").unwrap();
        let c = catalog.locate("c.pdf").unwrap();
        let q = catalog.locate("q.pdf").unwrap();
        assert_eq!(catalog.relative_path(&a), Path::new("net").join("a.pdf"));
        assert_eq!(catalog.relative_path(&c), PathBuf::from("c.pdf"));
        assert_eq!(catalog.relative_path(&q), PathBuf::from("q.pdf"));
    }

    #[test]
    fn rejects_filename_in_two_namespaces() {
        let err = Catalog::new(
            vec![Category::new("net", "Network", "", vec![file("a.pdf", "A")])],
            vec![SpecialDocument::new("quick", "a.pdf")],
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateFilename { .. }));
    }

    #[test]
    fn rejects_reserved_and_malformed_keys() {
        let reserved = Catalog::new(
            vec![Category::new("special", "S", "", Vec::new())],
            Vec::new(),
        );
        assert!(matches!(reserved, Err(CatalogError::InvalidKey { .. })));

        let underscore = Catalog::new(
            vec![Category::new("net_x", "S", "", Vec::new())],
            Vec::new(),
        );
        assert!(matches!(underscore, Err(CatalogError::InvalidKey { .. })));

        let escaping = Catalog::new(
            vec![Category::new("net", "S", "../etc", Vec::new())],
            Vec::new(),
        );
        assert!(matches!(escaping, Err(CatalogError::Invalid(_))));
    }

    #[test]
    fn document_at_and_documents_in_agree() {
        let catalog = sample();
        let origin = Origin::from_key("net");
        let listed = catalog.documents_in(&origin);
        assert_eq!(listed.len(), 2);
        assert_eq!(catalog.document_at(&origin, 1), Some(listed[1].clone()));
        assert_eq!(catalog.document_at(&origin, 2), None);
        assert_eq!(Origin::from_key("special"), Origin::Special);
    }
}
