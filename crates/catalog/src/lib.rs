//! # Knowledge-base catalog
//!
//! Static registry of categories, their ordered documents, uncategorized
//! ("special") documents and the keyword table that the resolver searches.
//!
//! Everything here is built once at startup (`KnowledgeBase::builtin` or
//! `KnowledgeBase::from_file`) and never mutated afterwards. Loading validates
//! the invariants the token codec relies on:
//!
//! - category and special keys are short ASCII alphanumerics (`_` is the token separator)
//! - a filename lives in exactly one place across both namespaces
//! - every keyword target is a catalog document

mod catalog;
mod error;
mod keywords;
mod knowledge_base;

pub use catalog::{
    Catalog, CatalogFile, Category, DocumentRef, Origin, SpecialDocument, MAX_KEY_CHARS,
    SPECIAL_ORIGIN,
};
pub use error::{CatalogError, Result};
pub use keywords::KeywordTable;
pub use knowledge_base::KnowledgeBase;
