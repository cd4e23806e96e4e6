use kb_catalog::{CatalogError, KnowledgeBase, Origin};
use std::fs;
use tempfile::tempdir;

#[test]
fn loads_catalog_from_disk() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("kb.toml");
    fs::write(
        &path,
        r#"
title = "Disk KB"
contacts = "  call 123  "

[[categories]]
key = "tools"
name = "Tools"
summary = "hand tools"
folder = "tools"
files = [{ filename = "Стриппер.pdf", description = "Stripper" }]

[keywords]
"стриппер" = ["Стриппер.pdf"]
"#,
    )
    .unwrap();

    let kb = KnowledgeBase::from_file(&path).expect("load");
    assert_eq!(kb.title(), "Disk KB");
    assert_eq!(kb.contacts(), Some("call 123"));

    let category = kb.catalog().category("tools").expect("tools");
    assert_eq!(category.summary(), Some("hand tools"));

    let doc = kb.catalog().locate("Стриппер.pdf").expect("doc");
    assert_eq!(doc.origin(), &Origin::Category("tools".to_string()));
}

#[test]
fn missing_file_reports_path() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("absent.toml");
    let err = KnowledgeBase::from_file(&path).unwrap_err();
    assert!(matches!(err, CatalogError::Io { .. }));
    assert!(err.to_string().contains("absent.toml"));
}

#[test]
fn builtin_keywords_all_resolve_to_documents() {
    let kb = KnowledgeBase::builtin();
    for (keyword, files) in kb.keywords().iter() {
        assert!(!files.is_empty(), "keyword {keyword} has no files");
        assert_eq!(keyword, keyword.to_lowercase());
        for file in files {
            assert!(kb.catalog().contains_filename(file), "{keyword} -> {file}");
        }
    }
}
