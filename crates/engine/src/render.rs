use crate::texts::{self, escape_html};
use kb_catalog::{Catalog, Category, DocumentRef, KnowledgeBase, Origin};
use kb_codec::{category_token, encode, special_token, Namespace, BACK_TOKEN};
use kb_protocol::{Button, ButtonLayout};
use unicode_segmentation::UnicodeSegmentation;

/// Graphemes kept from a bare filename used as a button label.
pub const LABEL_GRAPHEMES: usize = 30;

/// Category picker shown by `/all` and by the back button.
pub fn root_picker(kb: &KnowledgeBase) -> (String, ButtonLayout) {
    let catalog = kb.catalog();
    let mut text = format!(
        "📚 <b>Все инструкции {}:</b>\n\n<b>{} PDF файлов</b> в {} категориях:\n\n",
        escape_html(kb.title()),
        catalog.document_count(),
        catalog.categories().len()
    );
    for category in catalog.categories() {
        match category.summary() {
            Some(summary) => text.push_str(&format!(
                "<b>{}</b> - {}\n",
                escape_html(category.name()),
                escape_html(summary)
            )),
            None => text.push_str(&format!("<b>{}</b>\n", escape_html(category.name()))),
        }
    }
    text.push_str("\nВыбери категорию:");

    let mut layout = ButtonLayout::new();
    for category in catalog.categories() {
        layout.push_row(vec![Button::new(
            category.name(),
            category_token(category.key()),
        )]);
    }
    for special in catalog.specials() {
        let label = special.title().unwrap_or_else(|| special.filename());
        layout.push_row(vec![Button::new(label, special_token(special.key()))]);
    }
    (text, layout)
}

/// File picker for one category, with a trailing back row.
pub fn category_picker(catalog: &Catalog, category: &Category) -> (String, ButtonLayout) {
    let origin = Origin::Category(category.key().to_string());
    let mut layout = document_buttons(catalog, Namespace::File, &catalog.documents_in(&origin));
    layout.push_row(vec![Button::new(texts::BACK_LABEL, BACK_TOKEN)]);
    (texts::category_header(category.name()), layout)
}

/// One row per document, in the given order. Documents whose token cannot be
/// built are skipped.
pub fn document_buttons(
    catalog: &Catalog,
    namespace: Namespace,
    docs: &[DocumentRef],
) -> ButtonLayout {
    let mut layout = ButtonLayout::new();
    for doc in docs {
        match encode(namespace, doc) {
            Ok(token) => layout.push_row(vec![Button::new(button_label(catalog, doc), token)]),
            Err(err) => log::warn!("skipping button for '{}': {err}", doc.filename()),
        }
    }
    layout
}

/// Category description, or the filename cut to [`LABEL_GRAPHEMES`] plus "...".
pub fn button_label(catalog: &Catalog, doc: &DocumentRef) -> String {
    if let Origin::Category(key) = doc.origin() {
        if let Ok(description) = catalog.lookup_description(key, doc.filename()) {
            return description.to_string();
        }
    }
    let head: String = doc
        .filename()
        .graphemes(true)
        .take(LABEL_GRAPHEMES)
        .collect();
    format!("{head}...")
}

#[cfg(test)]
mod tests {
    use super::*;
    use kb_catalog::{CatalogFile, KeywordTable, SpecialDocument};
    use kb_protocol::TOKEN_MAX_CHARS;
    use pretty_assertions::assert_eq;

    fn kb() -> KnowledgeBase {
        let catalog = Catalog::new(
            vec![Category::new(
                "tools",
                "Инструменты",
                "",
                vec![
                    CatalogFile {
                        filename: "a.pdf".into(),
                        description: "Первый".into(),
                    },
                    CatalogFile {
                        filename: "b.pdf".into(),
                        description: "Второй".into(),
                    },
                ],
            )
            .with_summary("сварка")],
            vec![SpecialDocument::new(
                "quick",
                "Очень длинное имя файла справочника для бригад.pdf",
            )],
        )
        .unwrap();
        KnowledgeBase::new("Test", catalog, KeywordTable::new()).unwrap()
    }

    #[test]
    fn root_lists_categories_then_specials() {
        let kb = kb();
        let (text, layout) = root_picker(&kb);
        assert!(text.contains("<b>3 PDF файлов</b> в 1 категориях"));
        assert!(text.contains("<b>Инструменты</b> - сварка"));
        let tokens: Vec<&str> = layout.buttons().map(|b| b.token.as_str()).collect();
        assert_eq!(tokens, vec!["cat_tools", "special_quick"]);
    }

    #[test]
    fn category_picker_ends_with_back() {
        let kb = kb();
        let catalog = kb.catalog();
        let category = catalog.category("tools").unwrap();
        let (text, layout) = category_picker(catalog, category);
        assert_eq!(text, "<b>Инструменты</b>\n\nВыбери PDF:");
        assert_eq!(layout.button_count(), 3);
        let last = layout.rows().last().unwrap();
        assert_eq!(last[0].token, BACK_TOKEN);
        assert!(layout.buttons().all(|b| b.token.len() <= TOKEN_MAX_CHARS));
        assert!(layout.buttons().next().unwrap().token.starts_with("file_tools_0_"));
    }

    #[test]
    fn special_label_is_truncated_filename() {
        let kb = kb();
        let doc = kb.catalog().special_ref("quick").unwrap();
        let label = button_label(kb.catalog(), &doc);
        assert!(label.ends_with("..."));
        assert_eq!(label.graphemes(true).count(), LABEL_GRAPHEMES + 3);
    }
}
