use kb_catalog::{Catalog, KnowledgeBase};
use kb_engine::test_support::{RecordingTransport, TransportCall};
use kb_engine::{texts, Engine};
use kb_protocol::{InboundEvent, Reply};
use pretty_assertions::assert_eq;
use std::collections::HashSet;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

const CHAT: i64 = 42;

/// Builtin catalog with every document present on disk.
fn documents_tree(kb: &KnowledgeBase) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let catalog: &Catalog = kb.catalog();
    for doc in catalog.documents() {
        let path = dir.path().join(catalog.relative_path(&doc));
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, b"%PDF-1.4").unwrap();
    }
    dir
}

fn engine() -> (Engine<RecordingTransport>, TempDir) {
    let kb = Arc::new(KnowledgeBase::builtin());
    let dir = documents_tree(&kb);
    let engine = Engine::new(kb, dir.path(), RecordingTransport::new());
    (engine, dir)
}

#[tokio::test]
async fn start_greets_user() {
    let (engine, _dir) = engine();
    let reply = engine.on_message(CHAT, "Аня", "/start").await;
    assert!(reply.body().unwrap().contains("Привет, Аня!"));
    assert_eq!(engine.transport().calls().len(), 1);
}

#[tokio::test]
async fn category_then_back_restores_root_picker() {
    let (engine, _dir) = engine();
    let root = engine.on_message(CHAT, "Аня", "/all").await;
    let Reply::SendText { text, layout } = root else {
        panic!("/all must send a new message");
    };
    let layout = layout.expect("root buttons");
    let category_token = layout.buttons().next().unwrap().token.clone();
    assert_eq!(category_token, "cat_critical");

    let opened = engine
        .on_button_press(CHAT, 100, "cb-1", &category_token)
        .await;
    match &opened {
        Reply::EditText {
            message_id, layout, ..
        } => {
            assert_eq!(*message_id, 100);
            let layout = layout.as_ref().unwrap();
            assert_eq!(layout.button_count(), 4);
            assert_eq!(layout.rows().last().unwrap()[0].token, "back");
        }
        other => panic!("category must edit in place, got {other:?}"),
    }

    let back = engine.on_button_press(CHAT, 100, "cb-2", "back").await;
    assert_eq!(
        back,
        Reply::EditText {
            message_id: 100,
            text,
            layout: Some(layout),
        }
    );
}

#[tokio::test]
async fn category_file_button_sends_document() {
    let (engine, dir) = engine();
    let opened = engine
        .on_button_press(CHAT, 5, "cb", "cat_equipment")
        .await;
    let token = opened.layout().unwrap().buttons().nth(1).unwrap().token.clone();
    assert!(token.starts_with("file_equipment_1_"));

    let sent = engine.on_button_press(CHAT, 5, "cb2", &token).await;
    match sent {
        Reply::SendDocument {
            file,
            display_name,
            caption,
        } => {
            assert_eq!(display_name, "СВАРОЧНЫЕ АППАРАТЫ.pdf");
            assert_eq!(file, dir.path().join("03_equipment/СВАРОЧНЫЕ АППАРАТЫ.pdf"));
            assert!(caption.starts_with("📄 <b>"));
        }
        other => panic!("expected document, got {other:?}"),
    }
    assert!(matches!(
        engine.transport().calls().last(),
        Some(TransportCall::Document { .. })
    ));
}

#[tokio::test]
async fn free_text_search_buttons_are_unique_and_decodable() {
    let (engine, _dir) = engine();
    // "роутер" and "вайфай" both surface the router guide
    let reply = engine.on_message(CHAT, "Аня", "вайфай роутер").await;
    let layout = reply.layout().expect("search buttons");
    let tokens: Vec<&str> = layout.buttons().map(|b| b.token.as_str()).collect();
    let unique: HashSet<&str> = tokens.iter().copied().collect();
    assert_eq!(tokens.len(), unique.len());
    assert!(tokens.iter().all(|t| t.starts_with("search_") && t.len() <= 64));
    assert!(reply.body().unwrap().contains("Автопоиск"));

    for token in tokens {
        let sent = engine.on_button_press(CHAT, 9, "cb", token).await;
        assert!(matches!(sent, Reply::SendDocument { .. }), "{token}");
    }
}

#[tokio::test]
async fn short_free_text_never_searches() {
    let (engine, _dir) = engine();
    for input in ["", "a", "ок", "  ы "] {
        let reply = engine.on_message(CHAT, "Аня", input).await;
        assert_eq!(reply, Reply::text(texts::SHORT_INPUT), "{input:?}");
    }
}

#[tokio::test]
async fn bogus_token_shows_unavailable_message() {
    let (engine, _dir) = engine();
    let reply = engine
        .on_button_press(CHAT, 1, "cb", "file_bogus_99_doesnotexist")
        .await;
    assert_eq!(reply, Reply::text(texts::DOCUMENT_UNAVAILABLE));

    let reply = engine.on_button_press(CHAT, 1, "cb", "garbage").await;
    assert_eq!(reply, Reply::text(texts::DOCUMENT_UNAVAILABLE));
}

#[tokio::test]
async fn every_press_is_acknowledged_once() {
    let (engine, _dir) = engine();
    let tokens = ["back", "cat_critical", "special_quick", "garbage", "cat_nope"];
    for (i, token) in tokens.iter().enumerate() {
        engine
            .on_button_press(CHAT, 1, &format!("cb-{i}"), token)
            .await;
    }
    assert_eq!(engine.transport().acknowledgements(), tokens.len());
    let first = engine.transport().calls().into_iter().next();
    assert_eq!(
        first,
        Some(TransportCall::Acknowledge {
            interaction_id: "cb-0".to_string()
        })
    );
}

#[tokio::test]
async fn transport_failure_ends_turn_quietly() {
    let kb = Arc::new(KnowledgeBase::builtin());
    let dir = documents_tree(&kb);
    let engine = Engine::new(kb, dir.path(), RecordingTransport::failing());
    let reply = engine
        .on_event(&InboundEvent::ButtonPress {
            chat_id: CHAT,
            message_id: 3,
            interaction_id: "cb".into(),
            token: "back".into(),
        })
        .await;
    assert!(matches!(reply, Reply::EditText { .. }));
    assert_eq!(engine.transport().calls().len(), 2);
}

#[tokio::test]
async fn missing_file_on_disk_is_reported_not_sent() {
    let kb = Arc::new(KnowledgeBase::builtin());
    let empty = tempfile::tempdir().unwrap();
    let engine = Engine::new(kb, empty.path(), RecordingTransport::new());
    let reply = engine.on_button_press(CHAT, 1, "cb", "special_quick").await;
    assert_eq!(reply, Reply::text(texts::file_missing("Быстрый справочник.pdf")));
}

#[tokio::test]
async fn quick_command_sends_special_document() {
    let (engine, dir) = engine();
    let reply = engine.on_message(CHAT, "Аня", "/quick").await;
    assert_eq!(
        reply,
        Reply::SendDocument {
            file: dir.path().join("Быстрый справочник.pdf"),
            display_name: "Быстрый справочник.pdf".to_string(),
            caption: "<b>⚡ Быстрый справочник</b>".to_string(),
        }
    );
}

#[tokio::test]
async fn free_text_miss_offers_guidance() {
    let (engine, _dir) = engine();
    let reply = engine.on_message(CHAT, "Аня", "zzz-no-match-zzz").await;
    let body = reply.body().unwrap();
    assert!(body.starts_with("🔍 <b>Ничего не найдено"));
    assert!(reply.layout().is_none());
}

#[tokio::test]
async fn unknown_command_lists_commands() {
    let (engine, _dir) = engine();
    let reply = engine.on_message(CHAT, "Аня", "/help").await;
    assert_eq!(reply, Reply::text(texts::UNKNOWN_COMMAND));
}
