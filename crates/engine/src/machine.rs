//! Turn planner: one inbound event in, one [`Turn`] out.
//!
//! Pure with respect to the chat: nothing here talks to the transport. The
//! only I/O is the `is_file` probe before a document is handed over.

use crate::error::{EngineError, Result};
use crate::render;
use crate::texts;
use kb_catalog::{DocumentRef, KnowledgeBase, Origin};
use kb_codec::{decode, Callback, Namespace};
use kb_protocol::{MessageId, Reply, Turn, UiState};
use kb_search::{KeywordHints, KeywordResolver};
use std::path::PathBuf;
use std::sync::Arc;

/// Free text shorter than this (in chars) never reaches the resolver.
pub const MIN_QUERY_CHARS: usize = 3;

/// Fuzzy suggestions offered on a free-text miss.
pub const MAX_HINTS: usize = 3;

/// Special document sent by `/quick`.
pub const QUICK_KEY: &str = "quick";

/// A planned turn plus the usage tag to log for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Planned {
    pub turn: Turn,
    pub usage: Option<String>,
}

impl Planned {
    fn new(turn: Turn) -> Self {
        Self { turn, usage: None }
    }

    fn idle(reply: Reply) -> Self {
        Self::new(Turn::idle(reply))
    }

    fn tagged(mut self, usage: impl Into<String>) -> Self {
        self.usage = Some(usage.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command<'t> {
    Start,
    Search(&'t str),
    All,
    Quick,
    Contacts,
    Unknown,
}

impl<'t> Command<'t> {
    /// `text` starts with `/`. A `@botname` suffix on the command word is ignored.
    fn parse(text: &'t str) -> Self {
        let (word, rest) = match text.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (text, ""),
        };
        let word = word.split_once('@').map_or(word, |(word, _)| word);
        match word {
            "/start" => Self::Start,
            "/search" => Self::Search(rest),
            "/all" => Self::All,
            "/quick" => Self::Quick,
            "/contacts" => Self::Contacts,
            _ => Self::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchMode {
    Command,
    Auto,
}

pub struct Planner {
    kb: Arc<KnowledgeBase>,
    documents_dir: PathBuf,
}

impl Planner {
    pub fn new(kb: Arc<KnowledgeBase>, documents_dir: impl Into<PathBuf>) -> Self {
        Self {
            kb,
            documents_dir: documents_dir.into(),
        }
    }

    pub fn plan_message(&self, user_display_name: &str, text: &str) -> Planned {
        let text = text.trim();
        if text.starts_with('/') {
            return self.plan_command(user_display_name, Command::parse(text));
        }
        if text.chars().count() < MIN_QUERY_CHARS {
            return Planned::idle(Reply::text(texts::SHORT_INPUT));
        }
        self.search(text, SearchMode::Auto)
    }

    pub fn plan_button(&self, message_id: MessageId, token: &str) -> Planned {
        let callback = match Callback::parse(token) {
            Ok(callback) => callback,
            Err(err) => {
                log::warn!("unrecognised button token: {err}");
                return Planned::idle(Reply::text(texts::DOCUMENT_UNAVAILABLE));
            }
        };
        match callback {
            Callback::Back => {
                let (text, layout) = render::root_picker(&self.kb);
                Planned::new(Turn {
                    reply: Reply::EditText {
                        message_id,
                        text,
                        layout: Some(layout),
                    },
                    state: UiState::ShowingRoot,
                })
                .tagged("back")
            }
            Callback::Category(key) => self.open_category(message_id, key),
            Callback::Special(key) => match self.kb.catalog().special_ref(key) {
                Ok(doc) => self.send_document(&doc),
                Err(err) => {
                    log::warn!("{err}");
                    Planned::idle(Reply::text(texts::DOCUMENT_UNAVAILABLE))
                }
            },
            Callback::Document(_, token) => match decode(token, self.kb.catalog()) {
                Ok(doc) => self.send_document(&doc),
                Err(err) => {
                    log::warn!("{err}");
                    Planned::idle(Reply::text(texts::DOCUMENT_UNAVAILABLE))
                }
            },
        }
    }

    fn plan_command(&self, user_display_name: &str, command: Command<'_>) -> Planned {
        match command {
            Command::Start => Planned::idle(Reply::text(texts::welcome(
                user_display_name,
                self.kb.title(),
            )))
            .tagged("start"),
            Command::Search(args) => {
                let query = args.split_whitespace().collect::<Vec<_>>().join(" ");
                if query.is_empty() {
                    Planned::idle(Reply::text(texts::SEARCH_USAGE))
                } else {
                    self.search(&query, SearchMode::Command)
                }
            }
            Command::All => {
                let (text, layout) = render::root_picker(&self.kb);
                Planned::new(Turn {
                    reply: Reply::with_buttons(text, layout),
                    state: UiState::ShowingRoot,
                })
                .tagged("all")
            }
            Command::Quick => match self.kb.catalog().special_ref(QUICK_KEY) {
                Ok(doc) => {
                    let mut planned = self.send_document(&doc);
                    planned.usage = Some("quick".to_string());
                    planned
                }
                Err(err) => {
                    log::warn!("/quick: {err}");
                    Planned::idle(Reply::text(texts::DOCUMENT_UNAVAILABLE))
                }
            },
            Command::Contacts => Planned::idle(Reply::text(
                self.kb.contacts().unwrap_or(texts::CONTACTS_MISSING),
            ))
            .tagged("contacts"),
            Command::Unknown => Planned::idle(Reply::text(texts::UNKNOWN_COMMAND)),
        }
    }

    fn search(&self, query: &str, mode: SearchMode) -> Planned {
        let resolution = KeywordResolver::new(self.kb.keywords()).resolve(query);
        let usage = format!("search:{}", resolution.query);

        if resolution.is_empty() {
            let text = match mode {
                SearchMode::Command => texts::not_found(&resolution.query),
                SearchMode::Auto => {
                    let hints = KeywordHints::new().suggest(
                        &resolution.query,
                        self.kb.keywords(),
                        MAX_HINTS,
                    );
                    texts::no_results(&resolution.query, &hints)
                }
            };
            return Planned::idle(Reply::text(text)).tagged(usage);
        }

        let catalog = self.kb.catalog();
        let docs: Vec<DocumentRef> = resolution
            .filenames
            .iter()
            .filter_map(|filename| {
                let doc = catalog.locate(filename);
                if doc.is_none() {
                    log::warn!("keyword target '{filename}' is not in the catalog");
                }
                doc
            })
            .collect();
        let layout = render::document_buttons(catalog, Namespace::Search, &docs);
        if layout.is_empty() {
            return Planned::idle(Reply::text(texts::BUTTONS_UNAVAILABLE)).tagged(usage);
        }

        let header = match mode {
            SearchMode::Command => texts::command_results(layout.button_count()),
            SearchMode::Auto => texts::auto_results(&resolution.query, layout.button_count()),
        };
        Planned::idle(Reply::with_buttons(header, layout)).tagged(usage)
    }

    fn open_category(&self, message_id: MessageId, key: &str) -> Planned {
        let catalog = self.kb.catalog();
        let Some(category) = catalog.category(key) else {
            log::warn!("button for unknown category '{key}'");
            return Planned::idle(Reply::text(texts::CATEGORY_UNAVAILABLE));
        };
        let (text, layout) = render::category_picker(catalog, category);
        Planned::new(Turn {
            reply: Reply::EditText {
                message_id,
                text,
                layout: Some(layout),
            },
            state: UiState::ShowingCategory {
                category: key.to_string(),
            },
        })
        .tagged(format!("category:{key}"))
    }

    fn send_document(&self, doc: &DocumentRef) -> Planned {
        let usage = format!("document:{}", doc.filename());
        match self.document_reply(doc) {
            Ok(reply) => Planned::idle(reply).tagged(usage),
            Err(err) => {
                log::warn!("{err}");
                Planned::idle(Reply::text(texts::file_missing(doc.filename()))).tagged(usage)
            }
        }
    }

    fn document_reply(&self, doc: &DocumentRef) -> Result<Reply> {
        let catalog = self.kb.catalog();
        let file = self.documents_dir.join(catalog.relative_path(doc));
        if !file.is_file() {
            return Err(EngineError::not_found(file.display().to_string()));
        }
        let caption = match doc.origin() {
            Origin::Category(_) => {
                texts::document_caption(catalog.describe(doc).unwrap_or(doc.filename()))
            }
            Origin::Special => match catalog.describe(doc) {
                Some(title) => format!("<b>{}</b>", texts::escape_html(title)),
                None => texts::document_caption(doc.filename()),
            },
        };
        Ok(Reply::SendDocument {
            file,
            display_name: doc.filename().to_string(),
            caption,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn command_word_parsing() {
        assert_eq!(Command::parse("/start"), Command::Start);
        assert_eq!(Command::parse("/all@homeline_bot"), Command::All);
        assert_eq!(Command::parse("/search   вай фай "), Command::Search("вай фай"));
        assert_eq!(Command::parse("/search"), Command::Search(""));
        assert_eq!(Command::parse("/searchx"), Command::Unknown);
        assert_eq!(Command::parse("/"), Command::Unknown);
    }

    fn planner() -> Planner {
        Planner::new(Arc::new(KnowledgeBase::builtin()), "/nonexistent-kb-dir")
    }

    #[test]
    fn short_input_gets_guidance() {
        let planned = planner().plan_message("Аня", "ok");
        assert_eq!(planned.turn, Turn::idle(Reply::text(texts::SHORT_INPUT)));
        assert_eq!(planned.usage, None);
    }

    #[test]
    fn short_input_counts_chars_not_bytes() {
        // two Cyrillic letters are four bytes
        let planned = planner().plan_message("Аня", "да");
        assert_eq!(planned.turn.reply, Reply::text(texts::SHORT_INPUT));
    }

    #[test]
    fn search_without_argument_shows_usage() {
        let planned = planner().plan_message("Аня", "/search");
        assert_eq!(planned.turn.reply, Reply::text(texts::SEARCH_USAGE));
    }

    #[test]
    fn search_argument_whitespace_is_collapsed() {
        let planned = planner().plan_message("Аня", "/search не  \t работает");
        assert_eq!(planned.usage.as_deref(), Some("search:не работает"));
        assert!(planned.turn.reply.layout().is_some());
    }

    #[test]
    fn command_miss_is_strict() {
        let planned = planner().plan_message("Аня", "/search zzz-no-match-zzz");
        assert_eq!(
            planned.turn.reply,
            Reply::text(texts::not_found("zzz-no-match-zzz"))
        );
        assert_eq!(planned.usage.as_deref(), Some("search:zzz-no-match-zzz"));
    }

    #[test]
    fn missing_file_on_disk_is_reported() {
        let planned = planner().plan_message("Аня", "/quick");
        let body = planned.turn.reply.body().unwrap_or_default().to_string();
        assert!(body.contains("Быстрый справочник.pdf"), "{body}");
        assert_eq!(planned.usage.as_deref(), Some("quick"));
    }

    #[test]
    fn unknown_category_is_visible() {
        let planned = planner().plan_button(7, "cat_nope");
        assert_eq!(planned.turn.reply, Reply::text(texts::CATEGORY_UNAVAILABLE));
    }
}
