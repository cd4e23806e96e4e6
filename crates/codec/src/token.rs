use kb_catalog::{Catalog, DocumentRef, Origin};
use kb_protocol::TOKEN_MAX_CHARS;

use crate::sanitize::{sanitize_filename, MAX_SANITIZED_CHARS};
use crate::{CodecError, Result};

pub const SEPARATOR: char = '_';

/// Context a document button was rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// Free-text or `/search` results
    Search,
    /// Category browsing
    File,
}

impl Namespace {
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Search => "search",
            Self::File => "file",
        }
    }

    pub fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "search" => Some(Self::Search),
            "file" => Some(Self::File),
            _ => None,
        }
    }
}

/// Room left for the sanitized filename once the header is written.
pub fn name_budget(header_len: usize) -> usize {
    MAX_SANITIZED_CHARS.min(TOKEN_MAX_CHARS.saturating_sub(header_len))
}

/// `namespace_origin_index_sanitizedname`, never longer than [`TOKEN_MAX_CHARS`].
pub fn encode(namespace: Namespace, doc: &DocumentRef) -> Result<String> {
    let header = format!(
        "{prefix}{SEPARATOR}{origin}{SEPARATOR}{index}{SEPARATOR}",
        prefix = namespace.prefix(),
        origin = doc.origin().key(),
        index = doc.index(),
    );
    if header.len() > TOKEN_MAX_CHARS {
        return Err(CodecError::TooLong {
            len: header.len(),
            max: TOKEN_MAX_CHARS,
        });
    }
    let name = sanitize_filename(doc.filename(), name_budget(header.len()));
    let mut token = header;
    token.push_str(&name);
    debug_assert!(token.len() <= TOKEN_MAX_CHARS);
    Ok(token)
}

/// The four logical fields of a document token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentToken<'t> {
    pub namespace: Namespace,
    pub origin: &'t str,
    /// `None` when the index field is not a number (foreign/legacy token).
    pub index: Option<usize>,
    pub name: &'t str,
    header_len: usize,
}

impl<'t> DocumentToken<'t> {
    pub fn parse(token: &'t str) -> Result<Self> {
        if token.is_empty() || token.len() > TOKEN_MAX_CHARS || !token.is_ascii() {
            return Err(CodecError::malformed(token));
        }
        let mut fields = token.splitn(4, SEPARATOR);
        let namespace = fields
            .next()
            .and_then(Namespace::from_prefix)
            .ok_or_else(|| CodecError::malformed(token))?;
        let origin = fields
            .next()
            .filter(|origin| !origin.is_empty())
            .ok_or_else(|| CodecError::malformed(token))?;
        let index_field = fields.next().ok_or_else(|| CodecError::malformed(token))?;
        // the name field may be empty, but the separator before it must exist
        let name = fields.next().ok_or_else(|| CodecError::malformed(token))?;

        Ok(Self {
            namespace,
            origin,
            index: index_field.parse().ok(),
            name,
            header_len: token.len() - name.len(),
        })
    }

    fn name_budget(&self) -> usize {
        name_budget(self.header_len)
    }
}

/// Recovers the document behind `token`.
///
/// The positional index is authoritative. Only when it is missing or out of
/// range does decoding re-sanitize candidate filenames (the token's category
/// when known, otherwise the whole catalog, in insertion order) and take the
/// first whose sanitized form equals the embedded name. Two filenames that
/// sanitize identically are therefore resolved to the earlier one.
pub fn decode(token: &str, catalog: &Catalog) -> Result<DocumentRef> {
    let parsed = DocumentToken::parse(token)?;
    let origin = Origin::from_key(parsed.origin);

    if let Some(index) = parsed.index {
        if let Some(doc) = catalog.document_at(&origin, index) {
            if sanitize_filename(doc.filename(), parsed.name_budget()) != parsed.name {
                log::debug!(
                    "token {token}: name does not match {} at index {index}; index wins",
                    doc.filename()
                );
            }
            return Ok(doc);
        }
        log::debug!("token {token}: index {index} not in '{}'", parsed.origin);
    }

    decode_by_name(token, &parsed, &origin, catalog)
}

fn decode_by_name(
    token: &str,
    parsed: &DocumentToken<'_>,
    origin: &Origin,
    catalog: &Catalog,
) -> Result<DocumentRef> {
    let scoped = match origin {
        Origin::Category(key) => catalog.category(key).is_some(),
        Origin::Special => true,
    };
    let candidates: Vec<DocumentRef> = if scoped {
        catalog.documents_in(origin)
    } else {
        catalog.documents().collect()
    };

    let budget = parsed.name_budget();
    let mut matches = candidates
        .into_iter()
        .filter(|doc| sanitize_filename(doc.filename(), budget) == parsed.name);
    let first = matches
        .next()
        .ok_or_else(|| CodecError::not_found(token))?;
    if let Some(other) = matches.next() {
        log::debug!(
            "token {token} is ambiguous ({} vs {}); using first match",
            first.filename(),
            other.filename()
        );
    }
    Ok(first)
}
