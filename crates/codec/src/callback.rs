use crate::token::{Namespace, SEPARATOR};
use crate::{CodecError, Result};

/// Token of the "back to categories" button.
pub const BACK_TOKEN: &str = "back";

const CATEGORY_PREFIX: &str = "cat";
const SPECIAL_PREFIX: &str = "special";

pub fn category_token(key: &str) -> String {
    format!("{CATEGORY_PREFIX}{SEPARATOR}{key}")
}

pub fn special_token(key: &str) -> String {
    format!("{SPECIAL_PREFIX}{SEPARATOR}{key}")
}

/// What a pressed button asks for, before any catalog lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Callback<'t> {
    Back,
    Category(&'t str),
    Special(&'t str),
    /// `search_…` / `file_…`; decode with [`crate::decode`].
    Document(Namespace, &'t str),
}

impl<'t> Callback<'t> {
    pub fn parse(token: &'t str) -> Result<Self> {
        if token == BACK_TOKEN {
            return Ok(Self::Back);
        }
        let (prefix, rest) = token
            .split_once(SEPARATOR)
            .ok_or_else(|| CodecError::malformed(token))?;
        if rest.is_empty() {
            return Err(CodecError::malformed(token));
        }
        match prefix {
            CATEGORY_PREFIX => Ok(Self::Category(rest)),
            SPECIAL_PREFIX => Ok(Self::Special(rest)),
            other => Namespace::from_prefix(other)
                .map(|namespace| Self::Document(namespace, token))
                .ok_or_else(|| CodecError::malformed(token)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_control_tokens() {
        assert_eq!(Callback::parse("back"), Ok(Callback::Back));
        assert_eq!(
            Callback::parse(&category_token("critical")),
            Ok(Callback::Category("critical"))
        );
        assert_eq!(
            Callback::parse(&special_token("quick")),
            Ok(Callback::Special("quick"))
        );
    }

    #[test]
    fn document_tokens_keep_the_whole_token() {
        assert_eq!(
            Callback::parse("file_net_0_a"),
            Ok(Callback::Document(Namespace::File, "file_net_0_a"))
        );
        assert_eq!(
            Callback::parse("search_special_0_"),
            Ok(Callback::Document(Namespace::Search, "search_special_0_"))
        );
    }

    #[test]
    fn rejects_unknown_shapes() {
        for token in ["", "backward", "cat_", "zzz_1", "nounderscore"] {
            assert!(Callback::parse(token).is_err(), "{token:?}");
        }
    }
}
