use anyhow::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::TOKEN_MAX_CHARS;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct Button {
    pub label: String,
    pub token: String,
}

impl Button {
    #[must_use]
    pub fn new(label: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            token: token.into(),
        }
    }
}

/// Ordered rows of ordered buttons.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default, JsonSchema)]
#[serde(transparent)]
pub struct ButtonLayout {
    rows: Vec<Vec<Button>>,
}

impl ButtonLayout {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_row(&mut self, row: Vec<Button>) {
        if !row.is_empty() {
            self.rows.push(row);
        }
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<Button>] {
        &self.rows
    }

    pub fn buttons(&self) -> impl Iterator<Item = &Button> {
        self.rows.iter().flatten()
    }

    #[must_use]
    pub fn button_count(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rejects layouts the chat protocol would refuse: empty or oversized tokens.
    pub fn validate(&self) -> Result<()> {
        for button in self.buttons() {
            if button.token.is_empty() {
                anyhow::bail!("button '{}' has an empty token", button.label);
            }
            let len = button.token.chars().count();
            if len > TOKEN_MAX_CHARS {
                anyhow::bail!(
                    "button '{}' token too long (chars={len}, max={TOKEN_MAX_CHARS})",
                    button.label
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_button(token: impl Into<String>) -> ButtonLayout {
        let mut layout = ButtonLayout::new();
        layout.push_row(vec![Button::new("x", token)]);
        layout
    }

    #[test]
    fn rows_keep_their_order() {
        let mut layout = ButtonLayout::new();
        layout.push_row(vec![Button::new("a", "t1")]);
        layout.push_row(vec![Button::new("b", "t2"), Button::new("c", "t3")]);
        assert_eq!(layout.rows().len(), 2);
        assert_eq!(layout.button_count(), 3);
        let labels: Vec<&str> = layout.buttons().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["a", "b", "c"]);
    }

    #[test]
    fn push_row_skips_empty_rows() {
        let mut layout = ButtonLayout::new();
        layout.push_row(Vec::new());
        assert!(layout.is_empty());
    }

    #[test]
    fn validate_rejects_long_tokens() {
        let layout = one_button("a".repeat(65));
        let err = layout.validate().expect_err("65 chars must be rejected");
        assert!(format!("{err:#}").contains("token too long"));

        assert!(one_button("a".repeat(64)).validate().is_ok());
        assert!(one_button("").validate().is_err());
    }

    #[test]
    fn layout_serializes_as_nested_arrays() {
        let mut layout = ButtonLayout::new();
        layout.push_row(vec![Button::new("Back", "back")]);
        let json = serde_json::to_string(&layout).unwrap();
        assert_eq!(json, r#"[[{"label":"Back","token":"back"}]]"#);
    }
}
