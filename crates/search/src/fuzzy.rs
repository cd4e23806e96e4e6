use kb_catalog::KeywordTable;
use nucleo_matcher::{pattern::Pattern, Matcher};

/// "Did you mean" hints for inputs that resolved to nothing.
///
/// Only used to phrase the guidance message; never feeds the resolver.
pub struct KeywordHints {
    matcher: Matcher,
}

impl KeywordHints {
    pub fn new() -> Self {
        Self {
            matcher: Matcher::new(nucleo_matcher::Config::DEFAULT),
        }
    }

    /// Keywords that fuzzily match `query`, best first, ties by keyword.
    pub fn suggest(&mut self, query: &str, table: &KeywordTable, limit: usize) -> Vec<String> {
        let query = query.trim();
        if query.is_empty() || limit == 0 {
            return Vec::new();
        }
        let pattern = Pattern::parse(
            query,
            nucleo_matcher::pattern::CaseMatching::Ignore,
            nucleo_matcher::pattern::Normalization::Smart,
        );

        let mut scored: Vec<(&str, u32)> = table
            .keywords()
            .filter_map(|keyword| {
                let haystack = nucleo_matcher::Utf32String::from(keyword);
                pattern
                    .score(haystack.slice(..), &mut self.matcher)
                    .map(|score| (keyword, score))
            })
            .collect();

        scored.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        scored.truncate(limit);
        scored
            .into_iter()
            .map(|(keyword, _)| keyword.to_string())
            .collect()
    }
}

impl Default for KeywordHints {
    fn default() -> Self {
        Self::new()
    }
}
