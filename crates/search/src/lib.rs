mod fuzzy;
mod resolver;

pub use fuzzy::KeywordHints;
pub use resolver::{KeywordResolver, Resolution};
