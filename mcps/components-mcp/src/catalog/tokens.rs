//! Search tokenizer
//!
//! Lowercase, split on anything that is not alphanumeric, drop tokens
//! shorter than two characters.

use std::collections::BTreeSet;

const MIN_TOKEN_CHARS: usize = 2;

/// Tokens of `text` in order of appearance, duplicates included
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() >= MIN_TOKEN_CHARS)
        .map(|t| t.to_lowercase())
}

/// Distinct tokens of `text`
pub fn token_set(text: &str) -> BTreeSet<String> {
    tokenize(text).collect()
}

/// Distinct query tokens, in the order the caller wrote them
pub fn query_tokens(query: &str) -> Vec<String> {
    let mut seen = BTreeSet::new();
    tokenize(query)
        .filter(|t| seen.insert(t.clone()))
        .collect()
}
