//! Ingredient normalizer: decides whether a piece of text "contains" a
//! user-supplied ingredient term.
//!
//! Two distinct checks exist on purpose. Candidate filtering uses a loose
//! bidirectional containment (either string may contain the other, synonyms
//! in both directions). Positional title scoring uses a strict
//! one-directional check (the title word must contain the ingredient or one
//! of its variants). The asymmetry changes which title words count and must
//! not be collapsed into one function.

use crate::synonyms::SynonymTable;

/// Loose match used for candidate filtering: `text` contains `ingredient`,
/// or the other way round, or either direction against any synonym variant.
pub fn matches_loose(text: &str, ingredient: &str, table: &SynonymTable) -> bool {
    let text = text.to_lowercase();
    let ingredient = ingredient.to_lowercase();
    if text.contains(&ingredient) || ingredient.contains(&text) {
        return true;
    }
    if let Some(variants) = table.variants(&ingredient) {
        return variants
            .iter()
            .any(|v| text.contains(v.as_str()) || v.contains(&text));
    }
    false
}

/// Strict match used for title scoring: the title word must contain the
/// ingredient or one of its variants. Never the reverse direction.
pub fn title_word_matches(word: &str, ingredient: &str, table: &SynonymTable) -> bool {
    let word = word.to_lowercase();
    let ingredient = ingredient.to_lowercase();
    if word.contains(&ingredient) {
        return true;
    }
    if let Some(variants) = table.variants(&ingredient) {
        return variants.iter().any(|v| word.contains(v.as_str()));
    }
    false
}
