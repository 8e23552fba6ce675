//! Title relevance scoring.
//!
//! Two measures over a recipe title and an ordered ingredient selection:
//! a composite priority score used for ranking (lower is better), and the
//! percentage of title words attributable to the selection, used for
//! threshold filtering.

use crate::matcher::title_word_matches;
use crate::recipe::Recipe;
use crate::synonyms::SynonymTable;

/// Sentinel position for "ingredient not found in the title". Large enough
/// that unmatched terms always rank last.
pub const NOT_FOUND: u32 = 999;

fn title_tokens(name: &str) -> Vec<String> {
    name.to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Composite priority score, lower is better.
///
/// Tracks three signals over the selection (in the caller's order):
/// - `first`: earliest title position matching the *first* selected
///   ingredient (weight 10000 - a title that starts with the user's first
///   choice dominates),
/// - `best`: earliest position matching *any* selected ingredient
///   (weight 100),
/// - `total`: how many distinct selected ingredients matched at all
///   (weight 10, added - more matches nudge the score up, a quirk that
///   callers depend on for exact ordering).
pub fn priority_score(recipe: &Recipe, selected: &[String], table: &SynonymTable) -> u32 {
    let tokens = title_tokens(&recipe.name);

    let mut first = NOT_FOUND;
    let mut best = NOT_FOUND;
    let mut total = 0u32;

    for (index, ingredient) in selected.iter().enumerate() {
        let position = tokens
            .iter()
            .position(|token| title_word_matches(token, ingredient, table));
        if let Some(position) = position {
            let position = position as u32;
            if position < best {
                best = position;
            }
            if index == 0 {
                first = position;
            }
            total += 1;
        }
    }

    first * 10_000 + best * 100 + total * 10
}

/// Percentage of title words attributable to any selected ingredient.
///
/// An empty title yields 0.0 and therefore never meets a threshold.
pub fn title_percentage(recipe: &Recipe, selected: &[String], table: &SynonymTable) -> f32 {
    let tokens = title_tokens(&recipe.name);
    if tokens.is_empty() {
        return 0.0;
    }

    let matched = tokens
        .iter()
        .filter(|token| {
            selected
                .iter()
                .any(|ingredient| title_word_matches(token, ingredient, table))
        })
        .count();

    matched as f32 / tokens.len() as f32 * 100.0
}
