//! Rule-based fallback scorer.
//!
//! Deterministic ingredient-overlap ranking used whenever the AI path is
//! unavailable or fails. Pure and total: never errors, handles an empty
//! pool, and no synonym expansion - the fallback is deliberately simpler
//! than the search matcher.

use crate::recipe::{RankedRecipe, Recipe};
use tracing::debug;

/// Score every recipe by how many selected ingredients appear (as a
/// case-insensitive substring) in its ingredient entries.
///
/// `score = matches * 10`. All results carry `rank = 1`; the fallback path
/// does not assign distinct ranks. Sorted best-first, stable on ties.
pub fn score(selected: &[String], pool: &[Recipe]) -> Vec<RankedRecipe> {
    let selected_lower: Vec<String> = selected.iter().map(|s| s.to_lowercase()).collect();

    let mut ranked: Vec<RankedRecipe> = pool
        .iter()
        .map(|recipe| {
            let matches = selected_lower
                .iter()
                .filter(|ingredient| {
                    recipe
                        .ingredients
                        .iter()
                        .any(|entry| entry.to_lowercase().contains(ingredient.as_str()))
                })
                .count() as i32;
            RankedRecipe {
                recipe: recipe.clone(),
                score: matches * 10,
                rank: 1,
            }
        })
        .collect();

    ranked.sort_by_key(|r| std::cmp::Reverse(r.score));

    debug!("Fallback scored {} recipes", ranked.len());
    ranked
}
