//! Core data model: recipes, ranked recipes, and search results.
//!
//! Recipes are immutable inputs. The engine never mutates a pool entry; it
//! produces annotated copies (`RankedRecipe`) or ordered clones
//! (`SearchResult::suggestions`).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A recipe as supplied by the caller (usually a database query upstream).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub meal_type: Option<String>,
    #[serde(default)]
    pub cooking_time: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
}

/// A recipe annotated with a ranking score and 1-based rank.
///
/// Produced by either the AI ranker or the rule-based fallback, never both
/// for the same call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedRecipe {
    pub recipe: Recipe,
    pub score: i32,
    pub rank: usize,
}

/// Which search phase produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchPhase {
    #[serde(rename = "primary_search")]
    Primary,
    #[serde(rename = "secondary_search")]
    Secondary,
}

/// Outcome of one progressive-search invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// Qualifying recipes, best first.
    pub suggestions: Vec<Recipe>,
    pub search_phase: SearchPhase,
    /// Title relevance threshold this phase ran with (percent).
    pub title_threshold: f32,
    /// Candidates that matched at least one selected ingredient.
    pub total_potential_matches: usize,
    /// Candidates that also met the title threshold. Always equals
    /// `suggestions.len()`.
    pub total_filtered_matches: usize,
    /// Ingredients spotted in matched titles that the user did not select.
    pub additional_ingredients: Vec<String>,
}

impl SearchResult {
    /// An empty result for a phase that found nothing (or got nothing to
    /// work with). Not an error.
    pub fn empty(phase: SearchPhase, threshold: f32) -> Self {
        Self {
            suggestions: Vec::new(),
            search_phase: phase,
            title_threshold: threshold,
            total_potential_matches: 0,
            total_filtered_matches: 0,
            additional_ingredients: Vec::new(),
        }
    }
}

/// Malformed caller input. The only error class the engine surfaces to
/// callers; everything on the AI path degrades to the fallback instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidInputError {
    #[error("recipe {id} has an empty name")]
    EmptyName { id: u32 },

    #[error("recipe {id} ({name}) has no ingredients")]
    NoIngredients { id: u32, name: String },

    #[error("recipe {id} ({name}) has a blank ingredient entry")]
    BlankIngredient { id: u32, name: String },
}

/// Reject malformed pool entries at the boundary.
///
/// Silently tolerating a recipe without a name or ingredient list would
/// corrupt scoring downstream, so this is a hard error.
pub fn validate_pool(pool: &[Recipe]) -> Result<(), InvalidInputError> {
    for recipe in pool {
        if recipe.name.trim().is_empty() {
            return Err(InvalidInputError::EmptyName { id: recipe.id });
        }
        if recipe.ingredients.is_empty() {
            return Err(InvalidInputError::NoIngredients {
                id: recipe.id,
                name: recipe.name.clone(),
            });
        }
        // An empty entry would substring-match every selection downstream.
        if recipe.ingredients.iter().any(|e| e.trim().is_empty()) {
            return Err(InvalidInputError::BlankIngredient {
                id: recipe.id,
                name: recipe.name.clone(),
            });
        }
    }
    Ok(())
}

/// Drop empty/whitespace-only terms from a user selection, preserving order.
pub fn normalize_selection(selected: &[String]) -> Vec<String> {
    selected
        .iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
pub(crate) fn test_recipe(id: u32, name: &str, ingredients: &[&str]) -> Recipe {
    Recipe {
        id,
        name: name.to_string(),
        ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
        meal_type: None,
        cooking_time: None,
        difficulty: None,
    }
}
