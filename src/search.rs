//! Progressive recipe search.
//!
//! Narrows a recipe pool to candidates that mention at least one selected
//! ingredient, keeps those whose titles clear a relevance threshold, and
//! orders them by priority score. The composed contract is two-phase: a
//! strict 50% pass first, then an automatic relaxed 25% pass only if the
//! strict pass found nothing.

use crate::config::EngineConfig;
use crate::matcher::matches_loose;
use crate::recipe::{
    normalize_selection, validate_pool, InvalidInputError, Recipe, SearchPhase, SearchResult,
};
use crate::scoring::{priority_score, title_percentage};
use crate::synonyms::SynonymTable;
use tracing::{debug, info};

/// Threshold-based search over a recipe pool.
pub struct SearchEngine {
    config: EngineConfig,
}

impl SearchEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Run both phases: strict threshold first, relaxed only on zero
    /// suggestions. This, not a single fixed threshold, is the search
    /// contract callers rely on.
    pub fn search_progressive(
        &self,
        pool: &[Recipe],
        selected: &[String],
    ) -> Result<SearchResult, InvalidInputError> {
        let primary = self.search(
            pool,
            selected,
            self.config.primary_threshold,
            SearchPhase::Primary,
        )?;
        if !primary.suggestions.is_empty() {
            return Ok(primary);
        }

        info!(
            "Primary search empty at {}%, relaxing to {}%",
            self.config.primary_threshold, self.config.secondary_threshold
        );
        self.search(
            pool,
            selected,
            self.config.secondary_threshold,
            SearchPhase::Secondary,
        )
    }

    /// One search phase at a fixed title threshold.
    ///
    /// An empty pool or empty selection yields an empty result with zero
    /// counts, never an error. Malformed recipes are rejected up front.
    pub fn search(
        &self,
        pool: &[Recipe],
        selected: &[String],
        title_threshold: f32,
        phase: SearchPhase,
    ) -> Result<SearchResult, InvalidInputError> {
        let selected = normalize_selection(selected);
        if pool.is_empty() || selected.is_empty() {
            return Ok(SearchResult::empty(phase, title_threshold));
        }
        validate_pool(pool)?;

        let table = SynonymTable::shared();

        // Phase 1: keep recipes where any selected ingredient matches the
        // name or an ingredient entry.
        let candidates: Vec<&Recipe> = pool
            .iter()
            .filter(|recipe| {
                selected.iter().any(|ingredient| {
                    matches_loose(&recipe.name, ingredient, table)
                        || recipe
                            .ingredients
                            .iter()
                            .any(|entry| matches_loose(entry, ingredient, table))
                })
            })
            .collect();
        let total_potential_matches = candidates.len();

        // Phase 2: title threshold, then score.
        let mut scored: Vec<(&Recipe, u32)> = candidates
            .into_iter()
            .filter_map(|recipe| {
                let pct = title_percentage(recipe, &selected, table);
                if pct >= title_threshold {
                    Some((recipe, priority_score(recipe, &selected, table)))
                } else {
                    None
                }
            })
            .collect();

        // Stable sort: ties keep candidate-filter order.
        scored.sort_by_key(|(_, score)| *score);
        let suggestions: Vec<Recipe> = scored.iter().map(|(r, _)| (*r).clone()).collect();

        let additional_ingredients = if phase == SearchPhase::Secondary
            && title_threshold == self.config.secondary_threshold
        {
            self.extract_additional_ingredients(&suggestions, &selected, table)
        } else {
            Vec::new()
        };

        debug!(
            "Search phase {:?} at {}%: {} candidates, {} past threshold",
            phase,
            title_threshold,
            total_potential_matches,
            suggestions.len()
        );

        Ok(SearchResult {
            total_filtered_matches: suggestions.len(),
            suggestions,
            search_phase: phase,
            title_threshold,
            total_potential_matches,
            additional_ingredients,
        })
    }

    /// Scan matched titles for vocabulary ingredients the user has not
    /// selected yet, as refinement suggestions. Insertion order of first
    /// discovery, capped.
    fn extract_additional_ingredients(
        &self,
        suggestions: &[Recipe],
        selected: &[String],
        table: &SynonymTable,
    ) -> Vec<String> {
        let selected_lower: Vec<String> = selected.iter().map(|s| s.to_lowercase()).collect();
        let mut found: Vec<String> = Vec::new();

        for recipe in suggestions {
            for word in recipe.name.to_lowercase().split_whitespace() {
                for term in table.canonical_terms() {
                    if !(word.contains(term) || term.contains(word)) {
                        continue;
                    }
                    let already_selected = selected_lower
                        .iter()
                        .any(|s| s.contains(term) || term.contains(s.as_str()));
                    if already_selected || found.iter().any(|f| f == term) {
                        continue;
                    }
                    found.push(term.to_string());
                    if found.len() >= self.config.max_additional_ingredients {
                        return found;
                    }
                }
            }
        }

        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::test_recipe;

    fn engine() -> SearchEngine {
        SearchEngine::new(EngineConfig::default())
    }

    fn selection(terms: &[&str]) -> Vec<String> {
        terms.iter().map(|s| s.to_string()).collect()
    }

    fn pool() -> Vec<Recipe> {
        vec![
            test_recipe(1, "Chicken Rice Bowl", &["rice", "chicken", "onion"]),
            test_recipe(2, "Beef Stew", &["beef", "rice"]),
        ]
    }

    #[test]
    fn test_primary_search_keeps_only_title_relevant_recipes() {
        // Recipe 2's title has 0% ingredient-associated words; only recipe 1
        // survives the 50% threshold.
        let result = engine()
            .search(&pool(), &selection(&["rice", "chicken"]), 50.0, SearchPhase::Primary)
            .unwrap();
        let ids: Vec<u32> = result.suggestions.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1]);
        assert_eq!(result.total_potential_matches, 2);
        assert_eq!(result.total_filtered_matches, 1);
    }

    #[test]
    fn test_filter_soundness() {
        // Every suggestion matched at least one selected ingredient.
        let selected = selection(&["rice", "chicken"]);
        let result = engine()
            .search(&pool(), &selected, 25.0, SearchPhase::Secondary)
            .unwrap();
        let table = SynonymTable::shared();
        for recipe in &result.suggestions {
            let hit = selected.iter().any(|ing| {
                matches_loose(&recipe.name, ing, table)
                    || recipe.ingredients.iter().any(|e| matches_loose(e, ing, table))
            });
            assert!(hit, "{} failed filter soundness", recipe.name);
        }
    }

    #[test]
    fn test_threshold_honesty() {
        let selected = selection(&["rice", "chicken"]);
        let table = SynonymTable::shared();
        for threshold in [50.0, 25.0] {
            let result = engine()
                .search(&pool(), &selected, threshold, SearchPhase::Primary)
                .unwrap();
            for recipe in &result.suggestions {
                assert!(title_percentage(recipe, &selected, table) >= threshold);
            }
        }
    }

    #[test]
    fn test_relaxed_threshold_is_superset_of_strict() {
        let pool = vec![
            test_recipe(1, "Jollof Rice", &["rice", "tomato", "pepper"]),
            test_recipe(2, "Rice and Beans Special", &["rice", "beans"]),
            test_recipe(3, "Pepper Soup Deluxe Party Edition", &["pepper", "goat meat"]),
        ];
        let selected = selection(&["rice"]);

        let strict = engine()
            .search(&pool, &selected, 50.0, SearchPhase::Primary)
            .unwrap();
        let relaxed = engine()
            .search(&pool, &selected, 25.0, SearchPhase::Secondary)
            .unwrap();

        let relaxed_ids: Vec<u32> = relaxed.suggestions.iter().map(|r| r.id).collect();
        for recipe in &strict.suggestions {
            assert!(relaxed_ids.contains(&recipe.id));
        }
        assert!(relaxed.suggestions.len() >= strict.suggestions.len());
    }

    #[test]
    fn test_progressive_relaxes_on_empty_primary() {
        // One-word ingredient buried in a four-word title: 25% relevance,
        // below the strict threshold.
        let pool = vec![test_recipe(1, "Special Party Fried Rice", &["rice", "oil"])];
        let result = engine()
            .search_progressive(&pool, &selection(&["rice"]))
            .unwrap();
        assert_eq!(result.search_phase, SearchPhase::Secondary);
        assert_eq!(result.title_threshold, 25.0);
        assert_eq!(result.suggestions.len(), 1);
    }

    #[test]
    fn test_progressive_stops_after_primary_hit() {
        let result = engine()
            .search_progressive(&pool(), &selection(&["rice", "chicken"]))
            .unwrap();
        assert_eq!(result.search_phase, SearchPhase::Primary);
        assert_eq!(result.title_threshold, 50.0);
    }

    #[test]
    fn test_ordering_prefers_first_ingredient_at_title_start() {
        let pool = vec![
            test_recipe(1, "Chicken Rice", &["chicken", "rice"]),
            test_recipe(2, "Rice Chicken", &["rice", "chicken"]),
        ];
        let result = engine()
            .search(&pool, &selection(&["rice", "chicken"]), 50.0, SearchPhase::Primary)
            .unwrap();
        let ids: Vec<u32> = result.suggestions.iter().map(|r| r.id).collect();
        // Recipe 2's title starts with the first selected ingredient.
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_sort_is_stable_on_score_ties() {
        let pool = vec![
            test_recipe(10, "Rice Special", &["rice"]),
            test_recipe(11, "Rice Supreme", &["rice"]),
        ];
        let result = engine()
            .search(&pool, &selection(&["rice"]), 50.0, SearchPhase::Primary)
            .unwrap();
        let ids: Vec<u32> = result.suggestions.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![10, 11]);
    }

    #[test]
    fn test_empty_pool_and_empty_selection_yield_empty_result() {
        let empty_pool = engine()
            .search(&[], &selection(&["rice"]), 50.0, SearchPhase::Primary)
            .unwrap();
        assert!(empty_pool.suggestions.is_empty());
        assert_eq!(empty_pool.total_potential_matches, 0);

        let empty_selection = engine()
            .search(&pool(), &[], 50.0, SearchPhase::Primary)
            .unwrap();
        assert!(empty_selection.suggestions.is_empty());
        assert_eq!(empty_selection.total_filtered_matches, 0);
    }

    #[test]
    fn test_malformed_recipe_is_rejected() {
        let pool = vec![test_recipe(9, "Mystery Meal", &[])];
        let err = engine()
            .search(&pool, &selection(&["rice"]), 50.0, SearchPhase::Primary)
            .unwrap_err();
        assert!(matches!(err, InvalidInputError::NoIngredients { id: 9, .. }));
    }

    #[test]
    fn test_blank_ingredient_entry_is_rejected_not_matched() {
        // Every ingredient term contains an empty entry as a substring, so
        // the recipe must be refused at the boundary instead of becoming a
        // candidate for all selections.
        let pool = vec![test_recipe(9, "Mystery Meal", &["", "beef"])];
        let err = engine()
            .search(&pool, &selection(&["rice"]), 50.0, SearchPhase::Primary)
            .unwrap_err();
        assert!(matches!(err, InvalidInputError::BlankIngredient { id: 9, .. }));
    }

    #[test]
    fn test_secondary_extraction_suggests_unseen_ingredients() {
        let pool = vec![
            test_recipe(1, "Rice Chicken Deluxe Combo", &["rice", "chicken"]),
            test_recipe(2, "Rice Plantain Party Pack", &["rice", "plantain"]),
        ];
        let result = engine()
            .search(&pool, &selection(&["rice"]), 25.0, SearchPhase::Secondary)
            .unwrap();
        assert!(result.additional_ingredients.contains(&"chicken".to_string()));
        assert!(result.additional_ingredients.contains(&"plantain".to_string()));
        // The selected ingredient itself is never suggested.
        assert!(!result.additional_ingredients.contains(&"rice".to_string()));
        assert!(result.additional_ingredients.len() <= 10);
    }

    #[test]
    fn test_extraction_order_is_stable_for_multi_term_words() {
        // "fish" sits inside three vocabulary terms; discovery must follow
        // the table's declaration order on every run.
        let pool = vec![test_recipe(1, "Fish Deluxe Combo Platter", &["fish"])];
        let result = engine()
            .search(&pool, &selection(&["deluxe"]), 25.0, SearchPhase::Secondary)
            .unwrap();
        assert_eq!(
            result.additional_ingredients,
            vec!["fish", "stockfish", "crayfish"]
        );
    }

    #[test]
    fn test_primary_phase_extracts_nothing() {
        let result = engine()
            .search(&pool(), &selection(&["rice", "chicken"]), 50.0, SearchPhase::Primary)
            .unwrap();
        assert!(result.additional_ingredients.is_empty());
    }
}
