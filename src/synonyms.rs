//! Shared synonym table for Nigerian ingredient terms.
//!
//! One immutable table, built once, used by both the ingredient matcher and
//! the secondary-ingredient extractor. Lookups are case-insensitive; every
//! canonical term is a member of its own variant set.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Canonical term -> accepted textual variants.
///
/// Variants cover market names, pidgin, and common Yoruba/Igbo terms so that
/// a recipe titled "Dodo and Fried Rice" still matches a user who typed
/// "plantain".
const ENTRIES: &[(&str, &[&str])] = &[
    ("rice", &["white rice", "jollof rice", "ofada rice", "fried rice"]),
    ("chicken", &["chicken breast", "chicken thighs", "whole chicken"]),
    ("beef", &["cow meat", "minced beef", "shaki"]),
    ("goat meat", &["goat", "asun"]),
    ("turkey", &["smoked turkey", "turkey wings"]),
    ("fish", &["tilapia", "catfish", "mackerel", "titus"]),
    ("stockfish", &["okporoko", "dried cod"]),
    ("crayfish", &["ground crayfish", "dried crayfish"]),
    ("snail", &["snails", "congo meat"]),
    ("beans", &["honey beans", "brown beans", "ewa oloyin", "black-eyed beans"]),
    ("yam", &["puna yam", "water yam", "yam tuber"]),
    ("plantain", &["ripe plantain", "unripe plantain", "dodo"]),
    ("garri", &["cassava flakes", "eba"]),
    ("egusi", &["melon seed", "melon seeds"]),
    ("okra", &["okro", "lady finger"]),
    ("pepper", &["ata rodo", "scotch bonnet", "bell pepper", "tatashe"]),
    ("tomato", &["tomatoes", "tin tomato", "tomato paste"]),
    ("onion", &["onions", "red onion"]),
    ("palm oil", &["red oil", "banga oil"]),
    ("spinach", &["efo", "ugu", "green vegetable"]),
];

static SHARED: Lazy<SynonymTable> = Lazy::new(|| SynonymTable::from_entries(ENTRIES));

/// Immutable canonical-term -> variant-set mapping.
#[derive(Debug)]
pub struct SynonymTable {
    variants: HashMap<String, Vec<String>>,
    /// Canonical terms in declaration order. Vocabulary scans must be
    /// deterministic, so they never iterate the map.
    terms: Vec<String>,
}

impl SynonymTable {
    /// The process-wide table covering the domain ingredient vocabulary.
    pub fn shared() -> &'static SynonymTable {
        &SHARED
    }

    fn from_entries(entries: &[(&str, &[&str])]) -> Self {
        let mut variants = HashMap::with_capacity(entries.len());
        let mut terms = Vec::with_capacity(entries.len());
        for (canonical, alts) in entries {
            let canonical = canonical.to_lowercase();
            let mut set = Vec::with_capacity(alts.len() + 1);
            // The canonical term always counts as its own variant.
            set.push(canonical.clone());
            for alt in *alts {
                let alt = alt.to_lowercase();
                if !set.contains(&alt) {
                    set.push(alt);
                }
            }
            if !variants.contains_key(&canonical) {
                terms.push(canonical.clone());
            }
            variants.insert(canonical, set);
        }
        Self { variants, terms }
    }

    /// Variants (canonical first) for an ingredient, or None if the term has
    /// no synonym entry.
    pub fn variants(&self, ingredient: &str) -> Option<&[String]> {
        self.variants
            .get(&ingredient.to_lowercase())
            .map(|v| v.as_slice())
    }

    /// The full domain vocabulary: every canonical term, in declaration
    /// order.
    pub fn canonical_terms(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_is_its_own_variant() {
        let table = SynonymTable::shared();
        for term in table.canonical_terms() {
            let variants = table.variants(term).unwrap();
            assert!(
                variants.contains(&term.to_string()),
                "{} missing from its own variant set",
                term
            );
        }
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let table = SynonymTable::shared();
        assert_eq!(table.variants("RICE"), table.variants("rice"));
        assert!(table.variants("Rice").is_some());
    }

    #[test]
    fn test_canonical_terms_keep_declaration_order() {
        let terms: Vec<&str> = SynonymTable::shared().canonical_terms().collect();
        assert_eq!(terms.first(), Some(&"rice"));
        // Stable relative order matters wherever a word matches several
        // vocabulary terms.
        let fish = terms.iter().position(|t| *t == "fish").unwrap();
        let stockfish = terms.iter().position(|t| *t == "stockfish").unwrap();
        let crayfish = terms.iter().position(|t| *t == "crayfish").unwrap();
        assert!(fish < stockfish && stockfish < crayfish);
    }

    #[test]
    fn test_unknown_term_has_no_entry() {
        assert!(SynonymTable::shared().variants("quinoa").is_none());
    }

    #[test]
    fn test_rice_variants_include_jollof() {
        let variants = SynonymTable::shared().variants("rice").unwrap();
        assert!(variants.contains(&"jollof rice".to_string()));
    }
}
