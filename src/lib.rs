//! Mamaput recipe engine library - exposes modules for testing.
//!
//! Suggests Nigerian recipes from a candidate pool, matched against the
//! ingredients a user says they have. Two paths: a deterministic progressive
//! title/ingredient search, and an AI-assisted ranker with a rule-based
//! fallback.

pub mod cache;
pub mod config;
pub mod fallback;
pub mod matcher;
pub mod ranker;
pub mod recipe;
pub mod scoring;
pub mod search;
pub mod synonyms;
