//! Mamaput CLI - suggest a Nigerian recipe from what's in your kitchen.
//!
//! Loads a recipe pool from a JSON file, runs the progressive search (or
//! the AI ranker with `--ai`), and prints the suggestions best-first.

use anyhow::{Context, Result};
use clap::Parser;
use mamaput::config::{EngineConfig, CONFIG_PATH};
use mamaput::ranker::{AiRanker, HttpChatClient};
use mamaput::recipe::Recipe;
use mamaput::search::SearchEngine;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "mamaput", about = "Ingredient-based Nigerian recipe suggestions")]
struct Args {
    /// JSON file holding the recipe pool
    #[arg(long)]
    pool: PathBuf,

    /// Ingredients you have, most important first
    #[arg(required = true)]
    ingredients: Vec<String>,

    /// Rank with the AI model instead of the progressive search
    #[arg(long)]
    ai: bool,

    /// Config file path
    #[arg(long, default_value = CONFIG_PATH)]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = EngineConfig::load(&args.config)?;

    let pool_json = std::fs::read_to_string(&args.pool)
        .with_context(|| format!("Failed to read pool from {}", args.pool.display()))?;
    let pool: Vec<Recipe> = serde_json::from_str(&pool_json)
        .with_context(|| format!("Failed to parse pool from {}", args.pool.display()))?;
    info!("Loaded {} recipes", pool.len());

    if args.ai {
        let ranker = AiRanker::new(config.clone(), HttpChatClient::new(config.ai));
        let ranked = ranker
            .rank(&args.ingredients, &pool, &serde_json::Value::Null)
            .await?;
        if ranked.is_empty() {
            println!("No recipes found for your ingredients.");
            return Ok(());
        }
        for entry in &ranked {
            println!("{:>3}. {} (score {})", entry.rank, entry.recipe.name, entry.score);
        }
    } else {
        let engine = SearchEngine::new(config);
        let result = engine.search_progressive(&pool, &args.ingredients)?;
        if result.suggestions.is_empty() {
            println!("No recipes found for your ingredients.");
            return Ok(());
        }
        println!(
            "{} match(es) at the {}% threshold:",
            result.total_filtered_matches, result.title_threshold
        );
        for (index, recipe) in result.suggestions.iter().enumerate() {
            println!("{:>3}. {}", index + 1, recipe.name);
        }
        if !result.additional_ingredients.is_empty() {
            println!(
                "Also spotted in these dishes: {}",
                result.additional_ingredients.join(", ")
            );
        }
    }

    Ok(())
}
