//! AI-assisted recipe ranking with a deterministic fallback.
//!
//! Builds a size-bounded prompt from the candidate pool, asks a
//! chat-completion endpoint for a strict JSON array of recipe ids, and
//! materializes the answer into ranked recipes. Successful responses go
//! into a bounded cache. Every failure class - missing credentials,
//! transport, malformed response - is absorbed here and delegates to the
//! rule-based fallback; callers never see an AI-path error. One attempt
//! per request, no retries: cost containment is a design constraint.

use crate::cache::{Clock, ResponseCache, SystemClock};
use crate::config::{AiConfig, EngineConfig};
use crate::fallback;
use crate::recipe::{normalize_selection, validate_pool, InvalidInputError, RankedRecipe, Recipe};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Instruction pinning the model to bare JSON output.
const SYSTEM_PROMPT: &str = "You rank Nigerian recipes for a cook by how well they fit the \
ingredients on hand. Respond with a JSON array of recipe ids only, best match first. \
No prose, no explanations, no markdown.";

/// First bracketed array in the response text.
static ARRAY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[[^\]]*\]").expect("valid regex"));

/// AI-path failures. All of them route to the fallback scorer.
#[derive(Debug, Error)]
pub enum RankingError {
    #[error("AI ranking not configured: {0}")]
    Configuration(String),

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("failed to parse model response: {0}")]
    ResponseFormat(String),
}

/// Transport seam for the chat-completion call. Production uses
/// `HttpChatClient`; tests inject a deterministic double.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> Result<String, RankingError>;
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

/// HTTP client for an OpenAI-style chat-completion endpoint.
pub struct HttpChatClient {
    config: AiConfig,
    client: reqwest::Client,
}

impl HttpChatClient {
    pub fn new(config: AiConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl ChatClient for HttpChatClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String, RankingError> {
        // Credentials are checked before any network traffic.
        let api_key = std::env::var(&self.config.api_key_env).map_err(|_| {
            RankingError::Configuration(format!(
                "API key env var {} is not set",
                self.config.api_key_env
            ))
        })?;

        let body = serde_json::json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user },
            ],
            "temperature": self.config.temperature,
            "max_tokens": self.config.max_tokens,
        });

        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .send()
            .await
            .map_err(|e| RankingError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(RankingError::Transport(format!(
                "chat endpoint returned {}",
                response.status()
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| RankingError::Transport(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| RankingError::ResponseFormat("no choices in response".to_string()))
    }
}

/// Ranking service owning the transport and the response cache.
pub struct AiRanker<C: ChatClient> {
    client: C,
    config: EngineConfig,
    cache: Mutex<ResponseCache>,
}

impl<C: ChatClient> AiRanker<C> {
    pub fn new(config: EngineConfig, client: C) -> Self {
        Self::with_clock(config, client, Arc::new(SystemClock))
    }

    pub fn with_clock(config: EngineConfig, client: C, clock: Arc<dyn Clock>) -> Self {
        let cache = Mutex::new(ResponseCache::new(
            config.cache_max_size,
            Duration::from_secs(config.cache_sweep_interval_secs),
            clock,
        ));
        Self {
            client,
            config,
            cache,
        }
    }

    /// Rank the pool for the given selection, best first.
    ///
    /// Two outcomes only: an AI-produced ranking, or the rule-based
    /// fallback when the AI path fails for any reason. The single
    /// caller-visible error is malformed pool input.
    pub async fn rank(
        &self,
        selected: &[String],
        pool: &[Recipe],
        context: &Value,
    ) -> Result<Vec<RankedRecipe>, InvalidInputError> {
        validate_pool(pool)?;
        let selected = normalize_selection(selected);
        if pool.is_empty() || selected.is_empty() {
            return Ok(Vec::new());
        }

        match self.rank_with_ai(&selected, pool, context).await {
            Ok(ranked) => Ok(ranked),
            Err(e) => {
                warn!("AI ranking unavailable ({}), using rule-based fallback", e);
                Ok(fallback::score(&selected, pool))
            }
        }
    }

    async fn rank_with_ai(
        &self,
        selected: &[String],
        pool: &[Recipe],
        context: &Value,
    ) -> Result<Vec<RankedRecipe>, RankingError> {
        let key = cache_key(selected, pool.len(), context);

        if let Some(hit) = self.cache.lock().unwrap().get(&key) {
            debug!("Cache hit for {}", key);
            return Ok(hit.clone());
        }

        let prompt = build_ranking_prompt(
            selected,
            pool,
            context,
            self.config.max_meals_for_ai,
            self.config.max_ingredients_per_meal_for_ai,
        );

        let content = self.client.complete(SYSTEM_PROMPT, &prompt).await?;
        let ids = parse_id_array(&content)?;
        let ranked = materialize(&ids, pool)?;

        info!("AI ranked {} of {} recipes", ranked.len(), pool.len());
        // Only fully-parsed successes are cached; a fallback result must
        // never lock in a degraded ranking for future identical requests.
        self.cache.lock().unwrap().set(key, ranked.clone());
        Ok(ranked)
    }
}

/// Deterministic key over the sorted selection, pool size, and the opaque
/// caller context.
fn cache_key(selected: &[String], pool_len: usize, context: &Value) -> String {
    let mut ingredients: Vec<String> = selected.iter().map(|s| s.to_lowercase()).collect();
    ingredients.sort();
    format!("{}|{}|{}", ingredients.join(","), pool_len, context)
}

/// Natural-language prompt over a bounded slice of the pool.
fn build_ranking_prompt(
    selected: &[String],
    pool: &[Recipe],
    context: &Value,
    max_meals: usize,
    max_ingredients: usize,
) -> String {
    let mut lines = Vec::with_capacity(max_meals + 4);
    lines.push(format!("Available ingredients: {}", selected.join(", ")));
    if !context.is_null() {
        lines.push(format!("Preferences: {}", context));
    }
    lines.push("Candidate recipes:".to_string());
    for recipe in pool.iter().take(max_meals) {
        let ingredients: Vec<&str> = recipe
            .ingredients
            .iter()
            .take(max_ingredients)
            .map(String::as_str)
            .collect();
        lines.push(format!(
            "{}: {} (ingredients: {})",
            recipe.id,
            recipe.name,
            ingredients.join(", ")
        ));
    }
    lines.push(
        "Return a JSON array of the recipe ids above, ordered best to worst match.".to_string(),
    );
    lines.join("\n")
}

/// Parse the model output into an ordered id list.
///
/// Tolerates markdown code fences around the payload; everything else
/// about the format is strict.
fn parse_id_array(content: &str) -> Result<Vec<u32>, RankingError> {
    let unfenced = strip_code_fences(content);
    let array = ARRAY_RE
        .find(&unfenced)
        .ok_or_else(|| RankingError::ResponseFormat("no JSON array in response".to_string()))?;

    let ids: Vec<u32> = serde_json::from_str(array.as_str())
        .map_err(|e| RankingError::ResponseFormat(format!("invalid id array: {}", e)))?;

    if ids.is_empty() {
        return Err(RankingError::ResponseFormat(
            "model returned an empty ranking".to_string(),
        ));
    }
    Ok(ids)
}

/// Strip a ```/```json wrapper if present (models add these despite
/// instructions).
fn strip_code_fences(content: &str) -> String {
    let trimmed = content.trim();
    if trimmed.starts_with("```") {
        let lines: Vec<&str> = trimmed.lines().collect();
        if lines.len() >= 3 {
            return lines[1..lines.len() - 1].join("\n");
        }
    }
    trimmed.to_string()
}

/// Resolve ids against the original, untruncated pool. Unresolved ids are
/// dropped; scores and ranks come from the position in the response.
fn materialize(ids: &[u32], pool: &[Recipe]) -> Result<Vec<RankedRecipe>, RankingError> {
    let ranked: Vec<RankedRecipe> = ids
        .iter()
        .enumerate()
        .filter_map(|(index, id)| {
            pool.iter().find(|r| r.id == *id).map(|recipe| RankedRecipe {
                recipe: recipe.clone(),
                score: 100 - index as i32,
                rank: index + 1,
            })
        })
        .collect();

    if ranked.is_empty() {
        return Err(RankingError::ResponseFormat(
            "no response id matched the pool".to_string(),
        ));
    }
    Ok(ranked)
}
