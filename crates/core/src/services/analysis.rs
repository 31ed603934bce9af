//! LLM-backed nutrition and taste analysis.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use validator::Validate;

use letcook_common::{AppError, AppResult, config::AnalysisConfig};
use letcook_db::entities::user;

use super::recipe::{RecipeDetails, RecipeService};

const NUTRITIONIST_PROMPT: &str =
    "You are a professional nutritionist. Answer only with a JSON object in the requested format.";

/// Taste axes reported for a recipe, in display order.
const TASTE_AXES: [(&str, &str); 6] = [
    ("sweet", "Sweet"),
    ("sour", "Sour"),
    ("salty", "Salty"),
    ("bitter", "Bitter"),
    ("savory", "Savory"),
    ("fatty", "Fatty"),
];

const FULL_MARK: u8 = 100;

/// Most replies kept in the analysis cache.
const MAX_CACHE_ENTRIES: usize = 1000;

/// A chat-completion backend that answers with a JSON document.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Send a system and user message and return the raw reply text.
    async fn complete_json(&self, system: &str, prompt: &str) -> AppResult<String>;
}

/// `OpenAI` chat completions client.
#[derive(Clone)]
pub struct OpenAiProvider {
    config: AnalysisConfig,
    http_client: reqwest::Client,
}

impl OpenAiProvider {
    /// Create a new client from configuration.
    #[must_use]
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    async fn complete_json(&self, system: &str, prompt: &str) -> AppResult<String> {
        let api_key = self.config.api_key.as_ref().ok_or_else(|| {
            AppError::ExternalService("Analysis API key not configured".to_string())
        })?;

        let body = serde_json::json!({
            "model": self.config.model,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": prompt}
            ],
            "temperature": self.config.temperature,
            "max_tokens": self.config.max_tokens,
            "response_format": {"type": "json_object"},
        });

        let response = self
            .http_client
            .post(&self.config.api_url)
            .header("Authorization", format!("Bearer {api_key}"))
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Completion request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalService(format!(
                "Completion API error: {status} - {body}"
            )));
        }

        #[derive(Deserialize)]
        struct CompletionResponse {
            choices: Vec<CompletionChoice>,
        }

        #[derive(Deserialize)]
        struct CompletionChoice {
            message: CompletionMessage,
        }

        #[derive(Deserialize)]
        struct CompletionMessage {
            content: Option<String>,
        }

        let completion: CompletionResponse = response.json().await.map_err(|e| {
            AppError::ExternalService(format!("Failed to parse completion response: {e}"))
        })?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| AppError::ExternalService("Completion returned no content".to_string()))
    }
}

/// Input for analysing a free-form ingredient list.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NutritionInput {
    #[validate(length(min = 1, message = "At least one ingredient is required"))]
    pub ingredients: Vec<String>,

    #[validate(range(min = 1))]
    pub servings: i32,
}

/// Estimated nutrition per serving.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct NutritionFacts {
    pub calories: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
    pub sugar: f64,
}

/// Estimated macronutrients of a recipe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MacroFacts {
    pub calories: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
}

/// One axis of the taste radar chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TasteAxis {
    pub subject: String,
    pub value: u8,
    pub full_mark: u8,
}

/// Nutrition and taste profile of a recipe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeAnalysis {
    pub nutrition: MacroFacts,
    pub taste: Vec<TasteAxis>,
}

/// Numeric field of a reply object; absent or non-numeric values count as zero.
fn number(object: &Value, key: &str) -> f64 {
    match object.get(key) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

fn nutrition_prompt(input: &NutritionInput) -> String {
    format!(
        "Analyze the nutrition of the following recipe per serving.\n\
         Ingredients: {}\n\
         Servings: {}\n\
         Reply with a JSON object with numeric fields \
         \"calories\" (kcal), \"protein\", \"fat\", \"carbs\" and \"sugar\" (grams).",
        input.ingredients.join(", "),
        input.servings
    )
}

fn recipe_prompt(recipe: &RecipeDetails) -> String {
    let ingredients: Vec<String> = recipe
        .ingredients
        .iter()
        .map(|i| format!("{} {}", i.quantity, i.name).trim().to_string())
        .collect();
    let steps: Vec<String> = recipe
        .steps
        .iter()
        .enumerate()
        .map(|(n, s)| format!("{}. {}", n + 1, s.description))
        .collect();

    format!(
        "Analyze this recipe.\n\
         Title: {}\n\
         Ingredients: {}\n\
         Steps:\n{}\n\
         Reply with a JSON object of the form \
         {{\"nutrition\": {{\"calories\", \"protein\", \"fat\", \"carbs\"}}, \
         \"taste\": {{\"sweet\", \"sour\", \"salty\", \"bitter\", \"savory\", \"fatty\"}}}} \
         where nutrition values are per serving and taste values are 0 to 100.",
        recipe.title,
        ingredients.join(", "),
        steps.join("\n")
    )
}

/// Interpret a nutrition reply.
#[must_use]
pub fn parse_nutrition(reply: &Value) -> NutritionFacts {
    NutritionFacts {
        calories: number(reply, "calories"),
        protein: number(reply, "protein"),
        fat: number(reply, "fat"),
        carbs: number(reply, "carbs"),
        sugar: number(reply, "sugar"),
    }
}

/// Interpret a recipe analysis reply.
#[must_use]
pub fn parse_recipe_analysis(reply: &Value) -> RecipeAnalysis {
    static MISSING: Value = Value::Null;
    let nutrition = reply.get("nutrition").unwrap_or(&MISSING);
    let taste = reply.get("taste").unwrap_or(&MISSING);

    RecipeAnalysis {
        nutrition: MacroFacts {
            calories: number(nutrition, "calories"),
            protein: number(nutrition, "protein"),
            fat: number(nutrition, "fat"),
            carbs: number(nutrition, "carbs"),
        },
        taste: TASTE_AXES
            .iter()
            .map(|(key, subject)| TasteAxis {
                subject: (*subject).to_string(),
                value: number(taste, key).round().clamp(0.0, f64::from(FULL_MARK)) as u8,
                full_mark: FULL_MARK,
            })
            .collect(),
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    reply: Value,
    expires_at: Instant,
}

/// Analysis service.
#[derive(Clone)]
pub struct AnalysisService {
    provider: Arc<dyn CompletionProvider>,
    recipe_service: RecipeService,
    cache: Arc<RwLock<HashMap<String, CacheEntry>>>,
    cache_ttl: Duration,
}

impl AnalysisService {
    /// Create a new analysis service.
    #[must_use]
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        recipe_service: RecipeService,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            provider,
            recipe_service,
            cache: Arc::new(RwLock::new(HashMap::new())),
            cache_ttl,
        }
    }

    async fn check_cache(&self, prompt: &str) -> Option<Value> {
        let cache = self.cache.read().await;
        cache
            .get(prompt)
            .filter(|entry| entry.expires_at > Instant::now())
            .map(|entry| entry.reply.clone())
    }

    async fn store_cache(&self, prompt: String, reply: Value) {
        let mut cache = self.cache.write().await;
        cache.insert(
            prompt,
            CacheEntry {
                reply,
                expires_at: Instant::now() + self.cache_ttl,
            },
        );

        if cache.len() > MAX_CACHE_ENTRIES {
            let now = Instant::now();
            cache.retain(|_, v| v.expires_at > now);
        }

        // still full of live replies: drop the ones expiring soonest
        if cache.len() > MAX_CACHE_ENTRIES {
            let mut by_expiry: Vec<(Instant, String)> = cache
                .iter()
                .map(|(key, entry)| (entry.expires_at, key.clone()))
                .collect();
            by_expiry.sort_unstable();
            let excess = cache.len() - MAX_CACHE_ENTRIES;
            for (_, key) in by_expiry.into_iter().take(excess) {
                cache.remove(&key);
            }
        }
    }

    /// Ask the provider, answering repeated prompts from the cache.
    async fn ask(&self, prompt: String) -> AppResult<Value> {
        if let Some(cached) = self.check_cache(&prompt).await {
            tracing::debug!("Analysis cache hit");
            return Ok(cached);
        }

        let raw = self
            .provider
            .complete_json(NUTRITIONIST_PROMPT, &prompt)
            .await?;

        let reply: Value = serde_json::from_str(raw.trim()).map_err(|e| {
            AppError::ExternalService(format!("Analysis reply is not JSON: {e}"))
        })?;
        if !reply.is_object() {
            return Err(AppError::ExternalService(
                "Analysis reply is not a JSON object".to_string(),
            ));
        }

        self.store_cache(prompt, reply.clone()).await;
        Ok(reply)
    }

    /// Estimate nutrition per serving for an ingredient list.
    pub async fn nutrition(&self, input: NutritionInput) -> AppResult<NutritionFacts> {
        input.validate()?;
        let reply = self.ask(nutrition_prompt(&input)).await?;
        Ok(parse_nutrition(&reply))
    }

    /// Estimate nutrition and taste of a stored recipe.
    pub async fn analyze_recipe(
        &self,
        viewer: Option<&user::Model>,
        recipe_id: &str,
    ) -> AppResult<RecipeAnalysis> {
        let recipe = self.recipe_service.get_details(viewer, recipe_id).await?;
        let reply = self.ask(recipe_prompt(&recipe)).await?;
        Ok(parse_recipe_analysis(&reply))
    }
}
