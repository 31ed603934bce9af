//! Recipe search with regional synonyms and relevance scoring.

use letcook_common::{AppError, AppResult};
use letcook_db::repositories::RecipeRepository;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::recipe::{RecipeDetails, RecipeService};

/// Default number of hits per page.
pub const DEFAULT_LIMIT: u64 = 12;
/// Largest page a caller may request.
pub const MAX_LIMIT: u64 = 50;

/// Pairs of regional names for the same ingredient.
const SYNONYMS: &[(&str, &str)] = &[
    ("ngô", "bắp"),
    ("heo", "lợn"),
    ("dưa leo", "dưa chuột"),
    ("đậu phộng", "lạc"),
];

const TITLE_WEIGHT: f64 = 10.0;
const DESCRIPTION_WEIGHT: f64 = 5.0;
const INGREDIENT_WEIGHT: f64 = 3.0;
const TAG_WEIGHT: f64 = 2.0;
const REQUESTED_INGREDIENT_WEIGHT: f64 = 2.0;
const DISTINCT_TERM_BONUS: f64 = 0.5;

/// Search parameters. `searchWords` and `ingredients` may repeat.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    #[serde(default)]
    pub search_words: Vec<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    pub skip: Option<u64>,
    pub limit: Option<u64>,
}

/// A matching recipe and its relevance.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    #[serde(flatten)]
    pub recipe: RecipeDetails,
    pub search_score: f64,
}

/// One page of search hits with the total number of matches.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub recipes: Vec<SearchHit>,
    pub total: u64,
}

impl SearchResult {
    const fn empty() -> Self {
        Self {
            recipes: Vec::new(),
            total: 0,
        }
    }
}

/// Trim, lowercase and de-duplicate raw terms, dropping empty ones.
#[must_use]
pub fn normalize_terms(raw: &[String]) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    for term in raw {
        let term = term.trim().to_lowercase();
        if !term.is_empty() && !terms.contains(&term) {
            terms.push(term);
        }
    }
    terms
}

/// Other names for `term`, if it has any.
fn synonyms_of(term: &str) -> impl Iterator<Item = &'static str> + '_ {
    SYNONYMS.iter().filter_map(move |&(a, b)| {
        if a == term {
            Some(b)
        } else if b == term {
            Some(a)
        } else {
            None
        }
    })
}

/// Terms followed by their synonyms, without duplicates.
#[must_use]
pub fn expand_synonyms(terms: &[String]) -> Vec<String> {
    let mut expanded = terms.to_vec();
    for term in terms {
        for synonym in synonyms_of(term) {
            if !expanded.iter().any(|t| t == synonym) {
                expanded.push(synonym.to_string());
            }
        }
    }
    expanded
}

/// Case-insensitive substring matcher for a term and its synonyms.
#[derive(Debug, Clone)]
pub struct TermMatcher {
    regex: Regex,
}

impl TermMatcher {
    /// Build a matcher for a normalized term.
    pub fn new(term: &str) -> AppResult<Self> {
        let mut alternatives = vec![regex::escape(term)];
        alternatives.extend(synonyms_of(term).map(regex::escape));

        let regex = Regex::new(&format!("(?i){}", alternatives.join("|")))
            .map_err(|e| AppError::Internal(format!("Invalid search pattern: {e}")))?;
        Ok(Self { regex })
    }

    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// Relevance of a recipe for the given term and ingredient matchers.
#[must_use]
pub fn score(recipe: &RecipeDetails, terms: &[TermMatcher], ingredients: &[TermMatcher]) -> f64 {
    let mut score = 0.0;
    let mut matched_terms = 0_u32;

    for term in terms {
        let mut matched = false;

        if term.is_match(&recipe.title) {
            score += TITLE_WEIGHT;
            matched = true;
        }
        if term.is_match(&recipe.description) {
            score += DESCRIPTION_WEIGHT;
            matched = true;
        }
        for ingredient in &recipe.ingredients {
            if term.is_match(&ingredient.name) {
                score += INGREDIENT_WEIGHT;
                matched = true;
            }
        }
        for tag in &recipe.tags {
            if term.is_match(tag) {
                score += TAG_WEIGHT;
                matched = true;
            }
        }

        if matched {
            matched_terms += 1;
        }
    }

    for wanted in ingredients {
        if recipe.ingredients.iter().any(|i| wanted.is_match(&i.name)) {
            score += REQUESTED_INGREDIENT_WEIGHT;
        }
    }

    score + f64::from(matched_terms) * DISTINCT_TERM_BONUS
}

/// Search service.
#[derive(Clone)]
pub struct SearchService {
    recipe_repo: RecipeRepository,
    recipe_service: RecipeService,
}

impl SearchService {
    /// Create a new search service.
    #[must_use]
    pub const fn new(recipe_repo: RecipeRepository, recipe_service: RecipeService) -> Self {
        Self {
            recipe_repo,
            recipe_service,
        }
    }

    /// Search published recipes, most relevant first.
    pub async fn search(&self, query: SearchQuery) -> AppResult<SearchResult> {
        let terms = normalize_terms(&query.search_words);
        let ingredients = normalize_terms(&query.ingredients);
        if terms.is_empty() && ingredients.is_empty() {
            return Ok(SearchResult::empty());
        }

        let candidates = self
            .recipe_repo
            .search_candidates(&expand_synonyms(&terms), &expand_synonyms(&ingredients))
            .await?;
        let total = candidates.len() as u64;

        let term_matchers = terms
            .iter()
            .map(|t| TermMatcher::new(t))
            .collect::<AppResult<Vec<_>>>()?;
        let ingredient_matchers = ingredients
            .iter()
            .map(|t| TermMatcher::new(t))
            .collect::<AppResult<Vec<_>>>()?;

        let mut hits: Vec<SearchHit> = self
            .recipe_service
            .details(candidates)
            .await?
            .into_iter()
            .map(|recipe| SearchHit {
                search_score: score(&recipe, &term_matchers, &ingredient_matchers),
                recipe,
            })
            .collect();

        hits.sort_by(|a, b| {
            b.search_score
                .total_cmp(&a.search_score)
                .then_with(|| b.recipe.created_at.cmp(&a.recipe.created_at))
        });

        let skip = query.skip.unwrap_or(0) as usize;
        let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT) as usize;
        let recipes = hits.into_iter().skip(skip).take(limit).collect();

        tracing::debug!(terms = ?terms, ingredients = ?ingredients, total, "Recipe search");
        Ok(SearchResult { recipes, total })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::recipe::{AuthorSummary, IngredientView};
    use crate::services::recipe::tests::{build_service, create_test_recipe, empty};
    use chrono::{Duration, Utc};
    use letcook_db::entities::{recipe_ingredient, recipe_step, user};
    use std::sync::Arc;

    fn details(title: &str, description: &str, ingredients: &[&str], tags: &[&str]) -> RecipeDetails {
        RecipeDetails {
            id: title.to_string(),
            user_id: "author".to_string(),
            title: title.to_string(),
            description: description.to_string(),
            cook_time: 30,
            serving: 2,
            difficulty: None,
            images: vec![],
            video: None,
            tags: tags.iter().map(ToString::to_string).collect(),
            is_published: true,
            is_activate: true,
            created_at: Utc::now().into(),
            updated_at: None,
            steps: vec![],
            ingredients: ingredients
                .iter()
                .enumerate()
                .map(|(i, name)| IngredientView {
                    id: format!("i{i}"),
                    position: i as i32,
                    name: name.to_string(),
                    quantity: "1".to_string(),
                    unit: None,
                    product_id: None,
                })
                .collect(),
            author: AuthorSummary::default(),
        }
    }

    fn matchers(terms: &[&str]) -> Vec<TermMatcher> {
        terms.iter().map(|t| TermMatcher::new(t).unwrap()).collect()
    }

    #[test]
    fn test_normalize_terms() {
        let raw = vec![" Gà ".to_string(), String::new(), "gà".to_string(), "cay".to_string()];
        assert_eq!(normalize_terms(&raw), vec!["gà", "cay"]);
    }

    #[test]
    fn test_expand_synonyms_both_directions() {
        let expanded = expand_synonyms(&["bắp".to_string(), "dưa leo".to_string()]);
        assert_eq!(expanded, vec!["bắp", "dưa leo", "ngô", "dưa chuột"]);

        let plain = expand_synonyms(&["gà".to_string()]);
        assert_eq!(plain, vec!["gà"]);
    }

    #[test]
    fn test_matcher_escapes_regex_syntax() {
        let matcher = TermMatcher::new("a.b").unwrap();
        assert!(matcher.is_match("xA.By"));
        assert!(!matcher.is_match("aXb"));
    }

    #[test]
    fn test_matcher_accepts_synonyms() {
        let matcher = TermMatcher::new("ngô").unwrap();
        assert!(matcher.is_match("Bắp xào bơ"));
    }

    #[test]
    fn test_score_weights() {
        let recipe = details(
            "Gà cay",
            "Món gà nướng",
            &["thịt gà", "ớt", "gà xé"],
            &["gà", "cay"],
        );

        // "gà": title 10 + description 5 + two ingredients 6 + one tag 2 + bonus 0.5
        let only_chicken = score(&recipe, &matchers(&["gà"]), &[]);
        assert_eq!(only_chicken, 23.5);

        // requested ingredient "ớt" adds 2
        let with_chili = score(&recipe, &matchers(&["gà"]), &matchers(&["ớt"]));
        assert_eq!(with_chili, 25.5);

        let unrelated = score(&recipe, &matchers(&["bò"]), &[]);
        assert_eq!(unrelated, 0.0);
    }

    #[test]
    fn test_tag_only_match_scores() {
        let recipe = details("Phở bò", "Nước dùng trong", &["bánh phở"], &["soup", "beef"]);

        // tag 2 + bonus 0.5
        assert_eq!(score(&recipe, &matchers(&["SOUP"]), &[]), 2.5);
        // JSON punctuation is not part of any value
        assert_eq!(score(&recipe, &matchers(&["\",\""]), &[]), 0.0);
    }

    #[test]
    fn test_distinct_term_bonus_counts_terms_once() {
        let recipe = details("Gà cay", "", &[], &[]);
        // title matches both: 10 + 10 + 2 * 0.5
        assert_eq!(score(&recipe, &matchers(&["gà", "cay"]), &[]), 21.0);
    }

    #[tokio::test]
    async fn test_empty_query_skips_database() {
        let service = SearchService::new(
            RecipeRepository::new(Arc::new(empty().into_connection())),
            build_service(empty(), empty(), empty(), empty()),
        );

        let result = service
            .search(SearchQuery {
                search_words: vec!["  ".to_string()],
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(result.total, 0);
        assert!(result.recipes.is_empty());
    }

    #[tokio::test]
    async fn test_search_orders_by_score_then_recency() {
        let mut older_title_hit = create_test_recipe("older", "author", true);
        older_title_hit.title = "Canh bắp".to_string();
        older_title_hit.created_at = (Utc::now() - Duration::days(2)).into();

        let mut newer_desc_hit = create_test_recipe("newer", "author", true);
        newer_desc_hit.title = "Canh rau".to_string();
        newer_desc_hit.description = "Thêm ngô cho ngọt".to_string();

        let candidates = vec![newer_desc_hit, older_title_hit];

        let service = SearchService::new(
            RecipeRepository::new(Arc::new(
                empty().append_query_results([candidates]).into_connection(),
            )),
            build_service(
                empty()
                    .append_query_results([Vec::<recipe_step::Model>::new()])
                    .append_query_results([Vec::<recipe_ingredient::Model>::new()]),
                empty().append_query_results([Vec::<user::Model>::new()]),
                empty(),
                empty(),
            ),
        );

        let result = service
            .search(SearchQuery {
                search_words: vec!["ngô".to_string()],
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(result.total, 2);
        assert_eq!(result.recipes[0].recipe.id, "older");
        assert_eq!(result.recipes[0].search_score, 10.5);
        assert_eq!(result.recipes[1].recipe.id, "newer");
        assert_eq!(result.recipes[1].search_score, 5.5);
    }
}
