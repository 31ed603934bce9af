//! Recipe endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch, post, put},
};
use letcook_common::AppResult;
use letcook_core::{
    IngredientInput, ListRecipesQuery, ProductLink, RecipeDetails, RecipeInput, RecipePage,
    RecipeWithComments,
};
use serde::Deserialize;

use crate::{
    extractors::{AdminUser, AuthUser, MaybeAuthUser},
    middleware::AppState,
    response::ApiResponse,
};

#[derive(Debug, Deserialize)]
pub struct IngredientsRequest {
    pub ingredients: Vec<IngredientInput>,
}

#[derive(Debug, Deserialize)]
pub struct ProductLinksRequest {
    pub ingredients: Vec<ProductLink>,
}

#[derive(Debug, Deserialize)]
pub struct RejectRequest {
    pub feedback: Option<String>,
}

async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<RecipeInput>,
) -> AppResult<ApiResponse<RecipeDetails>> {
    let recipe = state.recipe_service.create(&user, input).await?;
    Ok(ApiResponse::created(recipe))
}

async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<RecipeInput>,
) -> AppResult<ApiResponse<RecipeDetails>> {
    let recipe = state.recipe_service.update(&user, &id, input).await?;
    Ok(ApiResponse::ok(recipe))
}

async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListRecipesQuery>,
) -> AppResult<ApiResponse<RecipePage>> {
    let page = state.recipe_service.list(query).await?;
    Ok(ApiResponse::ok(page))
}

async fn list_all(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<RecipeDetails>>> {
    let recipes = state.recipe_service.list_all().await?;
    Ok(ApiResponse::ok(recipes))
}

async fn show(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<RecipeWithComments>> {
    let recipe = state.recipe_service.get(viewer.as_ref(), &id).await?;
    Ok(ApiResponse::ok(recipe))
}

async fn update_ingredients(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<IngredientsRequest>,
) -> AppResult<ApiResponse<RecipeDetails>> {
    let recipe = state
        .recipe_service
        .update_ingredients(&user, &id, req.ingredients)
        .await?;
    Ok(ApiResponse::ok(recipe))
}

async fn link_products(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ProductLinksRequest>,
) -> AppResult<ApiResponse<RecipeDetails>> {
    let recipe = state
        .recipe_service
        .link_products(&id, req.ingredients)
        .await?;
    Ok(ApiResponse::ok(recipe))
}

async fn ingredient_names(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<String>>> {
    let names = state.recipe_service.ingredient_names().await?;
    Ok(ApiResponse::ok(names))
}

async fn by_user(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<ApiResponse<Vec<RecipeDetails>>> {
    let recipes = state
        .recipe_service
        .by_user(viewer.as_ref(), &user_id)
        .await?;
    Ok(ApiResponse::ok(recipes))
}

async fn accept(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<RecipeDetails>> {
    let recipe = state.recipe_service.accept(&id).await?;
    Ok(ApiResponse::ok(recipe))
}

async fn reject(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Option<Json<RejectRequest>>,
) -> AppResult<ApiResponse<RecipeDetails>> {
    let feedback = body.and_then(|Json(req)| req.feedback);
    let recipe = state.recipe_service.reject(&id, feedback).await?;
    Ok(ApiResponse::ok(recipe))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/recipe", get(list).post(create))
        .route("/recipe/all", get(list_all))
        .route("/recipe/ingredients", get(ingredient_names))
        .route("/recipe/user/{id}", get(by_user))
        .route("/recipe/{id}", get(show).put(update))
        .route("/recipe/{id}/ingredients", put(update_ingredients))
        .route("/recipe/{id}/ingredients/products", patch(link_products))
        .route("/recipe/{id}/accept", post(accept))
        .route("/recipe/{id}/reject", post(reject))
}
