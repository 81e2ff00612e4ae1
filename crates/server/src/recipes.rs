//! Recipe and recipe category API endpoints

use api_types::{
    ApiResponse,
    recipe::{Category, CategoryNew, Direction, Ingredient, Recipe, RecipeNew},
};
use axum::{
    Extension, Json,
    extract::State,
};
use engine::{EngineError, RecipeCmd, TimeUnit};

use crate::{
    ServerError,
    extract::{ApiJson, ApiPath},
    server::{ServerState, UserId},
};

fn map_ingredient(ingredient: engine::Ingredient) -> Ingredient {
    Ingredient {
        id: Some(ingredient.id),
        name: ingredient.name,
        quantity: ingredient.quantity,
        unit: ingredient.unit,
    }
}

fn map_direction(direction: engine::Direction) -> Direction {
    Direction {
        id: Some(direction.id),
        step: direction.step,
        instruction: direction.instruction,
        duration: direction.duration,
        time_value: direction.time_value,
        time_unit: direction.time_unit.map(|unit| unit.as_str().to_string()),
    }
}

fn map_recipe(recipe: engine::Recipe) -> Recipe {
    Recipe {
        id: recipe.id,
        title: recipe.title,
        description: recipe.description,
        category: recipe.category,
        ingredients: recipe.ingredients.into_iter().map(map_ingredient).collect(),
        directions: recipe.directions.into_iter().map(map_direction).collect(),
        serving_size: recipe.serving_size,
        total_time: recipe.total_time,
        total_time_value: recipe.total_time_value,
        total_time_unit: recipe.total_time_unit.as_str().to_string(),
        notes: recipe.notes,
        image_url: recipe.image_url,
        is_favorite: recipe.is_favorite,
        created_at: recipe.created_at,
        updated_at: recipe.updated_at,
    }
}

fn map_category(category: engine::RecipeCategory) -> Category {
    Category {
        id: category.id,
        name: category.name,
        description: category.description,
        count: category.count,
        created_at: category.created_at,
    }
}

fn recipe_cmd(payload: RecipeNew) -> Result<RecipeCmd, ServerError> {
    let ingredients = payload.ingredients.map(|ingredients| {
        ingredients
            .into_iter()
            .map(|ingredient| engine::Ingredient {
                id: ingredient.id.unwrap_or_default(),
                name: ingredient.name,
                quantity: ingredient.quantity,
                unit: ingredient.unit,
            })
            .collect()
    });

    let directions = payload
        .directions
        .map(|directions| {
            directions
                .into_iter()
                .map(|direction| -> Result<engine::Direction, EngineError> {
                    Ok(engine::Direction {
                        id: direction.id.unwrap_or_default(),
                        step: direction.step,
                        instruction: direction.instruction,
                        duration: direction.duration,
                        time_value: direction.time_value,
                        time_unit: direction
                            .time_unit
                            .as_deref()
                            .map(TimeUnit::try_from)
                            .transpose()?,
                    })
                })
                .collect::<Result<Vec<_>, EngineError>>()
        })
        .transpose()?;

    let total_time_unit = payload
        .total_time_unit
        .as_deref()
        .map(TimeUnit::try_from)
        .transpose()?;

    Ok(RecipeCmd {
        title: payload.title,
        description: payload.description,
        category: payload.category,
        ingredients,
        directions,
        serving_size: payload.serving_size,
        total_time: payload.total_time,
        total_time_value: payload.total_time_value,
        total_time_unit,
        notes: payload.notes,
        image_url: payload.image_url,
        is_favorite: payload.is_favorite,
    })
}

pub async fn list(
    Extension(user): Extension<UserId>,
    State(state): State<ServerState>,
) -> Result<Json<ApiResponse<Vec<Recipe>>>, ServerError> {
    let recipes = state
        .engine
        .recipes(user.as_str())
        .await?
        .into_iter()
        .map(map_recipe)
        .collect();

    Ok(Json(ApiResponse::data(recipes)))
}

pub async fn favorites(
    Extension(user): Extension<UserId>,
    State(state): State<ServerState>,
) -> Result<Json<ApiResponse<Vec<Recipe>>>, ServerError> {
    let recipes = state
        .engine
        .favorite_recipes(user.as_str())
        .await?
        .into_iter()
        .map(map_recipe)
        .collect();

    Ok(Json(ApiResponse::data(recipes)))
}

pub async fn list_by_category(
    Extension(user): Extension<UserId>,
    State(state): State<ServerState>,
    ApiPath(category): ApiPath<String>,
) -> Result<Json<ApiResponse<Vec<Recipe>>>, ServerError> {
    let recipes = state
        .engine
        .recipes_by_category(user.as_str(), &category)
        .await?
        .into_iter()
        .map(map_recipe)
        .collect();

    Ok(Json(ApiResponse::data(recipes)))
}

pub async fn get(
    Extension(user): Extension<UserId>,
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<ApiResponse<Recipe>>, ServerError> {
    let recipe = state.engine.recipe(user.as_str(), &id).await?;
    Ok(Json(ApiResponse::data(map_recipe(recipe))))
}

pub async fn create(
    Extension(user): Extension<UserId>,
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<RecipeNew>,
) -> Result<Json<ApiResponse<Recipe>>, ServerError> {
    let recipe = state
        .engine
        .create_recipe(user.as_str(), recipe_cmd(payload)?)
        .await?;
    Ok(Json(ApiResponse::data(map_recipe(recipe))))
}

pub async fn update(
    Extension(user): Extension<UserId>,
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<String>,
    ApiJson(payload): ApiJson<RecipeNew>,
) -> Result<Json<ApiResponse<Recipe>>, ServerError> {
    let recipe = state
        .engine
        .update_recipe(user.as_str(), &id, recipe_cmd(payload)?)
        .await?;
    Ok(Json(ApiResponse::data(map_recipe(recipe))))
}

pub async fn delete(
    Extension(user): Extension<UserId>,
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<ApiResponse<()>>, ServerError> {
    state.engine.delete_recipe(user.as_str(), &id).await?;
    Ok(Json(ApiResponse::ok()))
}

pub async fn toggle_favorite(
    Extension(user): Extension<UserId>,
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<ApiResponse<Recipe>>, ServerError> {
    let recipe = state
        .engine
        .toggle_recipe_favorite(user.as_str(), &id)
        .await?;
    Ok(Json(ApiResponse::data(map_recipe(recipe))))
}

pub async fn categories(
    Extension(user): Extension<UserId>,
    State(state): State<ServerState>,
) -> Result<Json<ApiResponse<Vec<Category>>>, ServerError> {
    let categories = state
        .engine
        .recipe_categories(user.as_str())
        .await?
        .into_iter()
        .map(map_category)
        .collect();

    Ok(Json(ApiResponse::data(categories)))
}

pub async fn category_new(
    Extension(user): Extension<UserId>,
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<CategoryNew>,
) -> Result<Json<ApiResponse<Category>>, ServerError> {
    let category = state
        .engine
        .create_recipe_category(user.as_str(), payload.name, payload.description)
        .await?;
    Ok(Json(ApiResponse::data(map_category(category))))
}

pub async fn category_update(
    Extension(user): Extension<UserId>,
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<String>,
    ApiJson(payload): ApiJson<CategoryNew>,
) -> Result<Json<ApiResponse<Category>>, ServerError> {
    let category = state
        .engine
        .update_recipe_category(user.as_str(), &id, payload.name, payload.description)
        .await?;
    Ok(Json(ApiResponse::data(map_category(category))))
}

/// Delete a category. Its recipes move to the fallback category.
pub async fn category_delete(
    Extension(user): Extension<UserId>,
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<ApiResponse<()>>, ServerError> {
    state
        .engine
        .delete_recipe_category(user.as_str(), &id)
        .await?;
    Ok(Json(ApiResponse::ok()))
}
