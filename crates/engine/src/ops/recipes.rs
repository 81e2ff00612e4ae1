use chrono::Utc;
use sea_orm::{
    ConnectionTrait, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
    sea_query::Expr,
};

use crate::{
    EngineError, FALLBACK_CATEGORY, Recipe, RecipeCategory, RecipeCmd, RecordTarget,
    ResultEngine, SourceType, cooking_sessions, recipe_categories, recipes,
    util::{ensure_present, normalize_optional_text, required_text},
};

use super::{Engine, with_tx};

impl Engine {
    /// Recipes of the user, newest first.
    pub async fn recipes(&self, user_id: &str) -> ResultEngine<Vec<Recipe>> {
        self.list_recipes(user_id, None, false).await
    }

    pub async fn favorite_recipes(&self, user_id: &str) -> ResultEngine<Vec<Recipe>> {
        self.list_recipes(user_id, None, true).await
    }

    pub async fn recipes_by_category(
        &self,
        user_id: &str,
        category: &str,
    ) -> ResultEngine<Vec<Recipe>> {
        self.list_recipes(user_id, Some(category), false).await
    }

    pub async fn recipe(&self, user_id: &str, id: &str) -> ResultEngine<Recipe> {
        Recipe::try_from(self.find_recipe(user_id, id).await?)
    }

    /// Create a recipe. Title and category are required.
    pub async fn create_recipe(&self, user_id: &str, cmd: RecipeCmd) -> ResultEngine<Recipe> {
        let title = required_text(cmd.title.clone());
        let category = required_text(cmd.category.clone());
        ensure_present(&[("title", title.is_some()), ("category", category.is_some())])?;

        let mut recipe = Recipe::new(title.unwrap_or_default(), category.unwrap_or_default());
        apply_recipe_cmd(&mut recipe, cmd);
        recipe.normalize();

        recipes::ActiveModel::from_recipe(&recipe, user_id)?
            .insert(&self.database)
            .await?;

        self.refresh_category_count(user_id, &recipe.category).await;
        Ok(recipe)
    }

    /// Update the given fields of a recipe.
    pub async fn update_recipe(
        &self,
        user_id: &str,
        id: &str,
        cmd: RecipeCmd,
    ) -> ResultEngine<Recipe> {
        let mut recipe = Recipe::try_from(self.find_recipe(user_id, id).await?)?;
        let previous_category = recipe.category.clone();

        let title = cmd.title.as_deref().map(str::trim);
        let category = cmd.category.as_deref().map(str::trim);
        ensure_present(&[
            ("title", title.is_none_or(|t| !t.is_empty())),
            ("category", category.is_none_or(|c| !c.is_empty())),
        ])?;

        apply_recipe_cmd(&mut recipe, cmd);
        recipe.normalize();
        recipe.updated_at = Utc::now();

        recipes::ActiveModel::from_recipe(&recipe, user_id)?
            .update(&self.database)
            .await?;

        if previous_category != recipe.category {
            self.refresh_category_count(user_id, &previous_category)
                .await;
            self.refresh_category_count(user_id, &recipe.category).await;
        }
        Ok(recipe)
    }

    /// Delete a recipe, its cooking session and its derived records.
    pub async fn delete_recipe(&self, user_id: &str, id: &str) -> ResultEngine<()> {
        let model = self.find_recipe(user_id, id).await?;
        with_tx!(self, |db_tx| {
            recipes::Entity::delete_by_id(id).exec(&db_tx).await?;
            cooking_sessions::Entity::delete_many()
                .filter(cooking_sessions::Column::UserId.eq(user_id))
                .filter(cooking_sessions::Column::RecipeId.eq(id))
                .exec(&db_tx)
                .await?;
            Ok::<(), EngineError>(())
        })?;

        self.refresh_category_count(user_id, &model.category).await;
        self.retract_derived(user_id, &RecordTarget::all(SourceType::Recipe, id))
            .await;
        Ok(())
    }

    pub async fn toggle_recipe_favorite(&self, user_id: &str, id: &str) -> ResultEngine<Recipe> {
        let mut recipe = Recipe::try_from(self.find_recipe(user_id, id).await?)?;
        recipe.is_favorite = !recipe.is_favorite;
        recipe.updated_at = Utc::now();
        recipes::ActiveModel::from_recipe(&recipe, user_id)?
            .update(&self.database)
            .await?;
        Ok(recipe)
    }

    /// Recipe categories sorted by name, ignoring case.
    pub async fn recipe_categories(&self, user_id: &str) -> ResultEngine<Vec<RecipeCategory>> {
        let mut categories = recipe_categories::Entity::find()
            .filter(recipe_categories::Column::UserId.eq(user_id))
            .all(&self.database)
            .await?
            .into_iter()
            .map(RecipeCategory::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;
        categories.sort_by_cached_key(|category| category.name.to_lowercase());
        Ok(categories)
    }

    pub async fn create_recipe_category(
        &self,
        user_id: &str,
        name: Option<String>,
        description: Option<String>,
    ) -> ResultEngine<RecipeCategory> {
        let name = required_text(name);
        ensure_present(&[("name", name.is_some())])?;
        let category = RecipeCategory::new(
            name.unwrap_or_default(),
            normalize_optional_text(description.as_deref()).unwrap_or_default(),
        );
        recipe_categories::ActiveModel::from_category(&category, user_id)
            .insert(&self.database)
            .await?;
        Ok(category)
    }

    /// Rename or describe a category. Renaming moves its recipes along.
    pub async fn update_recipe_category(
        &self,
        user_id: &str,
        id: &str,
        name: Option<String>,
        description: Option<String>,
    ) -> ResultEngine<RecipeCategory> {
        let mut category = RecipeCategory::try_from(self.find_category(user_id, id).await?)?;
        let previous_name = category.name.clone();
        if let Some(name) = name {
            let name = name.trim().to_string();
            ensure_present(&[("name", !name.is_empty())])?;
            category.name = name;
        }
        category.description = description.unwrap_or_default();

        with_tx!(self, |db_tx| {
            recipe_categories::ActiveModel::from_category(&category, user_id)
                .update(&db_tx)
                .await?;
            if previous_name != category.name {
                move_recipes(&db_tx, user_id, &previous_name, &category.name).await?;
            }
            Ok::<(), EngineError>(())
        })?;
        Ok(category)
    }

    /// Delete a category. Its recipes are moved to [`FALLBACK_CATEGORY`].
    pub async fn delete_recipe_category(&self, user_id: &str, id: &str) -> ResultEngine<()> {
        let category = self.find_category(user_id, id).await?;
        with_tx!(self, |db_tx| {
            move_recipes(&db_tx, user_id, &category.name, FALLBACK_CATEGORY).await?;
            recipe_categories::Entity::delete_by_id(id)
                .exec(&db_tx)
                .await?;
            Ok::<(), EngineError>(())
        })?;

        self.refresh_category_count(user_id, FALLBACK_CATEGORY).await;
        Ok(())
    }

    async fn list_recipes(
        &self,
        user_id: &str,
        category: Option<&str>,
        favorites_only: bool,
    ) -> ResultEngine<Vec<Recipe>> {
        let mut query = recipes::Entity::find().filter(recipes::Column::UserId.eq(user_id));
        if let Some(category) = category {
            query = query.filter(recipes::Column::Category.eq(category));
        }
        if favorites_only {
            query = query.filter(recipes::Column::IsFavorite.eq(true));
        }
        query
            .order_by_desc(recipes::Column::CreatedAt)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Recipe::try_from)
            .collect()
    }

    async fn find_recipe(&self, user_id: &str, id: &str) -> ResultEngine<recipes::Model> {
        recipes::Entity::find_by_id(id)
            .filter(recipes::Column::UserId.eq(user_id))
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::not_found("Recipe", id))
    }

    async fn find_category(
        &self,
        user_id: &str,
        id: &str,
    ) -> ResultEngine<recipe_categories::Model> {
        recipe_categories::Entity::find_by_id(id)
            .filter(recipe_categories::Column::UserId.eq(user_id))
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::not_found("Category", id))
    }

    /// Recount the recipes filed under `name`, creating the category if it
    /// does not exist yet. Failures are logged.
    async fn refresh_category_count(&self, user_id: &str, name: &str) {
        if let Err(err) = self.try_refresh_category_count(user_id, name).await {
            tracing::warn!(user_id, category = name, "failed to update category count: {err}");
        }
    }

    async fn try_refresh_category_count(&self, user_id: &str, name: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let count = recipes::Entity::find()
                .filter(recipes::Column::UserId.eq(user_id))
                .filter(recipes::Column::Category.eq(name))
                .count(&db_tx)
                .await?;

            let existing = recipe_categories::Entity::find()
                .filter(recipe_categories::Column::UserId.eq(user_id))
                .filter(recipe_categories::Column::Name.eq(name))
                .one(&db_tx)
                .await?;
            match existing {
                Some(model) => {
                    recipe_categories::Entity::update_many()
                        .col_expr(recipe_categories::Column::Count, Expr::value(count as i64))
                        .filter(recipe_categories::Column::Id.eq(model.id))
                        .exec(&db_tx)
                        .await?;
                }
                None => {
                    let mut category = RecipeCategory::new(name.to_string(), String::new());
                    category.count = count;
                    recipe_categories::ActiveModel::from_category(&category, user_id)
                        .insert(&db_tx)
                        .await?;
                }
            }
            Ok(())
        })
    }
}

fn apply_recipe_cmd(recipe: &mut Recipe, cmd: RecipeCmd) {
    if let Some(title) = required_text(cmd.title) {
        recipe.title = title;
    }
    if let Some(category) = required_text(cmd.category) {
        recipe.category = category;
    }
    if let Some(description) = cmd.description {
        recipe.description = description.trim().to_string();
    }
    if let Some(ingredients) = cmd.ingredients {
        recipe.ingredients = ingredients;
    }
    if let Some(directions) = cmd.directions {
        recipe.directions = directions;
    }
    if let Some(serving_size) = cmd.serving_size {
        recipe.serving_size = serving_size.max(1);
    }
    if let Some(total_time_value) = cmd.total_time_value {
        recipe.total_time_value = total_time_value;
        recipe.total_time.clear();
    }
    if let Some(total_time_unit) = cmd.total_time_unit {
        recipe.total_time_unit = total_time_unit;
        recipe.total_time.clear();
    }
    if let Some(total_time) = cmd.total_time {
        recipe.total_time = total_time;
    }
    if cmd.notes.is_some() {
        recipe.notes = normalize_optional_text(cmd.notes.as_deref());
    }
    if cmd.image_url.is_some() {
        recipe.image_url = normalize_optional_text(cmd.image_url.as_deref());
    }
    if let Some(is_favorite) = cmd.is_favorite {
        recipe.is_favorite = is_favorite;
    }
}

async fn move_recipes<C: ConnectionTrait>(
    db: &C,
    user_id: &str,
    from: &str,
    to: &str,
) -> ResultEngine<u64> {
    let moved = recipes::Entity::update_many()
        .col_expr(recipes::Column::Category, Expr::value(to))
        .col_expr(recipes::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(recipes::Column::UserId.eq(user_id))
        .filter(recipes::Column::Category.eq(from))
        .exec(db)
        .await?
        .rows_affected;
    Ok(moved)
}
