//! Recipe categories with a cached recipe count.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use uuid::Uuid;

use crate::EngineError;

/// Category recipes are moved to when theirs is deleted.
pub const FALLBACK_CATEGORY: &str = "Other";

#[derive(Clone, Debug, PartialEq)]
pub struct RecipeCategory {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Number of recipes filed under `name`.
    pub count: u64,
    pub created_at: DateTime<Utc>,
}

impl RecipeCategory {
    pub fn new(name: String, description: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            description,
            count: 0,
            created_at: Utc::now(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "recipe_categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub description: String,
    pub count: i64,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    pub(crate) fn from_category(category: &RecipeCategory, user_id: &str) -> Self {
        Self {
            id: ActiveValue::Set(category.id.clone()),
            user_id: ActiveValue::Set(user_id.to_string()),
            name: ActiveValue::Set(category.name.clone()),
            description: ActiveValue::Set(category.description.clone()),
            count: ActiveValue::Set(category.count as i64),
            created_at: ActiveValue::Set(category.created_at),
        }
    }
}

impl TryFrom<Model> for RecipeCategory {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            count: u64::try_from(model.count)
                .map_err(|_| EngineError::InvalidRecord(format!("count {}", model.count)))?,
            id: model.id,
            name: model.name,
            description: model.description,
            created_at: model.created_at,
        })
    }
}
