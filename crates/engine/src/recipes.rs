//! The recipe book.
//!
//! Ingredients and directions are stored as JSON arrays on the recipe row.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeUnit {
    #[default]
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Minutes => "minutes",
            Self::Hours => "hours",
            Self::Days => "days",
        }
    }

    /// Human readable duration, e.g. `45 mins`, `1 hour`, `3 days`.
    pub fn display(self, value: u32) -> String {
        match (self, value) {
            (Self::Minutes, 1) => "1 minute".to_string(),
            (Self::Hours, 1) => "1 hour".to_string(),
            (Self::Days, 1) => "1 day".to_string(),
            (Self::Minutes, n) => format!("{n} mins"),
            (unit, n) => format!("{n} {}", unit.as_str()),
        }
    }
}

impl TryFrom<&str> for TimeUnit {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "minutes" => Ok(Self::Minutes),
            "hours" => Ok(Self::Hours),
            "days" => Ok(Self::Days),
            other => Err(EngineError::InvalidValue(format!(
                "time unit must be one of: minutes, hours, days. Received: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub unit: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Direction {
    pub id: String,
    pub step: u32,
    pub instruction: String,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub time_value: Option<u32>,
    #[serde(default)]
    pub time_unit: Option<TimeUnit>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Recipe {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub ingredients: Vec<Ingredient>,
    pub directions: Vec<Direction>,
    pub serving_size: u32,
    pub total_time: String,
    pub total_time_value: u32,
    pub total_time_unit: TimeUnit,
    pub notes: Option<String>,
    pub image_url: Option<String>,
    pub is_favorite: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Recipe {
    pub fn new(title: String, category: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title,
            description: String::new(),
            category,
            ingredients: Vec::new(),
            directions: Vec::new(),
            serving_size: 1,
            total_time: String::new(),
            total_time_value: 0,
            total_time_unit: TimeUnit::Minutes,
            notes: None,
            image_url: None,
            is_favorite: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Give ids to new ingredients and directions, number the directions and
    /// fill in the display strings the client did not send.
    pub(crate) fn normalize(&mut self) {
        for ingredient in &mut self.ingredients {
            if ingredient.id.trim().is_empty() {
                ingredient.id = Uuid::new_v4().to_string();
            }
        }
        for (index, direction) in self.directions.iter_mut().enumerate() {
            if direction.id.trim().is_empty() {
                direction.id = Uuid::new_v4().to_string();
            }
            direction.step = index as u32 + 1;
            if direction.duration.is_none()
                && let Some(value) = direction.time_value.filter(|v| *v > 0)
            {
                direction.duration = Some(direction.time_unit.unwrap_or_default().display(value));
            }
        }
        if self.total_time.trim().is_empty() && self.total_time_value > 0 {
            self.total_time = self.total_time_unit.display(self.total_time_value);
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "recipes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub ingredients: Json,
    pub directions: Json,
    pub serving_size: i32,
    pub total_time: String,
    pub total_time_value: i32,
    pub total_time_unit: String,
    pub notes: Option<String>,
    pub image_url: Option<String>,
    pub is_favorite: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    pub(crate) fn from_recipe(recipe: &Recipe, user_id: &str) -> ResultEngine<Self> {
        Ok(Self {
            id: ActiveValue::Set(recipe.id.clone()),
            user_id: ActiveValue::Set(user_id.to_string()),
            title: ActiveValue::Set(recipe.title.clone()),
            description: ActiveValue::Set(recipe.description.clone()),
            category: ActiveValue::Set(recipe.category.clone()),
            ingredients: ActiveValue::Set(serde_json::to_value(&recipe.ingredients)?),
            directions: ActiveValue::Set(serde_json::to_value(&recipe.directions)?),
            serving_size: ActiveValue::Set(stored_count("Serving size", recipe.serving_size)?),
            total_time: ActiveValue::Set(recipe.total_time.clone()),
            total_time_value: ActiveValue::Set(stored_count(
                "Total time",
                recipe.total_time_value,
            )?),
            total_time_unit: ActiveValue::Set(recipe.total_time_unit.as_str().to_string()),
            notes: ActiveValue::Set(recipe.notes.clone()),
            image_url: ActiveValue::Set(recipe.image_url.clone()),
            is_favorite: ActiveValue::Set(recipe.is_favorite),
            created_at: ActiveValue::Set(recipe.created_at),
            updated_at: ActiveValue::Set(recipe.updated_at),
        })
    }
}

fn stored_count(field: &str, value: u32) -> ResultEngine<i32> {
    i32::try_from(value)
        .map_err(|_| EngineError::InvalidValue(format!("{field} must be at most {}", i32::MAX)))
}

impl TryFrom<Model> for Recipe {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            ingredients: serde_json::from_value(model.ingredients)?,
            directions: serde_json::from_value(model.directions)?,
            serving_size: u32::try_from(model.serving_size).map_err(|_| {
                EngineError::InvalidRecord(format!("serving size {}", model.serving_size))
            })?,
            total_time_value: u32::try_from(model.total_time_value).map_err(|_| {
                EngineError::InvalidRecord(format!("total time value {}", model.total_time_value))
            })?,
            total_time_unit: TimeUnit::try_from(model.total_time_unit.as_str())
                .map_err(|err| EngineError::InvalidRecord(err.to_string()))?,
            id: model.id,
            title: model.title,
            description: model.description,
            category: model.category,
            total_time: model.total_time,
            notes: model.notes,
            image_url: model.image_url,
            is_favorite: model.is_favorite,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
