//! Command structs for engine operations.
//!
//! These types carry the raw, client-provided fields of write operations.
//! Validation happens inside the engine, so every field is optional here and
//! text fields keep their wire representation.

use chrono::NaiveDate;

use crate::{Direction, Ingredient, TimeUnit};

/// Raw fields of a budget item (template, month instance or legacy entry).
#[derive(Clone, Debug, Default)]
pub struct BudgetItemInput {
    pub source: Option<String>,
    pub category: Option<String>,
    pub purpose: Option<String>,
    /// Day of month, as sent by the client.
    pub due_date: Option<String>,
    pub date_type: Option<String>,
    pub dynamic_date_rule: Option<String>,
    pub amount: Option<f64>,
    pub expected_amount: Option<f64>,
    pub target: Option<f64>,
    pub current_amount: Option<f64>,
    pub stepup_date: Option<String>,
    pub stepup_amount: Option<f64>,
}

impl BudgetItemInput {
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        category: impl Into<String>,
        purpose: impl Into<String>,
        due_date: impl Into<String>,
        amount: f64,
    ) -> Self {
        Self {
            source: Some(source.into()),
            category: Some(category.into()),
            purpose: Some(purpose.into()),
            due_date: Some(due_date.into()),
            amount: Some(amount),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn date_type(mut self, date_type: impl Into<String>) -> Self {
        self.date_type = Some(date_type.into());
        self
    }

    #[must_use]
    pub fn dynamic_date_rule(mut self, rule: impl Into<String>) -> Self {
        self.dynamic_date_rule = Some(rule.into());
        self
    }

    #[must_use]
    pub fn expected_amount(mut self, amount: f64) -> Self {
        self.expected_amount = Some(amount);
        self
    }
}

/// Partial update of a budget item. `None` leaves the field untouched.
#[derive(Clone, Debug, Default)]
pub struct BudgetItemPatch {
    pub source: Option<String>,
    pub category: Option<String>,
    pub purpose: Option<String>,
    pub due_date: Option<String>,
    pub date_type: Option<String>,
    pub dynamic_date_rule: Option<String>,
    pub amount: Option<f64>,
    pub expected_amount: Option<f64>,
    pub target: Option<f64>,
    pub current_amount: Option<f64>,
    pub stepup_date: Option<String>,
    pub stepup_amount: Option<f64>,
}

/// Create a todo.
#[derive(Clone, Debug, Default)]
pub struct TodoCmd {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<NaiveDate>,
}

impl TodoCmd {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    #[must_use]
    pub fn priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }
}

/// Update a todo. `None` leaves the field untouched.
#[derive(Clone, Debug, Default)]
pub struct TodoUpdateCmd {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub completed: Option<bool>,
    pub due_date: Option<NaiveDate>,
}

/// Create or update a recipe. On update `None` leaves the field untouched.
#[derive(Clone, Debug, Default)]
pub struct RecipeCmd {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub ingredients: Option<Vec<Ingredient>>,
    pub directions: Option<Vec<Direction>>,
    pub serving_size: Option<u32>,
    pub total_time: Option<String>,
    pub total_time_value: Option<u32>,
    pub total_time_unit: Option<TimeUnit>,
    pub notes: Option<String>,
    pub image_url: Option<String>,
    pub is_favorite: Option<bool>,
}

impl RecipeCmd {
    #[must_use]
    pub fn new(title: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            category: Some(category.into()),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn ingredients(mut self, ingredients: Vec<Ingredient>) -> Self {
        self.ingredients = Some(ingredients);
        self
    }

    #[must_use]
    pub fn directions(mut self, directions: Vec<Direction>) -> Self {
        self.directions = Some(directions);
        self
    }

    #[must_use]
    pub fn total_time(mut self, value: u32, unit: TimeUnit) -> Self {
        self.total_time_value = Some(value);
        self.total_time_unit = Some(unit);
        self
    }
}

/// Save the state of a cooking session. Missing fields fall back to their
/// idle defaults.
#[derive(Clone, Debug, Default)]
pub struct CookingSessionCmd {
    pub is_playing: Option<bool>,
    pub is_paused: Option<bool>,
    pub start_time: Option<String>,
    pub pause_time: Option<String>,
    pub total_pause_duration: Option<i64>,
    pub checked_steps: Option<Vec<u32>>,
}

/// Create an inbox notification.
#[derive(Clone, Debug, Default)]
pub struct InboxCmd {
    pub title: Option<String>,
    pub message: Option<String>,
    pub kind: Option<String>,
    pub link: Option<String>,
}

impl InboxCmd {
    #[must_use]
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            message: Some(message.into()),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }
}
