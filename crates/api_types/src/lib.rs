//! JSON wire types of the dashboard API.
//!
//! Every body is camelCase. Responses are wrapped in [`ApiResponse`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Machine readable error class carried by failed responses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorType {
    ValidationError,
    NotFound,
    DatabaseError,
    NetworkError,
    Forbidden,
}

/// Response envelope shared by every endpoint.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<ErrorType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl<T> ApiResponse<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            error: None,
            error_type: None,
            details: None,
            timestamp: None,
        }
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl ApiResponse<()> {
    /// A successful response without payload.
    pub fn ok() -> Self {
        Self {
            success: true,
            data: None,
            message: None,
            error: None,
            error_type: None,
            details: None,
            timestamp: None,
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self::ok().with_message(message)
    }

    pub fn failure(
        error: impl Into<String>,
        error_type: ErrorType,
        details: impl Into<String>,
    ) -> Self {
        Self {
            success: false,
            data: None,
            message: None,
            error: Some(error.into()),
            error_type: Some(error_type),
            details: Some(details.into()),
            timestamp: Some(Utc::now()),
        }
    }
}

pub mod budget {
    use super::*;

    /// Day of month as sent by clients: either `5` or `"5"`.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(untagged)]
    pub enum DueDate {
        Number(i64),
        Text(String),
    }

    impl DueDate {
        pub fn into_text(self) -> String {
            match self {
                Self::Number(day) => day.to_string(),
                Self::Text(day) => day,
            }
        }
    }

    /// Body of every budget item write. All fields are optional on the wire;
    /// the server reports the missing ones.
    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BudgetItemNew {
        pub source: Option<String>,
        pub category: Option<String>,
        pub purpose: Option<String>,
        pub due_date: Option<DueDate>,
        pub date_type: Option<String>,
        pub dynamic_date_rule: Option<String>,
        pub amount: Option<f64>,
        pub expected_amount: Option<f64>,
        pub target: Option<f64>,
        pub current_amount: Option<f64>,
        pub stepup_date: Option<String>,
        pub stepup_amount: Option<f64>,
    }

    /// `POST /api/budget/template`.
    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TemplateNew {
        /// First month of the fan-out, `YYYY-MM`. Defaults to the current month.
        pub month_key: Option<String>,
        #[serde(flatten)]
        pub item: BudgetItemNew,
    }

    /// Fields shared by every budget item view.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BudgetItemView {
        pub source: String,
        pub category: String,
        pub purpose: String,
        pub due_date: String,
        pub date_type: String,
        pub dynamic_date_rule: String,
        pub amount: f64,
        pub expected_amount: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub target: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub current_amount: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub stepup_date: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub stepup_amount: Option<f64>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Template {
        pub id: String,
        #[serde(flatten)]
        pub item: BudgetItemView,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MonthlyTransaction {
        pub id: String,
        pub month_key: String,
        pub template_id: Option<String>,
        pub is_customized: bool,
        /// The date the item is due in its month.
        pub actual_due_date: Option<NaiveDate>,
        #[serde(flatten)]
        pub item: BudgetItemView,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BudgetTransaction {
        pub id: String,
        #[serde(flatten)]
        pub item: BudgetItemView,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BudgetSummary {
        pub total_income: f64,
        pub total_expense: f64,
        pub total_savings: f64,
        pub balance: f64,
    }
}

pub mod todo {
    use super::*;

    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TodoNew {
        pub title: Option<String>,
        pub description: Option<String>,
        pub status: Option<String>,
        pub priority: Option<String>,
        pub completed: Option<bool>,
        pub due_date: Option<NaiveDate>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Todo {
        pub id: String,
        pub title: String,
        pub description: String,
        pub status: String,
        pub priority: String,
        pub completed: bool,
        pub due_date: Option<NaiveDate>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }
}

pub mod recipe {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Ingredient {
        #[serde(default)]
        pub id: Option<String>,
        pub name: String,
        #[serde(default)]
        pub quantity: String,
        #[serde(default)]
        pub unit: String,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Direction {
        #[serde(default)]
        pub id: Option<String>,
        #[serde(default)]
        pub step: u32,
        pub instruction: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub duration: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub time_value: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub time_unit: Option<String>,
    }

    /// Body of recipe create and update. On update absent fields are kept.
    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RecipeNew {
        pub title: Option<String>,
        pub description: Option<String>,
        pub category: Option<String>,
        pub ingredients: Option<Vec<Ingredient>>,
        pub directions: Option<Vec<Direction>>,
        pub serving_size: Option<u32>,
        pub total_time: Option<String>,
        pub total_time_value: Option<u32>,
        pub total_time_unit: Option<String>,
        pub notes: Option<String>,
        pub image_url: Option<String>,
        pub is_favorite: Option<bool>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
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
        pub total_time_unit: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub notes: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub image_url: Option<String>,
        pub is_favorite: bool,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CategoryNew {
        pub name: Option<String>,
        pub description: Option<String>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Category {
        pub id: String,
        pub name: String,
        pub description: String,
        pub count: u64,
        pub created_at: DateTime<Utc>,
    }
}

pub mod cooking {
    use super::*;

    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CookingSessionSave {
        pub is_playing: Option<bool>,
        pub is_paused: Option<bool>,
        pub start_time: Option<String>,
        pub pause_time: Option<String>,
        pub total_pause_duration: Option<i64>,
        pub checked_steps: Option<Vec<u32>>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CookingSession {
        pub recipe_id: String,
        pub is_playing: bool,
        pub is_paused: bool,
        pub start_time: Option<String>,
        pub pause_time: Option<String>,
        pub total_pause_duration: i64,
        pub checked_steps: Vec<u32>,
        pub updated_at: DateTime<Utc>,
    }
}

pub mod inbox {
    use super::*;

    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct InboxNew {
        pub title: Option<String>,
        pub message: Option<String>,
        #[serde(rename = "type")]
        pub kind: Option<String>,
        pub link: Option<String>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct InboxNotification {
        pub id: String,
        pub title: String,
        pub message: String,
        #[serde(rename = "type")]
        pub kind: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub link: Option<String>,
        pub is_read: bool,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct UnreadCount {
        pub count: u64,
    }
}

/// Read-only projections derived from budget items, todos and recipes.
pub mod derived {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct NotificationRecord {
        pub id: String,
        pub title: String,
        pub due_date: NaiveDate,
        pub priority: String,
        pub repeat_type: String,
        pub source_type: String,
        pub source_id: String,
        pub category: String,
        pub month_key: Option<String>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct EventRecord {
        pub id: String,
        pub title: String,
        pub date: NaiveDate,
        pub description: String,
        pub priority: String,
        pub repeat_type: String,
        pub source_type: String,
        pub source_id: String,
        pub category: String,
        pub month_key: Option<String>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }
}

pub mod service {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Health {
        pub status: String,
        pub message: String,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct ServiceInfo {
        pub name: String,
        pub version: String,
        pub endpoints: Vec<String>,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use budget::{DueDate, TemplateNew};

    #[test]
    fn due_date_accepts_numbers_and_strings() {
        let body: TemplateNew = serde_json::from_str(
            r#"{"source":"Rent","category":"Expense","purpose":"Housing","dueDate":5,"amount":10,"monthKey":"2024-06"}"#,
        )
        .unwrap();
        assert_eq!(body.item.due_date, Some(DueDate::Number(5)));
        assert_eq!(body.month_key.as_deref(), Some("2024-06"));

        let body: budget::BudgetItemNew =
            serde_json::from_str(r#"{"dueDate":"12","dynamicDateRule":"previous"}"#).unwrap();
        assert_eq!(body.due_date.map(DueDate::into_text).as_deref(), Some("12"));
        assert_eq!(body.dynamic_date_rule.as_deref(), Some("previous"));
    }

    #[test]
    fn failure_envelope_shape() {
        let value = serde_json::to_value(ApiResponse::failure(
            "Month not found",
            ErrorType::NotFound,
            "No data found for month 2024-06",
        ))
        .unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["errorType"], "NOT_FOUND");
        assert!(value.get("data").is_none());
        assert!(value["timestamp"].is_string());
    }

    #[test]
    fn success_envelope_omits_empty_fields() {
        let value = serde_json::to_value(ApiResponse::data(vec![1, 2])).unwrap();
        assert_eq!(value, serde_json::json!({"success": true, "data": [1, 2]}));
    }
}
