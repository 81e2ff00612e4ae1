//! Shared vocabulary of the derived notification and event stores.
//!
//! Notifications and calendar events are projections of budget items, todos
//! and recipes. They are never written directly by clients: the engine emits
//! them when the source is written and removes them when the source goes away.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Category, EngineError, MonthKey};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// Income and large expenses (over 1000) are high, savings are low.
    pub fn for_budget(category: Category, amount: f64) -> Self {
        match category {
            Category::Income => Self::High,
            Category::Expense if amount > 1000.0 => Self::High,
            Category::Savings => Self::Low,
            Category::Expense => Self::Medium,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl TryFrom<&str> for Priority {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            other => Err(EngineError::InvalidValue(format!(
                "priority must be one of: high, medium, low. Received: {other}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepeatType {
    None,
    Monthly,
}

impl RepeatType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Monthly => "monthly",
        }
    }
}

impl TryFrom<&str> for RepeatType {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "none" => Ok(Self::None),
            "monthly" => Ok(Self::Monthly),
            other => Err(EngineError::InvalidRecord(format!(
                "unknown repeat type: {other}"
            ))),
        }
    }
}

/// The kind of record a notification or event was derived from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    Budget,
    Todo,
    Recipe,
}

impl SourceType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Budget => "budget",
            Self::Todo => "todo",
            Self::Recipe => "recipe",
        }
    }
}

impl TryFrom<&str> for SourceType {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "budget" => Ok(Self::Budget),
            "todo" => Ok(Self::Todo),
            "recipe" => Ok(Self::Recipe),
            other => Err(EngineError::InvalidValue(format!(
                "sourceType must be one of: budget, todo, recipe. Received: {other}"
            ))),
        }
    }
}

/// The two stores filled from budget items, todos and recipes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DerivedStore {
    Notifications,
    Events,
}

impl DerivedStore {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Notifications => "notifications",
            Self::Events => "events",
        }
    }

    fn capitalized(self) -> &'static str {
        match self {
            Self::Notifications => "Notifications",
            Self::Events => "Events",
        }
    }

    pub(crate) fn creation_refused(self) -> EngineError {
        EngineError::Forbidden(format!(
            "Direct creation of {} is not allowed. {} are automatically created when you add budget items, todos, or recipes.",
            self.as_str(),
            self.capitalized()
        ))
    }

    pub(crate) fn deletion_refused(self) -> EngineError {
        EngineError::Forbidden(format!(
            "Direct deletion of {} is not allowed. {} are automatically deleted when you remove their source items.",
            self.as_str(),
            self.capitalized()
        ))
    }
}

/// Selects the derived records of one source, optionally restricted to one
/// month.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordTarget {
    pub source_type: SourceType,
    pub source_id: String,
    /// `None` selects every month.
    pub month_key: Option<MonthKey>,
}

impl RecordTarget {
    pub fn all(source_type: SourceType, source_id: impl Into<String>) -> Self {
        Self {
            source_type,
            source_id: source_id.into(),
            month_key: None,
        }
    }
}

/// Everything needed to emit one notification and one event for a source.
#[derive(Clone, Debug, PartialEq)]
pub struct DerivedRecord {
    pub source_type: SourceType,
    pub source_id: String,
    pub month_key: Option<MonthKey>,
    pub date: NaiveDate,
    pub priority: Priority,
    pub repeat_type: RepeatType,
    /// Notification title.
    pub title: String,
    pub event_title: String,
    pub event_description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_store_refusals_are_forbidden() {
        let EngineError::Forbidden(message) = DerivedStore::Events.creation_refused() else {
            panic!("expected forbidden");
        };
        assert!(message.starts_with("Direct creation of events is not allowed."));
        let EngineError::Forbidden(message) = DerivedStore::Notifications.deletion_refused()
        else {
            panic!("expected forbidden");
        };
        assert!(message.contains("Notifications are automatically deleted"));
    }

    #[test]
    fn budget_priority() {
        assert_eq!(Priority::for_budget(Category::Income, 10.0), Priority::High);
        assert_eq!(Priority::for_budget(Category::Expense, 1000.0), Priority::Medium);
        assert_eq!(Priority::for_budget(Category::Expense, 1000.5), Priority::High);
        assert_eq!(Priority::for_budget(Category::Savings, 5000.0), Priority::Low);
    }

    #[test]
    fn source_type_names() {
        for source in [SourceType::Budget, SourceType::Todo, SourceType::Recipe] {
            assert_eq!(SourceType::try_from(source.as_str()), Ok(source));
        }
        assert!(SourceType::try_from("wallet").is_err());
    }
}
