//! Internal helpers for model validation and conversion.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation and mapping logic so the engine enforces consistent invariants.

use crate::{BudgetItem, Category, DateType, EngineError, MonthKey, ResultEngine, WeekendRule};

/// Budget item columns as stored by templates, month instances and legacy
/// entries.
pub(crate) struct StoredItem {
    pub source: String,
    pub category: String,
    pub purpose: String,
    pub due_day: i32,
    pub date_type: String,
    pub dynamic_rule: String,
    pub amount: f64,
    pub expected_amount: f64,
    pub target: Option<f64>,
    pub current_amount: Option<f64>,
    pub stepup_date: Option<String>,
    pub stepup_amount: Option<f64>,
}

impl TryFrom<StoredItem> for BudgetItem {
    type Error = EngineError;

    fn try_from(stored: StoredItem) -> Result<Self, Self::Error> {
        Ok(Self {
            source: stored.source,
            category: Category::try_from(stored.category.as_str()).map_err(corrupted)?,
            purpose: stored.purpose,
            due_day: u32::try_from(stored.due_day)
                .map_err(|_| EngineError::InvalidRecord(format!("due day {}", stored.due_day)))?,
            date_type: DateType::try_from(stored.date_type.as_str()).map_err(corrupted)?,
            dynamic_rule: WeekendRule::try_from(stored.dynamic_rule.as_str()).map_err(corrupted)?,
            amount: stored.amount,
            expected_amount: stored.expected_amount,
            target: stored.target,
            current_amount: stored.current_amount,
            stepup_date: stored.stepup_date,
            stepup_amount: stored.stepup_amount,
        })
    }
}

/// A stored value failed validation: report it as a corrupted record rather
/// than a client error.
pub(crate) fn corrupted(err: EngineError) -> EngineError {
    match err {
        EngineError::InvalidRecord(_) | EngineError::Database(_) => err,
        other => EngineError::InvalidRecord(other.to_string()),
    }
}

pub(crate) fn stored_month_key(value: &str) -> ResultEngine<MonthKey> {
    value.parse().map_err(corrupted)
}

/// Trim a required text field, `None` when absent or blank.
pub(crate) fn required_text(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Fail with the list of missing field names, if any.
pub(crate) fn ensure_present(fields: &[(&str, bool)]) -> ResultEngine<()> {
    let missing: Vec<String> = fields
        .iter()
        .filter(|(_, present)| !present)
        .map(|(name, _)| (*name).to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(EngineError::MissingFields(missing))
    }
}
