//! Budget items shared by templates, monthly instances and legacy entries.

use serde::{Deserialize, Serialize};

use crate::{
    BudgetItemInput, BudgetItemPatch, EngineError, Priority, ResultEngine, util::required_text,
};

/// Direction of a budget item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Income,
    Expense,
    Savings,
}

impl Category {
    pub const ALL: [Category; 3] = [Self::Income, Self::Expense, Self::Savings];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Expense => "Expense",
            Self::Savings => "Savings",
        }
    }
}

impl TryFrom<&str> for Category {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "Income" => Ok(Self::Income),
            "Expense" => Ok(Self::Expense),
            "Savings" => Ok(Self::Savings),
            other => Err(EngineError::InvalidCategory(other.to_string())),
        }
    }
}

/// How the day of month turns into a calendar date.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateType {
    #[default]
    Fixed,
    Dynamic,
}

impl DateType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::Dynamic => "dynamic",
        }
    }
}

impl TryFrom<&str> for DateType {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "fixed" => Ok(Self::Fixed),
            "dynamic" => Ok(Self::Dynamic),
            other => Err(EngineError::InvalidValue(format!(
                "dateType must be one of: fixed, dynamic. Received: {other}"
            ))),
        }
    }
}

/// Where a dynamic date lands when it falls on a weekend.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekendRule {
    /// Following Monday.
    #[default]
    Next,
    /// Preceding Friday.
    Previous,
}

impl WeekendRule {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Next => "next",
            Self::Previous => "previous",
        }
    }
}

impl TryFrom<&str> for WeekendRule {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "next" => Ok(Self::Next),
            "previous" => Ok(Self::Previous),
            other => Err(EngineError::InvalidValue(format!(
                "dynamicDateRule must be one of: next, previous. Received: {other}"
            ))),
        }
    }
}

/// A validated budget item.
///
/// Templates, month instances and legacy entries all carry one. `due_day` is a
/// day of month (1-31); the concrete date depends on the month it is resolved
/// in, see [`crate::resolve_due_date`].
#[derive(Clone, Debug, PartialEq)]
pub struct BudgetItem {
    pub source: String,
    pub category: Category,
    pub purpose: String,
    pub due_day: u32,
    pub date_type: DateType,
    pub dynamic_rule: WeekendRule,
    pub amount: f64,
    pub expected_amount: f64,
    pub target: Option<f64>,
    pub current_amount: Option<f64>,
    pub stepup_date: Option<String>,
    pub stepup_amount: Option<f64>,
}

impl BudgetItem {
    pub fn priority(&self) -> Priority {
        Priority::for_budget(self.category, self.amount)
    }

    /// Title used for calendar events.
    pub fn event_title(&self) -> String {
        format!("{} - {}", self.source, self.purpose)
    }

    /// Description used for calendar events.
    pub fn event_description(&self) -> String {
        format!("Category: {}, Amount: {}", self.category.as_str(), self.amount)
    }
}

fn parse_due_day(raw: &str) -> ResultEngine<u32> {
    raw.trim()
        .parse::<u32>()
        .ok()
        .filter(|day| (1..=31).contains(day))
        .ok_or_else(|| EngineError::InvalidValue("Due date must be between 1 and 31".to_string()))
}

fn check_amount(amount: f64) -> ResultEngine<f64> {
    if amount.is_finite() && amount >= 0.0 {
        Ok(amount)
    } else {
        Err(EngineError::InvalidValue(
            "Amount must be a non-negative number".to_string(),
        ))
    }
}

impl TryFrom<BudgetItemInput> for BudgetItem {
    type Error = EngineError;

    fn try_from(input: BudgetItemInput) -> Result<Self, Self::Error> {
        let source = required_text(input.source);
        let category = required_text(input.category);
        let purpose = required_text(input.purpose);
        let due_date = required_text(input.due_date);

        let missing: Vec<String> = [
            ("source", source.is_none()),
            ("category", category.is_none()),
            ("purpose", purpose.is_none()),
            ("dueDate", due_date.is_none()),
            ("amount", input.amount.is_none()),
        ]
        .into_iter()
        .filter(|(_, absent)| *absent)
        .map(|(name, _)| name.to_string())
        .collect();

        let (Some(source), Some(category), Some(purpose), Some(due_date), Some(amount)) =
            (source, category, purpose, due_date, input.amount)
        else {
            return Err(EngineError::MissingFields(missing));
        };

        Ok(Self {
            source,
            category: Category::try_from(category.as_str())?,
            purpose,
            due_day: parse_due_day(&due_date)?,
            date_type: input
                .date_type
                .as_deref()
                .map(DateType::try_from)
                .transpose()?
                .unwrap_or_default(),
            dynamic_rule: input
                .dynamic_date_rule
                .as_deref()
                .map(WeekendRule::try_from)
                .transpose()?
                .unwrap_or_default(),
            amount: check_amount(amount)?,
            expected_amount: input.expected_amount.unwrap_or(0.0),
            target: input.target,
            current_amount: input.current_amount,
            stepup_date: input.stepup_date,
            stepup_amount: input.stepup_amount,
        })
    }
}

impl BudgetItemPatch {
    /// Apply the provided fields to `item`, validating each one.
    pub fn apply(self, item: &mut BudgetItem) -> ResultEngine<()> {
        let mut missing = Vec::new();
        for (name, value) in [
            ("source", &self.source),
            ("category", &self.category),
            ("purpose", &self.purpose),
            ("dueDate", &self.due_date),
        ] {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                missing.push(name.to_string());
            }
        }
        if !missing.is_empty() {
            return Err(EngineError::MissingFields(missing));
        }

        if let Some(category) = self.category.as_deref() {
            item.category = Category::try_from(category.trim())?;
        }
        if let Some(due_date) = self.due_date.as_deref() {
            item.due_day = parse_due_day(due_date)?;
        }
        if let Some(date_type) = self.date_type.as_deref() {
            item.date_type = DateType::try_from(date_type)?;
        }
        if let Some(rule) = self.dynamic_date_rule.as_deref() {
            item.dynamic_rule = WeekendRule::try_from(rule)?;
        }
        if let Some(amount) = self.amount {
            item.amount = check_amount(amount)?;
        }
        if let Some(source) = self.source {
            item.source = source.trim().to_string();
        }
        if let Some(purpose) = self.purpose {
            item.purpose = purpose.trim().to_string();
        }
        if let Some(expected) = self.expected_amount {
            item.expected_amount = expected;
        }
        if self.target.is_some() {
            item.target = self.target;
        }
        if self.current_amount.is_some() {
            item.current_amount = self.current_amount;
        }
        if self.stepup_date.is_some() {
            item.stepup_date = self.stepup_date;
        }
        if self.stepup_amount.is_some() {
            item.stepup_amount = self.stepup_amount;
        }
        Ok(())
    }
}

/// Totals over a set of budget items.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BudgetSummary {
    pub total_income: f64,
    pub total_expense: f64,
    pub total_savings: f64,
    /// Income minus expenses minus savings.
    pub balance: f64,
}

impl BudgetSummary {
    pub fn from_items<'a>(items: impl IntoIterator<Item = &'a BudgetItem>) -> Self {
        let mut summary = Self::default();
        for item in items {
            match item.category {
                Category::Income => summary.total_income += item.amount,
                Category::Expense => summary.total_expense += item.amount,
                Category::Savings => summary.total_savings += item.amount,
            }
        }
        summary.balance = summary.total_income - summary.total_expense - summary.total_savings;
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rent() -> BudgetItemInput {
        BudgetItemInput::new("Rent", "Expense", "Housing", "5", 1200.0)
    }

    #[test]
    fn validates_a_complete_item_with_defaults() {
        let item = BudgetItem::try_from(rent()).unwrap();
        assert_eq!(item.source, "Rent");
        assert_eq!(item.category, Category::Expense);
        assert_eq!(item.due_day, 5);
        assert_eq!(item.date_type, DateType::Fixed);
        assert_eq!(item.dynamic_rule, WeekendRule::Next);
        assert_eq!(item.expected_amount, 0.0);
    }

    #[test]
    fn reports_every_missing_field() {
        let input = BudgetItemInput {
            source: Some("  ".to_string()),
            category: Some("Income".to_string()),
            ..Default::default()
        };
        assert_eq!(
            BudgetItem::try_from(input),
            Err(EngineError::MissingFields(vec![
                "source".to_string(),
                "purpose".to_string(),
                "dueDate".to_string(),
                "amount".to_string(),
            ]))
        );
    }

    #[test]
    fn category_is_case_sensitive() {
        let input = BudgetItemInput::new("Rent", "expense", "Housing", "5", 10.0);
        assert_eq!(
            BudgetItem::try_from(input),
            Err(EngineError::InvalidCategory("expense".to_string()))
        );
    }

    #[test]
    fn due_day_bounds() {
        for raw in ["0", "32", "abc", "-1"] {
            let input = BudgetItemInput::new("Rent", "Expense", "Housing", raw, 10.0);
            assert!(
                matches!(BudgetItem::try_from(input), Err(EngineError::InvalidValue(_))),
                "{raw}"
            );
        }
        let input = BudgetItemInput::new("Rent", "Expense", "Housing", "31", 10.0);
        assert_eq!(BudgetItem::try_from(input).unwrap().due_day, 31);
    }

    #[test]
    fn negative_amount_is_rejected() {
        let input = BudgetItemInput::new("Rent", "Expense", "Housing", "5", -1.0);
        assert!(matches!(
            BudgetItem::try_from(input),
            Err(EngineError::InvalidValue(_))
        ));
    }

    #[test]
    fn dynamic_fields_are_parsed() {
        let input = rent().date_type("dynamic").dynamic_date_rule("previous");
        let item = BudgetItem::try_from(input).unwrap();
        assert_eq!(item.date_type, DateType::Dynamic);
        assert_eq!(item.dynamic_rule, WeekendRule::Previous);

        let bad = rent().date_type("weekly");
        assert!(BudgetItem::try_from(bad).is_err());
    }

    #[test]
    fn derived_texts() {
        let item = BudgetItem::try_from(rent()).unwrap();
        assert_eq!(item.event_title(), "Rent - Housing");
        assert_eq!(item.event_description(), "Category: Expense, Amount: 1200");
    }

    #[test]
    fn patch_updates_only_given_fields() {
        let mut item = BudgetItem::try_from(rent()).unwrap();
        let patch = BudgetItemPatch {
            amount: Some(1300.0),
            due_date: Some("6".to_string()),
            ..Default::default()
        };
        patch.apply(&mut item).unwrap();
        assert_eq!(item.amount, 1300.0);
        assert_eq!(item.due_day, 6);
        assert_eq!(item.source, "Rent");

        let blank = BudgetItemPatch {
            source: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(
            blank.apply(&mut item),
            Err(EngineError::MissingFields(vec!["source".to_string()]))
        );
    }

    #[test]
    fn summary_balance() {
        let items: Vec<BudgetItem> = [
            ("Salary", "Income", 3000.0),
            ("Rent", "Expense", 1200.0),
            ("Food", "Expense", 300.0),
            ("ETF", "Savings", 500.0),
        ]
        .into_iter()
        .map(|(source, category, amount)| {
            BudgetItem::try_from(BudgetItemInput::new(source, category, "x", "1", amount)).unwrap()
        })
        .collect();

        let summary = BudgetSummary::from_items(&items);
        assert_eq!(summary.total_income, 3000.0);
        assert_eq!(summary.total_expense, 1500.0);
        assert_eq!(summary.total_savings, 500.0);
        assert_eq!(summary.balance, 1000.0);
    }
}
