//! Budget items materialized inside a month bucket.
//!
//! Each row is one instance in one `(user, month)` bucket. Instances copied
//! from a template keep a reference to it and get the id
//! `<template id>-<month key>`; one-off entries have no template and an id
//! prefixed with `custom-`.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use uuid::Uuid;

use crate::{
    BudgetItem, EngineError, MonthKey, Priority, RecordTarget, RepeatType, ResultEngine,
    SourceType, Template,
    records::DerivedRecord,
    util::{StoredItem, stored_month_key},
};

#[derive(Clone, Debug, PartialEq)]
pub struct MonthlyTransaction {
    pub id: String,
    pub month_key: MonthKey,
    /// `None` for one-off entries.
    pub template_id: Option<String>,
    pub item: BudgetItem,
    pub is_customized: bool,
    pub updated_at: DateTime<Utc>,
}

impl MonthlyTransaction {
    /// A fresh, non-customized copy of `template` for `month_key`.
    pub fn from_template(template: &Template, month_key: MonthKey) -> Self {
        Self {
            id: format!("{}-{month_key}", template.id),
            month_key,
            template_id: Some(template.id.clone()),
            item: template.item.clone(),
            is_customized: false,
            updated_at: Utc::now(),
        }
    }

    pub fn one_off(item: BudgetItem, month_key: MonthKey) -> Self {
        Self {
            id: format!("custom-{}", Uuid::new_v4()),
            month_key,
            template_id: None,
            item,
            is_customized: true,
            updated_at: Utc::now(),
        }
    }

    /// The calendar date this instance is due in its month.
    pub fn due_date(&self) -> ResultEngine<NaiveDate> {
        self.month_key
            .resolve_due_date(self.item.due_day, self.item.date_type, self.item.dynamic_rule)
    }

    /// The derived records of this instance are keyed by the template for
    /// template copies and by the instance itself for one-off entries.
    pub(crate) fn record_target(&self) -> RecordTarget {
        match &self.template_id {
            Some(template_id) => RecordTarget {
                source_type: SourceType::Budget,
                source_id: template_id.clone(),
                month_key: Some(self.month_key),
            },
            None => RecordTarget {
                source_type: SourceType::Budget,
                source_id: self.id.clone(),
                month_key: None,
            },
        }
    }

    pub(crate) fn derived_record(&self) -> ResultEngine<DerivedRecord> {
        let target = self.record_target();
        Ok(DerivedRecord {
            source_type: target.source_type,
            source_id: target.source_id,
            month_key: Some(self.month_key),
            date: self.due_date()?,
            priority: Priority::for_budget(self.item.category, self.item.amount),
            repeat_type: if self.template_id.is_some() {
                RepeatType::Monthly
            } else {
                RepeatType::None
            },
            title: self.item.source.clone(),
            event_title: self.item.event_title(),
            event_description: self.item.event_description(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "monthly_transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub seq: i64,
    pub id: String,
    pub user_id: String,
    pub month_key: String,
    pub template_id: Option<String>,
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
    pub is_customized: bool,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    pub(crate) fn from_instance(instance: &MonthlyTransaction, user_id: &str) -> Self {
        let item = &instance.item;
        Self {
            seq: ActiveValue::NotSet,
            id: ActiveValue::Set(instance.id.clone()),
            user_id: ActiveValue::Set(user_id.to_string()),
            month_key: ActiveValue::Set(instance.month_key.to_string()),
            template_id: ActiveValue::Set(instance.template_id.clone()),
            source: ActiveValue::Set(item.source.clone()),
            category: ActiveValue::Set(item.category.as_str().to_string()),
            purpose: ActiveValue::Set(item.purpose.clone()),
            due_day: ActiveValue::Set(item.due_day as i32),
            date_type: ActiveValue::Set(item.date_type.as_str().to_string()),
            dynamic_rule: ActiveValue::Set(item.dynamic_rule.as_str().to_string()),
            amount: ActiveValue::Set(item.amount),
            expected_amount: ActiveValue::Set(item.expected_amount),
            target: ActiveValue::Set(item.target),
            current_amount: ActiveValue::Set(item.current_amount),
            stepup_date: ActiveValue::Set(item.stepup_date.clone()),
            stepup_amount: ActiveValue::Set(item.stepup_amount),
            is_customized: ActiveValue::Set(instance.is_customized),
            updated_at: ActiveValue::Set(instance.updated_at),
        }
    }
}

impl TryFrom<Model> for MonthlyTransaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            month_key: stored_month_key(&model.month_key)?,
            item: BudgetItem::try_from(StoredItem {
                source: model.source,
                category: model.category,
                purpose: model.purpose,
                due_day: model.due_day,
                date_type: model.date_type,
                dynamic_rule: model.dynamic_rule,
                amount: model.amount,
                expected_amount: model.expected_amount,
                target: model.target,
                current_amount: model.current_amount,
                stepup_date: model.stepup_date,
                stepup_amount: model.stepup_amount,
            })?,
            id: model.id,
            template_id: model.template_id,
            is_customized: model.is_customized,
            updated_at: model.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BudgetItemInput, DateType};

    fn template(category: &str, amount: f64) -> Template {
        let input = BudgetItemInput::new("Rent", category, "Housing", "1", amount)
            .date_type("dynamic");
        Template::new(BudgetItem::try_from(input).unwrap())
    }

    #[test]
    fn template_copy_id_and_flags() {
        let template = template("Expense", 1200.0);
        let key: MonthKey = "2024-06".parse().unwrap();
        let instance = MonthlyTransaction::from_template(&template, key);

        assert_eq!(instance.id, format!("{}-2024-06", template.id));
        assert_eq!(instance.template_id.as_deref(), Some(template.id.as_str()));
        assert!(!instance.is_customized);
        assert_eq!(instance.item.date_type, DateType::Dynamic);
        // 2024-06-01 is a Saturday.
        assert_eq!(
            instance.due_date().unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
        );
    }

    #[test]
    fn template_copy_records_are_monthly_and_keyed_by_template() {
        let template = template("Expense", 1200.0);
        let key: MonthKey = "2024-06".parse().unwrap();
        let record = MonthlyTransaction::from_template(&template, key)
            .derived_record()
            .unwrap();

        assert_eq!(record.source_id, template.id);
        assert_eq!(record.month_key, Some(key));
        assert_eq!(record.repeat_type, RepeatType::Monthly);
        assert_eq!(record.priority, Priority::High);
        assert_eq!(record.title, "Rent");
        assert_eq!(record.event_title, "Rent - Housing");
    }

    #[test]
    fn one_off_records_are_keyed_by_instance() {
        let item = template("Savings", 50.0).item;
        let key: MonthKey = "2024-06".parse().unwrap();
        let instance = MonthlyTransaction::one_off(item, key);
        let record = instance.derived_record().unwrap();

        assert!(instance.id.starts_with("custom-"));
        assert!(instance.is_customized);
        assert_eq!(record.source_id, instance.id);
        assert_eq!(record.repeat_type, RepeatType::None);
        assert_eq!(record.priority, Priority::Low);
        assert_eq!(instance.record_target().month_key, None);
    }
}
