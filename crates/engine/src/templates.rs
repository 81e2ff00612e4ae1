//! Recurring budget templates.
//!
//! A template is the durable definition of a recurring budget item. Creating
//! one fans it out into the following months as [`MonthlyTransaction`]s.
//!
//! [`MonthlyTransaction`]: crate::MonthlyTransaction

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use uuid::Uuid;

use crate::{BudgetItem, EngineError, util::StoredItem};

#[derive(Clone, Debug, PartialEq)]
pub struct Template {
    pub id: String,
    pub item: BudgetItem,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Template {
    pub fn new(item: BudgetItem) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            item,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "budget_templates")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
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
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    pub(crate) fn from_template(template: &Template, user_id: &str) -> Self {
        let item = &template.item;
        Self {
            id: ActiveValue::Set(template.id.clone()),
            user_id: ActiveValue::Set(user_id.to_string()),
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
            created_at: ActiveValue::Set(template.created_at),
            updated_at: ActiveValue::Set(template.updated_at),
        }
    }
}

impl TryFrom<Model> for Template {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
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
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
