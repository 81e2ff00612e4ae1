//! Flat budget entries of the legacy `/api/budget` collection.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use uuid::Uuid;

use crate::{BudgetItem, DateType, EngineError, WeekendRule, util::StoredItem};

/// A legacy budget entry. Its `date_type` is always fixed.
#[derive(Clone, Debug, PartialEq)]
pub struct BudgetTransaction {
    pub id: String,
    pub item: BudgetItem,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BudgetTransaction {
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
#[sea_orm(table_name = "budget_transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub source: String,
    pub category: String,
    pub purpose: String,
    pub due_day: i32,
    pub amount: f64,
    pub expected_amount: Option<f64>,
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
    pub(crate) fn from_transaction(transaction: &BudgetTransaction, user_id: &str) -> Self {
        let item = &transaction.item;
        Self {
            id: ActiveValue::Set(transaction.id.clone()),
            user_id: ActiveValue::Set(user_id.to_string()),
            source: ActiveValue::Set(item.source.clone()),
            category: ActiveValue::Set(item.category.as_str().to_string()),
            purpose: ActiveValue::Set(item.purpose.clone()),
            due_day: ActiveValue::Set(item.due_day as i32),
            amount: ActiveValue::Set(item.amount),
            expected_amount: ActiveValue::Set(Some(item.expected_amount)),
            target: ActiveValue::Set(item.target),
            current_amount: ActiveValue::Set(item.current_amount),
            stepup_date: ActiveValue::Set(item.stepup_date.clone()),
            stepup_amount: ActiveValue::Set(item.stepup_amount),
            created_at: ActiveValue::Set(transaction.created_at),
            updated_at: ActiveValue::Set(transaction.updated_at),
        }
    }
}

impl TryFrom<Model> for BudgetTransaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            item: BudgetItem::try_from(StoredItem {
                source: model.source,
                category: model.category,
                purpose: model.purpose,
                due_day: model.due_day,
                date_type: DateType::Fixed.as_str().to_string(),
                dynamic_rule: WeekendRule::Next.as_str().to_string(),
                amount: model.amount,
                expected_amount: model.expected_amount.unwrap_or(0.0),
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
