//! Derived reminders, one per source and month.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, MonthKey, Priority, RepeatType, SourceType,
    records::DerivedRecord,
    util::{corrupted, stored_month_key},
};

#[derive(Clone, Debug, PartialEq)]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub due_date: NaiveDate,
    pub priority: Priority,
    pub repeat_type: RepeatType,
    pub source_type: SourceType,
    pub source_id: String,
    pub month_key: Option<MonthKey>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Notification {
    /// The category of a derived record is its source type.
    pub fn category(&self) -> &'static str {
        self.source_type.as_str()
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub due_date: Date,
    pub priority: String,
    pub repeat_type: String,
    pub source_type: String,
    pub source_id: String,
    pub category: String,
    pub month_key: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    pub(crate) fn from_record(record: &DerivedRecord, user_id: &str) -> Self {
        let now = Utc::now();
        Self {
            id: ActiveValue::Set(Uuid::new_v4().to_string()),
            user_id: ActiveValue::Set(user_id.to_string()),
            title: ActiveValue::Set(record.title.clone()),
            due_date: ActiveValue::Set(record.date),
            priority: ActiveValue::Set(record.priority.as_str().to_string()),
            repeat_type: ActiveValue::Set(record.repeat_type.as_str().to_string()),
            source_type: ActiveValue::Set(record.source_type.as_str().to_string()),
            source_id: ActiveValue::Set(record.source_id.clone()),
            category: ActiveValue::Set(record.source_type.as_str().to_string()),
            month_key: ActiveValue::Set(record.month_key.map(|key| key.to_string())),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        }
    }
}

impl TryFrom<Model> for Notification {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            priority: Priority::try_from(model.priority.as_str()).map_err(corrupted)?,
            repeat_type: RepeatType::try_from(model.repeat_type.as_str())?,
            source_type: SourceType::try_from(model.source_type.as_str()).map_err(corrupted)?,
            month_key: model.month_key.as_deref().map(stored_month_key).transpose()?,
            id: model.id,
            title: model.title,
            due_date: model.due_date,
            source_id: model.source_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
