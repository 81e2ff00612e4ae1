//! Todos. A todo with a due date is mirrored as a notification and an event.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, MonthKey, Priority, RepeatType, SourceType, records::DerivedRecord,
    util::corrupted,
};

pub const DEFAULT_STATUS: &str = "pending";

#[derive(Clone, Debug, PartialEq)]
pub struct Todo {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: String,
    pub priority: Priority,
    pub completed: bool,
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    pub fn new(title: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title,
            description: String::new(),
            status: DEFAULT_STATUS.to_string(),
            priority: Priority::Medium,
            completed: false,
            due_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub(crate) fn derived_record(&self) -> Option<DerivedRecord> {
        let date = self.due_date?;
        Some(DerivedRecord {
            source_type: SourceType::Todo,
            source_id: self.id.clone(),
            month_key: Some(MonthKey::from_date(date)),
            date,
            priority: self.priority,
            repeat_type: RepeatType::None,
            title: self.title.clone(),
            event_title: self.title.clone(),
            event_description: self.description.clone(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "todos")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub status: String,
    pub priority: String,
    pub completed: bool,
    pub due_date: Option<Date>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    pub(crate) fn from_todo(todo: &Todo, user_id: &str) -> Self {
        Self {
            id: ActiveValue::Set(todo.id.clone()),
            user_id: ActiveValue::Set(user_id.to_string()),
            title: ActiveValue::Set(todo.title.clone()),
            description: ActiveValue::Set(todo.description.clone()),
            status: ActiveValue::Set(todo.status.clone()),
            priority: ActiveValue::Set(todo.priority.as_str().to_string()),
            completed: ActiveValue::Set(todo.completed),
            due_date: ActiveValue::Set(todo.due_date),
            created_at: ActiveValue::Set(todo.created_at),
            updated_at: ActiveValue::Set(todo.updated_at),
        }
    }
}

impl TryFrom<Model> for Todo {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            priority: Priority::try_from(model.priority.as_str()).map_err(corrupted)?,
            id: model.id,
            title: model.title,
            description: model.description,
            status: model.status,
            completed: model.completed,
            due_date: model.due_date,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
