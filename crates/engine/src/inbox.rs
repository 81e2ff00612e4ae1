//! User-facing inbox messages served under `/api/notifications`.
//!
//! Not to be confused with [`crate::Notification`], the derived reminders.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, util::corrupted};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InboxKind {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl InboxKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl TryFrom<&str> for InboxKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, EngineError> {
        match value {
            "info" => Ok(Self::Info),
            "success" => Ok(Self::Success),
            "warning" => Ok(Self::Warning),
            "error" => Ok(InboxKind::Error),
            other => Err(EngineError::InvalidValue(format!(
                "type must be one of: info, success, warning, error. Received: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct InboxNotification {
    pub id: String,
    pub title: String,
    pub message: String,
    pub kind: InboxKind,
    pub link: Option<String>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl InboxNotification {
    pub fn new(title: String, message: String, kind: InboxKind, link: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title,
            message,
            kind,
            link,
            is_read: false,
            created_at: Utc::now(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "inbox_notifications")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub message: String,
    pub kind: String,
    pub link: Option<String>,
    pub is_read: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    pub(crate) fn from_notification(notification: &InboxNotification, user_id: &str) -> Self {
        Self {
            id: ActiveValue::Set(notification.id.clone()),
            user_id: ActiveValue::Set(user_id.to_string()),
            title: ActiveValue::Set(notification.title.clone()),
            message: ActiveValue::Set(notification.message.clone()),
            kind: ActiveValue::Set(notification.kind.as_str().to_string()),
            link: ActiveValue::Set(notification.link.clone()),
            is_read: ActiveValue::Set(notification.is_read),
            created_at: ActiveValue::Set(notification.created_at),
        }
    }
}

impl TryFrom<Model> for InboxNotification {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            kind: InboxKind::try_from(model.kind.as_str()).map_err(corrupted)?,
            id: model.id,
            title: model.title,
            message: model.message,
            link: model.link,
            is_read: model.is_read,
            created_at: model.created_at,
        })
    }
}
