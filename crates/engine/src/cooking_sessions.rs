//! Per-recipe cooking timer state.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};

use crate::{EngineError, ResultEngine};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CookingSession {
    pub recipe_id: String,
    pub is_playing: bool,
    pub is_paused: bool,
    pub start_time: Option<String>,
    pub pause_time: Option<String>,
    /// Milliseconds spent paused so far.
    pub total_pause_duration: i64,
    /// Ids of the directions already done.
    pub checked_steps: Vec<u32>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "cooking_sessions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub recipe_id: String,
    pub is_playing: bool,
    pub is_paused: bool,
    pub start_time: Option<String>,
    pub pause_time: Option<String>,
    pub total_pause_duration: i64,
    pub checked_steps: Json,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    pub(crate) fn from_session(session: &CookingSession, user_id: &str) -> ResultEngine<Self> {
        Ok(Self {
            user_id: ActiveValue::Set(user_id.to_string()),
            recipe_id: ActiveValue::Set(session.recipe_id.clone()),
            is_playing: ActiveValue::Set(session.is_playing),
            is_paused: ActiveValue::Set(session.is_paused),
            start_time: ActiveValue::Set(session.start_time.clone()),
            pause_time: ActiveValue::Set(session.pause_time.clone()),
            total_pause_duration: ActiveValue::Set(session.total_pause_duration),
            checked_steps: ActiveValue::Set(serde_json::to_value(&session.checked_steps)?),
            updated_at: ActiveValue::Set(session.updated_at),
        })
    }
}

impl TryFrom<Model> for CookingSession {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            checked_steps: serde_json::from_value(model.checked_steps)?,
            recipe_id: model.recipe_id,
            is_playing: model.is_playing,
            is_paused: model.is_paused,
            start_time: model.start_time,
            pause_time: model.pause_time,
            total_pause_duration: model.total_pause_duration,
            updated_at: model.updated_at,
        })
    }
}
