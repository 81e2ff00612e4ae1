use chrono::Utc;
use sea_orm::{QueryFilter, prelude::*, sea_query::OnConflict};

use crate::{CookingSession, CookingSessionCmd, ResultEngine, cooking_sessions};

use super::Engine;

impl Engine {
    /// The saved session of a recipe, if any.
    pub async fn cooking_session(
        &self,
        user_id: &str,
        recipe_id: &str,
    ) -> ResultEngine<Option<CookingSession>> {
        cooking_sessions::Entity::find_by_id((user_id.to_string(), recipe_id.to_string()))
            .one(&self.database)
            .await?
            .map(CookingSession::try_from)
            .transpose()
    }

    /// Save the session of a recipe, replacing the previous one.
    pub async fn save_cooking_session(
        &self,
        user_id: &str,
        recipe_id: &str,
        cmd: CookingSessionCmd,
    ) -> ResultEngine<CookingSession> {
        let session = CookingSession {
            recipe_id: recipe_id.to_string(),
            is_playing: cmd.is_playing.unwrap_or(false),
            is_paused: cmd.is_paused.unwrap_or(false),
            start_time: cmd.start_time,
            pause_time: cmd.pause_time,
            total_pause_duration: cmd.total_pause_duration.unwrap_or(0),
            checked_steps: cmd.checked_steps.unwrap_or_default(),
            updated_at: Utc::now(),
        };

        cooking_sessions::Entity::insert(cooking_sessions::ActiveModel::from_session(
            &session, user_id,
        )?)
        .on_conflict(
            OnConflict::columns([
                cooking_sessions::Column::UserId,
                cooking_sessions::Column::RecipeId,
            ])
            .update_columns([
                cooking_sessions::Column::IsPlaying,
                cooking_sessions::Column::IsPaused,
                cooking_sessions::Column::StartTime,
                cooking_sessions::Column::PauseTime,
                cooking_sessions::Column::TotalPauseDuration,
                cooking_sessions::Column::CheckedSteps,
                cooking_sessions::Column::UpdatedAt,
            ])
            .to_owned(),
        )
        .exec_without_returning(&self.database)
        .await?;

        Ok(session)
    }

    /// Forget the session of a recipe. Deleting a missing session succeeds.
    pub async fn delete_cooking_session(&self, user_id: &str, recipe_id: &str) -> ResultEngine<()> {
        cooking_sessions::Entity::delete_many()
            .filter(cooking_sessions::Column::UserId.eq(user_id))
            .filter(cooking_sessions::Column::RecipeId.eq(recipe_id))
            .exec(&self.database)
            .await?;
        Ok(())
    }
}
