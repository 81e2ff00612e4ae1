use chrono::Utc;
use sea_orm::{QueryFilter, QueryOrder, prelude::*};

use crate::{
    EngineError, Priority, RecordTarget, ResultEngine, SourceType, Todo, TodoCmd, TodoUpdateCmd,
    todos,
    util::{ensure_present, normalize_optional_text, required_text},
};

use super::Engine;

impl Engine {
    /// Todos of the user, newest first.
    pub async fn todos(&self, user_id: &str) -> ResultEngine<Vec<Todo>> {
        todos::Entity::find()
            .filter(todos::Column::UserId.eq(user_id))
            .order_by_desc(todos::Column::CreatedAt)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Todo::try_from)
            .collect()
    }

    pub async fn todo(&self, user_id: &str, id: &str) -> ResultEngine<Todo> {
        Todo::try_from(self.find_todo(user_id, id).await?)
    }

    /// Create a todo. A due date also emits a notification and an event.
    pub async fn create_todo(&self, user_id: &str, cmd: TodoCmd) -> ResultEngine<Todo> {
        let title = required_text(cmd.title);
        ensure_present(&[("title", title.is_some())])?;
        let mut todo = Todo::new(title.unwrap_or_default());
        if let Some(description) = normalize_optional_text(cmd.description.as_deref()) {
            todo.description = description;
        }
        if let Some(status) = normalize_optional_text(cmd.status.as_deref()) {
            todo.status = status;
        }
        if let Some(priority) = cmd.priority.as_deref() {
            todo.priority = Priority::try_from(priority)?;
        }
        todo.due_date = cmd.due_date;

        todos::ActiveModel::from_todo(&todo, user_id)
            .insert(&self.database)
            .await?;

        if let Some(record) = todo.derived_record() {
            self.emit_derived(user_id, &record).await;
        }
        Ok(todo)
    }

    /// Update a todo. A todo with a due date gets its notification and event
    /// derived again.
    pub async fn update_todo(
        &self,
        user_id: &str,
        id: &str,
        cmd: TodoUpdateCmd,
    ) -> ResultEngine<Todo> {
        let mut todo = Todo::try_from(self.find_todo(user_id, id).await?)?;

        if let Some(title) = cmd.title {
            let title = title.trim().to_string();
            ensure_present(&[("title", !title.is_empty())])?;
            todo.title = title;
        }
        if let Some(description) = cmd.description {
            todo.description = description;
        }
        if let Some(status) = cmd.status {
            todo.status = status;
        }
        if let Some(priority) = cmd.priority.as_deref() {
            todo.priority = Priority::try_from(priority)?;
        }
        if let Some(completed) = cmd.completed {
            todo.completed = completed;
        }
        if cmd.due_date.is_some() {
            todo.due_date = cmd.due_date;
        }
        todo.updated_at = Utc::now();

        todos::ActiveModel::from_todo(&todo, user_id)
            .update(&self.database)
            .await?;

        if let Some(record) = todo.derived_record() {
            self.retract_derived(user_id, &RecordTarget::all(SourceType::Todo, &todo.id))
                .await;
            self.emit_derived(user_id, &record).await;
        }
        Ok(todo)
    }

    /// Delete a todo with its notification and event.
    pub async fn delete_todo(&self, user_id: &str, id: &str) -> ResultEngine<()> {
        let deleted = todos::Entity::delete_many()
            .filter(todos::Column::Id.eq(id))
            .filter(todos::Column::UserId.eq(user_id))
            .exec(&self.database)
            .await?
            .rows_affected;
        if deleted == 0 {
            return Err(EngineError::not_found("Todo", id));
        }

        self.retract_derived(user_id, &RecordTarget::all(SourceType::Todo, id))
            .await;
        Ok(())
    }

    async fn find_todo(&self, user_id: &str, id: &str) -> ResultEngine<todos::Model> {
        todos::Entity::find_by_id(id)
            .filter(todos::Column::UserId.eq(user_id))
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::not_found("Todo", id))
    }
}
