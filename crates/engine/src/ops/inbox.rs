use sea_orm::{PaginatorTrait, QueryFilter, QueryOrder, prelude::*, sea_query::Expr};

use crate::{
    EngineError, InboxCmd, InboxKind, InboxNotification, ResultEngine, inbox,
    util::{ensure_present, normalize_optional_text, required_text},
};

use super::Engine;

impl Engine {
    /// Inbox of the user, newest first.
    pub async fn inbox(&self, user_id: &str) -> ResultEngine<Vec<InboxNotification>> {
        inbox::Entity::find()
            .filter(inbox::Column::UserId.eq(user_id))
            .order_by_desc(inbox::Column::CreatedAt)
            .all(&self.database)
            .await?
            .into_iter()
            .map(InboxNotification::try_from)
            .collect()
    }

    pub async fn inbox_unread_count(&self, user_id: &str) -> ResultEngine<u64> {
        Ok(inbox::Entity::find()
            .filter(inbox::Column::UserId.eq(user_id))
            .filter(inbox::Column::IsRead.eq(false))
            .count(&self.database)
            .await?)
    }

    pub async fn create_inbox_notification(
        &self,
        user_id: &str,
        cmd: InboxCmd,
    ) -> ResultEngine<InboxNotification> {
        let title = required_text(cmd.title);
        let message = required_text(cmd.message);
        ensure_present(&[("title", title.is_some()), ("message", message.is_some())])?;

        let kind = match cmd.kind.as_deref() {
            Some(kind) => InboxKind::try_from(kind)?,
            None => InboxKind::default(),
        };
        let notification = InboxNotification::new(
            title.unwrap_or_default(),
            message.unwrap_or_default(),
            kind,
            normalize_optional_text(cmd.link.as_deref()),
        );
        inbox::ActiveModel::from_notification(&notification, user_id)
            .insert(&self.database)
            .await?;
        Ok(notification)
    }

    pub async fn mark_inbox_read(&self, user_id: &str, id: &str) -> ResultEngine<()> {
        let updated = inbox::Entity::update_many()
            .col_expr(inbox::Column::IsRead, Expr::value(true))
            .filter(inbox::Column::Id.eq(id))
            .filter(inbox::Column::UserId.eq(user_id))
            .exec(&self.database)
            .await?
            .rows_affected;
        if updated == 0 {
            return Err(EngineError::not_found("Notification", id));
        }
        Ok(())
    }

    /// Mark every unread message as read. Returns how many changed.
    pub async fn mark_all_inbox_read(&self, user_id: &str) -> ResultEngine<u64> {
        Ok(inbox::Entity::update_many()
            .col_expr(inbox::Column::IsRead, Expr::value(true))
            .filter(inbox::Column::UserId.eq(user_id))
            .filter(inbox::Column::IsRead.eq(false))
            .exec(&self.database)
            .await?
            .rows_affected)
    }

    pub async fn delete_inbox_notification(&self, user_id: &str, id: &str) -> ResultEngine<()> {
        let deleted = inbox::Entity::delete_many()
            .filter(inbox::Column::Id.eq(id))
            .filter(inbox::Column::UserId.eq(user_id))
            .exec(&self.database)
            .await?
            .rows_affected;
        if deleted == 0 {
            return Err(EngineError::not_found("Notification", id));
        }
        Ok(())
    }

    /// Delete every read message. Returns how many were removed.
    pub async fn delete_read_inbox(&self, user_id: &str) -> ResultEngine<u64> {
        Ok(inbox::Entity::delete_many()
            .filter(inbox::Column::UserId.eq(user_id))
            .filter(inbox::Column::IsRead.eq(true))
            .exec(&self.database)
            .await?
            .rows_affected)
    }
}
