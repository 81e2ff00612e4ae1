//! Notification and event stores.
//!
//! Both stores are read-only from the outside. Records are emitted and
//! retracted by the operations that write their source; a failure there is
//! logged and never fails the source write.

use chrono::{NaiveDate, TimeDelta, Utc};
use sea_orm::{
    ConnectionTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*, sea_query::Expr,
};

use crate::{
    EngineError, Event, MonthKey, Notification, RecordTarget, ResultEngine, SourceType, events,
    monthly_transactions, notifications, recipes,
    records::{DerivedRecord, DerivedStore},
    templates, todos,
};

use super::{Engine, with_tx};

/// Window of [`Engine::upcoming_notifications`], in days after today.
pub const UPCOMING_DAYS: i64 = 7;

impl Engine {
    /// All derived notifications of the user, soonest first.
    pub async fn notifications(&self, user_id: &str) -> ResultEngine<Vec<Notification>> {
        notifications::Entity::find()
            .filter(notifications::Column::UserId.eq(user_id))
            .order_by_asc(notifications::Column::DueDate)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Notification::try_from)
            .collect()
    }

    /// Notifications due between `today` and `today + 7 days`, both included.
    pub async fn upcoming_notifications(
        &self,
        user_id: &str,
        today: NaiveDate,
    ) -> ResultEngine<Vec<Notification>> {
        let until = today
            .checked_add_signed(TimeDelta::days(UPCOMING_DAYS))
            .unwrap_or(NaiveDate::MAX);
        notifications::Entity::find()
            .filter(notifications::Column::UserId.eq(user_id))
            .filter(notifications::Column::DueDate.between(today, until))
            .order_by_asc(notifications::Column::DueDate)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Notification::try_from)
            .collect()
    }

    /// All derived calendar events of the user, in date order.
    pub async fn events(&self, user_id: &str) -> ResultEngine<Vec<Event>> {
        events::Entity::find()
            .filter(events::Column::UserId.eq(user_id))
            .order_by_asc(events::Column::Date)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Event::try_from)
            .collect()
    }

    /// Events whose date falls inside `month`.
    pub async fn events_in_month(&self, user_id: &str, month: MonthKey) -> ResultEngine<Vec<Event>> {
        let first = month.first_day()?;
        let next = month.next().first_day()?;
        events::Entity::find()
            .filter(events::Column::UserId.eq(user_id))
            .filter(events::Column::Date.gte(first))
            .filter(events::Column::Date.lt(next))
            .order_by_asc(events::Column::Date)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Event::try_from)
            .collect()
    }

    /// Notifications and events are written only by their source
    /// operations. Creating one directly is refused, so this never touches
    /// the database and always returns [`EngineError::Forbidden`].
    pub fn create_derived_record(&self, store: DerivedStore) -> ResultEngine<()> {
        Err(store.creation_refused())
    }

    /// Deleting a notification or event directly is refused, whether or not
    /// `id` exists. Like [`Engine::create_derived_record`], it never touches
    /// the database.
    pub fn delete_derived_record(&self, store: DerivedStore, id: &str) -> ResultEngine<()> {
        tracing::warn!(store = store.as_str(), id, "direct deletion refused");
        Err(store.deletion_refused())
    }

    /// Create the notification and the event of `record`, logging failures.
    pub(super) async fn emit_derived(&self, user_id: &str, record: &DerivedRecord) {
        if let Err(err) = self.insert_derived(user_id, record).await {
            tracing::error!(
                source_type = record.source_type.as_str(),
                source_id = %record.source_id,
                month_key = ?record.month_key.map(|key| key.to_string()),
                "failed to create notification and event: {err}"
            );
        }
    }

    async fn insert_derived(&self, user_id: &str, record: &DerivedRecord) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            ensure_source_exists(&db_tx, user_id, record.source_type, &record.source_id).await?;
            notifications::ActiveModel::from_record(record, user_id)
                .insert(&db_tx)
                .await?;
            events::ActiveModel::from_record(record, user_id)
                .insert(&db_tx)
                .await?;
            Ok(())
        })
    }

    /// Rewrite the derived records selected by `target` from `record`.
    /// A store with no matching record gets one. Failures are logged.
    pub(super) async fn resync_derived(
        &self,
        user_id: &str,
        target: &RecordTarget,
        record: &DerivedRecord,
    ) {
        if let Err(err) = self.upsert_derived(user_id, target, record).await {
            tracing::error!(
                source_type = target.source_type.as_str(),
                source_id = %target.source_id,
                month_key = ?target.month_key.map(|key| key.to_string()),
                "failed to update notification and event: {err}"
            );
        }
    }

    async fn upsert_derived(
        &self,
        user_id: &str,
        target: &RecordTarget,
        record: &DerivedRecord,
    ) -> ResultEngine<()> {
        let now = Utc::now();
        with_tx!(self, |db_tx| {
            let mut notifications_update = notifications::Entity::update_many()
                .col_expr(notifications::Column::Title, Expr::value(record.title.clone()))
                .col_expr(notifications::Column::DueDate, Expr::value(record.date))
                .col_expr(
                    notifications::Column::Priority,
                    Expr::value(record.priority.as_str()),
                )
                .col_expr(notifications::Column::UpdatedAt, Expr::value(now))
                .filter(notifications::Column::UserId.eq(user_id))
                .filter(notifications::Column::SourceType.eq(target.source_type.as_str()))
                .filter(notifications::Column::SourceId.eq(target.source_id.as_str()));
            if let Some(month_key) = target.month_key {
                notifications_update = notifications_update
                    .filter(notifications::Column::MonthKey.eq(month_key.to_string()));
            }
            let notifications_updated = notifications_update.exec(&db_tx).await?.rows_affected;

            let mut events_update = events::Entity::update_many()
                .col_expr(events::Column::Title, Expr::value(record.event_title.clone()))
                .col_expr(events::Column::Date, Expr::value(record.date))
                .col_expr(events::Column::Priority, Expr::value(record.priority.as_str()))
                .col_expr(
                    events::Column::Description,
                    Expr::value(record.event_description.clone()),
                )
                .col_expr(events::Column::UpdatedAt, Expr::value(now))
                .filter(events::Column::UserId.eq(user_id))
                .filter(events::Column::SourceType.eq(target.source_type.as_str()))
                .filter(events::Column::SourceId.eq(target.source_id.as_str()));
            if let Some(month_key) = target.month_key {
                events_update =
                    events_update.filter(events::Column::MonthKey.eq(month_key.to_string()));
            }
            let events_updated = events_update.exec(&db_tx).await?.rows_affected;

            if notifications_updated == 0 || events_updated == 0 {
                ensure_source_exists(&db_tx, user_id, record.source_type, &record.source_id)
                    .await?;
            }
            if notifications_updated == 0 {
                notifications::ActiveModel::from_record(record, user_id)
                    .insert(&db_tx)
                    .await?;
            }
            if events_updated == 0 {
                events::ActiveModel::from_record(record, user_id)
                    .insert(&db_tx)
                    .await?;
            }
            Ok(())
        })
    }

    /// Delete the derived records selected by `target`, logging failures.
    pub(super) async fn retract_derived(&self, user_id: &str, target: &RecordTarget) {
        match delete_derived(&self.database, user_id, target).await {
            Ok((notifications, events)) => tracing::debug!(
                source_type = target.source_type.as_str(),
                source_id = %target.source_id,
                notifications,
                events,
                "derived records removed"
            ),
            Err(err) => tracing::error!(
                source_type = target.source_type.as_str(),
                source_id = %target.source_id,
                month_key = ?target.month_key.map(|key| key.to_string()),
                "failed to delete notification and event: {err}"
            ),
        }
    }
}

/// Delete notifications and events selected by `target`. Returns how many of
/// each were removed.
pub(super) async fn delete_derived<C: ConnectionTrait>(
    db: &C,
    user_id: &str,
    target: &RecordTarget,
) -> ResultEngine<(u64, u64)> {
    let mut notifications_delete = notifications::Entity::delete_many()
        .filter(notifications::Column::UserId.eq(user_id))
        .filter(notifications::Column::SourceType.eq(target.source_type.as_str()))
        .filter(notifications::Column::SourceId.eq(target.source_id.as_str()));
    let mut events_delete = events::Entity::delete_many()
        .filter(events::Column::UserId.eq(user_id))
        .filter(events::Column::SourceType.eq(target.source_type.as_str()))
        .filter(events::Column::SourceId.eq(target.source_id.as_str()));
    if let Some(month_key) = target.month_key {
        notifications_delete =
            notifications_delete.filter(notifications::Column::MonthKey.eq(month_key.to_string()));
        events_delete = events_delete.filter(events::Column::MonthKey.eq(month_key.to_string()));
    }

    let notifications = notifications_delete.exec(db).await?.rows_affected;
    let events = events_delete.exec(db).await?.rows_affected;
    Ok((notifications, events))
}

/// Derived records may only point at sources that exist. A budget source is
/// either a template or a one-off month instance.
async fn ensure_source_exists<C: ConnectionTrait>(
    db: &C,
    user_id: &str,
    source_type: SourceType,
    source_id: &str,
) -> ResultEngine<()> {
    let exists = match source_type {
        SourceType::Budget => {
            templates::Entity::find_by_id(source_id)
                .filter(templates::Column::UserId.eq(user_id))
                .one(db)
                .await?
                .is_some()
                || monthly_transactions::Entity::find()
                    .filter(monthly_transactions::Column::UserId.eq(user_id))
                    .filter(monthly_transactions::Column::Id.eq(source_id))
                    .one(db)
                    .await?
                    .is_some()
        }
        SourceType::Todo => todos::Entity::find_by_id(source_id)
            .filter(todos::Column::UserId.eq(user_id))
            .one(db)
            .await?
            .is_some(),
        SourceType::Recipe => recipes::Entity::find_by_id(source_id)
            .filter(recipes::Column::UserId.eq(user_id))
            .one(db)
            .await?
            .is_some(),
    };

    if exists {
        Ok(())
    } else {
        Err(EngineError::not_found(
            "Source",
            format!("{}/{source_id}", source_type.as_str()),
        ))
    }
}
