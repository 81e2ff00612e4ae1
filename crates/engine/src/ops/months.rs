use chrono::Utc;
use sea_orm::{
    ActiveValue, ConnectionTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
    sea_query::OnConflict,
};

use crate::{
    BudgetItem, BudgetItemInput, BudgetItemPatch, EngineError, MonthKey, MonthlyTransaction,
    ResultEngine, Template, budget_months, monthly_transactions, templates,
};

use super::{Engine, with_tx};

impl Engine {
    /// Return the instances of a month, oldest first.
    ///
    /// The first read of a month that was never materialized copies every
    /// current template into it. The bucket marker is inserted with
    /// `ON CONFLICT DO NOTHING` and templates are copied only by the caller
    /// that actually inserted it, so concurrent first reads cannot duplicate
    /// instances.
    pub async fn month_transactions(
        &self,
        user_id: &str,
        month_key: MonthKey,
    ) -> ResultEngine<Vec<MonthlyTransaction>> {
        with_tx!(self, |db_tx| {
            if ensure_bucket(&db_tx, user_id, month_key).await? {
                let models = templates::Entity::find()
                    .filter(templates::Column::UserId.eq(user_id))
                    .order_by_asc(templates::Column::CreatedAt)
                    .all(&db_tx)
                    .await?;
                let copied = models.len();
                for model in models {
                    let template = Template::try_from(model)?;
                    let instance = MonthlyTransaction::from_template(&template, month_key);
                    insert_instance(&db_tx, user_id, &instance).await?;
                }
                tracing::info!(user_id, month_key = %month_key, copied, "month initialized");
            }

            month_instances(&db_tx, user_id, month_key).await
        })
    }

    /// Add a one-off transaction to a month.
    pub async fn create_month_transaction(
        &self,
        user_id: &str,
        month_key: MonthKey,
        input: BudgetItemInput,
    ) -> ResultEngine<MonthlyTransaction> {
        let item = BudgetItem::try_from(input)?;
        let instance = MonthlyTransaction::one_off(item, month_key);

        with_tx!(self, |db_tx| {
            ensure_bucket(&db_tx, user_id, month_key).await?;
            insert_instance(&db_tx, user_id, &instance).await?;
            Ok::<(), EngineError>(())
        })?;

        match instance.derived_record() {
            Ok(record) => self.emit_derived(user_id, &record).await,
            Err(err) => tracing::error!(
                id = %instance.id,
                month_key = %month_key,
                "cannot derive notification and event: {err}"
            ),
        }

        Ok(instance)
    }

    /// Edit one instance inside one month. The instance becomes customized;
    /// sibling months are untouched.
    pub async fn update_month_transaction(
        &self,
        user_id: &str,
        month_key: MonthKey,
        id: &str,
        patch: BudgetItemPatch,
    ) -> ResultEngine<MonthlyTransaction> {
        let instance = with_tx!(self, |db_tx| {
            let model = find_instance(&db_tx, user_id, month_key, id).await?;
            let seq = model.seq;
            let mut instance = MonthlyTransaction::try_from(model)?;
            patch.apply(&mut instance.item)?;
            instance.is_customized = true;
            instance.updated_at = Utc::now();

            let mut active = monthly_transactions::ActiveModel::from_instance(&instance, user_id);
            active.seq = ActiveValue::Unchanged(seq);
            active.update(&db_tx).await?;
            Ok::<_, EngineError>(instance)
        })?;

        match instance.derived_record() {
            Ok(record) => {
                self.resync_derived(user_id, &instance.record_target(), &record)
                    .await
            }
            Err(err) => tracing::error!(
                id = %instance.id,
                month_key = %month_key,
                "cannot derive notification and event: {err}"
            ),
        }

        Ok(instance)
    }

    /// Remove one instance from one month only.
    ///
    /// The notification and event of that month go with it: for a template
    /// copy the ones of `(template, month)`, for a one-off the ones of the
    /// instance itself.
    pub async fn delete_month_transaction(
        &self,
        user_id: &str,
        month_key: MonthKey,
        id: &str,
    ) -> ResultEngine<MonthlyTransaction> {
        let instance = with_tx!(self, |db_tx| {
            let bucket = budget_months::Entity::find_by_id((user_id.to_string(), month_key.to_string()))
                .one(&db_tx)
                .await?;
            if bucket.is_none() {
                return Err(EngineError::not_found("Month", month_key.to_string()));
            }

            let model = find_instance(&db_tx, user_id, month_key, id).await?;
            monthly_transactions::Entity::delete_by_id(model.seq)
                .exec(&db_tx)
                .await?;
            MonthlyTransaction::try_from(model)
        })?;

        self.retract_derived(user_id, &instance.record_target())
            .await;
        tracing::info!(user_id, id, month_key = %month_key, "month transaction deleted");

        Ok(instance)
    }
}

/// Materialize the `(user, month)` bucket. Returns `true` if this call
/// created it.
pub(super) async fn ensure_bucket<C: ConnectionTrait>(
    db: &C,
    user_id: &str,
    month_key: MonthKey,
) -> ResultEngine<bool> {
    let marker = budget_months::ActiveModel {
        user_id: ActiveValue::Set(user_id.to_string()),
        month_key: ActiveValue::Set(month_key.to_string()),
        created_at: ActiveValue::Set(Utc::now()),
    };
    let inserted = budget_months::Entity::insert(marker)
        .on_conflict(
            OnConflict::columns([
                budget_months::Column::UserId,
                budget_months::Column::MonthKey,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    Ok(inserted > 0)
}

/// Append `instance` to its bucket. An instance with the same id already in
/// the bucket is left as is.
pub(super) async fn insert_instance<C: ConnectionTrait>(
    db: &C,
    user_id: &str,
    instance: &MonthlyTransaction,
) -> ResultEngine<bool> {
    let inserted = monthly_transactions::Entity::insert(
        monthly_transactions::ActiveModel::from_instance(instance, user_id),
    )
    .on_conflict(
        OnConflict::columns([
            monthly_transactions::Column::UserId,
            monthly_transactions::Column::MonthKey,
            monthly_transactions::Column::Id,
        ])
        .do_nothing()
        .to_owned(),
    )
    .exec_without_returning(db)
    .await?;
    Ok(inserted > 0)
}

async fn month_instances<C: ConnectionTrait>(
    db: &C,
    user_id: &str,
    month_key: MonthKey,
) -> ResultEngine<Vec<MonthlyTransaction>> {
    monthly_transactions::Entity::find()
        .filter(monthly_transactions::Column::UserId.eq(user_id))
        .filter(monthly_transactions::Column::MonthKey.eq(month_key.to_string()))
        .order_by_asc(monthly_transactions::Column::Seq)
        .all(db)
        .await?
        .into_iter()
        .map(MonthlyTransaction::try_from)
        .collect()
}

async fn find_instance<C: ConnectionTrait>(
    db: &C,
    user_id: &str,
    month_key: MonthKey,
    id: &str,
) -> ResultEngine<monthly_transactions::Model> {
    monthly_transactions::Entity::find()
        .filter(monthly_transactions::Column::UserId.eq(user_id))
        .filter(monthly_transactions::Column::MonthKey.eq(month_key.to_string()))
        .filter(monthly_transactions::Column::Id.eq(id))
        .one(db)
        .await?
        .ok_or_else(|| EngineError::not_found("Transaction", id))
}
