use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    BudgetItem, BudgetItemInput, EngineError, MonthKey, MonthlyTransaction, RecordTarget,
    ResultEngine, SourceType, Template, monthly_transactions, templates,
};

use super::{
    Engine,
    months::{ensure_bucket, insert_instance},
    with_tx,
};

/// Number of month buckets a new template is copied into, starting month
/// included.
pub const FAN_OUT_MONTHS: usize = 13;

/// Outcome of [`Engine::delete_template_from_month`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TemplateRemoval {
    /// `false` when the template was already gone and only orphaned
    /// instances were cleaned up.
    pub template_existed: bool,
    pub instances_removed: u64,
}

impl Engine {
    /// All templates of the user, oldest first.
    pub async fn templates(&self, user_id: &str) -> ResultEngine<Vec<Template>> {
        templates::Entity::find()
            .filter(templates::Column::UserId.eq(user_id))
            .order_by_asc(templates::Column::CreatedAt)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Template::try_from)
            .collect()
    }

    /// Create a recurring template and fan it out.
    ///
    /// The template and its copies in the [`FAN_OUT_MONTHS`] months starting at
    /// `start` (the current month when `None`) are written in one DB
    /// transaction. Then every month gets its own notification and event; a
    /// failure for one month is logged and does not affect the others.
    pub async fn create_template(
        &self,
        user_id: &str,
        input: BudgetItemInput,
        start: Option<MonthKey>,
    ) -> ResultEngine<Template> {
        let item = BudgetItem::try_from(input)?;
        let template = Template::new(item);
        let start = start.unwrap_or_else(MonthKey::current);
        let instances: Vec<MonthlyTransaction> = start
            .span(FAN_OUT_MONTHS)
            .map(|month_key| MonthlyTransaction::from_template(&template, month_key))
            .collect();

        with_tx!(self, |db_tx| {
            templates::ActiveModel::from_template(&template, user_id)
                .insert(&db_tx)
                .await?;
            for instance in &instances {
                ensure_bucket(&db_tx, user_id, instance.month_key).await?;
                insert_instance(&db_tx, user_id, instance).await?;
            }
            Ok::<(), EngineError>(())
        })?;

        for instance in &instances {
            match instance.derived_record() {
                Ok(record) => self.emit_derived(user_id, &record).await,
                Err(err) => tracing::error!(
                    template_id = %template.id,
                    month_key = %instance.month_key,
                    "cannot derive notification and event: {err}"
                ),
            }
        }

        tracing::info!(
            user_id,
            template_id = %template.id,
            start = %start,
            months = FAN_OUT_MONTHS,
            "template created"
        );
        Ok(template)
    }

    /// Delete a template and its instances from `from` onward.
    ///
    /// Instances in months before `from` are kept. A missing template is not
    /// an error: its leftover instances are still removed. Every notification
    /// and event of the template goes, in all months.
    pub async fn delete_template_from_month(
        &self,
        user_id: &str,
        template_id: &str,
        from: MonthKey,
    ) -> ResultEngine<TemplateRemoval> {
        let removal = with_tx!(self, |db_tx| {
            let deleted = templates::Entity::delete_many()
                .filter(templates::Column::Id.eq(template_id))
                .filter(templates::Column::UserId.eq(user_id))
                .exec(&db_tx)
                .await?
                .rows_affected;
            let removed = monthly_transactions::Entity::delete_many()
                .filter(monthly_transactions::Column::UserId.eq(user_id))
                .filter(monthly_transactions::Column::TemplateId.eq(template_id))
                .filter(monthly_transactions::Column::MonthKey.gte(from.to_string()))
                .exec(&db_tx)
                .await?
                .rows_affected;
            Ok::<_, EngineError>(TemplateRemoval {
                template_existed: deleted > 0,
                instances_removed: removed,
            })
        })?;

        if !removal.template_existed {
            tracing::warn!(
                user_id,
                template_id,
                "template already deleted, removed orphaned instances only"
            );
        }

        self.retract_derived(user_id, &RecordTarget::all(SourceType::Budget, template_id))
            .await;
        tracing::info!(
            user_id,
            template_id,
            from = %from,
            removed = removal.instances_removed,
            "template deleted from month"
        );

        Ok(removal)
    }
}
