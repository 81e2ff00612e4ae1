use std::collections::{BTreeMap, HashSet};

use sea_orm::{QueryFilter, QuerySelect, TransactionTrait, prelude::*};

use crate::{
    EngineError, MonthKey, RecordTarget, ResultEngine, SourceType, monthly_transactions,
    templates, util::stored_month_key,
};

use super::{Engine, derived::delete_derived, with_tx};

/// Result of [`Engine::cleanup_orphaned_instances`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrphanCleanup {
    /// Removed instances per month.
    pub removed: BTreeMap<MonthKey, u64>,
}

impl OrphanCleanup {
    pub fn total(&self) -> u64 {
        self.removed.values().sum()
    }
}

impl Engine {
    /// Remove every month instance pointing at a template that no longer
    /// exists, together with its notification and event.
    pub async fn cleanup_orphaned_instances(&self, user_id: &str) -> ResultEngine<OrphanCleanup> {
        with_tx!(self, |db_tx| {
            let template_ids: HashSet<String> = templates::Entity::find()
                .select_only()
                .column(templates::Column::Id)
                .filter(templates::Column::UserId.eq(user_id))
                .into_tuple::<String>()
                .all(&db_tx)
                .await?
                .into_iter()
                .collect();

            let orphans: Vec<monthly_transactions::Model> = monthly_transactions::Entity::find()
                .filter(monthly_transactions::Column::UserId.eq(user_id))
                .filter(monthly_transactions::Column::TemplateId.is_not_null())
                .all(&db_tx)
                .await?
                .into_iter()
                .filter(|model| {
                    model
                        .template_id
                        .as_ref()
                        .is_some_and(|id| !template_ids.contains(id))
                })
                .collect();

            let mut cleanup = OrphanCleanup::default();
            for orphan in orphans {
                let month_key = stored_month_key(&orphan.month_key)?;
                monthly_transactions::Entity::delete_by_id(orphan.seq)
                    .exec(&db_tx)
                    .await?;
                if let Some(template_id) = orphan.template_id {
                    delete_derived(
                        &db_tx,
                        user_id,
                        &RecordTarget {
                            source_type: SourceType::Budget,
                            source_id: template_id,
                            month_key: Some(month_key),
                        },
                    )
                    .await?;
                }
                *cleanup.removed.entry(month_key).or_default() += 1;
            }

            for (month_key, count) in &cleanup.removed {
                tracing::info!(user_id, month_key = %month_key, count, "orphaned instances removed");
            }
            Ok::<_, EngineError>(cleanup)
        })
    }
}
