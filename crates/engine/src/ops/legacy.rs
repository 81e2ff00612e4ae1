use chrono::Utc;
use sea_orm::{QueryFilter, QueryOrder, prelude::*};

use crate::{
    BudgetItem, BudgetItemInput, BudgetItemPatch, BudgetSummary, BudgetTransaction, Category,
    EngineError, ResultEngine, budget_transactions,
};

use super::Engine;

impl Engine {
    /// Legacy budget entries ordered by due day.
    pub async fn budget_transactions(&self, user_id: &str) -> ResultEngine<Vec<BudgetTransaction>> {
        budget_transactions::Entity::find()
            .filter(budget_transactions::Column::UserId.eq(user_id))
            .order_by_asc(budget_transactions::Column::DueDay)
            .all(&self.database)
            .await?
            .into_iter()
            .map(BudgetTransaction::try_from)
            .collect()
    }

    pub async fn budget_transactions_by_category(
        &self,
        user_id: &str,
        category: &str,
    ) -> ResultEngine<Vec<BudgetTransaction>> {
        let category = Category::try_from(category)?;
        budget_transactions::Entity::find()
            .filter(budget_transactions::Column::UserId.eq(user_id))
            .filter(budget_transactions::Column::Category.eq(category.as_str()))
            .order_by_asc(budget_transactions::Column::DueDay)
            .all(&self.database)
            .await?
            .into_iter()
            .map(BudgetTransaction::try_from)
            .collect()
    }

    pub async fn budget_transaction(
        &self,
        user_id: &str,
        id: &str,
    ) -> ResultEngine<BudgetTransaction> {
        self.find_budget_transaction(user_id, id)
            .await
            .and_then(BudgetTransaction::try_from)
    }

    pub async fn create_budget_transaction(
        &self,
        user_id: &str,
        input: BudgetItemInput,
    ) -> ResultEngine<BudgetTransaction> {
        let transaction = BudgetTransaction::new(BudgetItem::try_from(input)?);
        budget_transactions::ActiveModel::from_transaction(&transaction, user_id)
            .insert(&self.database)
            .await?;
        Ok(transaction)
    }

    pub async fn update_budget_transaction(
        &self,
        user_id: &str,
        id: &str,
        patch: BudgetItemPatch,
    ) -> ResultEngine<BudgetTransaction> {
        let mut transaction =
            BudgetTransaction::try_from(self.find_budget_transaction(user_id, id).await?)?;
        patch.apply(&mut transaction.item)?;
        transaction.updated_at = Utc::now();

        budget_transactions::ActiveModel::from_transaction(&transaction, user_id)
            .update(&self.database)
            .await?;
        Ok(transaction)
    }

    pub async fn delete_budget_transaction(&self, user_id: &str, id: &str) -> ResultEngine<()> {
        let deleted = budget_transactions::Entity::delete_many()
            .filter(budget_transactions::Column::Id.eq(id))
            .filter(budget_transactions::Column::UserId.eq(user_id))
            .exec(&self.database)
            .await?
            .rows_affected;
        if deleted == 0 {
            return Err(EngineError::not_found("Budget transaction", id));
        }
        Ok(())
    }

    /// Totals of the legacy entries by category.
    pub async fn budget_summary(&self, user_id: &str) -> ResultEngine<BudgetSummary> {
        let transactions = self.budget_transactions(user_id).await?;
        Ok(BudgetSummary::from_items(
            transactions.iter().map(|transaction| &transaction.item),
        ))
    }

    async fn find_budget_transaction(
        &self,
        user_id: &str,
        id: &str,
    ) -> ResultEngine<budget_transactions::Model> {
        budget_transactions::Entity::find_by_id(id)
            .filter(budget_transactions::Column::UserId.eq(user_id))
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::not_found("Budget transaction", id))
    }
}
