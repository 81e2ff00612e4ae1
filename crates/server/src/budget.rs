//! Legacy budget API endpoints and the budget item mapping shared with the
//! month based endpoints.

use api_types::{
    ApiResponse,
    budget::{BudgetItemNew, BudgetItemView, BudgetSummary, BudgetTransaction},
};
use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
};
use engine::{BudgetItemInput, BudgetItemPatch};

use crate::{
    ServerError,
    extract::{ApiJson, ApiPath},
    server::{ServerState, UserId},
};

pub(crate) fn map_item(item: engine::BudgetItem) -> BudgetItemView {
    BudgetItemView {
        source: item.source,
        category: item.category.as_str().to_string(),
        purpose: item.purpose,
        due_date: item.due_day.to_string(),
        date_type: item.date_type.as_str().to_string(),
        dynamic_date_rule: item.dynamic_rule.as_str().to_string(),
        amount: item.amount,
        expected_amount: item.expected_amount,
        target: item.target,
        current_amount: item.current_amount,
        stepup_date: item.stepup_date,
        stepup_amount: item.stepup_amount,
    }
}

pub(crate) fn item_input(payload: BudgetItemNew) -> BudgetItemInput {
    BudgetItemInput {
        source: payload.source,
        category: payload.category,
        purpose: payload.purpose,
        due_date: payload.due_date.map(|day| day.into_text()),
        date_type: payload.date_type,
        dynamic_date_rule: payload.dynamic_date_rule,
        amount: payload.amount,
        expected_amount: payload.expected_amount,
        target: payload.target,
        current_amount: payload.current_amount,
        stepup_date: payload.stepup_date,
        stepup_amount: payload.stepup_amount,
    }
}

pub(crate) fn item_patch(payload: BudgetItemNew) -> BudgetItemPatch {
    BudgetItemPatch {
        source: payload.source,
        category: payload.category,
        purpose: payload.purpose,
        due_date: payload.due_date.map(|day| day.into_text()),
        date_type: payload.date_type,
        dynamic_date_rule: payload.dynamic_date_rule,
        amount: payload.amount,
        expected_amount: payload.expected_amount,
        target: payload.target,
        current_amount: payload.current_amount,
        stepup_date: payload.stepup_date,
        stepup_amount: payload.stepup_amount,
    }
}

fn map_transaction(transaction: engine::BudgetTransaction) -> BudgetTransaction {
    BudgetTransaction {
        id: transaction.id,
        item: map_item(transaction.item),
        created_at: transaction.created_at,
        updated_at: transaction.updated_at,
    }
}

pub async fn list(
    Extension(user): Extension<UserId>,
    State(state): State<ServerState>,
) -> Result<Json<ApiResponse<Vec<BudgetTransaction>>>, ServerError> {
    let transactions = state
        .engine
        .budget_transactions(user.as_str())
        .await?
        .into_iter()
        .map(map_transaction)
        .collect();

    Ok(Json(ApiResponse::data(transactions)))
}

pub async fn list_by_category(
    Extension(user): Extension<UserId>,
    State(state): State<ServerState>,
    ApiPath(category): ApiPath<String>,
) -> Result<Json<ApiResponse<Vec<BudgetTransaction>>>, ServerError> {
    let transactions = state
        .engine
        .budget_transactions_by_category(user.as_str(), &category)
        .await?
        .into_iter()
        .map(map_transaction)
        .collect();

    Ok(Json(ApiResponse::data(transactions)))
}

pub async fn get(
    Extension(user): Extension<UserId>,
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<ApiResponse<BudgetTransaction>>, ServerError> {
    let transaction = state.engine.budget_transaction(user.as_str(), &id).await?;
    Ok(Json(ApiResponse::data(map_transaction(transaction))))
}

pub async fn create(
    Extension(user): Extension<UserId>,
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<BudgetItemNew>,
) -> Result<(StatusCode, Json<ApiResponse<BudgetTransaction>>), ServerError> {
    let transaction = state
        .engine
        .create_budget_transaction(user.as_str(), item_input(payload))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::data(map_transaction(transaction))),
    ))
}

pub async fn update(
    Extension(user): Extension<UserId>,
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<String>,
    ApiJson(payload): ApiJson<BudgetItemNew>,
) -> Result<Json<ApiResponse<BudgetTransaction>>, ServerError> {
    let transaction = state
        .engine
        .update_budget_transaction(user.as_str(), &id, item_patch(payload))
        .await?;

    Ok(Json(ApiResponse::data(map_transaction(transaction))))
}

pub async fn delete(
    Extension(user): Extension<UserId>,
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<ApiResponse<()>>, ServerError> {
    state
        .engine
        .delete_budget_transaction(user.as_str(), &id)
        .await?;

    Ok(Json(ApiResponse::message("Transaction deleted successfully")))
}

pub async fn summary(
    Extension(user): Extension<UserId>,
    State(state): State<ServerState>,
) -> Result<Json<ApiResponse<BudgetSummary>>, ServerError> {
    let summary = state.engine.budget_summary(user.as_str()).await?;

    Ok(Json(ApiResponse::data(BudgetSummary {
        total_income: summary.total_income,
        total_expense: summary.total_expense,
        total_savings: summary.total_savings,
        balance: summary.balance,
    })))
}
