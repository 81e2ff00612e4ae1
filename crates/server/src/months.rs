//! Month based budget API endpoints: monthly instances and recurring
//! templates.

use api_types::{
    ApiResponse,
    budget::{BudgetItemNew, MonthlyTransaction, Template, TemplateNew},
};
use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
};
use engine::{MonthKey, TemplateRemoval};

use crate::{
    ServerError,
    budget::{item_input, item_patch, map_item},
    extract::{ApiJson, ApiPath},
    server::{ServerState, UserId},
};

fn map_instance(instance: engine::MonthlyTransaction) -> MonthlyTransaction {
    let actual_due_date = match instance.due_date() {
        Ok(date) => Some(date),
        Err(err) => {
            tracing::warn!(id = %instance.id, "cannot resolve due date: {err}");
            None
        }
    };

    MonthlyTransaction {
        id: instance.id,
        month_key: instance.month_key.to_string(),
        template_id: instance.template_id,
        is_customized: instance.is_customized,
        actual_due_date,
        item: map_item(instance.item),
        updated_at: instance.updated_at,
    }
}

fn map_template(template: engine::Template) -> Template {
    Template {
        id: template.id,
        item: map_item(template.item),
        created_at: template.created_at,
        updated_at: template.updated_at,
    }
}

fn removal_message(removal: TemplateRemoval) -> String {
    if removal.template_existed {
        format!(
            "Template and {} future instances deleted successfully",
            removal.instances_removed
        )
    } else {
        format!(
            "{} orphaned transaction instances removed successfully (template was already deleted)",
            removal.instances_removed
        )
    }
}

pub async fn list(
    Extension(user): Extension<UserId>,
    State(state): State<ServerState>,
    ApiPath(month_key): ApiPath<String>,
) -> Result<Json<ApiResponse<Vec<MonthlyTransaction>>>, ServerError> {
    let month_key: MonthKey = month_key.parse()?;
    let instances = state
        .engine
        .month_transactions(user.as_str(), month_key)
        .await?
        .into_iter()
        .map(map_instance)
        .collect();

    Ok(Json(ApiResponse::data(instances)))
}

pub async fn create(
    Extension(user): Extension<UserId>,
    State(state): State<ServerState>,
    ApiPath(month_key): ApiPath<String>,
    ApiJson(payload): ApiJson<BudgetItemNew>,
) -> Result<(StatusCode, Json<ApiResponse<MonthlyTransaction>>), ServerError> {
    let month_key: MonthKey = month_key.parse()?;
    let instance = state
        .engine
        .create_month_transaction(user.as_str(), month_key, item_input(payload))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::data(map_instance(instance))),
    ))
}

pub async fn update(
    Extension(user): Extension<UserId>,
    State(state): State<ServerState>,
    ApiPath((month_key, id)): ApiPath<(String, String)>,
    ApiJson(payload): ApiJson<BudgetItemNew>,
) -> Result<Json<ApiResponse<MonthlyTransaction>>, ServerError> {
    let month_key: MonthKey = month_key.parse()?;
    let instance = state
        .engine
        .update_month_transaction(user.as_str(), month_key, &id, item_patch(payload))
        .await?;

    Ok(Json(ApiResponse::data(map_instance(instance))))
}

pub async fn delete(
    Extension(user): Extension<UserId>,
    State(state): State<ServerState>,
    ApiPath((month_key, id)): ApiPath<(String, String)>,
) -> Result<Json<ApiResponse<()>>, ServerError> {
    let month_key: MonthKey = month_key.parse()?;
    state
        .engine
        .delete_month_transaction(user.as_str(), month_key, &id)
        .await?;

    Ok(Json(ApiResponse::message("Transaction deleted successfully")))
}

pub async fn templates(
    Extension(user): Extension<UserId>,
    State(state): State<ServerState>,
) -> Result<Json<ApiResponse<Vec<Template>>>, ServerError> {
    let templates = state
        .engine
        .templates(user.as_str())
        .await?
        .into_iter()
        .map(map_template)
        .collect();

    Ok(Json(ApiResponse::data(templates)))
}

pub async fn template_new(
    Extension(user): Extension<UserId>,
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<TemplateNew>,
) -> Result<(StatusCode, Json<ApiResponse<Template>>), ServerError> {
    let start = payload
        .month_key
        .as_deref()
        .map(str::parse::<MonthKey>)
        .transpose()?;
    let template = state
        .engine
        .create_template(user.as_str(), item_input(payload.item), start)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::data(map_template(template))),
    ))
}

pub async fn template_delete(
    Extension(user): Extension<UserId>,
    State(state): State<ServerState>,
    ApiPath((template_id, month_key)): ApiPath<(String, String)>,
) -> Result<Json<ApiResponse<()>>, ServerError> {
    let from: MonthKey = month_key.parse()?;
    let removal = state
        .engine
        .delete_template_from_month(user.as_str(), &template_id, from)
        .await?;

    Ok(Json(ApiResponse::message(removal_message(removal))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removal_message_depends_on_template_existence() {
        assert_eq!(
            removal_message(TemplateRemoval {
                template_existed: true,
                instances_removed: 10,
            }),
            "Template and 10 future instances deleted successfully"
        );
        assert_eq!(
            removal_message(TemplateRemoval {
                template_existed: false,
                instances_removed: 3,
            }),
            "3 orphaned transaction instances removed successfully (template was already deleted)"
        );
    }
}
