use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use migration::{Migrator, MigratorTrait};
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

use engine::Engine;
use server::{ServeOptions, ServerState};

async fn app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db.clone()).build().await.unwrap();
    let state = ServerState {
        engine: Arc::new(engine),
        db,
    };
    server::router(state, &ServeOptions { cors: false })
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    send_as(app, method, uri, body, None).await
}

async fn send_as(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    user: Option<&str>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        request = request.header("x-user-id", user);
    }
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn rent() -> Value {
    json!({
        "source": "Landlord",
        "category": "Expense",
        "purpose": "Rent",
        "dueDate": 5,
        "amount": 1200,
        "dateType": "dynamic",
        "dynamicDateRule": "next",
        "monthKey": "2024-06"
    })
}

#[tokio::test]
async fn health_and_index() {
    let app = app().await;

    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok", "message": "Server is running"}));

    let (status, body) = send(&app, "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(
        body["endpoints"]
            .as_array()
            .unwrap()
            .contains(&json!("/api/budget"))
    );
}

#[tokio::test]
async fn derived_stores_reject_writes() {
    let app = app().await;

    for (method, uri) in [
        ("POST", "/api/notification-data"),
        ("DELETE", "/api/notification-data/abc"),
        ("POST", "/api/event-data"),
        ("DELETE", "/api/event-data/abc"),
    ] {
        let (status, body) = send(&app, method, uri, None).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{method} {uri}");
        assert_eq!(body["success"], false);
        assert_eq!(body["errorType"], "FORBIDDEN");
    }

    let (_, body) = send(&app, "POST", "/api/event-data", None).await;
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .starts_with("Direct creation of events is not allowed.")
    );
}

#[tokio::test]
async fn template_fan_out_over_http() {
    let app = app().await;

    let (status, body) = send(&app, "POST", "/api/budget/template", Some(rent())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    let template_id = body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["dueDate"], "5");

    let (status, body) = send(&app, "GET", "/api/budget/month/2024-06", None).await;
    assert_eq!(status, StatusCode::OK);
    let instances = body["data"].as_array().unwrap();
    assert_eq!(instances.len(), 1);
    assert_eq!(instances[0]["templateId"], template_id.as_str());
    assert_eq!(instances[0]["actualDueDate"], "2024-06-05");
    assert_eq!(instances[0]["isCustomized"], false);

    let (_, body) = send(&app, "GET", "/api/budget/month/2025-06", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (_, body) = send(&app, "GET", "/api/event-data/month/2024/6", None).await;
    let events = body["data"].as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["title"], "Landlord - Rent");
    assert_eq!(events[0]["monthKey"], "2024-06");

    let (status, body) = send(
        &app,
        "DELETE",
        &format!("/api/budget/template/{template_id}/from/2024-09"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["message"],
        "Template and 10 future instances deleted successfully"
    );

    let (_, body) = send(&app, "GET", "/api/budget/month/2024-08", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    let (_, body) = send(&app, "GET", "/api/budget/month/2024-09", None).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn month_transaction_errors() {
    let app = app().await;

    let (status, body) = send(
        &app,
        "DELETE",
        "/api/budget/month/2030-01/transaction/nope",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Month not found");
    assert_eq!(body["errorType"], "NOT_FOUND");
    assert!(body["timestamp"].is_string());

    let (status, _) = send(&app, "GET", "/api/budget/month/2030-01", None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send(
        &app,
        "DELETE",
        "/api/budget/month/2030-01/transaction/nope",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Transaction not found");

    let (status, body) = send(&app, "GET", "/api/budget/month/2024-13", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errorType"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn validation_errors_use_the_envelope() {
    let app = app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/budget/month/2024-06/transaction",
        Some(json!({"source": "Shop", "category": "Expense"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required fields");
    assert_eq!(body["details"], "Required fields: purpose, dueDate, amount");

    let (status, body) = send(
        &app,
        "POST",
        "/api/budget",
        Some(json!({
            "source": "Shop",
            "category": "Food",
            "purpose": "Groceries",
            "dueDate": "3",
            "amount": 50
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid category");
    assert_eq!(
        body["details"],
        "Category must be one of: Income, Expense, Savings. Received: Food"
    );
}

#[tokio::test]
async fn unreadable_requests_use_the_envelope() {
    let app = app().await;

    let mut template = rent();
    template["amount"] = json!("1000");
    let (status, body) = send(&app, "POST", "/api/budget/template", Some(template)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Invalid request body");
    assert_eq!(body["errorType"], "VALIDATION_ERROR");
    assert!(body["timestamp"].is_string());

    let (_, body) = send(&app, "GET", "/api/budget/templates", None).await;
    assert!(body["data"].as_array().unwrap().is_empty());

    let (status, body) = send(&app, "GET", "/api/event-data/month/2024/june", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errorType"], "VALIDATION_ERROR");
    assert_eq!(body["error"], "Invalid month key");

    let (status, body) = send(
        &app,
        "GET",
        "/api/notification-data/upcoming?today=tomorrow",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid query parameter");
}

#[tokio::test]
async fn one_off_month_transaction_lifecycle() {
    let app = app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/budget/month/2024-06/transaction",
        Some(json!({
            "source": "Employer",
            "category": "Income",
            "purpose": "Bonus",
            "dueDate": "15",
            "amount": 500
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_str().unwrap().to_string();
    assert!(id.starts_with("custom-"));
    assert_eq!(body["data"]["templateId"], Value::Null);

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/budget/month/2024-06/transaction/{id}"),
        Some(json!({"amount": 750})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["amount"], 750.0);
    assert_eq!(body["data"]["isCustomized"], true);

    let (status, body) = send(
        &app,
        "DELETE",
        &format!("/api/budget/month/2024-06/transaction/{id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Transaction deleted successfully");

    let (_, body) = send(&app, "GET", "/api/notification-data", None).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn user_header_scopes_data() {
    let app = app().await;

    let (status, _) = send_as(
        &app,
        "POST",
        "/api/todos",
        Some(json!({"title": "Call bank"})),
        Some("alice"),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = send_as(&app, "GET", "/api/todos", None, Some("alice")).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    let (_, body) = send(&app, "GET", "/api/todos", None).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn inbox_routes() {
    let app = app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/notifications",
        Some(json!({"title": "Hi", "message": "Welcome", "type": "success"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["type"], "success");

    let (_, body) = send(&app, "GET", "/api/notifications/unread-count", None).await;
    assert_eq!(body["data"]["count"], 1);

    let (status, body) = send(&app, "PUT", "/api/notifications/read-all", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Marked 1 notifications as read");

    let (_, body) = send(&app, "DELETE", "/api/notifications/read-all", None).await;
    assert_eq!(body["message"], "Deleted 1 read notifications");

    let (status, _) = send(&app, "DELETE", "/api/notifications/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cooking_session_is_null_until_saved() {
    let app = app().await;

    let (status, body) = send(&app, "GET", "/api/cooking-session/r1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "data": null}));

    let (_, body) = send(
        &app,
        "POST",
        "/api/cooking-session/r1",
        Some(json!({"isPlaying": true, "checkedSteps": [1, 2]})),
    )
    .await;
    assert_eq!(body["data"]["isPlaying"], true);
    assert_eq!(body["data"]["checkedSteps"], json!([1, 2]));

    let (status, _) = send(&app, "DELETE", "/api/cooking-session/r1", None).await;
    assert_eq!(status, StatusCode::OK);
}
