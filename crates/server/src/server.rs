use axum::{
    Router,
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::{get, post, put},
};
use sea_orm::DatabaseConnection;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use std::sync::Arc;

use crate::{budget, cooking, derived, inbox, months, recipes, service, todos};
use engine::Engine;

/// Header carrying the caller's user id.
pub(crate) const USER_HEADER: &str = "x-user-id";
/// User of requests without [`USER_HEADER`].
pub(crate) const DEFAULT_USER: &str = "default-user";

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub db: DatabaseConnection,
}

/// The user every engine call of a request is scoped to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserId(pub String);

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, Debug)]
pub struct ServeOptions {
    /// Allow cross-origin requests from any origin.
    pub cors: bool,
}

impl Default for ServeOptions {
    fn default() -> Self {
        Self { cors: true }
    }
}

async fn user_context(mut request: Request, next: Next) -> Response {
    let user = request
        .headers()
        .get(USER_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_USER)
        .to_string();

    request.extensions_mut().insert(UserId(user));
    next.run(request).await
}

fn api_routes() -> Router<ServerState> {
    Router::new()
        // Legacy budget
        .route("/budget", get(budget::list).post(budget::create))
        .route("/budget/summary", get(budget::summary))
        .route("/budget/category/{category}", get(budget::list_by_category))
        .route(
            "/budget/{id}",
            get(budget::get).put(budget::update).delete(budget::delete),
        )
        // Month based budget
        .route("/budget/month/{month_key}", get(months::list))
        .route(
            "/budget/month/{month_key}/transaction",
            post(months::create),
        )
        .route(
            "/budget/month/{month_key}/transaction/{id}",
            put(months::update).delete(months::delete),
        )
        .route("/budget/templates", get(months::templates))
        .route("/budget/template", post(months::template_new))
        .route(
            "/budget/template/{id}/from/{month_key}",
            axum::routing::delete(months::template_delete),
        )
        .route("/todos", get(todos::list).post(todos::create))
        .route(
            "/todos/{id}",
            get(todos::get).put(todos::update).delete(todos::delete),
        )
        .route("/recipe/recipes", get(recipes::list).post(recipes::create))
        .route("/recipe/recipes/favorites", get(recipes::favorites))
        .route(
            "/recipe/recipes/category/{category}",
            get(recipes::list_by_category),
        )
        .route(
            "/recipe/recipes/{id}",
            get(recipes::get)
                .put(recipes::update)
                .delete(recipes::delete),
        )
        .route("/recipe/recipes/{id}/favorite", put(recipes::toggle_favorite))
        .route(
            "/recipe/categories",
            get(recipes::categories).post(recipes::category_new),
        )
        .route(
            "/recipe/categories/{id}",
            put(recipes::category_update).delete(recipes::category_delete),
        )
        .route(
            "/cooking-session/{recipe_id}",
            get(cooking::get).post(cooking::save).delete(cooking::delete),
        )
        .route("/notifications", get(inbox::list).post(inbox::create))
        .route("/notifications/unread-count", get(inbox::unread_count))
        .route(
            "/notifications/read-all",
            put(inbox::mark_all_read).delete(inbox::delete_read),
        )
        .route("/notifications/{id}/read", put(inbox::mark_read))
        .route(
            "/notifications/{id}",
            axum::routing::delete(inbox::delete),
        )
        .route(
            "/notification-data",
            get(derived::notifications).post(derived::notification_new),
        )
        .route("/notification-data/upcoming", get(derived::upcoming))
        .route(
            "/notification-data/{id}",
            axum::routing::delete(derived::notification_delete),
        )
        .route(
            "/event-data",
            get(derived::events).post(derived::event_new),
        )
        .route(
            "/event-data/month/{year}/{month}",
            get(derived::events_in_month),
        )
        .route(
            "/event-data/{id}",
            axum::routing::delete(derived::event_delete),
        )
        .route_layer(middleware::from_fn(user_context))
}

pub fn router(state: ServerState, options: &ServeOptions) -> Router {
    let router = Router::new()
        .route("/", get(service::index))
        .route("/health", get(service::health))
        .nest("/api", api_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if options.cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

pub async fn run_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
    options: ServeOptions,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
        db,
    };

    axum::serve(listener, router(state, &options)).await
}
