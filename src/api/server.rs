use axum::{
    Router,
    routing::{delete, get, post, put},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::{status, users};
use crate::config::AppConfig;
use crate::db::{SqliteUserStore, UserStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn UserStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }
}

/// Builds the full router. Errors from every handler go through
/// `ApiError`'s `IntoResponse`, the one place failures become responses.
pub fn router(state: Arc<AppState>) -> Router {
    let user_routes = Router::new()
        .route("/create", post(users::create))
        .route("/retrieve", get(users::retrieve))
        .route("/retrieve/{id}", get(users::retrieve_by_id))
        .route("/update", put(users::update))
        .route("/update/{id}", put(users::update_by_id))
        .route("/delete", delete(users::delete))
        .route("/delete/{id}", delete(users::delete_by_id));

    Router::new()
        .route("/status", get(status::status))
        .route("/stats", get(status::stats))
        .nest("/user", user_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server(config: &AppConfig) -> anyhow::Result<()> {
    let store = match SqliteUserStore::connect(&config.database.url).await {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("Error connecting to the database: {}", e);
            return Err(e.into());
        }
    };
    tracing::info!("Successfully connected to the database");

    let state = Arc::new(AppState::new(Arc::new(store)));
    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Server running on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
