// HTTP request handlers
use crate::infrastructure::preference_store::PreferencesError;
use crate::presentation::app_state::AppState;
use crate::presentation::assets;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(dashboard))
        .route("/health", get(health_check))
        .route("/static/*path", get(static_asset))
        .route("/api/config", get(get_config))
        .route("/api/user-config", get(get_user_config))
        .route("/api/preferences", post(update_preferences))
        .route("/api/configs", get(get_available_configs))
        .with_state(state)
}

#[derive(Deserialize)]
pub struct ConfigQuery {
    pub config_name: Option<String>,
}

/// Dashboard configuration, either the named or the active one.
pub async fn get_config(
    Query(query): Query<ConfigQuery>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    match state.manager.get_config(query.config_name.as_deref()).await {
        Ok(Some(config)) => Json(config).into_response(),
        Ok(None) => not_found_response(),
        Err(err) => internal_error(err),
    }
}

/// Resolved config path, preferences and available configs in one view.
pub async fn get_user_config(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.manager.get_user_view().await {
        Ok(view) => Json(view).into_response(),
        Err(err) => internal_error(err),
    }
}

/// Applies a field-to-value mapping onto the stored preferences.
pub async fn update_preferences(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let Some(fields) = body.as_object() else {
        let message = PreferencesError::InvalidUpdate.to_string();
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response();
    };
    match state.manager.update_preferences(fields).await {
        Ok(()) => Json(json!({"status": "success"})).into_response(),
        Err(err @ PreferencesError::InvalidValue { .. }) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": err.to_string() })),
        )
            .into_response(),
        Err(err) => internal_error(err.into()),
    }
}

/// Available config file names plus the active selection.
pub async fn get_available_configs(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.manager.list_configs() {
        Ok(configs) => {
            let active = state.manager.active_config().await;
            Json(json!({"configs": configs, "active": active})).into_response()
        }
        Err(err) => internal_error(err.into()),
    }
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({"status": "healthy"}))
}

/// The dashboard HTML shell.
pub async fn dashboard() -> Html<&'static str> {
    Html(assets::INDEX_HTML)
}

/// Embedded static assets referenced by the shell.
pub async fn static_asset(Path(path): Path<String>) -> impl IntoResponse {
    match assets::lookup(&path) {
        Some((content_type, body)) => {
            ([(header::CONTENT_TYPE, content_type)], body).into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

fn not_found_response() -> axum::response::Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"error": "Configuration not found"})),
    )
        .into_response()
}

fn internal_error(err: anyhow::Error) -> axum::response::Response {
    tracing::error!("request failed: {:#}", err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"error": "internal server error"})),
    )
        .into_response()
}
