//! HTTP surface: state snapshot, screen view, program list and actions.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use disinfect_core::{DeviceError, DeviceService, Monitor, MonitorCfg, ProgramCatalog};
use eyre::WrapErr;
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub device: DeviceService,
}

/// Error body for rejected actions.
pub struct ApiError(DeviceError);

impl From<DeviceError> for ApiError {
    fn from(e: DeviceError) -> Self {
        Self(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(r: JsonRejection) -> Self {
        Self(DeviceError::InvalidRequest(r.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "status": "error",
            "error": self.0.kind(),
            "message": self.0.to_string(),
        }));
        (StatusCode::BAD_REQUEST, body).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/state", get(get_state))
        .route("/api/screen", get(get_screen))
        .route("/api/programs", get(get_programs))
        .route("/api/action", post(post_action))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn get_state(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.device.snapshot())
}

async fn get_screen(State(state): State<AppState>) -> impl IntoResponse {
    let view = disinfect_ui::render(&state.device.snapshot());
    let text = view.to_text();
    Json(json!({ "view": view, "text": text }))
}

async fn get_programs(State(state): State<AppState>) -> impl IntoResponse {
    let catalog: ProgramCatalog = state.device.catalog();
    let programs: Vec<_> = catalog.iter().cloned().collect();
    Json(json!({
        "default_program": catalog.default_id(),
        "programs": programs,
    }))
}

async fn post_action(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(body) = body?;
    state.device.apply_json(&body)?;
    Ok(Json(json!({ "status": "success" })))
}

/// Serve until Ctrl-C, then stop the monitor.
pub async fn serve(device: DeviceService, monitor_cfg: &MonitorCfg, bind: &str) -> eyre::Result<()> {
    let monitor = Monitor::spawn(device.clone(), monitor_cfg.tick);
    let app = router(AppState { device });

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .wrap_err_with(|| format!("bind {bind}"))?;
    tracing::info!(addr = %bind, tick_ms = monitor_cfg.tick.as_millis(), "serving disinfection unit API");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %e, "failed to listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
            tracing::info!("shutdown requested");
        })
        .await
        .wrap_err("http server")?;

    monitor.stop();
    tracing::info!("server stopped");
    Ok(())
}
