//! Axum server for the kiosk page, with optional OpenAPI (utoipa) and Swagger UI
//!
//! The page is the configured template; `/board.js` keeps it in sync with the
//! [`HtmlSurface`] through `/api/surface` and the `/api/events` SSE stream and
//! reports viewport changes back to the layout fitter.

use axum::response::sse::{Event, KeepAlive, Sse};
use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::{Html, IntoResponse},
    routing::{get, get_service, post},
};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::WatchStream;
use tower_http::services::ServeDir;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::{Config, Size};
use crate::refresh::{RefreshStats, fit_to_viewport};
use crate::render::page::board_script;
use crate::render::{DisplaySurface, HtmlSurface};

#[derive(Clone)]
pub struct AppState {
    pub surface: Arc<Mutex<HtmlSurface>>,
    pub config: Arc<Config>,
    /// Absent when the refresh loop never started
    pub stats: Option<Arc<RefreshStats>>,
}

#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ViewportBody {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ScaleResponse {
    pub scale: f64,
}

#[cfg_attr(feature = "openapi", utoipa::path(get, path = "/", responses(
    (status = 200, description = "Kiosk page")
)))]
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    let surface = state.surface.lock().await;
    Html(surface.template().to_string())
}

#[cfg_attr(feature = "openapi", utoipa::path(get, path = "/board.js", responses(
    (status = 200, description = "Client script applying surface updates")
)))]
pub async fn script(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        board_script(&state.config.surface.mounts),
    )
}

#[cfg_attr(feature = "openapi", utoipa::path(get, path = "/api/health", responses(
    (status = 200, description = "Service is healthy")
)))]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("APP_VERSION"),
        "commit": Some(env!("APP_GIT_SHA")).filter(|s| !s.is_empty()),
        "refresh": state.stats.as_ref().map(|s| s.snapshot()),
    }))
}

#[cfg_attr(feature = "openapi", utoipa::path(get, path = "/api/surface", responses(
    (status = 200, description = "Current surface fragments")
)))]
pub async fn surface_snapshot(State(state): State<AppState>) -> impl IntoResponse {
    let surface = state.surface.lock().await;
    Json(surface.published())
}

#[cfg_attr(feature = "openapi", utoipa::path(get, path = "/api/board", responses(
    (status = 200, description = "Last rendered board, null before the first render")
)))]
pub async fn board(State(state): State<AppState>) -> impl IntoResponse {
    let surface = state.surface.lock().await;
    Json(surface.board().cloned())
}

#[cfg_attr(feature = "openapi", utoipa::path(post, path = "/api/viewport", request_body = ViewportBody, responses(
    (status = 200, description = "Fitted scale", body = ScaleResponse),
    (status = 400, description = "Invalid viewport")
)))]
pub async fn viewport(
    State(state): State<AppState>,
    Json(body): Json<ViewportBody>,
) -> impl IntoResponse {
    let valid = |v: f64| v.is_finite() && v > 0.0;
    if !valid(body.width) || !valid(body.height) {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error":"invalid viewport"})),
        );
    }

    let mut surface = state.surface.lock().await;
    surface.set_viewport(Size::new(body.width, body.height));
    let scale = fit_to_viewport(&mut *surface, &state.config.layout);
    surface.flush();
    (StatusCode::OK, Json(serde_json::json!({ "scale": scale })))
}

#[cfg_attr(feature = "openapi", utoipa::path(get, path = "/api/events", responses(
    (status = 200, description = "Server-sent `surface` events")
)))]
pub async fn events(State(state): State<AppState>) -> impl IntoResponse {
    let rx = {
        let surface = state.surface.lock().await;
        surface.subscribe()
    };
    let stream = WatchStream::new(rx)
        .map(|snapshot| Event::default().event("surface").json_data(&*snapshot));
    Sse::new(stream).keep_alive(KeepAlive::default())
}

#[cfg_attr(feature = "openapi", utoipa::path(get, path = "/api/config", responses((status = 200))))]
pub async fn get_config(State(state): State<AppState>) -> impl IntoResponse {
    Json(
        serde_json::to_value(state.config.as_ref())
            .unwrap_or(serde_json::json!({"error":"serialization"})),
    )
}

#[cfg_attr(feature = "openapi", utoipa::path(get, path = "/api/config/schema", responses((status = 200))))]
pub async fn get_config_schema() -> impl IntoResponse {
    let schema = schemars::schema_for!(Config);
    Json(serde_json::to_value(&schema).unwrap_or(serde_json::json!({"error":"schema"})))
}

#[cfg(feature = "openapi")]
#[derive(utoipa::OpenApi)]
#[openapi(
    paths(
        index, script, health, surface_snapshot, board, viewport, events,
        get_config, get_config_schema,
    ),
    components(schemas(ViewportBody, ScaleResponse)),
    tags((name = "chargeboard", description = "Chargeboard kiosk API"))
)]
pub struct ApiDoc;

pub fn build_router(state: AppState) -> Router {
    let assets = ServeDir::new(&state.config.web.assets_dir);

    let router = Router::new()
        .route("/", get(index))
        .route("/board.js", get(script))
        .route("/api/health", get(health))
        .route("/api/surface", get(surface_snapshot))
        .route("/api/board", get(board))
        .route("/api/viewport", post(viewport))
        .route("/api/events", get(events))
        .route("/api/config", get(get_config))
        .route("/api/config/schema", get(get_config_schema))
        .nest_service(
            "/assets",
            get_service(assets).handle_error(|_| async { StatusCode::INTERNAL_SERVER_ERROR }),
        );

    #[cfg(feature = "openapi")]
    let router = {
        use utoipa::OpenApi;
        router.merge(
            utoipa_swagger_ui::SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()),
        )
    };

    router
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Bind and serve until `shutdown` resolves
pub async fn serve<F>(state: AppState, host: &str, port: u16, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let router = build_router(state);

    let logger = crate::logging::get_logger("web");
    logger.info(&format!(
        "Starting web server; requested host={}, port={}",
        host, port
    ));

    let addr = match host.parse::<IpAddr>() {
        Ok(ip) => SocketAddr::new(ip, port),
        Err(_) => {
            logger.warn(&format!("Invalid host '{}'; falling back to 127.0.0.1", host));
            ([127, 0, 0, 1], port).into()
        }
    };

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;
    logger.info(&format!(
        "Web server listening at http://{}:{} (board /, API /api)",
        local_addr.ip(),
        local_addr.port()
    ));

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await?;
    logger.info("Web server stopped");
    Ok(())
}
