use axum::{
    Json, Router,
    extract::{Query, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{
        IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
    routing::{delete, get, post},
};
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio_stream::wrappers::BroadcastStream;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::AppState;
use crate::config::AppConfig;
use crate::error::AuthError;
use crate::forms::{FieldErrors, LoginForm};
use crate::lookups::LookupTables;
use crate::navigation::{self, NavItem, Route};
use crate::session::{SessionSnapshot, UserRole};

/// Start the HTTP console with the provided configuration.
pub async fn start_server(config: Arc<AppConfig>) -> anyhow::Result<()> {
    let state = AppState::new(Arc::clone(&config));

    info!(
        name: "session.store.ready",
        authenticated = state.session.is_authenticated(),
        demo_email = %config.auth.demo_email,
        "Session store initialized"
    );

    let app = router(state);

    let addr = config.server.address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %addr,
        "Server started"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

/// Build the application router around `state`.
pub fn router(state: AppState) -> Router {
    let timeout_duration = state.config.server.request_timeout();

    Router::new()
        .route("/health", get(health))
        .route("/api/session", get(get_session))
        .route("/api/session/login", post(login))
        .route("/api/session/logout", post(logout))
        .route("/api/session/error", delete(clear_error))
        .route("/api/session/refresh", post(refresh_user))
        .route("/api/session/events", get(session_events))
        .route("/api/navigation", get(get_navigation))
        .route("/api/route", get(get_route))
        .route("/api/lookups", get(get_lookups))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(axum::middleware::from_fn(
                    move |req: Request, next: Next| async move {
                        match tokio::time::timeout(timeout_duration, next.run(req)).await {
                            Ok(res) => res,
                            Err(_) => {
                                (StatusCode::REQUEST_TIMEOUT, "Request timed out").into_response()
                            }
                        }
                    },
                )),
        )
        .with_state(state)
}

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

/// Failures surfaced by the session endpoints.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The login form did not pass validation; the store was not touched.
    #[error("invalid login form")]
    InvalidForm(FieldErrors),

    /// The store rejected the credentials.
    #[error("{source}")]
    Unauthorized {
        source: AuthError,
        session: Box<SessionSnapshot>,
    },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::InvalidForm(fields) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "error": "invalid login form", "fields": fields })),
            )
                .into_response(),
            ApiError::Unauthorized { source, session } => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": source.to_string(), "session": session })),
            )
                .into_response(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Session Handlers
// ─────────────────────────────────────────────────────────────────────────────

async fn health() -> &'static str {
    "ok"
}

/// GET /api/session - Current session snapshot.
async fn get_session(State(state): State<AppState>) -> Json<SessionSnapshot> {
    Json(state.session.snapshot())
}

/// POST /api/session/login - Validate the form, then attempt to sign in.
async fn login(
    State(state): State<AppState>,
    Json(form): Json<LoginForm>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    state.session.clear_error();
    form.validate().map_err(ApiError::InvalidForm)?;

    match state.session.login(&form.email, &form.password).await {
        Ok(_) => Ok(Json(state.session.snapshot())),
        Err(source) => Err(ApiError::Unauthorized {
            source,
            session: Box::new(state.session.snapshot()),
        }),
    }
}

/// POST /api/session/logout
async fn logout(State(state): State<AppState>) -> Json<SessionSnapshot> {
    state.session.logout();
    Json(state.session.snapshot())
}

/// DELETE /api/session/error - Dismiss the last login error.
async fn clear_error(State(state): State<AppState>) -> Json<SessionSnapshot> {
    state.session.clear_error();
    Json(state.session.snapshot())
}

/// POST /api/session/refresh
async fn refresh_user(
    State(state): State<AppState>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    if let Err(source) = state.session.refresh_user().await {
        return Err(ApiError::Unauthorized {
            source,
            session: Box::new(state.session.snapshot()),
        });
    }
    Ok(Json(state.session.snapshot()))
}

/// GET /api/session/events - SSE feed: the current snapshot, then a fresh
/// snapshot after every store notification.
async fn session_events(State(state): State<AppState>) -> impl IntoResponse {
    let store = state.session.clone();
    let initial = futures::stream::once(std::future::ready(store.snapshot()));
    // A lagged receiver still gets the latest state on its next item.
    let updates =
        BroadcastStream::new(state.session_events.subscribe()).map(move |_| store.snapshot());

    build_sse_response(initial.chain(updates))
}

fn build_sse_response<S>(stream: S) -> Sse<impl Stream<Item = Result<Event, Infallible>> + Send>
where
    S: Stream<Item = SessionSnapshot> + Send + 'static,
{
    let stream = stream.map(|snapshot| {
        let json = serde_json::to_string(&snapshot).unwrap_or_else(|_| "{}".to_string());
        Ok(Event::default().event("session").data(json))
    });

    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}

// ─────────────────────────────────────────────────────────────────────────────
// Navigation & Lookups
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NavUser {
    full_name: String,
    initials: String,
    role: UserRole,
    role_label: &'static str,
}

#[derive(Debug, Serialize)]
struct NavigationResponse {
    user: Option<NavUser>,
    items: Vec<NavItem>,
}

/// GET /api/navigation - Menu entries for the signed-in user's role.
async fn get_navigation(State(state): State<AppState>) -> Json<NavigationResponse> {
    let user = state.session.current_user();
    let items = navigation::visible_items(user.as_ref().map(|u| u.role));

    Json(NavigationResponse {
        user: user.map(|u| NavUser {
            full_name: u.full_name(),
            initials: u.initials(),
            role: u.role,
            role_label: u.role.short_label(),
        }),
        items,
    })
}

#[derive(Debug, Deserialize)]
struct RouteQuery {
    #[serde(default)]
    path: String,
}

#[derive(Debug, Serialize)]
struct RouteResponse {
    #[serde(flatten)]
    route: Route,
    title: &'static str,
}

/// GET /api/route?path=... - Where the current session may go.
async fn get_route(
    State(state): State<AppState>,
    Query(query): Query<RouteQuery>,
) -> Json<RouteResponse> {
    let route = navigation::route_for_session(&query.path, &state.session.snapshot());
    let title = match &route {
        Route::Render { path } => navigation::page_title(path),
        Route::Redirect { to } => navigation::page_title(to),
        Route::Loading => navigation::DEFAULT_TITLE,
    };
    Json(RouteResponse { route, title })
}

/// GET /api/lookups - Label and color tables for roles, vehicles and events.
async fn get_lookups() -> Json<LookupTables> {
    Json(LookupTables::build())
}
