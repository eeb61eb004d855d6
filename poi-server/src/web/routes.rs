//! HTTP route handlers.

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::domain::StationKey;
use crate::engine::LoadReport;
use crate::feed::{FeedError, JsonSource};
use crate::filter::{FilterState, Toggle, UnknownToggle};
use crate::timetable::{Direction, TimetableLookup};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router<S>(state: AppState<S>) -> Router
where
    S: JsonSource + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health))
        .route("/markers", get(markers::<S>))
        .route(
            "/filters",
            post(toggle_filter::<S>).put(replace_filters::<S>),
        )
        .route("/reload", post(reload::<S>))
        .route("/timetable", get(timetable::<S>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Every marker with its visibility under the current filter.
async fn markers<S>(State(state): State<AppState<S>>) -> Json<MarkersResponse>
where
    S: JsonSource + Send + Sync + 'static,
{
    let view = state.engine.view().await;
    Json(MarkersResponse::from_view(&view))
}

/// Flip one toggle.
async fn toggle_filter<S>(
    State(state): State<AppState<S>>,
    Json(req): Json<ToggleRequest>,
) -> Result<Json<MarkersResponse>, AppError>
where
    S: JsonSource + Send + Sync + 'static,
{
    let toggle = Toggle::parse(&req.toggle)?;
    let view = state.engine.set_toggle(toggle, req.enabled).await;
    Ok(Json(MarkersResponse::from_view(&view)))
}

/// Replace every toggle at once. Missing fields are off, unknown ones are
/// rejected.
async fn replace_filters<S>(
    State(state): State<AppState<S>>,
    body: Bytes,
) -> Result<Json<MarkersResponse>, AppError>
where
    S: JsonSource + Send + Sync + 'static,
{
    let filter: FilterState = serde_json::from_slice(&body).map_err(|e| AppError::BadRequest {
        message: format!("Invalid filter state: {e}"),
    })?;

    let view = state.engine.replace_filter(filter).await;
    Ok(Json(MarkersResponse::from_view(&view)))
}

/// Reload every feed.
async fn reload<S>(State(state): State<AppState<S>>) -> Result<Json<LoadReport>, AppError>
where
    S: JsonSource + Send + Sync + 'static,
{
    let report = state.engine.reload().await?;
    Ok(Json(report))
}

/// Timetable for a station name, or for the station nearest a restaurant.
async fn timetable<S>(
    State(state): State<AppState<S>>,
    Query(query): Query<TimetableQuery>,
) -> Result<Json<TimetableLookup>, AppError>
where
    S: JsonSource + Send + Sync + 'static,
{
    let directions = match query.direction.as_deref() {
        None => Direction::BOTH.to_vec(),
        Some(s) => match Direction::parse(s) {
            Some(direction) => vec![direction],
            None => {
                return Err(AppError::BadRequest {
                    message: format!("unknown direction: {s} (expected kudari or nobori)"),
                });
            }
        },
    };

    match (query.station, query.restaurant) {
        (Some(name), None) => {
            let key = StationKey::from_name(&name);
            Ok(Json(state.engine.timetable_in(&key, &directions).await))
        }
        (None, Some(index)) => state
            .engine
            .timetable_near(index, &directions)
            .await
            .map(Json)
            .ok_or_else(|| AppError::NotFound {
                message: format!("no station known for restaurant {index}"),
            }),
        _ => Err(AppError::BadRequest {
            message: "specify exactly one of station or restaurant".to_string(),
        }),
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    BadGateway { message: String },
}

impl From<FeedError> for AppError {
    fn from(e: FeedError) -> Self {
        AppError::BadGateway {
            message: e.to_string(),
        }
    }
}

impl From<UnknownToggle> for AppError {
    fn from(e: UnknownToggle) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::BadGateway { message } => (StatusCode::BAD_GATEWAY, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
