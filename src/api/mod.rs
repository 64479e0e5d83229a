use std::sync::Arc;

use axum::{
    Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use crate::error::IcyRouteError;
use crate::models::{DemoRouteInfo, RouteRequest, RouteResponse};
use crate::planner::RoutePlanner;

#[derive(Clone)]
pub struct AppState {
    pub planner: Arc<RoutePlanner>,
}

impl AppState {
    pub fn new(planner: RoutePlanner) -> Self {
        Self {
            planner: Arc::new(planner),
        }
    }
}

/// `{"error": "..."}` body returned with every failed request
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DemoRoutesBody {
    pub demo_routes: Vec<DemoRouteInfo>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthBody {
    pub status: String,
    pub version: String,
}

pub struct ApiError(IcyRouteError);

impl From<IcyRouteError> for ApiError {
    fn from(err: IcyRouteError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            IcyRouteError::Validation { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self.0);
        }
        let body = ErrorBody {
            error: self.0.user_message(),
        };
        (status, Json(body)).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/routes", post(get_routes))
        .route("/demo-routes", get(get_demo_routes))
        .route("/health", get(health))
        .with_state(state)
}

async fn get_routes(
    State(state): State<AppState>,
    payload: Result<Json<RouteRequest>, JsonRejection>,
) -> Result<Json<RouteResponse>, ApiError> {
    let Json(request) =
        payload.map_err(|rejection| IcyRouteError::validation(rejection.body_text()))?;
    let response = state.planner.plan(request).await?;
    Ok(Json(response))
}

async fn get_demo_routes(State(state): State<AppState>) -> Json<DemoRoutesBody> {
    Json(DemoRoutesBody {
        demo_routes: state.planner.demos().list(),
    })
}

async fn health() -> Json<HealthBody> {
    Json(HealthBody {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
    })
}
