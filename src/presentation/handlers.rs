// HTTP request handlers
use crate::application::fleet_service::{CreateCarRequest, UpdateCarRequest};
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Human-readable fleet summary
pub async fn fleet_summary(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.fleet_service.summary().await {
        Ok(summary) => summary.into_response(),
        Err(e) => {
            eprintln!("Error building fleet summary: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// List all cars
pub async fn list_cars(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.fleet_service.get_all().await {
        Ok(cars) => Json(cars).into_response(),
        Err(e) => {
            eprintln!("Error listing cars: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn get_car(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    match state.fleet_service.get_by_id(&id).await {
        Ok(Some(car)) => Json(car).into_response(),
        Ok(None) => car_not_found(&id),
        Err(e) => {
            eprintln!("Error fetching car {}: {}", id, e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn create_car(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateCarRequest>,
) -> impl IntoResponse {
    match state.fleet_service.create(request).await {
        Ok(car) => (StatusCode::CREATED, Json(car)).into_response(),
        Err(e) => {
            eprintln!("Error creating car: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn update_car(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(request): Json<UpdateCarRequest>,
) -> impl IntoResponse {
    match state.fleet_service.update(&id, request).await {
        Ok(Some(car)) => Json(car).into_response(),
        Ok(None) => car_not_found(&id),
        Err(e) => {
            eprintln!("Error updating car {}: {}", id, e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn delete_car(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    match state.fleet_service.delete(&id).await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => car_not_found(&id),
        Err(e) => {
            eprintln!("Error deleting car {}: {}", id, e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Car counts per status
pub async fn status_distribution(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.fleet_service.status_distribution().await {
        Ok(distribution) => Json(distribution).into_response(),
        Err(e) => {
            eprintln!("Error computing status distribution: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn car_not_found(id: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": format!("Car with ID {} not found", id) })),
    )
        .into_response()
}
