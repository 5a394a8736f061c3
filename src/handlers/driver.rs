use axum::{
    extract::{Path, State},
    Extension, Json,
};

use crate::error::{AppError, AppResult};
use crate::models::booking::{NewTrip, ScheduledTrip};
use crate::models::bus::{Bus, NewBus, Route};
use crate::services::booking::BookingService;
use crate::services::bus::BusService;
use crate::utils::jwt::AuthContext;
use crate::AppState;

// ============ Fleet ============

/// List buses registered by the logged-in driver
pub async fn my_buses(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> AppResult<Json<Vec<Bus>>> {
    let buses = BusService::new(state.api.with_token(&auth.token))
        .driver_buses(&auth.claims.sub)
        .await?;
    Ok(Json(buses))
}

/// Register a bus under the logged-in driver
pub async fn register_bus(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<NewBus>,
) -> AppResult<Json<Bus>> {
    let bus = payload.normalized(&auth.claims.sub)?;
    let bus = BusService::new(state.api.with_token(&auth.token))
        .register_bus(&bus)
        .await?;
    tracing::info!(bus_id = %bus.id, driver = %auth.claims.sub, "Bus registered");
    Ok(Json(bus))
}

/// Remove one of the driver's own buses
pub async fn delete_bus(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(bus_id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    let service = BusService::new(state.api.with_token(&auth.token));

    let owned = service.driver_buses(&auth.claims.sub).await?;
    if !owned.iter().any(|b| b.id == bus_id) {
        return Err(AppError::Forbidden(
            "You can only delete your own buses".to_string(),
        ));
    }

    service.delete_bus(&bus_id).await?;
    Ok(Json(serde_json::json!({ "message": "Bus deleted" })))
}

// ============ Trips ============

pub async fn list_routes(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> AppResult<Json<Vec<Route>>> {
    let routes = BusService::new(state.api.with_token(&auth.token))
        .all_routes()
        .await?;
    Ok(Json(routes))
}

/// List trips the logged-in driver has scheduled
pub async fn my_trips(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> AppResult<Json<Vec<ScheduledTrip>>> {
    let trips = BookingService::new(state.api.with_token(&auth.token))
        .driver_scheduled_trips(&auth.claims.sub)
        .await?;
    Ok(Json(trips))
}

/// Schedule a trip on one of the driver's buses
pub async fn schedule_trip(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<NewTrip>,
) -> AppResult<Json<ScheduledTrip>> {
    let api = state.api.with_token(&auth.token);
    let buses = BusService::new(api.clone());

    let (owned, routes) = tokio::try_join!(buses.driver_buses(&auth.claims.sub), buses.all_routes())?;
    if !owned.iter().any(|b| b.id == payload.bus) {
        return Err(AppError::Forbidden(
            "You can only schedule trips on your own buses".to_string(),
        ));
    }

    let trip = payload.resolve(&routes, &auth.claims.sub)?;
    let scheduled = BookingService::new(api).schedule_trip(&trip).await?;
    tracing::info!(trip_id = %scheduled.id, driver = %auth.claims.sub, "Trip scheduled");
    Ok(Json(scheduled))
}

/// Cancel one of the driver's scheduled trips
pub async fn cancel_trip(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(trip_id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    let service = BookingService::new(state.api.with_token(&auth.token));

    let trips = service.driver_scheduled_trips(&auth.claims.sub).await?;
    if !trips.iter().any(|t| t.id == trip_id) {
        return Err(AppError::NotFound("Trip not found".to_string()));
    }

    service.cancel_scheduled_trip(&trip_id).await?;
    tracing::info!(trip_id = %trip_id, "Trip cancelled");
    Ok(Json(serde_json::json!({ "message": "Trip cancelled" })))
}
