use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::catalog::{BusListing, Seat, SortKey, TripOffering};
use crate::error::{AppError, AppResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub sort: SortKey,
}

/// List buses, sorted by departure unless asked otherwise
pub async fn list_buses(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Json<Vec<BusListing>> {
    Json(state.catalog.sorted(query.sort))
}

pub async fn get_bus(
    State(state): State<AppState>,
    Path(bus_id): Path<u32>,
) -> AppResult<Json<BusListing>> {
    state
        .catalog
        .find(bus_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Bus not found".to_string()))
}

/// Seat layout of one bus
pub async fn bus_seats(
    State(state): State<AppState>,
    Path(bus_id): Path<u32>,
) -> AppResult<Json<Vec<Seat>>> {
    let listing = state
        .catalog
        .find(bus_id)
        .ok_or_else(|| AppError::NotFound("Bus not found".to_string()))?;
    Ok(Json(TripOffering::from(listing).seat_map()))
}
