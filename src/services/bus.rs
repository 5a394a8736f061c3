use crate::models::bus::{Bus, NewBus, NewRoute, Route};

use super::{ApiClient, ApiError};

#[derive(Clone, Debug)]
pub struct BusService {
    api: ApiClient,
}

impl BusService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn register_bus(&self, bus: &NewBus) -> Result<Bus, ApiError> {
        self.api.post("/buses", bus).await
    }

    pub async fn driver_buses(&self, driver_id: &str) -> Result<Vec<Bus>, ApiError> {
        self.api.get(&format!("/buses/driver/{}", driver_id)).await
    }

    pub async fn all_buses(&self) -> Result<Vec<Bus>, ApiError> {
        self.api.get("/buses").await
    }

    pub async fn delete_bus(&self, bus_id: &str) -> Result<serde_json::Value, ApiError> {
        self.api.delete(&format!("/buses/{}", bus_id)).await
    }

    pub async fn all_routes(&self) -> Result<Vec<Route>, ApiError> {
        self.api.get("/buses/routes").await
    }

    pub async fn add_route(&self, route: &NewRoute) -> Result<Route, ApiError> {
        self.api.post("/buses/routes", route).await
    }

    pub async fn delete_route(&self, route_id: &str) -> Result<serde_json::Value, ApiError> {
        self.api.delete(&format!("/buses/routes/{}", route_id)).await
    }
}
