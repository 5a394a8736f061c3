use serde::Serialize;

use crate::models::booking::DashboardStats;
use crate::models::user::User;

use super::booking::BookingService;
use super::bus::BusService;
use super::{ApiClient, ApiError};

#[derive(Serialize)]
struct StatusUpdate<'a> {
    status: &'a str,
}

#[derive(Clone, Debug)]
pub struct AdminService {
    api: ApiClient,
}

impl AdminService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn all_users(&self) -> Result<Vec<User>, ApiError> {
        self.api.get("/admin/users").await
    }

    pub async fn dashboard_stats(&self) -> Result<serde_json::Value, ApiError> {
        self.api.get("/admin/stats").await
    }

    pub async fn update_user_status(&self, user_id: &str, status: &str) -> Result<User, ApiError> {
        self.api
            .patch(&format!("/admin/users/{}", user_id), &StatusUpdate { status })
            .await
    }

    /// Gather users, buses and bookings and summarize them
    pub async fn overview(&self) -> Result<DashboardStats, ApiError> {
        let bus_service = BusService::new(self.api.clone());
        let booking_service = BookingService::new(self.api.clone());

        let (users, buses, bookings) = tokio::try_join!(
            self.all_users(),
            bus_service.all_buses(),
            booking_service.all_bookings()
        )?;

        Ok(DashboardStats::compute(&users, &buses, &bookings))
    }
}
