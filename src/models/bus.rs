use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Amenities a driver can list when registering a bus
pub const BUS_AMENITIES: [&str; 6] = [
    "AC",
    "WiFi",
    "TV",
    "Charging Ports",
    "Toilet",
    "Refreshments",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bus {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub registration_number: String,
    pub model: String,
    pub capacity: u32,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub driver: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBus {
    pub registration_number: String,
    pub model: String,
    pub capacity: u32,
    #[serde(default)]
    pub amenities: Vec<String>,
    /// Filled in from the authenticated driver, never trusted from input
    #[serde(default)]
    pub driver: Option<String>,
}

impl NewBus {
    /// Trim and check the form, dropping duplicate amenities
    pub fn normalized(mut self, driver_id: &str) -> AppResult<Self> {
        self.registration_number = self.registration_number.trim().to_string();
        self.model = self.model.trim().to_string();

        if self.registration_number.is_empty() {
            return Err(AppError::BadRequest("Registration number is required".to_string()));
        }
        if self.model.is_empty() {
            return Err(AppError::BadRequest("Bus model is required".to_string()));
        }
        if self.capacity == 0 {
            return Err(AppError::BadRequest("Capacity must be at least 1".to_string()));
        }

        let mut amenities: Vec<String> = Vec::with_capacity(self.amenities.len());
        for amenity in self.amenities {
            if !BUS_AMENITIES.contains(&amenity.as_str()) {
                return Err(AppError::BadRequest(format!("Unknown amenity: {}", amenity)));
            }
            if !amenities.contains(&amenity) {
                amenities.push(amenity);
            }
        }
        self.amenities = amenities;
        self.driver = Some(driver_id.to_string());
        Ok(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub duration: Option<String>,
    pub price: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRoute {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub duration: Option<String>,
    pub price: u64,
}

impl NewRoute {
    pub fn validate(&self) -> AppResult<()> {
        if self.from.trim().is_empty() || self.to.trim().is_empty() {
            return Err(AppError::BadRequest("Route needs both endpoints".to_string()));
        }
        if self.from.trim().eq_ignore_ascii_case(self.to.trim()) {
            return Err(AppError::BadRequest(
                "Origin and destination must differ".to_string(),
            ));
        }
        if self.distance.is_some_and(|d| d <= 0.0) {
            return Err(AppError::BadRequest("Distance must be positive".to_string()));
        }
        Ok(())
    }
}
