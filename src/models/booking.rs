use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::document_id;
use crate::error::{AppError, AppResult};
use crate::models::bus::Route;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

/// A booking as the backend lists it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "WireBookingRecord")]
pub struct BookingRecord {
    pub id: String,
    pub bus_name: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub departure: Option<DateTime<Utc>>,
    pub arrival: Option<DateTime<Utc>>,
    pub seats: Vec<Value>,
    pub total_price: f64,
    pub status: BookingStatus,
}

/// Booking as it comes off the wire. Mongoose documents may carry both
/// `_id` and `id`, and older records store the amount as `price`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireBookingRecord {
    #[serde(default, rename = "_id")]
    object_id: Option<Value>,
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    bus_name: Option<String>,
    #[serde(default)]
    from: Option<String>,
    #[serde(default)]
    to: Option<String>,
    #[serde(default)]
    departure: Option<DateTime<Utc>>,
    #[serde(default)]
    arrival: Option<DateTime<Utc>>,
    #[serde(default)]
    seats: Vec<Value>,
    #[serde(default)]
    total_price: Option<f64>,
    #[serde(default)]
    price: Option<f64>,
    #[serde(default = "default_status")]
    status: BookingStatus,
}

impl From<WireBookingRecord> for BookingRecord {
    fn from(wire: WireBookingRecord) -> Self {
        Self {
            id: wire_id(wire.object_id, wire.id),
            bus_name: wire.bus_name,
            from: wire.from,
            to: wire.to,
            departure: wire.departure,
            arrival: wire.arrival,
            seats: wire.seats,
            total_price: wire.total_price.or(wire.price).unwrap_or_default(),
            status: wire.status,
        }
    }
}

fn default_status() -> BookingStatus {
    BookingStatus::Pending
}

fn wire_id(object_id: Option<Value>, id: Option<Value>) -> String {
    let doc = serde_json::json!({ "_id": object_id, "id": id });
    document_id(&doc, &["_id", "id"]).unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "WireScheduledTrip")]
pub struct ScheduledTrip {
    pub id: String,
    pub bus: Value,
    pub route: Value,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub price: f64,
    pub driver: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireScheduledTrip {
    #[serde(default, rename = "_id")]
    object_id: Option<Value>,
    #[serde(default)]
    id: Option<Value>,
    bus: Value,
    route: Value,
    departure_time: DateTime<Utc>,
    arrival_time: DateTime<Utc>,
    #[serde(default)]
    price: f64,
    #[serde(default)]
    driver: Option<String>,
}

impl From<WireScheduledTrip> for ScheduledTrip {
    fn from(wire: WireScheduledTrip) -> Self {
        Self {
            id: wire_id(wire.object_id, wire.id),
            bus: wire.bus,
            route: wire.route,
            departure_time: wire.departure_time,
            arrival_time: wire.arrival_time,
            price: wire.price,
            driver: wire.driver,
        }
    }
}

/// Trip scheduling form submitted by a driver
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTrip {
    pub bus: String,
    pub route: String,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    #[serde(default)]
    pub price: Option<u64>,
    #[serde(default)]
    pub driver: Option<String>,
}

impl NewTrip {
    /// Check the form against the known routes. A missing price falls back
    /// to the chosen route's fare.
    pub fn resolve(mut self, routes: &[Route], driver_id: &str) -> AppResult<Self> {
        if self.bus.trim().is_empty() {
            return Err(AppError::BadRequest("Select a bus".to_string()));
        }
        let route = routes
            .iter()
            .find(|r| r.id == self.route)
            .ok_or_else(|| AppError::BadRequest("Unknown route".to_string()))?;
        if self.arrival_time <= self.departure_time {
            return Err(AppError::BadRequest(
                "Arrival must be after departure".to_string(),
            ));
        }

        self.price = Some(self.price.unwrap_or(route.price));
        self.driver = Some(driver_id.to_string());
        Ok(self)
    }
}

/// Admin overview figures
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: usize,
    pub total_buses: usize,
    pub total_bookings: usize,
    pub revenue: f64,
    pub recent_bookings: Vec<BookingRecord>,
}

pub const RECENT_BOOKINGS: usize = 5;

impl DashboardStats {
    pub fn compute<U, B>(users: &[U], buses: &[B], bookings: &[BookingRecord]) -> Self {
        Self {
            total_users: users.len(),
            total_buses: buses.len(),
            total_bookings: bookings.len(),
            revenue: bookings.iter().map(|b| b.total_price).sum(),
            recent_bookings: bookings.iter().take(RECENT_BOOKINGS).cloned().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn pune_route() -> Route {
        Route {
            id: "r1".to_string(),
            from: "Mumbai".to_string(),
            to: "Pune".to_string(),
            distance: Some(148.0),
            duration: None,
            price: 650,
        }
    }

    fn trip_form() -> NewTrip {
        let departure = Utc::now();
        NewTrip {
            bus: "b1".to_string(),
            route: "r1".to_string(),
            departure_time: departure,
            arrival_time: departure + Duration::hours(3),
            price: None,
            driver: None,
        }
    }

    #[test]
    fn test_trip_price_defaults_to_route() {
        let trip = trip_form().resolve(&[pune_route()], "drv-9").unwrap();
        assert_eq!(trip.price, Some(650));
        assert_eq!(trip.driver.as_deref(), Some("drv-9"));

        let mut custom = trip_form();
        custom.price = Some(700);
        assert_eq!(custom.resolve(&[pune_route()], "drv-9").unwrap().price, Some(700));
    }

    #[test]
    fn test_trip_rejects_arrival_before_departure() {
        let mut trip = trip_form();
        trip.arrival_time = trip.departure_time - Duration::minutes(5);
        assert!(trip.resolve(&[pune_route()], "drv-9").is_err());
    }

    #[test]
    fn test_trip_rejects_unknown_route() {
        let mut trip = trip_form();
        trip.route = "r404".to_string();
        assert!(trip.resolve(&[pune_route()], "drv-9").is_err());
    }

    #[test]
    fn test_booking_record_accepts_price_alias() {
        let record: BookingRecord =
            serde_json::from_str(r#"{"_id":"b1","price":950,"status":"cancelled"}"#).unwrap();
        assert_eq!(record.total_price, 950.0);
        assert_eq!(record.status, BookingStatus::Cancelled);
    }

    #[test]
    fn test_booking_record_tolerates_both_spellings() {
        let record: BookingRecord = serde_json::from_str(
            r#"{"_id":"b1","id":"b1","price":1200,"totalPrice":2832,"__v":0}"#,
        )
        .unwrap();
        assert_eq!(record.id, "b1");
        assert_eq!(record.total_price, 2832.0);
        assert_eq!(record.status, BookingStatus::Pending);

        let plain: BookingRecord = serde_json::from_str(r#"{"id":7,"price":1416.5}"#).unwrap();
        assert_eq!(plain.id, "7");
        assert_eq!(plain.total_price, 1416.5);
    }

    #[test]
    fn test_booking_list_survives_mixed_records() {
        let bookings: Vec<BookingRecord> = serde_json::from_str(
            r#"[
                {"_id":"b1","id":"b1","totalPrice":2832},
                {"_id":"b2","price":1416.5,"status":"confirmed"},
                {"id":"b3"}
            ]"#,
        )
        .unwrap();
        let stats = DashboardStats::compute::<(), ()>(&[], &[], &bookings);
        assert_eq!(stats.total_bookings, 3);
        assert_eq!(stats.revenue, 4248.5);
    }

    #[test]
    fn test_scheduled_trip_reads_mongoose_document() {
        let trip: ScheduledTrip = serde_json::from_str(
            r#"{"_id":"t1","id":"t1","bus":"b1","route":{"_id":"r1"},
                "departureTime":"2026-05-01T08:00:00Z","arrivalTime":"2026-05-01T11:00:00Z",
                "price":650.5,"driver":"drv-9"}"#,
        )
        .unwrap();
        assert_eq!(trip.id, "t1");
        assert_eq!(trip.price, 650.5);

        let json = serde_json::to_value(&trip).unwrap();
        assert_eq!(json["id"], "t1");
        assert_eq!(json["departureTime"], "2026-05-01T08:00:00Z");
    }

    #[test]
    fn test_dashboard_stats() {
        let bookings: Vec<BookingRecord> = (0..7)
            .map(|i| BookingRecord {
                id: format!("bk{}", i),
                bus_name: None,
                from: None,
                to: None,
                departure: None,
                arrival: None,
                seats: vec![],
                total_price: 100.0 * (i + 1) as f64,
                status: BookingStatus::Confirmed,
            })
            .collect();
        let stats = DashboardStats::compute(&["u1", "u2"], &["bus"], &bookings);
        assert_eq!(stats.total_users, 2);
        assert_eq!(stats.total_buses, 1);
        assert_eq!(stats.total_bookings, 7);
        assert_eq!(stats.revenue, 2800.0);
        assert_eq!(stats.recent_bookings.len(), 5);
        assert_eq!(stats.recent_bookings[0].id, "bk0");
    }
}
