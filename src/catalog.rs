use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// One bookable bus departure as the booking workflow sees it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripOffering {
    pub id: u32,
    /// Seat capacity
    pub seats: u32,
    /// Number of seats still open for booking
    pub available: u32,
    /// Per-seat price in whole currency units
    pub price: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Seat {
    pub number: u32,
    pub available: bool,
}

impl TripOffering {
    /// Derive the seat map. Seat `n` sits at index `n - 1` and is available
    /// while that index is below the available count, so seats
    /// `1..=available` are open and the rest are taken.
    pub fn seat_map(&self) -> Vec<Seat> {
        (0..self.seats)
            .map(|i| Seat {
                number: i + 1,
                available: i < self.available,
            })
            .collect()
    }

    /// Look up a single seat, `None` when the number is outside `1..=seats`
    pub fn seat(&self, number: u32) -> Option<Seat> {
        if number == 0 || number > self.seats {
            return None;
        }
        Some(Seat {
            number,
            available: number - 1 < self.available,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusListing {
    pub id: u32,
    pub name: String,
    pub operator: String,
    pub departure: NaiveTime,
    pub arrival: NaiveTime,
    pub duration_minutes: u32,
    pub price: u64,
    pub seats: u32,
    pub available: u32,
    pub rating: f32,
    pub amenities: Vec<String>,
}

impl From<&BusListing> for TripOffering {
    fn from(listing: &BusListing) -> Self {
        TripOffering {
            id: listing.id,
            seats: listing.seats,
            available: listing.available,
            price: listing.price,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Departure,
    Price,
    Duration,
    Rating,
}

/// Read-only list of bus departures offered for search
#[derive(Debug, Clone)]
pub struct BusCatalog {
    listings: Vec<BusListing>,
}

impl BusCatalog {
    pub fn new(listings: Vec<BusListing>) -> Self {
        Self { listings }
    }

    /// The three departures the portal ships with
    pub fn demo() -> Self {
        Self::new(vec![
            listing(
                1,
                "Swift Deluxe",
                "Swift Travels",
                (8, 0),
                (12, 30),
                270,
                1200,
                32,
                15,
                4.5,
                &["AC", "WiFi", "Charging Ports", "Water Bottle"],
            ),
            listing(
                2,
                "Comfort Express",
                "Comfort Lines",
                (10, 15),
                (15, 0),
                285,
                950,
                40,
                22,
                4.2,
                &["AC", "Reclining Seats"],
            ),
            listing(
                3,
                "Premium Sleeper",
                "Luxury Buses",
                (23, 30),
                (5, 0),
                330,
                1500,
                20,
                8,
                4.8,
                &["AC", "WiFi", "Sleeper Seats", "Blanket", "Snacks"],
            ),
        ])
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    pub fn find(&self, id: u32) -> Option<&BusListing> {
        self.listings.iter().find(|l| l.id == id)
    }

    /// Listings ordered by `key`. Rating sorts best first, everything else
    /// ascending. Ties keep catalog order.
    pub fn sorted(&self, key: SortKey) -> Vec<BusListing> {
        let mut listings = self.listings.clone();
        match key {
            SortKey::Departure => listings.sort_by_key(|l| l.departure),
            SortKey::Price => listings.sort_by_key(|l| l.price),
            SortKey::Duration => listings.sort_by_key(|l| l.duration_minutes),
            SortKey::Rating => listings.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
        }
        listings
    }
}

#[allow(clippy::too_many_arguments)]
fn listing(
    id: u32,
    name: &str,
    operator: &str,
    departure: (u32, u32),
    arrival: (u32, u32),
    duration_minutes: u32,
    price: u64,
    seats: u32,
    available: u32,
    rating: f32,
    amenities: &[&str],
) -> BusListing {
    BusListing {
        id,
        name: name.to_string(),
        operator: operator.to_string(),
        departure: NaiveTime::from_hms_opt(departure.0, departure.1, 0).unwrap_or_default(),
        arrival: NaiveTime::from_hms_opt(arrival.0, arrival.1, 0).unwrap_or_default(),
        duration_minutes,
        price,
        seats,
        available,
        rating,
        amenities: amenities.iter().map(|a| a.to_string()).collect(),
    }
}
