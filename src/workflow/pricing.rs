use serde::Serialize;

/// Taxes and fees charged on top of the base fare, in percent
pub const TAX_RATE_PERCENT: u64 = 18;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub base_fare: u64,
    pub taxes: u64,
    pub total: u64,
}

/// Price `seat_count` seats at `price_per_seat`. Taxes are rounded half-up
/// to whole currency units.
pub fn price(seat_count: usize, price_per_seat: u64) -> PriceBreakdown {
    let base_fare = seat_count as u64 * price_per_seat;
    let taxes = (base_fare * TAX_RATE_PERCENT + 50) / 100;
    PriceBreakdown {
        base_fare,
        taxes,
        total: base_fare + taxes,
    }
}
