use std::future::Future;

use serde::{Deserialize, Serialize};

use super::passenger::PassengerRecord;
use crate::models::document_id;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PaymentMethod {
    CreditCard,
    Upi,
    NetBanking,
    Wallet,
}

/// Finalized booking request handed to the backend
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingSubmission {
    pub trip_id: u32,
    pub seat_numbers: Vec<u32>,
    /// One record per seat, in `seat_numbers` order
    pub passengers: Vec<PassengerRecord>,
    pub total_price: u64,
    pub payment_method: PaymentMethod,
}

/// What the backend tells us about an accepted booking
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub booking_id: Option<String>,
}

impl SubmissionReceipt {
    /// Read the booking id out of a success body. The booking is accepted
    /// whatever the body looks like; without an id it is simply `None`.
    pub fn from_body(body: &str) -> Self {
        let booking_id = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|doc| document_id(&doc, &["_id", "id", "bookingId", "booking_id"]));
        Self { booking_id }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Booking submission failed: {0}")]
pub struct SubmissionError(pub String);

/// Hands a finalized booking to whoever owns seat locking and payment
pub trait BookingSubmitter {
    fn submit_booking(
        &self,
        submission: &BookingSubmission,
    ) -> impl Future<Output = Result<SubmissionReceipt, SubmissionError>> + Send;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "error", rename_all = "camelCase")]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Pending,
    Failed(String),
}
