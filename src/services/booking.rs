use crate::models::booking::{BookingRecord, NewTrip, ScheduledTrip};
use crate::workflow::{BookingSubmission, BookingSubmitter, SubmissionError, SubmissionReceipt};

use super::{ApiClient, ApiError};

#[derive(Clone, Debug)]
pub struct BookingService {
    api: ApiClient,
}

impl BookingService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Any 2xx answer means the backend holds the booking, so the body is
    /// only mined for an id
    pub async fn book_seat(&self, submission: &BookingSubmission) -> Result<SubmissionReceipt, ApiError> {
        let body = self.api.post_raw("/bookings", submission).await?;
        Ok(SubmissionReceipt::from_body(&body))
    }

    pub async fn user_bookings(&self, user_id: &str) -> Result<Vec<BookingRecord>, ApiError> {
        self.api.get(&format!("/bookings/user/{}", user_id)).await
    }

    pub async fn all_bookings(&self) -> Result<Vec<BookingRecord>, ApiError> {
        self.api.get("/bookings").await
    }

    pub async fn schedule_trip(&self, trip: &NewTrip) -> Result<ScheduledTrip, ApiError> {
        self.api.post("/bookings/schedule", trip).await
    }

    pub async fn driver_scheduled_trips(&self, driver_id: &str) -> Result<Vec<ScheduledTrip>, ApiError> {
        self.api.get(&format!("/bookings/driver/{}", driver_id)).await
    }

    pub async fn cancel_scheduled_trip(&self, trip_id: &str) -> Result<serde_json::Value, ApiError> {
        self.api.delete(&format!("/bookings/schedule/{}", trip_id)).await
    }
}

impl BookingSubmitter for BookingService {
    async fn submit_booking(
        &self,
        submission: &BookingSubmission,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        self.book_seat(submission)
            .await
            .map_err(|e| SubmissionError(e.message()))
    }
}
