//! Booking wizard: seat selection, passenger details, payment, confirmation.
//!
//! A [`BookingWorkflow`] belongs to one open booking view. Every operation
//! runs to completion synchronously except the final hand-off to the
//! backend, which is split into [`BookingWorkflow::begin_submission`] and
//! [`BookingWorkflow::complete_submission`] so the caller can perform the
//! network call without holding on to the workflow.
//!
//! Sequencing mistakes (advancing too early, selecting a taken seat) are
//! silent no-ops. Mutating operations return `true` when state changed.

pub mod passenger;
pub mod pricing;
pub mod submission;

use std::collections::HashMap;

use rand::Rng;
use serde::Serialize;

use crate::catalog::TripOffering;

pub use passenger::{Gender, PassengerField, PassengerRecord};
pub use pricing::PriceBreakdown;
pub use submission::{
    BookingSubmission, BookingSubmitter, PaymentMethod, SubmissionError, SubmissionReceipt,
    SubmissionStatus,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum WorkflowStep {
    SeatSelection,
    PassengerDetails,
    Payment,
    Confirmation,
}

#[derive(Debug, Clone)]
pub struct BookingWorkflow {
    trip: TripOffering,
    requested_passengers: usize,
    step: WorkflowStep,
    /// Chosen seats in the order they were picked
    selected_seats: Vec<u32>,
    passengers: HashMap<u32, PassengerRecord>,
    payment_method: Option<PaymentMethod>,
    submission: SubmissionStatus,
    provisional_code: Option<String>,
    confirmation_code: Option<String>,
}

impl BookingWorkflow {
    pub fn new(trip: TripOffering, requested_passengers: u32) -> Self {
        Self {
            trip,
            requested_passengers: requested_passengers as usize,
            step: WorkflowStep::SeatSelection,
            selected_seats: Vec::new(),
            passengers: HashMap::new(),
            payment_method: None,
            submission: SubmissionStatus::Idle,
            provisional_code: None,
            confirmation_code: None,
        }
    }

    pub fn trip(&self) -> &TripOffering {
        &self.trip
    }

    pub fn step(&self) -> WorkflowStep {
        self.step
    }

    pub fn requested_passengers(&self) -> usize {
        self.requested_passengers
    }

    pub fn selected_seats(&self) -> &[u32] {
        &self.selected_seats
    }

    pub fn passenger(&self, seat: u32) -> Option<&PassengerRecord> {
        self.passengers.get(&seat)
    }

    pub fn payment_method(&self) -> Option<PaymentMethod> {
        self.payment_method
    }

    pub fn submission_status(&self) -> &SubmissionStatus {
        &self.submission
    }

    pub fn confirmation_code(&self) -> Option<&str> {
        self.confirmation_code.as_deref()
    }

    fn is_submitting(&self) -> bool {
        self.submission == SubmissionStatus::Pending
    }

    /// Toggle `seat` in the selection.
    pub fn select_seat(&mut self, seat: u32) -> bool {
        if self.step != WorkflowStep::SeatSelection {
            return false;
        }
        match self.trip.seat(seat) {
            Some(s) if s.available => {}
            _ => return false,
        }

        if let Some(pos) = self.selected_seats.iter().position(|&s| s == seat) {
            self.selected_seats.remove(pos);
            self.passengers.remove(&seat);
            return true;
        }
        if self.selected_seats.len() >= self.requested_passengers {
            return false;
        }
        self.selected_seats.push(seat);
        true
    }

    fn passengers_complete(&self) -> bool {
        self.selected_seats.iter().all(|seat| {
            self.passengers
                .get(seat)
                .is_some_and(PassengerRecord::is_complete)
        })
    }

    /// Whether `advance` would move to the next step right now
    pub fn can_advance(&self) -> bool {
        match self.step {
            WorkflowStep::SeatSelection => {
                !self.selected_seats.is_empty()
                    && self.selected_seats.len() == self.requested_passengers
            }
            WorkflowStep::PassengerDetails => self.passengers_complete(),
            WorkflowStep::Payment | WorkflowStep::Confirmation => false,
        }
    }

    pub fn advance(&mut self) -> bool {
        if !self.can_advance() {
            return false;
        }
        self.step = match self.step {
            WorkflowStep::SeatSelection => WorkflowStep::PassengerDetails,
            WorkflowStep::PassengerDetails => WorkflowStep::Payment,
            // can_advance rules these out
            step @ (WorkflowStep::Payment | WorkflowStep::Confirmation) => step,
        };
        tracing::debug!(trip_id = self.trip.id, step = ?self.step, "Booking workflow advanced");
        true
    }

    pub fn go_back(&mut self) -> bool {
        if self.is_submitting() {
            return false;
        }
        let previous = match self.step {
            WorkflowStep::PassengerDetails => WorkflowStep::SeatSelection,
            WorkflowStep::Payment => WorkflowStep::PassengerDetails,
            WorkflowStep::SeatSelection | WorkflowStep::Confirmation => return false,
        };
        self.step = previous;
        true
    }

    /// Write a passenger field for the seat at `selection_index` in pick order
    pub fn set_passenger_field(
        &mut self,
        selection_index: usize,
        field: PassengerField,
        value: &str,
    ) -> bool {
        match self.selected_seats.get(selection_index) {
            Some(&seat) => self.set_passenger_field_for_seat(seat, field, value),
            None => false,
        }
    }

    pub fn set_passenger_field_for_seat(
        &mut self,
        seat: u32,
        field: PassengerField,
        value: &str,
    ) -> bool {
        if self.step != WorkflowStep::PassengerDetails || !self.selected_seats.contains(&seat) {
            return false;
        }
        self.passengers.entry(seat).or_default().set(field, value);
        true
    }

    pub fn choose_payment_method(&mut self, method: PaymentMethod) -> bool {
        if self.step != WorkflowStep::Payment || self.is_submitting() {
            return false;
        }
        self.payment_method = Some(method);
        true
    }

    pub fn compute_total(&self) -> PriceBreakdown {
        pricing::price(self.selected_seats.len(), self.trip.price)
    }

    /// Assemble the booking request and mark the submission pending.
    ///
    /// Returns `None` outside the payment step, without a payment method, or
    /// while another submission is in flight.
    pub fn begin_submission(&mut self) -> Option<BookingSubmission> {
        if self.step != WorkflowStep::Payment || self.is_submitting() {
            return None;
        }
        let payment_method = self.payment_method?;

        let passengers = self
            .selected_seats
            .iter()
            .map(|seat| self.passengers.get(seat).cloned().unwrap_or_default())
            .collect();

        self.submission = SubmissionStatus::Pending;
        self.provisional_code
            .get_or_insert_with(|| format!("SWIFT{}", rand::thread_rng().gen_range(0..1_000_000)));

        Some(BookingSubmission {
            trip_id: self.trip.id,
            seat_numbers: self.selected_seats.clone(),
            passengers,
            total_price: self.compute_total().total,
            payment_method,
        })
    }

    /// Record the backend's answer to a pending submission. Success confirms
    /// the booking; failure leaves the workflow at payment for a retry.
    pub fn complete_submission(
        &mut self,
        outcome: Result<SubmissionReceipt, SubmissionError>,
    ) -> bool {
        if !self.is_submitting() {
            return false;
        }
        match outcome {
            Ok(receipt) => {
                self.confirmation_code = receipt.booking_id.or_else(|| self.provisional_code.clone());
                self.submission = SubmissionStatus::Idle;
                self.step = WorkflowStep::Confirmation;
                tracing::info!(
                    trip_id = self.trip.id,
                    confirmation = ?self.confirmation_code,
                    "Booking confirmed"
                );
            }
            Err(err) => {
                tracing::warn!(trip_id = self.trip.id, error = %err, "Booking submission failed");
                self.submission = SubmissionStatus::Failed(err.0);
            }
        }
        true
    }

    /// Run both submission phases against `submitter`.
    ///
    /// `Ok(false)` means the workflow was not ready to submit.
    pub async fn submit<S: BookingSubmitter>(&mut self, submitter: &S) -> Result<bool, SubmissionError> {
        let Some(submission) = self.begin_submission() else {
            return Ok(false);
        };
        let outcome = submitter.submit_booking(&submission).await;
        let result = outcome.as_ref().map(|_| true).map_err(Clone::clone);
        self.complete_submission(outcome);
        result
    }

    pub fn view(&self) -> WorkflowView {
        let seats = self
            .trip
            .seat_map()
            .into_iter()
            .map(|seat| SeatView {
                number: seat.number,
                available: seat.available,
                selected: self.selected_seats.contains(&seat.number),
            })
            .collect();
        let passengers = self
            .selected_seats
            .iter()
            .map(|&seat| PassengerView {
                seat,
                record: self.passengers.get(&seat).cloned().unwrap_or_default(),
            })
            .collect();

        WorkflowView {
            trip_id: self.trip.id,
            step: self.step,
            requested_passengers: self.requested_passengers,
            seats,
            selected_seats: self.selected_seats.clone(),
            passengers,
            payment_method: self.payment_method,
            price: self.compute_total(),
            can_advance: self.can_advance(),
            submission: self.submission.clone(),
            confirmation_code: self.confirmation_code.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SeatView {
    pub number: u32,
    pub available: bool,
    pub selected: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PassengerView {
    pub seat: u32,
    #[serde(flatten)]
    pub record: PassengerRecord,
}

/// Snapshot of a workflow for rendering
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowView {
    pub trip_id: u32,
    pub step: WorkflowStep,
    pub requested_passengers: usize,
    pub seats: Vec<SeatView>,
    pub selected_seats: Vec<u32>,
    pub passengers: Vec<PassengerView>,
    pub payment_method: Option<PaymentMethod>,
    pub price: PriceBreakdown,
    pub can_advance: bool,
    pub submission: SubmissionStatus,
    pub confirmation_code: Option<String>,
}
