use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::TripOffering;
use crate::error::{AppError, AppResult};
use crate::models::booking::BookingRecord;
use crate::services::booking::BookingService;
use crate::utils::jwt::AuthContext;
use crate::workflow::{BookingSubmitter, BookingWorkflow, PassengerField, PaymentMethod, WorkflowView};
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenSessionRequest {
    pub bus_id: u32,
    pub passengers: u32,
}

#[derive(Debug, Deserialize)]
pub struct PassengerFieldRequest {
    pub field: PassengerField,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct PaymentMethodRequest {
    pub method: PaymentMethod,
}

/// Workflow snapshot plus whether the last action changed anything
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub changed: bool,
    #[serde(flatten)]
    pub workflow: WorkflowView,
}

// ============ Booking Sessions ============

/// Open the booking view for one bus
pub async fn open_session(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<OpenSessionRequest>,
) -> AppResult<Json<SessionResponse>> {
    let listing = state
        .catalog
        .find(payload.bus_id)
        .ok_or_else(|| AppError::NotFound("Bus not found".to_string()))?;

    if payload.passengers == 0 {
        return Err(AppError::BadRequest(
            "Must book at least 1 seat".to_string(),
        ));
    }
    if payload.passengers > listing.available {
        return Err(AppError::BadRequest(format!(
            "Only {} seats available",
            listing.available
        )));
    }

    let workflow = BookingWorkflow::new(TripOffering::from(listing), payload.passengers);
    let (session_id, view) = state.sessions.open(&auth.claims.sub, workflow).await;

    Ok(Json(SessionResponse {
        session_id,
        changed: true,
        workflow: view,
    }))
}

/// Apply `action` to the caller's session and answer with the new snapshot
async fn act(
    state: &AppState,
    auth: &AuthContext,
    session_id: Uuid,
    action: impl FnOnce(&mut BookingWorkflow) -> bool,
) -> AppResult<Json<SessionResponse>> {
    let (changed, workflow) = state
        .sessions
        .with_session(session_id, &auth.claims.sub, |w| {
            let changed = action(w);
            (changed, w.view())
        })
        .await?;

    Ok(Json(SessionResponse {
        session_id,
        changed,
        workflow,
    }))
}

pub async fn get_session(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(session_id): Path<Uuid>,
) -> AppResult<Json<SessionResponse>> {
    act(&state, &auth, session_id, |_| false).await
}

/// Navigate away from the booking view
pub async fn close_session(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(session_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    state.sessions.close(session_id, &auth.claims.sub).await?;
    Ok(Json(serde_json::json!({ "message": "Booking session closed" })))
}

/// Toggle a seat in the selection
pub async fn toggle_seat(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((session_id, seat)): Path<(Uuid, u32)>,
) -> AppResult<Json<SessionResponse>> {
    act(&state, &auth, session_id, |w| w.select_seat(seat)).await
}

/// Write one passenger field, addressed by position in the seat selection
pub async fn set_passenger_field(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((session_id, index)): Path<(Uuid, usize)>,
    Json(payload): Json<PassengerFieldRequest>,
) -> AppResult<Json<SessionResponse>> {
    act(&state, &auth, session_id, |w| {
        w.set_passenger_field(index, payload.field, &payload.value)
    })
    .await
}

pub async fn advance(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(session_id): Path<Uuid>,
) -> AppResult<Json<SessionResponse>> {
    act(&state, &auth, session_id, BookingWorkflow::advance).await
}

pub async fn go_back(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(session_id): Path<Uuid>,
) -> AppResult<Json<SessionResponse>> {
    act(&state, &auth, session_id, BookingWorkflow::go_back).await
}

pub async fn choose_payment_method(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(session_id): Path<Uuid>,
    Json(payload): Json<PaymentMethodRequest>,
) -> AppResult<Json<SessionResponse>> {
    act(&state, &auth, session_id, |w| w.choose_payment_method(payload.method)).await
}

/// Pay and confirm. The backend call runs without holding the session lock;
/// a failure leaves the session at payment with the error recorded. A
/// confirmed session is discarded once its final snapshot is returned.
pub async fn submit(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(session_id): Path<Uuid>,
) -> AppResult<Json<SessionResponse>> {
    let submission = state
        .sessions
        .with_session(session_id, &auth.claims.sub, BookingWorkflow::begin_submission)
        .await?;

    let Some(submission) = submission else {
        return act(&state, &auth, session_id, |_| false).await;
    };

    tracing::info!(
        session_id = %session_id,
        trip_id = submission.trip_id,
        seats = ?submission.seat_numbers,
        total = submission.total_price,
        "Submitting booking"
    );
    let outcome = BookingService::new(state.api.with_token(&auth.token))
        .submit_booking(&submission)
        .await;
    let receipt = outcome.as_ref().ok().cloned();

    let response = act(&state, &auth, session_id, |w| w.complete_submission(outcome)).await;
    if let (Some(receipt), Err(err)) = (&receipt, &response) {
        tracing::error!(
            session_id = %session_id,
            booking_id = ?receipt.booking_id,
            error = %err,
            "Backend accepted a booking for a session that is gone"
        );
    }
    response
}

// ============ Booking History ============

/// List the caller's bookings
pub async fn my_bookings(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> AppResult<Json<Vec<BookingRecord>>> {
    let bookings = BookingService::new(state.api.with_token(&auth.token))
        .user_bookings(&auth.claims.sub)
        .await?;
    Ok(Json(bookings))
}
