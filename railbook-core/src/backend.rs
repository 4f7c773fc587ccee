use crate::draft::BookingDraft;
use crate::models::{
    BookingConfirmation, BookingDetail, BookingRecord, CancelReceipt, Meal, RouteAvailability,
    Station,
};
use crate::seat::SeatLabel;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Confirmation-probability request, shaped as the collaborator expects
/// it: station *names* for the segment, labels for seats, ids for meals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRequest {
    #[serde(rename = "selectedSeats")]
    pub selected_seats: Vec<SeatLabel>,

    #[serde(rename = "boardingPoint")]
    pub boarding_point: String,

    #[serde(rename = "droppingPoint")]
    pub dropping_point: String,

    #[serde(rename = "selectedMeals")]
    pub selected_meals: Vec<u32>,

    #[serde(rename = "totalAmount")]
    pub total_amount: i64,
}

/// Raw predictor answer. The percentage may carry decimals on the wire;
/// consumers round and clamp into 0..=100.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PredictionResponse {
    pub prediction_percentage: f64,
    pub message: String,
}

/// The seam to the collaborator service holding stations, meals, seat
/// occupancy, bookings, and the confirmation predictor.
///
/// Implementations: the HTTP client against the real service, and an
/// in-memory stand-in with the same semantics for tests and local runs.
#[async_trait]
pub trait BackendService: Send + Sync {
    async fn load_stations(&self) -> Result<Vec<Station>, BackendError>;

    async fn load_meals(&self) -> Result<Vec<Meal>, BackendError>;

    /// The server-confirmed occupancy list. Authoritative: local state is
    /// replaced by it, never merged with it.
    async fn load_seats(&self) -> Result<Vec<SeatLabel>, BackendError>;

    async fn check_availability(
        &self,
        boarding: u32,
        dropping: u32,
    ) -> Result<RouteAvailability, BackendError>;

    async fn predict(&self, request: &PredictionRequest)
        -> Result<PredictionResponse, BackendError>;

    async fn book(&self, draft: &BookingDraft) -> Result<BookingConfirmation, BackendError>;

    async fn cancel(&self, booking_id: &str) -> Result<CancelReceipt, BackendError>;

    async fn list_bookings(&self) -> Result<Vec<BookingRecord>, BackendError>;

    async fn get_booking(&self, booking_id: &str) -> Result<BookingDetail, BackendError>;
}

/// Failure taxonomy for collaborator calls.
///
/// Transport failures are always recovered locally (fallback prediction,
/// empty catalog); service failures carry the server's message; invalid
/// responses cover a missing `success` flag or an undecodable body.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("{message}")]
    Service { message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl BackendError {
    /// Business failure with the server-provided message, or the generic
    /// fallback when the server omitted one.
    pub fn service(message: Option<String>, fallback: &str) -> Self {
        BackendError::Service {
            message: message.unwrap_or_else(|| fallback.to_string()),
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, BackendError::Transport(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_error_falls_back_to_generic_message() {
        let err = BackendError::service(None, "Booking failed");
        assert_eq!(err.to_string(), "Booking failed");

        let err = BackendError::service(Some("Seat 5U is already booked".to_string()), "Booking failed");
        assert_eq!(err.to_string(), "Seat 5U is already booked");
    }

    #[test]
    fn test_prediction_request_wire_names() {
        let request = PredictionRequest {
            selected_seats: vec!["1U".parse().unwrap()],
            boarding_point: "Ahmedabad".to_string(),
            dropping_point: "Surat".to_string(),
            selected_meals: vec![2],
            total_amount: 550,
        };

        let payload = serde_json::to_value(&request).unwrap();
        assert_eq!(payload["boardingPoint"], "Ahmedabad");
        assert_eq!(payload["droppingPoint"], "Surat");
        assert_eq!(payload["selectedSeats"][0], "1U");
        assert_eq!(payload["selectedMeals"][0], 2);
        assert_eq!(payload["totalAmount"], 550);
    }
}
