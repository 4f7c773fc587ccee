use crate::config::BackendConfig;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use railbook_core::{
    BackendError, BackendService, BookingConfirmation, BookingDetail, BookingDraft, BookingRecord,
    BookingStatus, CancelReceipt, Meal, Passenger, PredictionRequest, PredictionResponse,
    RouteAvailability, SeatLabel, Station,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

/// HTTP implementation of the backend seam, speaking the collaborator's
/// JSON dialect. Every endpoint hangs off one configurable base path.
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, BackendError> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        decode(response).await
    }

    async fn post_json<B: serde::Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, BackendError> {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        decode(response).await
    }

    async fn delete_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, BackendError> {
        let response = self
            .client
            .delete(self.url(path))
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        decode(response).await
    }
}

/// Decode a JSON body regardless of HTTP status: the collaborator carries
/// business failures as `success:false` bodies on 4xx responses.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, BackendError> {
    let status = response.status();
    response
        .json::<T>()
        .await
        .map_err(|e| BackendError::InvalidResponse(format!("{status}: {e}")))
}

/// Enforce the `success` envelope where the contract expects one.
fn ensure_success(
    success: Option<bool>,
    message: Option<String>,
    fallback: &str,
    what: &str,
) -> Result<(), BackendError> {
    match success {
        Some(true) => Ok(()),
        Some(false) => Err(BackendError::service(message, fallback)),
        None => Err(BackendError::InvalidResponse(format!(
            "{what} response missing success flag"
        ))),
    }
}

/// Lenient seat-label parse: occupancy data may carry labels from an
/// older, larger coach layout; those can never match a real berth, so
/// they are dropped at the boundary.
fn parse_seats(raw: Vec<String>) -> Vec<SeatLabel> {
    raw.into_iter()
        .filter_map(|label| match label.parse() {
            Ok(label) => Some(label),
            Err(_) => {
                tracing::debug!(label, "ignoring seat label outside the coach universe");
                None
            }
        })
        .collect()
}

/// The collaborator stamps bookings with a timezone-naive ISO timestamp;
/// newer deployments send RFC 3339. Accept both, drop the rest.
fn parse_booking_time(raw: Option<String>) -> Option<DateTime<Utc>> {
    let raw = raw?;
    if let Ok(dt) = DateTime::parse_from_rfc3339(&raw) {
        return Some(dt.with_timezone(&Utc));
    }
    raw.parse::<NaiveDateTime>().ok().map(|naive| naive.and_utc())
}

#[derive(Deserialize)]
struct StationsEnvelope {
    success: Option<bool>,
    message: Option<String>,
    #[serde(default)]
    stations: Vec<Station>,
}

#[derive(Deserialize)]
struct MealsEnvelope {
    success: Option<bool>,
    message: Option<String>,
    #[serde(default)]
    meals: Vec<Meal>,
}

#[derive(Deserialize)]
struct SeatsEnvelope {
    #[serde(default)]
    booked_seats: Vec<String>,
}

#[derive(Deserialize)]
struct AvailabilityEnvelope {
    success: Option<bool>,
    message: Option<String>,
    available_seats: Option<u32>,
    price_per_seat: Option<i64>,
    route: Option<String>,
}

#[derive(Deserialize)]
struct PredictEnvelope {
    success: Option<bool>,
    message: Option<String>,
    prediction_percentage: Option<f64>,
}

#[derive(Deserialize)]
struct BookEnvelope {
    success: Option<bool>,
    message: Option<String>,
    booking_id: Option<String>,
    total_price: Option<i64>,
}

#[derive(Deserialize)]
struct CancelEnvelope {
    success: Option<bool>,
    message: Option<String>,
    refund_amount: Option<i64>,
}

#[derive(Deserialize)]
struct BookingsEnvelope {
    #[serde(default)]
    bookings: Vec<WireBookingRecord>,
}

#[derive(Deserialize)]
struct BookingEnvelope {
    success: Option<bool>,
    message: Option<String>,
    booking: Option<WireBookingDetail>,
}

#[derive(Debug, Deserialize)]
struct WireBookingRecord {
    booking_id: String,
    #[serde(default)]
    passenger_name: String,
    #[serde(default)]
    passenger_contact: String,
    #[serde(default)]
    seats: Vec<String>,
    #[serde(default)]
    boarding: String,
    #[serde(default)]
    dropping: String,
    #[serde(default)]
    total_amount: i64,
    booking_time: Option<String>,
    status: BookingStatus,
}

impl From<WireBookingRecord> for BookingRecord {
    fn from(wire: WireBookingRecord) -> Self {
        BookingRecord {
            booking_id: wire.booking_id,
            passenger_name: wire.passenger_name,
            passenger_contact: wire.passenger_contact,
            seats: parse_seats(wire.seats),
            boarding: wire.boarding,
            dropping: wire.dropping,
            total_amount: wire.total_amount,
            booking_time: parse_booking_time(wire.booking_time),
            status: wire.status,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireBookingDetail {
    booking_id: String,
    boarding_point: u32,
    dropping_point: u32,
    #[serde(default)]
    seats: Vec<String>,
    #[serde(default)]
    meals: Vec<u32>,
    #[serde(default)]
    passengers: Vec<Passenger>,
    #[serde(default)]
    total_price: i64,
    booking_time: Option<String>,
    status: BookingStatus,
}

impl From<WireBookingDetail> for BookingDetail {
    fn from(wire: WireBookingDetail) -> Self {
        BookingDetail {
            booking_id: wire.booking_id,
            boarding_point: wire.boarding_point,
            dropping_point: wire.dropping_point,
            seats: parse_seats(wire.seats),
            meals: wire.meals,
            passengers: wire.passengers,
            total_amount: wire.total_price,
            booking_time: parse_booking_time(wire.booking_time),
            status: wire.status,
        }
    }
}

#[async_trait]
impl BackendService for HttpBackend {
    async fn load_stations(&self) -> Result<Vec<Station>, BackendError> {
        let envelope: StationsEnvelope = self.get_json("stations").await?;
        ensure_success(
            envelope.success,
            envelope.message,
            "Failed to load stations",
            "stations",
        )?;
        Ok(envelope.stations)
    }

    async fn load_meals(&self) -> Result<Vec<Meal>, BackendError> {
        let envelope: MealsEnvelope = self.get_json("meals").await?;
        ensure_success(envelope.success, envelope.message, "Failed to load meals", "meals")?;
        Ok(envelope.meals)
    }

    async fn load_seats(&self) -> Result<Vec<SeatLabel>, BackendError> {
        let envelope: SeatsEnvelope = self.get_json("seats").await?;
        Ok(parse_seats(envelope.booked_seats))
    }

    async fn check_availability(
        &self,
        boarding: u32,
        dropping: u32,
    ) -> Result<RouteAvailability, BackendError> {
        let path = format!("availability?boarding={boarding}&dropping={dropping}");
        let envelope: AvailabilityEnvelope = self.get_json(&path).await?;
        ensure_success(
            envelope.success,
            envelope.message,
            "Availability check failed",
            "availability",
        )?;

        Ok(RouteAvailability {
            available_seats: envelope.available_seats.unwrap_or(0),
            price_per_seat: envelope.price_per_seat.unwrap_or(0),
            route: envelope.route.unwrap_or_default(),
        })
    }

    async fn predict(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictionResponse, BackendError> {
        let envelope: PredictEnvelope = self.post_json("predict", request).await?;
        if envelope.success == Some(false) {
            return Err(BackendError::service(envelope.message, "Prediction failed"));
        }

        let percentage = envelope.prediction_percentage.ok_or_else(|| {
            BackendError::InvalidResponse("predict response missing prediction_percentage".to_string())
        })?;
        Ok(PredictionResponse {
            prediction_percentage: percentage,
            message: envelope.message.unwrap_or_default(),
        })
    }

    async fn book(&self, draft: &BookingDraft) -> Result<BookingConfirmation, BackendError> {
        let envelope: BookEnvelope = self.post_json("book", draft).await?;
        ensure_success(
            envelope.success,
            envelope.message.clone(),
            "Booking failed",
            "book",
        )?;

        let booking_id = envelope.booking_id.ok_or_else(|| {
            BackendError::InvalidResponse("book response missing booking_id".to_string())
        })?;
        Ok(BookingConfirmation {
            booking_id,
            total_amount: envelope.total_price.unwrap_or(draft.total_amount),
            message: envelope.message,
        })
    }

    async fn cancel(&self, booking_id: &str) -> Result<CancelReceipt, BackendError> {
        let envelope: CancelEnvelope = self.delete_json(&format!("cancel/{booking_id}")).await?;
        ensure_success(
            envelope.success,
            envelope.message.clone(),
            "Failed to cancel booking",
            "cancel",
        )?;

        Ok(CancelReceipt {
            refund_amount: envelope.refund_amount.unwrap_or(0),
            message: envelope.message,
        })
    }

    async fn list_bookings(&self) -> Result<Vec<BookingRecord>, BackendError> {
        let envelope: BookingsEnvelope = self.get_json("bookings").await?;
        Ok(envelope.bookings.into_iter().map(Into::into).collect())
    }

    async fn get_booking(&self, booking_id: &str) -> Result<BookingDetail, BackendError> {
        let envelope: BookingEnvelope = self.get_json(&format!("booking/{booking_id}")).await?;
        ensure_success(
            envelope.success,
            envelope.message,
            "Failed to load booking",
            "booking",
        )?;

        envelope
            .booking
            .map(Into::into)
            .ok_or_else(|| BackendError::InvalidResponse("booking response missing body".to_string()))
    }
}
