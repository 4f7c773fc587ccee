use async_trait::async_trait;
use chrono::{DateTime, Utc};
use railbook_core::{
    BackendError, BackendService, BookingConfirmation, BookingDetail, BookingDraft, BookingRecord,
    BookingStatus, CancelReceipt, Meal, Passenger, PredictionRequest, PredictionResponse,
    RouteAvailability, SeatLabel, Station,
};
use railbook_core::seat::TOTAL_SEATS;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;
use uuid::Uuid;

/// In-process stand-in for the collaborator service, with its semantics:
/// pre-booked berths, double-book rejection, cancellation frees seats and
/// refunds the stored total. Backs the workspace integration tests and
/// local development.
pub struct MemoryBackend {
    predictor_down: AtomicBool,
    state: Mutex<MemoryState>,
}

struct MemoryState {
    stations: Vec<Station>,
    meals: Vec<Meal>,
    booked_seats: Vec<SeatLabel>,
    bookings: Vec<StoredBooking>,
}

struct StoredBooking {
    booking_id: String,
    boarding_point: u32,
    dropping_point: u32,
    seats: Vec<SeatLabel>,
    meals: Vec<u32>,
    passengers: Vec<Passenger>,
    total_amount: i64,
    booking_time: DateTime<Utc>,
    status: BookingStatus,
    cancelled_at: Option<DateTime<Utc>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::with_booked_seats(
            ["5U", "12U", "2L", "9L", "15L"]
                .iter()
                .map(|s| s.parse().expect("static seat label"))
                .collect(),
        )
    }

    pub fn with_booked_seats(booked_seats: Vec<SeatLabel>) -> Self {
        Self {
            predictor_down: AtomicBool::new(false),
            state: Mutex::new(MemoryState {
                stations: default_stations(),
                meals: default_meals(),
                booked_seats,
                bookings: Vec::new(),
            }),
        }
    }

    /// Simulate a predictor outage: `predict` fails with a transport
    /// error until cleared.
    pub fn set_predictor_down(&self, down: bool) {
        self.predictor_down.store(down, Ordering::SeqCst);
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn default_stations() -> Vec<Station> {
    let rows = [
        (1, "Ahmedabad", "10:00 PM", 50),
        (2, "Nadiad", "11:00 PM", 150),
        (3, "Vadodara", "12:30 AM", 200),
        (4, "Surat", "02:00 AM", 400),
        (5, "Mumbai", "06:00 AM", 800),
    ];
    rows.into_iter()
        .map(|(id, name, time, price)| Station {
            id,
            name: name.to_string(),
            time: time.to_string(),
            price,
        })
        .collect()
}

fn default_meals() -> Vec<Meal> {
    let rows = [
        (1, "Vegetarian Combo", "Rice, Dal, Roti, Sabji, Sweet", 150),
        (2, "Non-Veg Combo", "Rice, Chicken Curry, Roti, Salad", 200),
        (3, "Breakfast Special", "Poha, Tea, Banana", 100),
        (4, "Snack Box", "Sandwich, Chips, Cold Drink", 120),
    ];
    rows.into_iter()
        .map(|(id, name, description, price)| Meal {
            id,
            name: name.to_string(),
            description: description.to_string(),
            price,
        })
        .collect()
}

fn message_for(percentage: f64) -> &'static str {
    if percentage >= 90.0 {
        "Excellent! Very high probability of confirmation"
    } else if percentage >= 80.0 {
        "Good! High probability of confirmation"
    } else if percentage >= 70.0 {
        "Moderate probability of confirmation"
    } else {
        "Lower probability - consider alternative options"
    }
}

#[async_trait]
impl BackendService for MemoryBackend {
    async fn load_stations(&self) -> Result<Vec<Station>, BackendError> {
        Ok(self.state.lock().await.stations.clone())
    }

    async fn load_meals(&self) -> Result<Vec<Meal>, BackendError> {
        Ok(self.state.lock().await.meals.clone())
    }

    async fn load_seats(&self) -> Result<Vec<SeatLabel>, BackendError> {
        Ok(self.state.lock().await.booked_seats.clone())
    }

    async fn check_availability(
        &self,
        boarding: u32,
        dropping: u32,
    ) -> Result<RouteAvailability, BackendError> {
        let state = self.state.lock().await;
        let boarding = state
            .stations
            .iter()
            .find(|s| s.id == boarding)
            .ok_or_else(|| BackendError::Service { message: "Invalid station".to_string() })?;
        let dropping = state
            .stations
            .iter()
            .find(|s| s.id == dropping)
            .ok_or_else(|| BackendError::Service { message: "Invalid station".to_string() })?;

        Ok(RouteAvailability {
            available_seats: TOTAL_SEATS.saturating_sub(state.booked_seats.len()) as u32,
            price_per_seat: dropping.price - boarding.price,
            route: format!("{} to {}", boarding.name, dropping.name),
        })
    }

    async fn predict(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictionResponse, BackendError> {
        if self.predictor_down.load(Ordering::SeqCst) {
            return Err(BackendError::Transport("prediction service offline".to_string()));
        }
        if request.selected_seats.is_empty() {
            return Err(BackendError::Service { message: "No seats selected".to_string() });
        }

        // Deterministic heuristic standing in for the trained model
        let mut percentage = 95.0 - request.selected_seats.len() as f64 * 3.0;
        if !request.selected_meals.is_empty() {
            percentage += 2.0;
        }
        let percentage = percentage.clamp(55.0, 98.0);

        Ok(PredictionResponse {
            prediction_percentage: percentage,
            message: message_for(percentage).to_string(),
        })
    }

    async fn book(&self, draft: &BookingDraft) -> Result<BookingConfirmation, BackendError> {
        let mut state = self.state.lock().await;

        let (boarding_point, dropping_point) = match (draft.boarding_point, draft.dropping_point) {
            (Some(b), Some(d)) => (b, d),
            _ => {
                return Err(BackendError::Service {
                    message: "Boarding and dropping points required".to_string(),
                })
            }
        };

        for &seat in &draft.selected_seats {
            if state.booked_seats.contains(&seat) {
                return Err(BackendError::Service {
                    message: format!("Seat {seat} is already booked"),
                });
            }
        }

        let booking_id = format!("BK{}", Uuid::new_v4().simple());
        state.bookings.push(StoredBooking {
            booking_id: booking_id.clone(),
            boarding_point,
            dropping_point,
            seats: draft.selected_seats.clone(),
            meals: draft.selected_meals.clone(),
            passengers: draft.passengers.clone(),
            total_amount: draft.total_amount,
            booking_time: Utc::now(),
            status: BookingStatus::Confirmed,
            cancelled_at: None,
        });
        state.booked_seats.extend(draft.selected_seats.iter().copied());

        Ok(BookingConfirmation {
            booking_id,
            total_amount: draft.total_amount,
            message: Some("Booking confirmed successfully".to_string()),
        })
    }

    async fn cancel(&self, booking_id: &str) -> Result<CancelReceipt, BackendError> {
        let mut state = self.state.lock().await;

        let index = state
            .bookings
            .iter()
            .position(|b| b.booking_id == booking_id)
            .ok_or_else(|| BackendError::Service { message: "Booking not found".to_string() })?;

        if state.bookings[index].status == BookingStatus::Cancelled {
            return Err(BackendError::Service {
                message: "Booking already cancelled".to_string(),
            });
        }

        let freed = state.bookings[index].seats.clone();
        state.booked_seats.retain(|seat| !freed.contains(seat));

        let booking = &mut state.bookings[index];
        booking.status = BookingStatus::Cancelled;
        booking.cancelled_at = Some(Utc::now());

        Ok(CancelReceipt {
            refund_amount: booking.total_amount,
            message: Some("Booking cancelled successfully".to_string()),
        })
    }

    async fn list_bookings(&self) -> Result<Vec<BookingRecord>, BackendError> {
        let state = self.state.lock().await;

        let station_name = |id: u32| {
            state
                .stations
                .iter()
                .find(|s| s.id == id)
                .map(|s| s.name.clone())
                .unwrap_or_else(|| "N/A".to_string())
        };

        Ok(state
            .bookings
            .iter()
            .map(|booking| {
                let first = booking.passengers.first();
                BookingRecord {
                    booking_id: booking.booking_id.clone(),
                    passenger_name: first
                        .map(|p| p.name.clone())
                        .unwrap_or_else(|| "N/A".to_string()),
                    passenger_contact: first
                        .map(|p| p.phone.clone())
                        .unwrap_or_else(|| "N/A".to_string()),
                    seats: booking.seats.clone(),
                    boarding: station_name(booking.boarding_point),
                    dropping: station_name(booking.dropping_point),
                    total_amount: booking.total_amount,
                    booking_time: Some(booking.booking_time),
                    status: booking.status,
                }
            })
            .collect())
    }

    async fn get_booking(&self, booking_id: &str) -> Result<BookingDetail, BackendError> {
        let state = self.state.lock().await;
        let booking = state
            .bookings
            .iter()
            .find(|b| b.booking_id == booking_id)
            .ok_or_else(|| BackendError::Service { message: "Booking not found".to_string() })?;

        Ok(BookingDetail {
            booking_id: booking.booking_id.clone(),
            boarding_point: booking.boarding_point,
            dropping_point: booking.dropping_point,
            seats: booking.seats.clone(),
            meals: booking.meals.clone(),
            passengers: booking.passengers.clone(),
            total_amount: booking.total_amount,
            booking_time: Some(booking.booking_time),
            status: booking.status,
        })
    }
}
