use crate::seat::SeatLabel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A halt on the route. Route order is implied by ascending id; `price`
/// is the monotonic fare basis along the line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: u32,
    pub name: String,
    pub time: String,
    pub price: i64,
}

/// A meal option servable to every selected berth
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub price: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// One traveller per selected berth, in selection order. Scaffolds start
/// empty and become complete once every field passes validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passenger {
    pub seat: SeatLabel,
    pub name: String,
    pub age: Option<u8>,
    pub gender: Option<Gender>,
    pub phone: String,
    pub email: String,
}

impl Passenger {
    pub fn scaffold(seat: SeatLabel) -> Self {
        Self {
            seat,
            name: String::new(),
            age: None,
            gender: None,
            phone: String::new(),
            email: String::new(),
        }
    }

    /// All fields present and plausible: non-empty name, age in 1..=120,
    /// gender chosen, 10-digit phone, email with an `@`.
    pub fn is_complete(&self) -> bool {
        let age_ok = matches!(self.age, Some(age) if (1..=120).contains(&age));
        let phone_ok = self.phone.len() == 10 && self.phone.chars().all(|c| c.is_ascii_digit());
        let email_ok = self.email.contains('@');

        !self.name.trim().is_empty() && age_ok && self.gender.is_some() && phone_ok && email_ok
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
}

/// One row of the bookings list view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRecord {
    pub booking_id: String,
    pub passenger_name: String,
    pub passenger_contact: String,
    pub seats: Vec<SeatLabel>,
    pub boarding: String,
    pub dropping: String,
    pub total_amount: i64,
    pub booking_time: Option<DateTime<Utc>>,
    pub status: BookingStatus,
}

impl BookingRecord {
    /// Cancelled bookings offer no cancel action.
    pub fn can_cancel(&self) -> bool {
        self.status == BookingStatus::Confirmed
    }
}

/// Full stored state of one booking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingDetail {
    pub booking_id: String,
    pub boarding_point: u32,
    pub dropping_point: u32,
    pub seats: Vec<SeatLabel>,
    pub meals: Vec<u32>,
    pub passengers: Vec<Passenger>,
    pub total_amount: i64,
    pub booking_time: Option<DateTime<Utc>>,
    pub status: BookingStatus,
}

/// Returned by a successful submission. Holding one is the only way into
/// the wizard's terminal step.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingConfirmation {
    pub booking_id: String,
    pub total_amount: i64,
    pub message: Option<String>,
}

/// Receipt for a completed cancellation
#[derive(Debug, Clone, PartialEq)]
pub struct CancelReceipt {
    pub refund_amount: i64,
    pub message: Option<String>,
}

/// Availability probe for a travel segment
#[derive(Debug, Clone, PartialEq)]
pub struct RouteAvailability {
    pub available_seats: u32,
    pub price_per_seat: i64,
    pub route: String,
}
