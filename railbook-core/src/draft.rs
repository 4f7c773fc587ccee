use crate::models::Passenger;
use crate::seat::SeatLabel;
use serde::{Deserialize, Serialize};

/// The in-progress booking state for one wizard session.
///
/// Lives from session start until reset; serializes directly into the
/// collaborator's `book` payload, so the wire names below are the
/// collaborator's (camelCase selections, snake_case amount).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookingDraft {
    #[serde(rename = "boardingPoint")]
    pub boarding_point: Option<u32>,

    #[serde(rename = "droppingPoint")]
    pub dropping_point: Option<u32>,

    /// Boarding station name, kept alongside the id for display and for
    /// the prediction payload.
    pub source: String,

    /// Dropping station name.
    pub desti: String,

    /// Insertion order is selection order; no duplicates.
    #[serde(rename = "selectedSeats")]
    pub selected_seats: Vec<SeatLabel>,

    #[serde(rename = "selectedMeals")]
    pub selected_meals: Vec<u32>,

    pub passengers: Vec<Passenger>,

    pub total_amount: i64,
}

impl BookingDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return every field to its empty state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Flip a meal's membership in the selection, preserving the order of
    /// the other entries. Returns whether the meal ended up selected.
    pub fn toggle_meal(&mut self, meal_id: u32) -> bool {
        if let Some(index) = self.selected_meals.iter().position(|&id| id == meal_id) {
            self.selected_meals.remove(index);
            false
        } else {
            self.selected_meals.push(meal_id);
            true
        }
    }

    pub fn has_route(&self) -> bool {
        self.boarding_point.is_some() && self.dropping_point.is_some()
    }

    /// Route-direction invariant: dropping id strictly after boarding id.
    pub fn route_is_forward(&self) -> bool {
        match (self.boarding_point, self.dropping_point) {
            (Some(boarding), Some(dropping)) => boarding < dropping,
            _ => false,
        }
    }

    pub fn seat_count(&self) -> usize {
        self.selected_seats.len()
    }

    /// One complete passenger per selected seat.
    pub fn passengers_complete(&self) -> bool {
        self.passengers.len() == self.selected_seats.len()
            && self.passengers.iter().all(Passenger::is_complete)
    }
}
