use crate::catalog::CatalogCache;
use railbook_core::BookingDraft;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FareBreakdown {
    pub seat_fare: i64,
    pub meal_fare: i64,
    pub total: i64,
}

/// Deterministic fare derivation from the catalog and the draft.
///
/// Called at summary-display time and again when building the prediction
/// request; both call sites must agree, so this is pure: no clock, no
/// I/O, and stale ids contribute zero instead of failing.
pub struct FareEngine;

impl FareEngine {
    pub fn compute(draft: &BookingDraft, catalog: &CatalogCache) -> FareBreakdown {
        let seats = draft.seat_count() as i64;

        // Absolute value keeps the fare independent of which station has
        // the larger basis; the route-direction guard already enforces a
        // forward segment before this runs.
        let seat_fare = match (draft.boarding_point, draft.dropping_point) {
            (Some(boarding), Some(dropping)) => {
                match (catalog.station(boarding), catalog.station(dropping)) {
                    (Some(b), Some(d)) => (d.price - b.price).abs() * seats,
                    _ => 0,
                }
            }
            _ => 0,
        };

        // Each selected meal is served to every berth: charged per seat.
        let meal_fare: i64 = draft
            .selected_meals
            .iter()
            .filter_map(|&id| catalog.meal(id))
            .map(|meal| meal.price * seats)
            .sum();

        FareBreakdown {
            seat_fare,
            meal_fare,
            total: seat_fare + meal_fare,
        }
    }
}
