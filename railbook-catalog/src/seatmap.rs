use railbook_core::{BookingDraft, SeatLabel};
use serde::Serialize;

/// Visual state of one berth, derived from server occupancy plus the
/// local selection. Server state wins over a stale local selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatStatus {
    Booked,
    Selected,
    Available,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeatView {
    pub label: SeatLabel,
    pub status: SeatStatus,
}

/// Server-confirmed occupancy over the fixed 32-berth coach.
///
/// Refreshed from the collaborator at startup and after every successful
/// booking or cancellation; local selection lives in the draft and is
/// reconciled against this map, never merged into it.
#[derive(Debug, Clone, Default)]
pub struct SeatMap {
    booked: Vec<SeatLabel>,
}

impl SeatMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the occupancy list with the server's.
    pub fn refresh(&mut self, booked: Vec<SeatLabel>) {
        self.booked = booked;
    }

    pub fn is_booked(&self, label: SeatLabel) -> bool {
        self.booked.contains(&label)
    }

    pub fn booked(&self) -> &[SeatLabel] {
        &self.booked
    }

    /// Drop from the draft any selection the server has since booked,
    /// preserving the order of the survivors. Returns the evicted labels.
    pub fn reconcile(&self, draft: &mut BookingDraft) -> Vec<SeatLabel> {
        let mut evicted = Vec::new();
        draft.selected_seats.retain(|&label| {
            if self.is_booked(label) {
                evicted.push(label);
                false
            } else {
                true
            }
        });

        if !evicted.is_empty() {
            tracing::info!(count = evicted.len(), "server occupancy evicted local seat selection");
        }
        evicted
    }

    /// Flip a berth's membership in the draft selection. A booked berth is
    /// a no-op; insertion order of the other members is preserved. Returns
    /// whether the berth ended up selected.
    pub fn toggle(&self, draft: &mut BookingDraft, label: SeatLabel) -> bool {
        if self.is_booked(label) {
            return false;
        }

        if let Some(index) = draft.selected_seats.iter().position(|&l| l == label) {
            draft.selected_seats.remove(index);
            false
        } else {
            draft.selected_seats.push(label);
            true
        }
    }

    /// Pure render over (occupancy, selection): all 32 berths in stable
    /// order with their visual state.
    pub fn render(&self, draft: &BookingDraft) -> Vec<SeatView> {
        SeatLabel::all()
            .map(|label| {
                let status = if self.is_booked(label) {
                    SeatStatus::Booked
                } else if draft.selected_seats.contains(&label) {
                    SeatStatus::Selected
                } else {
                    SeatStatus::Available
                };
                SeatView { label, status }
            })
            .collect()
    }

    /// Presentational split: berths 1..=8 in the left column, 9..=16 in
    /// the right, uppers before lowers in each. Carries no semantics.
    pub fn columns(&self, draft: &BookingDraft) -> (Vec<SeatView>, Vec<SeatView>) {
        self.render(draft)
            .into_iter()
            .partition(|view| view.label.number() <= 8)
    }
}
