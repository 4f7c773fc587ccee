use crate::step::{Step, StepState};
use railbook_core::{BookingConfirmation, BookingDraft, Passenger, Station};

/// Behavior knobs for one wizard instance.
#[derive(Debug, Clone, Copy, Default)]
pub struct WizardOptions {
    /// Clear the draft when returning to the first step. Off by default:
    /// re-entering the flow resumes prior selections.
    pub reset_draft_on_home: bool,
}

/// What is currently on screen: a form step, or the out-of-band bookings
/// list reachable from the first step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Step(Step),
    Bookings,
}

/// Guard failures. The transition is aborted, the active step stays put,
/// and the `Display` text is the user-facing message.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Please select boarding and dropping points")]
    RouteNotSelected,

    #[error("Dropping point must be after boarding point")]
    InvalidRouteDirection,

    #[error("Please select at least one seat")]
    NoSeatsSelected,

    #[error("Please fill all passenger details")]
    IncompletePassengerDetails,

    #[error("Booking success is only reachable through a confirmed booking")]
    SuccessNotReachable,

    #[error("Booking can only be completed from the summary step")]
    NotOnSummary,

    #[error("Bookings are only reachable from the first step")]
    BookingsUnavailable,
}

/// The 6-step booking flow with guarded transitions.
///
/// Owns the draft for its session; collaborators receive it by reference
/// instead of reaching for shared globals.
#[derive(Debug)]
pub struct Wizard {
    step: Step,
    viewing_bookings: bool,
    draft: BookingDraft,
    options: WizardOptions,
}

impl Wizard {
    pub fn new(options: WizardOptions) -> Self {
        Self {
            step: Step::Route,
            viewing_bookings: false,
            draft: BookingDraft::new(),
            options,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn view(&self) -> View {
        if self.viewing_bookings {
            View::Bookings
        } else {
            View::Step(self.step)
        }
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut BookingDraft {
        &mut self.draft
    }

    /// Record the boarding halt (id plus display name); `None` clears it.
    pub fn set_boarding(&mut self, station: Option<&Station>) {
        self.draft.boarding_point = station.map(|s| s.id);
        self.draft.source = station.map(|s| s.name.clone()).unwrap_or_default();
    }

    pub fn set_dropping(&mut self, station: Option<&Station>) {
        self.draft.dropping_point = station.map(|s| s.id);
        self.draft.desti = station.map(|s| s.name.clone()).unwrap_or_default();
    }

    pub fn toggle_meal(&mut self, meal_id: u32) -> bool {
        self.draft.toggle_meal(meal_id)
    }

    /// Move to a target step, enforcing its entry guard. On failure the
    /// active step is unchanged and the draft untouched.
    pub fn go_to(&mut self, target: Step) -> Result<(), TransitionError> {
        match target {
            Step::Route => {}
            Step::Seats => {
                if !self.draft.has_route() {
                    return Err(TransitionError::RouteNotSelected);
                }
                if !self.draft.route_is_forward() {
                    return Err(TransitionError::InvalidRouteDirection);
                }
            }
            Step::Meals => {
                if self.draft.selected_seats.is_empty() {
                    return Err(TransitionError::NoSeatsSelected);
                }
            }
            Step::Passengers => {
                self.scaffold_passengers();
            }
            Step::Summary => {
                if !self.draft.passengers_complete() {
                    return Err(TransitionError::IncompletePassengerDetails);
                }
            }
            Step::Success => return Err(TransitionError::SuccessNotReachable),
        }

        tracing::debug!(from = %self.step, to = %target, "wizard step transition");
        self.viewing_bookings = false;
        self.step = target;
        Ok(())
    }

    /// Enter the terminal step. Requires a confirmation from a successful
    /// submission and an active summary step.
    pub fn complete_booking(
        &mut self,
        confirmation: &BookingConfirmation,
    ) -> Result<(), TransitionError> {
        if self.viewing_bookings || self.step != Step::Summary {
            return Err(TransitionError::NotOnSummary);
        }

        tracing::info!(booking_id = %confirmation.booking_id, "booking confirmed, entering success step");
        self.step = Step::Success;
        Ok(())
    }

    /// Indicator for the five form steps relative to the active one.
    pub fn step_states(&self) -> [(Step, StepState); 5] {
        Step::FORM_STEPS.map(|step| (step, StepState::of(step, self.step)))
    }

    /// Open the bookings list view; only offered on the first step.
    pub fn show_bookings(&mut self) -> Result<(), TransitionError> {
        if self.step != Step::Route || self.viewing_bookings {
            return Err(TransitionError::BookingsUnavailable);
        }
        self.viewing_bookings = true;
        Ok(())
    }

    /// Return from the bookings list to the first step without touching
    /// the draft.
    pub fn close_bookings(&mut self) {
        self.viewing_bookings = false;
    }

    /// Return the display to the first step. The draft survives unless
    /// the wizard was configured to reset it here.
    pub fn back_to_home(&mut self) {
        self.viewing_bookings = false;
        self.step = Step::Route;
        if self.options.reset_draft_on_home {
            self.draft.reset();
        }
    }

    /// One form per selected seat, in selection order. Entries already
    /// filled in for a still-selected seat are kept; seats added or
    /// removed since the last visit get fresh scaffolds or drop out.
    fn scaffold_passengers(&mut self) {
        let existing = std::mem::take(&mut self.draft.passengers);
        let scaffolds = self
            .draft
            .selected_seats
            .iter()
            .map(|&seat| {
                existing
                    .iter()
                    .find(|p| p.seat == seat)
                    .cloned()
                    .unwrap_or_else(|| Passenger::scaffold(seat))
            })
            .collect();
        self.draft.passengers = scaffolds;
    }
}
