use std::fmt;

/// Wizard steps in visit order. `Success` is terminal and carries no
/// indicator slot; it is only reachable through a confirmed booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Step {
    Route,
    Seats,
    Meals,
    Passengers,
    Summary,
    Success,
}

impl Step {
    /// The five numbered form steps shown in the progress indicator.
    pub const FORM_STEPS: [Step; 5] = [
        Step::Route,
        Step::Seats,
        Step::Meals,
        Step::Passengers,
        Step::Summary,
    ];

    pub fn number(&self) -> u8 {
        match self {
            Step::Route => 1,
            Step::Seats => 2,
            Step::Meals => 3,
            Step::Passengers => 4,
            Step::Summary => 5,
            Step::Success => 6,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::Route => "Route",
            Step::Seats => "Seats",
            Step::Meals => "Meals",
            Step::Passengers => "Passengers",
            Step::Summary => "Summary",
            Step::Success => "Success",
        };
        write!(f, "{name}")
    }
}

/// Indicator state of one form step relative to the active one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepState {
    Completed,
    Active,
    Upcoming,
}

impl StepState {
    pub fn of(step: Step, active: Step) -> Self {
        if step < active {
            StepState::Completed
        } else if step == active {
            StepState::Active
        } else {
            StepState::Upcoming
        }
    }
}
