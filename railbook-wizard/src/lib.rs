pub mod machine;
pub mod step;

pub use machine::{TransitionError, View, Wizard, WizardOptions};
pub use step::{Step, StepState};
