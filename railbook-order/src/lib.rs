pub mod orchestrator;
pub mod prediction;
pub mod session;

pub use orchestrator::{BookingError, BookingOrchestrator, CancelOutcome, Confirmation};
pub use prediction::Prediction;
pub use session::BookingSession;
