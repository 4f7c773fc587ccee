pub mod backend;
pub mod draft;
pub mod models;
pub mod seat;

pub use backend::{BackendError, BackendService, PredictionRequest, PredictionResponse};
pub use draft::BookingDraft;
pub use models::{
    BookingConfirmation, BookingDetail, BookingRecord, BookingStatus, CancelReceipt, Gender, Meal,
    Passenger, RouteAvailability, Station,
};
pub use seat::{Berth, SeatLabel, SeatLabelError};
