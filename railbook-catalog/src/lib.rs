pub mod catalog;
pub mod pricing;
pub mod seatmap;

pub use catalog::CatalogCache;
pub use pricing::{FareBreakdown, FareEngine};
pub use seatmap::{SeatMap, SeatStatus, SeatView};
