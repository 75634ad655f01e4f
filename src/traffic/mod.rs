//! Per-station traffic under a time-of-day filter, and the scales that turn
//! it into circle sizes and colours.

pub mod aggregate;
pub mod filter;
pub mod model;
pub mod scale;
pub mod time;

pub use aggregate::aggregate;
pub use filter::{filter_trips, FilterError, TimeFilter};
pub use model::{Station, StationId, StationTraffic, Trip};
pub use scale::Scales;
pub use time::TimeOfDayParser;
