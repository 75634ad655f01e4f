//! Fetching and decoding the two datasets: the station feed and the trip table.

pub mod client;
pub mod entities;
pub mod error;
mod serde_helpers;

pub use client::SourceClient;
pub use entities::RawTrip;
pub use error::SourceError;
