use crate::source::RawTrip;
use crate::traffic::{Station, TimeOfDayParser, Trip};

pub fn init() {
    dotenvy::from_filename(".dev.vars").ok();
    env_logger::try_init().ok();
}

/// Station in Cambridge, placement doesn't matter to most tests
pub fn station(id: &str) -> Station {
    Station::new(id, -71.1, 42.36)
}

pub fn raw_trip(start: &str, end: &str, started_at: &str, ended_at: &str) -> RawTrip {
    RawTrip {
        start_station_id: start.to_string(),
        end_station_id: end.to_string(),
        started_at: started_at.to_string(),
        ended_at: ended_at.to_string(),
    }
}

pub fn trip(start: &str, end: &str, started_at: &str, ended_at: &str) -> Trip {
    raw_trip(start, end, started_at, ended_at).into_trip(&TimeOfDayParser::new())
}
