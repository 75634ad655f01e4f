use serde::Deserialize;

use super::serde_helpers::MaybeStringWrapped;
use crate::traffic::{Station, TimeOfDayParser, Trip};

/// Station information feed, the stations sit under `data.stations`
#[derive(Deserialize, Debug)]
pub struct StationFeed {
    pub data: StationFeedData,
}

#[derive(Deserialize, Debug)]
pub struct StationFeedData {
    pub stations: Vec<RawStation>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct RawStation {
    #[serde(default)]
    pub short_name: String,
    pub name: Option<String>,
    pub capacity: Option<serde_json::Value>,
    pub lon: Option<MaybeStringWrapped<f64>>,
    pub lat: Option<MaybeStringWrapped<f64>>,
}

impl RawStation {
    /// `None` when the record has no short name to join trips on.
    /// Unreadable coordinates still give a station, just one without a location.
    ///
    /// The short name is kept exactly as sent, trip ids are matched against it verbatim.
    pub fn into_station(self) -> Option<Station> {
        if self.short_name.trim().is_empty() {
            return None;
        }

        let coord = |c: Option<MaybeStringWrapped<f64>>| {
            c.and_then(|c| c.into_inner().ok()).unwrap_or(f64::NAN)
        };
        let mut station = Station::new(self.short_name, coord(self.lon), coord(self.lat));
        station.name = self.name;
        station.capacity = self
            .capacity
            .and_then(|c| c.as_u64())
            .and_then(|c| u32::try_from(c).ok());
        Some(station)
    }
}

/// One row of the trip table. Other columns (`ride_id`, `bike_type`, ...) are ignored.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct RawTrip {
    pub start_station_id: String,
    pub end_station_id: String,
    pub started_at: String,
    pub ended_at: String,
}

impl RawTrip {
    pub fn into_trip(self, parser: &TimeOfDayParser) -> Trip {
        Trip {
            started_at: parser.parse(&self.started_at),
            ended_at: parser.parse(&self.ended_at),
            start_station_id: self.start_station_id.into(),
            end_station_id: self.end_station_id.into(),
        }
    }
}
