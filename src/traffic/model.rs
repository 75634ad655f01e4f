use std::fmt;
use std::sync::Arc;

use geo::Point;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use super::time::MinuteOfDay;

/// Station short name, the key trips use to reference their endpoints
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StationId(Arc<str>);

impl StationId {
    pub fn new(id: &str) -> Self {
        Self(Arc::from(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StationId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for StationId {
    fn from(id: String) -> Self {
        Self(Arc::from(id))
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for StationId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// A dock as loaded from the station feed. Never changes after load.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    pub short_name: StationId,
    pub name: Option<String>,
    pub capacity: Option<u32>,
    /// `None` when the feed had no usable coordinates
    pub location: Option<Point<f64>>,
}

impl Station {
    pub fn new(short_name: impl Into<StationId>, lon: f64, lat: f64) -> Self {
        let location = (lon.is_finite() && lat.is_finite()).then(|| Point::new(lon, lat));
        Self {
            short_name: short_name.into(),
            name: None,
            capacity: None,
            location,
        }
    }

    pub fn lon(&self) -> Option<f64> {
        self.location.map(|p| p.x())
    }

    pub fn lat(&self) -> Option<f64> {
        self.location.map(|p| p.y())
    }
}

impl Serialize for Station {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Station", 5)?;
        state.serialize_field("shortName", &self.short_name)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("capacity", &self.capacity)?;
        state.serialize_field("lon", &self.lon())?;
        state.serialize_field("lat", &self.lat())?;
        state.end()
    }
}

/// One rental. Times are `None` when the timestamp could not be read, such a
/// trip still counts when unfiltered but never falls inside a time window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trip {
    pub start_station_id: StationId,
    pub end_station_id: StationId,
    pub started_at: Option<MinuteOfDay>,
    pub ended_at: Option<MinuteOfDay>,
}

/// A station annotated with its traffic under the active filter.
///
/// Only built through [`StationTraffic::new`] so `total_traffic` always equals
/// `departures + arrivals`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StationTraffic {
    #[serde(flatten)]
    station: Station,
    departures: u32,
    arrivals: u32,
    total_traffic: u32,
}

impl StationTraffic {
    pub fn new(station: Station, departures: u32, arrivals: u32) -> Self {
        Self {
            station,
            departures,
            arrivals,
            total_traffic: departures.saturating_add(arrivals),
        }
    }

    pub fn station(&self) -> &Station {
        &self.station
    }

    pub fn departures(&self) -> u32 {
        self.departures
    }

    pub fn arrivals(&self) -> u32 {
        self.arrivals
    }

    pub fn total_traffic(&self) -> u32 {
        self.total_traffic
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_invalid_coordinates_have_no_location() {
        assert!(Station::new("A", -71.1, 42.36).location.is_some());
        assert!(Station::new("B", f64::NAN, 42.36).location.is_none());
        assert!(Station::new("C", -71.1, f64::INFINITY).location.is_none());
    }

    #[test]
    fn test_traffic_total() {
        let traffic = StationTraffic::new(Station::new("A", -71.1, 42.36), 3, 4);
        assert_eq!(traffic.total_traffic(), 7);
    }

    #[test]
    fn test_traffic_total_saturates() {
        let traffic = StationTraffic::new(Station::new("A", -71.1, 42.36), u32::MAX, 1);
        assert_eq!(traffic.total_traffic(), u32::MAX);
    }

    #[test]
    fn test_serialize_station_traffic() {
        let traffic = StationTraffic::new(Station::new("A32", -71.1, 42.36), 1, 2);
        let json = serde_json::to_value(&traffic).unwrap();

        assert_eq!(json["shortName"], "A32");
        assert_eq!(json["lon"], -71.1);
        assert_eq!(json["lat"], 42.36);
        assert_eq!(json["departures"], 1);
        assert_eq!(json["arrivals"], 2);
        assert_eq!(json["totalTraffic"], 3);
    }
}
