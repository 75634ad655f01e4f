use serde::Serialize;

use super::filter::TimeFilter;
use super::model::StationTraffic;

/// Radius range in pixels when every trip is shown
pub const UNFILTERED_RADIUS_RANGE: (f64, f64) = (0.0, 25.0);

/// Radius range in pixels inside a time window, where counts are much smaller
pub const FILTERED_RADIUS_RANGE: (f64, f64) = (3.0, 50.0);

/// Flow ratio given to a station without any traffic
pub const NEUTRAL_FLOW: f64 = 0.5;

const FLOW_BUCKETS: [f64; 3] = [0.0, 0.5, 1.0];

/// Square root scale from total traffic to circle radius, so circle area grows
/// linearly with traffic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RadiusScale {
    domain_max: f64,
    range: (f64, f64),
}

impl RadiusScale {
    pub fn new(domain_max: u32, range: (f64, f64)) -> Self {
        Self {
            domain_max: f64::from(domain_max),
            range,
        }
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    pub fn apply(&self, total_traffic: u32) -> f64 {
        let (low, high) = self.range;
        // An all-zero domain collapses to the low end rather than dividing by zero
        if self.domain_max <= 0.0 {
            return low;
        }
        let t = f64::from(total_traffic).sqrt() / self.domain_max.sqrt();
        low + (high - low) * t
    }
}

/// Quantizes the departure share in `[0, 1]` into thirds
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct FlowScale;

impl FlowScale {
    pub fn apply(&self, ratio: f64) -> f64 {
        let ratio = ratio.clamp(0.0, 1.0);
        let bucket = if ratio < 1.0 / 3.0 {
            0
        } else if ratio < 2.0 / 3.0 {
            1
        } else {
            2
        };
        FLOW_BUCKETS[bucket]
    }

    /// Bucketed `departures / total_traffic`. Idle stations get [`NEUTRAL_FLOW`].
    pub fn flow_ratio(&self, traffic: &StationTraffic) -> f64 {
        if traffic.total_traffic() == 0 {
            return NEUTRAL_FLOW;
        }
        self.apply(f64::from(traffic.departures()) / f64::from(traffic.total_traffic()))
    }
}

/// Both visual encodings for one set of aggregated stations
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scales {
    pub radius: RadiusScale,
    pub flow: FlowScale,
}

impl Scales {
    pub fn derive(stations: &[StationTraffic], filter: TimeFilter) -> Self {
        let max_traffic = stations
            .iter()
            .map(StationTraffic::total_traffic)
            .max()
            .unwrap_or(0);
        let range = if filter.is_filtered() {
            FILTERED_RADIUS_RANGE
        } else {
            UNFILTERED_RADIUS_RANGE
        };

        Self {
            radius: RadiusScale::new(max_traffic, range),
            flow: FlowScale,
        }
    }
}
