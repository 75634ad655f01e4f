use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::model::Trip;
use super::time::MinuteOfDay;

/// Half-width of the time window, inclusive on both sides
pub const WINDOW_MINUTES: u16 = 60;

/// Wire value meaning "no filter"
pub const ANY_TIME: i32 = -1;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum FilterError {
    #[error("Time filter must be -1 or a minute of the day in 0..=1439, got {0}")]
    OutOfRange(i32),
}

/// The slider value: every trip, or those touching a window around a minute of the day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum TimeFilter {
    #[default]
    Any,
    Around(MinuteOfDay),
}

impl TimeFilter {
    pub fn is_filtered(&self) -> bool {
        matches!(self, TimeFilter::Around(_))
    }

    /// Whether a trip starts or ends within [`WINDOW_MINUTES`] of the filter time
    pub fn matches(&self, trip: &Trip) -> bool {
        match self {
            TimeFilter::Any => true,
            TimeFilter::Around(at) => {
                let near = |t: Option<MinuteOfDay>| t.is_some_and(|t| t.distance(*at) <= WINDOW_MINUTES);
                near(trip.started_at) || near(trip.ended_at)
            }
        }
    }

    /// Slider readout
    pub fn label(&self) -> String {
        match self {
            TimeFilter::Any => "(any time)".to_string(),
            TimeFilter::Around(at) => at.to_string(),
        }
    }
}

impl TryFrom<i32> for TimeFilter {
    type Error = FilterError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        if value == ANY_TIME {
            return Ok(TimeFilter::Any);
        }

        u16::try_from(value)
            .ok()
            .and_then(MinuteOfDay::new)
            .map(TimeFilter::Around)
            .ok_or(FilterError::OutOfRange(value))
    }
}

impl From<TimeFilter> for i32 {
    fn from(filter: TimeFilter) -> Self {
        match filter {
            TimeFilter::Any => ANY_TIME,
            TimeFilter::Around(at) => i32::from(at.minutes()),
        }
    }
}

impl fmt::Display for TimeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", i32::from(*self))
    }
}

/// Selects the trips relevant to `filter`, keeping their order.
///
/// With no filter the input slice is handed back as is.
pub fn filter_trips(trips: &[Trip], filter: TimeFilter) -> Cow<'_, [Trip]> {
    match filter {
        TimeFilter::Any => Cow::Borrowed(trips),
        TimeFilter::Around(_) => Cow::Owned(
            trips
                .iter()
                .filter(|trip| filter.matches(trip))
                .cloned()
                .collect(),
        ),
    }
}
