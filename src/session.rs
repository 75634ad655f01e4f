use std::fmt::Display;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use serde::Serialize;

use crate::source::RawTrip;
use crate::traffic::{
    aggregate, filter_trips, Scales, Station, StationTraffic, TimeFilter, TimeOfDayParser, Trip,
};

/// Everything derived from one filter value. Never modified once built,
/// a filter change publishes a whole new snapshot.
#[derive(Debug)]
pub struct Snapshot {
    pub generation: u64,
    pub filter: TimeFilter,
    pub stations: Vec<StationTraffic>,
    pub scales: Scales,
}

impl Snapshot {
    /// Filter, aggregate and derive scales in one go
    pub fn compute(stations: &[Station], trips: &[Trip], filter: TimeFilter, generation: u64) -> Self {
        let filtered = filter_trips(trips, filter);
        let stations = aggregate(&filtered, stations);
        let scales = Scales::derive(&stations, filter);

        log::debug!(
            "Aggregated {} of {} trips for filter {} (generation {})",
            filtered.len(),
            trips.len(),
            filter,
            generation
        );

        Self {
            generation,
            filter,
            stations,
            scales,
        }
    }
}

/// The loaded datasets and the currently published snapshot.
///
/// Stations and trips are read only after construction.
pub struct Session {
    stations: Arc<[Station]>,
    trips: Arc<[Trip]>,
    last_generation: AtomicU64,
    current: RwLock<Arc<Snapshot>>,
}

impl Session {
    pub fn new(stations: Vec<Station>, trips: Vec<Trip>) -> Self {
        let stations: Arc<[Station]> = stations.into();
        let trips: Arc<[Trip]> = trips.into();
        let initial = Snapshot::compute(&stations, &trips, TimeFilter::Any, 0);

        Self {
            stations,
            trips,
            last_generation: AtomicU64::new(0),
            current: RwLock::new(Arc::new(initial)),
        }
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn filter(&self) -> TimeFilter {
        self.snapshot().filter
    }

    /// Recomputes everything for `filter` and publishes it.
    ///
    /// Returns whatever is current afterwards, which is a newer snapshot if
    /// another change overtook this one.
    pub fn set_filter(&self, filter: TimeFilter) -> Arc<Snapshot> {
        let generation = self.last_generation.fetch_add(1, Ordering::SeqCst) + 1;
        let snapshot = Snapshot::compute(&self.stations, &self.trips, filter, generation);
        self.publish(Arc::new(snapshot))
    }

    fn publish(&self, snapshot: Arc<Snapshot>) -> Arc<Snapshot> {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);

        // last write wins, a slower recompute for an older trigger is dropped
        if snapshot.generation > current.generation {
            *current = snapshot;
        } else {
            log::debug!(
                "Discarding superseded snapshot {} (current is {})",
                snapshot.generation,
                current.generation
            );
        }

        current.clone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Loading,
    Ready,
    Failed,
    Closed,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Loading => "loading",
            Status::Ready => "ready",
            Status::Failed => "failed",
            Status::Closed => "closed",
        }
    }
}

/// Whichever datasets have arrived so far
#[derive(Default)]
pub struct Pending {
    stations: Option<Vec<Station>>,
    trips: Option<Vec<RawTrip>>,
}

/// Gates the first aggregation on both fetches, in whichever order they finish
pub enum LoadState {
    Loading(Pending),
    Ready(Arc<Session>),
    Failed(String),
    Closed,
}

impl Default for LoadState {
    fn default() -> Self {
        LoadState::Loading(Pending::default())
    }
}

impl LoadState {
    pub fn status(&self) -> Status {
        match self {
            LoadState::Loading(_) => Status::Loading,
            LoadState::Ready(_) => Status::Ready,
            LoadState::Failed(_) => Status::Failed,
            LoadState::Closed => Status::Closed,
        }
    }

    /// Why loading failed, for as long as the service stays without data
    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn session(&self) -> Option<Arc<Session>> {
        match self {
            LoadState::Ready(session) => Some(session.clone()),
            _ => None,
        }
    }

    pub fn stations_loaded(&mut self, stations: Vec<Station>) {
        match self {
            LoadState::Loading(pending) => {
                log::info!("Loaded {} stations", stations.len());
                pending.stations = Some(stations);
                self.try_finish();
            }
            _ => log::debug!("Ignoring stations, no longer loading"),
        }
    }

    /// Raw rows are kept as is until the stations are in
    pub fn trips_loaded(&mut self, trips: Vec<RawTrip>) {
        match self {
            LoadState::Loading(pending) => {
                log::info!("Loaded {} trips", trips.len());
                pending.trips = Some(trips);
                self.try_finish();
            }
            _ => log::debug!("Ignoring trips, no longer loading"),
        }
    }

    /// Either fetch failing leaves the view without data for the rest of the session
    pub fn load_failed(&mut self, what: &str, error: impl Display) {
        let message = format!("Failed to load {}: {}", what, error);
        log::error!("{}", message);

        if matches!(self, LoadState::Loading(_)) {
            *self = LoadState::Failed(message);
        }
    }

    pub fn close(&mut self) {
        if let LoadState::Ready(session) = self {
            log::info!(
                "Closing session ({} stations, {} trips)",
                session.stations().len(),
                session.trips().len()
            );
        }
        *self = LoadState::Closed;
    }

    fn try_finish(&mut self) {
        let LoadState::Loading(pending) = self else {
            return;
        };
        if pending.stations.is_none() || pending.trips.is_none() {
            return;
        }

        let (Some(stations), Some(raw_trips)) = (pending.stations.take(), pending.trips.take()) else {
            return;
        };

        let parser = TimeOfDayParser::new();
        let trips: Vec<Trip> = raw_trips
            .into_iter()
            .map(|raw| raw.into_trip(&parser))
            .collect();
        let untimed = trips
            .iter()
            .filter(|t| t.started_at.is_none() || t.ended_at.is_none())
            .count();
        if untimed > 0 {
            log::warn!("{} trips have an unreadable timestamp", untimed);
        }

        let session = Session::new(stations, trips);
        log::info!(
            "Session ready with {} stations and {} trips",
            session.stations().len(),
            session.trips().len()
        );
        *self = LoadState::Ready(Arc::new(session));
    }
}
