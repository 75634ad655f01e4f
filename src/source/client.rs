use url::Url;

use super::entities::{RawStation, RawTrip, StationFeed};
use super::error::{SourceError, SourceResult};
use crate::traffic::Station;

const TRIP_COLUMNS: [&str; 4] = ["start_station_id", "end_station_id", "started_at", "ended_at"];

#[derive(Clone)]
pub struct SourceClient {
    client: reqwest::Client,
    stations_url: Url,
    trips_url: Url,
}

impl SourceClient {
    pub fn new(stations_url: &str, trips_url: &str) -> SourceResult<SourceClient> {
        let client = SourceClient {
            client: reqwest::Client::builder().build()?,
            stations_url: Url::parse(stations_url)?,
            trips_url: Url::parse(trips_url)?,
        };

        Ok(client)
    }

    async fn request(&self, url: &Url) -> SourceResult<reqwest::Response> {
        log::debug!("Requesting {}", url);
        let response = self
            .client
            .get(url.clone())
            .send()
            .await?
            .error_for_status()?;
        Ok(response)
    }

    pub async fn fetch_stations(&self) -> SourceResult<Vec<Station>> {
        let body = self.request(&self.stations_url).await?.bytes().await?;
        log::debug!("Received {} bytes of station feed", body.len());
        parse_stations(&body)
    }

    pub async fn fetch_trips(&self) -> SourceResult<Vec<RawTrip>> {
        let body = self.request(&self.trips_url).await?.bytes().await?;
        log::debug!("Received {} bytes of trip table", body.len());
        parse_trips(&body)
    }
}

/// Decodes the station feed, dropping records without a short name
pub fn parse_stations(body: &[u8]) -> SourceResult<Vec<Station>> {
    let feed: StationFeed = serde_json::from_slice(body)?;
    let total = feed.data.stations.len();

    let stations: Vec<Station> = feed
        .data
        .stations
        .into_iter()
        .filter_map(RawStation::into_station)
        .collect();

    if stations.len() < total {
        log::warn!("Skipped {} stations without a short name", total - stations.len());
    }
    let unplaced = stations.iter().filter(|s| s.location.is_none()).count();
    if unplaced > 0 {
        log::warn!("{} stations have no usable coordinates", unplaced);
    }

    Ok(stations)
}

/// Decodes the trip table. Rows that don't deserialize are skipped and counted.
///
/// Header names are trimmed, field values are not.
pub fn parse_trips(body: &[u8]) -> SourceResult<Vec<RawTrip>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(body);

    let headers = reader.headers()?.clone();
    for column in TRIP_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(SourceError::MissingColumn(column));
        }
    }

    let mut trips = vec![];
    let mut skipped = 0usize;
    for row in reader.deserialize::<RawTrip>() {
        match row {
            Ok(trip) => trips.push(trip),
            Err(e) => {
                log::trace!("Skipping trip row: {}", e);
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        log::warn!("Skipped {} malformed trip rows", skipped);
    }

    Ok(trips)
}
