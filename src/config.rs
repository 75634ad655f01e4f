use std::env;

use serde::Serialize;

pub const MAP_STYLE: &str = "mapbox://styles/mapbox/streets-v12";
/// Initial map centre as `[lon, lat]`, Cambridge/Boston
pub const MAP_CENTER: [f64; 2] = [-71.09415, 42.36027];
pub const MAP_ZOOM: f64 = 12.0;
pub const MAP_MIN_ZOOM: f64 = 5.0;
pub const MAP_MAX_ZOOM: f64 = 18.0;

pub const BIKE_LANE_COLOR: &str = "#32D400";
pub const BIKE_LANE_OPACITY: f64 = 0.6;

const BOSTON_LANES_URL: &str = "https://bostonopendata-boston.opendata.arcgis.com/datasets/boston::existing-bike-network-2022.geojson";
const CAMBRIDGE_LANES_URL: &str = "https://raw.githubusercontent.com/cambridgegis/cambridgegis_data/main/Recreation/Bike_Facilities/RECREATION_BikeFacilities.geojson";

const DEFAULT_STATIONS_URL: &str = "https://dsc106.com/labs/lab07/data/bluebikes-stations.json";
const DEFAULT_TRIPS_URL: &str = "https://dsc106.com/labs/lab07/data/bluebikes-traffic-2024-03.csv";
const DEFAULT_LISTEN_ADDRESS: &str = "127.0.0.1:8080";

/// Static line layer drawn under the station circles
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overlay {
    pub id: &'static str,
    pub source: &'static str,
    pub line_color: &'static str,
    pub line_width: f64,
    pub line_opacity: f64,
}

/// Everything the map client needs before the first frame
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapConfig {
    pub style: &'static str,
    pub center: [f64; 2],
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub overlays: Vec<Overlay>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

impl MapConfig {
    pub fn from_env() -> Self {
        Self {
            style: MAP_STYLE,
            center: MAP_CENTER,
            zoom: MAP_ZOOM,
            min_zoom: MAP_MIN_ZOOM,
            max_zoom: MAP_MAX_ZOOM,
            overlays: vec![
                Overlay {
                    id: "bike-lanes",
                    source: BOSTON_LANES_URL,
                    line_color: BIKE_LANE_COLOR,
                    line_width: 5.0,
                    line_opacity: BIKE_LANE_OPACITY,
                },
                Overlay {
                    id: "bike-lanes-cambridge",
                    source: CAMBRIDGE_LANES_URL,
                    line_color: BIKE_LANE_COLOR,
                    line_width: 3.0,
                    line_opacity: BIKE_LANE_OPACITY,
                },
            ],
            access_token: env::var("MAPBOX_TOKEN").ok(),
        }
    }
}

/// Load-time settings, read once in `main`
#[derive(Debug, Clone)]
pub struct Settings {
    pub listen_address: String,
    pub allow_origin: Option<String>,
    pub stations_url: String,
    pub trips_url: String,
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            listen_address: env::var("LISTEN_ADDRESS")
                .unwrap_or_else(|_| DEFAULT_LISTEN_ADDRESS.to_string()),
            allow_origin: env::var("ALLOW_ORIGIN").ok(),
            stations_url: env::var("STATIONS_URL")
                .unwrap_or_else(|_| DEFAULT_STATIONS_URL.to_string()),
            trips_url: env::var("TRIPS_URL").unwrap_or_else(|_| DEFAULT_TRIPS_URL.to_string()),
        }
    }
}
