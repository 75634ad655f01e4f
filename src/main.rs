mod config;
mod error;
mod projection;
mod session;
mod source;
mod traffic;
mod view;

#[cfg(test)]
mod test_utils;

use std::env;
use std::sync::{Arc, PoisonError, RwLock};

use actix_web::{get, middleware::Logger, put, web, App, HttpResponse, HttpServer, Responder};
use serde::{Deserialize, Serialize};

use config::{MapConfig, Settings};
use error::{BikeFlowError, BikeFlowResult};
use projection::Viewport;
use session::{LoadState, Session, Status};
use source::SourceClient;
use traffic::TimeFilter;
use view::{Frame, Trigger, ViewBinder};

pub struct AppState {
    load: RwLock<LoadState>,
    map: MapConfig,
}

impl AppState {
    pub fn new(map: MapConfig) -> Self {
        Self {
            load: RwLock::new(LoadState::default()),
            map,
        }
    }

    fn status(&self) -> Status {
        self.load
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .status()
    }

    fn error(&self) -> Option<String> {
        self.load
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .error()
            .map(str::to_string)
    }

    fn session(&self) -> BikeFlowResult<Arc<Session>> {
        let load = self.load.read().unwrap_or_else(PoisonError::into_inner);
        load.session()
            .ok_or_else(|| BikeFlowError::NotReady(load.status().as_str().to_string()))
    }

    fn update(&self, f: impl FnOnce(&mut LoadState)) {
        let mut load = self.load.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut load);
    }
}

impl From<BikeFlowError> for std::io::Error {
    fn from(e: BikeFlowError) -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::Other, e)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FilterState {
    time_filter: TimeFilter,
    label: String,
    mode: &'static str,
}

impl From<TimeFilter> for FilterState {
    fn from(filter: TimeFilter) -> Self {
        FilterState {
            time_filter: filter,
            label: filter.label(),
            mode: if filter.is_filtered() {
                "filtered"
            } else {
                "unfiltered"
            },
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FilterRequest {
    time_filter: i32,
}

#[derive(Serialize)]
struct CirclesResponse {
    status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(flatten)]
    frame: Frame,
}

#[get("/ok")]
async fn ok() -> BikeFlowResult<impl Responder> {
    Ok(HttpResponse::Ok().finish())
}

#[get("/map")]
async fn get_map(state: web::Data<AppState>) -> BikeFlowResult<impl Responder> {
    Ok(web::Json(state.map.clone()))
}

#[get("/filter")]
async fn get_filter(state: web::Data<AppState>) -> BikeFlowResult<impl Responder> {
    let session = state.session()?;
    Ok(web::Json(FilterState::from(session.filter())))
}

#[put("/filter")]
async fn put_filter(
    body: web::Json<FilterRequest>,
    viewport: web::Query<Viewport>,
    state: web::Data<AppState>,
) -> BikeFlowResult<impl Responder> {
    let filter = TimeFilter::try_from(body.time_filter)?;
    let session = state.session()?;

    let mut frames = vec![];
    ViewBinder::new(session, viewport.into_inner()).handle(Trigger::FilterChanged(filter), &mut frames);

    let frame = frames.pop().unwrap_or_else(|| Frame::empty(filter));
    Ok(web::Json(CirclesResponse {
        status: Status::Ready,
        error: None,
        frame,
    }))
}

#[get("/stations")]
async fn get_stations(state: web::Data<AppState>) -> BikeFlowResult<impl Responder> {
    let snapshot = state.session()?.snapshot();
    Ok(web::Json(serde_json::json!({
        "timeFilter": snapshot.filter,
        "stations": snapshot.stations,
    })))
}

#[get("/circles")]
async fn get_circles(
    viewport: web::Query<Viewport>,
    state: web::Data<AppState>,
) -> BikeFlowResult<impl Responder> {
    // Without data the map still renders, just with no circles on it
    let Ok(session) = state.session() else {
        return Ok(web::Json(CirclesResponse {
            status: state.status(),
            error: state.error(),
            frame: Frame::empty(TimeFilter::Any),
        }));
    };

    let viewport = viewport.into_inner();
    let mut binder = ViewBinder::new(session, viewport);
    let mut frames = vec![];
    binder.handle(Trigger::ViewChanged(viewport), &mut frames);

    let frame = frames.pop().unwrap_or_else(|| Frame::empty(TimeFilter::Any));
    Ok(web::Json(CirclesResponse {
        status: Status::Ready,
        error: None,
        frame,
    }))
}

/// Fetches both datasets concurrently and feeds them to the load gate as they
/// arrive. Failures are logged and leave the service without data.
async fn load_datasets(state: web::Data<AppState>, client: SourceClient) {
    let stations = async {
        match client.fetch_stations().await {
            Ok(stations) => state.update(|load| load.stations_loaded(stations)),
            Err(e) => state.update(|load| load.load_failed("stations", e)),
        }
    };
    let trips = async {
        match client.fetch_trips().await {
            Ok(trips) => state.update(|load| load.trips_loaded(trips)),
            Err(e) => state.update(|load| load.load_failed("trips", e)),
        }
    };
    tokio::join!(stations, trips);

    if let Ok(session) = state.session() {
        let mut frames = vec![];
        ViewBinder::new(session, Viewport::default()).handle(Trigger::Loaded, &mut frames);
        if let Some(frame) = frames.first() {
            log::info!("Initial view has {} stations", frame.circles.len());
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::from_filename(".env").ok();

    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::try_init().ok();

    log::debug!("Debug logging enabled");

    let settings = Settings::from_env();
    let client = SourceClient::new(&settings.stations_url, &settings.trips_url)
        .map_err(BikeFlowError::from)?;

    let state = web::Data::new(AppState::new(MapConfig::from_env()));

    log::info!("Loading stations from {}", settings.stations_url);
    log::info!("Loading trips from {}", settings.trips_url);
    actix_web::rt::spawn(load_datasets(state.clone(), client));

    log::info!("Starting server at {}", settings.listen_address);

    let app_state = state.clone();
    let allow_origin = settings.allow_origin.clone();
    HttpServer::new(move || {
        let logger = Logger::default();

        let mut cors = actix_cors::Cors::default()
            .allowed_methods(vec!["GET", "PUT"])
            .allowed_headers(vec!["accept", "content-type"]);

        if let Some(allowed_origin) = &allow_origin {
            if allowed_origin == "*" {
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(allowed_origin);
            }
        }

        App::new()
            .wrap(logger)
            .wrap(cors)
            .app_data(app_state.clone())
            .service(ok)
            .service(get_map)
            .service(get_filter)
            .service(put_filter)
            .service(get_stations)
            .service(get_circles)
    })
    .bind(&settings.listen_address)?
    .run()
    .await?;

    log::info!("Server stopped");
    state.update(LoadState::close);

    Ok(())
}
