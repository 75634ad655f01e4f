use std::f64::consts::PI;

use geo::{Coord, Point};
use serde::{Deserialize, Serialize};

use crate::config::{MAP_CENTER, MAP_MAX_ZOOM, MAP_MIN_ZOOM, MAP_ZOOM};

/// Web Mercator world width in pixels at zoom 0, matching vector tile maps
const TILE_SIZE: f64 = 512.0;

/// Web Mercator is undefined past this latitude
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Where stations without a usable position are drawn, well outside any surface
pub const OFF_SURFACE: ScreenPoint = ScreenPoint {
    x: -9999.0,
    y: -9999.0,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

/// Maps geographic coordinates onto the render surface.
///
/// `None` means the location can't be placed and should go to [`OFF_SURFACE`].
pub trait Projector {
    fn project(&self, location: Point<f64>) -> Option<ScreenPoint>;
}

/// The visible map: centre, zoom and surface size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    pub lon: f64,
    pub lat: f64,
    pub zoom: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            lon: MAP_CENTER[0],
            lat: MAP_CENTER[1],
            zoom: MAP_ZOOM,
            width: 1024.0,
            height: 768.0,
        }
    }
}

impl Viewport {
    pub fn new(center: Point<f64>, zoom: f64, width: f64, height: f64) -> Self {
        Self {
            lon: center.x(),
            lat: center.y(),
            zoom,
            width,
            height,
        }
    }

    fn world_size(&self) -> f64 {
        TILE_SIZE * self.zoom.clamp(MAP_MIN_ZOOM, MAP_MAX_ZOOM).exp2()
    }

    fn to_world(&self, location: Point<f64>) -> Option<Coord<f64>> {
        let (lon, lat) = location.x_y();
        if !lon.is_finite() || !lat.is_finite() || lat.abs() > MAX_LATITUDE {
            return None;
        }

        let size = self.world_size();
        let y = (PI / 4.0 + lat.to_radians() / 2.0).tan().ln().to_degrees();
        Some(Coord {
            x: (180.0 + lon) / 360.0 * size,
            y: (180.0 - y) / 360.0 * size,
        })
    }
}

impl Projector for Viewport {
    fn project(&self, location: Point<f64>) -> Option<ScreenPoint> {
        let center = self.to_world(Point::new(self.lon, self.lat))?;
        let world = self.to_world(location)?;

        Some(ScreenPoint {
            x: world.x - center.x + self.width / 2.0,
            y: world.y - center.y + self.height / 2.0,
        })
    }
}
