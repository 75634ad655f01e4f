//! Turns a snapshot into what the map draws: one positioned, sized and
//! coloured circle per station.

pub mod color;

use std::sync::Arc;

use serde::Serialize;

use crate::projection::{Projector, ScreenPoint, Viewport, OFF_SURFACE};
use crate::session::{Session, Snapshot};
use crate::traffic::{StationId, StationTraffic, TimeFilter};

use self::color::flow_color;

/// Events that make the view redraw
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Trigger {
    Loaded,
    FilterChanged(TimeFilter),
    ViewChanged(Viewport),
}

/// Shown on pointer over
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tooltip {
    pub total_traffic: u32,
    pub departures: u32,
    pub arrivals: u32,
    pub text: String,
}

impl From<&StationTraffic> for Tooltip {
    fn from(traffic: &StationTraffic) -> Self {
        Tooltip {
            total_traffic: traffic.total_traffic(),
            departures: traffic.departures(),
            arrivals: traffic.arrivals(),
            text: format!(
                "{} trips ({} departures, {} arrivals)",
                traffic.total_traffic(),
                traffic.departures(),
                traffic.arrivals()
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Circle {
    pub short_name: StationId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub flow_ratio: f64,
    pub color: String,
    pub tooltip: Tooltip,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub generation: u64,
    pub time_filter: TimeFilter,
    pub label: String,
    pub circles: Vec<Circle>,
}

impl Frame {
    /// What the map shows before (or instead of) any data
    pub fn empty(filter: TimeFilter) -> Self {
        Frame {
            generation: 0,
            time_filter: filter,
            label: filter.label(),
            circles: vec![],
        }
    }
}

/// Positions, radii and colours for every station in `snapshot`
pub fn render(snapshot: &Snapshot, projector: &impl Projector) -> Frame {
    let scales = &snapshot.scales;

    let circles = snapshot
        .stations
        .iter()
        .map(|traffic| {
            let station = traffic.station();
            let ScreenPoint { x, y } = station
                .location
                .and_then(|location| projector.project(location))
                .unwrap_or(OFF_SURFACE);
            let flow_ratio = scales.flow.flow_ratio(traffic);

            Circle {
                short_name: station.short_name.clone(),
                name: station.name.clone(),
                x,
                y,
                radius: scales.radius.apply(traffic.total_traffic()),
                flow_ratio,
                color: flow_color(flow_ratio),
                tooltip: traffic.into(),
            }
        })
        .collect();

    Frame {
        generation: snapshot.generation,
        time_filter: snapshot.filter,
        label: snapshot.filter.label(),
        circles,
    }
}

/// Where frames end up
pub trait RenderSurface {
    fn apply(&mut self, frame: Frame);
}

impl RenderSurface for Vec<Frame> {
    fn apply(&mut self, frame: Frame) {
        self.push(frame);
    }
}

/// Keeps one surface in sync with a session. Every trigger runs the whole
/// pipeline through to a new frame before returning.
pub struct ViewBinder {
    session: Arc<Session>,
    viewport: Viewport,
}

impl ViewBinder {
    pub fn new(session: Arc<Session>, viewport: Viewport) -> Self {
        Self { session, viewport }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn handle(&mut self, trigger: Trigger, surface: &mut impl RenderSurface) {
        let snapshot = match trigger {
            Trigger::Loaded => self.session.snapshot(),
            Trigger::FilterChanged(filter) => {
                log::debug!("Filter changed to {}", filter);
                self.session.set_filter(filter)
            }
            Trigger::ViewChanged(viewport) => {
                self.viewport = viewport;
                self.session.snapshot()
            }
        };

        surface.apply(render(&snapshot, &self.viewport));
    }
}

#[cfg(test)]
mod test {
    use geo::Point;

    use super::*;
    use crate::test_utils::{station, trip};
    use crate::traffic::Station;

    fn session() -> Arc<Session> {
        let mut nowhere = Station::new("X", f64::NAN, f64::NAN);
        nowhere.name = Some("Nowhere".to_string());

        Arc::new(Session::new(
            vec![station("A"), station("B"), nowhere],
            vec![
                trip("A", "B", "08:00", "08:10"),
                trip("A", "B", "08:20", "08:30"),
                trip("A", "A", "08:40", "08:50"),
                trip("B", "A", "17:00", "17:30"),
            ],
        ))
    }

    #[test]
    fn test_render_unfiltered() {
        let session = session();
        let frame = render(&session.snapshot(), &Viewport::default());

        assert_eq!(frame.time_filter, TimeFilter::Any);
        assert_eq!(frame.label, "(any time)");
        assert_eq!(frame.circles.len(), 3);

        let a = &frame.circles[0];
        assert_eq!(a.tooltip.departures, 3);
        assert_eq!(a.tooltip.arrivals, 2);
        assert_eq!(a.tooltip.total_traffic, 5);
        assert_eq!(a.tooltip.text, "5 trips (3 departures, 2 arrivals)");
        assert_eq!(a.radius, 25.0);
        assert_eq!(a.flow_ratio, 0.5);

        // 1 of 3 is exactly on the lower third boundary
        let b = &frame.circles[1];
        assert_eq!(b.flow_ratio, 0.5);
        assert!(b.radius < a.radius);
    }

    #[test]
    fn test_unplaced_station_is_off_surface() {
        let session = session();
        let frame = render(&session.snapshot(), &Viewport::default());

        let x = &frame.circles[2];
        assert_eq!((x.x, x.y), (OFF_SURFACE.x, OFF_SURFACE.y));
        assert_eq!(x.radius, 0.0);
        assert_eq!(x.flow_ratio, 0.5);
        assert_eq!(x.name.as_deref(), Some("Nowhere"));
    }

    #[test]
    fn test_binder_triggers() {
        let mut binder = ViewBinder::new(session(), Viewport::default());
        let mut frames: Vec<Frame> = vec![];

        binder.handle(Trigger::Loaded, &mut frames);
        binder.handle(Trigger::FilterChanged(TimeFilter::try_from(1020).unwrap()), &mut frames);
        let moved = Viewport::new(Point::new(-71.2, 42.4), 14.0, 640.0, 480.0);
        binder.handle(Trigger::ViewChanged(moved), &mut frames);
        binder.handle(Trigger::FilterChanged(TimeFilter::Any), &mut frames);

        assert_eq!(frames.len(), 4);
        assert_eq!(binder.viewport(), &moved);

        // 17:00 window only has the B -> A trip, on the filtered radius range
        let evening = &frames[1];
        assert_eq!(evening.label, "5:00 PM");
        assert_eq!(evening.circles[0].tooltip.arrivals, 1);
        assert_eq!(evening.circles[0].radius, 50.0);
        assert_eq!(evening.circles[0].flow_ratio, 0.0);
        assert_eq!(evening.circles[1].flow_ratio, 1.0);
        assert_eq!(evening.circles[2].radius, 3.0);

        // panning keeps the filter and moves the circles
        assert_eq!(frames[2].time_filter, evening.time_filter);
        assert_ne!(frames[2].circles[0].x, evening.circles[0].x);

        // back to unfiltered gives the first frame's numbers again
        let first: Vec<_> = frames[0].circles.iter().map(|c| (c.radius, c.tooltip.clone())).collect();
        let last: Vec<_> = frames[3].circles.iter().map(|c| (c.radius, c.tooltip.clone())).collect();
        assert_eq!(first, last);
    }
}
