use std::collections::HashMap;

use itertools::Itertools;

use super::model::{Station, StationTraffic, Trip};

/// Counts departures and arrivals per station.
///
/// Each count map is built in one pass over the trips, then every station is
/// looked up by short name. Ids that match no station are ignored and stations
/// nobody rode to or from get zeros. The input stations are not touched.
pub fn aggregate(trips: &[Trip], stations: &[Station]) -> Vec<StationTraffic> {
    let departures = trips.iter().map(|t| t.start_station_id.as_str()).counts();
    let arrivals = trips.iter().map(|t| t.end_station_id.as_str()).counts();

    let count = |counts: &HashMap<&str, usize>, station: &Station| {
        counts
            .get(station.short_name.as_str())
            .map_or(0, |&c| u32::try_from(c).unwrap_or(u32::MAX))
    };

    stations
        .iter()
        .map(|station| {
            StationTraffic::new(
                station.clone(),
                count(&departures, station),
                count(&arrivals, station),
            )
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_utils::{station, trip};

    fn counts(traffic: &[StationTraffic]) -> Vec<(String, u32, u32, u32)> {
        traffic
            .iter()
            .map(|t| {
                (
                    t.station().short_name.to_string(),
                    t.departures(),
                    t.arrivals(),
                    t.total_traffic(),
                )
            })
            .collect()
    }

    #[test]
    fn test_counts_per_station() {
        let stations = vec![station("A"), station("B"), station("C")];
        let trips = vec![
            trip("A", "B", "08:00", "08:10"),
            trip("A", "C", "09:00", "09:10"),
            trip("B", "A", "10:00", "10:10"),
            trip("A", "A", "11:00", "11:10"),
        ];

        let traffic = aggregate(&trips, &stations);
        assert_eq!(
            counts(&traffic),
            vec![
                ("A".to_string(), 3, 2, 5),
                ("B".to_string(), 1, 1, 2),
                ("C".to_string(), 0, 1, 1),
            ]
        );
    }

    #[test]
    fn test_unknown_endpoints_are_ignored() {
        let stations = vec![station("A"), station("Z")];
        let trips = vec![
            trip("A", "nowhere", "08:00", "08:10"),
            trip("", "A", "08:00", "08:10"),
            trip("ghost", "ghost", "08:00", "08:10"),
        ];

        let traffic = aggregate(&trips, &stations);
        assert_eq!(
            counts(&traffic),
            vec![("A".to_string(), 1, 1, 2), ("Z".to_string(), 0, 0, 0)]
        );
    }

    #[test]
    fn test_ids_match_exactly() {
        let stations = vec![station("A32000"), station("a32000")];
        let trips = vec![trip("A32000", "A32000 ", "08:00", "08:10")];

        let traffic = aggregate(&trips, &stations);
        assert_eq!(
            counts(&traffic),
            vec![("A32000".to_string(), 1, 0, 1), ("a32000".to_string(), 0, 0, 0)]
        );
    }

    #[test]
    fn test_total_is_sum_and_inputs_untouched() {
        let stations = vec![station("A"), station("B")];
        let before = stations.clone();
        let trips = vec![
            trip("A", "B", "08:00", "08:10"),
            trip("B", "B", "08:00", "08:10"),
        ];

        let traffic = aggregate(&trips, &stations);
        assert!(traffic
            .iter()
            .all(|t| t.total_traffic() == t.departures() + t.arrivals()));
        assert_eq!(stations, before);
        assert_eq!(traffic[0].station(), &stations[0]);
    }

    #[test]
    fn test_aggregate_is_pure() {
        let stations = vec![station("A"), station("B")];
        let trips = vec![
            trip("A", "B", "08:00", "08:10"),
            trip("B", "A", "08:00", "08:10"),
        ];

        assert_eq!(aggregate(&trips, &stations), aggregate(&trips, &stations));
    }

    #[test]
    fn test_no_trips() {
        let stations = vec![station("A")];
        let traffic = aggregate(&[], &stations);
        assert_eq!(counts(&traffic), vec![("A".to_string(), 0, 0, 0)]);
    }
}
