use serde::Serialize;
use std::fmt;

use super::error::{AnalysisError, Result};
use super::mode::stable_mode;
use super::records::{RecordSet, TripRecord};

const ROUTE_SEPARATOR: &str = " to ";

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Route {
    pub start_station: String,
    pub end_station: String,
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{ROUTE_SEPARATOR}{}", self.start_station, self.end_station)
    }
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct StationStats {
    pub common_start_station: String,
    pub common_end_station: String,
    pub common_route: Route,
}

fn route_key(trip: &TripRecord) -> String {
    format!("{}{ROUTE_SEPARATOR}{}", trip.start_station, trip.end_station)
}

pub fn station_stats(trips: &RecordSet) -> Result<StationStats> {
    let records = trips.records();
    let empty = || AnalysisError::EmptySet("station statistics");

    let common_start_station =
        stable_mode(records.iter().map(|t| t.start_station.as_str())).ok_or_else(empty)?;
    let common_end_station =
        stable_mode(records.iter().map(|t| t.end_station.as_str())).ok_or_else(empty)?;

    // The route mode is taken over the joined key; the station pair is read
    // back from the first trip carrying that key.
    let common_key = stable_mode(records.iter().map(route_key)).ok_or_else(empty)?;
    let common_route = records
        .iter()
        .find(|t| route_key(t) == common_key)
        .map(|t| Route {
            start_station: t.start_station.clone(),
            end_station: t.end_station.clone(),
        })
        .ok_or_else(empty)?;

    Ok(StationStats {
        common_start_station: common_start_station.to_string(),
        common_end_station: common_end_station.to_string(),
        common_route,
    })
}

impl fmt::Display for StationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Most commonly used start station: {}", self.common_start_station)?;
        writeln!(f, "Most commonly used end station: {}", self.common_end_station)?;
        write!(
            f,
            "Most frequent combination of start station and end station trip: {}",
            self.common_route
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::fixtures::{record_set, trip};

    fn trips_between(pairs: &[(&str, &str)]) -> RecordSet {
        record_set(
            pairs
                .iter()
                .map(|(from, to)| trip("2017-04-03 09:00:00", "2017-04-03 09:20:00", from, to))
                .collect(),
        )
    }

    #[test]
    fn test_common_route() {
        let trips = trips_between(&[("A", "B"), ("A", "B"), ("C", "D")]);
        let stats = station_stats(&trips).unwrap();
        assert_eq!(
            stats.common_route,
            Route {
                start_station: "A".to_string(),
                end_station: "B".to_string()
            }
        );
        assert_eq!(stats.common_route.to_string(), "A to B");
        assert_eq!(stats.common_start_station, "A");
        assert_eq!(stats.common_end_station, "B");
    }

    #[test]
    fn test_station_ties_go_to_first_seen() {
        let trips = trips_between(&[("C", "D"), ("A", "B"), ("A", "D"), ("C", "B")]);
        let stats = station_stats(&trips).unwrap();
        assert_eq!(stats.common_start_station, "C");
        assert_eq!(stats.common_end_station, "D");
        assert_eq!(stats.common_route.start_station, "C");
        assert_eq!(stats.common_route.end_station, "D");
    }

    #[test]
    fn test_route_mode_differs_from_station_modes() {
        let trips = trips_between(&[("A", "X"), ("A", "Y"), ("A", "Z"), ("B", "Q"), ("B", "Q")]);
        let stats = station_stats(&trips).unwrap();
        assert_eq!(stats.common_start_station, "A");
        assert_eq!(stats.common_route.to_string(), "B to Q");
    }

    #[test]
    fn test_station_stats_on_empty_set() {
        let trips = record_set(Vec::new());
        assert!(matches!(station_stats(&trips), Err(AnalysisError::EmptySet(_))));
    }
}
