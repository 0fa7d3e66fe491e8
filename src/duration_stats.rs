use chrono::TimeDelta;
use serde::Serialize;
use std::fmt;

use super::error::{AnalysisError, Result};
use super::records::RecordSet;
use super::utils::format_duration;

/// Total and mean trip duration in seconds. Both are signed.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct DurationStats {
    pub trip_count: usize,
    pub total_duration_secs: f64,
    pub mean_duration_secs: f64,
}

pub fn duration_stats(trips: &RecordSet) -> Result<DurationStats> {
    if trips.is_empty() {
        return Err(AnalysisError::EmptySet("trip duration statistics"));
    }
    let total = trips
        .records()
        .iter()
        .fold(TimeDelta::zero(), |sum, trip| sum + trip.duration());
    let total_duration_secs = total.num_milliseconds() as f64 / 1000.0;
    let trip_count = trips.len();

    Ok(DurationStats {
        trip_count,
        total_duration_secs,
        mean_duration_secs: total_duration_secs / trip_count as f64,
    })
}

impl fmt::Display for DurationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total travel time: {}", format_duration(self.total_duration_secs))?;
        write!(f, "Mean travel time: {}", format_duration(self.mean_duration_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::fixtures::{record_set, trip};

    #[test]
    fn test_total_and_mean_duration() {
        let trips = record_set(vec![
            trip("2017-01-02 08:00:00", "2017-01-02 08:10:00", "A", "B"),
            trip("2017-01-02 09:00:00", "2017-01-02 09:20:00", "A", "B"),
            trip("2017-01-02 10:00:00", "2017-01-02 10:30:00", "A", "B"),
        ]);
        let stats = duration_stats(&trips).unwrap();
        assert_eq!(stats.trip_count, 3);
        assert_eq!(stats.total_duration_secs, 3600.0);
        assert_eq!(stats.mean_duration_secs, 1200.0);
        assert_eq!(stats.to_string(), "Total travel time: 0 days 01:00:00\nMean travel time: 0 days 00:20:00");
    }

    #[test]
    fn test_mean_times_count_is_total() {
        let trips = record_set(vec![
            trip("2017-02-01 08:00:00", "2017-02-01 08:00:07", "A", "B"),
            trip("2017-02-01 08:00:00", "2017-02-01 08:13:01", "A", "B"),
            trip("2017-02-01 08:00:00", "2017-02-02 11:00:00", "A", "B"),
            trip("2017-02-01 08:00:00", "2017-02-01 07:59:00", "A", "B"),
            trip("2017-02-01 08:00:00", "2017-02-01 08:00:00", "A", "B"),
            trip("2017-02-01 08:00:00", "2017-02-01 08:00:11", "A", "B"),
        ]);
        let stats = duration_stats(&trips).unwrap();
        let rebuilt = stats.mean_duration_secs * stats.trip_count as f64;
        assert!((rebuilt - stats.total_duration_secs).abs() < 1e-6);
    }

    #[test]
    fn test_durations_are_signed() {
        let trips = record_set(vec![
            trip("2017-03-01 08:00:00", "2017-03-01 07:50:00", "A", "B"),
            trip("2017-03-01 08:00:00", "2017-03-01 08:04:00", "A", "B"),
        ]);
        let stats = duration_stats(&trips).unwrap();
        assert_eq!(stats.total_duration_secs, -360.0);
        assert_eq!(stats.mean_duration_secs, -180.0);
    }

    #[test]
    fn test_duration_stats_on_empty_set() {
        let trips = record_set(Vec::new());
        assert!(matches!(duration_stats(&trips), Err(AnalysisError::EmptySet(_))));
    }
}
