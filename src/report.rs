use log::info;
use serde::Serialize;
use std::fmt;
use std::time::Instant;

use super::city::City;
use super::duration_stats::{DurationStats, duration_stats};
use super::error::Result;
use super::filters::FilterSpec;
use super::records::{OptionalColumn, RecordSet};
use super::station_stats::{StationStats, station_stats};
use super::time_stats::{TimeStats, time_stats};
use super::user_stats::{UserStats, user_stats};

const RULE_WIDTH: usize = 40;

/// All four statistic groups for one city and filter.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct AnalysisReport {
    pub city: City,
    pub filter: FilterSpec,
    pub trip_count: usize,
    pub columns: Vec<OptionalColumn>,
    pub time: TimeStats,
    pub stations: StationStats,
    pub durations: DurationStats,
    pub users: UserStats,
}

impl AnalysisReport {
    /// Fails with `EmptySet` when `trips` is empty, since no mode exists.
    pub fn compute(city: City, filter: FilterSpec, trips: &RecordSet) -> Result<Self> {
        Ok(AnalysisReport {
            city,
            filter,
            trip_count: trips.len(),
            columns: trips.columns().iter().copied().collect(),
            time: timed("Time of travel statistics", || time_stats(trips))?,
            stations: timed("Station statistics", || station_stats(trips))?,
            durations: timed("Trip duration statistics", || duration_stats(trips))?,
            users: timed("User statistics", || user_stats(trips)),
        })
    }
}

/// Runs `compute` and logs how long it took.
pub fn timed<T>(label: &str, compute: impl FnOnce() -> T) -> T {
    let start = Instant::now();
    let output = compute();
    info!("{label} took {:.2} seconds", start.elapsed().as_secs_f64());
    output
}

/// Writes one titled block of the text report.
pub fn write_section(
    f: &mut impl fmt::Write,
    title: &str,
    body: &dyn fmt::Display,
) -> fmt::Result {
    writeln!(f, "\n{title}\n")?;
    writeln!(f, "{body}")?;
    writeln!(f, "{}", "-".repeat(RULE_WIDTH))
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} trips in {} ({})",
            self.trip_count, self.city, self.filter
        )?;
        writeln!(f, "{}", "-".repeat(RULE_WIDTH))?;
        write_section(f, "The Most Frequent Times of Travel", &self.time)?;
        write_section(f, "The Most Popular Stations and Trip", &self.stations)?;
        write_section(f, "Trip Duration", &self.durations)?;
        write_section(f, "User Stats", &self.users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{Day, Month};
    use crate::error::AnalysisError;
    use crate::records::{TripRecord, fixtures::trip};
    use crate::user_stats::ColumnStat;
    use std::collections::BTreeSet;

    fn washington_trips() -> RecordSet {
        let mut records: Vec<TripRecord> = vec![
            trip("2017-06-21 08:36:34", "2017-06-21 08:44:43", "14th & Belmont St NW", "15th & K St NW"),
            trip("2017-06-21 17:10:00", "2017-06-21 17:30:00", "14th & Belmont St NW", "15th & K St NW"),
            trip("2017-03-11 10:40:00", "2017-03-11 10:46:00", "Yuma St & Tenley Circle NW", "Connecticut Ave & Yuma St NW"),
        ];
        for trip in &mut records {
            trip.user_type = Some("Subscriber".to_string());
        }
        RecordSet::new(records, BTreeSet::from([OptionalColumn::UserType]))
    }

    #[test]
    fn test_report_combines_every_group() {
        let trips = washington_trips();
        let report = AnalysisReport::compute(City::Washington, FilterSpec::default(), &trips).unwrap();
        assert_eq!(report.trip_count, 3);
        assert_eq!(report.columns, vec![OptionalColumn::UserType]);
        assert_eq!(report.time.common_month, Month::June);
        assert_eq!(report.time.common_weekday, Day::Wednesday);
        assert_eq!(report.stations.common_start_station, "14th & Belmont St NW");
        assert_eq!(report.durations.total_duration_secs, 489.0 + 1200.0 + 360.0);
        assert_eq!(report.users.gender_counts, ColumnStat::NotCollected);
    }

    #[test]
    fn test_report_on_empty_set_fails() {
        let trips = RecordSet::new(Vec::new(), BTreeSet::new());
        let err = AnalysisReport::compute(City::Chicago, FilterSpec::default(), &trips).unwrap_err();
        assert!(matches!(err, AnalysisError::EmptySet(_)));
    }

    #[test]
    fn test_report_renders_as_text_and_json() {
        let trips = washington_trips();
        let report = AnalysisReport::compute(City::Washington, FilterSpec::default(), &trips).unwrap();

        let text = report.to_string();
        assert!(text.contains("The most common month is: June"));
        assert!(text.contains("No gender data collected."));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["users"]["gender_counts"], "not_collected");
        assert_eq!(json["time"]["common_month"], "June");
        assert_eq!(json["stations"]["common_route"]["end_station"], "15th & K St NW");
    }
}
