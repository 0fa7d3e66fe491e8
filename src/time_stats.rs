use serde::Serialize;
use std::fmt;

use super::calendar::{Day, Month};
use super::error::{AnalysisError, Result};
use super::mode::stable_mode;
use super::records::RecordSet;

/// When people ride: most common month, weekday and start hour.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct TimeStats {
    pub common_month: Month,
    pub common_weekday: Day,
    pub common_hour: u32,
    /// Trips started in each hour of the day.
    pub hour_counts: [u32; 24],
}

pub fn time_stats(trips: &RecordSet) -> Result<TimeStats> {
    let records = trips.records();
    let empty = || AnalysisError::EmptySet("time of travel statistics");

    let common_month = stable_mode(records.iter().map(|t| t.month)).ok_or_else(empty)?;
    let common_weekday = stable_mode(records.iter().map(|t| t.weekday)).ok_or_else(empty)?;
    let common_hour = stable_mode(records.iter().map(|t| t.hour)).ok_or_else(empty)?;

    let mut hour_counts = [0u32; 24];
    for trip in records {
        hour_counts[trip.hour as usize % 24] += 1;
    }

    Ok(TimeStats {
        common_month,
        common_weekday,
        common_hour,
        hour_counts,
    })
}

impl fmt::Display for TimeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "The most common month is: {}", self.common_month)?;
        writeln!(f, "The most common day of the week is: {}", self.common_weekday)?;
        write!(f, "The most common start hour is: {}", self.common_hour)
    }
}
