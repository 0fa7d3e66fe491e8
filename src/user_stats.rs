use log::debug;
use serde::Serialize;
use std::fmt;

use super::mode::{FrequencyTable, ValueCount, value_counts};
use super::records::{OptionalColumn, RecordSet};

/// A statistic over an optional column. Cities that do not report the
/// column get `NotCollected` rather than an empty or zeroed value.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ColumnStat<T> {
    Collected(T),
    NotCollected,
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct BirthYearSummary {
    pub earliest: i32,
    pub latest: i32,
    pub most_common: i32,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct UserStats {
    pub user_type_counts: ColumnStat<Vec<ValueCount>>,
    pub gender_counts: ColumnStat<Vec<ValueCount>>,
    pub birth_year_summary: ColumnStat<BirthYearSummary>,
}

/// Demographics of the riders. Never fails: columns the city does not report
/// come back as [`ColumnStat::NotCollected`]. Trips with an empty cell are left
/// out of that column's statistic only.
pub fn user_stats(trips: &RecordSet) -> UserStats {
    let records = trips.records();

    let user_type_counts = if trips.has_column(OptionalColumn::UserType) {
        ColumnStat::Collected(value_counts(
            records.iter().filter_map(|t| t.user_type.as_deref()),
        ))
    } else {
        ColumnStat::NotCollected
    };

    let gender_counts = if trips.has_column(OptionalColumn::Gender) {
        ColumnStat::Collected(value_counts(
            records.iter().filter_map(|t| t.gender.as_deref()),
        ))
    } else {
        ColumnStat::NotCollected
    };

    let birth_year_summary = if trips.has_column(OptionalColumn::BirthYear) {
        summarise_birth_years(records.iter().filter_map(|t| t.birth_year))
    } else {
        ColumnStat::NotCollected
    };

    UserStats {
        user_type_counts,
        gender_counts,
        birth_year_summary,
    }
}

fn summarise_birth_years(years: impl Iterator<Item = i32>) -> ColumnStat<BirthYearSummary> {
    let mut earliest = i32::MAX;
    let mut latest = i32::MIN;
    let mut table = FrequencyTable::new();
    for year in years {
        earliest = earliest.min(year);
        latest = latest.max(year);
        table.add(year);
    }
    match table.mode() {
        Some(&most_common) => ColumnStat::Collected(BirthYearSummary {
            earliest,
            latest,
            most_common,
        }),
        None => {
            debug!("Birth year column present but every value is missing");
            ColumnStat::NotCollected
        }
    }
}

fn write_counts(
    f: &mut fmt::Formatter<'_>,
    heading: &str,
    missing: &str,
    counts: &ColumnStat<Vec<ValueCount>>,
) -> fmt::Result {
    match counts {
        ColumnStat::Collected(counts) => {
            writeln!(f, "{heading}")?;
            for entry in counts {
                writeln!(f, "  {:<16} {}", entry.value, entry.count)?;
            }
            Ok(())
        }
        ColumnStat::NotCollected => writeln!(f, "{missing}"),
    }
}

impl fmt::Display for UserStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_counts(
            f,
            "Counts of user types:",
            "No user type data collected.",
            &self.user_type_counts,
        )?;
        write_counts(
            f,
            "Counts of gender:",
            "No gender data collected.",
            &self.gender_counts,
        )?;
        match &self.birth_year_summary {
            ColumnStat::Collected(summary) => {
                writeln!(f, "Earliest year of birth: {}", summary.earliest)?;
                writeln!(f, "Most recent year of birth: {}", summary.latest)?;
                write!(f, "Most common year of birth: {}", summary.most_common)
            }
            ColumnStat::NotCollected => write!(f, "No birth year data collected."),
        }
    }
}
