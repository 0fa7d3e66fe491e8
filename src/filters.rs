use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use super::calendar::{Day, Month};
use super::error::{AnalysisError, Result};
use super::records::TripRecord;

/// Accepted month selections. The trip logs only cover January to June.
pub const MONTH_CHOICES: [&str; 7] = [
    "all", "january", "february", "march", "april", "may", "june",
];

pub const DAY_CHOICES: [&str; 8] = [
    "all",
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// Normalises `raw` (trimmed, lowercased) and returns the matching canonical
/// entry of `allowed`.
pub fn validate<'a>(raw: &str, allowed: &[&'a str]) -> Result<&'a str> {
    let normalised = raw.trim().to_lowercase();
    allowed
        .iter()
        .find(|choice| **choice == normalised)
        .copied()
        .ok_or_else(|| AnalysisError::InvalidInput {
            value: raw.to_string(),
            allowed: allowed.iter().map(|choice| choice.to_string()).collect(),
        })
}

#[derive(Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MonthFilter {
    #[default]
    All,
    Only(Month),
}

impl FromStr for MonthFilter {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        match validate(s, &MONTH_CHOICES)? {
            "all" => Ok(MonthFilter::All),
            canonical => canonical
                .parse::<Month>()
                .map(MonthFilter::Only)
                .map_err(|_| AnalysisError::InvalidInput {
                    value: s.to_string(),
                    allowed: MONTH_CHOICES.iter().map(|c| c.to_string()).collect(),
                }),
        }
    }
}

impl fmt::Display for MonthFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthFilter::All => f.write_str("all"),
            MonthFilter::Only(month) => f.write_str(&month.name().to_lowercase()),
        }
    }
}

#[derive(Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DayFilter {
    #[default]
    All,
    Only(Day),
}

impl FromStr for DayFilter {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        match validate(s, &DAY_CHOICES)? {
            "all" => Ok(DayFilter::All),
            canonical => canonical
                .parse::<Day>()
                .map(DayFilter::Only)
                .map_err(|_| AnalysisError::InvalidInput {
                    value: s.to_string(),
                    allowed: DAY_CHOICES.iter().map(|c| c.to_string()).collect(),
                }),
        }
    }
}

impl fmt::Display for DayFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayFilter::All => f.write_str("all"),
            DayFilter::Only(day) => f.write_str(&day.name().to_lowercase()),
        }
    }
}

/// Month and weekday restriction applied to a city's trips.
#[derive(Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FilterSpec {
    pub month: MonthFilter,
    pub weekday: DayFilter,
}

impl FilterSpec {
    /// Parses raw month and weekday selections, e.g. `("June", "all")`.
    pub fn parse(month: &str, weekday: &str) -> Result<Self> {
        Ok(FilterSpec {
            month: month.parse()?,
            weekday: weekday.parse()?,
        })
    }

    pub fn is_unfiltered(&self) -> bool {
        self.month == MonthFilter::All && self.weekday == DayFilter::All
    }

    pub fn matches(&self, trip: &TripRecord) -> bool {
        let month_ok = match self.month {
            MonthFilter::All => true,
            MonthFilter::Only(month) => trip.month == month,
        };
        let day_ok = match self.weekday {
            DayFilter::All => true,
            DayFilter::Only(day) => trip.weekday == day,
        };
        month_ok && day_ok
    }
}

impl fmt::Display for FilterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "month={}, day={}", self.month, self.weekday)
    }
}
