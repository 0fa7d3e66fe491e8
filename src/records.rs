use chrono::{Datelike, NaiveDateTime, TimeDelta, Timelike};
use csv::{ReaderBuilder, StringRecord};
use indicatif::ProgressIterator;
use log::{debug, info, warn};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::io::Read;

use super::calendar::{Day, Month};
use super::error::{AnalysisError, Result};
use super::filters::FilterSpec;
use super::utils::progress_bar_for_count;

const START_TIME: &str = "Start Time";
const END_TIME: &str = "End Time";
const START_STATION: &str = "Start Station";
const END_STATION: &str = "End Station";
const USER_TYPE: &str = "User Type";
const GENDER: &str = "Gender";
const BIRTH_YEAR: &str = "Birth Year";

const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M",
];

/// Columns that only some cities report. Presence is a property of the
/// whole record set, decided from the header.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OptionalColumn {
    UserType,
    Gender,
    BirthYear,
}

impl OptionalColumn {
    pub const ALL: [OptionalColumn; 3] = [
        OptionalColumn::UserType,
        OptionalColumn::Gender,
        OptionalColumn::BirthYear,
    ];
}

/// One bicycle rental. `month`, `weekday` and `hour` are derived from
/// `start_time` when the record is parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct TripRecord {
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub start_station: String,
    pub end_station: String,
    pub user_type: Option<String>,
    pub gender: Option<String>,
    pub birth_year: Option<i32>,
    pub month: Month,
    pub weekday: Day,
    pub hour: u32,
}

impl TripRecord {
    pub fn new(
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
        start_station: impl Into<String>,
        end_station: impl Into<String>,
    ) -> Self {
        TripRecord {
            start_time,
            end_time,
            start_station: start_station.into(),
            end_station: end_station.into(),
            user_type: None,
            gender: None,
            birth_year: None,
            // chrono months are always within 1..=12
            month: Month::from_number(start_time.month()).unwrap_or(Month::January),
            weekday: Day::from(start_time.weekday()),
            hour: start_time.hour(),
        }
    }

    /// Signed: negative when the source has the end before the start.
    pub fn duration(&self) -> TimeDelta {
        self.end_time - self.start_time
    }
}

impl fmt::Display for TripRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} | {} to {}",
            self.start_time, self.end_time, self.start_station, self.end_station
        )?;
        if let Some(user_type) = &self.user_type {
            write!(f, " | {user_type}")?;
        }
        if let Some(gender) = &self.gender {
            write!(f, " | {gender}")?;
        }
        if let Some(birth_year) = self.birth_year {
            write!(f, " | born {birth_year}")?;
        }
        Ok(())
    }
}

/// Ordered trips of a single city, with the optional columns that city reports.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordSet {
    records: Vec<TripRecord>,
    columns: BTreeSet<OptionalColumn>,
}

impl RecordSet {
    pub fn new(records: Vec<TripRecord>, columns: BTreeSet<OptionalColumn>) -> Self {
        RecordSet { records, columns }
    }

    pub fn records(&self) -> &[TripRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn columns(&self) -> &BTreeSet<OptionalColumn> {
        &self.columns
    }

    pub fn has_column(&self, column: OptionalColumn) -> bool {
        self.columns.contains(&column)
    }

    /// Keeps the trips matching `filter`, preserving their order.
    pub fn filter(mut self, filter: &FilterSpec) -> RecordSet {
        if filter.is_unfiltered() {
            return self;
        }
        let before = self.records.len();
        self.records.retain(|trip| filter.matches(trip));
        debug!(
            "Filter ({filter}) kept {} of {} trips",
            self.records.len(),
            before
        );
        self
    }

    /// Records `[start, start + len)`, clamped to the set's bounds.
    pub fn window(&self, start: usize, len: usize) -> &[TripRecord] {
        let start = start.min(self.records.len());
        let end = start.saturating_add(len).min(self.records.len());
        &self.records[start..end]
    }

    pub fn cursor(&self, page_size: usize) -> RecordCursor<'_> {
        RecordCursor {
            trips: self,
            position: 0,
            page_size: page_size.max(1),
        }
    }
}

/// Walks a record set in consecutive windows, e.g. five trips at a time.
#[derive(Debug, Clone)]
pub struct RecordCursor<'a> {
    trips: &'a RecordSet,
    position: usize,
    page_size: usize,
}

impl<'a> RecordCursor<'a> {
    /// Index of the first record the next window will return.
    pub fn position(&self) -> usize {
        self.position
    }
}

impl<'a> Iterator for RecordCursor<'a> {
    type Item = &'a [TripRecord];

    fn next(&mut self) -> Option<Self::Item> {
        let window = self.trips.window(self.position, self.page_size);
        if window.is_empty() {
            return None;
        }
        self.position += window.len();
        Some(window)
    }
}

/// Column positions resolved from the CSV header.
struct Layout {
    start_time: usize,
    end_time: usize,
    start_station: usize,
    end_station: usize,
    user_type: Option<usize>,
    gender: Option<usize>,
    birth_year: Option<usize>,
}

impl Layout {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let require = |name: &str| {
            find(name).ok_or_else(|| AnalysisError::MalformedInput {
                line: 1,
                reason: format!("missing required column '{name}'"),
            })
        };
        Ok(Layout {
            start_time: require(START_TIME)?,
            end_time: require(END_TIME)?,
            start_station: require(START_STATION)?,
            end_station: require(END_STATION)?,
            user_type: find(USER_TYPE),
            gender: find(GENDER),
            birth_year: find(BIRTH_YEAR),
        })
    }

    fn columns(&self) -> BTreeSet<OptionalColumn> {
        OptionalColumn::ALL
            .into_iter()
            .filter(|column| match column {
                OptionalColumn::UserType => self.user_type.is_some(),
                OptionalColumn::Gender => self.gender.is_some(),
                OptionalColumn::BirthYear => self.birth_year.is_some(),
            })
            .collect()
    }
}

/// Reads a city's trip log. Every row is read before any is converted; one
/// unparseable start or end time fails the whole load.
pub fn parse<R: Read>(reader: R) -> Result<RecordSet> {
    let mut csv_reader = ReaderBuilder::new().flexible(true).from_reader(reader);
    let layout = Layout::from_headers(csv_reader.headers()?)?;
    let columns = layout.columns();

    let rows = csv_reader
        .records()
        .collect::<std::result::Result<Vec<StringRecord>, csv::Error>>()?;
    info!("Parsing {} trip rows", rows.len());

    let progress = progress_bar_for_count(rows.len());
    let mut unreadable_birth_years = 0usize;
    let mut records = Vec::with_capacity(rows.len());
    for row in rows.iter().progress_with(progress) {
        let line = row.position().map(|p| p.line()).unwrap_or(0);
        let start_time = parse_timestamp(field(row, layout.start_time), line, START_TIME)?;
        let end_time = parse_timestamp(field(row, layout.end_time), line, END_TIME)?;

        let mut trip = TripRecord::new(
            start_time,
            end_time,
            field(row, layout.start_station),
            field(row, layout.end_station),
        );
        trip.user_type = layout.user_type.and_then(|i| optional_text(row, i));
        trip.gender = layout.gender.and_then(|i| optional_text(row, i));
        if let Some(raw) = layout.birth_year.and_then(|i| optional_text(row, i)) {
            trip.birth_year = parse_birth_year(&raw);
            if trip.birth_year.is_none() {
                unreadable_birth_years += 1;
            }
        }
        records.push(trip);
    }

    if unreadable_birth_years > 0 {
        warn!("{unreadable_birth_years} birth year values could not be read and were treated as missing");
    }
    debug!("Optional columns present: {columns:?}");
    Ok(RecordSet::new(records, columns))
}

fn field(row: &StringRecord, index: usize) -> &str {
    row.get(index).unwrap_or("").trim()
}

fn optional_text(row: &StringRecord, index: usize) -> Option<String> {
    let value = field(row, index);
    (!value.is_empty()).then(|| value.to_string())
}

fn parse_timestamp(raw: &str, line: u64, column: &str) -> Result<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .ok_or_else(|| AnalysisError::MalformedInput {
            line,
            reason: format!("cannot parse {column} '{raw}'"),
        })
}

/// Birth years are often written as floats, e.g. `1989.0`.
fn parse_birth_year(raw: &str) -> Option<i32> {
    if let Ok(year) = raw.parse::<i32>() {
        return Some(year);
    }
    raw.parse::<f64>()
        .ok()
        .filter(|year| year.is_finite())
        .map(|year| year.trunc() as i32)
}
