//! The book record and its borrowing status.
//!
//! A freshly constructed [`Book`] is a plain data literal: the defaults are
//! not run through update validation, so the rating default is pinned to the
//! valid range at compile time instead.

use std::fmt;
use std::str::FromStr;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::Result;

/// Day-precision date layout used on the wire and in update queries,
/// e.g. `2011-Jan-11`.
pub const DATE_FORMAT: &str = "%Y-%b-%d";

pub const DEFAULT_TITLE: &str = "Untitled";
pub const DEFAULT_AUTHOR: &str = "Unknown";
pub const DEFAULT_PUBLISHER: &str = "Not Published";
pub const DEFAULT_RATING: u8 = 2;

/// Lowest rating a user may set.
pub const MIN_RATING: u8 = 1;
/// Highest rating a user may set.
pub const MAX_RATING: u8 = 3;

const _: () = assert!(rating_in_range(DEFAULT_RATING as i64));

/// Whether `rating` is within `MIN_RATING..=MAX_RATING`.
pub const fn rating_in_range(rating: i64) -> bool {
    rating >= MIN_RATING as i64 && rating <= MAX_RATING as i64
}

/// Borrowing state of a book.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    /// On the shelf.
    #[default]
    CheckedIn,
    /// Lent out.
    CheckedOut,
}

impl Status {
    /// The only state reachable from this one.
    pub fn toggled(self) -> Self {
        match self {
            Status::CheckedIn => Status::CheckedOut,
            Status::CheckedOut => Status::CheckedIn,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::CheckedIn => "CheckedIn",
            Status::CheckedOut => "CheckedOut",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a status literal is neither `CheckedIn` nor `CheckedOut`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid status {0:?}, expected CheckedIn or CheckedOut")]
pub struct ParseStatusError(pub String);

impl FromStr for Status {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "CheckedIn" => Ok(Status::CheckedIn),
            "CheckedOut" => Ok(Status::CheckedOut),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

/// A library book entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Book {
    pub title: String,
    pub author: String,
    pub publisher: String,
    #[serde(with = "date_format")]
    pub publish_date: NaiveDate,
    pub rating: u8,
    pub status: Status,
}

impl Book {
    /// A book carrying every default, published today.
    pub fn new() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            author: DEFAULT_AUTHOR.to_string(),
            publisher: DEFAULT_PUBLISHER.to_string(),
            publish_date: today(),
            rating: DEFAULT_RATING,
            status: Status::CheckedIn,
        }
    }

    /// Encode as the JSON wire form.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(Into::into)
    }

    /// Decode from the JSON wire form.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(Into::into)
    }
}

impl Default for Book {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a date in [`DATE_FORMAT`].
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Returned when text is not a date in exactly the [`DATE_FORMAT`] layout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid date {0:?}, expected a date like 2011-Jan-11")]
pub struct ParseDateError(pub String);

/// Parse a date written in exactly the [`DATE_FORMAT`] layout: two-digit
/// day, three-letter month, no surrounding whitespace. Month case is ignored.
pub fn parse_date(text: &str) -> std::result::Result<NaiveDate, ParseDateError> {
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .ok()
        .filter(|date| format_date(*date).eq_ignore_ascii_case(text))
        .ok_or_else(|| ParseDateError(text.to_string()))
}

/// The current local date, truncated to day precision.
///
/// # Panics
///
/// Panics if the day-precision text form of today does not parse back to the
/// same date. That means the clock or locale is broken, not that input was bad.
pub fn today() -> NaiveDate {
    let date = Local::now().date_naive();
    match parse_date(&format_date(date)) {
        Ok(parsed) if parsed == date => parsed,
        Ok(parsed) => panic!("date round-trip mismatch: {date} became {parsed}"),
        Err(e) => panic!("date round-trip failed for {date}: {e}"),
    }
}

mod date_format {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_date(*date))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        super::parse_date(&text).map_err(serde::de::Error::custom)
    }
}
