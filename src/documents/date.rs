//! Validated target dates.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use thiserror::Error;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid date '{input}': expected a calendar date formatted as YYYY-MM-DD")]
pub struct DateError {
    pub input: String,
}

/// A calendar date in canonical `YYYY-MM-DD` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TargetDate(NaiveDate);

impl TargetDate {
    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl FromStr for TargetDate {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DateError { input: s.to_string() };
        let date = NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|_| invalid())?;

        // chrono accepts unpadded fields; only the canonical spelling is allowed.
        if date.format(DATE_FORMAT).to_string() != s {
            return Err(invalid());
        }
        Ok(Self(date))
    }
}

impl fmt::Display for TargetDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}
