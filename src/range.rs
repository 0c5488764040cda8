use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Symbolic date-range selector chosen by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RangeSelector {
    /// Jan 1 of the current year through today.
    Ytd,
    /// Rolling 30-day window ending today.
    Last30,
    /// Rolling 90-day window ending today.
    Last90,
    /// The full prior calendar year.
    LastYear,
    /// Explicit bounds. Both must be present; a half-specified custom range
    /// fails closed rather than silently defaulting.
    Custom {
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RangeError {
    #[error("custom range requires both start and end dates")]
    MissingCustomBounds,
    #[error("custom range start {start} is after end {end}")]
    StartAfterEnd { start: NaiveDate, end: NaiveDate },
}

/// Concrete resolved window; both bounds inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

impl RangeSelector {
    /// Resolve to a concrete window. Pure function of `today` and `self`.
    pub fn resolve(&self, today: NaiveDate) -> Result<DateWindow, RangeError> {
        match self {
            RangeSelector::Ytd => Ok(DateWindow {
                start: year_start(today.year()),
                end: today,
            }),
            RangeSelector::Last30 => Ok(rolling(today, 30)),
            RangeSelector::Last90 => Ok(rolling(today, 90)),
            RangeSelector::LastYear => {
                let year = today.year() - 1;
                Ok(DateWindow {
                    start: year_start(year),
                    end: year_end(year),
                })
            }
            RangeSelector::Custom { start, end } => match (start, end) {
                (Some(start), Some(end)) => {
                    if start > end {
                        Err(RangeError::StartAfterEnd {
                            start: *start,
                            end: *end,
                        })
                    } else {
                        Ok(DateWindow {
                            start: *start,
                            end: *end,
                        })
                    }
                }
                _ => Err(RangeError::MissingCustomBounds),
            },
        }
    }
}

fn rolling(today: NaiveDate, days: i64) -> DateWindow {
    DateWindow {
        start: today - Duration::days(days),
        end: today,
    }
}

fn year_start(year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, 1, 1).unwrap()
}

fn year_end(year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, 12, 31).unwrap()
}
