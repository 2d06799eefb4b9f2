use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One scheduled ferry departure, as scraped from an operator's website.
///
/// `departure` is always a concrete local date + time: extraction composes
/// the calendar day of the week being read with the time-of-day text found
/// in the cell, so a bare time never leaves the extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Sailing {
    pub departure: NaiveDateTime,
    pub origin: String,
    pub destination: String,
    pub company: String,
}
