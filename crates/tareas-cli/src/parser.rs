use anyhow::Result;
use chrono::{Local, NaiveDate};
use chrono_english::{parse_date_string, Dialect};

/// Parses a calendar day given as `YYYY-MM-DD` or in plain English
/// ("today", "next friday", "3 days").
pub fn parse_day(date_str: &str) -> Result<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d") {
        return Ok(date);
    }

    parse_date_string(date_str, Local::now(), Dialect::Uk)
        .map(|date| date.date_naive())
        .map_err(|e| anyhow::anyhow!("Failed to parse date '{}': {}", date_str, e))
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
