//! Calendar projection: pages grouped by day.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate};
use serde::Serialize;

use crate::blob::property_text;
use crate::defaults;
use crate::models::{Column, ColumnType, Page};

/// Pages falling on one calendar day.
#[derive(Debug, Clone, Serialize)]
pub struct CalendarDay<'a> {
    pub date: NaiveDate,
    pub pages: Vec<&'a Page>,
}

/// Parse a date property. Accepts `2023-10-12`, RFC 3339 timestamps, and
/// `Oct 12, 2023`.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
        .or_else(|| NaiveDate::parse_from_str(value, "%b %d, %Y").ok())
}

/// Group non-template pages by the value of the first date column (or the
/// `date` property when the schema has none). Days are ascending; pages
/// without a parseable date are skipped.
pub fn calendar<'a>(columns: &[Column], pages: &'a [Page]) -> Vec<CalendarDay<'a>> {
    let key = columns
        .iter()
        .find(|c| c.column_type == ColumnType::Date)
        .map(|c| c.id.as_str())
        .unwrap_or(defaults::DATE_KEY);

    let mut days: BTreeMap<NaiveDate, Vec<&Page>> = BTreeMap::new();
    for page in pages.iter().filter(|p| !p.is_template) {
        if let Some(date) = parse_date(&property_text(page.property(key))) {
            days.entry(date).or_default().push(page);
        }
    }
    days.into_iter()
        .map(|(date, pages)| CalendarDay { date, pages })
        .collect()
}
