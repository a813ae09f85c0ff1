// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2024 Jonathan Lee
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License version 3
// as published by the Free Software Foundation.
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see https://www.gnu.org/licenses/.

use crate::IngestConfig;
use chrono::{NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

const DAY_FORMAT: &str = "%Y-%m-%d";
pub const REGEX_FALLBACK_LABEL: &str = "regex_yyyy-mm-dd";

static ISO_DAY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{4}-\d{2}-\d{2}").unwrap());

/// Walks the configured date-column priority list and returns the first
/// candidate that parses, together with the format label that matched.
///
/// A candidate value containing "lifetime" is a Meta aggregate marker,
/// not a date; the next candidate column is tried instead. `date` sits
/// last in the priority list for the same reason.
pub fn extract_date(
    values: &IndexMap<String, String>,
    config: &IngestConfig,
) -> Option<(String, String)> {
    let mut lowered: HashMap<String, &String> = HashMap::with_capacity(values.len());
    for (key, value) in values {
        if !value.is_empty() {
            lowered.insert(key.trim().to_lowercase(), value);
        }
    }
    for column in &config.date_column_priority {
        let Some(value) = lowered.get(column.as_str()) else {
            continue;
        };
        if value.to_lowercase().contains("lifetime") {
            continue;
        }
        if let Some(parsed) = parse_date(value, &config.date_formats) {
            return Some(parsed);
        }
    }
    None
}

/// Tries each configured format in order, as a date-time first and then
/// as a bare date, normalising the winner to `YYYY-MM-DD`. Falls back to
/// an embedded ISO-day substring search.
pub fn parse_date(value: &str, formats: &[String]) -> Option<(String, String)> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lowered = trimmed.to_lowercase();
    if matches!(lowered.as_str(), "lifetime" | "n/a" | "null" | "none") {
        return None;
    }
    for format in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some((dt.format(DAY_FORMAT).to_string(), format.clone()));
        }
        if let Ok(day) = NaiveDate::parse_from_str(trimmed, format) {
            return Some((day.format(DAY_FORMAT).to_string(), format.clone()));
        }
    }
    ISO_DAY_RE
        .find(trimmed)
        .map(|m| (m.as_str().to_string(), REGEX_FALLBACK_LABEL.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> IngestConfig {
        IngestConfig::default()
    }

    fn row(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_meta_export_format_discards_time_of_day() {
        let cfg = config();
        let (date, format) = parse_date("03/25/2025 22:00", &cfg.date_formats).unwrap();
        assert_eq!(date, "2025-03-25");
        assert_eq!(format, "%m/%d/%Y %H:%M");
    }

    #[test]
    fn test_long_form_month_names() {
        let cfg = config();
        let (date, _) = parse_date("January 15, 2025", &cfg.date_formats).unwrap();
        assert_eq!(date, "2025-01-15");
        let (date, _) = parse_date("15 Jan 2025", &cfg.date_formats).unwrap();
        assert_eq!(date, "2025-01-15");
    }

    #[test]
    fn test_sentinel_values_are_rejected() {
        let cfg = config();
        for value in ["Lifetime", "n/a", "NULL", "none", "", "  "] {
            assert!(
                parse_date(value, &cfg.date_formats).is_none(),
                "{value:?} must not parse"
            );
        }
    }

    #[test]
    fn test_regex_fallback_finds_embedded_iso_day() {
        let cfg = config();
        let (date, format) = parse_date("exported 2025-06-01T08:30:00+02:00", &cfg.date_formats)
            .unwrap();
        assert_eq!(date, "2025-06-01");
        assert_eq!(format, REGEX_FALLBACK_LABEL);
    }

    #[test]
    fn test_publish_time_beats_lifetime_date_column() {
        let cfg = config();
        let values = row(&[("Date", "Lifetime"), ("Publish Time", "03/25/2025 22:00")]);
        let (date, _) = extract_date(&values, &cfg).expect("publish time must win");
        assert_eq!(date, "2025-03-25");
    }

    #[test]
    fn test_lifetime_in_priority_column_falls_through_to_next() {
        let cfg = config();
        // "publish time" itself carries the garbage marker; the plain
        // "date" column is still usable.
        let values = row(&[("Publish Time", "Lifetime"), ("Date", "2025-04-01")]);
        let (date, _) = extract_date(&values, &cfg).unwrap();
        assert_eq!(date, "2025-04-01");
    }

    #[test]
    fn test_no_candidate_column_yields_none() {
        let cfg = config();
        let values = row(&[("Likes", "5"), ("Caption", "hi")]);
        assert!(extract_date(&values, &cfg).is_none());
    }

    #[test]
    fn test_unparseable_candidate_tries_later_columns() {
        let cfg = config();
        let values = row(&[("Posted", "sometime"), ("Date", "2025-02-03")]);
        let (date, _) = extract_date(&values, &cfg).unwrap();
        assert_eq!(date, "2025-02-03");
    }

    #[test]
    fn test_day_first_format_only_when_month_slot_invalid() {
        let cfg = config();
        // 03/25 can only be month/day, 25/03 only day/month.
        let (us, _) = parse_date("03/25/2025", &cfg.date_formats).unwrap();
        assert_eq!(us, "2025-03-25");
        let (eu, _) = parse_date("25/03/2025", &cfg.date_formats).unwrap();
        assert_eq!(eu, "2025-03-25");
    }
}
