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

use crate::record::Platform;
use indexmap::IndexMap;

/// Column names that mark a Google Business Profile export as a
/// location-level aggregate rather than per-post data. Matched against
/// raw header names, exact and case-sensitive.
const AGGREGATE_MARKER_COLUMNS: [&str; 3] = ["Store code", "Business name", "Total views"];

struct PlatformRule {
    needles: &'static [&'static str],
    platform: Platform,
}

/// Filename-substring rules, evaluated in order; first match wins.
const PLATFORM_RULES: [PlatformRule; 6] = [
    PlatformRule {
        needles: &["instagram", "ig"],
        platform: Platform::Instagram,
    },
    PlatformRule {
        needles: &["facebook", "fb"],
        platform: Platform::Facebook,
    },
    PlatformRule {
        needles: &["linkedin"],
        platform: Platform::Linkedin,
    },
    PlatformRule {
        needles: &["twitter", "x.com"],
        platform: Platform::Twitter,
    },
    PlatformRule {
        needles: &["tiktok"],
        platform: Platform::Tiktok,
    },
    PlatformRule {
        needles: &["youtube"],
        platform: Platform::Youtube,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detection {
    Post(Platform),
    /// A GBP location/aggregate summary row. Not a post; the row is
    /// discarded entirely.
    Aggregate,
}

/// Classifies a row from its source name and, for the GBP special case,
/// its raw column names.
pub fn detect(source: &str, values: &IndexMap<String, String>) -> Detection {
    let name = source.to_lowercase();
    if name.contains("gbp") || name.contains("google") {
        if AGGREGATE_MARKER_COLUMNS
            .iter()
            .any(|column| values.contains_key(*column))
        {
            return Detection::Aggregate;
        }
        return Detection::Post(Platform::GoogleBusinessProfile);
    }
    for rule in &PLATFORM_RULES {
        if rule.needles.iter().any(|needle| name.contains(needle)) {
            return Detection::Post(rule.platform);
        }
    }
    Detection::Post(Platform::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(keys: &[&str]) -> IndexMap<String, String> {
        keys.iter()
            .map(|k| (k.to_string(), "x".to_string()))
            .collect()
    }

    #[test]
    fn test_filename_rules_in_priority_order() {
        let empty = IndexMap::new();
        assert_eq!(
            detect("instagram_export.csv", &empty),
            Detection::Post(Platform::Instagram)
        );
        assert_eq!(
            detect("fb_posts.xlsx:Sheet1", &empty),
            Detection::Post(Platform::Facebook)
        );
        assert_eq!(
            detect("x.com-archive.csv", &empty),
            Detection::Post(Platform::Twitter)
        );
        assert_eq!(
            detect("report.csv", &empty),
            Detection::Post(Platform::Unknown)
        );
    }

    #[test]
    fn test_ig_substring_matches_shorthand_exports() {
        let empty = IndexMap::new();
        assert_eq!(
            detect("ig_2025.csv", &empty),
            Detection::Post(Platform::Instagram)
        );
    }

    #[test]
    fn test_gbp_aggregate_needs_marker_column() {
        assert_eq!(
            detect("gbp_locations.csv", &row(&["Business name", "Total views"])),
            Detection::Aggregate
        );
        assert_eq!(
            detect("google_posts.csv", &row(&["Post title", "Views"])),
            Detection::Post(Platform::GoogleBusinessProfile)
        );
    }

    #[test]
    fn test_aggregate_markers_are_case_sensitive() {
        assert_eq!(
            detect("gbp_locations.csv", &row(&["business name"])),
            Detection::Post(Platform::GoogleBusinessProfile),
            "marker columns match the raw header exactly"
        );
    }

    #[test]
    fn test_gbp_check_precedes_filename_rules() {
        // "google" wins even when another platform name also appears.
        assert_eq!(
            detect("google_vs_facebook.csv", &row(&["Post title"])),
            Detection::Post(Platform::GoogleBusinessProfile)
        );
    }
}
