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

use crate::normalize::numbers::{parse_count, parse_percentage};
use crate::record::PostRecord;
use indexmap::IndexMap;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    PostType,
    Caption,
    Likes,
    Comments,
    Shares,
    Saves,
    Reach,
    Impressions,
    LinkClicks,
    EngagementRate,
    VideoViews,
    Permalink,
}

struct FieldRule {
    target: Target,
    variants: &'static [&'static str],
}

/// Canonical output field to the source column names that feed it, in
/// match priority order. Once a variant matches, later variants for the
/// same field are not consulted.
const FIELD_RULES: [FieldRule; 12] = [
    FieldRule {
        target: Target::PostType,
        variants: &["type", "post type", "media_type", "format", "content type"],
    },
    FieldRule {
        target: Target::Caption,
        variants: &["caption", "description", "text", "post text", "content", "title"],
    },
    FieldRule {
        target: Target::Likes,
        variants: &["likes", "like count", "reactions"],
    },
    FieldRule {
        target: Target::Comments,
        variants: &["comments", "comment count"],
    },
    FieldRule {
        target: Target::Shares,
        variants: &["shares", "share count"],
    },
    FieldRule {
        target: Target::Saves,
        variants: &["saves", "save count", "saved", "bookmarks"],
    },
    FieldRule {
        target: Target::Reach,
        variants: &["reach", "accounts reached", "unique viewers"],
    },
    FieldRule {
        target: Target::Impressions,
        variants: &["impressions", "views", "total views"],
    },
    FieldRule {
        target: Target::LinkClicks,
        variants: &["link clicks", "clicks", "website clicks"],
    },
    FieldRule {
        target: Target::EngagementRate,
        variants: &["engagement rate", "engagement"],
    },
    FieldRule {
        target: Target::VideoViews,
        variants: &["video views", "plays", "reel plays"],
    },
    FieldRule {
        target: Target::Permalink,
        variants: &["permalink", "post link", "url"],
    },
];

/// Maps heterogeneous source columns onto the fixed output schema.
/// Matching is against lowercased, trimmed header names with non-empty
/// values. Returns how many canonical fields were filled.
pub fn apply_mappings(values: &IndexMap<String, String>, post: &mut PostRecord) -> usize {
    let mut lowered: HashMap<String, &String> = HashMap::with_capacity(values.len());
    for (key, value) in values {
        if !value.is_empty() {
            lowered.insert(key.trim().to_lowercase(), value);
        }
    }
    let mut mapped = 0;
    for rule in &FIELD_RULES {
        for variant in rule.variants {
            if let Some(value) = lowered.get(*variant) {
                assign(post, rule.target, value);
                mapped += 1;
                break;
            }
        }
    }
    mapped
}

fn assign(post: &mut PostRecord, target: Target, value: &str) {
    match target {
        Target::PostType => post.post_type = Some(value.trim().to_string()),
        Target::Caption => post.caption = Some(value.trim().to_string()),
        Target::Likes => post.likes = Some(parse_count(value)),
        Target::Comments => post.comments = Some(parse_count(value)),
        Target::Shares => post.shares = Some(parse_count(value)),
        Target::Saves => post.saves = Some(parse_count(value)),
        Target::Reach => post.reach = Some(parse_count(value)),
        Target::Impressions => post.impressions = Some(parse_count(value)),
        Target::LinkClicks => post.link_clicks = Some(parse_count(value)),
        Target::EngagementRate => post.engagement_rate = Some(parse_percentage(value)),
        Target::VideoViews => post.video_views = Some(parse_count(value)),
        Target::Permalink => post.permalink = Some(value.trim().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Platform;

    fn post() -> PostRecord {
        PostRecord::new(
            "2025-01-01".to_string(),
            Platform::Unknown,
            "export.csv".to_string(),
        )
    }

    fn row(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_first_variant_wins_over_later_ones() {
        let values = row(&[("Reactions", "10"), ("Likes", "5")]);
        let mut record = post();
        let mapped = apply_mappings(&values, &mut record);
        assert_eq!(mapped, 1);
        assert_eq!(record.likes, Some(5), "\"likes\" outranks \"reactions\"");
    }

    #[test]
    fn test_headers_match_case_insensitively_and_trimmed() {
        let values = row(&[("  LIKE COUNT ", "2.5k"), ("Comment Count", "7")]);
        let mut record = post();
        apply_mappings(&values, &mut record);
        assert_eq!(record.likes, Some(2500));
        assert_eq!(record.comments, Some(7));
    }

    #[test]
    fn test_empty_values_do_not_match() {
        let values = row(&[("Likes", ""), ("Reactions", "9")]);
        let mut record = post();
        apply_mappings(&values, &mut record);
        assert_eq!(record.likes, Some(9), "empty likes cell falls to reactions");
    }

    #[test]
    fn test_kind_dispatch_per_field() {
        let values = row(&[
            ("Type", " Reel "),
            ("Engagement Rate", "4.2%"),
            ("Views", "1.2k"),
            ("Permalink", "https://example.com/p/1 "),
        ]);
        let mut record = post();
        let mapped = apply_mappings(&values, &mut record);
        assert_eq!(mapped, 4);
        assert_eq!(record.post_type.as_deref(), Some("Reel"));
        assert_eq!(record.engagement_rate, Some(4.2));
        assert_eq!(record.impressions, Some(1200));
        assert_eq!(record.permalink.as_deref(), Some("https://example.com/p/1"));
    }

    #[test]
    fn test_unmapped_row_reports_zero() {
        let values = row(&[("Store code", "A1"), ("Business name", "Cafe")]);
        let mut record = post();
        assert_eq!(apply_mappings(&values, &mut record), 0);
    }
}
