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

use serde::{Deserialize, Serialize};
use std::fmt;

const DEDUP_CAPTION_PREFIX: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Instagram,
    Facebook,
    Linkedin,
    Twitter,
    Tiktok,
    Youtube,
    GoogleBusinessProfile,
    Unknown,
}

impl Platform {
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Instagram => "instagram",
            Platform::Facebook => "facebook",
            Platform::Linkedin => "linkedin",
            Platform::Twitter => "twitter",
            Platform::Tiktok => "tiktok",
            Platform::Youtube => "youtube",
            Platform::GoogleBusinessProfile => "google_business_profile",
            Platform::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One normalised post. Optional fields serialise only when the source
/// export carried a matching column, so field presence tracks data
/// availability rather than a fixed schema.
#[derive(Debug, Clone, Serialize)]
pub struct PostRecord {
    pub date: String,
    pub platform: Platform,
    pub source_file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub likes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shares: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saves: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reach: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impressions: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_clicks: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engagement_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_views: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permalink: Option<String>,
    pub total_engagement: u64,
}

impl PostRecord {
    pub fn new(date: String, platform: Platform, source_file: String) -> Self {
        Self {
            date,
            platform,
            source_file,
            post_type: None,
            caption: None,
            likes: None,
            comments: None,
            shares: None,
            saves: None,
            reach: None,
            impressions: None,
            link_clicks: None,
            engagement_rate: None,
            video_views: None,
            permalink: None,
            total_engagement: 0,
        }
    }

    /// Computes the derived metrics: `total_engagement` always, and
    /// `engagement_rate` only when the source did not supply one and the
    /// record has a positive reach.
    pub fn finalise(&mut self) {
        let total = self.likes.unwrap_or(0)
            + self.comments.unwrap_or(0)
            + self.shares.unwrap_or(0)
            + self.saves.unwrap_or(0);
        self.total_engagement = total;
        if self.engagement_rate.is_none() {
            if let Some(reach) = self.reach.filter(|r| *r > 0) {
                let rate = total as f64 / reach as f64 * 100.0;
                self.engagement_rate = Some((rate * 100.0).round() / 100.0);
            }
        }
    }

    /// Composite identity used by the aggregation pass: same day, same
    /// platform, same like count, same first 50 caption characters.
    pub fn dedup_key(&self) -> String {
        let caption: String = self
            .caption
            .as_deref()
            .unwrap_or("")
            .chars()
            .take(DEDUP_CAPTION_PREFIX)
            .collect();
        format!(
            "{}_{}_{}_{}",
            self.date,
            self.platform,
            self.likes.unwrap_or(0),
            caption
        )
    }
}
