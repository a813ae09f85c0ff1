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

pub mod dates;
pub mod fields;
pub mod numbers;
pub mod platform;

use crate::record::PostRecord;
use crate::report::{RunReport, SkipReason};
use crate::IngestConfig;
use indexmap::IndexMap;

/// Detects the secondary header row some exports (notably Google
/// Business Profile) emit, restating column meanings in prose. Two or
/// more distinct indicator phrases across the row's values mark it as
/// description rather than data.
pub fn is_description_row(values: &IndexMap<String, String>, indicators: &[String]) -> bool {
    let joined = values
        .values()
        .filter(|v| !v.is_empty())
        .map(|v| v.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");
    indicators
        .iter()
        .filter(|indicator| joined.contains(indicator.as_str()))
        .count()
        >= 2
}

/// Normalises one decoded row into a `PostRecord`, or drops it with a
/// tallied reason. Steps run in fixed order: platform detection, date
/// extraction, field mapping, derived metrics, retention filter.
pub fn normalize_row(
    values: &IndexMap<String, String>,
    source: &str,
    config: &IngestConfig,
    report: &mut RunReport,
) -> Option<PostRecord> {
    let detected = match platform::detect(source, values) {
        platform::Detection::Aggregate => {
            report.record_skip(SkipReason::NormalizationFailed);
            return None;
        }
        platform::Detection::Post(platform) => platform,
    };

    let Some((date, format)) = dates::extract_date(values, config) else {
        report.record_skip(SkipReason::NoValidDate);
        return None;
    };
    report.record_date_format(&format);

    let mut post = PostRecord::new(date, detected, source.to_string());
    let mapped = fields::apply_mappings(values, &mut post);
    if mapped == 0 {
        report.record_skip(SkipReason::NormalizationFailed);
        return None;
    }
    post.finalise();
    Some(post)
}
