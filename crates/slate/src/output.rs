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

use crate::error::{IngestError, Result};
use crate::record::{Platform, PostRecord};
use crate::report::RunReport;
use chrono::Utc;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Serialize)]
struct DateRange {
    start: Option<String>,
    end: Option<String>,
}

#[derive(Debug, Serialize)]
struct ParsingStats {
    files_processed: u64,
    files_failed: u64,
    files_skipped: u64,
    posts_parsed: u64,
    posts_skipped: u64,
    errors: usize,
}

#[derive(Debug, Serialize)]
struct Metadata {
    generated_at: String,
    total_posts: usize,
    duplicates_removed: usize,
    date_range: DateRange,
    platforms: BTreeMap<Platform, u64>,
    parsing_stats: ParsingStats,
}

#[derive(Debug, Serialize)]
struct Document {
    metadata: Metadata,
    posts: Vec<PostRecord>,
}

#[derive(Debug, Clone, Copy)]
pub struct EmissionSummary {
    pub total_posts: usize,
    pub duplicates_removed: usize,
}

/// Sorts by date (ISO strings, so a plain string sort is chronological)
/// and keeps the first record per composite dedup key.
pub fn dedup_posts(mut posts: Vec<PostRecord>) -> (Vec<PostRecord>, usize) {
    posts.sort_by(|a, b| a.date.cmp(&b.date));
    let before = posts.len();
    let mut seen = HashSet::with_capacity(before);
    posts.retain(|post| seen.insert(post.dedup_key()));
    let removed = before - posts.len();
    (posts, removed)
}

/// Deduplicates, assembles the metadata block, and writes the whole
/// document as pretty JSON, overwriting any existing file at `path`.
/// Refuses to write an empty document: a run with no posts is a failure,
/// not an output.
pub fn write_document(
    posts: Vec<PostRecord>,
    report: &RunReport,
    path: &Path,
) -> Result<EmissionSummary> {
    if posts.is_empty() {
        return Err(IngestError::EmptyOutput);
    }
    let (posts, duplicates_removed) = dedup_posts(posts);

    let mut platforms: BTreeMap<Platform, u64> = BTreeMap::new();
    for post in &posts {
        *platforms.entry(post.platform).or_insert(0) += 1;
    }
    let metadata = Metadata {
        generated_at: Utc::now().to_rfc3339(),
        total_posts: posts.len(),
        duplicates_removed,
        date_range: DateRange {
            start: posts.first().map(|p| p.date.clone()),
            end: posts.last().map(|p| p.date.clone()),
        },
        platforms,
        parsing_stats: ParsingStats {
            files_processed: report.files_processed,
            files_failed: report.files_failed,
            files_skipped: report.files_skipped,
            posts_parsed: report.posts_parsed,
            posts_skipped: report.posts_skipped,
            errors: report.errors.len(),
        },
    };
    let summary = EmissionSummary {
        total_posts: posts.len(),
        duplicates_removed,
    };

    let document = Document { metadata, posts };
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, &document)?;
    writer.flush()?;
    Ok(summary)
}
