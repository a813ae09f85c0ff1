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
use std::collections::BTreeMap;
use std::fmt;

const RENDERED_DATE_FORMATS: usize = 5;
const RENDERED_ERRORS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SkipReason {
    DescriptionRow,
    NormalizationFailed,
    ParseError,
    NoValidDate,
    NoExcelSupport,
}

impl SkipReason {
    pub fn as_str(self) -> &'static str {
        match self {
            SkipReason::DescriptionRow => "description_row",
            SkipReason::NormalizationFailed => "normalization_failed",
            SkipReason::ParseError => "parse_error",
            SkipReason::NoValidDate => "no_valid_date",
            SkipReason::NoExcelSupport => "no_excel_support",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-run (or per-file) parsing statistics. Each ingestion call returns
/// its own report; the orchestrator merges them, so no accumulator is
/// shared across files.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub files_processed: u64,
    pub files_failed: u64,
    pub files_skipped: u64,
    pub posts_parsed: u64,
    pub posts_skipped: u64,
    pub skip_reasons: BTreeMap<SkipReason, u64>,
    pub posts_by_platform: BTreeMap<Platform, u64>,
    pub date_formats: BTreeMap<String, u64>,
    pub errors: Vec<String>,
}

impl RunReport {
    pub fn record_skip(&mut self, reason: SkipReason) {
        self.posts_skipped += 1;
        *self.skip_reasons.entry(reason).or_insert(0) += 1;
    }

    pub fn record_post(&mut self, platform: Platform) {
        self.posts_parsed += 1;
        *self.posts_by_platform.entry(platform).or_insert(0) += 1;
    }

    pub fn record_date_format(&mut self, format: &str) {
        *self.date_formats.entry(format.to_string()).or_insert(0) += 1;
    }

    pub fn record_error(&mut self, message: String) {
        self.errors.push(message);
    }

    pub fn merge(&mut self, other: RunReport) {
        self.files_processed += other.files_processed;
        self.files_failed += other.files_failed;
        self.files_skipped += other.files_skipped;
        self.posts_parsed += other.posts_parsed;
        self.posts_skipped += other.posts_skipped;
        for (reason, count) in other.skip_reasons {
            *self.skip_reasons.entry(reason).or_insert(0) += count;
        }
        for (platform, count) in other.posts_by_platform {
            *self.posts_by_platform.entry(platform).or_insert(0) += count;
        }
        for (format, count) in other.date_formats {
            *self.date_formats.entry(format).or_insert(0) += count;
        }
        self.errors.extend(other.errors);
    }

    /// Human-readable statistics block, printed at the end of a run.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let rule = "=".repeat(70);
        out.push_str(&format!("{rule}\nPARSING STATISTICS\n{rule}\n"));
        out.push_str("\nFiles:\n");
        out.push_str(&format!("   Processed: {}\n", self.files_processed));
        out.push_str(&format!("   Failed:    {}\n", self.files_failed));
        out.push_str(&format!("   Skipped:   {}\n", self.files_skipped));
        out.push_str("\nPosts:\n");
        out.push_str(&format!("   Parsed:  {}\n", self.posts_parsed));
        out.push_str(&format!("   Skipped: {}\n", self.posts_skipped));
        if !self.posts_by_platform.is_empty() {
            out.push_str("\nBy platform:\n");
            for (platform, count) in &self.posts_by_platform {
                out.push_str(&format!("   {platform}: {count}\n"));
            }
        }
        if !self.skip_reasons.is_empty() {
            out.push_str("\nSkip reasons:\n");
            let mut reasons: Vec<_> = self.skip_reasons.iter().collect();
            reasons.sort_by(|a, b| b.1.cmp(a.1));
            for (reason, count) in reasons {
                out.push_str(&format!("   {reason}: {count}\n"));
            }
        }
        if !self.date_formats.is_empty() {
            out.push_str("\nDate formats detected:\n");
            let mut formats: Vec<_> = self.date_formats.iter().collect();
            formats.sort_by(|a, b| b.1.cmp(a.1));
            for (format, count) in formats.into_iter().take(RENDERED_DATE_FORMATS) {
                out.push_str(&format!("   {format}: {count} times\n"));
            }
        }
        if !self.errors.is_empty() {
            out.push_str(&format!("\nErrors ({} total):\n", self.errors.len()));
            for error in self.errors.iter().take(RENDERED_ERRORS) {
                out.push_str(&format!("   {error}\n"));
            }
            if self.errors.len() > RENDERED_ERRORS {
                out.push_str(&format!(
                    "   ... and {} more\n",
                    self.errors.len() - RENDERED_ERRORS
                ));
            }
        }
        out.push_str(&format!("\n{rule}\n"));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_sums_counters_and_histograms() {
        let mut left = RunReport::default();
        left.files_processed = 2;
        left.record_post(Platform::Instagram);
        left.record_skip(SkipReason::NoValidDate);

        let mut right = RunReport::default();
        right.files_processed = 1;
        right.files_failed = 1;
        right.record_post(Platform::Instagram);
        right.record_post(Platform::Facebook);
        right.record_skip(SkipReason::NoValidDate);
        right.record_error("Row 4 in bad.csv: oops".to_string());

        left.merge(right);
        assert_eq!(left.files_processed, 3);
        assert_eq!(left.files_failed, 1);
        assert_eq!(left.posts_parsed, 3);
        assert_eq!(left.posts_by_platform[&Platform::Instagram], 2);
        assert_eq!(left.skip_reasons[&SkipReason::NoValidDate], 2);
        assert_eq!(left.errors.len(), 1);
    }

    #[test]
    fn test_render_lists_sections_for_populated_histograms() {
        let mut report = RunReport::default();
        report.files_processed = 1;
        report.record_post(Platform::Tiktok);
        report.record_skip(SkipReason::DescriptionRow);
        report.record_date_format("%Y-%m-%d");

        let rendered = report.render();
        assert!(rendered.contains("PARSING STATISTICS"));
        assert!(rendered.contains("tiktok: 1"));
        assert!(rendered.contains("description_row: 1"));
        assert!(rendered.contains("%Y-%m-%d: 1 times"));
        assert!(!rendered.contains("Errors ("), "no error section when empty");
    }

    #[test]
    fn test_render_elides_errors_past_ten() {
        let mut report = RunReport::default();
        for i in 0..13 {
            report.record_error(format!("Row {i} in x.csv: bad"));
        }
        let rendered = report.render();
        assert!(rendered.contains("Errors (13 total):"));
        assert!(rendered.contains("... and 3 more"));
    }
}
