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

pub mod decode;
pub mod discovery;
pub mod error;
pub mod normalize;
pub mod output;
pub mod record;
pub mod report;

pub use error::{IngestError, Result};
pub use output::{write_document, EmissionSummary};
pub use record::{Platform, PostRecord};
pub use report::{RunReport, SkipReason};

use decode::{RawRow, RowParse};
use std::path::Path;
use tracing::{error, info, warn};

/// Knobs of the normalisation pass. The defaults encode the export
/// quirks the pipeline was built against; the format and column lists
/// are ordered, and that order is load-bearing (see `normalize::dates`).
#[derive(Debug, Clone)]
pub struct IngestConfig {
    pub date_formats: Vec<String>,
    pub date_column_priority: Vec<String>,
    pub description_indicators: Vec<String>,
    pub delimiter_sample_size: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            date_formats: vec![
                "%m/%d/%Y %H:%M".to_string(),
                "%Y-%m-%d".to_string(),
                "%m/%d/%Y".to_string(),
                "%d/%m/%Y".to_string(),
                "%Y/%m/%d".to_string(),
                "%Y-%m-%d %H:%M:%S".to_string(),
                "%m/%d/%Y %H:%M:%S".to_string(),
                "%d/%m/%Y %H:%M:%S".to_string(),
                "%Y-%m-%d %H:%M".to_string(),
                "%B %d, %Y".to_string(),
                "%b %d, %Y".to_string(),
                "%d %B %Y".to_string(),
                "%d %b %Y".to_string(),
            ],
            date_column_priority: vec![
                "publish time".to_string(),
                "publish date".to_string(),
                "posted date".to_string(),
                "posted".to_string(),
                "created".to_string(),
                "created time".to_string(),
                "timestamp".to_string(),
                "date".to_string(),
            ],
            description_indicators: vec![
                "number of".to_string(),
                "total count".to_string(),
                "interactions with".to_string(),
                "people that viewed".to_string(),
                "times your".to_string(),
                "how many".to_string(),
                "accounts that".to_string(),
            ],
            delimiter_sample_size: 1024,
        }
    }
}

/// Posts and statistics produced from one ingestion call. The caller
/// merges outcomes; nothing is accumulated behind the ingestor's back.
#[derive(Debug, Default)]
pub struct FileOutcome {
    pub posts: Vec<PostRecord>,
    pub report: RunReport,
}

impl FileOutcome {
    pub fn merge(&mut self, other: FileOutcome) {
        self.posts.extend(other.posts);
        self.report.merge(other.report);
    }
}

pub struct Ingestor {
    config: IngestConfig,
}

impl Ingestor {
    pub fn new() -> Self {
        Self {
            config: IngestConfig::default(),
        }
    }

    pub fn with_config(config: IngestConfig) -> Self {
        Self { config }
    }

    /// Dispatches on extension. Returns `None` for unsupported files so
    /// the caller can report them without treating them as failures.
    pub fn ingest_file(&self, path: &Path) -> Option<FileOutcome> {
        match discovery::extension_of(path).as_deref() {
            Some("csv") => Some(self.ingest_csv(path)),
            Some("xlsx") | Some("xls") => Some(self.ingest_workbook(path)),
            _ => None,
        }
    }

    /// Ingests one CSV file. File-level failures are recorded in the
    /// outcome's report, never returned as an error: the batch goes on.
    pub fn ingest_csv(&self, path: &Path) -> FileOutcome {
        let mut outcome = FileOutcome::default();
        outcome.report.files_processed = 1;
        let file_name = file_name_of(path);

        match decode::csv::read_rows(path, self.config.delimiter_sample_size) {
            Ok(rows) => {
                self.absorb(rows, &file_name, &mut outcome);
                if outcome.posts.is_empty() {
                    // Aggregate-only GBP exports are expected to yield
                    // zero posts; stay silent for those.
                    if !file_name.to_lowercase().contains("gbp") {
                        warn!("parsed 0 posts from {file_name} (check date formats)");
                        outcome.report.files_skipped += 1;
                    }
                } else {
                    info!("parsed {} posts from {file_name}", outcome.posts.len());
                }
            }
            Err(e) => {
                error!("failed to parse {file_name}: {e}");
                outcome
                    .report
                    .record_error(format!("Failed to parse {file_name}: {e}"));
                outcome.report.files_failed += 1;
            }
        }
        outcome
    }

    /// Ingests one workbook, scanning every worksheet. Row provenance is
    /// tagged `<filename>:<sheet>`.
    pub fn ingest_workbook(&self, path: &Path) -> FileOutcome {
        let mut outcome = FileOutcome::default();
        outcome.report.files_processed = 1;
        let file_name = file_name_of(path);

        match decode::excel::read_sheets(path) {
            Ok(sheets) => {
                for sheet in sheets {
                    let source = format!("{file_name}:{}", sheet.name);
                    let rows = sheet.rows.into_iter().map(RowParse::Row).collect();
                    self.absorb(rows, &source, &mut outcome);
                }
                if outcome.posts.is_empty() {
                    warn!("parsed 0 posts from {file_name}");
                    outcome.report.files_skipped += 1;
                } else {
                    info!("parsed {} posts from {file_name}", outcome.posts.len());
                }
            }
            Err(e) => {
                error!("failed to parse workbook {file_name}: {e}");
                outcome
                    .report
                    .record_error(format!("Failed to parse Excel {file_name}: {e}"));
                outcome.report.files_failed += 1;
            }
        }
        outcome
    }

    /// Discovers and ingests every supported file under `root`.
    pub fn search_directory(&self, root: &Path, recursive: bool) -> FileOutcome {
        let found = discovery::find_files(root, recursive);
        info!(
            "searching {}: {} CSV files, {} workbooks",
            root.display(),
            found.csv.len(),
            found.workbooks.len()
        );
        let mut outcome = FileOutcome::default();
        for path in &found.csv {
            outcome.merge(self.ingest_csv(path));
        }
        for path in &found.workbooks {
            outcome.merge(self.ingest_workbook(path));
        }
        outcome
    }

    fn absorb(&self, rows: Vec<RowParse>, source: &str, outcome: &mut FileOutcome) {
        for parse in rows {
            match parse {
                RowParse::Broken { number, message } => {
                    outcome
                        .report
                        .record_error(format!("Row {number} in {source}: {message}"));
                    outcome.report.record_skip(SkipReason::ParseError);
                }
                RowParse::Row(RawRow { values, .. }) => {
                    if normalize::is_description_row(&values, &self.config.description_indicators)
                    {
                        outcome.report.record_skip(SkipReason::DescriptionRow);
                        continue;
                    }
                    if let Some(post) =
                        normalize::normalize_row(&values, source, &self.config, &mut outcome.report)
                    {
                        outcome.report.record_post(post.platform);
                        outcome.posts.push(post);
                    }
                }
            }
        }
    }
}

impl Default for Ingestor {
    fn default() -> Self {
        Self::new()
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
