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

mod args;

use args::Args;
use clap::Parser;
use slate::{write_document, FileOutcome, Ingestor};
use tracing::{error, info, warn, Level};

fn main() {
    let args = Args::parse();

    let (level, filter) = if args.quiet {
        (Level::ERROR, "error")
    } else {
        (Level::INFO, "info")
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_env_filter(filter)
        .init();

    let ingestor = Ingestor::new();
    let mut run = FileOutcome::default();

    for path in &args.analytics {
        if !path.exists() {
            error!("file not found: {}", path.display());
            continue;
        }
        match ingestor.ingest_file(path) {
            Some(outcome) => run.merge(outcome),
            None => warn!("unsupported file type: {}", path.display()),
        }
    }

    if let Some(dir) = &args.search_dir {
        if dir.exists() {
            run.merge(ingestor.search_directory(dir, !args.no_recursive));
        } else {
            error!("directory not found: {}", dir.display());
        }
    }

    let FileOutcome { posts, report } = run;
    if posts.is_empty() {
        eprintln!("No posts found. Check file paths and date formats.");
        if !args.quiet {
            println!("{}", report.render());
        }
        std::process::exit(1);
    }

    match write_document(posts, &report, &args.output) {
        Ok(summary) => {
            info!(
                "saved {} posts to {} ({} duplicates removed)",
                summary.total_posts,
                args.output.display(),
                summary.duplicates_removed
            );
            if !args.quiet {
                println!("{}", report.render());
            }
        }
        Err(e) => {
            eprintln!("Failed to write {}: {e}", args.output.display());
            std::process::exit(1);
        }
    }
}
