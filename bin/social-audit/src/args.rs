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

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "social-audit")]
#[command(
    about = "Parse social media analytics exports (CSV/Excel) into a unified JSON document"
)]
#[command(version)]
pub struct Args {
    #[arg(
        long = "analytics",
        num_args = 1..,
        help = "Specific analytics files to parse"
    )]
    pub analytics: Vec<PathBuf>,

    #[arg(
        long = "search-dir",
        help = "Directory to search for .csv/.xlsx/.xls analytics files"
    )]
    pub search_dir: Option<PathBuf>,

    #[arg(long = "output", help = "Output JSON file path")]
    pub output: PathBuf,

    #[arg(
        long = "no-recursive",
        default_value_t = false,
        help = "Disable recursive directory search"
    )]
    pub no_recursive: bool,

    #[arg(
        long = "quiet",
        default_value_t = false,
        help = "Suppress progress messages and the final statistics block"
    )]
    pub quiet: bool,
}
