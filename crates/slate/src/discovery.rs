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

use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// Candidate analytics files found under a search root. CSV inputs are
/// kept apart from workbook inputs because they are decoded differently
/// and processed in that order.
#[derive(Debug, Default)]
pub struct Discovered {
    pub csv: Vec<PathBuf>,
    pub workbooks: Vec<PathBuf>,
}

pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
}

pub fn is_supported(path: &Path) -> bool {
    matches!(
        extension_of(path).as_deref(),
        Some("csv") | Some("xlsx") | Some("xls")
    )
}

/// Enumerates candidate files under `root`. Non-recursive mode stays at
/// depth 1. Results are sorted per bucket so a run's processing order is
/// stable regardless of directory enumeration order.
pub fn find_files(root: &Path, recursive: bool) -> Discovered {
    let mut found = Discovered::default();
    let walker = WalkDir::new(root)
        .follow_links(false)
        .max_depth(if recursive { usize::MAX } else { 1 });
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("error accessing entry under {}: {e}", root.display());
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        match extension_of(entry.path()).as_deref() {
            Some("csv") => found.csv.push(entry.into_path()),
            Some("xlsx") | Some("xls") => found.workbooks.push(entry.into_path()),
            _ => {}
        }
    }
    found.csv.sort();
    found.workbooks.sort();
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_extensions_are_case_insensitive() {
        assert!(is_supported(Path::new("a/export.CSV")));
        assert!(is_supported(Path::new("b.xlsx")));
        assert!(is_supported(Path::new("b.XLS")));
        assert!(!is_supported(Path::new("notes.txt")));
        assert!(!is_supported(Path::new("noext")));
    }

    #[test]
    fn test_find_files_respects_recursive_flag() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");
        std::fs::create_dir(&nested).unwrap();
        std::fs::write(dir.path().join("top.csv"), "a,b\n").unwrap();
        std::fs::write(nested.join("deep.xlsx"), "").unwrap();
        std::fs::write(dir.path().join("skip.txt"), "").unwrap();

        let all = find_files(dir.path(), true);
        assert_eq!(all.csv.len(), 1);
        assert_eq!(all.workbooks.len(), 1);

        let shallow = find_files(dir.path(), false);
        assert_eq!(shallow.csv.len(), 1);
        assert!(shallow.workbooks.is_empty(), "nested workbook not visited");
    }
}
