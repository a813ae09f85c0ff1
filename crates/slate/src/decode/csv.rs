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

use crate::decode::{RawRow, RowParse};
use crate::error::Result;
use csv::ReaderBuilder;
use indexmap::IndexMap;
use std::path::Path;
use tracing::debug;

/// Presence test over a leading sample, in fixed priority order. A file
/// with both commas and tabs is treated as comma-delimited.
pub fn detect_delimiter(sample: &str) -> u8 {
    if sample.contains(',') {
        b','
    } else if sample.contains('\t') {
        b'\t'
    } else if sample.contains(';') {
        b';'
    } else {
        b','
    }
}

/// Decodes a CSV file into header-keyed rows. Invalid byte sequences are
/// replaced rather than fatal, and a UTF-8 BOM is stripped; the first row
/// is the header, short records pad with empty strings.
pub fn read_rows(path: &Path, sample_size: usize) -> Result<Vec<RowParse>> {
    let bytes = std::fs::read(path)?;
    let decoded = String::from_utf8_lossy(&bytes);
    let text = decoded.strip_prefix('\u{feff}').unwrap_or(&decoded);

    let sample: String = text.chars().take(sample_size).collect();
    let delimiter = detect_delimiter(&sample);
    debug!(
        "decoding {} with delimiter {:?}",
        path.display(),
        delimiter as char
    );

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(text.as_bytes());
    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for (offset, record) in reader.records().enumerate() {
        let number = offset + 2;
        match record {
            Ok(record) => {
                let mut values = IndexMap::with_capacity(headers.len());
                for (i, header) in headers.iter().enumerate() {
                    values.insert(header.clone(), record.get(i).unwrap_or("").to_string());
                }
                rows.push(RowParse::Row(RawRow { number, values }));
            }
            Err(e) => rows.push(RowParse::Broken {
                number,
                message: e.to_string(),
            }),
        }
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delimiter_priority_comma_tab_semicolon() {
        assert_eq!(detect_delimiter("a,b,c"), b',');
        assert_eq!(detect_delimiter("a\tb\tc"), b'\t');
        assert_eq!(detect_delimiter("a;b;c"), b';');
        assert_eq!(detect_delimiter("a,b\tc;d"), b',', "comma wins over both");
        assert_eq!(detect_delimiter("plain"), b',', "default is comma");
    }

    #[test]
    fn test_read_rows_strips_bom_and_pads_short_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.csv");
        std::fs::write(&path, "\u{feff}Date;Likes;Caption\n2025-01-02;5\n").unwrap();

        let rows = read_rows(&path, 1024).unwrap();
        assert_eq!(rows.len(), 1);
        let RowParse::Row(row) = &rows[0] else {
            panic!("expected a decoded row");
        };
        assert_eq!(row.number, 2);
        assert_eq!(row.values["Date"], "2025-01-02");
        assert_eq!(row.values["Likes"], "5");
        assert_eq!(row.values["Caption"], "", "missing trailing field pads empty");
    }

    #[test]
    fn test_read_rows_preserves_column_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.csv");
        std::fs::write(&path, "Zeta,Alpha,Mid\n1,2,3\n").unwrap();

        let rows = read_rows(&path, 1024).unwrap();
        let RowParse::Row(row) = &rows[0] else {
            panic!("expected a decoded row");
        };
        let keys: Vec<_> = row.values.keys().cloned().collect();
        assert_eq!(keys, ["Zeta", "Alpha", "Mid"]);
    }
}
