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

use crate::decode::RawRow;
use crate::error::Result;
use calamine::{open_workbook_auto, Data, Reader};
use indexmap::IndexMap;
use std::path::Path;
use tracing::debug;

/// All decoded data rows of one worksheet.
#[derive(Debug)]
pub struct SheetRows {
    pub name: String,
    pub rows: Vec<RawRow>,
}

/// Decodes every worksheet in the workbook. Per sheet, the first row is
/// the header row (blank header cells drop their column), data rows are
/// zipped positionally, and rows whose values are all empty are discarded
/// before classification.
pub fn read_sheets(path: &Path) -> Result<Vec<SheetRows>> {
    let mut workbook = open_workbook_auto(path)?;
    let names = workbook.sheet_names().to_vec();
    debug!("workbook {} has {} sheets", path.display(), names.len());

    let mut sheets = Vec::with_capacity(names.len());
    for name in names {
        let range = workbook.worksheet_range(&name)?;
        let mut grid = range.rows();
        let headers: Vec<String> = match grid.next() {
            Some(cells) => cells
                .iter()
                .map(|c| cell_to_string(c).trim().to_string())
                .collect(),
            None => continue,
        };
        if headers.iter().all(String::is_empty) {
            continue;
        }
        let mut rows = Vec::new();
        for (offset, cells) in grid.enumerate() {
            let values = zip_row(&headers, cells);
            if values.values().all(String::is_empty) {
                continue;
            }
            rows.push(RawRow {
                number: offset + 2,
                values,
            });
        }
        sheets.push(SheetRows { name, rows });
    }
    Ok(sheets)
}

fn zip_row(headers: &[String], cells: &[Data]) -> IndexMap<String, String> {
    let mut values = IndexMap::with_capacity(headers.len());
    for (i, cell) in cells.iter().enumerate() {
        if let Some(header) = headers.get(i) {
            if !header.is_empty() {
                values.insert(header.clone(), cell_to_string(cell));
            }
        }
    }
    values
}

/// Renders a cell the way downstream matching expects: integral floats
/// without a decimal point, date-times in a form the date parser accepts.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => {
            if *b {
                "TRUE".to_string()
            } else {
                "FALSE".to_string()
            }
        }
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_rendering_matches_column_matching_expectations() {
        assert_eq!(cell_to_string(&Data::Empty), "");
        assert_eq!(cell_to_string(&Data::String("hello".to_string())), "hello");
        assert_eq!(cell_to_string(&Data::Int(42)), "42");
        assert_eq!(cell_to_string(&Data::Float(150.0)), "150");
        assert_eq!(cell_to_string(&Data::Float(2.5)), "2.5");
        assert_eq!(cell_to_string(&Data::Bool(true)), "TRUE");
    }

    #[test]
    fn test_zip_row_drops_columns_with_blank_headers() {
        let headers = vec![
            "Publish Time".to_string(),
            String::new(),
            "Likes".to_string(),
        ];
        let cells = vec![
            Data::String("2025-03-25".to_string()),
            Data::String("stray".to_string()),
            Data::Int(7),
        ];
        let row = zip_row(&headers, &cells);
        assert_eq!(row.len(), 2);
        assert_eq!(row["Publish Time"], "2025-03-25");
        assert_eq!(row["Likes"], "7");
    }

    #[test]
    fn test_zip_row_ignores_cells_past_the_header_width() {
        let headers = vec!["Likes".to_string()];
        let cells = vec![Data::Int(1), Data::Int(2)];
        let row = zip_row(&headers, &cells);
        assert_eq!(row.len(), 1);
        assert_eq!(row["Likes"], "1");
    }
}
