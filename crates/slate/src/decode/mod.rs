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

pub mod csv;
pub mod excel;

use indexmap::IndexMap;

/// One decoded data row: source column order is preserved, every value is
/// already in string form. `number` is the 1-based row position in the
/// source (data rows start at 2, after the header).
#[derive(Debug, Clone)]
pub struct RawRow {
    pub number: usize,
    pub values: IndexMap<String, String>,
}

/// Per-row decode result. A record the reader could not decode becomes
/// `Broken` so the caller can tally it without aborting the file.
#[derive(Debug)]
pub enum RowParse {
    Row(RawRow),
    Broken { number: usize, message: String },
}
