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

/// Parses a metric count from export text. Commas and internal spaces are
/// separators, a trailing `k`/`m` scales by a thousand/million, and any
/// unparseable input collapses to 0 rather than an error: a mapped
/// numeric field is never absent.
pub fn parse_count(value: &str) -> u64 {
    let mut clean = value.trim().to_lowercase().replace([',', ' '], "");
    if clean.is_empty() {
        return 0;
    }
    let mut multiplier = 1.0_f64;
    if let Some(stripped) = clean.strip_suffix('k') {
        multiplier = 1_000.0;
        clean = stripped.to_string();
    } else if let Some(stripped) = clean.strip_suffix('m') {
        multiplier = 1_000_000.0;
        clean = stripped.to_string();
    }
    match clean.parse::<f64>() {
        Ok(v) => (v * multiplier) as u64,
        Err(_) => 0,
    }
}

/// Parses an engagement-rate style percentage. The `%` sign is optional;
/// failure yields 0.0.
pub fn parse_percentage(value: &str) -> f64 {
    let clean = value.replace('%', "");
    clean.trim().parse::<f64>().unwrap_or(0.0)
}
