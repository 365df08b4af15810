/* Copyright © 2024-2025 Adam Train <adam@trainrelay.net>
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 */

use crate::errors::IngestError;
use crate::ingest::raw_table::RawTable;
use crate::ingest::registry::{HeaderRule, SourceSpec};
use crate::series::canonical::CanonicalSeries;
use crate::util::month::Month;

/// The single literal token every source uses to mark the in-progress
/// current month. Matched as a substring; the pages render it with a
/// trailing release date ("Avail. Feb 13, 2026").
const NOT_YET_AVAILABLE: &str = "Avail.";

/// The annual-average column present on every page. Not a month.
const ANNUAL_AVERAGE: &str = "Ave";

/// Pure transform of one source's raw table into canonical shape.
/// Every source runs the same steps; the per-source quirks are data
/// on the spec: which row donates the header, the earliest
/// acceptable year, header casing, mid-table header repeats.
pub fn normalize(
	spec: &SourceSpec,
	raw: RawTable,
) -> Result<CanonicalSeries, IngestError> {
	let (mut header, rows) = repair_header(spec, raw)?;

	if spec.capitalize_months {
		for token in header.iter_mut() {
			*token = capitalize(token);
		}
	}

	let year_col = match header.iter().position(|t| t == "Year") {
		Some(i) => i,
		None => return Err(malformed(spec, "no Year column in header")),
	};

	let mut points: Vec<(Month, f64)> = Vec::new();
	for row in rows {
		if spec.drop_repeated_header && row == header {
			continue;
		}

		if row.len() != header.len() {
			return Err(malformed(
				spec,
				&format!(
					"row has {} cells, header has {}",
					row.len(),
					header.len()
				),
			));
		}

		let year: u32 = match row[year_col].parse() {
			Ok(y) => y,
			Err(_) => {
				return Err(malformed(
					spec,
					&format!("unparseable year: {:?}", row[year_col]),
				))
			},
		};

		if let Some(min_year) = spec.min_year {
			if year < min_year {
				continue;
			}
		}

		// Melt the wide year-by-month row into long form.
		for (i, value) in row.iter().enumerate() {
			if i == year_col || header[i] == ANNUAL_AVERAGE {
				continue;
			}

			// A blank cell is a genuinely missing observation, and
			// the sentinel marks data not yet published. Both drop
			// the cell, never the whole row.
			if value.is_empty() || value.contains(NOT_YET_AVAILABLE) {
				continue;
			}

			let month = match Month::from_parts(year, &header[i]) {
				Ok(m) => m,
				Err(e) => return Err(malformed(spec, &e.to_string())),
			};

			let rate: f64 = match value.parse() {
				Ok(r) => r,
				Err(_) => {
					return Err(malformed(
						spec,
						&format!("non-numeric value at {}: {:?}", month, value),
					))
				},
			};

			points.push((month, rate));
		}
	}

	// Sorting, duplicate-month rejection and finiteness checks all
	// live on the canonical type itself.
	CanonicalSeries::new(spec.id, points)
		.map_err(|e| malformed(spec, &e.to_string()))
}

/// Recovers the real header row per the source's rule.
fn repair_header(
	spec: &SourceSpec,
	raw: RawTable,
) -> Result<(Vec<String>, Vec<Vec<String>>), IngestError> {
	let RawTable { header, mut rows } = raw;

	match spec.header {
		HeaderRule::AsIs => Ok((header, rows)),
		HeaderRule::FromRow(i) => {
			if i >= rows.len() {
				return Err(malformed(
					spec,
					&format!("designated header row {} is absent", i),
				));
			}
			let data = rows.split_off(i + 1);
			let promoted = rows.pop().unwrap_or_default();
			Ok((promoted, data))
		},
		HeaderRule::FromLastRow => match rows.pop() {
			Some(last) => Ok((last, rows)),
			None => Err(malformed(spec, "table has no rows for header")),
		},
	}
}

fn malformed(spec: &SourceSpec, reason: &str) -> IngestError {
	IngestError::Malformed {
		source_id: spec.id,
		reason: reason.to_string(),
	}
}

fn capitalize(token: &str) -> String {
	let mut chars = token.chars();
	match chars.next() {
		Some(first) => {
			first.to_uppercase().collect::<String>()
				+ &chars.as_str().to_lowercase()
		},
		None => String::new(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::ingest::registry::SourceId;

	const MONTHS: [&str; 12] = [
		"Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep",
		"Oct", "Nov", "Dec",
	];

	fn spec(header: HeaderRule) -> SourceSpec {
		SourceSpec {
			id: SourceId::Food,
			url: "",
			header,
			min_year: None,
			capitalize_months: false,
			drop_repeated_header: false,
		}
	}

	fn wide_header() -> Vec<&'static str> {
		let mut h = vec!["Year"];
		h.extend(MONTHS);
		h.push("Ave");
		h
	}

	fn wide_row(year: &str, value: &str) -> Vec<&'static str> {
		// leak is fine in tests; builds a full 14-cell row
		let v: &'static str = Box::leak(value.to_string().into_boxed_str());
		let y: &'static str = Box::leak(year.to_string().into_boxed_str());
		let mut r = vec![y];
		r.extend(std::iter::repeat(v).take(12));
		r.push("9.9"); // Ave column, must be ignored
		r
	}

	#[test]
	fn test_normalize_as_is() {
		let raw = RawTable::new(
			wide_header(),
			vec![wide_row("2023", "2.0"), wide_row("2024", "3.0")],
		);

		let s = normalize(&spec(HeaderRule::AsIs), raw).unwrap();
		assert_eq!(s.len(), 24);
		assert_eq!(s.first_month().to_string(), "2023-01");
		assert_eq!(s.last_month().to_string(), "2024-12");

		// strictly ascending
		let months: Vec<_> = s.points().iter().map(|(m, _)| *m).collect();
		let mut sorted = months.clone();
		sorted.sort();
		sorted.dedup();
		assert_eq!(months, sorted);
	}

	#[test]
	fn test_normalize_promote_row() {
		// the table's own header is a banner; the real header is the
		// first data row
		let raw = RawTable::new(
			vec!["junk"; 14],
			vec![wide_header(), wide_row("2024", "3.0")],
		);
		let s = normalize(&spec(HeaderRule::FromRow(0)), raw).unwrap();
		assert_eq!(s.len(), 12);

		// a deeper banner just moves the designated row down
		let raw = RawTable::new(
			vec!["junk"; 14],
			vec![
				vec!["banner"; 14],
				wide_header(),
				wide_row("2024", "3.0"),
			],
		);
		let s = normalize(&spec(HeaderRule::FromRow(1)), raw).unwrap();
		assert_eq!(s.len(), 12);
	}

	#[test]
	fn test_normalize_promote_last_row() {
		let raw = RawTable::new(
			vec!["junk"; 14],
			vec![wide_row("2024", "3.0"), wide_header()],
		);

		let s = normalize(&spec(HeaderRule::FromLastRow), raw).unwrap();
		assert_eq!(s.len(), 12);
	}

	#[test]
	fn test_normalize_capitalizes_months() {
		let header: Vec<&str> = wide_header()
			.iter()
			.map(|t| {
				Box::leak(t.to_uppercase().into_boxed_str()) as &'static str
			})
			.collect();
		let raw = RawTable::new(header, vec![wide_row("2024", "3.0")]);

		let mut sp = spec(HeaderRule::AsIs);
		assert!(normalize(&sp, raw).is_err());

		let header: Vec<&str> = wide_header()
			.iter()
			.map(|t| {
				Box::leak(t.to_uppercase().into_boxed_str()) as &'static str
			})
			.collect();
		let raw = RawTable::new(header, vec![wide_row("2024", "3.0")]);

		sp.capitalize_months = true;
		let s = normalize(&sp, raw).unwrap();
		assert_eq!(s.len(), 12);
	}

	#[test]
	fn test_normalize_min_year_cutoff() {
		let raw = RawTable::new(
			wide_header(),
			vec![wide_row("1969", "1.0"), wide_row("1970", "2.0")],
		);

		let mut sp = spec(HeaderRule::AsIs);
		sp.min_year = Some(1970);

		let s = normalize(&sp, raw).unwrap();
		assert_eq!(s.len(), 12);
		assert_eq!(s.first_month().to_string(), "1970-01");
	}

	#[test]
	fn test_normalize_drops_repeated_header() {
		let raw = RawTable::new(
			wide_header(),
			vec![wide_row("2024", "3.0"), wide_header()],
		);

		let mut sp = spec(HeaderRule::AsIs);
		// without the quirk flag, the repeated header is a bad row
		assert!(normalize(&sp, raw).is_err());

		let raw = RawTable::new(
			wide_header(),
			vec![wide_row("2024", "3.0"), wide_header()],
		);
		sp.drop_repeated_header = true;
		let s = normalize(&sp, raw).unwrap();
		assert_eq!(s.len(), 12);
	}

	#[test]
	fn test_normalize_drops_sentinel_cell_only() {
		let mut row = wide_row("2024", "3.0");
		row[12] = "Avail. Jan 14, 2025"; // December cell

		let raw = RawTable::new(wide_header(), vec![row]);
		let s = normalize(&spec(HeaderRule::AsIs), raw).unwrap();

		assert_eq!(s.len(), 11);
		assert_eq!(s.last_month().to_string(), "2024-11");
		assert!(s
			.points()
			.iter()
			.all(|(_, rate)| (rate - 3.0).abs() < 1e-12));
	}

	#[test]
	fn test_normalize_drops_empty_cells() {
		let mut row = wide_row("2024", "3.0");
		row[3] = ""; // March missing; a genuine gap, not an error

		let raw = RawTable::new(wide_header(), vec![row]);
		let s = normalize(&spec(HeaderRule::AsIs), raw).unwrap();

		assert_eq!(s.len(), 11);
		assert_eq!(
			s.rate_at(crate::util::month::Month::new(2024, 3).unwrap()),
			None
		);
	}

	#[test]
	fn test_normalize_rejects_non_numeric() {
		let mut row = wide_row("2024", "3.0");
		row[5] = "n/a";

		let raw = RawTable::new(wide_header(), vec![row]);
		let err = normalize(&spec(HeaderRule::AsIs), raw).unwrap_err();
		assert!(err.to_string().contains("non-numeric"));
	}

	#[test]
	fn test_normalize_rejects_bad_month_token() {
		let mut header = wide_header();
		header[2] = "Febuary";

		let raw = RawTable::new(header, vec![wide_row("2024", "3.0")]);
		assert!(normalize(&spec(HeaderRule::AsIs), raw).is_err());
	}

	#[test]
	fn test_normalize_rejects_missing_header_row() {
		let raw = RawTable::new(wide_header(), vec![]);
		assert!(normalize(&spec(HeaderRule::FromRow(0)), raw).is_err());
	}

	#[test]
	fn test_normalize_rejects_bad_year() {
		let raw = RawTable::new(wide_header(), vec![wide_row("20x4", "3.0")]);
		assert!(normalize(&spec(HeaderRule::AsIs), raw).is_err());
	}
}
