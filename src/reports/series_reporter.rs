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

use crate::series::canonical::CanonicalSeries;
use crate::series::compound::DerivedColumn;
use crate::util::table::Table;
use std::collections::BTreeMap;

/// Renders one source's requested columns as an aligned text table or
/// as CSV. A pure read-side projection: year bounds are applied here,
/// over already-materialized columns, and never touch session state.
pub struct SeriesReporter<'a> {
	series: &'a CanonicalSeries,

	/// Sorted ascending by horizon, the order the legend showed them.
	columns: Vec<DerivedColumn>,
}

impl<'a> SeriesReporter<'a> {
	pub fn new(
		series: &'a CanonicalSeries,
		columns: BTreeMap<u32, DerivedColumn>,
	) -> Self {
		Self {
			series,
			columns: columns.into_values().collect(),
		}
	}

	/// Resolves the requested year bounds against the series. A begin
	/// year earlier than the series is clamped up to its first year,
	/// the same way the original UI snapped the start-year box when
	/// switching to a shorter source.
	fn bounds(&self, begin: Option<u32>, end: Option<u32>) -> (u32, u32) {
		let first = self.series.first_month().year();
		let last = self.series.last_month().year();

		let begin = begin.unwrap_or(first).max(first);
		let end = end.unwrap_or(last);
		(begin, end)
	}

	/// Rows within bounds, skipping months where every requested
	/// column is undefined.
	fn rows(&self, begin: Option<u32>, end: Option<u32>) -> Vec<Vec<String>> {
		let (begin, end) = self.bounds(begin, end);

		let mut rows = Vec::new();
		for (i, (month, _)) in self.series.points().iter().enumerate() {
			if month.year() < begin || month.year() > end {
				continue;
			}

			let values: Vec<Option<f64>> =
				self.columns.iter().map(|c| c.values[i].1).collect();
			if values.iter().all(|v| v.is_none()) {
				continue;
			}

			let mut row = vec![month.to_string()];
			for v in values {
				row.push(match v {
					Some(x) => format!("{:.1}", x),
					None => String::new(),
				});
			}
			rows.push(row);
		}

		rows
	}

	fn header(&self) -> Vec<String> {
		let mut header = vec!["Date".to_string()];
		for column in &self.columns {
			header.push(format!("{} Year", column.horizon));
		}
		header
	}

	pub fn print(&self, begin: Option<u32>, end: Option<u32>) {
		let header = self.header();
		let mut table = Table::new(header.len());
		table.right_align((1..header.len()).collect());

		table.add_header(header.iter().map(|s| s.as_str()).collect());
		table.add_separator();
		for row in self.rows(begin, end) {
			table.add_row(row);
		}

		table.print();
	}

	pub fn to_csv(&self, begin: Option<u32>, end: Option<u32>) -> String {
		let mut out = self.header().join(",");
		out.push('\n');

		for row in self.rows(begin, end) {
			out.push_str(&row.join(","));
			out.push('\n');
		}

		out
	}
}
