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

use anyhow::{bail, Error};
use regex::Regex;

/// An untyped grid of cells as returned by a fetch step. The first
/// row of the source table is taken as the header; whether that
/// header is actually usable is a per-source concern handled during
/// normalization, not here.
#[derive(Debug, Default)]
pub struct RawTable {
	pub header: Vec<String>,
	pub rows: Vec<Vec<String>>,
}

impl RawTable {
	pub fn new(header: Vec<&str>, rows: Vec<Vec<&str>>) -> Self {
		Self {
			header: header.into_iter().map(|s| s.to_string()).collect(),
			rows: rows
				.into_iter()
				.map(|r| r.into_iter().map(|s| s.to_string()).collect())
				.collect(),
		}
	}

	/// Extracts the first <table> element of an HTML page into a grid.
	/// The rate pages put their data in the first table, so everything
	/// after it is ignored. Errors if the page has no table or the
	/// table has no rows.
	pub fn from_html(html: &str) -> Result<RawTable, Error> {
		let table_re = Regex::new(r"(?is)<table[^>]*>(.*?)</table>").unwrap();
		let row_re = Regex::new(r"(?is)<tr[^>]*>(.*?)</tr>").unwrap();
		let cell_re = Regex::new(r"(?is)<t[dh][^>]*>(.*?)</t[dh]>").unwrap();
		let tag_re = Regex::new(r"(?s)<[^>]*>").unwrap();

		let table = match table_re.captures(html) {
			Some(c) => c.get(1).map_or("", |m| m.as_str()),
			None => bail!("page contains no table"),
		};

		let mut grid: Vec<Vec<String>> = Vec::new();
		for row in row_re.captures_iter(table) {
			let row_html = row.get(1).map_or("", |m| m.as_str());
			let cells: Vec<String> = cell_re
				.captures_iter(row_html)
				.map(|c| {
					let inner = c.get(1).map_or("", |m| m.as_str());
					decode_entities(&tag_re.replace_all(inner, " "))
				})
				.collect();

			if !cells.is_empty() {
				grid.push(cells);
			}
		}

		if grid.is_empty() {
			bail!("table contains no rows");
		}

		let header = grid.remove(0);
		Ok(RawTable { header, rows: grid })
	}
}

/// Decodes the handful of HTML entities that actually occur in the
/// rate tables, collapses whitespace, and trims.
fn decode_entities(s: &str) -> String {
	let decoded = s
		.replace("&nbsp;", " ")
		.replace("&amp;", "&")
		.replace("&#8211;", "-")
		.replace("&#8217;", "'")
		.replace("&lt;", "<")
		.replace("&gt;", ">");

	decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}
