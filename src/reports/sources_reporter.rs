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

use crate::series::session::Catalog;
use crate::util::table::Table;

/// Prints the summary of every ingested source.
pub struct SourcesReporter<'a> {
	catalog: &'a Catalog,
}

impl<'a> SourcesReporter<'a> {
	pub fn new(catalog: &'a Catalog) -> Self {
		Self { catalog }
	}

	pub fn print(&self) {
		let mut table = Table::new(5);
		table.right_align(vec![4]);
		table.add_header(vec!["Source", "Label", "First", "Last", "Months"]);
		table.add_separator();

		for (id, series) in self.catalog.iter_series() {
			table.add_row(vec![
				id.to_string(),
				id.label().to_string(),
				series.first_month().to_string(),
				series.last_month().to_string(),
				series.len().to_string(),
			]);
		}

		table.print();
	}
}
