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

/// Standard table printer for reports that emit a potentially large
/// number of single-line rows, such as series projections and the
/// source summary.
///
/// Headers are centered and piped; data cells are left-aligned unless
/// a column is flagged for right alignment.
pub struct Table {
	column_count: usize,
	rows: Vec<Row>,
	right_align: Vec<bool>, // indicates columns by index
}

enum Row {
	Header(Vec<String>),
	Data(Vec<String>),
	Separator,
}

enum Align {
	Left,
	Right,
	Center,
}

impl Table {
	pub fn new(column_count: usize) -> Self {
		Self {
			column_count,
			rows: Vec::new(),
			right_align: vec![false; column_count],
		}
	}

	/// Adds a header row.
	pub fn add_header(&mut self, row: Vec<&str>) {
		self.rows.push(Row::Header(
			row.into_iter().map(|s| s.to_string()).collect(),
		));
	}

	/// Adds a data row.
	pub fn add_row(&mut self, row: Vec<String>) {
		self.rows.push(Row::Data(row));
	}

	/// Adds a full separator row.
	pub fn add_separator(&mut self) {
		self.rows.push(Row::Separator);
	}

	/// Specifies columns that should be right-aligned by index.
	pub fn right_align(&mut self, cols: Vec<usize>) {
		for col in cols {
			self.right_align[col] = true;
		}
	}

	pub fn print(&self) {
		println!();
		for line in self.render() {
			println!("{}", line);
		}
	}

	/// Lays out every row against the widest cell of each column.
	fn render(&self) -> Vec<String> {
		let widths = self.column_widths();

		self.rows
			.iter()
			.map(|row| match row {
				Row::Header(cells) => self.layout(cells, &widths, true),
				Row::Data(cells) => self.layout(cells, &widths, false),
				Row::Separator => Table::separator_line(&widths),
			})
			.collect()
	}

	fn column_widths(&self) -> Vec<usize> {
		let mut widths = vec![0; self.column_count];
		for row in &self.rows {
			if let Row::Header(cells) | Row::Data(cells) = row {
				for (i, value) in cells.iter().enumerate() {
					widths[i] = widths[i].max(value.len());
				}
			}
		}

		widths
	}

	fn layout(
		&self,
		cells: &[String],
		widths: &[usize],
		header: bool,
	) -> String {
		let rendered: Vec<String> = cells
			.iter()
			.enumerate()
			.map(|(i, value)| {
				let align = match (header, self.right_align[i]) {
					(true, _) => Align::Center,
					(false, true) => Align::Right,
					(false, false) => Align::Left,
				};
				Table::pad(value, widths[i], align)
			})
			.collect();

		rendered.join(if header { " | " } else { "   " })
	}

	fn separator_line(widths: &[usize]) -> String {
		let total = widths.iter().sum::<usize>()
			+ 3 * widths.len().saturating_sub(1);
		"-".repeat(total)
	}

	fn pad(value: &str, width: usize, align: Align) -> String {
		let slack = width.saturating_sub(value.len());
		let (left, right) = match align {
			Align::Left => (0, slack),
			Align::Right => (slack, 0),
			Align::Center => (slack / 2, slack - slack / 2),
		};

		format!("{}{}{}", " ".repeat(left), value, " ".repeat(right))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sample() -> Table {
		let mut table = Table::new(2);
		table.right_align(vec![1]);
		table.add_header(vec!["Name", "Count"]);
		table.add_separator();
		table.add_row(vec!["ab".to_string(), "7".to_string()]);
		table
	}

	#[test]
	fn test_alignment() {
		let lines = sample().render();
		assert_eq!(lines[0], "Name | Count");
		assert_eq!(lines[2], "ab         7");
	}

	#[test]
	fn test_separator_spans_all_columns() {
		let lines = sample().render();
		assert_eq!(lines[1], "-".repeat(4 + 3 + 5));
	}

	#[test]
	fn test_header_centering() {
		let mut table = Table::new(1);
		table.add_header(vec!["hi"]);
		table.add_row(vec!["123456".to_string()]);

		let lines = table.render();
		assert_eq!(lines[0], "  hi  ");
	}
}
