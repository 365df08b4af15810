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
use std::cmp::Ordering;
use std::fmt;

/// A calendar month. The resolution of every rate series in the
/// program; there are no day-level observations anywhere.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct Month {
	year: u32,
	month: u8,
}

/// Fixed month-abbreviation format shared by all source tables.
const MONTH_TOKENS: [&str; 12] = [
	"Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct",
	"Nov", "Dec",
];

impl Month {
	pub fn new(year: u32, month: u8) -> Result<Month, Error> {
		if !(1..=12).contains(&month) {
			bail!("Month must be between 1 and 12, got {}", month);
		}
		Ok(Month { year, month })
	}

	/// Constructor from a year and a three-letter month token, e.g.
	/// (2024, "Mar"). The token comparison is exact; header repair is
	/// responsible for fixing casing before this point.
	pub fn from_parts(year: u32, token: &str) -> Result<Month, Error> {
		match MONTH_TOKENS.iter().position(|t| *t == token) {
			Some(i) => Ok(Month {
				year,
				month: (i + 1) as u8,
			}),
			None => bail!("Unrecognized month token: {}", token),
		}
	}

	pub fn year(&self) -> u32 {
		self.year
	}

	/// The month that is n calendar months earlier than this one.
	/// None if the subtraction would leave the calendar entirely.
	pub fn minus_months(&self, n: u32) -> Option<Month> {
		let total = self.year * 12 + (self.month as u32 - 1);
		let earlier = total.checked_sub(n)?;

		Some(Month {
			year: earlier / 12,
			month: (earlier % 12 + 1) as u8,
		})
	}
}

impl PartialOrd for Month {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for Month {
	fn cmp(&self, other: &Self) -> Ordering {
		(self.year, self.month).cmp(&(other.year, other.month))
	}
}

impl fmt::Display for Month {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{:04}-{:02}", self.year, self.month)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_from_parts() {
		let m = Month::from_parts(2024, "Mar").unwrap();
		assert_eq!(m.to_string(), "2024-03");

		assert!(Month::from_parts(2024, "Ave").is_err());
		assert!(Month::from_parts(2024, "mar").is_err());
		assert!(Month::from_parts(2024, "March").is_err());
	}

	#[test]
	fn test_new_bounds() {
		assert!(Month::new(2024, 0).is_err());
		assert!(Month::new(2024, 13).is_err());
		assert!(Month::new(2024, 12).is_ok());
	}

	#[test]
	fn test_minus_months_same_year() {
		let m = Month::new(2024, 11).unwrap();
		assert_eq!(m.minus_months(3), Some(Month::new(2024, 8).unwrap()));
	}

	#[test]
	fn test_minus_months_across_years() {
		let m = Month::new(2024, 2).unwrap();
		assert_eq!(m.minus_months(12), Some(Month::new(2023, 2).unwrap()));
		assert_eq!(m.minus_months(14), Some(Month::new(2022, 12).unwrap()));
		assert_eq!(m.minus_months(25), Some(Month::new(2022, 1).unwrap()));
	}

	#[test]
	fn test_minus_months_zero() {
		let m = Month::new(1970, 1).unwrap();
		assert_eq!(m.minus_months(0), Some(m));
	}

	#[test]
	fn test_minus_months_underflow() {
		let m = Month::new(0, 6).unwrap();
		assert_eq!(m.minus_months(6), None);
		assert_eq!(m.minus_months(5), Some(Month::new(0, 1).unwrap()));
	}

	#[test]
	fn test_ordering() {
		let a = Month::new(2023, 12).unwrap();
		let b = Month::new(2024, 1).unwrap();
		let c = Month::new(2024, 2).unwrap();
		assert!(a < b && b < c);
	}
}
