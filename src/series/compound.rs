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
use crate::util::month::Month;

/// A compounded multi-year rate column, aligned month-for-month with
/// its parent series. An entry is None when any of the lookback
/// months it depends on is absent; the month itself always appears,
/// so alignment by date stays exact downstream.
#[derive(Debug, Clone)]
pub struct DerivedColumn {
	pub horizon: u32,
	pub values: Vec<(Month, Option<f64>)>,
}

/// Computes the horizon-year compounded rate for every month of the
/// series. The lookback is by calendar month (12·i months back via
/// exact date lookup), never by row position: a series with missing
/// months must not borrow a neighboring month's value.
///
/// For each month d with all lookback values r_0..r_{H-1} present:
///
///   product = Π (1 + r_i / 100)
///   value   = round_1((product − 1) × 100)
///
/// The product is formed at full precision; rounding to one decimal
/// happens exactly once at the end. A horizon of 1 is the baseline
/// rate itself, untouched by rounding.
pub fn compound(series: &CanonicalSeries, horizon: u32) -> DerivedColumn {
	assert!(horizon >= 1, "horizon must be a positive number of years");

	let values = series
		.points()
		.iter()
		.map(|(month, rate)| {
			if horizon == 1 {
				return (*month, Some(*rate));
			}
			(*month, compound_at(series, *month, horizon))
		})
		.collect();

	DerivedColumn { horizon, values }
}

fn compound_at(
	series: &CanonicalSeries,
	month: Month,
	horizon: u32,
) -> Option<f64> {
	let mut product = 1.0;
	for i in 0..horizon {
		let lookback = month.minus_months(12 * i)?;
		let rate = series.rate_at(lookback)?;
		product *= 1.0 + rate / 100.0;
	}

	Some(round_one_decimal((product - 1.0) * 100.0))
}

fn round_one_decimal(x: f64) -> f64 {
	(x * 10.0).round() / 10.0
}
