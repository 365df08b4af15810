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

use crate::ingest::registry::SourceId;
use crate::util::month::Month;
use anyhow::{bail, Error};

/// One source's baseline rate series in canonical shape: strictly
/// ascending months, one finite year-over-year percentage each.
/// Months need not be contiguous; a source may have genuine gaps.
/// Immutable once built.
#[derive(Debug, Clone)]
pub struct CanonicalSeries {
	source_id: SourceId,
	points: Vec<(Month, f64)>,
}

impl CanonicalSeries {
	/// Builds a series from unordered observations. This is the single
	/// enforcement point for the canonical-shape invariants: points are
	/// sorted here, duplicate months and non-finite rates are rejected.
	pub fn new(
		source_id: SourceId,
		mut points: Vec<(Month, f64)>,
	) -> Result<Self, Error> {
		if points.is_empty() {
			bail!("series has no observations");
		}

		for (month, rate) in &points {
			if !rate.is_finite() {
				bail!("non-finite rate at {}", month);
			}
		}

		points.sort_by_key(|(month, _)| *month);
		for pair in points.windows(2) {
			if pair[0].0 == pair[1].0 {
				bail!("duplicate month {}", pair[0].0);
			}
		}

		Ok(Self { source_id, points })
	}

	pub fn source_id(&self) -> SourceId {
		self.source_id
	}

	pub fn points(&self) -> &[(Month, f64)] {
		&self.points
	}

	pub fn len(&self) -> usize {
		self.points.len()
	}

	/// The baseline rate at an exact calendar month, if observed.
	/// An exact lookup: neighboring months never stand in for a
	/// missing one.
	pub fn rate_at(&self, month: Month) -> Option<f64> {
		self.points
			.binary_search_by_key(&month, |(m, _)| *m)
			.ok()
			.map(|i| self.points[i].1)
	}

	pub fn first_month(&self) -> Month {
		self.points[0].0
	}

	pub fn last_month(&self) -> Month {
		self.points[self.points.len() - 1].0
	}
}
