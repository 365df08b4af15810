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

use crate::errors::UnknownSource;
use crate::ingest::registry::SourceId;
use crate::series::canonical::CanonicalSeries;
use crate::series::compound::{compound, DerivedColumn};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// The baseline horizon. Always requested, never evicted.
const BASELINE: u32 = 1;

/// Memo table from horizon to derived column, paired with the
/// insertion-ordered set of horizons the consumer has asked to see.
/// The pair lives behind one mutex so a reset can never be observed
/// half-applied: no reader sees a requested set of [1] while a stale
/// non-baseline column is still resident, or vice versa.
struct HorizonCache {
	columns: BTreeMap<u32, DerivedColumn>,

	/// Distinct positive horizons in the order they were requested.
	/// The order matters downstream (display and color assignment).
	requested: Vec<u32>,

	/// Number of compound() invocations this session has paid for.
	computed: usize,
}

impl HorizonCache {
	fn new(series: &CanonicalSeries) -> Self {
		let mut columns = BTreeMap::new();
		columns.insert(BASELINE, compound(series, BASELINE));

		HorizonCache {
			columns,
			requested: vec![BASELINE],
			computed: 0,
		}
	}
}

/// One source's interaction state: the immutable canonical series
/// plus the horizon cache evolving as the consumer adds horizons or
/// resets.
pub struct SourceSession {
	series: CanonicalSeries,
	state: Mutex<HorizonCache>,
}

impl SourceSession {
	pub fn new(series: CanonicalSeries) -> Self {
		let state = Mutex::new(HorizonCache::new(&series));
		SourceSession { series, state }
	}

	pub fn series(&self) -> &CanonicalSeries {
		&self.series
	}

	/// Appends a horizon to the requested set and computes its column
	/// if not already cached. A horizon below 1 or already present is
	/// a silent no-op, matching the do-nothing-on-invalid-input
	/// behavior the interaction layer requires.
	///
	/// Holding the lock across the computation is what makes the
	/// at-most-once guarantee hold: a second caller racing for the
	/// same uncached horizon serializes behind the first and finds
	/// the column already present.
	pub fn add_horizon(&self, n: i64) {
		if n < 1 {
			return;
		}
		// out of range is invalid input too, never a wrapped horizon
		let Ok(horizon) = u32::try_from(n) else {
			return;
		};

		let mut state = self.state.lock().unwrap();
		if !state.requested.contains(&horizon) {
			state.requested.push(horizon);
		}

		if !state.columns.contains_key(&horizon) {
			let column = compound(&self.series, horizon);
			state.columns.insert(horizon, column);
			state.computed += 1;
		}
	}

	/// Collapses the requested set back to the baseline and evicts
	/// every non-baseline column, atomically with respect to any
	/// concurrent add_horizon.
	pub fn reset(&self) {
		let mut state = self.state.lock().unwrap();
		state.requested.clear();
		state.requested.push(BASELINE);
		state.columns.retain(|horizon, _| *horizon == BASELINE);
	}

	pub fn requested_horizons(&self) -> Vec<u32> {
		self.state.lock().unwrap().requested.clone()
	}

	/// Snapshot of every cached column, keyed by horizon.
	pub fn derived_columns(&self) -> BTreeMap<u32, DerivedColumn> {
		self.state.lock().unwrap().columns.clone()
	}

	/// How many columns this session has actually computed (cache
	/// hits and no-ops excluded). Shown by the interactive session.
	pub fn computed_count(&self) -> usize {
		self.state.lock().unwrap().computed
	}
}

/// The full set of ingested sources and their sessions; everything
/// the presentation layer consumes. Source listing order is the
/// registry's canonical order.
pub struct Catalog {
	sessions: BTreeMap<SourceId, SourceSession>,
}

impl Catalog {
	pub fn new(series_by_source: BTreeMap<SourceId, CanonicalSeries>) -> Self {
		let sessions = series_by_source
			.into_iter()
			.map(|(id, series)| (id, SourceSession::new(series)))
			.collect();

		Catalog { sessions }
	}

	pub fn sources(&self) -> Vec<SourceId> {
		self.sessions.keys().copied().collect()
	}

	/// Every ingested series with its identifier, in listing order.
	pub fn iter_series(
		&self,
	) -> impl Iterator<Item = (SourceId, &CanonicalSeries)> {
		self.sessions.iter().map(|(id, s)| (*id, s.series()))
	}

	pub fn session(&self, id: SourceId) -> Result<&SourceSession, UnknownSource> {
		self.sessions
			.get(&id)
			.ok_or_else(|| UnknownSource(id.to_string()))
	}

	pub fn series(&self, id: SourceId) -> Result<&CanonicalSeries, UnknownSource> {
		Ok(self.session(id)?.series())
	}

	pub fn add_horizon(&self, id: SourceId, n: i64) -> Result<(), UnknownSource> {
		self.session(id)?.add_horizon(n);
		Ok(())
	}

	pub fn reset(&self, id: SourceId) -> Result<(), UnknownSource> {
		self.session(id)?.reset();
		Ok(())
	}

	pub fn requested_horizons(
		&self,
		id: SourceId,
	) -> Result<Vec<u32>, UnknownSource> {
		Ok(self.session(id)?.requested_horizons())
	}

	pub fn derived_columns(
		&self,
		id: SourceId,
	) -> Result<BTreeMap<u32, DerivedColumn>, UnknownSource> {
		Ok(self.session(id)?.derived_columns())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::util::month::Month;

	fn session() -> SourceSession {
		let points = (0..48usize)
			.map(|i| {
				let year = 2020 + (i / 12) as u32;
				let month = (i % 12 + 1) as u8;
				(Month::new(year, month).unwrap(), 2.0)
			})
			.collect();
		let series =
			CanonicalSeries::new(SourceId::HeadlineCpi, points).unwrap();
		SourceSession::new(series)
	}

	#[test]
	fn test_baseline_seeded() {
		let s = session();
		assert_eq!(s.requested_horizons(), vec![1]);

		let columns = s.derived_columns();
		assert_eq!(columns.len(), 1);
		assert!(columns.contains_key(&1));
		// seeding the baseline is not a paid computation
		assert_eq!(s.computed_count(), 0);
	}

	#[test]
	fn test_add_horizon_idempotent() {
		let s = session();
		s.add_horizon(5);
		let once = s.requested_horizons();
		s.add_horizon(5);
		let twice = s.requested_horizons();

		assert_eq!(once, vec![1, 5]);
		assert_eq!(once, twice);
		assert_eq!(s.computed_count(), 1);
	}

	#[test]
	fn test_add_horizon_preserves_insertion_order() {
		let s = session();
		s.add_horizon(10);
		s.add_horizon(2);
		s.add_horizon(7);
		assert_eq!(s.requested_horizons(), vec![1, 10, 2, 7]);
	}

	#[test]
	fn test_add_horizon_invalid_is_noop() {
		let s = session();
		s.add_horizon(0);
		s.add_horizon(-3);
		assert_eq!(s.requested_horizons(), vec![1]);
		assert_eq!(s.computed_count(), 0);
	}

	#[test]
	fn test_add_horizon_beyond_u32_is_noop() {
		let s = session();
		// must not wrap to horizon 2
		s.add_horizon(u32::MAX as i64 + 3);
		assert_eq!(s.requested_horizons(), vec![1]);
		assert_eq!(s.computed_count(), 0);
	}

	#[test]
	fn test_reset_collapses() {
		let s = session();
		s.add_horizon(2);
		s.add_horizon(3);
		s.add_horizon(4);
		s.reset();

		assert_eq!(s.requested_horizons(), vec![1]);
		let columns = s.derived_columns();
		assert_eq!(columns.keys().copied().collect::<Vec<_>>(), vec![1]);

		// re-adding after reset recomputes
		s.add_horizon(2);
		assert_eq!(s.requested_horizons(), vec![1, 2]);
		assert_eq!(s.computed_count(), 4);
	}

	#[test]
	fn test_reset_on_baseline_is_noop() {
		let s = session();
		s.reset();
		assert_eq!(s.requested_horizons(), vec![1]);
	}

	#[test]
	fn test_at_most_once_computation() {
		let s = session();

		std::thread::scope(|scope| {
			for _ in 0..8 {
				scope.spawn(|| s.add_horizon(7));
			}
		});

		assert_eq!(s.requested_horizons(), vec![1, 7]);
		assert_eq!(s.computed_count(), 1);
	}

	#[test]
	fn test_catalog_unknown_source() {
		let catalog = Catalog::new(BTreeMap::new());
		assert!(catalog.series(SourceId::Food).is_err());
		assert!(catalog.add_horizon(SourceId::Food, 2).is_err());
	}

	#[test]
	fn test_catalog_listing_order() {
		let mut map = BTreeMap::new();
		for id in [SourceId::Airline, SourceId::HeadlineCpi, SourceId::Gas] {
			let series = CanonicalSeries::new(
				id,
				vec![(Month::new(2024, 1).unwrap(), 1.0)],
			)
			.unwrap();
			map.insert(id, series);
		}

		let catalog = Catalog::new(map);
		assert_eq!(
			catalog.sources(),
			vec![SourceId::HeadlineCpi, SourceId::Gas, SourceId::Airline]
		);

		let listed: Vec<SourceId> = catalog
			.iter_series()
			.map(|(id, series)| {
				assert_eq!(series.source_id(), id);
				id
			})
			.collect();
		assert_eq!(listed, catalog.sources());
	}
}
