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
use std::fmt;

/// The closed universe of rate sources. Identifiers are stable for
/// the life of the process and are used as cache and lookup keys
/// end-to-end. Declaration order is the canonical listing order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SourceId {
	HeadlineCpi,
	CoreCpi,
	Energy,
	Gas,
	Grocery,
	Food,
	Healthcare,
	College,
	Airline,
}

impl SourceId {
	pub fn from_str(s: &str) -> Result<Self, UnknownSource> {
		match s {
			"headline-cpi" => Ok(SourceId::HeadlineCpi),
			"core-cpi" => Ok(SourceId::CoreCpi),
			"energy" => Ok(SourceId::Energy),
			"gas" => Ok(SourceId::Gas),
			"grocery" => Ok(SourceId::Grocery),
			"food" => Ok(SourceId::Food),
			"healthcare" => Ok(SourceId::Healthcare),
			"college" => Ok(SourceId::College),
			"airline" => Ok(SourceId::Airline),
			_ => Err(UnknownSource(s.to_string())),
		}
	}

	/// Human-readable name as shown in reports.
	pub fn label(&self) -> &'static str {
		match self {
			SourceId::HeadlineCpi => "Headline CPI",
			SourceId::CoreCpi => "Core CPI",
			SourceId::Energy => "Energy",
			SourceId::Gas => "Gas",
			SourceId::Grocery => "Grocery",
			SourceId::Food => "Food",
			SourceId::Healthcare => "Healthcare",
			SourceId::College => "College",
			SourceId::Airline => "Airline",
		}
	}
}

impl fmt::Display for SourceId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let s = match self {
			SourceId::HeadlineCpi => "headline-cpi",
			SourceId::CoreCpi => "core-cpi",
			SourceId::Energy => "energy",
			SourceId::Gas => "gas",
			SourceId::Grocery => "grocery",
			SourceId::Food => "food",
			SourceId::Healthcare => "healthcare",
			SourceId::College => "college",
			SourceId::Airline => "airline",
		};
		write!(f, "{}", s)
	}
}

/// How to recover the real header row of a source's raw table. The
/// pages wrap their tables in banner rows in different ways, so each
/// source declares where its Year/Jan/../Dec row actually lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeaderRule {
	/// The table's own header row is already correct.
	AsIs,
	/// Promote the given data row to header; rows at or before it are
	/// discarded.
	FromRow(usize),
	/// Promote the final data row to header (one source appends its
	/// header below the data).
	FromLastRow,
}

/// Declarative normalization parameters for one source. The sources
/// all share one pipeline; they differ only in this data.
pub struct SourceSpec {
	pub id: SourceId,
	pub url: &'static str,
	pub header: HeaderRule,

	/// Drop rows earlier than this year, where a table's early data
	/// is known to be junk.
	pub min_year: Option<u32>,

	/// Fix headers that spell month tokens in the wrong case.
	pub capitalize_months: bool,

	/// Drop data rows that repeat the header mid-table.
	pub drop_repeated_header: bool,
}

impl SourceSpec {
	const fn new(id: SourceId, url: &'static str, header: HeaderRule) -> Self {
		Self {
			id,
			url,
			header,
			min_year: None,
			capitalize_months: false,
			drop_repeated_header: false,
		}
	}
}

macro_rules! page {
	($slug:literal) => {
		concat!(
			"https://www.usinflationcalculator.com/inflation/",
			$slug,
			"/"
		)
	};
}

/// The full static registry, in canonical listing order.
pub fn registry() -> &'static [SourceSpec] {
	const REGISTRY: [SourceSpec; 9] = [
		SourceSpec::new(
			SourceId::HeadlineCpi,
			page!("historical-inflation-rates"),
			HeaderRule::AsIs,
		),
		SourceSpec::new(
			SourceId::CoreCpi,
			page!("united-states-core-inflation-rates"),
			HeaderRule::FromLastRow,
		),
		SourceSpec::new(
			SourceId::Energy,
			page!(
				"energy-prices-gasoline-electricity-and-fuel-oil-2015-present"
			),
			HeaderRule::FromRow(0),
		),
		SourceSpec {
			id: SourceId::Gas,
			url: page!("gasoline-inflation-in-the-united-states"),
			header: HeaderRule::FromRow(0),
			min_year: None,
			capitalize_months: true,
			drop_repeated_header: false,
		},
		SourceSpec::new(
			SourceId::Grocery,
			page!(
				"average-prices-for-selected-grocery-store-items-2015-present"
			),
			HeaderRule::FromRow(0),
		),
		SourceSpec::new(
			SourceId::Food,
			page!("food-inflation-in-the-united-states"),
			HeaderRule::AsIs,
		),
		SourceSpec::new(
			SourceId::Healthcare,
			page!("health-care-inflation-in-the-united-states"),
			HeaderRule::FromRow(0),
		),
		SourceSpec {
			id: SourceId::College,
			url: page!("college-tuition-inflation-in-the-united-states"),
			header: HeaderRule::FromRow(0),
			min_year: None,
			capitalize_months: false,
			drop_repeated_header: true,
		},
		SourceSpec {
			id: SourceId::Airline,
			url: page!("airfare-inflation"),
			header: HeaderRule::FromRow(0),
			min_year: Some(1970),
			capitalize_months: false,
			drop_repeated_header: false,
		},
	];

	&REGISTRY
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_identifiers_round_trip() {
		for spec in registry() {
			let parsed = SourceId::from_str(&spec.id.to_string()).unwrap();
			assert_eq!(parsed, spec.id);
		}
	}

	#[test]
	fn test_identifiers_unique() {
		let mut seen = std::collections::HashSet::new();
		for spec in registry() {
			assert!(seen.insert(spec.id), "duplicate id {}", spec.id);
		}
		assert_eq!(seen.len(), 9);
	}

	#[test]
	fn test_unknown_identifier() {
		assert!(SourceId::from_str("cpi").is_err());
		assert!(SourceId::from_str("").is_err());
	}
}
