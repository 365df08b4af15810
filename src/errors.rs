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
use thiserror::Error;

/// A failure during ingestion, always attributable to exactly one
/// source. Ingestion is all-or-nothing, so any one of these fails the
/// whole batch; nothing downstream ever sees a partial source map.
#[derive(Debug, Error)]
pub enum IngestError {
	/// The fetch collaborator could not retrieve the raw table.
	#[error("{source_id}: fetch failed: {reason}")]
	Transport { source_id: SourceId, reason: String },

	/// The raw table was retrieved but failed normalization:
	/// unexpected header shape, unparseable month token, or a
	/// non-numeric value that is not the availability sentinel.
	#[error("{source_id}: malformed table: {reason}")]
	Malformed { source_id: SourceId, reason: String },
}

impl IngestError {
	pub fn source_id(&self) -> SourceId {
		match self {
			IngestError::Transport { source_id, .. }
			| IngestError::Malformed { source_id, .. } => *source_id,
		}
	}
}

/// A consumer asked for a source identifier not present in the
/// registry. A caller bug, not a recoverable runtime condition.
#[derive(Debug, Error)]
#[error("unknown data source: {0}")]
pub struct UnknownSource(pub String);
