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
use std::time::Duration;

const DEFAULT_USER_AGENT: &str =
	concat!("infl/", env!("CARGO_PKG_VERSION"));
const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub struct Client {
	client: reqwest::blocking::Client,
}

impl Client {
	pub fn new(
		user_agent: Option<String>,
		timeout_secs: Option<u64>,
	) -> Result<Self, Error> {
		let client = reqwest::blocking::Client::builder()
			.user_agent(
				user_agent.unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
			)
			.timeout(Duration::from_secs(
				timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
			))
			.build()?;

		Ok(Client { client })
	}

	/// Sends a GET and returns the response body as text. Errors on
	/// non-2xx response codes. Safe to retry at the caller's
	/// discretion; these pages are plain idempotent reads.
	pub fn get_text(&self, url: &str) -> Result<String, Error> {
		println!("Sending GET to {}", url);
		let response = self.client.get(url).send()?;

		if !response.status().is_success() {
			bail!("Request failed with status: {}", response.status());
		}

		Ok(response.text()?)
	}
}
