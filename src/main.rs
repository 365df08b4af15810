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
use crate::ingest::http::Client;
use crate::ingest::pipeline::{ingest_all, DirFetcher, HttpFetcher};
use crate::ingest::registry::{registry, SourceId};
use crate::reports::series_reporter::SeriesReporter;
use crate::reports::sources_reporter::SourcesReporter;
use crate::series::session::Catalog;
use anyhow::{bail, Error};
use chrono::Local;
use clap::{Parser, ValueEnum};
use std::fs;
use std::io;
use std::io::{BufRead, Write};

mod config;
mod errors;
mod ingest;
mod reports;
mod series;
mod util;

#[derive(Parser)]
#[command(name = "infl", version, about = "Compound inflation explorer")]
struct Cli {
	// ----------------
	// -- POSITIONAL --
	// ----------------
	/// The command to execute
	command: Directive,

	/// The data source for the Show, Csv and Session commands
	#[arg(required = false)]
	term: Option<String>,

	// -----------
	// -- FLAGS --
	// -----------
	/// Comma-separated horizons in years, e.g. "2,5,10"
	#[arg(short, long)]
	years: Option<String>,

	/// Hide months before this year
	#[arg(short, long)]
	begin: Option<u32>,

	/// Hide months after this year
	#[arg(short, long)]
	end: Option<u32>,

	/// Write CSV output to this file instead of stdout
	#[arg(short, long)]
	out: Option<String>,

	/// Read saved pages from this directory instead of the network
	#[arg(long)]
	offline: Option<String>,

	/// Custom config file location (default: ~/.config/infl/config.toml)
	#[arg(long)]
	config: Option<String>,
}

impl Cli {
	/// Extra validations on top of what clap does
	fn validate(&self) -> Result<(), Error> {
		if let (Some(b), Some(e)) = (self.begin, self.end) {
			if b > e {
				bail!("Begin year {} is after end year {}", b, e);
			}
		}

		Ok(())
	}
}

#[derive(ValueEnum, Clone, PartialEq)]
enum Directive {
	Sources, // summary of every ingested source

	Show, // one source's requested columns as a table
	Csv,  // the same projection as CSV

	Session, // interactive add/reset loop against one source
}

fn main() -> Result<(), Error> {
	let args = Cli::parse();
	args.validate()?;

	let config = config::get_config(args.config.as_ref())?;

	// Everything runs against a fully ingested batch; a single bad
	// source aborts here before any directive produces output.
	let catalog = warm_up(&args, &config)?;

	match args.command {
		Directive::Sources => {
			SourcesReporter::new(&catalog).print();
		},
		Directive::Show => {
			let id = source_term(&args)?;
			request_horizons(&catalog, id, args.years.as_deref())?;

			let reporter = SeriesReporter::new(
				catalog.series(id)?,
				catalog.derived_columns(id)?,
			);
			reporter.print(args.begin, args.end);
		},
		Directive::Csv => {
			let id = source_term(&args)?;
			request_horizons(&catalog, id, args.years.as_deref())?;

			let reporter = SeriesReporter::new(
				catalog.series(id)?,
				catalog.derived_columns(id)?,
			);
			let csv = reporter.to_csv(args.begin, args.end);

			match &args.out {
				Some(path) => {
					fs::write(path, csv)?;
					println!("Wrote {}", path);
				},
				None => print!("{}", csv),
			}
		},
		Directive::Session => {
			let id = source_term(&args)?;
			run_session(&catalog, id, args.begin, args.end)?;
		},
	}

	Ok(())
}

/// Fetches and normalizes all sources, concurrently and all-or-nothing.
fn warm_up(
	args: &Cli,
	config: &config::config_file::Config,
) -> Result<Catalog, Error> {
	let workers = config.workers.unwrap_or_else(|| registry().len());

	let map = match &args.offline {
		Some(dir) => {
			let fetcher = DirFetcher::new(dir.as_str());
			ingest_all(&fetcher, workers)?
		},
		None => {
			let http = config.http.as_ref();
			let client = Client::new(
				http.and_then(|h| h.user_agent.clone()),
				http.and_then(|h| h.timeout_secs),
			)?;
			let fetcher = HttpFetcher::new(client);
			ingest_all(&fetcher, workers)?
		},
	};

	Ok(Catalog::new(map))
}

fn source_term(args: &Cli) -> Result<SourceId, Error> {
	match &args.term {
		Some(term) => Ok(SourceId::from_str(term)?),
		None => bail!("No data source specified"),
	}
}

/// Requests each horizon in the comma-separated list. Tokens that are
/// not positive integers are ignored, the same do-nothing treatment
/// an empty input box got in the original interface.
fn request_horizons(
	catalog: &Catalog,
	id: SourceId,
	years: Option<&str>,
) -> Result<(), Error> {
	let Some(years) = years else {
		return Ok(());
	};

	for token in years.split(',') {
		if let Ok(n) = token.trim().parse::<i64>() {
			catalog.add_horizon(id, n)?;
		}
	}

	Ok(())
}

/// A line-oriented session against one source, exercising the same
/// add/reset lifecycle the chart interface drives.
fn run_session(
	catalog: &Catalog,
	id: SourceId,
	begin: Option<u32>,
	end: Option<u32>,
) -> Result<(), Error> {
	println!(
		"{} ({}) - add N | reset | horizons | show | csv [path] | quit",
		id,
		id.label()
	);

	let stdin = io::stdin();
	let mut line = String::new();

	loop {
		print!("> ");
		io::stdout().flush()?;

		line.clear();
		if stdin.lock().read_line(&mut line)? == 0 {
			break; // EOF
		}

		let mut words = line.split_whitespace();
		match words.next() {
			Some("add") => {
				// anything that isn't a positive integer is a no-op
				if let Some(Ok(n)) = words.next().map(|w| w.parse::<i64>()) {
					catalog.add_horizon(id, n)?;
				}
				print_horizons(catalog, id)?;
			},
			Some("reset") => {
				catalog.reset(id)?;
				print_horizons(catalog, id)?;
			},
			Some("horizons") => print_horizons(catalog, id)?,
			Some("show") => {
				let reporter = SeriesReporter::new(
					catalog.series(id)?,
					catalog.derived_columns(id)?,
				);
				reporter.print(begin, end);
			},
			Some("csv") => {
				let path = match words.next() {
					Some(p) => p.to_string(),
					None => {
						format!("{}-{}.csv", id, Local::now().date_naive())
					},
				};

				let reporter = SeriesReporter::new(
					catalog.series(id)?,
					catalog.derived_columns(id)?,
				);
				fs::write(&path, reporter.to_csv(begin, end))?;
				println!("Wrote {}", path);
			},
			Some("quit") | Some("exit") => break,
			Some(other) => println!("Unknown command: {}", other),
			None => continue,
		}
	}

	Ok(())
}

fn print_horizons(catalog: &Catalog, id: SourceId) -> Result<(), Error> {
	let requested = catalog.requested_horizons(id)?;
	let rendered: Vec<String> =
		requested.iter().map(|h| h.to_string()).collect();

	println!(
		"horizons: [{}] ({} computed)",
		rendered.join(", "),
		catalog.session(id)?.computed_count()
	);

	Ok(())
}
