/*
 * ROI Forecaster, a small feed-forward ROI regressor for poker results
 * Copyright (C) 2025 Athaariq A. Ramadhani <foss@athaariq.my.id>
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program.  If not, see <http://www.gnu.org/licenses/>.
 */

use std::{io::Read, path::Path};

use calamine::Reader;
use tracing::{debug, info};

use super::helper::*;
use super::typedef::*;
use crate::error::{PipelineError, Result};
use crate::session::Session;

impl Session {
	/// Ingests delimited text. Nothing is replaced unless every row parses.
	pub fn ingest_str(&self, text: &str) -> Result<&Self> {
		let dataset = parse_delimited(text)?;
		self.install_dataset(dataset)?;
		Ok(self)
	}

	pub fn ingest_reader<R: Read>(&self, mut reader: R) -> Result<&Self> {
		let mut text = String::new();
		reader.read_to_string(&mut text)?;
		self.ingest_str(&text)
	}

	pub fn ingest_csv<P: AsRef<Path>>(&self, path: P) -> Result<&Self> {
		let path = path.as_ref();
		let text = std::fs::read_to_string(path)?;
		let mut dataset = parse_delimited(&text)?;
		if dataset.player_name.is_none() {
			dataset.player_name = player_name_from_path(path);
		}

		self.install_dataset(dataset)?;
		Ok(self)
	}

	/// Reads the first sheet of an xlsx, xls, xlsb or ods file.
	pub fn ingest_workbook<P: AsRef<Path>>(&self, path: P) -> Result<&Self> {
		let mut sheets = calamine::open_workbook_auto(path.as_ref())?;
		let range = match sheets.worksheet_range_at(0) {
			Some(found) => found?,
			None => {
				return Err(PipelineError::UnsupportedFile(format!(
					"\"{}\" has no sheets",
					path.as_ref().to_string_lossy()
				)))
			}
		};

		let mut rows = Vec::<ParsedRow>::with_capacity(range.height());
		// Skip the header, same as the CSV path
		for each_row in range.rows().skip(1) {
			let fields = each_row.iter().map(workbook_cell_text).collect::<Vec<_>>();
			if is_blank(&fields) {
				continue;
			}

			rows.push(parse_row(rows.len() + 1, &fields)?);
		}

		let mut dataset = assemble_dataset(rows)?;
		if dataset.player_name.is_none() {
			dataset.player_name = player_name_from_path(path.as_ref());
		}

		self.install_dataset(dataset)?;
		Ok(self)
	}

	/// Dispatches on the file extension.
	pub fn load_data<P: AsRef<Path>>(&self, path: P) -> Result<&Self> {
		let path = path.as_ref();
		let extension = path
			.extension()
			.and_then(|found| found.to_str())
			.map(str::to_lowercase)
			.ok_or_else(|| {
				PipelineError::UnsupportedFile(format!(
					"\"{}\" has no extension",
					path.to_string_lossy()
				))
			})?;

		match extension.as_str() {
			"csv" | "txt" | "tsv" => self.ingest_csv(path),
			"xlsx" | "xls" | "xlsb" | "ods" => self.ingest_workbook(path),
			_ => Err(PipelineError::UnsupportedFile(format!(
				"cannot parse \"{}\" file extension",
				extension
			))),
		}
	}

	/// The `count` most recent months, newest first.
	pub fn recent_records(&self, count: usize) -> Result<Vec<DataPoint>> {
		let guarded_state = self.lock_state()?;
		let dataset = guarded_state
			.dataset
			.as_ref()
			.ok_or(PipelineError::NoDataIngested)?;

		Ok(recent_records(&dataset.records, count))
	}

	fn install_dataset(&self, dataset: Dataset) -> Result<()> {
		let time_series = {
			let mut guarded_state = self.lock_state()?;
			if self.is_training() {
				return Err(PipelineError::TrainingInProgress);
			}

			info!(
				months = dataset.len(),
				player = dataset.player_name.as_deref().unwrap_or("(unknown)"),
				"dataset ingested"
			);

			guarded_state.time_series = initial_time_series(&dataset.records);
			guarded_state.dataset = Some(dataset);
			guarded_state.history.clear();
			guarded_state.clear_evaluation();
			guarded_state.time_series.clone()
		};

		self.observers()?.emit_time_series(&time_series);
		Ok(())
	}
}

fn parse_delimited(text: &str) -> Result<Dataset> {
	let delimiter = sniff_delimiter(text);
	debug!(delimiter = %(delimiter as char).escape_default(), "delimiter detected");

	let mut reader = csv::ReaderBuilder::new()
		.delimiter(delimiter)
		.has_headers(true)
		.flexible(true)
		.from_reader(text.as_bytes());

	let mut rows = Vec::<ParsedRow>::new();
	for each_record in reader.records() {
		let record = each_record?;
		let fields = record.iter().collect::<Vec<_>>();
		if is_blank(&fields) {
			continue;
		}

		rows.push(parse_row(rows.len() + 1, &fields)?);
	}

	assemble_dataset(rows)
}
