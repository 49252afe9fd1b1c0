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

use std::path::Path;

use calamine::{Data, DataType};
use chrono::NaiveDate;

use super::typedef::*;
use crate::error::{PipelineError, Result};
use crate::scaler::ScalerRegistry;

pub(super) const COLUMN_NAMES: [&str; 5] = [
	"player name",
	"period",
	"tournament count",
	"average buy-in",
	"average ROI",
];

const DELIMITER_CANDIDATES: [u8; 4] = [b',', b';', b'\t', b'|'];
const FILE_NAME_PREFIX: &str = "resultado_roi_mensal_";
const FILE_NAME_SUFFIX: &str = ".csv";

pub(crate) fn month_label(year: i32, month: u32) -> String {
	format!("{}-{:02}", year, month)
}

/// Picks the delimiter that shows up most often in the header line.
pub(super) fn sniff_delimiter(text: &str) -> u8 {
	let header = text
		.lines()
		.find(|line| !line.trim().is_empty())
		.unwrap_or_default();

	DELIMITER_CANDIDATES
		.iter()
		.map(|candidate| {
			let count = header.bytes().filter(|each| each == candidate).count();
			(*candidate, count)
		})
		.filter(|(_, count)| *count > 0)
		// Ties go to the earlier candidate
		.fold(None, |last: Option<(u8, usize)>, each| match last {
			Some(found) if found.1 >= each.1 => Some(found),
			_ => Some(each),
		})
		.map(|(delimiter, _)| delimiter)
		.unwrap_or(b',')
}

pub(super) fn parse_period(row: usize, text: &str) -> Result<(i32, u32)> {
	let text = text.trim();
	let (year_text, month_text) = text.split_once('-').ok_or_else(|| {
		PipelineError::malformed(row, format!("period \"{}\" is not YYYY-MM", text))
	})?;

	let year = year_text.parse::<i32>().map_err(|_| {
		PipelineError::malformed(row, format!("period \"{}\" has no numeric year", text))
	})?;
	let month = month_text.parse::<u32>().map_err(|_| {
		PipelineError::malformed(row, format!("period \"{}\" has no numeric month", text))
	})?;

	if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
		return Err(PipelineError::malformed(
			row,
			format!("period \"{}\" is not a calendar month", text),
		));
	}

	Ok((year, month))
}

pub(super) fn parse_number(row: usize, column: usize, text: &str) -> Result<f64> {
	let text = text.trim();
	match text.parse::<f64>() {
		Ok(value) if value.is_finite() => Ok(value),
		_ => Err(PipelineError::malformed(
			row,
			format!("{} \"{}\" is not a number", COLUMN_NAMES[column], text),
		)),
	}
}

pub(super) fn is_blank<S: AsRef<str>>(fields: &[S]) -> bool {
	fields.iter().all(|each| each.as_ref().trim().is_empty())
}

/// `row` is 1-based and counts data rows only, so it matches what a user sees
/// below the header.
pub(super) fn parse_row<S: AsRef<str>>(row: usize, fields: &[S]) -> Result<ParsedRow> {
	if fields.len() < COLUMN_NAMES.len() {
		return Err(PipelineError::malformed(
			row,
			format!(
				"expected {} columns, found {}",
				COLUMN_NAMES.len(),
				fields.len()
			),
		));
	}

	let (year, month) = parse_period(row, fields[1].as_ref())?;
	let tournament_count = parse_number(row, 2, fields[2].as_ref())?;
	let avg_buy_in = parse_number(row, 3, fields[3].as_ref())?;
	let roi = parse_number(row, 4, fields[4].as_ref())?;

	Ok(ParsedRow {
		player_name: fields[0].as_ref().trim().to_string(),
		point: DataPoint {
			year,
			month,
			tournament_count,
			avg_buy_in,
			roi,
		},
	})
}

pub(super) fn assemble_dataset(rows: Vec<ParsedRow>) -> Result<Dataset> {
	if rows.is_empty() {
		return Err(PipelineError::malformed(0, "the file contains no data rows"));
	}

	let player_name = rows
		.iter()
		.map(|each| each.player_name.as_str())
		.find(|each| !each.is_empty())
		.map(str::to_string);

	let mut records = rows.into_iter().map(|each| each.point).collect::<Vec<_>>();
	records.sort_by_key(|each| (each.year, each.month));

	let mut scalers = ScalerRegistry::default();
	scalers.fit(&records);

	let features = records
		.iter()
		.map(|each| scalers.normalize_record(each))
		.collect::<Result<Vec<_>>>()?;
	let labels = records.iter().map(|each| each.roi).collect::<Vec<_>>();
	let summary = summarize(&records);

	Ok(Dataset {
		player_name,
		records,
		features,
		labels,
		scalers,
		summary,
	})
}

fn summarize_values(values: impl Iterator<Item = f64> + Clone) -> FeatureSummary {
	let count = values.clone().count();
	if count == 0 {
		return FeatureSummary::default();
	}

	let (min, max, sum) = values.fold(
		(f64::INFINITY, f64::NEG_INFINITY, 0f64),
		|(min, max, sum), each| (min.min(each), max.max(each), sum + each),
	);

	FeatureSummary {
		min,
		max,
		mean: sum / count as f64,
	}
}

pub(crate) fn summarize(records: &[DataPoint]) -> DataSummary {
	DataSummary {
		tournament_count: summarize_values(records.iter().map(|each| each.tournament_count)),
		avg_buy_in: summarize_values(records.iter().map(|each| each.avg_buy_in)),
		roi: summarize_values(records.iter().map(|each| each.roi)),
		total_volume: records
			.iter()
			.map(|each| each.tournament_count * each.avg_buy_in)
			.sum(),
		month_count: records.len(),
	}
}

pub(crate) fn initial_time_series(records: &[DataPoint]) -> Vec<TimeSeriesPoint> {
	records
		.iter()
		.map(|each| TimeSeriesPoint {
			month_label: each.month_label(),
			year: each.year,
			real_roi: each.roi,
			predicted_roi: None,
		})
		.collect()
}

/// Newest first, at most `count` records.
pub(crate) fn recent_records(records: &[DataPoint], count: usize) -> Vec<DataPoint> {
	records.iter().rev().take(count).cloned().collect()
}

/// Recovers the player from exported file names like
/// `resultado_roi_mensal_<player>.csv`.
pub(super) fn player_name_from_path(path: &Path) -> Option<String> {
	let name = path.file_name()?.to_str()?;
	let lowered = name.to_lowercase();

	let start = lowered.find(FILE_NAME_PREFIX)? + FILE_NAME_PREFIX.len();
	let end = lowered.rfind(FILE_NAME_SUFFIX)?;
	if end <= start {
		return None;
	}

	name.get(start..end).map(str::to_string)
}

/// Spreadsheets may store the period as a real date, render it back as YYYY-MM.
pub(super) fn workbook_cell_text(cell: &Data) -> String {
	match cell {
		Data::DateTime(_) | Data::DateTimeIso(_) => match cell.as_date() {
			Some(date) => date.format("%Y-%m").to_string(),
			None => cell.to_string(),
		},
		_ => cell.to_string(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;
	use rstest::rstest;

	fn row(period: &str, tournament_count: &str) -> Vec<String> {
		["Ana", period, tournament_count, "12.5", "3.1"]
			.iter()
			.map(|each| each.to_string())
			.collect()
	}

	#[rstest]
	#[case("2024-03", (2024, 3))]
	#[case("2023-1", (2023, 1))]
	#[case(" 2025-12 ", (2025, 12))]
	fn parses_periods(#[case] text: &str, #[case] expected: (i32, u32)) {
		assert_eq!(parse_period(1, text).unwrap(), expected);
	}

	#[rstest]
	#[case("2024")]
	#[case("2024-13")]
	#[case("2024-00")]
	#[case("24-ab")]
	#[case("2024-03-15")]
	#[case("")]
	fn rejects_malformed_periods(#[case] text: &str) {
		assert!(matches!(
			parse_period(4, text),
			Err(PipelineError::MalformedInput { row: 4, .. })
		));
	}

	#[rstest]
	#[case("abc")]
	#[case("NaN")]
	#[case("inf")]
	#[case("")]
	fn rejects_non_numeric_fields(#[case] text: &str) {
		assert!(parse_row(2, &row("2024-01", text)).is_err());
	}

	#[test]
	fn short_rows_are_malformed() {
		let err = parse_row(7, &["Ana", "2024-01", "10"]).unwrap_err();

		assert_eq!(
			err.to_string(),
			"malformed record at data row 7: expected 5 columns, found 3"
		);
	}

	#[rstest]
	#[case("Player,Period,Tournaments,BuyIn,ROI\n", b',')]
	#[case("Player;Period;Tournaments;BuyIn;ROI\n", b';')]
	#[case("Player\tPeriod\tTournaments\tBuyIn\tROI\n", b'\t')]
	#[case("Player|Period|Tournaments|BuyIn|ROI\n", b'|')]
	#[case("\n\nPlayer;Period;Tournaments;BuyIn;ROI\n", b';')]
	#[case("single column\n", b',')]
	fn sniffs_delimiter_from_header(#[case] text: &str, #[case] expected: u8) {
		assert_eq!(sniff_delimiter(text), expected);
	}

	#[test]
	fn assembles_sorted_and_aligned_dataset() {
		let rows = [("2024-03", "120"), ("2023-01", "80"), ("2024-01", "100")]
			.iter()
			.enumerate()
			.map(|(index, (period, count))| parse_row(index + 1, &row(period, count)).unwrap())
			.collect::<Vec<_>>();

		let dataset = assemble_dataset(rows).unwrap();

		let labels = dataset
			.records
			.iter()
			.map(|each| each.month_label())
			.collect::<Vec<_>>();
		assert_eq!(labels, ["2023-01", "2024-01", "2024-03"]);
		assert_eq!(dataset.features.len(), 3);
		assert_eq!(dataset.features[0][2], 0f64);
		assert_eq!(dataset.features[1][2], 0.5);
		assert_eq!(dataset.features[2][2], 1f64);
		assert_eq!(dataset.player_name.as_deref(), Some("Ana"));
	}

	#[test]
	fn summary_uses_min_max_and_arithmetic_mean() {
		let records = [80f64, 100f64, 120f64]
			.iter()
			.enumerate()
			.map(|(index, count)| DataPoint {
				year: 2024,
				month: index as u32 + 1,
				tournament_count: *count,
				avg_buy_in: 10f64,
				roi: index as f64 - 1f64,
			})
			.collect::<Vec<_>>();

		let summary = summarize(&records);

		assert_eq!(
			summary.tournament_count,
			FeatureSummary {
				min: 80f64,
				max: 120f64,
				mean: 100f64
			}
		);
		assert_eq!(summary.roi.mean, 0f64);
		assert_eq!(summary.total_volume, 3000f64);
		assert_eq!(summary.month_count, 3);
	}

	#[test]
	fn empty_input_has_no_dataset() {
		assert!(matches!(
			assemble_dataset(Vec::new()),
			Err(PipelineError::MalformedInput { .. })
		));
	}

	#[rstest]
	#[case("resultado_roi_mensal_joao.csv", Some("joao"))]
	#[case("/tmp/Resultado_ROI_Mensal_Maria_Silva.CSV", Some("Maria_Silva"))]
	#[case("results.csv", None)]
	#[case("resultado_roi_mensal_.csv", None)]
	fn recovers_player_from_file_name(#[case] path: &str, #[case] expected: Option<&str>) {
		assert_eq!(
			player_name_from_path(Path::new(path)).as_deref(),
			expected
		);
	}

	#[test]
	fn workbook_cells_render_as_text() {
		use calamine::{ExcelDateTime, ExcelDateTimeType};

		let serial = Data::DateTime(ExcelDateTime::new(
			45352f64,
			ExcelDateTimeType::DateTime,
			false,
		));
		let fields = [
			Data::String(String::from("Ana")),
			serial,
			Data::Float(80f64),
			Data::DateTimeIso(String::from("2023-11-01")),
			Data::Empty,
		]
		.iter()
		.map(workbook_cell_text)
		.collect::<Vec<_>>();

		assert_eq!(fields, ["Ana", "2024-03", "80", "2023-11", ""]);
	}

	#[test]
	fn recent_records_are_newest_first() {
		let records = (1..=8)
			.map(|month| DataPoint {
				year: 2024,
				month,
				..Default::default()
			})
			.collect::<Vec<_>>();

		let months = recent_records(&records, 6)
			.iter()
			.map(|each| each.month)
			.collect::<Vec<_>>();

		assert_eq!(months, [8, 7, 6, 5, 4, 3]);
	}
}
