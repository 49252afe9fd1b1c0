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

use chrono::{Datelike, Months, NaiveDate};
use std::io::Write;

use crate::data::typedef::DataPoint;
use crate::error::Result;

use super::typedef::*;

/// The calendar month after (`year`, `month`), rolling December into January.
pub(super) fn next_month(year: i32, month: u32) -> Option<(i32, u32)> {
	let next = NaiveDate::from_ymd_opt(year, month, 1)?.checked_add_months(Months::new(1))?;
	Some((next.year(), next.month()))
}

/// The month after the newest record, with activity averaged over the last
/// few months. Tournament count is rounded to a whole number, and both
/// activity values are pulled onto the prediction surface.
pub(super) fn default_input_from(recent: &[DataPoint]) -> Option<PredictionInput> {
	let latest = recent.iter().max_by_key(|each| (each.year, each.month))?;
	let (year, month) = next_month(latest.year, latest.month)?;

	let count = recent.len() as f64;
	let tournament_count = recent.iter().map(|each| each.tournament_count).sum::<f64>() / count;
	let avg_buy_in = recent.iter().map(|each| each.avg_buy_in).sum::<f64>() / count;

	Some(PredictionInput {
		year,
		month,
		tournament_count: tournament_count
			.round()
			.clamp(*TOURNAMENT_COUNT_RANGE.start(), *TOURNAMENT_COUNT_RANGE.end()),
		avg_buy_in: avg_buy_in.max(MIN_AVG_BUY_IN),
	})
}

pub(super) fn write_forecast<W: Write>(writer: W, predictions: &[FuturePrediction]) -> Result<()> {
	let mut writer = csv::Writer::from_writer(writer);
	writer.write_record(["Month", "Predicted ROI"])?;

	for each in predictions {
		writer.write_record([each.month_label.clone(), each.roi.to_string()])?;
	}

	writer.flush()?;
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use approx::assert_relative_eq;
	use pretty_assertions::assert_eq;
	use rstest::rstest;

	fn point(year: i32, month: u32, tournament_count: f64, avg_buy_in: f64) -> DataPoint {
		DataPoint {
			year,
			month,
			tournament_count,
			avg_buy_in,
			roi: 0f64,
		}
	}

	#[rstest]
	#[case(2024, 11, Some((2024, 12)))]
	#[case(2024, 12, Some((2025, 1)))]
	#[case(2023, 1, Some((2023, 2)))]
	#[case(2024, 13, None)]
	fn month_advances_with_rollover(
		#[case] year: i32,
		#[case] month: u32,
		#[case] expected: Option<(i32, u32)>,
	) {
		assert_eq!(next_month(year, month), expected);
	}

	#[test]
	fn default_input_follows_latest_month() {
		let recent = [
			point(2024, 12, 101f64, 20f64),
			point(2024, 11, 90f64, 30f64),
			point(2024, 10, 100f64, 10f64),
		];

		let input = default_input_from(&recent).unwrap();

		assert_eq!((input.year, input.month), (2025, 1));
		assert_eq!(input.tournament_count, 97f64);
		assert_relative_eq!(input.avg_buy_in, 20f64);
	}

	#[rstest]
	#[case(&[0f64, 1f64, 0f64], 1f64)]
	#[case(&[1500f64, 1200f64], 1000f64)]
	#[case(&[999.4f64], 999f64)]
	fn default_input_stays_on_the_surface(#[case] counts: &[f64], #[case] expected: f64) {
		let recent = counts
			.iter()
			.enumerate()
			.map(|(index, each)| point(2024, index as u32 + 1, *each, 0f64))
			.collect::<Vec<_>>();

		let input = default_input_from(&recent).unwrap();

		assert_eq!(input.tournament_count, expected);
		assert_eq!(input.avg_buy_in, MIN_AVG_BUY_IN);
		assert!(input.validate().is_ok());
	}

	#[test]
	fn default_input_needs_data() {
		assert_eq!(default_input_from(&[]), None);
	}

	#[test]
	fn forecast_csv_has_header_and_rows() {
		let predictions = [
			FuturePrediction {
				month_label: String::from("2024-11"),
				roi: 12.5,
			},
			FuturePrediction {
				month_label: String::from("2024-12"),
				roi: -3f64,
			},
		];

		let mut buffer = Vec::<u8>::new();
		write_forecast(&mut buffer, &predictions).unwrap();

		assert_eq!(
			String::from_utf8(buffer).unwrap(),
			"Month,Predicted ROI\n2024-11,12.5\n2024-12,-3\n"
		);
	}
}
