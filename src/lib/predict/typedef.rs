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

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

use crate::error::{PipelineError, Result};
use crate::scaler::Feature;

pub const YEAR_RANGE: RangeInclusive<i32> = 2000..=2050;
pub const MONTH_RANGE: RangeInclusive<u32> = 1..=12;
pub const TOURNAMENT_COUNT_RANGE: RangeInclusive<f64> = 1f64..=1000f64;
pub const MIN_AVG_BUY_IN: f64 = 0.1;
pub const FORECAST_MONTHS_RANGE: RangeInclusive<usize> = 2..=24;
pub const DEFAULT_FORECAST_MONTHS: usize = 6;

/// How many recent months feed the default prediction input.
pub const RECENT_WINDOW: usize = 6;

#[derive(Default, PartialEq, Deserialize, Serialize, Clone, Copy, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PredictionInput {
	pub year: i32,
	pub month: u32,
	pub tournament_count: f64,
	pub avg_buy_in: f64,
}

impl PredictionInput {
	pub fn feature(&self, feature: Feature) -> f64 {
		match feature {
			Feature::Year => self.year as f64,
			Feature::Month => self.month as f64,
			Feature::TournamentCount => self.tournament_count,
			Feature::AvgBuyIn => self.avg_buy_in,
		}
	}

	pub fn validate(&self) -> Result<()> {
		if !YEAR_RANGE.contains(&self.year) {
			return Err(PipelineError::InvalidInput(format!(
				"year {} is outside {:?}",
				self.year, YEAR_RANGE
			)));
		}

		if !MONTH_RANGE.contains(&self.month) {
			return Err(PipelineError::InvalidInput(format!(
				"month {} is outside {:?}",
				self.month, MONTH_RANGE
			)));
		}

		if !TOURNAMENT_COUNT_RANGE.contains(&self.tournament_count) {
			return Err(PipelineError::InvalidInput(format!(
				"tournament count {} is outside {:?}",
				self.tournament_count, TOURNAMENT_COUNT_RANGE
			)));
		}

		// Written this way so NaN is refused too
		if !(self.avg_buy_in >= MIN_AVG_BUY_IN) {
			return Err(PipelineError::InvalidInput(format!(
				"average buy-in {} is below {}",
				self.avg_buy_in, MIN_AVG_BUY_IN
			)));
		}

		Ok(())
	}
}

#[derive(Default, PartialEq, Deserialize, Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct FuturePrediction {
	#[serde(rename = "month")]
	pub month_label: String,
	pub roi: f64,
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn input(year: i32, month: u32, tournament_count: f64, avg_buy_in: f64) -> PredictionInput {
		PredictionInput {
			year,
			month,
			tournament_count,
			avg_buy_in,
		}
	}

	#[rstest]
	#[case(input(2000, 1, 1f64, 0.1))]
	#[case(input(2050, 12, 1000f64, 500f64))]
	fn surface_edges_are_accepted(#[case] input: PredictionInput) {
		assert!(input.validate().is_ok());
	}

	#[rstest]
	#[case(input(1999, 6, 50f64, 10f64))]
	#[case(input(2051, 6, 50f64, 10f64))]
	#[case(input(2024, 0, 50f64, 10f64))]
	#[case(input(2024, 13, 50f64, 10f64))]
	#[case(input(2024, 6, 0.5, 10f64))]
	#[case(input(2024, 6, 1001f64, 10f64))]
	#[case(input(2024, 6, 50f64, 0.05))]
	#[case(input(2024, 6, 50f64, f64::NAN))]
	fn off_surface_input_is_rejected(#[case] input: PredictionInput) {
		assert!(matches!(
			input.validate(),
			Err(PipelineError::InvalidInput(_))
		));
	}
}
