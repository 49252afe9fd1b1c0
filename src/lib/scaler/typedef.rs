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
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

use crate::data::typedef::DataPoint;
use crate::error::{PipelineError, Result};
use crate::predict::typedef::PredictionInput;

/// Model input columns, in the order the network sees them.
#[derive(
	PartialEq, Eq, Hash, EnumIter, Display, Deserialize, Serialize, Clone, Copy, Debug,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Feature {
	Year,
	Month,
	TournamentCount,
	AvgBuyIn,
}

pub const FEATURE_COUNT: usize = 4;

impl Feature {
	pub fn index(self) -> usize {
		match self {
			Feature::Year => 0,
			Feature::Month => 1,
			Feature::TournamentCount => 2,
			Feature::AvgBuyIn => 3,
		}
	}
}

#[derive(Default, PartialEq, Deserialize, Serialize, Clone, Copy, Debug)]
pub struct Scaler {
	pub min: f64,
	pub max: f64,
}

impl Scaler {
	/// Min/max over `values`, or `None` when there is nothing to scan.
	pub fn fit(values: impl IntoIterator<Item = f64>) -> Option<Self> {
		values.into_iter().fold(None, |last, each| match last {
			None => Some(Scaler {
				min: each,
				max: each,
			}),
			Some(found) => Some(Scaler {
				min: found.min.min(each),
				max: found.max.max(each),
			}),
		})
	}

	/// A constant feature has nothing to spread over.
	pub fn is_degenerate(&self) -> bool {
		self.max == self.min
	}

	pub fn normalize(&self, value: f64) -> f64 {
		if self.is_degenerate() {
			return 0f64;
		}

		(value - self.min) / (self.max - self.min)
	}

	pub fn denormalize(&self, value: f64) -> f64 {
		value * (self.max - self.min) + self.min
	}
}

/// Per-feature min/max, fitted once per ingested dataset.
#[derive(Default, PartialEq, Serialize, Clone, Debug)]
pub struct ScalerRegistry {
	scalers: Option<[Scaler; FEATURE_COUNT]>,
}

impl ScalerRegistry {
	/// Replaces any previous state. An empty slice leaves the registry unfitted.
	pub fn fit(&mut self, records: &[DataPoint]) {
		let mut scalers = [Scaler::default(); FEATURE_COUNT];
		for feature in Feature::iter() {
			match Scaler::fit(records.iter().map(|each| each.feature(feature))) {
				Some(found) => scalers[feature.index()] = found,
				None => {
					self.scalers = None;
					return;
				}
			}
		}

		self.scalers = Some(scalers);
	}

	pub fn is_fitted(&self) -> bool {
		self.scalers.is_some()
	}

	pub fn scaler(&self, feature: Feature) -> Result<Scaler> {
		self.scalers
			.as_ref()
			.map(|scalers| scalers[feature.index()])
			.ok_or(PipelineError::ScalerNotInitialized)
	}

	pub fn normalize(&self, value: f64, feature: Feature) -> Result<f64> {
		Ok(self.scaler(feature)?.normalize(value))
	}

	pub fn denormalize(&self, value: f64, feature: Feature) -> Result<f64> {
		Ok(self.scaler(feature)?.denormalize(value))
	}

	pub fn normalize_record(&self, record: &DataPoint) -> Result<[f64; FEATURE_COUNT]> {
		let mut row = [0f64; FEATURE_COUNT];
		for feature in Feature::iter() {
			row[feature.index()] = self.normalize(record.feature(feature), feature)?;
		}

		Ok(row)
	}

	pub fn normalize_input(&self, input: &PredictionInput) -> Result<[f64; FEATURE_COUNT]> {
		let mut row = [0f64; FEATURE_COUNT];
		for feature in Feature::iter() {
			row[feature.index()] = self.normalize(input.feature(feature), feature)?;
		}

		Ok(row)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use approx::assert_relative_eq;
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

	fn fitted() -> ScalerRegistry {
		let mut registry = ScalerRegistry::default();
		registry.fit(&[
			point(2023, 1, 80f64, 10f64),
			point(2023, 6, 100f64, 22f64),
			point(2024, 12, 120f64, 55f64),
		]);
		registry
	}

	#[rstest]
	#[case(Feature::Year, 2023.5)]
	#[case(Feature::Month, 7f64)]
	#[case(Feature::TournamentCount, 93.25)]
	#[case(Feature::AvgBuyIn, 54.9)]
	#[case(Feature::AvgBuyIn, 300f64)]
	fn normalize_then_denormalize_is_identity(#[case] feature: Feature, #[case] value: f64) {
		let registry = fitted();
		let normalized = registry.normalize(value, feature).unwrap();
		let restored = registry.denormalize(normalized, feature).unwrap();

		assert_relative_eq!(restored, value, epsilon = 1e-9);
	}

	#[test]
	fn extremes_map_to_unit_interval() {
		let registry = fitted();

		assert_eq!(registry.normalize(80f64, Feature::TournamentCount).unwrap(), 0f64);
		assert_eq!(registry.normalize(120f64, Feature::TournamentCount).unwrap(), 1f64);
		assert_eq!(registry.normalize(2023f64, Feature::Year).unwrap(), 0f64);
	}

	#[test]
	fn degenerate_feature_normalizes_to_zero() {
		let mut registry = ScalerRegistry::default();
		registry.fit(&[point(2024, 1, 50f64, 5f64), point(2024, 2, 50f64, 7f64)]);

		let scaler = registry.scaler(Feature::Year).unwrap();
		assert!(scaler.is_degenerate());

		let normalized = registry.normalize(2024f64, Feature::Year).unwrap();
		assert_eq!(normalized, 0f64);
		assert!(!registry
			.normalize(2030f64, Feature::TournamentCount)
			.unwrap()
			.is_nan());
	}

	#[test]
	fn unfitted_registry_refuses_to_scale() {
		let registry = ScalerRegistry::default();

		assert!(matches!(
			registry.normalize(1f64, Feature::Month),
			Err(PipelineError::ScalerNotInitialized)
		));
		assert!(matches!(
			registry.denormalize(1f64, Feature::Month),
			Err(PipelineError::ScalerNotInitialized)
		));
	}

	#[test]
	fn refit_replaces_previous_bounds() {
		let mut registry = fitted();
		registry.fit(&[point(2020, 3, 1f64, 1f64), point(2021, 4, 2f64, 3f64)]);

		let scaler = registry.scaler(Feature::Year).unwrap();
		assert_eq!(scaler, Scaler { min: 2020f64, max: 2021f64 });

		registry.fit(&[]);
		assert!(!registry.is_fitted());
	}

	#[test]
	fn feature_names_follow_camel_case() {
		let names = Feature::iter().map(|each| each.to_string()).collect::<Vec<_>>();

		assert_eq!(names, ["year", "month", "tournamentCount", "avgBuyIn"]);
	}
}
