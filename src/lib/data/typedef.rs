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

use crate::scaler::{Feature, ScalerRegistry, FEATURE_COUNT};

/// One observed month of results.
#[derive(Default, PartialEq, Deserialize, Serialize, Clone, Copy, Debug)]
#[serde(rename_all = "camelCase")]
pub struct DataPoint {
	pub year: i32,
	pub month: u32,
	pub tournament_count: f64,
	pub avg_buy_in: f64,
	pub roi: f64,
}

impl DataPoint {
	pub fn feature(&self, feature: Feature) -> f64 {
		match feature {
			Feature::Year => self.year as f64,
			Feature::Month => self.month as f64,
			Feature::TournamentCount => self.tournament_count,
			Feature::AvgBuyIn => self.avg_buy_in,
		}
	}

	pub fn month_label(&self) -> String {
		super::helper::month_label(self.year, self.month)
	}
}

#[derive(Default, PartialEq, Serialize, Clone, Copy, Debug)]
pub struct FeatureSummary {
	pub min: f64,
	pub max: f64,
	pub mean: f64,
}

#[derive(Default, PartialEq, Serialize, Clone, Copy, Debug)]
#[serde(rename_all = "camelCase")]
pub struct DataSummary {
	pub tournament_count: FeatureSummary,
	pub avg_buy_in: FeatureSummary,
	pub roi: FeatureSummary,
	/// Sum of tournament count times buy-in over every month.
	pub total_volume: f64,
	pub month_count: usize,
}

#[derive(Default, PartialEq, Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesPoint {
	#[serde(rename = "month")]
	pub month_label: String,
	pub year: i32,
	#[serde(rename = "realROI")]
	pub real_roi: f64,
	#[serde(rename = "predictedROI", skip_serializing_if = "Option::is_none")]
	pub predicted_roi: Option<f64>,
}

/// Everything one ingestion produces. Replaced as a whole, never patched.
#[derive(Default, Clone, Debug)]
pub struct Dataset {
	pub player_name: Option<String>,
	/// Ascending by (year, month).
	pub records: Vec<DataPoint>,
	/// Normalized model inputs, index-aligned with `records`.
	pub features: Vec<[f64; FEATURE_COUNT]>,
	/// Raw ROI, index-aligned with `records`.
	pub labels: Vec<f64>,
	pub scalers: ScalerRegistry,
	pub summary: DataSummary,
}

impl Dataset {
	pub fn len(&self) -> usize {
		self.records.len()
	}

	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}
}

/// A parsed row before the dataset is assembled.
#[derive(Clone, Debug)]
pub(crate) struct ParsedRow {
	pub player_name: String,
	pub point: DataPoint,
}
