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

use burn::backend::{Autodiff, NdArray};
use serde::Serialize;
use std::borrow::Cow;

use crate::data::typedef::{Dataset, TimeSeriesPoint};
use crate::evaluate::typedef::{ModelMetrics, ScatterPoint};
use crate::train::model::RoiRegressor;
use crate::train::typedef::TrainingHistoryEntry;

pub type TrainBackend = Autodiff<NdArray>;
pub type InferBackend = NdArray;

/// What a host shows the user when an operation is refused.
#[derive(Default, Serialize, Clone, Debug)]
pub struct ErrorInfo {
	pub title: Cow<'static, str>,
	pub message: String,
}

#[derive(Default)]
pub(crate) struct SessionState {
	pub dataset: Option<Dataset>,
	pub time_series: Vec<TimeSeriesPoint>,
	pub history: Vec<TrainingHistoryEntry>,
	pub metrics: Option<ModelMetrics>,
	pub scatter: Vec<ScatterPoint>,
	pub trained_model: Option<RoiRegressor<InferBackend>>,
}

impl SessionState {
	/// Drops everything derived from a model run, keeping the dataset.
	pub fn clear_evaluation(&mut self) {
		self.metrics = None;
		self.scatter.clear();
		self.time_series
			.iter_mut()
			.for_each(|each| each.predicted_roi = None);
	}
}
