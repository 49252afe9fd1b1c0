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

use std::{fs::File, path::Path};
use tracing::{info, warn};

use crate::data::helper::{month_label, recent_records};
use crate::error::{PipelineError, Result};
use crate::scaler::FEATURE_COUNT;
use crate::session::Session;
use crate::train::helper::feature_tensor;
use crate::typedef::InferBackend;

use super::helper::*;
use super::typedef::*;

impl Session {
	/// ROI in percent for one month of play.
	pub fn predict(&self, input: &PredictionInput) -> Result<f64> {
		if self.is_training() {
			return Err(PipelineError::TrainingInProgress);
		}

		let (model, row) = {
			let guarded_state = self.lock_state()?;
			let model = match &guarded_state.trained_model {
				Some(found) => found.clone(),
				None => return Err(PipelineError::ModelNotTrained),
			};
			input.validate()?;

			let row = match &guarded_state.dataset {
				Some(found) => found.scalers.normalize_input(input)?,
				None => return Err(PipelineError::ScalerNotInitialized),
			};

			(model, row)
		};

		let rows: [[f64; FEATURE_COUNT]; 1] = [row];
		let output = model.forward(feature_tensor::<InferBackend>(&rows, self.device()));
		match output.into_data().iter::<f64>().next() {
			Some(found) => Ok(found),
			None => Err(PipelineError::ModelNotTrained),
		}
	}

	/// Predicts `month_count` consecutive months starting at `start`.
	///
	/// Activity is held at the starting values. The first month that cannot
	/// be predicted ends the forecast, and whatever was predicted so far is
	/// returned.
	pub fn predict_future_periods(
		&self,
		start: &PredictionInput,
		month_count: usize,
	) -> Result<Vec<FuturePrediction>> {
		if !FORECAST_MONTHS_RANGE.contains(&month_count) {
			return Err(PipelineError::InvalidInput(format!(
				"forecast length {} is outside {:?}",
				month_count, FORECAST_MONTHS_RANGE
			)));
		}

		let mut predictions = Vec::<FuturePrediction>::with_capacity(month_count);
		let mut input = *start;
		for _ in 0..month_count {
			let roi = match self.predict(&input) {
				Ok(ok) => ok,
				Err(err) => {
					warn!(
						month = %month_label(input.year, input.month),
						predicted = predictions.len(),
						"forecast stopped early: {}",
						err
					);
					break;
				}
			};

			predictions.push(FuturePrediction {
				month_label: month_label(input.year, input.month),
				roi,
			});

			match next_month(input.year, input.month) {
				Some((year, month)) => {
					input.year = year;
					input.month = month;
				}
				None => break,
			}
		}

		info!(months = predictions.len(), "forecast ready");
		Ok(predictions)
	}

	/// A starting point for forecasts, derived from the latest records.
	pub fn default_prediction_input(&self) -> Result<PredictionInput> {
		let guarded_state = self.lock_state()?;
		let dataset = match &guarded_state.dataset {
			Some(found) => found,
			None => return Err(PipelineError::NoDataIngested),
		};

		let recent = recent_records(&dataset.records, RECENT_WINDOW);
		default_input_from(&recent).ok_or(PipelineError::NoDataIngested)
	}

	pub fn export_forecast<P: AsRef<Path>>(
		&self,
		path: P,
		predictions: &[FuturePrediction],
	) -> Result<()> {
		let file = File::create(path.as_ref())?;
		write_forecast(file, predictions)?;

		info!(
			path = %path.as_ref().display(),
			months = predictions.len(),
			"forecast exported"
		);
		Ok(())
	}
}
