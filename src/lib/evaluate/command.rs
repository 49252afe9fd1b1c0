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

use tracing::{debug, info};

use crate::error::{PipelineError, Result};
use crate::scaler::FEATURE_COUNT;
use crate::session::Session;
use crate::train::model::RoiRegressor;
use crate::typedef::InferBackend;

use super::helper::*;
use super::typedef::*;

impl Session {
	/// Re-scores the installed model against the current dataset.
	pub fn evaluate(&self) -> Result<ModelMetrics> {
		if self.is_training() {
			return Err(PipelineError::TrainingInProgress);
		}

		let (model, features, labels) = {
			let guarded_state = self.lock_state()?;
			let dataset = match &guarded_state.dataset {
				Some(found) => found,
				None => return Err(PipelineError::NoDataIngested),
			};
			let model = match &guarded_state.trained_model {
				Some(found) => found.clone(),
				None => return Err(PipelineError::ModelNotTrained),
			};

			(model, dataset.features.clone(), dataset.labels.clone())
		};

		let metrics = self.publish_evaluation(&model, &features, &labels)?;
		info!(
			r2 = metrics.r2_score,
			mae = metrics.mean_absolute_error,
			"model evaluated"
		);

		Ok(metrics)
	}

	/// Stores a checkpoint and notifies metrics, scatter and time-series
	/// listeners, in that order.
	pub(crate) fn publish_evaluation(
		&self,
		model: &RoiRegressor<InferBackend>,
		features: &[[f64; FEATURE_COUNT]],
		labels: &[f64],
	) -> Result<ModelMetrics> {
		let predicted = predict_samples(model, features, self.device());
		let evaluation = evaluate_predictions(labels, predicted);
		debug!(
			r2 = evaluation.metrics.r2_score,
			mae = evaluation.metrics.mean_absolute_error,
			direction = evaluation.metrics.directional_accuracy,
			"checkpoint"
		);

		let time_series = {
			let mut guarded_state = self.lock_state()?;
			guarded_state.metrics = Some(evaluation.metrics);
			guarded_state.scatter = evaluation.scatter.clone();
			guarded_state
				.time_series
				.iter_mut()
				.zip(&evaluation.predictions)
				.for_each(|(each, predicted)| each.predicted_roi = Some(*predicted));
			guarded_state.time_series.clone()
		};

		let observers = self.observers()?;
		observers.emit_metrics(&evaluation.metrics);
		observers.emit_scatter(&evaluation.scatter);
		observers.emit_time_series(&time_series);

		Ok(evaluation.metrics)
	}
}
