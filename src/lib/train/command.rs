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

use burn::{module::AutodiffModule, optim::AdamConfig, tensor::backend::Backend};
use rand::{rngs::StdRng, SeedableRng};
use tracing::{debug, info, info_span, warn, Instrument};

use crate::error::{PipelineError, Result};
use crate::session::Session;
use crate::typedef::TrainBackend;

use super::helper::*;
use super::model::*;
use super::typedef::*;

impl Session {
	/// Fits a fresh model on the ingested dataset.
	///
	/// Yields to the runtime between epochs. A `cancel` token is honored at
	/// the same boundaries; a cancelled run keeps its history but installs no
	/// model.
	pub async fn train(
		&self,
		config: &TrainingConfig,
		cancel: Option<&CancelToken>,
	) -> Result<TrainReport> {
		config.validate()?;
		let _flight = self.begin_training()?;

		let seed = config.seed.unwrap_or_else(rand::random);
		let span = info_span!("train", seed, epochs = config.epoch_count);

		self.train_in_flight(config, cancel, seed)
			.instrument(span)
			.await
	}

	async fn train_in_flight(
		&self,
		config: &TrainingConfig,
		cancel: Option<&CancelToken>,
		seed: u64,
	) -> Result<TrainReport> {
		let (features, labels) = {
			let guarded_state = self.lock_state()?;
			match &guarded_state.dataset {
				Some(found) => (found.features.clone(), found.labels.clone()),
				None => return Err(PipelineError::NoDataIngested),
			}
		};

		let device = self.device().clone();
		TrainBackend::seed(seed);
		let mut rng = StdRng::seed_from_u64(seed);

		// A refused split leaves the previous model and its results alone
		let input = send_samples_to_device::<TrainBackend>(
			&features,
			&labels,
			config.validation_fraction,
			&device,
		)?;

		let time_series = {
			let mut guarded_state = self.lock_state()?;

			// The previous model never outlives a new run
			guarded_state.trained_model = None;
			guarded_state.history.clear();
			guarded_state.clear_evaluation();
			guarded_state.time_series.clone()
		};
		self.observers()?.emit_time_series(&time_series);

		info!(
			samples = features.len(),
			train = input.train_len(),
			"training started"
		);

		let mut model = RoiRegressorConfig::new().init::<TrainBackend>(&device);
		let mut optim = AdamConfig::new()
			.with_epsilon(1e-7)
			.init::<TrainBackend, RoiRegressor<TrainBackend>>();
		let mut outcome = TrainOutcome::Completed;

		for epoch_index in 0..config.epoch_count {
			if cancel.is_some_and(|found| found.is_cancelled()) {
				outcome = TrainOutcome::Cancelled;
				break;
			}

			let (next_model, train_loss) = run_epoch(model, &mut optim, &input, config, &mut rng);
			model = next_model;
			let validation_loss = validation_loss(&model, &input);

			let entry = TrainingHistoryEntry {
				epoch: epoch_index + 1,
				train_loss,
				validation_loss,
			};
			debug!(
				epoch = entry.epoch,
				train_loss = entry.train_loss,
				validation_loss = entry.validation_loss
			);

			let history = {
				let mut guarded_state = self.lock_state()?;
				guarded_state.history.push(entry);
				guarded_state.history.clone()
			};
			self.observers()?.emit_progress(&history);

			if is_checkpoint_epoch(epoch_index, config.epoch_count) {
				self.publish_evaluation(&model.valid(), &features, &labels)?;
			}

			tokio::task::yield_now().await;
		}

		// Release the device tensors before the model is installed
		drop(input);

		let history = self.history()?;
		if outcome == TrainOutcome::Cancelled {
			let time_series = {
				let mut guarded_state = self.lock_state()?;
				guarded_state.clear_evaluation();
				guarded_state.time_series.clone()
			};
			self.observers()?.emit_time_series(&time_series);

			warn!(epochs = history.len(), "training cancelled");
			return Ok(TrainReport {
				outcome,
				history,
				metrics: None,
				seed,
			});
		}

		let trained_model = model.valid();
		let metrics = self.publish_evaluation(&trained_model, &features, &labels)?;
		self.lock_state()?.trained_model = Some(trained_model);

		info!(
			r2 = metrics.r2_score,
			mae = metrics.mean_absolute_error,
			"training finished"
		);

		Ok(TrainReport {
			outcome,
			history,
			metrics: Some(metrics),
			seed,
		})
	}
}
