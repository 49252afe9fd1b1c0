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

use burn::tensor::{backend::AutodiffBackend, Tensor};
use serde::{Deserialize, Serialize};
use std::{
	ops::RangeInclusive,
	sync::{
		atomic::{AtomicBool, Ordering},
		Arc,
	},
};

use crate::error::PipelineError;
use crate::evaluate::typedef::ModelMetrics;

pub const EPOCH_COUNT_RANGE: RangeInclusive<usize> = 10..=1000;
pub const BATCH_SIZE_RANGE: RangeInclusive<usize> = 8..=128;
pub const LEARNING_RATE_RANGE: RangeInclusive<f64> = 0.0001..=0.1;
pub const VALIDATION_FRACTION_RANGE: RangeInclusive<f64> = 0.1..=0.5;

/// Metrics are recomputed every this many epochs.
pub const CHECKPOINT_INTERVAL: usize = 5;

#[derive(burn::config::Config, Debug)]
pub struct TrainingConfig {
	#[config(default = 150)]
	pub epoch_count: usize,

	#[config(default = 32)]
	pub batch_size: usize,

	#[config(default = 1e-3)]
	pub learning_rate: f64,

	/// Trailing share of the chronological samples held out for validation.
	#[config(default = 0.2)]
	pub validation_fraction: f64,

	/// Fixes weight init, dropout and batch order. Drawn at random when absent.
	pub seed: Option<u64>,
}

impl TrainingConfig {
	pub fn validate(&self) -> crate::error::Result<()> {
		if !EPOCH_COUNT_RANGE.contains(&self.epoch_count) {
			return Err(PipelineError::InvalidConfig(format!(
				"epoch count {} is outside {:?}",
				self.epoch_count, EPOCH_COUNT_RANGE
			)));
		}

		if !BATCH_SIZE_RANGE.contains(&self.batch_size) {
			return Err(PipelineError::InvalidConfig(format!(
				"batch size {} is outside {:?}",
				self.batch_size, BATCH_SIZE_RANGE
			)));
		}

		if !LEARNING_RATE_RANGE.contains(&self.learning_rate) {
			return Err(PipelineError::InvalidConfig(format!(
				"learning rate {} is outside {:?}",
				self.learning_rate, LEARNING_RATE_RANGE
			)));
		}

		if !VALIDATION_FRACTION_RANGE.contains(&self.validation_fraction) {
			return Err(PipelineError::InvalidConfig(format!(
				"validation fraction {} is outside {:?}",
				self.validation_fraction, VALIDATION_FRACTION_RANGE
			)));
		}

		Ok(())
	}
}

#[derive(Default, PartialEq, Deserialize, Serialize, Clone, Copy, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TrainingHistoryEntry {
	/// 1-based.
	pub epoch: usize,
	pub train_loss: f64,
	pub validation_loss: f64,
}

#[derive(PartialEq, Eq, Serialize, Clone, Copy, Debug)]
#[serde(rename_all = "camelCase")]
pub enum TrainOutcome {
	Completed,
	Cancelled,
}

#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TrainReport {
	pub outcome: TrainOutcome,
	pub history: Vec<TrainingHistoryEntry>,
	pub metrics: Option<ModelMetrics>,
	pub seed: u64,
}

/// Asks a running training loop to stop at the next epoch boundary.
#[derive(Default, Clone, Debug)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn cancel(&self) {
		self.0.store(true, Ordering::Release);
	}

	pub fn is_cancelled(&self) -> bool {
		self.0.load(Ordering::Acquire)
	}
}

pub(super) struct TrainInput<B: AutodiffBackend> {
	pub train_tensor: Tensor<B, 2>,
	pub train_target_tensor: Tensor<B, 2>,
	pub valid_tensor: Option<Tensor<B::InnerBackend, 2>>,
	pub valid_target_tensor: Option<Tensor<B::InnerBackend, 2>>,
}

impl<B: AutodiffBackend> TrainInput<B> {
	pub fn train_len(&self) -> usize {
		self.train_tensor.dims()[0]
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[test]
	fn defaults_are_in_range() {
		let config = TrainingConfig::new();

		assert_eq!(config.epoch_count, 150);
		assert_eq!(config.batch_size, 32);
		assert_eq!(config.seed, None);
		assert!(config.validate().is_ok());
	}

	#[rstest]
	#[case(TrainingConfig::new().with_epoch_count(9))]
	#[case(TrainingConfig::new().with_epoch_count(1001))]
	#[case(TrainingConfig::new().with_batch_size(4))]
	#[case(TrainingConfig::new().with_learning_rate(0.5))]
	#[case(TrainingConfig::new().with_validation_fraction(0.05))]
	#[case(TrainingConfig::new().with_validation_fraction(0.75))]
	fn out_of_range_config_is_rejected(#[case] config: TrainingConfig) {
		assert!(matches!(
			config.validate(),
			Err(PipelineError::InvalidConfig(_))
		));
	}

	#[test]
	fn config_round_trips_through_file() {
		use burn::config::Config;

		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("training.json");
		let config = TrainingConfig::new()
			.with_epoch_count(40)
			.with_seed(Some(7));
		config.save(&path).unwrap();

		let restored = TrainingConfig::load(&path).unwrap();
		assert_eq!(restored.epoch_count, 40);
		assert_eq!(restored.seed, Some(7));
	}

	#[test]
	fn cancel_is_shared_between_clones() {
		let token = CancelToken::new();
		let cloned = token.clone();

		cloned.cancel();
		assert!(token.is_cancelled());
	}
}
