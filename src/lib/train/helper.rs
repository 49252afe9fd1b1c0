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

use burn::{
	module::AutodiffModule,
	nn::loss::{MseLoss, Reduction::Mean},
	optim::{GradientsParams, Optimizer},
	tensor::{
		backend::{AutodiffBackend, Backend},
		ElementConversion, Int, Tensor, TensorData,
	},
};
use rand::{rngs::StdRng, seq::SliceRandom};

use crate::error::{PipelineError, Result};
use crate::scaler::FEATURE_COUNT;

use super::model::*;
use super::typedef::*;

pub(crate) fn feature_tensor<B: Backend>(
	features: &[[f64; FEATURE_COUNT]],
	device: &B::Device,
) -> Tensor<B, 2> {
	let flatten = features.iter().flatten().copied().collect::<Vec<_>>();
	Tensor::from_data(TensorData::new(flatten, [features.len(), FEATURE_COUNT]), device)
}

pub(crate) fn label_tensor<B: Backend>(labels: &[f64], device: &B::Device) -> Tensor<B, 2> {
	Tensor::from_data(TensorData::new(labels.to_vec(), [labels.len(), 1]), device)
}

/// Index of the first validation sample. Everything before it trains.
pub(super) fn split_index(sample_count: usize, validation_fraction: f64) -> usize {
	((sample_count as f64) * (1f64 - validation_fraction)).floor() as usize
}

pub(super) fn send_samples_to_device<B: AutodiffBackend>(
	features: &[[f64; FEATURE_COUNT]],
	labels: &[f64],
	validation_fraction: f64,
	device: &B::Device,
) -> Result<TrainInput<B>> {
	let split_at = split_index(features.len(), validation_fraction);
	if split_at == 0 {
		return Err(PipelineError::InvalidConfig(format!(
			"a validation fraction of {} leaves none of the {} samples for training",
			validation_fraction,
			features.len()
		)));
	}

	// Chronological split, the newest months validate
	let (train_features, valid_features) = features.split_at(split_at);
	let (train_labels, valid_labels) = labels.split_at(split_at);

	let (valid_tensor, valid_target_tensor) = match valid_features.is_empty() {
		true => (None, None),
		false => (
			Some(feature_tensor::<B::InnerBackend>(valid_features, device)),
			Some(label_tensor::<B::InnerBackend>(valid_labels, device)),
		),
	};

	Ok(TrainInput {
		train_tensor: feature_tensor(train_features, device),
		train_target_tensor: label_tensor(train_labels, device),
		valid_tensor,
		valid_target_tensor,
	})
}

pub(super) fn is_checkpoint_epoch(epoch_index: usize, epoch_count: usize) -> bool {
	epoch_index % CHECKPOINT_INTERVAL == 0 || epoch_index + 1 == epoch_count
}

/// One pass over the shuffled training part. Returns the updated model and the
/// sample-weighted mean of the mini-batch losses.
pub(super) fn run_epoch<B, O>(
	mut model: RoiRegressor<B>,
	optim: &mut O,
	input: &TrainInput<B>,
	config: &TrainingConfig,
	rng: &mut StdRng,
) -> (RoiRegressor<B>, f64)
where
	B: AutodiffBackend,
	O: Optimizer<RoiRegressor<B>, B>,
{
	let sample_count = input.train_len();
	let device = input.train_tensor.device();

	let mut order = (0..sample_count as i64).collect::<Vec<_>>();
	order.shuffle(rng);

	let mut weighted_loss = 0f64;
	for each_batch in order.chunks(config.batch_size) {
		let indices = Tensor::<B, 1, Int>::from_data(
			TensorData::new(each_batch.to_vec(), [each_batch.len()]),
			&device,
		);
		let batch = input.train_tensor.clone().select(0, indices.clone());
		let targets = input.train_target_tensor.clone().select(0, indices);

		let output = model.forward(batch);
		let loss = MseLoss::new().forward(output, targets, Mean);
		weighted_loss += loss.clone().into_scalar().elem::<f64>() * each_batch.len() as f64;

		// Gradients for the current backward pass
		let grads = loss.backward();
		// Gradients linked to each parameter of the model
		let grads = GradientsParams::from_grads(grads, &model);
		model = optim.step(config.learning_rate, model, grads);
	}

	(model, weighted_loss / sample_count as f64)
}

/// MSE over the held-out months, zero when nothing was held out.
pub(super) fn validation_loss<B: AutodiffBackend>(
	model: &RoiRegressor<B>,
	input: &TrainInput<B>,
) -> f64 {
	let (Some(valid_tensor), Some(valid_target_tensor)) =
		(&input.valid_tensor, &input.valid_target_tensor)
	else {
		return 0f64;
	};

	let output = model.valid().forward(valid_tensor.clone());
	MseLoss::new()
		.forward(output, valid_target_tensor.clone(), Mean)
		.into_scalar()
		.elem::<f64>()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::typedef::TrainBackend;
	use burn::{backend::ndarray::NdArrayDevice, optim::AdamConfig};
	use rand::SeedableRng;
	use rstest::rstest;

	fn samples(count: usize) -> (Vec<[f64; FEATURE_COUNT]>, Vec<f64>) {
		let features = (0..count)
			.map(|i| {
				let x = i as f64 / count as f64;
				[x, 1f64 - x, x * 0.5, 0.25]
			})
			.collect::<Vec<_>>();
		let labels = (0..count).map(|i| i as f64 - 3f64).collect::<Vec<_>>();
		(features, labels)
	}

	#[rstest]
	#[case(10, 0.2, 8)]
	#[case(12, 0.2, 9)]
	#[case(3, 0.5, 1)]
	#[case(1, 0.2, 0)]
	fn split_leaves_the_tail_for_validation(
		#[case] sample_count: usize,
		#[case] validation_fraction: f64,
		#[case] expected: usize,
	) {
		assert_eq!(split_index(sample_count, validation_fraction), expected);
	}

	#[test]
	fn checkpoints_every_fifth_epoch_and_the_last() {
		let checkpoints = (0..12)
			.filter(|each| is_checkpoint_epoch(*each, 12))
			.map(|each| each + 1)
			.collect::<Vec<_>>();

		assert_eq!(checkpoints, [1, 6, 11, 12]);
	}

	#[test]
	fn single_sample_cannot_be_split() {
		let (features, labels) = samples(1);
		let result = send_samples_to_device::<TrainBackend>(
			&features,
			&labels,
			0.2,
			&NdArrayDevice::Cpu,
		);

		assert!(matches!(result, Err(PipelineError::InvalidConfig(_))));
	}

	#[test]
	fn epoch_reports_finite_loss() {
		let device = NdArrayDevice::Cpu;
		let (features, labels) = samples(20);
		let input =
			send_samples_to_device::<TrainBackend>(&features, &labels, 0.2, &device).unwrap();
		assert_eq!(input.train_len(), 16);

		let config = TrainingConfig::new().with_batch_size(8);
		let model = RoiRegressorConfig::new().init::<TrainBackend>(&device);
		let mut optim = AdamConfig::new()
			.with_epsilon(1e-7)
			.init::<TrainBackend, RoiRegressor<TrainBackend>>();
		let mut rng = StdRng::seed_from_u64(11);

		let (model, train_loss) = run_epoch(model, &mut optim, &input, &config, &mut rng);
		let valid_loss = validation_loss(&model, &input);

		assert!(train_loss.is_finite());
		assert!(train_loss >= 0f64);
		assert!(valid_loss.is_finite());
	}
}
