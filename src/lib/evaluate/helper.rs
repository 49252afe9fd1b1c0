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

use burn::tensor::backend::Backend;

use crate::scaler::FEATURE_COUNT;
use crate::train::helper::feature_tensor;
use crate::train::model::RoiRegressor;

use super::typedef::*;

/// Runs every sample through the model in one batch.
pub(super) fn predict_samples<B: Backend>(
	model: &RoiRegressor<B>,
	features: &[[f64; FEATURE_COUNT]],
	device: &B::Device,
) -> Vec<f64> {
	if features.is_empty() {
		return Vec::new();
	}

	let output = model.forward(feature_tensor::<B>(features, device));
	output.into_data().iter::<f64>().collect()
}

pub(super) fn r2_score(actual: &[f64], predicted: &[f64]) -> f64 {
	let mean = actual.iter().sum::<f64>() / actual.len() as f64;
	let sse = actual
		.iter()
		.zip(predicted)
		.fold(0f64, |last, (y, y_hat)| last + (y - y_hat).powi(2));
	let sst = actual
		.iter()
		.fold(0f64, |last, y| last + (y - mean).powi(2));

	if sst == 0f64 {
		return f64::NAN;
	}

	1f64 - sse / sst
}

pub(super) fn mean_absolute_error(actual: &[f64], predicted: &[f64]) -> f64 {
	if actual.is_empty() {
		return 0f64;
	}

	let total = actual
		.iter()
		.zip(predicted)
		.fold(0f64, |last, (y, y_hat)| last + (y - y_hat).abs());
	total / actual.len() as f64
}

/// Zero counts as non-negative.
pub(super) fn directional_accuracy(actual: &[f64], predicted: &[f64]) -> f64 {
	if actual.is_empty() {
		return 0f64;
	}

	let matched = actual
		.iter()
		.zip(predicted)
		.filter(|(y, y_hat)| (**y >= 0f64) == (**y_hat >= 0f64))
		.count();
	matched as f64 / actual.len() as f64
}

pub(super) fn evaluate_predictions(actual: &[f64], predicted: Vec<f64>) -> Evaluation {
	let metrics = ModelMetrics {
		r2_score: r2_score(actual, &predicted),
		mean_absolute_error: mean_absolute_error(actual, &predicted),
		directional_accuracy: directional_accuracy(actual, &predicted),
	};

	let scatter = actual
		.iter()
		.zip(&predicted)
		.map(|(real, predicted)| ScatterPoint {
			real: *real,
			predicted: *predicted,
		})
		.collect::<Vec<_>>();

	Evaluation {
		metrics,
		scatter,
		predictions: predicted,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use approx::assert_relative_eq;
	use pretty_assertions::assert_eq;

	#[test]
	fn direction_counts_matching_signs() {
		let accuracy = directional_accuracy(&[1f64, -1f64, 2f64], &[0.5, -0.5, -1f64]);

		assert_relative_eq!(accuracy, 2f64 / 3f64);
	}

	#[test]
	fn zero_is_treated_as_non_negative() {
		assert_eq!(directional_accuracy(&[0f64, -2f64], &[3f64, 0f64]), 0.5);
	}

	#[test]
	fn perfect_fit_scores_one() {
		let actual = [4f64, -2f64, 10f64, 1f64];

		assert_relative_eq!(r2_score(&actual, &actual), 1f64);
		assert_eq!(mean_absolute_error(&actual, &actual), 0f64);
	}

	#[test]
	fn constant_labels_report_nan() {
		assert!(r2_score(&[5f64, 5f64, 5f64], &[4f64, 5f64, 6f64]).is_nan());
	}

	#[test]
	fn mean_prediction_scores_zero() {
		let actual = [1f64, 2f64, 3f64];
		let evaluation = evaluate_predictions(&actual, vec![2f64; 3]);

		assert_relative_eq!(evaluation.metrics.r2_score, 0f64);
		assert_relative_eq!(evaluation.metrics.mean_absolute_error, 2f64 / 3f64);
		assert_eq!(
			evaluation.scatter,
			vec![
				ScatterPoint { real: 1f64, predicted: 2f64 },
				ScatterPoint { real: 2f64, predicted: 2f64 },
				ScatterPoint { real: 3f64, predicted: 2f64 },
			]
		);
	}
}
