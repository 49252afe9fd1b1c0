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
	nn::{
		BatchNorm, BatchNormConfig, Dropout, DropoutConfig, Initializer, Linear, LinearConfig,
		Relu,
	},
	prelude::*,
};

use crate::scaler::FEATURE_COUNT;

/// Four normalized features in, one ROI out.
#[derive(Module, Debug)]
pub struct RoiRegressor<B: Backend> {
	input: Linear<B>,
	norm: BatchNorm<B, 0>,
	input_dropout: Dropout,
	hidden: Linear<B>,
	hidden_dropout: Dropout,
	bottleneck: Linear<B>,
	output: Linear<B>,
	activation: Relu,
}

#[derive(Config, Debug)]
pub struct RoiRegressorConfig {
	#[config(default = 64)]
	pub input_size: usize,
	#[config(default = 32)]
	pub hidden_size: usize,
	#[config(default = 16)]
	pub bottleneck_size: usize,
	#[config(default = 0.3)]
	pub input_dropout: f64,
	#[config(default = 0.2)]
	pub hidden_dropout: f64,
	#[config(default = 0.01)]
	pub norm_momentum: f64,
}

impl RoiRegressorConfig {
	pub fn init<B: Backend>(&self, device: &B::Device) -> RoiRegressor<B> {
		// He-normal for every ReLU layer
		let he_normal = Initializer::KaimingNormal {
			gain: 2f64.sqrt(),
			fan_out_only: false,
		};

		RoiRegressor {
			input: LinearConfig::new(FEATURE_COUNT, self.input_size)
				.with_initializer(he_normal.clone())
				.init(device),
			norm: BatchNormConfig::new(self.input_size)
				.with_momentum(self.norm_momentum)
				.init(device),
			input_dropout: DropoutConfig::new(self.input_dropout).init(),
			hidden: LinearConfig::new(self.input_size, self.hidden_size)
				.with_initializer(he_normal.clone())
				.init(device),
			hidden_dropout: DropoutConfig::new(self.hidden_dropout).init(),
			bottleneck: LinearConfig::new(self.hidden_size, self.bottleneck_size)
				.with_initializer(he_normal)
				.init(device),
			output: LinearConfig::new(self.bottleneck_size, 1)
				.with_initializer(Initializer::XavierUniform { gain: 1f64 })
				.init(device),
			activation: Relu::new(),
		}
	}
}

impl<B: Backend> RoiRegressor<B> {
	/// # Shapes
	///
	/// - input: `[batch_size, 4]`
	/// - output: `[batch_size, 1]`
	pub fn forward(&self, input: Tensor<B, 2>) -> Tensor<B, 2> {
		let x = self.activation.forward(self.input.forward(input));
		let x = self.input_dropout.forward(self.norm.forward(x));
		let x = self.activation.forward(self.hidden.forward(x));
		let x = self.hidden_dropout.forward(x);
		let x = self.activation.forward(self.bottleneck.forward(x));

		self.output.forward(x)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use burn::backend::{ndarray::NdArrayDevice, NdArray};

	#[test]
	fn forward_maps_each_row_to_one_value() {
		let device = NdArrayDevice::Cpu;
		let model = RoiRegressorConfig::new().init::<NdArray>(&device);
		let input = Tensor::<NdArray, 2>::zeros([5, FEATURE_COUNT], &device);

		let output = model.forward(input);

		assert_eq!(output.dims(), [5, 1]);
	}

	#[test]
	fn config_survives_json() {
		let config = RoiRegressorConfig::new().with_hidden_size(48);
		let restored: RoiRegressorConfig =
			serde_json::from_str(&serde_json::to_string(&config).unwrap()).unwrap();

		assert_eq!(restored.hidden_size, 48);
		assert_eq!(restored.input_size, 64);
	}
}
