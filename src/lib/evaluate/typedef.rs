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

#[derive(Default, PartialEq, Deserialize, Serialize, Clone, Copy, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ModelMetrics {
	/// `NaN` when every label is the same.
	pub r2_score: f64,
	pub mean_absolute_error: f64,
	/// Share of samples whose predicted sign matches the real one, in `[0, 1]`.
	pub directional_accuracy: f64,
}

#[derive(Default, PartialEq, Deserialize, Serialize, Clone, Copy, Debug)]
pub struct ScatterPoint {
	pub real: f64,
	pub predicted: f64,
}

/// Everything one checkpoint derives from the model.
#[derive(Default, Clone, Debug)]
pub(crate) struct Evaluation {
	pub metrics: ModelMetrics,
	pub scatter: Vec<ScatterPoint>,
	pub predictions: Vec<f64>,
}
