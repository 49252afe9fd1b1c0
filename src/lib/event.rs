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

use tracing::trace;

use crate::data::typedef::TimeSeriesPoint;
use crate::evaluate::typedef::{ModelMetrics, ScatterPoint};
use crate::train::typedef::TrainingHistoryEntry;

pub const PROGRESS: &'static str = "progress";
pub const METRICS: &'static str = "metrics";
pub const SCATTER: &'static str = "scatter";
pub const TIME_SERIES: &'static str = "time-series";
pub const DIALOG_ERROR: &'static str = "dialog-error";

pub type ProgressListener = Box<dyn Fn(&[TrainingHistoryEntry]) + Send + Sync>;
pub type MetricsListener = Box<dyn Fn(&ModelMetrics) + Send + Sync>;
pub type ScatterListener = Box<dyn Fn(&[ScatterPoint]) + Send + Sync>;
pub type TimeSeriesListener = Box<dyn Fn(&[TimeSeriesPoint]) + Send + Sync>;

/// Listeners registered on one session. Every emit hands over a full snapshot.
#[derive(Default)]
pub(crate) struct Observers {
	progress: Vec<ProgressListener>,
	metrics: Vec<MetricsListener>,
	scatter: Vec<ScatterListener>,
	time_series: Vec<TimeSeriesListener>,
}

impl Observers {
	pub fn add_progress(&mut self, listener: ProgressListener) {
		self.progress.push(listener);
	}

	pub fn add_metrics(&mut self, listener: MetricsListener) {
		self.metrics.push(listener);
	}

	pub fn add_scatter(&mut self, listener: ScatterListener) {
		self.scatter.push(listener);
	}

	pub fn add_time_series(&mut self, listener: TimeSeriesListener) {
		self.time_series.push(listener);
	}

	pub fn emit_progress(&self, history: &[TrainingHistoryEntry]) {
		trace!(event = PROGRESS, epochs = history.len());
		self.progress.iter().for_each(|listener| listener(history));
	}

	pub fn emit_metrics(&self, metrics: &ModelMetrics) {
		trace!(event = METRICS);
		self.metrics.iter().for_each(|listener| listener(metrics));
	}

	pub fn emit_scatter(&self, scatter: &[ScatterPoint]) {
		trace!(event = SCATTER, points = scatter.len());
		self.scatter.iter().for_each(|listener| listener(scatter));
	}

	pub fn emit_time_series(&self, time_series: &[TimeSeriesPoint]) {
		trace!(event = TIME_SERIES, points = time_series.len());
		self.time_series
			.iter()
			.for_each(|listener| listener(time_series));
	}
}
