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

use burn::backend::ndarray::NdArrayDevice;
use std::sync::{
	atomic::{AtomicBool, Ordering},
	Mutex, MutexGuard, RwLock, RwLockReadGuard,
};
use tracing::info;

use crate::data::typedef::{DataPoint, DataSummary, TimeSeriesPoint};
use crate::error::{PipelineError, Result};
use crate::evaluate::typedef::{ModelMetrics, ScatterPoint};
use crate::event::Observers;
use crate::scaler::ScalerRegistry;
use crate::train::typedef::TrainingHistoryEntry;
use crate::typedef::SessionState;

/// One user's pipeline: ingest, train, evaluate, forecast.
///
/// All mutable state sits behind a single mutex. Listeners are called after
/// the lock is released, so they may query the session freely.
pub struct Session {
	state: Mutex<SessionState>,
	observers: RwLock<Observers>,
	training: AtomicBool,
	device: NdArrayDevice,
}

impl std::fmt::Debug for Session {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Session").finish_non_exhaustive()
	}
}

impl Default for Session {
	fn default() -> Self {
		Self::new()
	}
}

impl Session {
	pub fn new() -> Self {
		Self {
			state: Mutex::new(SessionState::default()),
			observers: RwLock::new(Observers::default()),
			training: AtomicBool::new(false),
			device: NdArrayDevice::Cpu,
		}
	}

	/// Drops the dataset, the model and every cached result. Listeners stay.
	pub fn restart(&self) -> Result<()> {
		let mut guarded_state = self.lock_state()?;
		if self.is_training() {
			return Err(PipelineError::TrainingInProgress);
		}

		*guarded_state = Default::default();
		info!("session restarted");
		Ok(())
	}

	/// Listeners run with the registry read-locked, after the state lock is
	/// released. They may read session state, but subscribing from inside a
	/// listener deadlocks.
	pub fn on_progress(
		&self,
		listener: impl Fn(&[TrainingHistoryEntry]) + Send + Sync + 'static,
	) -> Result<()> {
		self.observers_mut()?.add_progress(Box::new(listener));
		Ok(())
	}

	/// Same locking rules as [`Session::on_progress`].
	pub fn on_metrics(&self, listener: impl Fn(&ModelMetrics) + Send + Sync + 'static) -> Result<()> {
		self.observers_mut()?.add_metrics(Box::new(listener));
		Ok(())
	}

	/// Same locking rules as [`Session::on_progress`].
	pub fn on_scatter(&self, listener: impl Fn(&[ScatterPoint]) + Send + Sync + 'static) -> Result<()> {
		self.observers_mut()?.add_scatter(Box::new(listener));
		Ok(())
	}

	/// Same locking rules as [`Session::on_progress`].
	pub fn on_time_series(
		&self,
		listener: impl Fn(&[TimeSeriesPoint]) + Send + Sync + 'static,
	) -> Result<()> {
		self.observers_mut()?.add_time_series(Box::new(listener));
		Ok(())
	}

	pub fn history(&self) -> Result<Vec<TrainingHistoryEntry>> {
		Ok(self.lock_state()?.history.clone())
	}

	pub fn metrics(&self) -> Result<Option<ModelMetrics>> {
		Ok(self.lock_state()?.metrics)
	}

	pub fn scatter(&self) -> Result<Vec<ScatterPoint>> {
		Ok(self.lock_state()?.scatter.clone())
	}

	pub fn time_series(&self) -> Result<Vec<TimeSeriesPoint>> {
		Ok(self.lock_state()?.time_series.clone())
	}

	pub fn records(&self) -> Result<Vec<DataPoint>> {
		let guarded_state = self.lock_state()?;
		Ok(guarded_state
			.dataset
			.as_ref()
			.map(|found| found.records.clone())
			.unwrap_or_default())
	}

	pub fn summary(&self) -> Result<Option<DataSummary>> {
		let guarded_state = self.lock_state()?;
		Ok(guarded_state.dataset.as_ref().map(|found| found.summary))
	}

	pub fn scalers(&self) -> Result<ScalerRegistry> {
		let guarded_state = self.lock_state()?;
		Ok(guarded_state
			.dataset
			.as_ref()
			.map(|found| found.scalers.clone())
			.unwrap_or_default())
	}

	pub fn player_name(&self) -> Result<Option<String>> {
		let guarded_state = self.lock_state()?;
		Ok(guarded_state
			.dataset
			.as_ref()
			.and_then(|found| found.player_name.clone()))
	}

	pub fn is_model_trained(&self) -> Result<bool> {
		Ok(self.lock_state()?.trained_model.is_some())
	}

	pub fn is_training(&self) -> bool {
		self.training.load(Ordering::Acquire)
	}

	pub(crate) fn device(&self) -> &NdArrayDevice {
		&self.device
	}

	pub(crate) fn lock_state(&self) -> Result<MutexGuard<'_, SessionState>> {
		match self.state.lock() {
			Ok(ok) => Ok(ok),
			Err(err) => Err(PipelineError::StateInaccessible(err.to_string())),
		}
	}

	pub(crate) fn observers(&self) -> Result<RwLockReadGuard<'_, Observers>> {
		match self.observers.read() {
			Ok(ok) => Ok(ok),
			Err(err) => Err(PipelineError::StateInaccessible(err.to_string())),
		}
	}

	fn observers_mut(&self) -> Result<std::sync::RwLockWriteGuard<'_, Observers>> {
		match self.observers.write() {
			Ok(ok) => Ok(ok),
			Err(err) => Err(PipelineError::StateInaccessible(err.to_string())),
		}
	}

	/// Claims the single training slot until the returned guard drops.
	pub(crate) fn begin_training(&self) -> Result<TrainingFlight<'_>> {
		match self
			.training
			.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
		{
			Ok(_) => Ok(TrainingFlight {
				training: &self.training,
			}),
			Err(_) => Err(PipelineError::TrainingInProgress),
		}
	}
}

pub(crate) struct TrainingFlight<'a> {
	training: &'a AtomicBool,
}

impl Drop for TrainingFlight<'_> {
	fn drop(&mut self) {
		self.training.store(false, Ordering::Release);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn second_flight_is_refused_until_first_lands() {
		let session = Session::new();

		let flight = session.begin_training().unwrap();
		assert!(session.is_training());
		assert!(matches!(
			session.begin_training(),
			Err(PipelineError::TrainingInProgress)
		));

		drop(flight);
		assert!(!session.is_training());
		assert!(session.begin_training().is_ok());
	}

	#[test]
	fn fresh_session_is_empty() {
		let session = Session::default();

		assert!(session.records().unwrap().is_empty());
		assert!(session.summary().unwrap().is_none());
		assert!(!session.scalers().unwrap().is_fitted());
		assert!(!session.is_model_trained().unwrap());
		assert!(session.history().unwrap().is_empty());
	}

	#[test]
	fn restart_is_refused_mid_training() {
		let session = Session::new();
		let _flight = session.begin_training().unwrap();

		assert!(matches!(
			session.restart(),
			Err(PipelineError::TrainingInProgress)
		));
	}
}
