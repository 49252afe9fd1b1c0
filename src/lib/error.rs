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

use std::borrow::Cow;
use thiserror::Error;

use crate::typedef::ErrorInfo;

/// Everything the pipeline can refuse to do.
///
/// A degenerate scale (a feature whose min equals its max) is not an error:
/// the scaler maps it to a constant instead.
#[derive(Debug, Error)]
pub enum PipelineError {
	#[error("malformed record at data row {row}: {reason}")]
	MalformedInput { row: usize, reason: String },

	#[error("no data has been ingested yet")]
	NoDataIngested,

	#[error("the model has not been trained yet")]
	ModelNotTrained,

	#[error("scaler not initialized")]
	ScalerNotInitialized,

	#[error("invalid training configuration: {0}")]
	InvalidConfig(String),

	#[error("invalid prediction input: {0}")]
	InvalidInput(String),

	#[error("a training run is already in progress")]
	TrainingInProgress,

	#[error("unsupported file: {0}")]
	UnsupportedFile(String),

	#[error("session state inaccessible: {0}")]
	StateInaccessible(String),

	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	#[error("CSV error: {0}")]
	Csv(#[from] csv::Error),

	#[error("workbook error: {0}")]
	Workbook(#[from] calamine::Error),

	#[error("config error: {0}")]
	Config(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;

impl PipelineError {
	pub(crate) fn malformed(row: usize, reason: impl Into<String>) -> Self {
		PipelineError::MalformedInput {
			row,
			reason: reason.into(),
		}
	}

	/// Short dialog title a host can show above the message.
	pub fn title(&self) -> &'static str {
		match self {
			PipelineError::MalformedInput { .. } => "Malformed Record",
			PipelineError::NoDataIngested => "No Data Loaded",
			PipelineError::ModelNotTrained => "Model Not Trained",
			PipelineError::ScalerNotInitialized => "Scaler Not Initialized",
			PipelineError::InvalidConfig(_) => "Invalid Training Configuration",
			PipelineError::InvalidInput(_) => "Invalid Prediction Input",
			PipelineError::TrainingInProgress => "Training in Progress",
			PipelineError::UnsupportedFile(_) => "File Type Unsupported",
			PipelineError::StateInaccessible(_) => "State Inaccessible",
			PipelineError::Io(_) => "Cannot Access File",
			PipelineError::Csv(_) => "Failed to Read CSV File",
			PipelineError::Workbook(_) => "Failed to Read Workbook",
			PipelineError::Config(_) => "Cannot Load Configuration",
		}
	}
}

impl From<&PipelineError> for ErrorInfo {
	fn from(err: &PipelineError) -> Self {
		ErrorInfo {
			title: Cow::Borrowed(err.title()),
			message: err.to_string(),
		}
	}
}

impl From<burn::config::ConfigError> for PipelineError {
	fn from(err: burn::config::ConfigError) -> Self {
		PipelineError::Config(err.to_string())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn error_info_carries_title_and_message() {
		let err = PipelineError::malformed(3, "month 13 is out of range");
		let info = ErrorInfo::from(&err);

		assert_eq!(info.title, "Malformed Record");
		assert_eq!(
			info.message,
			"malformed record at data row 3: month 13 is out of range"
		);
	}
}
