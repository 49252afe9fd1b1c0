#![recursion_limit = "256"]

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

//! Monthly poker results in, ROI forecasts out.
//!
//! A [`Session`] owns everything: ingest a CSV or workbook, train the
//! regressor, then predict single months or whole forecasts.

mod error;
mod event;
mod session;
mod typedef;

pub mod data;
pub mod evaluate;
pub mod predict;
pub mod scaler;
pub mod train;

pub use error::{PipelineError, Result};
pub use event::{
	MetricsListener, ProgressListener, ScatterListener, TimeSeriesListener, DIALOG_ERROR, METRICS,
	PROGRESS, SCATTER, TIME_SERIES,
};
pub use session::Session;
pub use typedef::{ErrorInfo, InferBackend, TrainBackend};

pub use data::typedef::{DataPoint, DataSummary, Dataset, FeatureSummary, TimeSeriesPoint};
pub use evaluate::typedef::{ModelMetrics, ScatterPoint};
pub use predict::typedef::{
	FuturePrediction, PredictionInput, DEFAULT_FORECAST_MONTHS, FORECAST_MONTHS_RANGE,
};
pub use scaler::{Feature, Scaler, ScalerRegistry, FEATURE_COUNT};
pub use train::model::{RoiRegressor, RoiRegressorConfig};
pub use train::typedef::{CancelToken, TrainOutcome, TrainReport, TrainingConfig, TrainingHistoryEntry};
