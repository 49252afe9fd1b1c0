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

use anyhow::{Context, Result};
use burn::config::Config;
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use roi_forecaster_lib::*;

/// Train an ROI regressor on monthly results and forecast the months ahead.
#[derive(Parser, Debug)]
#[command(name = "roi-forecaster", version, about)]
struct Cli {
	/// Monthly results as CSV, XLSX, XLS, XLSB or ODS
	data: PathBuf,

	/// Training configuration JSON, as written by `--save-config`
	#[arg(long)]
	config: Option<PathBuf>,

	/// Writes the effective training configuration here
	#[arg(long)]
	save_config: Option<PathBuf>,

	#[arg(long)]
	epochs: Option<usize>,

	#[arg(long)]
	seed: Option<u64>,

	/// Months to forecast
	#[arg(long, default_value_t = DEFAULT_FORECAST_MONTHS)]
	months: usize,

	/// Writes the forecast as CSV
	#[arg(long, short)]
	output: Option<PathBuf>,

	/// Only print the final report
	#[arg(long)]
	quiet: bool,
}

#[derive(Serialize)]
struct EventLine<'a, T: Serialize + ?Sized> {
	event: &'a str,
	payload: &'a T,
}

fn print_event<T: Serialize + ?Sized>(event: &str, payload: &T) {
	match serde_json::to_string(&EventLine { event, payload }) {
		Ok(line) => println!("{}", line),
		Err(err) => tracing::warn!("cannot serialize {} event: {}", event, err),
	}
}

fn subscribe(session: &Session) -> roi_forecaster_lib::Result<()> {
	// Progress carries the whole history, print only the newest epoch
	session.on_progress(|history| {
		if let Some(latest) = history.last() {
			print_event(PROGRESS, latest);
		}
	})?;
	session.on_metrics(|metrics| print_event(METRICS, metrics))?;
	session.on_scatter(|scatter| print_event(SCATTER, scatter))?;
	session.on_time_series(|time_series| print_event(TIME_SERIES, time_series))?;
	Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FinalReport {
	player_name: Option<String>,
	summary: Option<DataSummary>,
	training: TrainReport,
	start: PredictionInput,
	forecast: Vec<FuturePrediction>,
}

async fn run(cli: &Cli, session: &Session) -> roi_forecaster_lib::Result<FinalReport> {
	let mut config = match &cli.config {
		Some(path) => TrainingConfig::load(path)?,
		None => TrainingConfig::new(),
	};
	if let Some(epochs) = cli.epochs {
		config.epoch_count = epochs;
	}
	if cli.seed.is_some() {
		config.seed = cli.seed;
	}
	if let Some(path) = &cli.save_config {
		config.save(path)?;
	}

	if !cli.quiet {
		subscribe(session)?;
	}

	session.load_data(&cli.data)?;
	let training = session.train(&config, None).await?;

	let start = session.default_prediction_input()?;
	let forecast = session.predict_future_periods(&start, cli.months)?;
	if forecast.is_empty() {
		tracing::warn!(
			year = start.year,
			month = start.month,
			"forecast starts off the prediction surface"
		);
	}
	if let Some(path) = &cli.output {
		session.export_forecast(path, &forecast)?;
	}

	Ok(FinalReport {
		player_name: session.player_name()?,
		summary: session.summary()?,
		training,
		start,
		forecast,
	})
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
	tracing_subscriber::registry()
		.with(fmt::layer().with_writer(std::io::stderr))
		.with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.init();

	let cli = Cli::parse();
	let session = Session::new();

	info!(data = %cli.data.display(), "roi-forecaster starting");

	let report = match run(&cli, &session).await {
		Ok(ok) => ok,
		Err(err) => {
			print_event(DIALOG_ERROR, &ErrorInfo::from(&err));
			return Err(err).context("pipeline failed");
		}
	};

	println!(
		"{}",
		serde_json::to_string_pretty(&report).context("cannot serialize the final report")?
	);
	Ok(())
}
