//! # cropcast-cli
//!
//! Command-line interface for the cropcast forecasting core.

use chrono::{Days, Local, NaiveDate};
use clap::{Parser, Subcommand};
use cropcast_core::prelude::*;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type CliResult<T> = std::result::Result<T, String>;

#[derive(Parser)]
#[command(name = "cropcast")]
#[command(about = "Crop weather and market forecasting CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Forecast weather for a region from its synthetic history
    Weather {
        /// Region name (e.g. Punjab, Kerala)
        #[arg(short, long)]
        region: String,

        /// Length of the generated history in days
        #[arg(short, long, default_value = "60")]
        days: usize,

        /// Output file (optional, stdout otherwise)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Forecast market demand and prices for crops in a region
    Market {
        /// Region name
        #[arg(short, long)]
        region: String,

        /// Comma-separated crop names (e.g. Rice,Wheat,Corn)
        #[arg(short, long)]
        crops: String,

        /// Length of the generated history in days
        #[arg(short, long, default_value = "90")]
        days: usize,

        /// Output file (optional)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run the forecast pipeline on a series loaded from a file
    Series {
        /// Input file (CSV or JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Number of steps to forecast
        #[arg(long, default_value = "7")]
        horizon: usize,

        /// Seasonal period assumed by the fallback model
        #[arg(long, default_value = "7")]
        season_length: usize,

        /// Column name or index for series values (default: first column)
        #[arg(short, long)]
        column: Option<String>,

        /// Output file (optional)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Load time series data from a CSV file
fn load_csv_data(path: &PathBuf, column: Option<&str>) -> CliResult<Vec<f64>> {
    let file = File::open(path).map_err(|e| format!("Failed to open file: {}", e))?;
    let mut reader = csv::Reader::from_reader(BufReader::new(file));

    let headers = reader
        .headers()
        .map_err(|e| format!("Failed to read headers: {}", e))?
        .clone();

    let col_idx = if let Some(col) = column {
        if let Ok(idx) = col.parse::<usize>() {
            idx
        } else {
            headers
                .iter()
                .position(|h| h == col)
                .ok_or_else(|| format!("Column '{}' not found", col))?
        }
    } else {
        0
    };

    let mut data = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| format!("Failed to read record: {}", e))?;
        if let Some(value) = record.get(col_idx) {
            if let Ok(num) = value.trim().parse::<f64>() {
                data.push(num);
            }
        }
    }

    if data.is_empty() {
        return Err("No numeric data found in the specified column".to_string());
    }

    Ok(data)
}

/// Load time series data from a JSON file
fn load_json_data(path: &PathBuf, column: Option<&str>) -> CliResult<Vec<f64>> {
    let file = File::open(path).map_err(|e| format!("Failed to open file: {}", e))?;
    let reader = BufReader::new(file);
    let json: serde_json::Value =
        serde_json::from_reader(reader).map_err(|e| format!("Failed to parse JSON: {}", e))?;

    // Handle array of numbers
    if let Some(arr) = json.as_array() {
        if arr.iter().all(|v| v.is_number()) {
            return Ok(arr.iter().filter_map(|v| v.as_f64()).collect());
        }

        // Handle array of objects
        if let Some(col) = column {
            let data: Vec<f64> = arr
                .iter()
                .filter_map(|obj| obj.get(col).and_then(|v| v.as_f64()))
                .collect();
            if !data.is_empty() {
                return Ok(data);
            }
        }

        // Try common value keys
        for key in &["value", "values", "data", "y"] {
            let data: Vec<f64> = arr
                .iter()
                .filter_map(|obj| obj.get(*key).and_then(|v| v.as_f64()))
                .collect();
            if !data.is_empty() {
                return Ok(data);
            }
        }
    }

    // Handle object with data array
    if let Some(obj) = json.as_object() {
        for key in &["data", "values", "series", "y"] {
            if let Some(arr) = obj.get(*key).and_then(|v| v.as_array()) {
                let data: Vec<f64> = arr.iter().filter_map(|v| v.as_f64()).collect();
                if !data.is_empty() {
                    return Ok(data);
                }
            }
        }
    }

    Err("Could not extract numeric data from JSON".to_string())
}

/// Load data from file (auto-detect format)
fn load_data(path: &PathBuf, column: Option<&str>) -> CliResult<Vec<f64>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "csv" => load_csv_data(path, column),
        "json" => load_json_data(path, column),
        _ => load_csv_data(path, column).or_else(|_| load_json_data(path, column)),
    }
}

/// Write a JSON result to file or stdout
fn write_results(json: &serde_json::Value, output: Option<&PathBuf>) -> CliResult<()> {
    if let Some(path) = output {
        let mut file =
            File::create(path).map_err(|e| format!("Failed to create output: {}", e))?;
        serde_json::to_writer_pretty(&mut file, json)
            .map_err(|e| format!("Failed to write JSON: {}", e))?;
        println!("Results written to {:?}", path);
    } else {
        println!(
            "{}",
            serde_json::to_string_pretty(json).map_err(|e| e.to_string())?
        );
    }

    Ok(())
}

/// ISO date for a forecast day offset
fn outlook_date(today: NaiveDate, day: u32) -> String {
    today
        .checked_add_days(Days::new(day as u64))
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn run_weather(region: String, days: usize, output: Option<PathBuf>) -> CliResult<()> {
    let outlook = predict_weather(&region, days).map_err(|e| e.to_string())?;
    let today = Local::now().date_naive();

    println!(
        "Weather outlook for {}: {}°C, {}% humidity, {} mm rainfall ({})",
        outlook.region,
        outlook.temperature,
        outlook.humidity,
        outlook.rainfall,
        outlook.temperature_trend
    );

    let json = serde_json::json!({
        "region": outlook.region,
        "temperature": outlook.temperature,
        "humidity": outlook.humidity,
        "rainfall": outlook.rainfall,
        "temperature_trend": outlook.temperature_trend,
        "forecast": outlook.outlook.iter().map(|d| serde_json::json!({
            "date": outlook_date(today, d.day),
            "temperature": d.temperature,
            "rainfall": d.rainfall,
        })).collect::<Vec<_>>(),
    });

    write_results(&json, output.as_ref())
}

fn run_market(
    region: String,
    crops: String,
    days: usize,
    output: Option<PathBuf>,
) -> CliResult<()> {
    let crop_list: Vec<String> = crops
        .split(',')
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect();

    let outlooks = predict_market(&crop_list, &region, days).map_err(|e| e.to_string())?;

    for outlook in &outlooks {
        println!(
            "{}: price {:.2}, {} demand, {} trend",
            outlook.crop, outlook.price, outlook.demand, outlook.trend
        );
    }

    let json = serde_json::to_value(&outlooks).map_err(|e| e.to_string())?;
    write_results(&json, output.as_ref())
}

fn run_series(
    input: PathBuf,
    horizon: usize,
    season_length: usize,
    column: Option<String>,
    output: Option<PathBuf>,
) -> CliResult<()> {
    let data = load_data(&input, column.as_deref())?;
    println!(
        "Loaded {} data points from {:?}",
        data.len(),
        input.file_name().unwrap_or_default()
    );

    let config = DomainConfig::generic(horizon).with_season_length(season_length);
    let forecast = forecast_series(&data, config).map_err(|e| e.to_string())?;

    println!("Model: {}", forecast.model);
    println!("Trend: {}", forecast.trend);
    for (i, value) in forecast.values.iter().enumerate() {
        println!("  Step {}: {:.4}", i + 1, value);
    }

    let json = serde_json::json!({
        "model": forecast.model,
        "representative": forecast.representative,
        "trend": forecast.trend,
        "forecasts": forecast.values,
        "steps": forecast.values.len(),
    });

    write_results(&json, output.as_ref())
}

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cropcast_core=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Weather {
            region,
            days,
            output,
        } => run_weather(region, days, output),

        Commands::Market {
            region,
            crops,
            days,
            output,
        } => run_market(region, crops, days, output),

        Commands::Series {
            input,
            horizon,
            season_length,
            column,
            output,
        } => run_series(input, horizon, season_length, column, output),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
