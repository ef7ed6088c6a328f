//! Predict a vehicle's region of origin from its cylinder count and model
//! year with one logistic-regression model per region.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use vehicle_origin::{Config, Error, pipeline};

#[derive(Parser, Debug)]
#[command(name = "vehicle-origin")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "One-versus-rest logistic regression of vehicle origin")]
struct Cli {
    /// TOML file with run settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// CSV file with at least origin, cylinders and year columns
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Seed for the train/holdout shuffle
    #[arg(short, long)]
    seed: Option<u64>,

    /// Share of rows used for training
    #[arg(long)]
    train_fraction: Option<f64>,

    /// Rows shown for each printed table
    #[arg(long)]
    head_rows: Option<usize>,
}

impl Cli {
    fn into_config(self) -> Result<Config, Error> {
        let mut config = match &self.config {
            Some(path) => Config::from_toml_file(path)?,
            None => Config::default(),
        };
        if let Some(data) = self.data {
            config.data_path = data;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(train_fraction) = self.train_fraction {
            config.train_fraction = train_fraction;
        }
        if let Some(head_rows) = self.head_rows {
            config.head_rows = head_rows;
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vehicle_origin=info".into()),
        )
        .init();

    let result = Cli::parse()
        .into_config()
        .and_then(|config| pipeline::run(&config, &mut std::io::stdout().lock()));

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", err);
            if err.is_load_error() {
                ExitCode::from(1)
            } else {
                tracing::error!(error = %err, "run aborted");
                ExitCode::from(2)
            }
        }
    }
}
