use std::{path::PathBuf, process::ExitCode};

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use client_core::{
    config::{load_settings, load_settings_from},
    submit_label, ClientSettings, LifecycleController, PredictionClient, PredictionService,
    ResultView, SubmitRejected,
};
use shared::{
    domain::{FormField, OceanProximity},
    validation::{build_payload, ValidationErrors},
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "predictor", about = "California house price prediction client")]
struct Cli {
    /// Base URL of the prediction service; overrides settings file and env.
    #[arg(long, global = true)]
    server_url: Option<String>,
    /// Settings file to use instead of ./predictor.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check the features and print the request payload without sending it.
    Validate(FeatureArgs),
    /// Validate, send one prediction request and print the outcome.
    Predict(FeatureArgs),
    /// List the accepted fields and ocean proximity options.
    Options,
    /// Show what the prediction service reports about itself.
    Info,
}

#[derive(Args, Debug, Default)]
struct FeatureArgs {
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    longitude: String,
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    latitude: String,
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    housing_median_age: String,
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    total_rooms: String,
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    population: String,
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    households: String,
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    median_income: String,
    #[arg(long, default_value = "")]
    ocean_proximity: String,
}

impl FeatureArgs {
    fn apply(&self, controller: &mut LifecycleController) {
        let entries = [
            (FormField::Longitude, &self.longitude),
            (FormField::Latitude, &self.latitude),
            (FormField::HousingMedianAge, &self.housing_median_age),
            (FormField::TotalRooms, &self.total_rooms),
            (FormField::Population, &self.population),
            (FormField::Households, &self.households),
            (FormField::MedianIncome, &self.median_income),
            (FormField::OceanProximity, &self.ocean_proximity),
        ];
        for (field, value) in entries {
            controller.set_field(field, value.as_str());
        }
    }
}

fn resolve_settings(cli: &Cli) -> Result<ClientSettings> {
    let settings = match &cli.config {
        Some(path) => load_settings_from(path)?,
        None => load_settings()?,
    };
    let settings = match &cli.server_url {
        Some(url) => settings.with_server_url(url)?,
        None => settings,
    };
    tracing::debug!(
        server_url = %settings.server_url,
        timeout_secs = ?settings.request_timeout_secs,
        "resolved client settings"
    );
    Ok(settings)
}

fn print_errors(errors: &ValidationErrors) {
    eprintln!("Please fix the following fields:");
    for (field, message) in errors.iter() {
        eprintln!("  {field}: {message}");
    }
}

fn validate(features: &FeatureArgs) -> Result<ExitCode> {
    let mut controller = LifecycleController::new();
    features.apply(&mut controller);
    match build_payload(controller.state().values()) {
        Ok(payload) => {
            println!("{}", serde_json::to_string_pretty(&payload)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(errors) => {
            print_errors(&errors);
            Ok(ExitCode::from(2))
        }
    }
}

async fn predict(settings: &ClientSettings, features: &FeatureArgs) -> Result<ExitCode> {
    let client = PredictionClient::from_settings(settings)?;
    let mut controller = LifecycleController::new();
    features.apply(&mut controller);

    let ticket = match controller.begin_submit() {
        Ok(ticket) => ticket,
        Err(SubmitRejected::Invalid(errors)) => {
            print_errors(&errors);
            return Ok(ExitCode::from(2));
        }
        Err(rejected @ SubmitRejected::InFlight) => return Err(rejected.into()),
    };

    eprintln!(
        "{} ({})",
        submit_label(controller.state().in_flight()),
        client.server_url()
    );
    let outcome = client.predict(&ticket.request).await;
    controller.complete(ticket.generation, outcome);

    match ResultView::from_state(controller.state()) {
        ResultView::Error(message) => {
            eprintln!("Error: {message}");
            Ok(ExitCode::FAILURE)
        }
        ResultView::Predicted { display, .. } => {
            println!("Predicted price: {display}");
            println!("Estimated market price (USD)");
            Ok(ExitCode::SUCCESS)
        }
        ResultView::Empty => {
            println!("Enter features and run `predictor predict` to see the result.");
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn options() {
    println!("Fields:");
    for field in FormField::ALL {
        println!("  --{:<20} {}", field.name().replace('_', "-"), field.placeholder());
    }
    println!("Ocean proximity options:");
    for option in OceanProximity::ALL {
        println!("  {option}");
    }
}

async fn info(settings: &ClientSettings) -> Result<ExitCode> {
    let client = PredictionClient::from_settings(settings)?;
    let info = client.service_info().await?;
    println!("{}", info.message);
    if let Some(version) = info.version {
        println!("version {version}");
    }
    for (path, description) in &info.endpoints {
        println!("  {path:<10} {description}");
    }
    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    match &cli.command {
        Command::Validate(features) => validate(features),
        Command::Predict(features) => predict(&resolve_settings(&cli)?, features).await,
        Command::Options => {
            options();
            Ok(ExitCode::SUCCESS)
        }
        Command::Info => info(&resolve_settings(&cli)?).await,
    }
}
