use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::{Duration, Local, NaiveDate};
use clap::{Parser, Subcommand};
use tracing::debug;

use skycast::{
    ComparisonOutcome, ComparisonRequest, ComparisonService, SkyCastConfig, chart, logging, report,
};

/// Compare historical daily maximum temperatures between two cities
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about)]
struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compare two cities over a date range
    Compare {
        #[arg(long, default_value = "London")]
        city_a: String,

        #[arg(long, default_value = "New York")]
        city_b: String,

        /// First day (YYYY-MM-DD), defaults to 30 days before --end
        #[arg(long)]
        start: Option<NaiveDate>,

        /// Last day (YYYY-MM-DD), defaults to today and may not be later
        #[arg(long)]
        end: Option<NaiveDate>,

        /// Also write an SVG line chart to this path
        #[arg(long)]
        chart: Option<PathBuf>,
    },
    /// Resolve a city name and print its coordinates
    Geocode { name: String },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = SkyCastConfig::load_from_path(cli.config.clone())
        .with_context(|| "Failed to load configuration")?;
    logging::init(&config.logging, cli.verbose)?;
    debug!("Loaded configuration: {:?}", config);

    let service = ComparisonService::from_config(&config)?;

    match cli.command {
        Command::Compare {
            city_a,
            city_b,
            start,
            end,
            chart: chart_path,
        } => {
            let today = Local::now().date_naive();
            let end = end.unwrap_or(today);
            if end > today {
                eprintln!("error: End date {end} is in the future; the archive ends at {today}.");
                return Ok(ExitCode::FAILURE);
            }
            let start = start.unwrap_or(end - Duration::days(30));
            let request = ComparisonRequest::new(city_a, city_b, start, end);

            match service.compare(&request).await {
                ComparisonOutcome::Ready(comparison) => {
                    print!("{}", report::format_comparison(&comparison));
                    if let Some(path) = chart_path {
                        chart::write_svg(&comparison.table, &path, (1200, 675))?;
                        println!("\nChart written to {}", path.display());
                    }
                    Ok(ExitCode::SUCCESS)
                }
                outcome => {
                    for error in outcome.failures() {
                        let prefix = if error.is_warning() { "warning" } else { "error" };
                        eprintln!("{prefix}: {}", error.user_message());
                    }
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Command::Geocode { name } => match service.resolver().resolve(&name).await {
            Ok(place) => {
                println!("{} ({})", place.display_name(), place.format_coordinates());
                if let Some(tz) = &place.timezone {
                    println!("timezone: {tz}");
                }
                Ok(ExitCode::SUCCESS)
            }
            Err(e) => {
                eprintln!("error: {}", e.user_message());
                Ok(ExitCode::FAILURE)
            }
        },
    }
}
