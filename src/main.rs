mod calendar;
mod city;
mod duration_stats;
mod error;
mod filters;
mod loader;
mod mode;
mod records;
mod report;
mod station_stats;
mod time_stats;
mod user_stats;
mod utils;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use std::path::Path;

use error::AnalysisError;
use filters::FilterSpec;
use report::{AnalysisReport, timed, write_section};
use utils::write_json_file;

#[derive(Parser)]
struct Args {
    /// Directory holding the city trip logs
    #[clap(long, default_value = ".")]
    data_dir: String,
    /// Directory holding an optional cities.toml source catalog
    #[clap(long, default_value = "./config")]
    config_dir: String,
    /// chicago, new york city or washington
    #[clap(long)]
    city: String,
    /// all, or january to june
    #[clap(long, default_value = "all")]
    month: String,
    /// all, or monday to sunday
    #[clap(long, default_value = "all")]
    day: String,
    /// Number of raw record windows to print after the statistics
    #[clap(long, default_value_t = 0)]
    raw_pages: usize,
    #[clap(long, default_value_t = 5)]
    page_size: usize,
    /// Write the report as JSON into this directory
    #[clap(long)]
    output_directory: Option<String>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let catalog = city::read_catalog(Path::new(&args.config_dir))
        .with_context(|| format!("reading source catalog in {}", args.config_dir))?;
    let loader = loader::Loader::new(&args.data_dir, catalog);
    let (city, _) = loader.resolve(&args.city)?;
    let filter = FilterSpec::parse(&args.month, &args.day)?;
    info!("Analysing {city} ({filter}) from {}", loader.data_dir().display());

    let trips = timed("Loading trips", || loader.load(&args.city, &filter))
        .with_context(|| format!("loading {city} trips"))?;

    match AnalysisReport::compute(city, filter, &trips) {
        Ok(report) => {
            print!("{report}");
            if let Some(output_directory) = &args.output_directory {
                write_json_file(
                    format!("{}_report", city.slug()),
                    output_directory,
                    &report,
                )?;
            }
        }
        Err(AnalysisError::EmptySet(_)) => {
            warn!("No {city} trips match {filter}");
            let mut text = String::new();
            write_section(&mut text, "User Stats", &user_stats::user_stats(&trips))?;
            println!("No trips match the selected filters.");
            print!("{text}");
        }
        Err(err) => return Err(err.into()),
    }

    let mut cursor = trips.cursor(args.page_size);
    for _ in 0..args.raw_pages {
        let start = cursor.position();
        let Some(window) = cursor.next() else {
            println!("No more raw records.");
            break;
        };
        println!("\nRaw records {}..{}:", start, start + window.len());
        for trip in window {
            println!("{trip}");
        }
    }

    Ok(())
}
