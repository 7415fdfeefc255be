use std::{fs::File, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing::info;
use waypost_optimizer::{
    TravelMode, problem::point::Point, route_optimizer::RouteOptimizer,
};

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// JSON file with the stops to order:
    /// [{"latitude": .., "longitude": .., "label": ".."}, ..]
    input: PathBuf,

    /// Travel mode: DRIVING, WALKING, BICYCLING or TRANSIT
    #[arg(short, long, default_value = "DRIVING")]
    mode: String,

    /// Return to the first stop at the end
    #[arg(short, long)]
    round_trip: bool,

    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    dotenvy::dotenv().ok();

    let mode: TravelMode = cli.mode.parse()?;
    let file = File::open(&cli.input)
        .with_context(|| format!("cannot open {}", cli.input.display()))?;
    let points: Vec<Point> = serde_json::from_reader(file)
        .with_context(|| format!("cannot parse stops from {}", cli.input.display()))?;

    let optimizer = RouteOptimizer::from_env()?;
    let result = optimizer.optimize(&points, mode, cli.round_trip).await?;

    let mut table = comfy_table::Table::new();
    table.set_header(["#", "label", "latitude", "longitude"]);
    for (i, point) in result.ordered_points.iter().enumerate() {
        table.add_row([
            i.to_string(),
            point.label.clone(),
            point.latitude.to_string(),
            point.longitude.to_string(),
        ]);
    }
    println!("{table}");

    info!(
        total_distance_m = result.total_distance,
        total_duration_s = result.total_duration,
        "route ordered"
    );

    Ok(())
}
