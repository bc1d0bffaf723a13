use std::path::PathBuf;

use clap::Args;
use comfy_table::{Table, presets::UTF8_FULL};
use cyclable_core::pairs::{PairSelectionParams, select_pairs};
use tracing::info;

use crate::file_utils::read_points;

#[derive(Args)]
pub struct PairsArgs {
    /// JSON file holding the list of points
    #[arg(short, long)]
    input: PathBuf,

    #[arg(short, long, default_value_t = 4)]
    neighbors: usize,

    /// Same-name points closer than this are skipped (meters)
    #[arg(long, default_value_t = 1_000.0)]
    duplicate_radius: f64,
}

/// Lists the itineraries `compute` would request, without routing anything.
pub fn run(args: PairsArgs) -> Result<(), anyhow::Error> {
    let points = read_points(&args.input)?;

    let pairs = select_pairs(
        &points,
        &PairSelectionParams {
            max_neighbors: args.neighbors,
            duplicate_radius_meters: args.duplicate_radius,
        },
    );
    info!("{} pairs for {} points", pairs.len(), points.len());

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Slot", "From", "To", "Distance (m)", "Backbone"]);

    for pair in &pairs {
        table.add_row(vec![
            pair.schedule_index().to_string(),
            pair.origin.name().unwrap_or(pair.origin.id.as_str()).to_string(),
            pair.destination
                .name()
                .unwrap_or(pair.destination.id.as_str())
                .to_string(),
            format!("{:.0}", pair.origin.haversine_distance(pair.destination)),
            if pair.is_backbone() { "yes" } else { "no" }.to_string(),
        ]);
    }

    println!("{table}");

    Ok(())
}
