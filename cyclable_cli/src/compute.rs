use std::{path::PathBuf, time::Duration};

use clap::Args;
use comfy_table::{Table, presets::UTF8_FULL};
use cyclable_brouter::{
    cache::FileCache,
    client::{BRouterClient, BRouterClientParams, BRouterProfile},
};
use cyclable_core::{
    fetch::{ItineraryProvider, Pacing},
    pairs::PairSelectionParams,
    pipeline::{Pipeline, PipelineParams, PipelineResult},
    point::Point,
    ride::DEFAULT_COORDINATE_SCALE,
};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::{
    file_utils::{read_points, write_result},
    parsers,
};

#[derive(Args)]
pub struct ComputeArgs {
    /// JSON file holding the list of points
    #[arg(short, long)]
    input: PathBuf,

    /// Output file, stdout when absent
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Neighbors requested for every point
    #[arg(short, long, default_value_t = 4)]
    neighbors: usize,

    /// Itineraries fetched at the same time
    #[arg(short, long, default_value_t = 4)]
    concurrency: usize,

    /// Start request N after N times this delay instead of bounding
    /// concurrency (e.g., "200ms", "1s")
    #[arg(long, value_parser = parsers::parse_duration)]
    stagger: Option<Duration>,

    /// Overrides BROUTER_URL
    #[arg(long)]
    brouter_url: Option<String>,

    /// Overrides BROUTER_PROFILE
    #[arg(short, long)]
    profile: Option<BRouterProfile>,

    /// Divisor of the integer coordinates of the routing table
    #[arg(long, default_value_t = DEFAULT_COORDINATE_SCALE)]
    scale: f64,

    /// Same-name points closer than this are skipped (meters)
    #[arg(long, default_value_t = 1_000.0)]
    duplicate_radius: f64,
}

impl ComputeArgs {
    fn client_params(&self) -> BRouterClientParams {
        let mut params = BRouterClientParams::from_env();

        if let Some(base_url) = &self.brouter_url {
            params.base_url = base_url.clone();
        }
        if let Some(profile) = &self.profile {
            params.profile = profile.clone();
        }

        params
    }

    fn pipeline_params(&self) -> PipelineParams {
        PipelineParams {
            pair_selection: PairSelectionParams {
                max_neighbors: self.neighbors,
                duplicate_radius_meters: self.duplicate_radius,
            },
            pacing: match self.stagger {
                Some(base_delay) => Pacing::Staggered { base_delay },
                None => Pacing::Concurrent {
                    permits: self.concurrency,
                },
            },
            coordinate_scale: self.scale,
        }
    }
}

async fn run_pipeline<P>(
    provider: P,
    params: PipelineParams,
    points: Vec<Point>,
) -> Result<PipelineResult, anyhow::Error>
where
    P: ItineraryProvider,
{
    let pipeline = Pipeline::new(provider, params);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner} {msg} ({elapsed})")?);
    spinner.set_message("Fetching itineraries");
    spinner.enable_steady_tick(Duration::from_millis(120));

    let result = pipeline.run(points).await;
    spinner.finish_and_clear();

    Ok(result?)
}

fn summary(result: &PipelineResult) -> Table {
    let statistics = &result.statistics;
    let mut table = Table::new();

    table.load_preset(UTF8_FULL).set_header(vec!["", "Value"]);
    table.add_row(vec!["Points".to_string(), result.points.len().to_string()]);
    table.add_row(vec!["Pairs".to_string(), statistics.pairs.to_string()]);
    table.add_row(vec!["Rides".to_string(), statistics.rides.to_string()]);
    table.add_row(vec![
        "Rejected (ferry)".to_string(),
        statistics.rejected_rides.to_string(),
    ]);
    table.add_row(vec!["Segments".to_string(), statistics.segments.to_string()]);
    table.add_row(vec![
        "Missed boundaries".to_string(),
        statistics.missed_boundaries.to_string(),
    ]);
    table.add_row(vec![
        "Safe distance".to_string(),
        result
            .score
            .map_or_else(|| "n/a".to_string(), |score| format!("{score:.1}%")),
    ]);

    table
}

pub async fn run(args: ComputeArgs) -> Result<(), anyhow::Error> {
    let points = read_points(&args.input)?;
    info!("Loaded {} points from {:?}", points.len(), args.input);

    let client_params = args.client_params();
    let params = args.pipeline_params();
    info!(
        "Routing with {} ({})",
        client_params.base_url, client_params.profile
    );

    let result = match FileCache::from_env()? {
        Some(cache) => {
            info!("Caching itineraries in {:?}", cache.folder());
            run_pipeline(BRouterClient::with_cache(client_params, cache), params, points).await?
        }
        None => run_pipeline(BRouterClient::new(client_params), params, points).await?,
    };

    eprintln!("{}", summary(&result));

    write_result(args.output.as_deref(), &result)?;

    Ok(())
}
