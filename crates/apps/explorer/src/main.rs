//! Headless explorer drive.
//!
//! Loads the requested benchmark tasks through the edge proxy, applies a
//! viewport and zoom the way the browser viewer would, and reports the
//! resolved visible sets and overlay operations. Useful for smoke-checking
//! a data deployment without a browser in the loop.

mod fetch;
mod trace_surface;

use std::process::ExitCode;

use catalog::modality::Modality;
use catalog::task::{TaskId, TaskRegistry};
use clap::Parser;
use foundation::geo::GeoBounds;
use futures_util::future::join_all;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use viewer::controller::Controller;
use viewer::events::InputEvent;

use crate::fetch::DataClient;
use crate::trace_surface::TraceSurface;

#[derive(Debug, Parser)]
#[command(name = "explorer", about = "Headless drive for the benchmark tile viewer")]
struct Args {
    /// Base URL of the data proxy.
    #[arg(long, env = "EXPLORER_BASE_URL", default_value = "http://127.0.0.1:9400")]
    base_url: String,

    /// Task ids to load; defaults to every task in the registry.
    #[arg(long = "task")]
    tasks: Vec<String>,

    /// Viewport as `south,west,north,east` degrees.
    #[arg(long, default_value = "-60,-180,75,180", value_parser = parse_bounds)]
    viewport: GeoBounds,

    /// Zoom level to inspect at.
    #[arg(long, default_value_t = 8.0)]
    zoom: f64,

    /// Modality to select (solid, Sentinel2, ESA_Worldcover, Aster_DEM,
    /// Cloud_Mask).
    #[arg(long, default_value = "solid")]
    modality: String,
}

fn parse_bounds(raw: &str) -> Result<GeoBounds, String> {
    let parts: Vec<f64> = raw
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .map_err(|e| format!("viewport must be four numbers: {e}"))?;
    let [south, west, north, east] = parts.as_slice() else {
        return Err("viewport must be south,west,north,east".to_string());
    };
    Ok(GeoBounds::new(*south, *west, *north, *east))
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            warn!("{message}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), String> {
    let registry = TaskRegistry::standard();

    let task_ids: Vec<TaskId> = if args.tasks.is_empty() {
        registry.iter().map(|spec| spec.id.clone()).collect()
    } else {
        let mut ids = Vec::new();
        for raw in &args.tasks {
            let id = TaskId::new(raw.clone());
            if registry.get(&id).is_none() {
                return Err(format!("unknown task {raw}"));
            }
            ids.push(id);
        }
        ids
    };

    let modality = Modality::from_name(&args.modality)
        .ok_or_else(|| format!("unknown modality {}", args.modality))?;

    let client = DataClient::new(args.base_url.clone());

    // Per-task loads are independent; issue them together.
    let loads = join_all(
        task_ids
            .iter()
            .map(|id| async { (id.clone(), client.load_task(id).await) }),
    )
    .await;

    let mut controller = Controller::new(
        TraceSurface::default(),
        registry,
        args.base_url,
        args.viewport,
        args.zoom,
    );

    let mut loaded = 0usize;
    for (id, result) in loads {
        match result {
            Ok((index, split)) => {
                info!(task = %id, tiles = index.len(), has_splits = split.is_some(), "task loaded");
                controller.install_task(id, index, split);
                loaded += 1;
            }
            Err(err) => {
                // The task stays unregistered; in the browser its checkbox
                // would revert and the user could re-toggle to retry.
                warn!(task = %id, %err, "task failed to load");
            }
        }
    }
    if loaded == 0 {
        return Err("no task loaded".to_string());
    }

    if !modality.is_solid() {
        controller.handle(InputEvent::ModalitySelected(modality));
    }

    // The species task additionally carries the selector's label listing.
    if task_ids.iter().any(|id| id.as_str() == "species") {
        match client.species_labels().await {
            Ok(labels) => info!(labels = labels.len(), "species labels loaded"),
            Err(err) => warn!(%err, "species labels failed to load"),
        }
    }

    for id in &task_ids {
        if let Some(visible) = controller.visible_set(id) {
            info!(task = %id, visible = visible.len(), "visible set resolved");
        }
    }
    info!(
        boundaries = controller.surface().live_boundaries(),
        rasters = controller.surface().live_rasters(),
        zoom = controller.zoom(),
        "overlays live"
    );

    Ok(())
}
