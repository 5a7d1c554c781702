//! Headless survey walk - drives the world core without a renderer
//!
//! Moves an observer in a fixed spiral, injects a synthetic authoritative
//! feed on a fixed cadence, auto-resolves anything that comes into reach,
//! and logs event counts. Useful for eyeballing chunk churn and
//! reconciliation behavior from a terminal.

use clap::Parser;

use drift_survey::anomaly::feed::FeedAnomaly;
use drift_survey::core::config::WorldConfig;
use drift_survey::core::types::Vec2;
use drift_survey::events::WorldEvent;
use drift_survey::world::WorldState;

#[derive(Parser, Debug)]
#[command(name = "survey_sim", about = "Headless drift-survey walk")]
struct Args {
    /// World seed
    #[arg(long, default_value = "abc")]
    seed: String,

    /// Number of ticks to simulate
    #[arg(long, default_value_t = 600)]
    ticks: u64,

    /// Observer speed in world units per tick
    #[arg(long, default_value_t = 40.0)]
    speed: f32,

    /// Ticks between synthetic feed snapshots
    #[arg(long, default_value_t = 150)]
    feed_interval: u64,

    /// Optional TOML config file overriding the defaults
    #[arg(long)]
    config: Option<std::path::PathBuf>,
}

/// Synthetic feed: two anomalies orbiting the observer's current chunk,
/// cycling IDs so earlier ones get confirmed resolved by later snapshots
fn synthetic_feed(generation: u64, observer: Vec2) -> Vec<FeedAnomaly> {
    (0..2)
        .map(|i| FeedAnomaly {
            id: format!("srv-{}-{}", generation, i),
            kind_tag: if i == 0 { "rift_surge".into() } else { "ion_storm".into() },
            severity: 0.3 + 0.3 * i as f32,
            location: Vec2::new(observer.x + 300.0 * i as f32, observer.y + 150.0),
            resolved: false,
        })
        .collect()
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path).expect("failed to read config file");
            WorldConfig::from_toml_str(&text).expect("invalid config file")
        }
        None => WorldConfig::default(),
    };

    tracing::info!(seed = %args.seed, ticks = args.ticks, "starting survey walk");

    let mut world = WorldState::new(args.seed.clone(), config);
    let mut chunk_loads = 0usize;
    let mut chunk_evictions = 0usize;
    let mut visible = 0usize;
    let mut feed_generation = 0u64;

    for tick in 0..args.ticks {
        // Outward spiral keeps crossing chunk boundaries
        let angle = tick as f32 * 0.01;
        let reach = args.speed * tick as f32 * 0.2;
        let observer = Vec2::new(reach * angle.cos(), reach * angle.sin());
        world.update_observer(observer);

        if args.feed_interval > 0 && tick % args.feed_interval == 0 {
            feed_generation += 1;
            world.apply_feed(&synthetic_feed(feed_generation, observer));
        }

        if let Some(impact) = world.resolve_nearest() {
            tracing::info!(
                id = %impact.id,
                kind = impact.kind.info().label,
                backend = impact.backend,
                "resolved anomaly"
            );
        }

        for event in world.drain_events() {
            match event {
                WorldEvent::ChunkLoaded { .. } => chunk_loads += 1,
                WorldEvent::ChunkEvicted { .. } => chunk_evictions += 1,
                WorldEvent::AnomalyVisible { .. } => visible += 1,
                _ => {}
            }
        }
    }

    let minimap = world.minimap();
    tracing::info!(
        chunk_loads,
        chunk_evictions,
        visible,
        discovered = world.discovered_count(),
        resolved = world.resolved_count(),
        minimap_anomalies = minimap.anomalies.len(),
        "survey walk complete"
    );
}
