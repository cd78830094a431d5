use std::{
    env, fs,
    sync::{Arc, RwLock},
};

use anyhow::Context;
use liblife::LifeGrid;
use serde::Deserialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use palette::ColorCycle;
use ticker::TickerHost;
use view::{CellShape, MAX_CELL_SIZE, MIN_CELL_SIZE, Viewport};

mod palette;
mod renderer;
mod ticker;
mod view;

/// Run configuration, loadable from a JSON file passed as the first
/// argument. Anything not set in the file keeps its default.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct Config {
    pub window_width: u32,
    pub window_height: u32,
    pub cell_size: u32,
    pub interval_ms: u64,
    pub target_fps: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window_width: 500,
            window_height: 500,
            cell_size: 10,
            interval_ms: 20,
            target_fps: 30,
        }
    }
}

pub struct State {
    pub life: LifeGrid,
    pub paused: bool,
    pub interval_ms: u64,
    pub viewport: Viewport,
    pub colors: ColorCycle,
    pub shape: CellShape,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            env::var("RUST_LOG").unwrap_or_else(|_| "client=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match env::args().nth(1) {
        Some(path) => {
            let raw = fs::read(&path).with_context(|| format!("Reading config {path}"))?;
            serde_json::from_slice(&raw).context("Deserializing config")?
        }
        None => Config::default(),
    };
    let config = Config {
        cell_size: config.cell_size.clamp(MIN_CELL_SIZE, MAX_CELL_SIZE),
        target_fps: config.target_fps.max(1),
        ..config
    };

    let mut life = LifeGrid::new(
        (config.window_width / config.cell_size) as usize,
        (config.window_height / config.cell_size) as usize,
    );
    life.populate_randomly();

    let state_arc = Arc::new(RwLock::new(State {
        life,
        paused: true,
        interval_ms: config.interval_ms,
        viewport: Viewport::new(config.cell_size),
        colors: ColorCycle::new(),
        shape: CellShape::Round,
    }));

    let ticker = TickerHost::start(state_arc.clone());

    renderer::run(state_arc, config)?;

    ticker.stop();
    Ok(())
}
