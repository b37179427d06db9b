mod app;
mod color;
mod config;
mod data;
mod report;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use eframe::egui;

use app::DashboardApp;
use config::DashboardConfig;
use state::AppState;

/// Restaurant dashboard: filter a listing by cuisine and price.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Dataset to open (.csv, .json or .parquet). Overrides the config file.
    data: Option<PathBuf>,

    /// JSON configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Initial maximum approximate cost for two.
    #[arg(long)]
    max_cost: Option<f64>,

    /// Initially selected cuisine tag (repeatable).
    #[arg(long = "cuisine")]
    cuisines: Vec<String>,

    /// Print a text report instead of opening the window.
    #[arg(long)]
    headless: bool,
}

impl Cli {
    fn resolve_config(&self) -> Result<DashboardConfig> {
        let mut config = match &self.config {
            Some(path) => DashboardConfig::from_json_file(path)?,
            None => DashboardConfig::default(),
        };
        if let Some(path) = &self.data {
            config.dataset_path = path.clone();
        }
        if let Some(max_cost) = self.max_cost {
            config.default_max_cost = max_cost;
        }
        config.validate()?;
        Ok(config)
    }

    /// Resolved config plus the cuisine tags given on the command line.
    fn initial_state(&self) -> Result<AppState> {
        let config = self.resolve_config().context("loading configuration")?;
        let mut state = AppState::new(config);
        for tag in &self.cuisines {
            state.filters.select_cuisine(tag);
        }
        Ok(state)
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let mut state = cli.initial_state()?;
    log::info!("Starting with dataset {}", state.config.dataset_path.display());

    if cli.headless {
        return run_headless(state);
    }

    let path = state.config.dataset_path.clone();
    state.load_path(&path);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Zomato Restaurants Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(DashboardApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("running the dashboard window: {e}"))
}

fn run_headless(mut state: AppState) -> Result<()> {
    let dataset = data::loader::load_cached(&state.config.dataset_path)?;
    state.set_dataset(dataset.clone());
    print!("{}", report::render(&dataset, &state.insights)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_cuisine_flags_select_once() {
        let cli = Cli::try_parse_from([
            "zomato-dashboard",
            "--cuisine",
            "Thai",
            "--cuisine",
            "Thai",
            "--cuisine",
            "Chinese",
            "--max-cost",
            "1200",
        ])
        .unwrap();
        let state = cli.initial_state().unwrap();
        let tags: Vec<&str> = state.filters.cuisines.iter().map(String::as_str).collect();
        assert_eq!(tags, vec!["Chinese", "Thai"]);
        assert_eq!(state.filters.max_cost, 1200.0);
    }
}
