// main.rs - Automatron: paint cells, pick a rule, watch the automaton evolve

use std::process::ExitCode;
use std::sync::{Arc, Mutex};

use automaton::{AutomatonConfig, RuleCatalog, RunSummary, SimulationEngine};
use clap::Parser;
use eframe::egui;

mod app;
mod cli;
mod control_panel;
mod headless;

use app::{AutomatronApp, SummarySlot};
use cli::Args;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "automatron=info,automaton=info".into()),
        )
        .init();

    let args = Args::parse();

    match launch(&args) {
        Ok(Some(summary)) => {
            tracing::info!(
                generations = summary.generations,
                live_cells = summary.live_cells,
                "run finished"
            );
            println!("{summary}");
            ExitCode::SUCCESS
        }
        Ok(None) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            eprintln!("automatron: {err}");
            ExitCode::FAILURE
        }
    }
}

fn launch(args: &Args) -> Result<Option<RunSummary>, Box<dyn std::error::Error>> {
    let config = args.resolve_config()?;

    let catalog = RuleCatalog::builtin()?.with_custom(config.rules.clone())?;
    if args.list_rules {
        for (name, rule) in catalog.iter() {
            println!("{name:<14} {rule}");
        }
        return Ok(None);
    }

    let mut engine = SimulationEngine::from_config(&config, Arc::new(catalog))?;
    args.seed(&mut engine);
    tracing::info!(engine = ?engine, live = engine.grid().population(), "engine ready");

    let summary = if args.headless {
        headless::run(engine, args.frames, &args.schedule)?
    } else {
        run_window(engine, &config)?
    };
    Ok(Some(summary))
}

fn run_window(engine: SimulationEngine, config: &AutomatonConfig) -> Result<RunSummary, eframe::Error> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(AutomatronApp::window_size(config)),
        ..Default::default()
    };

    let summary: SummarySlot = Arc::new(Mutex::new(None));
    let fallback = engine.summary();
    let app = AutomatronApp::new(engine, config, Arc::clone(&summary));

    eframe::run_native("Automatron", options, Box::new(|_cc| Box::new(app)))?;

    let summary = match summary.lock() {
        Ok(mut slot) => slot.take(),
        Err(poisoned) => poisoned.into_inner().take(),
    };
    Ok(summary.unwrap_or(fallback))
}
