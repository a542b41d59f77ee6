//! Pixel Churn CLI
//!
//! Reads an ordered directory of frames and writes the change heatmap
//! and the unchanged-mask next to the working directory.

use clap::Parser;
use pixel_churn::{
    analyzer::{Analyzer, Termination},
    metrics::{MetricsRegistry, MetricsSnapshot},
    render::{HeatmapRenderer, WeightingCurve},
    report::RunReport,
    source::{DirectorySource, FileConfig},
};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about = "Per-pixel change heatmaps from an ordered frame directory")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the frames (processed in lexical filename order)
    #[arg(short, long)]
    path: Option<PathBuf>,

    /// Glob pattern for frame files inside the directory
    #[arg(long)]
    pattern: Option<String>,

    /// Output path for the change heatmap
    #[arg(long)]
    changes: Option<PathBuf>,

    /// Output path for the unchanged-mask
    #[arg(long)]
    unchanged: Option<PathBuf>,

    /// Write a TOML run report here
    #[arg(long)]
    report: Option<PathBuf>,

    /// Write Prometheus text metrics here
    #[arg(long)]
    metrics: Option<PathBuf>,
}

impl Args {
    fn into_config(self) -> FileConfig {
        let mut config = match &self.config {
            Some(path) => match FileConfig::from_file(path) {
                Ok(config) => config,
                Err(e) => fail(format!("Failed to load config {}: {}", path.display(), e)),
            },
            None => FileConfig::default(),
        };

        if let Some(path) = self.path {
            config.input.path = path;
        }
        if let Some(pattern) = self.pattern {
            config.input.pattern = pattern;
        }
        if let Some(changes) = self.changes {
            config.output.changes = changes;
        }
        if let Some(unchanged) = self.unchanged {
            config.output.unchanged = unchanged;
        }
        if self.report.is_some() {
            config.output.report = self.report;
        }
        if self.metrics.is_some() {
            config.output.metrics = self.metrics;
        }

        if let Err(e) = config.validate() {
            fail(format!("Invalid configuration: {}", e));
        }
        config
    }
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Pixel Churn v{}", pixel_churn::VERSION);

    let config = Args::parse().into_config();

    let interrupt = Arc::new(AtomicBool::new(false));
    {
        let interrupt = Arc::clone(&interrupt);
        if let Err(e) = ctrlc::set_handler(move || interrupt.store(true, Ordering::SeqCst)) {
            warn!("Failed to install Ctrl-C handler: {}", e);
        }
    }

    let mut source = match DirectorySource::from_dir(&config.input.path, &config.input.pattern) {
        Ok(source) => source,
        Err(e) => fail(format!("Failed to list frames: {}", e)),
    };

    let renderer = HeatmapRenderer::new(WeightingCurve::from(&config.render));
    let mut analyzer = Analyzer::new(renderer).with_interrupt(interrupt);

    let outcome = match analyzer.run(&mut source) {
        Ok(outcome) => outcome,
        Err(e) => fail(format!("Run aborted: {}", e)),
    };

    match outcome.termination {
        Termination::Exhausted => {}
        Termination::Saturated { frame } => {
            warn!("Saturation reached at frame {}; rendering state at that point", frame)
        }
        Termination::Interrupted { frame } => {
            warn!("Interrupted after frame {}; rendering partial state", frame)
        }
    }

    info!("Max changes: {}", outcome.heatmaps.max_changes);

    if let Err(e) = outcome
        .heatmaps
        .save(&config.output.changes, &config.output.unchanged)
    {
        fail(format!("Failed to write images: {}", e));
    }

    if let Some(path) = &config.output.report {
        let report = RunReport::new(&config.input.path, analyzer.differ(), &outcome);
        if let Err(e) = report.write(path) {
            fail(format!("Failed to write report: {}", e));
        }
    }

    if let Some(path) = &config.output.metrics {
        let written = MetricsRegistry::new()
            .and_then(|registry| {
                registry.update(&MetricsSnapshot::from_differ(analyzer.differ()));
                registry.encode()
            })
            .map_err(|e| e.to_string())
            .and_then(|text| std::fs::write(path, text).map_err(|e| e.to_string()));

        if let Err(e) = written {
            fail(format!("Failed to write metrics: {}", e));
        }
    }

    info!("Done.");
}

fn fail(message: String) -> ! {
    eprintln!("{}", message);
    std::process::exit(1);
}
