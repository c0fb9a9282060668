mod app;
mod network;
mod util;

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use clap::Parser;

use network::{Session, SessionConfig, SizeScale, SnapshotSampler};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// JSON snapshot of the social network to sample from.
    #[arg(long)]
    snapshot: PathBuf,
    /// Follow pairs drawn per Add.
    #[arg(long, default_value_t = 12)]
    batch_size: usize,
    #[arg(long, default_value_t = 0x5eed)]
    seed: u64,
    #[arg(long, default_value_t = 0.3)]
    radius_scale: f32,
    #[arg(long, default_value_t = 4.0)]
    radius_offset: f32,
    /// Minimum time between two accepted Add clicks.
    #[arg(long, default_value_t = 1000)]
    cooldown_ms: u64,
    /// Apply this many batches without a window and print the result as JSON.
    #[arg(long, value_name = "BATCHES")]
    headless: Option<usize>,
}

fn run_headless(mut session: Session, batches: usize) -> Result<()> {
    let committed = session.add_batches(batches)?;
    log::info!("headless run committed {committed} of {batches} batches");

    let state = session.state();
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &*state).context("failed to serialize network")?;
    writeln!(stdout).context("failed to write to stdout")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let sampler = SnapshotSampler::load(&args.snapshot, args.batch_size, args.seed)?;
    let session = Session::new(
        Arc::new(sampler),
        SessionConfig {
            size: SizeScale {
                scale: args.radius_scale,
                offset: args.radius_offset,
            },
            palette_seed: args.seed,
        },
    );

    if let Some(batches) = args.headless {
        return run_headless(session, batches);
    }

    let cooldown = Duration::from_millis(args.cooldown_ms);
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1280.0, 860.0]),
        ..Default::default()
    };

    eframe::run_native(
        "follow-cloud",
        options,
        Box::new(move |cc| Ok(Box::new(app::FollowCloudApp::new(cc, session, cooldown)))),
    )
    .map_err(|error| anyhow!("viewer exited with an error: {error}"))
}
