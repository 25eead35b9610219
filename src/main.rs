// ============================================
// src/main.rs (メインファイル)
// ============================================

use anyhow::{Context, Result};
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

use kanamatch::config::{Cli, Settings};
use kanamatch::session::BoardSession;
use kanamatch::{logging, tui};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::resolve(&cli)?;
    logging::init(&settings.log_path())?;

    // シード指定があれば毎回同じ盤面
    let rng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    info!(?settings, "starting");

    let session = BoardSession::new(settings.policy(), settings.script, rng);
    tui::run(session).context("terminal ui failed")?;
    Ok(())
}
