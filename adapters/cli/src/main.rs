#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays a headless Scavenge session.

mod settings;
mod simulation;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use settings::Settings;
use tracing_subscriber::EnvFilter;

/// Command-line arguments accepted by the Scavenge binary.
#[derive(Debug, Parser)]
#[command(name = "scavenge", about = "Play a scripted Scavenge session headlessly")]
struct Args {
    /// TOML settings file; defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for board generation.
    #[arg(long)]
    seed: Option<u64>,

    /// Directory holding `dayN.txt` level layouts.
    #[arg(long)]
    levels: Option<PathBuf>,

    /// Build levels at random instead of from layouts.
    #[arg(long)]
    procedural: bool,

    /// Frames to simulate before giving up.
    #[arg(long)]
    max_frames: Option<u64>,
}

impl Args {
    fn apply(&self, settings: &mut Settings) {
        if let Some(seed) = self.seed {
            settings.seed = Some(seed);
        }
        if let Some(levels) = &self.levels {
            settings.board.levels = Some(levels.clone());
        }
        if self.procedural {
            settings.board.procedural = true;
        }
        if let Some(max_frames) = self.max_frames {
            settings.max_frames = max_frames;
        }
    }
}

/// Entry point for the Scavenge command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut settings = Settings::load(args.config.as_deref())?;
    args.apply(&mut settings);

    let report = simulation::run(&settings)?;
    for line in &report.transcript {
        println!("{line}");
    }
    println!(
        "seed {} finished after {} frames with {} food left",
        report.seed, report.frames, report.food
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_settings() {
        let args = Args::parse_from([
            "scavenge",
            "--seed",
            "5",
            "--procedural",
            "--max-frames",
            "40",
            "--levels",
            "custom",
        ]);
        let mut settings = Settings::default();

        args.apply(&mut settings);

        assert_eq!(settings.seed, Some(5));
        assert!(settings.board.procedural);
        assert_eq!(settings.max_frames, 40);
        assert_eq!(settings.board.levels, Some(PathBuf::from("custom")));
    }

    #[test]
    fn absent_flags_keep_settings() {
        let args = Args::parse_from(["scavenge"]);
        let mut settings = Settings::default();

        args.apply(&mut settings);

        assert_eq!(settings, Settings::default());
    }
}
