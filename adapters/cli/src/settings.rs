//! Session settings read from a TOML file.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use scavenge_core::Count;
use serde::Deserialize;

/// Settings controlling a headless session. Omitted keys take their defaults.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Settings {
    /// Seed for every random decision; drawn at start when absent.
    pub(crate) seed: Option<u64>,
    /// Food the player starts with.
    pub(crate) starting_food: i32,
    /// Day at which the session is won.
    pub(crate) max_days: u32,
    /// Title card delay in milliseconds.
    pub(crate) setup_delay_ms: u64,
    /// Pause before actors move, in milliseconds.
    pub(crate) turn_delay_ms: u64,
    /// Simulated time per frame, in milliseconds.
    pub(crate) frame_ms: u64,
    /// Frames after which an unfinished session is abandoned.
    pub(crate) max_frames: u64,
    /// Player moves taken before the scripted player reaches the exit.
    pub(crate) moves_per_day: u32,
    /// Board construction settings.
    pub(crate) board: BoardSettings,
}

/// Board construction settings.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct BoardSettings {
    /// Playable columns.
    pub(crate) columns: u32,
    /// Playable rows.
    pub(crate) rows: u32,
    /// Build levels at random instead of from text layouts.
    pub(crate) procedural: bool,
    /// Directory holding `dayN.txt` layouts; bundled levels when absent.
    pub(crate) levels: Option<PathBuf>,
    /// Inner walls scattered on procedural levels.
    pub(crate) wall_count: Count,
    /// Food tiles scattered on procedural levels.
    pub(crate) food_count: Count,
}

impl Settings {
    /// Reads settings from `path`, or returns the defaults when no path is given.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid settings in {}", path.display()))
    }

    fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Title card delay.
    pub(crate) fn setup_delay(&self) -> Duration {
        Duration::from_millis(self.setup_delay_ms)
    }

    /// Pause before actors move.
    pub(crate) fn turn_delay(&self) -> Duration {
        Duration::from_millis(self.turn_delay_ms)
    }

    /// Simulated time per frame.
    pub(crate) fn frame(&self) -> Duration {
        Duration::from_millis(self.frame_ms)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            starting_food: 100,
            max_days: 4,
            setup_delay_ms: 2_000,
            turn_delay_ms: 100,
            frame_ms: 16,
            max_frames: 100_000,
            moves_per_day: 3,
            board: BoardSettings::default(),
        }
    }
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            columns: 8,
            rows: 8,
            procedural: false,
            levels: None,
            wall_count: Count::new(5, 9).unwrap_or(Count::exactly(5)),
            food_count: Count::new(1, 5).unwrap_or(Count::exactly(1)),
        }
    }
}
