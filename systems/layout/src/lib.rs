#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Text level descriptions and the resources they are loaded from.
//!
//! A level is plain text: one row per line, one tile per character. The
//! parser is a pure character-to-kind mapping and never rejects input; only
//! locating the text for a day can fail.

use std::{
    fs, io,
    path::PathBuf,
};

use scavenge_core::TileKind;
use thiserror::Error;
use tracing::debug;

const ROW_SEPARATOR: char = '\n';
const EMBEDDED_LEVELS: [&str; 3] = [
    include_str!("../levels/day1.txt"),
    include_str!("../levels/day2.txt"),
    include_str!("../levels/day3.txt"),
];

/// Parsed tile grid. Rows keep their text order and may differ in length.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelLayout {
    rows: Vec<Vec<TileKind>>,
}

impl LevelLayout {
    /// Parses a level description.
    ///
    /// Rows are split on `\n` only, so a trailing newline produces a final
    /// empty row and a `\r` before it is read as floor. Empty input yields a
    /// single empty row.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let rows = text
            .split(ROW_SEPARATOR)
            .map(|line| line.chars().map(TileKind::from_symbol).collect())
            .collect();
        Self { rows }
    }

    /// Rows in text order; the first row is the top of the board.
    #[must_use]
    pub fn rows(&self) -> &[Vec<TileKind>] {
        &self.rows
    }

    /// Number of rows, including empty ones.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Kind at `column` of `row`, if that row is long enough.
    #[must_use]
    pub fn kind_at(&self, row: usize, column: usize) -> Option<TileKind> {
        self.rows.get(row).and_then(|cells| cells.get(column)).copied()
    }

    /// Counts the cells of the provided kind across every row.
    #[must_use]
    pub fn count(&self, kind: TileKind) -> usize {
        self.rows
            .iter()
            .flat_map(|row| row.iter())
            .filter(|cell| **cell == kind)
            .count()
    }
}

/// Reasons the text for a day could not be obtained.
#[derive(Debug, Error)]
pub enum LevelLoadError {
    /// No level resource exists for the requested day.
    #[error("no level resource exists for day {day}")]
    Unavailable {
        /// Day that was requested.
        day: u32,
    },
    /// The level resource exists but could not be read.
    #[error("could not read level resource {}", .path.display())]
    Unreadable {
        /// Location of the resource.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
}

/// Provider of the raw level text for each day.
pub trait LevelSource {
    /// Returns the text describing the level for `day`.
    fn load(&self, day: u32) -> Result<String, LevelLoadError>;
}

/// Resource identifier used for the level of `day`.
#[must_use]
pub fn level_resource_name(day: u32) -> String {
    format!("day{day}")
}

/// Loads and parses the level for `day`.
pub fn load_layout(source: &dyn LevelSource, day: u32) -> Result<LevelLayout, LevelLoadError> {
    let text = source.load(day)?;
    let layout = LevelLayout::parse(&text);
    debug!(day, rows = layout.row_count(), "parsed level layout");
    Ok(layout)
}

/// Level resources compiled into the binary.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmbeddedLevels;

impl EmbeddedLevels {
    /// Number of days with a bundled level.
    #[must_use]
    pub const fn day_count(&self) -> u32 {
        EMBEDDED_LEVELS.len() as u32
    }
}

impl LevelSource for EmbeddedLevels {
    fn load(&self, day: u32) -> Result<String, LevelLoadError> {
        let index = day
            .checked_sub(1)
            .and_then(|index| usize::try_from(index).ok())
            .ok_or(LevelLoadError::Unavailable { day })?;
        EMBEDDED_LEVELS
            .get(index)
            .map(|text| (*text).to_owned())
            .ok_or(LevelLoadError::Unavailable { day })
    }
}

/// Level resources read from `<root>/day<N>.txt`.
#[derive(Clone, Debug)]
pub struct DirectoryLevels {
    root: PathBuf,
}

impl DirectoryLevels {
    /// Creates a source reading from the provided directory.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path of the file holding the level for `day`.
    #[must_use]
    pub fn path_for(&self, day: u32) -> PathBuf {
        self.root.join(format!("{}.txt", level_resource_name(day)))
    }
}

impl LevelSource for DirectoryLevels {
    fn load(&self, day: u32) -> Result<String, LevelLoadError> {
        let path = self.path_for(day);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(text),
            Err(source) if source.kind() == io::ErrorKind::NotFound => {
                Err(LevelLoadError::Unavailable { day })
            }
            Err(source) => Err(LevelLoadError::Unreadable { path, source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn embedded_levels_cover_three_days() {
        let levels = EmbeddedLevels;
        assert_eq!(levels.day_count(), 3);
        for day in 1..=3 {
            let layout = load_layout(&levels, day).expect("bundled level");
            assert_eq!(layout.count(TileKind::Exit), 1, "day {day} needs an exit");
        }
    }

    #[test]
    fn embedded_levels_reject_out_of_range_days() {
        assert!(matches!(
            EmbeddedLevels.load(0),
            Err(LevelLoadError::Unavailable { day: 0 })
        ));
        assert!(matches!(
            EmbeddedLevels.load(4),
            Err(LevelLoadError::Unavailable { day: 4 })
        ));
    }

    #[test]
    fn resource_names_follow_day_number() {
        assert_eq!(level_resource_name(2), "day2");
        let levels = DirectoryLevels::new("levels");
        assert_eq!(levels.path_for(3), Path::new("levels").join("day3.txt"));
    }
}
