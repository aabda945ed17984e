#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Board generation system that turns a level description into placement commands.
//!
//! Levels are realized either from a parsed text layout or procedurally from
//! random counts. Every tile becomes a [`Command::PlaceTile`]; enemies become
//! [`Command::SpawnActor`] so the world registers them in spawn order.

mod palette;
mod pool;

use rand::Rng;
use scavenge_core::{
    Command, Count, GridPosition, TileCategory, TileKind, TilePlacement, TileVariant,
};
use scavenge_system_layout::{load_layout, LevelLayout, LevelLoadError, LevelSource};
use thiserror::Error;
use tracing::{debug, info, warn};

pub use palette::{PaletteError, TilePalette};
pub use pool::{GridPositionPool, PoolExhausted};

const DEFAULT_COLUMNS: u32 = 8;
const DEFAULT_ROWS: u32 = 8;
const DEFAULT_WALL_COUNT: Count = match Count::new(5, 9) {
    Ok(count) => count,
    Err(_) => Count::exactly(5),
};
const DEFAULT_FOOD_COUNT: Count = match Count::new(1, 5) {
    Ok(count) => count,
    Err(_) => Count::exactly(1),
};
/// Text layouts only receive floor tiles under their first ten columns.
const LAYOUT_FLOOR_COLUMNS: usize = 10;

/// Selects how a level is realized.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BuildMode {
    /// Build the level from the day's text layout.
    #[default]
    Layout,
    /// Scatter walls, food and enemies at random.
    Procedural,
}

/// Failures raised while scattering tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum BoardError {
    /// The pool ran out of free cells before every requested tile was placed.
    /// Tiles placed before that point remain on the board.
    #[error("grid position pool ran dry after placing {placed} of {requested} tiles")]
    PoolExhausted {
        /// Quantity drawn from the count.
        requested: u32,
        /// Tiles actually placed.
        placed: u32,
    },
}

/// Configuration parameters required to construct the board generator.
#[derive(Clone, Debug)]
pub struct Config {
    columns: u32,
    rows: u32,
    wall_count: Count,
    food_count: Count,
    palette: TilePalette,
    mode: BuildMode,
}

impl Config {
    /// Creates a configuration for a board of `columns` by `rows` cells.
    #[must_use]
    pub fn new(columns: u32, rows: u32, palette: TilePalette, mode: BuildMode) -> Self {
        Self {
            columns,
            rows,
            wall_count: DEFAULT_WALL_COUNT,
            food_count: DEFAULT_FOOD_COUNT,
            palette,
            mode,
        }
    }

    /// Overrides the range of inner walls scattered procedurally.
    #[must_use]
    pub fn with_wall_count(mut self, count: Count) -> Self {
        self.wall_count = count;
        self
    }

    /// Overrides the range of food tiles scattered procedurally.
    #[must_use]
    pub fn with_food_count(mut self, count: Count) -> Self {
        self.food_count = count;
        self
    }

    /// Number of playable columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of playable rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Build mode selected for every level.
    #[must_use]
    pub const fn mode(&self) -> BuildMode {
        self.mode
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(
            DEFAULT_COLUMNS,
            DEFAULT_ROWS,
            TilePalette::default(),
            BuildMode::Layout,
        )
    }
}

/// System that emits placement commands for a level.
///
/// All randomness flows through the injected generator, so two generators
/// seeded alike emit identical command streams.
#[derive(Debug)]
pub struct BoardGenerator<R> {
    config: Config,
    pool: GridPositionPool,
    rng: R,
}

impl<R: Rng> BoardGenerator<R> {
    /// Creates a new generator using the supplied configuration and random source.
    #[must_use]
    pub fn new(config: Config, rng: R) -> Self {
        Self {
            config,
            pool: GridPositionPool::new(),
            rng,
        }
    }

    /// Configuration the generator was created with.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Free interior cells left for random placement.
    #[must_use]
    pub fn pool(&self) -> &GridPositionPool {
        &self.pool
    }

    /// Refills the position pool for a new level.
    pub fn initialize_pool(&mut self) {
        self.pool.initialize(self.config.columns, self.config.rows);
    }

    /// Builds the level for `day` according to the configured mode.
    ///
    /// In layout mode a missing level is returned before any command is emitted.
    pub fn build_level(
        &mut self,
        day: u32,
        source: &dyn LevelSource,
        out: &mut Vec<Command>,
    ) -> Result<(), LevelLoadError> {
        let emitted_before = out.len();
        match self.config.mode {
            BuildMode::Layout => {
                let layout = load_layout(source, day)?;
                self.build_from_layout(&layout, out);
            }
            BuildMode::Procedural => self.setup_procedural(day, out),
        }
        info!(day, commands = out.len() - emitted_before, mode = ?self.config.mode, "level built");
        Ok(())
    }

    /// Places floor and outer wall tiles over the rectangle from -1 to the board edge.
    pub fn board_setup(&mut self, out: &mut Vec<Command>) {
        let columns = to_coord(self.config.columns);
        let rows = to_coord(self.config.rows);
        for x in -1..=columns {
            for y in -1..=rows {
                let category = if x == -1 || x == columns || y == -1 || y == rows {
                    TileCategory::OuterWall
                } else {
                    TileCategory::Floor
                };
                self.place(category, GridPosition::new(x, y), out);
            }
        }
    }

    /// Scatters a random quantity of `category` tiles on distinct free cells.
    ///
    /// Returns the number of tiles placed. When the pool runs dry the tiles
    /// already placed stay and [`BoardError::PoolExhausted`] is returned.
    pub fn scatter_random(
        &mut self,
        category: TileCategory,
        count: Count,
        out: &mut Vec<Command>,
    ) -> Result<u32, BoardError> {
        let requested = self.rng.gen_range(count.minimum()..=count.maximum());
        for placed in 0..requested {
            let position = self
                .pool
                .take_random(&mut self.rng)
                .map_err(|PoolExhausted| BoardError::PoolExhausted { requested, placed })?;
            self.place(category, position, out);
        }
        Ok(requested)
    }

    /// Places every tile described by a text layout.
    ///
    /// Row `i`, column `j` lands on `(j - 1, row_count - i - 2)`, so the first
    /// text row is the top of the board and the first column is the left
    /// outer wall. Only the first ten columns receive a floor tile underneath.
    pub fn build_from_layout(&mut self, layout: &LevelLayout, out: &mut Vec<Command>) {
        let row_count = to_coord(layout.row_count());
        for (i, row) in layout.rows().iter().enumerate() {
            let y = row_count - to_coord(i) - 2;
            for (j, kind) in row.iter().enumerate() {
                let position = GridPosition::new(to_coord(j) - 1, y);
                if j < LAYOUT_FLOOR_COLUMNS {
                    self.place(TileCategory::Floor, position, out);
                }
                if let Some(category) = kind.category() {
                    self.place(category, position, out);
                }
            }
        }
        debug!(
            rows = layout.row_count(),
            enemies = layout.count(TileKind::Enemy),
            "layout realized"
        );
    }

    /// Builds a random level: border, scattered walls and food, enemies, exit.
    ///
    /// Enemy count grows with the day as `floor(log2(day)) + 1`. Pool
    /// exhaustion is logged and the partially scattered level is kept.
    pub fn setup_procedural(&mut self, day: u32, out: &mut Vec<Command>) {
        self.board_setup(out);
        self.initialize_pool();

        let enemy_count = Count::exactly(day.checked_ilog2().unwrap_or(0) + 1);
        let batches = [
            (TileCategory::Wall, self.config.wall_count),
            (TileCategory::Food, self.config.food_count),
            (TileCategory::Enemy, enemy_count),
        ];
        for (category, count) in batches {
            if let Err(error) = self.scatter_random(category, count, out) {
                warn!(?category, %error, "placement batch cut short");
            }
        }

        let exit = GridPosition::new(
            to_coord(self.config.columns) - 1,
            to_coord(self.config.rows) - 1,
        );
        self.place(TileCategory::Exit, exit, out);
    }

    fn place(&mut self, category: TileCategory, position: GridPosition, out: &mut Vec<Command>) {
        let variant = self.random_variant(category);
        let placement = TilePlacement::new(category, variant, position);
        if category == TileCategory::Enemy {
            out.push(Command::SpawnActor {
                placement,
                move_duration: self.config.palette.enemy_move_duration(variant),
            });
        } else {
            out.push(Command::PlaceTile { placement });
        }
    }

    fn random_variant(&mut self, category: TileCategory) -> TileVariant {
        if category == TileCategory::Exit {
            return TileVariant::new(0);
        }
        let variants = self.config.palette.variant_count(category).max(1);
        TileVariant::new(self.rng.gen_range(0..variants))
    }
}

fn to_coord<T>(value: T) -> i32
where
    i32: TryFrom<T>,
{
    i32::try_from(value).unwrap_or(i32::MAX)
}
