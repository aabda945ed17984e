//! Number of visual variants available to each tile category.

use std::time::Duration;

use scavenge_core::{TileCategory, TileVariant};
use thiserror::Error;

const DEFAULT_FLOOR_VARIANTS: u32 = 8;
const DEFAULT_OUTER_WALL_VARIANTS: u32 = 3;
const DEFAULT_WALL_VARIANTS: u32 = 8;
const DEFAULT_FOOD_VARIANTS: u32 = 2;
const DEFAULT_ENEMY_MOVE_DURATION: Duration = Duration::from_millis(100);

/// Raised when a palette would leave a category without variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("tile category {category:?} has no variants")]
pub struct PaletteError {
    /// Category that was left empty.
    pub category: TileCategory,
}

/// Variant counts per category. Enemy variants carry their own step duration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TilePalette {
    floor: u32,
    outer_wall: u32,
    wall: u32,
    food: u32,
    enemy_move_durations: Vec<Duration>,
}

impl TilePalette {
    /// Creates a palette; every category needs at least one variant.
    pub fn new(
        floor: u32,
        outer_wall: u32,
        wall: u32,
        food: u32,
        enemy_move_durations: Vec<Duration>,
    ) -> Result<Self, PaletteError> {
        let checks = [
            (TileCategory::Floor, floor),
            (TileCategory::OuterWall, outer_wall),
            (TileCategory::Wall, wall),
            (TileCategory::Food, food),
            (
                TileCategory::Enemy,
                u32::try_from(enemy_move_durations.len()).unwrap_or(u32::MAX),
            ),
        ];
        if let Some((category, _)) = checks.iter().find(|(_, count)| *count == 0) {
            return Err(PaletteError {
                category: *category,
            });
        }

        Ok(Self {
            floor,
            outer_wall,
            wall,
            food,
            enemy_move_durations,
        })
    }

    /// Number of variants the category offers. The exit is a single entity.
    #[must_use]
    pub fn variant_count(&self, category: TileCategory) -> u32 {
        match category {
            TileCategory::Floor => self.floor,
            TileCategory::OuterWall => self.outer_wall,
            TileCategory::Wall => self.wall,
            TileCategory::Food => self.food,
            TileCategory::Enemy => {
                u32::try_from(self.enemy_move_durations.len()).unwrap_or(u32::MAX)
            }
            TileCategory::Exit => 1,
        }
    }

    /// Step duration of an enemy variant.
    #[must_use]
    pub fn enemy_move_duration(&self, variant: TileVariant) -> Duration {
        usize::try_from(variant.get())
            .ok()
            .and_then(|index| self.enemy_move_durations.get(index))
            .copied()
            .unwrap_or(DEFAULT_ENEMY_MOVE_DURATION)
    }
}

impl Default for TilePalette {
    fn default() -> Self {
        Self {
            floor: DEFAULT_FLOOR_VARIANTS,
            outer_wall: DEFAULT_OUTER_WALL_VARIANTS,
            wall: DEFAULT_WALL_VARIANTS,
            food: DEFAULT_FOOD_VARIANTS,
            enemy_move_durations: vec![DEFAULT_ENEMY_MOVE_DURATION; 2],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_category() {
        let error = TilePalette::new(1, 1, 0, 1, vec![Duration::ZERO]).expect_err("empty walls");
        assert_eq!(error.category, TileCategory::Wall);

        let error = TilePalette::new(1, 1, 1, 1, Vec::new()).expect_err("no enemies");
        assert_eq!(error.category, TileCategory::Enemy);
    }

    #[test]
    fn exit_has_a_single_variant() {
        assert_eq!(TilePalette::default().variant_count(TileCategory::Exit), 1);
    }

    #[test]
    fn enemy_variants_keep_their_durations() {
        let palette = TilePalette::new(
            1,
            1,
            1,
            1,
            vec![Duration::from_millis(50), Duration::from_millis(250)],
        )
        .expect("valid palette");

        assert_eq!(
            palette.enemy_move_duration(TileVariant::new(1)),
            Duration::from_millis(250)
        );
        assert_eq!(palette.variant_count(TileCategory::Enemy), 2);
    }
}
