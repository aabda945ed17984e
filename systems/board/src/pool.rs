//! Free interior cells available to random placement.

use rand::Rng;
use scavenge_core::GridPosition;
use thiserror::Error;

/// Raised when a position is requested from an empty pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("no free grid positions remain")]
pub struct PoolExhausted;

/// Interior cells that have not yet received a random placement this level.
///
/// The one-cell border reserved for walls is never part of the pool. A
/// position leaves the pool once and only returns when the pool is
/// initialized again for the next level.
#[derive(Clone, Debug, Default)]
pub struct GridPositionPool {
    positions: Vec<GridPosition>,
}

impl GridPositionPool {
    /// Creates an empty pool.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            positions: Vec::new(),
        }
    }

    /// Refills the pool with every interior cell, column-major ascending.
    pub fn initialize(&mut self, columns: u32, rows: u32) {
        self.positions.clear();
        let columns = i32::try_from(columns).unwrap_or(i32::MAX);
        let rows = i32::try_from(rows).unwrap_or(i32::MAX);
        for x in 1..columns.saturating_sub(1) {
            for y in 1..rows.saturating_sub(1) {
                self.positions.push(GridPosition::new(x, y));
            }
        }
    }

    /// Removes and returns a uniformly random free position.
    pub fn take_random<R: Rng>(&mut self, rng: &mut R) -> Result<GridPosition, PoolExhausted> {
        if self.positions.is_empty() {
            return Err(PoolExhausted);
        }
        let index = rng.gen_range(0..self.positions.len());
        Ok(self.positions.remove(index))
    }

    /// Free positions in enumeration order.
    #[must_use]
    pub fn positions(&self) -> &[GridPosition] {
        &self.positions
    }

    /// Number of free positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Reports whether every position has been taken.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
