//! Water decay engine: soil dries out one minute at a time.

use crate::shared::*;

/// Runs one simulated minute of evaporation. Returns the tiles that dried out
/// on this minute, in coordinate order.
pub fn decay_water(grid: &mut TileGrid) -> Vec<TileCoord> {
    let mut depleted = Vec::new();

    for (coord, tile) in grid.iter_mut() {
        if !tile.is_watered {
            continue;
        }
        tile.water_minutes_remaining = tile.water_minutes_remaining.saturating_sub(1);
        if tile.water_minutes_remaining == 0 {
            tile.is_watered = false;
            depleted.push(*coord);
        }
    }

    depleted
}
