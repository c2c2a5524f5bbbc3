//! Growth engine: watered, planted tiles gain one minute of growth per tick.

use crate::shared::*;

/// Runs one simulated minute of growth over the whole grid and returns the
/// tiles whose crop became ripe on this minute, in coordinate order.
///
/// Only watered tiles grow. Unwatered crops stall; there is no withering.
pub fn advance_growth(grid: &mut TileGrid) -> Vec<TileCoord> {
    let mut completed = Vec::new();

    for (coord, tile) in grid.iter_mut() {
        let Some(duration) = tile.planted_crop.as_ref().map(|c| c.growth_duration_minutes) else {
            continue;
        };

        if tile.is_watered && tile.watered_minutes_accumulated < duration {
            tile.watered_minutes_accumulated += 1;
        }
        tile.watered_minutes_accumulated = tile.watered_minutes_accumulated.min(duration);

        if tile.take_ripening_edge() {
            completed.push(*coord);
        }
    }

    completed
}
