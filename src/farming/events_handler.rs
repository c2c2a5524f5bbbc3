//! Handlers for clock events: MinuteTickEvent, NewDayEvent.

use bevy::prelude::*;

use super::{decay::decay_water, growth::advance_growth};
use crate::shared::*;

// ─────────────────────────────────────────────────────────────────────────────
// Minute tick
// ─────────────────────────────────────────────────────────────────────────────

/// Replays every simulated minute the clock produced this frame. For each
/// minute the growth pass runs over the start-of-minute water state, then
/// decay runs, so a tile watered for N minutes grows exactly N minutes.
pub fn on_minute_tick(
    mut minute_events: EventReader<MinuteTickEvent>,
    mut grid: ResMut<TileGrid>,
    mut completed_writer: EventWriter<CropCompletedEvent>,
    mut depleted_writer: EventWriter<WaterDepletedEvent>,
) {
    for _minute in minute_events.read() {
        for tile in advance_growth(&mut grid) {
            debug!("[Farming] Crop at {} is ready to harvest", tile);
            completed_writer.send(CropCompletedEvent { tile });
        }
        for tile in decay_water(&mut grid) {
            depleted_writer.send(WaterDepletedEvent { tile });
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Day start
// ─────────────────────────────────────────────────────────────────────────────

pub fn on_new_day(mut day_events: EventReader<NewDayEvent>, grid: Res<TileGrid>) {
    for event in day_events.read() {
        let planted = grid.iter().filter(|(_, t)| t.has_crop()).count();
        let ripe = grid.iter().filter(|(_, t)| t.is_ripe()).count();
        let watered = grid.iter().filter(|(_, t)| t.is_watered).count();
        info!(
            "[Farming] Day {}: {} crops planted ({} ripe), {} tiles watered",
            event.day, planted, ripe, watered
        );
    }
}
