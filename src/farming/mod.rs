//! Farming domain. Tile grid upkeep over time: crop growth and water decay.
//!
//! Communicates with other domains exclusively through crate::shared events/resources.
//! Tilling, watering, planting and harvesting are committed by the player
//! domain's interaction machine; this domain only advances the grid in time.

use bevy::prelude::*;

use crate::calendar::tick_clock;
use crate::shared::*;

pub mod decay;
mod events_handler;
pub mod growth;

pub use decay::decay_water;
pub use events_handler::on_minute_tick;
pub use growth::advance_growth;

pub struct FarmingPlugin;

impl Plugin for FarmingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TileGrid>()
            .init_resource::<CropCatalog>()
            .add_event::<CropCompletedEvent>()
            .add_event::<WaterDepletedEvent>()
            .add_event::<TileChangedEvent>()
            // ------------------------------------------------------------------
            // Time-driven grid updates, after the clock has produced this
            // frame's minute events
            // ------------------------------------------------------------------
            .add_systems(
                Update,
                (events_handler::on_minute_tick, events_handler::on_new_day)
                    .after(tick_clock)
                    .run_if(in_state(GameState::Playing)),
            );
    }
}
