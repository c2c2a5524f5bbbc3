//! Player domain. The actor's hands: tool belt, watering can, and the
//! hold-to-act interaction machine that commits actions to the tile grid.

pub mod interaction;
pub mod tools;

use bevy::prelude::*;

use crate::farming::on_minute_tick;
use crate::shared::*;

pub use interaction::{HoldInteraction, HoldPhase, HoldStep};

/// Order the tool selector steps through.
pub const TOOL_ORDER: [ToolKind; 4] = [
    ToolKind::Hoe,
    ToolKind::WateringCan,
    ToolKind::Seeds,
    ToolKind::Harvest,
];

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        // -- Local and shared resources --
        app.init_resource::<HoldInteraction>()
            .init_resource::<ToolBelt>()
            .init_resource::<WateringCan>()
            .init_resource::<ResourceInventory>()
            .init_resource::<TargetedTile>()
            .init_resource::<TileGrid>()
            .init_resource::<CropCatalog>();

        // -- Inbound and outbound events --
        app.add_event::<InteractEvent>()
            .add_event::<ToolCycleEvent>()
            .add_event::<RefillWateringCanEvent>()
            .add_event::<TileChangedEvent>()
            .add_event::<InteractionRejectedEvent>()
            .add_event::<WaterConsumedEvent>()
            .add_event::<SeedConsumedEvent>()
            .add_event::<CropHarvestedEvent>();

        // -- Abandon holds when gameplay stops --
        app.add_systems(OnExit(GameState::Playing), interaction::cancel_hold_on_exit);

        // -- Systems that run every frame while Playing --
        app.add_systems(
            Update,
            (
                // tool changes must land before the hold checks for them
                tools::tool_cycle,
                tools::refill_watering_can,
                interaction::update_interaction.after(on_minute_tick),
                tools::water_consumed_handler,
            )
                .chain()
                .run_if(in_state(GameState::Playing)),
        );
    }
}
