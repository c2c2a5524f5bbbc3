//! Data layer. Populates the crop catalog and applies the farm config at
//! startup.
//!
//! This plugin runs in OnEnter(GameState::Loading), fills the CropCatalog
//! from the hard-coded design data in `crops`, pushes the active FarmConfig
//! into the clock, tile grid, hold timer and watering can, then transitions
//! the game into GameState::Playing.
//!
//! Insert a FarmConfig before adding the plugin to override the defaults.

pub mod crops;

use bevy::prelude::*;

use crate::player::HoldInteraction;
use crate::shared::*;

pub struct DataPlugin;

impl Plugin for DataPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FarmConfig>()
            .init_resource::<CropCatalog>()
            .init_resource::<GameClock>()
            .init_resource::<TileGrid>()
            .init_resource::<HoldInteraction>()
            .init_resource::<WateringCan>()
            .add_systems(OnEnter(GameState::Loading), load_all_data);
    }
}

/// Push config values into every resource that derives from it. Farmland is
/// added to, never cleared, so plots marked by hand survive.
pub fn apply_config(
    config: &FarmConfig,
    clock: &mut GameClock,
    grid: &mut TileGrid,
    hold: &mut HoldInteraction,
    can: &mut WateringCan,
) {
    *clock = GameClock::from_config(config);
    for plot in &config.farm_plots {
        grid.mark_farmable_rect(plot);
    }
    hold.hold_duration = config.interaction_hold_duration.max(0.0);
    *can = WateringCan::from_config(config);
}

/// Single system that fills the catalog, clamps and applies the config,
/// then transitions to Playing.
fn load_all_data(
    mut config: ResMut<FarmConfig>,
    mut catalog: ResMut<CropCatalog>,
    mut clock: ResMut<GameClock>,
    mut grid: ResMut<TileGrid>,
    mut hold: ResMut<HoldInteraction>,
    mut can: ResMut<WateringCan>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    info!("[Data] Populating catalog…");

    crops::populate_crops(&mut catalog);
    info!(
        "[Data]   Crops loaded: {}, seeds loaded: {}",
        catalog.crops.len(),
        catalog.seeds.len()
    );

    // Later consumers (new game) read the resource, so store the clamped copy.
    *config = config.clone().sanitized();
    apply_config(&config, &mut clock, &mut grid, &mut hold, &mut can);
    info!(
        "[Data]   Farmland tiles: {}, clock starts {}",
        grid.farmland().count(),
        clock.formatted_time()
    );

    next_state.set(GameState::Playing);
}
