use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::player::HoldInteraction;
use crate::shared::*;

// ═══════════════════════════════════════════════════════════════════════
// PUBLIC TYPES
// ═══════════════════════════════════════════════════════════════════════

pub const SNAPSHOT_VERSION: u32 = 1;

/// One tile's state. JSON maps cannot have struct keys, so the grid is
/// stored as a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileRecord {
    pub coord: TileCoord,
    pub state: TileState,
}

/// Everything needed to resume the simulation: the clock and the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FarmSnapshot {
    pub version: u32,
    pub clock: GameClock,
    pub farmland: Vec<TileCoord>,
    pub tiles: Vec<TileRecord>,
}

impl FarmSnapshot {
    pub fn capture(clock: &GameClock, grid: &TileGrid) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            clock: clock.clone(),
            farmland: grid.farmland().copied().collect(),
            tiles: grid
                .iter()
                .map(|(coord, state)| TileRecord { coord: *coord, state: state.clone() })
                .collect(),
        }
    }

    /// Overwrite the clock and grid. The ripeness memo is recomputed from
    /// the restored growth so a crop that was already ripe does not announce
    /// itself again.
    pub fn restore(&self, clock: &mut GameClock, grid: &mut TileGrid) {
        *clock = self.clock.clone();
        grid.restore_farmland(self.farmland.iter().copied());
        grid.restore_tiles(self.tiles.iter().map(|r| (r.coord, r.state.clone())));
    }

    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string_pretty(self).map_err(|e| format!("Serialization failed: {}", e))
    }

    pub fn from_json(json: &str) -> Result<Self, String> {
        let snapshot: FarmSnapshot =
            serde_json::from_str(json).map_err(|e| format!("Deserialization failed: {}", e))?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(format!(
                "Unsupported snapshot version {} (expected {})",
                snapshot.version, SNAPSHOT_VERSION
            ));
        }
        Ok(snapshot)
    }

    /// Writes through a temp file so a crash never leaves a half-written save.
    pub fn write_to(&self, path: &Path) -> Result<(), String> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .map_err(|e| format!("Could not create {}: {}", dir.display(), e))?;
        }
        let json = self.to_json()?;
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, json)
            .map_err(|e| format!("Write failed for {}: {}", tmp_path.display(), e))?;
        fs::rename(&tmp_path, path).map_err(|e| format!("Rename failed: {}", e))?;
        Ok(())
    }

    pub fn read_from(path: &Path) -> Result<Self, String> {
        let json = fs::read_to_string(path)
            .map_err(|e| format!("Read failed for {}: {}", path.display(), e))?;
        Self::from_json(&json)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// EVENTS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Event, Debug, Clone)]
pub struct SaveRequestEvent {
    pub path: PathBuf,
}

#[derive(Event, Debug, Clone)]
pub struct LoadRequestEvent {
    pub path: PathBuf,
}

// ═══════════════════════════════════════════════════════════════════════
// PLUGIN
// ═══════════════════════════════════════════════════════════════════════

pub struct SavePlugin;

impl Plugin for SavePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FarmConfig>()
            .init_resource::<GameClock>()
            .init_resource::<TileGrid>()
            .init_resource::<HoldInteraction>()
            .init_resource::<WateringCan>()
            .add_event::<SaveRequestEvent>()
            .add_event::<LoadRequestEvent>()
            .add_event::<NewGameEvent>()
            .add_systems(
                Update,
                (handle_save_request, handle_load_request, handle_new_game),
            );
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SYSTEMS
// ═══════════════════════════════════════════════════════════════════════

fn handle_save_request(
    mut events: EventReader<SaveRequestEvent>,
    clock: Res<GameClock>,
    grid: Res<TileGrid>,
) {
    for event in events.read() {
        match FarmSnapshot::capture(&clock, &grid).write_to(&event.path) {
            Ok(()) => info!("[Save] Saved {} to {}", clock.formatted_time(), event.path.display()),
            Err(e) => warn!("[Save] {}", e),
        }
    }
}

fn handle_load_request(
    mut events: EventReader<LoadRequestEvent>,
    mut clock: ResMut<GameClock>,
    mut grid: ResMut<TileGrid>,
    mut hold: ResMut<HoldInteraction>,
) {
    for event in events.read() {
        match FarmSnapshot::read_from(&event.path) {
            Ok(snapshot) => {
                hold.cancel();
                snapshot.restore(&mut clock, &mut grid);
                info!(
                    "[Save] Loaded {} ({} tiles) from {}",
                    clock.formatted_time(),
                    grid.len(),
                    event.path.display()
                );
            }
            Err(e) => warn!("[Save] {}", e),
        }
    }
}

/// Restart the session: fresh clock from config, bare tiles, full can.
/// Farmland is part of the map and stays.
fn handle_new_game(
    mut events: EventReader<NewGameEvent>,
    config: Res<FarmConfig>,
    mut clock: ResMut<GameClock>,
    mut grid: ResMut<TileGrid>,
    mut hold: ResMut<HoldInteraction>,
    mut can: ResMut<WateringCan>,
) {
    if events.read().last().is_none() {
        return;
    }
    let was_frozen = clock.is_frozen;
    *clock = GameClock::from_config(&config);
    clock.is_frozen = was_frozen;
    grid.reset_tiles();
    hold.cancel();
    *can = WateringCan::from_config(&config);
    info!("[Save] New game started at {}", clock.formatted_time());
}
