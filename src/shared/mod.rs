//! Shared components, resources, events, and states for Tillfield.
//!
//! This is the type contract. Every domain plugin imports from here.
//! No domain imports from any other domain directly.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::path::Path;

// ═══════════════════════════════════════════════════════════════════════
// GAME STATE — top-level state machine
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, States, Default)]
pub enum GameState {
    #[default]
    Loading,
    Playing,
    Paused,
    Menu,
    Dialogue,
    Cutscene,
}

// ═══════════════════════════════════════════════════════════════════════
// CONFIGURATION
// ═══════════════════════════════════════════════════════════════════════

/// A rectangle of farmable ground, in tile coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FarmPlot {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Tunables for the simulation core. Loaded from RON; every field has a
/// default so a config file only needs the values it overrides.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FarmConfig {
    /// Real seconds (before time scaling) per simulated minute.
    pub seconds_per_game_minute: f64,
    pub time_scale: f64,
    pub start_hour: u8,
    pub dawn_hour: u8,
    pub dusk_hour: u8,
    /// Real seconds an interaction must be held before it commits.
    pub interaction_hold_duration: f32,
    pub watering_can_capacity: f32,
    pub water_per_use: f32,
    pub farm_plots: Vec<FarmPlot>,
}

impl Default for FarmConfig {
    fn default() -> Self {
        Self {
            seconds_per_game_minute: 1.0,
            time_scale: 1.0,
            start_hour: 6,
            dawn_hour: DAWN_HOUR,
            dusk_hour: DUSK_HOUR,
            interaction_hold_duration: 0.1,
            watering_can_capacity: 100.0,
            water_per_use: 1.0,
            farm_plots: vec![FarmPlot { x: 0, y: 0, width: 16, height: 16 }],
        }
    }
}

impl FarmConfig {
    /// Parse a config from RON text. Out-of-range values are clamped.
    pub fn from_ron(text: &str) -> Result<Self, String> {
        ron::from_str::<FarmConfig>(text)
            .map(FarmConfig::sanitized)
            .map_err(|e| format!("Invalid farm config: {}", e))
    }

    pub fn load(path: &Path) -> Result<Self, String> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("Could not read {}: {}", path.display(), e))?;
        Self::from_ron(&text)
    }

    /// Clamp every field into its legal range. Never fails.
    pub fn sanitized(mut self) -> Self {
        let defaults = FarmConfig::default();
        if self.seconds_per_game_minute.is_nan() || self.seconds_per_game_minute <= 0.0 {
            self.seconds_per_game_minute = defaults.seconds_per_game_minute;
        }
        self.time_scale = self.time_scale.max(0.0);
        self.start_hour = self.start_hour.min(23);
        self.dawn_hour = self.dawn_hour.min(23);
        self.dusk_hour = self.dusk_hour.min(23);
        self.interaction_hold_duration = self.interaction_hold_duration.max(0.0);
        self.watering_can_capacity = self.watering_can_capacity.max(0.0);
        self.water_per_use = self.water_per_use.max(0.0);
        self
    }
}

// ═══════════════════════════════════════════════════════════════════════
// CLOCK
// ═══════════════════════════════════════════════════════════════════════

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameClock {
    pub day: u32,       // starts at 1
    pub hour: u8,       // 0-23
    pub minute: u8,     // 0-59
    pub time_scale: f64,
    pub is_frozen: bool,
    pub is_night: bool, // cached, refreshed on every hour change
    pub seconds_per_game_minute: f64,
    pub dawn_hour: u8,
    pub dusk_hour: u8,
    pub elapsed_real_seconds: f64, // accumulator for sub-minute ticks
}

impl Default for GameClock {
    fn default() -> Self {
        Self::from_config(&FarmConfig::default())
    }
}

impl GameClock {
    pub fn from_config(config: &FarmConfig) -> Self {
        let config = config.clone().sanitized();
        let mut clock = Self {
            day: 1,
            hour: config.start_hour,
            minute: 0,
            time_scale: config.time_scale,
            is_frozen: false,
            is_night: false,
            seconds_per_game_minute: config.seconds_per_game_minute,
            dawn_hour: config.dawn_hour,
            dusk_hour: config.dusk_hour,
            elapsed_real_seconds: 0.0,
        };
        clock.is_night = clock.night_at(clock.hour);
        clock
    }

    /// Night runs from dusk (inclusive) to dawn (exclusive), wrapping past
    /// midnight when dusk is later than dawn.
    pub fn night_at(&self, hour: u8) -> bool {
        if self.dusk_hour > self.dawn_hour {
            hour >= self.dusk_hour || hour < self.dawn_hour
        } else {
            hour >= self.dusk_hour && hour < self.dawn_hour
        }
    }

    /// HUD string, e.g. `Day 3 - 07:05`.
    pub fn formatted_time(&self) -> String {
        format!("Day {} - {:02}:{:02}", self.day, self.hour, self.minute)
    }

    /// Minutes elapsed since 00:00 on day 1.
    pub fn total_minutes(&self) -> u64 {
        (self.day.saturating_sub(1) as u64) * 24 * 60 + self.hour as u64 * 60 + self.minute as u64
    }
}

// ═══════════════════════════════════════════════════════════════════════
// CATALOG — crop and seed data, read-only during play
// ═══════════════════════════════════════════════════════════════════════

/// Unique identifier for every item type. String IDs for data-driven flexibility.
pub type ItemId = String;
pub type CropId = String;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropDef {
    pub id: CropId,
    pub name: String,
    pub growth_duration_minutes: u32,
    pub harvest_item: ItemId,
    pub harvest_yield: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedDef {
    pub item_id: ItemId,
    pub crop_id: CropId,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct CropCatalog {
    pub crops: HashMap<CropId, CropDef>,
    /// seed item → seed definition
    pub seeds: HashMap<ItemId, SeedDef>,
}

impl CropCatalog {
    pub fn insert_crop(&mut self, crop: CropDef) {
        self.crops.insert(crop.id.clone(), crop);
    }

    pub fn insert_seed(&mut self, seed: SeedDef) {
        if self.seeds.contains_key(&seed.item_id) {
            warn!("[Data] Duplicate seed item in catalog: {}", seed.item_id);
        }
        self.seeds.insert(seed.item_id.clone(), seed);
    }

    pub fn crop(&self, id: &str) -> Option<&CropDef> {
        self.crops.get(id)
    }

    /// Returns the crop a seed item grows into, if the item is a known seed.
    pub fn crop_for_seed(&self, seed_item: &str) -> Option<&CropDef> {
        self.seeds
            .get(seed_item)
            .and_then(|seed| self.crops.get(&seed.crop_id))
    }
}

// ═══════════════════════════════════════════════════════════════════════
// FARMING — tile grid
// ═══════════════════════════════════════════════════════════════════════

/// Simulated minutes a single watering lasts.
pub const WATER_MINUTES_PER_WATERING: u32 = 600;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: i32,
    pub y: i32,
}

impl TileCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TileState {
    pub is_tilled: bool,
    pub is_watered: bool,
    pub water_minutes_remaining: u32,
    pub planted_crop: Option<CropDef>,
    pub watered_minutes_accumulated: u32,
    /// Memo for the ripeness rising edge. Not persisted.
    #[serde(skip)]
    pub was_fully_grown_last_tick: bool,
}

impl TileState {
    pub fn has_crop(&self) -> bool {
        self.planted_crop.is_some()
    }

    /// How grown the crop is, 0.0 to 1.0. Zero when nothing is planted.
    pub fn growth_progress(&self) -> f32 {
        match &self.planted_crop {
            None => 0.0,
            Some(crop) if crop.growth_duration_minutes == 0 => 1.0,
            Some(crop) => {
                (self.watered_minutes_accumulated as f32 / crop.growth_duration_minutes as f32)
                    .clamp(0.0, 1.0)
            }
        }
    }

    pub fn is_ripe(&self) -> bool {
        self.planted_crop
            .as_ref()
            .is_some_and(|crop| self.watered_minutes_accumulated >= crop.growth_duration_minutes)
    }

    /// Updates the ripeness memo and returns true only on the tick the crop
    /// became ripe.
    pub fn take_ripening_edge(&mut self) -> bool {
        let now = self.is_ripe();
        let was = self.was_fully_grown_last_tick;
        self.was_fully_grown_last_tick = now;
        now && !was
    }

    fn clear_crop_and_water(&mut self) {
        self.planted_crop = None;
        self.watered_minutes_accumulated = 0;
        self.was_fully_grown_last_tick = false;
        self.is_watered = false;
        self.water_minutes_remaining = 0;
    }

    /// Force the tile back inside its invariants. Returns true if anything
    /// had to change.
    fn repair(&mut self) -> bool {
        let before = self.clone();
        if !self.is_tilled {
            self.clear_crop_and_water();
        }
        self.water_minutes_remaining = self.water_minutes_remaining.min(WATER_MINUTES_PER_WATERING);
        if !self.is_watered {
            self.water_minutes_remaining = 0;
        }
        if self.water_minutes_remaining == 0 {
            self.is_watered = false;
        }
        self.watered_minutes_accumulated = match &self.planted_crop {
            Some(crop) => self.watered_minutes_accumulated.min(crop.growth_duration_minutes),
            None => 0,
        };
        self.was_fully_grown_last_tick = before.was_fully_grown_last_tick;
        *self != before
    }
}

/// Sparse map of farm tiles. Tiles are created lazily and never deallocated
/// during a session, so a coordinate's identity is stable.
///
/// Mutations trust the caller: validate with the `can_*` predicates first.
/// Predicates never insert.
#[derive(Resource, Debug, Clone, Default)]
pub struct TileGrid {
    tiles: BTreeMap<TileCoord, TileState>,
    farmland: BTreeSet<TileCoord>,
}

impl TileGrid {
    // ── Farmland ─────────────────────────────────────────────────────────

    pub fn mark_farmable(&mut self, coord: TileCoord) {
        self.farmland.insert(coord);
    }

    /// Cells past the edge of the coordinate space are skipped.
    pub fn mark_farmable_rect(&mut self, plot: &FarmPlot) {
        for dy in 0..plot.height.max(0) {
            let Some(y) = plot.y.checked_add(dy) else { break };
            for dx in 0..plot.width.max(0) {
                let Some(x) = plot.x.checked_add(dx) else { break };
                self.farmland.insert(TileCoord::new(x, y));
            }
        }
    }

    pub fn is_farmable(&self, coord: TileCoord) -> bool {
        self.farmland.contains(&coord)
    }

    pub fn farmland(&self) -> impl Iterator<Item = &TileCoord> {
        self.farmland.iter()
    }

    // ── Queries ──────────────────────────────────────────────────────────

    pub fn get(&self, coord: TileCoord) -> Option<&TileState> {
        self.tiles.get(&coord)
    }

    pub fn get_or_create(&mut self, coord: TileCoord) -> &mut TileState {
        self.tiles.entry(coord).or_default()
    }

    /// Tiles in coordinate order.
    pub fn iter(&self) -> impl Iterator<Item = (&TileCoord, &TileState)> {
        self.tiles.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&TileCoord, &mut TileState)> {
        self.tiles.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn is_tilled(&self, coord: TileCoord) -> bool {
        self.get(coord).is_some_and(|t| t.is_tilled)
    }

    pub fn has_crop(&self, coord: TileCoord) -> bool {
        self.get(coord).is_some_and(TileState::has_crop)
    }

    // ── Validity predicates ──────────────────────────────────────────────

    pub fn can_till(&self, coord: TileCoord) -> bool {
        self.is_farmable(coord) && !self.is_tilled(coord) && !self.has_crop(coord)
    }

    pub fn can_water(&self, coord: TileCoord) -> bool {
        self.get(coord).is_some_and(|t| t.is_tilled && !t.is_watered)
    }

    pub fn can_plant(&self, coord: TileCoord, seed: Option<&CropDef>) -> bool {
        seed.is_some()
            && self
                .get(coord)
                .is_some_and(|t| t.is_tilled && !t.is_watered && !t.has_crop())
    }

    pub fn can_harvest(&self, coord: TileCoord) -> bool {
        self.get(coord).is_some_and(TileState::is_ripe)
    }

    // ── Mutations ────────────────────────────────────────────────────────

    /// Untilling is a destructive reset of crop, growth, and water state.
    pub fn set_tilled(&mut self, coord: TileCoord, tilled: bool) {
        let tile = self.get_or_create(coord);
        tile.is_tilled = tilled;
        if !tilled {
            tile.clear_crop_and_water();
        }
    }

    /// Returns false (and changes nothing) when asked to water untilled soil.
    pub fn set_watered(&mut self, coord: TileCoord, watered: bool) -> bool {
        let tile = self.get_or_create(coord);
        if watered && !tile.is_tilled {
            warn!("[Farming] Tried to water untilled tile at {}", coord);
            return false;
        }
        tile.is_watered = watered;
        tile.water_minutes_remaining = if watered { WATER_MINUTES_PER_WATERING } else { 0 };
        true
    }

    pub fn plant(&mut self, coord: TileCoord, crop: CropDef) {
        let tile = self.get_or_create(coord);
        tile.planted_crop = Some(crop);
        tile.watered_minutes_accumulated = 0;
        tile.was_fully_grown_last_tick = false;
    }

    /// Clears the crop and returns the tile to raw ground. Yields the crop
    /// that was growing there, if any.
    pub fn harvest(&mut self, coord: TileCoord) -> Option<CropDef> {
        let tile = self.get_or_create(coord);
        let crop = tile.planted_crop.take();
        tile.clear_crop_and_water();
        tile.is_tilled = false;
        crop
    }

    pub fn remove(&mut self, coord: TileCoord) {
        *self.get_or_create(coord) = TileState::default();
    }

    /// Drops every tile state, keeping the farmland layout. New game only.
    pub fn reset_tiles(&mut self) {
        self.tiles.clear();
    }

    /// Replace all tiles, repairing any state the mutations could never have
    /// produced and recomputing the ripeness memo.
    pub fn restore_tiles(&mut self, tiles: impl IntoIterator<Item = (TileCoord, TileState)>) {
        self.tiles = tiles
            .into_iter()
            .map(|(coord, mut state)| {
                if state.repair() {
                    warn!("[Farming] Repaired inconsistent tile state at {}", coord);
                }
                state.was_fully_grown_last_tick = state.is_ripe();
                (coord, state)
            })
            .collect();
    }

    pub fn restore_farmland(&mut self, farmland: impl IntoIterator<Item = TileCoord>) {
        self.farmland = farmland.into_iter().collect();
    }
}

// ═══════════════════════════════════════════════════════════════════════
// TOOLS & INVENTORY
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolKind {
    Hoe,
    WateringCan,
    Seeds,
    Harvest,
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ToolKind::Hoe => "hoe",
            ToolKind::WateringCan => "watering can",
            ToolKind::Seeds => "seeds",
            ToolKind::Harvest => "harvest",
        };
        f.write_str(name)
    }
}

/// What the actor currently has in hand. Written by the external tool
/// selector; read by the interaction machine every frame.
#[derive(Resource, Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolBelt {
    pub equipped: Option<ToolKind>,
    pub selected_seed: Option<ItemId>,
}

#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct WateringCan {
    pub charge: f32,
    pub capacity: f32,
    pub per_use: f32,
}

impl Default for WateringCan {
    fn default() -> Self {
        Self::from_config(&FarmConfig::default())
    }
}

impl WateringCan {
    pub fn from_config(config: &FarmConfig) -> Self {
        let config = config.clone().sanitized();
        Self {
            charge: config.watering_can_capacity,
            capacity: config.watering_can_capacity,
            per_use: config.water_per_use,
        }
    }

    pub fn has_charge(&self) -> bool {
        self.charge >= self.per_use
    }

    /// Capacity as a legal clamp bound, even if the field was set by hand.
    fn limit(&self) -> f32 {
        self.capacity.max(0.0)
    }

    pub fn consume(&mut self, amount: f32) {
        self.charge = (self.charge - amount.max(0.0)).clamp(0.0, self.limit());
    }

    pub fn refill(&mut self, amount: f32) {
        self.charge = (self.charge + amount.max(0.0)).clamp(0.0, self.limit());
    }

    pub fn refill_to_full(&mut self) {
        self.charge = self.limit();
    }
}

/// Resource inventory for seeds, crops, and materials.
#[derive(Resource, Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceInventory {
    pub items: HashMap<ItemId, u32>,
}

impl ResourceInventory {
    /// Returns false for a zero quantity.
    pub fn add(&mut self, item_id: &str, quantity: u32) -> bool {
        if quantity == 0 {
            return false;
        }
        *self.items.entry(item_id.to_string()).or_insert(0) += quantity;
        true
    }

    /// Removes all-or-nothing. Returns false if there are not enough.
    pub fn remove(&mut self, item_id: &str, quantity: u32) -> bool {
        if quantity == 0 {
            return false;
        }
        let Some(current) = self.items.get_mut(item_id) else {
            return false;
        };
        if *current < quantity {
            return false;
        }
        *current -= quantity;
        if *current == 0 {
            self.items.remove(item_id);
        }
        true
    }

    pub fn count(&self, item_id: &str) -> u32 {
        self.items.get(item_id).copied().unwrap_or(0)
    }

    pub fn has(&self, item_id: &str, quantity: u32) -> bool {
        self.count(item_id) >= quantity
    }
}

/// The tile the external targeting collaborator currently points at.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TargetedTile(pub Option<TileCoord>);

// ═══════════════════════════════════════════════════════════════════════
// EVENTS — inbound from collaborators
// ═══════════════════════════════════════════════════════════════════════

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractEvent {
    Pressed,
    Released,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolCycleEvent {
    Next,
    Previous,
}

/// `None` refills to capacity.
#[derive(Event, Debug, Clone, Copy)]
pub struct RefillWateringCanEvent {
    pub amount: Option<f32>,
}

/// Re-initialises the clock and tile states from the active config.
#[derive(Event, Debug, Clone, Default)]
pub struct NewGameEvent;

// ═══════════════════════════════════════════════════════════════════════
// EVENTS — outbound notifications
// ═══════════════════════════════════════════════════════════════════════

/// One per simulated minute, carrying the time after the advance.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinuteTickEvent {
    pub day: u32,
    pub hour: u8,
    pub minute: u8,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewDayEvent {
    pub day: u32,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DawnEvent {
    pub day: u32,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuskEvent {
    pub day: u32,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaterDepletedEvent {
    pub tile: TileCoord,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropCompletedEvent {
    pub tile: TileCoord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileChange {
    Tilled,
    Watered,
    Planted,
    Harvested,
}

/// Sent after every committed interaction so overlays can refresh.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileChangedEvent {
    pub tile: TileCoord,
    pub change: TileChange,
}

#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct WaterConsumedEvent {
    pub amount: f32,
}

#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct SeedConsumedEvent {
    pub item_id: ItemId,
    pub quantity: u32,
}

#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct CropHarvestedEvent {
    pub tile: TileCoord,
    pub crop_id: CropId,
    pub item_id: ItemId,
    pub quantity: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectKind {
    InvalidAction,
    ResourceInsufficient,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    NoTarget,
    NoToolEquipped,
    CannotTill,
    CannotWater,
    CannotPlant,
    NothingToHarvest,
    NoSeedSelected,
    UnknownSeed(ItemId),
    NoSeeds(ItemId),
    SeedRemovalFailed(ItemId),
    WateringCanEmpty,
    InventoryRejected(ItemId),
}

impl RejectReason {
    pub fn kind(&self) -> RejectKind {
        match self {
            RejectReason::NoSeeds(_)
            | RejectReason::SeedRemovalFailed(_)
            | RejectReason::WateringCanEmpty
            | RejectReason::InventoryRejected(_) => RejectKind::ResourceInsufficient,
            _ => RejectKind::InvalidAction,
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::NoTarget => f.write_str("No valid tile"),
            RejectReason::NoToolEquipped => f.write_str("No tool selected"),
            RejectReason::CannotTill => f.write_str("Can't till here"),
            RejectReason::CannotWater => f.write_str("Can't water here"),
            RejectReason::CannotPlant => f.write_str("Can't plant here"),
            RejectReason::NothingToHarvest => f.write_str("Nothing to harvest"),
            RejectReason::NoSeedSelected => f.write_str("No seed selected"),
            RejectReason::UnknownSeed(id) => write!(f, "'{}' is not a seed", id),
            RejectReason::NoSeeds(id) => write!(f, "No {} available", id),
            RejectReason::SeedRemovalFailed(id) => write!(f, "Failed to consume {}", id),
            RejectReason::WateringCanEmpty => f.write_str("Watering can is empty"),
            RejectReason::InventoryRejected(id) => write!(f, "Inventory refused {}", id),
        }
    }
}

/// Feedback for the UI/log collaborator. Never fatal.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct InteractionRejectedEvent {
    pub tile: Option<TileCoord>,
    pub tool: Option<ToolKind>,
    pub reason: RejectReason,
}

// ═══════════════════════════════════════════════════════════════════════
// CONSTANTS
// ═══════════════════════════════════════════════════════════════════════

pub const DAWN_HOUR: u8 = 6;
pub const DUSK_HOUR: u8 = 18;
pub const MINUTES_PER_HOUR: u8 = 60;
pub const HOURS_PER_DAY: u8 = 24;

// ═══════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn turnip(minutes: u32) -> CropDef {
        CropDef {
            id: "turnip".into(),
            name: "Turnip".into(),
            growth_duration_minutes: minutes,
            harvest_item: "turnip".into(),
            harvest_yield: 2,
        }
    }

    fn farm() -> TileGrid {
        let mut grid = TileGrid::default();
        grid.mark_farmable_rect(&FarmPlot { x: 0, y: 0, width: 4, height: 4 });
        grid
    }

    #[test]
    fn test_untilling_resets_everything() {
        let mut grid = farm();
        let pos = TileCoord::new(1, 1);
        grid.set_tilled(pos, true);
        grid.set_watered(pos, true);
        grid.plant(pos, turnip(10));
        grid.get_or_create(pos).watered_minutes_accumulated = 7;

        grid.set_tilled(pos, false);

        let tile = grid.get(pos).unwrap();
        assert!(!tile.is_tilled);
        assert!(!tile.is_watered);
        assert_eq!(tile.water_minutes_remaining, 0);
        assert!(tile.planted_crop.is_none());
        assert_eq!(tile.watered_minutes_accumulated, 0);
    }

    #[test]
    fn test_watering_untilled_is_rejected() {
        let mut grid = farm();
        let pos = TileCoord::new(2, 2);
        assert!(!grid.can_water(pos));
        assert!(!grid.set_watered(pos, true));
        let tile = grid.get(pos).unwrap();
        assert!(!tile.is_watered);
        assert_eq!(tile.water_minutes_remaining, 0);
    }

    #[test]
    fn test_watering_sets_fixed_duration() {
        let mut grid = farm();
        let pos = TileCoord::new(0, 0);
        grid.set_tilled(pos, true);
        assert!(grid.set_watered(pos, true));
        assert_eq!(grid.get(pos).unwrap().water_minutes_remaining, WATER_MINUTES_PER_WATERING);
        assert!(grid.set_watered(pos, false));
        assert_eq!(grid.get(pos).unwrap().water_minutes_remaining, 0);
    }

    #[test]
    fn test_predicates_do_not_insert() {
        let grid = farm();
        let pos = TileCoord::new(3, 3);
        assert!(grid.can_till(pos));
        assert!(!grid.can_water(pos));
        assert!(!grid.can_plant(pos, Some(&turnip(5))));
        assert!(!grid.can_harvest(pos));
        assert!(grid.is_empty());
    }

    #[test]
    fn test_can_till_requires_farmland() {
        let grid = farm();
        assert!(!grid.can_till(TileCoord::new(10, 10)));
        assert!(grid.can_till(TileCoord::new(0, 3)));
    }

    #[test]
    fn test_can_plant_rules() {
        let mut grid = farm();
        let pos = TileCoord::new(1, 2);
        let crop = turnip(5);
        assert!(!grid.can_plant(pos, Some(&crop)), "untilled");

        grid.set_tilled(pos, true);
        assert!(grid.can_plant(pos, Some(&crop)));
        assert!(!grid.can_plant(pos, None), "no seed");

        grid.set_watered(pos, true);
        assert!(!grid.can_plant(pos, Some(&crop)), "watered soil");

        grid.set_watered(pos, false);
        grid.plant(pos, crop.clone());
        assert!(!grid.can_plant(pos, Some(&crop)), "already planted");
        assert!(!grid.can_till(pos));
    }

    #[test]
    fn test_harvest_returns_tile_to_raw_ground() {
        let mut grid = farm();
        let pos = TileCoord::new(0, 1);
        grid.set_tilled(pos, true);
        grid.plant(pos, turnip(3));
        grid.get_or_create(pos).watered_minutes_accumulated = 3;
        assert!(grid.can_harvest(pos));

        let crop = grid.harvest(pos);
        assert_eq!(crop.map(|c| c.id), Some("turnip".to_string()));
        assert_eq!(grid.get(pos).unwrap(), &TileState::default());
        assert!(grid.can_till(pos));
    }

    #[test]
    fn test_remove_resets_but_keeps_entry() {
        let mut grid = farm();
        let pos = TileCoord::new(2, 0);
        grid.set_tilled(pos, true);
        grid.remove(pos);
        assert_eq!(grid.len(), 1);
        assert_eq!(grid.get(pos).unwrap(), &TileState::default());
    }

    #[test]
    fn test_growth_progress_and_ripeness() {
        let mut tile = TileState::default();
        assert_eq!(tile.growth_progress(), 0.0);
        assert!(!tile.is_ripe());

        tile.planted_crop = Some(turnip(10));
        tile.watered_minutes_accumulated = 5;
        assert!((tile.growth_progress() - 0.5).abs() < f32::EPSILON);
        assert!(!tile.is_ripe());

        tile.watered_minutes_accumulated = 10;
        assert_eq!(tile.growth_progress(), 1.0);
        assert!(tile.is_ripe());
    }

    #[test]
    fn test_ripening_edge_fires_once() {
        let mut tile = TileState {
            planted_crop: Some(turnip(1)),
            watered_minutes_accumulated: 1,
            ..Default::default()
        };
        assert!(tile.take_ripening_edge());
        assert!(!tile.take_ripening_edge());
    }

    #[test]
    fn test_restore_recomputes_ripeness_memo() {
        let mut grid = farm();
        let ripe = TileState {
            is_tilled: true,
            planted_crop: Some(turnip(2)),
            watered_minutes_accumulated: 2,
            ..Default::default()
        };
        grid.restore_tiles([(TileCoord::new(0, 0), ripe)]);
        assert!(grid.get(TileCoord::new(0, 0)).unwrap().was_fully_grown_last_tick);
    }

    #[test]
    fn test_restore_repairs_impossible_tiles() {
        let mut grid = farm();
        let wet_untilled = TileState {
            is_watered: true,
            water_minutes_remaining: 300,
            planted_crop: Some(turnip(5)),
            watered_minutes_accumulated: 3,
            ..Default::default()
        };
        let dry_with_water = TileState {
            is_tilled: true,
            water_minutes_remaining: 40,
            ..Default::default()
        };
        let overgrown = TileState {
            is_tilled: true,
            is_watered: true,
            water_minutes_remaining: 5000,
            planted_crop: Some(turnip(5)),
            watered_minutes_accumulated: 90,
            ..Default::default()
        };
        let soaked_nothing = TileState {
            is_tilled: true,
            is_watered: true,
            water_minutes_remaining: 0,
            watered_minutes_accumulated: 12,
            ..Default::default()
        };
        grid.restore_tiles([
            (TileCoord::new(0, 0), wet_untilled),
            (TileCoord::new(1, 0), dry_with_water),
            (TileCoord::new(2, 0), overgrown),
            (TileCoord::new(3, 0), soaked_nothing),
        ]);

        assert_eq!(grid.get(TileCoord::new(0, 0)).unwrap(), &TileState::default());

        let dry = grid.get(TileCoord::new(1, 0)).unwrap();
        assert!(dry.is_tilled);
        assert!(!dry.is_watered);
        assert_eq!(dry.water_minutes_remaining, 0);

        let grown = grid.get(TileCoord::new(2, 0)).unwrap();
        assert_eq!(grown.water_minutes_remaining, WATER_MINUTES_PER_WATERING);
        assert_eq!(grown.watered_minutes_accumulated, 5);
        assert!(grown.was_fully_grown_last_tick);

        let bare = grid.get(TileCoord::new(3, 0)).unwrap();
        assert!(!bare.is_watered);
        assert_eq!(bare.watered_minutes_accumulated, 0);
    }

    #[test]
    fn test_plot_at_coordinate_edge_is_clipped() {
        let mut grid = TileGrid::default();
        grid.mark_farmable_rect(&FarmPlot { x: i32::MAX, y: 0, width: 2, height: 1 });
        assert_eq!(grid.farmland().count(), 1);
        assert!(grid.is_farmable(TileCoord::new(i32::MAX, 0)));

        grid.mark_farmable_rect(&FarmPlot { x: -1, y: i32::MAX - 1, width: 2, height: 4 });
        assert_eq!(grid.farmland().count(), 5);
        assert!(grid.is_farmable(TileCoord::new(0, i32::MAX)));
    }

    #[test]
    fn test_clock_night_window_wraps_midnight() {
        let clock = GameClock::default();
        assert!(!clock.night_at(6));
        assert!(!clock.night_at(17));
        assert!(clock.night_at(18));
        assert!(clock.night_at(23));
        assert!(clock.night_at(0));
        assert!(clock.night_at(5));
    }

    #[test]
    fn test_clock_formatted_time() {
        let mut clock = GameClock::default();
        clock.day = 3;
        clock.hour = 7;
        clock.minute = 5;
        assert_eq!(clock.formatted_time(), "Day 3 - 07:05");
    }

    #[test]
    fn test_config_from_ron_overrides_and_clamps() {
        let config = FarmConfig::from_ron(
            "(time_scale: -4.0, dusk_hour: 40, interaction_hold_duration: 0.5)",
        )
        .unwrap();
        assert_eq!(config.time_scale, 0.0);
        assert_eq!(config.dusk_hour, 23);
        assert_eq!(config.interaction_hold_duration, 0.5);
        assert_eq!(config.dawn_hour, DAWN_HOUR);
    }

    #[test]
    fn test_config_rejects_garbage() {
        let err = FarmConfig::from_ron("(time_scale: \"fast\")").unwrap_err();
        assert!(err.starts_with("Invalid farm config"));
    }

    #[test]
    fn test_inventory_remove_is_all_or_nothing() {
        let mut inv = ResourceInventory::default();
        assert!(inv.add("turnip_seeds", 2));
        assert!(!inv.remove("turnip_seeds", 3));
        assert_eq!(inv.count("turnip_seeds"), 2);
        assert!(inv.remove("turnip_seeds", 2));
        assert_eq!(inv.count("turnip_seeds"), 0);
        assert!(!inv.items.contains_key("turnip_seeds"));
        assert!(!inv.add("turnip_seeds", 0));
    }

    #[test]
    fn test_watering_can_clamps() {
        let mut can = WateringCan { charge: 1.5, capacity: 10.0, per_use: 1.0 };
        can.consume(1.0);
        assert!(!can.has_charge());
        can.consume(5.0);
        assert_eq!(can.charge, 0.0);
        can.refill(50.0);
        assert_eq!(can.charge, 10.0);
    }

    #[test]
    fn test_watering_can_from_bad_config_is_clamped() {
        let config = FarmConfig {
            watering_can_capacity: -5.0,
            water_per_use: -1.0,
            ..Default::default()
        };
        let mut can = WateringCan::from_config(&config);
        assert_eq!(can.capacity, 0.0);
        assert_eq!(can.charge, 0.0);
        assert_eq!(can.per_use, 0.0);
        can.refill(1.0);
        can.consume(1.0);
        assert_eq!(can.charge, 0.0);

        let mut hand_built = WateringCan { charge: 3.0, capacity: -2.0, per_use: 1.0 };
        hand_built.refill(1.0);
        assert_eq!(hand_built.charge, 0.0);
    }

    #[test]
    fn test_reject_reason_kinds() {
        assert_eq!(RejectReason::CannotTill.kind(), RejectKind::InvalidAction);
        assert_eq!(
            RejectReason::NoSeeds("turnip_seeds".into()).kind(),
            RejectKind::ResourceInsufficient
        );
        assert_eq!(RejectReason::NoSeeds("turnip_seeds".into()).to_string(), "No turnip_seeds available");
    }
}
