//! Hold-to-act interaction machine.
//!
//! A press on a valid tile starts a hold. The hold is cancelled by release,
//! by the target moving (or being lost), or by the equipped tool changing.
//! Once the hold has lasted `hold_duration` real seconds the action is
//! re-validated against the grid and committed.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::shared::*;

// ═══════════════════════════════════════════════════════════════════════════
// Hold session
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum HoldPhase {
    #[default]
    Idle,
    Holding {
        tile: TileCoord,
        tool: ToolKind,
        elapsed: f32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelCause {
    Released,
    TargetChanged,
    ToolChanged,
    StateExited,
}

/// What a single frame of hold bookkeeping produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HoldStep {
    Idle,
    Holding,
    Cancelled(CancelCause),
    /// The hold finished; the machine is already back to Idle.
    Ready { tile: TileCoord, tool: ToolKind },
}

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct HoldInteraction {
    pub phase: HoldPhase,
    /// Real seconds a press must be held before committing.
    pub hold_duration: f32,
}

impl Default for HoldInteraction {
    fn default() -> Self {
        Self::from_config(&FarmConfig::default())
    }
}

impl HoldInteraction {
    pub fn from_config(config: &FarmConfig) -> Self {
        Self {
            phase: HoldPhase::Idle,
            hold_duration: config.interaction_hold_duration.max(0.0),
        }
    }

    pub fn is_interacting(&self) -> bool {
        matches!(self.phase, HoldPhase::Holding { .. })
    }

    pub fn active_tile(&self) -> Option<TileCoord> {
        match self.phase {
            HoldPhase::Holding { tile, .. } => Some(tile),
            HoldPhase::Idle => None,
        }
    }

    /// Hold completion in 0.0..=1.0, for a progress ring. Zero while idle.
    pub fn progress(&self) -> f32 {
        match self.phase {
            HoldPhase::Idle => 0.0,
            HoldPhase::Holding { .. } if self.hold_duration <= 0.0 => 1.0,
            HoldPhase::Holding { elapsed, .. } => (elapsed / self.hold_duration).clamp(0.0, 1.0),
        }
    }

    pub fn start(&mut self, tile: TileCoord, tool: ToolKind) {
        self.phase = HoldPhase::Holding { tile, tool, elapsed: 0.0 };
    }

    /// Drops any hold in progress. Returns true if there was one.
    pub fn cancel(&mut self) -> bool {
        let was_holding = self.is_interacting();
        self.phase = HoldPhase::Idle;
        was_holding
    }

    /// Advance the hold by `dt` real seconds against the current target and
    /// tool. Any change in either cancels the hold.
    pub fn update(&mut self, dt: f32, target: Option<TileCoord>, tool: Option<ToolKind>) -> HoldStep {
        let HoldPhase::Holding { tile, tool: start_tool, elapsed } = self.phase else {
            return HoldStep::Idle;
        };

        if target != Some(tile) {
            self.phase = HoldPhase::Idle;
            return HoldStep::Cancelled(CancelCause::TargetChanged);
        }
        if tool != Some(start_tool) {
            self.phase = HoldPhase::Idle;
            return HoldStep::Cancelled(CancelCause::ToolChanged);
        }

        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let elapsed = elapsed + dt;
        if elapsed >= self.hold_duration {
            self.phase = HoldPhase::Idle;
            return HoldStep::Ready { tile, tool: start_tool };
        }

        self.phase = HoldPhase::Holding { tile, tool: start_tool, elapsed };
        HoldStep::Holding
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Validation and commit
// ═══════════════════════════════════════════════════════════════════════════

/// Borrowed view of everything an action may read or write.
pub struct FarmAccess<'a> {
    pub grid: &'a mut TileGrid,
    pub inventory: &'a mut ResourceInventory,
    pub catalog: &'a CropCatalog,
    pub belt: &'a ToolBelt,
    pub can: &'a WateringCan,
}

/// A committed action and what it used up or produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Committed {
    Tilled,
    Watered { water_used: f32 },
    Planted { seed_item: ItemId, crop_id: CropId },
    Harvested { crop_id: CropId, item_id: ItemId, quantity: u32 },
}

impl Committed {
    pub fn change(&self) -> TileChange {
        match self {
            Committed::Tilled => TileChange::Tilled,
            Committed::Watered { .. } => TileChange::Watered,
            Committed::Planted { .. } => TileChange::Planted,
            Committed::Harvested { .. } => TileChange::Harvested,
        }
    }
}

fn selected_crop<'c>(belt: &ToolBelt, catalog: &'c CropCatalog) -> Result<&'c CropDef, RejectReason> {
    let seed = belt.selected_seed.as_deref().ok_or(RejectReason::NoSeedSelected)?;
    catalog.crop_for_seed(seed).ok_or_else(|| {
        warn!("[Interaction] Selected item '{}' has no crop in the catalog", seed);
        RejectReason::UnknownSeed(seed.to_string())
    })
}

/// The per-tool legality predicate. Used both to start a hold and to
/// re-validate it on completion.
pub fn tool_allows(
    tool: ToolKind,
    tile: TileCoord,
    grid: &TileGrid,
    catalog: &CropCatalog,
    belt: &ToolBelt,
) -> Result<(), RejectReason> {
    let allowed = match tool {
        ToolKind::Hoe => grid.can_till(tile),
        ToolKind::WateringCan => grid.can_water(tile),
        ToolKind::Seeds => grid.can_plant(tile, Some(selected_crop(belt, catalog)?)),
        ToolKind::Harvest => grid.can_harvest(tile),
    };
    if allowed {
        return Ok(());
    }
    Err(match tool {
        ToolKind::Hoe => RejectReason::CannotTill,
        ToolKind::WateringCan => RejectReason::CannotWater,
        ToolKind::Seeds => RejectReason::CannotPlant,
        ToolKind::Harvest => RejectReason::NothingToHarvest,
    })
}

/// Validate a press. On success returns the tile and tool to hold.
pub fn check_start(
    target: Option<TileCoord>,
    belt: &ToolBelt,
    grid: &TileGrid,
    catalog: &CropCatalog,
) -> Result<(TileCoord, ToolKind), RejectReason> {
    let tile = target.ok_or(RejectReason::NoTarget)?;
    let tool = belt.equipped.ok_or(RejectReason::NoToolEquipped)?;
    tool_allows(tool, tile, grid, catalog, belt)?;
    Ok((tile, tool))
}

/// Re-validate and apply a completed hold. On error nothing was mutated.
pub fn commit_action(tile: TileCoord, tool: ToolKind, farm: &mut FarmAccess) -> Result<Committed, RejectReason> {
    tool_allows(tool, tile, farm.grid, farm.catalog, farm.belt)?;

    match tool {
        ToolKind::Hoe => {
            farm.grid.set_tilled(tile, true);
            Ok(Committed::Tilled)
        }
        ToolKind::WateringCan => {
            if !farm.can.has_charge() {
                return Err(RejectReason::WateringCanEmpty);
            }
            farm.grid.set_watered(tile, true);
            Ok(Committed::Watered { water_used: farm.can.per_use })
        }
        ToolKind::Seeds => {
            let crop = selected_crop(farm.belt, farm.catalog)?.clone();
            let seed_item = farm.belt.selected_seed.clone().unwrap_or_default();
            if farm.inventory.count(&seed_item) == 0 {
                return Err(RejectReason::NoSeeds(seed_item));
            }
            if !farm.inventory.remove(&seed_item, 1) {
                return Err(RejectReason::SeedRemovalFailed(seed_item));
            }
            let crop_id = crop.id.clone();
            farm.grid.plant(tile, crop);
            Ok(Committed::Planted { seed_item, crop_id })
        }
        ToolKind::Harvest => {
            let crop = farm
                .grid
                .get(tile)
                .and_then(|t| t.planted_crop.clone())
                .ok_or(RejectReason::NothingToHarvest)?;
            // A zero-yield crop still clears; there is nothing to store.
            if crop.harvest_yield > 0 && !farm.inventory.add(&crop.harvest_item, crop.harvest_yield) {
                return Err(RejectReason::InventoryRejected(crop.harvest_item));
            }
            farm.grid.harvest(tile);
            Ok(Committed::Harvested {
                crop_id: crop.id,
                item_id: crop.harvest_item,
                quantity: crop.harvest_yield,
            })
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Systems
// ═══════════════════════════════════════════════════════════════════════════

/// Outbound notifications from the interaction machine.
#[derive(SystemParam)]
pub struct InteractionWriters<'w> {
    pub tile_changed: EventWriter<'w, TileChangedEvent>,
    pub rejected: EventWriter<'w, InteractionRejectedEvent>,
    pub water_consumed: EventWriter<'w, WaterConsumedEvent>,
    pub seed_consumed: EventWriter<'w, SeedConsumedEvent>,
    pub harvested: EventWriter<'w, CropHarvestedEvent>,
}

impl InteractionWriters<'_> {
    fn reject(&mut self, tile: Option<TileCoord>, tool: Option<ToolKind>, reason: RejectReason) {
        info!("[Interaction] {} ({:?} at {:?})", reason, tool, tile);
        self.rejected.send(InteractionRejectedEvent { tile, tool, reason });
    }

    fn committed(&mut self, tile: TileCoord, committed: Committed) {
        info!("[Interaction] {:?} at {}", committed.change(), tile);
        self.tile_changed.send(TileChangedEvent { tile, change: committed.change() });
        match committed {
            Committed::Tilled => {}
            Committed::Watered { water_used } => {
                self.water_consumed.send(WaterConsumedEvent { amount: water_used });
            }
            Committed::Planted { seed_item, .. } => {
                self.seed_consumed.send(SeedConsumedEvent { item_id: seed_item, quantity: 1 });
            }
            Committed::Harvested { crop_id, item_id, quantity } => {
                self.harvested.send(CropHarvestedEvent { tile, crop_id, item_id, quantity });
            }
        }
    }
}

/// Drives the hold machine once per frame: handles presses and releases in
/// order, then advances any hold by the frame delta.
#[allow(clippy::too_many_arguments)]
pub fn update_interaction(
    time: Res<Time>,
    mut interact_events: EventReader<InteractEvent>,
    target: Res<TargetedTile>,
    belt: Res<ToolBelt>,
    catalog: Res<CropCatalog>,
    can: Res<WateringCan>,
    mut hold: ResMut<HoldInteraction>,
    mut grid: ResMut<TileGrid>,
    mut inventory: ResMut<ResourceInventory>,
    mut writers: InteractionWriters,
) {
    let mut started_this_frame = false;

    for event in interact_events.read() {
        match event {
            InteractEvent::Pressed if !hold.is_interacting() => {
                match check_start(target.0, &belt, &grid, &catalog) {
                    Ok((tile, tool)) => {
                        hold.start(tile, tool);
                        started_this_frame = true;
                        debug!("[Interaction] Holding {} on {}", tool, tile);
                    }
                    Err(reason) => writers.reject(target.0, belt.equipped, reason),
                }
            }
            InteractEvent::Pressed => {}
            InteractEvent::Released => {
                if hold.cancel() {
                    debug!("[Interaction] Hold cancelled: {:?}", CancelCause::Released);
                }
            }
        }
    }

    // A hold begins with zero elapsed; the press frame's delta does not count.
    let dt = if started_this_frame { 0.0 } else { time.delta_secs() };

    match hold.update(dt, target.0, belt.equipped) {
        HoldStep::Idle | HoldStep::Holding => {}
        HoldStep::Cancelled(cause) => {
            debug!("[Interaction] Hold cancelled: {:?}", cause);
        }
        HoldStep::Ready { tile, tool } => {
            let mut farm = FarmAccess {
                grid: &mut *grid,
                inventory: &mut *inventory,
                catalog: &*catalog,
                belt: &*belt,
                can: &*can,
            };
            match commit_action(tile, tool, &mut farm) {
                Ok(committed) => writers.committed(tile, committed),
                Err(reason) => writers.reject(Some(tile), Some(tool), reason),
            }
        }
    }
}

/// Leaving Playing abandons whatever was being held.
pub fn cancel_hold_on_exit(mut hold: ResMut<HoldInteraction>) {
    if hold.cancel() {
        debug!("[Interaction] Hold cancelled: {:?}", CancelCause::StateExited);
    }
}
