//! Headless demo: runs the farm simulation with an autopilot farmhand that
//! tills, plants, waters and harvests until the requested number of days
//! has passed.
//!
//! Usage: `tillfield [config.ron] [--days N] [--seed N]`

use std::path::PathBuf;
use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use tillfield::player::HoldInteraction;
use tillfield::shared::*;
use tillfield::{calendar, data, farming, player, save};

/// Seeds the farmhand starts with.
const STARTER_SEEDS: [(&str, u32); 3] = [("turnip_seeds", 15), ("radish_seeds", 10), ("potato_seeds", 5)];

/// Demo pacing when no config file is given: two simulated minutes per frame.
const DEMO_TIME_SCALE: f64 = 120.0;

struct DemoArgs {
    config: Option<PathBuf>,
    days: u32,
    seed: u64,
}

fn parse_args() -> Result<DemoArgs, String> {
    let mut args = DemoArgs { config: None, days: 3, seed: 42 };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--days" => {
                let value = iter.next().ok_or("--days needs a value")?;
                args.days = value.parse().map_err(|e| format!("Bad --days '{}': {}", value, e))?;
            }
            "--seed" => {
                let value = iter.next().ok_or("--seed needs a value")?;
                args.seed = value.parse().map_err(|e| format!("Bad --seed '{}': {}", value, e))?;
            }
            path => args.config = Some(PathBuf::from(path)),
        }
    }
    Ok(args)
}

fn main() {
    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };

    let config = match &args.config {
        Some(path) => match FarmConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(2);
            }
        },
        None => FarmConfig { time_scale: DEMO_TIME_SCALE, ..Default::default() },
    };

    App::new()
        .add_plugins(
            MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(1.0 / 60.0))),
        )
        .add_plugins(LogPlugin::default())
        .add_plugins(StatesPlugin)
        // Game state
        .init_state::<GameState>()
        .insert_resource(config)
        .insert_resource(Autopilot::new(args.seed, args.days))
        // Domain plugins
        .add_plugins(calendar::CalendarPlugin)
        .add_plugins(farming::FarmingPlugin)
        .add_plugins(player::PlayerPlugin)
        .add_plugins(save::SavePlugin)
        // Data loading
        .add_plugins(data::DataPlugin)
        .add_systems(OnEnter(GameState::Playing), stock_starter_seeds)
        .add_systems(
            Update,
            (
                autopilot_farmhand.before(player::interaction::update_interaction),
                report_harvests,
                stop_after_days,
            )
                .run_if(in_state(GameState::Playing)),
        )
        .run();
}

// ─── Autopilot ────────────────────────────────────────────────────────────────

#[derive(Resource)]
struct Autopilot {
    rng: StdRng,
    days: u32,
    seeded: bool,
    harvested: u32,
}

impl Autopilot {
    fn new(seed: u64, days: u32) -> Self {
        Self { rng: StdRng::seed_from_u64(seed), days, seeded: false, harvested: 0 }
    }
}

fn stock_starter_seeds(mut pilot: ResMut<Autopilot>, mut inventory: ResMut<ResourceInventory>) {
    if pilot.seeded {
        return;
    }
    for (item, qty) in STARTER_SEEDS {
        inventory.add(item, qty);
    }
    pilot.seeded = true;
}

/// Picks the next job by priority: harvest, water, plant, till. Within a
/// job the tile is chosen at random.
fn choose_job(
    grid: &TileGrid,
    inventory: &ResourceInventory,
    catalog: &CropCatalog,
    can: &WateringCan,
    rng: &mut StdRng,
) -> Option<(TileCoord, ToolKind, Option<ItemId>)> {
    let farmland: Vec<TileCoord> = grid.farmland().copied().collect();

    let ripe: Vec<TileCoord> = farmland.iter().copied().filter(|c| grid.can_harvest(*c)).collect();
    if let Some(tile) = ripe.choose(rng) {
        return Some((*tile, ToolKind::Harvest, None));
    }

    if can.has_charge() {
        let thirsty: Vec<TileCoord> = farmland
            .iter()
            .copied()
            .filter(|c| grid.has_crop(*c) && grid.can_water(*c))
            .collect();
        if let Some(tile) = thirsty.choose(rng) {
            return Some((*tile, ToolKind::WateringCan, None));
        }
    }

    let mut seeds: Vec<&ItemId> = catalog
        .seeds
        .keys()
        .filter(|id| inventory.has(id, 1))
        .collect();
    seeds.sort();
    if let Some(seed) = seeds.choose(rng).map(|s| (*s).clone()) {
        let crop = catalog.crop_for_seed(&seed);
        let open: Vec<TileCoord> = farmland
            .iter()
            .copied()
            .filter(|c| grid.can_plant(*c, crop))
            .collect();
        if let Some(tile) = open.choose(rng) {
            return Some((*tile, ToolKind::Seeds, Some(seed)));
        }
        let fresh: Vec<TileCoord> = farmland.iter().copied().filter(|c| grid.can_till(*c)).collect();
        if let Some(tile) = fresh.choose(rng) {
            return Some((*tile, ToolKind::Hoe, None));
        }
    }

    None
}

#[allow(clippy::too_many_arguments)]
fn autopilot_farmhand(
    mut pilot: ResMut<Autopilot>,
    hold: Res<HoldInteraction>,
    grid: Res<TileGrid>,
    inventory: Res<ResourceInventory>,
    catalog: Res<CropCatalog>,
    can: Res<WateringCan>,
    mut target: ResMut<TargetedTile>,
    mut belt: ResMut<ToolBelt>,
    mut interact: EventWriter<InteractEvent>,
    mut refill: EventWriter<RefillWateringCanEvent>,
) {
    if hold.is_interacting() {
        return;
    }
    if !can.has_charge() {
        refill.send(RefillWateringCanEvent { amount: None });
    }

    let Some((tile, tool, seed)) = choose_job(&grid, &inventory, &catalog, &can, &mut pilot.rng) else {
        return;
    };
    target.0 = Some(tile);
    belt.equipped = Some(tool);
    if seed.is_some() {
        belt.selected_seed = seed;
    }
    interact.send(InteractEvent::Pressed);
}

fn report_harvests(mut pilot: ResMut<Autopilot>, mut events: EventReader<CropHarvestedEvent>) {
    for event in events.read() {
        pilot.harvested += event.quantity;
        info!("[Demo] Harvested {}x {} at {}", event.quantity, event.item_id, event.tile);
    }
}

fn stop_after_days(
    pilot: Res<Autopilot>,
    mut days: EventReader<NewDayEvent>,
    inventory: Res<ResourceInventory>,
    mut exit: EventWriter<AppExit>,
) {
    for event in days.read() {
        if event.day > pilot.days {
            let mut items: Vec<_> = inventory.items.iter().collect();
            items.sort();
            info!("[Demo] Done after {} days, {} items harvested: {:?}", pilot.days, pilot.harvested, items);
            exit.send(AppExit::Success);
        }
    }
}
