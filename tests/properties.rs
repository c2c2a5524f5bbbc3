//! Property tests for the pure simulation core: frame batching must not
//! change what the clock and the grid engines produce, and grid mutations
//! guarded by their predicates must keep the tile invariants.
//!
//! Run with: `cargo test --test properties`

use proptest::prelude::*;
use tillfield::calendar::ClockSignal;
use tillfield::farming::{advance_growth, decay_water};
use tillfield::shared::*;

fn crop(minutes: u32) -> CropDef {
    CropDef {
        id: format!("crop_{}", minutes),
        name: "Test crop".into(),
        growth_duration_minutes: minutes,
        harvest_item: "produce".into(),
        harvest_yield: 1,
    }
}

/// A few tiles in different states: growing and watered, planted and dry,
/// watered bare soil, untouched farmland.
fn seeded_grid() -> TileGrid {
    let mut grid = TileGrid::default();
    grid.mark_farmable_rect(&FarmPlot { x: 0, y: 0, width: 4, height: 1 });

    let growing = TileCoord::new(0, 0);
    grid.set_tilled(growing, true);
    grid.plant(growing, crop(45));
    grid.set_watered(growing, true);

    let dry = TileCoord::new(1, 0);
    grid.set_tilled(dry, true);
    grid.plant(dry, crop(10));

    let bare = TileCoord::new(2, 0);
    grid.set_tilled(bare, true);
    grid.set_watered(bare, true);
    grid
}

fn tiles(grid: &TileGrid) -> Vec<(TileCoord, TileState)> {
    grid.iter().map(|(c, s)| (*c, s.clone())).collect()
}

/// Advances the clock by `delta`, replaying each minute into the grid the
/// way the farming handler does. Returns (minutes, completions, depletions).
fn drive(clock: &mut GameClock, grid: &mut TileGrid, delta: f64) -> (usize, usize, usize) {
    let mut counts = (0, 0, 0);
    for signal in clock.advance(delta) {
        if let ClockSignal::Minute(_) = signal {
            counts.0 += 1;
            counts.1 += advance_growth(grid).len();
            counts.2 += decay_water(grid).len();
        }
    }
    counts
}

proptest! {
    /// Quarter-second frames keep the arithmetic exact, so batched and
    /// single-shot runs must agree bit for bit.
    #[test]
    fn prop_frame_batching_does_not_change_outcome(
        quarters in prop::collection::vec(0u32..=240, 1..30),
        scale_quarters in 0u32..=16,
    ) {
        let scale = scale_quarters as f64 * 0.25;

        let mut batched_clock = GameClock::default();
        batched_clock.set_time_scale(scale);
        let mut batched_grid = seeded_grid();
        let mut batched = (0, 0, 0);
        for q in &quarters {
            let (m, c, d) = drive(&mut batched_clock, &mut batched_grid, *q as f64 * 0.25);
            batched = (batched.0 + m, batched.1 + c, batched.2 + d);
        }

        let total: u32 = quarters.iter().sum();
        let mut single_clock = GameClock::default();
        single_clock.set_time_scale(scale);
        let mut single_grid = seeded_grid();
        let single = drive(&mut single_clock, &mut single_grid, total as f64 * 0.25);

        prop_assert_eq!(batched, single);
        prop_assert_eq!(&batched_clock, &single_clock);
        prop_assert_eq!(tiles(&batched_grid), tiles(&single_grid));
        let expected_minutes = (total as f64 * 0.25 * scale).floor() as usize;
        prop_assert_eq!(batched.0, expected_minutes);
    }

    /// Tenth-second frames are not exact in binary; batched and single-shot
    /// runs must still cross the same whole minutes.
    #[test]
    fn prop_decimal_frames_cross_exact_minutes(
        tenths in prop::collection::vec(0u32..=600, 1..30),
        scale in 0u32..=8,
    ) {
        let mut batched_clock = GameClock::default();
        batched_clock.set_time_scale(scale as f64);
        let mut batched_grid = seeded_grid();
        let mut batched = (0, 0, 0);
        for t in &tenths {
            let (m, c, d) = drive(&mut batched_clock, &mut batched_grid, *t as f64 * 0.1);
            batched = (batched.0 + m, batched.1 + c, batched.2 + d);
        }

        let total: u32 = tenths.iter().sum();
        let mut single_clock = GameClock::default();
        single_clock.set_time_scale(scale as f64);
        let mut single_grid = seeded_grid();
        let single = drive(&mut single_clock, &mut single_grid, total as f64 / 10.0);

        let expected_minutes = (total * scale / 10) as usize;
        prop_assert_eq!(batched.0, expected_minutes);
        prop_assert_eq!(batched, single);
        prop_assert_eq!(
            (batched_clock.day, batched_clock.hour, batched_clock.minute, batched_clock.is_night),
            (single_clock.day, single_clock.hour, single_clock.minute, single_clock.is_night)
        );
        prop_assert!((batched_clock.elapsed_real_seconds - single_clock.elapsed_real_seconds).abs() < 1e-6);
        prop_assert_eq!(tiles(&batched_grid), tiles(&single_grid));
    }

    #[test]
    fn prop_clock_fields_stay_in_range(deltas in prop::collection::vec(0.0f64..5000.0, 1..20)) {
        let mut clock = GameClock::default();
        let mut last_day = clock.day;
        for delta in deltas {
            clock.advance(delta);
            prop_assert!(clock.minute < 60);
            prop_assert!(clock.hour < 24);
            prop_assert!(clock.day >= last_day);
            prop_assert_eq!(clock.is_night, clock.night_at(clock.hour));
            last_day = clock.day;
        }
    }

    /// Random interaction-style edits (each guarded by its predicate, as the
    /// interaction machine does) interleaved with simulated minutes.
    #[test]
    fn prop_guarded_edits_keep_tile_invariants(ops in prop::collection::vec((0u8..7, 0i32..3), 1..200)) {
        let mut grid = TileGrid::default();
        grid.mark_farmable_rect(&FarmPlot { x: 0, y: 0, width: 3, height: 1 });
        let seed = crop(20);

        for (op, x) in ops {
            let pos = TileCoord::new(x, 0);
            match op {
                0 if grid.can_till(pos) => grid.set_tilled(pos, true),
                1 if grid.can_water(pos) => { grid.set_watered(pos, true); }
                2 if grid.can_plant(pos, Some(&seed)) => grid.plant(pos, seed.clone()),
                3 if grid.can_harvest(pos) => { grid.harvest(pos); }
                4 => grid.set_tilled(pos, false),
                5 => { grid.set_watered(pos, true); }
                6 => {
                    for _ in 0..15 {
                        advance_growth(&mut grid);
                        decay_water(&mut grid);
                    }
                }
                _ => {}
            }

            for (coord, tile) in grid.iter() {
                prop_assert!(!tile.is_watered || tile.is_tilled, "watered but untilled at {}", coord);
                prop_assert_eq!(tile.is_watered, tile.water_minutes_remaining > 0);
                prop_assert!(tile.water_minutes_remaining <= WATER_MINUTES_PER_WATERING);
                if tile.planted_crop.is_some() {
                    prop_assert!(tile.is_tilled, "crop on untilled soil at {}", coord);
                }
                match &tile.planted_crop {
                    Some(c) => prop_assert!(tile.watered_minutes_accumulated <= c.growth_duration_minutes),
                    None => prop_assert_eq!(tile.watered_minutes_accumulated, 0),
                }
                let progress = tile.growth_progress();
                prop_assert!((0.0..=1.0).contains(&progress));
            }
        }
    }
}
