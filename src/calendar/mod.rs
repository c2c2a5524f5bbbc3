//! Clock domain, the heartbeat of Tillfield.
//!
//! Responsible for:
//! - Converting real frame time into whole simulated minutes
//! - Rolling minutes into hours and hours into days
//! - Tracking night and sending DawnEvent / DuskEvent on the transitions
//! - Sending one MinuteTickEvent per simulated minute, in order
//! - Freezing / resuming time based on GameState
//!
//! The advance logic lives on `GameClock` itself so it can be driven without
//! an `App`. The `tick_clock` system only forwards the resulting signals.

use bevy::prelude::*;

use crate::shared::*;

/// Something the clock crossed during an advance, in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockSignal {
    NewDay(NewDayEvent),
    Dawn(DawnEvent),
    Dusk(DuskEvent),
    Minute(MinuteTickEvent),
}

pub struct CalendarPlugin;

impl Plugin for CalendarPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GameClock>()
            .add_event::<MinuteTickEvent>()
            .add_event::<NewDayEvent>()
            .add_event::<DawnEvent>()
            .add_event::<DuskEvent>()
            // Time runs only while Playing
            .add_systems(OnEnter(GameState::Playing), resume_time)
            .add_systems(OnExit(GameState::Playing), pause_time)
            // Core time tick, only while Playing and NOT frozen
            .add_systems(
                Update,
                tick_clock
                    .run_if(in_state(GameState::Playing))
                    .run_if(clock_not_frozen),
            );
    }
}

// ─── Clock arithmetic ─────────────────────────────────────────────────────────

/// Relative slack when deciding a minute has been crossed.
const MINUTE_TOLERANCE: f64 = 1e-9;

impl GameClock {
    /// Feed one frame of real time into the clock. Returns every signal the
    /// advance produced; a large delta yields one `Minute` per minute crossed.
    pub fn advance(&mut self, delta_seconds: f64) -> Vec<ClockSignal> {
        let mut signals = Vec::new();
        if self.is_frozen {
            return signals;
        }

        let delta = if delta_seconds.is_finite() { delta_seconds.max(0.0) } else { 0.0 };
        let scale = if self.time_scale.is_finite() { self.time_scale.max(0.0) } else { 0.0 };
        let unit = if self.seconds_per_game_minute > 0.0 {
            self.seconds_per_game_minute
        } else {
            1.0
        };

        self.elapsed_real_seconds += delta * scale;
        if !self.elapsed_real_seconds.is_finite() {
            self.elapsed_real_seconds = 0.0;
        }

        // Decimal frame deltas (0.1 s) sum to just under a whole minute in f64.
        let threshold = unit * (1.0 - MINUTE_TOLERANCE);
        while self.elapsed_real_seconds >= threshold {
            self.elapsed_real_seconds = (self.elapsed_real_seconds - unit).max(0.0);
            self.advance_one_minute(&mut signals);
        }
        signals
    }

    /// Advances the clock by exactly one simulated minute.
    fn advance_one_minute(&mut self, signals: &mut Vec<ClockSignal>) {
        self.minute += 1;

        if self.minute >= MINUTES_PER_HOUR {
            self.minute = 0;
            self.hour += 1;

            if self.hour >= HOURS_PER_DAY {
                self.hour = 0;
                self.day += 1;
                signals.push(ClockSignal::NewDay(NewDayEvent { day: self.day }));
            }

            self.check_time_triggers(signals);
        }

        signals.push(ClockSignal::Minute(MinuteTickEvent {
            day: self.day,
            hour: self.hour,
            minute: self.minute,
        }));
    }

    fn check_time_triggers(&mut self, signals: &mut Vec<ClockSignal>) {
        let night = self.night_at(self.hour);
        if night == self.is_night {
            return;
        }
        self.is_night = night;
        if night {
            signals.push(ClockSignal::Dusk(DuskEvent { day: self.day }));
        } else {
            signals.push(ClockSignal::Dawn(DawnEvent { day: self.day }));
        }
    }

    /// Negative and NaN scales stop time.
    pub fn set_time_scale(&mut self, scale: f64) {
        self.time_scale = if scale.is_finite() { scale.max(0.0) } else { 0.0 };
    }

    pub fn freeze(&mut self) {
        self.is_frozen = true;
    }

    pub fn resume(&mut self) {
        self.is_frozen = false;
    }
}

// ─── Run Conditions ───────────────────────────────────────────────────────────

fn clock_not_frozen(clock: Res<GameClock>) -> bool {
    !clock.is_frozen
}

// ─── State transition hooks ───────────────────────────────────────────────────

fn resume_time(mut clock: ResMut<GameClock>) {
    clock.resume();
    info!("[Clock] Time resumed at {}", clock.formatted_time());
}

fn pause_time(mut clock: ResMut<GameClock>) {
    clock.freeze();
    info!("[Clock] Time frozen at {}", clock.formatted_time());
}

// ─── Main time-tick system ────────────────────────────────────────────────────

/// Accumulates real delta-seconds and forwards every crossed boundary as an
/// event. Minute events go out in the order they happened so the farming
/// handler can replay them one at a time.
pub fn tick_clock(
    time: Res<Time>,
    mut clock: ResMut<GameClock>,
    mut minute_writer: EventWriter<MinuteTickEvent>,
    mut day_writer: EventWriter<NewDayEvent>,
    mut dawn_writer: EventWriter<DawnEvent>,
    mut dusk_writer: EventWriter<DuskEvent>,
) {
    for signal in clock.advance(time.delta_secs_f64()) {
        match signal {
            ClockSignal::Minute(ev) => {
                minute_writer.send(ev);
            }
            ClockSignal::NewDay(ev) => {
                info!("[Clock] New day: Day {}", ev.day);
                day_writer.send(ev);
            }
            ClockSignal::Dawn(ev) => {
                info!("[Clock] Dawn on Day {}", ev.day);
                dawn_writer.send(ev);
            }
            ClockSignal::Dusk(ev) => {
                info!("[Clock] Dusk on Day {}", ev.day);
                dusk_writer.send(ev);
            }
        }
    }
}
