use bevy::prelude::*;

use crate::shared::*;
use super::TOOL_ORDER;

/// The tool after `current` in the given direction. With nothing equipped,
/// `Next` picks the first tool and `Previous` the last.
pub fn cycle_tool(current: Option<ToolKind>, direction: ToolCycleEvent) -> ToolKind {
    let len = TOOL_ORDER.len();
    let idx = match (current.and_then(|t| TOOL_ORDER.iter().position(|o| *o == t)), direction) {
        (Some(i), ToolCycleEvent::Next) => (i + 1) % len,
        (Some(i), ToolCycleEvent::Previous) => (i + len - 1) % len,
        (None, ToolCycleEvent::Next) => 0,
        (None, ToolCycleEvent::Previous) => len - 1,
    };
    TOOL_ORDER[idx]
}

/// Cycle the equipped tool forward or backward.
pub fn tool_cycle(mut events: EventReader<ToolCycleEvent>, mut belt: ResMut<ToolBelt>) {
    for &direction in events.read() {
        let next = cycle_tool(belt.equipped, direction);
        belt.equipped = Some(next);
        debug!("[Interaction] Equipped {}", next);
    }
}

/// Drain the watering can for every committed watering.
pub fn water_consumed_handler(
    mut events: EventReader<WaterConsumedEvent>,
    mut can: ResMut<WateringCan>,
) {
    for event in events.read() {
        can.consume(event.amount);
        if !can.has_charge() {
            info!("[Interaction] Watering can is empty");
        }
    }
}

pub fn refill_watering_can(
    mut events: EventReader<RefillWateringCanEvent>,
    mut can: ResMut<WateringCan>,
) {
    for event in events.read() {
        match event.amount {
            Some(amount) => can.refill(amount),
            None => can.refill_to_full(),
        }
        info!("[Interaction] Watering can at {:.0}/{:.0}", can.charge, can.capacity);
    }
}
