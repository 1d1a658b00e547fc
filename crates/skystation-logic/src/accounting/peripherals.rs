//! Peripheral phase: power every device, settle its consumables, roll wear.

use rand::Rng;

use super::{AccountingContext, CycleState};
use crate::events::GameEvent;
use crate::peripherals::ConsumableKind;
use crate::report::EntryTag;
use crate::station::Station;

pub(super) fn run(station: &mut Station, ctx: &mut AccountingContext<'_>, state: &mut CycleState) {
    let now = state.started_at;

    for idx in 0..station.peripherals.len() {
        let peripheral = &station.peripherals[idx];
        let id = peripheral.id;
        let spec = peripheral.spec();
        let draw = peripheral.power_consume();

        if draw == 0 {
            if peripheral.is_broken {
                state.report.broken_peripheral(id);
                state
                    .report
                    .note(EntryTag::Peripheral, format!("{} #{} is broken", spec.name, id));
            } else {
                state
                    .report
                    .note(EntryTag::Peripheral, format!("{} #{} is powered off", spec.name, id));
            }
            continue;
        }

        if !station.truss.consume_energy(draw) {
            state.report.problem(
                EntryTag::Energy,
                format!("Not enough energy to run {} #{} ({} needed)", spec.name, id, draw),
            );
            continue;
        }

        let missing: Vec<ConsumableKind> = spec
            .consumed()
            .filter(|&(kind, amount)| station.available(kind) < amount)
            .map(|(kind, _)| kind)
            .collect();
        if !missing.is_empty() {
            let names: Vec<String> = missing.iter().map(ToString::to_string).collect();
            state.report.problem(
                EntryTag::Peripheral,
                format!("{} #{} is missing {}", spec.name, id, names.join(", ")),
            );
            continue;
        }

        for (kind, amount) in spec.consumed() {
            station.debit(kind, amount);
        }
        for (kind, amount) in spec.produced() {
            let spill = station.credit(kind, amount);
            if spill > 0 {
                state.report.problem(
                    EntryTag::Storage,
                    format!("{} #{} spilled {} {}: no room left", spec.name, id, spill, kind),
                );
            }
        }

        let chance = station.peripherals[idx].break_chance(now);
        if chance > 0.0 && ctx.rng.gen_bool(chance) {
            station.peripherals[idx].is_broken = true;
            state.report.broken_peripheral(id);
            state
                .report
                .problem(EntryTag::Peripheral, format!("{} #{} broke down", spec.name, id));
            ctx.bus.post(GameEvent::PeripheralBroken { peripheral_id: id });
        }
    }
}
