//! Closing phases: antenna income, tank housekeeping and air top-up.

use super::{regulate_oxygen, AccountingContext, CycleState};
use crate::air::Gas;
use crate::events::GameEvent;
use crate::report::EntryTag;
use crate::resources::TankType;
use crate::station::Station;

/// Credit antenna income to the player, but only to a crewed station.
pub(super) fn collect_income(
    station: &mut Station,
    ctx: &mut AccountingContext<'_>,
    state: &mut CycleState,
) {
    if station.inhabitant_count() == 0 {
        return;
    }
    let income = station.truss.money_from_antenna();
    if income == 0 {
        return;
    }
    ctx.wallet.credit(income);
    state.report.set_income(income);
    state
        .report
        .note(EntryTag::Money, format!("Antenna brought in {} sky coins", income));
    ctx.bus.post(GameEvent::IncomeReceived { amount: income });
}

pub(super) fn run(station: &mut Station, ctx: &mut AccountingContext<'_>, state: &mut CycleState) {
    if ctx.settings.auto_merge_tanks {
        let empty = station.truss.merge_tanks();
        if ctx.settings.debug_accounting {
            log::debug!("merged tanks, {} left empty", empty);
        }
    }
    if ctx.settings.clear_empty_tanks {
        let removed = station.truss.clear_empty_tanks();
        if removed > 0 {
            state
                .report
                .note(EntryTag::Storage, format!("Threw away {} empty tanks", removed));
        }
    }

    top_up_air_volume(station, state);
    regulate_oxygen(station, &mut state.report);
}

/// Bring the air up to the volume the modules need, from air tanks first
/// and plain nitrogen after that.
fn top_up_air_volume(station: &mut Station, state: &mut CycleState) {
    let required = station.required_air_volume();
    let volume = station.air.volume();
    if volume >= required {
        return;
    }
    let missing = required - volume;

    let from_air = station.truss.charge_from(TankType::Air, missing);
    station.air.merge_with(from_air);
    let from_n2 = station.truss.charge_from(TankType::N2, missing - from_air);
    station.air.add(Gas::N2, from_n2);

    let added = from_air + from_n2;
    if added < missing {
        state.report.problem(
            EntryTag::Air,
            format!("Air volume is {} short of the {} the modules need", missing - added, required),
        );
    } else {
        state
            .report
            .note(EntryTag::Air, format!("Added {} air to fill the modules", added));
    }
}
