//! Modules/energy phase: solar charging, then the hourly draw of every
//! built module.

use super::CycleState;
use crate::report::EntryTag;
use crate::station::Station;

pub(super) fn run(station: &mut Station, state: &mut CycleState) {
    let solar = station.truss.solar_output();
    if solar > 0 {
        let wasted = station.truss.charge_batteries(solar);
        state
            .report
            .note(EntryTag::Energy, format!("Solar panels produced {}", solar));
        if wasted > 0 {
            state
                .report
                .note(EntryTag::Energy, format!("{} solar energy wasted, batteries full", wasted));
        }
    }

    let kinds: Vec<_> = station.module_kinds().collect();
    let mut unpowered = 0;
    let mut drawn = 0;
    for kind in kinds {
        if station.truss.consume_energy(kind.energy()) {
            drawn += kind.energy();
        } else {
            unpowered += 1;
        }
    }
    if unpowered > 0 {
        state.report.problem(
            EntryTag::Energy,
            format!(
                "{} modules went unpowered, {} energy left",
                unpowered,
                station.truss.total_energy()
            ),
        );
    } else if drawn > 0 {
        state
            .report
            .note(EntryTag::Energy, format!("Modules drew {} energy", drawn));
    }
}
