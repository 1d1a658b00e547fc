//! Waste/water phase: store what inhabitants produced and write the
//! remaining water pool back into the tanks.

use super::CycleState;
use crate::report::EntryTag;
use crate::resources::Ingredient;
use crate::station::Station;

pub(super) fn run(station: &mut Station, state: &mut CycleState) {
    let (liquid, solid) = (state.waste_liquid, state.waste_solid);
    for (ingredient, amount) in [
        (Ingredient::WasteLiquid, liquid),
        (Ingredient::WasteSolid, solid),
    ] {
        if amount == 0 {
            continue;
        }
        let spill = station.truss.refill_containers(ingredient, amount);
        if spill > 0 {
            state.report.problem(
                EntryTag::Waste,
                format!("No room for {} {:?}, dumped overboard", spill, ingredient),
            );
        }
    }
    state.report.add_waste(liquid, solid);

    if let Some(pool) = state.water_pool {
        let spill = station.truss.reset_water_tanks(pool);
        if spill > 0 {
            state
                .report
                .problem(EntryTag::Water, format!("Water tanks overflowed by {}", spill));
        }
    }
}
