//! Bio-box phase: drive every box in every bio module by its mode.

use super::{AccountingContext, CycleState};
use crate::biobox::{BioBox, BioBoxMode};
use crate::constants::bio::{GROW_ENERGY_PER_BIRTH, MULTIPLY_ENERGY};
use crate::events::GameEvent;
use crate::report::EntryTag;
use crate::station::Station;
use crate::truss::Truss;

pub(super) fn run(station: &mut Station, ctx: &mut AccountingContext<'_>, state: &mut CycleState) {
    let Station {
        bio_modules, truss, ..
    } = station;

    for bio_box in bio_modules.iter_mut().flat_map(|m| m.boxes.iter_mut()) {
        match bio_box.mode {
            BioBoxMode::Grow => grow(bio_box, truss, ctx, state),
            BioBoxMode::Multiply => multiply(bio_box, truss, state),
            // driven from outside the hourly cycle
            BioBoxMode::Evolve | BioBoxMode::Serving => {}
        }
    }
}

fn grow(
    bio_box: &mut BioBox,
    truss: &mut Truss,
    ctx: &mut AccountingContext<'_>,
    state: &mut CycleState,
) {
    if bio_box.is_full() {
        return;
    }

    let born = if bio_box.population.is_empty() {
        1
    } else {
        let born = bio_box.newborn_count();
        let cost = born as u32 * GROW_ENERGY_PER_BIRTH;
        if !truss.consume_energy(cost) {
            state.report.problem(
                EntryTag::BioBox,
                format!("Bio-box #{} needs {} energy to grow", bio_box.id, cost),
            );
            return;
        }
        born
    };

    let found = bio_box.add_newborns(born, &mut *ctx.rng);
    state.report.note(
        EntryTag::BioBox,
        format!(
            "Bio-box #{} grew by {} to {}/{}",
            bio_box.id,
            born,
            bio_box.population.len(),
            bio_box.population_limit
        ),
    );
    if found {
        state
            .report
            .note(EntryTag::BioBox, format!("Bio-box #{} found its perfect DNA", bio_box.id));
        ctx.bus.post(GameEvent::PerfectDnaFound { box_id: bio_box.id });
    }
}

fn multiply(bio_box: &mut BioBox, truss: &mut Truss, state: &mut CycleState) {
    if bio_box.is_full() {
        return;
    }
    if !truss.consume_energy(MULTIPLY_ENERGY) {
        state.report.problem(
            EntryTag::BioBox,
            format!("Bio-box #{} needs {} energy to multiply", bio_box.id, MULTIPLY_ENERGY),
        );
        return;
    }
    match bio_box.multiply_perfect() {
        Some(size) => state.report.note(
            EntryTag::BioBox,
            format!("Bio-box #{} multiplied to {}", bio_box.id, size),
        ),
        None => state.report.note(
            EntryTag::BioBox,
            format!("Bio-box #{} has no perfect DNA to multiply", bio_box.id),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventLog;
    use crate::modules::BioModule;
    use crate::resources::Battery;
    use crate::settings::AccountingSettings;
    use crate::wallet::Player;
    use chrono::{TimeZone, Utc};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn station_with(bio_box: BioBox, energy: u32) -> Station {
        let mut s = Station::new(Utc.with_ymd_and_hms(2040, 3, 6, 12, 0, 0).unwrap());
        s.truss.batteries.push(Battery::full(energy));
        s.bio_modules.push(BioModule {
            id: 1,
            name: "Bio".into(),
            boxes: vec![bio_box],
        });
        s
    }

    fn run_phase(station: &mut Station, bus: &mut EventLog) -> CycleState {
        let settings = AccountingSettings::default();
        let mut player = Player::default();
        let mut rng = StdRng::seed_from_u64(42);
        let mut ctx = AccountingContext::new(&settings, &mut player, bus, &mut rng);
        let mut state = CycleState::new(station, station.accounting_date);
        run(station, &mut ctx, &mut state);
        state
    }

    fn population(station: &Station) -> usize {
        station.bio_modules[0].boxes[0].population.len()
    }

    #[test]
    fn test_empty_box_is_seeded() {
        let mut s = station_with(BioBox::new(1, "ABCDEF", 20), 100);
        run_phase(&mut s, &mut EventLog::new());
        assert_eq!(population(&s), 1);
        assert_eq!(s.truss.total_energy(), 100);
    }

    #[test]
    fn test_growth_costs_energy_per_birth() {
        let mut b = BioBox::new(1, "ABCDEF", 20);
        b.population = vec!["AAAAAA".into(); 2];
        let mut s = station_with(b, 100);
        run_phase(&mut s, &mut EventLog::new());
        assert_eq!(population(&s), 6);
        assert_eq!(s.truss.total_energy(), 60);
    }

    #[test]
    fn test_growth_without_energy_fails() {
        let mut b = BioBox::new(1, "ABCDEF", 20);
        b.population = vec!["AAAAAA".into(); 2];
        let mut s = station_with(b, 5);
        let state = run_phase(&mut s, &mut EventLog::new());
        assert_eq!(population(&s), 2);
        assert_eq!(state.report.problems_tagged(EntryTag::BioBox).count(), 1);
    }

    #[test]
    fn test_full_box_unchanged_in_every_mode() {
        for mode in [
            BioBoxMode::Grow,
            BioBoxMode::Evolve,
            BioBoxMode::Multiply,
            BioBoxMode::Serving,
        ] {
            let mut b = BioBox::new(1, "ABCDEF", 4);
            b.mode = mode;
            b.population = vec!["ABCDEF".into(); 4];
            let mut s = station_with(b, 100);
            run_phase(&mut s, &mut EventLog::new());
            assert_eq!(population(&s), 4);
            assert_eq!(s.truss.total_energy(), 100);
        }
    }

    #[test]
    fn test_multiply_collapses_to_perfect() {
        let mut b = BioBox::new(1, "AB", 10);
        b.mode = BioBoxMode::Multiply;
        b.population = vec!["AB".into(), "AB".into(), "CC".into()];
        let mut s = station_with(b, 100);
        run_phase(&mut s, &mut EventLog::new());
        let pop = &s.bio_modules[0].boxes[0].population;
        assert_eq!(pop.len(), 4);
        assert!(pop.iter().all(|d| d == "AB"));
        assert_eq!(s.truss.total_energy(), 90);
    }

    #[test]
    fn test_perfect_match_posts_event() {
        // one-letter DNA over six letters; a few hundred births will hit it
        let mut b = BioBox::new(3, "A", 1000);
        b.population = vec!["B".into(); 100];
        let mut s = station_with(b, 100_000);
        let mut bus = EventLog::new();
        run_phase(&mut s, &mut bus);
        assert!(bus.events.contains(&GameEvent::PerfectDnaFound { box_id: 3 }));
    }
}
