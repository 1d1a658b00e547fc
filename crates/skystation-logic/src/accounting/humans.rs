//! Human phase: per-inhabitant health, happiness and life expectancy,
//! weekly aging, deaths and waste.
//!
//! Each person gets three deltas in list order. Every delta is a small
//! additive score clamped into the attribute's range once applied. Tier
//! tables are free functions so they can be checked in isolation.

use std::collections::VecDeque;

use chrono::{DateTime, Datelike, Duration, Timelike, Utc, Weekday};
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

use super::{AccountingContext, CycleState};
use crate::air::{AirComposition, AirQuality, Gas};
use crate::biobox::BioBoxMode;
use crate::constants::clock::WEEKLY_TICK_HOUR;
use crate::constants::humans::*;
use crate::events::{DeathCause, GameEvent};
use crate::modules::BioModule;
use crate::people::{ActivityKind, Person};
use crate::peripherals::PeripheralType;
use crate::report::{EntryTag, ReportDraft};
use crate::resources::TankType;
use crate::station::Station;
use crate::truss::Truss;

/// Weekly clock boundary: Sunday at 01:00.
pub fn is_weekly_tick(now: DateTime<Utc>) -> bool {
    now.weekday() == Weekday::Sun && now.hour() == WEEKLY_TICK_HOUR
}

/// Water a person drinks per hour. Healthier people need less.
pub fn water_need(health: i32) -> u32 {
    if health > 75 {
        2
    } else if health > 50 {
        3
    } else {
        4
    }
}

/// Health lost for going without food.
pub fn starvation_penalty(health: i32) -> i32 {
    if health > 70 {
        2
    } else if health > 40 {
        3
    } else {
        4
    }
}

/// Health effect of breathing air of a given quality.
fn air_health_delta(quality: AirQuality, rng: &mut dyn RngCore) -> i32 {
    match quality {
        AirQuality::Great => 1,
        AirQuality::Good => i32::from(rng.gen_bool(0.5)),
        AirQuality::Medium => 0,
        AirQuality::Bad => -1,
        AirQuality::Lethal => -3,
    }
}

/// Pulls an attribute away from the extremes and toward its partner.
pub fn balance_nudge(value: i32, partner: i32) -> i32 {
    let mut nudge = 0;
    if value < NUDGE_LOW {
        nudge += 1;
    } else if value > NUDGE_HIGH {
        nudge -= 1;
    }
    if partner - value > NUDGE_DIVERGENCE {
        nudge += 1;
    } else if value - partner > NUDGE_DIVERGENCE {
        nudge -= 1;
    }
    nudge
}

/// Happiness every inhabitant starts from: warmth and progress.
pub fn comfort_bonus(radiators: usize, heads: usize, tech_items: usize) -> i32 {
    let mut bonus = 0;
    if heads > 0 && radiators as f32 / heads as f32 >= RADIATORS_PER_HEAD_BONUS {
        bonus += 1;
    }
    if tech_items >= TECH_ITEMS_BONUS {
        bonus += 1;
    }
    bonus
}

/// Repetitive meals hurt, varied meals help. Needs a few meals of history.
pub fn variety_score(meals: usize, distinct: usize) -> i32 {
    if meals < 3 {
        return 0;
    }
    match distinct {
        1 => -2,
        2 => -1,
        3 => 0,
        _ => 1,
    }
}

/// Mood swing candidates; experienced players get wilder inhabitants.
pub fn mood_candidates(experience_level: u32) -> &'static [i32] {
    match experience_level {
        0..=2 => &[-1, 0, 0, 1],
        3..=5 => &[-2, -1, 0, 0, 1, 2],
        _ => &[-3, -2, -1, 0, 0, 1, 2, 3],
    }
}

/// Death chance for someone `years_over` past their life expectancy.
pub fn overage_death_chance(years_over: u32) -> f64 {
    (OVERAGE_DEATH_CHANCE_PER_YEAR * years_over as f64).min(1.0)
}

/// Station stock the human pass draws from, split off the station so
/// inhabitants can be mutated alongside it.
struct Supplies<'s> {
    air: &'s mut AirComposition,
    truss: &'s mut Truss,
    food: &'s mut VecDeque<String>,
    bio_modules: &'s mut [BioModule],
    water_pool: u32,
    serve_bio_box: bool,
}

impl Supplies<'_> {
    fn drink(&mut self, amount: u32) -> bool {
        if self.water_pool < amount {
            return false;
        }
        self.water_pool -= amount;
        true
    }

    /// Food queue first, then serving bio-boxes when allowed.
    fn take_meal(&mut self) -> Option<String> {
        if let Some(meal) = self.food.pop_front() {
            return Some(meal);
        }
        if !self.serve_bio_box {
            return None;
        }
        self.bio_modules
            .iter_mut()
            .flat_map(|module| module.boxes.iter_mut())
            .filter(|b| b.mode == BioBoxMode::Serving)
            .find_map(|b| b.serve())
    }
}

fn health_delta(
    person: &mut Person,
    supplies: &mut Supplies<'_>,
    rng: &mut dyn RngCore,
    report: &mut ReportDraft,
) -> i32 {
    let mut delta = 0;

    if supplies.drink(water_need(person.health_physical)) {
        delta += 1;
    } else {
        delta -= 1;
        report.problem(EntryTag::Water, format!("{} had nothing to drink", person.name));
    }

    if supplies.air.o2 < O2_PER_BREATH {
        delta -= 5;
        report.problem(EntryTag::Air, format!("{} could not breathe", person.name));
    } else {
        delta += air_health_delta(supplies.air.air_quality(), rng);
        supplies.air.remove(Gas::O2, O2_PER_BREATH);
        supplies.air.add(Gas::Co2, CO2_PER_BREATH);
    }

    match supplies.take_meal() {
        Some(meal) => {
            person.record_meal(meal);
            delta += 1;
        }
        None => {
            delta -= starvation_penalty(person.health_physical);
            report.problem(EntryTag::Food, format!("{} went hungry", person.name));
        }
    }

    delta + balance_nudge(person.health_physical, person.happiness)
}

fn happiness_delta(
    person: &mut Person,
    comfort: i32,
    moods: &[i32],
    now: DateTime<Utc>,
    supplies: &mut Supplies<'_>,
    rng: &mut dyn RngCore,
    report: &mut ReportDraft,
) -> i32 {
    let mut delta = comfort + variety_score(person.food_eaten.len(), person.food_variety());

    match person.activity.take() {
        Some(activity) if activity.is_finished(now) => {
            if let ActivityKind::Study(skill) = activity.kind {
                person.train(skill);
            }
            report.note(
                EntryTag::Human,
                format!("{} finished {}", person.name, activity.name),
            );
        }
        Some(mut activity) => {
            if !activity.is_study() {
                delta -= 1;
            }
            if !supplies.truss.consume_energy(ACTIVITY_ENERGY) {
                activity.ends_at += Duration::minutes(ACTIVITY_STALL_MINUTES);
                report.problem(
                    EntryTag::Energy,
                    format!("{} stalled on {} for lack of energy", person.name, activity.name),
                );
            }
            person.activity = Some(activity);
        }
        None => {}
    }

    delta += moods.choose(rng).copied().unwrap_or(0);
    delta + balance_nudge(person.happiness, person.health_physical)
}

fn life_expectancy_delta(person: &Person, rng: &mut dyn RngCore) -> i32 {
    let (happy, health) = (person.happiness, person.health_physical);
    let mut candidates = if happy > 70 && health > 70 {
        vec![0, 1]
    } else if happy < 30 || health < 30 {
        vec![-1, 0]
    } else {
        vec![0]
    };

    let gap = person.life_expectancy - LIFE_EXPECTANCY_TARGET;
    if gap.abs() > LIFE_EXPECTANCY_DRIFT && rng.gen_bool(0.5) {
        candidates.push(-gap.signum());
    }
    candidates.choose(rng).copied().unwrap_or(0)
}

/// Age on the weekly tick and decide whether the person dies.
fn death_check(person: &mut Person, weekly: bool, rng: &mut dyn RngCore) -> Option<DeathCause> {
    if person.health_physical < 1 {
        return Some(DeathCause::PoorHealth);
    }
    if !weekly {
        return None;
    }
    person.age += 1;
    let years_over = person.age as i32 - person.life_expectancy;
    if years_over > 0 && rng.gen_bool(overage_death_chance(years_over as u32)) {
        return Some(DeathCause::OldAge);
    }
    None
}

pub(super) fn run(station: &mut Station, ctx: &mut AccountingContext<'_>, state: &mut CycleState) {
    let now = state.started_at;
    let weekly = is_weekly_tick(now);
    let comfort = comfort_bonus(
        station.working(PeripheralType::Radiator),
        station.inhabitant_count(),
        station.unlocked_tech.len(),
    );
    let moods = mood_candidates(ctx.wallet.experience_level());
    let mut deaths: Vec<(u64, String, DeathCause)> = Vec::new();

    let Station {
        hab_modules,
        air,
        truss,
        food,
        bio_modules,
        ..
    } = station;
    let mut supplies = Supplies {
        water_pool: truss.tank_total(TankType::H2o),
        air,
        truss,
        food,
        bio_modules,
        serve_bio_box: ctx.settings.serve_bio_box,
    };

    for person in hab_modules.iter_mut().flat_map(|hab| hab.inhabitants.iter_mut()) {
        let health = health_delta(person, &mut supplies, &mut *ctx.rng, &mut state.report);
        person.apply_health_delta(health);

        let happiness = happiness_delta(
            person,
            comfort,
            moods,
            now,
            &mut supplies,
            &mut *ctx.rng,
            &mut state.report,
        );
        person.apply_happiness_delta(happiness);

        let life = life_expectancy_delta(person, &mut *ctx.rng);
        person.apply_life_expectancy_delta(life);

        if let Some(cause) = death_check(person, weekly, &mut *ctx.rng) {
            deaths.push((person.id, person.name.clone(), cause));
        }

        state.waste_liquid += 1 + u32::from(ctx.rng.gen_bool(0.5));
        state.waste_solid += u32::from(ctx.rng.gen_bool(0.5));
    }
    state.water_pool = Some(supplies.water_pool);

    for (person_id, name, cause) in deaths {
        station.remove_person(person_id);
        let reason = match cause {
            DeathCause::PoorHealth => "poor health",
            DeathCause::OldAge => "old age",
        };
        state
            .report
            .problem(EntryTag::Human, format!("{} died of {}", name, reason));
        log::info!("inhabitant {} ({}) died of {}", person_id, name, reason);
        ctx.bus.post(GameEvent::PersonDied {
            person_id,
            name,
            cause,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventLog;
    use crate::modules::HabModule;
    use crate::people::{Activity, Skill};
    use crate::resources::{Battery, Tank};
    use crate::settings::AccountingSettings;
    use crate::wallet::Player;
    use chrono::TimeZone;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    // Friday, not a weekly tick.
    fn weekday() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2040, 3, 9, 12, 0, 0).unwrap()
    }

    fn station_with(person: Person) -> Station {
        let mut station = Station::new(weekday());
        let mut hab = HabModule::new(1, "Hab", 4);
        hab.inhabitants.push(person);
        station.hab_modules.push(hab);
        station.air = AirComposition::fresh(1000);
        station.truss.tanks.push(Tank::new(TankType::H2o, 50, 100).unwrap());
        station.truss.batteries.push(Battery::full(100));
        station.food.push_back("ABCDEF".into());
        station
    }

    fn run_phase(station: &mut Station, bus: &mut EventLog, seed: u64) -> CycleState {
        let settings = AccountingSettings::default();
        let mut player = Player::default();
        let mut rng = StdRng::seed_from_u64(seed);
        let mut ctx = AccountingContext::new(&settings, &mut player, bus, &mut rng);
        let mut state = CycleState::new(station, station.accounting_date);
        run(station, &mut ctx, &mut state);
        state
    }

    /// Happiness delta for a person kept outside the station, with a flat
    /// mood so only the deterministic terms remain.
    fn happiness_for(person: &mut Person, station: &mut Station, comfort: i32) -> i32 {
        let mut report = ReportDraft::begin(station, weekday());
        let Station {
            air,
            truss,
            food,
            bio_modules,
            ..
        } = station;
        let mut supplies = Supplies {
            water_pool: truss.tank_total(TankType::H2o),
            air,
            truss,
            food,
            bio_modules,
            serve_bio_box: false,
        };
        let mut rng = StdRng::seed_from_u64(1);
        happiness_delta(
            person,
            comfort,
            &[0],
            weekday(),
            &mut supplies,
            &mut rng,
            &mut report,
        )
    }

    fn ongoing(kind: ActivityKind) -> Activity {
        Activity {
            name: "Task".into(),
            kind,
            started_at: weekday(),
            ends_at: weekday() + Duration::hours(2),
        }
    }

    fn even_tempered() -> Person {
        let mut person = Person::new(1, "Ada", 30);
        person.health_physical = 50;
        person.happiness = 50;
        person
    }

    #[test]
    fn test_work_costs_happiness_but_study_does_not() {
        let mut station = station_with(Person::new(9, "Other", 30));

        let mut worker = even_tempered();
        worker.activity = Some(ongoing(ActivityKind::Work));
        assert_eq!(happiness_for(&mut worker, &mut station, 0), -1);

        let mut student = even_tempered();
        student.activity = Some(ongoing(ActivityKind::Study(Skill::Medic)));
        assert_eq!(happiness_for(&mut student, &mut station, 0), 0);

        let mut idle = even_tempered();
        assert_eq!(happiness_for(&mut idle, &mut station, 0), 0);

        // both activities were powered and are still running
        assert_eq!(station.truss.total_energy(), 100 - 2 * ACTIVITY_ENERGY);
        assert!(worker.activity.is_some() && student.activity.is_some());
    }

    #[test]
    fn test_comfort_and_variety_reach_happiness() {
        let mut station = station_with(Person::new(9, "Other", 30));

        let mut gourmet = even_tempered();
        for dish in ["ABBA", "CAFE", "DEAF", "FADE", "BEEF"] {
            gourmet.record_meal(dish);
        }
        assert_eq!(happiness_for(&mut gourmet, &mut station, 2), 3);

        let mut bored = even_tempered();
        for _ in 0..4 {
            bored.record_meal("ABBA");
        }
        assert_eq!(happiness_for(&mut bored, &mut station, 1), -1);

        let mut extreme = even_tempered();
        extreme.happiness = 95;
        // -1 for the high extreme, -1 for drifting more than 40 above health
        assert_eq!(happiness_for(&mut extreme, &mut station, 0), -2);
    }

    #[test]
    fn test_life_expectancy_regresses_toward_target() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut draws = |person: &Person| -> Vec<i32> {
            (0..200)
                .map(|_| life_expectancy_delta(person, &mut rng))
                .collect()
        };

        let mut long_lived = even_tempered();
        long_lived.life_expectancy = 100;
        let down = draws(&long_lived);
        assert!(down.contains(&-1));
        assert!(down.iter().all(|d| (-1..=0).contains(d)));

        let mut short_lived = even_tempered();
        short_lived.life_expectancy = LIFE_EXPECTANCY_MIN;
        let up = draws(&short_lived);
        assert!(up.contains(&1));
        assert!(up.iter().all(|d| (0..=1).contains(d)));

        // mid tiers on target never move
        assert!(draws(&even_tempered()).iter().all(|&d| d == 0));
    }

    #[test]
    fn test_life_expectancy_tiers_follow_wellbeing() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut thriving = even_tempered();
        thriving.health_physical = 90;
        thriving.happiness = 90;
        let mut miserable = even_tempered();
        miserable.happiness = 10;

        let good: Vec<i32> = (0..100)
            .map(|_| life_expectancy_delta(&thriving, &mut rng))
            .collect();
        let bad: Vec<i32> = (0..100)
            .map(|_| life_expectancy_delta(&miserable, &mut rng))
            .collect();
        assert!(good.contains(&1) && !good.contains(&-1));
        assert!(bad.contains(&-1) && !bad.contains(&1));
    }

    #[test]
    fn test_weekly_tick() {
        let sunday_one = Utc.with_ymd_and_hms(2040, 3, 11, 1, 0, 0).unwrap();
        assert!(is_weekly_tick(sunday_one));
        assert!(!is_weekly_tick(sunday_one + Duration::hours(1)));
        assert!(!is_weekly_tick(weekday()));
    }

    #[test]
    fn test_tier_tables() {
        assert_eq!(water_need(90), 2);
        assert_eq!(water_need(60), 3);
        assert_eq!(water_need(50), 4);
        assert_eq!(starvation_penalty(80), 2);
        assert_eq!(starvation_penalty(50), 3);
        assert_eq!(starvation_penalty(10), 4);
        assert_eq!(overage_death_chance(2), 0.4);
        assert_eq!(overage_death_chance(9), 1.0);
    }

    #[test]
    fn test_balance_nudge() {
        assert_eq!(balance_nudge(50, 50), 0);
        assert_eq!(balance_nudge(10, 60), 2);
        assert_eq!(balance_nudge(90, 40), -2);
        assert_eq!(balance_nudge(85, 85), -1);
    }

    #[test]
    fn test_variety_and_comfort() {
        assert_eq!(variety_score(2, 1), 0);
        assert_eq!(variety_score(5, 1), -2);
        assert_eq!(variety_score(5, 5), 1);
        assert_eq!(comfort_bonus(1, 2, 0), 1);
        assert_eq!(comfort_bonus(0, 2, 5), 1);
        assert_eq!(comfort_bonus(3, 0, 0), 0);
    }

    #[test]
    fn test_mood_variance_grows_with_experience() {
        let spread = |level| {
            let moods = mood_candidates(level);
            moods.iter().max().unwrap() - moods.iter().min().unwrap()
        };
        assert!(spread(0) < spread(4));
        assert!(spread(4) < spread(10));
    }

    #[test]
    fn test_well_supplied_person_gains_health() {
        let mut person = Person::new(1, "Ada", 30);
        person.health_physical = 50;
        person.happiness = 50;
        let mut station = station_with(person);

        let state = run_phase(&mut station, &mut EventLog::new(), 42);
        let ada = station.people().next().unwrap();
        assert_eq!(ada.health_physical, 53);
        assert!(station.food.is_empty());
        assert_eq!(state.water_pool, Some(46));
        assert_eq!(station.air.o2, 208);
        assert_eq!(station.air.co2, 2);
    }

    #[test]
    fn test_hungry_thirsty_person_suffers() {
        let mut person = Person::new(1, "Ada", 30);
        person.health_physical = 50;
        person.happiness = 50;
        let mut station = station_with(person);
        station.food.clear();
        station.truss.tanks.clear();

        let state = run_phase(&mut station, &mut EventLog::new(), 42);
        // -1 water, +1 great air, -3 hunger
        assert_eq!(station.people().next().unwrap().health_physical, 47);
        assert_eq!(state.report.problems_tagged(EntryTag::Food).count(), 1);
        assert_eq!(state.report.problems_tagged(EntryTag::Water).count(), 1);
    }

    #[test]
    fn test_serving_bio_box_feeds_when_enabled() {
        use crate::biobox::BioBox;

        let mut station = station_with(Person::new(1, "Ada", 30));
        station.food.clear();
        let mut serving = BioBox::new(9, "ABCDEF", 10);
        serving.mode = BioBoxMode::Serving;
        serving.population = vec!["ABCDEF".into(); 3];
        station.bio_modules.push(BioModule {
            id: 2,
            name: "Bio".into(),
            boxes: vec![serving],
        });

        let settings = AccountingSettings {
            serve_bio_box: true,
            ..AccountingSettings::default()
        };
        let mut player = Player::default();
        let mut bus = EventLog::new();
        let mut rng = StdRng::seed_from_u64(1);
        let mut ctx = AccountingContext::new(&settings, &mut player, &mut bus, &mut rng);
        let mut state = CycleState::new(&station, weekday());
        run(&mut station, &mut ctx, &mut state);

        assert_eq!(station.bio_modules[0].boxes[0].population.len(), 2);
        assert_eq!(state.report.problems_tagged(EntryTag::Food).count(), 0);
    }

    #[test]
    fn test_finished_study_trains_skill() {
        let mut person = Person::new(1, "Ada", 30);
        person.activity = Some(Activity {
            name: "Medicine course".into(),
            kind: ActivityKind::Study(Skill::Medic),
            started_at: weekday() - Duration::hours(5),
            ends_at: weekday(),
        });
        let mut station = station_with(person);

        run_phase(&mut station, &mut EventLog::new(), 7);
        let ada = station.people().next().unwrap();
        assert!(ada.activity.is_none());
        assert_eq!(ada.skill_level(Skill::Medic), 1);
    }

    #[test]
    fn test_unpowered_activity_stalls() {
        let mut person = Person::new(1, "Ada", 30);
        let ends_at = weekday() + Duration::hours(2);
        person.activity = Some(Activity {
            name: "Shift".into(),
            kind: ActivityKind::Work,
            started_at: weekday(),
            ends_at,
        });
        let mut station = station_with(person);
        station.truss.batteries.clear();

        let state = run_phase(&mut station, &mut EventLog::new(), 7);
        let activity = station.people().next().unwrap().activity.clone().unwrap();
        assert_eq!(activity.ends_at, ends_at + Duration::minutes(ACTIVITY_STALL_MINUTES));
        assert_eq!(state.report.problems_tagged(EntryTag::Energy).count(), 1);
    }

    #[test]
    fn test_zero_health_dies_and_posts_event() {
        let mut person = Person::new(5, "Bo", 40);
        person.health_physical = 0;
        let mut station = station_with(person);
        station.air = AirComposition::default();
        station.food.clear();
        station.truss.tanks.clear();

        let mut bus = EventLog::new();
        run_phase(&mut station, &mut bus, 42);
        assert_eq!(station.inhabitant_count(), 0);
        assert_eq!(bus.deaths(), 1);
    }

    #[test]
    fn test_weekly_tick_ages_and_old_age_kills() {
        let mut person = Person::new(5, "Bo", 90);
        person.life_expectancy = 80;
        let mut station = station_with(person);
        let sunday_one = Utc.with_ymd_and_hms(2040, 3, 11, 1, 0, 0).unwrap();
        station.accounting_date = sunday_one;

        let mut bus = EventLog::new();
        run_phase(&mut station, &mut bus, 42);
        // eleven years over: certain death
        assert_eq!(station.inhabitant_count(), 0);
        assert!(matches!(
            bus.events.first(),
            Some(GameEvent::PersonDied {
                cause: DeathCause::OldAge,
                ..
            })
        ));
    }

    #[test]
    fn test_waste_per_person_is_bounded() {
        let mut station = station_with(Person::new(1, "Ada", 30));
        let state = run_phase(&mut station, &mut EventLog::new(), 11);
        assert!((1..=2).contains(&state.waste_liquid));
        assert!(state.waste_solid <= 1);
    }
}
