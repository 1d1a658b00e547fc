//! Hourly accounting cycle.
//!
//! One cycle runs the phases in [`Phase::ORDER`] against a station, each
//! phase appending problems and notes to the cycle's [`ReportDraft`]. A
//! cycle never fails: shortfalls degrade the sub-operation that hit them and
//! the rest of the cycle carries on. External collaborators (settings,
//! wallet, message bus, randomness) come in through [`AccountingContext`]
//! so cycles are reproducible with a seeded RNG.
//!
//! [`run_catch_up`] chains as many cycles as are due, feeding each cycle's
//! end timestamp in as the next one's start.

mod biobox;
mod energy;
mod finalize;
mod humans;
mod oxygen;
mod peripherals;
mod waste;

use chrono::{DateTime, Duration, Utc};
use rand::RngCore;

use crate::constants::clock::CYCLE_SECONDS;
use crate::events::MessageBus;
use crate::report::ReportDraft;
use crate::settings::AccountingSettings;
use crate::station::Station;
use crate::wallet::PlayerWallet;

pub use humans::{is_weekly_tick, mood_candidates, water_need};
pub use oxygen::regulate_oxygen;

/// Everything a cycle needs from outside the station.
pub struct AccountingContext<'a> {
    pub settings: &'a AccountingSettings,
    pub wallet: &'a mut dyn PlayerWallet,
    pub bus: &'a mut dyn MessageBus,
    pub rng: &'a mut dyn RngCore,
}

impl<'a> AccountingContext<'a> {
    pub fn new(
        settings: &'a AccountingSettings,
        wallet: &'a mut dyn PlayerWallet,
        bus: &'a mut dyn MessageBus,
        rng: &'a mut dyn RngCore,
    ) -> Self {
        Self {
            settings,
            wallet,
            bus,
            rng,
        }
    }
}

/// Working state threaded through the phases of one cycle.
#[derive(Debug, Clone)]
pub struct CycleState {
    pub started_at: DateTime<Utc>,
    pub report: ReportDraft,
    /// Water left after everyone drank; set by the humans phase.
    pub water_pool: Option<u32>,
    pub waste_liquid: u32,
    pub waste_solid: u32,
}

impl CycleState {
    pub fn new(station: &Station, started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            report: ReportDraft::begin(station, started_at),
            water_pool: None,
            waste_liquid: 0,
            waste_solid: 0,
        }
    }
}

/// Sub-phases of a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Peripherals,
    OxygenRegulation,
    Humans,
    ModulesEnergy,
    WasteWater,
    BioBoxes,
    AntennaMoney,
    Finalize,
}

impl Phase {
    /// Order the phases run in. Later phases read what earlier ones left.
    pub const ORDER: [Phase; 8] = [
        Phase::Peripherals,
        Phase::OxygenRegulation,
        Phase::Humans,
        Phase::ModulesEnergy,
        Phase::WasteWater,
        Phase::BioBoxes,
        Phase::AntennaMoney,
        Phase::Finalize,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Phase::Peripherals => "peripherals",
            Phase::OxygenRegulation => "oxygen regulation",
            Phase::Humans => "humans",
            Phase::ModulesEnergy => "modules/energy",
            Phase::WasteWater => "waste/water",
            Phase::BioBoxes => "bio-boxes",
            Phase::AntennaMoney => "antenna/money",
            Phase::Finalize => "finalize",
        }
    }

    pub fn run(
        self,
        station: &mut Station,
        ctx: &mut AccountingContext<'_>,
        state: &mut CycleState,
    ) {
        match self {
            Phase::Peripherals => peripherals::run(station, ctx, state),
            Phase::OxygenRegulation => {
                regulate_oxygen(station, &mut state.report);
            }
            Phase::Humans => humans::run(station, ctx, state),
            Phase::ModulesEnergy => energy::run(station, state),
            Phase::WasteWater => waste::run(station, state),
            Phase::BioBoxes => biobox::run(station, ctx, state),
            Phase::AntennaMoney => finalize::collect_income(station, ctx, state),
            Phase::Finalize => finalize::run(station, ctx, state),
        }
    }
}

/// Run one hourly cycle starting at `started_at`.
///
/// Attaches the finished report to the station, moves its accounting date
/// forward and returns the cycle's end, which is the next cycle's start.
pub fn run_accounting_cycle(
    station: &mut Station,
    started_at: DateTime<Utc>,
    ctx: &mut AccountingContext<'_>,
) -> DateTime<Utc> {
    let ended_at = started_at + Duration::seconds(CYCLE_SECONDS);
    let mut state = CycleState::new(station, started_at);

    for phase in Phase::ORDER {
        if ctx.settings.debug_accounting {
            log::debug!("accounting {} phase at {}", phase.name(), started_at);
        }
        phase.run(station, ctx, &mut state);
    }

    let report = state.report.finalize(station, ended_at);
    log::info!(
        "accounting cycle {} -> {}: {} problems, {} notes, energy {} -> {}",
        started_at,
        ended_at,
        report.problems().len(),
        report.notes().len(),
        report.start().energy,
        report.end().energy,
    );
    station.last_report = Some(report);
    station.accounting_date = ended_at;
    ended_at
}

/// Whole cycles elapsed between `last_accounted` and `now`, capped at `max`.
pub fn cycles_due(last_accounted: DateTime<Utc>, now: DateTime<Utc>, max: u32) -> u32 {
    if now <= last_accounted {
        return 0;
    }
    let hours = (now - last_accounted).num_seconds() / CYCLE_SECONDS;
    hours.clamp(0, max as i64) as u32
}

/// Run every cycle due between the station's accounting date and `now`.
///
/// When more cycles are due than the settings allow, the oldest hours are
/// skipped so the station ends up current. Returns the cycles run.
pub fn run_catch_up(
    station: &mut Station,
    now: DateTime<Utc>,
    ctx: &mut AccountingContext<'_>,
) -> u32 {
    let max = ctx.settings.max_catch_up_cycles;
    let elapsed = cycles_due(station.accounting_date, now, u32::MAX);
    if elapsed > max {
        let skipped = elapsed - max;
        log::warn!("skipping {} overdue accounting cycles", skipped);
        station.accounting_date += Duration::seconds(CYCLE_SECONDS * skipped as i64);
    }

    let due = elapsed.min(max);
    let mut start = station.accounting_date;
    for _ in 0..due {
        start = run_accounting_cycle(station, start, ctx);
    }
    due
}
