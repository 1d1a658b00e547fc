//! Accounting report: what happened during one cycle.
//!
//! A [`ReportDraft`] is opened at the start of a cycle and appended to by
//! every phase. Finalizing consumes the draft and yields an
//! [`AccountingReport`], which has no mutators; the next cycle replaces it
//! rather than merging into it.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::air::AirComposition;
use crate::resources::TankType;
use crate::station::Station;

/// What a report line is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryTag {
    Energy,
    Air,
    Water,
    Food,
    Peripheral,
    Human,
    Waste,
    BioBox,
    Money,
    Storage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub tag: EntryTag,
    pub message: String,
}

impl fmt::Display for ReportEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.tag, self.message)
    }
}

/// Energy, water and air at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSnapshot {
    pub energy: u32,
    pub water: u32,
    pub air: AirComposition,
}

impl ResourceSnapshot {
    pub fn capture(station: &Station) -> Self {
        Self {
            energy: station.truss.total_energy(),
            water: station.truss.tank_total(TankType::H2o),
            air: station.air,
        }
    }
}

/// Report under construction while a cycle runs.
#[derive(Debug, Clone)]
pub struct ReportDraft {
    started_at: DateTime<Utc>,
    start: ResourceSnapshot,
    problems: Vec<ReportEntry>,
    notes: Vec<ReportEntry>,
    broken_peripherals: Vec<u32>,
    waste_liquid: u32,
    waste_solid: u32,
    income: u32,
}

impl ReportDraft {
    pub fn begin(station: &Station, started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            start: ResourceSnapshot::capture(station),
            problems: Vec::new(),
            notes: Vec::new(),
            broken_peripherals: Vec::new(),
            waste_liquid: 0,
            waste_solid: 0,
            income: 0,
        }
    }

    pub fn problem(&mut self, tag: EntryTag, message: impl Into<String>) {
        let entry = ReportEntry {
            tag,
            message: message.into(),
        };
        log::warn!("accounting problem {}", entry);
        self.problems.push(entry);
    }

    pub fn note(&mut self, tag: EntryTag, message: impl Into<String>) {
        self.notes.push(ReportEntry {
            tag,
            message: message.into(),
        });
    }

    pub fn broken_peripheral(&mut self, id: u32) {
        if !self.broken_peripherals.contains(&id) {
            self.broken_peripherals.push(id);
        }
    }

    pub fn add_waste(&mut self, liquid: u32, solid: u32) {
        self.waste_liquid += liquid;
        self.waste_solid += solid;
    }

    pub fn set_income(&mut self, income: u32) {
        self.income = income;
    }

    pub fn problems(&self) -> &[ReportEntry] {
        &self.problems
    }

    pub fn notes(&self) -> &[ReportEntry] {
        &self.notes
    }

    pub fn problems_tagged(&self, tag: EntryTag) -> impl Iterator<Item = &ReportEntry> {
        self.problems.iter().filter(move |e| e.tag == tag)
    }

    pub fn notes_tagged(&self, tag: EntryTag) -> impl Iterator<Item = &ReportEntry> {
        self.notes.iter().filter(move |e| e.tag == tag)
    }

    /// Close the draft against the station's end state.
    pub fn finalize(self, station: &Station, ended_at: DateTime<Utc>) -> AccountingReport {
        AccountingReport {
            started_at: self.started_at,
            ended_at,
            start: self.start,
            end: ResourceSnapshot::capture(station),
            problems: self.problems,
            notes: self.notes,
            broken_peripherals: self.broken_peripherals,
            waste_liquid: self.waste_liquid,
            waste_solid: self.waste_solid,
            income: self.income,
        }
    }
}

/// Finished record of one accounting cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountingReport {
    started_at: DateTime<Utc>,
    ended_at: DateTime<Utc>,
    start: ResourceSnapshot,
    end: ResourceSnapshot,
    problems: Vec<ReportEntry>,
    notes: Vec<ReportEntry>,
    broken_peripherals: Vec<u32>,
    waste_liquid: u32,
    waste_solid: u32,
    income: u32,
}

impl AccountingReport {
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn ended_at(&self) -> DateTime<Utc> {
        self.ended_at
    }

    pub fn start(&self) -> &ResourceSnapshot {
        &self.start
    }

    pub fn end(&self) -> &ResourceSnapshot {
        &self.end
    }

    pub fn problems(&self) -> &[ReportEntry] {
        &self.problems
    }

    pub fn notes(&self) -> &[ReportEntry] {
        &self.notes
    }

    pub fn broken_peripherals(&self) -> &[u32] {
        &self.broken_peripherals
    }

    /// Liquid and solid waste produced this cycle.
    pub fn waste_produced(&self) -> (u32, u32) {
        (self.waste_liquid, self.waste_solid)
    }

    pub fn income(&self) -> u32 {
        self.income
    }

    pub fn problems_tagged(&self, tag: EntryTag) -> impl Iterator<Item = &ReportEntry> {
        self.problems.iter().filter(move |e| e.tag == tag)
    }

    pub fn notes_tagged(&self, tag: EntryTag) -> impl Iterator<Item = &ReportEntry> {
        self.notes.iter().filter(move |e| e.tag == tag)
    }
}
