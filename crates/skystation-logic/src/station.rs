//! The station aggregate one accounting cycle reads and mutates.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::air::AirComposition;
use crate::constants::air::VOLUME_PER_MODULE;
use crate::modules::{BioModule, HabModule, LabModule, ModuleKind};
use crate::peripherals::{ConsumableKind, Peripheral, PeripheralType};
use crate::people::Person;
use crate::report::AccountingReport;
use crate::truss::Truss;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Station {
    pub truss: Truss,
    pub air: AirComposition,
    pub hab_modules: Vec<HabModule>,
    pub lab_modules: Vec<LabModule>,
    pub bio_modules: Vec<BioModule>,
    pub peripherals: Vec<Peripheral>,
    /// Food queue of DNA codes, eaten front first.
    pub food: VecDeque<String>,
    pub unlocked_tech: Vec<String>,
    /// Start of the next cycle to run.
    pub accounting_date: DateTime<Utc>,
    pub last_report: Option<AccountingReport>,
}

impl Station {
    pub fn new(accounting_date: DateTime<Utc>) -> Self {
        Self {
            truss: Truss::new(),
            air: AirComposition::default(),
            hab_modules: Vec::new(),
            lab_modules: Vec::new(),
            bio_modules: Vec::new(),
            peripherals: Vec::new(),
            food: VecDeque::new(),
            unlocked_tech: Vec::new(),
            accounting_date,
            last_report: None,
        }
    }

    pub fn inhabitant_count(&self) -> usize {
        self.hab_modules.iter().map(|h| h.inhabitants.len()).sum()
    }

    pub fn people(&self) -> impl Iterator<Item = &Person> {
        self.hab_modules.iter().flat_map(|h| h.inhabitants.iter())
    }

    /// Every built module with its kind.
    pub fn module_kinds(&self) -> impl Iterator<Item = ModuleKind> + '_ {
        let habs = self.hab_modules.iter().map(|_| ModuleKind::Hab);
        let labs = self.lab_modules.iter().map(|_| ModuleKind::Lab);
        let bios = self.bio_modules.iter().map(|_| ModuleKind::Bio);
        habs.chain(labs).chain(bios)
    }

    pub fn module_count(&self) -> usize {
        self.hab_modules.len() + self.lab_modules.len() + self.bio_modules.len()
    }

    /// Air volume the built modules need.
    pub fn required_air_volume(&self) -> u32 {
        self.module_count() as u32 * VOLUME_PER_MODULE
    }

    /// Working peripherals of a type.
    pub fn working(&self, peripheral_type: PeripheralType) -> usize {
        self.peripherals
            .iter()
            .filter(|p| p.peripheral_type == peripheral_type && p.is_working())
            .count()
    }

    /// Amount of a consumable on hand, wherever it lives.
    pub fn available(&self, kind: ConsumableKind) -> u32 {
        match kind {
            ConsumableKind::Ingredient(ingredient) => self.truss.ingredient_total(ingredient),
            ConsumableKind::Tank(tank_type) => self.truss.tank_total(tank_type),
            ConsumableKind::AirPool(pool) => self.air.get(pool.gas()),
        }
    }

    /// Take exactly `amount` of a consumable, or nothing.
    pub fn debit(&mut self, kind: ConsumableKind, amount: u32) -> bool {
        match kind {
            ConsumableKind::Ingredient(ingredient) => {
                self.truss.consume_ingredient(ingredient, amount)
            }
            ConsumableKind::Tank(tank_type) => self.truss.consume_from_tanks(tank_type, amount),
            ConsumableKind::AirPool(pool) => {
                if self.air.get(pool.gas()) < amount {
                    return false;
                }
                self.air.remove(pool.gas(), amount);
                true
            }
        }
    }

    /// Store `amount` of a consumable. Returns what did not fit.
    pub fn credit(&mut self, kind: ConsumableKind, amount: u32) -> u32 {
        match kind {
            ConsumableKind::Ingredient(ingredient) => {
                self.truss.refill_containers(ingredient, amount)
            }
            ConsumableKind::Tank(tank_type) => self.truss.refill_tanks(tank_type, amount),
            ConsumableKind::AirPool(pool) => {
                self.air.add(pool.gas(), amount);
                0
            }
        }
    }

    /// Remove a person from whichever habitation module holds them.
    pub fn remove_person(&mut self, person_id: u64) -> Option<Person> {
        self.hab_modules.iter_mut().find_map(|hab| {
            let idx = hab.inhabitants.iter().position(|p| p.id == person_id)?;
            Some(hab.inhabitants.remove(idx))
        })
    }
}
