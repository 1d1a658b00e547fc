//! The truss: the station's resource store.
//!
//! Aggregates every tank, storage box and battery on the station and
//! exposes the charge / refill / consume operations the accounting phases
//! use. Debits are all-or-nothing: an operation that cannot be paid in full
//! leaves the store untouched and reports failure. Credits never overflow a
//! container; whatever does not fit is handed back as spill for the caller
//! to report.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::antenna::{BASE_INCOME, LEVEL_FALLOFF};
use crate::resources::{Antenna, Battery, Ingredient, SolarPanel, StorageBox, Tank, TankType};

/// Ingredients and amounts requested in one payment.
pub type IngredientBill = BTreeMap<Ingredient, u32>;

/// One ingredient the store cannot cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortfall {
    pub ingredient: Ingredient,
    pub required: u32,
    pub available: u32,
}

impl Shortfall {
    pub fn missing(&self) -> u32 {
        self.required.saturating_sub(self.available)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Truss {
    pub tanks: Vec<Tank>,
    pub boxes: Vec<StorageBox>,
    pub batteries: Vec<Battery>,
    pub solar_panels: Vec<SolarPanel>,
    pub antenna: Antenna,
}

/// Indices of `items` matching `keep`, fullest first.
fn fullest_first<T>(
    items: &[T],
    keep: impl Fn(&T) -> bool,
    level: impl Fn(&T) -> u32,
) -> Vec<usize> {
    let mut idx: Vec<usize> = (0..items.len()).filter(|&i| keep(&items[i])).collect();
    idx.sort_by(|&a, &b| level(&items[b]).cmp(&level(&items[a])));
    idx
}

impl Truss {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Energy ──────────────────────────────────────────────────────────

    pub fn total_energy(&self) -> u32 {
        self.batteries.iter().map(Battery::current).fold(0, u32::saturating_add)
    }

    /// Debit `amount` from the batteries, fullest first.
    ///
    /// Fails without touching any battery when the total charge is short.
    pub fn consume_energy(&mut self, amount: u32) -> bool {
        if self.total_energy() < amount {
            return false;
        }
        let mut remaining = amount;
        for i in fullest_first(&self.batteries, |_| true, Battery::current) {
            if remaining == 0 {
                break;
            }
            remaining -= self.batteries[i].discharge(remaining);
        }
        true
    }

    /// Charge the batteries in order. Returns the energy that did not fit.
    pub fn charge_batteries(&mut self, amount: u32) -> u32 {
        let mut remaining = amount;
        for battery in &mut self.batteries {
            if remaining == 0 {
                break;
            }
            remaining = battery.charge(remaining);
        }
        remaining
    }

    /// Hourly output of every solar panel.
    pub fn solar_output(&self) -> u32 {
        self.solar_panels
            .iter()
            .map(SolarPanel::output)
            .fold(0, u32::saturating_add)
    }

    // ── Ingredients ─────────────────────────────────────────────────────

    pub fn ingredient_total(&self, ingredient: Ingredient) -> u32 {
        self.boxes
            .iter()
            .filter(|b| b.ingredient == ingredient)
            .map(StorageBox::current)
            .fold(0, u32::saturating_add)
    }

    /// Every requested ingredient the boxes cannot cover.
    pub fn shortfalls(&self, bill: &IngredientBill) -> Vec<Shortfall> {
        bill.iter()
            .filter_map(|(&ingredient, &required)| {
                let available = self.ingredient_total(ingredient);
                (available < required).then_some(Shortfall {
                    ingredient,
                    required,
                    available,
                })
            })
            .collect()
    }

    /// Ingredients that are short. Empty means the bill can be paid.
    pub fn validate_resources(&self, bill: &IngredientBill) -> Vec<Ingredient> {
        self.shortfalls(bill).iter().map(|s| s.ingredient).collect()
    }

    /// Debit a whole bill, or nothing at all when any item is short.
    pub fn pay_for_resources(&mut self, bill: &IngredientBill) -> bool {
        if !self.shortfalls(bill).is_empty() {
            return false;
        }
        for (&ingredient, &amount) in bill {
            self.take_ingredient(ingredient, amount);
        }
        true
    }

    /// Debit one ingredient atomically.
    pub fn consume_ingredient(&mut self, ingredient: Ingredient, amount: u32) -> bool {
        if self.ingredient_total(ingredient) < amount {
            return false;
        }
        self.take_ingredient(ingredient, amount);
        true
    }

    fn take_ingredient(&mut self, ingredient: Ingredient, amount: u32) {
        let mut remaining = amount;
        let order = fullest_first(&self.boxes, |b| b.ingredient == ingredient, StorageBox::current);
        for i in order {
            if remaining == 0 {
                break;
            }
            remaining -= self.boxes[i].draw(remaining);
        }
    }

    /// Spread `amount` over the boxes holding `ingredient`. Returns spill.
    pub fn refill_containers(&mut self, ingredient: Ingredient, amount: u32) -> u32 {
        let mut remaining = amount;
        for storage in self.boxes.iter_mut().filter(|b| b.ingredient == ingredient) {
            if remaining == 0 {
                break;
            }
            remaining = storage.fill(remaining);
        }
        remaining
    }

    // ── Tanks ───────────────────────────────────────────────────────────

    pub fn tank_total(&self, tank_type: TankType) -> u32 {
        self.tanks
            .iter()
            .filter(|t| t.tank_type == tank_type)
            .map(Tank::current)
            .fold(0, u32::saturating_add)
    }

    /// Spread `amount` over the tanks of a type. Returns spill.
    pub fn refill_tanks(&mut self, tank_type: TankType, amount: u32) -> u32 {
        let mut remaining = amount;
        for tank in self.tanks.iter_mut().filter(|t| t.tank_type == tank_type) {
            if remaining == 0 {
                break;
            }
            remaining = tank.fill(remaining);
        }
        remaining
    }

    /// Draw up to `amount` from the tanks of a type, fullest first.
    /// Returns what was actually drawn.
    pub fn charge_from(&mut self, tank_type: TankType, amount: u32) -> u32 {
        let mut drawn = 0;
        for i in fullest_first(&self.tanks, |t| t.tank_type == tank_type, Tank::current) {
            if drawn == amount {
                break;
            }
            drawn += self.tanks[i].draw(amount - drawn);
        }
        drawn
    }

    /// Draw exactly `amount` from a tank type, or nothing.
    pub fn consume_from_tanks(&mut self, tank_type: TankType, amount: u32) -> bool {
        if self.tank_total(tank_type) < amount {
            return false;
        }
        self.charge_from(tank_type, amount);
        true
    }

    /// Rewrite all water tanks so they hold `new_water` in total.
    /// Returns what no water tank could hold.
    pub fn reset_water_tanks(&mut self, new_water: u32) -> u32 {
        for tank in self.tanks.iter_mut().filter(|t| t.tank_type == TankType::H2o) {
            let level = tank.current();
            tank.draw(level);
        }
        self.refill_tanks(TankType::H2o, new_water)
    }

    /// Pour partial tanks of the same type into each other so fewer,
    /// fuller tanks remain. Totals per type are unchanged.
    ///
    /// Returns how many tanks ended up empty.
    pub fn merge_tanks(&mut self) -> usize {
        for tank_type in TankType::ALL {
            let order = fullest_first(&self.tanks, |t| t.tank_type == tank_type, Tank::current);
            if order.len() < 2 {
                continue;
            }
            let (mut receiver, mut donor) = (0, order.len() - 1);
            while receiver < donor {
                let (r, d) = (order[receiver], order[donor]);
                if self.tanks[r].room() == 0 {
                    receiver += 1;
                    continue;
                }
                if self.tanks[d].current() == 0 {
                    donor -= 1;
                    continue;
                }
                let room = self.tanks[r].room();
                let moved = self.tanks[d].draw(room);
                self.tanks[r].fill(moved);
            }
        }
        self.tanks.iter().filter(|t| t.current() == 0).count()
    }

    /// Drop empty O2 and water tanks. Returns how many were removed.
    pub fn clear_empty_tanks(&mut self) -> usize {
        let before = self.tanks.len();
        self.tanks
            .retain(|t| !(t.tank_type.clears_when_empty() && t.current() == 0));
        before - self.tanks.len()
    }

    // ── Antenna ─────────────────────────────────────────────────────────

    /// Passive hourly income. Every level past the first is worth a
    /// fixed share of the one before it.
    pub fn money_from_antenna(&self) -> u32 {
        let mut income = 0.0;
        let mut step = BASE_INCOME;
        for _ in 0..self.antenna.level {
            income += step;
            step *= LEVEL_FALLOFF;
        }
        income.round() as u32
    }
}
