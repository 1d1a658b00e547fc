//! Peripheral devices and the table of what each type draws and converts.
//!
//! Behavior is a pure function of the peripheral type plus its current
//! state. Consumables are a table of typed keys mapped to signed deltas:
//! negative entries are consumed, positive entries produced.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::air::Gas;
use crate::constants::wear::{BREAK_CHANCE_PER_DAY, MAX_BREAK_CHANCE};
use crate::resources::{Ingredient, TankType};

/// Gas pools inside the station air that peripherals act on directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AirPool {
    O2,
    Co2,
    Vapor,
}

impl AirPool {
    pub fn gas(self) -> Gas {
        match self {
            Self::O2 => Gas::O2,
            Self::Co2 => Gas::Co2,
            Self::Vapor => Gas::H2o,
        }
    }
}

/// Where a consumable comes from or goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConsumableKind {
    Ingredient(Ingredient),
    Tank(TankType),
    AirPool(AirPool),
}

impl fmt::Display for ConsumableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ingredient(ingredient) => write!(f, "{ingredient:?}"),
            Self::Tank(tank_type) => write!(f, "{tank_type:?} tank"),
            Self::AirPool(pool) => write!(f, "air {pool:?}"),
        }
    }
}

/// Static description of a peripheral type.
#[derive(Debug, Clone)]
pub struct PeripheralSpec {
    pub name: &'static str,
    /// Energy drawn per hour while powered.
    pub power_draw: u32,
    /// Signed per-hour deltas.
    pub consumables: &'static [(ConsumableKind, i32)],
    /// Whether the device wears out and can break.
    pub breakable: bool,
}

impl PeripheralSpec {
    pub fn consumed(&self) -> impl Iterator<Item = (ConsumableKind, u32)> + '_ {
        self.consumables
            .iter()
            .filter(|(_, delta)| *delta < 0)
            .map(|(kind, delta)| (*kind, delta.unsigned_abs()))
    }

    pub fn produced(&self) -> impl Iterator<Item = (ConsumableKind, u32)> + '_ {
        self.consumables
            .iter()
            .filter(|(_, delta)| *delta > 0)
            .map(|(kind, delta)| (*kind, *delta as u32))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PeripheralType {
    ScrubberCo2,
    Electrolizer,
    Methanizer,
    Condensator,
    WaterFilter,
    BioSolidifier,
    Radiator,
}

impl PeripheralType {
    pub fn spec(&self) -> PeripheralSpec {
        use ConsumableKind as C;
        match self {
            Self::ScrubberCo2 => PeripheralSpec {
                name: "CO2 Scrubber",
                power_draw: 4,
                consumables: &[(C::AirPool(AirPool::Co2), -3), (C::Tank(TankType::Co2), 3)],
                breakable: true,
            },
            Self::Electrolizer => PeripheralSpec {
                name: "Electrolizer",
                power_draw: 6,
                consumables: &[
                    (C::Tank(TankType::H2o), -2),
                    (C::AirPool(AirPool::O2), 1),
                    (C::Tank(TankType::H2), 2),
                ],
                breakable: true,
            },
            Self::Methanizer => PeripheralSpec {
                name: "Methanizer",
                power_draw: 4,
                consumables: &[
                    (C::Tank(TankType::Co2), -1),
                    (C::Tank(TankType::H2), -4),
                    (C::Tank(TankType::Ch4), 1),
                    (C::Tank(TankType::H2o), 2),
                ],
                breakable: true,
            },
            Self::Condensator => PeripheralSpec {
                name: "Condensator",
                power_draw: 2,
                consumables: &[(C::AirPool(AirPool::Vapor), -2), (C::Tank(TankType::H2o), 2)],
                breakable: true,
            },
            Self::WaterFilter => PeripheralSpec {
                name: "Water Filter",
                power_draw: 3,
                consumables: &[
                    (C::Ingredient(Ingredient::WasteLiquid), -5),
                    (C::Tank(TankType::H2o), 4),
                ],
                breakable: true,
            },
            Self::BioSolidifier => PeripheralSpec {
                name: "Bio Solidifier",
                power_draw: 3,
                consumables: &[
                    (C::Ingredient(Ingredient::WasteSolid), -2),
                    (C::Ingredient(Ingredient::Fertilizer), 1),
                ],
                breakable: true,
            },
            Self::Radiator => PeripheralSpec {
                name: "Radiator",
                power_draw: 1,
                consumables: &[],
                breakable: true,
            },
        }
    }

    pub fn all() -> &'static [PeripheralType] {
        &[
            Self::ScrubberCo2,
            Self::Electrolizer,
            Self::Methanizer,
            Self::Condensator,
            Self::WaterFilter,
            Self::BioSolidifier,
            Self::Radiator,
        ]
    }
}

/// An installed device.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Peripheral {
    pub id: u32,
    pub peripheral_type: PeripheralType,
    pub is_broken: bool,
    pub power_on: bool,
    pub last_fixed: Option<DateTime<Utc>>,
}

impl Peripheral {
    /// A working, powered-on peripheral that has never needed a repair.
    pub fn new(id: u32, peripheral_type: PeripheralType) -> Self {
        Self {
            id,
            peripheral_type,
            is_broken: false,
            power_on: true,
            last_fixed: None,
        }
    }

    pub fn spec(&self) -> PeripheralSpec {
        self.peripheral_type.spec()
    }

    /// Energy drawn this hour. Zero when broken or switched off.
    pub fn power_consume(&self) -> u32 {
        if self.is_broken || !self.power_on {
            0
        } else {
            self.spec().power_draw
        }
    }

    pub fn is_working(&self) -> bool {
        !self.is_broken && self.power_on
    }

    /// Chance of breaking during one hour of operation at `now`.
    ///
    /// Grows with days since the last repair. A device never repaired is
    /// factory-new and does not wear.
    pub fn break_chance(&self, now: DateTime<Utc>) -> f64 {
        if !self.spec().breakable {
            return 0.0;
        }
        let Some(fixed) = self.last_fixed else {
            return 0.0;
        };
        let days = (now - fixed).num_days().max(0) as f64;
        (days * BREAK_CHANCE_PER_DAY).min(MAX_BREAK_CHANCE)
    }

    pub fn fix(&mut self, now: DateTime<Utc>) {
        self.is_broken = false;
        self.last_fixed = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2040, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_broken_or_off_draws_nothing() {
        let mut p = Peripheral::new(1, PeripheralType::Electrolizer);
        assert_eq!(p.power_consume(), 6);
        p.power_on = false;
        assert_eq!(p.power_consume(), 0);
        p.power_on = true;
        p.is_broken = true;
        assert_eq!(p.power_consume(), 0);
    }

    #[test]
    fn test_consumed_and_produced_split() {
        let spec = PeripheralType::Methanizer.spec();
        let consumed: Vec<_> = spec.consumed().collect();
        let produced: Vec<_> = spec.produced().collect();
        assert_eq!(consumed.len(), 2);
        assert_eq!(produced.len(), 2);
        assert!(consumed.contains(&(ConsumableKind::Tank(TankType::H2), 4)));
        assert!(produced.contains(&(ConsumableKind::Tank(TankType::H2o), 2)));
    }

    #[test]
    fn test_every_type_has_power_draw() {
        for t in PeripheralType::all() {
            assert!(t.spec().power_draw > 0, "{:?} should draw power", t);
        }
    }

    #[test]
    fn test_new_peripheral_does_not_wear() {
        let p = Peripheral::new(1, PeripheralType::ScrubberCo2);
        assert_eq!(p.break_chance(t0()), 0.0);
    }

    #[test]
    fn test_break_chance_grows_and_caps() {
        let mut p = Peripheral::new(1, PeripheralType::ScrubberCo2);
        p.fix(t0());
        let ten_days = p.break_chance(t0() + Duration::days(10));
        assert!((ten_days - 0.01).abs() < 1e-9);
        let ages = p.break_chance(t0() + Duration::days(400));
        assert!((ages - MAX_BREAK_CHANCE).abs() < 1e-9);
    }
}
