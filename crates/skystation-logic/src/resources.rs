//! Containers held by the truss: tanks, storage boxes, batteries, plus the
//! solar panels and antenna mounted on it.
//!
//! Every container keeps `0 <= current <= capacity`. Filling returns the
//! amount that did not fit instead of overflowing.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::modules::SOLAR_OUTPUT_PER_SIZE;

/// Gas or liquid a tank can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TankType {
    O2,
    Co2,
    N2,
    H2,
    Ch4,
    H2o,
    /// Pre-mixed breathing air.
    Air,
}

impl TankType {
    pub const ALL: [TankType; 7] = [
        TankType::O2,
        TankType::Co2,
        TankType::N2,
        TankType::H2,
        TankType::Ch4,
        TankType::H2o,
        TankType::Air,
    ];

    /// Tank types whose empty shells get cleared after a cycle.
    pub fn clears_when_empty(self) -> bool {
        matches!(self, Self::O2 | Self::H2o)
    }
}

/// Solid goods kept in storage boxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Ingredient {
    Aluminium,
    Copper,
    Iron,
    Lithium,
    Polimer,
    Silica,
    Ceramic,
    Sensor,
    Circuitboard,
    Fertilizer,
    WasteLiquid,
    WasteSolid,
}

/// Raised when a container is built with inconsistent numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerError {
    OverCapacity { current: u32, capacity: u32 },
}

impl fmt::Display for ContainerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerError::OverCapacity { current, capacity } => {
                write!(f, "container holds {current} but only fits {capacity}")
            }
        }
    }
}

impl std::error::Error for ContainerError {}

fn checked(current: u32, capacity: u32) -> Result<(), ContainerError> {
    if current > capacity {
        Err(ContainerError::OverCapacity { current, capacity })
    } else {
        Ok(())
    }
}

/// Put up to `amount` into a container, returning what did not fit.
fn pour(current: &mut u32, capacity: u32, amount: u32) -> u32 {
    let room = capacity.saturating_sub(*current);
    let placed = room.min(amount);
    *current += placed;
    amount - placed
}

/// Take up to `amount` out of a container, returning what was taken.
fn drain(current: &mut u32, amount: u32) -> u32 {
    let taken = amount.min(*current);
    *current -= taken;
    taken
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTank")]
pub struct Tank {
    pub tank_type: TankType,
    current: u32,
    capacity: u32,
}

impl Tank {
    pub fn new(tank_type: TankType, current: u32, capacity: u32) -> Result<Self, ContainerError> {
        checked(current, capacity)?;
        Ok(Self {
            tank_type,
            current,
            capacity,
        })
    }

    /// A full tank of the given size.
    pub fn full(tank_type: TankType, capacity: u32) -> Self {
        Self {
            tank_type,
            current: capacity,
            capacity,
        }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn room(&self) -> u32 {
        self.capacity.saturating_sub(self.current)
    }

    pub fn fill(&mut self, amount: u32) -> u32 {
        pour(&mut self.current, self.capacity, amount)
    }

    pub fn draw(&mut self, amount: u32) -> u32 {
        drain(&mut self.current, amount)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawStorageBox")]
pub struct StorageBox {
    pub ingredient: Ingredient,
    current: u32,
    capacity: u32,
}

impl StorageBox {
    pub fn new(
        ingredient: Ingredient,
        current: u32,
        capacity: u32,
    ) -> Result<Self, ContainerError> {
        checked(current, capacity)?;
        Ok(Self {
            ingredient,
            current,
            capacity,
        })
    }

    pub fn empty(ingredient: Ingredient, capacity: u32) -> Self {
        Self {
            ingredient,
            current: 0,
            capacity,
        }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn fill(&mut self, amount: u32) -> u32 {
        pour(&mut self.current, self.capacity, amount)
    }

    pub fn draw(&mut self, amount: u32) -> u32 {
        drain(&mut self.current, amount)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBattery")]
pub struct Battery {
    current: u32,
    capacity: u32,
}

impl Battery {
    pub fn new(current: u32, capacity: u32) -> Result<Self, ContainerError> {
        checked(current, capacity)?;
        Ok(Self { current, capacity })
    }

    pub fn full(capacity: u32) -> Self {
        Self {
            current: capacity,
            capacity,
        }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn charge(&mut self, amount: u32) -> u32 {
        pour(&mut self.current, self.capacity, amount)
    }

    pub fn discharge(&mut self, amount: u32) -> u32 {
        drain(&mut self.current, amount)
    }
}

// ── Loading ──
// Stored containers pass through the same capacity check as `new`.

#[derive(Deserialize)]
struct RawTank {
    tank_type: TankType,
    current: u32,
    capacity: u32,
}

impl TryFrom<RawTank> for Tank {
    type Error = ContainerError;

    fn try_from(raw: RawTank) -> Result<Self, Self::Error> {
        Tank::new(raw.tank_type, raw.current, raw.capacity)
    }
}

#[derive(Deserialize)]
struct RawStorageBox {
    ingredient: Ingredient,
    current: u32,
    capacity: u32,
}

impl TryFrom<RawStorageBox> for StorageBox {
    type Error = ContainerError;

    fn try_from(raw: RawStorageBox) -> Result<Self, Self::Error> {
        StorageBox::new(raw.ingredient, raw.current, raw.capacity)
    }
}

#[derive(Deserialize)]
struct RawBattery {
    current: u32,
    capacity: u32,
}

impl TryFrom<RawBattery> for Battery {
    type Error = ContainerError;

    fn try_from(raw: RawBattery) -> Result<Self, Self::Error> {
        Battery::new(raw.current, raw.capacity)
    }
}

/// Solar panel bolted to the truss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolarPanel {
    pub size: u32,
}

impl SolarPanel {
    /// Energy produced per hour.
    pub fn output(&self) -> u32 {
        self.size.saturating_mul(SOLAR_OUTPUT_PER_SIZE)
    }
}

/// Communications antenna; its level drives passive income.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Antenna {
    pub level: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_over_capacity() {
        assert_eq!(
            Tank::new(TankType::O2, 11, 10),
            Err(ContainerError::OverCapacity {
                current: 11,
                capacity: 10
            })
        );
        assert!(Battery::new(10, 10).is_ok());
    }

    #[test]
    fn test_fill_returns_spill() {
        let mut tank = Tank::new(TankType::H2o, 8, 10).unwrap();
        assert_eq!(tank.fill(5), 3);
        assert_eq!(tank.current(), 10);
    }

    #[test]
    fn test_draw_stops_at_zero() {
        let mut storage = StorageBox::new(Ingredient::Iron, 4, 20).unwrap();
        assert_eq!(storage.draw(9), 4);
        assert_eq!(storage.current(), 0);
    }

    #[test]
    fn test_loading_rejects_over_capacity() {
        let overfull = r#"{"tank_type":"H2o","current":500,"capacity":10}"#;
        let err = serde_json::from_str::<Tank>(overfull).unwrap_err();
        assert!(err.to_string().contains("holds 500 but only fits 10"));

        assert!(serde_json::from_str::<StorageBox>(
            r#"{"ingredient":"Iron","current":21,"capacity":20}"#
        )
        .is_err());
        assert!(serde_json::from_str::<Battery>(r#"{"current":101,"capacity":100}"#).is_err());
    }

    #[test]
    fn test_loading_keeps_valid_containers() {
        let tank = Tank::new(TankType::O2, 30, 100).unwrap();
        let json = serde_json::to_string(&tank).unwrap();
        assert_eq!(serde_json::from_str::<Tank>(&json).unwrap(), tank);

        let battery: Battery = serde_json::from_str(r#"{"current":40,"capacity":100}"#).unwrap();
        assert_eq!(battery.current(), 40);
    }

    #[test]
    fn test_solar_output_scales_with_size() {
        assert_eq!(SolarPanel { size: 3 }.output(), 3 * SOLAR_OUTPUT_PER_SIZE);
    }
}
