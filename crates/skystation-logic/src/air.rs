//! Station breathing air: gas amounts, volume and quality tiers.
//!
//! The station holds a single shared air mass. Every gas is a whole number
//! of units, so nothing can go negative; removals saturate at zero and
//! report how much was actually taken.

use serde::{Deserialize, Serialize};

use crate::constants::air::*;

/// Gases tracked in the station air.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gas {
    O2,
    Co2,
    N2,
    H2,
    Ch4,
    H2o,
}

/// Air quality, ordered from worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AirQuality {
    Lethal,
    Bad,
    Medium,
    Good,
    Great,
}

impl AirQuality {
    /// Whether the oxygen regulator should step in.
    pub fn needs_regulation(self) -> bool {
        matches!(self, Self::Lethal | Self::Bad | Self::Medium)
    }
}

/// Gas amounts making up the station air.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirComposition {
    pub o2: u32,
    pub co2: u32,
    pub n2: u32,
    pub h2: u32,
    pub ch4: u32,
    pub h2o: u32,
}

impl AirComposition {
    /// Fresh air of the default blend, `amount` units in total.
    pub fn fresh(amount: u32) -> Self {
        let mut air = Self::default();
        air.merge_with(amount);
        air
    }

    /// Sum of all gas amounts.
    pub fn volume(&self) -> u32 {
        [self.o2, self.co2, self.n2, self.h2, self.ch4, self.h2o]
            .into_iter()
            .fold(0, u32::saturating_add)
    }

    pub fn get(&self, gas: Gas) -> u32 {
        match gas {
            Gas::O2 => self.o2,
            Gas::Co2 => self.co2,
            Gas::N2 => self.n2,
            Gas::H2 => self.h2,
            Gas::Ch4 => self.ch4,
            Gas::H2o => self.h2o,
        }
    }

    fn slot(&mut self, gas: Gas) -> &mut u32 {
        match gas {
            Gas::O2 => &mut self.o2,
            Gas::Co2 => &mut self.co2,
            Gas::N2 => &mut self.n2,
            Gas::H2 => &mut self.h2,
            Gas::Ch4 => &mut self.ch4,
            Gas::H2o => &mut self.h2o,
        }
    }

    pub fn add(&mut self, gas: Gas, amount: u32) {
        let slot = self.slot(gas);
        *slot = slot.saturating_add(amount);
    }

    /// Take up to `amount` of a gas. Returns what was actually removed.
    pub fn remove(&mut self, gas: Gas, amount: u32) -> u32 {
        let slot = self.slot(gas);
        let taken = amount.min(*slot);
        *slot -= taken;
        taken
    }

    /// Classify the air by its O2 and CO2 share of the total volume.
    pub fn air_quality(&self) -> AirQuality {
        let volume = self.volume() as u64;
        if volume == 0 {
            return AirQuality::Lethal;
        }
        let o2 = self.o2 as u64 * 100;
        let co2 = self.co2 as u64 * 100;
        let within = |min_o2: u32, max_co2: u32| {
            o2 >= min_o2 as u64 * volume && co2 < max_co2 as u64 * volume
        };

        if within(GREAT_MIN_O2, GREAT_MAX_CO2) {
            AirQuality::Great
        } else if within(GOOD_MIN_O2, GOOD_MAX_CO2) {
            AirQuality::Good
        } else if within(MEDIUM_MIN_O2, MEDIUM_MAX_CO2) {
            AirQuality::Medium
        } else if within(BAD_MIN_O2, BAD_MAX_CO2) {
            AirQuality::Bad
        } else {
            AirQuality::Lethal
        }
    }

    /// O2 that must be added to reach the safe ratio.
    ///
    /// Adding oxygen also grows the volume, so this is the smallest `d`
    /// with `(o2 + d) / (volume + d) >= SAFE_O2_PERCENT`.
    pub fn needs_oxygen(&self) -> u32 {
        let target = SAFE_O2_PERCENT as u64 * self.volume() as u64;
        let have = self.o2 as u64 * 100;
        if have >= target {
            return 0;
        }
        let per_unit = 100 - SAFE_O2_PERCENT as u64;
        let deficit = (target - have).div_ceil(per_unit);
        u32::try_from(deficit).unwrap_or(u32::MAX)
    }

    /// Blend in `amount` units of fresh air.
    pub fn merge_with(&mut self, amount: u32) {
        let share = |per_100: u32| (amount as u64 * per_100 as u64 / 100) as u32;
        let o2 = share(FRESH_O2_PER_100);
        let h2o = share(FRESH_H2O_PER_100);
        self.add(Gas::O2, o2);
        self.add(Gas::H2o, h2o);
        self.add(Gas::N2, amount - o2 - h2o);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_huge_amounts_saturate() {
        let mut air = AirComposition {
            n2: u32::MAX - 5,
            o2: 100,
            ..AirComposition::default()
        };
        assert_eq!(air.volume(), u32::MAX);
        air.merge_with(1000);
        assert_eq!(air.n2, u32::MAX);
        assert_eq!(air.o2, 100 + 1000 * FRESH_O2_PER_100 / 100);
    }

    #[test]
    fn test_volume_is_sum_of_gases() {
        let air = AirComposition {
            o2: 10,
            co2: 2,
            n2: 30,
            h2: 1,
            ch4: 1,
            h2o: 6,
        };
        assert_eq!(air.volume(), 50);
    }

    #[test]
    fn test_fresh_air_is_great() {
        let air = AirComposition::fresh(1000);
        assert_eq!(air.volume(), 1000);
        assert_eq!(air.o2, 210);
        assert_eq!(air.air_quality(), AirQuality::Great);
        assert_eq!(air.needs_oxygen(), 0);
    }

    #[test]
    fn test_empty_air_is_lethal() {
        assert_eq!(AirComposition::default().air_quality(), AirQuality::Lethal);
    }

    #[test]
    fn test_quality_tiers_by_o2() {
        let mk = |o2| AirComposition {
            o2,
            n2: 100 - o2,
            ..Default::default()
        };
        assert_eq!(mk(21).air_quality(), AirQuality::Great);
        assert_eq!(mk(20).air_quality(), AirQuality::Good);
        assert_eq!(mk(17).air_quality(), AirQuality::Medium);
        assert_eq!(mk(12).air_quality(), AirQuality::Bad);
        assert_eq!(mk(5).air_quality(), AirQuality::Lethal);
    }

    #[test]
    fn test_co2_degrades_quality() {
        let air = AirComposition {
            o2: 22,
            co2: 5,
            n2: 73,
            ..Default::default()
        };
        assert_eq!(air.air_quality(), AirQuality::Bad);
    }

    #[test]
    fn test_quality_ordering() {
        assert!(AirQuality::Great > AirQuality::Good);
        assert!(AirQuality::Medium > AirQuality::Bad);
        assert!(AirQuality::Bad > AirQuality::Lethal);
        assert!(AirQuality::Medium.needs_regulation());
        assert!(!AirQuality::Good.needs_regulation());
    }

    #[test]
    fn test_needs_oxygen_reaches_safe_ratio() {
        let mut air = AirComposition {
            o2: 221,
            n2: 1280,
            ..Default::default()
        };
        assert_eq!(air.air_quality(), AirQuality::Bad);
        let deficit = air.needs_oxygen();
        assert_eq!(deficit, 120);
        air.add(Gas::O2, deficit);
        assert_eq!(air.needs_oxygen(), 0);
        assert_eq!(air.air_quality(), AirQuality::Great);
    }

    #[test]
    fn test_remove_saturates() {
        let mut air = AirComposition {
            co2: 3,
            ..Default::default()
        };
        assert_eq!(air.remove(Gas::Co2, 5), 3);
        assert_eq!(air.co2, 0);
    }
}
