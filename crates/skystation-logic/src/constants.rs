//! Tuning constants for station accounting, grouped by concern.
//!
//! Plain values with no storage dependency. The engine, the harness and the
//! tests all read the same numbers from here.

/// Simulated clock.
pub mod clock {
    /// Length of one accounting cycle in seconds.
    pub const CYCLE_SECONDS: i64 = 3600;
    /// Hour of day on which the weekly tick fires.
    pub const WEEKLY_TICK_HOUR: u32 = 1;
    /// Default cap on cycles run by one catch-up call (one week).
    pub const DEFAULT_MAX_CATCH_UP_CYCLES: u32 = 168;
}

/// Breathing air.
pub mod air {
    /// Fresh air blend per 100 units.
    pub const FRESH_O2_PER_100: u32 = 21;
    pub const FRESH_H2O_PER_100: u32 = 1;

    /// Quality thresholds, as whole percentages of total volume.
    pub const GREAT_MIN_O2: u32 = 21;
    pub const GREAT_MAX_CO2: u32 = 1;
    pub const GOOD_MIN_O2: u32 = 19;
    pub const GOOD_MAX_CO2: u32 = 2;
    pub const MEDIUM_MIN_O2: u32 = 16;
    pub const MEDIUM_MAX_CO2: u32 = 4;
    pub const BAD_MIN_O2: u32 = 10;
    pub const BAD_MAX_CO2: u32 = 8;

    /// O2 ratio the regulator aims for.
    pub const SAFE_O2_PERCENT: u32 = 21;

    /// Air volume each built module must hold.
    pub const VOLUME_PER_MODULE: u32 = 225;
}

/// Energy draw of built modules per hour.
pub mod modules {
    pub const HAB_ENERGY: u32 = 4;
    pub const LAB_ENERGY: u32 = 3;
    pub const BIO_ENERGY: u32 = 5;

    /// Solar output per unit of panel size per hour.
    pub const SOLAR_OUTPUT_PER_SIZE: u32 = 4;
}

/// Per-inhabitant consumption and attribute bounds.
pub mod humans {
    pub const ATTRIBUTE_MIN: i32 = 0;
    pub const ATTRIBUTE_MAX: i32 = 100;
    pub const LIFE_EXPECTANCY_MIN: i32 = 30;
    pub const LIFE_EXPECTANCY_MAX: i32 = 100;
    pub const LIFE_EXPECTANCY_TARGET: i32 = 75;
    /// Distance from the target before regression kicks in.
    pub const LIFE_EXPECTANCY_DRIFT: i32 = 10;

    /// O2 breathed in (and CO2 breathed out) per person per hour.
    pub const O2_PER_BREATH: u32 = 2;
    pub const CO2_PER_BREATH: u32 = 2;

    /// Energy an ongoing activity draws per hour.
    pub const ACTIVITY_ENERGY: u32 = 2;
    /// Delay added to an activity that could not be powered.
    pub const ACTIVITY_STALL_MINUTES: i64 = 10;

    /// How many meals a person remembers.
    pub const FOOD_HISTORY: usize = 5;

    /// Extremes and divergence for the health/happiness balancing nudge.
    pub const NUDGE_LOW: i32 = 20;
    pub const NUDGE_HIGH: i32 = 80;
    pub const NUDGE_DIVERGENCE: i32 = 40;

    /// Share of working radiators per head that earns the comfort bonus.
    pub const RADIATORS_PER_HEAD_BONUS: f32 = 0.5;
    /// Unlocked tech items that earn the progress bonus.
    pub const TECH_ITEMS_BONUS: usize = 5;

    /// Death chance per year past life expectancy, checked weekly.
    pub const OVERAGE_DEATH_CHANCE_PER_YEAR: f64 = 0.2;
}

/// Peripheral wear.
pub mod wear {
    /// Break chance per day since the last repair.
    pub const BREAK_CHANCE_PER_DAY: f64 = 0.001;
    pub const MAX_BREAK_CHANCE: f64 = 0.05;
}

/// Biological boxes.
pub mod bio {
    /// Energy per newborn while growing.
    pub const GROW_ENERGY_PER_BIRTH: u32 = 10;
    /// Flat energy cost of a multiply pass.
    pub const MULTIPLY_ENERGY: u32 = 10;
    /// Characters a DNA code is built from.
    pub const DNA_ALPHABET: &[u8] = b"ABCDEF";
}

/// Passive antenna income.
pub mod antenna {
    /// Income granted by the first antenna level.
    pub const BASE_INCOME: f64 = 100.0;
    /// Each further level is worth this share of the previous one.
    pub const LEVEL_FALLOFF: f64 = 0.8;
}
