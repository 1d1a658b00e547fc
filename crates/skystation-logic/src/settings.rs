//! Accounting options recognized by the engine.
//!
//! Every field has a default, so partial settings files deserialize.

use serde::{Deserialize, Serialize};

use crate::constants::clock::DEFAULT_MAX_CATCH_UP_CYCLES;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountingSettings {
    /// Remove empty O2 and water tanks after each cycle.
    pub clear_empty_tanks: bool,
    /// Consolidate partial tanks of the same type after each cycle.
    pub auto_merge_tanks: bool,
    /// Let serving bio-boxes feed people when the food queue is empty.
    pub serve_bio_box: bool,
    /// Trace every phase at debug level.
    pub debug_accounting: bool,
    /// Upper bound on cycles run by one catch-up call.
    pub max_catch_up_cycles: u32,
}

impl Default for AccountingSettings {
    fn default() -> Self {
        Self {
            clear_empty_tanks: false,
            auto_merge_tanks: false,
            serve_bio_box: false,
            debug_accounting: false,
            max_catch_up_cycles: DEFAULT_MAX_CATCH_UP_CYCLES,
        }
    }
}
