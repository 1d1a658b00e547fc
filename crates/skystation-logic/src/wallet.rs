//! Player wallet seen by the engine: money in, experience level out.

use serde::{Deserialize, Serialize};

pub trait PlayerWallet {
    /// Drives how wild inhabitants' mood swings get.
    fn experience_level(&self) -> u32;
    fn credit(&mut self, amount: u32);
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub money: u64,
    pub experience: u32,
}

impl PlayerWallet for Player {
    fn experience_level(&self) -> u32 {
        self.experience
    }

    fn credit(&mut self, amount: u32) {
        self.money += amount as u64;
    }
}
