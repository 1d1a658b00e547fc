//! Bio-boxes: small biological populations grown in bio modules.
//!
//! Each individual is a DNA code string. A box is driven by its mode:
//! growing adds random individuals, multiplying clones the perfect
//! genotype once it exists, and serving boxes double as an emergency food
//! source. Population never exceeds the limit after a pass completes.

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::constants::bio::DNA_ALPHABET;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BioBoxMode {
    Grow,
    Evolve,
    Multiply,
    Serving,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BioBox {
    pub id: u32,
    pub mode: BioBoxMode,
    pub perfect_dna: String,
    pub population: Vec<String>,
    pub population_limit: usize,
    pub current_generation: u32,
}

/// A random DNA code of `len` characters.
pub fn random_dna(len: usize, rng: &mut dyn RngCore) -> String {
    (0..len)
        .map(|_| DNA_ALPHABET[rng.gen_range(0..DNA_ALPHABET.len())] as char)
        .collect()
}

impl BioBox {
    pub fn new(id: u32, perfect_dna: impl Into<String>, population_limit: usize) -> Self {
        Self {
            id,
            mode: BioBoxMode::Grow,
            perfect_dna: perfect_dna.into(),
            population: Vec::new(),
            population_limit,
            current_generation: 0,
        }
    }

    pub fn is_full(&self) -> bool {
        self.population.len() >= self.population_limit
    }

    pub fn perfect_count(&self) -> usize {
        self.population
            .iter()
            .filter(|dna| **dna == self.perfect_dna)
            .count()
    }

    pub fn has_perfect(&self) -> bool {
        self.perfect_count() > 0
    }

    /// Births a growing box would have this hour, capped to the room left.
    ///
    /// Under a quarter full the population more than doubles, under half
    /// full it grows by a third, otherwise two are born.
    pub fn newborn_count(&self) -> usize {
        let pop = self.population.len();
        let limit = self.population_limit;
        if pop >= limit {
            return 0;
        }
        let born = if pop * 4 < limit {
            pop * 2
        } else if pop * 2 < limit {
            pop.div_ceil(3)
        } else {
            2
        };
        born.min(limit - pop)
    }

    /// Append `count` random individuals. Returns true when one of them
    /// carries the perfect genotype.
    pub fn add_newborns(&mut self, count: usize, rng: &mut dyn RngCore) -> bool {
        let len = self.perfect_dna.len();
        let mut found = false;
        for _ in 0..count {
            let dna = random_dna(len, rng);
            found |= dna == self.perfect_dna;
            self.population.push(dna);
        }
        self.population.truncate(self.population_limit);
        if count > 0 {
            self.current_generation += 1;
        }
        found
    }

    /// Replace the population with twice as many copies of the perfect
    /// genotype, capped at the limit. Returns the new size, or `None` when
    /// no perfect individual exists yet.
    pub fn multiply_perfect(&mut self) -> Option<usize> {
        let perfect = self.perfect_count();
        if perfect == 0 {
            return None;
        }
        let size = (perfect * 2).min(self.population_limit);
        self.population = vec![self.perfect_dna.clone(); size];
        self.current_generation += 1;
        Some(size)
    }

    /// Take one individual out to be eaten.
    pub fn serve(&mut self) -> Option<String> {
        self.population.pop()
    }
}
