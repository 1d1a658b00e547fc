//! Built station modules and what they cost to keep running.

use serde::{Deserialize, Serialize};

use crate::biobox::BioBox;
use crate::constants::modules::{BIO_ENERGY, HAB_ENERGY, LAB_ENERGY};
use crate::people::Person;

/// Living quarters; inhabitants live here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HabModule {
    pub id: u32,
    pub name: String,
    pub capacity: usize,
    pub inhabitants: Vec<Person>,
}

impl HabModule {
    pub fn new(id: u32, name: impl Into<String>, capacity: usize) -> Self {
        Self {
            id,
            name: name.into(),
            capacity,
            inhabitants: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabModule {
    pub id: u32,
    pub name: String,
}

/// Houses bio-boxes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BioModule {
    pub id: u32,
    pub name: String,
    pub boxes: Vec<BioBox>,
}

/// Every module kind, for energy and air-volume bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModuleKind {
    Hab,
    Lab,
    Bio,
}

impl ModuleKind {
    /// Energy drawn per hour.
    pub fn energy(self) -> u32 {
        match self {
            Self::Hab => HAB_ENERGY,
            Self::Lab => LAB_ENERGY,
            Self::Bio => BIO_ENERGY,
        }
    }
}
