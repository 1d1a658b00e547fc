//! Pure station accounting logic for SkyStation.
//!
//! This crate holds the hourly accounting engine and the value types it
//! mutates. Nothing here touches storage, networking or rendering: the
//! caller owns the [`station::Station`], hands the engine an
//! [`accounting::AccountingContext`] carrying settings, wallet, message bus
//! and random source, and persists whatever comes back.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`accounting`] | Hourly cycle pipeline, phases, catch-up scheduling |
//! | [`air`] | Gas amounts, volume, quality tiers, oxygen deficit |
//! | [`biobox`] | Bio-box populations, DNA codes, growth counts |
//! | [`constants`] | Tuning values grouped by concern |
//! | [`events`] | Fire-and-forget notifications and the in-memory log |
//! | [`modules`] | Habitation, lab and bio modules with energy draw |
//! | [`people`] | Inhabitants, meals, activities, skills |
//! | [`peripherals`] | Device table, consumables, wear and breakage |
//! | [`report`] | Per-cycle report draft and the finalized record |
//! | [`resources`] | Tanks, storage boxes, batteries, solar panels, antenna |
//! | [`settings`] | Recognized accounting options |
//! | [`station`] | The aggregate root one cycle mutates |
//! | [`truss`] | Resource store with spill-aware charge/refill/merge |
//! | [`wallet`] | Player money and experience seen by the engine |

pub mod accounting;
pub mod air;
pub mod biobox;
pub mod constants;
pub mod events;
pub mod modules;
pub mod people;
pub mod peripherals;
pub mod report;
pub mod resources;
pub mod settings;
pub mod station;
pub mod truss;
pub mod wallet;
