//! Inhabitants: vitals, meals, activities, skills.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::humans::*;

/// Skills a person can train.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Skill {
    Mechanic,
    Electric,
    Biologic,
    Medic,
    Handy,
    Datacomm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillLevel {
    pub skill: Skill,
    pub level: u32,
}

/// What an ongoing activity is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityKind {
    /// Studying a skill; exempt from the busy penalty.
    Study(Skill),
    Work,
    Exercise,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub name: String,
    pub kind: ActivityKind,
    pub started_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

impl Activity {
    pub fn is_finished(&self, now: DateTime<Utc>) -> bool {
        self.ends_at <= now
    }

    pub fn is_study(&self) -> bool {
        matches!(self.kind, ActivityKind::Study(_))
    }
}

/// A station inhabitant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    pub id: u64,
    pub name: String,
    pub age: u32,
    /// 0..=100
    pub health_physical: i32,
    /// 0..=100
    pub happiness: i32,
    /// 30..=100
    pub life_expectancy: i32,
    /// Most recent meal last.
    pub food_eaten: VecDeque<String>,
    pub activity: Option<Activity>,
    pub skills: Vec<SkillLevel>,
}

impl Person {
    pub fn new(id: u64, name: impl Into<String>, age: u32) -> Self {
        Self {
            id,
            name: name.into(),
            age,
            health_physical: 75,
            happiness: 50,
            life_expectancy: LIFE_EXPECTANCY_TARGET,
            food_eaten: VecDeque::new(),
            activity: None,
            skills: Vec::new(),
        }
    }

    /// Remember a meal, forgetting the oldest beyond the history size.
    pub fn record_meal(&mut self, food: impl Into<String>) {
        self.food_eaten.push_back(food.into());
        while self.food_eaten.len() > FOOD_HISTORY {
            self.food_eaten.pop_front();
        }
    }

    /// Distinct dishes in the meal history.
    pub fn food_variety(&self) -> usize {
        let mut seen: Vec<&str> = self.food_eaten.iter().map(String::as_str).collect();
        seen.sort_unstable();
        seen.dedup();
        seen.len()
    }

    pub fn skill_level(&self, skill: Skill) -> u32 {
        self.skills
            .iter()
            .find(|s| s.skill == skill)
            .map_or(0, |s| s.level)
    }

    pub fn train(&mut self, skill: Skill) {
        match self.skills.iter_mut().find(|s| s.skill == skill) {
            Some(s) => s.level += 1,
            None => self.skills.push(SkillLevel { skill, level: 1 }),
        }
    }

    pub fn apply_health_delta(&mut self, delta: i32) {
        self.health_physical = (self.health_physical + delta).clamp(ATTRIBUTE_MIN, ATTRIBUTE_MAX);
    }

    pub fn apply_happiness_delta(&mut self, delta: i32) {
        self.happiness = (self.happiness + delta).clamp(ATTRIBUTE_MIN, ATTRIBUTE_MAX);
    }

    pub fn apply_life_expectancy_delta(&mut self, delta: i32) {
        self.life_expectancy =
            (self.life_expectancy + delta).clamp(LIFE_EXPECTANCY_MIN, LIFE_EXPECTANCY_MAX);
    }
}
