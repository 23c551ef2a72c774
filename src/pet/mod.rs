//! Core pet engine: mood, energy, XP and the effect of each developer event.

pub mod event;

use serde::{Deserialize, Serialize};

pub use event::Event;

/// Energy never leaves `0..=MAX_ENERGY`.
pub const MAX_ENERGY: i32 = 100;
/// XP needed per level.
pub const XP_PER_LEVEL: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    // Aliases read state files written before moods were lowercased.
    #[serde(alias = "Happy")]
    Happy,
    #[serde(alias = "Neutral")]
    Neutral,
    #[serde(alias = "Sad")]
    Sad,
    #[serde(alias = "Sleeping")]
    Sleeping,
    #[serde(alias = "Scared")]
    Scared,
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Happy => write!(f, "happy"),
            Self::Neutral => write!(f, "neutral"),
            Self::Sad => write!(f, "sad"),
            Self::Sleeping => write!(f, "sleeping"),
            Self::Scared => write!(f, "scared"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetState {
    pub mood: Mood,
    pub energy: i32,
    pub xp: u32,
    pub level: u32,
}

impl Default for PetState {
    fn default() -> Self {
        Self::new()
    }
}

impl PetState {
    /// A freshly hatched pet.
    pub fn new() -> Self {
        Self {
            mood: Mood::Neutral,
            energy: 50,
            xp: 0,
            level: 1,
        }
    }

    /// Add XP and recompute the level from the total.
    pub fn add_xp(&mut self, delta: u32) {
        self.xp = self.xp.saturating_add(delta);
        self.level = self.xp / XP_PER_LEVEL + 1;
    }

    fn adjust_energy(&mut self, delta: i32) {
        self.energy = (self.energy + delta).clamp(0, MAX_ENERGY);
    }

    pub fn apply_event(&mut self, event: Event) {
        match event {
            Event::Commit => {
                self.add_xp(10);
                self.mood = Mood::Happy;
                self.adjust_energy(1);
            }
            Event::TestPass => {
                self.add_xp(15);
                self.mood = Mood::Happy;
            }
            Event::TestFail => {
                self.add_xp(2);
                self.mood = Mood::Sad;
            }
            Event::MergeConflict | Event::ForcePushMain => {
                self.mood = Mood::Scared;
            }
            Event::Inactivity => {
                self.adjust_energy(-5);
                self.mood = if self.energy <= 20 {
                    Mood::Sad
                } else {
                    Mood::Neutral
                };
            }
            Event::NpmInstall => {
                self.add_xp(1);
                self.mood = Mood::Neutral;
            }
            Event::FridayDeploy => {
                self.add_xp(20);
                self.mood = Mood::Scared;
            }
            Event::BugFix => {
                self.add_xp(12);
                self.mood = Mood::Happy;
            }
        }
        tracing::debug!(
            event = %event,
            mood = %self.mood,
            energy = self.energy,
            xp = self.xp,
            level = self.level,
            "applied event"
        );
    }
}
