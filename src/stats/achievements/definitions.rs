//! Achievement definitions and catalog entries
//!
//! The built-in definitions seed the `achievements` table. Once seeded, the
//! table is the catalog the engine reads from.

use serde::{Deserialize, Serialize};

/// Unique identifier for each built-in achievement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementId {
    FirstBook,
    NightOwl,
    Streak7,
    SocialButterfly,
}

impl AchievementId {
    /// Get the catalog code for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstBook => "first_book",
            Self::NightOwl => "night_owl",
            Self::Streak7 => "streak_7",
            Self::SocialButterfly => "social_butterfly",
        }
    }

    /// Parse from a catalog code
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "first_book" => Some(Self::FirstBook),
            "night_owl" => Some(Self::NightOwl),
            "streak_7" => Some(Self::Streak7),
            "social_butterfly" => Some(Self::SocialButterfly),
            _ => None,
        }
    }

    pub fn all() -> &'static [AchievementId] {
        &[
            Self::FirstBook,
            Self::NightOwl,
            Self::Streak7,
            Self::SocialButterfly,
        ]
    }
}

impl std::fmt::Display for AchievementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Built-in achievement definition used for seeding
#[derive(Debug, Clone)]
pub struct AchievementDefinition {
    pub id: AchievementId,
    pub name: &'static str,
    pub description: &'static str,
    pub icon_name: &'static str,
    pub xp_reward: u32,
}

impl AchievementDefinition {
    /// Look up the definition for an ID
    pub fn get(id: AchievementId) -> &'static AchievementDefinition {
        ACHIEVEMENTS
            .iter()
            .find(|a| a.id == id)
            .unwrap_or(&ACHIEVEMENTS[0])
    }

    /// Catalog row for this definition
    pub fn to_catalog(&self) -> Achievement {
        Achievement {
            code: self.id.as_str().to_string(),
            name: self.name.to_string(),
            description: self.description.to_string(),
            icon_name: self.icon_name.to_string(),
            experience_reward: self.xp_reward,
        }
    }
}

/// All built-in achievement definitions
pub static ACHIEVEMENTS: &[AchievementDefinition] = &[
    AchievementDefinition {
        id: AchievementId::FirstBook,
        name: "First Book",
        description: "Finish your first book",
        icon_name: "emoji_events_rounded",
        xp_reward: 100,
    },
    AchievementDefinition {
        id: AchievementId::NightOwl,
        name: "Night Owl",
        description: "Log reading after 11 PM",
        icon_name: "nights_stay_rounded",
        xp_reward: 50,
    },
    AchievementDefinition {
        id: AchievementId::Streak7,
        name: "7-Day Streak",
        description: "Read 7 days in a row",
        icon_name: "bolt_rounded",
        xp_reward: 200,
    },
    AchievementDefinition {
        id: AchievementId::SocialButterfly,
        name: "Social Butterfly",
        description: "Follow 5 readers or publishers",
        icon_name: "people_rounded",
        xp_reward: 50,
    },
];

/// Catalog entry as stored in the `achievements` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub code: String,
    pub name: String,
    pub description: String,
    pub icon_name: String,
    pub experience_reward: u32,
}
