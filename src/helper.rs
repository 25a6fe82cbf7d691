// Storyteller helper: script rosters, night order and the info prompts shown to players.
pub mod catalog;
pub mod entries;
pub mod info;
pub mod night_order;
pub mod selection;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

pub use catalog::{HelperScript, HELPER_SCRIPTS};
pub use entries::{fetch_helper_entries, normalize_entries, playable_characters};
pub use info::{HelperInfo, character_infos, format_helper_message};
pub use night_order::night_order;
pub use selection::CharacterSelection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Team {
    Townsfolk,
    Outsider,
    Minion,
    Demon,
    Traveler,
    Info, // Night-order markers such as dusk and dawn.
}

// The four teams a player character can belong to.
pub const ALL_TEAMS: [Team; 4] = [Team::Townsfolk, Team::Outsider, Team::Minion, Team::Demon];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Alignment {
    #[default]
    Good,
    Evil,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub id: String,
    pub name: String,
    pub image: String,
    pub first_night: u32,
    pub first_night_reminder: String,
    pub other_night: u32,
    pub other_night_reminder: String,
    pub ability: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<Team>,
}

// The "_meta" entry that leads a script JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HelperScriptMeta {
    pub id: String,
    pub name: String,
    pub author: String,
    pub is_official: bool,
    #[serde(default)]
    pub background: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum HelperEntry {
    Meta(HelperScriptMeta),
    Character(Character),
}

impl HelperEntry {
    pub fn as_character(&self) -> Option<&Character> {
        match self {
            HelperEntry::Character(character) => Some(character),
            HelperEntry::Meta(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum HelperTab {
    #[strum(serialize = "first")]
    FirstNight,
    #[strum(serialize = "other")]
    OtherNight,
    #[strum(serialize = "characters")]
    Characters,
}

/// Strips the locale prefix some rosters put on role ids (`kokr_imp`, `ko_KR_imp`).
pub fn normalize_role_id(role_id: &str) -> &str {
    for prefix in ["ko_KR", "kokr"] {
        if let Some(rest) = role_id.strip_prefix(prefix) {
            return rest.strip_prefix('_').unwrap_or(rest);
        }
    }
    role_id
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_normalize_role_id() {
        assert_eq!(normalize_role_id("kokr_imp"), "imp");
        assert_eq!(normalize_role_id("kokrimp"), "imp");
        assert_eq!(normalize_role_id("ko_KR_washerwoman"), "washerwoman");
        assert_eq!(normalize_role_id("ko_KRchef"), "chef");
        assert_eq!(normalize_role_id("empath"), "empath");
    }

    #[test]
    fn test_team_strings() {
        assert_eq!(Team::from_str("townsfolk"), Ok(Team::Townsfolk));
        assert!(Team::from_str("fabled").is_err());
        assert_eq!(Team::Demon.to_string(), "demon");
        assert_eq!(HelperTab::from_str("first"), Ok(HelperTab::FirstNight));
    }
}
