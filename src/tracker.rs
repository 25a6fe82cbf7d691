// Post-game statistics built from exported game logs.
pub mod metrics;
pub mod parser;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use crate::helper::Alignment;
pub use metrics::{DashboardMetrics, RecentGameWinner, WinRateItem};
pub use parser::{load_game_logs, parse_game_log};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameEdition {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_official: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub role: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_alt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub name: String,
    pub role: String,
    pub id: String,
    pub is_dead: bool,
    #[serde(default)]
    pub alignment_index: i64,
    #[serde(default)]
    pub reminders: Vec<Reminder>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_name: Option<String>,
    // Whatever else the exporting tool wrote.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// A log file as exported, before we know the date or winner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawGameLog {
    pub edition: GameEdition,
    pub players: Vec<Player>,
    #[serde(default)]
    pub bluffs: Vec<String>,
    #[serde(default)]
    pub roles: Vec<Value>,
    #[serde(default)]
    pub npcs: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameLog {
    pub id: String,
    pub date: String,
    pub winner: Alignment,
    pub edition: GameEdition,
    pub players: Vec<Player>,
    pub bluffs: Vec<String>,
}
