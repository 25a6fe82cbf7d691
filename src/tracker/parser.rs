use std::collections::{HashMap, HashSet};
use std::fs::{File, read_dir};
use std::io::BufReader;
use std::path::Path;

use serde_json::Value;

use super::{Alignment, GameLog, Player, RawGameLog};
use crate::error::LoadError;
use crate::helper::Team;

pub const UNKNOWN_DATE: &str = "Unknown";

#[derive(Debug, Clone, PartialEq)]
pub struct RoleMetadata {
    pub name: String,
    pub team: Option<Team>,
}

// Role definitions come either keyed by name or, from older exports, by position.
fn read_role_field<'a>(role: &'a Value, key: &str, legacy_key: &str) -> Option<&'a str> {
    role.get(key)
        .filter(|value| !value.is_null())
        .or_else(|| role.get(legacy_key))?
        .as_str()
}

fn parse_role_team(team: Option<&str>) -> Option<Team> {
    match team?.parse::<Team>().ok()? {
        Team::Info => None,
        team => Some(team),
    }
}

pub fn build_role_metadata(roles: &[Value]) -> (HashMap<String, RoleMetadata>, HashSet<String>) {
    let mut metadata = HashMap::new();
    let mut demons = HashSet::new();

    for role in roles {
        let Some(role_id) = read_role_field(role, "id", "0") else {
            continue;
        };
        let name = read_role_field(role, "name", "1").unwrap_or(role_id).to_string();
        let team = parse_role_team(read_role_field(role, "team", "12"));
        if team == Some(Team::Demon) {
            demons.insert(role_id.to_string());
        }
        metadata.insert(role_id.to_string(), RoleMetadata { name, team });
    }

    (metadata, demons)
}

/// `20240131_good.json` -> `2024-01-31`; anything without eight leading digits is unknown.
pub fn parse_date_from_filename(file_name: &str) -> String {
    match file_name.get(..8) {
        Some(digits) if digits.bytes().all(|b| b.is_ascii_digit()) => {
            format!("{}-{}-{}", &digits[..4], &digits[4..6], &digits[6..8])
        }
        _ => UNKNOWN_DATE.to_string(),
    }
}

/// The file name decides when it says so; otherwise evil won iff a demon is still alive.
pub fn resolve_winner(file_name: &str, players: &[Player], demon_role_ids: &HashSet<String>) -> Alignment {
    if file_name.contains("good") {
        return Alignment::Good;
    }
    if file_name.contains("evil") {
        return Alignment::Evil;
    }
    let demon_alive = players
        .iter()
        .any(|player| demon_role_ids.contains(&player.role) && !player.is_dead);
    if demon_alive { Alignment::Evil } else { Alignment::Good }
}

pub fn parse_game_log(file_name: &str, raw: RawGameLog) -> GameLog {
    let (metadata, demons) = build_role_metadata(&raw.roles);
    let players: Vec<Player> = raw
        .players
        .into_iter()
        .map(|mut player| {
            let role_name = metadata
                .get(&player.role)
                .map(|role| role.name.clone())
                .unwrap_or_else(|| player.role.clone());
            player.role_name = Some(role_name);
            player
        })
        .collect();

    GameLog {
        id: file_name.to_string(),
        date: parse_date_from_filename(file_name),
        winner: resolve_winner(file_name, &players, &demons),
        edition: raw.edition,
        players,
        bluffs: raw.bluffs,
    }
}

fn read_game_log(path: &Path) -> Result<RawGameLog, Box<dyn std::error::Error>> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

/// Reads every `*.json` in `dir`, newest (by file name) first. Files that
/// fail to parse are logged and skipped.
pub fn load_game_logs(dir: &Path) -> Result<Vec<GameLog>, LoadError> {
    let mut logs: Vec<GameLog> = read_dir(dir)?
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            if !path.is_file() || path.extension()? != "json" {
                return None;
            }
            let file_name = path.file_name()?.to_str()?.to_string();
            match read_game_log(&path) {
                Ok(raw) => Some(parse_game_log(&file_name, raw)),
                Err(e) => {
                    log::error!("Skipping game log {}: {e}", path.display());
                    None
                }
            }
        })
        .collect();

    logs.sort_by(|left, right| right.id.cmp(&left.id));
    log::info!("Loaded {} game logs from {}", logs.len(), dir.display());
    Ok(logs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn player(role: &str, is_dead: bool) -> Player {
        serde_json::from_value(json!({
            "name": "p", "role": role, "id": role, "isDead": is_dead, "alignmentIndex": 0, "reminders": []
        }))
        .unwrap()
    }

    #[test]
    fn test_parse_date_from_filename() {
        assert_eq!(parse_date_from_filename("20240131_good.json"), "2024-01-31");
        assert_eq!(parse_date_from_filename("game.json"), UNKNOWN_DATE);
        assert_eq!(parse_date_from_filename("2024.json"), UNKNOWN_DATE);
    }

    #[test]
    fn test_role_metadata_reads_legacy_keys() {
        let roles = vec![
            json!({"id": "imp", "name": "임프", "team": "demon"}),
            json!({"0": "kokr_po", "1": "포", "12": "demon"}),
            json!({"id": "chef", "team": "fabled"}),
            json!({"name": "no id"}),
        ];
        let (metadata, demons) = build_role_metadata(&roles);
        assert_eq!(metadata.len(), 3);
        assert_eq!(metadata["kokr_po"].name, "포");
        assert_eq!(metadata["chef"].name, "chef");
        assert_eq!(metadata["chef"].team, None);
        assert!(demons.contains("imp") && demons.contains("kokr_po"));
    }

    #[test]
    fn test_resolve_winner() {
        let demons: HashSet<String> = ["imp".to_string()].into();
        let alive = vec![player("imp", false), player("chef", true)];
        let dead = vec![player("imp", true), player("chef", false)];

        assert_eq!(resolve_winner("20240101_good.json", &alive, &demons), Alignment::Good);
        assert_eq!(resolve_winner("20240101_evil.json", &dead, &demons), Alignment::Evil);
        assert_eq!(resolve_winner("20240101.json", &alive, &demons), Alignment::Evil);
        assert_eq!(resolve_winner("20240101.json", &dead, &demons), Alignment::Good);
    }

    #[test]
    fn test_parse_game_log_enriches_players() {
        let raw: RawGameLog = serde_json::from_value(json!({
            "edition": {"id": "tb", "name": "Trouble Brewing"},
            "players": [
                {"name": "A", "role": "imp", "id": "1", "isDead": false, "alignmentIndex": 0, "reminders": [], "pronouns": "they"},
                {"name": "B", "role": "mystery", "id": "2", "isDead": true, "alignmentIndex": 0, "reminders": []}
            ],
            "bluffs": ["chef"],
            "roles": [{"id": "imp", "name": "임프", "team": "demon"}]
        }))
        .unwrap();

        let log = parse_game_log("20240301.json", raw);
        assert_eq!(log.date, "2024-03-01");
        assert_eq!(log.winner, Alignment::Evil);
        assert_eq!(log.players[0].role_name.as_deref(), Some("임프"));
        assert_eq!(log.players[1].role_name.as_deref(), Some("mystery"));
        assert_eq!(log.players[0].extra["pronouns"], "they");
    }
}
