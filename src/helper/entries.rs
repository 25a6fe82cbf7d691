use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;

use super::{Character, HelperEntry, HelperScriptMeta, Team};
use crate::error::LoadError;
use crate::http::JsonClient;
use crate::urls::AssetUrls;

pub const INVALID_SCRIPT_MESSAGE: &str = "스크립트 데이터 형식이 올바르지 않습니다";
pub const LOAD_SCRIPT_FAILED_MESSAGE: &str = "스크립트를 불러오는데 실패했습니다";

const META_ID: &str = "_meta";

fn invalid() -> LoadError {
    LoadError::Schema(INVALID_SCRIPT_MESSAGE.to_string())
}

fn string_field(item: &Map<String, Value>, key: &str) -> String {
    item.get(key).and_then(Value::as_str).unwrap_or_default().to_string()
}

fn order_field(item: &Map<String, Value>, key: &str) -> u32 {
    item.get(key)
        .and_then(Value::as_u64)
        .and_then(|order| u32::try_from(order).ok())
        .unwrap_or_default()
}

fn parse_meta(item: &Map<String, Value>) -> Option<HelperScriptMeta> {
    if item.get("id").and_then(Value::as_str) != Some(META_ID) {
        return None;
    }
    Some(HelperScriptMeta {
        id: META_ID.to_string(),
        name: item.get("name")?.as_str()?.to_string(),
        author: item.get("author")?.as_str()?.to_string(),
        is_official: item.get("isOfficial")?.as_bool()?,
        background: item.get("background").and_then(Value::as_str).map(str::to_string),
    })
}

fn parse_character(item: &Map<String, Value>) -> Option<Character> {
    let id = item.get("id")?.as_str()?;
    if id == META_ID {
        return None;
    }
    // Teams this site does not know about (fabled, loric...) are dropped, not rejected.
    let team = item
        .get("team")
        .and_then(Value::as_str)
        .and_then(|team| team.parse::<Team>().ok());

    Some(Character {
        id: id.to_string(),
        name: string_field(item, "name"),
        image: string_field(item, "image"),
        first_night: order_field(item, "firstNight"),
        first_night_reminder: string_field(item, "firstNightReminder"),
        other_night: order_field(item, "otherNight"),
        other_night_reminder: string_field(item, "otherNightReminder"),
        ability: string_field(item, "ability"),
        team,
    })
}

/// Validates a script JSON payload. Every item must be either the `_meta`
/// block or a character object with a string id; one bad item rejects the
/// whole payload.
pub fn normalize_entries(payload: &Value) -> Result<Vec<HelperEntry>, LoadError> {
    let items = payload.as_array().ok_or_else(invalid)?;
    items
        .iter()
        .map(|item| {
            let item = item.as_object().ok_or_else(invalid)?;
            if let Some(meta) = parse_meta(item) {
                return Ok(HelperEntry::Meta(meta));
            }
            parse_character(item).map(HelperEntry::Character).ok_or_else(invalid)
        })
        .collect()
}

pub async fn fetch_helper_entries(
    client: &JsonClient,
    urls: &AssetUrls,
    script_url: &str,
    token: &CancellationToken,
) -> Result<Vec<HelperEntry>, LoadError> {
    let payload: Value = client.get_json(&urls.resolve(script_url), token).await?;
    let entries = normalize_entries(&payload)?;
    log::debug!("Loaded {} helper entries from {script_url}", entries.len());
    Ok(entries)
}

// Error text shown in the helper: schema problems keep their message, anything
// without one gets the generic failure text.
pub fn helper_error_message(err: &LoadError) -> String {
    match err.to_string() {
        message if message.is_empty() => LOAD_SCRIPT_FAILED_MESSAGE.to_string(),
        message => message,
    }
}

/// Characters a player can hold: everything but travelers and the meta block.
pub fn playable_characters(entries: &[HelperEntry]) -> Vec<Character> {
    entries
        .iter()
        .filter_map(HelperEntry::as_character)
        .filter(|character| character.team != Some(Team::Traveler))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalizes_meta_and_characters() {
        let payload = json!([
            {"id": "_meta", "name": "불길한 조짐", "author": "TPI", "isOfficial": true, "background": null},
            {"id": "washerwoman", "name": "세탁부", "team": "townsfolk", "firstNight": 32, "firstNightReminder": "보여주세요"},
            {"id": "mystery", "team": "fabled"}
        ]);

        let entries = normalize_entries(&payload).unwrap();
        assert_eq!(entries.len(), 3);
        assert!(matches!(&entries[0], HelperEntry::Meta(meta) if meta.is_official && meta.background.is_none()));

        let washerwoman = entries[1].as_character().unwrap();
        assert_eq!(washerwoman.team, Some(Team::Townsfolk));
        assert_eq!(washerwoman.first_night, 32);
        assert_eq!(washerwoman.other_night, 0);
        assert_eq!(washerwoman.ability, "");

        let mystery = entries[2].as_character().unwrap();
        assert_eq!(mystery.team, None);
        assert_eq!(mystery.name, "");
    }

    #[test]
    fn test_rejects_bad_payloads() {
        let expected = Err(LoadError::Schema(INVALID_SCRIPT_MESSAGE.to_string()));
        assert_eq!(normalize_entries(&json!({"id": "x"})), expected);
        assert_eq!(normalize_entries(&json!(["washerwoman"])), expected);
        assert_eq!(normalize_entries(&json!([{"name": "no id"}])), expected);
        assert_eq!(normalize_entries(&json!([{"id": 12}])), expected);
        // A malformed meta block is neither meta nor a character.
        assert_eq!(normalize_entries(&json!([{"id": "_meta", "name": "x"}])), expected);
    }

    #[test]
    fn test_playable_characters_skip_travelers() {
        let payload = json!([
            {"id": "_meta", "name": "s", "author": "a", "isOfficial": false},
            {"id": "imp", "team": "demon"},
            {"id": "gunslinger", "team": "traveler"},
            {"id": "unknown"}
        ]);
        let entries = normalize_entries(&payload).unwrap();
        let ids: Vec<_> = playable_characters(&entries).into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["imp", "unknown"]);
    }

    #[test]
    fn test_error_message() {
        assert_eq!(helper_error_message(&LoadError::Status(404)), "HTTP 404");
        assert_eq!(helper_error_message(&LoadError::Schema(String::new())), LOAD_SCRIPT_FAILED_MESSAGE);
    }
}
