use super::{Character, HelperTab, Team};

// (id, name, first night order, first night reminder, other night order, other night reminder)
const NIGHT_MARKERS: [(&str, &str, u32, &str, u32, &str); 4] = [
    (
        "dusk",
        "해질녘",
        1,
        "모두 눈을 감게하고, 일부 여행자 행동을 처리합니다.",
        1,
        "모두 눈을 감게하고, 일부 여행자 행동을 처리합니다.",
    ),
    (
        "dawn",
        "새벽",
        99,
        "몇 초 기다린 후 모두 눈을 뜨게한 뒤, 사망자를 발표합니다.",
        99,
        "몇 초 기다린 후 모두 눈을 뜨게한 뒤, 사망자를 발표합니다.",
    ),
    ("minion_info", "하수인 셋업", 13, "하수인들을 깨워 악마를 알려주세요.", 0, ""),
    (
        "demon_info",
        "악마 셋업",
        17,
        "악마를 깨워 하수인들을 알려주고, 이번 게임에 참가하지 않는 선한 캐릭터 3개를 알려주세요.",
        0,
        "",
    ),
];

/// Storyteller steps that are not characters (dusk, dawn, minion and demon info).
pub fn night_markers() -> Vec<Character> {
    NIGHT_MARKERS
        .iter()
        .map(
            |&(id, name, first_night, first_reminder, other_night, other_reminder)| Character {
                id: id.to_string(),
                name: name.to_string(),
                image: format!("{id}.webp"),
                first_night,
                first_night_reminder: first_reminder.to_string(),
                other_night,
                other_night_reminder: other_reminder.to_string(),
                ability: String::new(),
                team: Some(Team::Info),
            },
        )
        .collect()
}

/// Wake order for one night: markers with a reminder for that night plus
/// every character that wakes (order > 0), ascending. Ties keep roster order.
pub fn night_order(characters: &[Character], tab: HelperTab) -> Vec<Character> {
    let first_night = match tab {
        HelperTab::FirstNight => true,
        HelperTab::OtherNight => false,
        HelperTab::Characters => return characters.to_vec(),
    };
    let order = |character: &Character| {
        if first_night {
            character.first_night
        } else {
            character.other_night
        }
    };

    let mut steps: Vec<Character> = night_markers()
        .into_iter()
        .filter(|marker| {
            let reminder = if first_night {
                &marker.first_night_reminder
            } else {
                &marker.other_night_reminder
            };
            !reminder.is_empty()
        })
        .chain(characters.iter().filter(|character| order(*character) > 0).cloned())
        .collect();
    steps.sort_by_key(|character| order(character));
    steps
}
