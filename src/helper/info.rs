use super::{ALL_TEAMS, Alignment, Team};

pub const GOOD_ALIGNMENT_LABEL: &str = "선한 진영";
pub const EVIL_ALIGNMENT_LABEL: &str = "악한 진영";

/// A card the storyteller can show a player. `teams`/`count` describe which
/// characters may be picked to go along with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HelperInfo {
    pub title: &'static str,
    pub message: &'static str,
    pub teams: Option<&'static [Team]>,
    pub count: Option<usize>,
    pub is_alignment: bool,
}

impl HelperInfo {
    const fn text(title: &'static str, message: &'static str) -> Self {
        Self {
            title,
            message,
            teams: None,
            count: None,
            is_alignment: false,
        }
    }

    const fn pick(title: &'static str, message: &'static str, teams: &'static [Team], count: usize) -> Self {
        Self {
            title,
            message,
            teams: Some(teams),
            count: Some(count),
            is_alignment: false,
        }
    }

    const fn with_alignment(mut self) -> Self {
        self.is_alignment = true;
        self
    }
}

const GOOD_TEAMS: &[Team] = &[Team::Townsfolk, Team::Outsider];

pub const THIS_IS_YOUR_DEMON: HelperInfo = HelperInfo::text("이 사람이 악마", "이 사람이 악마입니다");
pub const THESE_ARE_YOUR_MINIONS: HelperInfo = HelperInfo::text("이 사람들이 하수인", "이 사람들이 하수인입니다");
pub const NOT_IN_PLAY: HelperInfo =
    HelperInfo::pick("블러핑 주기", "다음 3개 캐릭터는 이번 게임에 없습니다.", GOOD_TEAMS, 3);

// Cards available for every character, in display order.
pub const GENERIC_INFOS: [(&str, HelperInfo); 13] = [
    ("youare", HelperInfo::pick("당신은", "당신은 {character} 입니다.", &ALL_TEAMS, 1)),
    ("theyis", HelperInfo::pick("이 사람은", "이 사람은 {character} 입니다.", &ALL_TEAMS, 1)),
    ("character", HelperInfo::pick("직업 토큰", "", &ALL_TEAMS, 1)),
    ("alignment", HelperInfo::text("진영", "당신은 이제부터 {alignment}입니다.").with_alignment()),
    ("number", HelperInfo::text("숫자", "")),
    ("text", HelperInfo::text("텍스트", "")),
    ("boolean", HelperInfo::text("참/거짓", "")),
    ("thisisyourdemon", THIS_IS_YOUR_DEMON),
    ("theseareyourminions", THESE_ARE_YOUR_MINIONS),
    ("notinplay", NOT_IN_PLAY),
    ("didyouvotetoday", HelperInfo::text("오늘 투표했나요?", "오늘 투표했나요?")),
    ("didyounominatetoday", HelperInfo::text("오늘 지명했나요?", "오늘 지명했나요?")),
    (
        "thischaracterselectedyou",
        HelperInfo::pick("이 캐릭터가 당신을 선택했습니다.", "이 캐릭터가 당신을 선택했습니다.", &ALL_TEAMS, 1),
    ),
];

const EVERY_NIGHT: &str = "매일 밤";
const FIRST_NIGHT: &str = "첫날 밤";
const ONCE_PER_GAME: HelperInfo = HelperInfo::text("게임 중 한 번", "능력을 사용하시겠습니까?");

// Matched by substring against the character id, first match wins, so
// localized ids like `kokr_washerwoman` still find their cards.
const CHARACTER_INFOS: &[(&str, &[HelperInfo])] = &[
    ("minion_info", &[THIS_IS_YOUR_DEMON]),
    ("demon_info", &[THESE_ARE_YOUR_MINIONS, NOT_IN_PLAY]),
    ("poisoner", &[HelperInfo::text(EVERY_NIGHT, "선택한 참가자는 내일 낮까지 중독됩니다.")]),
    (
        "washerwoman",
        &[HelperInfo::pick(EVERY_NIGHT, "다음 두 참가자 중 하나는 다음 직업입니다.", &[Team::Townsfolk], 1)],
    ),
    (
        "librarian",
        &[HelperInfo::pick(EVERY_NIGHT, "다음 두 참가자 중 하나는 다음 직업입니다.", &[Team::Outsider], 1)],
    ),
    (
        "investigator",
        &[HelperInfo::pick(EVERY_NIGHT, "다음 두 참가자 중 하나는 다음 직업입니다.", &[Team::Minion], 1)],
    ),
    ("chef", &[HelperInfo::text(EVERY_NIGHT, "인접해서 앉은 악한 참가자 쌍의 수")]),
    ("empath", &[HelperInfo::text(EVERY_NIGHT, "당신의 살아있는 이웃 중 악한 참가자의 수")]),
    ("fortuneteller", &[HelperInfo::text(EVERY_NIGHT, "두 참가자를 선택하세요.")]),
    (
        "butler",
        &[
            HelperInfo::text(
                EVERY_NIGHT,
                "당신을 제외한 참가자 한 명을 선택하세요. 그 사람이 투표해야만 당신도 투표할 수 있습니다.",
            ),
            HelperInfo::text("무단 투표한 경우", "주인님 허락 없이 투표하셨네요. 다음엔 그러지 마세요."),
        ],
    ),
    (
        "monk",
        &[HelperInfo::text(EVERY_NIGHT, "참가자 한 명을 선택하세요. 그 사람은 오늘 밤 악마로부터 안전합니다.")],
    ),
    (
        "imp",
        &[HelperInfo::text(EVERY_NIGHT, "죽일 사람을 선택하세요. 자결한다면 다른 하수인이 임프가 됩니다.")],
    ),
    (
        "ravenkeeper",
        &[HelperInfo::text("악마에 의해 밤에 죽었다면", "선택한 참가자의 캐릭터를 알려드립니다.")],
    ),
    ("undertaker", &[HelperInfo::pick(EVERY_NIGHT, "오늘 낮에 처형 당한 사람의 직업은", &ALL_TEAMS, 1)]),
    (
        "philosopher",
        &[
            ONCE_PER_GAME,
            HelperInfo::pick(
                "능력을 사용한다면",
                "선한 캐릭터를 선택하세요. 플레이 중인 캐릭터라면 취합니다.",
                GOOD_TEAMS,
                1,
            ),
        ],
    ),
    (
        "snakecharmer",
        &[
            HelperInfo::text(EVERY_NIGHT, "참가자를 선택하세요. 만약 악마를 선택했다면 캐릭터와 진영이 바뀝니다."),
            HelperInfo::pick(
                "악마를 선택했다면",
                "당신은 이제부터 {character}이고, {alignment}입니다.",
                &[Team::Demon],
                1,
            )
            .with_alignment(),
        ],
    ),
    (
        "cerenovus",
        &[
            HelperInfo::text(
                EVERY_NIGHT,
                "참가자와 선한 직업을 선택하세요. 그 사람은 내일 그 직업이라는 `광기`에 빠집니다.",
            ),
            HelperInfo::pick(
                "광기 알려주기",
                "세레노부스가 당신을 선택했습니다. 내일부터 자신이 {character}라고 다른 사람들을 광적으로 설득해야 합니다.",
                GOOD_TEAMS,
                1,
            ),
        ],
    ),
    ("witch", &[HelperInfo::text(EVERY_NIGHT, "참가자 한 명을 선택하세요. 다음날 그 사람이 지명하면 죽습니다.")]),
    (
        "eviltwin",
        &[HelperInfo::pick(
            FIRST_NIGHT,
            "당신의 선한 쌍둥이의 직업입니다.",
            &[Team::Townsfolk, Team::Outsider, Team::Minion],
            1,
        )],
    ),
    (
        "devilsadvocate",
        &[HelperInfo::text(EVERY_NIGHT, "어제와 다른 참가자 한 명을 선택하세요. 그 사람은 처형으로 죽지 않습니다.")],
    ),
    ("grandmother", &[HelperInfo::pick(FIRST_NIGHT, "당신의 손주는 {character} 입니다.", GOOD_TEAMS, 1)]),
    ("clockmaker", &[HelperInfo::text(FIRST_NIGHT, "악마와 가장 가까운 하수인의 거리 (바로 옆은 1)")]),
    (
        "gambler",
        &[HelperInfo::pick(
            "매일 밤*",
            "참가자 한 명과 그의 직업을 추측하세요. (본인 가능) ",
            &[Team::Townsfolk, Team::Outsider, Team::Minion, Team::Demon, Team::Traveler],
            1,
        )],
    ),
    (
        "assassin",
        &[ONCE_PER_GAME, HelperInfo::text("능력을 사용한다면", "암살하고 싶은 사람을 선택하세요")],
    ),
    (
        "godfather",
        &[
            HelperInfo::pick(FIRST_NIGHT, "다음 이방인들이 게임에 참가중입니다.", &[Team::Outsider], 3),
            HelperInfo::text("이방인이 죽었다면", "죽이고 싶은 참가자를 선택하세요."),
        ],
    ),
    (
        "seamstress",
        &[
            ONCE_PER_GAME,
            HelperInfo::text("능력을 사용한다면", "참가자 2명을 선택하세요. 그 사람들이 같은 팀인지 알려드립니다."),
        ],
    ),
    ("exorcist", &[HelperInfo::text(EVERY_NIGHT, "어제와 다른 참가자를 선택하세요.")]),
    (
        "pukka",
        &[HelperInfo::text(EVERY_NIGHT, "중독시킬 사람을 선택하세요. 이전에 중독되었던 사람은 죽고, 중독이 풀립니다.")],
    ),
];

/// Character-specific cards; empty for characters without any.
pub fn character_infos(character_id: &str) -> &'static [HelperInfo] {
    CHARACTER_INFOS
        .iter()
        .find(|(role_id, _)| character_id.contains(role_id))
        .map(|(_, infos)| *infos)
        .unwrap_or(&[])
}

pub fn generic_info(key: &str) -> Option<HelperInfo> {
    GENERIC_INFOS
        .iter()
        .find(|(info_key, _)| *info_key == key)
        .map(|(_, info)| *info)
}

pub fn alignment_label(alignment: Alignment) -> &'static str {
    match alignment {
        Alignment::Good => GOOD_ALIGNMENT_LABEL,
        Alignment::Evil => EVIL_ALIGNMENT_LABEL,
    }
}

pub fn format_helper_message(message: &str, first_selected_name: &str, alignment: Alignment) -> String {
    message
        .replace("{character}", first_selected_name)
        .replace("{alignment}", alignment_label(alignment))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_character_infos_substring_match() {
        assert_eq!(character_infos("kokr_washerwoman")[0].teams, Some(&[Team::Townsfolk][..]));
        assert_eq!(character_infos("demon_info").len(), 2);
        assert_eq!(character_infos("philosopher")[1].count, Some(1));
        assert!(character_infos("slayer").is_empty());
    }

    #[test]
    fn test_generic_info() {
        let alignment = generic_info("alignment").unwrap();
        assert!(alignment.is_alignment);
        assert_eq!(generic_info("notinplay").unwrap().count, Some(3));
        assert!(generic_info("missing").is_none());
    }

    #[test]
    fn test_format_helper_message() {
        assert_eq!(
            format_helper_message("당신은 이제부터 {character}이고, {alignment}입니다.", "'임프'", Alignment::Evil),
            "당신은 이제부터 '임프'이고, 악한 진영입니다."
        );
        assert_eq!(
            format_helper_message("{character} {character}", "a", Alignment::Good),
            "a a"
        );
        assert_eq!(format_helper_message("{alignment}", "", Alignment::Good), GOOD_ALIGNMENT_LABEL);
    }
}
