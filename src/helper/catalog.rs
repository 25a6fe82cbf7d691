use crate::urls::AssetUrls;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HelperScript {
    pub id: &'static str,
    pub name: &'static str,
}

impl HelperScript {
    pub fn json_url(&self, urls: &AssetUrls) -> String {
        urls.script_json(self.id)
    }
}

pub const HELPER_SCRIPTS: [HelperScript; 11] = [
    HelperScript { id: "trouble_brewing", name: "불길한 조짐" },
    HelperScript { id: "bad_moon_rising", name: "어둠을 부르는 달" },
    HelperScript { id: "sects_and_violets", name: "환란의 화원" },
    HelperScript { id: "everyone_can_play", name: "모두를 위한 밤" },
    HelperScript { id: "uncertain_death", name: "의문사 (Uncertain Death)" },
    HelperScript { id: "no_greater_joy", name: "극한의 즐거움" },
    HelperScript { id: "laissez_un_faire", name: "자유방임불평등주의" },
    HelperScript { id: "over_the_river", name: "할머니댁으로" },
    HelperScript { id: "pies_baking", name: "익어가는 파이 (Pies Baking)" },
    HelperScript { id: "catfishing", name: "Catfishing" },
    HelperScript { id: "onion_pies", name: "Onion Pies" },
];

pub fn default_script() -> &'static HelperScript {
    &HELPER_SCRIPTS[0]
}

pub fn find(script_id: &str) -> Option<&'static HelperScript> {
    HELPER_SCRIPTS.iter().find(|script| script.id == script_id)
}

// Unknown or stale ids (e.g. from an old settings file) fall back to the first script.
pub fn find_or_default(script_id: Option<&str>) -> &'static HelperScript {
    script_id.and_then(find).unwrap_or_else(default_script)
}
