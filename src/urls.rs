pub const TRANSLATIONS_DEFAULT_BASE: &str = "/translations/assets";
pub const TRANSLATIONS_BASE_ENV: &str = "GRIMOIRE_TRANSLATIONS_BASE";
pub const SCRIPTS_CATALOG_PATH: &str = "/scripts.json";
pub const SCRIPT_LOCALE: &str = "ko_KR";

// Hosts the catalog may still point at; rewritten to the configured base.
const REMOTE_ASSET_BASES: [&str; 3] = [
    "https://raw.githubusercontent.com/wonhyo-e/botc-translations/refs/heads/main/assets",
    "https://raw.githubusercontent.com/wonhyo-e/botc-translations/main/assets",
    "/botc-translations/assets",
];

/// Where the site's assets live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetUrls {
    site_url: String,
    translations_base: String,
}

impl AssetUrls {
    pub fn new(site_url: &str, translations_base: &str) -> Self {
        Self {
            site_url: site_url.trim_end_matches('/').to_string(),
            translations_base: translations_base.trim_end_matches('/').to_string(),
        }
    }

    // The environment variable wins over the settings file, like the build-time override did.
    pub fn from_env(site_url: &str, translations_base: Option<&str>) -> Self {
        let base = std::env::var(TRANSLATIONS_BASE_ENV)
            .ok()
            .filter(|base| !base.is_empty())
            .or_else(|| translations_base.map(str::to_string))
            .unwrap_or_else(|| TRANSLATIONS_DEFAULT_BASE.to_string());
        Self::new(site_url, &base)
    }

    pub fn translations_base(&self) -> &str {
        &self.translations_base
    }

    pub fn normalize(&self, url: &str) -> String {
        REMOTE_ASSET_BASES
            .iter()
            .fold(url.to_string(), |next, remote_base| match next.strip_prefix(remote_base) {
                Some(rest) => format!("{}{}", self.translations_base, rest),
                None => next,
            })
    }

    /// Turns a site-relative path into something the HTTP client can fetch.
    pub fn resolve(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        if path.starts_with('/') {
            format!("{}{}", self.site_url, path)
        } else {
            format!("{}/{}", self.site_url, path)
        }
    }

    pub fn scripts_catalog(&self) -> String {
        self.resolve(SCRIPTS_CATALOG_PATH)
    }

    pub fn script_json(&self, script_id: &str) -> String {
        format!("{}/scripts/{SCRIPT_LOCALE}/{script_id}.json", self.translations_base)
    }

    pub fn script_pdf(&self, script_id: &str) -> String {
        format!("{}/pdf/{SCRIPT_LOCALE}/{script_id}.pdf", self.translations_base)
    }

    pub fn script_image(&self, image_name: &str) -> String {
        format!("{}/images/{image_name}.png", self.translations_base)
    }
}

impl Default for AssetUrls {
    fn default() -> Self {
        Self::new("", TRANSLATIONS_DEFAULT_BASE)
    }
}
