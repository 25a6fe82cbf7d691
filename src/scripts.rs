use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter};
use tokio_util::sync::CancellationToken;

use crate::error::LoadError;
use crate::http::JsonClient;
use crate::urls::AssetUrls;

// A script entry as published in scripts.json.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    pub id: String,
    #[serde(default)]
    pub official: bool,
    #[serde(default)]
    pub teensyville: bool,
    #[serde(default)]
    pub synopsis: String,
    #[serde(default)]
    pub logo: String,
    pub name: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub note: String,
    pub json: String,
    pub pdf: String,
}

// Same as Script but tolerant of a logo that is missing, null or not a string.
#[derive(Deserialize)]
struct RawScript {
    id: String,
    #[serde(default)]
    official: bool,
    #[serde(default)]
    teensyville: bool,
    #[serde(default)]
    synopsis: String,
    #[serde(default)]
    logo: Value,
    name: String,
    #[serde(default)]
    author: String,
    #[serde(default)]
    note: String,
    json: String,
    pdf: String,
}

impl RawScript {
    fn into_script(self, urls: &AssetUrls) -> Script {
        let logo = match self.logo {
            Value::String(logo) => urls.normalize(&logo),
            _ => String::new(),
        };
        Script {
            id: self.id,
            official: self.official,
            teensyville: self.teensyville,
            synopsis: self.synopsis,
            logo,
            name: self.name,
            author: self.author,
            note: self.note,
            json: urls.normalize(&self.json),
            pdf: urls.normalize(&self.pdf),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Section {
    Official,
    Community,
    Teensyville,
}

impl Section {
    pub fn title(&self) -> &'static str {
        match self {
            Section::Official => "공식 스크립트",
            Section::Community => "커스텀 스크립트",
            Section::Teensyville => "틴시빌 스크립트",
        }
    }

    fn of(script: &Script) -> Self {
        if script.official {
            Section::Official
        } else if script.teensyville {
            Section::Teensyville
        } else {
            Section::Community
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScriptCategory {
    pub section: Section,
    pub title: &'static str,
    pub scripts: Vec<Script>,
}

/// Parses the catalog payload. Anything but an array of scripts is a schema error.
pub fn parse_scripts(payload: Value, urls: &AssetUrls) -> Result<Vec<Script>, LoadError> {
    if !payload.is_array() {
        return Err(LoadError::Schema("scripts.json is not an array".to_string()));
    }
    let raw: Vec<RawScript> = serde_json::from_value(payload)?;
    Ok(raw.into_iter().map(|script| script.into_script(urls)).collect())
}

pub async fn fetch_scripts(
    client: &JsonClient,
    urls: &AssetUrls,
    token: &CancellationToken,
) -> Result<Vec<Script>, LoadError> {
    let payload: Value = client.get_json(&urls.scripts_catalog(), token).await?;
    let scripts = parse_scripts(payload, urls)?;
    log::info!("Loaded {} scripts", scripts.len());
    Ok(scripts)
}

/// Buckets scripts into official, community and teensyville, in that order.
/// An official teensyville script counts as official.
pub fn group_scripts(scripts: &[Script]) -> Vec<ScriptCategory> {
    Section::iter()
        .map(|section| ScriptCategory {
            section,
            title: section.title(),
            scripts: scripts
                .iter()
                .filter(|script| Section::of(script) == section)
                .cloned()
                .collect(),
        })
        .collect()
}

pub async fn pretty_script_json(
    client: &JsonClient,
    urls: &AssetUrls,
    json_url: &str,
    token: &CancellationToken,
) -> Result<String, LoadError> {
    let data: Value = client.get_json(&urls.resolve(json_url), token).await?;
    Ok(serde_json::to_string_pretty(&data)?)
}

pub async fn save_script_json(
    client: &JsonClient,
    urls: &AssetUrls,
    json_url: &str,
    dir: &Path,
    file_stem: &str,
    token: &CancellationToken,
) -> Result<PathBuf, LoadError> {
    let pretty = pretty_script_json(client, urls, json_url, token).await?;
    let path = dir.join(format!("{file_stem}.json"));
    tokio::fs::create_dir_all(dir).await?;
    tokio::fs::write(&path, pretty).await?;
    log::info!("Saved script JSON to {}", path.display());
    Ok(path)
}

pub fn pdf_file_name(pdf_url: &str) -> String {
    pdf_url
        .rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
        .unwrap_or("script.pdf")
        .to_string()
}

pub async fn save_script_pdf(
    client: &JsonClient,
    urls: &AssetUrls,
    pdf_url: &str,
    dir: &Path,
    token: &CancellationToken,
) -> Result<PathBuf, LoadError> {
    let bytes = client.get_bytes(&urls.resolve(pdf_url), token).await?;
    let path = dir.join(pdf_file_name(pdf_url));
    tokio::fs::create_dir_all(dir).await?;
    tokio::fs::write(&path, bytes).await?;
    log::info!("Saved script PDF to {}", path.display());
    Ok(path)
}

/// Saves a script's pretty JSON as `{script_id}.json` and its PDF under `dir`.
pub async fn download_script(
    client: &JsonClient,
    urls: &AssetUrls,
    script_id: &str,
    dir: &Path,
    token: &CancellationToken,
) -> Result<Vec<PathBuf>, LoadError> {
    let json = save_script_json(client, urls, &urls.script_json(script_id), dir, script_id, token).await?;
    let pdf = save_script_pdf(client, urls, &urls.script_pdf(script_id), dir, token).await?;
    Ok(vec![json, pdf])
}
