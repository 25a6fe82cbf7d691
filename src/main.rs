use std::path::PathBuf;

use anyhow::Context;
use grimoire::cli::Command;
use grimoire::helper::entries::helper_error_message;
use grimoire::helper::info::character_infos;
use grimoire::helper::{HelperEntry, HelperTab, catalog, fetch_helper_entries, night_order, playable_characters};
use grimoire::savant::{SAVANT_TITLE, SavantGenerator};
use grimoire::scripts::{Script, download_script, fetch_scripts, group_scripts};
use grimoire::tracker::{DashboardMetrics, GameLog, load_game_logs};
use grimoire::{AppError, AssetUrls, AsyncResource, JsonClient, KeyedResource, LoadError, ResourceOptions, Settings};
use grimoire::{logging, settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut settings = Settings::load().context("Failed to load settings")?;
    if let Err(e) = logging::init(&settings::data_dir(), settings.debug_mode) {
        eprintln!("Logging disabled: {e}");
    }

    let command = Command::parse(std::env::args().skip(1))?;
    log::info!("Running {command:?}");

    let client = JsonClient::new(settings.retry_policy());
    let urls = settings.asset_urls();

    match command {
        Command::Scripts => show_scripts(client, urls).await,
        Command::Night { script_id, tab } => {
            let script_id = match script_id {
                Some(script_id) => {
                    if !settings.select_helper_script(&script_id) {
                        return Err(AppError::UnknownScript(script_id).into());
                    }
                    settings.save().context("Failed to save settings")?;
                    script_id
                }
                None => settings.helper_script().id.to_string(),
            };
            show_night(client, urls, script_id, tab).await
        }
        Command::Download { script_id, dir } => download(client, urls, script_id, dir).await,
        Command::Tracker(dir) => show_tracker(dir).await,
        Command::Savant => {
            let mut generator = SavantGenerator::default();
            println!("{SAVANT_TITLE}");
            for proposition in [generator.current().map(str::to_string), generator.next().map(str::to_string)]
                .into_iter()
                .flatten()
            {
                println!("- {proposition}");
            }
            Ok(())
        }
    }
}

async fn show_scripts(client: JsonClient, urls: AssetUrls) -> anyhow::Result<()> {
    let resource: AsyncResource<Vec<Script>> = AsyncResource::start(
        move |token| {
            let client = client.clone();
            let urls = urls.clone();
            async move { fetch_scripts(&client, &urls, &token).await }
        },
        Vec::new(),
    );

    let state = resource.settled().await;
    if let Some(error) = state.error {
        anyhow::bail!(error);
    }
    for category in group_scripts(&state.data) {
        if category.scripts.is_empty() {
            continue;
        }
        println!("{}", category.title);
        for script in &category.scripts {
            println!("  {} ({}) - {}", script.name, script.author, script.id);
        }
    }
    Ok(())
}

async fn show_night(client: JsonClient, urls: AssetUrls, script_id: String, tab: HelperTab) -> anyhow::Result<()> {
    let options = ResourceOptions::default().error_message(helper_error_message);
    let resource: KeyedResource<String, Vec<HelperEntry>> = KeyedResource::start_with(
        options,
        script_id,
        move |script_id, token| {
            let client = client.clone();
            let urls = urls.clone();
            async move {
                let script = catalog::find_or_default(Some(&script_id));
                fetch_helper_entries(&client, &urls, &script.json_url(&urls), &token).await
            }
        },
        Vec::new(),
    );

    let state = resource.settled().await;
    if let Some(error) = state.error {
        anyhow::bail!(error);
    }
    let roster = playable_characters(&state.data);
    for (index, step) in night_order(&roster, tab).iter().enumerate() {
        let reminder = match tab {
            HelperTab::FirstNight => &step.first_night_reminder,
            HelperTab::OtherNight => &step.other_night_reminder,
            HelperTab::Characters => &step.ability,
        };
        println!("{:>2}. {} - {}", index + 1, step.name, reminder);
        for info in character_infos(&step.id) {
            println!("      [{}] {}", info.title, info.message);
        }
    }
    Ok(())
}

async fn download(client: JsonClient, urls: AssetUrls, script_id: String, dir: PathBuf) -> anyhow::Result<()> {
    let resource: AsyncResource<Vec<PathBuf>> = AsyncResource::start(
        move |token| {
            let client = client.clone();
            let urls = urls.clone();
            let script_id = script_id.clone();
            let dir = dir.clone();
            async move { download_script(&client, &urls, &script_id, &dir, &token).await }
        },
        Vec::new(),
    );

    let state = resource.settled().await;
    if let Some(error) = state.error {
        anyhow::bail!(error);
    }
    for path in &state.data {
        println!("Saved {}", path.display());
    }
    Ok(())
}

async fn show_tracker(dir: PathBuf) -> anyhow::Result<()> {
    let resource: AsyncResource<Vec<GameLog>> = AsyncResource::start(
        move |_token| {
            let dir = dir.clone();
            async move {
                tokio::task::spawn_blocking(move || load_game_logs(&dir))
                    .await
                    .map_err(|e| LoadError::Io(e.to_string()))?
            }
        },
        Vec::new(),
    );

    let state = resource.settled().await;
    if let Some(error) = state.error {
        anyhow::bail!(error);
    }
    let metrics = DashboardMetrics::from_logs(&state.data);
    if !metrics.has_logs {
        println!("No game logs found");
        return Ok(());
    }
    println!("Games: {}", metrics.total_games);
    for item in &metrics.win_rate {
        println!("{}: {}", item.name, item.value);
    }
    if let Some(percent) = metrics.good_win_percent() {
        println!("Good win rate: {percent}%");
    }
    let recent: Vec<String> = metrics
        .recent_winners
        .iter()
        .map(|game| format!("{} {}", game.name, game.winner))
        .collect();
    println!("Recent: {}", recent.join(", "));
    Ok(())
}
