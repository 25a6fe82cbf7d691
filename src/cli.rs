use std::path::PathBuf;

use crate::error::{AppError, Result};
use crate::helper::HelperTab;

pub const USAGE: &str = "grimoire scripts | night <script-id> [first|other|characters] | download <script-id> [dir] | tracker <dir> | savant";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Scripts,
    Night { script_id: Option<String>, tab: HelperTab },
    Download { script_id: String, dir: PathBuf },
    Tracker(PathBuf),
    Savant,
}

impl Command {
    /// Parses the arguments after the program name.
    pub fn parse<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|arg| arg.as_ref().to_string()).collect();
        let args: Vec<&str> = args.iter().map(String::as_str).collect();

        match args.as_slice() {
            [] | ["scripts"] => Ok(Command::Scripts),
            ["night"] => Ok(Command::Night {
                script_id: None,
                tab: HelperTab::FirstNight,
            }),
            ["night", script_id] => Ok(Command::Night {
                script_id: Some(script_id.to_string()),
                tab: HelperTab::FirstNight,
            }),
            ["night", script_id, tab] => {
                let tab = tab
                    .parse::<HelperTab>()
                    .map_err(|_| AppError::Usage(USAGE.to_string()))?;
                Ok(Command::Night {
                    script_id: Some(script_id.to_string()),
                    tab,
                })
            }
            ["download", script_id] => Ok(Command::Download {
                script_id: script_id.to_string(),
                dir: PathBuf::from("."),
            }),
            ["download", script_id, dir] => Ok(Command::Download {
                script_id: script_id.to_string(),
                dir: PathBuf::from(dir),
            }),
            ["tracker", dir] => Ok(Command::Tracker(PathBuf::from(dir))),
            ["savant"] => Ok(Command::Savant),
            _ => Err(AppError::Usage(USAGE.to_string())),
        }
    }
}
