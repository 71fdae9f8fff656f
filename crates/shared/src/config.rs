use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

use crate::io::get_default_data_dir;

/// Number of stories selected per run unless configured otherwise
pub const DEFAULT_MAX_STORIES: usize = 4;

#[derive(Debug, Clone)]
pub struct Config {
    pub headline_font: Option<PathBuf>,
    pub body_font: Option<PathBuf>,
    pub max_stories: usize,
    pub data_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Try to load .env from multiple locations
        Self::try_load_dotenv();

        let headline_font = env::var_os("CRIME_SHORTS_HEADLINE_FONT").map(PathBuf::from);
        let body_font = env::var_os("CRIME_SHORTS_BODY_FONT").map(PathBuf::from);

        let max_stories = match env::var("CRIME_SHORTS_MAX_STORIES") {
            Ok(value) => parse_max_stories(&value)?,
            Err(_) => DEFAULT_MAX_STORIES,
        };

        let data_dir = match env::var_os("CRIME_SHORTS_DATA_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => get_default_data_dir()?,
        };

        Ok(Self {
            headline_font,
            body_font,
            max_stories,
            data_dir,
        })
    }

    fn try_load_dotenv() {
        // 1. Current directory (for development)
        if dotenvy::dotenv().is_ok() {
            return;
        }

        // 2. ~/.config/crime-shorts/.env
        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("crime-shorts").join(".env");
            if config_path.exists() && dotenvy::from_path(&config_path).is_ok() {
                return;
            }
        }

        // 3. ~/.env
        if let Some(home_dir) = dirs::home_dir() {
            let home_path = home_dir.join(".env");
            if home_path.exists() {
                let _ = dotenvy::from_path(&home_path);
            }
        }
    }
}

fn parse_max_stories(value: &str) -> Result<usize> {
    let parsed: usize = value.trim().parse().with_context(|| {
        format!(
            "CRIME_SHORTS_MAX_STORIES must be a positive whole number, got {:?}",
            value
        )
    })?;

    if parsed == 0 {
        anyhow::bail!("CRIME_SHORTS_MAX_STORIES must be at least 1");
    }

    Ok(parsed)
}
