use log::debug;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::catalog;
use crate::error::{Error, Result};
use crate::types::Language;

pub const DEFAULT_QURAN_API: &str = "https://api.alquran.cloud/v1";
pub const DEFAULT_IMAGE_BASE: &str = "https://cdn.islamic.network/quran/images";
pub const DEFAULT_AUDIO_BASE: &str = "https://everyayah.com/data";
pub const DEFAULT_HADITH_API: &str = "https://random-hadith-generator.vercel.app";
pub const DEFAULT_PLAYER_PORT: u16 = 8765;
pub const DEFAULT_COUNTDOWN_SECS: u32 = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub quran_api: String,
    pub image_base: String,
    pub audio_base: String,
    pub hadith_api: String,
    /// Root of the page-image folders used by the page viewer
    pub pages_base: String,
    pub data_dir: PathBuf,
    pub player_port: u16,
    pub countdown_secs: u32,
    pub language: Language,
    pub reciter_id: u32,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            quran_api: DEFAULT_QURAN_API.to_string(),
            image_base: DEFAULT_IMAGE_BASE.to_string(),
            audio_base: DEFAULT_AUDIO_BASE.to_string(),
            hadith_api: DEFAULT_HADITH_API.to_string(),
            pages_base: "/assets".to_string(),
            data_dir: PathBuf::from(".tilawah"),
            player_port: DEFAULT_PLAYER_PORT,
            countdown_secs: DEFAULT_COUNTDOWN_SECS,
            language: Language::En,
            reciter_id: 1,
            user_agent: format!("Tilawah/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Config {
    /// Loads `.env` if present, then overlays `TILAWAH_*` variables on the defaults.
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = dotenv::dotenv() {
            debug!("Loaded environment from {}", path.display());
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(v) = get("TILAWAH_QURAN_API") {
            config.quran_api = trim_base(v);
        }
        if let Some(v) = get("TILAWAH_IMAGE_BASE") {
            config.image_base = trim_base(v);
        }
        if let Some(v) = get("TILAWAH_AUDIO_BASE") {
            config.audio_base = trim_base(v);
        }
        if let Some(v) = get("TILAWAH_HADITH_API") {
            config.hadith_api = trim_base(v);
        }
        if let Some(v) = get("TILAWAH_PAGES_BASE") {
            config.pages_base = trim_base(v);
        }
        if let Some(v) = get("TILAWAH_DATA_DIR") {
            config.data_dir = PathBuf::from(v);
        }
        if let Some(v) = get("TILAWAH_PLAYER_PORT") {
            config.player_port = parse_var("TILAWAH_PLAYER_PORT", &v)?;
        }
        if let Some(v) = get("TILAWAH_COUNTDOWN_SECS") {
            config.countdown_secs = parse_var("TILAWAH_COUNTDOWN_SECS", &v)?;
            if config.countdown_secs == 0 {
                return Err(Error::invalid("TILAWAH_COUNTDOWN_SECS must be at least 1"));
            }
        }
        if let Some(v) = get("TILAWAH_LANGUAGE") {
            config.language = v.parse()?;
        }
        if let Some(v) = get("TILAWAH_RECITER") {
            let id = parse_var("TILAWAH_RECITER", &v)?;
            if catalog::reciter(id).is_none() {
                return Err(Error::invalid(format!("TILAWAH_RECITER: unknown reciter {}", id)));
            }
            config.reciter_id = id;
        }

        Ok(config)
    }
}

fn trim_base(value: String) -> String {
    value.trim_end_matches('/').to_string()
}

fn parse_var<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::invalid(format!("{}: invalid value '{}'", key, value)))
}
