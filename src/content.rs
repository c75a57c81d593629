use log::{debug, info};
use serde::Deserialize;

use crate::catalog;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::position::check_verse;
use crate::types::{Position, VerseContent, VerseResource};

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

/// Issues verse requests and derives the image/audio URLs for a position
#[derive(Debug, Clone)]
pub struct ContentFetcher {
    client: reqwest::Client,
    quran_api: String,
    image_base: String,
    audio_base: String,
    user_agent: String,
}

impl ContentFetcher {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            quran_api: config.quran_api.clone(),
            image_base: config.image_base.clone(),
            audio_base: config.audio_base.clone(),
            user_agent: config.user_agent.clone(),
        }
    }

    pub fn verse_url(&self, position: &Position) -> String {
        format!(
            "{}/ayah/{}:{}/{}",
            self.quran_api,
            position.chapter,
            position.verse,
            position.language.edition()
        )
    }

    pub fn image_url(&self, position: &Position) -> String {
        format!("{}/{}_{}.png", self.image_base, position.chapter, position.verse)
    }

    /// Audio file for the position, or `None` when the reciter is unknown
    pub fn audio_url(&self, position: &Position) -> Option<String> {
        let reciter = catalog::reciter(position.reciter_id)?;
        Some(format!(
            "{}/{}/{:03}{:03}.mp3",
            self.audio_base, reciter.subfolder, position.chapter, position.verse
        ))
    }

    pub async fn fetch(&self, position: &Position) -> Result<VerseResource> {
        if catalog::chapter(position.chapter).is_none() {
            return Err(Error::invalid(format!("Unknown surah: {}", position.chapter)));
        }
        check_verse(position.chapter, position.verse)?;

        let url = self.verse_url(position);
        info!(
            "Fetching {} {}:{} ({})",
            position.chapter_name(),
            position.chapter,
            position.verse,
            position.language.edition()
        );
        let content: VerseContent = self.get_data(&url).await?;

        Ok(VerseResource {
            position: *position,
            content,
            image_url: self.image_url(position),
            audio_url: self.audio_url(position),
        })
    }

    async fn get_data<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        get_json_data(&self.client, &self.user_agent, url).await
    }
}

/// GETs `url` and unwraps the `{ "data": ... }` envelope both APIs use.
pub(crate) async fn get_json_data<T: serde::de::DeserializeOwned>(
    client: &reqwest::Client,
    user_agent: &str,
    url: &str,
) -> Result<T> {
    debug!("Request URL: {}", url);

    let response = client
        .get(url)
        .header("User-Agent", user_agent)
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(Error::Upstream {
            status: response.status().as_u16(),
        });
    }

    let body = response.text().await?;
    let envelope: Envelope<T> = serde_json::from_str(&body)?;
    Ok(envelope.data)
}
