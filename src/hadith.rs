use log::info;
use rand::Rng;

use crate::catalog::{self, HadithBook};
use crate::config::Config;
use crate::content::get_json_data;
use crate::error::{Error, Result};
use crate::types::Hadith;

#[derive(Debug, Clone)]
pub struct HadithClient {
    client: reqwest::Client,
    base: String,
    user_agent: String,
}

impl HadithClient {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            base: config.hadith_api.clone(),
            user_agent: config.user_agent.clone(),
        }
    }

    /// Fetches hadith `number` from `book`, or a random one when no number is given.
    pub async fn fetch(&self, book: &str, number: Option<u32>) -> Result<Hadith> {
        let book = catalog::hadith_book(book)
            .ok_or_else(|| Error::invalid(format!("Unknown hadith book: {}", book)))?;
        let number = pick_number(book, number)?;

        info!("Fetching {} hadith #{}", book.name, number);
        let url = format!("{}/{}/{}", self.base, book.value, number);
        get_json_data(&self.client, &self.user_agent, &url).await
    }
}

fn pick_number(book: &HadithBook, number: Option<u32>) -> Result<u32> {
    let number = number.unwrap_or_else(|| rand::thread_rng().gen_range(1..=book.limit));
    if number < 1 || number > book.limit {
        return Err(Error::invalid(format!(
            "Invalid Hadith number. Please enter a number between 1 and {}.",
            book.limit
        )));
    }
    Ok(number)
}
