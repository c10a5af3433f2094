extern crate reqwest;

use lazy_static::lazy_static;
use log::debug;
use std::time::{Duration, Instant};

// headers required according to https://scryfall.com/docs/api/
const USER_AGENT: &str = "proxysheet/0.2";
const ACCEPT: &str = "*/*";
const SCRYFALL_COOLDOWN: Duration = Duration::from_millis(100);

// use a blocking mutex since we are only holding the lock to find out when we can call
lazy_static! {
    static ref LAST_SCRYFALL_CALL: std::sync::Mutex<Instant> =
        std::sync::Mutex::new(Instant::now());
}

pub struct ScryfallClient {
    client: reqwest::blocking::Client,
}

impl ScryfallClient {
    pub fn new() -> ScryfallClient {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static(USER_AGENT),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static(ACCEPT),
        );
        ScryfallClient {
            client: reqwest::blocking::Client::builder()
                .default_headers(headers)
                .build()
                .unwrap(),
        }
    }

    pub fn call(&self, uri: &str) -> Result<reqwest::blocking::Response, reqwest::Error> {
        let wait = {
            let mut last = LAST_SCRYFALL_CALL.lock().unwrap();
            let now = Instant::now();
            let elapsed = now - *last;
            if elapsed < SCRYFALL_COOLDOWN {
                let wait = SCRYFALL_COOLDOWN - elapsed;
                *last = now + wait;
                wait
            } else {
                *last = now;
                Duration::ZERO
            }
        };
        if wait > Duration::ZERO {
            std::thread::sleep(wait);
        }
        debug!("calling scryfall API: {}", uri);
        self.client.get(uri).send()
    }
}

impl Default for ScryfallClient {
    fn default() -> Self {
        Self::new()
    }
}
