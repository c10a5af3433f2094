use image::DynamicImage;
use log::{debug, error, info};

use crate::cardlist::CardReference;
use crate::scryfall::{
    CardRecord, query_by_collector_search, query_by_name, query_by_set_and_number, query_image_uri,
};
use crate::scryfall_client::ScryfallClient;

/// Outcome of resolving one card reference. Front present and back absent is
/// the common case; both present only for multi-faced printings.
#[derive(Debug)]
pub struct ResolvedImages {
    pub front: Option<DynamicImage>,
    pub back: Option<DynamicImage>,
}

impl ResolvedImages {
    pub fn empty() -> ResolvedImages {
        ResolvedImages {
            front: None,
            back: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.front.is_none() && self.back.is_none()
    }
}

/// The fields a lookup strategy may draw on. A strategy whose required
/// fields are absent passes without a network call.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CardQuery {
    name: Option<String>,
    set: Option<String>,
    number: Option<String>,
}

type Strategy = fn(&CardQuery, &ScryfallClient) -> Option<CardRecord>;

/// Lookup fallbacks in the order they are tried. The first one that yields a
/// record with usable image data wins.
const STRATEGIES: [(&str, Strategy); 3] = [
    ("set and collector number", direct_lookup),
    ("fuzzy name", named_lookup),
    ("collector number search", collector_lookup),
];

fn direct_lookup(query: &CardQuery, client: &ScryfallClient) -> Option<CardRecord> {
    let set = query.set.as_deref()?;
    let number = query.number.as_deref()?;
    query_by_set_and_number(set, number, client).map(|d| CardRecord::from_dict(&d))
}

fn named_lookup(query: &CardQuery, client: &ScryfallClient) -> Option<CardRecord> {
    let name = query.name.as_deref()?;
    query_by_name(name, query.set.as_deref(), client).map(|d| CardRecord::from_dict(&d))
}

fn collector_lookup(query: &CardQuery, client: &ScryfallClient) -> Option<CardRecord> {
    let set = query.set.as_deref()?;
    let number = query.number.as_deref()?;
    query_by_collector_search(set, number, client).map(|d| CardRecord::from_dict(&d))
}

fn resolve_record(query: &CardQuery, client: &ScryfallClient) -> Option<CardRecord> {
    for (label, lookup) in STRATEGIES.iter() {
        match lookup(query, client) {
            Some(record) if record.has_images() => {
                debug!("resolved {:?} via {} lookup", query, label);
                return Some(record);
            }
            Some(record) => {
                info!(
                    "{} lookup for {:?} found {:?} without image data",
                    label, query, record.name
                );
            }
            None => {}
        }
    }
    None
}

fn fetch_images(record: &CardRecord, client: &ScryfallClient) -> ResolvedImages {
    ResolvedImages {
        front: record
            .front_uri
            .as_deref()
            .and_then(|uri| query_image_uri(uri, client)),
        back: record
            .back_uri
            .as_deref()
            .and_then(|uri| query_image_uri(uri, client)),
    }
}

/// Resolve a card to its front and (for multi-faced printings) back image.
pub fn resolve(
    name: Option<&str>,
    set: Option<&str>,
    number: Option<&str>,
    client: &ScryfallClient,
) -> ResolvedImages {
    let query = CardQuery {
        name: name.map(String::from),
        set: set.map(String::from),
        number: number.map(String::from),
    };
    match resolve_record(&query, client) {
        Some(record) => fetch_images(&record, client),
        None => {
            info!("no usable card data for {:?}", query);
            ResolvedImages::empty()
        }
    }
}

/// Resolve from a card url whose path carries the set code and collector
/// number as its third- and second-to-last segments.
pub fn resolve_by_url(url: &str, client: &ScryfallClient) -> ResolvedImages {
    match set_and_number_from_url(url) {
        Some((set, number)) => resolve(None, Some(&set), Some(&number), client),
        None => {
            error!("malformed card url: {}", url);
            ResolvedImages::empty()
        }
    }
}

fn set_and_number_from_url(url: &str) -> Option<(String, String)> {
    let parts: Vec<&str> = url.trim().split('/').collect();
    if parts.len() < 3 {
        return None;
    }
    Some((
        parts[parts.len() - 3].to_string(),
        parts[parts.len() - 2].to_string(),
    ))
}

impl CardReference {
    /// Resolve this reference against the scryfall api.
    pub fn resolve(&self, client: &ScryfallClient) -> ResolvedImages {
        match self {
            CardReference::Entry { name, set, number } => {
                resolve(Some(name), set.as_deref(), number.as_deref(), client)
            }
            CardReference::Url(url) => resolve_by_url(url, client),
        }
    }
}
