use image::DynamicImage;
use log::{debug, error, info};
use serde::{Deserialize, Serialize};

use crate::scryfall_client::ScryfallClient;

const SCRYFALL_CARDS: &str = "https://api.scryfall.com/cards";

fn encode_card_name(name: &str) -> String {
    name.replace(' ', "+").replace("//", "")
}

#[derive(Serialize, Deserialize)]
pub struct ScryfallSearchAnswer {
    pub object: String,
    pub total_cards: i32,
    pub has_more: bool,
    pub next_page: Option<String>,
    pub data: Vec<serde_json::Map<String, serde_json::Value>>,
}

/// Print layouts scryfall reports on a card object. Tags introduced after
/// this list was written deserialize as `Other`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    Normal,
    Transform,
    ModalDfc,
    DoubleFacedToken,
    Flip,
    Split,
    ReversibleCard,
    Meld,
    Adventure,
    Leveler,
    Class,
    Case,
    Saga,
    Mutate,
    Prototype,
    Planar,
    Scheme,
    Vanguard,
    Token,
    Emblem,
    Augment,
    Host,
    ArtSeries,
    #[serde(other)]
    Other,
}

impl Layout {
    /// Layouts whose printing carries a distinct image per face.
    pub fn is_multiface(self) -> bool {
        matches!(
            self,
            Layout::Transform
                | Layout::ModalDfc
                | Layout::DoubleFacedToken
                | Layout::Flip
                | Layout::Split
                | Layout::ReversibleCard
        )
    }
}

/// The slice of a scryfall card object this crate needs: the layout and the
/// large image uri of each printed face.
#[derive(Debug, Clone, PartialEq)]
pub struct CardRecord {
    pub name: String,
    pub layout: Layout,
    pub front_uri: Option<String>,
    pub back_uri: Option<String>,
}

impl CardRecord {
    /// Extract the face images from a card object. Multi-faced layouts read
    /// the large image of each of up to two `card_faces` entries, where a
    /// face without image data leaves its slot absent. Single-faced layouts,
    /// and multi-faced tags without a `card_faces` array, read the top-level
    /// `image_uris` instead.
    pub fn from_dict(d: &serde_json::Map<String, serde_json::Value>) -> CardRecord {
        let name = d
            .get("name")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string();
        let layout = d
            .get("layout")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or(Layout::Normal);
        let faces = d.get("card_faces").and_then(|v| v.as_array());
        let (front_uri, back_uri) = match faces {
            Some(faces) if layout.is_multiface() => {
                (face_image_uri(faces, 0), face_image_uri(faces, 1))
            }
            _ => (top_level_image_uri(d), None),
        };
        CardRecord {
            name,
            layout,
            front_uri,
            back_uri,
        }
    }

    /// A record without any image uri cannot contribute to a sheet.
    pub fn has_images(&self) -> bool {
        self.front_uri.is_some() || self.back_uri.is_some()
    }
}

fn face_image_uri(faces: &[serde_json::Value], index: usize) -> Option<String> {
    faces
        .get(index)?
        .get("image_uris")?
        .get("large")?
        .as_str()
        .map(String::from)
}

fn top_level_image_uri(d: &serde_json::Map<String, serde_json::Value>) -> Option<String> {
    d.get("image_uris")?.get("large")?.as_str().map(String::from)
}

fn fetch_card_object(
    uri: &str,
    client: &ScryfallClient,
) -> Option<serde_json::Map<String, serde_json::Value>> {
    let request = client.call(uri);
    match request {
        Ok(response) => {
            if !response.status().is_success() {
                info!("scryfall returned status {} for {}", response.status(), uri);
                return None;
            }
            match response.json::<serde_json::Map<String, serde_json::Value>>() {
                Ok(object) => Some(object),
                Err(deserialization_error) => {
                    info!(
                        "error in deserialization of scryfall response: {}",
                        deserialization_error
                    );
                    None
                }
            }
        }
        Err(e) => {
            info!("error in call to scryfall api: {}", e);
            None
        }
    }
}

/// Direct lookup of one printing by set code and collector number.
pub fn query_by_set_and_number(
    set: &str,
    number: &str,
    client: &ScryfallClient,
) -> Option<serde_json::Map<String, serde_json::Value>> {
    let uri = format!("{}/{}/{}", SCRYFALL_CARDS, set.to_lowercase(), number);
    fetch_card_object(&uri, client)
}

/// Fuzzy name lookup, optionally scoped to a set code.
pub fn query_by_name(
    name: &str,
    set: Option<&str>,
    client: &ScryfallClient,
) -> Option<serde_json::Map<String, serde_json::Value>> {
    let mut uri = format!("{}/named?fuzzy={}", SCRYFALL_CARDS, encode_card_name(name));
    if let Some(set) = set {
        uri += format!("&set={}", set.to_lowercase()).as_str();
    }
    fetch_card_object(&uri, client)
}

/// Structured search combining collector number and set code filters. Takes
/// the first result, if any.
pub fn query_by_collector_search(
    set: &str,
    number: &str,
    client: &ScryfallClient,
) -> Option<serde_json::Map<String, serde_json::Value>> {
    let uri = format!(
        "{}/search?q=cn%3A{}+set%3A{}",
        SCRYFALL_CARDS,
        number,
        set.to_lowercase()
    );
    let request = client.call(&uri);
    match request {
        Ok(response) => match response.json::<ScryfallSearchAnswer>() {
            Ok(answer) => answer.data.into_iter().next(),
            Err(deserialization_error) => {
                info!(
                    "error in deserializing scryfall search answer: {}",
                    deserialization_error
                );
                None
            }
        },
        Err(e) => {
            info!("error in scryfall search request: {}", e);
            None
        }
    }
}

/// Fetch and decode the image behind a scryfall image uri. Large images are
/// served as jpeg.
pub fn query_image_uri(uri: &str, client: &ScryfallClient) -> Option<DynamicImage> {
    debug!("scryfall image uri: {}", uri);

    let request = client.call(uri);
    match request {
        Ok(response) => {
            if !response.status().is_success() {
                info!(
                    "image fetch for {} returned status {}",
                    uri,
                    response.status()
                );
                return None;
            }
            match response.bytes() {
                Ok(b) => match image::load_from_memory_with_format(&b, image::ImageFormat::Jpeg) {
                    Ok(im) => Some(im),
                    Err(e) => {
                        error!("error converting response to jpeg: {}", e);
                        None
                    }
                },
                Err(e) => {
                    info!("error in getting bytes of image: {}", e);
                    None
                }
            }
        }
        Err(e) => {
            info!("error in image request: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_name() {
        assert_eq!(encode_card_name("Black Lotus"), "Black+Lotus");
        assert_eq!(encode_card_name("Cut // Ribbons"), "Cut++Ribbons");
    }

    #[test]
    fn multiface_layouts() {
        for layout in [
            Layout::Transform,
            Layout::ModalDfc,
            Layout::DoubleFacedToken,
            Layout::Flip,
            Layout::Split,
            Layout::ReversibleCard,
        ] {
            assert!(layout.is_multiface());
        }
        for layout in [Layout::Normal, Layout::Meld, Layout::Adventure, Layout::Other] {
            assert!(!layout.is_multiface());
        }
    }

    #[test]
    fn layout_tags() {
        assert_eq!(
            serde_json::from_str::<Layout>(r#""modal_dfc""#).unwrap(),
            Layout::ModalDfc
        );
        assert_eq!(
            serde_json::from_str::<Layout>(r#""reversible_card""#).unwrap(),
            Layout::ReversibleCard
        );
        assert_eq!(
            serde_json::from_str::<Layout>(r#""some_future_layout""#).unwrap(),
            Layout::Other
        );
    }

    #[test]
    fn single_faced_record() {
        let input = r#"{
            "name": "Black Lotus",
            "layout": "normal",
            "image_uris": {
                "small": "https://cards.scryfall.io/small/front/b/d/bd8fa327.jpg",
                "large": "https://cards.scryfall.io/large/front/b/d/bd8fa327.jpg"
            }
        }"#;
        let d: serde_json::Map<String, serde_json::Value> = serde_json::from_str(input).unwrap();
        let record = CardRecord::from_dict(&d);
        assert_eq!(record.layout, Layout::Normal);
        assert_eq!(
            record.front_uri.as_deref(),
            Some("https://cards.scryfall.io/large/front/b/d/bd8fa327.jpg")
        );
        assert_eq!(record.back_uri, None);
        assert!(record.has_images());
    }

    #[test]
    fn transform_record_has_both_faces() {
        let input = r#"{
            "name": "Delver of Secrets // Insectile Aberration",
            "layout": "transform",
            "card_faces": [
                {
                    "name": "Delver of Secrets",
                    "image_uris": { "large": "https://cards.scryfall.io/large/front/1/1/11bf83bb.jpg" }
                },
                {
                    "name": "Insectile Aberration",
                    "image_uris": { "large": "https://cards.scryfall.io/large/back/1/1/11bf83bb.jpg" }
                }
            ]
        }"#;
        let d: serde_json::Map<String, serde_json::Value> = serde_json::from_str(input).unwrap();
        let record = CardRecord::from_dict(&d);
        assert_eq!(record.layout, Layout::Transform);
        assert_eq!(
            record.front_uri.as_deref(),
            Some("https://cards.scryfall.io/large/front/1/1/11bf83bb.jpg")
        );
        assert_eq!(
            record.back_uri.as_deref(),
            Some("https://cards.scryfall.io/large/back/1/1/11bf83bb.jpg")
        );
    }

    #[test]
    fn face_without_image_data_leaves_slot_absent() {
        let input = r#"{
            "name": "Memory Lapse // Memory Lapse",
            "layout": "reversible_card",
            "card_faces": [
                {
                    "name": "Memory Lapse",
                    "image_uris": { "large": "https://cards.scryfall.io/large/front/5/9/59cf0906.jpg" }
                },
                { "name": "Memory Lapse" }
            ]
        }"#;
        let d: serde_json::Map<String, serde_json::Value> = serde_json::from_str(input).unwrap();
        let record = CardRecord::from_dict(&d);
        assert_eq!(
            record.front_uri.as_deref(),
            Some("https://cards.scryfall.io/large/front/5/9/59cf0906.jpg")
        );
        assert_eq!(record.back_uri, None);
        assert!(record.has_images());
    }

    #[test]
    fn multiface_tag_without_faces_falls_back_to_top_level() {
        let input = r#"{
            "name": "Odd Duplicate",
            "layout": "transform",
            "image_uris": { "large": "https://cards.scryfall.io/large/front/a/b/abcd1234.jpg" }
        }"#;
        let d: serde_json::Map<String, serde_json::Value> = serde_json::from_str(input).unwrap();
        let record = CardRecord::from_dict(&d);
        assert_eq!(
            record.front_uri.as_deref(),
            Some("https://cards.scryfall.io/large/front/a/b/abcd1234.jpg")
        );
        assert_eq!(record.back_uri, None);
    }

    #[test]
    fn record_without_any_image_data() {
        let input = r#"{ "name": "Ghost Card", "layout": "normal" }"#;
        let d: serde_json::Map<String, serde_json::Value> = serde_json::from_str(input).unwrap();
        let record = CardRecord::from_dict(&d);
        assert!(!record.has_images());
    }

    #[test]
    fn missing_layout_counts_as_single_faced() {
        let input = r#"{
            "name": "Plains",
            "image_uris": { "large": "https://cards.scryfall.io/large/front/0/0/00000000.jpg" }
        }"#;
        let d: serde_json::Map<String, serde_json::Value> = serde_json::from_str(input).unwrap();
        let record = CardRecord::from_dict(&d);
        assert_eq!(record.layout, Layout::Normal);
        assert!(record.front_uri.is_some());
    }

    #[test]
    fn search_answer_deserialization() {
        let input = r#"{
            "object": "list",
            "total_cards": 1,
            "has_more": false,
            "data": [ { "name": "Plains", "layout": "normal" } ]
        }"#;
        let answer: ScryfallSearchAnswer = serde_json::from_str(input).unwrap();
        assert_eq!(answer.total_cards, 1);
        assert!(!answer.has_more);
        assert_eq!(answer.next_page, None);
        assert_eq!(answer.data.len(), 1);
    }
}
