/// One line of the input list: either a comma-delimited card entry with
/// optional set code and collector number, or a direct card url.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum CardReference {
    Entry {
        name: String,
        set: Option<String>,
        number: Option<String>,
    },
    Url(String),
}

impl CardReference {
    pub fn new(name: &str, set: Option<&str>, number: Option<&str>) -> CardReference {
        CardReference::Entry {
            name: name.to_string(),
            set: set.map(String::from),
            number: number.map(String::from),
        }
    }

    pub fn from_name(name: &str) -> CardReference {
        CardReference::new(name, None, None)
    }
}

pub fn parse_reference(line: &str) -> Option<CardReference> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    if line.starts_with("http") {
        return Some(CardReference::Url(line.to_string()));
    }
    let mut fields = line.split(',').map(str::trim);
    let name = fields.next()?.to_string();
    if name.is_empty() {
        return None;
    }
    let set = fields.next().filter(|s| !s.is_empty()).map(String::from);
    let number = fields.next().filter(|s| !s.is_empty()).map(String::from);
    Some(CardReference::Entry { name, set, number })
}

pub fn parse_card_list(text: &str) -> Vec<CardReference> {
    text.lines().filter_map(parse_reference).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name() {
        assert_eq!(
            parse_reference("Black Lotus").unwrap(),
            CardReference::from_name("Black Lotus")
        );
    }

    #[test]
    fn name_set() {
        assert_eq!(
            parse_reference("Shatter,mrd").unwrap(),
            CardReference::new("Shatter", Some("mrd"), None)
        );
    }

    #[test]
    fn name_set_number() {
        assert_eq!(
            parse_reference("Delver of Secrets,isd,51").unwrap(),
            CardReference::new("Delver of Secrets", Some("isd"), Some("51"))
        );
    }

    #[test]
    fn padded_fields() {
        assert_eq!(
            parse_reference("  Lightning Bolt , lea , 161 ").unwrap(),
            CardReference::new("Lightning Bolt", Some("lea"), Some("161"))
        );
    }

    #[test]
    fn blank_trailing_fields_are_absent() {
        assert_eq!(
            parse_reference("Lightning Bolt,,").unwrap(),
            CardReference::from_name("Lightning Bolt")
        );
    }

    #[test]
    fn url() {
        assert_eq!(
            parse_reference("https://scryfall.com/card/neo/46/kairi-the-swelling-sea").unwrap(),
            CardReference::Url("https://scryfall.com/card/neo/46/kairi-the-swelling-sea".to_string())
        );
    }

    #[test]
    fn empty_line() {
        assert_eq!(parse_reference("   "), None);
        assert_eq!(parse_reference(",mrd,42"), None);
    }

    #[test]
    fn list() {
        let text = "Black Lotus\n\nhttps://scryfall.com/card/lea/232/black-lotus\nShatter,mrd\n";
        let parsed = parse_card_list(text);
        assert_eq!(
            parsed,
            vec![
                CardReference::from_name("Black Lotus"),
                CardReference::Url("https://scryfall.com/card/lea/232/black-lotus".to_string()),
                CardReference::new("Shatter", Some("mrd"), None),
            ]
        );
    }
}
