use serde::{Deserialize, Serialize};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PriceRange {
    #[serde(rename = "$")]
    Budget,
    #[serde(rename = "$$")]
    Moderate,
    #[serde(rename = "$$$")]
    Premium,
}

impl PriceRange {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Budget => "$",
            Self::Moderate => "$$",
            Self::Premium => "$$$",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "$" => Some(Self::Budget),
            "$$" => Some(Self::Moderate),
            "$$$" => Some(Self::Premium),
            _ => None,
        }
    }
}

impl std::fmt::Display for PriceRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

impl std::str::FromStr for PriceRange {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value).ok_or_else(|| format!("unknown price range '{value}'; use $, $$ or $$$"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub name: String,
    pub price: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cafe {
    pub id: String,
    pub name: String,
    pub address: String,
    pub description: String,
    pub price_range: PriceRange,
    pub student_friendly: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub map_url: String,
    #[serde(default)]
    pub menu: Vec<MenuItem>,
    pub hours: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Cafe {
    pub fn new(id: &str, name: &str, address: &str, price_range: PriceRange) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            address: address.to_string(),
            description: String::new(),
            price_range,
            student_friendly: false,
            tags: Vec::new(),
            map_url: String::new(),
            menu: Vec::new(),
            hours: String::new(),
            image: None,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_hours(mut self, hours: &str) -> Self {
        self.hours = hours.to_string();
        self
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|tag| tag.to_string()).collect();
        self
    }

    pub fn with_menu(mut self, items: &[(&str, u32)]) -> Self {
        self.menu = items
            .iter()
            .map(|(name, price)| MenuItem {
                name: name.to_string(),
                price: *price,
            })
            .collect();
        self
    }

    pub fn student_friendly(mut self, value: bool) -> Self {
        self.student_friendly = value;
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|own| own == tag)
    }

    /// Every text field that takes part in search, joined by spaces.
    /// Links, images and numeric or boolean fields are left out.
    pub fn searchable_text(&self) -> String {
        let mut parts: Vec<&str> = vec![
            self.name.as_str(),
            self.address.as_str(),
            self.description.as_str(),
            self.hours.as_str(),
            self.price_range.symbol(),
        ];
        parts.extend(self.tags.iter().map(String::as_str));
        parts.extend(self.menu.iter().map(|item| item.name.as_str()));
        parts.join(" ")
    }
}

/// Canonical comparable form: lowercase, diacritics stripped, anything outside
/// `[a-z0-9]` turned into a single separating space, trimmed.
pub fn normalize_for_search(input: &str) -> String {
    let mut normalized = String::with_capacity(input.len());
    let mut pending_space = false;

    for c in input
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
    {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_space && !normalized.is_empty() {
                normalized.push(' ');
            }
            pending_space = false;
            normalized.push(c);
        } else {
            pending_space = true;
        }
    }

    normalized
}

pub fn tokenize(normalized: &str) -> Vec<&str> {
    normalized.split_whitespace().collect()
}

#[cfg(test)]
mod tests {
    use super::{normalize_for_search, tokenize};

    #[test]
    fn strips_diacritics_before_filtering() {
        assert_eq!(normalize_for_search("Café de Marikina"), "cafe de marikina");
        assert_eq!(normalize_for_search("Sto. Niño"), "sto nino");
    }

    #[test]
    fn collapses_punctuation_runs_into_one_space() {
        assert_eq!(normalize_for_search("  Grind & Gather!! "), "grind gather");
        assert_eq!(normalize_for_search("7:00 AM – 9:00 PM"), "7 00 am 9 00 pm");
    }

    #[test]
    fn tokenizer_skips_empty_tokens() {
        assert_eq!(tokenize(" a  b "), vec!["a", "b"]);
        assert!(tokenize("").is_empty());
    }
}
