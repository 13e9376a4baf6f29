//! Bihar district directory: autocomplete and free-text matching.

/// Districts of Bihar, alphabetical.
pub const BIHAR_DISTRICTS: [&str; 38] = [
    "Araria",
    "Arwal",
    "Aurangabad",
    "Banka",
    "Begusarai",
    "Bhagalpur",
    "Bhojpur",
    "Buxar",
    "Darbhanga",
    "East Champaran",
    "Gaya",
    "Gopalganj",
    "Jamui",
    "Jehanabad",
    "Kaimur",
    "Katihar",
    "Khagaria",
    "Kishanganj",
    "Lakhisarai",
    "Madhepura",
    "Madhubani",
    "Munger",
    "Muzaffarpur",
    "Nalanda",
    "Nawada",
    "Patna",
    "Purnia",
    "Rohtas",
    "Saharsa",
    "Samastipur",
    "Saran",
    "Sheikhpura",
    "Sheohar",
    "Sitamarhi",
    "Siwan",
    "Supaul",
    "Vaishali",
    "West Champaran",
];

/// Spellings used by geocoders that differ from the official name.
const NAME_VARIANTS: [(&str, &str); 2] = [
    ("luckeesarai", "Lakhisarai"),
    ("lakhisarai", "Lakhisarai"),
];

/// Districts starting with `prefix`, ignoring case. Empty input suggests
/// nothing.
pub fn suggest(prefix: &str) -> Vec<&'static str> {
    if prefix.is_empty() {
        return Vec::new();
    }
    let prefix = prefix.to_lowercase();
    BIHAR_DISTRICTS
        .iter()
        .copied()
        .filter(|d| d.to_lowercase().starts_with(&prefix))
        .collect()
}

/// Official name for a known spelling variant.
pub fn known_variant(name: &str) -> Option<&'static str> {
    let name = name.trim().to_lowercase();
    NAME_VARIANTS
        .iter()
        .find(|(variant, _)| *variant == name)
        .map(|(_, official)| *official)
}

/// Best district for a piece of free text such as a geocoder label.
///
/// Tries, in order: exact name, text starting with a district name, a
/// district name starting with the text, then the text containing a
/// district name anywhere. A trailing word "district" is ignored.
pub fn find_best_district(text: &str) -> Option<&'static str> {
    let text = strip_district_word(&text.to_lowercase());
    if text.trim().is_empty() {
        return None;
    }

    BIHAR_DISTRICTS
        .iter()
        .copied()
        .find(|d| {
            let name = d.to_lowercase();
            text == name || text.starts_with(&name) || name.starts_with(&text)
        })
        .or_else(|| {
            BIHAR_DISTRICTS
                .iter()
                .copied()
                .find(|d| text.contains(&d.to_lowercase()))
        })
}

/// Remove every whitespace-preceded, whole-word "district" (any case).
pub fn strip_district_word(text: &str) -> String {
    const WORD: &str = "district";

    let lower = text.to_ascii_lowercase();
    let bytes = lower.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut copied_to = 0;
    let mut search_from = 0;

    while let Some(pos) = lower[search_from..].find(WORD) {
        let start = search_from + pos;
        let end = start + WORD.len();

        let mut gap_start = start;
        while gap_start > copied_to && bytes[gap_start - 1].is_ascii_whitespace() {
            gap_start -= 1;
        }
        let ends_word = end == bytes.len() || !is_word_byte(bytes[end]);

        if gap_start < start && ends_word {
            out.push_str(&text[copied_to..gap_start]);
            copied_to = end;
        }
        search_from = end;
    }

    out.push_str(&text[copied_to..]);
    out
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}
