//! Manufacturing complexity derivation.
//!
//! The level feeds the labor/tooling bands of the cost prompt and is
//! computed in code so identical inputs always classify identically.

/// Tokens that mark a product as electronics-bearing.
const ELECTRONICS_VOCAB: &[&str] = &[
    "motor", "battery", "led", "circuit", "sensor", "electronic", "pcb", "servo", "wiring",
    "charger", "usb", "speaker", "bluetooth",
];

/// Categories that imply structural work even without electronics.
const MEDIUM_CATEGORIES: &[&str] = &["furniture", "appliance", "machinery"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplexityLevel {
    Low,
    Medium,
    High,
}

impl ComplexityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplexityLevel::Low => "low",
            ComplexityLevel::Medium => "medium",
            ComplexityLevel::High => "high",
        }
    }
}

/// Classifies from the category plus any descriptive text segments
/// (description, materials, hardware). Matching is case-insensitive
/// substring search.
pub fn derive<'a>(
    category: &str,
    segments: impl IntoIterator<Item = &'a str>,
) -> ComplexityLevel {
    let category_lower = category.to_lowercase();
    let mut haystacks = vec![category_lower.clone()];
    haystacks.extend(segments.into_iter().map(|s| s.to_lowercase()));

    let has_electronics = haystacks
        .iter()
        .any(|text| ELECTRONICS_VOCAB.iter().any(|token| text.contains(token)));
    if has_electronics {
        return ComplexityLevel::High;
    }

    if MEDIUM_CATEGORIES.iter().any(|c| category_lower.contains(c)) {
        return ComplexityLevel::Medium;
    }

    ComplexityLevel::Low
}
