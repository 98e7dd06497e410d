//! Content fingerprint over a materials list.
//!
//! The fingerprint keys the estimate cache, so it must be insensitive to
//! ordering, casing, and whitespace noise in the incoming list.

use std::sync::OnceLock;

use regex::Regex;
use sha2::{Digest, Sha256};

fn whitespace() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("static regex"))
}

/// Hex sha256 over the normalized, sorted materials list.
pub fn materials_fingerprint(materials: &[String]) -> String {
    let mut normalized: Vec<String> = materials
        .iter()
        .map(|m| {
            whitespace()
                .replace_all(m.trim().to_lowercase().as_str(), " ")
                .into_owned()
        })
        .filter(|m| !m.is_empty())
        .collect();
    normalized.sort();

    let joined = normalized.join("|");
    format!("{:x}", Sha256::digest(joined.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_order_insensitive() {
        let a = materials_fingerprint(&strings(&["canvas", "leather"]));
        let b = materials_fingerprint(&strings(&["leather", "canvas"]));
        assert_eq!(a, b);
    }

    #[test]
    fn test_case_and_whitespace_insensitive() {
        let a = materials_fingerprint(&strings(&["Organic  Cotton "]));
        let b = materials_fingerprint(&strings(&["organic cotton"]));
        assert_eq!(a, b);
    }

    #[test]
    fn test_content_sensitive() {
        let a = materials_fingerprint(&strings(&["canvas"]));
        let b = materials_fingerprint(&strings(&["denim"]));
        assert_ne!(a, b);
    }

    #[test]
    fn test_empty_entries_ignored() {
        let a = materials_fingerprint(&strings(&["canvas", "  ", ""]));
        let b = materials_fingerprint(&strings(&["canvas"]));
        assert_eq!(a, b);
    }

    #[test]
    fn test_hex_shape() {
        let fp = materials_fingerprint(&strings(&["canvas"]));
        assert_eq!(fp.len(), 64);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
