//! Data-URL decoding for synthesis providers that return inline payloads.

use base64::Engine;

use super::StorageError;

/// Returns the decoded payload when `url` is a base64 data URL, `None`
/// for any other scheme.
pub fn decode(url: &str) -> Result<Option<Vec<u8>>, StorageError> {
    let Some(rest) = url.strip_prefix("data:") else {
        return Ok(None);
    };

    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| StorageError::DataUrl("missing ',' separator".to_string()))?;

    if !header.ends_with(";base64") {
        return Err(StorageError::DataUrl(format!(
            "unsupported encoding in '{}'",
            header
        )));
    }

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| StorageError::DataUrl(e.to_string()))?;

    Ok(Some(bytes))
}
