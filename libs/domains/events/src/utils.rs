//! Query string and request body helpers

use crate::error::{EventError, Result};
use axum::http::{HeaderMap, header};
use std::collections::HashMap;

/// Split a raw query string into a name → value map.
///
/// Never fails: empty input gives an empty map, a later duplicate key wins,
/// a key without `=` maps to `""`, and empty segments or keys are skipped.
/// Keys and values are percent-decoded with `+` read as a space; text that
/// does not decode to UTF-8 is kept as written.
pub fn query_to_map(raw: Option<&str>) -> HashMap<String, String> {
    let mut params = HashMap::new();

    for segment in raw.unwrap_or_default().split('&') {
        let (key, value) = segment.split_once('=').unwrap_or((segment, ""));
        if key.is_empty() {
            continue;
        }
        params.insert(decode_component(key), decode_component(value));
    }

    params
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => raw.to_string(),
    }
}

/// Decode a fully buffered request body to text.
///
/// The charset comes from the `content-type` header's `charset` parameter,
/// defaulting to UTF-8. Supported: `utf-8`, `us-ascii`, `iso-8859-1`.
pub fn body_to_string(headers: &HeaderMap, body: &[u8]) -> Result<String> {
    let charset = declared_charset(headers).unwrap_or_else(|| "utf-8".to_string());

    match charset.as_str() {
        "utf-8" | "utf8" => String::from_utf8(body.to_vec())
            .map_err(|e| EventError::MalformedPayload(format!("body is not valid UTF-8: {}", e))),
        "us-ascii" | "ascii" => {
            if let Some(pos) = body.iter().position(|b| !b.is_ascii()) {
                return Err(EventError::MalformedPayload(format!(
                    "non-ASCII byte at offset {}",
                    pos
                )));
            }
            Ok(body.iter().map(|&b| b as char).collect())
        }
        "iso-8859-1" | "latin1" | "latin-1" => Ok(body.iter().map(|&b| b as char).collect()),
        other => Err(EventError::MalformedPayload(format!(
            "unsupported charset: {}",
            other
        ))),
    }
}

fn declared_charset(headers: &HeaderMap) -> Option<String> {
    let content_type = headers.get(header::CONTENT_TYPE)?.to_str().ok()?;

    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        name.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches('"').to_ascii_lowercase())
    })
}
