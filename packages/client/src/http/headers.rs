//! Header map assembly.

use std::collections::BTreeMap;

use http::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};

/// Converts the descriptor's header map, attaching `User-Agent` when one
/// was configured and the caller did not set the header explicitly.
/// Entries that are not valid HTTP header names or values are skipped.
pub(crate) fn to_header_map(
    headers: &BTreeMap<String, String>,
    user_agent: Option<&str>,
) -> HeaderMap {
    let mut map = HeaderMap::with_capacity(headers.len() + 1);
    for (name, value) in headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                map.insert(name, value);
            }
            _ => tracing::warn!(header = %name, "skipping invalid header"),
        }
    }
    if let Some(agent) = user_agent {
        if !map.contains_key(USER_AGENT) {
            match HeaderValue::from_str(agent) {
                Ok(value) => {
                    map.insert(USER_AGENT, value);
                }
                Err(_) => tracing::warn!("skipping invalid user agent value"),
            }
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn converts_and_appends_user_agent() {
        let map = to_header_map(&headers(&[("accept", "application/json")]), Some("fetchq/1.0"));
        assert_eq!(map.get("accept").unwrap(), "application/json");
        assert_eq!(map.get(USER_AGENT).unwrap(), "fetchq/1.0");
    }

    #[test]
    fn explicit_user_agent_wins() {
        let map = to_header_map(&headers(&[("user-agent", "custom/2.0")]), Some("fetchq/1.0"));
        assert_eq!(map.get(USER_AGENT).unwrap(), "custom/2.0");
    }

    #[test]
    fn invalid_entries_are_skipped() {
        let map = to_header_map(&headers(&[("bad header", "x"), ("ok", "y")]), None);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("ok").unwrap(), "y");
    }
}
