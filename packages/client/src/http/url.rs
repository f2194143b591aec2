//! URL template resolution.

use std::collections::BTreeMap;

use url::Url;

use crate::error::{self, Error};

/// Substitutes every literal `{key}` token in `template` with its path
/// parameter, parses the result, then appends the query parameters
/// URL-encoded in stored order.
pub fn resolve(
    template: &str,
    path_params: &BTreeMap<String, String>,
    query_params: &BTreeMap<String, String>,
) -> Result<Url, Error> {
    let mut resolved = template.to_string();
    for (key, value) in path_params {
        resolved = resolved.replace(&format!("{{{key}}}"), value);
    }

    let mut url = Url::parse(&resolved).map_err(error::malformed_url)?;
    if !query_params.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in query_params {
            pairs.append_pair(key, value);
        }
        drop(pairs);
    }
    Ok(url)
}
