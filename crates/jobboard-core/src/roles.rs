//! Role-category query surface for the jobs page
//!
//! The jobs page is locked to a set of role categories by repeating the
//! `role` parameter: `/jobs?role=Line&role=Prep`.

use jobboard_types::TopRole;

/// Name of the repeatable query parameter carrying role categories
pub const ROLE_PARAM: &str = "role";

/// Path of the jobs page
pub const JOBS_PATH: &str = "/jobs";

/// Extract every `role` value from a URL query string.
///
/// Values are percent-decoded (`+` counts as a space), trimmed, and blank
/// entries are dropped. Order and duplicates are kept; the filter engine
/// deduplicates. A leading `?` is accepted.
pub fn parse_role_params(query: &str) -> Vec<String> {
    let query = query.strip_prefix('?').unwrap_or(query);

    query
        .split('&')
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            if decode_component(key)?.trim() != ROLE_PARAM {
                return None;
            }
            let value = decode_component(value)?;
            let value = value.trim();
            (!value.is_empty()).then(|| value.to_string())
        })
        .collect()
}

fn decode_component(raw: &str) -> Option<String> {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => Some(decoded.into_owned()),
        Err(e) => {
            tracing::debug!("Skipping undecodable query component {:?}: {}", raw, e);
            None
        }
    }
}

/// Build the jobs-page link for a set of role categories
pub fn jobs_href<S: AsRef<str>>(roles: &[S]) -> String {
    let params: Vec<String> = roles
        .iter()
        .map(|r| r.as_ref().trim())
        .filter(|r| !r.is_empty())
        .map(|r| format!("{}={}", ROLE_PARAM, urlencoding::encode(r)))
        .collect();

    if params.is_empty() {
        JOBS_PATH.to_string()
    } else {
        format!("{}?{}", JOBS_PATH, params.join("&"))
    }
}

/// Link target for a home-page role card
pub fn top_role_href(card: &TopRole) -> String {
    let tags: Vec<&str> = card.roles.iter().map(|r| r.as_str()).collect();
    jobs_href(&tags)
}
