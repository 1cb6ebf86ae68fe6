//! Listing detail page

use chrono::{DateTime, Utc};
use jobboard_types::ListingDetail;
use tracing::warn;

pub const NOT_FOUND_MESSAGE: &str =
    "This job may be inactive, removed, or the link is incorrect.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailView {
    Found(Box<ListingDetail>),
    NotFound,
}

impl DetailView {
    pub fn heading(&self) -> &str {
        match self {
            DetailView::Found(detail) => &detail.record.title,
            DetailView::NotFound => "Job Details",
        }
    }
}

/// Decide what the detail page shows.
///
/// A blank id, a failed fetch, a missing row and an inactive row all give
/// the same "not found" state.
pub fn resolve_detail<E: std::fmt::Display>(
    id: Option<&str>,
    fetched: Result<Option<ListingDetail>, E>,
) -> DetailView {
    if id.map_or(true, |id| id.trim().is_empty()) {
        return DetailView::NotFound;
    }
    match fetched {
        Ok(Some(detail)) if detail.active => DetailView::Found(Box::new(detail)),
        Ok(_) => DetailView::NotFound,
        Err(e) => {
            warn!("Listing fetch failed: {}", e);
            DetailView::NotFound
        }
    }
}

/// Creation date as `MM/DD/YYYY`
pub fn posted_label(created_at: &DateTime<Utc>) -> String {
    created_at.format("%m/%d/%Y").to_string()
}

/// `"city, state"`, or empty when either part is blank
pub fn location_label(city: &str, state: &str) -> String {
    let (city, state) = (city.trim(), state.trim());
    if city.is_empty() || state.is_empty() {
        String::new()
    } else {
        format!("{}, {}", city, state)
    }
}
