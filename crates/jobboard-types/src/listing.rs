use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One job posting as returned by the listing query.
///
/// `role_category` arrives as `null` or missing for untagged postings and is
/// kept as `None` here. Comparisons go through [`ListingRecord::role_key`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingRecord {
    pub id: String,
    pub title: String,
    pub restaurant_name: String,
    pub city: String,
    pub state: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub role_category: Option<String>,
}

impl ListingRecord {
    /// Composite `"city, state"` used by the location filter
    pub fn location_label(&self) -> String {
        format!("{}, {}", self.city, self.state)
    }

    /// Role tag normalized for comparison: absent becomes `""`, whitespace trimmed
    pub fn role_key(&self) -> &str {
        self.role_category.as_deref().map(str::trim).unwrap_or("")
    }
}

/// Full listing shown on the detail page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingDetail {
    #[serde(flatten)]
    pub record: ListingRecord,
    pub active: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub pay_range: Option<String>,
    #[serde(default)]
    pub employment_type: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub how_to_apply: Option<String>,
    #[serde(default)]
    pub company_website: Option<String>,
    #[serde(default)]
    pub apply_email: Option<String>,
}

/// A job posting submitted by an employer.
///
/// Stored unpublished until a moderator approves it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewListing {
    pub restaurant_name: String,
    pub title: String,
    pub role_category: String,
    pub city: String,
    pub state: String,
    pub apply_email: String,
    #[serde(default)]
    pub company_website: Option<String>,
    #[serde(default)]
    pub employment_type: Option<String>,
    #[serde(default)]
    pub pay_range: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub how_to_apply: Option<String>,
    pub description: String,
}
