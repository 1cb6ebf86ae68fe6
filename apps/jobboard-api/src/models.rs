//! Data models for the listing service

use chrono::{DateTime, Utc};
use jobboard_types::{ListingDetail, ListingRecord};
use serde::Serialize;
use sqlx::FromRow;

/// One row of the `jobs` table
#[derive(Debug, Clone, FromRow)]
pub struct DbJob {
    pub id: String,
    pub title: String,
    pub restaurant_name: String,
    pub role_category: Option<String>,
    pub city: String,
    pub state: String,
    pub apply_email: Option<String>,
    pub company_website: Option<String>,
    pub employment_type: Option<String>,
    pub pay_range: Option<String>,
    pub address: Option<String>,
    pub how_to_apply: Option<String>,
    pub description: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl DbJob {
    pub fn record(&self) -> ListingRecord {
        ListingRecord {
            id: self.id.clone(),
            title: self.title.clone(),
            restaurant_name: self.restaurant_name.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            created_at: self.created_at,
            role_category: self.role_category.clone(),
        }
    }

    pub fn into_detail(self) -> ListingDetail {
        ListingDetail {
            record: self.record(),
            active: self.active,
            description: self.description,
            pay_range: self.pay_range,
            employment_type: self.employment_type,
            address: self.address,
            how_to_apply: self.how_to_apply,
            company_website: self.company_website,
            apply_email: self.apply_email,
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Reply to a stored submission
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub id: String,
    pub message: &'static str,
}

/// Reply to a moderation approval
#[derive(Debug, Serialize)]
pub struct ApproveResponse {
    pub success: bool,
    pub id: String,
    pub active: bool,
}
