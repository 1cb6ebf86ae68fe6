//! Post-a-job form
//!
//! Submissions are stored unpublished; a moderator approves them later.
//! The same normalization runs in the browser before sending and in the
//! listing service before storing.

use std::cell::RefCell;

use jobboard_types::{EmploymentType, NewListing, RoleCategory};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{error_message, SubmitError, ValidationError};
use crate::validation::is_valid_email;

pub const SUBMITTED_MESSAGE: &str = "Submitted! Your job will be posted after approval.";

/// Listing service write operation
#[allow(async_fn_in_trait)]
pub trait SubmissionClient {
    /// Store a listing, returning its id
    async fn submit(&self, listing: &NewListing) -> Result<String, SubmitError>;
}

fn optional(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Trim and check a submission.
///
/// Restaurant name, title, city, state, apply email and description are
/// required. The role category must be canonical, the employment type (if
/// given) must be known, and the state is upper-cased. Blank optional
/// fields become `None`.
pub fn normalize_listing(raw: &NewListing) -> Result<NewListing, ValidationError> {
    let required = [
        raw.restaurant_name.trim(),
        raw.title.trim(),
        raw.role_category.trim(),
        raw.city.trim(),
        raw.state.trim(),
        raw.apply_email.trim(),
        raw.description.trim(),
    ];
    if required.iter().any(|v| v.is_empty()) {
        return Err(ValidationError::MissingRequiredFields);
    }
    let [restaurant_name, title, role_category, city, state, apply_email, description] = required;

    let role_category = RoleCategory::parse(role_category)
        .map_err(|e| ValidationError::UnknownRoleCategory(e.value))?;

    if !is_valid_email(apply_email) {
        return Err(ValidationError::InvalidApplyEmail);
    }

    let employment_type = optional(&raw.employment_type)
        .map(|t| {
            EmploymentType::parse(&t)
                .map(|t| t.as_str().to_string())
                .map_err(|e| ValidationError::UnknownEmploymentType(e.value))
        })
        .transpose()?;

    Ok(NewListing {
        restaurant_name: restaurant_name.to_string(),
        title: title.to_string(),
        role_category: role_category.as_str().to_string(),
        city: city.to_string(),
        state: state.to_uppercase(),
        apply_email: apply_email.to_string(),
        company_website: optional(&raw.company_website),
        employment_type,
        pay_range: optional(&raw.pay_range),
        address: optional(&raw.address),
        how_to_apply: optional(&raw.how_to_apply),
        description: description.to_string(),
    })
}

/// Raw inputs of the post-job page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobSubmissionFields {
    pub restaurant_name: String,
    pub title: String,
    pub role_category: String,
    pub city: String,
    pub state: String,
    pub apply_email: String,
    pub company_website: String,
    pub employment_type: String,
    pub pay_range: String,
    pub address: String,
    pub how_to_apply: String,
    pub description: String,
}

impl JobSubmissionFields {
    fn to_listing(&self) -> NewListing {
        let some = |v: &String| Some(v.clone());
        NewListing {
            restaurant_name: self.restaurant_name.clone(),
            title: self.title.clone(),
            role_category: self.role_category.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            apply_email: self.apply_email.clone(),
            company_website: some(&self.company_website),
            employment_type: some(&self.employment_type),
            pay_range: some(&self.pay_range),
            address: some(&self.address),
            how_to_apply: some(&self.how_to_apply),
            description: self.description.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobSubmissionForm {
    fields: JobSubmissionFields,
    message: Option<String>,
    in_flight: bool,
    detached: bool,
}

impl JobSubmissionForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fields(&self) -> &JobSubmissionFields {
        &self.fields
    }

    pub fn set_fields(&mut self, fields: JobSubmissionFields) {
        self.fields = fields;
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight
    }

    pub fn validate(&self) -> Result<NewListing, ValidationError> {
        normalize_listing(&self.fields.to_listing())
    }

    /// Returns the listing to send, or `None` when nothing should be sent
    pub fn begin_submit(&mut self) -> Option<NewListing> {
        if self.in_flight || self.detached {
            return None;
        }
        self.message = None;
        match self.validate() {
            Ok(listing) => {
                self.in_flight = true;
                Some(listing)
            }
            Err(e) => {
                self.message = Some(e.to_string());
                None
            }
        }
    }

    /// The page went away; later replies are dropped
    pub fn detach(&mut self) {
        self.detached = true;
        self.in_flight = false;
    }

    /// Success clears the form; failure keeps the input for another try
    pub fn finish_submit(&mut self, result: Result<String, SubmitError>) {
        if self.detached {
            debug!("Dropping submission reply for a closed form");
            return;
        }
        self.in_flight = false;
        match result {
            Ok(id) => {
                info!("Job submitted for approval: {}", id);
                self.fields = JobSubmissionFields::default();
                self.message = Some(SUBMITTED_MESSAGE.to_string());
            }
            Err(e) => {
                warn!("Job submission failed: {}", e);
                self.message = Some(error_message(&e));
            }
        }
    }
}

/// Validate and send the form once. Returns the new listing id.
pub async fn submit_job<C: SubmissionClient>(
    form: &RefCell<JobSubmissionForm>,
    client: &C,
) -> Option<String> {
    let listing = form.borrow_mut().begin_submit()?;
    let result = client.submit(&listing).await;
    let id = result.as_ref().ok().cloned();
    form.borrow_mut().finish_submit(result);
    id
}
