use thiserror::Error;

/// Input problems caught before any external call.
///
/// The `Display` text is the inline message shown next to the form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a valid work email.")]
    InvalidEmail,

    #[error(
        "Password must be at least 8 characters and include uppercase, lowercase, and a number."
    )]
    WeakPassword,

    #[error("Please fill out all required fields.")]
    MissingRequiredFields,

    #[error("Please enter a valid apply email.")]
    InvalidApplyEmail,

    #[error("Please choose a role category.")]
    UnknownRoleCategory(String),

    #[error("Please choose a valid employment type.")]
    UnknownEmploymentType(String),
}

/// Failure reported by the hosted authentication service
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Invalid credentials, duplicate account and similar refusals
    #[error("{0}")]
    Rejected(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected response from auth service: {0}")]
    Protocol(String),
}

/// Failure reported by the listing service when writing a submission
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("{0}")]
    Rejected(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// Render a collaborator failure the way the forms display it
pub fn error_message(err: &impl std::fmt::Display) -> String {
    format!("Error: {}", err)
}
