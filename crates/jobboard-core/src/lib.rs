//! Job board core logic
//!
//! - `filter`: listing filter engine for the jobs page and latest panel
//! - `gate`: access gate deciding redirects for employer pages
//! - `wizard`: employer login and three-step signup form
//! - `confirm`: resend-confirmation prompt
//! - `submission`: post-a-job form and listing normalization
//! - `detail`: listing detail page state
//!
//! Everything here is host independent. Browser and server bindings supply
//! the [`auth::AuthClient`], [`route::Navigator`] and
//! [`submission::SubmissionClient`] implementations.

pub mod auth;
pub mod confirm;
pub mod detail;
pub mod error;
pub mod filter;
pub mod gate;
pub mod roles;
pub mod route;
pub mod submission;
pub mod validation;
pub mod wizard;

pub use auth::{AuthClient, SessionSnapshot, SignUpOutcome, Subscription};
pub use confirm::{load_confirmation, resend_confirmation, ConfirmationPrompt};
pub use detail::{location_label, posted_label, resolve_detail, DetailView, NOT_FOUND_MESSAGE};
pub use error::{error_message, AuthError, SubmitError, ValidationError};
pub use filter::{FilterOptions, FilterState, ListingFilter, LockedRoles};
pub use gate::{
    decide, run_session_check, AccessGate, AccessState, CheckOutcome, CheckTicket, GateDecision,
    GateView,
};
pub use roles::{jobs_href, parse_role_params, top_role_href};
pub use route::{Location, Navigator, PageClass, Redirect, Route};
pub use submission::{
    normalize_listing, submit_job, JobSubmissionFields, JobSubmissionForm, SubmissionClient,
};
pub use validation::{
    validate_email, validate_password_strength, validate_profile, EmployerProfile, ProfileFields,
};
pub use wizard::{
    submit_auth_form, AuthMode, AuthRequest, AuthResponse, EmployerAuthForm, PendingSubmit,
    SignupStep,
};
