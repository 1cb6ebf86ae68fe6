//! Employer sign-in / sign-up form
//!
//! Login is a single step. Signup is a strict three-step wizard:
//! email, then password, then profile. Back keeps what was entered.
//! At most one auth call is in flight per form; results that arrive after
//! a mode switch or after the form is detached are ignored.

use std::cell::RefCell;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::{AuthClient, SignUpOutcome};
use crate::error::{error_message, AuthError, ValidationError};
use crate::route::{Navigator, Redirect, Route};
use crate::validation::{
    validate_email, validate_password_strength, validate_profile, EmployerProfile, ProfileFields,
};

pub const SIGNUP_INCOMPLETE_MESSAGE: &str =
    "Account created, but we couldn't finish setup. Please log in.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMode {
    #[default]
    Login,
    Signup,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignupStep {
    #[default]
    Email,
    Password,
    Profile,
}

impl SignupStep {
    /// 1-based position shown as "Step N of 3"
    pub fn number(&self) -> u8 {
        match self {
            SignupStep::Email => 1,
            SignupStep::Password => 2,
            SignupStep::Profile => 3,
        }
    }
}

/// The call the form wants made against the auth service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthRequest {
    SignIn {
        email: String,
        password: String,
    },
    SignUp {
        email: String,
        password: String,
        profile: EmployerProfile,
    },
}

/// A request released by [`EmployerAuthForm::begin_submit`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSubmit {
    pub attempt: u64,
    pub request: AuthRequest,
}

/// Successful auth service reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthResponse {
    SignedIn,
    SignedUp(SignUpOutcome),
}

/// Form state of the employer login page
#[derive(Debug, Clone, Default)]
pub struct EmployerAuthForm {
    mode: AuthMode,
    step: SignupStep,
    email: String,
    password: String,
    profile: ProfileFields,
    message: Option<String>,
    in_flight: bool,
    attempt: u64,
    return_to: Option<Route>,
    detached: bool,
}

impl EmployerAuthForm {
    pub fn new(return_to: Option<Route>) -> Self {
        Self {
            return_to,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    pub fn step(&self) -> SignupStep {
        self.step
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn profile(&self) -> &ProfileFields {
        &self.profile
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight
    }

    pub fn return_to(&self) -> Option<&Route> {
        self.return_to.as_ref()
    }

    /// Change between login and signup.
    ///
    /// Always restarts at the email step; the email survives, the password
    /// and profile do not. Any call still in flight is abandoned, so the
    /// new mode may submit at once; the old reply is dropped by attempt.
    pub fn switch_mode(&mut self, mode: AuthMode) {
        self.mode = mode;
        self.step = SignupStep::Email;
        self.password.clear();
        self.profile = ProfileFields::default();
        self.message = None;
        self.in_flight = false;
        self.attempt += 1;
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = password.into();
    }

    pub fn set_profile(&mut self, profile: ProfileFields) {
        self.profile = profile;
    }

    /// Signup step 1 -> 2
    pub fn continue_from_email(&mut self) -> Result<(), ValidationError> {
        if self.mode != AuthMode::Signup || self.step != SignupStep::Email {
            return Ok(());
        }
        self.message = None;
        self.check(validate_email(&self.email))?;
        self.step = SignupStep::Password;
        Ok(())
    }

    /// Signup step 2 -> 3
    pub fn continue_from_password(&mut self) -> Result<(), ValidationError> {
        if self.mode != AuthMode::Signup || self.step != SignupStep::Password {
            return Ok(());
        }
        self.message = None;
        self.check(validate_password_strength(&self.password))?;
        self.step = SignupStep::Profile;
        Ok(())
    }

    pub fn back(&mut self) {
        if self.in_flight {
            return;
        }
        self.message = None;
        self.step = match self.step {
            SignupStep::Profile => SignupStep::Password,
            SignupStep::Password | SignupStep::Email => SignupStep::Email,
        };
    }

    /// Handle a form submission.
    ///
    /// Returns the auth call to make, or `None` when nothing should be
    /// called: a call is already in flight, local validation failed, or the
    /// submission only advanced the signup wizard.
    pub fn begin_submit(&mut self) -> Option<PendingSubmit> {
        if self.in_flight || self.detached {
            return None;
        }

        let request = match (self.mode, self.step) {
            (AuthMode::Login, _) => {
                self.message = None;
                self.check(validate_email(&self.email)).ok()?;
                if self.password.is_empty() {
                    self.check(Err(ValidationError::MissingRequiredFields)).ok()?;
                }
                AuthRequest::SignIn {
                    email: self.email.trim().to_string(),
                    password: self.password.clone(),
                }
            }
            // Validation failures are already in `message`
            (AuthMode::Signup, SignupStep::Email) => {
                self.continue_from_email().ok();
                return None;
            }
            (AuthMode::Signup, SignupStep::Password) => {
                self.continue_from_password().ok();
                return None;
            }
            (AuthMode::Signup, SignupStep::Profile) => {
                self.message = None;
                let profile = self.check(validate_profile(&self.profile)).ok()?;
                AuthRequest::SignUp {
                    email: self.email.trim().to_string(),
                    password: self.password.clone(),
                    profile,
                }
            }
        };

        self.in_flight = true;
        Some(PendingSubmit {
            attempt: self.attempt,
            request,
        })
    }

    /// Apply the auth service reply for `attempt`.
    ///
    /// Returns the page to navigate to on success. Replies for an abandoned
    /// attempt change nothing.
    pub fn finish_submit(
        &mut self,
        attempt: u64,
        result: Result<AuthResponse, AuthError>,
    ) -> Option<Route> {
        if self.detached || attempt != self.attempt {
            return None;
        }
        self.in_flight = false;

        match result {
            Err(e) => {
                warn!("Employer auth failed: {}", e);
                self.message = Some(error_message(&e));
                None
            }
            Ok(AuthResponse::SignedIn) => {
                info!("Employer signed in");
                Some(self.return_to.clone().unwrap_or(Route::Home))
            }
            Ok(AuthResponse::SignedUp(SignUpOutcome { user_id: Some(_) })) => {
                info!("Employer account created");
                Some(Route::EmployerWelcome)
            }
            Ok(AuthResponse::SignedUp(SignUpOutcome { user_id: None })) => {
                self.message = Some(SIGNUP_INCOMPLETE_MESSAGE.to_string());
                None
            }
        }
    }

    /// The page went away; later replies are dropped
    pub fn detach(&mut self) {
        self.detached = true;
        self.in_flight = false;
    }

    fn check<T>(&mut self, result: Result<T, ValidationError>) -> Result<T, ValidationError> {
        if let Err(e) = &result {
            self.message = Some(e.to_string());
        }
        result
    }
}

async fn perform<A: AuthClient>(
    client: &A,
    request: &AuthRequest,
) -> Result<AuthResponse, AuthError> {
    match request {
        AuthRequest::SignIn { email, password } => {
            client.sign_in(email, password).await?;
            Ok(AuthResponse::SignedIn)
        }
        AuthRequest::SignUp {
            email,
            password,
            profile,
        } => client
            .sign_up(email, password, profile)
            .await
            .map(AuthResponse::SignedUp),
    }
}

/// Submit the form once: validate, call the auth service, apply the reply,
/// and navigate on success.
///
/// Returns the route navigated to. A submission made while another is in
/// flight makes no call.
pub async fn submit_auth_form<A, N>(
    form: &RefCell<EmployerAuthForm>,
    client: &A,
    navigator: &N,
) -> Option<Route>
where
    A: AuthClient,
    N: Navigator,
{
    let pending = form.borrow_mut().begin_submit()?;
    let result = perform(client, &pending.request).await;
    let target = form.borrow_mut().finish_submit(pending.attempt, result)?;
    navigator.replace(&Redirect::to(target.clone()));
    Some(target)
}
