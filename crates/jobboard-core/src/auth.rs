//! Seams to the hosted authentication service
//!
//! The service owns credentials and sessions. The gate and the employer
//! forms only read session snapshots, listen for change notifications, and
//! call the imperative operations in response to explicit submissions.

use serde::{Deserialize, Serialize};

use crate::error::AuthError;
use crate::validation::EmployerProfile;

/// Point-in-time view of the visitor's session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub user_id: String,
    #[serde(default)]
    pub email: Option<String>,
    /// Email verification status of the signed-in user
    #[serde(default)]
    pub email_confirmed: bool,
}

/// Result of a successful sign-up call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignUpOutcome {
    /// Missing when the service created the account but returned no user
    pub user_id: Option<String>,
}

/// Operations of the hosted auth service.
///
/// Futures are not required to be `Send`; in the browser they run on the
/// single UI event loop.
#[allow(async_fn_in_trait)]
pub trait AuthClient {
    /// Current session, `None` when signed out
    async fn get_session(&self) -> Result<Option<SessionSnapshot>, AuthError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<(), AuthError>;

    /// Create an account. The profile travels as user metadata.
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        profile: &EmployerProfile,
    ) -> Result<SignUpOutcome, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;

    async fn resend_confirmation(&self, email: &str) -> Result<(), AuthError>;
}

/// Registration handle for auth-change notifications.
///
/// The release callback runs exactly once: on [`Subscription::unsubscribe`]
/// or when the handle is dropped.
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Handle with nothing to release
    pub fn detached() -> Self {
        Self { release: None }
    }

    pub fn unsubscribe(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_subscription_releases_once_on_drop() {
        let released = Rc::new(Cell::new(0));
        let counter = released.clone();
        let sub = Subscription::new(move || counter.set(counter.get() + 1));
        drop(sub);
        assert_eq!(released.get(), 1);
    }

    #[test]
    fn test_explicit_unsubscribe_does_not_release_twice() {
        let released = Rc::new(Cell::new(0));
        let counter = released.clone();
        let sub = Subscription::new(move || counter.set(counter.get() + 1));
        sub.unsubscribe();
        assert_eq!(released.get(), 1);
    }

    #[test]
    fn test_session_snapshot_defaults() {
        let snapshot: SessionSnapshot = serde_json::from_str(r#"{"user_id":"u1"}"#).unwrap();
        assert_eq!(snapshot.email, None);
        assert!(!snapshot.email_confirmed);
    }
}
