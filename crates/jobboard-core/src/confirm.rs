//! "Confirm your email" prompt on the employer welcome page

use std::cell::RefCell;

use tracing::{info, warn};

use crate::auth::{AuthClient, SessionSnapshot};
use crate::error::{error_message, AuthError};

pub const RESEND_SENT_MESSAGE: &str = "Confirmation email sent. Check your inbox (and spam).";
pub const MISSING_EMAIL_MESSAGE: &str = "Missing email — please log out and log back in.";

/// Prompt state. Starts loading; resend stays inert until the session
/// has been read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfirmationPrompt {
    loaded: bool,
    email: Option<String>,
    message: Option<String>,
    in_flight: bool,
}

fn session_email(session: Option<&SessionSnapshot>) -> Option<String> {
    session
        .and_then(|s| s.email.as_deref())
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty())
}

impl ConfirmationPrompt {
    /// Build from an already known session; the address is shown lower-cased
    pub fn from_session(session: Option<&SessionSnapshot>) -> Self {
        Self {
            loaded: true,
            email: session_email(session),
            ..Self::default()
        }
    }

    /// Apply the session read. Only the address changes on success; a
    /// resend already in flight and its message are left alone.
    pub fn apply_session(&mut self, result: Result<Option<SessionSnapshot>, AuthError>) {
        self.loaded = true;
        match result {
            Ok(session) => self.email = session_email(session.as_ref()),
            Err(e) => {
                warn!("Reading session for confirmation prompt failed: {}", e);
                self.email = None;
                self.message = Some(error_message(&e));
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        !self.loaded
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn is_sending(&self) -> bool {
        self.in_flight
    }

    /// Returns the address to resend to, or `None` if nothing should be sent
    pub fn begin_resend(&mut self) -> Option<String> {
        if self.in_flight || !self.loaded {
            return None;
        }
        let Some(email) = self.email.clone() else {
            self.message = Some(MISSING_EMAIL_MESSAGE.to_string());
            return None;
        };
        self.message = None;
        self.in_flight = true;
        Some(email)
    }

    pub fn finish_resend(&mut self, result: Result<(), AuthError>) {
        self.in_flight = false;
        self.message = Some(match result {
            Ok(()) => {
                info!("Confirmation email re-sent");
                RESEND_SENT_MESSAGE.to_string()
            }
            Err(e) => {
                warn!("Resending confirmation failed: {}", e);
                error_message(&e)
            }
        });
    }
}

/// Read the signed-in address into the prompt. Returns the address shown.
pub async fn load_confirmation<A: AuthClient>(
    prompt: &RefCell<ConfirmationPrompt>,
    client: &A,
) -> Option<String> {
    let result = client.get_session().await;
    let mut prompt = prompt.borrow_mut();
    prompt.apply_session(result);
    prompt.email().map(str::to_string)
}

/// Resend the confirmation email once; overlapping clicks make one call
pub async fn resend_confirmation<A: AuthClient>(prompt: &RefCell<ConfirmationPrompt>, client: &A) {
    let Some(email) = prompt.borrow_mut().begin_resend() else {
        return;
    };
    let result = client.resend_confirmation(&email).await;
    prompt.borrow_mut().finish_resend(result);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    use crate::auth::SignUpOutcome;
    use crate::validation::EmployerProfile;

    fn session(email: Option<&str>) -> SessionSnapshot {
        SessionSnapshot {
            user_id: "u1".to_string(),
            email: email.map(str::to_string),
            email_confirmed: false,
        }
    }

    #[test]
    fn test_email_is_lowercased() {
        let prompt = ConfirmationPrompt::from_session(Some(&session(Some("Owner@Diner.COM"))));
        assert_eq!(prompt.email(), Some("owner@diner.com"));
    }

    #[test]
    fn test_missing_email_message() {
        let mut prompt = ConfirmationPrompt::from_session(Some(&session(None)));
        assert_eq!(prompt.begin_resend(), None);
        assert_eq!(prompt.message(), Some(MISSING_EMAIL_MESSAGE));
    }

    #[test]
    fn test_resend_messages() {
        let mut prompt = ConfirmationPrompt::from_session(Some(&session(Some("a@b.com"))));
        assert_eq!(prompt.begin_resend().as_deref(), Some("a@b.com"));
        assert_eq!(prompt.begin_resend(), None);
        prompt.finish_resend(Ok(()));
        assert_eq!(prompt.message(), Some(RESEND_SENT_MESSAGE));

        prompt.begin_resend();
        prompt.finish_resend(Err(AuthError::Rejected("Rate limit exceeded".to_string())));
        assert_eq!(prompt.message(), Some("Error: Rate limit exceeded"));
        assert!(!prompt.is_sending());
    }

    #[test]
    fn test_resend_waits_for_session() {
        let mut prompt = ConfirmationPrompt::default();
        assert!(prompt.is_loading());
        assert_eq!(prompt.begin_resend(), None);
        assert_eq!(prompt.message(), None);

        prompt.apply_session(Ok(Some(session(Some("A@B.com")))));
        assert!(!prompt.is_loading());
        assert_eq!(prompt.begin_resend().as_deref(), Some("a@b.com"));
    }

    #[test]
    fn test_session_arriving_mid_resend_keeps_single_flight() {
        let mut prompt = ConfirmationPrompt::from_session(Some(&session(Some("a@b.com"))));
        assert_eq!(prompt.begin_resend().as_deref(), Some("a@b.com"));

        prompt.apply_session(Ok(Some(session(Some("a@b.com")))));
        assert!(prompt.is_sending());
        assert_eq!(prompt.begin_resend(), None);

        prompt.finish_resend(Ok(()));
        assert_eq!(prompt.message(), Some(RESEND_SENT_MESSAGE));
        prompt.apply_session(Ok(Some(session(Some("a@b.com")))));
        assert_eq!(prompt.message(), Some(RESEND_SENT_MESSAGE));
    }

    /// Counts resends and yields once so concurrent clicks overlap
    struct ResendCounter {
        session: Result<Option<SessionSnapshot>, AuthError>,
        resends: Cell<u32>,
    }

    impl ResendCounter {
        fn new(session: Result<Option<SessionSnapshot>, AuthError>) -> Self {
            Self {
                session,
                resends: Cell::new(0),
            }
        }
    }

    impl AuthClient for ResendCounter {
        async fn get_session(&self) -> Result<Option<SessionSnapshot>, AuthError> {
            tokio::task::yield_now().await;
            self.session.clone()
        }

        async fn sign_in(&self, _: &str, _: &str) -> Result<(), AuthError> {
            Ok(())
        }

        async fn sign_up(
            &self,
            _: &str,
            _: &str,
            _: &EmployerProfile,
        ) -> Result<SignUpOutcome, AuthError> {
            Ok(SignUpOutcome::default())
        }

        async fn sign_out(&self) -> Result<(), AuthError> {
            Ok(())
        }

        async fn resend_confirmation(&self, _: &str) -> Result<(), AuthError> {
            self.resends.set(self.resends.get() + 1);
            tokio::task::yield_now().await;
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_double_click_sends_once() {
        let prompt = RefCell::new(ConfirmationPrompt::from_session(Some(&session(Some(
            "a@b.com",
        )))));
        let client = ResendCounter::new(Ok(None));

        tokio::join!(
            resend_confirmation(&prompt, &client),
            resend_confirmation(&prompt, &client)
        );

        assert_eq!(client.resends.get(), 1);
        assert_eq!(prompt.borrow().message(), Some(RESEND_SENT_MESSAGE));
    }

    #[tokio::test]
    async fn test_click_before_load_sends_nothing() {
        let prompt = RefCell::new(ConfirmationPrompt::default());
        let client = ResendCounter::new(Ok(Some(session(Some("Owner@Diner.com")))));

        let (email, ()) = tokio::join!(
            load_confirmation(&prompt, &client),
            resend_confirmation(&prompt, &client)
        );

        assert_eq!(email.as_deref(), Some("owner@diner.com"));
        assert_eq!(client.resends.get(), 0);
        assert_eq!(prompt.borrow().message(), None);

        resend_confirmation(&prompt, &client).await;
        assert_eq!(client.resends.get(), 1);
    }

    #[tokio::test]
    async fn test_failed_session_read_is_shown() {
        let prompt = RefCell::new(ConfirmationPrompt::default());
        let client = ResendCounter::new(Err(AuthError::Network("offline".to_string())));

        assert_eq!(load_confirmation(&prompt, &client).await, None);
        assert_eq!(
            prompt.borrow().message(),
            Some("Error: Network error: offline")
        );
        assert!(!prompt.borrow().is_loading());
    }
}
