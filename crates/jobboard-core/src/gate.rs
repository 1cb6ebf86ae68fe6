//! Access gate for employer pages
//!
//! Computes one redirect decision whenever the visitor's session or the
//! current page changes. Unauthenticated visitors cannot reach restricted
//! pages, unconfirmed employers are held on the confirmation page, and
//! visitors who no longer need a transit page are moved on.
//!
//! ## Lifecycle
//! - `mount` stores the auth-change subscription and issues the first
//!   session check. Until a check completes the gate is `Pending` and the
//!   page renders neither protected content nor a redirect.
//! - Every auth event and page change issues a newer [`CheckTicket`]. Only
//!   the newest ticket's result is applied.
//! - After `unmount` results are discarded and the subscription is released.

use std::cell::RefCell;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::auth::{AuthClient, SessionSnapshot, Subscription};
use crate::error::AuthError;
use crate::route::{Location, Navigator, PageClass, Redirect, Route};

/// Authentication facts derived from a session snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessState {
    pub authenticated: bool,
    pub confirmed: bool,
}

impl AccessState {
    pub const ANONYMOUS: AccessState = AccessState {
        authenticated: false,
        confirmed: false,
    };

    /// Confirmed only ever holds for an authenticated visitor
    pub fn from_session(session: Option<&SessionSnapshot>) -> Self {
        match session {
            Some(s) => Self {
                authenticated: true,
                confirmed: s.email_confirmed,
            },
            None => Self::ANONYMOUS,
        }
    }
}

/// Outcome of evaluating the decision table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateDecision {
    Render,
    Redirect(Redirect),
}

/// Decision table, first match wins.
pub fn decide(location: &Location, access: AccessState) -> GateDecision {
    let page = location.route.class();

    match (page, access.authenticated, access.confirmed) {
        (PageClass::ConfirmTransit, false, _) => {
            GateDecision::Redirect(Redirect::to(Route::EmployerLogin))
        }
        (PageClass::Restricted, false, _) => GateDecision::Redirect(Redirect::with_return(
            Route::EmployerLogin,
            location.route.clone(),
        )),
        (PageClass::AuthTransit, true, false) => {
            GateDecision::Redirect(Redirect::to(Route::EmployerWelcome))
        }
        (PageClass::AuthTransit, true, true) => GateDecision::Redirect(Redirect::to(
            location.return_to.clone().unwrap_or(Route::Home),
        )),
        (PageClass::Public | PageClass::Restricted, true, false) => {
            GateDecision::Redirect(Redirect::to(Route::EmployerWelcome))
        }
        (PageClass::ConfirmTransit, true, true) => {
            GateDecision::Redirect(Redirect::to(Route::Home))
        }
        _ => GateDecision::Render,
    }
}

/// What the page shell should do right now
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateView {
    /// Session not known yet: render nothing gated
    Pending,
    Render,
    Redirect(Redirect),
}

/// Identifies one session check; only the newest is honoured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CheckTicket(u64);

/// Result of handing a finished session check to the gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Applied(GateView),
    /// A newer check was issued after this one
    Stale,
    /// The gate was unmounted while the check was in flight
    Unmounted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GateStatus {
    Unknown,
    Known(AccessState),
}

#[derive(Debug)]
pub struct AccessGate {
    location: Location,
    status: GateStatus,
    latest: u64,
    mounted: bool,
    subscription: Option<Subscription>,
}

impl AccessGate {
    pub fn new(location: Location) -> Self {
        Self {
            location,
            status: GateStatus::Unknown,
            latest: 0,
            mounted: false,
            subscription: None,
        }
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn access(&self) -> Option<AccessState> {
        match self.status {
            GateStatus::Known(access) => Some(access),
            GateStatus::Unknown => None,
        }
    }

    /// Start listening and issue the initial session check
    pub fn mount(&mut self, subscription: Subscription) -> CheckTicket {
        self.mounted = true;
        self.subscription = Some(subscription);
        self.status = GateStatus::Unknown;
        self.issue()
    }

    /// Stop listening; in-flight checks will be discarded
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        debug!("Access gate unmounted at {}", self.location.route);
        self.mounted = false;
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }

    /// Sign-in, sign-out or token refresh: re-read the session
    pub fn on_auth_event(&mut self) -> Option<CheckTicket> {
        self.mounted.then(|| self.issue())
    }

    /// The current page changed
    pub fn navigate(&mut self, location: Location) -> Option<CheckTicket> {
        if !self.mounted {
            return None;
        }
        self.location = location;
        self.status = GateStatus::Unknown;
        Some(self.issue())
    }

    /// Apply a finished session read.
    ///
    /// A failed read counts as "no session"; the page is never broken by it.
    pub fn complete_check(
        &mut self,
        ticket: CheckTicket,
        result: Result<Option<SessionSnapshot>, AuthError>,
    ) -> CheckOutcome {
        if !self.mounted {
            return CheckOutcome::Unmounted;
        }
        if ticket.0 != self.latest {
            debug!("Discarding stale session check {:?}", ticket);
            return CheckOutcome::Stale;
        }

        let session = match result {
            Ok(session) => session,
            Err(e) => {
                warn!("Session check failed, treating visitor as signed out: {}", e);
                None
            }
        };

        self.status = GateStatus::Known(AccessState::from_session(session.as_ref()));
        let view = self.view();
        if let GateView::Redirect(redirect) = &view {
            info!(
                "Access gate redirecting {} -> {}",
                self.location.route,
                redirect.to_url()
            );
        }
        CheckOutcome::Applied(view)
    }

    pub fn view(&self) -> GateView {
        match self.status {
            GateStatus::Unknown => GateView::Pending,
            GateStatus::Known(access) => match decide(&self.location, access) {
                GateDecision::Render => GateView::Render,
                GateDecision::Redirect(redirect) => GateView::Redirect(redirect),
            },
        }
    }

    fn issue(&mut self) -> CheckTicket {
        self.latest += 1;
        CheckTicket(self.latest)
    }
}

impl Drop for AccessGate {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// Run one session check and perform the resulting redirect.
///
/// No borrow of the gate is held across the session read, so auth events
/// arriving meanwhile can issue newer tickets.
pub async fn run_session_check<A, N>(
    gate: &RefCell<AccessGate>,
    ticket: CheckTicket,
    client: &A,
    navigator: &N,
) -> CheckOutcome
where
    A: AuthClient,
    N: Navigator,
{
    let result = client.get_session().await;
    let outcome = gate.borrow_mut().complete_check(ticket, result);
    if let CheckOutcome::Applied(GateView::Redirect(redirect)) = &outcome {
        navigator.replace(redirect);
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    use crate::auth::SignUpOutcome;
    use crate::validation::EmployerProfile;

    fn at(url: &str) -> Location {
        Location::parse(url).unwrap()
    }

    const SIGNED_OUT: AccessState = AccessState::ANONYMOUS;
    const UNCONFIRMED: AccessState = AccessState {
        authenticated: true,
        confirmed: false,
    };
    const CONFIRMED: AccessState = AccessState {
        authenticated: true,
        confirmed: true,
    };

    fn session(confirmed: bool) -> SessionSnapshot {
        SessionSnapshot {
            user_id: "user-1".to_string(),
            email: Some("Owner@Diner.com".to_string()),
            email_confirmed: confirmed,
        }
    }

    #[test]
    fn test_restricted_page_sends_anonymous_visitor_to_login_with_return() {
        assert_eq!(
            decide(&at("/post-job"), SIGNED_OUT),
            GateDecision::Redirect(Redirect::with_return(Route::EmployerLogin, Route::PostJob))
        );
    }

    #[test]
    fn test_confirmed_visitor_leaves_welcome_page() {
        assert_eq!(
            decide(&at("/employer-welcome"), CONFIRMED),
            GateDecision::Redirect(Redirect::to(Route::Home))
        );
    }

    #[test]
    fn test_unconfirmed_visitor_on_login_goes_to_welcome() {
        assert_eq!(
            decide(&at("/employer-login?next=%2Fpost-job"), UNCONFIRMED),
            GateDecision::Redirect(Redirect::to(Route::EmployerWelcome))
        );
    }

    #[test]
    fn test_confirmed_visitor_on_login_goes_to_return_target() {
        assert_eq!(
            decide(&at("/employer-login?next=%2Fpost-job"), CONFIRMED),
            GateDecision::Redirect(Redirect::to(Route::PostJob))
        );
        assert_eq!(
            decide(&at("/employer-login"), CONFIRMED),
            GateDecision::Redirect(Redirect::to(Route::Home))
        );
    }

    #[test]
    fn test_anonymous_visitor_on_welcome_goes_to_login() {
        assert_eq!(
            decide(&at("/employer-welcome"), SIGNED_OUT),
            GateDecision::Redirect(Redirect::to(Route::EmployerLogin))
        );
    }

    #[test]
    fn test_unconfirmed_visitor_is_held_on_welcome() {
        for url in ["/", "/jobs", "/jobs/abc", "/post-job", "/about"] {
            assert_eq!(
                decide(&at(url), UNCONFIRMED),
                GateDecision::Redirect(Redirect::to(Route::EmployerWelcome)),
                "{url}"
            );
        }
        assert_eq!(decide(&at("/employer-welcome"), UNCONFIRMED), GateDecision::Render);
    }

    #[test]
    fn test_pages_that_render() {
        for url in ["/", "/jobs", "/about", "/employer-login"] {
            assert_eq!(decide(&at(url), SIGNED_OUT), GateDecision::Render, "{url}");
        }
        for url in ["/", "/jobs", "/post-job"] {
            assert_eq!(decide(&at(url), CONFIRMED), GateDecision::Render, "{url}");
        }
    }

    #[test]
    fn test_access_state_from_session() {
        assert_eq!(AccessState::from_session(None), SIGNED_OUT);
        assert_eq!(AccessState::from_session(Some(&session(false))), UNCONFIRMED);
        assert_eq!(AccessState::from_session(Some(&session(true))), CONFIRMED);
    }

    #[test]
    fn test_gate_is_pending_until_first_check() {
        let mut gate = AccessGate::new(at("/post-job"));
        let ticket = gate.mount(Subscription::detached());
        assert_eq!(gate.view(), GateView::Pending);

        let outcome = gate.complete_check(ticket, Ok(Some(session(true))));
        assert_eq!(outcome, CheckOutcome::Applied(GateView::Render));
    }

    #[test]
    fn test_only_latest_check_is_applied() {
        let mut gate = AccessGate::new(at("/post-job"));
        let first = gate.mount(Subscription::detached());
        let second = gate.on_auth_event().unwrap();

        // Newer result arrives first: signed out
        let outcome = gate.complete_check(second, Ok(None));
        assert_eq!(
            outcome,
            CheckOutcome::Applied(GateView::Redirect(Redirect::with_return(
                Route::EmployerLogin,
                Route::PostJob
            )))
        );

        // Older result arrives late and must not override
        assert_eq!(
            gate.complete_check(first, Ok(Some(session(true)))),
            CheckOutcome::Stale
        );
        assert_eq!(gate.access(), Some(SIGNED_OUT));
    }

    #[test]
    fn test_failed_check_counts_as_signed_out() {
        let mut gate = AccessGate::new(at("/employer-welcome"));
        let ticket = gate.mount(Subscription::detached());
        let outcome = gate.complete_check(ticket, Err(AuthError::Network("offline".into())));
        assert_eq!(
            outcome,
            CheckOutcome::Applied(GateView::Redirect(Redirect::to(Route::EmployerLogin)))
        );
    }

    #[test]
    fn test_unmount_discards_results_and_releases_subscription() {
        let released = Rc::new(Cell::new(false));
        let flag = released.clone();

        let mut gate = AccessGate::new(at("/post-job"));
        let ticket = gate.mount(Subscription::new(move || flag.set(true)));
        gate.unmount();

        assert!(released.get());
        assert_eq!(gate.complete_check(ticket, Ok(None)), CheckOutcome::Unmounted);
        assert_eq!(gate.on_auth_event(), None);
        assert_eq!(gate.navigate(at("/")), None);
        assert_eq!(gate.view(), GateView::Pending);
    }

    #[test]
    fn test_dropping_gate_releases_subscription() {
        let released = Rc::new(Cell::new(false));
        let flag = released.clone();
        {
            let mut gate = AccessGate::new(at("/"));
            gate.mount(Subscription::new(move || flag.set(true)));
        }
        assert!(released.get());
    }

    #[test]
    fn test_navigation_rechecks_with_new_page() {
        let mut gate = AccessGate::new(at("/jobs"));
        let ticket = gate.mount(Subscription::detached());
        gate.complete_check(ticket, Ok(None));
        assert_eq!(gate.view(), GateView::Render);

        let ticket = gate.navigate(at("/post-job")).unwrap();
        assert_eq!(gate.view(), GateView::Pending);
        gate.complete_check(ticket, Ok(None));
        assert_eq!(
            gate.view(),
            GateView::Redirect(Redirect::with_return(Route::EmployerLogin, Route::PostJob))
        );
    }

    struct FakeAuth {
        session: RefCell<Option<SessionSnapshot>>,
        reads: Cell<u32>,
    }

    impl AuthClient for FakeAuth {
        async fn get_session(&self) -> Result<Option<SessionSnapshot>, AuthError> {
            self.reads.set(self.reads.get() + 1);
            Ok(self.session.borrow().clone())
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
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingNavigator {
        redirects: RefCell<Vec<String>>,
    }

    impl Navigator for RecordingNavigator {
        fn replace(&self, redirect: &Redirect) {
            self.redirects.borrow_mut().push(redirect.to_url());
        }
    }

    #[tokio::test]
    async fn test_session_check_driver_redirects_through_navigator() {
        let client = FakeAuth {
            session: RefCell::new(Some(session(false))),
            reads: Cell::new(0),
        };
        let navigator = RecordingNavigator::default();
        let gate = RefCell::new(AccessGate::new(at("/post-job")));

        let ticket = gate.borrow_mut().mount(Subscription::detached());
        run_session_check(&gate, ticket, &client, &navigator).await;
        assert_eq!(*navigator.redirects.borrow(), vec!["/employer-welcome"]);

        // Confirmation link clicked: token refresh event
        *client.session.borrow_mut() = Some(session(true));
        let ticket = gate.borrow_mut().navigate(at("/employer-welcome")).unwrap();
        run_session_check(&gate, ticket, &client, &navigator).await;
        assert_eq!(*navigator.redirects.borrow(), vec!["/employer-welcome", "/"]);
        assert_eq!(client.reads.get(), 2);
    }
}
