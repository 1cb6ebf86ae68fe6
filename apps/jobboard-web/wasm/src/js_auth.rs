//! Adapters between the page's JavaScript objects and the core seams
//!
//! The page shell hands over its hosted auth client as a plain object:
//!
//! ```javascript
//! const authClient = {
//!   getSession: async () => ({ userId, email, emailConfirmed }) /* or null */,
//!   signIn: async (email, password) => {},
//!   signUp: async (email, password, metadata) => ({ userId }),
//!   signOut: async () => {},
//!   resendConfirmation: async (email) => {},
//!   onAuthStateChange: (callback) => ({ unsubscribe() {} }),
//! };
//! ```
//!
//! Failures are reported by rejecting (or throwing) with an `Error`.

use js_sys::{Array, Function, Promise, Reflect};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use jobboard_core::{
    AuthClient, AuthError, EmployerProfile, Navigator, ProfileFields, Redirect, SessionSnapshot,
    SignUpOutcome, Subscription,
};

/// Session shape returned by `getSession()`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsSession {
    pub user_id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub email_confirmed: bool,
}

impl From<JsSession> for SessionSnapshot {
    fn from(s: JsSession) -> Self {
        SessionSnapshot {
            user_id: s.user_id,
            email: s.email,
            email_confirmed: s.email_confirmed,
        }
    }
}

/// Result shape of `signUp()`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsSignUp {
    #[serde(default)]
    user_id: Option<String>,
}

/// User metadata sent with `signUp()`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpMetadata {
    pub first_name: String,
    pub last_name: String,
    pub company_name: String,
    pub job_title: String,
    pub jobs_open: String,
}

impl From<&EmployerProfile> for SignUpMetadata {
    fn from(p: &EmployerProfile) -> Self {
        Self {
            first_name: p.first_name.clone(),
            last_name: p.last_name.clone(),
            company_name: p.company.clone(),
            job_title: p.job_title.clone(),
            jobs_open: p.open_positions.label().to_string(),
        }
    }
}

/// Profile inputs as the page sends them
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileInput {
    pub first_name: String,
    pub last_name: String,
    pub company_name: String,
    pub job_title: String,
    pub jobs_open: String,
}

impl From<ProfileInput> for ProfileFields {
    fn from(p: ProfileInput) -> Self {
        ProfileFields {
            first_name: p.first_name,
            last_name: p.last_name,
            company: p.company_name,
            job_title: p.job_title,
            open_positions: p.jobs_open,
        }
    }
}

/// Best-effort message from a thrown value
pub fn js_error_message(err: &JsValue) -> String {
    Reflect::get(err, &"message".into())
        .ok()
        .and_then(|m| m.as_string())
        .or_else(|| err.as_string())
        .unwrap_or_else(|| "Unknown error".to_string())
}

/// The page's hosted auth client
#[derive(Debug, Clone)]
pub struct JsAuthClient {
    inner: JsValue,
}

impl JsAuthClient {
    pub fn new(inner: JsValue) -> Self {
        Self { inner }
    }

    fn method(&self, name: &str) -> Result<Function, AuthError> {
        Reflect::get(&self.inner, &name.into())
            .ok()
            .and_then(|f| f.dyn_into::<Function>().ok())
            .ok_or_else(|| AuthError::Protocol(format!("auth client has no {}()", name)))
    }

    async fn call(&self, name: &str, args: &Array) -> Result<JsValue, AuthError> {
        let f = self.method(name)?;
        let returned = f
            .apply(&self.inner, args)
            .map_err(|e| AuthError::Rejected(js_error_message(&e)))?;
        JsFuture::from(Promise::resolve(&returned))
            .await
            .map_err(|e| AuthError::Rejected(js_error_message(&e)))
    }

    /// Register `callback` for sign-in, sign-out and token refresh events
    pub fn on_auth_state_change(
        &self,
        callback: &Closure<dyn FnMut()>,
    ) -> Result<Subscription, AuthError> {
        let f = self.method("onAuthStateChange")?;
        let handle = f
            .call1(&self.inner, callback.as_ref().unchecked_ref())
            .map_err(|e| AuthError::Rejected(js_error_message(&e)))?;

        Ok(Subscription::new(move || {
            let unsubscribe = Reflect::get(&handle, &"unsubscribe".into())
                .ok()
                .and_then(|f| f.dyn_into::<Function>().ok());
            match unsubscribe {
                Some(f) => {
                    if let Err(e) = f.call0(&handle) {
                        web_sys::console::warn_1(
                            &format!("unsubscribe failed: {}", js_error_message(&e)).into(),
                        );
                    }
                }
                None => web_sys::console::warn_1(&"auth subscription has no unsubscribe()".into()),
            }
        }))
    }
}

impl AuthClient for JsAuthClient {
    async fn get_session(&self) -> Result<Option<SessionSnapshot>, AuthError> {
        let value = self.call("getSession", &Array::new()).await?;
        if value.is_null() || value.is_undefined() {
            return Ok(None);
        }
        let session: JsSession = serde_wasm_bindgen::from_value(value)
            .map_err(|e| AuthError::Protocol(e.to_string()))?;
        Ok(Some(session.into()))
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<(), AuthError> {
        self.call("signIn", &Array::of2(&email.into(), &password.into()))
            .await
            .map(|_| ())
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        profile: &EmployerProfile,
    ) -> Result<SignUpOutcome, AuthError> {
        let metadata = serde_wasm_bindgen::to_value(&SignUpMetadata::from(profile))
            .map_err(|e| AuthError::Protocol(e.to_string()))?;
        let value = self
            .call("signUp", &Array::of3(&email.into(), &password.into(), &metadata))
            .await?;
        if value.is_null() || value.is_undefined() {
            return Ok(SignUpOutcome::default());
        }
        let reply: JsSignUp = serde_wasm_bindgen::from_value(value)
            .map_err(|e| AuthError::Protocol(e.to_string()))?;
        Ok(SignUpOutcome {
            user_id: reply.user_id.filter(|id| !id.is_empty()),
        })
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.call("signOut", &Array::new()).await.map(|_| ())
    }

    async fn resend_confirmation(&self, email: &str) -> Result<(), AuthError> {
        self.call("resendConfirmation", &Array::of1(&email.into()))
            .await
            .map(|_| ())
    }
}

/// Navigates with `window.location.replace`
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn replace(&self, redirect: &Redirect) {
        let url = redirect.to_url();
        let result = web_sys::window()
            .ok_or_else(|| JsValue::from_str("No window"))
            .and_then(|w| w.location().replace(&url));
        if let Err(e) = result {
            web_sys::console::error_1(
                &format!("Navigation to {} failed: {}", url, js_error_message(&e)).into(),
            );
        }
    }
}
