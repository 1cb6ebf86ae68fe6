//! Employer login / signup form session

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Promise;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

use jobboard_core::{
    error_message, submit_auth_form, AuthClient, AuthMode, EmployerAuthForm, Location,
    ProfileFields, Route,
};

use crate::js_auth::{BrowserNavigator, JsAuthClient, ProfileInput};

fn parse_mode(mode: &str) -> Result<AuthMode, String> {
    match mode {
        "login" => Ok(AuthMode::Login),
        "signup" => Ok(AuthMode::Signup),
        other => Err(format!("Unknown mode: {}", other)),
    }
}

fn mode_name(mode: AuthMode) -> &'static str {
    match mode {
        AuthMode::Login => "login",
        AuthMode::Signup => "signup",
    }
}

#[wasm_bindgen]
pub struct EmployerAuthSession {
    form: Rc<RefCell<EmployerAuthForm>>,
    client: JsAuthClient,
}

#[wasm_bindgen]
impl EmployerAuthSession {
    /// `url` is the login page path plus query; `next` becomes the return target
    #[wasm_bindgen(constructor)]
    pub fn new(auth_client: JsValue, url: &str) -> EmployerAuthSession {
        let return_to = Location::parse(url).and_then(|l| l.return_to);
        Self {
            form: Rc::new(RefCell::new(EmployerAuthForm::new(return_to))),
            client: JsAuthClient::new(auth_client),
        }
    }

    /// "login" or "signup"
    #[wasm_bindgen(js_name = setMode)]
    pub fn set_mode(&mut self, mode: &str) -> Result<(), JsValue> {
        let mode = parse_mode(mode).map_err(|e| JsValue::from_str(&e))?;
        self.form.borrow_mut().switch_mode(mode);
        Ok(())
    }

    #[wasm_bindgen(js_name = setEmail)]
    pub fn set_email(&mut self, email: &str) {
        self.form.borrow_mut().set_email(email);
    }

    #[wasm_bindgen(js_name = setPassword)]
    pub fn set_password(&mut self, password: &str) {
        self.form.borrow_mut().set_password(password);
    }

    /// `{firstName, lastName, companyName, jobTitle, jobsOpen}`
    #[wasm_bindgen(js_name = setProfile)]
    pub fn set_profile(&mut self, profile: JsValue) -> Result<(), JsValue> {
        let input: ProfileInput = serde_wasm_bindgen::from_value(profile)
            .map_err(|e| JsValue::from_str(&format!("Invalid profile: {}", e)))?;
        self.form.borrow_mut().set_profile(ProfileFields::from(input));
        Ok(())
    }

    /// Signup step 1 -> 2; returns false and sets the message on bad input
    #[wasm_bindgen(js_name = continueFromEmail)]
    pub fn continue_from_email(&mut self) -> bool {
        self.form.borrow_mut().continue_from_email().is_ok()
    }

    /// Signup step 2 -> 3
    #[wasm_bindgen(js_name = continueFromPassword)]
    pub fn continue_from_password(&mut self) -> bool {
        self.form.borrow_mut().continue_from_password().is_ok()
    }

    pub fn back(&mut self) {
        self.form.borrow_mut().back();
    }

    /// Submit the current step. Resolves to the path navigated to, or null.
    ///
    /// Calls made while a previous submission is pending resolve to null
    /// without contacting the auth service.
    pub fn submit(&self) -> Promise {
        let form = Rc::clone(&self.form);
        let client = self.client.clone();
        future_to_promise(async move {
            let target = submit_auth_form(&form, &client, &BrowserNavigator).await;
            Ok(target
                .map(|route: Route| JsValue::from_str(&route.path()))
                .unwrap_or(JsValue::NULL))
        })
    }

    /// Stop applying results; call when the page goes away
    pub fn detach(&mut self) {
        self.form.borrow_mut().detach();
    }

    #[wasm_bindgen(getter)]
    pub fn mode(&self) -> String {
        mode_name(self.form.borrow().mode()).to_string()
    }

    /// 1, 2 or 3
    #[wasm_bindgen(getter)]
    pub fn step(&self) -> u8 {
        self.form.borrow().step().number()
    }

    #[wasm_bindgen(getter)]
    pub fn email(&self) -> String {
        self.form.borrow().email().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn message(&self) -> Option<String> {
        self.form.borrow().message().map(str::to_string)
    }

    #[wasm_bindgen(getter, js_name = isSubmitting)]
    pub fn is_submitting(&self) -> bool {
        self.form.borrow().is_submitting()
    }
}

/// Sign the employer out. Resolves to an error message, or null on success.
///
/// The access gate reacts through the auth-change notification.
#[wasm_bindgen(js_name = signOut)]
pub fn sign_out(auth_client: JsValue) -> Promise {
    let client = JsAuthClient::new(auth_client);
    future_to_promise(async move {
        Ok(match client.sign_out().await {
            Ok(()) => JsValue::NULL,
            Err(e) => JsValue::from_str(&error_message(&e)),
        })
    })
}
