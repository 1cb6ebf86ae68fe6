//! Welcome page: "check your inbox" prompt with a resend button

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Promise;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

use jobboard_core::{load_confirmation, resend_confirmation, ConfirmationPrompt};

use crate::js_auth::JsAuthClient;

#[wasm_bindgen]
pub struct ConfirmationSession {
    prompt: Rc<RefCell<ConfirmationPrompt>>,
    client: JsAuthClient,
}

#[wasm_bindgen]
impl ConfirmationSession {
    #[wasm_bindgen(constructor)]
    pub fn new(auth_client: JsValue) -> ConfirmationSession {
        Self {
            prompt: Rc::new(RefCell::new(ConfirmationPrompt::default())),
            client: JsAuthClient::new(auth_client),
        }
    }

    /// Read the signed-in address from the current session. Resend does
    /// nothing until this resolves.
    pub fn load(&self) -> Promise {
        let prompt = Rc::clone(&self.prompt);
        let client = self.client.clone();
        future_to_promise(async move {
            let email = load_confirmation(&prompt, &client).await;
            Ok(email.map(JsValue::from).unwrap_or(JsValue::NULL))
        })
    }

    /// Resend the confirmation email. Resolves once the message is updated.
    pub fn resend(&self) -> Promise {
        let prompt = Rc::clone(&self.prompt);
        let client = self.client.clone();
        future_to_promise(async move {
            resend_confirmation(&prompt, &client).await;
            Ok(JsValue::UNDEFINED)
        })
    }

    #[wasm_bindgen(getter)]
    pub fn email(&self) -> Option<String> {
        self.prompt.borrow().email().map(str::to_string)
    }

    #[wasm_bindgen(getter)]
    pub fn message(&self) -> Option<String> {
        self.prompt.borrow().message().map(str::to_string)
    }

    #[wasm_bindgen(getter, js_name = isLoading)]
    pub fn is_loading(&self) -> bool {
        self.prompt.borrow().is_loading()
    }

    #[wasm_bindgen(getter, js_name = isSending)]
    pub fn is_sending(&self) -> bool {
        self.prompt.borrow().is_sending()
    }
}
