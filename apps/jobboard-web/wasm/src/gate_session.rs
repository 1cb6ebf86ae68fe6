//! Access gate session wrapping every employer-aware page
//!
//! ```javascript
//! const gate = new AccessGateSession(authClient, location.pathname + location.search);
//! gate.mount();
//! // render only when gate.view().status === "render"
//! gate.unmount();
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use jobboard_core::{run_session_check, AccessGate, CheckTicket, GateView, Location, Route};

use crate::js_auth::{BrowserNavigator, JsAuthClient};

/// `view()` result handed to the page shell
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GateViewJs {
    /// "pending", "render" or "redirect"
    pub status: &'static str,
    pub target: Option<String>,
}

impl From<&GateView> for GateViewJs {
    fn from(view: &GateView) -> Self {
        match view {
            GateView::Pending => GateViewJs {
                status: "pending",
                target: None,
            },
            GateView::Render => GateViewJs {
                status: "render",
                target: None,
            },
            GateView::Redirect(redirect) => GateViewJs {
                status: "redirect",
                target: Some(redirect.to_url()),
            },
        }
    }
}

fn location_or_home(url: &str) -> Location {
    Location::parse(url).unwrap_or_else(|| Location::new(Route::Home))
}

fn spawn_check(gate: Rc<RefCell<AccessGate>>, client: JsAuthClient, ticket: CheckTicket) {
    spawn_local(async move {
        run_session_check(&gate, ticket, &client, &BrowserNavigator).await;
    });
}

#[wasm_bindgen]
pub struct AccessGateSession {
    gate: Rc<RefCell<AccessGate>>,
    client: JsAuthClient,
    listener: Option<Closure<dyn FnMut()>>,
}

#[wasm_bindgen]
impl AccessGateSession {
    /// `url` is the current path plus query string. Unknown paths are
    /// treated as public.
    #[wasm_bindgen(constructor)]
    pub fn new(auth_client: JsValue, url: &str) -> AccessGateSession {
        Self {
            gate: Rc::new(RefCell::new(AccessGate::new(location_or_home(url)))),
            client: JsAuthClient::new(auth_client),
            listener: None,
        }
    }

    /// Subscribe to auth changes and run the first session check
    pub fn mount(&mut self) -> Result<(), JsValue> {
        if self.gate.borrow().is_mounted() {
            return Ok(());
        }

        let gate = Rc::clone(&self.gate);
        let client = self.client.clone();
        let listener = Closure::wrap(Box::new(move || {
            let ticket = gate.borrow_mut().on_auth_event();
            if let Some(ticket) = ticket {
                spawn_check(Rc::clone(&gate), client.clone(), ticket);
            }
        }) as Box<dyn FnMut()>);

        let subscription = self
            .client
            .on_auth_state_change(&listener)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.listener = Some(listener);

        let ticket = self.gate.borrow_mut().mount(subscription);
        spawn_check(Rc::clone(&self.gate), self.client.clone(), ticket);
        Ok(())
    }

    /// The page changed without a full reload
    pub fn navigate(&mut self, url: &str) {
        let ticket = self.gate.borrow_mut().navigate(location_or_home(url));
        if let Some(ticket) = ticket {
            spawn_check(Rc::clone(&self.gate), self.client.clone(), ticket);
        }
    }

    /// Release the subscription; checks still in flight are ignored
    pub fn unmount(&mut self) {
        self.gate.borrow_mut().unmount();
        self.listener = None;
        web_sys::console::log_1(&"Access gate unmounted".into());
    }

    /// `{status, target}` for the current state
    pub fn view(&self) -> Result<JsValue, JsValue> {
        let view = GateViewJs::from(&self.gate.borrow().view());
        serde_wasm_bindgen::to_value(&view)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    #[wasm_bindgen(getter, js_name = isMounted)]
    pub fn is_mounted(&self) -> bool {
        self.gate.borrow().is_mounted()
    }
}

impl Drop for AccessGateSession {
    fn drop(&mut self) {
        self.gate.borrow_mut().unmount();
    }
}
