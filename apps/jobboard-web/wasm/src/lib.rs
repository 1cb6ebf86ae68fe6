//! WASM bindings for the restaurant job board
//!
//! All page state lives in Rust sessions; JavaScript only renders and
//! forwards DOM events.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { AccessGateSession, JobsFilterSession } from './pkg/jobboard_wasm.js';
//!
//! await init();
//!
//! const gate = new AccessGateSession(authClient, location.pathname + location.search);
//! gate.mount();
//!
//! const jobs = await JobsFilterSession.load(API_BASE, location.search);
//! jobs.setSearch("line");
//! render(jobs.getResults(), jobs.summary);
//! ```

pub mod api;
pub mod auth_form_session;
pub mod confirm_session;
pub mod filter_session;
pub mod gate_session;
pub mod js_auth;
pub mod post_job_session;

use serde::Serialize;
use wasm_bindgen::prelude::*;

use jobboard_core::{posted_label, resolve_detail, top_role_href, DetailView};
use jobboard_types::{ListingDetail, TOP_ROLES};

pub use auth_form_session::EmployerAuthSession;
pub use confirm_session::ConfirmationSession;
pub use filter_session::JobsFilterSession;
pub use gate_session::AccessGateSession;
pub use post_job_session::PostJobSession;

/// Initialize the WASM module
/// Called automatically by wasm-bindgen
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Get the library version
#[wasm_bindgen]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Jobs-page link locked to the given role categories
#[wasm_bindgen(js_name = jobsHref)]
pub fn jobs_href(roles: JsValue) -> Result<String, JsValue> {
    let roles: Vec<String> = serde_wasm_bindgen::from_value(roles)
        .map_err(|e| JsValue::from_str(&format!("Invalid roles: {}", e)))?;
    Ok(jobboard_core::jobs_href(&roles))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
struct TopRoleCard {
    title: &'static str,
    image_src: &'static str,
    href: String,
}

fn top_role_cards() -> Vec<TopRoleCard> {
    TOP_ROLES
        .iter()
        .map(|card| TopRoleCard {
            title: card.title,
            image_src: card.image_src,
            href: top_role_href(card),
        })
        .collect()
}

/// Home-page role cards `[{title, imageSrc, href}]`
#[wasm_bindgen(js_name = topRoles)]
pub fn top_roles() -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&top_role_cards())
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
struct DetailPage {
    found: bool,
    heading: String,
    posted: Option<String>,
    location: Option<String>,
    listing: Option<ListingDetail>,
}

impl From<DetailView> for DetailPage {
    fn from(view: DetailView) -> Self {
        let heading = view.heading().to_string();
        match view {
            DetailView::Found(detail) => DetailPage {
                found: true,
                heading,
                posted: Some(posted_label(&detail.record.created_at)),
                location: Some(jobboard_core::location_label(
                    &detail.record.city,
                    &detail.record.state,
                ))
                .filter(|l| !l.is_empty()),
                listing: Some(*detail),
            },
            DetailView::NotFound => DetailPage {
                found: false,
                heading,
                posted: None,
                location: None,
                listing: None,
            },
        }
    }
}

/// Load the detail page for `id`.
///
/// Resolves to `{found, heading, posted, location, listing}`; anything that
/// prevents showing an active listing resolves with `found: false`.
#[wasm_bindgen(js_name = loadJobDetail)]
pub async fn load_job_detail(api_base: String, id: String) -> Result<JsValue, JsValue> {
    let fetched = if id.trim().is_empty() {
        Ok(None)
    } else {
        api::ListingApi::new(&api_base).detail(&id).await
    };
    let fetched = fetched.map_err(|e| js_auth::js_error_message(&e));
    let page = DetailPage::from(resolve_detail(Some(id.as_str()), fetched));
    serde_wasm_bindgen::to_value(&page)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}
