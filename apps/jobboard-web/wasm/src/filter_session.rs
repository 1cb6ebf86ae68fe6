//! Filter panel session for the jobs page and the home-page latest panel

use serde::Serialize;
use wasm_bindgen::prelude::*;

use jobboard_core::{parse_role_params, ListingFilter, LockedRoles};
use jobboard_types::ListingRecord;

use crate::api::ListingApi;

/// Card data for one visible listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingCard {
    pub id: String,
    pub title: String,
    pub restaurant_name: String,
    pub location: String,
    pub role_category: Option<String>,
    pub href: String,
}

impl From<&ListingRecord> for ListingCard {
    fn from(r: &ListingRecord) -> Self {
        ListingCard {
            id: r.id.clone(),
            title: r.title.clone(),
            restaurant_name: r.restaurant_name.clone(),
            location: r.location_label(),
            role_category: r.role_category.clone(),
            href: jobboard_core::Route::JobDetail(r.id.clone()).path(),
        }
    }
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Listing filter held in Rust memory; JavaScript only wires inputs
#[wasm_bindgen]
pub struct JobsFilterSession {
    engine: ListingFilter,
}

impl JobsFilterSession {
    /// Internal constructor (testable without JsValue)
    fn from_parts(records: Vec<ListingRecord>, query: &str) -> Self {
        let locked = LockedRoles::new(parse_role_params(query));
        Self {
            engine: ListingFilter::with_locked_roles(records, locked),
        }
    }

    fn cards(&self, limit: Option<usize>) -> Vec<ListingCard> {
        let visible = match limit {
            Some(n) => self.engine.latest(n),
            None => self.engine.results(),
        };
        visible.into_iter().map(ListingCard::from).collect()
    }
}

#[wasm_bindgen]
impl JobsFilterSession {
    /// Create a session from a listings array and the page query string
    /// (`?role=Line&role=Prep`)
    #[wasm_bindgen(constructor)]
    pub fn new(listings: JsValue, query: &str) -> Result<JobsFilterSession, JsValue> {
        let records: Vec<ListingRecord> = serde_wasm_bindgen::from_value(listings)
            .map_err(|e| JsValue::from_str(&format!("Invalid listings: {}", e)))?;
        Ok(Self::from_parts(records, query))
    }

    /// Fetch active listings for the page query and build a session
    #[wasm_bindgen(js_name = load)]
    pub async fn load(api_base: String, query: String) -> Result<JobsFilterSession, JsValue> {
        let roles = parse_role_params(&query);
        let records = ListingApi::new(&api_base).jobs(&roles).await?;
        web_sys::console::log_1(&format!("Loaded {} listings", records.len()).into());
        Ok(Self::from_parts(records, &query))
    }

    /// Fetch the newest listings for the home-page panel
    #[wasm_bindgen(js_name = loadLatest)]
    pub async fn load_latest(api_base: String) -> Result<JobsFilterSession, JsValue> {
        let records = ListingApi::new(&api_base).latest().await?;
        Ok(Self::from_parts(records, ""))
    }

    /// The page's query string changed (e.g. another role card was followed)
    #[wasm_bindgen(js_name = setQueryString)]
    pub fn set_query_string(&mut self, query: &str) {
        self.engine
            .replace_locked_roles(LockedRoles::new(parse_role_params(query)));
    }

    #[wasm_bindgen(js_name = setSearch)]
    pub fn set_search(&mut self, value: &str) {
        self.engine.set_query(value);
    }

    #[wasm_bindgen(js_name = setLocation)]
    pub fn set_location(&mut self, value: &str) {
        self.engine.set_location(value);
    }

    #[wasm_bindgen(js_name = setPosition)]
    pub fn set_position(&mut self, value: &str) {
        self.engine.set_position(value);
    }

    #[wasm_bindgen(js_name = setRoleCategory)]
    pub fn set_role_category(&mut self, value: &str) {
        self.engine.set_role_category(value);
    }

    #[wasm_bindgen(js_name = clearAll)]
    pub fn clear_all(&mut self) {
        self.engine.clear_all();
    }

    /// Current filter values `{query, location, position, role_category}`
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> Result<JsValue, JsValue> {
        to_js(self.engine.state())
    }

    /// Dropdown choices `{locations, positions, role_categories}`
    #[wasm_bindgen(js_name = getOptions)]
    pub fn get_options(&self) -> Result<JsValue, JsValue> {
        to_js(self.engine.options())
    }

    /// Visible listing cards in snapshot order
    #[wasm_bindgen(js_name = getResults)]
    pub fn get_results(&self) -> Result<JsValue, JsValue> {
        to_js(&self.cards(None))
    }

    /// First `limit` visible cards
    #[wasm_bindgen(js_name = getLatest)]
    pub fn get_latest(&self, limit: usize) -> Result<JsValue, JsValue> {
        to_js(&self.cards(Some(limit)))
    }

    #[wasm_bindgen(getter, js_name = resultCount)]
    pub fn result_count(&self) -> usize {
        self.engine.result_count()
    }

    #[wasm_bindgen(getter)]
    pub fn summary(&self) -> String {
        self.engine.summary()
    }

    #[wasm_bindgen(getter)]
    pub fn heading(&self) -> String {
        self.engine.heading()
    }

    #[wasm_bindgen(getter, js_name = lockedRolesLabel)]
    pub fn locked_roles_label(&self) -> Option<String> {
        self.engine.locked_roles_label()
    }

    #[wasm_bindgen(getter, js_name = rolePlaceholder)]
    pub fn role_placeholder(&self) -> String {
        self.engine.role_placeholder().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, role: Option<&str>) -> ListingRecord {
        ListingRecord {
            id: id.to_string(),
            title: "Cook".to_string(),
            restaurant_name: "Diner".to_string(),
            city: "Towson".to_string(),
            state: "MD".to_string(),
            created_at: "2025-02-01T10:00:00Z".parse().unwrap(),
            role_category: role.map(str::to_string),
        }
    }

    #[test]
    fn test_query_string_locks_roles() {
        let session = JobsFilterSession::from_parts(
            vec![record("1", Some("Line")), record("2", Some("Host")), record("3", None)],
            "?role=Line&role=Prep",
        );
        let ids: Vec<String> = session.cards(None).into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["1"]);
        assert_eq!(session.heading(), "LINE / PREP JOBS");
    }

    #[test]
    fn test_card_links_to_detail_page() {
        let card = ListingCard::from(&record("job 7", Some("Line")));
        assert_eq!(card.href, "/jobs/job%207");
        assert_eq!(card.location, "Towson, MD");
    }

    #[test]
    fn test_switching_query_string_relocks() {
        let mut session = JobsFilterSession::from_parts(
            vec![record("1", Some("Line")), record("2", Some("Host"))],
            "role=Line",
        );
        session.set_role_category("Line");
        session.set_query_string("role=Host");
        let ids: Vec<String> = session.cards(None).into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["2"]);
    }
}
