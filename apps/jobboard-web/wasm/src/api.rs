//! Fetch client for the listing service

use js_sys::Reflect;
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

use jobboard_core::{jobs_href, SubmissionClient, SubmitError};
use jobboard_types::{ListingDetail, ListingRecord, NewListing};

use crate::js_auth::js_error_message;

/// Outcome of a GET that may legitimately find nothing
pub enum Fetched<T> {
    Found(T),
    NotFound,
}

#[derive(Debug, Clone)]
pub struct ListingApi {
    base: String,
}

impl ListingApi {
    pub fn new(base: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn send(&self, request: &Request) -> Result<Response, JsValue> {
        let window = web_sys::window().ok_or("No window")?;
        let response = JsFuture::from(window.fetch_with_request(request)).await?;
        response.dyn_into()
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<Fetched<T>, JsValue> {
        let opts = RequestInit::new();
        opts.set_method("GET");
        opts.set_mode(RequestMode::Cors);
        let request = Request::new_with_str_and_init(&self.url(path), &opts)?;

        let response = self.send(&request).await?;
        if response.status() == 404 {
            return Ok(Fetched::NotFound);
        }
        if !response.ok() {
            return Err(JsValue::from_str(&format!(
                "Request failed: {}",
                response.status()
            )));
        }

        let json = JsFuture::from(response.json()?).await?;
        serde_wasm_bindgen::from_value(json)
            .map(Fetched::Found)
            .map_err(|e| JsValue::from_str(&format!("Invalid response: {}", e)))
    }

    /// Active listings, newest first, optionally restricted to role categories
    pub async fn jobs(&self, roles: &[String]) -> Result<Vec<ListingRecord>, JsValue> {
        let path = format!("/api{}", jobs_href(roles));
        match self.get_json(&path).await? {
            Fetched::Found(records) => Ok(records),
            Fetched::NotFound => Ok(Vec::new()),
        }
    }

    pub async fn latest(&self) -> Result<Vec<ListingRecord>, JsValue> {
        match self.get_json("/api/jobs/latest").await? {
            Fetched::Found(records) => Ok(records),
            Fetched::NotFound => Ok(Vec::new()),
        }
    }

    pub async fn detail(&self, id: &str) -> Result<Option<ListingDetail>, JsValue> {
        let path = format!(
            "/api/jobs/{}",
            String::from(js_sys::encode_uri_component(id))
        );
        match self.get_json(&path).await? {
            Fetched::Found(detail) => Ok(Some(detail)),
            Fetched::NotFound => Ok(None),
        }
    }
}

impl SubmissionClient for ListingApi {
    async fn submit(&self, listing: &NewListing) -> Result<String, SubmitError> {
        let network = |e: JsValue| SubmitError::Network(js_error_message(&e));

        let body =
            serde_json::to_string(listing).map_err(|e| SubmitError::Rejected(e.to_string()))?;
        let opts = RequestInit::new();
        opts.set_method("POST");
        opts.set_mode(RequestMode::Cors);
        opts.set_body(&JsValue::from_str(&body));

        let request =
            Request::new_with_str_and_init(&self.url("/api/jobs"), &opts).map_err(network)?;
        request
            .headers()
            .set("Content-Type", "application/json")
            .map_err(network)?;

        let response = self.send(&request).await.map_err(network)?;
        let json = JsFuture::from(response.json().map_err(network)?)
            .await
            .map_err(network)?;

        let field = |name: &str| {
            Reflect::get(&json, &name.into())
                .ok()
                .and_then(|v| v.as_string())
        };

        if !response.ok() {
            return Err(SubmitError::Rejected(
                field("error")
                    .unwrap_or_else(|| format!("Submission failed: {}", response.status())),
            ));
        }
        field("id").ok_or_else(|| SubmitError::Rejected("Missing listing id".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let api = ListingApi::new("https://jobs.example.com/");
        assert_eq!(api.url("/api/jobs"), "https://jobs.example.com/api/jobs");
        assert_eq!(ListingApi::new("").url("/api/jobs"), "/api/jobs");
    }
}
