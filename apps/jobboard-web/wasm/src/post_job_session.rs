//! Post-a-job form session

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Promise;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

use jobboard_core::{submit_job, JobSubmissionFields, JobSubmissionForm};
use jobboard_types::{EmploymentType, RoleCategory};

use crate::api::ListingApi;

/// Fixed dropdown choices for the form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormChoices {
    pub role_categories: Vec<&'static str>,
    pub employment_types: Vec<&'static str>,
}

impl FormChoices {
    pub fn current() -> Self {
        Self {
            role_categories: RoleCategory::ALL.iter().map(|c| c.as_str()).collect(),
            employment_types: EmploymentType::ALL.iter().map(|t| t.as_str()).collect(),
        }
    }
}

#[wasm_bindgen]
pub struct PostJobSession {
    form: Rc<RefCell<JobSubmissionForm>>,
    api: ListingApi,
}

#[wasm_bindgen]
impl PostJobSession {
    #[wasm_bindgen(constructor)]
    pub fn new(api_base: &str) -> PostJobSession {
        Self {
            form: Rc::new(RefCell::new(JobSubmissionForm::new())),
            api: ListingApi::new(api_base),
        }
    }

    /// Replace all inputs; keys are the snake_case listing field names
    #[wasm_bindgen(js_name = setFields)]
    pub fn set_fields(&mut self, fields: JsValue) -> Result<(), JsValue> {
        let fields: JobSubmissionFields = serde_wasm_bindgen::from_value(fields)
            .map_err(|e| JsValue::from_str(&format!("Invalid fields: {}", e)))?;
        self.form.borrow_mut().set_fields(fields);
        Ok(())
    }

    #[wasm_bindgen(js_name = getFields)]
    pub fn get_fields(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.form.borrow().fields())
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    #[wasm_bindgen(js_name = getChoices)]
    pub fn get_choices(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&FormChoices::current())
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    /// Validate and send. Resolves to the new listing id, or null when
    /// nothing was stored (see `message`).
    pub fn submit(&self) -> Promise {
        let form = Rc::clone(&self.form);
        let api = self.api.clone();
        future_to_promise(async move {
            let id = submit_job(&form, &api).await;
            Ok(id.map(|id| JsValue::from_str(&id)).unwrap_or(JsValue::NULL))
        })
    }

    /// Call when the page unmounts; a pending reply is then ignored
    pub fn detach(&mut self) {
        self.form.borrow_mut().detach();
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
