//! JavaScript implementations of the dashboard collaborators and the
//! listing service

use crate::{from_js, to_js};
use js_sys::{Function, Promise};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use widget_wizard_core::{Navigator, WidgetRegistry};
use widget_wizard_data::{FetchError, ListFilter, ListingPage, ListingService, PageQuery};
use widget_wizard_shared::{ChartSettings, WidgetDescriptor};

/// Call a host callback with one serialized argument. Callbacks cannot fail
/// the wizard; errors are logged.
fn invoke<T: Serialize>(callback: &Function, name: &str, value: &T) {
    let arg = match to_js(value) {
        Ok(arg) => arg,
        Err(err) => {
            log::error!("Failed to serialize {name} argument: {err:?}");
            return;
        }
    };
    if let Err(err) = callback.call1(&JsValue::NULL, &arg) {
        log::error!("{name} callback threw: {err:?}");
    }
}

pub struct JsRegistry {
    pub add_widget: Function,
    pub add_widget_config: Function,
}

impl WidgetRegistry for JsRegistry {
    fn add_widget(&mut self, descriptor: WidgetDescriptor) {
        invoke(&self.add_widget, "addWidget", &descriptor);
    }

    fn add_widget_config(&mut self, config: HashMap<String, ChartSettings>) {
        invoke(&self.add_widget_config, "addWidgetConfig", &config);
    }
}

pub struct JsNavigator {
    pub to_dashboard: Function,
}

impl Navigator for JsNavigator {
    fn to_dashboard(&mut self) {
        if let Err(err) = self.to_dashboard.call0(&JsValue::NULL) {
            log::error!("toDashboard callback threw: {err:?}");
        }
    }
}

/// Listing service backed by a JS function `(query, filter) => Promise<page>`
pub struct JsListingService {
    list: Function,
}

impl JsListingService {
    pub fn new(list: Function) -> Self {
        Self { list }
    }
}

fn fetch_error(value: JsValue) -> FetchError {
    FetchError::new(value.as_string().unwrap_or_else(|| format!("{value:?}")))
}

impl<T: DeserializeOwned> ListingService<T> for JsListingService {
    async fn list(&self, page: PageQuery, filter: &ListFilter) -> Result<ListingPage<T>, FetchError> {
        let query = to_js(&page).map_err(fetch_error)?;
        let filter = to_js(filter).map_err(fetch_error)?;

        let returned = self.list.call2(&JsValue::NULL, &query, &filter).map_err(fetch_error)?;
        let answer = JsFuture::from(Promise::resolve(&returned))
            .await
            .map_err(fetch_error)?;

        from_js(answer).map_err(fetch_error)
    }
}
