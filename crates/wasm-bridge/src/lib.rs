//! WASM bridge for the widget wizard
//! Exposes a wizard session to the dashboard's JavaScript host.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::RefCell;
use std::ops::Add;
use std::rc::Rc;
use std::time::Duration;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use widget_wizard_config::{ConfigFormat, ConfigParser, ConfigValidator, WizardConfig};
use widget_wizard_core::{
    AttributeStep, DevicePicker, RemotePicker, TemplatePicker, WizardAction, WizardSession,
};
use widget_wizard_data::{FetchOutcome, FetchTicket, ListingPage, ListingService};
use widget_wizard_shared::{
    AttributeId, AttributeOwner, ChartType, Device, ErrorResponse, Template, WizardError,
    WizardResult, WizardState, WizardStep,
};

pub mod host;

use host::{JsListingService, JsNavigator, JsRegistry};

/// Milliseconds on the host clock, e.g. `performance.now()`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Millis(u64);

impl Millis {
    pub fn from_js(now: f64) -> Self {
        Self(now.max(0.0) as u64)
    }
}

impl Add<Duration> for Millis {
    type Output = Millis;

    fn add(self, delay: Duration) -> Millis {
        Millis(self.0.saturating_add(delay.as_millis() as u64))
    }
}

pub(crate) fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

pub(crate) fn from_js<T: DeserializeOwned>(value: JsValue) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn js_error(err: WizardError) -> JsValue {
    JsValue::from_str(&ErrorResponse::new(err).to_json())
}

fn serialization_error(err: JsValue) -> JsValue {
    js_error(WizardError::Serialization {
        message: err.as_string().unwrap_or_else(|| format!("{err:?}")),
    })
}

fn outcome_name(outcome: FetchOutcome) -> &'static str {
    match outcome {
        FetchOutcome::Applied => "applied",
        FetchOutcome::Failed => "failed",
        FetchOutcome::Stale => "stale",
    }
}

/// Which remote picker a call targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PickerKind {
    Devices,
    Templates,
}

impl PickerKind {
    fn parse(kind: &str) -> WizardResult<Self> {
        match kind {
            "devices" => Ok(PickerKind::Devices),
            "templates" => Ok(PickerKind::Templates),
            other => Err(WizardError::InvalidAction {
                action: format!("unknown picker {other:?}"),
            }),
        }
    }
}

/// The two remote pickers. Shared with in-flight refreshes, which borrow it
/// only before and after awaiting the host.
struct Pickers {
    devices: DevicePicker,
    templates: TemplatePicker,
}

impl Pickers {
    fn from_state(state: &WizardState, page_size: usize) -> Self {
        Self {
            devices: DevicePicker::new(page_size).with_selected(state.devices.clone()),
            templates: TemplatePicker::new(page_size).with_selected(state.templates.clone()),
        }
    }
}

/// Run the same expression against whichever picker `kind` names
macro_rules! with_picker {
    ($pickers:expr, $kind:expr, |$picker:ident| $body:expr) => {{
        let mut pickers = $pickers.borrow_mut();
        match PickerKind::parse($kind).map_err(js_error)? {
            PickerKind::Devices => {
                let $picker = &mut pickers.devices;
                $body
            }
            PickerKind::Templates => {
                let $picker = &mut pickers.templates;
                $body
            }
        }
    }};
}

async fn refresh_picker<T>(
    pickers: &RefCell<Pickers>,
    select: fn(&mut Pickers) -> &mut RemotePicker<T>,
    service: &JsListingService,
) -> FetchOutcome
where
    T: AttributeOwner + Clone + DeserializeOwned,
{
    let (request, filter) = select(&mut pickers.borrow_mut()).begin_fetch();
    let response = ListingService::<T>::list(service, request.query, &filter).await;
    select(&mut pickers.borrow_mut()).resolve(request.ticket, response)
}

fn init_logging() {
    console_error_panic_hook::set_once();
    // Fails when a previous instance already installed the logger
    if console_log::init_with_level(log::Level::Trace).is_ok() {
        log::set_max_level(log::LevelFilter::Info);
    }
}

/// Widget wizard session driven from JavaScript
#[wasm_bindgen]
pub struct WidgetWizard {
    chart_type: ChartType,
    config: WizardConfig,
    session: WizardSession<JsRegistry, JsNavigator>,
    pickers: Rc<RefCell<Pickers>>,
    attributes: Option<AttributeStep<Millis>>,
}

#[wasm_bindgen]
impl WidgetWizard {
    /// Open a wizard for `chart_type` ("area" or "bar"). `config_json` may be
    /// empty to use the defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(
        chart_type: &str,
        config_json: Option<String>,
        add_widget: js_sys::Function,
        add_widget_config: js_sys::Function,
        to_dashboard: js_sys::Function,
    ) -> Result<WidgetWizard, JsValue> {
        init_logging();

        let chart_type: ChartType = chart_type.parse().map_err(js_error)?;
        let config = match config_json.as_deref().map(str::trim) {
            Some(json) if !json.is_empty() => {
                let config = ConfigParser::parse_string(json, ConfigFormat::Json)
                    .map_err(|e| js_error(e.into()))?;
                ConfigValidator::validate(&config).map_err(|e| js_error(e.into()))?;
                config
            }
            _ => WizardConfig::default(),
        };

        log::info!("Opening {chart_type} widget wizard");
        let page_size = config.pagination.default_page_size;
        let session = WizardSession::new(
            chart_type,
            &config,
            JsRegistry {
                add_widget,
                add_widget_config,
            },
            JsNavigator { to_dashboard },
        );

        Ok(Self {
            chart_type,
            config,
            session,
            pickers: Rc::new(RefCell::new(Pickers::from_state(&WizardState::default(), page_size))),
            attributes: None,
        })
    }

    /// Current wizard state, or `null` once finished
    #[wasm_bindgen(js_name = state)]
    pub fn state(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session.state())
    }

    #[wasm_bindgen(js_name = activeStep)]
    pub fn active_step(&self) -> Option<u8> {
        self.session.active_step().map(WizardStep::index)
    }

    #[wasm_bindgen(js_name = isClosed)]
    pub fn is_closed(&self) -> bool {
        self.session.is_closed()
    }

    /// Dispatch a `{ type, payload }` action
    #[wasm_bindgen]
    pub fn dispatch(&mut self, action: JsValue) -> Result<JsValue, JsValue> {
        let action: serde_json::Value = from_js(action).map_err(serialization_error)?;
        let update = self.session.dispatch_json(action).map_err(js_error)?;
        self.after_transition();
        to_js(&update)
    }

    #[wasm_bindgen]
    pub fn back(&mut self) -> Result<JsValue, JsValue> {
        self.apply(WizardAction::Back)
    }

    #[wasm_bindgen]
    pub fn reset(&mut self) -> Result<JsValue, JsValue> {
        self.apply(WizardAction::Reset)
    }

    /// Register the widget, navigate to the dashboard and close the session
    #[wasm_bindgen]
    pub fn finish(&mut self) -> Result<JsValue, JsValue> {
        let widget = self.session.finish().map_err(js_error)?;
        self.after_transition();
        to_js(&widget)
    }

    /// Title block and selected attributes shown on the summary step
    #[wasm_bindgen]
    pub fn summary(&self) -> Result<JsValue, JsValue> {
        let state = self.session.state().ok_or_else(|| js_error(WizardError::SessionClosed))?;
        to_js(&state.summary())
    }

    // Device and template pickers

    #[wasm_bindgen(js_name = pickerState)]
    pub fn picker_state(&self, kind: &str) -> Result<JsValue, JsValue> {
        let pickers = self.pickers.borrow();
        match PickerKind::parse(kind).map_err(js_error)? {
            PickerKind::Devices => to_js(pickers.devices.paginator()),
            PickerKind::Templates => to_js(pickers.templates.paginator()),
        }
    }

    #[wasm_bindgen(js_name = pickerSelected)]
    pub fn picker_selected(&self, kind: &str) -> Result<JsValue, JsValue> {
        let pickers = self.pickers.borrow();
        match PickerKind::parse(kind).map_err(js_error)? {
            PickerKind::Devices => to_js(pickers.devices.selected()),
            PickerKind::Templates => to_js(pickers.templates.selected()),
        }
    }

    /// Change the label filter; returns whether a refetch is needed
    #[wasm_bindgen(js_name = pickerSearch)]
    pub fn picker_search(&mut self, kind: &str, label: &str) -> Result<bool, JsValue> {
        Ok(with_picker!(self.pickers, kind, |picker| picker.search(label)))
    }

    #[wasm_bindgen(js_name = pickerSetPage)]
    pub fn picker_set_page(&mut self, kind: &str, page: usize) -> Result<usize, JsValue> {
        Ok(with_picker!(self.pickers, kind, |picker| picker.set_current_page(page)))
    }

    #[wasm_bindgen(js_name = pickerSetPageSize)]
    pub fn picker_set_page_size(&mut self, kind: &str, page_size: usize) -> Result<(), JsValue> {
        with_picker!(self.pickers, kind, |picker| picker.set_page_size(page_size)).map_err(js_error)
    }

    /// Start a request; returns `{ ticket, query, filter }` for the host to
    /// fetch with
    #[wasm_bindgen(js_name = pickerBeginFetch)]
    pub fn picker_begin_fetch(&mut self, kind: &str) -> Result<JsValue, JsValue> {
        let (request, filter) = with_picker!(self.pickers, kind, |picker| picker.begin_fetch());
        to_js(&serde_json::json!({
            "ticket": request.ticket.value(),
            "query": request.query,
            "filter": filter,
        }))
    }

    /// Hand back the answer to a request started with `pickerBeginFetch`.
    /// Pass `error` instead of `page` when the fetch failed.
    #[wasm_bindgen(js_name = pickerResolve)]
    pub fn picker_resolve(
        &mut self,
        kind: &str,
        ticket: f64,
        page: JsValue,
        error: Option<String>,
    ) -> Result<String, JsValue> {
        let ticket = FetchTicket::from(ticket as u64);
        let mut pickers = self.pickers.borrow_mut();
        let outcome = match PickerKind::parse(kind).map_err(js_error)? {
            PickerKind::Devices => {
                let response = Self::response::<Device>(page, error);
                pickers.devices.resolve(ticket, response)
            }
            PickerKind::Templates => {
                let response = Self::response::<Template>(page, error);
                pickers.templates.resolve(ticket, response)
            }
        };
        Ok(outcome_name(outcome).to_string())
    }

    /// Fetch the current page through `list(query, filter) => Promise<page>`.
    /// Resolves to "applied", "failed" or "stale"; a newer refresh or search
    /// makes an older one stale.
    #[wasm_bindgen(js_name = pickerRefresh)]
    pub fn picker_refresh(&self, kind: &str, list: js_sys::Function) -> Result<js_sys::Promise, JsValue> {
        let kind = PickerKind::parse(kind).map_err(js_error)?;
        let pickers = Rc::clone(&self.pickers);
        let service = JsListingService::new(list);

        Ok(future_to_promise(async move {
            let outcome = match kind {
                PickerKind::Devices => refresh_picker(&pickers, |p| &mut p.devices, &service).await,
                PickerKind::Templates => refresh_picker(&pickers, |p| &mut p.templates, &service).await,
            };
            Ok(JsValue::from_str(outcome_name(outcome)))
        }))
    }

    #[wasm_bindgen(js_name = pickerToggle)]
    pub fn picker_toggle(&mut self, kind: &str, item: JsValue, checked: bool) -> Result<(), JsValue> {
        let mut pickers = self.pickers.borrow_mut();
        match PickerKind::parse(kind).map_err(js_error)? {
            PickerKind::Devices => {
                let device: Device = from_js(item).map_err(serialization_error)?;
                pickers.devices.toggle(&device, checked);
            }
            PickerKind::Templates => {
                let template: Template = from_js(item).map_err(serialization_error)?;
                pickers.templates.toggle(&template, checked);
            }
        }
        Ok(())
    }

    /// Submit the picker's selection with `next`
    #[wasm_bindgen(js_name = pickerSubmit)]
    pub fn picker_submit(&mut self, kind: &str) -> Result<JsValue, JsValue> {
        let payload = {
            let pickers = self.pickers.borrow();
            match PickerKind::parse(kind).map_err(js_error)? {
                PickerKind::Devices => pickers.devices.payload(),
                PickerKind::Templates => pickers.templates.payload(),
            }
        };
        self.apply(WizardAction::Next(payload))
    }

    // Attribute step

    /// Rows of the current attribute page
    #[wasm_bindgen(js_name = attributeRows)]
    pub fn attribute_rows(&self) -> Result<JsValue, JsValue> {
        to_js(&self.attribute_step_ref()?.rows())
    }

    #[wasm_bindgen(js_name = attributePaginator)]
    pub fn attribute_paginator(&self) -> Result<JsValue, JsValue> {
        let step = self.attribute_step_ref()?;
        to_js(&serde_json::json!({
            "currentPage": step.paginator().current_page,
            "pageSize": step.paginator().page_size,
            "totalPages": step.paginator().total_pages,
            "pageSizeOptions": self.config.pagination.page_size_options,
            "term": step.search_term(),
        }))
    }

    /// Record a keystroke in the attribute search box at host time `now`
    #[wasm_bindgen(js_name = attributeSearchInput)]
    pub fn attribute_search_input(&mut self, term: &str, now: f64) -> Result<(), JsValue> {
        self.attribute_step()?.search_input(term, Millis::from_js(now));
        Ok(())
    }

    /// Apply the pending search term if it has settled; returns whether the
    /// rows changed
    #[wasm_bindgen(js_name = attributeSearchPoll)]
    pub fn attribute_search_poll(&mut self, now: f64) -> Result<bool, JsValue> {
        Ok(self.attribute_step()?.poll_search(Millis::from_js(now)))
    }

    /// Host time at which `attributeSearchPoll` should next be called
    #[wasm_bindgen(js_name = attributeSearchDeadline)]
    pub fn attribute_search_deadline(&self) -> Result<Option<f64>, JsValue> {
        Ok(self.attribute_step_ref()?.search_deadline().map(|at| at.0 as f64))
    }

    #[wasm_bindgen(js_name = attributeSetPage)]
    pub fn attribute_set_page(&mut self, page: usize) -> Result<usize, JsValue> {
        Ok(self.attribute_step()?.set_current_page(page))
    }

    #[wasm_bindgen(js_name = attributeSetPageSize)]
    pub fn attribute_set_page_size(&mut self, page_size: usize) -> Result<(), JsValue> {
        self.attribute_step()?.set_page_size(page_size).map_err(js_error)
    }

    #[wasm_bindgen(js_name = toggleAttribute)]
    pub fn toggle_attribute(&mut self, attribute_id: &str, enable: bool) -> Result<(), JsValue> {
        let id = AttributeId::from(attribute_id);
        self.attribute_step()?.toggle(&id, enable).map_err(js_error)
    }

    #[wasm_bindgen(js_name = openColorEditor)]
    pub fn open_color_editor(&mut self, attribute_id: &str) -> Result<Option<String>, JsValue> {
        let id = AttributeId::from(attribute_id);
        let closed = self.attribute_step()?.model_mut().open_color_editor(&id).map_err(js_error)?;
        Ok(closed.map(|id| id.to_string()))
    }

    #[wasm_bindgen(js_name = closeColorEditor)]
    pub fn close_color_editor(&mut self) -> Result<Option<String>, JsValue> {
        Ok(self.attribute_step()?.model_mut().close_color_editor().map(|id| id.to_string()))
    }

    #[wasm_bindgen(js_name = setAttributeColor)]
    pub fn set_attribute_color(&mut self, attribute_id: &str, color: &str) -> Result<(), JsValue> {
        let id = AttributeId::from(attribute_id);
        self.attribute_step()?.model_mut().set_color(&id, color).map_err(js_error)
    }

    #[wasm_bindgen(js_name = setAttributeDescription)]
    pub fn set_attribute_description(&mut self, attribute_id: &str, text: &str) -> Result<(), JsValue> {
        let id = AttributeId::from(attribute_id);
        self.attribute_step()?.model_mut().set_description(&id, text).map_err(js_error)
    }

    /// Submit the selected attributes with `next`
    #[wasm_bindgen(js_name = attributeSubmit)]
    pub fn attribute_submit(&mut self) -> Result<JsValue, JsValue> {
        let payload = self.attribute_step_ref()?.payload();
        self.apply(WizardAction::Next(payload))
    }
}

impl WidgetWizard {
    fn apply(&mut self, action: WizardAction) -> Result<JsValue, JsValue> {
        let update = self.session.dispatch(action).map_err(js_error)?;
        self.after_transition();
        to_js(&update)
    }

    /// Keep the step views in line with the active step
    fn after_transition(&mut self) {
        match self.session.state() {
            Some(state) if state.active_step == WizardStep::Attributes => {
                if self.attributes.is_none() {
                    self.attributes = Some(AttributeStep::new(state, &self.config, self.chart_type));
                }
            }
            Some(state) if state.active_step == WizardStep::General => {
                // Reset or back to the start: pickers follow the stored state
                let page_size = self.config.pagination.default_page_size;
                *self.pickers.borrow_mut() = Pickers::from_state(state, page_size);
                self.attributes = None;
            }
            Some(state) if state.active_step == WizardStep::Devices => {
                // Device choice may change before the attribute step reopens
                self.attributes = None;
            }
            Some(_) => {}
            None => self.attributes = None,
        }
    }

    fn attribute_step(&mut self) -> Result<&mut AttributeStep<Millis>, JsValue> {
        self.attributes
            .as_mut()
            .ok_or_else(|| js_error(WizardError::InvalidAction {
                action: "attribute step is not open".to_string(),
            }))
    }

    fn attribute_step_ref(&self) -> Result<&AttributeStep<Millis>, JsValue> {
        self.attributes
            .as_ref()
            .ok_or_else(|| js_error(WizardError::InvalidAction {
                action: "attribute step is not open".to_string(),
            }))
    }

    fn response<T: DeserializeOwned>(
        page: JsValue,
        error: Option<String>,
    ) -> Result<ListingPage<T>, widget_wizard_data::FetchError> {
        match error {
            Some(message) => Err(widget_wizard_data::FetchError::new(message)),
            None => from_js(page).map_err(|e| {
                widget_wizard_data::FetchError::new(e.as_string().unwrap_or_else(|| "malformed page".to_string()))
            }),
        }
    }
}

/// Change the console log level, e.g. `"debug"` or `"warn"`
#[wasm_bindgen(js_name = setLogLevel)]
pub fn set_log_level(level: &str) -> Result<(), JsValue> {
    let filter: log::LevelFilter = level.parse().map_err(|_| {
        js_error(WizardError::InvalidConfig {
            message: format!("unknown log level {level:?}"),
        })
    })?;
    log::set_max_level(filter);
    Ok(())
}

/// Get the version of the wizard bridge
#[wasm_bindgen(js_name = getVersion)]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
