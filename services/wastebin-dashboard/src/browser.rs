//! Browser bindings: web-sys DOM, Bootstrap components, Leptos timers and
//! gloo-net HTTP, plus the WASM start entry point.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;
use leptos::prelude::{set_interval_with_handle, set_timeout};
use leptos::task::{spawn_local, Executor};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, Event, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement,
    ScrollBehavior, ScrollIntoViewOptions, UrlSearchParams, Window,
};

use crate::api::{decode_response, AlertApi, AlertResponse, SimulatedAlert};
use crate::dom::{
    is_still_parsing, Clock, Dialogs, DomElement, LocalClock, Page, Scheduler, SubmitDecision,
    SubmitHandler,
};
use crate::{ClientConfig, DashboardClient, DashboardError};

/// Id of the optional `<script type="application/json">` config block
const CONFIG_ELEMENT_ID: &str = "dashboard-client-config";

fn js_error(value: JsValue) -> DashboardError {
    DashboardError::Dom(format!("{:?}", value))
}

/// `bootstrap.<component>.getOrCreateInstance(element)`
fn bootstrap_instance(component: &str, element: &Element) -> crate::Result<JsValue> {
    let bootstrap = js_sys::Reflect::get(&js_sys::global(), &JsValue::from_str("bootstrap"))
        .map_err(js_error)?;
    if bootstrap.is_undefined() {
        return Err(DashboardError::Dom("Bootstrap is not loaded".to_string()));
    }
    let class = js_sys::Reflect::get(&bootstrap, &JsValue::from_str(component)).map_err(js_error)?;
    let factory: js_sys::Function =
        js_sys::Reflect::get(&class, &JsValue::from_str("getOrCreateInstance"))
            .map_err(js_error)?
            .dyn_into()
            .map_err(|_| DashboardError::Dom(format!("bootstrap.{} has no factory", component)))?;
    factory.call1(&class, element).map_err(js_error)
}

/// A live element in the current document
#[derive(Debug, Clone)]
pub struct WebElement(Element);

impl DomElement for WebElement {
    fn id(&self) -> String {
        self.0.id()
    }

    fn value(&self) -> Option<String> {
        if let Some(input) = self.0.dyn_ref::<HtmlInputElement>() {
            Some(input.value())
        } else if let Some(select) = self.0.dyn_ref::<HtmlSelectElement>() {
            Some(select.value())
        } else {
            self.0
                .dyn_ref::<HtmlTextAreaElement>()
                .map(|text| text.value())
        }
    }

    fn set_text(&self, text: &str) {
        self.0.set_text_content(Some(text));
    }

    fn add_class(&self, class: &str) -> crate::Result<()> {
        self.0.class_list().add_1(class).map_err(js_error)
    }

    fn remove_class(&self, class: &str) -> crate::Result<()> {
        self.0.class_list().remove_1(class).map_err(js_error)
    }

    fn scroll_into_view(&self) {
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(ScrollBehavior::Smooth);
        self.0.scroll_into_view_with_scroll_into_view_options(&options);
    }

    fn query_selector(&self, selector: &str) -> crate::Result<Option<Self>> {
        self.0
            .query_selector(selector)
            .map(|found| found.map(WebElement))
            .map_err(js_error)
    }

    fn dismiss_alert(&self) -> crate::Result<()> {
        let instance = bootstrap_instance("Alert", &self.0)?;
        let close: js_sys::Function = js_sys::Reflect::get(&instance, &JsValue::from_str("close"))
            .map_err(js_error)?
            .dyn_into()
            .map_err(|_| DashboardError::Dom("bootstrap.Alert has no close()".to_string()))?;
        close.call0(&instance).map(|_| ()).map_err(js_error)
    }

    fn bind_tooltip(&self) -> crate::Result<()> {
        bootstrap_instance("Tooltip", &self.0).map(|_| ())
    }

    fn on_submit(&self, mut handler: SubmitHandler) -> crate::Result<()> {
        let listener = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            if handler() == SubmitDecision::Block {
                event.prevent_default();
            }
        });
        self.0
            .add_event_listener_with_callback("submit", listener.as_ref().unchecked_ref())
            .map_err(js_error)?;
        // the listener lives as long as the page
        listener.forget();
        Ok(())
    }
}

/// The browser window's document and location
#[derive(Debug, Clone)]
pub struct WebPage {
    window: Window,
    document: Document,
}

impl WebPage {
    pub fn new(window: Window, document: Document) -> Self {
        Self { window, document }
    }
}

impl Page for WebPage {
    type Element = WebElement;

    fn query_all(&self, selector: &str) -> crate::Result<Vec<WebElement>> {
        let nodes = self.document.query_selector_all(selector).map_err(js_error)?;
        Ok((0..nodes.length())
            .filter_map(|i| nodes.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(WebElement)
            .collect())
    }

    fn element_by_id(&self, id: &str) -> Option<WebElement> {
        self.document.get_element_by_id(id).map(WebElement)
    }

    fn pathname(&self) -> crate::Result<String> {
        self.window.location().pathname().map_err(js_error)
    }

    fn query_param(&self, name: &str) -> crate::Result<Option<String>> {
        let search = self.window.location().search().map_err(js_error)?;
        let params = UrlSearchParams::new_with_str(&search).map_err(js_error)?;
        Ok(params.get(name))
    }

    fn reload(&self) -> crate::Result<()> {
        self.window.location().reload().map_err(js_error)
    }
}

/// `window.alert` / `window.confirm`
pub struct WindowDialogs {
    window: Window,
}

impl Dialogs for WindowDialogs {
    fn alert(&self, message: &str) {
        if let Err(e) = self.window.alert_with_message(message) {
            tracing::warn!("window.alert failed: {:?}", e);
        }
    }

    fn confirm(&self, message: &str) -> bool {
        self.window.confirm_with_message(message).unwrap_or_else(|e| {
            tracing::warn!("window.confirm failed: {:?}", e);
            false
        })
    }
}

/// Event-loop timers through Leptos' DOM helpers
pub struct LeptosScheduler;

impl Scheduler for LeptosScheduler {
    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>) {
        set_timeout(callback, delay);
    }

    fn set_interval(&self, period: Duration, callback: Box<dyn FnMut()>) {
        let callback = RefCell::new(callback);
        let tick = move || (callback.borrow_mut().as_mut())();
        if let Err(e) = set_interval_with_handle(tick, period) {
            tracing::warn!("Failed to start {:?} interval: {:?}", period, e);
        }
    }
}

/// Posts to the alert endpoint on the page's own origin
pub struct GlooAlertApi {
    url: String,
}

impl GlooAlertApi {
    pub fn new(window: &Window, endpoint: &str) -> crate::Result<Self> {
        let origin = window.location().origin().map_err(js_error)?;
        Ok(Self {
            url: format!("{}{}", origin, endpoint),
        })
    }
}

#[async_trait(?Send)]
impl AlertApi for GlooAlertApi {
    async fn post_alert(&self, alert: &SimulatedAlert) -> crate::Result<AlertResponse> {
        tracing::debug!("POST {}", self.url);
        let response = gloo_net::http::Request::post(&self.url)
            .json(alert)
            .map_err(|e| DashboardError::Http(format!("{}", e)))?
            .send()
            .await
            .map_err(|e| DashboardError::Http(format!("POST {} failed: {}", self.url, e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DashboardError::Http(format!("Reading response body: {}", e)))?;

        tracing::debug!("POST {} -> {} ({} bytes)", self.url, status, body.len());
        decode_response(status, &body)
    }
}

fn read_config(document: &Document) -> ClientConfig {
    let Some(element) = document.get_element_by_id(CONFIG_ELEMENT_ID) else {
        return ClientConfig::default();
    };
    let text = element.text_content().unwrap_or_default();
    match ClientConfig::from_json(&text) {
        Ok(config) => {
            tracing::debug!("Loaded dashboard config from #{}", CONFIG_ELEMENT_ID);
            config
        }
        Err(e) => {
            tracing::warn!("Invalid dashboard config, using defaults: {}", e);
            ClientConfig::default()
        }
    }
}

fn set_global(window: &Window, name: &str, value: &JsValue) -> crate::Result<()> {
    js_sys::Reflect::set(window, &JsValue::from_str(name), value)
        .map(|_| ())
        .map_err(js_error)
}

/// Expose the manual actions to inline markup
fn install_globals(window: &Window, client: &DashboardClient<WebPage>) -> crate::Result<()> {
    let simulate_client = client.clone();
    let simulate = Closure::<dyn Fn()>::new(move || {
        let client = simulate_client.clone();
        spawn_local(async move {
            // the outcome has already been shown to the user
            let _ = client.simulate_alert().await;
        });
    });
    set_global(window, "simulateAlert", simulate.as_ref())?;
    simulate.forget();

    let confirm_client = client.clone();
    let confirm = Closure::<dyn Fn(JsValue) -> bool>::new(move |message: JsValue| {
        confirm_client.confirm_delete(message.as_string().as_deref())
    });
    set_global(window, "confirmDelete", confirm.as_ref())?;
    confirm.forget();

    let tooltip_client = client.clone();
    let bind_tooltips = Closure::<dyn Fn() -> u32>::new(move || {
        match tooltip_client.init_tooltips() {
            Ok(bound) => bound as u32,
            Err(e) => {
                tracing::warn!("Tooltip re-scan failed: {}", e);
                0
            }
        }
    });
    set_global(window, "bindTooltips", bind_tooltips.as_ref())?;
    bind_tooltips.forget();

    Ok(())
}

fn build_client(window: &Window, document: &Document) -> crate::Result<DashboardClient<WebPage>> {
    let config = read_config(document);
    let api = GlooAlertApi::new(window, &config.simulation.endpoint)?;
    let clock: Rc<dyn Clock> = Rc::new(LocalClock::new(config.refresh.time_format.clone()));
    Ok(DashboardClient::new(
        config,
        WebPage::new(window.clone(), document.clone()),
        Rc::new(WindowDialogs {
            window: window.clone(),
        }),
        Rc::new(LeptosScheduler),
        Rc::new(api),
        clock,
    ))
}

/// WASM entry point: wire the behaviors to page load
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
    if let Err(e) = Executor::init_wasm_bindgen() {
        tracing::debug!("Executor already initialized: {:?}", e);
    }

    let Some(window) = web_sys::window() else {
        tracing::warn!("No window, dashboard behaviors disabled");
        return;
    };
    let Some(document) = window.document() else {
        tracing::warn!("No document, dashboard behaviors disabled");
        return;
    };

    let client = match build_client(&window, &document) {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!("Failed to build dashboard client: {}", e);
            return;
        }
    };

    if let Err(e) = install_globals(&window, &client) {
        tracing::warn!("Failed to install dashboard globals: {}", e);
    }

    if is_still_parsing(&document.ready_state()) {
        let on_load = Closure::<dyn FnMut()>::new(move || client.start());
        if let Err(e) = document
            .add_event_listener_with_callback("DOMContentLoaded", on_load.as_ref().unchecked_ref())
        {
            tracing::warn!("Failed to wait for DOMContentLoaded: {:?}", e);
        }
        on_load.forget();
    } else {
        client.start();
    }
}
