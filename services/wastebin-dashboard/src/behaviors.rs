//! Dashboard client behaviors
//!
//! Five independent load-time behaviors plus two manually invoked actions.
//! None of them share state except through the page itself.

use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::api::{AlertApi, AlertResponse, SimulatedAlert};
use crate::config::ClientConfig;
use crate::dom::{Clock, Dialogs, DomElement, Page, Scheduler, SubmitDecision};
use crate::error::DashboardError;

/// Page-load behaviors for the server-rendered dashboard
pub struct DashboardClient<P: Page> {
    config: Rc<ClientConfig>,
    page: P,
    dialogs: Rc<dyn Dialogs>,
    scheduler: Rc<dyn Scheduler>,
    api: Rc<dyn AlertApi>,
    clock: Rc<dyn Clock>,
}

impl<P: Page> Clone for DashboardClient<P> {
    fn clone(&self) -> Self {
        Self {
            config: Rc::clone(&self.config),
            page: self.page.clone(),
            dialogs: Rc::clone(&self.dialogs),
            scheduler: Rc::clone(&self.scheduler),
            api: Rc::clone(&self.api),
            clock: Rc::clone(&self.clock),
        }
    }
}

impl<P: Page> DashboardClient<P> {
    pub fn new(
        config: ClientConfig,
        page: P,
        dialogs: Rc<dyn Dialogs>,
        scheduler: Rc<dyn Scheduler>,
        api: Rc<dyn AlertApi>,
        clock: Rc<dyn Clock>,
    ) -> Self {
        Self {
            config: Rc::new(config),
            page,
            dialogs,
            scheduler,
            api,
            clock,
        }
    }

    /// Run every load-time behavior in order. A failing behavior is logged
    /// and the remaining ones still run.
    pub fn start(&self) {
        let results = [
            ("alert dismissal", self.schedule_alert_dismissal()),
            ("tooltips", self.init_tooltips().map(|_| ())),
            ("assignment forms", self.guard_assignment_forms().map(|_| ())),
            ("highlight", self.highlight_from_query().map(|_| ())),
            ("dashboard refresh", self.setup_dashboard_refresh().map(|_| ())),
        ];

        for (name, result) in results {
            if let Err(e) = result {
                warn!("Dashboard behavior '{}' failed: {}", name, e);
            }
        }
        debug!("Dashboard behaviors started");
    }

    /// Close every banner matching the alert selector once the dismissal
    /// delay has elapsed. The selector is evaluated when the timer fires.
    pub fn schedule_alert_dismissal(&self) -> crate::Result<()> {
        let page = self.page.clone();
        let selector = self.config.alerts.selector.clone();
        let delay = self.config.alerts.dismiss_after;

        self.scheduler.set_timeout(
            delay,
            Box::new(move || {
                let alerts = match page.query_all(&selector) {
                    Ok(alerts) => alerts,
                    Err(e) => {
                        warn!("Failed to query alerts '{}': {}", selector, e);
                        return;
                    }
                };
                debug!("Dismissing {} alert(s)", alerts.len());
                for alert in alerts {
                    if let Err(e) = alert.dismiss_alert() {
                        warn!("Failed to dismiss alert '{}': {}", alert.id(), e);
                    }
                }
            }),
        );
        debug!("Alert dismissal scheduled in {:?}", delay);
        Ok(())
    }

    /// Bind a tooltip to every flagged element present right now. Returns
    /// the number of elements bound.
    pub fn init_tooltips(&self) -> crate::Result<usize> {
        let elements = self.page.query_all(&self.config.tooltips.selector)?;
        let mut bound = 0;
        for element in &elements {
            match element.bind_tooltip() {
                Ok(()) => bound += 1,
                Err(e) => warn!("Failed to bind tooltip on '{}': {}", element.id(), e),
            }
        }
        debug!("Bound {} of {} tooltip(s)", bound, elements.len());
        Ok(bound)
    }

    /// Install the worker-selection guard on every assignment form. Returns
    /// the number of forms guarded.
    pub fn guard_assignment_forms(&self) -> crate::Result<usize> {
        let forms = self.page.query_all(&self.config.assignment.form_selector)?;
        for form in &forms {
            let target = form.clone();
            let dialogs = Rc::clone(&self.dialogs);
            let config = Rc::clone(&self.config);
            form.on_submit(Box::new(move || {
                check_assignment(
                    &target,
                    &config.assignment.worker_selector,
                    dialogs.as_ref(),
                    &config.assignment.missing_worker_message,
                )
            }))?;
        }
        debug!("Guarding {} assignment form(s)", forms.len());
        Ok(forms.len())
    }

    /// Highlight the alert named by the query string and scroll to it.
    /// Returns `false` when there is nothing to highlight.
    pub fn highlight_from_query(&self) -> crate::Result<bool> {
        let highlight = &self.config.highlight;
        let Some(alert_id) = self
            .page
            .query_param(&highlight.query_param)?
            .filter(|v| !v.is_empty())
        else {
            return Ok(false);
        };

        let element_id = format!("{}{}", highlight.element_prefix, alert_id);
        let Some(element) = self.page.element_by_id(&element_id) else {
            debug!("Highlight target '{}' not on page", element_id);
            return Ok(false);
        };

        element.add_class(&highlight.class)?;
        element.scroll_into_view();

        let class = highlight.class.clone();
        self.scheduler.set_timeout(
            highlight.duration,
            Box::new(move || {
                if let Err(e) = element.remove_class(&class) {
                    warn!("Failed to clear highlight on '{}': {}", element.id(), e);
                }
            }),
        );
        debug!("Highlighted '{}'", element_id);
        Ok(true)
    }

    /// Start the live clock and the reload timer on dashboard pages.
    /// Returns `false` on any other page.
    pub fn setup_dashboard_refresh(&self) -> crate::Result<bool> {
        let refresh = &self.config.refresh;
        let pathname = self.page.pathname()?;
        if !refresh.is_dashboard_path(&pathname) {
            return Ok(false);
        }

        let clock_elements: Option<Vec<P::Element>> = refresh
            .clock_element_ids
            .iter()
            .map(|id| self.page.element_by_id(id))
            .collect();

        match clock_elements {
            Some(elements) if !elements.is_empty() => {
                let clock = Rc::clone(&self.clock);
                let update = move || {
                    let now = clock.time_of_day();
                    for element in &elements {
                        element.set_text(&now);
                    }
                };
                update();
                self.scheduler
                    .set_interval(refresh.clock_interval, Box::new(update));
            }
            _ => debug!("Clock elements missing, live clock disabled"),
        }

        let page = self.page.clone();
        self.scheduler.set_timeout(
            refresh.reload_after,
            Box::new(move || {
                info!("Reloading dashboard for fresh data");
                if let Err(e) = page.reload() {
                    warn!("Dashboard reload failed: {}", e);
                }
            }),
        );
        debug!("Dashboard refresh armed on '{}'", pathname);
        Ok(true)
    }

    /// Post a simulated sensor alert built from the test inputs.
    ///
    /// Every outcome is reported to the user through a dialog; the returned
    /// result is for callers that want to act on it as well.
    pub async fn simulate_alert(&self) -> crate::Result<AlertResponse> {
        let simulation = &self.config.simulation;
        let bin_id = self.input_value(&simulation.bin_id_input);
        let fill_level = self.input_value(&simulation.fill_level_input);

        let alert = match SimulatedAlert::from_inputs(&bin_id, &fill_level) {
            Ok(alert) => alert,
            Err(e) => {
                let message = match e {
                    DashboardError::MissingInput(_) => &simulation.missing_input_message,
                    _ => &simulation.invalid_fill_level_message,
                };
                self.dialogs.alert(message);
                return Err(e);
            }
        };

        info!(
            "Sending simulated alert: bin '{}' at fill level {}",
            alert.bin_id, alert.fill_level
        );

        match self.api.post_alert(&alert).await {
            Ok(response) => {
                info!("Simulated alert accepted with severity '{}'", response.severity);
                self.dialogs.alert(&format!(
                    "Alert sent successfully! Severity: {}",
                    response.severity
                ));
                if let Err(e) = self.page.reload() {
                    warn!("Reload after simulated alert failed: {}", e);
                }
                Ok(response)
            }
            Err(e) => {
                warn!("Simulated alert failed: {}", e);
                self.dialogs.alert(&format!("Error sending alert: {}", e));
                Err(e)
            }
        }
    }

    /// Ask the user to confirm a destructive action
    pub fn confirm_delete(&self, message: Option<&str>) -> bool {
        let message = message
            .filter(|m| !m.is_empty())
            .unwrap_or(self.config.confirm_delete_message.as_str());
        self.dialogs.confirm(message)
    }

    fn input_value(&self, id: &str) -> String {
        self.page
            .element_by_id(id)
            .and_then(|e| e.value())
            .unwrap_or_default()
    }
}

/// Decide whether an assignment form may submit. A missing or empty worker
/// selection blocks the submission and prompts the user.
pub fn check_assignment<E: DomElement>(
    form: &E,
    worker_selector: &str,
    dialogs: &dyn Dialogs,
    missing_worker_message: &str,
) -> SubmitDecision {
    let selected = match form.query_selector(worker_selector) {
        Ok(select) => select.and_then(|s| s.value()).unwrap_or_default(),
        Err(e) => {
            warn!("Failed to find worker field '{}': {}", worker_selector, e);
            String::new()
        }
    };

    if selected.is_empty() {
        debug!("Blocking assignment submit without a worker");
        dialogs.alert(missing_worker_message);
        SubmitDecision::Block
    } else {
        SubmitDecision::Proceed
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;
    use std::time::Duration;

    use super::*;
    use crate::api::MockAlertApi;
    use crate::dom::{MockDialogs, SubmitHandler};

    #[derive(Clone, Default)]
    struct StubElement {
        id: String,
        value: Option<String>,
        child: Option<Box<StubElement>>,
    }

    impl DomElement for StubElement {
        fn id(&self) -> String {
            self.id.clone()
        }
        fn value(&self) -> Option<String> {
            self.value.clone()
        }
        fn set_text(&self, _text: &str) {}
        fn add_class(&self, _class: &str) -> crate::Result<()> {
            Ok(())
        }
        fn remove_class(&self, _class: &str) -> crate::Result<()> {
            Ok(())
        }
        fn scroll_into_view(&self) {}
        fn query_selector(&self, _selector: &str) -> crate::Result<Option<Self>> {
            Ok(self.child.as_deref().cloned())
        }
        fn dismiss_alert(&self) -> crate::Result<()> {
            Ok(())
        }
        fn bind_tooltip(&self) -> crate::Result<()> {
            Ok(())
        }
        fn on_submit(&self, _handler: SubmitHandler) -> crate::Result<()> {
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    struct StubPage {
        elements: Rc<HashMap<String, StubElement>>,
        reloads: Rc<Cell<u32>>,
        fail_queries: bool,
    }

    impl StubPage {
        fn with_inputs(bin_id: &str, fill_level: &str) -> Self {
            let mut elements = HashMap::new();
            for (id, value) in [("test-bin-id", bin_id), ("test-fill-level", fill_level)] {
                elements.insert(
                    id.to_string(),
                    StubElement {
                        id: id.to_string(),
                        value: Some(value.to_string()),
                        child: None,
                    },
                );
            }
            Self {
                elements: Rc::new(elements),
                ..Default::default()
            }
        }
    }

    impl Page for StubPage {
        type Element = StubElement;

        fn query_all(&self, selector: &str) -> crate::Result<Vec<StubElement>> {
            if self.fail_queries {
                return Err(DashboardError::Dom(format!("bad selector {selector}")));
            }
            Ok(Vec::new())
        }
        fn element_by_id(&self, id: &str) -> Option<StubElement> {
            self.elements.get(id).cloned()
        }
        fn pathname(&self) -> crate::Result<String> {
            Ok("/dashboard".to_string())
        }
        fn query_param(&self, _name: &str) -> crate::Result<Option<String>> {
            Ok(None)
        }
        fn reload(&self) -> crate::Result<()> {
            self.reloads.set(self.reloads.get() + 1);
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingScheduler {
        timeouts: RefCell<Vec<Duration>>,
        intervals: RefCell<Vec<Duration>>,
    }

    impl Scheduler for RecordingScheduler {
        fn set_timeout(&self, delay: Duration, _callback: Box<dyn FnOnce()>) {
            self.timeouts.borrow_mut().push(delay);
        }
        fn set_interval(&self, period: Duration, _callback: Box<dyn FnMut()>) {
            self.intervals.borrow_mut().push(period);
        }
    }

    struct FixedClock;

    impl Clock for FixedClock {
        fn time_of_day(&self) -> String {
            "10:15:00 AM".to_string()
        }
    }

    fn build_client(
        page: StubPage,
        dialogs: MockDialogs,
        api: MockAlertApi,
    ) -> (DashboardClient<StubPage>, Rc<RecordingScheduler>) {
        let scheduler = Rc::new(RecordingScheduler::default());
        let client = DashboardClient::new(
            ClientConfig::default(),
            page,
            Rc::new(dialogs),
            scheduler.clone(),
            Rc::new(api),
            Rc::new(FixedClock),
        );
        (client, scheduler)
    }

    #[tokio::test]
    async fn simulate_alert_posts_payload_and_reloads() {
        let mut api = MockAlertApi::new();
        api.expect_post_alert()
            .withf(|alert| alert.bin_id == "B1" && alert.fill_level == 7)
            .times(1)
            .returning(|_| {
                Box::pin(async {
                    Ok(AlertResponse {
                        severity: "high".to_string(),
                        message: None,
                    })
                })
            });

        let mut dialogs = MockDialogs::new();
        dialogs
            .expect_alert()
            .withf(|message| message == "Alert sent successfully! Severity: high")
            .times(1)
            .return_const(());

        let page = StubPage::with_inputs("B1", "7");
        let reloads = Rc::clone(&page.reloads);
        let (client, _) = build_client(page, dialogs, api);

        let response = client.simulate_alert().await.unwrap();
        assert_eq!(response.severity, "high");
        assert_eq!(reloads.get(), 1);
    }

    #[tokio::test]
    async fn simulate_alert_reports_failure_without_reload() {
        let mut api = MockAlertApi::new();
        api.expect_post_alert().returning(|_| {
            Box::pin(async { Err(DashboardError::Http("connection refused".to_string())) })
        });

        let mut dialogs = MockDialogs::new();
        dialogs
            .expect_alert()
            .withf(|message| {
                message == "Error sending alert: HTTP request failed: connection refused"
            })
            .times(1)
            .return_const(());

        let page = StubPage::with_inputs("B1", "7");
        let reloads = Rc::clone(&page.reloads);
        let (client, _) = build_client(page, dialogs, api);

        let err = client.simulate_alert().await.unwrap_err();
        assert!(matches!(err, DashboardError::Http(_)));
        assert_eq!(reloads.get(), 0);
    }

    #[tokio::test]
    async fn simulate_alert_with_empty_input_sends_nothing() {
        let mut api = MockAlertApi::new();
        api.expect_post_alert().never();

        let mut dialogs = MockDialogs::new();
        dialogs
            .expect_alert()
            .withf(|message| message == "Please enter both Bin ID and Fill Level")
            .times(1)
            .return_const(());

        let (client, _) = build_client(StubPage::with_inputs("B1", ""), dialogs, api);

        let err = client.simulate_alert().await.unwrap_err();
        assert!(matches!(err, DashboardError::MissingInput(_)));
    }

    #[tokio::test]
    async fn simulate_alert_with_missing_inputs_sends_nothing() {
        let mut api = MockAlertApi::new();
        api.expect_post_alert().never();

        let mut dialogs = MockDialogs::new();
        dialogs.expect_alert().times(1).return_const(());

        let (client, _) = build_client(StubPage::default(), dialogs, api);

        assert!(client.simulate_alert().await.is_err());
    }

    #[tokio::test]
    async fn simulate_alert_rejects_non_numeric_fill_level() {
        let mut api = MockAlertApi::new();
        api.expect_post_alert().never();

        let mut dialogs = MockDialogs::new();
        dialogs
            .expect_alert()
            .withf(|message| message == "Fill level must be a whole number")
            .times(1)
            .return_const(());

        let (client, _) = build_client(StubPage::with_inputs("B1", "full"), dialogs, api);

        let err = client.simulate_alert().await.unwrap_err();
        assert!(matches!(err, DashboardError::InvalidInput(_)));
    }

    #[test]
    fn confirm_delete_uses_given_message() {
        let mut dialogs = MockDialogs::new();
        dialogs
            .expect_confirm()
            .withf(|message| message == "Delete worker W3?")
            .return_const(false);

        let (client, _) = build_client(StubPage::default(), dialogs, MockAlertApi::new());
        assert!(!client.confirm_delete(Some("Delete worker W3?")));
    }

    #[test]
    fn confirm_delete_falls_back_to_default_message() {
        let mut dialogs = MockDialogs::new();
        dialogs
            .expect_confirm()
            .withf(|message| message == "Are you sure you want to delete this item?")
            .times(2)
            .return_const(true);

        let (client, _) = build_client(StubPage::default(), dialogs, MockAlertApi::new());
        assert!(client.confirm_delete(None));
        assert!(client.confirm_delete(Some("")));
    }

    #[test]
    fn check_assignment_blocks_without_worker() {
        let mut dialogs = MockDialogs::new();
        dialogs
            .expect_alert()
            .withf(|message| message == "Please select a worker to assign")
            .times(1)
            .return_const(());

        let form = StubElement {
            id: "assign".to_string(),
            value: None,
            child: Some(Box::new(StubElement {
                value: Some(String::new()),
                ..Default::default()
            })),
        };

        let decision = check_assignment(
            &form,
            "select[name=\"worker_id\"]",
            &dialogs,
            "Please select a worker to assign",
        );
        assert_eq!(decision, SubmitDecision::Block);
    }

    #[test]
    fn check_assignment_blocks_when_select_is_absent() {
        let mut dialogs = MockDialogs::new();
        dialogs.expect_alert().times(1).return_const(());

        let form = StubElement::default();
        let decision = check_assignment(&form, "select", &dialogs, "pick one");
        assert_eq!(decision, SubmitDecision::Block);
    }

    #[test]
    fn check_assignment_proceeds_with_worker() {
        let mut dialogs = MockDialogs::new();
        dialogs.expect_alert().never();

        let form = StubElement {
            child: Some(Box::new(StubElement {
                value: Some("worker_2".to_string()),
                ..Default::default()
            })),
            ..Default::default()
        };

        let decision = check_assignment(&form, "select", &dialogs, "pick one");
        assert_eq!(decision, SubmitDecision::Proceed);
    }

    #[test]
    fn start_continues_after_failing_behavior() {
        let page = StubPage {
            fail_queries: true,
            ..Default::default()
        };
        let (client, scheduler) = build_client(page, MockDialogs::new(), MockAlertApi::new());

        client.start();

        // tooltips and forms fail on the query, dismissal and refresh still arm
        assert_eq!(
            *scheduler.timeouts.borrow(),
            vec![Duration::from_secs(5), Duration::from_secs(30)]
        );
        assert_eq!(*scheduler.intervals.borrow(), Vec::<Duration>::new());
    }
}
