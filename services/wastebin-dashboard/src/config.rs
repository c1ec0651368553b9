//! Configuration types for the dashboard client
//!
//! Every field has a default matching the server-rendered templates, so an
//! empty JSON object (or no config at all) yields a working client.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub alerts: AlertsConfig,
    #[serde(default)]
    pub tooltips: TooltipConfig,
    #[serde(default)]
    pub assignment: AssignmentConfig,
    #[serde(default)]
    pub highlight: HighlightConfig,
    #[serde(default)]
    pub refresh: RefreshConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default = "default_confirm_delete_message")]
    pub confirm_delete_message: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            alerts: AlertsConfig::default(),
            tooltips: TooltipConfig::default(),
            assignment: AssignmentConfig::default(),
            highlight: HighlightConfig::default(),
            refresh: RefreshConfig::default(),
            simulation: SimulationConfig::default(),
            confirm_delete_message: default_confirm_delete_message(),
        }
    }
}

/// Notification banner auto-dismissal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertsConfig {
    #[serde(default = "default_alert_selector")]
    pub selector: String,
    #[serde(default = "default_dismiss_after", with = "humantime_serde")]
    pub dismiss_after: Duration,
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            selector: default_alert_selector(),
            dismiss_after: default_dismiss_after(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TooltipConfig {
    #[serde(default = "default_tooltip_selector")]
    pub selector: String,
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            selector: default_tooltip_selector(),
        }
    }
}

/// Worker-assignment form validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentConfig {
    #[serde(default = "default_form_selector")]
    pub form_selector: String,
    #[serde(default = "default_worker_selector")]
    pub worker_selector: String,
    #[serde(default = "default_missing_worker_message")]
    pub missing_worker_message: String,
}

impl Default for AssignmentConfig {
    fn default() -> Self {
        Self {
            form_selector: default_form_selector(),
            worker_selector: default_worker_selector(),
            missing_worker_message: default_missing_worker_message(),
        }
    }
}

/// Highlighting of a freshly created alert row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighlightConfig {
    #[serde(default = "default_highlight_param")]
    pub query_param: String,
    #[serde(default = "default_element_prefix")]
    pub element_prefix: String,
    #[serde(default = "default_highlight_class")]
    pub class: String,
    #[serde(default = "default_highlight_duration", with = "humantime_serde")]
    pub duration: Duration,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            query_param: default_highlight_param(),
            element_prefix: default_element_prefix(),
            class: default_highlight_class(),
            duration: default_highlight_duration(),
        }
    }
}

/// Live clock and periodic reload on the dashboard pages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    #[serde(default = "default_refresh_paths")]
    pub paths: Vec<String>,
    #[serde(default = "default_clock_element_ids")]
    pub clock_element_ids: Vec<String>,
    #[serde(default = "default_clock_interval", with = "humantime_serde")]
    pub clock_interval: Duration,
    #[serde(default = "default_reload_after", with = "humantime_serde")]
    pub reload_after: Duration,
    /// `chrono` format string for the displayed time of day
    #[serde(default = "default_time_format")]
    pub time_format: String,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            paths: default_refresh_paths(),
            clock_element_ids: default_clock_element_ids(),
            clock_interval: default_clock_interval(),
            reload_after: default_reload_after(),
            time_format: default_time_format(),
        }
    }
}

impl RefreshConfig {
    /// Whether the refresh loop should run on the given location path
    pub fn is_dashboard_path(&self, pathname: &str) -> bool {
        self.paths.iter().any(|p| p == pathname)
    }
}

/// Manual sensor alert simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_bin_id_input")]
    pub bin_id_input: String,
    #[serde(default = "default_fill_level_input")]
    pub fill_level_input: String,
    #[serde(default = "default_missing_input_message")]
    pub missing_input_message: String,
    #[serde(default = "default_invalid_fill_level_message")]
    pub invalid_fill_level_message: String,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            bin_id_input: default_bin_id_input(),
            fill_level_input: default_fill_level_input(),
            missing_input_message: default_missing_input_message(),
            invalid_fill_level_message: default_invalid_fill_level_message(),
        }
    }
}

fn default_alert_selector() -> String {
    ".alert".to_string()
}

fn default_dismiss_after() -> Duration {
    Duration::from_millis(5000)
}

fn default_tooltip_selector() -> String {
    r#"[data-bs-toggle="tooltip"]"#.to_string()
}

fn default_form_selector() -> String {
    r#"form[action*="assign_worker"]"#.to_string()
}

fn default_worker_selector() -> String {
    r#"select[name="worker_id"]"#.to_string()
}

fn default_missing_worker_message() -> String {
    "Please select a worker to assign".to_string()
}

fn default_highlight_param() -> String {
    "highlight".to_string()
}

fn default_element_prefix() -> String {
    "alert-".to_string()
}

fn default_highlight_class() -> String {
    "bg-light".to_string()
}

fn default_highlight_duration() -> Duration {
    Duration::from_millis(3000)
}

fn default_refresh_paths() -> Vec<String> {
    vec!["/".to_string(), "/dashboard".to_string()]
}

fn default_clock_element_ids() -> Vec<String> {
    vec!["current-time".to_string(), "last-updated".to_string()]
}

fn default_clock_interval() -> Duration {
    Duration::from_millis(1000)
}

fn default_reload_after() -> Duration {
    Duration::from_millis(30_000)
}

fn default_time_format() -> String {
    "%-I:%M:%S %p".to_string()
}

fn default_endpoint() -> String {
    "/api/alert".to_string()
}

fn default_bin_id_input() -> String {
    "test-bin-id".to_string()
}

fn default_fill_level_input() -> String {
    "test-fill-level".to_string()
}

fn default_missing_input_message() -> String {
    "Please enter both Bin ID and Fill Level".to_string()
}

fn default_invalid_fill_level_message() -> String {
    "Fill level must be a whole number".to_string()
}

fn default_confirm_delete_message() -> String {
    "Are you sure you want to delete this item?".to_string()
}

impl ClientConfig {
    /// Parse a configuration from a JSON document
    pub fn from_json(json: &str) -> crate::Result<Self> {
        let config: ClientConfig = serde_json::from_str(json)?;
        Ok(config)
    }
}

/// Load configuration from a JSON file
#[cfg(not(target_arch = "wasm32"))]
pub fn load_config(path: &std::path::Path) -> crate::Result<ClientConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::DashboardError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    ClientConfig::from_json(&content)
}
