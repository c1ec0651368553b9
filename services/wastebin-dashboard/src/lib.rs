//! Waste-bin dashboard client
//!
//! Browser behaviors for the server-rendered waste-bin monitoring dashboard:
//! banner dismissal, tooltips, assignment form validation, alert
//! highlighting, the live clock with periodic reload, and a manual sensor
//! alert simulator.

pub mod api;
pub mod behaviors;
pub mod config;
pub mod dom;
pub mod error;

#[cfg(not(target_arch = "wasm32"))]
pub mod http;

#[cfg(all(feature = "browser", target_arch = "wasm32"))]
pub mod browser;

pub use api::{AlertApi, AlertResponse, SimulatedAlert};
pub use behaviors::DashboardClient;
pub use config::ClientConfig;
#[cfg(not(target_arch = "wasm32"))]
pub use config::load_config;
pub use error::{DashboardError, Result};
