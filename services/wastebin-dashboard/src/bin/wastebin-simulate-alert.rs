//! Sensor alert simulator CLI
//!
//! Posts the same payload as the dashboard's "simulate alert" button, for
//! exercising the alert endpoint without a browser.

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use std::path::PathBuf;

    use clap::Parser;
    use tracing::Level;
    use wastebin_dashboard::http::ReqwestAlertApi;
    use wastebin_dashboard::{load_config, AlertApi, ClientConfig, SimulatedAlert};

    #[derive(Debug, Parser)]
    #[command(name = "wastebin-simulate-alert")]
    #[command(about = "Send a simulated bin sensor alert to the dashboard server")]
    #[command(version)]
    pub struct Args {
        /// Bin identifier, e.g. BIN001
        #[arg(short, long)]
        bin_id: String,

        /// Fill level in percent
        #[arg(short, long)]
        fill_level: String,

        /// Dashboard server base URL
        #[arg(long, default_value = "http://localhost:5000")]
        base_url: String,

        /// Path to configuration file (endpoint override)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Log level
        #[arg(short, long, default_value = "info")]
        pub log_level: Level,
    }

    pub fn parse_args() -> Args {
        Args::parse()
    }

    /// Post one alert and return the line to print
    pub async fn run(args: &Args) -> Result<String, Box<dyn std::error::Error>> {
        let config = if let Some(config_path) = &args.config {
            tracing::debug!("Loading configuration from {:?}", config_path);
            load_config(config_path)?
        } else {
            ClientConfig::default()
        };

        let alert = SimulatedAlert::from_inputs(&args.bin_id, &args.fill_level)?;
        let api = ReqwestAlertApi::new(&args.base_url, &config.simulation.endpoint);

        tracing::info!(
            "Sending alert for bin '{}' at fill level {} to {}",
            alert.bin_id,
            alert.fill_level,
            api.url()
        );
        let response = api.post_alert(&alert).await?;

        Ok(match response.message {
            Some(message) => format!("{} (severity: {})", message, response.severity),
            None => format!("Severity: {}", response.severity),
        })
    }

}

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = cli::parse_args();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    // an Err here exits non-zero
    let summary = cli::run(&args).await?;
    println!("{}", summary);
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {}
