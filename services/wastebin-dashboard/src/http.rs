//! Native alert endpoint client using reqwest

use async_trait::async_trait;

use crate::api::{decode_response, AlertApi, AlertResponse, SimulatedAlert};

/// Posts simulated alerts to `<base_url><endpoint>`
pub struct ReqwestAlertApi {
    client: reqwest::Client,
    url: String,
}

impl ReqwestAlertApi {
    pub fn new(base_url: &str, endpoint: &str) -> Self {
        let url = format!("{}{}", base_url.trim_end_matches('/'), endpoint);
        tracing::debug!("Created ReqwestAlertApi for {}", url);
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait(?Send)]
impl AlertApi for ReqwestAlertApi {
    async fn post_alert(&self, alert: &SimulatedAlert) -> crate::Result<AlertResponse> {
        tracing::debug!("POST {}", self.url);
        let response = self
            .client
            .post(&self.url)
            .json(alert)
            .send()
            .await
            .map_err(|e| {
                crate::DashboardError::Http(format!("POST {} failed: {}", self.url, e))
            })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| crate::DashboardError::Http(format!("Reading response body: {}", e)))?;

        tracing::debug!("POST {} -> {} ({} bytes)", self.url, status, body.len());
        decode_response(status, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_base_url_and_endpoint() {
        let api = ReqwestAlertApi::new("http://localhost:5000/", "/api/alert");
        assert_eq!(api.url(), "http://localhost:5000/api/alert");
    }

    #[tokio::test]
    async fn connection_refused_returns_http_error() {
        // port 1 is reserved and unbound
        let api = ReqwestAlertApi::new("http://127.0.0.1:1", "/api/alert");
        let alert = SimulatedAlert {
            bin_id: "B1".to_string(),
            fill_level: 7,
        };

        let err = api.post_alert(&alert).await.unwrap_err();
        match &err {
            crate::DashboardError::Http(msg) => {
                assert!(
                    msg.starts_with("POST http://127.0.0.1:1/api/alert failed:"),
                    "{msg}"
                );
            }
            other => panic!("expected DashboardError::Http, got {other:?}"),
        }
    }
}
