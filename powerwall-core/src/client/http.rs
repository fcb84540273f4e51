use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{debug, info, instrument};

use crate::{
    error::{PowerwallError, Result},
    model::{Capacity, MetersAggregates},
};

use super::Powerwall;

/// Client for the gateway's local REST API.
#[derive(Debug, Clone)]
pub struct HttpPowerwall {
    base_url: String,
    http: Client,
    token: Option<String>,
}

impl HttpPowerwall {
    pub fn new(host: &str) -> Result<Self> {
        // Gateways serve a self-signed certificate.
        let http = Client::builder().danger_accept_invalid_certs(true).build()?;

        Ok(Self { base_url: api_base_url(host), http, token: None })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let token = self.token.as_deref().ok_or(PowerwallError::NotAuthenticated)?;

        debug!(path, "querying gateway");
        let res = self.http.get(self.url(path)).bearer_auth(token).send().await?;

        let status = res.status();
        let body = res.text().await?;

        match status {
            status if status.is_success() => Ok(serde_json::from_str(&body)?),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(PowerwallError::AccessDenied),
            status => Err(PowerwallError::Api { status, body: truncate_body(&body) }),
        }
    }
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
    email: &'a str,
    force_sm_off: bool,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ErrorResponse {
    error: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SystemStatus {
    nominal_full_pack_energy: f64,
}

#[async_trait]
impl Powerwall for HttpPowerwall {
    #[instrument(skip_all, fields(url = %self.base_url, email = %email))]
    async fn login(&mut self, password: &str, email: &str) -> Result<()> {
        let request = LoginRequest { username: "customer", password, email, force_sm_off: false };

        let res = self.http.post(self.url("login/Basic")).json(&request).send().await?;

        let status = res.status();
        let body = res.text().await?;

        match status {
            status if status.is_success() => {
                let parsed: LoginResponse = serde_json::from_str(&body)?;
                self.token = Some(parsed.token);
                info!("logged in");
                Ok(())
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(PowerwallError::AuthenticationFailed { message: login_error_message(&body) })
            }
            status => Err(PowerwallError::Api { status, body: truncate_body(&body) }),
        }
    }

    #[instrument(skip_all, fields(url = %self.base_url))]
    async fn get_capacity(&self) -> Result<Capacity> {
        let status: SystemStatus = self.get_json("system_status").await?;
        Ok(Capacity(status.nominal_full_pack_energy))
    }

    #[instrument(skip_all, fields(url = %self.base_url))]
    async fn get_meters(&self) -> Result<MetersAggregates> {
        self.get_json("meters/aggregates").await
    }
}

fn api_base_url(host: &str) -> String {
    let host = host.trim_end_matches('/');
    if host.contains("://") { format!("{host}/api/") } else { format!("https://{host}/api/") }
}

fn login_error_message(body: &str) -> String {
    let parsed: ErrorResponse = serde_json::from_str(body).unwrap_or_default();
    parsed.error.or(parsed.message).unwrap_or_else(|| truncate_body(body))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((end, _)) => format!("{}...", &body[..end]),
        None => body.to_string(),
    }
}
