//! HTTPS implementation of [`CallbackTransport`].

use crate::budget::ConnectionBudget;
use crate::config::CallbackTransportConfig;
use crate::{CallbackOutcome, CallbackRequest, CallbackTransport, TransportError};
use async_trait::async_trait;
use reqwest::redirect::Policy;
use reqwest::{Client, Url};
use tracing::{debug, warn};

/// Callback transport over a pooled HTTP client.
///
/// Safe to share across tasks; the connection budget bounds how many
/// callbacks run at once, in total and per endpoint host.
#[derive(Debug)]
pub struct HttpCallbackTransport {
    config: CallbackTransportConfig,
    client: Client,
    budget: ConnectionBudget,
}

impl HttpCallbackTransport {
    /// Build a transport after validating `config`.
    ///
    /// Certificates are always verified against the built-in roots and
    /// redirects are never followed: the endpoint itself must answer.
    pub fn new(config: CallbackTransportConfig) -> Result<Self, TransportError> {
        config.validate()?;

        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.socket_timeout())
            .pool_max_idle_per_host(config.max_connections_per_host)
            .redirect(Policy::none())
            .https_only(config.require_https)
            .no_proxy()
            .build()
            .map_err(|e| TransportError::ClientBuild(e.to_string()))?;

        let budget = ConnectionBudget::new(
            config.max_total_connections,
            config.max_connections_per_host,
        );
        Ok(Self {
            config,
            client,
            budget,
        })
    }

    pub fn config(&self) -> &CallbackTransportConfig {
        &self.config
    }

    pub fn in_flight(&self) -> usize {
        self.budget.in_use()
    }

    /// Callbacks in flight to the endpoint `url` points at.
    pub fn in_flight_for(&self, url: &Url) -> usize {
        self.budget.in_use_for(&host_key(url))
    }
}

#[async_trait]
impl CallbackTransport for HttpCallbackTransport {
    async fn verify(&self, request: &CallbackRequest) -> Result<CallbackOutcome, TransportError> {
        let url = parse_callback_url(&request.callback_url, self.config.require_https)?;
        let permit = self
            .budget
            .acquire(&host_key(&url), self.config.pool_wait_timeout())
            .await
            .inspect_err(|e| warn!(error = %e, "proxy callback not attempted"))?;

        debug!(
            host = permit.host(),
            in_flight = self.budget.in_use(),
            "verifying proxy callback endpoint"
        );

        let response = self
            .client
            .get(url)
            .query(&request.query())
            .send()
            .await
            .map_err(|e| TransportError::Request {
                url: request.callback_url.clone(),
                message: e.to_string(),
            })?;

        let status = response.status().as_u16();
        let accepted = self.config.accepts(status);
        if accepted {
            debug!(status, "proxy callback endpoint verified");
        } else {
            warn!(
                host = permit.host(),
                status, "proxy callback endpoint answered with a rejected status"
            );
        }
        Ok(CallbackOutcome { status, accepted })
    }
}

/// Budget key for an endpoint: `host:port`, with the scheme's default port
/// filled in.
fn host_key(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port_or_known_default() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    }
}

/// Parse and vet a callback URL before any connection is attempted.
pub fn parse_callback_url(raw: &str, require_https: bool) -> Result<Url, TransportError> {
    let url = Url::parse(raw.trim()).map_err(|e| TransportError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "https" => {}
        "http" if !require_https => {}
        "http" => {
            return Err(TransportError::InsecureEndpoint {
                url: raw.to_string(),
            });
        }
        other => {
            return Err(TransportError::InvalidUrl {
                url: raw.to_string(),
                reason: format!("unsupported scheme `{other}`"),
            });
        }
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(TransportError::InvalidUrl {
            url: raw.to_string(),
            reason: "missing host".to_string(),
        });
    }
    Ok(url)
}
