//! # casview-transport
//!
//! Back-channel verification of proxy callback endpoints.
//!
//! Before a proxy-granting ticket is issued, the server calls the service's
//! callback URL over HTTPS and only proceeds if the endpoint answers with an
//! accepted status. The call is the one outbound wait in the validation
//! path, so every request runs under explicit connect and socket timeouts,
//! a bound on connections in flight (in total and per host), and strict
//! certificate validation.

pub mod budget;
pub mod config;
pub mod http;

pub use budget::{ConnectionBudget, ConnectionPermit};
pub use config::CallbackTransportConfig;
pub use http::HttpCallbackTransport;

use async_trait::async_trait;
use thiserror::Error;

/// Query parameter carrying the proxy-granting ticket id.
pub const PARAM_PGT_ID: &str = "pgtId";
/// Query parameter carrying the proxy-granting ticket IOU.
pub const PARAM_PGT_IOU: &str = "pgtIou";

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid callback transport config `{field}`: {reason}")]
    InvalidConfig { field: String, reason: String },

    #[error("invalid callback url `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("callback url `{url}` is not https")]
    InsecureEndpoint { url: String },

    #[error(
        "no callback connection slot for `{host}` after {waited_ms}ms \
         (capacity {capacity}, per host {per_host_capacity})"
    )]
    PoolExhausted {
        host: String,
        capacity: usize,
        per_host_capacity: usize,
        waited_ms: u64,
    },

    #[error("callback request to `{url}` failed: {message}")]
    Request { url: String, message: String },

    #[error("failed to build callback http client: {0}")]
    ClientBuild(String),
}

/// One callback verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackRequest {
    pub callback_url: String,
    pub pgt_id: Option<String>,
    pub pgt_iou: Option<String>,
}

impl CallbackRequest {
    pub fn new(callback_url: impl Into<String>) -> Self {
        Self {
            callback_url: callback_url.into(),
            pgt_id: None,
            pgt_iou: None,
        }
    }

    pub fn with_ticket(mut self, pgt_id: impl Into<String>, pgt_iou: impl Into<String>) -> Self {
        self.pgt_id = Some(pgt_id.into());
        self.pgt_iou = Some(pgt_iou.into());
        self
    }

    /// Query parameters appended to the callback URL.
    pub fn query(&self) -> Vec<(&'static str, &str)> {
        let mut out = Vec::new();
        if let Some(iou) = self.pgt_iou.as_deref() {
            out.push((PARAM_PGT_IOU, iou));
        }
        if let Some(id) = self.pgt_id.as_deref() {
            out.push((PARAM_PGT_ID, id));
        }
        out
    }
}

/// Result of a completed callback exchange.
///
/// A rejected status is an outcome, not a transport error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallbackOutcome {
    pub status: u16,
    pub accepted: bool,
}

/// Narrow interface the validation pipeline uses to verify callbacks.
#[async_trait]
pub trait CallbackTransport: Send + Sync {
    async fn verify(&self, request: &CallbackRequest) -> Result<CallbackOutcome, TransportError>;
}
