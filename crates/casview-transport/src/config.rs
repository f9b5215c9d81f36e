//! Callback transport configuration (`[callback]` table).

use crate::TransportError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_MAX_TOTAL_CONNECTIONS: usize = 20;
pub const DEFAULT_MAX_CONNECTIONS_PER_HOST: usize = 2;
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_SOCKET_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_POOL_WAIT_TIMEOUT_MS: u64 = 5_000;

/// Limits and timeouts for back-channel proxy callback verification.
///
/// `max_total_connections` should be sized by the expected number of
/// concurrent proxy validations. Certificate validation is always strict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CallbackTransportConfig {
    /// Upper bound on callbacks in flight across all hosts.
    pub max_total_connections: usize,
    /// Upper bound on callbacks in flight to one `host:port`; also caps the
    /// idle connections kept for it.
    pub max_connections_per_host: usize,
    pub connect_timeout_ms: u64,
    /// Bound on waiting for response data once connected.
    pub socket_timeout_ms: u64,
    /// Bound on waiting for a free connection slot.
    pub pool_wait_timeout_ms: u64,
    pub require_https: bool,
    /// Status codes that count as a verified callback endpoint.
    pub accepted_statuses: Vec<u16>,
}

impl Default for CallbackTransportConfig {
    fn default() -> Self {
        Self {
            max_total_connections: DEFAULT_MAX_TOTAL_CONNECTIONS,
            max_connections_per_host: DEFAULT_MAX_CONNECTIONS_PER_HOST,
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            socket_timeout_ms: DEFAULT_SOCKET_TIMEOUT_MS,
            pool_wait_timeout_ms: DEFAULT_POOL_WAIT_TIMEOUT_MS,
            require_https: true,
            accepted_statuses: vec![200],
        }
    }
}

impl CallbackTransportConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn socket_timeout(&self) -> Duration {
        Duration::from_millis(self.socket_timeout_ms)
    }

    pub fn pool_wait_timeout(&self) -> Duration {
        Duration::from_millis(self.pool_wait_timeout_ms)
    }

    pub fn accepts(&self, status: u16) -> bool {
        self.accepted_statuses.contains(&status)
    }

    /// Reject configurations that would leave the pool or timeouts unbounded
    /// or make every callback fail.
    pub fn validate(&self) -> Result<(), TransportError> {
        if self.max_total_connections == 0 {
            return Err(invalid("max_total_connections", "must be greater than zero"));
        }
        if self.max_connections_per_host == 0 {
            return Err(invalid("max_connections_per_host", "must be greater than zero"));
        }
        if self.max_connections_per_host > self.max_total_connections {
            return Err(invalid(
                "max_connections_per_host",
                "must not exceed max_total_connections",
            ));
        }
        for (field, value) in [
            ("connect_timeout_ms", self.connect_timeout_ms),
            ("socket_timeout_ms", self.socket_timeout_ms),
            ("pool_wait_timeout_ms", self.pool_wait_timeout_ms),
        ] {
            if value == 0 {
                return Err(invalid(field, "must be greater than zero"));
            }
        }
        if self.accepted_statuses.is_empty() {
            return Err(invalid("accepted_statuses", "must list at least one status"));
        }
        if let Some(bad) = self
            .accepted_statuses
            .iter()
            .find(|s| !(100..=599).contains(*s))
        {
            return Err(invalid(
                "accepted_statuses",
                &format!("{bad} is not an HTTP status code"),
            ));
        }
        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> TransportError {
    TransportError::InvalidConfig {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
