//! Connection slots for callback requests: one total bound shared by every
//! host, plus a bound per `host:port`.

use crate::TransportError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Bounds callbacks in flight, in total and per endpoint host.
///
/// A slow host can hold at most `per_host_capacity` slots, so the rest of
/// the total budget stays available to other services.
#[derive(Debug)]
pub struct ConnectionBudget {
    total_capacity: usize,
    per_host_capacity: usize,
    total: Arc<Semaphore>,
    hosts: Mutex<HashMap<String, Arc<Semaphore>>>,
}

/// A held slot for one host. Dropping it frees both the host and total slot.
#[derive(Debug)]
pub struct ConnectionPermit {
    host: String,
    _host_slot: OwnedSemaphorePermit,
    _total_slot: OwnedSemaphorePermit,
}

impl ConnectionPermit {
    pub fn host(&self) -> &str {
        &self.host
    }
}

impl ConnectionBudget {
    pub fn new(total_capacity: usize, per_host_capacity: usize) -> Self {
        Self {
            total_capacity,
            per_host_capacity,
            total: Arc::new(Semaphore::new(total_capacity)),
            hosts: Mutex::new(HashMap::new()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.total_capacity
    }

    pub fn per_host_capacity(&self) -> usize {
        self.per_host_capacity
    }

    /// Slots currently held across all hosts.
    pub fn in_use(&self) -> usize {
        self.total_capacity
            .saturating_sub(self.total.available_permits())
    }

    /// Slots currently held for `host`.
    pub fn in_use_for(&self, host: &str) -> usize {
        let hosts = self.hosts.lock().unwrap_or_else(PoisonError::into_inner);
        hosts.get(host).map_or(0, |sem| {
            self.per_host_capacity
                .saturating_sub(sem.available_permits())
        })
    }

    /// Take a slot for `host`, waiting at most `wait` for both the host and
    /// the total bound to admit it.
    pub async fn acquire(
        &self,
        host: &str,
        wait: Duration,
    ) -> Result<ConnectionPermit, TransportError> {
        let host_sem = self.host_semaphore(host);
        let total = Arc::clone(&self.total);

        // Host slot first: callers queued behind a saturated host hold no
        // total slot.
        let slots = tokio::time::timeout(wait, async move {
            let host_slot = host_sem.acquire_owned().await?;
            let total_slot = total.acquire_owned().await?;
            Ok::<_, tokio::sync::AcquireError>((host_slot, total_slot))
        })
        .await;

        match slots {
            Ok(Ok((host_slot, total_slot))) => Ok(ConnectionPermit {
                host: host.to_string(),
                _host_slot: host_slot,
                _total_slot: total_slot,
            }),
            // Semaphores are never closed; treat a closed one like a timeout.
            Ok(Err(_)) | Err(_) => Err(TransportError::PoolExhausted {
                host: host.to_string(),
                capacity: self.total_capacity,
                per_host_capacity: self.per_host_capacity,
                waited_ms: u64::try_from(wait.as_millis()).unwrap_or(u64::MAX),
            }),
        }
    }

    fn host_semaphore(&self, host: &str) -> Arc<Semaphore> {
        let mut hosts = self.hosts.lock().unwrap_or_else(PoisonError::into_inner);
        // Drop entries no permit or waiter refers to.
        hosts.retain(|_, sem| Arc::strong_count(sem) > 1);
        Arc::clone(
            hosts
                .entry(host.to_string())
                .or_insert_with(|| Arc::new(Semaphore::new(self.per_host_capacity))),
        )
    }
}
