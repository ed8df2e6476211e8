//! ConfirmationGateway - simulated remote acknowledgement for mutations.
//!
//! Every add/update request passes through a gateway before it may touch the
//! catalog. Each call is one-shot: it suspends for the configured latency and
//! then resolves to confirmed or rejected. There is no retry and no
//! cancellation; a pending confirmation always resolves eventually.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::book::{Book, BookId, BookPatch};

/// The mutation a caller wants acknowledged before committing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MutationPayload {
    Add(Book),
    Update { id: BookId, patch: BookPatch },
}

/// A declined mutation. Expected and recoverable; the catalog is unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub reason: String,
}

impl Rejection {
    pub fn new(reason: impl Into<String>) -> Self {
        Rejection {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mutation rejected: {}", self.reason)
    }
}

impl std::error::Error for Rejection {}

/// Acknowledgement step gating add/update mutations.
///
/// Injectable so tests can substitute deterministic confirm/reject stubs for
/// the randomized [`SimulatedGateway`].
#[async_trait]
pub trait ConfirmationGateway: Send + Sync {
    /// Resolve the payload to confirmed (`Ok`) or rejected (`Err`). This is
    /// the only suspension point in the crate.
    async fn confirm(&self, payload: &MutationPayload) -> Result<(), Rejection>;
}

#[async_trait]
impl<G: ConfirmationGateway + ?Sized> ConfirmationGateway for std::sync::Arc<G> {
    async fn confirm(&self, payload: &MutationPayload) -> Result<(), Rejection> {
        (**self).confirm(payload).await
    }
}

const REJECTION_REASON: &str = "Server Error: Failed to process request.";

/// Unreliable-server simulation: fixed latency, then rejects with the
/// configured probability (default 0.2).
#[derive(Debug, Clone)]
pub struct SimulatedGateway {
    delay: Duration,
    rejection_rate: f64,
}

impl SimulatedGateway {
    pub fn new(delay: Duration, rejection_rate: f64) -> Self {
        SimulatedGateway {
            delay,
            rejection_rate,
        }
    }
}

impl Default for SimulatedGateway {
    fn default() -> Self {
        SimulatedGateway {
            delay: Duration::from_secs(1),
            rejection_rate: 0.2,
        }
    }
}

#[async_trait]
impl ConfirmationGateway for SimulatedGateway {
    async fn confirm(&self, payload: &MutationPayload) -> Result<(), Rejection> {
        tokio::time::sleep(self.delay).await;
        if rand::thread_rng().gen::<f64>() < self.rejection_rate {
            tracing::debug!(?payload, "confirmation rejected");
            return Err(Rejection::new(REJECTION_REASON));
        }
        tracing::debug!(?payload, "confirmation granted");
        Ok(())
    }
}
