//! Link reachability checks.
//!
//! A check is one HEAD request with a deadline, classified into a
//! [`CheckVerdict`]. Network faults never surface as errors; they become an
//! `invalid` verdict carrying the reason.

mod probe;
mod request;
mod verdict;

use std::time::Duration;

use reqwest::redirect::Policy;
use reqwest::Client;

use crate::config::ServerConfig;

pub use probe::ProbeFailure;
pub use request::{CheckRequest, InputError};
pub use verdict::{CheckVerdict, Evidence, Outcome};

#[derive(Debug, thiserror::Error)]
pub enum CheckerError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Stateless link checker.
///
/// Cloning is cheap and clones share nothing mutable. The client keeps no
/// idle connections, so every check dials its own.
#[derive(Debug, Clone)]
pub struct LinkChecker {
    client: Client,
    deadline: Duration,
}

impl LinkChecker {
    pub fn new(config: &ServerConfig) -> Result<Self, CheckerError> {
        let mut builder = Client::builder()
            .redirect(Policy::none())
            .pool_max_idle_per_host(0)
            .user_agent(config.user_agent.clone());
        if !config.proxy_from_env {
            builder = builder.no_proxy();
        }

        Ok(Self {
            client: builder.build()?,
            deadline: config.probe_timeout,
        })
    }

    /// Default deadline applied by [`LinkChecker::check`].
    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    pub async fn check(&self, request: &CheckRequest) -> CheckVerdict {
        self.check_with_deadline(request, self.deadline).await
    }

    /// Probe `request` once, abandoning the attempt after `deadline`.
    pub async fn check_with_deadline(&self, request: &CheckRequest, deadline: Duration) -> CheckVerdict {
        let probe = probe::head(&self.client, request.url(), deadline).await;

        match &probe {
            Ok(status) => tracing::debug!(url = request.as_str(), status, "probe answered"),
            Err(failure) => tracing::info!(url = request.as_str(), reason = %failure, "probe failed"),
        }

        CheckVerdict::classify(request.as_str(), probe)
    }
}
