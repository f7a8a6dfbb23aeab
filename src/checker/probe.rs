use std::error::Error as _;
use std::time::Duration;

use reqwest::Client;
use url::Url;

/// A probe that never got an HTTP response back.
///
/// The `Display` output is the human-readable reason shown in the verdict.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProbeFailure {
    #[error("request timed out after {} ms", .0.as_millis())]
    Timeout(Duration),
    #[error("could not resolve host: {0}")]
    Resolve(String),
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("request failed: {0}")]
    Request(String),
}

impl ProbeFailure {
    fn from_reqwest(err: reqwest::Error, deadline: Duration) -> Self {
        if err.is_timeout() {
            return Self::Timeout(deadline);
        }

        let detail = describe(&err);
        if err.is_connect() {
            Self::from_connect_error(detail, &causes(&err))
        } else {
            Self::Request(detail)
        }
    }

    /// Split connect errors into name-resolution failures and the rest
    /// (refused, reset, TLS). Only the source chain is inspected; the outer
    /// message embeds the URL, whose host may contain any word.
    fn from_connect_error(detail: String, causes: &str) -> Self {
        let lowered = causes.to_ascii_lowercase();
        if lowered.contains("dns") || lowered.contains("lookup") || lowered.contains("resolve") {
            Self::Resolve(detail)
        } else {
            Self::Connect(detail)
        }
    }
}

/// Send one HEAD request and return the response status.
///
/// The deadline covers the whole attempt (resolution, connect, TLS, headers).
/// Redirects are not followed here; that is a property of `client`.
pub(crate) async fn head(client: &Client, url: &Url, deadline: Duration) -> Result<u16, ProbeFailure> {
    match tokio::time::timeout(deadline, client.head(url.clone()).send()).await {
        Ok(Ok(response)) => Ok(response.status().as_u16()),
        Ok(Err(err)) => Err(ProbeFailure::from_reqwest(err, deadline)),
        Err(_) => Err(ProbeFailure::Timeout(deadline)),
    }
}

/// Text of every error beneath `err`, outermost first.
fn causes(err: &reqwest::Error) -> String {
    let mut text = Vec::new();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push(cause.to_string());
        source = cause.source();
    }
    text.join(": ")
}

/// Flatten an error and its source chain into one line, skipping sources
/// whose text the outer message already contains.
fn describe(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !text.is_empty() && !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
