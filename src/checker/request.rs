use url::Url;

/// Reasons a `check-link` argument is rejected before any network activity.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("Invalid URL {input:?}: {source}")]
    Malformed {
        input: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Unsupported URL scheme '{0}': only http and https are allowed")]
    UnsupportedScheme(String),
}

/// A validated link-check request.
///
/// Keeps the caller's text verbatim for echoing back, alongside the parsed
/// URL used for the probe.
#[derive(Debug, Clone)]
pub struct CheckRequest {
    raw: String,
    url: Url,
}

impl CheckRequest {
    /// Parse and validate a caller-supplied URL.
    ///
    /// The URL must be absolute and use `http` or `https`. The URL parser
    /// already refuses special-scheme URLs without a host.
    pub fn parse(input: impl Into<String>) -> Result<Self, InputError> {
        let raw = input.into();
        let url = Url::parse(&raw).map_err(|source| InputError::Malformed {
            input: raw.clone(),
            source,
        })?;

        match url.scheme() {
            "http" | "https" => {}
            other => return Err(InputError::UnsupportedScheme(other.to_string())),
        }

        Ok(Self { raw, url })
    }

    /// The URL exactly as the caller supplied it.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}
