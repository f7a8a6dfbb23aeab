use std::fmt;

use super::probe::ProbeFailure;

/// Whether a link was judged reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Valid,
    Invalid,
}

impl Outcome {
    /// 2xx and 3xx count as reachable. A redirect means the resource exists
    /// somewhere; its target is not verified.
    pub fn from_status(status: u16) -> Self {
        if (200..=399).contains(&status) {
            Self::Valid
        } else {
            Self::Invalid
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::Invalid => "invalid",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the probe observed: a status line, or a reason nothing came back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evidence {
    HttpStatus(u16),
    FailureReason(String),
}

/// Result of one link check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckVerdict {
    url: String,
    outcome: Outcome,
    evidence: Evidence,
}

impl CheckVerdict {
    /// Classify a probe result.
    pub fn classify(url: impl Into<String>, probe: Result<u16, ProbeFailure>) -> Self {
        let (outcome, evidence) = match probe {
            Ok(status) => (Outcome::from_status(status), Evidence::HttpStatus(status)),
            Err(failure) => (Outcome::Invalid, Evidence::FailureReason(failure.to_string())),
        };
        Self {
            url: url.into(),
            outcome,
            evidence,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn is_valid(&self) -> bool {
        self.outcome == Outcome::Valid
    }

    pub fn evidence(&self) -> &Evidence {
        &self.evidence
    }

    pub fn http_status(&self) -> Option<u16> {
        match &self.evidence {
            Evidence::HttpStatus(status) => Some(*status),
            Evidence::FailureReason(_) => None,
        }
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match &self.evidence {
            Evidence::HttpStatus(_) => None,
            Evidence::FailureReason(reason) => Some(reason),
        }
    }

    /// Render the verdict as the tool's text output.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CheckVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "URL: {}", self.url)?;
        writeln!(f, "Result: {}", self.outcome)?;
        match &self.evidence {
            Evidence::HttpStatus(status) => write!(f, "HTTP status: {status}"),
            Evidence::FailureReason(reason) => write!(f, "Reason: {reason}"),
        }
    }
}
