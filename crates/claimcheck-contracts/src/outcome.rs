//! Verification results as produced by the client and carried by the relay.
//!
//! `VerificationOutcome` is also the relay's reply message. On the wire it
//! uses the `{ success, data | error }` envelope rather than serde's default
//! enum tagging, see [`ReplyWire`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ClaimcheckError;

/// Verdict labels the verification service is known to emit.
pub const KNOWN_VERDICTS: [&str; 4] = ["True", "False", "Misleading", "Unclear"];

/// One supporting reference returned by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceLink {
    /// Display title. May be absent or blank, in which case the URL is shown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub url: String,
}

impl ReferenceLink {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            url: url.into(),
        }
    }

    pub fn untitled(url: impl Into<String>) -> Self {
        Self {
            title: None,
            url: url.into(),
        }
    }

    /// The label shown to the user: the trimmed title, or the raw URL.
    pub fn label(&self) -> &str {
        match self.title.as_deref().map(str::trim) {
            Some(title) if !title.is_empty() => title,
            _ => &self.url,
        }
    }
}

/// The service's response body, kept verbatim as the success payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationReport {
    /// Service-assigned claim identifier, when the service provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub verdict: String,
    pub summary: String,
    pub links: Vec<ReferenceLink>,
    /// Any other fields in the body, passed through unchanged.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl VerificationReport {
    /// True if `verdict` is one of [`KNOWN_VERDICTS`].
    pub fn has_known_verdict(&self) -> bool {
        KNOWN_VERDICTS.contains(&self.verdict.as_str())
    }
}

/// Exactly one of these is produced per `VerificationRequest`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "ReplyWire", try_from = "ReplyWire")]
pub enum VerificationOutcome {
    Success(VerificationReport),
    Failure { message: String },
}

impl VerificationOutcome {
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

impl From<Result<VerificationReport, ClaimcheckError>> for VerificationOutcome {
    fn from(result: Result<VerificationReport, ClaimcheckError>) -> Self {
        match result {
            Ok(report) => Self::Success(report),
            Err(e) => Self::failure(e.to_string()),
        }
    }
}

/// Wire shape of the relay reply:
/// `{ "success": true, "data": {...} }` or `{ "success": false, "error": "..." }`.
#[derive(Debug, Serialize, Deserialize)]
struct ReplyWire {
    success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<VerificationReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl From<VerificationOutcome> for ReplyWire {
    fn from(outcome: VerificationOutcome) -> Self {
        match outcome {
            VerificationOutcome::Success(report) => Self {
                success: true,
                data: Some(report),
                error: None,
            },
            VerificationOutcome::Failure { message } => Self {
                success: false,
                data: None,
                error: Some(message),
            },
        }
    }
}

impl TryFrom<ReplyWire> for VerificationOutcome {
    type Error = String;

    fn try_from(wire: ReplyWire) -> Result<Self, Self::Error> {
        match (wire.success, wire.data, wire.error) {
            (true, Some(report), _) => Ok(Self::Success(report)),
            (true, None, _) => Err("successful reply is missing 'data'".to_string()),
            (false, _, Some(message)) => Ok(Self::Failure { message }),
            (false, _, None) => Ok(Self::failure("unknown error")),
        }
    }
}
