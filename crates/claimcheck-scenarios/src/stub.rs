//! Scripted verification service.
//!
//! Replies are keyed by the exact (trimmed) claim text. Anything unscripted
//! gets an `Unclear` verdict with no links.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::debug;

use claimcheck_contracts::{
    error::{ClaimcheckError, ClaimcheckResult},
    outcome::{ReferenceLink, VerificationReport},
    request::VerificationRequest,
};
use claimcheck_core::traits::VerificationService;

pub const FLAT_EARTH: &str = "The Earth is flat";
pub const BOILING_POINT: &str = "Water boils at 100 degrees Celsius at sea level";

/// The reply used throughout the flat earth examples.
pub fn flat_earth_report() -> VerificationReport {
    VerificationReport {
        id: None,
        verdict: "False".to_string(),
        summary: "Contradicted by evidence".to_string(),
        links: vec![ReferenceLink::new("NASA", "https://nasa.gov")],
        extra: Default::default(),
    }
}

pub fn boiling_point_report() -> VerificationReport {
    VerificationReport {
        id: Some("claim-0042".to_string()),
        verdict: "True".to_string(),
        summary: "Consistent with standard atmospheric pressure measurements".to_string(),
        links: vec![ReferenceLink::untitled(
            "https://www.usgs.gov/special-topics/water-science-school",
        )],
        extra: Default::default(),
    }
}

fn unscripted_report() -> VerificationReport {
    VerificationReport {
        id: None,
        verdict: "Unclear".to_string(),
        summary: "No reliable sources were found for this claim".to_string(),
        links: Vec::new(),
        extra: Default::default(),
    }
}

#[derive(Debug, Clone)]
enum Script {
    Report(VerificationReport),
    Fail(ClaimcheckError),
}

/// A `VerificationService` that answers from a fixed script and counts calls.
#[derive(Debug, Default)]
pub struct StubService {
    script: HashMap<String, Script>,
    calls: Mutex<Vec<String>>,
}

impl StubService {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stub preloaded with [`flat_earth_report`] and [`boiling_point_report`].
    pub fn with_known_claims() -> Self {
        Self::new()
            .reply(FLAT_EARTH, flat_earth_report())
            .reply(BOILING_POINT, boiling_point_report())
    }

    pub fn reply(mut self, claim: &str, report: VerificationReport) -> Self {
        self.script.insert(claim.to_string(), Script::Report(report));
        self
    }

    pub fn fail(mut self, claim: &str, error: ClaimcheckError) -> Self {
        self.script.insert(claim.to_string(), Script::Fail(error));
        self
    }

    /// Total number of calls received.
    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("stub call log lock poisoned").len()
    }

    /// Number of calls received for `claim`.
    pub fn calls_for(&self, claim: &str) -> usize {
        self.calls
            .lock()
            .expect("stub call log lock poisoned")
            .iter()
            .filter(|text| text.as_str() == claim)
            .count()
    }
}

#[async_trait]
impl VerificationService for StubService {
    async fn verify(&self, request: &VerificationRequest) -> ClaimcheckResult<VerificationReport> {
        self.calls
            .lock()
            .expect("stub call log lock poisoned")
            .push(request.text().to_string());
        debug!(claim = request.text(), "stub service called");

        match self.script.get(request.text()) {
            Some(Script::Report(report)) => Ok(report.clone()),
            Some(Script::Fail(error)) => Err(error.clone()),
            None => Ok(unscripted_report()),
        }
    }
}
