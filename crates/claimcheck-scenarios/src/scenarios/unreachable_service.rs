//! Scenario 2: the verification service is not running.
//!
//! Uses the real HTTP client against a port that nothing listens on. The
//! connection is refused; the relay turns that into a failure outcome and
//! the page shows an `Error` notification carrying the transport text.

use std::sync::Arc;

use tokio::net::TcpListener;

use claimcheck_client::http::HttpVerificationClient;
use claimcheck_contracts::{
    config::ServiceConfig,
    error::{ClaimcheckError, ClaimcheckResult},
};
use claimcheck_notify::{
    notification::{Notification, ERROR_VERDICT},
    surface::DisplayTiming,
};

use crate::harness::{print_notification, Harness};
use crate::scenarios::Checks;
use crate::stub::FLAT_EARTH;

#[derive(Debug)]
pub struct Observation {
    pub endpoint: String,
    pub notification: Option<Notification>,
}

impl Observation {
    pub fn passed(&self) -> bool {
        self.notification
            .as_ref()
            .is_some_and(|n| n.verdict == ERROR_VERDICT && n.summary.contains("connection failed"))
    }
}

/// An endpoint on a local port that was free a moment ago.
async fn closed_endpoint() -> ClaimcheckResult<String> {
    let reserve = |e: std::io::Error| ClaimcheckError::Transport {
        reason: format!("could not reserve a local port: {e}"),
    };
    let listener = TcpListener::bind("127.0.0.1:0").await.map_err(reserve)?;
    let port = listener.local_addr().map_err(reserve)?.port();
    drop(listener);
    Ok(format!("http://127.0.0.1:{port}/verify"))
}

pub async fn execute() -> ClaimcheckResult<Observation> {
    let endpoint = closed_endpoint().await?;
    let client = HttpVerificationClient::new(&ServiceConfig {
        endpoint: endpoint.clone(),
        timeout_secs: 5,
        connect_timeout_secs: 2,
    })?;
    let harness = Harness::new(Arc::new(client), DisplayTiming::default());

    harness.capture.submit(FLAT_EARTH).settled().await;

    Ok(Observation {
        endpoint,
        notification: harness.current(),
    })
}

pub async fn run_scenario() -> ClaimcheckResult<()> {
    println!("=== Scenario 2: Unreachable Service ===");
    println!();

    let observed = execute().await?;
    println!("  Endpoint:  {} (nothing listening)", observed.endpoint);
    println!("  Submitted: {FLAT_EARTH:?}");
    println!();
    if let Some(notification) = &observed.notification {
        print_notification(notification);
    }
    println!();

    let mut checks = Checks::new("Unreachable Service");
    checks.check("Error notification with transport text", observed.passed());
    println!();
    println!("  Scenario 2 complete.");
    println!();
    checks.finish()
}
