//! Scenario 1: the hotkey on a selected false claim.
//!
//!   1. The page selection is "  The Earth is flat\n"
//!   2. Ctrl+Shift+V fires; capture trims and sends one checkFact request
//!   3. The relay calls the service, which answers `False` with a NASA link
//!   4. The page shows verdict, summary, and link in the alert tone

use std::sync::Arc;

use claimcheck_capture::Delivery;
use claimcheck_contracts::error::ClaimcheckResult;
use claimcheck_notify::{notification::Notification, surface::DisplayTiming, tone::Tone};

use crate::harness::{print_notification, Harness};
use crate::scenarios::Checks;
use crate::stub::{StubService, FLAT_EARTH};

#[derive(Debug)]
pub struct Observation {
    pub delivery: Option<Delivery>,
    pub notification: Option<Notification>,
    pub service_calls: usize,
}

impl Observation {
    pub fn passed(&self) -> bool {
        matches!(self.delivery, Some(Delivery::Rendered { .. }))
            && self.service_calls == 1
            && self.notification.as_ref().is_some_and(|n| {
                n.verdict == "False"
                    && n.tone == Tone::Alert
                    && n.summary == "Contradicted by evidence"
                    && n.links.len() == 1
                    && n.links[0].label == "NASA"
            })
    }
}

pub async fn execute() -> ClaimcheckResult<Observation> {
    let stub = Arc::new(StubService::with_known_claims());
    let harness = Harness::new(stub.clone(), DisplayTiming::default());

    let selection = Some(format!("  {FLAT_EARTH}\n"));
    let delivery = match harness.capture.on_key(true, false, true, 'v', &selection) {
        Some(dispatch) => dispatch.settled().await,
        None => None,
    };

    Ok(Observation {
        delivery,
        notification: harness.current(),
        service_calls: stub.call_count(),
    })
}

pub async fn run_scenario() -> ClaimcheckResult<()> {
    println!("=== Scenario 1: Flat Earth ===");
    println!();
    println!("  Selection: {FLAT_EARTH:?}");
    println!("  Trigger:   Ctrl+Shift+V");
    println!();

    let observed = execute().await?;
    if let Some(notification) = &observed.notification {
        print_notification(notification);
        println!("    (tone: {:?})", notification.tone);
    }
    println!();

    let mut checks = Checks::new("Flat Earth");
    checks.check("service called exactly once", observed.service_calls == 1);
    checks.check("verdict False, alert tone, NASA link", observed.passed());
    println!();
    println!("  Scenario 1 complete.");
    println!();
    checks.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn flat_earth_shows_false_verdict() {
        let observed = execute().await.unwrap();
        assert!(observed.passed(), "{observed:?}");
    }
}
