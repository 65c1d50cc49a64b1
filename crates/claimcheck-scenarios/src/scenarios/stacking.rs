//! Scenario 4: a second result arrives while the first is on screen.
//!
//! The first notification must be removed before the second is shown, so
//! the page never has two notifications at once.

use std::sync::Arc;

use claimcheck_contracts::error::ClaimcheckResult;
use claimcheck_notify::{notification::Notification, surface::DisplayTiming, tone::Tone};

use crate::harness::{print_notification, Harness, RenderEvent};
use crate::scenarios::Checks;
use crate::stub::{StubService, BOILING_POINT, FLAT_EARTH};

#[derive(Debug)]
pub struct Observation {
    pub events: Vec<RenderEvent>,
    pub max_visible: usize,
    pub notification: Option<Notification>,
}

impl Observation {
    /// The first notification was removed before the second was shown.
    pub fn replaced_in_order(&self) -> bool {
        match self.events.as_slice() {
            [RenderEvent::Show(first), RenderEvent::Remove(removed), RenderEvent::Show(second)] => {
                first == removed && first != second
            }
            _ => false,
        }
    }

    pub fn passed(&self) -> bool {
        self.max_visible == 1
            && self.replaced_in_order()
            && self
                .notification
                .as_ref()
                .is_some_and(|n| n.verdict == "True" && n.tone == Tone::Affirmative)
    }
}

pub async fn execute() -> ClaimcheckResult<Observation> {
    let stub = Arc::new(StubService::with_known_claims());
    let harness = Harness::new(stub, DisplayTiming::default());

    harness.capture.submit(FLAT_EARTH).settled().await;
    harness.capture.submit(BOILING_POINT).settled().await;

    Ok(Observation {
        events: harness.renderer.events(),
        max_visible: harness.renderer.max_visible(),
        notification: harness.current(),
    })
}

pub async fn run_scenario() -> ClaimcheckResult<()> {
    println!("=== Scenario 4: Replace, Don't Stack ===");
    println!();
    println!("  Submitted: {FLAT_EARTH:?}");
    println!("  Then:      {BOILING_POINT:?}");
    println!();

    let observed = execute().await?;
    for event in &observed.events {
        println!("    renderer: {event:?}");
    }
    println!();
    if let Some(notification) = &observed.notification {
        print_notification(notification);
        println!("    (tone: {:?})", notification.tone);
    }
    println!();

    let mut checks = Checks::new("Replace, Don't Stack");
    checks.check("first removed before second shown", observed.replaced_in_order());
    checks.check("never more than one visible", observed.max_visible == 1);
    println!();
    println!("  Scenario 4 complete.");
    println!();
    checks.finish()
}
