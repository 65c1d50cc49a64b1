//! Scenario 6: nobody touches the notification.
//!
//! After the dwell time it starts fading, and after the fade it is gone. The
//! timings are shortened so the walk-through finishes quickly.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{timeout, Instant};

use claimcheck_contracts::error::{ClaimcheckError, ClaimcheckResult};
use claimcheck_notify::surface::DisplayTiming;

use crate::harness::{Harness, RenderEvent};
use crate::scenarios::Checks;
use crate::stub::{StubService, FLAT_EARTH};

pub const TIMING: DisplayTiming = DisplayTiming {
    dwell: Duration::from_millis(300),
    fade: Duration::from_millis(100),
};

#[derive(Debug)]
pub struct Observation {
    pub events: Vec<RenderEvent>,
    pub elapsed: Duration,
    pub absent: bool,
}

impl Observation {
    /// Shown, then faded, then removed, all for the same notification.
    pub fn faded_then_removed(&self) -> bool {
        match self.events.as_slice() {
            [RenderEvent::Show(a), RenderEvent::BeginFade(b), RenderEvent::Remove(c)] => {
                a == b && b == c
            }
            _ => false,
        }
    }

    pub fn passed(&self) -> bool {
        self.absent && self.faded_then_removed() && self.elapsed >= TIMING.dwell + TIMING.fade
    }
}

pub async fn execute() -> ClaimcheckResult<Observation> {
    let stub = Arc::new(StubService::with_known_claims());
    let harness = Harness::new(stub, TIMING);

    let started = Instant::now();
    harness.capture.submit(FLAT_EARTH).settled().await;

    let mut state = harness.surface.subscribe();
    let limit = (TIMING.dwell + TIMING.fade) * 10;
    timeout(limit, state.wait_for(|s| s.is_absent()))
        .await
        .map_err(|_| ClaimcheckError::Channel {
            reason: format!("notification still visible after {limit:?}"),
        })?
        .map_err(|e| ClaimcheckError::Channel {
            reason: e.to_string(),
        })?;

    Ok(Observation {
        events: harness.renderer.events(),
        elapsed: started.elapsed(),
        absent: harness.surface.state().is_absent(),
    })
}

pub async fn run_scenario() -> ClaimcheckResult<()> {
    println!("=== Scenario 6: Dwell Expiry ===");
    println!();
    println!("  Dwell: {:?}, fade: {:?}", TIMING.dwell, TIMING.fade);
    println!();

    let observed = execute().await?;
    for event in &observed.events {
        println!("    renderer: {event:?}");
    }
    println!("    gone after ~{} ms", observed.elapsed.as_millis());
    println!();

    let mut checks = Checks::new("Dwell Expiry");
    checks.check("visible → fading → absent", observed.faded_then_removed());
    checks.check("removed without interaction", observed.absent);
    println!();
    println!("  Scenario 6 complete.");
    println!();
    checks.finish()
}
