//! Scenario 5: the same claim submitted twice in quick succession.
//!
//! There is no de-duplication: both requests reach the service and each
//! gets its own exchange and its own notification.

use std::sync::Arc;

use claimcheck_capture::Delivery;
use claimcheck_contracts::error::ClaimcheckResult;
use claimcheck_notify::surface::DisplayTiming;

use crate::harness::Harness;
use crate::scenarios::Checks;
use crate::stub::{StubService, FLAT_EARTH};

#[derive(Debug)]
pub struct Observation {
    pub deliveries: Vec<Option<Delivery>>,
    pub service_calls: usize,
}

impl Observation {
    pub fn distinct_exchanges(&self) -> bool {
        let ids: Vec<_> = self
            .deliveries
            .iter()
            .filter_map(|d| match d {
                Some(Delivery::Rendered { exchange_id, .. }) => Some(*exchange_id),
                _ => None,
            })
            .collect();
        ids.len() == 2 && ids[0] != ids[1]
    }

    pub fn passed(&self) -> bool {
        self.service_calls == 2 && self.distinct_exchanges()
    }
}

pub async fn execute() -> ClaimcheckResult<Observation> {
    let stub = Arc::new(StubService::with_known_claims());
    let harness = Harness::new(stub.clone(), DisplayTiming::default());

    let first = harness.capture.submit(FLAT_EARTH);
    let second = harness.capture.submit(FLAT_EARTH);
    let (first, second) = tokio::join!(first.settled(), second.settled());

    Ok(Observation {
        deliveries: vec![first, second],
        service_calls: stub.calls_for(FLAT_EARTH),
    })
}

pub async fn run_scenario() -> ClaimcheckResult<()> {
    println!("=== Scenario 5: Repeat Request ===");
    println!();
    println!("  Submitted twice: {FLAT_EARTH:?}");
    println!();

    let observed = execute().await?;
    for delivery in observed.deliveries.iter().flatten() {
        println!("    {delivery:?}");
    }
    println!();

    let mut checks = Checks::new("Repeat Request");
    checks.check("service called twice", observed.service_calls == 2);
    checks.check("two independent exchanges", observed.distinct_exchanges());
    println!();
    println!("  Scenario 5 complete.");
    println!();
    checks.finish()
}
