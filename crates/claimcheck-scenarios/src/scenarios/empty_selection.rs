//! Scenario 3: triggers with nothing to verify.
//!
//! No selection, an empty selection, and a whitespace-only manual entry.
//! Each one is handled on the page with a local notice; the service is never
//! called.

use std::sync::Arc;

use claimcheck_contracts::error::ClaimcheckResult;
use claimcheck_notify::{
    notification::{NotificationKind, NOTHING_TO_VERIFY},
    surface::DisplayTiming,
};

use crate::harness::Harness;
use crate::scenarios::Checks;
use crate::stub::StubService;

#[derive(Debug)]
pub struct Observation {
    /// One entry per trigger: (description, rejected, notice shown).
    pub attempts: Vec<(&'static str, bool, bool)>,
    pub service_calls: usize,
}

impl Observation {
    pub fn passed(&self) -> bool {
        self.service_calls == 0
            && self
                .attempts
                .iter()
                .all(|&(_, rejected, notice)| rejected && notice)
    }
}

pub async fn execute() -> ClaimcheckResult<Observation> {
    let stub = Arc::new(StubService::with_known_claims());
    let harness = Harness::new(stub.clone(), DisplayTiming::default());

    let notice_shown = |harness: &Harness| {
        harness
            .current()
            .is_some_and(|n| n.kind == NotificationKind::Notice && n.verdict == NOTHING_TO_VERIFY)
    };

    let mut attempts = Vec::new();

    let dispatch = harness.capture.on_control(&None::<String>);
    attempts.push(("control, no selection", dispatch.is_rejected(), notice_shown(&harness)));
    harness.surface.dismiss();

    let dispatch = harness
        .capture
        .on_key(true, false, true, 'v', &Some(String::new()))
        .map(|d| d.is_rejected())
        .unwrap_or(false);
    attempts.push(("hotkey, empty selection", dispatch, notice_shown(&harness)));
    harness.surface.dismiss();

    let dispatch = harness.capture.submit(" \n\t ");
    attempts.push(("manual entry, whitespace", dispatch.is_rejected(), notice_shown(&harness)));

    Ok(Observation {
        attempts,
        service_calls: stub.call_count(),
    })
}

pub async fn run_scenario() -> ClaimcheckResult<()> {
    println!("=== Scenario 3: Empty Selection ===");
    println!();

    let observed = execute().await?;
    let mut checks = Checks::new("Empty Selection");
    for (label, rejected, notice) in &observed.attempts {
        checks.check(label, *rejected && *notice);
    }
    checks.check("no network call made", observed.service_calls == 0);
    println!();
    println!("  Scenario 3 complete.");
    println!();
    checks.finish()
}
