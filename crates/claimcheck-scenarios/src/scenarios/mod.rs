//! End-to-end scenarios.
//!
//! Each module exposes `execute()`, which runs the pipeline and returns what
//! was observed, and `run_scenario()`, which prints a walk-through for the
//! CLI.

pub mod dwell_expiry;
pub mod empty_selection;
pub mod flat_earth;
pub mod repeat_request;
pub mod stacking;
pub mod unreachable_service;

use claimcheck_contracts::error::{ClaimcheckError, ClaimcheckResult};

/// PASS/FAIL lines for one scenario's expectations.
#[derive(Debug)]
pub(crate) struct Checks {
    scenario: &'static str,
    failed: usize,
}

impl Checks {
    pub(crate) fn new(scenario: &'static str) -> Self {
        Self { scenario, failed: 0 }
    }

    pub(crate) fn check(&mut self, label: &str, ok: bool) {
        println!("  {label:<42} {}", if ok { "PASS" } else { "FAIL" });
        if !ok {
            self.failed += 1;
        }
    }

    /// `Err` if any expectation failed.
    pub(crate) fn finish(self) -> ClaimcheckResult<()> {
        match self.failed {
            0 => Ok(()),
            failed => Err(ClaimcheckError::Scenario {
                name: self.scenario.to_string(),
                failed,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_passing_checks_finish_ok() {
        let mut checks = Checks::new("Flat Earth");
        checks.check("service called exactly once", true);
        checks.check("verdict shown", true);
        assert_eq!(checks.finish(), Ok(()));
    }

    #[test]
    fn a_failed_check_fails_the_scenario() {
        let mut checks = Checks::new("Stacking");
        checks.check("first removed before second shown", false);
        checks.check("never more than one visible", true);
        checks.check("no error", false);
        let err = checks.finish().unwrap_err();
        assert_eq!(
            err,
            ClaimcheckError::Scenario {
                name: "Stacking".to_string(),
                failed: 2,
            }
        );
        assert_eq!(err.to_string(), "scenario 'Stacking' failed 2 check(s)");
    }
}
