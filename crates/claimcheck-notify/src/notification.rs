//! The notification view model shared by every rendering strategy.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};

use claimcheck_contracts::{
    error::ClaimcheckError,
    outcome::{ReferenceLink, VerificationOutcome},
};

use crate::tone::{classify, Tone};

/// Shown in place of the link list when the service returned no links.
pub const NO_LINKS_PLACEHOLDER: &str = "No links available";

/// Verdict label used for every failure notification.
pub const ERROR_VERDICT: &str = "Error";

pub const NOTHING_TO_VERIFY: &str = "Nothing to verify";

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Identifies one displayed notification within the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotificationId(u64);

impl NotificationId {
    fn next() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What produced the notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// A successful verification.
    Verdict,
    /// A failed exchange, at any hop.
    Error,
    /// A local notice raised without contacting the service.
    Notice,
}

/// A link as displayed: the label the user sees and where it points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkView {
    pub label: String,
    pub url: String,
}

impl LinkView {
    /// OSC 8 terminal hyperlink: clicking the label opens `url` in the browser.
    pub fn hyperlink(&self) -> String {
        format!("\x1b]8;;{}\x1b\\{}\x1b]8;;\x1b\\", self.url, self.label)
    }

    /// True when there was no usable title and the label is the URL itself.
    pub fn is_bare_url(&self) -> bool {
        self.label == self.url
    }
}

impl From<&ReferenceLink> for LinkView {
    fn from(link: &ReferenceLink) -> Self {
        Self {
            label: link.label().to_string(),
            url: link.url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub verdict: String,
    pub tone: Tone,
    pub summary: String,
    pub links: Vec<LinkView>,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    fn build(kind: NotificationKind, verdict: String, summary: String, links: Vec<LinkView>) -> Self {
        Self {
            id: NotificationId::next(),
            kind,
            tone: classify(&verdict),
            verdict,
            summary,
            links,
            created_at: Utc::now(),
        }
    }

    pub fn from_outcome(outcome: &VerificationOutcome) -> Self {
        match outcome {
            VerificationOutcome::Success(report) => Self::build(
                NotificationKind::Verdict,
                report.verdict.clone(),
                report.summary.clone(),
                report.links.iter().map(LinkView::from).collect(),
            ),
            VerificationOutcome::Failure { message } => Self::error(message.clone()),
        }
    }

    /// A failure notification labeled "Error".
    pub fn error(message: impl Into<String>) -> Self {
        Self::build(
            NotificationKind::Error,
            ERROR_VERDICT.to_string(),
            message.into(),
            Vec::new(),
        )
    }

    /// The local notice shown when a trigger found no text.
    pub fn nothing_to_verify() -> Self {
        Self::build(
            NotificationKind::Notice,
            NOTHING_TO_VERIFY.to_string(),
            "Select or enter some text, then try again.".to_string(),
            Vec::new(),
        )
    }

    pub fn from_error(error: &ClaimcheckError) -> Self {
        match error {
            ClaimcheckError::EmptyInput => Self::nothing_to_verify(),
            other => Self::error(other.to_string()),
        }
    }

    pub fn has_links(&self) -> bool {
        !self.links.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use claimcheck_contracts::outcome::VerificationReport;

    use super::*;

    #[test]
    fn flat_earth_outcome_renders_alert_verdict_with_one_link() {
        let outcome = VerificationOutcome::Success(VerificationReport {
            id: None,
            verdict: "False".to_string(),
            summary: "Contradicted by evidence".to_string(),
            links: vec![ReferenceLink::new("NASA", "https://nasa.gov")],
            extra: Default::default(),
        });
        let n = Notification::from_outcome(&outcome);
        assert_eq!(n.kind, NotificationKind::Verdict);
        assert_eq!(n.verdict, "False");
        assert_eq!(n.tone, Tone::Alert);
        assert_eq!(n.summary, "Contradicted by evidence");
        assert_eq!(
            n.links,
            vec![LinkView {
                label: "NASA".to_string(),
                url: "https://nasa.gov".to_string()
            }]
        );
    }

    #[test]
    fn failure_outcome_is_labeled_error() {
        let n = Notification::from_outcome(&VerificationOutcome::failure(
            "verification request failed: connection failed",
        ));
        assert_eq!(n.kind, NotificationKind::Error);
        assert_eq!(n.verdict, ERROR_VERDICT);
        assert_eq!(n.tone, Tone::Alert);
        assert!(n.summary.contains("connection failed"));
        assert!(!n.has_links());
    }

    #[test]
    fn empty_input_error_becomes_notice() {
        let n = Notification::from_error(&ClaimcheckError::EmptyInput);
        assert_eq!(n.kind, NotificationKind::Notice);
        assert_eq!(n.verdict, "Nothing to verify");
    }

    #[test]
    fn ids_increase() {
        let a = Notification::error("a");
        let b = Notification::error("b");
        assert!(b.id > a.id);
    }

    #[test]
    fn hyperlink_wraps_label_in_osc8() {
        let link = LinkView::from(&ReferenceLink::untitled("https://who.int"));
        assert!(link.is_bare_url());
        assert_eq!(
            link.hyperlink(),
            "\x1b]8;;https://who.int\x1b\\https://who.int\x1b]8;;\x1b\\"
        );
    }
}
