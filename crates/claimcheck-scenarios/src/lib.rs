//! # claimcheck-scenarios
//!
//! Reference scenarios that drive the whole pipeline
//! (capture → relay → service → notification) end to end:
//!
//! 1. **Flat earth** — a scripted `False` verdict with one titled link.
//! 2. **Unreachable service** — the real HTTP client pointed at a closed
//!    port; the user sees an `Error` notification with the transport text.
//! 3. **Empty selection** — blank input never leaves the page.
//! 4. **Stacking** — a second result replaces the first instead of piling up.
//! 5. **Repeat request** — the same claim twice gives two independent outcomes.
//! 6. **Dwell expiry** — an untouched notification fades and disappears.
//!
//! Every scenario except the second uses [`stub::StubService`], so no
//! network is needed.

pub mod harness;
pub mod scenarios;
pub mod stub;
