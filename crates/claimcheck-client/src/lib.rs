//! # claimcheck-client
//!
//! The verification client used by the relay.
//!
//! [`http::HttpVerificationClient`] implements
//! [`claimcheck_core::traits::VerificationService`]: one JSON `POST` per
//! claim, no retries. The response body is checked in two phases:
//!
//! 1. **Parse** — the body must be JSON.
//! 2. **Structure** — JSON Schema validation via the `jsonschema` crate, so a
//!    malformed body is reported with the offending path.
//!
//! ```rust,ignore
//! use claimcheck_client::http::HttpVerificationClient;
//!
//! let client = HttpVerificationClient::new(&config.service)?;
//! let report = client.verify(&request).await?;
//! ```

pub mod http;
pub mod schema;
