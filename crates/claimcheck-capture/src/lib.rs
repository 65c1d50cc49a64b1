//! # claimcheck-capture
//!
//! Turns a user action into at most one verification exchange and routes
//! the single reply to the surface's notification.
//!
//! One [`TriggerCapture`] serves every host. The host decides how the result
//! looks by the renderer it gave its `NotificationSurface`; capture only
//! decides *whether* to send and *where* the reply goes.

pub mod capture;

pub use capture::{Delivery, Dispatch, TriggerCapture, TriggerSource};
