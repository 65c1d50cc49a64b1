//! # claimcheck-notify
//!
//! The notification surface for claimcheck.
//!
//! - [`tone`] — two-way verdict classification (affirmative vs alert)
//! - [`notification`] — the view model built from an outcome or a local error
//! - [`render`] — blocking alert and overlay panel strategies
//! - [`surface`] — the `Absent → Visible → Fading → Absent` lifecycle with
//!   "replace, don't stack"
//!
//! ```rust,ignore
//! use claimcheck_notify::{render::OverlayRenderer, surface::NotificationSurface};
//!
//! let overlay = Arc::new(OverlayRenderer::new());
//! let surface = NotificationSurface::new(overlay.clone(), config.notification.clone().into());
//! surface.show(Notification::from_outcome(&outcome));
//! ```

pub mod notification;
pub mod render;
pub mod surface;
pub mod tone;

pub use notification::Notification;
pub use surface::NotificationSurface;
