//! Tap lifecycle.
//!
//! [`context::TapContext`] is the one process-scoped bundle of shared
//! state; [`controller_handler::TapController`] drives startup (session
//! header, module scan, hook batch) and shutdown (detach, log close).

pub mod context;
pub mod controller_handler;

pub use context::TapContext;
pub use controller_handler::TapController;
