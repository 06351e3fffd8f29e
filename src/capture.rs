//! Capture subsystem.
//!
//! Everything the tap persists lives here: the append-only event log, the
//! per-transfer binary capture artifacts, the offset-annotated hex
//! rendering used in log lines, and the shared directory layout both
//! outputs are written under.
//!
//! The sink and the log are deliberately dumb: they own no
//! cross-referencing state and receive everything they need as call
//! parameters. Both are best-effort: a failed write degrades to the
//! ambient `log` channel and never reaches the host.

pub mod event_log;
pub mod hex;
pub mod layout;
pub mod sink;
pub mod types;

pub use event_log::EventLog;
pub use hex::hex_dump;
pub use layout::OutputLayout;
pub use sink::CaptureSink;
pub use types::Direction;
