//! Caller resolution.
//!
//! Maps the return address of an intercepted call to a module label so
//! log lines can say who issued the I/O. Resolution is best-effort by
//! construction: every step yields an `Option`, and the whole chain
//! bottoms out at the `"unknown"` sentinel instead of an error.

pub mod caller;
pub mod query;

pub use caller::{CallerResolver, UNKNOWN_CALLER};
pub use query::{ModuleId, ModuleQuery, ModuleSpan};
