//! comtap: correlation core of a serial/COM-port traffic tap.
//!
//! The crate rides along inside a host process behind an entry-point
//! interception facility. It tracks which OS handles were opened against
//! serial-device paths, records every transfer on those handles to disk,
//! narrates lifecycle events to an append-only log, and attributes each
//! intercepted call to the module that issued it, all without changing
//! any result the host observes.
//!
//! The platform is kept at arm's length: the patching mechanism, the real
//! I/O operations, and the module/address queries are all traits
//! ([`interception::InterceptionFacility`], [`interception::SerialApi`],
//! [`resolver::ModuleQuery`], ...), so the same core runs under a
//! Detours-style facility in production and under mocks in tests.

pub mod capture;
pub use capture::{hex_dump, CaptureSink, Direction, EventLog, OutputLayout};

pub mod configuration;
pub use configuration::{Config, InterestConfig, ModuleConfig};

pub mod controller;
pub use controller::{TapContext, TapController};

pub mod error_handling;
pub use error_handling::{ConfigError, HookError, SinkError, TapError};

pub mod interception;
pub use interception::{
    install_hooks, remove_hooks, CallOrigin, InterceptionFacility, LibraryLoader, ModuleWatch,
    OsError, SerialApi, SerialTap, HOOK_TARGETS,
};

pub mod resolver;
pub use resolver::{CallerResolver, ModuleId, ModuleQuery, ModuleSpan, UNKNOWN_CALLER};

pub mod tracking;
pub use tracking::{HandleRegistry, InterestMatcher, RawHandle};
