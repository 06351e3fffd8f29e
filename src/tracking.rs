//! Handle tracking core module.
//!
//! Single source of truth for "is this handle interesting": the registry
//! maps live OS handles to the device path they were opened with, and the
//! interest matcher decides, once per open, whether a path qualifies.

pub mod interest;
pub mod registry;
pub mod types;

pub use interest::InterestMatcher;
pub use registry::HandleRegistry;
pub use types::RawHandle;
