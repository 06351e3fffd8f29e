use std::fmt;

/// Opaque, process-unique identity of an OS handle.
///
/// The numeric value is only meaningful inside the host process and may be
/// reused by the OS after a close; the registry models that lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawHandle(pub u64);

impl fmt::Display for RawHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
