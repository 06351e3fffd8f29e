use std::fmt;

use crate::resolver::query::ModuleId;
use crate::tracking::types::RawHandle;

/// Raw OS failure code from an underlying operation, forwarded to the
/// host exactly as the real operation produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OsError(pub i32);

impl fmt::Display for OsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "os error {}", self.0)
    }
}

/// The real device I/O operations the tap wraps.
///
/// In production this is backed by trampolines to the original entry
/// points the interception facility preserved; in tests it is a mock.
/// Implementations carry whatever blocking the real operation does; the
/// tap never adds or removes any.
pub trait SerialApi: Send + Sync {
    fn open(&self, path: &str) -> Result<RawHandle, OsError>;
    fn read(&self, handle: RawHandle, buffer: &mut [u8]) -> Result<usize, OsError>;
    fn write(&self, handle: RawHandle, buffer: &[u8]) -> Result<usize, OsError>;
    fn close(&self, handle: RawHandle) -> Result<(), OsError>;
}

/// The real library-loading operations, both variants.
pub trait LibraryLoader: Send + Sync {
    fn load(&self, path: &str) -> Option<ModuleId>;
    fn load_with_flags(&self, path: &str, flags: u32) -> Option<ModuleId>;
}

/// Source of the intercepted call's return address, used to attribute a
/// call to the module that issued it.
pub trait CallOrigin: Send + Sync {
    fn return_address(&self) -> Option<usize>;
}
