use std::sync::{Arc, Mutex};

use log::trace;

use super::query::{ModuleQuery, ModuleSpan};

/// Label yielded when no module can be attributed to a return address.
pub const UNKNOWN_CALLER: &str = "unknown";

struct FallbackRange {
    label: String,
    span: ModuleSpan,
}

/// Attributes an intercepted call to the module that issued it.
///
/// Primary path: ask the module table which image contains the return
/// address and take that module's file name. When the table cannot answer
/// (unmapped address, path unavailable), the recorded fallback range is
/// checked: the distinguished module's base and size, learned from load
/// observation or the startup scan. Both misses resolve to
/// [`UNKNOWN_CALLER`]; this path must never fail the calling shim.
pub struct CallerResolver {
    query: Arc<dyn ModuleQuery>,
    fallback: Mutex<Option<FallbackRange>>,
}

impl CallerResolver {
    pub fn new(query: Arc<dyn ModuleQuery>) -> Self {
        Self {
            query,
            fallback: Mutex::new(None),
        }
    }

    /// Records the distinguished module's address range for fallback
    /// attribution. Later recordings overwrite earlier ones (a module can
    /// be unloaded and reloaded at a new base).
    pub fn record_fallback(&self, label: &str, span: ModuleSpan) {
        trace!(
            "[comtap] fallback range recorded: {} base {:#x} size {:#x}",
            label,
            span.base,
            span.size
        );
        *self.fallback.lock().unwrap() = Some(FallbackRange {
            label: label.to_string(),
            span,
        });
    }

    pub fn has_fallback(&self) -> bool {
        self.fallback.lock().unwrap().is_some()
    }

    /// Best-effort attribution of `return_address` to a module label.
    pub fn resolve(&self, return_address: Option<usize>) -> String {
        let address = match return_address {
            Some(address) => address,
            None => return UNKNOWN_CALLER.to_string(),
        };

        if let Some(module) = self.query.module_at(address) {
            if let Some(path) = self.query.module_path(module) {
                return file_name_of(&path);
            }
        }

        if let Some(fallback) = self.fallback.lock().unwrap().as_ref() {
            if fallback.span.contains(address) {
                return fallback.label.clone();
            }
        }

        UNKNOWN_CALLER.to_string()
    }
}

/// Last path component, accepting both separator styles.
pub(crate) fn file_name_of(path: &str) -> String {
    match path.rsplit(['\\', '/']).next() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => path.to_string(),
    }
}
