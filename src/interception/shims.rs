use std::sync::Arc;

use super::api::{CallOrigin, LibraryLoader, OsError, SerialApi};
use crate::capture::hex::hex_dump;
use crate::capture::types::Direction;
use crate::controller::context::TapContext;
use crate::resolver::query::ModuleId;
use crate::tracking::types::RawHandle;

/// The shim layer: every intercepted operation lands here, does its
/// bookkeeping, and forwards to the real operation.
///
/// Each wrapper has the same fixed shape: snapshot the registry's view of
/// the handle, narrate what is about to happen (for writes this includes
/// the payload, which is only available before the call), invoke the
/// inner operation, then narrate and record the outcome (for reads the
/// payload only exists afterwards). The inner result is always returned
/// untouched, success or failure.
pub struct SerialTap {
    inner: Arc<dyn SerialApi>,
    loader: Arc<dyn LibraryLoader>,
    origin: Arc<dyn CallOrigin>,
    ctx: Arc<TapContext>,
}

impl SerialTap {
    pub fn new(
        inner: Arc<dyn SerialApi>,
        loader: Arc<dyn LibraryLoader>,
        origin: Arc<dyn CallOrigin>,
        ctx: Arc<TapContext>,
    ) -> Self {
        Self {
            inner,
            loader,
            origin,
            ctx,
        }
    }

    fn caller(&self) -> String {
        self.ctx.resolver.resolve(self.origin.return_address())
    }
}

impl SerialApi for SerialTap {
    fn open(&self, path: &str) -> Result<RawHandle, OsError> {
        let result = self.inner.open(path);

        // A failed open leaves no trace; the interest decision is made
        // once here and frozen in the registry for the handle's lifetime.
        if let Ok(handle) = result {
            if self.ctx.interest.is_interesting(path) {
                self.ctx.registry.register(handle, path);
                self.ctx.events.record(&format!(
                    "COM port opened: {}, handle: {}, called by: {}",
                    path,
                    handle,
                    self.caller()
                ));
            }
        }

        result
    }

    fn read(&self, handle: RawHandle, buffer: &mut [u8]) -> Result<usize, OsError> {
        let tracked = self.ctx.registry.lookup(handle);

        if let Some(port) = &tracked {
            self.ctx.events.record(&format!(
                "Reading from {}, buffer size: {}, called by: {}",
                port,
                buffer.len(),
                self.caller()
            ));
        }

        let result = self.inner.read(handle, buffer);

        if let (Some(port), Ok(count)) = (&tracked, &result) {
            if *count > 0 {
                let payload = &buffer[..*count];
                self.ctx.events.record(&format!(
                    "Read {} bytes from {}:\n{}",
                    count,
                    port,
                    hex_dump(payload)
                ));
                self.ctx.capture_transfer(payload, Direction::Read, handle);
            }
        }

        result
    }

    fn write(&self, handle: RawHandle, buffer: &[u8]) -> Result<usize, OsError> {
        let tracked = self.ctx.registry.lookup(handle);

        if let Some(port) = &tracked {
            self.ctx.events.record(&format!(
                "Writing {} bytes to {}, called by: {}\n{}",
                buffer.len(),
                port,
                self.caller(),
                hex_dump(buffer)
            ));
            if !buffer.is_empty() {
                self.ctx.capture_transfer(buffer, Direction::Write, handle);
            }
        }

        let result = self.inner.write(handle, buffer);

        if tracked.is_some() {
            let (ok, written) = match &result {
                Ok(count) => (true, *count),
                Err(_) => (false, 0),
            };
            self.ctx.events.record(&format!(
                "Write result: {}, bytes written: {}",
                ok, written
            ));
        }

        result
    }

    fn close(&self, handle: RawHandle) -> Result<(), OsError> {
        let tracked = self.ctx.registry.lookup(handle);

        if let Some(port) = &tracked {
            self.ctx.events.record(&format!(
                "Closing COM port: {}, handle: {}, called by: {}",
                port,
                handle,
                self.caller()
            ));
        }

        let result = self.inner.close(handle);

        // A failed close keeps the entry: the handle is still live and
        // later traffic on it must stay tracked.
        if result.is_ok() && tracked.is_some() {
            self.ctx.registry.remove(handle);
            self.ctx.events.record("COM port closed");
        }

        result
    }
}

impl LibraryLoader for SerialTap {
    fn load(&self, path: &str) -> Option<ModuleId> {
        let matched = self.ctx.modules.matches(path);
        if matched {
            self.ctx
                .events
                .record(&format!("Library load requested: {}", path));
        }

        let module = self.loader.load(path);

        if let Some(module) = module {
            if matched {
                self.ctx.modules.observe_load(
                    path,
                    module,
                    self.ctx.query.as_ref(),
                    &self.ctx.resolver,
                    &self.ctx.events,
                );
            }
        }

        module
    }

    fn load_with_flags(&self, path: &str, flags: u32) -> Option<ModuleId> {
        let matched = self.ctx.modules.matches(path);
        if matched {
            self.ctx.events.record(&format!(
                "Library load with flags {:#x} requested: {}",
                flags, path
            ));
        }

        let module = self.loader.load_with_flags(path, flags);

        if let Some(module) = module {
            if matched {
                self.ctx.modules.observe_load(
                    path,
                    module,
                    self.ctx.query.as_ref(),
                    &self.ctx.resolver,
                    &self.ctx.events,
                );
            }
        }

        module
    }
}
