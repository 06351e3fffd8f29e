use std::sync::Arc;

use log::{error, info};

use super::context::TapContext;
use crate::configuration::config::Config;
use crate::error_handling::types::TapError;
use crate::interception::api::{CallOrigin, LibraryLoader, SerialApi};
use crate::interception::facility::{install_hooks, remove_hooks, InterceptionFacility};
use crate::interception::shims::SerialTap;
use crate::resolver::query::ModuleQuery;

/// Drives the tap's lifecycle inside the host process.
///
/// `startup` runs once when the host loads the tap: it opens the session
/// log, scans the modules already present, and installs the hook batch,
/// all-or-nothing; a partial batch is rolled back and reported as fatal.
/// `shutdown` detaches the batch and closes the log. Between the two the
/// controller does nothing; all work happens inline in the shims on the
/// host's own threads.
pub struct TapController {
    ctx: Arc<TapContext>,
    hooked: bool,
}

impl TapController {
    pub fn new(config: Config, query: Arc<dyn ModuleQuery>) -> Result<Self, TapError> {
        let ctx = TapContext::new(config, query)?;
        Ok(Self {
            ctx: Arc::new(ctx),
            hooked: false,
        })
    }

    pub fn context(&self) -> Arc<TapContext> {
        Arc::clone(&self.ctx)
    }

    /// Builds the shim layer over the real operations. The facility's
    /// wrappers delegate here; tests drive it directly with mocks.
    pub fn tap(
        &self,
        inner: Arc<dyn SerialApi>,
        loader: Arc<dyn LibraryLoader>,
        origin: Arc<dyn CallOrigin>,
    ) -> SerialTap {
        SerialTap::new(inner, loader, origin, Arc::clone(&self.ctx))
    }

    pub fn startup(&mut self, facility: &mut dyn InterceptionFacility) -> Result<(), TapError> {
        self.ctx.events.record("Attached to host process");
        self.ctx
            .modules
            .seed_from_process(self.ctx.query.as_ref(), &self.ctx.resolver, &self.ctx.events);

        match install_hooks(facility) {
            Ok(()) => {
                self.hooked = true;
                self.ctx.events.record("Hooks installed successfully");
                info!("[comtap] hooks installed");
                Ok(())
            }
            Err(e) => {
                self.ctx.events.record(&format!("Error attaching hooks: {}", e));
                error!("[comtap] startup aborted: {}", e);
                Err(e.into())
            }
        }
    }

    pub fn shutdown(&mut self, facility: &mut dyn InterceptionFacility) -> Result<(), TapError> {
        let mut result = Ok(());
        if self.hooked {
            if let Err(e) = remove_hooks(facility) {
                self.ctx.events.record(&format!("Error detaching hooks: {}", e));
                result = Err(e.into());
            }
            self.hooked = false;
        }
        self.ctx.events.record("Detached from host process");
        self.ctx.events.close();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::query::{ModuleId, ModuleSpan};
    use std::fs;
    use tempfile::TempDir;

    struct EmptyQuery;

    impl ModuleQuery for EmptyQuery {
        fn module_at(&self, _address: usize) -> Option<ModuleId> {
            None
        }
        fn module_path(&self, _module: ModuleId) -> Option<String> {
            None
        }
        fn module_span(&self, _module: ModuleId) -> Option<ModuleSpan> {
            None
        }
        fn loaded_modules(&self) -> Vec<ModuleId> {
            Vec::new()
        }
    }

    struct StubFacility {
        fail_attach: Option<&'static str>,
        attached: Vec<&'static str>,
    }

    impl InterceptionFacility for StubFacility {
        fn attach(&mut self, target: &'static str) -> i32 {
            if self.fail_attach == Some(target) {
                return -1;
            }
            self.attached.push(target);
            0
        }
        fn detach(&mut self, target: &'static str) -> i32 {
            self.attached.retain(|t| *t != target);
            0
        }
    }

    fn controller_in(tmp: &TempDir) -> TapController {
        let config = Config {
            output_root: tmp.path().to_path_buf(),
            ..Config::default()
        };
        TapController::new(config, Arc::new(EmptyQuery)).unwrap()
    }

    #[test]
    fn startup_installs_batch_and_writes_session_narrative() {
        let tmp = TempDir::new().unwrap();
        let mut controller = controller_in(&tmp);
        let mut facility = StubFacility {
            fail_attach: None,
            attached: Vec::new(),
        };

        controller.startup(&mut facility).unwrap();
        assert_eq!(facility.attached.len(), 6);

        let ctx = controller.context();
        let text = fs::read_to_string(ctx.events.path().unwrap()).unwrap();
        assert!(text.starts_with("COM port tap - Started at "));
        assert!(text.contains("Attached to host process"));
        assert!(text.contains("Scanning for already loaded modules..."));
        assert!(text.contains("Hooks installed successfully"));
    }

    #[test]
    fn failed_attach_is_fatal_and_leaves_nothing_hooked() {
        let tmp = TempDir::new().unwrap();
        let mut controller = controller_in(&tmp);
        let mut facility = StubFacility {
            fail_attach: Some("close"),
            attached: Vec::new(),
        };

        let err = controller.startup(&mut facility).unwrap_err();
        assert!(matches!(err, TapError::Hook(_)));
        assert!(facility.attached.is_empty(), "partial batch must roll back");

        let ctx = controller.context();
        let text = fs::read_to_string(ctx.events.path().unwrap()).unwrap();
        assert!(text.contains("Error attaching hooks: Attach failed for close: status -1"));
    }

    #[test]
    fn shutdown_detaches_and_closes_the_log() {
        let tmp = TempDir::new().unwrap();
        let mut controller = controller_in(&tmp);
        let mut facility = StubFacility {
            fail_attach: None,
            attached: Vec::new(),
        };

        controller.startup(&mut facility).unwrap();
        controller.shutdown(&mut facility).unwrap();
        assert!(facility.attached.is_empty());

        let ctx = controller.context();
        let text = fs::read_to_string(ctx.events.path().unwrap()).unwrap();
        assert!(text.contains("Detached from host process"));

        // The log is closed; later events no longer reach the file.
        ctx.events.record("late event");
        let text = fs::read_to_string(ctx.events.path().unwrap()).unwrap();
        assert!(!text.contains("late event"));
    }
}
