use log::{debug, error};

use crate::error_handling::types::HookError;

/// The entry points the tap redirects, in attach order.
pub const HOOK_TARGETS: &[&str] = &["open", "read", "write", "close", "load", "load_with_flags"];

/// The platform's entry-point patching mechanism.
///
/// `attach` redirects the named target to the tap's wrapper while
/// preserving a path back to the original; `detach` undoes it. A zero
/// status means success; anything else is the facility's own error code,
/// reported upward untouched.
pub trait InterceptionFacility: Send + Sync {
    fn attach(&mut self, target: &'static str) -> i32;
    fn detach(&mut self, target: &'static str) -> i32;
}

/// Attaches every hook as an all-or-nothing batch.
///
/// On the first non-zero status the already-attached prefix is detached
/// (best effort) and the batch fails: the tap must never run partially
/// hooked.
pub fn install_hooks(facility: &mut dyn InterceptionFacility) -> Result<(), HookError> {
    for (index, target) in HOOK_TARGETS.iter().copied().enumerate() {
        let status = facility.attach(target);
        if status != 0 {
            error!(
                "[comtap] attach failed for {} (status {}), rolling back {} hook(s)",
                target, status, index
            );
            for attached in HOOK_TARGETS[..index].iter().copied().rev() {
                let rollback = facility.detach(attached);
                if rollback != 0 {
                    error!(
                        "[comtap] rollback detach failed for {} (status {})",
                        attached, rollback
                    );
                }
            }
            return Err(HookError::AttachFailed { target, status });
        }
        debug!("[comtap] attached {}", target);
    }
    Ok(())
}

/// Detaches every hook, attempting all of them even after a failure, and
/// reports the first failure if any.
pub fn remove_hooks(facility: &mut dyn InterceptionFacility) -> Result<(), HookError> {
    let mut first_failure = None;
    for target in HOOK_TARGETS.iter().copied() {
        let status = facility.detach(target);
        if status != 0 {
            error!("[comtap] detach failed for {} (status {})", target, status);
            if first_failure.is_none() {
                first_failure = Some(HookError::DetachFailed { target, status });
            }
        }
    }
    match first_failure {
        None => Ok(()),
        Some(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Facility stub that fails on configured targets and records calls.
    struct StubFacility {
        fail_attach: Option<&'static str>,
        fail_detach: Option<&'static str>,
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl StubFacility {
        fn new() -> Self {
            Self {
                fail_attach: None,
                fail_detach: None,
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl InterceptionFacility for StubFacility {
        fn attach(&mut self, target: &'static str) -> i32 {
            self.calls.lock().unwrap().push(format!("attach:{}", target));
            if self.fail_attach == Some(target) {
                87
            } else {
                0
            }
        }

        fn detach(&mut self, target: &'static str) -> i32 {
            self.calls.lock().unwrap().push(format!("detach:{}", target));
            if self.fail_detach == Some(target) {
                6
            } else {
                0
            }
        }
    }

    #[test]
    fn install_attaches_every_target_in_order() {
        let mut facility = StubFacility::new();
        install_hooks(&mut facility).unwrap();

        let expected: Vec<String> = HOOK_TARGETS
            .iter()
            .map(|t| format!("attach:{}", t))
            .collect();
        assert_eq!(facility.calls(), expected);
    }

    #[test]
    fn mid_batch_failure_rolls_back_attached_prefix() {
        let mut facility = StubFacility::new();
        facility.fail_attach = Some("write");

        let err = install_hooks(&mut facility).unwrap_err();
        match err {
            HookError::AttachFailed { target, status } => {
                assert_eq!(target, "write");
                assert_eq!(status, 87);
            }
            other => panic!("unexpected error: {:?}", other),
        }

        // open and read were attached before write failed; both are
        // detached again, most recent first.
        assert_eq!(
            facility.calls(),
            vec![
                "attach:open",
                "attach:read",
                "attach:write",
                "detach:read",
                "detach:open",
            ]
        );
    }

    #[test]
    fn remove_attempts_all_targets_and_reports_first_failure() {
        let mut facility = StubFacility::new();
        facility.fail_detach = Some("read");

        let err = remove_hooks(&mut facility).unwrap_err();
        match err {
            HookError::DetachFailed { target, status } => {
                assert_eq!(target, "read");
                assert_eq!(status, 6);
            }
            other => panic!("unexpected error: {:?}", other),
        }

        // All six targets were still attempted.
        assert_eq!(facility.calls().len(), HOOK_TARGETS.len());
    }

    #[test]
    fn remove_of_clean_batch_succeeds() {
        let mut facility = StubFacility::new();
        remove_hooks(&mut facility).unwrap();
        assert_eq!(facility.calls().len(), HOOK_TARGETS.len());
    }
}
