use std::sync::Arc;

use crate::capture::event_log::EventLog;
use crate::capture::layout::OutputLayout;
use crate::capture::sink::CaptureSink;
use crate::capture::types::Direction;
use crate::configuration::config::Config;
use crate::error_handling::types::ConfigError;
use crate::interception::module_watch::ModuleWatch;
use crate::resolver::caller::CallerResolver;
use crate::resolver::query::ModuleQuery;
use crate::tracking::interest::InterestMatcher;
use crate::tracking::registry::HandleRegistry;
use crate::tracking::types::RawHandle;

/// The tap's entire process-scoped state, constructed once and shared by
/// reference with every shim and resolver call.
///
/// There are no free-floating globals: whoever loads the tap owns the
/// context (normally through [`super::TapController`]) and hands an `Arc`
/// to the shims. All members are individually synchronized, so the
/// context itself needs no lock.
pub struct TapContext {
    pub config: Config,
    pub query: Arc<dyn ModuleQuery>,
    pub registry: HandleRegistry,
    pub interest: InterestMatcher,
    pub events: EventLog,
    pub sink: CaptureSink,
    pub resolver: CallerResolver,
    pub modules: ModuleWatch,
}

impl TapContext {
    pub fn new(config: Config, query: Arc<dyn ModuleQuery>) -> Result<Self, ConfigError> {
        let layout = Arc::new(OutputLayout::new(&config));
        Ok(Self {
            registry: HandleRegistry::new(),
            interest: InterestMatcher::new(&config.interest)?,
            events: EventLog::new(Arc::clone(&layout)),
            sink: CaptureSink::new(layout),
            resolver: CallerResolver::new(Arc::clone(&query)),
            modules: ModuleWatch::new(&config),
            query,
            config,
        })
    }

    /// Persists one transfer through the sink and narrates the outcome.
    ///
    /// Capture is best-effort observability: a failed write is noted in
    /// the event log and otherwise swallowed, so the host-visible result
    /// of the intercepted call is never affected.
    pub(crate) fn capture_transfer(
        &self,
        payload: &[u8],
        direction: Direction,
        handle: RawHandle,
    ) {
        match self.sink.capture(payload, direction, handle) {
            Ok(path) => self.events.record(&format!(
                "Saved {} bytes to {}",
                payload.len(),
                path.display()
            )),
            Err(e) => self.events.record(&format!("Error saving data: {}", e)),
        }
    }
}
