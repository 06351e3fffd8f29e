use std::sync::Mutex;

use crate::capture::event_log::EventLog;
use crate::configuration::config::Config;
use crate::resolver::caller::{file_name_of, CallerResolver};
use crate::resolver::query::{ModuleId, ModuleQuery};

/// Observes library loads and the modules already present at startup.
///
/// A load is interesting when the requested file name contains one of the
/// configured tokens (case-insensitive). Observed interesting loads are
/// narrated to the event log and appended to a list; when the file name
/// contains the distinguished module's name, that module's base and size
/// are recorded into the caller resolver's fallback table.
pub struct ModuleWatch {
    tokens: Vec<String>,
    distinguished: String,
    distinguished_lower: String,
    scan_extra_token: String,
    loaded: Mutex<Vec<String>>,
}

impl ModuleWatch {
    pub fn new(config: &Config) -> Self {
        Self {
            tokens: config
                .modules
                .tokens
                .iter()
                .map(|t| t.to_lowercase())
                .collect(),
            distinguished: config.modules.distinguished.clone(),
            distinguished_lower: config.modules.distinguished.to_lowercase(),
            // The startup scan also flags modules matching the port
            // token, like already-loaded COM helper libraries.
            scan_extra_token: config.interest.port_token.to_lowercase(),
            loaded: Mutex::new(Vec::new()),
        }
    }

    /// Whether a load of `path` is worth narrating.
    pub fn matches(&self, path: &str) -> bool {
        let name = file_name_of(path).to_lowercase();
        self.tokens.iter().any(|token| name.contains(token))
    }

    /// Paths of interesting libraries observed loading, in order.
    pub fn loaded(&self) -> Vec<String> {
        self.loaded.lock().unwrap().clone()
    }

    /// Narrates a successful interesting load and records the
    /// distinguished module's span for caller resolution.
    pub fn observe_load(
        &self,
        requested: &str,
        module: ModuleId,
        query: &dyn ModuleQuery,
        resolver: &CallerResolver,
        events: &EventLog,
    ) {
        let name = file_name_of(requested);
        let full_path = query.module_path(module).unwrap_or_default();

        events.record(&format!("Loaded DLL: {}", name));
        events.record(&format!("Full path: {}", full_path));

        if name.to_lowercase().contains(&self.distinguished_lower) {
            events.record(&format!(
                "*** {} DETECTED ***",
                self.distinguished.to_uppercase()
            ));
            self.mark_distinguished(module, query, resolver, events);
        }

        self.loaded.lock().unwrap().push(requested.to_string());
    }

    /// Walks the modules already loaded in the host process and seeds the
    /// distinguished-module fact before any interception occurs.
    pub fn seed_from_process(
        &self,
        query: &dyn ModuleQuery,
        resolver: &CallerResolver,
        events: &EventLog,
    ) {
        events.record("Scanning for already loaded modules...");

        for module in query.loaded_modules() {
            let path = match query.module_path(module) {
                Some(path) => path,
                None => continue,
            };
            let name = file_name_of(&path);
            let lower = name.to_lowercase();

            let matched = self.tokens.iter().any(|token| lower.contains(token))
                || lower.contains(&self.scan_extra_token);
            if !matched {
                continue;
            }

            events.record(&format!("Found loaded module: {}", name));
            events.record(&format!("  Path: {}", path));

            if lower.contains(&self.distinguished_lower) {
                events.record(&format!(
                    "*** {} ALREADY LOADED ***",
                    self.distinguished.to_uppercase()
                ));
                self.mark_distinguished(module, query, resolver, events);
            }
        }
    }

    fn mark_distinguished(
        &self,
        module: ModuleId,
        query: &dyn ModuleQuery,
        resolver: &CallerResolver,
        events: &EventLog,
    ) {
        events.record(&format!(
            "{} loaded at address: {}",
            self.distinguished, module.0
        ));
        if let Some(span) = query.module_span(module) {
            resolver.record_fallback(&self.distinguished, span);
        }
    }
}
