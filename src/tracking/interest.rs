use crate::configuration::types::InterestConfig;
use crate::error_handling::types::ConfigError;
use regex::{Regex, RegexBuilder};

/// The frozen open-time predicate deciding whether a device path is
/// tracked.
///
/// A path qualifies when it contains a case-insensitive occurrence of the
/// configured port token, or when it starts with the device-namespace
/// prefix. The decision is made once, when a handle is opened, and stored
/// in the registry; reconfiguring the matcher never affects handles that
/// are already open.
#[derive(Debug)]
pub struct InterestMatcher {
    port_token: Regex,
    device_prefix: String,
}

impl InterestMatcher {
    pub fn new(config: &InterestConfig) -> Result<Self, ConfigError> {
        let port_token = RegexBuilder::new(&regex::escape(&config.port_token))
            .case_insensitive(true)
            .build()
            .map_err(|e| ConfigError::BadToken(e.to_string()))?;
        Ok(Self {
            port_token,
            device_prefix: config.device_prefix.clone(),
        })
    }

    pub fn is_interesting(&self, path: &str) -> bool {
        self.port_token.is_match(path) || path.starts_with(&self.device_prefix)
    }
}
