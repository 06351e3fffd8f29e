use serde::Deserialize;

/// Rules deciding whether an opened device path is worth tracking.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct InterestConfig {
    /// Token identifying a COM-style port anywhere in the path, matched
    /// case-insensitively ("COM" matches `COM3`, `com12`, `\\.\com1`).
    pub port_token: String,
    /// Prefix used for raw device-namespace access; a path starting with
    /// it is tracked regardless of the port token.
    pub device_prefix: String,
}

impl Default for InterestConfig {
    fn default() -> Self {
        Self {
            port_token: String::from("COM"),
            device_prefix: String::from("\\\\.\\"),
        }
    }
}

/// Rules deciding which library loads are narrated and which single
/// module's address range seeds the caller-resolution fallback.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ModuleConfig {
    /// File-name tokens that make a library load interesting.
    pub tokens: Vec<String>,
    /// The one module whose base/size is recorded for caller resolution.
    pub distinguished: String,
}

impl Default for ModuleConfig {
    fn default() -> Self {
        Self {
            tokens: vec![
                String::from("tech2"),
                String::from("rs232"),
                String::from("serial"),
            ],
            distinguished: String::from("tech2.dll"),
        }
    }
}
