use std::fmt;

#[derive(Debug)]
pub enum ConfigError {
    IoError(std::io::Error),
    TomlError(String),
    EmptyPortToken(String),
    EmptyModuleTokens(String),
    EmptyDistinguishedModule(String),
    BadToken(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::TomlError(e) => write!(f, "TOML parsing error: {}", e),
            ConfigError::EmptyPortToken(e) => write!(f, "Port token error: {}", e),
            ConfigError::EmptyModuleTokens(e) => write!(f, "Module tokens error: {}", e),
            ConfigError::EmptyDistinguishedModule(e) => {
                write!(f, "Distinguished module error: {}", e)
            }
            ConfigError::BadToken(e) => write!(f, "Token error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::IoError(err)
    }
}

/// Errors raised while installing or removing the interception batch.
///
/// A non-zero status from the facility is fatal for the whole batch: the
/// tap must never run partially hooked.
#[derive(Debug)]
pub enum HookError {
    AttachFailed { target: &'static str, status: i32 },
    DetachFailed { target: &'static str, status: i32 },
}

impl fmt::Display for HookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookError::AttachFailed { target, status } => {
                write!(f, "Attach failed for {}: status {}", target, status)
            }
            HookError::DetachFailed { target, status } => {
                write!(f, "Detach failed for {}: status {}", target, status)
            }
        }
    }
}

impl std::error::Error for HookError {}

#[derive(Debug)]
pub enum SinkError {
    WriteFailed(std::io::Error),
    NoCaptureDirectory,
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkError::WriteFailed(e) => write!(f, "Capture write failed: {}", e),
            SinkError::NoCaptureDirectory => write!(f, "Capture directory unavailable"),
        }
    }
}

impl std::error::Error for SinkError {}

impl From<std::io::Error> for SinkError {
    fn from(err: std::io::Error) -> Self {
        SinkError::WriteFailed(err)
    }
}

#[derive(Debug)]
pub enum TapError {
    Config(ConfigError),
    Hook(HookError),
}

impl fmt::Display for TapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TapError::Config(e) => write!(f, "Configuration error: {}", e),
            TapError::Hook(e) => write!(f, "Hook error: {}", e),
        }
    }
}

impl std::error::Error for TapError {}

impl From<ConfigError> for TapError {
    fn from(err: ConfigError) -> Self {
        TapError::Config(err)
    }
}

impl From<HookError> for TapError {
    fn from(err: HookError) -> Self {
        TapError::Hook(err)
    }
}
