pub mod types;

pub use types::{ConfigError, HookError, SinkError, TapError};
