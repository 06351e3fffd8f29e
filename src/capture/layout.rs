use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use log::warn;

use crate::configuration::config::Config;

const LOG_DIR_NAME: &str = "logs";
const CAPTURE_DIR_NAME: &str = "captured_data";
const FALLBACK_SUBDIR: &str = "comtap";

/// The two sibling output directories, resolved once.
#[derive(Debug, Clone)]
pub struct Dirs {
    pub log_dir: PathBuf,
    pub capture_dir: PathBuf,
}

/// Shared directory layout for the event log and the capture sink.
///
/// Directories are created on first use under the configured root; if that
/// fails, both fall back together to a subdirectory of the system temp
/// directory. Resolution happens exactly once per process and is safe to
/// trigger redundantly from any first-touch site.
#[derive(Debug)]
pub struct OutputLayout {
    preferred_root: PathBuf,
    fallback_root: PathBuf,
    resolved: OnceLock<Dirs>,
}

impl OutputLayout {
    pub fn new(config: &Config) -> Self {
        Self {
            preferred_root: config.output_root.clone(),
            fallback_root: std::env::temp_dir().join(FALLBACK_SUBDIR),
            resolved: OnceLock::new(),
        }
    }

    /// Resolves (creating if needed) the output directories.
    pub fn dirs(&self) -> &Dirs {
        self.resolved.get_or_init(|| {
            match Self::create_under(&self.preferred_root) {
                Ok(dirs) => dirs,
                Err(e) => {
                    warn!(
                        "[comtap] cannot create output dirs under {}: {}; using {}",
                        self.preferred_root.display(),
                        e,
                        self.fallback_root.display()
                    );
                    match Self::create_under(&self.fallback_root) {
                        Ok(dirs) => dirs,
                        Err(e) => {
                            // Writes against these paths will fail and be
                            // swallowed by the best-effort sinks.
                            warn!("[comtap] fallback dir creation failed: {}", e);
                            Dirs {
                                log_dir: self.fallback_root.join(LOG_DIR_NAME),
                                capture_dir: self.fallback_root.join(CAPTURE_DIR_NAME),
                            }
                        }
                    }
                }
            }
        })
    }

    fn create_under(root: &Path) -> io::Result<Dirs> {
        let log_dir = root.join(LOG_DIR_NAME);
        let capture_dir = root.join(CAPTURE_DIR_NAME);
        fs::create_dir_all(&log_dir)?;
        fs::create_dir_all(&capture_dir)?;
        Ok(Dirs {
            log_dir,
            capture_dir,
        })
    }
}
