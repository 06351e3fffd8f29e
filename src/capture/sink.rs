use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Local, Timelike};

use super::layout::OutputLayout;
use super::types::Direction;
use crate::error_handling::types::SinkError;
use crate::tracking::types::RawHandle;

/// Persists one binary artifact per captured transfer.
///
/// The sink takes no lock: correctness under concurrent captures rests on
/// the synthesized name being unique for any two transfers that differ in
/// direction, handle identity, or second/millisecond timestamp. The
/// payload is written verbatim in a single write.
pub struct CaptureSink {
    layout: Arc<OutputLayout>,
}

impl CaptureSink {
    pub fn new(layout: Arc<OutputLayout>) -> Self {
        Self { layout }
    }

    /// Writes `payload` to a uniquely named artifact and returns its
    /// path. Callers only capture transfers that moved at least one byte.
    pub fn capture(
        &self,
        payload: &[u8],
        direction: Direction,
        handle: RawHandle,
    ) -> Result<PathBuf, SinkError> {
        let name = artifact_name(direction, Local::now(), handle);
        let path = self.layout.dirs().capture_dir.join(name);
        fs::write(&path, payload)?;
        Ok(path)
    }
}

/// Synthesizes the artifact file name from the components that identify a
/// transfer: direction tag, local time to the second, millisecond offset,
/// and the handle's numeric value.
pub fn artifact_name(direction: Direction, at: DateTime<Local>, handle: RawHandle) -> String {
    format!(
        "{}_{}_{:03}_handle_{}.bin",
        direction.as_str(),
        at.format("%Y%m%d_%H%M%S"),
        at.nanosecond() / 1_000_000,
        handle
    )
}
