use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::Local;
use log::{debug, warn};

use super::layout::OutputLayout;

/// Append-only, human-readable narrative of tap events.
///
/// One line per event, prefixed with the local wall-clock time in
/// brackets. The file is opened lazily on first use; the first lines are
/// a session header recording start time, process id and process name.
///
/// A single mutex covers the whole read-clock/format/append/flush
/// sequence so interleaved writers cannot produce a torn line. Every
/// event is mirrored to the ambient `log` channel, which is also where
/// the log degrades to when the file cannot be written.
pub struct EventLog {
    layout: Arc<OutputLayout>,
    state: Mutex<LogState>,
}

#[derive(Default)]
struct LogState {
    attempted: bool,
    file: Option<File>,
    path: Option<PathBuf>,
}

impl EventLog {
    pub fn new(layout: Arc<OutputLayout>) -> Self {
        Self {
            layout,
            state: Mutex::new(LogState::default()),
        }
    }

    /// Appends one event line, initializing the log file on first touch.
    pub fn record(&self, message: &str) {
        let mut state = self.state.lock().unwrap();
        if !state.attempted {
            state.attempted = true;
            Self::open_session_log(&mut state, &self.layout);
        }

        let now = Local::now();
        if let Some(file) = state.file.as_mut() {
            let written = writeln!(file, "[{}] {}", now.format("%H:%M:%S"), message)
                .and_then(|_| file.flush());
            if let Err(e) = written {
                warn!("[comtap] event log write failed, line dropped: {}", e);
            }
        }
        drop(state);

        debug!("[comtap] {}", message);
    }

    /// The session log path, if a file was successfully opened.
    pub fn path(&self) -> Option<PathBuf> {
        self.state.lock().unwrap().path.clone()
    }

    /// Flushes and closes the log file. Later records degrade to the
    /// ambient channel only.
    pub fn close(&self) {
        let mut state = self.state.lock().unwrap();
        if let Some(mut file) = state.file.take() {
            let _ = file.flush();
        }
        state.attempted = true;
    }

    fn open_session_log(state: &mut LogState, layout: &OutputLayout) {
        let now = Local::now();
        let path = layout
            .dirs()
            .log_dir
            .join(format!("comtap_{}.log", now.format("%Y%m%d_%H%M%S")));

        let mut file = match File::create(&path) {
            Ok(file) => file,
            Err(e) => {
                warn!(
                    "[comtap] cannot open event log {}: {}; events go to the debug channel only",
                    path.display(),
                    e
                );
                return;
            }
        };

        let header = format!(
            "COM port tap - Started at {}\nProcess ID: {}\nProcess Name: {}\n------------------------------------\n",
            now.format("%Y-%m-%d %H:%M:%S"),
            std::process::id(),
            process_name().unwrap_or_default(),
        );
        if let Err(e) = file.write_all(header.as_bytes()).and_then(|_| file.flush()) {
            warn!("[comtap] cannot write event log header: {}", e);
            return;
        }

        state.file = Some(file);
        state.path = Some(path);
    }
}

fn process_name() -> Option<String> {
    let exe = std::env::current_exe().ok()?;
    Some(exe.file_name()?.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::config::Config;
    use regex::Regex;
    use std::fs;
    use std::thread;
    use tempfile::TempDir;

    fn log_in(tmp: &TempDir) -> EventLog {
        let config = Config {
            output_root: tmp.path().to_path_buf(),
            ..Config::default()
        };
        EventLog::new(Arc::new(OutputLayout::new(&config)))
    }

    #[test]
    fn first_touch_writes_session_header() {
        let tmp = TempDir::new().unwrap();
        let log = log_in(&tmp);

        log.record("COM port opened: COM3");

        let content = fs::read_to_string(log.path().unwrap()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert!(lines[0].starts_with("COM port tap - Started at "));
        assert!(lines[1].starts_with("Process ID: "));
        assert!(lines[2].starts_with("Process Name: "));
        assert_eq!(lines[3], "------------------------------------");
        assert!(lines[4].ends_with("COM port opened: COM3"));
    }

    #[test]
    fn event_lines_carry_bracketed_time_prefix() {
        let tmp = TempDir::new().unwrap();
        let log = log_in(&tmp);

        log.record("first");
        log.record("second");

        let prefix = Regex::new(r"^\[\d{2}:\d{2}:\d{2}\] ").unwrap();
        let content = fs::read_to_string(log.path().unwrap()).unwrap();
        let events: Vec<&str> = content.lines().skip(4).collect();
        assert_eq!(events.len(), 2);
        for line in events {
            assert!(prefix.is_match(line), "bad line: {:?}", line);
        }
    }

    #[test]
    fn log_file_lands_in_logs_directory() {
        let tmp = TempDir::new().unwrap();
        let log = log_in(&tmp);

        log.record("hello");

        let path = log.path().unwrap();
        assert_eq!(path.parent().unwrap(), tmp.path().join("logs"));
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("comtap_") && name.ends_with(".log"));
    }

    #[test]
    fn concurrent_writers_never_tear_a_line() {
        let _ = env_logger::builder().is_test(true).try_init();
        let tmp = TempDir::new().unwrap();
        let log = Arc::new(log_in(&tmp));

        let mut workers = Vec::new();
        for t in 0..8u32 {
            let log = Arc::clone(&log);
            workers.push(thread::spawn(move || {
                for i in 0..50u32 {
                    log.record(&format!("worker {} event {}", t, i));
                }
            }));
        }
        for worker in workers {
            worker.join().unwrap();
        }

        let prefix = Regex::new(r"^\[\d{2}:\d{2}:\d{2}\] worker \d+ event \d+$").unwrap();
        let content = fs::read_to_string(log.path().unwrap()).unwrap();
        let events: Vec<&str> = content.lines().skip(4).collect();
        assert_eq!(events.len(), 8 * 50);
        for line in &events {
            assert!(prefix.is_match(line), "torn or malformed line: {:?}", line);
        }
    }

    #[test]
    fn records_after_close_do_not_panic() {
        let tmp = TempDir::new().unwrap();
        let log = log_in(&tmp);

        log.record("before close");
        log.close();
        log.record("after close");

        let content = fs::read_to_string(log.path().unwrap()).unwrap();
        assert!(content.contains("before close"));
        assert!(!content.contains("after close"));
    }
}
