use anyhow::Result;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

pub type LogFile = Arc<Mutex<BufWriter<File>>>;

/// Line logger: every line goes to stderr and, when opened with a file, to `logs/<prefix>_<timestamp>.log`
#[derive(Clone, Default)]
pub struct Logger {
    file: Option<LogFile>,
}

impl Logger {
    pub fn open<P: AsRef<Path>>(dir: P, prefix: &str) -> Result<(Self, PathBuf)> {
        fs::create_dir_all(dir.as_ref())?;
        let ts = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let path = dir.as_ref().join(format!("{}_{}.log", prefix, ts));
        let file = File::create(&path)?;
        eprintln!("Log: {}", path.display());
        let logger = Self { file: Some(Arc::new(Mutex::new(BufWriter::new(file)))) };
        Ok((logger, path))
    }

    /// Logger that only writes to stderr
    pub fn stderr_only() -> Self {
        Self::default()
    }

    /// Open a log file, falling back to stderr only if the directory is not writable
    pub fn open_or_stderr<P: AsRef<Path>>(dir: P, prefix: &str) -> Self {
        match Self::open(dir, prefix) {
            Ok((logger, _)) => logger,
            Err(e) => {
                eprintln!("[log] file logging disabled: {e}");
                Self::stderr_only()
            }
        }
    }

    pub fn line(&self, msg: &str) {
        eprintln!("{}", msg);
        if let Some(file) = &self.file {
            if let Ok(mut f) = file.lock() {
                let _ = writeln!(f, "{}", msg);
                let _ = f.flush();
            }
        }
    }
}

#[macro_export]
macro_rules! log {
    ($logger:expr, $($arg:tt)*) => {{
        let msg = format!($($arg)*);
        $logger.line(&msg);
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_written() {
        let dir = tempfile::tempdir().unwrap();
        let (logger, path) = Logger::open(dir.path(), "session").unwrap();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("session_"));
        assert!(name.ends_with(".log"));

        crate::log!(logger, "[session] started {}", "Tree Pose");
        let clone = logger.clone();
        crate::log!(clone, "[session] stopped");

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "[session] started Tree Pose\n[session] stopped\n");
    }

    #[test]
    fn test_stderr_only_does_not_panic() {
        let logger = Logger::stderr_only();
        crate::log!(logger, "no file {}", 1);
    }
}
