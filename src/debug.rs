use parking_lot::Mutex;
/// Debugging infrastructure for x11-session
///
/// Controlled by DEBUG_LEVEL environment variable:
/// - 0 or unset: No debugging
/// - 1: Errors only
/// - 2: Info level (lifecycle, stage transitions)
/// - 3: Debug level (loop decisions, redraw causes)
/// - 4: Trace level (every record, every wakeup)
///
/// All output goes to /tmp/x11_session_debug.log on Unix,
/// or %TEMP%\x11_session_debug.log elsewhere.
/// The session loop runs inside host applications, so nothing is written
/// to stdout/stderr unless RUST_LOG asks for it.
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use log::{LevelFilter, Log, Metadata, Record};

/// Debug level configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DebugLevel {
    Off = 0,
    Error = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
}

impl DebugLevel {
    fn from_env() -> Self {
        match std::env::var("DEBUG_LEVEL") {
            Ok(val) => Self::parse(&val),
            Err(_) => DebugLevel::Off,
        }
    }

    fn parse(val: &str) -> Self {
        match val.trim().parse::<u8>() {
            Ok(1) => DebugLevel::Error,
            Ok(2) => DebugLevel::Info,
            Ok(3) => DebugLevel::Debug,
            Ok(4) => DebugLevel::Trace,
            _ => DebugLevel::Off,
        }
    }
}

/// Location of the debug log file.
pub fn log_path() -> PathBuf {
    #[cfg(unix)]
    let path = PathBuf::from("/tmp/x11_session_debug.log");
    #[cfg(not(unix))]
    let path = std::env::temp_dir().join("x11_session_debug.log");
    path
}

/// Global debug logger
struct DebugLogger {
    level: DebugLevel,
    file: Option<std::fs::File>,
    opened: bool,
}

impl DebugLogger {
    fn new() -> Self {
        let mut logger = DebugLogger {
            level: DebugLevel::from_env(),
            file: None,
            opened: false,
        };
        if logger.level != DebugLevel::Off {
            logger.open();
        }
        logger
    }

    /// Open (truncate) the log file once and write the session header.
    fn open(&mut self) {
        if self.opened {
            return;
        }
        self.opened = true;

        // A log file that can't be opened is silently skipped.
        if let Ok(f) = OpenOptions::new()
            .write(true)
            .truncate(true)
            .create(true)
            .open(log_path())
        {
            self.file = Some(f);
            let level = self.level;
            self.write_raw(&format!(
                "\n{}\nx11-session debug session started at {} (level={:?})\n{}\n",
                "=".repeat(80),
                get_timestamp(),
                level,
                "=".repeat(80)
            ));
        }
    }

    fn write_raw(&mut self, msg: &str) {
        if let Some(ref mut file) = self.file {
            let _ = file.write_all(msg.as_bytes());
            let _ = file.flush();
        }
    }

    fn write_line(&mut self, level_str: &str, category: &str, msg: &str) {
        self.write_raw(&format!(
            "[{}] [{}] [{}] {}\n",
            get_timestamp(),
            level_str,
            category,
            msg
        ));
    }

    fn log(&mut self, level: DebugLevel, category: &str, msg: &str) {
        if level <= self.level {
            let level_str = match level {
                DebugLevel::Error => "ERROR",
                DebugLevel::Info => "INFO ",
                DebugLevel::Debug => "DEBUG",
                DebugLevel::Trace => "TRACE",
                DebugLevel::Off => return,
            };
            self.write_line(level_str, category, msg);
        }
    }
}

static LOGGER: OnceLock<Mutex<DebugLogger>> = OnceLock::new();

fn get_logger() -> &'static Mutex<DebugLogger> {
    LOGGER.get_or_init(|| Mutex::new(DebugLogger::new()))
}

fn get_timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}.{:06}", now.as_secs(), now.subsec_micros())
}

/// Check if debugging is enabled at given level
pub fn is_enabled(level: DebugLevel) -> bool {
    let logger = get_logger().lock();
    level <= logger.level
}

/// Log a message at specified level
pub fn log(level: DebugLevel, category: &str, msg: &str) {
    let mut logger = get_logger().lock();
    logger.log(level, category, msg);
}

/// Log formatted message
pub fn logf(level: DebugLevel, category: &str, args: fmt::Arguments) {
    if is_enabled(level) {
        log(level, category, &format!("{}", args));
    }
}

// Convenience macros for logging
#[macro_export]
macro_rules! debug_info {
    ($category:expr, $($arg:tt)*) => {
        $crate::debug::logf($crate::debug::DebugLevel::Info, $category, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! debug_log {
    ($category:expr, $($arg:tt)*) => {
        $crate::debug::logf($crate::debug::DebugLevel::Debug, $category, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! debug_trace {
    ($category:expr, $($arg:tt)*) => {
        $crate::debug::logf($crate::debug::DebugLevel::Trace, $category, format_args!($($arg)*))
    };
}

// ---------------------------------------------------------------------------
// `log` crate bridge
// ---------------------------------------------------------------------------

/// Routes `log` records into the debug log file, mirroring to stderr when
/// RUST_LOG is set.
struct LogBridge {
    mirror_stderr: bool,
}

impl Log for LogBridge {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let level_str = match record.level() {
            log::Level::Error => "ERROR",
            log::Level::Warn => "WARN ",
            log::Level::Info => "INFO ",
            log::Level::Debug => "DEBUG",
            log::Level::Trace => "TRACE",
        };
        let msg = record.args().to_string();

        {
            let mut logger = get_logger().lock();
            logger.open();
            logger.write_line(level_str, record.target(), &msg);
        }

        if self.mirror_stderr {
            eprintln!("[{}] [{}] {}", level_str.trim_end(), record.target(), msg);
        }
    }

    fn flush(&self) {}
}

static BRIDGE: OnceLock<LogBridge> = OnceLock::new();

/// Set when the level came from the caller or RUST_LOG, which both take
/// precedence over the configuration file.
static LEVEL_PINNED: AtomicBool = AtomicBool::new(false);

fn rust_log_level() -> Option<LevelFilter> {
    std::env::var("RUST_LOG")
        .ok()
        .and_then(|v| v.trim().parse::<LevelFilter>().ok())
}

/// Install the `log` bridge.
///
/// Level precedence: `level` argument, then RUST_LOG, then whatever the
/// configuration applies later through [`apply_config_log_level`]. Calling
/// this more than once, or after another logger was installed, only
/// updates the level.
pub fn init_log_bridge(level: Option<LevelFilter>) {
    let env_level = rust_log_level();
    let pinned = level.or(env_level);

    let bridge = BRIDGE.get_or_init(|| LogBridge {
        mirror_stderr: env_level.is_some(),
    });
    if log::set_logger(bridge).is_err() {
        log::debug!("Logger already installed, keeping existing one");
    }

    match pinned {
        Some(filter) => {
            LEVEL_PINNED.store(true, Ordering::Relaxed);
            log::set_max_level(filter);
        }
        None => log::set_max_level(LevelFilter::Off),
    }
}

/// Apply the configuration's log level unless the caller or RUST_LOG
/// already chose one.
pub fn apply_config_log_level(level: LevelFilter) {
    if !LEVEL_PINNED.load(Ordering::Relaxed) {
        log::set_max_level(level);
    }
}
